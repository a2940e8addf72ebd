//! MediaWiki API lookups against English Wikipedia.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::client::{create_http_client, get_text};
use crate::error::{Result, XrefError};
use crate::xref::{WikiPage, WikipediaLookup};
use crate::TARGET_WIKIPEDIA;

pub const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Interpret a `prop=pageprops&redirects=1` query for one title.
///
/// Page id `-1` or a `missing` page means no article. A disambiguation page
/// keeps the queried title so its wikitext can be fetched and a redirect
/// marker followed. Other redirects report their target.
pub fn parse_page_title(json: &str, name_version: &str) -> Result<Option<WikiPage>> {
    let root: Value = serde_json::from_str(json)
        .map_err(|e| XrefError::invalid_response("Wikipedia", format!("pageprops JSON: {}", e)))?;
    let query = root
        .get("query")
        .ok_or_else(|| XrefError::invalid_response("Wikipedia", "pageprops JSON without query"))?;
    let pages = match query.get("pages").and_then(Value::as_object) {
        Some(pages) => pages,
        None => return Ok(None),
    };

    let Some((page_id, page)) = pages.iter().next() else {
        return Ok(None);
    };
    if page_id == "-1" || page.get("missing").is_some() || page.get("invalid").is_some() {
        return Ok(None);
    }

    let is_disambiguation = page
        .get("pageprops")
        .and_then(|props| props.get("disambiguation"))
        .is_some();
    if is_disambiguation {
        return Ok(Some(WikiPage {
            title: name_version.to_string(),
            is_disambiguation: true,
        }));
    }

    let title = match query.get("redirects") {
        None => page
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(name_version)
            .to_string(),
        Some(redirects) => redirects
            .get(0)
            .and_then(|redirect| redirect.get("to"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                XrefError::invalid_response(
                    "Wikipedia",
                    format!("{}: redirect without values", name_version),
                )
            })?,
    };

    Ok(Some(WikiPage {
        title,
        is_disambiguation: false,
    }))
}

#[derive(Debug, Deserialize)]
struct ContentRoot {
    query: Option<ContentQuery>,
}

#[derive(Debug, Deserialize)]
struct ContentQuery {
    #[serde(default)]
    pages: Vec<ContentPage>,
}

#[derive(Debug, Deserialize)]
struct ContentPage {
    #[serde(default)]
    revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
struct Revision {
    slots: Slots,
}

#[derive(Debug, Deserialize)]
struct Slots {
    main: MainSlot,
}

#[derive(Debug, Deserialize)]
struct MainSlot {
    content: String,
}

/// `pages[0].revisions[0].slots.main.content` of a `formatversion=2` revisions query.
pub fn parse_page_content(json: &str, page_title: &str) -> Result<String> {
    let root: ContentRoot = serde_json::from_str(json)
        .map_err(|e| XrefError::invalid_response("Wikipedia", format!("revisions JSON: {}", e)))?;
    root.query
        .and_then(|query| query.pages.into_iter().next())
        .and_then(|page| page.revisions.into_iter().next())
        .map(|revision| revision.slots.main.content)
        .ok_or_else(|| {
            XrefError::invalid_response("Wikipedia", format!("no content for page '{}'", page_title))
        })
}

pub struct WikipediaApi {
    client: reqwest::Client,
    api_url: String,
}

impl WikipediaApi {
    pub fn new() -> Result<Self> {
        Self::with_api_url(WIKIPEDIA_API_URL)
    }

    pub fn with_api_url(api_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            api_url: api_url.into(),
        })
    }

    fn query_url(&self, params: &[(&str, &str)]) -> Result<String> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| XrefError::Configuration(format!("Wikipedia API url: {}", e)))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url.to_string())
    }

    pub fn page_title_url(&self, name_version: &str) -> Result<String> {
        self.query_url(&[
            ("action", "query"),
            ("titles", name_version),
            ("prop", "pageprops"),
            ("redirects", "1"),
            ("format", "json"),
        ])
    }

    pub fn page_content_url(&self, page_title: &str) -> Result<String> {
        self.query_url(&[
            ("action", "query"),
            ("prop", "revisions"),
            ("rvprop", "content"),
            ("rvslots", "main"),
            ("formatversion", "2"),
            ("format", "json"),
            ("titles", page_title),
        ])
    }
}

impl WikipediaLookup for WikipediaApi {
    async fn get_page_title(&self, name_version: &str) -> Result<Option<WikiPage>> {
        let url = self.page_title_url(name_version)?;
        let json = get_text(&self.client, &url, "Wikipedia page title").await?;
        let page = parse_page_title(&json, name_version)?;
        debug!(target: TARGET_WIKIPEDIA, "'{}' resolves to {:?}", name_version, page);
        Ok(page)
    }

    async fn get_page_content(&self, page_title: &str) -> Result<String> {
        let url = self.page_content_url(page_title)?;
        let json = get_text(&self.client, &url, "Wikipedia page content").await?;
        parse_page_content(&json, page_title)
    }
}
