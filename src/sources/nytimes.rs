//! NYTimes archive API: every document of a month, filtered to obituaries.

use serde::Deserialize;
use std::collections::HashSet;
use tracing::{info, warn};
use url::Url;

use super::client::{create_http_client, get_text};
use super::parse_publication_date;
use crate::error::{Result, XrefError};
use crate::name::capitalize_name;
use crate::subject::{
    dedup_by_normalized_name, Obituary, RawObituary, RawSubject, SourceId, SubjectResolver,
};
use crate::xref::ObituarySource;
use crate::TARGET_WEB_REQUEST;

pub const NYTIMES_API_URL: &str = "https://api.nytimes.com";

#[derive(Debug, Deserialize)]
struct Archive {
    response: Option<ArchiveResponse>,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    docs: Vec<Doc>,
}

#[derive(Debug, Deserialize)]
struct Doc {
    #[serde(rename = "_id")]
    id: String,
    pub_date: String,
    type_of_material: Option<String>,
    #[serde(default)]
    headline: Headline,
    #[serde(default)]
    keywords: Vec<Keyword>,
    #[serde(default)]
    web_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct Headline {
    #[serde(default)]
    main: String,
}

#[derive(Debug, Deserialize)]
struct Keyword {
    name: String,
    value: String,
}

impl Keyword {
    fn is_person(&self) -> bool {
        self.name.eq_ignore_ascii_case("persons") || self.name.eq_ignore_ascii_case("person")
    }
}

/// Parse an archive month into raw obituaries.
///
/// Documents are deduplicated by `_id` and kept when their type of material
/// mentions `Obituary`. Documents without a type of material are skipped with
/// a warning. The result is ordered by publication date.
pub fn parse_archive(json: &str) -> Result<Vec<RawObituary>> {
    let archive: Archive = serde_json::from_str(json)
        .map_err(|e| XrefError::invalid_response("NYTimes", format!("archive JSON: {}", e)))?;
    let response = archive
        .response
        .ok_or_else(|| XrefError::invalid_response("NYTimes", "archive JSON without response"))?;

    let mut seen = HashSet::new();
    let mut obituaries = Vec::new();

    for doc in response.docs {
        if !seen.insert(doc.id.clone()) {
            continue;
        }
        match doc.type_of_material.as_deref() {
            Some(material) if material.contains("Obituary") => {}
            Some(_) => continue,
            None => {
                warn!(
                    target: TARGET_WEB_REQUEST,
                    "Doc object has no type_of_material. Doc Id: {}", doc.id
                );
                continue;
            }
        }

        let publication_date = parse_publication_date(&doc.pub_date).ok_or_else(|| {
            XrefError::invalid_response("NYTimes", format!("pub_date '{}' of {}", doc.pub_date, doc.id))
        })?;

        let persons: Vec<String> = doc
            .keywords
            .iter()
            .filter(|keyword| keyword.is_person())
            .map(|keyword| keyword.value.clone())
            .collect();
        let raw_subject = if persons.is_empty() {
            RawSubject::Headline
        } else {
            RawSubject::Persons(persons)
        };

        obituaries.push(RawObituary {
            id: doc.id,
            source: SourceId::NYTimes,
            publication_date,
            headline: doc.headline.main,
            raw_subject,
            body_locator: doc.web_url.clone(),
            web_url: doc.web_url,
            api_url: String::new(),
        });
    }

    obituaries.sort_by_key(|obituary| obituary.publication_date);
    Ok(obituaries)
}

/// Resolve subjects, keep the first obituary per normalized name, order by display name.
pub fn resolve_obituaries(raw: Vec<RawObituary>) -> Vec<Obituary> {
    let resolver = SubjectResolver::NYTimes;
    let obituaries = raw
        .into_iter()
        .map(|raw| {
            let subject = resolver.resolve_subject(&raw);
            Obituary { raw, subject }
        })
        .collect();

    let mut obituaries = dedup_by_normalized_name(obituaries);
    obituaries.sort_by(|a, b| a.subject.name.cmp(&b.subject.name));
    obituaries
}

/// Shortest name version of a NYTimes subject, for listings.
pub fn listing_name(obituary: &Obituary) -> String {
    SubjectResolver::NYTimes
        .name_versions(&obituary.subject.name)
        .into_iter()
        .min_by_key(|version| version.chars().count())
        .unwrap_or_else(|| capitalize_name(&obituary.subject.name))
}

pub struct NYTimesApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NYTimesApi {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(NYTIMES_API_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn archive_url(&self, year: i32, month: u32) -> Result<String> {
        let mut url = Url::parse(&self.base_url)
            .and_then(|base| base.join(&format!("svc/archive/v1/{}/{}.json", year, month)))
            .map_err(|e| XrefError::Configuration(format!("NYTimes API url: {}", e)))?;
        url.query_pairs_mut().append_pair("api-key", &self.api_key);
        Ok(url.to_string())
    }
}

impl ObituarySource for NYTimesApi {
    fn source_id(&self) -> SourceId {
        SourceId::NYTimes
    }

    async fn resolve_obituaries_of_month(&self, year: i32, month: u32) -> Result<Vec<Obituary>> {
        info!(target: TARGET_WEB_REQUEST, "Retrieving NYTimes archive for {}/{}...", year, month);
        let url = self.archive_url(year, month)?;
        let json = get_text(&self.client, &url, "NYTimes archive").await?;
        Ok(resolve_obituaries(parse_archive(&json)?))
    }

    /// The archive API carries metadata only; NYTimes obituaries are always the
    /// comparison side and never need their body text.
    async fn get_obituary_text(&self, _locator: &str, subject_hint: &str) -> Result<String> {
        Err(XrefError::Configuration(format!(
            "the NYTimes archive API does not provide body text (requested for {})",
            subject_hint
        )))
    }
}
