//! Guardian content API: obituaries of a month and their body text.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::client::{create_http_client, get_text};
use super::parse_publication_date;
use crate::error::{Result, XrefError};
use crate::subject::{
    dedup_by_normalized_name, Obituary, RawObituary, RawSubject, SourceId, SubjectResolver,
};
use crate::xref::ObituarySource;
use crate::TARGET_WEB_REQUEST;

pub const GUARDIAN_API_URL: &str = "https://content.guardianapis.com";

/// Letters pages published under the obituaries tone.
const EXCLUDED_TITLES: &[&str] = &[
    "Letter",
    "Letters",
    "Obituary: Letter",
    "Obituaries: Letter",
    "Obituary: Letters",
    "Obituaries: Letters",
];

#[derive(Debug, Deserialize)]
struct ArchivePage {
    response: Option<ArchiveResponse>,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    pages: u32,
    #[serde(default)]
    results: Vec<ArchiveResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchiveResult {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    web_title: String,
    web_url: String,
    api_url: String,
    web_publication_date: String,
}

#[derive(Debug, Deserialize)]
struct ContentPage {
    response: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    fields: Option<ContentFields>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentFields {
    body_text: Option<String>,
}

/// One page of the obituaries tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePageResult {
    pub obituaries: Vec<RawObituary>,
    pub pages: u32,
}

pub fn is_excluded_title(web_title: &str) -> bool {
    let web_title = web_title.trim();
    EXCLUDED_TITLES
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(web_title))
}

/// Parse one archive page, keeping articles that are not letters pages.
pub fn parse_archive_page(json: &str) -> Result<ArchivePageResult> {
    let page: ArchivePage = serde_json::from_str(json)
        .map_err(|e| XrefError::invalid_response("Guardian", format!("archive JSON: {}", e)))?;
    let response = page
        .response
        .ok_or_else(|| XrefError::invalid_response("Guardian", "archive JSON without response"))?;

    let mut obituaries = Vec::with_capacity(response.results.len());
    for result in response.results {
        if result.kind != "article" || is_excluded_title(&result.web_title) {
            debug!(target: TARGET_WEB_REQUEST, "Skipping Guardian {} '{}'", result.kind, result.web_title);
            continue;
        }
        let publication_date = parse_publication_date(&result.web_publication_date)
            .ok_or_else(|| {
                XrefError::invalid_response(
                    "Guardian",
                    format!("publication date '{}' of {}", result.web_publication_date, result.id),
                )
            })?;
        obituaries.push(RawObituary {
            id: result.id,
            source: SourceId::Guardian,
            publication_date,
            headline: result.web_title,
            raw_subject: RawSubject::Headline,
            body_locator: result.api_url.clone(),
            web_url: result.web_url,
            api_url: result.api_url,
        });
    }

    Ok(ArchivePageResult {
        obituaries,
        pages: response.pages,
    })
}

/// `response.content.fields.bodyText` of a single item response.
pub fn parse_body_text(json: &str) -> Result<String> {
    let page: ContentPage = serde_json::from_str(json)
        .map_err(|e| XrefError::invalid_response("Guardian", format!("content JSON: {}", e)))?;
    page.response
        .and_then(|response| response.content)
        .and_then(|content| content.fields)
        .and_then(|fields| fields.body_text)
        .ok_or_else(|| XrefError::invalid_response("Guardian", "content JSON without bodyText"))
}

/// Resolve subjects, keep the first obituary per normalized name and order by it.
pub fn resolve_obituaries(raw: Vec<RawObituary>) -> Vec<Obituary> {
    let resolver = SubjectResolver::Guardian;
    let obituaries = raw
        .into_iter()
        .map(|raw| {
            let subject = resolver.resolve_subject(&raw);
            Obituary { raw, subject }
        })
        .collect();

    let mut obituaries = dedup_by_normalized_name(obituaries);
    obituaries.sort_by(|a, b| a.subject.normalized_name.cmp(&b.subject.normalized_name));
    obituaries
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

pub struct GuardianApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GuardianApi {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(GUARDIAN_API_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn archive_url(&self, year: i32, month: u32, page: u32) -> Result<String> {
        let days = days_in_month(year, month).ok_or_else(|| {
            XrefError::Configuration(format!("invalid month {}/{}", year, month))
        })?;
        let mut url = Url::parse(&self.base_url)
            .and_then(|base| base.join("tone/obituaries"))
            .map_err(|e| XrefError::Configuration(format!("Guardian API url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("type", "article")
            .append_pair("from-date", &format!("{}-{}-1", year, month))
            .append_pair("to-date", &format!("{}-{}-{}", year, month, days))
            .append_pair("page", &page.to_string())
            .append_pair("api-key", &self.api_key);
        Ok(url.to_string())
    }

    pub fn body_text_url(&self, api_url: &str) -> Result<String> {
        let mut url = Url::parse(api_url)
            .map_err(|e| XrefError::invalid_response("Guardian", format!("apiUrl '{}': {}", api_url, e)))?;
        url.query_pairs_mut()
            .append_pair("show-fields", "bodyText")
            .append_pair("api-key", &self.api_key);
        Ok(url.to_string())
    }
}

impl ObituarySource for GuardianApi {
    fn source_id(&self) -> SourceId {
        SourceId::Guardian
    }

    async fn resolve_obituaries_of_month(&self, year: i32, month: u32) -> Result<Vec<Obituary>> {
        let mut raw = Vec::new();
        let mut page = 0;

        loop {
            page += 1;
            info!(
                target: TARGET_WEB_REQUEST,
                "Retrieving page {} of Guardian obituaries for {}/{}...", page, year, month
            );
            let url = self.archive_url(year, month, page)?;
            let json = get_text(&self.client, &url, "Guardian archive").await?;
            let result = parse_archive_page(&json)?;
            raw.extend(result.obituaries);

            if page >= result.pages {
                break;
            }
        }

        Ok(resolve_obituaries(raw))
    }

    async fn get_obituary_text(&self, locator: &str, subject_hint: &str) -> Result<String> {
        let url = self.body_text_url(locator)?;
        let context = format!("Guardian obituary text of {}", subject_hint);
        let json = get_text(&self.client, &url, &context).await?;
        parse_body_text(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARCHIVE_PAGE: &str = r#"{
        "response": {
            "status": "ok",
            "total": 4,
            "currentPage": 1,
            "pages": 2,
            "results": [
                {
                    "id": "news/1999/mar/02/guardianobituaries2",
                    "type": "article",
                    "webTitle": "Obituary: Wally Cole",
                    "webUrl": "https://www.theguardian.com/news/1999/mar/02/guardianobituaries2",
                    "apiUrl": "https://content.guardianapis.com/news/1999/mar/02/guardianobituaries2",
                    "webPublicationDate": "1999-03-02T00:00:00Z"
                },
                {
                    "id": "news/1999/mar/03/guardianobituaries",
                    "type": "article",
                    "webTitle": "Letters",
                    "webUrl": "https://www.theguardian.com/news/1999/mar/03/guardianobituaries",
                    "apiUrl": "https://content.guardianapis.com/news/1999/mar/03/guardianobituaries",
                    "webPublicationDate": "1999-03-03T00:00:00Z"
                },
                {
                    "id": "news/gallery/1999/mar/04/obits",
                    "type": "gallery",
                    "webTitle": "Lives remembered",
                    "webUrl": "https://www.theguardian.com/news/gallery/1999/mar/04/obits",
                    "apiUrl": "https://content.guardianapis.com/news/gallery/1999/mar/04/obits",
                    "webPublicationDate": "1999-03-04T00:00:00Z"
                },
                {
                    "id": "news/1999/mar/05/guardianobituaries1",
                    "type": "article",
                    "webTitle": "William E Warwick",
                    "webUrl": "https://www.theguardian.com/news/1999/mar/05/guardianobituaries1",
                    "apiUrl": "https://content.guardianapis.com/news/1999/mar/05/guardianobituaries1",
                    "webPublicationDate": "1999-03-05T00:00:00Z"
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_archive_page() {
        let result = parse_archive_page(ARCHIVE_PAGE).unwrap();
        assert_eq!(result.pages, 2);
        assert_eq!(result.obituaries.len(), 2);

        let first = &result.obituaries[0];
        assert_eq!(first.source, SourceId::Guardian);
        assert_eq!(first.headline, "Obituary: Wally Cole");
        assert_eq!(first.body_locator, first.api_url);
        assert_eq!(first.publication_date, NaiveDate::from_ymd_opt(1999, 3, 2).unwrap());
    }

    #[test]
    fn test_archive_without_response_is_invalid() {
        let err = parse_archive_page(r#"{"message": "Unauthorized"}"#).unwrap_err();
        assert!(matches!(err, XrefError::InvalidResponse { .. }));
    }

    #[test]
    fn test_excluded_titles_are_case_insensitive() {
        assert!(is_excluded_title("letters"));
        assert!(is_excluded_title("OBITUARY: LETTER"));
        assert!(!is_excluded_title("Letters from a lost generation"));
    }

    #[test]
    fn test_resolve_obituaries_dedupes_and_orders() {
        let mut raw = parse_archive_page(ARCHIVE_PAGE).unwrap().obituaries;
        let mut duplicate = raw[0].clone();
        duplicate.id = "news/1999/mar/09/guardianobituaries".to_string();
        raw.push(duplicate);

        let obituaries = resolve_obituaries(raw);
        let names: Vec<&str> = obituaries
            .iter()
            .map(|o| o.subject.normalized_name.as_str())
            .collect();
        assert_eq!(names, vec!["Wally Cole", "William E. Warwick"]);
        assert_eq!(obituaries[0].raw.id, "news/1999/mar/02/guardianobituaries2");
    }

    #[test]
    fn test_parse_body_text() {
        let json = r#"{"response": {"status": "ok", "content": {"fields": {"bodyText": "Wally Cole, born 2 March 1920; died 14 February 1999"}}}}"#;
        assert_eq!(
            parse_body_text(json).unwrap(),
            "Wally Cole, born 2 March 1920; died 14 February 1999"
        );

        let json = r#"{"response": {"status": "ok", "content": {"fields": {}}}}"#;
        assert!(parse_body_text(json).is_err());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(1999, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(1999, 12), Some(31));
        assert_eq!(days_in_month(1999, 13), None);
    }

    #[test]
    fn test_archive_url() {
        let api = GuardianApi::with_base_url("https://content.guardianapis.com", "KEY").unwrap();
        assert_eq!(
            api.archive_url(1999, 2, 3).unwrap(),
            "https://content.guardianapis.com/tone/obituaries?type=article&from-date=1999-2-1&to-date=1999-2-28&page=3&api-key=KEY"
        );
        assert!(api.archive_url(1999, 0, 1).is_err());
    }

    #[test]
    fn test_body_text_url() {
        let api = GuardianApi::new("KEY").unwrap();
        assert_eq!(
            api.body_text_url("https://content.guardianapis.com/news/1999/mar/02/guardianobituaries2")
                .unwrap(),
            "https://content.guardianapis.com/news/1999/mar/02/guardianobituaries2?show-fields=bodyText&api-key=KEY"
        );
    }
}
