//! The Independent: an archived, pre-resolved CSV dataset plus article pages
//! for body text.

use chrono::NaiveDate;
use once_cell::sync::{Lazy, OnceCell};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::client::{create_http_client, get_text};
use super::parse_publication_date;
use crate::error::{Result, XrefError};
use crate::subject::independent::{subject_from_excerpt, subject_from_title};
use crate::subject::{
    dedup_by_normalized_name, Obituary, RawObituary, RawSubject, SourceId, SubjectResolver,
};
use crate::xref::ObituarySource;
use crate::TARGET_WEB_REQUEST;

pub const DEFAULT_CSV_PATH: &str = "data/obituaries-independent.csv";

const MAX_EXCERPT_LENGTH: usize = 127;

/// Paragraphs mentioning any of these are newsletter and sign-up boilerplate.
const BOILERPLATE_MARKERS: &[&str] = &["email", "newsletter", "sign up"];

static ARTICLE_PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article#articleContent p").unwrap());

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// One row of the archived dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatasetRow {
    pub id: String,
    pub publication_date: String,
    pub title: String,
    pub name: String,
    #[serde(default)]
    pub normalized_name: String,
    pub web_url: String,
}

impl DatasetRow {
    pub fn into_raw_obituary(self) -> Result<RawObituary> {
        let publication_date = NaiveDate::parse_from_str(self.publication_date.trim(), "%Y-%m-%d")
            .map_err(|e| {
                XrefError::invalid_response(
                    "Independent dataset",
                    format!("publication date '{}' of {}: {}", self.publication_date, self.id, e),
                )
            })?;
        let normalized_name = Some(self.normalized_name).filter(|n| !n.trim().is_empty());

        Ok(RawObituary {
            id: self.id,
            source: SourceId::Independent,
            publication_date,
            headline: self.title,
            raw_subject: RawSubject::Preresolved {
                name: self.name,
                normalized_name,
            },
            body_locator: self.web_url.clone(),
            web_url: self.web_url,
            api_url: String::new(),
        })
    }
}

/// Read a `;`-separated dataset with an `Id;PublicationDate;Title;Name;NormalizedName;WebUrl` header.
pub fn read_dataset<R: io::Read>(reader: R) -> Result<Vec<RawObituary>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut obituaries = Vec::new();
    for row in reader.deserialize::<DatasetRow>() {
        obituaries.push(row?.into_raw_obituary()?);
    }
    Ok(obituaries)
}

pub fn load_dataset(path: &Path) -> Result<Vec<Obituary>> {
    info!(target: TARGET_WEB_REQUEST, "Loading Independent dataset from {}", path.display());
    let file = std::fs::File::open(path)?;
    let resolver = SubjectResolver::Independent;
    let obituaries: Vec<Obituary> = read_dataset(file)?
        .into_iter()
        .map(|raw| {
            let subject = resolver.resolve_subject(&raw);
            Obituary { raw, subject }
        })
        .collect();
    debug!(target: TARGET_WEB_REQUEST, "Loaded {} Independent obituaries", obituaries.len());
    Ok(obituaries)
}

/// Article text: the non-empty `article#articleContent` paragraphs without
/// sign-up boilerplate, separated by blank lines.
pub fn extract_body_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&ARTICLE_PARAGRAPHS)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .filter(|text| {
            let lower = text.to_lowercase();
            !BOILERPLATE_MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Meta data of an article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub publication_date: NaiveDate,
    pub title: String,
    /// The description, cut at 127 characters.
    pub excerpt: String,
}

pub fn extract_metadata(html: &str) -> Result<ArticleMetadata> {
    let document = Html::parse_document(html);

    let date = meta_content(&document, "property", "article:published_time")
        .or_else(|| meta_content(&document, "property", "og:updated_time"))
        .or_else(|| meta_content(&document, "property", "date"))
        .ok_or_else(|| XrefError::invalid_response("Independent", "article without publication date"))?;
    let publication_date = parse_publication_date(&date).ok_or_else(|| {
        XrefError::invalid_response("Independent", format!("publication date '{}'", date))
    })?;

    let title = meta_content(&document, "property", "og:title")
        .or_else(|| {
            document
                .select(&TITLE)
                .next()
                .map(|title| title.text().collect::<String>())
        })
        .unwrap_or_default();

    let excerpt = meta_content(&document, "name", "description")
        .or_else(|| meta_content(&document, "property", "og:description"))
        .map(|description| description.trim().chars().take(MAX_EXCERPT_LENGTH).collect())
        .unwrap_or_default();

    Ok(ArticleMetadata {
        publication_date,
        title: title.trim().to_string(),
        excerpt,
    })
}

fn meta_content(document: &Html, attribute: &str, value: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[{}=\"{}\"]", attribute, value)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

/// Dataset row for one fetched article page.
///
/// `Name` comes from the title, `NormalizedName` from the description
/// (or the body text when the description has no comma).
pub fn dataset_row(id: &str, web_url: &str, html: &str) -> Result<DatasetRow> {
    let metadata = extract_metadata(html)?;
    let name = subject_from_title(&metadata.title).name;
    let normalized_name = subject_from_excerpt(&metadata.excerpt, &extract_body_text(html))
        .name
        .replace(['\r', '\n', '\t'], " ");

    Ok(DatasetRow {
        id: id.to_string(),
        publication_date: metadata.publication_date.format("%Y-%m-%d").to_string(),
        title: metadata.title,
        name,
        normalized_name,
        web_url: web_url.to_string(),
    })
}

pub struct IndependentArchive {
    client: reqwest::Client,
    csv_path: PathBuf,
    dataset: OnceCell<Vec<Obituary>>,
}

impl IndependentArchive {
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            csv_path: csv_path.into(),
            dataset: OnceCell::new(),
        })
    }

    /// The whole dataset, read on first use.
    pub fn dataset(&self) -> Result<&[Obituary]> {
        self.dataset
            .get_or_try_init(|| load_dataset(&self.csv_path))
            .map(Vec::as_slice)
    }

    pub async fn fetch_dataset_row(&self, id: &str, web_url: &str) -> Result<DatasetRow> {
        let html = get_text(&self.client, web_url, "Independent article").await?;
        dataset_row(id, web_url, &html)
    }
}

impl ObituarySource for IndependentArchive {
    fn source_id(&self) -> SourceId {
        SourceId::Independent
    }

    async fn resolve_obituaries_of_month(&self, year: i32, month: u32) -> Result<Vec<Obituary>> {
        use chrono::Datelike;

        let obituaries: Vec<Obituary> = self
            .dataset()?
            .iter()
            .filter(|o| {
                o.raw.publication_date.year() == year && o.raw.publication_date.month() == month
            })
            .cloned()
            .collect();
        Ok(dedup_by_normalized_name(obituaries))
    }

    async fn get_obituary_text(&self, locator: &str, subject_hint: &str) -> Result<String> {
        let context = format!("Independent obituary text of {}", subject_hint);
        let html = get_text(&self.client, locator, &context).await?;
        Ok(extract_body_text(&html))
    }
}
