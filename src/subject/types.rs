use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Prefix of every display name that could not be resolved from the source text.
pub const UNRESOLVED_NAME: &str = "Name cannot be resolved.";

/// Length of the excerpt appended to an unresolved display name.
pub const UNRESOLVED_EXCERPT_LENGTH: usize = 40;

/// News outlet an obituary was published by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceId {
    Guardian,
    NYTimes,
    Independent,
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Guardian => write!(f, "Guardian"),
            SourceId::NYTimes => write!(f, "NYTimes"),
            SourceId::Independent => write!(f, "Independent"),
        }
    }
}

/// Raw subject text as delivered by a source, before any name rules are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawSubject {
    /// Only the headline (or web title) is available.
    Headline,
    /// Structured "persons" keywords, in source order.
    Persons(Vec<String>),
    /// Resolved upstream, as in the archived Independent dataset.
    Preresolved {
        name: String,
        normalized_name: Option<String>,
    },
}

/// An obituary as fetched from a source. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObituary {
    pub id: String,
    pub source: SourceId,
    pub publication_date: NaiveDate,
    pub headline: String,
    pub raw_subject: RawSubject,
    /// Where the full body text can be fetched from (API url or article url).
    pub body_locator: String,
    pub web_url: String,
    pub api_url: String,
}

/// The person an obituary concerns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub normalized_name: String,
}

impl Subject {
    pub fn new(name: impl Into<String>, normalized_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            normalized_name: normalized_name.into(),
        }
    }

    /// Sentinel subject for text no name could be extracted from.
    ///
    /// The display name is `Name cannot be resolved. <label>: <excerpt>` with
    /// the excerpt cut at [`UNRESOLVED_EXCERPT_LENGTH`] characters.
    pub fn unresolved(label: &str, text: &str) -> Self {
        let excerpt: String = text.chars().take(UNRESOLVED_EXCERPT_LENGTH).collect();
        let name = format!("{} {}: {}", UNRESOLVED_NAME, label, excerpt);
        Self {
            normalized_name: name.clone(),
            name,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !is_unresolved_name(&self.name)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub fn is_unresolved_name(name: &str) -> bool {
    name.starts_with(UNRESOLVED_NAME)
}

/// A raw obituary together with its resolved subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obituary {
    pub raw: RawObituary,
    pub subject: Subject,
}

impl Obituary {
    pub fn source(&self) -> SourceId {
        self.raw.source
    }

    pub fn web_url(&self) -> &str {
        &self.raw.web_url
    }
}

/// Keep the first obituary per normalized subject name, preserving order.
pub fn dedup_by_normalized_name(obituaries: Vec<Obituary>) -> Vec<Obituary> {
    let mut seen = HashSet::new();
    obituaries
        .into_iter()
        .filter(|obituary| seen.insert(obituary.subject.normalized_name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obituary(id: &str, name: &str, normalized: &str) -> Obituary {
        Obituary {
            raw: RawObituary {
                id: id.to_string(),
                source: SourceId::Guardian,
                publication_date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
                headline: name.to_string(),
                raw_subject: RawSubject::Headline,
                body_locator: String::new(),
                web_url: format!("https://example.org/{}", id),
                api_url: String::new(),
            },
            subject: Subject::new(name, normalized),
        }
    }

    #[test]
    fn test_unresolved_sentinel() {
        let subject = Subject::unresolved(
            "Main",
            "A Life Spent Among the Stars and the Instruments That Found Them",
        );
        assert!(!subject.is_resolved());
        assert_eq!(
            subject.name,
            "Name cannot be resolved. Main: A Life Spent Among the Stars and the Ins"
        );
        assert_eq!(subject.name, subject.normalized_name);

        assert!(Subject::new("Giorgio Armani", "Giorgio Armani").is_resolved());
    }

    #[test]
    fn test_unresolved_excerpt_shorter_than_limit() {
        let subject = Subject::unresolved("Title", "Tribute");
        assert_eq!(subject.name, "Name cannot be resolved. Title: Tribute");
    }

    #[test]
    fn test_obituary_serializes_publication_date() {
        let original = obituary("1", "Giorgio Armani", "Giorgio Armani");
        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains("\"publication_date\":\"2025-09-05\""));

        let parsed: Obituary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.raw.publication_date, original.raw.publication_date);
        assert_eq!(parsed.subject.normalized_name, "Giorgio Armani");
    }

    #[test]
    fn test_dedup_keeps_first() {
        let obituaries = vec![
            obituary("1", "Wally Cole", "Wally Cole"),
            obituary("2", "Loretta Young", "Loretta Young"),
            obituary("3", "Wally Cole", "Wally Cole"),
        ];
        let deduped = dedup_by_normalized_name(obituaries);
        let ids: Vec<&str> = deduped.iter().map(|o| o.raw.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
