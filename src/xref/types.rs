use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::subject::{Obituary, SourceId};

/// A Wikipedia page found for a name version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiPage {
    pub title: String,
    pub is_disambiguation: bool,
}

/// A news source that publishes obituaries.
#[allow(async_fn_in_trait)]
pub trait ObituarySource {
    fn source_id(&self) -> SourceId;

    /// Obituaries published in the given month, deduplicated by normalized subject name.
    async fn resolve_obituaries_of_month(&self, year: i32, month: u32) -> Result<Vec<Obituary>>;

    /// Full body text of one obituary. Fails on a non-success transport result.
    async fn get_obituary_text(&self, locator: &str, subject_hint: &str) -> Result<String>;
}

/// Page lookups against Wikipedia.
#[allow(async_fn_in_trait)]
pub trait WikipediaLookup {
    /// `None` when no article exists under this title.
    async fn get_page_title(&self, name_version: &str) -> Result<Option<WikiPage>>;

    /// Raw wikitext, which may be a `#REDIRECT [[Target]]` marker.
    async fn get_page_content(&self, page_title: &str) -> Result<String>;
}

/// Best fuzzy match of one obituary against another source's month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched_name: String,
    /// 0 to 100.
    pub score: u8,
    pub source: Obituary,
    pub target: Obituary,
}

/// Everything needed to check one obituary during a month pass.
#[derive(Debug, Clone, Copy)]
pub struct ObituaryContext<'a> {
    pub obituary: &'a Obituary,
    pub comparison: &'a [Obituary],
    pub year: i32,
    pub month: u32,
}

/// Outcome of the Wikipedia existence check for a matched subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageExistence {
    Found { title: String },
    NotFound,
    /// A disambiguation page exists but no entry matched the subject.
    PossibleCandidate { page_title: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateTier {
    /// Fully resolved name, no Wikipedia article.
    Strong,
    /// Unresolved name, no Wikipedia article.
    Weak,
    /// Ambiguous disambiguation page; needs a human.
    Possible,
}

impl fmt::Display for CandidateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateTier::Strong => write!(f, "Strong candidate"),
            CandidateTier::Weak => write!(f, "Weak candidate"),
            CandidateTier::Possible => write!(f, "Possible candidate"),
        }
    }
}

/// A subject obituarized by two sources without a Wikipedia biography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub tier: CandidateTier,
    pub source_web_url: String,
    pub comparison_web_url: String,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}\n{}\n{}",
            self.tier, self.name, self.source_web_url, self.comparison_web_url
        )
    }
}

/// Result of cross-referencing one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossReferenceReport {
    pub year: i32,
    pub month: u32,
    /// Matches at or above the threshold that were checked on Wikipedia.
    pub evaluated_matches: usize,
    pub candidates: Vec<Candidate>,
    /// Near misses in the advisory band.
    pub review: Vec<MatchResult>,
}

impl CrossReferenceReport {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            ..Default::default()
        }
    }

    pub fn count_tier(&self, tier: CandidateTier) -> usize {
        self.candidates.iter().filter(|c| c.tier == tier).count()
    }
}
