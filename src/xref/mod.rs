//! Cross-source identity resolution and the Wikipedia existence check.

pub mod disambiguation;
pub mod matching;
pub mod pipeline;
pub mod types;


pub use disambiguation::{find_entry_by_death_year, find_entry_by_years, DisambiguationResolver};
pub use matching::{
    extract_one, similarity_score, CrossSourceMatcher, MatchConfig, MatchDecision, ScoreBand,
    DEFAULT_ADVISORY_FLOOR, DEFAULT_SCORE_THRESHOLD,
};
pub use pipeline::CrossReferencer;
pub use types::*;
