use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::types::MatchResult;
use crate::subject::Obituary;
use crate::TARGET_MATCH;

/// Minimum score for two normalized names to be treated as the same person.
pub const DEFAULT_SCORE_THRESHOLD: u8 = 85;

/// Lower edge of the band of near misses flagged for manual review.
pub const DEFAULT_ADVISORY_FLOOR: u8 = 75;

// Weight of the token-sort and token-set ratios
const TOKEN_RATIO_WEIGHT: f64 = 0.95;

/// Lowercase, strip accents and replace everything but letters and digits with single spaces.
pub fn preprocess(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn sorted_tokens(tokens: &[&str]) -> String {
    let mut tokens = tokens.to_vec();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<&str> = a.split(' ').collect();
    let b: Vec<&str> = b.split(' ').collect();
    normalized_levenshtein(&sorted_tokens(&a), &sorted_tokens(&b))
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<&str> = a.split(' ').collect();
    let b: Vec<&str> = b.split(' ').collect();

    let mut common: Vec<&str> = a.iter().filter(|t| b.contains(*t)).copied().collect();
    common.sort_unstable();
    common.dedup();
    let only_a: Vec<&str> = a.iter().filter(|t| !common.contains(*t)).copied().collect();
    let only_b: Vec<&str> = b.iter().filter(|t| !common.contains(*t)).copied().collect();

    let intersection = common.join(" ");
    let combined = |rest: &[&str]| {
        let rest = sorted_tokens(rest);
        format!("{} {}", intersection, rest).trim().to_string()
    };
    let with_a = combined(&only_a);
    let with_b = combined(&only_b);

    if intersection.is_empty() {
        return normalized_levenshtein(&with_a, &with_b);
    }

    normalized_levenshtein(&intersection, &with_a)
        .max(normalized_levenshtein(&intersection, &with_b))
        .max(normalized_levenshtein(&with_a, &with_b))
}

/// Similarity of two names on a 0 to 100 scale.
///
/// The best of the plain ratio and the (discounted) token-sort and token-set
/// ratios, so `Rambo John` still matches `John Rambo` and `E. M. Nathanson`
/// scores well against `Edwin M. Nathanson`. Blank input scores 0.
pub fn similarity_score(a: &str, b: &str) -> u8 {
    let a = preprocess(a);
    let b = preprocess(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let best = normalized_levenshtein(&a, &b)
        .max(TOKEN_RATIO_WEIGHT * token_sort_ratio(&a, &b))
        .max(TOKEN_RATIO_WEIGHT * token_set_ratio(&a, &b));

    (best * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Index and score of the best scoring choice; ties go to the first one seen.
pub fn extract_one<S: AsRef<str>>(query: &str, choices: &[S]) -> Option<(usize, u8)> {
    let mut best: Option<(usize, u8)> = None;
    for (index, choice) in choices.iter().enumerate() {
        let score = similarity_score(query, choice.as_ref());
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }
    best
}

/// Acceptance threshold and optional manual-review band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub threshold: u8,
    /// Scores in `[advisory_floor, threshold)` are flagged for review; `None` disables flagging.
    pub advisory_floor: Option<u8>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SCORE_THRESHOLD,
            advisory_floor: Some(DEFAULT_ADVISORY_FLOOR),
        }
    }
}

impl MatchConfig {
    pub fn classify(&self, score: u8) -> ScoreBand {
        if score >= self.threshold {
            ScoreBand::Accept
        } else if self.advisory_floor.is_some_and(|floor| score >= floor) {
            ScoreBand::Review
        } else {
            ScoreBand::Reject
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Accept,
    /// Below the threshold but close enough to be worth a manual look.
    Review,
    Reject,
}

/// Outcome of matching one obituary against a month of another source.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchDecision {
    Accepted(MatchResult),
    /// Rejected, but flagged for manual review.
    Advisory(MatchResult),
    /// Nothing close enough; carries the best attempt when there was any candidate.
    Rejected(Option<MatchResult>),
}

/// Fuzzy matcher over normalized subject names.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossSourceMatcher {
    config: MatchConfig,
}

impl CrossSourceMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Find the comparison obituary whose normalized name best matches the target's.
    pub fn best_match(&self, target: &Obituary, comparisons: &[Obituary]) -> MatchDecision {
        let names: Vec<&str> = comparisons
            .iter()
            .map(|obituary| obituary.subject.normalized_name.as_str())
            .collect();

        let Some((index, score)) = extract_one(&target.subject.normalized_name, &names) else {
            debug!(target: TARGET_MATCH, "No comparison obituaries for '{}'", target.subject.normalized_name);
            return MatchDecision::Rejected(None);
        };

        let result = MatchResult {
            matched_name: names[index].to_string(),
            score,
            source: target.clone(),
            target: comparisons[index].clone(),
        };

        debug!(
            target: TARGET_MATCH,
            "Best match for '{}': '{}' (score {})",
            target.subject.normalized_name,
            result.matched_name,
            score
        );

        match self.config.classify(score) {
            ScoreBand::Accept => MatchDecision::Accepted(result),
            ScoreBand::Review => MatchDecision::Advisory(result),
            ScoreBand::Reject => MatchDecision::Rejected(Some(result)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::{RawObituary, RawSubject, SourceId, Subject};
    use chrono::NaiveDate;

    fn obituary(source: SourceId, normalized_name: &str) -> Obituary {
        Obituary {
            raw: RawObituary {
                id: normalized_name.to_string(),
                source,
                publication_date: NaiveDate::from_ymd_opt(1999, 1, 1).unwrap(),
                headline: normalized_name.to_string(),
                raw_subject: RawSubject::Headline,
                body_locator: String::new(),
                web_url: String::new(),
                api_url: String::new(),
            },
            subject: Subject::new(normalized_name, normalized_name),
        }
    }

    #[test]
    fn test_preprocess() {
        assert_eq!(preprocess("  José   Ferrer "), "jose ferrer");
        assert_eq!(preprocess("E. M. Nathanson"), "e m nathanson");
        assert_eq!(preprocess("O'Brien-McDonald"), "o brien mcdonald");
        assert_eq!(preprocess("..."), "");
    }

    #[test]
    fn test_identical_and_folded_names_score_100() {
        assert_eq!(similarity_score("Loretta Young", "Loretta Young"), 100);
        assert_eq!(similarity_score("José Ferrer", "Jose Ferrer"), 100);
        assert_eq!(similarity_score("LORETTA YOUNG", "loretta young"), 100);
    }

    #[test]
    fn test_token_order_is_discounted() {
        assert_eq!(similarity_score("Rambo John", "John Rambo"), 95);
    }

    #[test]
    fn test_subset_names_score_high() {
        let score = similarity_score("John Rambo", "John J. Rambo");
        assert!(score >= DEFAULT_SCORE_THRESHOLD, "score {}", score);
    }

    #[test]
    fn test_different_people_score_low() {
        let score = similarity_score("Michael Aris", "Loretta Young");
        assert!(score < DEFAULT_ADVISORY_FLOOR, "score {}", score);
    }

    #[test]
    fn test_blank_input_scores_zero() {
        assert_eq!(similarity_score("", "John Rambo"), 0);
        assert_eq!(similarity_score("John Rambo", "  "), 0);
    }

    #[test]
    fn test_extract_one() {
        let choices = ["Loretta Young", "Wally Cole", "Walter Cole"];
        assert_eq!(extract_one("Wally Cole", &choices), Some((1, 100)));

        let empty: [&str; 0] = [];
        assert_eq!(extract_one("Wally Cole", &empty), None);
    }

    #[test]
    fn test_extract_one_tie_goes_to_first() {
        let choices = ["Wally Cole", "Loretta Young", "Wally Cole"];
        assert_eq!(extract_one("Wally Cole", &choices), Some((0, 100)));
    }

    #[test]
    fn test_classify_bands() {
        let config = MatchConfig::default();
        assert_eq!(config.classify(100), ScoreBand::Accept);
        assert_eq!(config.classify(85), ScoreBand::Accept);
        assert_eq!(config.classify(84), ScoreBand::Review);
        assert_eq!(config.classify(75), ScoreBand::Review);
        assert_eq!(config.classify(74), ScoreBand::Reject);

        let config = MatchConfig {
            threshold: 85,
            advisory_floor: None,
        };
        assert_eq!(config.classify(84), ScoreBand::Reject);
    }

    #[test]
    fn test_score_at_threshold_accepted_one_below_rejected() {
        let target = obituary(SourceId::Guardian, "Edwin M. Nathanson");
        let comparisons = vec![obituary(SourceId::NYTimes, "E. M. Nathanson")];
        let score = similarity_score("Edwin M. Nathanson", "E. M. Nathanson");
        assert!(score > 0 && score < 100);

        let at = CrossSourceMatcher::new(MatchConfig {
            threshold: score,
            advisory_floor: None,
        });
        assert!(matches!(
            at.best_match(&target, &comparisons),
            MatchDecision::Accepted(result) if result.score == score
        ));

        let above = CrossSourceMatcher::new(MatchConfig {
            threshold: score + 1,
            advisory_floor: None,
        });
        assert!(matches!(
            above.best_match(&target, &comparisons),
            MatchDecision::Rejected(Some(result)) if result.score == score
        ));

        let advisory = CrossSourceMatcher::new(MatchConfig {
            threshold: score + 1,
            advisory_floor: Some(score),
        });
        assert!(matches!(
            advisory.best_match(&target, &comparisons),
            MatchDecision::Advisory(_)
        ));
    }

    #[test]
    fn test_best_match_carries_both_obituaries() {
        let matcher = CrossSourceMatcher::default();
        let target = obituary(SourceId::Guardian, "Loretta Young");
        let comparisons = vec![
            obituary(SourceId::NYTimes, "Wally Cole"),
            obituary(SourceId::NYTimes, "Loretta Young"),
        ];

        match matcher.best_match(&target, &comparisons) {
            MatchDecision::Accepted(result) => {
                assert_eq!(result.matched_name, "Loretta Young");
                assert_eq!(result.score, 100);
                assert_eq!(result.source.source(), SourceId::Guardian);
                assert_eq!(result.target.source(), SourceId::NYTimes);
            }
            other => panic!("expected an accepted match, got {:?}", other),
        }

        assert_eq!(matcher.best_match(&target, &[]), MatchDecision::Rejected(None));
    }
}
