use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::error::{Result, XrefError};
use crate::sources::independent::DEFAULT_CSV_PATH;
use crate::sources::wikipedia::WIKIPEDIA_API_URL;
use crate::xref::{MatchConfig, DEFAULT_ADVISORY_FLOOR, DEFAULT_SCORE_THRESHOLD};
use crate::TARGET_MATCH;

pub const SCORE_THRESHOLD_VAR: &str = "BIOGAP_SCORE_THRESHOLD";
pub const ADVISORY_FLOOR_VAR: &str = "BIOGAP_ADVISORY_FLOOR";
pub const GUARDIAN_API_KEY_VAR: &str = "GUARDIAN_API_KEY";
pub const NYTIMES_API_KEY_VAR: &str = "NYTIMES_API_KEY";
pub const INDEPENDENT_CSV_PATH_VAR: &str = "INDEPENDENT_CSV_PATH";
pub const WIKIPEDIA_API_URL_VAR: &str = "WIKIPEDIA_API_URL";

/// Placeholder left in sample configuration for keys that must be filled in.
const UNSET_PLACEHOLDER: &str = "TOSET";

/// Runtime settings read from the environment.
///
/// API keys are not read here; [`require_api_key`] is called only for the
/// sources a command actually uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub score_threshold: u8,
    pub advisory_floor: Option<u8>,
    pub independent_csv_path: PathBuf,
    pub wikipedia_api_url: String,
}

impl Settings {
    pub fn from_env() -> Self {
        let score_threshold = parse_threshold(env::var(SCORE_THRESHOLD_VAR).ok().as_deref());
        let advisory_floor =
            parse_advisory_floor(env::var(ADVISORY_FLOOR_VAR).ok().as_deref(), score_threshold);

        Self {
            score_threshold,
            advisory_floor,
            independent_csv_path: env::var(INDEPENDENT_CSV_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CSV_PATH)),
            wikipedia_api_url: env::var(WIKIPEDIA_API_URL_VAR)
                .unwrap_or_else(|_| WIKIPEDIA_API_URL.to_string()),
        }
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            threshold: self.score_threshold,
            advisory_floor: self.advisory_floor,
        }
    }
}

/// Fuzzy acceptance threshold, 0 to 100. Anything else falls back to the default.
pub fn parse_threshold(value: Option<&str>) -> u8 {
    let Some(value) = value else {
        return DEFAULT_SCORE_THRESHOLD;
    };
    match value.trim().parse::<u8>() {
        Ok(threshold) if threshold <= 100 => threshold,
        _ => {
            warn!(
                target: TARGET_MATCH,
                "Invalid {} '{}', using {}",
                SCORE_THRESHOLD_VAR, value, DEFAULT_SCORE_THRESHOLD
            );
            DEFAULT_SCORE_THRESHOLD
        }
    }
}

/// Lower edge of the manual-review band; `off` disables the band.
///
/// The floor always stays below the threshold.
pub fn parse_advisory_floor(value: Option<&str>, threshold: u8) -> Option<u8> {
    let clamped_default = || (threshold > 0).then(|| DEFAULT_ADVISORY_FLOOR.min(threshold - 1));

    let Some(value) = value else {
        return clamped_default();
    };
    if value.trim().eq_ignore_ascii_case("off") {
        return None;
    }
    match value.trim().parse::<u8>() {
        Ok(floor) if floor < threshold => Some(floor),
        _ => {
            let fallback = clamped_default();
            warn!(
                target: TARGET_MATCH,
                "Invalid {} '{}' for threshold {}, using {:?}",
                ADVISORY_FLOOR_VAR, value, threshold, fallback
            );
            fallback
        }
    }
}

/// An API key that must be set to something other than the placeholder.
pub fn require_api_key(var: &str) -> Result<String> {
    check_api_key(var, env::var(var).ok())
}

fn check_api_key(var: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(key) if !key.is_empty() && key != UNSET_PLACEHOLDER => Ok(key),
        _ => Err(XrefError::Configuration(format!(
            "{} is not set. Export it before running this command.",
            var
        ))),
    }
}
