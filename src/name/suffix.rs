use lazy_static::lazy_static;
use std::collections::HashMap;
use tracing::debug;

use super::normalizer::capitalize_name;
use crate::TARGET_NAME;

lazy_static! {
    // Single-letter numerals (I, V, X) are left out on purpose: "SAULS, JOHN I"
    // is John I. Sauls and "OGASAWARA, FRANK X" is Frank X. Ogasawara.
    static ref DIRECT_SUFFIXES: HashMap<&'static str, &'static str> = HashMap::from([
        ("JR", "Jr."),
        ("SR", "Sr."),
        ("II", "II"),
        ("III", "III"),
        ("IV", "IV"),
        ("VI", "VI"),
        ("VII", "VII"),
        ("VIII", "VIII"),
        ("IX", "IX"),
    ]);

    static ref ORDINAL_SUFFIXES: HashMap<&'static str, &'static str> = HashMap::from([
        ("1T", "I"),
        ("1ST", "I"),
        ("2D", "II"),
        ("2ND", "II"),
        ("3D", "III"),
        ("3RD", "III"),
        ("4TH", "IV"),
        ("5TH", "V"),
        ("6TH", "VI"),
        ("7TH", "VII"),
        ("8TH", "VIII"),
        ("9TH", "IX"),
        ("10TH", "X"),
    ]);
}

/// Firstname tokens with a generational suffix split off the tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixSplit<'a> {
    pub firstnames: Vec<&'a str>,
    pub suffix: Option<&'static str>,
}

/// Look up the last firstname token in the suffix tables.
///
/// The tail is only treated as a suffix when at least one other token remains,
/// so `SMITH, JR` keeps `JR` as the firstname.
pub fn resolve_suffix<'a>(tokens: &[&'a str]) -> SuffixSplit<'a> {
    if let Some((tail, rest)) = tokens.split_last() {
        if !rest.is_empty() {
            let tail = tail.trim_end_matches(['.', ',']).to_uppercase();
            let mapped = DIRECT_SUFFIXES
                .get(tail.as_str())
                .or_else(|| ORDINAL_SUFFIXES.get(tail.as_str()));

            if let Some(suffix) = mapped {
                return SuffixSplit {
                    firstnames: rest.to_vec(),
                    suffix: Some(*suffix),
                };
            }
        }
    }

    SuffixSplit {
        firstnames: tokens.to_vec(),
        suffix: None,
    }
}

/// Clean up the firstname half of a `Surname, Firstnames[ Suffix]` byline.
///
/// Returns the capitalized firstnames, with a period after each initial, and
/// the mapped suffix (empty when there is none).
///
/// ```
/// use biogap::name::adjust_firstnames;
///
/// assert_eq!(adjust_firstnames("JOHN D JR"), ("John D.".to_string(), "Jr.".to_string()));
/// assert_eq!(adjust_firstnames("JOHN 3D"), ("John".to_string(), "III".to_string()));
/// ```
pub fn adjust_firstnames(raw: &str) -> (String, String) {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let split = resolve_suffix(&tokens);

    if let Some(suffix) = split.suffix {
        debug!(target: TARGET_NAME, "Cut suffix '{}' from firstnames '{}'", suffix, raw);
    }

    let firstnames = capitalize_name(&split.firstnames.join(" "))
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            if word.chars().count() == 1 {
                format!("{}.", word.to_uppercase())
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    (firstnames, split.suffix.unwrap_or_default().to_string())
}
