use std::collections::HashSet;

use super::normalizer::{capitalize_name, is_connective_particle, lowercase_particles};
use super::suffix::adjust_firstnames;

/// A person's name split into its parts, as parsed from a
/// `Surname, Firstnames[ Suffix]` byline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameComponents {
    pub firstnames: Vec<String>,
    pub surnames: Vec<String>,
    pub suffix: Option<String>,
}

impl NameComponents {
    /// Parse `ROCKEFELLER, JOHN D JR` style input.
    ///
    /// Returns `None` when there is no comma separating surname and firstnames.
    pub fn parse(raw: &str) -> Option<Self> {
        let (surname, firstnames) = raw.split_once(',')?;
        let surname = capitalize_name(&surname.replace(',', " "));
        let (firstnames, suffix) = adjust_firstnames(&firstnames.replace(',', " "));

        Some(Self {
            firstnames: firstnames.split_whitespace().map(str::to_string).collect(),
            surnames: surname.split_whitespace().map(str::to_string).collect(),
            suffix: (!suffix.is_empty()).then_some(suffix),
        })
    }

    /// All plausible renderings, most complete first.
    pub fn versions(&self) -> Vec<String> {
        get_name_versions(
            &self.firstnames.join(" "),
            &self.surnames.join(" "),
            self.suffix.as_deref().unwrap_or_default(),
        )
    }
}

/// Returns the different renderings of a name.
///
/// Firstname variants are all firstnames and the first firstname only;
/// surname variants are the full surname and its first segment (split on space
/// or hyphen). Every surname × firstname combination is rendered with and then
/// without the suffix, most complete first, deduplicated case-insensitively.
///
/// ```
/// use biogap::name::get_name_versions;
///
/// assert_eq!(
///     get_name_versions("John J.", "Rambo-Matrix", ""),
///     vec!["John J. Rambo-Matrix", "John Rambo-Matrix", "John J. Rambo", "John Rambo"]
/// );
/// ```
pub fn get_name_versions(firstnames: &str, surname: &str, suffix: &str) -> Vec<String> {
    let firstname_parts: Vec<&str> = firstnames.split_whitespace().collect();
    let all_firstnames = firstname_parts.join(" ");
    let mut firstname_variants = vec![all_firstnames.clone()];
    if let Some(first) = firstname_parts.first() {
        if *first != all_firstnames {
            firstname_variants.push(first.to_string());
        }
    }

    let full_surname = surname.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut surname_variants = vec![full_surname.clone()];
    if let Some(segment) = full_surname.split([' ', '-']).next() {
        // "De la Madrid" never shrinks to "De"
        if !segment.is_empty() && segment != full_surname && !is_connective_particle(segment) {
            surname_variants.push(segment.to_string());
        }
    }

    let suffix = suffix.trim();
    let mut versions = Vec::new();

    for surname in &surname_variants {
        for firstname in &firstname_variants {
            if firstname.is_empty() && surname.is_empty() {
                continue;
            }
            versions.push(build_name(firstname, surname, suffix));
            if !suffix.is_empty() {
                versions.push(build_name(firstname, surname, ""));
            }
        }
    }

    if versions.is_empty() && !suffix.is_empty() {
        versions.push(suffix.to_string());
    }

    let mut seen = HashSet::new();
    versions
        .into_iter()
        .map(|version| lowercase_particles(&version))
        .filter(|version| seen.insert(version.to_lowercase()))
        .collect()
}

/// The canonical (normalized) rendering: the longest version, the last one on ties.
pub fn longest_version(versions: &[String]) -> Option<&String> {
    versions.iter().max_by_key(|version| version.chars().count())
}

fn build_name(firstname: &str, surname: &str, suffix: &str) -> String {
    [firstname, surname, suffix]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
