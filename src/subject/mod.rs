//! Per-source subject resolution.
//!
//! Each outlet formats the person an obituary is about differently: the
//! Guardian in its web title, the NYTimes in "persons" keywords or the
//! headline, the Independent in a pre-resolved dataset. [`SubjectResolver`]
//! picks the rules for a source and produces a [`Subject`].

pub mod guardian;
pub mod independent;
pub mod nytimes;
pub mod types;

pub use types::*;

use crate::name::capitalize_name;

/// Source-specific subject rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectResolver {
    Guardian,
    NYTimes,
    Independent,
}

impl SubjectResolver {
    pub fn for_source(source: SourceId) -> Self {
        match source {
            SourceId::Guardian => SubjectResolver::Guardian,
            SourceId::NYTimes => SubjectResolver::NYTimes,
            SourceId::Independent => SubjectResolver::Independent,
        }
    }

    /// Resolve the subject of a raw obituary. Never fails: text without a
    /// usable name yields an unresolved sentinel subject.
    pub fn resolve_subject(&self, obituary: &RawObituary) -> Subject {
        match (self, &obituary.raw_subject) {
            (_, RawSubject::Preresolved { name, normalized_name }) => {
                independent::resolve_subject(name, normalized_name.as_deref(), &obituary.headline)
            }
            (SubjectResolver::NYTimes, RawSubject::Persons(persons)) => {
                nytimes::resolve_subject(&obituary.headline, persons)
            }
            (SubjectResolver::NYTimes, RawSubject::Headline) => {
                nytimes::resolve_subject(&obituary.headline, &[])
            }
            (SubjectResolver::Guardian, _) => guardian::resolve_subject(&obituary.headline),
            (SubjectResolver::Independent, _) => {
                independent::subject_from_title(&obituary.headline)
            }
        }
    }

    /// Name versions to check on Wikipedia, most complete first.
    pub fn name_versions(&self, display_name: &str) -> Vec<String> {
        match self {
            SubjectResolver::NYTimes => nytimes::name_versions(display_name),
            SubjectResolver::Guardian | SubjectResolver::Independent => {
                if is_unresolved_name(display_name) {
                    return vec![display_name.to_string()];
                }
                let normalized = guardian::normalized_name(display_name);
                let mut versions = vec![normalized];
                let capitalized = capitalize_name(display_name);
                if !versions.iter().any(|v| v.eq_ignore_ascii_case(&capitalized)) {
                    versions.push(capitalized);
                }
                versions
            }
        }
    }

    /// Normalized name of a display name; a pure function of its input.
    pub fn normalized_name(&self, display_name: &str) -> String {
        match self {
            SubjectResolver::NYTimes => nytimes::normalized_name(display_name),
            SubjectResolver::Guardian | SubjectResolver::Independent => {
                guardian::normalized_name(display_name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(source: SourceId, headline: &str, raw_subject: RawSubject) -> RawObituary {
        RawObituary {
            id: "id".to_string(),
            source,
            publication_date: NaiveDate::from_ymd_opt(1999, 1, 15).unwrap(),
            headline: headline.to_string(),
            raw_subject,
            body_locator: String::new(),
            web_url: String::new(),
            api_url: String::new(),
        }
    }

    #[test]
    fn test_dispatch_per_source() {
        let guardian = raw(SourceId::Guardian, "Obituary: Wally Cole", RawSubject::Headline);
        let subject = SubjectResolver::for_source(guardian.source).resolve_subject(&guardian);
        assert_eq!(subject.name, "Wally Cole");

        let nytimes = raw(
            SourceId::NYTimes,
            "John D. Rockefeller Jr. Dies",
            RawSubject::Persons(vec!["ROCKEFELLER, JOHN D JR".to_string()]),
        );
        let subject = SubjectResolver::for_source(nytimes.source).resolve_subject(&nytimes);
        assert_eq!(subject.normalized_name, "John D. Rockefeller Jr.");

        let independent = raw(
            SourceId::Independent,
            "Obituary: Ion Voicu",
            RawSubject::Preresolved {
                name: "Ion Voicu".to_string(),
                normalized_name: None,
            },
        );
        let subject = SubjectResolver::for_source(independent.source).resolve_subject(&independent);
        assert_eq!(subject.name, "Ion Voicu");
    }

    #[test]
    fn test_normalized_name_is_deterministic() {
        for resolver in [
            SubjectResolver::Guardian,
            SubjectResolver::NYTimes,
            SubjectResolver::Independent,
        ] {
            for name in ["ROCKEFELLER, JOHN D JR", "William E Warwick", "Malcolm X"] {
                assert_eq!(resolver.normalized_name(name), resolver.normalized_name(name));
            }
        }
    }

    #[test]
    fn test_guardian_name_versions() {
        let versions = SubjectResolver::Guardian.name_versions("William E Warwick");
        assert_eq!(versions, vec!["William E. Warwick", "William E Warwick"]);

        let versions = SubjectResolver::Guardian.name_versions("Wally Cole");
        assert_eq!(versions, vec!["Wally Cole"]);
    }
}
