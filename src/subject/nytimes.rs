use tracing::warn;

use super::types::{is_unresolved_name, Subject};
use crate::name::{capitalize_name, longest_version, NameComponents};
use crate::xref::matching::extract_one;
use crate::TARGET_NAME;

/// Resolve the subject of a NYTimes obituary.
///
/// Structured persons keywords win; with several, the one closest to the
/// headline is taken. Without keywords the headline up to its first comma is
/// used (`RAMBO, JOHN J, 70, VETERAN` style headlines).
pub fn resolve_subject(headline: &str, persons: &[String]) -> Subject {
    let name = subject_name(headline, persons);
    let normalized_name = normalized_name(&name);
    Subject::new(name, normalized_name)
}

fn subject_name(headline: &str, persons: &[String]) -> String {
    let persons: Vec<String> = persons
        .iter()
        .map(|person| strip_life_span(person).to_string())
        .filter(|person| !person.is_empty() && !person.starts_with('('))
        .collect();

    if let Some(first) = persons.first() {
        let picked = extract_one(headline, &persons)
            .map(|(index, _)| persons[index].clone())
            .unwrap_or_else(|| first.clone());

        if picked != *first {
            warn!(
                target: TARGET_NAME,
                "\"{}\", not \"{}\"! Main: {}",
                picked,
                first,
                headline.chars().take(40).collect::<String>()
            );
        }
        return picked;
    }

    match headline.split_once(',').map(|(name, _)| name.trim()) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            warn!(target: TARGET_NAME, "No persons keyword and no name before a comma in headline '{}'", headline);
            Subject::unresolved("Main", headline).name
        }
    }
}

/// Cut a trailing life span: `Strand, Mark (1934-2014)` becomes `Strand, Mark`.
pub fn strip_life_span(keyword: &str) -> &str {
    match keyword.find('(') {
        Some(pos) if pos > 0 => keyword[..pos].trim(),
        _ => keyword.trim(),
    }
}

/// All renderings of a NYTimes display name, most complete first.
///
/// ```
/// use biogap::subject::nytimes::name_versions;
///
/// assert_eq!(name_versions("ROCKEFELLER, JOHN 3D"), vec!["John Rockefeller III", "John Rockefeller"]);
/// ```
pub fn name_versions(display_name: &str) -> Vec<String> {
    if is_unresolved_name(display_name) {
        return vec![display_name.to_string()];
    }

    // 'John J. Rambo' instead of 'Rambo, John J.'
    if !display_name.contains(',') {
        return vec![capitalize_name(display_name)];
    }

    // "BAUMFELD," with nothing after it
    if !display_name.trim().contains(' ') {
        return vec![capitalize_name(&display_name.replace(',', ""))];
    }

    let versions = NameComponents::parse(display_name)
        .map(|components| components.versions())
        .unwrap_or_default();

    if versions.is_empty() {
        vec![capitalize_name(&display_name.replace(',', " "))]
    } else {
        versions
    }
}

/// The longest name version.
pub fn normalized_name(display_name: &str) -> String {
    let versions = name_versions(display_name);
    longest_version(&versions)
        .cloned()
        .unwrap_or_else(|| display_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_firstname() {
        assert_eq!(name_versions("RAMBO, JOHN"), vec!["John Rambo"]);
    }

    #[test]
    fn test_versions_with_initials() {
        assert_eq!(
            name_versions("Warwick, William E"),
            vec!["William E. Warwick", "William Warwick"]
        );
    }

    #[test]
    fn test_versions_with_suffix() {
        assert_eq!(name_versions("RAMBO, JOHN II"), vec!["John Rambo II", "John Rambo"]);
        assert_eq!(
            name_versions("ROCKEFELLER, JOHN JR"),
            vec!["John Rockefeller Jr.", "John Rockefeller"]
        );
        assert_eq!(
            name_versions("ROCKEFELLER, JOHN 3D"),
            vec!["John Rockefeller III", "John Rockefeller"]
        );
        assert_eq!(
            name_versions("ROCKEFELLER, JOHN D JR"),
            vec![
                "John D. Rockefeller Jr.",
                "John D. Rockefeller",
                "John Rockefeller Jr.",
                "John Rockefeller"
            ]
        );
    }

    #[test]
    fn test_single_letter_is_an_initial() {
        assert_eq!(
            name_versions("ROCKEFELLER, JOHN V"),
            vec!["John V. Rockefeller", "John Rockefeller"]
        );
    }

    #[test]
    fn test_names_without_comma() {
        assert_eq!(name_versions("john j. rambo"), vec!["John J. Rambo"]);
        assert_eq!(name_versions("BAUMFELD,"), vec!["Baumfeld"]);
    }

    #[test]
    fn test_normalized_name_is_longest_version() {
        assert_eq!(normalized_name("ROCKEFELLER, JOHN D JR"), "John D. Rockefeller Jr.");
        assert_eq!(normalized_name("Strand, Mark"), "Mark Strand");
    }

    #[test]
    fn test_strip_life_span() {
        assert_eq!(strip_life_span("Strand, Mark (1934-2014)"), "Strand, Mark");
        assert_eq!(strip_life_span("Strand, Mark"), "Strand, Mark");
        assert_eq!(strip_life_span("(1934-2014)"), "(1934-2014)");
    }

    #[test]
    fn test_resolve_from_persons_keyword() {
        let persons = vec!["Strand, Mark (1934-2014)".to_string()];
        let subject = resolve_subject("Mark Strand, Poet of Longing, Dies at 80", &persons);
        assert_eq!(subject.name, "Strand, Mark");
        assert_eq!(subject.normalized_name, "Mark Strand");
    }

    #[test]
    fn test_resolve_picks_person_closest_to_headline() {
        let persons = vec![
            "Bernstein, Leonard".to_string(),
            "Copland, Aaron".to_string(),
        ];
        let subject = resolve_subject("Aaron Copland, 90, Dean of American Composers, Dies", &persons);
        assert_eq!(subject.name, "Copland, Aaron");
    }

    #[test]
    fn test_resolve_from_headline() {
        let subject = resolve_subject("Mark Strand, Poet of Longing, Dies at 80", &[]);
        assert_eq!(subject.name, "Mark Strand");
        assert_eq!(subject.normalized_name, "Mark Strand");

        let subject = resolve_subject("JOHN MCDONALD, 70, VETERAN", &[]);
        assert_eq!(subject.normalized_name, "John McDonald");
    }

    #[test]
    fn test_empty_headline_prefix_is_unresolved() {
        let subject = resolve_subject(", 70, Veteran of Korea", &[]);
        assert!(!subject.is_resolved());
        assert_eq!(subject.name, "Name cannot be resolved. Main: , 70, Veteran of Korea");

        let subject = resolve_subject("  , Dies at 80", &[]);
        assert!(!subject.is_resolved());
    }

    #[test]
    fn test_life_span_only_keyword_is_skipped() {
        let subject = resolve_subject("Poet Dies", &["(1934-2014)".to_string()]);
        assert!(!subject.is_resolved());
        assert_eq!(subject.normalized_name, subject.name);

        let persons = vec!["(1934-2014)".to_string(), "Strand, Mark (1934-2014)".to_string()];
        let subject = resolve_subject("Mark Strand, Poet, Dies at 80", &persons);
        assert_eq!(subject.name, "Strand, Mark");
    }

    #[test]
    fn test_unresolvable_headline() {
        let subject = resolve_subject("A Life Spent Among the Stars and the Instruments", &[]);
        assert!(!subject.is_resolved());
        assert_eq!(
            subject.name,
            "Name cannot be resolved. Main: A Life Spent Among the Stars and the Ins"
        );
        assert_eq!(name_versions(&subject.name), vec![subject.name.clone()]);
        assert_eq!(subject.normalized_name, subject.name);
    }
}
