use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use super::types::Subject;
use crate::TARGET_NAME;

// Longer titles first: only the first matching title is removed.
const HONORIFICS: &[&str] = &[
    "Admiral of the Fleet ",
    "Rear-Admiral ",
    "Admiral ",
    "Sir ",
    "Capt ",
    "Captain ",
    "Major ",
    "Colonel ",
    "Gen ",
    "General ",
    "Lt ",
    "Lieutenant ",
    "Dr ",
    "Doctor ",
    "The Rev ",
    "Rev ",
    "Reverend ",
    "Fr ",
    "Father ",
    "Rabbi ",
    "Archbishop ",
    "Bishop ",
    "Cardinal ",
    "President ",
    "Prime Minister ",
    "PM ",
    "Chancellor ",
    "Senator ",
    "Ambassador ",
    "Minister ",
    "Governor ",
    "Mayor ",
    "Judge ",
    "Prof ",
    "Professor ",
    "the late ",
    "The late ",
    "Italian photographer ",
    "Obituary ",
];

lazy_static! {
    static ref OBITUARY_WORD: Regex = Regex::new(r"(?i) obituary").unwrap();
}

/// Resolve the subject of a Guardian obituary from its web title.
///
/// `Obituary: John Gotti` and `Obituaries: Letters: Len Shackleton` lose their
/// labels, `Loretta Young - actress` and `Lynden Pindling, Bahamian politician`
/// lose their profession, `Wally Cole obituary` loses the trailing word and one
/// leading honorific is dropped.
pub fn resolve_subject(web_title: &str) -> Subject {
    let name = subject_name(web_title);

    if name.is_empty() {
        warn!(target: TARGET_NAME, "No subject name in Guardian title '{}'", web_title);
        return Subject::unresolved("Title", web_title);
    }

    let normalized_name = normalized_name(&name);
    Subject::new(name, normalized_name)
}

fn subject_name(web_title: &str) -> String {
    let mut name = web_title.trim().to_string();

    for _ in 0..2 {
        if let Some((_, rest)) = name.split_once(':') {
            name = rest.trim().to_string();
        }
    }

    if let Some(pos) = name.find(" - ").filter(|pos| *pos > 0) {
        name.truncate(pos);
    }
    if let Some(pos) = name.find(", ").filter(|pos| *pos > 0) {
        name.truncate(pos);
    }

    let name = name
        .replace("Obituaries; ", "")
        .replace(" (letter); ", "");
    let name = OBITUARY_WORD.replace_all(&name, "");

    strip_honorific(name.trim()).to_string()
}

fn strip_honorific(name: &str) -> &str {
    HONORIFICS
        .iter()
        .find_map(|title| name.strip_prefix(title))
        .map(str::trim)
        .unwrap_or(name)
}

/// Put a period after every isolated capital letter that does not end the name.
///
/// `William E Warwick` becomes `William E. Warwick`; `Malcolm X` is unchanged.
pub fn normalized_name(name: &str) -> String {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let last = tokens.len().saturating_sub(1);

    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let is_initial = token.len() == 1 && token.chars().all(|c| c.is_ascii_uppercase());
            if is_initial && index < last {
                format!("{}.", token)
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(web_title: &str) -> String {
        resolve_subject(web_title).name
    }

    #[test]
    fn test_colon_labels() {
        assert_eq!(name_of("Obituary: John Gotti"), "John Gotti");
        assert_eq!(name_of("Obituary:John Gotti"), "John Gotti");
        assert_eq!(name_of("Letters: the late Alan Ross"), "Alan Ross");
        assert_eq!(name_of("Obituaries: Letter: Len Shackleton"), "Len Shackleton");
        assert_eq!(name_of("Obituaries: Letters: Len Shackleton"), "Len Shackleton");
    }

    #[test]
    fn test_profession_clauses() {
        assert_eq!(name_of("Loretta Young - actress"), "Loretta Young");
        assert_eq!(
            name_of("Lynden Pindling, Bahamian politician"),
            "Lynden Pindling"
        );
        assert_eq!(
            name_of("Obituary: Lynden Pindling, Bahamian politician"),
            "Lynden Pindling"
        );
    }

    #[test]
    fn test_trailing_obituary_word() {
        assert_eq!(name_of("Wally Cole obituary"), "Wally Cole");
        assert_eq!(name_of("Giorgio Armani OBITUARY"), "Giorgio Armani");
    }

    #[test]
    fn test_one_leading_honorific() {
        assert_eq!(name_of("Sir Patrick Moore obituary"), "Patrick Moore");
        assert_eq!(name_of("Dr Who Knows"), "Who Knows");
        assert_eq!(name_of("Admiral of the Fleet Lord Lewin"), "Lord Lewin");
        assert_eq!(name_of("Rear-Admiral John Hervey"), "John Hervey");
        assert_eq!(name_of("Professor Sir Bernard Crick"), "Sir Bernard Crick");
        // Peerage titles are part of the name on Wikipedia
        assert_eq!(name_of("Lord Longford"), "Lord Longford");
        assert_eq!(name_of("Dame Judi Dench"), "Dame Judi Dench");
        // Needs the trailing space
        assert_eq!(name_of("Drew Barrymore"), "Drew Barrymore");
    }

    #[test]
    fn test_one_offs() {
        assert_eq!(name_of("Obituaries; Alan Clark"), "Alan Clark");
    }

    #[test]
    fn test_unresolvable_title() {
        let subject = resolve_subject("Obituary: ");
        assert!(!subject.is_resolved());
        assert!(subject.name.starts_with("Name cannot be resolved. Title: "));
    }

    #[test]
    fn test_normalized_name_dots_initials() {
        assert_eq!(normalized_name("William E Warwick"), "William E. Warwick");
        assert_eq!(normalized_name("E M Nathanson"), "E. M. Nathanson");
        assert_eq!(normalized_name("Malcolm X"), "Malcolm X");
        assert_eq!(normalized_name("J. Rambo"), "J. Rambo");
        assert_eq!(normalized_name("Wally Cole"), "Wally Cole");

        let subject = resolve_subject("Obituary: William A Fraker");
        assert_eq!(subject.name, "William A Fraker");
        assert_eq!(subject.normalized_name, "William A. Fraker");
    }
}
