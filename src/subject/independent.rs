use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use super::guardian;
use super::types::Subject;
use crate::TARGET_NAME;

const MAX_NAME_LENGTH: usize = 127;

lazy_static! {
    static ref OBITUARY_WORD: Regex = Regex::new(r"(?i) obituary").unwrap();
    static ref REMEMBERING: Regex = Regex::new(r"(?i)Remembering ").unwrap();
}

/// Subject of an Independent obituary from the archived dataset.
///
/// The dataset carries the name; the normalized name is used as given when
/// present and otherwise derived with the Guardian initial rule. Rows without
/// a name fall back to the title.
pub fn resolve_subject(name: &str, normalized_name: Option<&str>, title: &str) -> Subject {
    let name = name.trim();
    if name.is_empty() {
        return subject_from_title(title);
    }

    let normalized_name = normalized_name
        .map(str::trim)
        .filter(|normalized| !normalized.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| guardian::normalized_name(name));

    Subject::new(name, normalized_name)
}

/// Subject from an article title.
///
/// ```
/// use biogap::subject::independent::subject_from_title;
///
/// assert_eq!(subject_from_title("OBITUARY : Peng Zhen").name, "Peng Zhen");
/// assert_eq!(subject_from_title("William A Fraker: Celebrated cinematographer").name, "William A Fraker");
/// ```
pub fn subject_from_title(title: &str) -> Subject {
    let name = name_from_title(title);
    if name.is_empty() {
        warn!(target: TARGET_NAME, "No subject name in Independent title '{}'", title);
        return Subject::unresolved("Title", title);
    }
    let normalized_name = guardian::normalized_name(&name);
    Subject::new(name, normalized_name)
}

fn name_from_title(title: &str) -> String {
    let title = title.trim();

    for prefix in ["Obituary:", "OBITUARY :"] {
        if starts_with_ignore_case(title, prefix) {
            let rest = &title[prefix.len()..];
            let rest = rest.split(',').next().unwrap_or(rest);
            return rest.trim().to_string();
        }
    }

    let title = OBITUARY_WORD.replace_all(title, "");
    let title = REMEMBERING.replace_all(&title, "");

    match title.find([':', ',']) {
        Some(pos) => truncate_chars(&title[..pos], MAX_NAME_LENGTH).trim().to_string(),
        None => title.trim().to_string(),
    }
}

/// Subject from the description meta tag, falling back to the article body.
///
/// The name is taken up to the first comma of the description
/// (`Ion Voicu, the elder statesman of Romanian violinists`), else up to the
/// first comma or ` was ` of the body text.
pub fn subject_from_excerpt(excerpt: &str, body_text: &str) -> Subject {
    if let Some((name, _)) = excerpt.split_once(',') {
        let name = name.trim();
        if !name.is_empty() {
            return Subject::new(name, guardian::normalized_name(name));
        }
    }

    let comma = body_text.find(',');
    let was = body_text.find(" was ");
    let end = match (comma, was) {
        (Some(comma), Some(was)) => comma.min(was),
        (Some(pos), None) | (None, Some(pos)) => pos,
        (None, None) => {
            warn!(target: TARGET_NAME, "No subject name in Independent excerpt '{}'", excerpt);
            return Subject::unresolved("Excerpt", excerpt);
        }
    };

    let name = truncate_chars(&body_text[..end], MAX_NAME_LENGTH).trim();
    if name.is_empty() {
        return Subject::unresolved("Excerpt", excerpt);
    }
    Subject::new(name, guardian::normalized_name(name))
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((pos, _)) => &text[..pos],
        None => text,
    }
}
