use lazy_static::lazy_static;
use regex::Regex;

/// Connectives that stay lowercase inside a name ("Maurice Couve de Murville").
pub const CONNECTIVE_PARTICLES: &[&str] = &["De", "Da", "Von", "Van", "Der", "La"];

lazy_static! {
    static ref ROMAN_NUMERAL: Regex =
        Regex::new(r"(?i)^M{0,4}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$").unwrap();
}

fn is_roman_numeral(token: &str) -> bool {
    !token.is_empty() && ROMAN_NUMERAL.is_match(token)
}

/// Case-insensitive check against [`CONNECTIVE_PARTICLES`].
pub fn is_connective_particle(word: &str) -> bool {
    CONNECTIVE_PARTICLES
        .iter()
        .any(|particle| particle.eq_ignore_ascii_case(word))
}

/// Normalize the capitalization of a person's name.
///
/// Steps, in order:
/// 1. A trailing Roman numeral (`II`, `iv`, ...) on a multi-word name is kept verbatim.
/// 2. Every hyphen segment of every word is title-cased (`SMITH-JONES` → `Smith-Jones`).
/// 3. `Mc`, `Mac` and `O'` prefixes capitalize the following letter (`Mcdonald` → `McDonald`).
/// 4. Connective particles are lowercased unless they start the name.
///
/// The function is idempotent; blank input yields an empty string.
pub fn capitalize_name(name: &str) -> String {
    let tokens: Vec<&str> = name
        .split_whitespace()
        .filter(|token| token.chars().any(|c| c != '-'))
        .collect();

    let (body, roman_tail) = match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() && is_roman_numeral(last) => (rest, Some(*last)),
        _ => (tokens.as_slice(), None),
    };

    let mut words: Vec<String> = body
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let word = capitalize_word(token);
            if index > 0 && is_connective_particle(&word) {
                word.to_lowercase()
            } else {
                word
            }
        })
        .collect();

    if let Some(numeral) = roman_tail {
        words.push(numeral.to_string());
    }

    words.join(" ")
}

/// Lowercase connective particles that do not start the string.
///
/// Applied to fully assembled names, where the particle may come from a
/// surname that was capitalized on its own ("De la Madrid").
pub fn lowercase_particles(name: &str) -> String {
    name.split(' ')
        .enumerate()
        .map(|(index, word)| {
            if index > 0 && is_connective_particle(word) {
                word.to_lowercase()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    word.split('-')
        .filter(|segment| !segment.is_empty())
        .map(|segment| fix_compound_prefix(&title_case(segment)))
        .collect::<Vec<_>>()
        .join("-")
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    // Keep characters whose uppercase form expands (e.g. 'ß') so the result stays stable.
    let mut upper = first.to_uppercase();
    let head = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => first,
    };

    let mut result = String::with_capacity(segment.len());
    result.push(head);
    result.push_str(&chars.as_str().to_lowercase());
    result
}

fn fix_compound_prefix(segment: &str) -> String {
    for prefix in ["Mc", "Mac", "O'"] {
        if let Some(rest) = segment.strip_prefix(prefix) {
            let mut chars = rest.chars();
            if let Some(next) = chars.next() {
                if next.is_alphabetic() {
                    return format!("{}{}{}", prefix, next.to_uppercase(), chars.as_str());
                }
            }
        }
    }
    segment.to_string()
}
