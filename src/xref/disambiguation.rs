use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use super::types::{ObituaryContext, ObituarySource, PageExistence, WikipediaLookup};
use crate::dates::DateStyle;
use crate::error::{Result, XrefError};
use crate::TARGET_WIKIPEDIA;

/// Hyphen, en dash, em dash, figure dash, minus sign and their HTML entities.
const YEAR_DASH: &str = "(?:-|–|—|‒|−|&ndash;|&mdash;|&minus;)";

lazy_static! {
    static ref REDIRECT_MARKER: Regex = Regex::new(r"(?i)#REDIRECT").unwrap();
    static ref REDIRECT_TARGET: Regex = Regex::new(r"(?i)#REDIRECT\s*\[\[([^\]]+?)\]\]").unwrap();
}

/// `[[Title]] (birth–death)` entry on a disambiguation page.
pub fn find_entry_by_years(wikitext: &str, birth_year: i32, death_year: i32) -> Option<String> {
    let pattern = format!(
        r"\[\[(?P<title>[^\]]+)\]\]\s*\({}{}{}\)",
        birth_year, YEAR_DASH, death_year
    );
    find_entry(wikitext, &pattern)
}

/// `[[Title]] (dddd–death)` entry, for when the birth year is unknown.
pub fn find_entry_by_death_year(wikitext: &str, death_year: i32) -> Option<String> {
    let pattern = format!(
        r"\[\[(?P<title>[^\]]+)\]\]\s*\(\d{{4}}{}{}\)",
        YEAR_DASH, death_year
    );
    find_entry(wikitext, &pattern)
}

fn find_entry(wikitext: &str, pattern: &str) -> Option<String> {
    let regex = Regex::new(pattern).ok()?;
    let captures = regex.captures(wikitext)?;
    Some(link_title(&captures["title"]).to_string())
}

/// Page title of a wiki link: `Tommy DeVito|DeVito` becomes `Tommy DeVito`.
pub fn link_title(link: &str) -> &str {
    link.split('|').next().unwrap_or(link).trim()
}

pub fn is_redirect(wikitext: &str) -> bool {
    REDIRECT_MARKER.is_match(wikitext)
}

/// Target of a `#REDIRECT [[Target]]` page. A marker without a target is corrupt data.
pub fn redirect_target(wikitext: &str, page_title: &str) -> Result<String> {
    REDIRECT_TARGET
        .captures(wikitext)
        .map(|captures| link_title(&captures[1]).to_string())
        .filter(|target| !target.is_empty())
        .ok_or_else(|| XrefError::CorruptReference {
            page: page_title.to_string(),
        })
}

/// States of the existence check for one matched subject.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolverState {
    Start,
    CheckNameVersion { index: usize },
    Disambiguation { page_title: String },
    FetchBodyText { page_title: String, content: String },
    ResolveDates { page_title: String, content: String, body: String },
    MatchByYearPair { page_title: String, content: String, birth: i32, death: i32 },
    MatchByYearOnly { page_title: String, content: String },
    Done(PageExistence),
}

/// Decides whether a subject already has a Wikipedia biography.
///
/// Name versions are checked most complete first. A plain article ends the
/// search; a disambiguation page is searched for an entry carrying the
/// subject's life years, taken from the obituary's own body text.
pub struct DisambiguationResolver<'a, S, W> {
    source: &'a S,
    wikipedia: &'a W,
}

impl<'a, S, W> DisambiguationResolver<'a, S, W>
where
    S: ObituarySource,
    W: WikipediaLookup,
{
    /// `source` is the outlet that published the obituary being checked.
    pub fn new(source: &'a S, wikipedia: &'a W) -> Self {
        Self { source, wikipedia }
    }

    pub async fn resolve(
        &self,
        ctx: &ObituaryContext<'_>,
        name_versions: &[String],
    ) -> Result<PageExistence> {
        let mut state = ResolverState::Start;

        loop {
            state = match state {
                ResolverState::Start => ResolverState::CheckNameVersion { index: 0 },

                ResolverState::CheckNameVersion { index } => match name_versions.get(index) {
                    None => ResolverState::Done(PageExistence::NotFound),
                    Some(version) => {
                        info!(target: TARGET_WIKIPEDIA, "Checking existence of '{}' on Wikipedia", version);
                        match self.wikipedia.get_page_title(version).await? {
                            None => ResolverState::CheckNameVersion { index: index + 1 },
                            Some(page) if page.is_disambiguation => ResolverState::Disambiguation {
                                page_title: page.title,
                            },
                            Some(page) => {
                                ResolverState::Done(PageExistence::Found { title: page.title })
                            }
                        }
                    }
                },

                ResolverState::Disambiguation { page_title } => {
                    info!(target: TARGET_WIKIPEDIA, "'{}' is a disambiguation page", page_title);
                    let mut content = self.wikipedia.get_page_content(&page_title).await?;
                    if is_redirect(&content) {
                        let target = redirect_target(&content, &page_title)?;
                        debug!(target: TARGET_WIKIPEDIA, "'{}' redirects to '{}'", page_title, target);
                        content = self.wikipedia.get_page_content(&target).await?;
                    }
                    ResolverState::FetchBodyText { page_title, content }
                }

                ResolverState::FetchBodyText { page_title, content } => {
                    let obituary = ctx.obituary;
                    let body = self
                        .source
                        .get_obituary_text(&obituary.raw.body_locator, &obituary.subject.name)
                        .await?;
                    ResolverState::ResolveDates {
                        page_title,
                        content,
                        body,
                    }
                }

                ResolverState::ResolveDates {
                    page_title,
                    content,
                    body,
                } => {
                    let dates = DateStyle::for_source(ctx.obituary.source()).extract(&body);
                    match dates.years() {
                        Some((birth, death)) => ResolverState::MatchByYearPair {
                            page_title,
                            content,
                            birth,
                            death,
                        },
                        None => ResolverState::MatchByYearOnly {
                            page_title,
                            content,
                        },
                    }
                }

                ResolverState::MatchByYearPair {
                    page_title,
                    content,
                    birth,
                    death,
                } => ResolverState::Done(
                    match find_entry_by_years(&content, birth, death) {
                        Some(title) => PageExistence::Found { title },
                        None => PageExistence::PossibleCandidate { page_title },
                    },
                ),

                ResolverState::MatchByYearOnly {
                    page_title,
                    content,
                } => {
                    // A death in December is often reported in January
                    let entry = find_entry_by_death_year(&content, ctx.year).or_else(|| {
                        (ctx.month == 1)
                            .then(|| find_entry_by_death_year(&content, ctx.year - 1))
                            .flatten()
                    });
                    ResolverState::Done(match entry {
                        Some(title) => PageExistence::Found { title },
                        None => PageExistence::PossibleCandidate { page_title },
                    })
                }

                ResolverState::Done(existence) => {
                    match &existence {
                        PageExistence::Found { title } => {
                            info!(target: TARGET_WIKIPEDIA, "Page exists: {}", title)
                        }
                        PageExistence::PossibleCandidate { page_title } => {
                            info!(target: TARGET_WIKIPEDIA, "No matching entry on '{}'", page_title)
                        }
                        PageExistence::NotFound => {
                            debug!(target: TARGET_WIKIPEDIA, "No page for any of {} name versions", name_versions.len())
                        }
                    }
                    return Ok(existence);
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARMANI_PAGE: &str = "'''Giorgio Armani''' may refer to:\n\
        * [[Giorgio Armani]] (1934–2025), Italian fashion designer\n\
        * [[Giorgio Armani (company)]], the fashion house\n\
        * [[Giorgio Armani (footballer)|Giorgio Armani]] (1950&ndash;2001), Italian footballer\n";

    #[test]
    fn test_find_entry_by_years() {
        let wikitext = "* [[Target]] (1932–2001), actor";
        assert_eq!(find_entry_by_years(wikitext, 1932, 2001), Some("Target".to_string()));
        assert_eq!(find_entry_by_years(wikitext, 1932, 2002), None);
    }

    #[test]
    fn test_find_entry_accepts_dash_variants() {
        for dash in ["-", "–", "—", "‒", "−", "&ndash;", "&mdash;", "&minus;"] {
            let wikitext = format!("* [[Target]] (1932{}2001)", dash);
            assert_eq!(
                find_entry_by_years(&wikitext, 1932, 2001),
                Some("Target".to_string()),
                "dash {}",
                dash
            );
        }
        assert_eq!(find_entry_by_years("* [[Target]] (1932/2001)", 1932, 2001), None);
    }

    #[test]
    fn test_find_entry_strips_link_label() {
        assert_eq!(
            find_entry_by_years(ARMANI_PAGE, 1950, 2001),
            Some("Giorgio Armani (footballer)".to_string())
        );
        assert_eq!(
            find_entry_by_years(ARMANI_PAGE, 1934, 2025),
            Some("Giorgio Armani".to_string())
        );
    }

    #[test]
    fn test_find_entry_by_death_year() {
        assert_eq!(
            find_entry_by_death_year(ARMANI_PAGE, 2025),
            Some("Giorgio Armani".to_string())
        );
        assert_eq!(
            find_entry_by_death_year(ARMANI_PAGE, 2001),
            Some("Giorgio Armani (footballer)".to_string())
        );
        assert_eq!(find_entry_by_death_year(ARMANI_PAGE, 1999), None);
        // The death year must close the range
        assert_eq!(find_entry_by_death_year(ARMANI_PAGE, 1934), None);
    }

    #[test]
    fn test_redirect_target() {
        assert!(is_redirect("#REDIRECT [[Tommy DeVito]]"));
        assert!(is_redirect("#redirect [[Tommy DeVito]]"));
        assert!(!is_redirect(ARMANI_PAGE));

        assert_eq!(
            redirect_target("#REDIRECT [[Tommy DeVito]]", "Tommy Devito").unwrap(),
            "Tommy DeVito"
        );
        assert_eq!(
            redirect_target("#REDIRECT[[Tommy DeVito]]", "Tommy Devito").unwrap(),
            "Tommy DeVito"
        );
        assert_eq!(
            redirect_target("#REDIRECT [[John Smith (disambiguation)|John Smith]]", "John Smith").unwrap(),
            "John Smith (disambiguation)"
        );
    }

    #[test]
    fn test_redirect_without_target_is_corrupt() {
        let err = redirect_target("#REDIRECT somewhere", "Tommy Devito").unwrap_err();
        assert!(matches!(err, XrefError::CorruptReference { page } if page == "Tommy Devito"));

        assert!(redirect_target("#REDIRECT [[ ]]", "Blank").is_err());
    }
}
