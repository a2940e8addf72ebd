//! Collaborators that fetch obituaries and Wikipedia pages.

pub mod client;
pub mod guardian;
pub mod independent;
pub mod nytimes;
pub mod wikipedia;

use chrono::NaiveDate;

pub use client::{create_http_client, get_text, REQUEST_TIMEOUT};
pub use guardian::GuardianApi;
pub use independent::IndependentArchive;
pub use nytimes::NYTimesApi;
pub use wikipedia::WikipediaApi;

/// Date part of an ISO 8601 timestamp (`1999-03-02T05:00:00+0000`).
pub fn parse_publication_date(timestamp: &str) -> Option<NaiveDate> {
    let date = timestamp.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
