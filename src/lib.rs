pub mod dates;
pub mod environment;
pub mod error;
pub mod logging;
pub mod name;
pub mod sources;
pub mod subject;
pub mod xref;

pub use error::{Result, XrefError};

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_NAME: &str = "name";
pub const TARGET_MATCH: &str = "match";
pub const TARGET_WIKIPEDIA: &str = "wikipedia";

/// User-Agent sent to every archive and Wikipedia request.
pub fn user_agent() -> String {
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            format!("biogap v{} ({})", env!("CARGO_PKG_VERSION"), hash)
        }
        _ => format!("biogap v{}", env!("CARGO_PKG_VERSION")),
    }
}
