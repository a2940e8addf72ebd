//! Error types for biogap.
//!
//! Only transport and data-integrity failures surface as errors. Unresolvable
//! names and unparseable dates are absorbed where they occur (sentinel subject,
//! `None` date) so that every obituary still yields an answer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XrefError {
    /// A collaborator returned a non-success response or could not be reached.
    #[error("Transport failure ({context}): {message}")]
    Transport { context: String, message: String },

    /// A `#REDIRECT` marker whose target cannot be parsed.
    #[error("Redirection target could not be resolved for page '{page}'")]
    CorruptReference { page: String },

    /// A collaborator answered, but not in the documented shape.
    #[error("Unexpected response from {service}: {message}")]
    InvalidResponse { service: String, message: String },

    /// A required setting is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl XrefError {
    pub fn transport(context: impl Into<String>, message: impl ToString) -> Self {
        XrefError::Transport {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid_response(service: impl Into<String>, message: impl ToString) -> Self {
        XrefError::InvalidResponse {
            service: service.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, XrefError>;
