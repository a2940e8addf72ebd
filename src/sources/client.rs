//! HTTP client creation and request handling shared by all collaborators.

use reqwest::header;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{Result, XrefError};
use crate::{user_agent, TARGET_WEB_REQUEST};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create a client with gzip support and the biogap User-Agent.
pub fn create_http_client() -> Result<reqwest::Client> {
    debug!(target: TARGET_WEB_REQUEST, "Creating HTTP client");

    reqwest::Client::builder()
        .gzip(true)
        .user_agent(user_agent())
        .redirect(reqwest::redirect::Policy::default())
        .build()
        .map_err(|e| XrefError::transport("building HTTP client", e))
}

/// GET a URL and return the body as text.
///
/// Connection failures, timeouts and non-success statuses are all transport
/// failures; `context` names what was being fetched.
pub async fn get_text(client: &reqwest::Client, url: &str, context: &str) -> Result<String> {
    debug!(target: TARGET_WEB_REQUEST, "GET {}", redact(url));

    let response = match timeout(
        REQUEST_TIMEOUT,
        client
            .get(url)
            .header(header::ACCEPT, "application/json, text/html;q=0.9, */*;q=0.8")
            .send(),
    )
    .await
    {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => return Err(XrefError::transport(context, format!("Request failed: {}", err))),
        Err(_) => {
            return Err(XrefError::transport(
                context,
                format!("Request timed out after {} seconds", REQUEST_TIMEOUT.as_secs()),
            ))
        }
    };

    let status = response.status();
    if !status.is_success() {
        return Err(XrefError::transport(context, format!("Response status: {}", status)));
    }

    match timeout(REQUEST_TIMEOUT, response.text()).await {
        Ok(Ok(body)) => {
            debug!(target: TARGET_WEB_REQUEST, "Fetched {} bytes for {}", body.len(), context);
            Ok(body)
        }
        Ok(Err(err)) => Err(XrefError::transport(context, format!("Reading body failed: {}", err))),
        Err(_) => Err(XrefError::transport(context, "Reading body timed out")),
    }
}

/// Hide `api-key` query values before a URL is logged.
pub fn redact(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            let pairs: Vec<(String, String)> = parsed
                .query_pairs()
                .map(|(key, value)| {
                    let value = if key == "api-key" { "***".to_string() } else { value.into_owned() };
                    (key.into_owned(), value)
                })
                .collect();
            if pairs.is_empty() {
                return parsed.to_string();
            }
            parsed.query_pairs_mut().clear().extend_pairs(pairs);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}
