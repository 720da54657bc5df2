//! Social publishing client for casetally.
//!
//! Only the Twitter/X pipeline is implemented: OAuth 1.0a user-context
//! request signing plus the single create-post call. Dry-run handling lives
//! with the caller — this crate is only ever invoked when a real post is
//! wanted.
pub mod twitter;

pub use twitter::TwitterApi;
pub use twitter::oauth::Credentials;

use casetally_http::HttpError;
use reqwest::StatusCode;
use thiserror::Error;

/// Failure to authenticate to or submit a post to the publishing API.
/// Never retried; the run ends here.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish authentication rejected ({status}): {message}")]
    Auth { status: StatusCode, message: String },
    #[error("post submission failed ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("publish request failed: {0}")]
    Network(String),
}

impl From<HttpError> for PublishError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Api { status, message }
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                PublishError::Auth { status, message }
            }
            HttpError::Api { status, message } => PublishError::Api { status, message },
            other => PublishError::Network(other.to_string()),
        }
    }
}
