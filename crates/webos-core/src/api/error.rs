//! Remote call failures and their user-facing wording.

use serde_json::Value;
use thiserror::Error;

use crate::util::compact_text;

pub type ApiResult<T> = Result<T, ApiError>;

/// How a remote call failed.
///
/// The three shapes stay distinguishable so callers can word alerts
/// differently for "server said no" and "server unreachable".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("request failed"))]
    Http {
        status: u16,
        /// `msg` or `detail` from the response body, when present
        message: Option<String>,
        body: String,
    },
    /// The request was sent but no response came back
    #[error("No response from server: {0}")]
    Network(String),
    /// The request never left the client, or the response was unreadable
    #[error("Client error: {0}")]
    Client(String),
}

impl ApiError {
    /// Build an HTTP error from a status and raw body, extracting the
    /// server's `msg` or `detail` field.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Http {
            status,
            message: parse_server_message(body),
            body: compact_text(body),
        }
    }

    /// Message suitable for an alert shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } => message
                .clone()
                .unwrap_or_else(|| "request failed".to_string()),
            Self::Network(_) => "network connection failed".to_string(),
            Self::Client(message) => {
                let message = message.trim();
                if message.is_empty() {
                    "unknown error".to_string()
                } else {
                    message.to_string()
                }
            }
        }
    }

    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return Self::Http {
                status: status.as_u16(),
                message: None,
                body: String::new(),
            };
        }
        if error.is_builder() {
            return Self::Client(format!("invalid request: {error}"));
        }
        if error.is_decode() {
            return Self::Client(format!("invalid response body: {error}"));
        }
        Self::Network(error.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(error: url::ParseError) -> Self {
        Self::Client(format!("invalid url: {error}"))
    }
}

fn parse_server_message(body: &str) -> Option<String> {
    let payload = serde_json::from_str::<Value>(body).ok()?;
    ["msg", "detail"].iter().find_map(|field| {
        payload
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(ToString::to_string)
    })
}
