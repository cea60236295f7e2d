//! Tolerant interpretation of response bodies.
//!
//! The service and the proxies in front of it are not consistent about how
//! they report outcomes: some answer `{"message": ...}`, some `{"msg": ...}`
//! (the backend's result envelope), some `{"error": ...}` (framework error
//! pages), some plain text, and some nothing at all. [`ParsedBody`] captures
//! those shapes once and [`ParsedBody::resolve`] turns any of them into the
//! single line shown to the user.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

/// A response body classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedBody {
    /// A JSON object. Only string-valued message fields are kept.
    Json {
        /// `message` field.
        message: Option<String>,
        /// `msg` field.
        msg: Option<String>,
        /// `error` field.
        error: Option<String>,
    },
    /// Anything else that is not blank, trimmed.
    Text(String),
    /// No body, or only whitespace.
    Empty,
}

impl ParsedBody {
    /// Classify raw body bytes.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim();
        if text.is_empty() {
            return Self::Empty;
        }

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => {
                let field = |name: &str| {
                    map.get(name)
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                };
                Self::Json {
                    message: field("message"),
                    msg: field("msg"),
                    error: field("error"),
                }
            }
            Ok(Value::String(s)) if !s.trim().is_empty() => Self::Text(s.trim().to_owned()),
            _ => Self::Text(text.to_owned()),
        }
    }

    /// The message carried by the body, if any.
    ///
    /// JSON fields are tried in the order `message`, `msg`, `error`. A JSON
    /// object without any of them carries no message.
    #[must_use]
    pub fn message(self) -> Option<String> {
        match self {
            Self::Json {
                message,
                msg,
                error,
            } => message.or(msg).or(error),
            Self::Text(text) => Some(text),
            Self::Empty => None,
        }
    }

    /// The message to display, falling back to `default`.
    #[must_use]
    pub fn resolve(self, default: &str) -> String {
        self.message().unwrap_or_else(|| default.to_owned())
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug)]
pub(crate) struct Reply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Reply {
    /// Read the whole response.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, ClientError> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(Self { status, body })
    }

    /// Pass success through; turn anything else into `Rejected`.
    pub(crate) fn success_or_rejected(self, default_error: &str) -> Result<Self, ClientError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(self.rejected(default_error))
        }
    }

    /// Build the `Rejected` error for this reply.
    pub(crate) fn rejected(&self, default_error: &str) -> ClientError {
        let message = ParsedBody::parse(&self.body).resolve(default_error);
        tracing::warn!(status = self.status.as_u16(), %message, "Request rejected");
        ClientError::Rejected {
            status: self.status.as_u16(),
            message,
        }
    }

    /// Message carried by a success body, or `default`.
    pub(crate) fn message_or(&self, default: &str) -> String {
        ParsedBody::parse(&self.body).resolve(default)
    }

    /// Decode a JSON success body strictly.
    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}
