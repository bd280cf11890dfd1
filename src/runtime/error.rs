use std::path::PathBuf;
use std::time::Duration;

use crate::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to socket `{path}`: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("runtime connection failed: {0}")]
    Transport(#[source] hyper::Error),
    #[error("failed to build runtime request: {0}")]
    Request(#[source] hyper::http::Error),
    #[error("runtime response body could not be read: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("runtime response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("runtime request timed out after {0:?}")]
    Timeout(Duration),
    #[error("runtime responded with status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("failed to decode runtime response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// Creates an [`Error::HttpStatus`] from a non-`200` response.
    ///
    /// The daemon reports errors as `{"message": "..."}`; that message is passed
    /// through when present, otherwise the raw body text is kept.
    pub(crate) fn http_status(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_owned());

        Self::HttpStatus { status, message }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connect { .. }
            | Error::Transport(_)
            | Error::Request(_)
            | Error::Body(_) => ErrorKind::ConnectionFailure,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::HttpStatus { .. } => ErrorKind::HttpStatusFailure,
            Error::Decode(_) | Error::BodyTooLarge { .. } => ErrorKind::DecodeFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
