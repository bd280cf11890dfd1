use crate::container::ContainerID;
use crate::{discovery, stats};

pub trait ResultOkLogExt<T, E> {
    fn ok_log(self) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::error!("{err}");
                None
            }
        }
    }
}

/// Coarse classification of a collection failure, as exposed to metric consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConnectionFailure,
    Timeout,
    HttpStatusFailure,
    DecodeFailure,
    MalformedSample,
    Internal,
}

/// A failure during one collection pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Listing(#[from] discovery::Error),
    #[error(transparent)]
    Fetch(#[from] stats::FetchError),
    #[error("invalid stats for container `{container_id}`: {source}")]
    Malformed {
        container_id: ContainerID,
        #[source]
        source: stats::MalformedSample,
    },
    #[error("stats collection for container `{container_id}` did not complete: {source}")]
    Task {
        container_id: ContainerID,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Listing(err) => err.kind(),
            Error::Fetch(err) => err.source.kind(),
            Error::Malformed { .. } => ErrorKind::MalformedSample,
            Error::Task { .. } => ErrorKind::Internal,
        }
    }

    /// The container the failure belongs to, `None` for listing failures.
    pub fn container_id(&self) -> Option<&ContainerID> {
        match self {
            Error::Listing(_) => None,
            Error::Fetch(err) => Some(&err.container_id),
            Error::Malformed { container_id, .. } | Error::Task { container_id, .. } => {
                Some(container_id)
            }
        }
    }
}
