use crate::container::{self, ContainerID};
use crate::runtime::{self, Method, RuntimeClient};

const CONTAINERS_PATH: &str = "/containers/json";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to list running containers: {0}")]
    Runtime(#[from] runtime::Error),
    #[error("unexpected container list response: {0}")]
    UnexpectedResponse(#[source] serde_json::Error),
    #[error("container list contains an invalid entry: {0}")]
    InvalidContainerID(#[from] container::Error),
}

/// One entry of the daemon's container list. Only the id is of interest.
#[derive(Debug, serde::Deserialize)]
struct ContainerSummary {
    #[serde(rename = "Id")]
    id: String,
}

/// Lists the ids of all currently running containers, in the order reported by the daemon.
///
/// The listing is all-or-nothing: a single unusable entry fails the whole call.
///
/// # Errors
///
/// - [`Error::Runtime`] if the request to the daemon failed.
/// - [`Error::UnexpectedResponse`] if the response is not an array of objects with an `Id`.
/// - [`Error::InvalidContainerID`] if any reported id is not a valid [`ContainerID`].
pub async fn list_running_containers<C: RuntimeClient>(
    client: &C,
) -> Result<Vec<ContainerID>, Error> {
    let response = client.request(Method::GET, CONTAINERS_PATH, &[]).await?;
    let containers: Vec<ContainerSummary> =
        serde_json::from_value(response).map_err(Error::UnexpectedResponse)?;
    log::debug!("Found {} running containers", containers.len());

    containers
        .into_iter()
        .map(|container| ContainerID::new(container.id).map_err(Error::from))
        .collect()
}

impl Error {
    pub fn kind(&self) -> crate::error::ErrorKind {
        match self {
            Error::Runtime(err) => err.kind(),
            Error::UnexpectedResponse(_) | Error::InvalidContainerID(_) => {
                crate::error::ErrorKind::DecodeFailure
            }
        }
    }
}
