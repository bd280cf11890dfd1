use crate::container::ContainerID;
use crate::runtime::{self, Method, RuntimeClient};

use super::error::FetchError;
use super::sample::RawStatsSample;

/// Retrieves a single, non-streaming stats snapshot for `container_id`.
///
/// With `stream=false` the daemon samples the container twice and answers with
/// one document holding both readings.
///
/// # Errors
///
/// Returns a [`FetchError`] carrying the container id if the request failed,
/// the daemon did not answer `200 OK`, or the body is not a stats document.
pub async fn fetch_stats<C: RuntimeClient>(
    client: &C,
    container_id: &ContainerID,
) -> Result<RawStatsSample, FetchError> {
    let path = format!("/containers/{container_id}/stats");
    let into_fetch_error = |source: runtime::Error| FetchError {
        container_id: container_id.clone(),
        source,
    };

    let response = client
        .request(Method::GET, &path, &[("stream", "false")])
        .await
        .map_err(into_fetch_error)?;

    serde_json::from_value(response)
        .map_err(runtime::Error::Decode)
        .map_err(into_fetch_error)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::fake::{FakeClient, FakeResponse};

    const STATS_TARGET: &str = "/containers/c1/stats?stream=false";

    fn c1() -> ContainerID {
        ContainerID::new("c1").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_stats_requests_single_snapshot() {
        let client = FakeClient::default().with_json(
            STATS_TARGET,
            json!({"memory_stats": {"usage": 1, "limit": 2}}),
        );

        let sample = fetch_stats(&client, &c1()).await.unwrap();
        assert_eq!(sample.memory_usage().unwrap(), 1);
        assert_eq!(client.calls(), [STATS_TARGET]);
    }

    #[tokio::test]
    async fn test_fetch_stats_http_status_failure() {
        let client = FakeClient::default().with_response(
            STATS_TARGET,
            FakeResponse::Status(404, r#"{"message":"No such container: c1"}"#),
        );

        let err = fetch_stats(&client, &c1()).await.unwrap_err();
        assert_eq!(err.container_id, c1());
        assert_eq!(err.source.kind(), ErrorKind::HttpStatusFailure);
        assert_eq!(
            err.to_string(),
            "failed to fetch stats for container `c1`: runtime responded with status 404: No such container: c1"
        );
    }

    #[tokio::test]
    async fn test_fetch_stats_failure_kinds() {
        let cases = [
            (FakeResponse::Refused, ErrorKind::ConnectionFailure),
            (FakeResponse::TimedOut, ErrorKind::Timeout),
            (FakeResponse::Garbage, ErrorKind::DecodeFailure),
            (
                FakeResponse::Json(json!({"cpu_stats": "busy"})),
                ErrorKind::DecodeFailure,
            ),
        ];

        for (response, kind) in cases {
            let client = FakeClient::default().with_response(STATS_TARGET, response);
            let err = fetch_stats(&client, &c1()).await.unwrap_err();
            assert_eq!(err.source.kind(), kind);
        }
    }
}
