use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::routing::get;
use tokio::net::ToSocketAddrs;

use crate::collector::Collector;
use crate::metrics::MetricsReport;
use crate::runtime::RuntimeClient;

/// Runs one collection pass per scrape.
///
/// Always answers `200 OK`; failures are part of the reported entries.
async fn metrics<C: RuntimeClient>(
    State(collector): State<Arc<Collector<C>>>,
) -> Json<MetricsReport> {
    Json(collector.collect().await)
}

pub struct APIServer {
    router: axum::Router,
}

impl APIServer {
    pub fn new<C: RuntimeClient>(collector: Arc<Collector<C>>) -> Self {
        let router = axum::Router::new()
            .route("/metrics", get(metrics::<C>))
            .with_state(collector);
        Self { router }
    }

    pub fn router(&self) -> axum::Router {
        self.router.clone()
    }

    /// Serves the API on `addr` until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if binding the listener or accepting connections fails.
    pub async fn listen(
        self,
        addr: impl ToSocketAddrs,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("Serving metrics on {}", listener.local_addr()?);
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::runtime::fake::{FakeClient, FakeResponse};

    async fn scrape(client: FakeClient) -> (StatusCode, serde_json::Value) {
        let api = APIServer::new(Arc::new(Collector::new(client, 2)));
        let response = api
            .router()
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_metrics_endpoint_reports_every_container() {
        let client = FakeClient::default()
            .with_json("/containers/json", json!([{"Id": "c1"}, {"Id": "c2"}]))
            .with_json(
                "/containers/c1/stats?stream=false",
                json!({
                    "cpu_stats": {"cpu_usage": {"total_usage": 200}, "system_cpu_usage": 1100},
                    "precpu_stats": {"cpu_usage": {"total_usage": 100}, "system_cpu_usage": 1000},
                    "memory_stats": {"usage": 10, "limit": 20},
                    "networks": {"eth0": {"rx_bytes": 5}}
                }),
            )
            .with_response(
                "/containers/c2/stats?stream=false",
                FakeResponse::Status(404, r#"{"message":"No such container: c2"}"#),
            );

        let (status, body) = scrape(client).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["container_id"], "c1");
        assert_eq!(entries[0]["cpu_usage_percent"], 100.0);
        assert_eq!(entries[0]["memory_usage_bytes"], 10);
        assert_eq!(entries[0]["network_io"]["eth0"]["rx_bytes"], 5);
        assert_eq!(entries[1]["container_id"], "c2");
        assert_eq!(entries[1]["kind"], "http_status_failure");
        assert!(
            entries[1]["error"]
                .as_str()
                .unwrap()
                .contains("No such container: c2")
        );
    }

    #[tokio::test]
    async fn test_metrics_endpoint_listing_failure_is_still_ok() {
        let client =
            FakeClient::default().with_response("/containers/json", FakeResponse::Refused);

        let (status, body) = scrape(client).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["kind"], "connection_failure");
        assert!(entries[0].get("container_id").is_none());
    }

    #[tokio::test]
    async fn test_metrics_endpoint_without_containers() {
        let client = FakeClient::default().with_json("/containers/json", json!([]));
        let (status, body) = scrape(client).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
