use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{Error, Method, Result, RuntimeClient};

/// A canned answer of the [`FakeClient`] for one request target.
#[derive(Debug, Clone)]
pub(crate) enum FakeResponse {
    Json(serde_json::Value),
    Status(u16, &'static str),
    Garbage,
    Refused,
    TimedOut,
}

/// In-memory [`RuntimeClient`] replaying canned responses keyed by request target.
///
/// Unknown targets answer like the daemon does for a vanished container.
#[derive(Debug, Default)]
pub(crate) struct FakeClient {
    responses: HashMap<String, FakeResponse>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeClient {
    pub(crate) fn with_response(mut self, target: &str, response: FakeResponse) -> Self {
        self.responses.insert(target.to_owned(), response);
        self
    }

    pub(crate) fn with_json(self, target: &str, body: serde_json::Value) -> Self {
        self.with_response(target, FakeResponse::Json(body))
    }

    pub(crate) fn with_delay(mut self, target: &str, delay: Duration) -> Self {
        self.delays.insert(target.to_owned(), delay);
        self
    }

    /// Returns all request targets seen so far, in call order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl RuntimeClient for FakeClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value> {
        assert_eq!(method, Method::GET, "only read-only requests are expected");
        let target = super::request_target(path, query);
        self.calls.lock().unwrap().push(target.clone());

        if let Some(delay) = self.delays.get(&target) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(&target).cloned() {
            Some(FakeResponse::Json(value)) => Ok(value),
            Some(FakeResponse::Status(status, body)) => {
                Err(Error::http_status(status, body.as_bytes()))
            }
            Some(FakeResponse::Garbage) => Err(Error::Decode(
                serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
            )),
            Some(FakeResponse::Refused) => Err(Error::Connect {
                path: "/var/run/docker.sock".into(),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            }),
            Some(FakeResponse::TimedOut) => Err(Error::Timeout(Duration::from_secs(10))),
            None => Err(Error::http_status(
                404,
                format!(r#"{{"message":"No such container: {path}"}}"#).as_bytes(),
            )),
        }
    }
}
