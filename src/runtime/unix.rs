use std::path::PathBuf;
use std::time::Duration;

use http_body_util::{BodyExt, Empty, LengthLimitError, Limited};
use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;

use super::{Error, Result, RuntimeClient};

/// Upper bound for a buffered response body.
pub const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// A [`RuntimeClient`] talking HTTP/1.1 to the daemon's Unix domain socket.
///
/// No connection is pooled: each request connects, performs the handshake,
/// reads the full response and drops the stream again.
#[derive(Debug, Clone)]
pub struct UnixSocketClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl UnixSocketClient {
    /// Creates a client for the socket at `socket_path`.
    ///
    /// `timeout` bounds connect, request and response read of every single call.
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    async fn send(&self, method: Method, target: String) -> Result<serde_json::Value> {
        let stream = tokio::net::UnixStream::connect(&self.socket_path)
            .await
            .map_err(|source| Error::Connect {
                path: self.socket_path.clone(),
                source,
            })?;

        let (mut sender, connection) =
            hyper::client::conn::http1::handshake(TokioIo::new(stream))
                .await
                .map_err(Error::Transport)?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                log::debug!("runtime connection closed with error: {}", err);
            }
        });

        let request = Request::builder()
            .method(method)
            .uri(target)
            .header(hyper::header::HOST, "localhost")
            .body(Empty::<Bytes>::new())
            .map_err(Error::Request)?;

        let response = sender
            .send_request(request)
            .await
            .map_err(Error::Transport)?;
        let status = response.status();
        let body = Limited::new(response.into_body(), MAX_RESPONSE_BYTES)
            .collect()
            .await
            .map_err(|err| match err.downcast::<hyper::Error>() {
                Ok(err) => Error::Transport(*err),
                Err(err) if err.is::<LengthLimitError>() => Error::BodyTooLarge {
                    limit: MAX_RESPONSE_BYTES,
                },
                Err(err) => Error::Body(err),
            })?
            .to_bytes();

        if status != StatusCode::OK {
            return Err(Error::http_status(status.as_u16(), &body));
        }

        serde_json::from_slice(&body).map_err(Error::Decode)
    }
}

impl RuntimeClient for UnixSocketClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value> {
        let target = super::request_target(path, query);
        log::trace!("{} {} via {}", method, target, self.socket_path.display());

        tokio::time::timeout(self.timeout, self.send(method, target))
            .await
            .map_err(|_| Error::Timeout(self.timeout))?
    }
}
