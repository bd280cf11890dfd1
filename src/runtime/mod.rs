//! Read-only access to the container runtime daemon's HTTP API.
//!
//! The daemon is reached over its local control socket. Every request opens a
//! fresh connection, is bounded by a timeout, and yields either the decoded JSON
//! body of a `200 OK` response or a typed [`Error`].
//!
//! The [`RuntimeClient`] trait is the seam used by the lister, the stats
//! fetcher and the collector, so that all of them can be exercised without a
//! real daemon.

mod error;
#[cfg(test)]
pub(crate) mod fake;
mod unix;

pub use error::{Error, Result};
pub use unix::{MAX_RESPONSE_BYTES, UnixSocketClient};

pub use hyper::Method;

/// Issues read-only API requests against a container runtime daemon.
pub trait RuntimeClient: Send + Sync + 'static {
    /// Sends `method path?query` to the daemon and decodes the JSON response body.
    ///
    /// # Errors
    ///
    /// - [`Error::Connect`], [`Error::Transport`], [`Error::Request`] or
    ///   [`Error::Body`] if the request could not be delivered or its response
    ///   could not be read.
    /// - [`Error::Timeout`] if the daemon did not answer in time.
    /// - [`Error::HttpStatus`] if the daemon answered with anything but `200 OK`.
    /// - [`Error::BodyTooLarge`] if the response body exceeds the client's limit.
    /// - [`Error::Decode`] if the response body is not valid JSON.
    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> impl Future<Output = Result<serde_json::Value>> + Send;
}

/// Builds the request target `path?k1=v1&k2=v2` sent to the daemon.
pub(crate) fn request_target(path: &str, query: &[(&str, &str)]) -> String {
    let mut target = String::from(path);
    for (i, (key, value)) in query.iter().enumerate() {
        target.push(if i == 0 { '?' } else { '&' });
        target.push_str(key);
        target.push('=');
        target.push_str(value);
    }
    target
}
