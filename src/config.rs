use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ResultOkLogExt;

const DEFAULT_SOCKET_PATH: &str = "/var/run/docker.sock";
const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 9100);
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

#[derive(Debug, thiserror::Error)]
#[error("invalid value `{value}` for `{name}`: {reason}")]
pub struct InvalidValue {
    name: &'static str,
    value: String,
    reason: String,
}

/// Runtime configuration of the exporter.
///
/// | Variable                 | Default                |
/// |--------------------------|------------------------|
/// | `DOCKER_SOCKET_PATH`     | `/var/run/docker.sock` |
/// | `METRICS_LISTEN_ADDR`    | `0.0.0.0:9100`         |
/// | `RUNTIME_TIMEOUT_SECS`   | `10`                   |
/// | `MAX_CONCURRENT_FETCHES` | `8`                    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the container runtime's control socket.
    pub socket_path: PathBuf,
    /// Address the metrics endpoint listens on.
    pub listen_addr: SocketAddr,
    /// Upper bound for a single request to the runtime.
    pub request_timeout: Duration,
    /// Upper bound for concurrently running stats requests.
    pub max_concurrent_fetches: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            listen_addr: DEFAULT_LISTEN_ADDR,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name to its value.
    ///
    /// Unset variables keep their default. Values that fail to parse are logged
    /// and replaced by the default as well.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let socket_path = lookup("DOCKER_SOCKET_PATH")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.socket_path);
        let listen_addr =
            parse_var(&lookup, "METRICS_LISTEN_ADDR").unwrap_or(defaults.listen_addr);
        let request_timeout = parse_var::<u64>(&lookup, "RUNTIME_TIMEOUT_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let max_concurrent_fetches = parse_var::<usize>(&lookup, "MAX_CONCURRENT_FETCHES")
            .unwrap_or(defaults.max_concurrent_fetches)
            .max(1);

        Self {
            socket_path,
            listen_addr,
            request_timeout,
            max_concurrent_fetches,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = lookup(name)?;
    value
        .trim()
        .parse::<T>()
        .map_err(|err| InvalidValue {
            name,
            reason: err.to_string(),
            value,
        })
        .ok_log()
}
