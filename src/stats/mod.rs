//! Retrieval and interpretation of container stats snapshots.
//!
//! - [`fetch_stats`] pulls one [`RawStatsSample`] from the runtime daemon.
//! - [`estimate_cpu_percent`] turns the sample's double CPU reading into a
//!   utilization percentage.
//! - [`RawStatsSample`] exposes the memory and network counters directly.

mod cpu;
mod error;
mod fetch;
mod sample;

pub use cpu::estimate_cpu_percent;
pub use error::{FetchError, MalformedSample};
pub use fetch::fetch_stats;
pub use sample::{CpuCounters, CpuUsage, MemoryCounters, NetworkCounters, RawStatsSample};
