//! Derivation of a CPU utilization percentage from a [`RawStatsSample`].
//!
//! The daemon reports CPU time as cumulative nanosecond counters, once for the
//! container and once for the whole host. A rate needs two readings, and each
//! sample carries both (`cpu_stats` and `precpu_stats`):
//!
//! ```text
//! cpu_delta    = cpu_stats.cpu_usage.total_usage - precpu_stats.cpu_usage.total_usage
//! system_delta = cpu_stats.system_cpu_usage      - precpu_stats.system_cpu_usage
//! percent      = cpu_delta / system_delta * core_count * 100.0
//! ```
//!
//! `core_count` is the length of `cpu_stats.cpu_usage.percpu_usage`, or `1` when
//! the daemon does not report a per-core breakdown. The result matches the
//! percentage shown by `docker stats`, so a container saturating two cores of a
//! multi-core host reads `200.0`.
//!
//! # Example
//!
//! ```rust
//! use docker_stats_exporter::stats::{RawStatsSample, estimate_cpu_percent};
//!
//! let sample: RawStatsSample = serde_json::from_str(r#"{
//!     "cpu_stats": {
//!         "cpu_usage": {"total_usage": 200, "percpu_usage": [1, 1, 1, 1]},
//!         "system_cpu_usage": 1100
//!     },
//!     "precpu_stats": {"cpu_usage": {"total_usage": 100}, "system_cpu_usage": 1000}
//! }"#).unwrap();
//!
//! assert_eq!(estimate_cpu_percent(&sample).unwrap(), 400.0);
//! ```

use super::error::MalformedSample;
use super::sample::{CpuCounters, RawStatsSample};

/// Totals read from one of the two CPU counter records of a sample.
struct CpuReading<'a> {
    total_usage: u64,
    system_usage: u64,
    percpu_usage: &'a [u64],
}

impl<'a> CpuReading<'a> {
    fn from_counters(
        counters: Option<&'a CpuCounters>,
        fields: &CounterFields,
    ) -> Result<Self, MalformedSample> {
        let counters = counters.ok_or(MalformedSample::new(fields.record))?;
        let cpu_usage = counters
            .cpu_usage
            .as_ref()
            .ok_or(MalformedSample::new(fields.cpu_usage))?;

        Ok(Self {
            total_usage: cpu_usage
                .total_usage
                .ok_or(MalformedSample::new(fields.total_usage))?,
            system_usage: counters
                .system_cpu_usage
                .ok_or(MalformedSample::new(fields.system_cpu_usage))?,
            percpu_usage: cpu_usage.percpu_usage.as_deref().unwrap_or_default(),
        })
    }
}

/// JSON paths of the fields read from one counter record, used in error reports.
struct CounterFields {
    record: &'static str,
    cpu_usage: &'static str,
    total_usage: &'static str,
    system_cpu_usage: &'static str,
}

const CURRENT: CounterFields = CounterFields {
    record: "cpu_stats",
    cpu_usage: "cpu_stats.cpu_usage",
    total_usage: "cpu_stats.cpu_usage.total_usage",
    system_cpu_usage: "cpu_stats.system_cpu_usage",
};

const PREVIOUS: CounterFields = CounterFields {
    record: "precpu_stats",
    cpu_usage: "precpu_stats.cpu_usage",
    total_usage: "precpu_stats.cpu_usage.total_usage",
    system_cpu_usage: "precpu_stats.system_cpu_usage",
};

/// Estimates the CPU utilization of a container in percent.
///
/// Returns `0.0` if either the container or the host counters did not advance
/// between the two readings (e.g. the container just started). Counters that
/// went backwards are treated the same way. The result is never negative.
///
/// # Errors
///
/// Returns [`MalformedSample`] naming the first missing CPU field. Memory and
/// network fields are not inspected.
pub fn estimate_cpu_percent(sample: &RawStatsSample) -> Result<f64, MalformedSample> {
    let current = CpuReading::from_counters(sample.current.as_ref(), &CURRENT)?;
    let previous = CpuReading::from_counters(sample.previous.as_ref(), &PREVIOUS)?;

    let cpu_delta = current.total_usage.saturating_sub(previous.total_usage);
    let system_delta = current.system_usage.saturating_sub(previous.system_usage);
    let core_count = match current.percpu_usage.len() {
        0 => 1,
        n => n,
    };

    if cpu_delta == 0 || system_delta == 0 {
        return Ok(0.0);
    }

    Ok((cpu_delta as f64 / system_delta as f64) * core_count as f64 * 100.0)
}
