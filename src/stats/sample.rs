use std::collections::BTreeMap;

use super::error::MalformedSample;

/// A single stats snapshot of one container, as returned by
/// `GET /containers/{id}/stats?stream=false`.
///
/// The daemon samples the CPU counters twice while serving the request and
/// embeds both readings, so one response carries the `current` and the
/// `previous` cumulative counters of a consistent snapshot.
///
/// Every numeric field is optional here. Whether a missing field is an error is
/// decided by the consumer ([`super::estimate_cpu_percent`],
/// [`RawStatsSample::memory_usage`], ...), not by the decoder.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct RawStatsSample {
    /// Counters at the time of the request (`cpu_stats`).
    #[serde(rename = "cpu_stats", default)]
    pub current: Option<CpuCounters>,
    /// Counters of the daemon's preceding reading (`precpu_stats`).
    #[serde(rename = "precpu_stats", default)]
    pub previous: Option<CpuCounters>,
    #[serde(default)]
    pub memory_stats: Option<MemoryCounters>,
    /// Per-interface network counters. Absent for containers without a network.
    #[serde(default)]
    pub networks: Option<BTreeMap<String, NetworkCounters>>,
}

/// Cumulative CPU counters in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct CpuCounters {
    #[serde(default)]
    pub cpu_usage: Option<CpuUsage>,
    /// CPU time consumed by the whole host.
    #[serde(default)]
    pub system_cpu_usage: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct CpuUsage {
    /// CPU time consumed by the container.
    #[serde(default)]
    pub total_usage: Option<u64>,
    /// CPU time consumed by the container per logical core (cgroup v1 only).
    #[serde(default)]
    pub percpu_usage: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct MemoryCounters {
    #[serde(default)]
    pub usage: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

/// Counters of a single network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct NetworkCounters {
    #[serde(default)]
    pub rx_bytes: u64,
    #[serde(default)]
    pub rx_packets: u64,
    #[serde(default)]
    pub rx_errors: u64,
    #[serde(default)]
    pub rx_dropped: u64,
    #[serde(default)]
    pub tx_bytes: u64,
    #[serde(default)]
    pub tx_packets: u64,
    #[serde(default)]
    pub tx_errors: u64,
    #[serde(default)]
    pub tx_dropped: u64,
}

impl RawStatsSample {
    /// Returns `memory_stats.usage` in bytes.
    pub fn memory_usage(&self) -> Result<u64, MalformedSample> {
        self.memory_stats
            .as_ref()
            .ok_or(MalformedSample::new("memory_stats"))?
            .usage
            .ok_or(MalformedSample::new("memory_stats.usage"))
    }

    /// Returns `memory_stats.limit` in bytes.
    pub fn memory_limit(&self) -> Result<u64, MalformedSample> {
        self.memory_stats
            .as_ref()
            .ok_or(MalformedSample::new("memory_stats"))?
            .limit
            .ok_or(MalformedSample::new("memory_stats.limit"))
    }

    /// Returns the per-interface network counters, empty if the container has no network.
    pub fn network_io(&self) -> BTreeMap<String, NetworkCounters> {
        self.networks.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_complete_sample() {
        let sample: RawStatsSample = serde_json::from_value(json!({
            "read": "2024-05-01T10:00:01.000000000Z",
            "preread": "2024-05-01T10:00:00.000000000Z",
            "cpu_stats": {
                "cpu_usage": {"total_usage": 200, "percpu_usage": [50, 50, 50, 50]},
                "system_cpu_usage": 1100,
                "online_cpus": 4
            },
            "precpu_stats": {
                "cpu_usage": {"total_usage": 100},
                "system_cpu_usage": 1000
            },
            "memory_stats": {"usage": 4096, "limit": 8192, "stats": {"cache": 1}},
            "networks": {"eth0": {"rx_bytes": 10, "tx_bytes": 20, "rx_packets": 1}}
        }))
        .unwrap();

        let current = sample.current.as_ref().unwrap();
        assert_eq!(current.system_cpu_usage, Some(1100));
        assert_eq!(
            current.cpu_usage.as_ref().unwrap().percpu_usage,
            Some(vec![50, 50, 50, 50])
        );
        assert_eq!(sample.memory_usage().unwrap(), 4096);
        assert_eq!(sample.memory_limit().unwrap(), 8192);

        let networks = sample.network_io();
        assert_eq!(networks.len(), 1);
        assert_eq!(networks["eth0"].rx_bytes, 10);
        assert_eq!(networks["eth0"].tx_bytes, 20);
        assert_eq!(networks["eth0"].tx_packets, 0);
    }

    #[test]
    fn test_missing_memory_fields() {
        let sample: RawStatsSample =
            serde_json::from_value(json!({"memory_stats": {"limit": 8192}})).unwrap();
        assert_eq!(
            sample.memory_usage().unwrap_err().field(),
            "memory_stats.usage"
        );
        assert_eq!(sample.memory_limit().unwrap(), 8192);

        let sample = RawStatsSample::default();
        assert_eq!(sample.memory_limit().unwrap_err().field(), "memory_stats");
    }

    #[test]
    fn test_missing_networks_is_empty() {
        let sample: RawStatsSample = serde_json::from_value(json!({})).unwrap();
        assert!(sample.network_io().is_empty());
    }

    #[test]
    fn test_decode_rejects_wrong_types() {
        let result = serde_json::from_value::<RawStatsSample>(json!({
            "memory_stats": {"usage": "a lot"}
        }));
        assert!(result.is_err());
    }
}
