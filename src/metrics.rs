use std::collections::BTreeMap;

use crate::container::ContainerID;
use crate::error::{Error, ErrorKind};
use crate::stats::{self, MalformedSample, NetworkCounters, RawStatsSample};

/// Resource usage of one container, derived from a single stats sample.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ContainerUsage {
    pub container_id: ContainerID,
    pub cpu_usage_percent: f64,
    pub memory_usage_bytes: u64,
    pub memory_limit_bytes: u64,
    pub network_io: BTreeMap<String, NetworkCounters>,
}

impl ContainerUsage {
    /// Derives the usage metrics of `container_id` from `sample`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedSample`] if a CPU or memory field is missing.
    pub fn from_sample(
        container_id: ContainerID,
        sample: &RawStatsSample,
    ) -> Result<Self, MalformedSample> {
        Ok(Self {
            cpu_usage_percent: stats::estimate_cpu_percent(sample)?,
            memory_usage_bytes: sample.memory_usage()?,
            memory_limit_bytes: sample.memory_limit()?,
            network_io: sample.network_io(),
            container_id,
        })
    }
}

/// Why no usage could be reported for a container (or for the whole pass).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CollectionFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<ContainerID>,
    pub kind: ErrorKind,
    pub error: String,
}

impl From<&Error> for CollectionFailure {
    fn from(err: &Error) -> Self {
        Self {
            container_id: err.container_id().cloned(),
            kind: err.kind(),
            error: err.to_string(),
        }
    }
}

/// One entry of a [`MetricsReport`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ContainerMetric {
    Ok(ContainerUsage),
    Failed(CollectionFailure),
}

impl ContainerMetric {
    pub fn container_id(&self) -> Option<&ContainerID> {
        match self {
            ContainerMetric::Ok(usage) => Some(&usage.container_id),
            ContainerMetric::Failed(failure) => failure.container_id.as_ref(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ContainerMetric::Ok(_))
    }
}

impl From<Error> for ContainerMetric {
    fn from(err: Error) -> Self {
        ContainerMetric::Failed(CollectionFailure::from(&err))
    }
}

/// Result of one collection pass, ordered like the daemon's container list.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct MetricsReport(Vec<ContainerMetric>);

impl MetricsReport {
    pub fn entries(&self) -> &[ContainerMetric] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ContainerMetric>> for MetricsReport {
    fn from(entries: Vec<ContainerMetric>) -> Self {
        Self(entries)
    }
}
