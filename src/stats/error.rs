use crate::container::ContainerID;
use crate::runtime;

/// Error returned when the stats of a container could not be retrieved.
#[derive(Debug, thiserror::Error)]
#[error("failed to fetch stats for container `{container_id}`: {source}")]
pub struct FetchError {
    pub container_id: ContainerID,
    #[source]
    pub source: runtime::Error,
}

/// Error returned when a stats sample lacks a field a metric is derived from.
///
/// A sample with all fields present but no observable progress is not
/// malformed; it yields a zero reading instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed stats sample: missing field `{field}`")]
pub struct MalformedSample {
    field: &'static str,
}

impl MalformedSample {
    pub(crate) const fn new(field: &'static str) -> Self {
        Self { field }
    }

    /// Dotted path of the missing field, e.g. `precpu_stats.system_cpu_usage`.
    pub fn field(&self) -> &'static str {
        self.field
    }
}
