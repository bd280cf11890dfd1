use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::container::ContainerID;
use crate::error::Error;
use crate::metrics::{ContainerMetric, ContainerUsage, MetricsReport};
use crate::runtime::RuntimeClient;
use crate::{discovery, stats};

/// Runs collection passes over all running containers of a runtime daemon.
///
/// The collector holds no mutable state, so concurrent scrapes may share it.
#[derive(Debug)]
pub struct Collector<C> {
    client: Arc<C>,
    max_concurrent_fetches: usize,
}

impl<C: RuntimeClient> Collector<C> {
    /// Creates a collector issuing at most `max_concurrent_fetches` stats
    /// requests at a time (at least one).
    pub fn new(client: C, max_concurrent_fetches: usize) -> Self {
        Self {
            client: Arc::new(client),
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    #[cfg(test)]
    fn client(&self) -> &C {
        &self.client
    }

    /// Collects the metrics of every running container.
    ///
    /// The report holds one entry per listed container, in listing order. A
    /// container whose stats cannot be fetched or interpreted gets an error entry
    /// and does not affect the others. If the listing itself fails, the report
    /// consists of a single error entry and no stats are requested.
    ///
    /// Dropping the returned future aborts all in-flight requests.
    pub async fn collect(&self) -> MetricsReport {
        let before = std::time::Instant::now();
        let listing = discovery::list_running_containers(self.client.as_ref()).await;
        let container_ids = match listing {
            Ok(ids) => ids,
            Err(err) => {
                log::error!("{}", err);
                return MetricsReport::from(vec![ContainerMetric::from(Error::from(err))]);
            }
        };

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_fetches));
        let mut tasks = JoinSet::new();
        let mut task_index = HashMap::with_capacity(container_ids.len());
        for (index, container_id) in container_ids.iter().enumerate() {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);
            let container_id = container_id.clone();
            let handle = tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    unreachable!("collection semaphore closed while fetching");
                };
                collect_container(client.as_ref(), container_id).await
            });
            task_index.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<ContainerMetric>> = vec![None; container_ids.len()];
        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, metric) = match joined {
                Ok((id, metric)) => (id, metric),
                Err(source) => {
                    let id = source.id();
                    let container_id = container_ids[task_index[&id]].clone();
                    let err = Error::Task {
                        container_id,
                        source,
                    };
                    log::error!("{}", err);
                    (id, ContainerMetric::from(err))
                }
            };
            slots[task_index[&id]] = Some(metric);
        }

        let report = MetricsReport::from(slots.into_iter().flatten().collect::<Vec<_>>());
        log::debug!(
            "Collected {} containers in {} ms",
            report.len(),
            before.elapsed().as_millis()
        );
        report
    }
}

/// Fetches and interprets the stats of one container.
async fn collect_container<C: RuntimeClient>(
    client: &C,
    container_id: ContainerID,
) -> ContainerMetric {
    let sample = match stats::fetch_stats(client, &container_id).await {
        Ok(sample) => sample,
        Err(err) => {
            log::warn!("{}", err);
            return ContainerMetric::from(Error::from(err));
        }
    };

    match ContainerUsage::from_sample(container_id.clone(), &sample) {
        Ok(usage) => ContainerMetric::Ok(usage),
        Err(source) => {
            let err = Error::Malformed {
                container_id,
                source,
            };
            log::warn!("{}", err);
            ContainerMetric::from(err)
        }
    }
}
