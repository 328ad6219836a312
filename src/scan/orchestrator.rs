//! Batch fan-out.
//!
//! One tokio task per device, all spawned up front. An optional semaphore
//! caps how many exchanges are in flight; an optional deadline bounds the
//! whole batch. Results land in a slot vector indexed like the device list,
//! so completion order never leaks into the output.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::scan::adapter::Adapter;
use crate::scan::device::{Credential, Device, OidSet};
use crate::scan::poller::poll_device;
use crate::scan::result::{BatchResult, PollResult};

/// Recorded for devices still pending when the batch deadline fires.
pub const DEADLINE_MESSAGE: &str = "timeout";

/// Batch settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanConfig {
    /// Maximum concurrent polls; `None` polls every device at once.
    pub concurrency: Option<usize>,
    /// Time limit for the whole batch; `None` waits for every poll.
    pub deadline: Option<Duration>,
}

/// Runs batches of device polls through an [`Adapter`].
pub struct Scanner<A> {
    adapter: Arc<A>,
    config: ScanConfig,
}

impl<A: Adapter> Scanner<A> {
    /// Create a scanner with default settings (unbounded, no deadline).
    pub fn new(adapter: A) -> Self {
        Self::with_config(adapter, ScanConfig::default())
    }

    /// Create a scanner with explicit settings.
    pub fn with_config(adapter: A, config: ScanConfig) -> Self {
        Self {
            adapter: Arc::new(adapter),
            config,
        }
    }

    /// Cap concurrent polls at `limit`.
    ///
    /// Values below 1 are treated as 1; values above
    /// [`Semaphore::MAX_PERMITS`] are treated as that maximum.
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.config.concurrency = Some(limit);
        self
    }

    /// Abandon polls still pending after `deadline`.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = Some(deadline);
        self
    }

    /// The effective settings.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Poll every device once and collect one result per device.
    ///
    /// Completes only when every poll has produced a result (or the
    /// deadline fired). `result[i]` always belongs to `devices[i]`.
    pub async fn run_batch(
        &self,
        devices: &[Device],
        credential: &Credential,
        oids: &OidSet,
    ) -> BatchResult {
        let started = Instant::now();
        tracing::info!(target: "snmp_scan::scan", { snmp.device_count = devices.len(), snmp.oid_count = oids.len(), concurrency = ?self.config.concurrency }, "starting batch");

        let credential = Arc::new(credential.clone());
        let oids = Arc::new(oids.clone());
        let limit = self
            .config
            .concurrency
            .map(|n| Arc::new(Semaphore::new(n.clamp(1, Semaphore::MAX_PERMITS))));

        let mut tasks = JoinSet::new();
        let mut task_index = HashMap::with_capacity(devices.len());
        for (index, device) in devices.iter().enumerate() {
            let adapter = Arc::clone(&self.adapter);
            let credential = Arc::clone(&credential);
            let oids = Arc::clone(&oids);
            let limit = limit.clone();
            let device = device.clone();

            let handle = tasks.spawn(async move {
                // Held until the poll finishes; never closed, so `ok()` is always Some.
                let _permit = match limit {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };
                (index, poll_device(&*adapter, &device, &credential, &oids).await)
            });
            task_index.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<PollResult>> = (0..devices.len()).map(|_| None).collect();

        let drain = async {
            while let Some(joined) = tasks.join_next_with_id().await {
                match joined {
                    Ok((_, (index, result))) => slots[index] = Some(result),
                    Err(err) => {
                        let Some(&index) = task_index.get(&err.id()) else {
                            continue;
                        };
                        tracing::warn!(target: "snmp_scan::scan", { snmp.device = %devices[index], error = %err }, "poll task failed");
                        slots[index] = Some(PollResult::failure(
                            devices[index].address(),
                            format!("poll task failed: {}", err),
                        ));
                    }
                }
            }
        };

        match self.config.deadline {
            Some(deadline) => {
                let timed_out = tokio::time::timeout(deadline, drain).await.is_err();
                if timed_out {
                    tracing::warn!(target: "snmp_scan::scan", { snmp.pending = tasks.len(), deadline_ms = deadline.as_millis() as u64 }, "batch deadline reached, abandoning pending polls");
                    tasks.shutdown().await;
                }
            }
            None => drain.await,
        }

        let results: Vec<PollResult> = slots
            .into_iter()
            .zip(devices)
            .map(|(slot, device)| {
                slot.unwrap_or_else(|| PollResult::failure(device.address(), DEADLINE_MESSAGE))
            })
            .collect();
        let batch = BatchResult::new(results);

        tracing::info!(target: "snmp_scan::scan", { snmp.device_count = batch.len(), snmp.failed = batch.failures(), elapsed_ms = started.elapsed().as_millis() as u64 }, "batch complete");
        batch
    }
}
