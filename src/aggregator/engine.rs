//! The aggregation cycle.
//!
//! # Responsibilities
//! - Fan out one probe per service, concurrently, each under its own deadline
//! - Normalize and merge results into the owned status table
//! - Recompute derived signals and publish a new snapshot
//!
//! # Design Decisions
//! - `run_cycle` takes `&mut self`: one cycle at a time per aggregator
//! - Probes run as separate tasks, so a panicking probe is contained
//! - A cycle that completes after a halt request publishes nothing

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::time;

use crate::aggregator::capture::CaptureToggle;
use crate::aggregator::signals::derive;
use crate::aggregator::snapshot::{unix_millis, Snapshot, SnapshotStore};
use crate::config::{DashboardConfig, ServiceConfig};
use crate::health::normalize::normalize;
use crate::health::probe::{HttpProber, ProbeError, ProbeResult, ProbeTarget, Prober};
use crate::health::state::StatusRecord;
use crate::observability::metrics;

/// Slack on top of a probe's own timeout before the aggregator abandons it.
const PROBE_GRACE: Duration = Duration::from_millis(50);

/// Owner of the status table.
pub struct Aggregator<P: Prober = HttpProber> {
    prober: Arc<P>,
    targets: Vec<ProbeTarget>,
    table: Vec<StatusRecord>,
    capture: CaptureToggle,
    store: SnapshotStore,
    sequence: u64,
}

impl Aggregator<HttpProber> {
    /// Aggregator over plain HTTP probes for every configured service.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            &config.services,
            HttpProber::new(),
            CaptureToggle::new(config.capture.enabled),
        )
    }
}

impl<P: Prober> Aggregator<P> {
    pub fn new(services: &[ServiceConfig], prober: P, capture: CaptureToggle) -> Self {
        let targets: Vec<ProbeTarget> = services.iter().map(ProbeTarget::from).collect();
        let table: Vec<StatusRecord> = targets
            .iter()
            .map(|t| StatusRecord::new(t.identity.clone(), t.kind))
            .collect();

        let initial = Snapshot {
            sequence: 0,
            taken_at: unix_millis(),
            signals: derive(&table, capture.is_enabled()),
            records: table.clone(),
        };

        Self {
            prober: Arc::new(prober),
            targets,
            table,
            capture,
            store: SnapshotStore::new(initial),
            sequence: 0,
        }
    }

    /// Handle for snapshot readers.
    pub fn store(&self) -> SnapshotStore {
        self.store.clone()
    }

    pub fn capture(&self) -> CaptureToggle {
        self.capture.clone()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    pub fn service_count(&self) -> usize {
        self.targets.len()
    }

    /// Probe everything once and publish the result.
    ///
    /// Never fails: probe errors end up in the affected record only. After a
    /// halt request the probes still complete but the merge is discarded and
    /// the previous snapshot is returned.
    pub async fn run_cycle(&mut self) -> Arc<Snapshot> {
        let started = Instant::now();
        let results = self.probe_all().await;

        if self.is_halted() {
            tracing::debug!("Aggregator halted, discarding cycle results");
            return self.store.current();
        }

        self.merge(results);
        let Some(snapshot) = self.publish() else {
            tracing::debug!("Aggregator halted during merge, cycle not published");
            return self.store.current();
        };
        metrics::record_cycle(started);

        tracing::debug!(
            sequence = snapshot.sequence,
            overall = %snapshot.signals.overall,
            duration_ms = started.elapsed().as_millis() as u64,
            "Cycle complete"
        );
        snapshot
    }

    /// Forget every observation and publish an all-Unknown snapshot.
    pub fn reset(&mut self) -> Arc<Snapshot> {
        if self.is_halted() {
            return self.store.current();
        }
        for record in &mut self.table {
            record.reset();
            metrics::record_service_status(&record.identity, record.status);
        }
        tracing::info!(services = self.table.len(), "Status table reset");
        self.publish().unwrap_or_else(|| self.store.current())
    }

    fn is_halted(&self) -> bool {
        self.store.is_halted()
    }

    async fn probe_all(&self) -> Vec<ProbeResult> {
        let handles: Vec<_> = self
            .targets
            .iter()
            .cloned()
            .map(|target| {
                let prober = Arc::clone(&self.prober);
                tokio::spawn(async move {
                    match time::timeout(target.timeout + PROBE_GRACE, prober.probe(&target)).await {
                        Ok(result) => result,
                        Err(_) => ProbeResult::Failed(ProbeError::Timeout(
                            u64::try_from(target.timeout.as_millis()).unwrap_or(u64::MAX),
                        )),
                    }
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|e| {
                    ProbeResult::Failed(ProbeError::Transport(format!("probe task failed: {}", e)))
                })
            })
            .collect()
    }

    fn merge(&mut self, results: Vec<ProbeResult>) {
        let now = unix_millis();

        for (record, result) in self.table.iter_mut().zip(results) {
            let status = normalize(record.kind, &result);

            match &result {
                ProbeResult::Ok { latency, .. } => tracing::debug!(
                    identity = %record.identity,
                    kind = %record.kind,
                    latency_ms = latency.as_millis() as u64,
                    status = %status,
                    "Probe succeeded"
                ),
                ProbeResult::Failed(error) => tracing::warn!(
                    identity = %record.identity,
                    kind = %record.kind,
                    reason = error.reason(),
                    error = %error,
                    "Probe failed"
                ),
            }

            if record.status != status {
                tracing::info!(
                    identity = %record.identity,
                    from = %record.status,
                    to = %status,
                    "Service status changed"
                );
            }

            record.apply(status, &result, now);
            metrics::record_probe(&record.identity, record.kind, &result);
            metrics::record_service_status(&record.identity, status);
        }
    }

    /// `None` when the store was halted before the snapshot went out.
    fn publish(&mut self) -> Option<Arc<Snapshot>> {
        let snapshot = Arc::new(Snapshot {
            sequence: self.sequence + 1,
            taken_at: unix_millis(),
            records: self.table.clone(),
            signals: derive(&self.table, self.capture.is_enabled()),
        });
        if !self.store.publish(Arc::clone(&snapshot)) {
            return None;
        }
        self.sequence = snapshot.sequence;
        Some(snapshot)
    }
}
