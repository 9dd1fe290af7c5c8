use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::{
    client::{Backend, Resource},
    error::FetchError,
    metrics::{self, RefreshTimer},
    models::DashboardState,
    DashboardError, Result,
};

/// How one resource fared in a refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceStatus {
    /// The slice was replaced with this many records.
    Updated(usize),
    /// The previous slice was kept.
    Retained(FetchError),
}

impl ResourceStatus {
    pub fn is_updated(&self) -> bool {
        matches!(self, ResourceStatus::Updated(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    pub metrics: ResourceStatus,
    pub alerts: ResourceStatus,
    pub llm_logs: ResourceStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Completed(RefreshReport),
    /// Another cycle held the refresh gate.
    Skipped,
}

struct PollerInner {
    backend: Arc<dyn Backend>,
    state: watch::Sender<DashboardState>,
    refresh_gate: AsyncMutex<()>,
}

impl PollerInner {
    async fn refresh(&self) -> RefreshOutcome {
        let Ok(_gate) = self.refresh_gate.try_lock() else {
            debug!("refresh already in flight, skipping");
            metrics::record_skipped();
            return RefreshOutcome::Skipped;
        };
        let _timer = RefreshTimer::new();

        let (metrics_res, alerts_res, llm_res) = tokio::join!(
            self.backend.fetch_metrics(),
            self.backend.fetch_alerts(),
            self.backend.fetch_llm_logs(),
        );

        let report = RefreshReport {
            metrics: settle_status(Resource::Metrics, &metrics_res),
            alerts: settle_status(Resource::Alerts, &alerts_res),
            llm_logs: settle_status(Resource::LlmLogs, &llm_res),
        };

        self.state.send_modify(|state| {
            if let Ok(points) = metrics_res {
                state.snapshot.metrics = points;
            }
            if let Ok(alerts) = alerts_res {
                state.snapshot.alerts = alerts;
            }
            if let Ok(logs) = llm_res {
                state.snapshot.llm_logs = logs;
            }
            state.loading = false;
            state.last_settled = Some(Utc::now());
        });

        metrics::record_cycle();
        debug!(?report, "refresh cycle settled");
        RefreshOutcome::Completed(report)
    }
}

fn settle_status<T>(
    resource: Resource,
    result: &std::result::Result<Vec<T>, FetchError>,
) -> ResourceStatus {
    match result {
        Ok(records) => {
            metrics::set_snapshot_records(resource, records.len());
            ResourceStatus::Updated(records.len())
        }
        Err(e) => {
            warn!(resource = resource.label(), kind = e.kind(), "Fetch failed, keeping previous data: {}", e);
            metrics::record_fetch_failure(resource, e);
            ResourceStatus::Retained(e.clone())
        }
    }
}

struct Ticker {
    handle: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

/// Keeps a [`DashboardState`] fresh by polling a [`Backend`].
///
/// The state is published on a watch channel; call [`Poller::subscribe`] to
/// consume it. At most one timer runs at a time.
///
/// Tear down with [`Poller::stop`]: once it returns, subscribers see no more
/// updates. Dropping the poller only aborts the task. On a multi-threaded
/// runtime a refresh whose fetches already finished may still publish once
/// after the drop.
pub struct Poller {
    inner: Arc<PollerInner>,
    ticker: Mutex<Option<Ticker>>,
}

impl Poller {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            inner: Arc::new(PollerInner {
                backend,
                state,
                refresh_gate: AsyncMutex::new(()),
            }),
            ticker: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    /// Fetches all three resources concurrently and applies whatever succeeded.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.inner.refresh().await
    }

    /// Refreshes now and then every `interval`, replacing any running timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(DashboardError::Config(
                "refresh interval must be greater than zero".to_string(),
            ));
        }

        let mut ticker = self.ticker.lock();
        if let Some(previous) = ticker.take() {
            debug!("replacing existing poll timer");
            previous.handle.abort();
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run_poll_loop(self.inner.clone(), interval, shutdown_rx));
        *ticker = Some(Ticker {
            handle,
            shutdown_tx,
        });
        Ok(())
    }

    /// Cancels the timer and waits for the poll task to exit.
    ///
    /// A refresh in flight is dropped before it applies anything.
    pub async fn stop(&self) {
        let ticker = self.ticker.lock().take();
        let Some(Ticker {
            handle,
            shutdown_tx,
        }) = ticker
        else {
            return;
        };

        let _ = shutdown_tx.send(());
        if let Err(e) = handle.await {
            if !e.is_cancelled() {
                error!("Poll task ended abnormally: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .as_ref()
            .is_some_and(|ticker| !ticker.handle.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.get_mut().take() {
            ticker.handle.abort();
        }
    }
}

async fn run_poll_loop(
    inner: Arc<PollerInner>,
    interval: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(interval_ms = interval.as_millis() as u64, "Poller started");

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            _ = &mut shutdown_rx => break,
            outcome = inner.refresh() => {
                if outcome == RefreshOutcome::Skipped {
                    debug!("tick skipped, manual refresh in flight");
                }
            }
        }
    }

    info!("Poller stopped");
}
