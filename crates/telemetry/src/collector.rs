//! Async snapshot collector with configurable interval.

use std::sync::Arc;
use std::time::Duration;

use hostsense_protocol::HostSnapshot;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::Probe;

/// Callback invoked with each snapshot.
pub type SendFn = Box<dyn Fn(HostSnapshot) + Send + Sync + 'static>;

/// Interval used when `start(0)` is called.
pub const DEFAULT_INTERVAL_SEC: u32 = 5;

/// Periodic host snapshot collector.
///
/// Spawns a tokio task that takes a [`Probe`] snapshot every interval and
/// delivers it through the configured callback.
pub struct Collector {
    probe: Arc<Probe>,
    inner: Arc<Mutex<CollectorInner>>,
}

struct CollectorInner {
    send_fn: SendFn,
    cancel: Option<CancellationToken>,
}

impl Collector {
    /// Creates a new collector reading from `probe`.
    pub fn new(probe: Arc<Probe>, send_fn: SendFn) -> Self {
        Self {
            probe,
            inner: Arc::new(Mutex::new(CollectorInner {
                send_fn,
                cancel: None,
            })),
        }
    }

    /// Starts periodic collection at the given interval (seconds).
    ///
    /// Passing 0 selects [`DEFAULT_INTERVAL_SEC`]. A running loop is replaced.
    pub async fn start(&self, interval_sec: u32) {
        let mut inner = self.inner.lock().await;

        if let Some(cancel) = inner.cancel.take() {
            cancel.cancel();
        }

        let interval_sec = match interval_sec {
            0 => DEFAULT_INTERVAL_SEC,
            v => v,
        };

        let cancel = CancellationToken::new();
        inner.cancel = Some(cancel.clone());

        let probe = Arc::clone(&self.probe);
        let shared = Arc::clone(&self.inner);
        let interval = Duration::from_secs(interval_sec as u64);

        tokio::spawn(async move {
            collection_loop(probe, shared, interval, cancel).await;
        });

        tracing::info!(interval_sec, "telemetry collector started");
    }

    /// Stops the collector.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(cancel) = inner.cancel.take() {
            cancel.cancel();
            tracing::info!("telemetry collector stopped");
        }
    }

    /// Returns `true` if the collector is running.
    pub async fn is_running(&self) -> bool {
        self.inner.lock().await.cancel.is_some()
    }

    /// Updates the collection interval (restarts the loop).
    pub async fn update_interval(&self, interval_sec: u32) {
        self.stop().await;
        self.start(interval_sec).await;
    }
}

async fn collection_loop(
    probe: Arc<Probe>,
    inner: Arc<Mutex<CollectorInner>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // Skip the first immediate tick.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let Some(snapshot) = collect(&probe).await else {
                    continue;
                };
                if !deliver(&inner, &cancel, snapshot).await {
                    break;
                }
            }
        }
    }
}

/// Hands a snapshot to the callback unless this loop was cancelled.
///
/// The token is checked under the lock: `start()` cancels the previous loop
/// while holding it, so a replaced loop never delivers after a restart.
async fn deliver(
    inner: &Arc<Mutex<CollectorInner>>,
    cancel: &CancellationToken,
    snapshot: HostSnapshot,
) -> bool {
    let guard = inner.lock().await;
    if cancel.is_cancelled() {
        return false;
    }
    (guard.send_fn)(snapshot);
    true
}

/// Takes a snapshot off the async runtime (sysfs reads and statvfs block).
async fn collect(probe: &Arc<Probe>) -> Option<HostSnapshot> {
    let probe = Arc::clone(probe);
    match tokio::task::spawn_blocking(move || probe.snapshot()).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!(error = %e, "snapshot task failed");
            None
        }
    }
}
