//! Periodic token refresh.
//!
//! A keepalive task refreshes the session token on a fixed period for the
//! lifetime of the session. Failures are logged and counted; the next tick
//! proceeds regardless and nothing is surfaced to callers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cf_client::{CfError, UsersUaa};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Refresh the auth token every 6 hours.
pub const TOKEN_REFRESH_PERIOD: Duration = Duration::from_secs(6 * 60 * 60);

/// Anything that can renew the shared session token in place.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Result<(), CfError>;
}

#[async_trait]
impl TokenRefresher for UsersUaa {
    async fn refresh(&self) -> Result<(), CfError> {
        self.refresh_token().await.map(|_| ())
    }
}

/// Counters kept by the keepalive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepaliveStats {
    pub successes: u64,
    pub failures: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

pub struct Keepalive {
    refresher: Arc<dyn TokenRefresher>,
    period: Duration,
    stats: Mutex<KeepaliveStats>,
}

impl Keepalive {
    pub fn new(refresher: Arc<dyn TokenRefresher>, period: Duration) -> Self {
        Self {
            refresher,
            period,
            stats: Mutex::new(KeepaliveStats::default()),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn stats(&self) -> KeepaliveStats {
        self.stats.lock().clone()
    }

    /// Runs one refresh now. Returns whether it succeeded.
    pub async fn refresh_once(&self) -> bool {
        info!("Challenging auth");
        match self.refresher.refresh().await {
            Ok(()) => {
                let mut stats = self.stats.lock();
                stats.successes += 1;
                stats.last_success = Some(Utc::now());
                info!("Refreshed auth token... until next time");
                true
            }
            Err(e) => {
                let mut stats = self.stats.lock();
                stats.failures += 1;
                stats.last_error = Some(e.to_string());
                error!(error = %e, failures = stats.failures, "Failed to refresh auth token");
                false
            }
        }
    }

    /// Starts the periodic task. The first refresh happens one period from now.
    pub fn spawn(self, cancel_token: CancellationToken) -> KeepaliveHandle {
        let keepalive = Arc::new(self);
        let task = {
            let keepalive = Arc::clone(&keepalive);
            let cancel_token = cancel_token.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = cancel_token.cancelled() => {
                            debug!("Token keepalive shutting down");
                            break;
                        }
                        _ = tokio::time::sleep(keepalive.period) => {
                            keepalive.refresh_once().await;
                        }
                    }
                }
            })
        };

        KeepaliveHandle {
            keepalive,
            cancel_token,
            task: Mutex::new(Some(task)),
        }
    }
}

/// Owner of a running keepalive task.
pub struct KeepaliveHandle {
    keepalive: Arc<Keepalive>,
    cancel_token: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl KeepaliveHandle {
    pub fn stats(&self) -> KeepaliveStats {
        self.keepalive.stats()
    }

    /// Refreshes immediately, outside the schedule.
    pub async fn refresh_now(&self) -> bool {
        self.keepalive.refresh_once().await
    }

    pub fn is_running(&self) -> bool {
        !self.cancel_token.is_cancelled()
            && self
                .task
                .lock()
                .as_ref()
                .is_some_and(|task| !task.is_finished())
    }

    /// Cancels the task and waits for it to exit. Idempotent.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!(error = %e, "Token keepalive task failed");
            }
        }
    }
}

impl Drop for KeepaliveHandle {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
