//! Rate-limited polling cache for the live station-status feed.
//!
//! Holds the latest snapshot of `GET /v1/data` and keeps it fresh two
//! ways: on demand via [`StationCache::get_data`] (guarded by a cooldown
//! so a refresh-spamming user can't produce a request storm) and in the
//! background via an owned refresh loop (immediate fetch on start, then
//! a fixed interval).
//!
//! # Staleness policy
//!
//! The snapshot is replaced wholesale on every successful fetch — there
//! is no incremental merge. On a failed fetch the previous data is
//! **retained** and the failure is recorded on the side: a dashboard
//! that once had data never regresses to an empty board because of a
//! transient error.
//!
//! # Integration
//!
//! The refresh loop is a handle owned by the cache value itself —
//! start/stop are its only mutators, and dropping the cache stops the
//! loop. Nothing here is process-global, so two caches in one process
//! can't trip over each other's timers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use duckcross_api::Station;
use duckcross_http::{ApiRequest, Backend};
use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Errors and outcomes
// ---------------------------------------------------------------------------

/// Errors from the station-data cache.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DataError {
    /// The fetch failed (transport, non-2xx, or a malformed body).
    /// Never returned by [`StationCache::get_data`] — recorded on the
    /// cache as [`StationCache::last_error`] instead, because fetches
    /// run on background/best-effort paths.
    #[error("station data fetch failed: {0}")]
    FetchFailed(String),

    /// The call was rejected because the cooldown window since the last
    /// successful fetch hasn't elapsed. The cache is untouched.
    #[error("station data request rate-limited")]
    RateLimited,
}

/// What a non-rejected [`StationCache::get_data`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A fetch was dispatched and its result applied.
    Fetched,
    /// Another fetch was already in flight; this call did nothing.
    AlreadyInFlight,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Minimum spacing after a successful fetch before another fetch
    /// may be dispatched. Zero disables the rate limit.
    pub cooldown: Duration,
    /// Period of the background refresh loop.
    pub refresh_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(10),
            refresh_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`StationCache::with_config`]. A zero
    /// refresh interval would turn the loop into a busy spin; it is
    /// raised to one second.
    pub fn validated(mut self) -> Self {
        if self.refresh_interval.is_zero() {
            warn!("refresh_interval of zero raised to 1s");
            self.refresh_interval = Duration::from_secs(1);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A copy of the cache's current contents.
#[derive(Debug, Clone)]
pub struct StationSnapshot {
    /// The stations from the last successful fetch, in feed order.
    pub data: Vec<Station>,
    /// When the last successful fetch completed. Monotonic and
    /// process-local — the snapshot is never persisted.
    pub fetched_at: Option<Instant>,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

struct CacheState {
    data: Vec<Station>,
    fetched_at: Option<Instant>,
    last_error: Option<DataError>,
    in_flight: bool,
}

/// State shared between the cache handle and the refresh-loop task.
struct CacheShared<B> {
    backend: B,
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl<B: Backend> CacheShared<B> {
    /// One fetch attempt, with the dispatch decision taken atomically.
    ///
    /// The in-flight check, the cooldown check, and claiming the
    /// in-flight guard all happen under a single lock acquisition —
    /// two racing callers can't both decide to dispatch. The request
    /// itself runs outside the lock.
    async fn fetch(&self) -> Result<FetchOutcome, DataError> {
        {
            let mut state = self.state.lock().unwrap();
            if state.in_flight {
                trace!("fetch already in flight");
                return Ok(FetchOutcome::AlreadyInFlight);
            }
            if let Some(fetched_at) = state.fetched_at {
                if fetched_at.elapsed() < self.config.cooldown {
                    trace!("fetch rejected by cooldown");
                    // Rejected calls leave everything untouched: no
                    // loading flip, no error overwrite.
                    return Err(DataError::RateLimited);
                }
            }
            state.in_flight = true;
        }

        let outcome = match self
            .backend
            .execute(ApiRequest::get("/data"))
            .await
        {
            Ok(response) if response.is_success() => response
                .json::<Vec<Station>>()
                .map_err(|e| e.to_string()),
            Ok(response) => Err(format!("status {}", response.status)),
            Err(e) => Err(e.to_string()),
        };

        let mut state = self.state.lock().unwrap();
        state.in_flight = false;
        match outcome {
            Ok(stations) => {
                trace!(stations = stations.len(), "station data refreshed");
                state.data = stations;
                state.fetched_at = Some(Instant::now());
                state.last_error = None;
            }
            Err(reason) => {
                // Keep the stale data and the old timestamp; only the
                // error flag changes.
                warn!(%reason, "station data fetch failed; keeping stale data");
                state.last_error = Some(DataError::FetchFailed(reason));
            }
        }
        Ok(FetchOutcome::Fetched)
    }
}

// ---------------------------------------------------------------------------
// Refresh loop handle
// ---------------------------------------------------------------------------

/// The owned background-loop handle. Stop is signalled, not aborted:
/// a fetch in flight when stop arrives completes and applies its result
/// before the task exits.
struct RefreshHandle {
    task: Option<tokio::task::JoinHandle<()>>,
    stop: Option<watch::Sender<bool>>,
}

impl RefreshHandle {
    fn idle() -> Self {
        Self {
            task: None,
            stop: None,
        }
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(true);
        }
        // Dropping the handle detaches the task; it exits at its next
        // select point after finishing any in-flight fetch.
        self.task = None;
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// StationCache
// ---------------------------------------------------------------------------

/// The station-status cache: snapshot + cooldown guard + refresh loop.
pub struct StationCache<B: Backend> {
    shared: Arc<CacheShared<B>>,
    refresh: RefreshHandle,
}

impl<B: Backend> StationCache<B> {
    /// Creates a cache with default timing (10 s cooldown, 60 s loop).
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, CacheConfig::default())
    }

    /// Creates a cache with explicit timing.
    pub fn with_config(backend: B, config: CacheConfig) -> Self {
        Self {
            shared: Arc::new(CacheShared {
                backend,
                config: config.validated(),
                state: Mutex::new(CacheState {
                    data: Vec::new(),
                    fetched_at: None,
                    last_error: None,
                    in_flight: false,
                }),
            }),
            refresh: RefreshHandle::idle(),
        }
    }

    /// Fetches fresh station data, subject to the guards.
    ///
    /// - A fetch already in flight makes this a no-op
    ///   ([`FetchOutcome::AlreadyInFlight`]).
    /// - Inside the cooldown window the call is rejected with
    ///   [`DataError::RateLimited`] and the cache is left untouched.
    /// - Otherwise the fetch dispatches: success replaces the snapshot
    ///   wholesale and stamps `fetched_at`; failure records an error
    ///   and keeps the stale snapshot.
    pub async fn get_data(&self) -> Result<FetchOutcome, DataError> {
        self.shared.fetch().await
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> StationSnapshot {
        let state = self.shared.state.lock().unwrap();
        StationSnapshot {
            data: state.data.clone(),
            fetched_at: state.fetched_at,
        }
    }

    /// The stations from the last successful fetch, in feed order.
    pub fn stations(&self) -> Vec<Station> {
        self.shared.state.lock().unwrap().data.clone()
    }

    /// When the last successful fetch completed.
    pub fn fetched_at(&self) -> Option<Instant> {
        self.shared.state.lock().unwrap().fetched_at
    }

    /// The most recent fetch failure, if the last fetch failed.
    pub fn last_error(&self) -> Option<DataError> {
        self.shared.state.lock().unwrap().last_error.clone()
    }

    /// `true` while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.shared.state.lock().unwrap().in_flight
    }

    /// `true` while the background loop is running.
    pub fn is_auto_refreshing(&self) -> bool {
        self.refresh.is_running()
    }

    /// Starts the background refresh loop: one immediate fetch, then
    /// one per configured interval until stopped.
    ///
    /// Idempotent — a second start while the loop is running is a
    /// no-op.
    pub fn start_auto_refresh(&mut self) {
        if self.refresh.is_running() {
            debug!("auto-refresh already running");
            return;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let shared = Arc::clone(&self.shared);
        let period = self.shared.config.refresh_interval;

        let task = tokio::spawn(async move {
            debug!(period_secs = period.as_secs(), "auto-refresh started");
            let _ = shared.fetch().await;

            let mut interval =
                time::interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    // Biased so a pending stop wins over a due tick.
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = interval.tick() => {
                        let _ = shared.fetch().await;
                    }
                }
            }
            debug!("auto-refresh stopped");
        });

        self.refresh = RefreshHandle {
            task: Some(task),
            stop: Some(stop_tx),
        };
    }

    /// Stops the background refresh loop.
    ///
    /// Cancels the timer and prevents any further automatic dispatch.
    /// A fetch already in flight is not aborted — it completes and its
    /// result still applies (the shared state outlives the loop task).
    /// Safe to call when no loop is running.
    pub fn stop_auto_refresh(&mut self) {
        self.refresh.stop();
    }
}

// =========================================================================
// Tests
// =========================================================================
