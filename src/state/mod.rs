/// League domain types.
pub mod league;
/// Published league snapshot.
pub mod snapshot;
mod sse;

use std::{sync::Arc, time::SystemTime};

use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::{
    config::AppConfig,
    dao::league_store::LeagueStore,
    error::ServiceError,
    state::{league::WeekNumber, snapshot::Snapshot},
};

pub use self::sse::SseHub;

/// Reference-counted handle passed to every handler and service.
pub type SharedState = Arc<AppState>;

const PUBLIC_SSE_CAPACITY: usize = 16;

/// Visibility of the published snapshot to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    /// A load is in flight; views must not be computed.
    Loading,
    /// The snapshot is complete and current.
    Ready,
    /// The last load failed with the given message; the previous snapshot is kept.
    Failed(String),
}

/// Consistent copy of the league slot taken under a single read lock.
#[derive(Debug, Clone)]
pub struct LeagueStatus {
    /// Phase at the time of the read.
    pub phase: LoadPhase,
    /// Published snapshot, possibly from an earlier successful load.
    pub snapshot: Arc<Snapshot>,
    /// When the last successful load published its snapshot.
    pub loaded_at: Option<SystemTime>,
}

struct LeagueSlot {
    phase: LoadPhase,
    snapshot: Arc<Snapshot>,
    loaded_at: Option<SystemTime>,
}

/// Central application state: gateway handle, configuration, and the published snapshot.
pub struct AppState {
    store: Arc<dyn LeagueStore>,
    config: AppConfig,
    league: RwLock<LeagueSlot>,
    write_gate: Mutex<()>,
    public_sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The state starts in [`LoadPhase::Loading`] with an empty snapshot until the first load
    /// completes.
    pub fn new(store: Arc<dyn LeagueStore>, config: AppConfig) -> SharedState {
        Arc::new(Self {
            store,
            config,
            league: RwLock::new(LeagueSlot {
                phase: LoadPhase::Loading,
                snapshot: Arc::new(Snapshot::default()),
                loaded_at: None,
            }),
            write_gate: Mutex::new(()),
            public_sse: SseHub::new(PUBLIC_SSE_CAPACITY),
        })
    }

    /// Handle to the league gateway.
    pub fn store(&self) -> Arc<dyn LeagueStore> {
        self.store.clone()
    }

    /// League settings loaded at startup.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.public_sse
    }

    /// Claim exclusive right to load or save. Fails instead of waiting when already held.
    pub fn try_write_gate(&self) -> Result<MutexGuard<'_, ()>, ServiceError> {
        self.write_gate.try_lock().map_err(|_| ServiceError::Busy)
    }

    /// Current load phase.
    pub async fn load_phase(&self) -> LoadPhase {
        self.league.read().await.phase.clone()
    }

    /// Phase, snapshot, and load time read together.
    pub async fn status(&self) -> LeagueStatus {
        let guard = self.league.read().await;
        LeagueStatus {
            phase: guard.phase.clone(),
            snapshot: guard.snapshot.clone(),
            loaded_at: guard.loaded_at,
        }
    }

    /// Current snapshot regardless of phase.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.league.read().await.snapshot.clone()
    }

    /// Current snapshot, only when the last load succeeded and none is in flight.
    pub async fn ready_snapshot(&self) -> Result<Arc<Snapshot>, ServiceError> {
        let guard = self.league.read().await;
        match &guard.phase {
            LoadPhase::Ready => Ok(guard.snapshot.clone()),
            LoadPhase::Loading => Err(ServiceError::Loading),
            LoadPhase::Failed(message) => Err(ServiceError::LoadFailed(message.clone())),
        }
    }

    /// Enter the loading phase, clearing any previous failure.
    pub async fn begin_loading(&self) {
        self.league.write().await.phase = LoadPhase::Loading;
    }

    /// Replace the snapshot and leave the loading phase in one step.
    pub async fn publish_snapshot(&self, snapshot: Snapshot) -> WeekNumber {
        let current_week = snapshot.current_week();
        let mut guard = self.league.write().await;
        guard.snapshot = Arc::new(snapshot);
        guard.phase = LoadPhase::Ready;
        guard.loaded_at = Some(SystemTime::now());
        current_week
    }

    /// Leave the loading phase with a failure, keeping the previous snapshot.
    pub async fn record_load_failure(&self, message: String) {
        self.league.write().await.phase = LoadPhase::Failed(message);
    }

    /// Mutate the snapshot in place under the write lock. Readers holding an older [`Arc`] keep
    /// their copy untouched.
    pub async fn patch_snapshot<R>(&self, patch: impl FnOnce(&mut Snapshot) -> R) -> R {
        let mut guard = self.league.write().await;
        patch(Arc::make_mut(&mut guard.snapshot))
    }
}
