use crate::cache::CacheStore;
use crate::error::CoreError;
use crate::model::SeasonInfo;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::watch;
use tracing::info;

/// Endpoints whose keys are parameterized by season.
pub const SEASON_SCOPED_ENDPOINTS: &[&str] = &[
    "standings",
    "rounds",
    "matches-round",
    "last-fixtures",
    "next-fixtures",
    "top-players",
    "team-all-matches",
    "player-stats",
];

/// How much of the cache a season switch throws away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidationPolicy {
    /// Everything.
    #[default]
    All,
    /// Only entries under [`SEASON_SCOPED_ENDPOINTS`].
    SeasonScoped,
}

type Listener = Arc<dyn Fn(&SeasonInfo) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

/// Process-wide current season. Switching it invalidates the cache and then
/// tells listeners; listeners re-fetch on their own.
pub struct SeasonSelector {
    known: Vec<SeasonInfo>,
    current: RwLock<SeasonInfo>,
    store: Arc<CacheStore>,
    policy: InvalidationPolicy,
    listeners: Mutex<Listeners>,
    watch_tx: watch::Sender<SeasonInfo>,
}

impl SeasonSelector {
    /// # Errors
    ///
    /// Will return `Err` if `known` is empty or `initial` is not one of `known`
    pub fn new(
        known: Vec<SeasonInfo>,
        initial: Option<i64>,
        store: Arc<CacheStore>,
        policy: InvalidationPolicy,
    ) -> Result<Self, CoreError> {
        let current = match initial {
            Some(id) => known
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or(CoreError::UnknownSeason(id))?,
            None => known
                .first()
                .cloned()
                .ok_or_else(|| CoreError::Other("no known seasons".into()))?,
        };
        let (watch_tx, _) = watch::channel(current.clone());
        Ok(Self {
            known,
            current: RwLock::new(current),
            store,
            policy,
            listeners: Mutex::new(Listeners {
                next_id: 1,
                entries: Vec::new(),
            }),
            watch_tx,
        })
    }

    #[must_use]
    pub fn current(&self) -> SeasonInfo {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn seasons(&self) -> &[SeasonInfo] {
        &self.known
    }

    #[must_use]
    pub fn find(&self, id: i64) -> Option<&SeasonInfo> {
        self.known.iter().find(|s| s.id == id)
    }

    /// True when the selection is the newest known season.
    #[must_use]
    pub fn is_current_season(&self) -> bool {
        self.known.first().map(|s| s.id) == Some(self.current().id)
    }

    /// Switches to season `id`: store it, invalidate, then notify.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `id` is not a known season; nothing changes then
    pub fn select(&self, id: i64) -> Result<SeasonInfo, CoreError> {
        let next = self.find(id).cloned().ok_or(CoreError::UnknownSeason(id))?;

        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = next.clone();
        }

        match self.policy {
            InvalidationPolicy::All => self.store.clear(),
            InvalidationPolicy::SeasonScoped => {
                for endpoint in SEASON_SCOPED_ENDPOINTS {
                    self.store.clear_prefix(&format!("{endpoint}_"));
                }
            }
        }
        info!(season = next.id, name = %next.name, "season selected");

        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(&next);
        }
        self.watch_tx.send_replace(next.clone());
        Ok(next)
    }

    pub fn on_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&SeasonInfo) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.entries.len();
        listeners.entries.retain(|(lid, _)| *lid != id);
        listeners.entries.len() != before
    }

    /// Watch-channel view of the selection for async consumers.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SeasonInfo> {
        self.watch_tx.subscribe()
    }
}
