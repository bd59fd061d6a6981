pub mod clock;
pub mod key;

use crate::error::CoreError;
use crate::storage::PersistenceShim;
use chrono::{DateTime, Duration, Utc};
use clock::Clock;
use futures::future::{BoxFuture, Shared};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

pub use clock::{ManualClock, SystemClock};
pub use key::build_key;

pub const CACHE_DURATION: Duration = Duration::minutes(5);

/// The one in-flight fetch for a key, shared by every caller that asks for
/// the key before it settles.
pub type SharedFetch = Shared<BoxFuture<'static, Result<Value, CoreError>>>;

#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    #[must_use]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at < self.ttl
    }
}

enum Slot {
    Resolved(CacheEntry),
    Pending { id: u64, fetch: SharedFetch },
}

/// What a caller sees when it asks the store for a key on the fetch path.
pub enum Lookup {
    Hit(Value),
    Join(SharedFetch),
    Lead(SharedFetch),
}

/// Read-side view of a slot. Absent and expired are the same thing here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Vacant,
    Pending,
    Resolved,
}

pub struct CacheStore {
    slots: Mutex<HashMap<String, Slot>>,
    clock: Arc<dyn Clock>,
    persistence: Option<PersistenceShim>,
    next_fetch_id: AtomicU64,
    write_turn: Mutex<()>,
}

impl CacheStore {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            clock,
            persistence: None,
            next_fetch_id: AtomicU64::new(1),
            write_turn: Mutex::new(()),
        }
    }

    /// Creates a store seeded from the snapshot the shim holds. Entries that
    /// already expired are dropped on the way in.
    #[must_use]
    pub fn with_persistence(clock: Arc<dyn Clock>, shim: PersistenceShim) -> Self {
        let restored = shim.load(clock.now());
        let slots = restored
            .into_iter()
            .map(|entry| (entry.key.clone(), Slot::Resolved(entry)))
            .collect();
        Self {
            slots: Mutex::new(slots),
            clock,
            persistence: Some(shim),
            next_fetch_id: AtomicU64::new(1),
            write_turn: Mutex::new(()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        match self.slots().get(key) {
            Some(Slot::Resolved(entry)) if entry.is_valid(now) => Some(entry.data.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn state(&self, key: &str) -> SlotState {
        let now = self.clock.now();
        match self.slots().get(key) {
            Some(Slot::Resolved(entry)) if entry.is_valid(now) => SlotState::Resolved,
            Some(Slot::Pending { .. }) => SlotState::Pending,
            _ => SlotState::Vacant,
        }
    }

    /// Inserts or overwrites `key`, stamping it with the current time.
    pub fn put(&self, key: &str, data: Value, ttl: Duration) {
        let entry = CacheEntry {
            key: key.to_string(),
            data,
            created_at: self.clock.now(),
            ttl,
        };
        let snapshot = {
            let mut slots = self.slots();
            slots.insert(key.to_string(), Slot::Resolved(entry));
            self.snapshot(&slots)
        };
        self.persist(snapshot);
    }

    pub fn remove(&self, key: &str) {
        let snapshot = {
            let mut slots = self.slots();
            match slots.remove(key) {
                Some(_) => self.snapshot(&slots),
                None => None,
            }
        };
        self.persist(snapshot);
    }

    /// Drops every entry, pending fetches included. Never suspends.
    pub fn clear(&self) {
        let (dropped, snapshot) = {
            let mut slots = self.slots();
            let n = slots.len();
            slots.clear();
            (n, self.snapshot(&slots))
        };
        debug!(dropped, "cache cleared");
        self.persist(snapshot);
    }

    /// Drops every entry whose key starts with `prefix`. Returns how many went.
    pub fn clear_prefix(&self, prefix: &str) -> usize {
        let (dropped, snapshot) = {
            let mut slots = self.slots();
            let before = slots.len();
            slots.retain(|key, _| !key.starts_with(prefix));
            let dropped = before - slots.len();
            let snapshot = if dropped > 0 {
                self.snapshot(&slots)
            } else {
                None
            };
            (dropped, snapshot)
        };
        debug!(prefix, dropped, "cache cleared by prefix");
        self.persist(snapshot);
        dropped
    }

    /// Number of live (unexpired or pending) slots.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.slots()
            .values()
            .filter(|slot| match slot {
                Slot::Resolved(entry) => entry.is_valid(now),
                Slot::Pending { .. } => true,
            })
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks `key` up on the fetch path. On a miss with nothing in flight,
    /// `begin` is handed a fresh fetch id and must return the shared future
    /// that will settle it; that future is parked in the slot before the lock
    /// is released, so a concurrent lookup joins it instead of starting
    /// another. `begin` runs under the lock: it must only build the future,
    /// never poll it or call back into the store.
    pub fn lookup_or_begin<F>(&self, key: &str, begin: F) -> Lookup
    where
        F: FnOnce(u64) -> SharedFetch,
    {
        let now = self.clock.now();
        let mut slots = self.slots();
        match slots.get(key) {
            Some(Slot::Resolved(entry)) if entry.is_valid(now) => {
                return Lookup::Hit(entry.data.clone());
            }
            Some(Slot::Pending { fetch, .. }) => return Lookup::Join(fetch.clone()),
            _ => {}
        }

        let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        let fetch = begin(id);
        slots.insert(
            key.to_string(),
            Slot::Pending {
                id,
                fetch: fetch.clone(),
            },
        );
        Lookup::Lead(fetch)
    }

    /// Settles the fetch `id` started for `key`.
    ///
    /// A success replaces the pending slot with a resolved entry. If the slot
    /// was cleared in the meantime the value still lands under its key. If a
    /// newer fetch or value owns the slot, it is left alone. A failure only
    /// removes its own pending slot.
    pub fn settle(&self, key: &str, id: u64, result: &Result<Value, CoreError>, ttl: Duration) {
        let snapshot = {
            let mut slots = self.slots();
            let owns_slot = match slots.get(key) {
                None => true,
                Some(Slot::Pending { id: current, .. }) => *current == id,
                Some(Slot::Resolved(_)) => false,
            };
            if !owns_slot {
                return;
            }
            match result {
                Ok(data) => {
                    let entry = CacheEntry {
                        key: key.to_string(),
                        data: data.clone(),
                        created_at: self.clock.now(),
                        ttl,
                    };
                    slots.insert(key.to_string(), Slot::Resolved(entry));
                    self.snapshot(&slots)
                }
                Err(_) => {
                    if slots.contains_key(key) {
                        slots.remove(key);
                    }
                    None
                }
            }
        };
        self.persist(snapshot);
    }

    /// Resolved entries plus the writer's turn. Both are taken while the
    /// slot map is still locked, so snapshots reach storage in the order
    /// they were taken.
    fn snapshot(&self, slots: &HashMap<String, Slot>) -> Option<Snapshot<'_>> {
        self.persistence.as_ref()?;
        let turn = self.write_turn.lock().unwrap_or_else(PoisonError::into_inner);
        Some(Snapshot {
            entries: resolved_entries(slots),
            _turn: turn,
        })
    }

    fn persist(&self, snapshot: Option<Snapshot<'_>>) {
        if let (Some(shim), Some(snapshot)) = (self.persistence.as_ref(), snapshot) {
            shim.save(&snapshot.entries);
        }
    }
}

struct Snapshot<'a> {
    entries: Vec<CacheEntry>,
    _turn: MutexGuard<'a, ()>,
}

fn resolved_entries(slots: &HashMap<String, Slot>) -> Vec<CacheEntry> {
    slots
        .values()
        .filter_map(|slot| match slot {
            Slot::Resolved(entry) => Some(entry.clone()),
            Slot::Pending { .. } => None,
        })
        .collect()
}
