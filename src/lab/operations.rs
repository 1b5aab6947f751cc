//! LabOperations - the lab store: requests, technicians and schedule.
//!
//! All three collections live behind one lock. Every mutation runs and is
//! persisted under a single write guard, and every collection it touched is
//! written in one snapshot batch, so a two-table change such as
//! `assign_request` never lands half way.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(feature = "emitter")]
use std::sync::Mutex;

use chrono::{DateTime, Utc};
#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;
use mockable::Clock;
use tracing::debug;

use crate::error::LabError;
use crate::storage::{Collection, KeyValueStore, PersistentStore};

use super::fixtures;
use super::request::{clamp_progress, Request, RequestPatch, RequestStatus, StatusExtras};
use super::schedule::{NewScheduleEntry, ScheduleEntry, SchedulePatch, ScheduleSequence};
use super::stats::LabStats;
use super::technician::{Technician, TechnicianStatus};

/// Clock shared by the store and the wizard sessions.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// The three lab collections as plain data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabCollections {
    pub requests: Vec<Request>,
    pub technicians: Vec<Technician>,
    pub schedule: Vec<ScheduleEntry>,
}

impl LabCollections {
    /// The seed data used when storage is empty.
    pub fn fixtures() -> Self {
        Self {
            requests: fixtures::requests(),
            technicians: fixtures::technicians(),
            schedule: fixtures::schedule(),
        }
    }

    /// Assign a request to a technician.
    ///
    /// Returns the collections touched, or None if either id is unknown.
    fn assign(
        &mut self,
        request_id: &str,
        technician_id: &str,
    ) -> Result<Option<Vec<Changed>>, LabError> {
        let Some(technician) = find_mut(&mut self.technicians, technician_id) else {
            return Ok(None);
        };
        let Some(request) = find_mut(&mut self.requests, request_id) else {
            return Ok(None);
        };
        ensure_transition(request, RequestStatus::InProgress)?;

        request.assign_to(technician_id);
        let mut changed = vec![Changed::Requests];
        if technician.mark_busy() {
            changed.push(Changed::Technicians);
        }
        Ok(Some(changed))
    }
}

/// Which collection a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Changed {
    Requests,
    Technicians,
    Schedule,
}

impl Changed {
    const fn key(self) -> &'static str {
        match self {
            Changed::Requests => Request::KEY,
            Changed::Technicians => Technician::KEY,
            Changed::Schedule => ScheduleEntry::KEY,
        }
    }
}

struct LabState {
    collections: LabCollections,
    schedule_seq: ScheduleSequence,
}

/// The lab operations store.
///
/// Construct once per process and share by reference (or `Arc`).
pub struct LabOperations<S> {
    store: PersistentStore<S>,
    clock: SharedClock,
    state: RwLock<LabState>,
    #[cfg(feature = "emitter")]
    notifier: Mutex<EventEmitter>,
}

impl<S: KeyValueStore> LabOperations<S> {
    /// Load the collections from `backend`, seeding fixtures for any
    /// collection that is missing or unreadable.
    pub fn open(backend: S, clock: SharedClock) -> Self {
        let store = PersistentStore::new(backend);
        let collections = LabCollections {
            requests: store.load_collection(fixtures::requests()),
            technicians: store.load_collection(fixtures::technicians()),
            schedule: store.load_collection(fixtures::schedule()),
        };
        debug!(
            requests = collections.requests.len(),
            technicians = collections.technicians.len(),
            schedule = collections.schedule.len(),
            "lab store opened"
        );
        Self::from_parts(store, clock, collections)
    }

    /// Replace whatever `backend` holds with `collections` and open on them.
    pub fn seeded(backend: S, clock: SharedClock, collections: LabCollections) -> Self {
        let store = PersistentStore::new(backend);
        store
            .batch()
            .collection(&collections.requests)
            .collection(&collections.technicians)
            .collection(&collections.schedule)
            .commit_or_log();
        Self::from_parts(store, clock, collections)
    }

    fn from_parts(store: PersistentStore<S>, clock: SharedClock, collections: LabCollections) -> Self {
        let schedule_seq = ScheduleSequence::from_entries(&collections.schedule);
        Self {
            store,
            clock,
            state: RwLock::new(LabState {
                collections,
                schedule_seq,
            }),
            #[cfg(feature = "emitter")]
            notifier: Mutex::new(EventEmitter::new()),
        }
    }

    /// Get a reference to the persistence adapter.
    pub fn store(&self) -> &PersistentStore<S> {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    /// Merge `patch` into the request with `id`.
    pub fn update_request(&self, id: &str, patch: RequestPatch) -> Result<Option<Request>, LabError> {
        self.mutate("update_request", |state, _| {
            let Some(request) = find_mut(&mut state.collections.requests, id) else {
                return Ok((None, vec![]));
            };
            patch.apply(request);
            Ok((Some(request.clone()), vec![Changed::Requests]))
        })
    }

    /// Put a technician on a request: In Progress, progress 10, and the
    /// technician goes Busy if they were Available.
    ///
    /// Unknown request or technician ids change nothing and return None.
    pub fn assign_request(
        &self,
        request_id: &str,
        technician_id: &str,
    ) -> Result<Option<Request>, LabError> {
        self.mutate("assign_request", |state, _| {
            let Some(changed) = state.collections.assign(request_id, technician_id)? else {
                debug!(request_id, technician_id, "assign_request: unknown id, nothing changed");
                return Ok((None, vec![]));
            };
            let request = find(&state.collections.requests, request_id).cloned();
            Ok((request, changed))
        })
    }

    /// Move a request to `status`, recording `extras` and deriving the
    /// completion / rejection fields.
    pub fn update_request_status(
        &self,
        id: &str,
        status: RequestStatus,
        extras: StatusExtras,
    ) -> Result<Option<Request>, LabError> {
        self.mutate("update_request_status", |state, now| {
            let Some(request) = find_mut(&mut state.collections.requests, id) else {
                return Ok((None, vec![]));
            };
            ensure_transition(request, status)?;
            request.apply_status(status, extras, now);
            Ok((Some(request.clone()), vec![Changed::Requests]))
        })
    }

    /// Set progress, clamped to 0..=100.
    pub fn update_request_progress(
        &self,
        id: &str,
        progress: i64,
    ) -> Result<Option<Request>, LabError> {
        self.mutate("update_request_progress", |state, _| {
            let Some(request) = find_mut(&mut state.collections.requests, id) else {
                return Ok((None, vec![]));
            };
            request.progress = clamp_progress(progress);
            Ok((Some(request.clone()), vec![Changed::Requests]))
        })
    }

    // -------------------------------------------------------------------------
    // Technicians
    // -------------------------------------------------------------------------

    /// Set a technician's status. Completing a request does not release its
    /// technician; callers do that here.
    pub fn update_technician_status(
        &self,
        id: &str,
        status: TechnicianStatus,
    ) -> Result<Option<Technician>, LabError> {
        self.mutate("update_technician_status", |state, _| {
            let Some(technician) = find_mut(&mut state.collections.technicians, id) else {
                return Ok((None, vec![]));
            };
            technician.status = status;
            Ok((Some(technician.clone()), vec![Changed::Technicians]))
        })
    }

    // -------------------------------------------------------------------------
    // Schedule
    // -------------------------------------------------------------------------

    /// Append a schedule entry with the next `SCH-NNN` id.
    ///
    /// If the referenced request has no technician yet it is assigned to the
    /// entry's technician in the same write. A slot ending before it starts
    /// is refused.
    pub fn add_schedule_item(&self, new_entry: NewScheduleEntry) -> Result<ScheduleEntry, LabError> {
        self.mutate("add_schedule_item", |state, _| {
            if new_entry.end < new_entry.start {
                return Err(LabError::InvertedSlot {
                    request_id: new_entry.request_id,
                });
            }
            let entry = new_entry.into_entry(state.schedule_seq.next_id());
            let mut changed = vec![Changed::Schedule];

            let unassigned = find(&state.collections.requests, &entry.request_id)
                .is_some_and(|request| request.assigned_to.is_none());
            if unassigned {
                match state
                    .collections
                    .assign(&entry.request_id, &entry.technician_id)
                {
                    Ok(Some(assigned)) => changed.extend(assigned),
                    Ok(None) => debug!(
                        technician_id = %entry.technician_id,
                        "add_schedule_item: unknown technician, request left unassigned"
                    ),
                    Err(err) => debug!(
                        error = %err,
                        "add_schedule_item: request left unassigned"
                    ),
                }
            }

            state.collections.schedule.push(entry.clone());
            Ok((entry, changed))
        })
    }

    /// Merge `patch` into the schedule entry with `id`.
    ///
    /// A patch that would leave the slot ending before it starts is refused
    /// and the entry is left as it was.
    pub fn update_schedule_item(
        &self,
        id: &str,
        patch: SchedulePatch,
    ) -> Result<Option<ScheduleEntry>, LabError> {
        self.mutate("update_schedule_item", |state, _| {
            let Some(entry) = find_mut(&mut state.collections.schedule, id) else {
                return Ok((None, vec![]));
            };
            let mut merged = entry.clone();
            patch.apply(&mut merged);
            if merged.end < merged.start {
                return Err(LabError::InvertedSlot {
                    request_id: merged.request_id,
                });
            }
            *entry = merged;
            Ok((Some(entry.clone()), vec![Changed::Schedule]))
        })
    }

    /// Remove the schedule entry with `id`. Returns true if it existed.
    pub fn delete_schedule_item(&self, id: &str) -> Result<bool, LabError> {
        self.mutate("delete_schedule_item", |state, _| {
            let before = state.collections.schedule.len();
            state.collections.schedule.retain(|entry| entry.id != id);
            if state.collections.schedule.len() == before {
                return Ok((false, vec![]));
            }
            Ok((true, vec![Changed::Schedule]))
        })
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Dashboard statistics as of the clock's current time.
    pub fn get_stats(&self) -> Result<LabStats, LabError> {
        let now = self.clock.utc();
        let state = self.read_state("get_stats")?;
        Ok(LabStats::compute(&state.collections.requests, now))
    }

    /// Copy of all three collections.
    pub fn snapshot(&self) -> Result<LabCollections, LabError> {
        Ok(self.read_state("snapshot")?.collections.clone())
    }

    pub fn requests(&self) -> Result<Vec<Request>, LabError> {
        self.select_requests("requests", |_| true)
    }

    pub fn technicians(&self) -> Result<Vec<Technician>, LabError> {
        Ok(self.read_state("technicians")?.collections.technicians.clone())
    }

    pub fn schedule(&self) -> Result<Vec<ScheduleEntry>, LabError> {
        Ok(self.read_state("schedule")?.collections.schedule.clone())
    }

    pub fn request(&self, id: &str) -> Result<Option<Request>, LabError> {
        Ok(find(&self.read_state("request")?.collections.requests, id).cloned())
    }

    pub fn technician(&self, id: &str) -> Result<Option<Technician>, LabError> {
        Ok(find(&self.read_state("technician")?.collections.technicians, id).cloned())
    }

    pub fn requests_with_status(&self, status: RequestStatus) -> Result<Vec<Request>, LabError> {
        self.select_requests("requests_with_status", |r| r.status == status)
    }

    /// Requests submitted by one customer (the customer portal view).
    pub fn requests_for_customer(&self, customer: &str) -> Result<Vec<Request>, LabError> {
        self.select_requests("requests_for_customer", |r| r.customer == customer)
    }

    pub fn requests_for_technician(&self, technician_id: &str) -> Result<Vec<Request>, LabError> {
        self.select_requests("requests_for_technician", |r| {
            r.assigned_to.as_deref() == Some(technician_id)
        })
    }

    pub fn schedule_for_technician(
        &self,
        technician_id: &str,
    ) -> Result<Vec<ScheduleEntry>, LabError> {
        let state = self.read_state("schedule_for_technician")?;
        let mut entries: Vec<ScheduleEntry> = state
            .collections
            .schedule
            .iter()
            .filter(|entry| entry.technician_id == technician_id)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.start);
        Ok(entries)
    }

    /// The lab queue: open requests, High priority first, then oldest
    /// submission, then id.
    pub fn queue(&self) -> Result<Vec<Request>, LabError> {
        let mut queue = self.select_requests("queue", |r| r.status.is_open())?;
        queue.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.date.cmp(&b.date))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(queue)
    }

    // -------------------------------------------------------------------------
    // Change notifications
    // -------------------------------------------------------------------------

    /// Register a listener for changes to one collection, keyed by its
    /// storage key (e.g. `"lab_requests"`). The listener receives the
    /// operation name on its own thread. Returns the listener id.
    #[cfg(feature = "emitter")]
    pub fn subscribe<F>(&self, collection: &str, listener: F) -> Result<String, LabError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let mut notifier = self
            .notifier
            .lock()
            .map_err(|_| LabError::LockPoisoned("subscribe"))?;
        Ok(notifier.on(collection, listener))
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, changed: &[Changed], operation: &str) {
        if let Ok(mut notifier) = self.notifier.lock() {
            for collection in changed {
                notifier.emit(collection.key(), operation.to_string());
            }
        }
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _changed: &[Changed], _operation: &str) {}

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Run `apply` under the write lock, persist what it reports as changed
    /// before releasing the lock, then notify listeners.
    fn mutate<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut LabState, DateTime<Utc>) -> Result<(T, Vec<Changed>), LabError>,
    ) -> Result<T, LabError> {
        let now = self.clock.utc();
        let (value, changed) = {
            let mut state = self.write_state(operation)?;
            let (value, changed) = apply(&mut *state, now)?;
            if !changed.is_empty() {
                self.persist(&state.collections, &changed);
            }
            (value, changed)
        };

        if !changed.is_empty() {
            debug!(operation, ?changed, "lab collections changed");
            self.notify(&changed, operation);
        }
        Ok(value)
    }

    fn persist(&self, collections: &LabCollections, changed: &[Changed]) {
        let mut batch = self.store.batch();
        for collection in changed {
            batch = match collection {
                Changed::Requests => batch.collection(&collections.requests),
                Changed::Technicians => batch.collection(&collections.technicians),
                Changed::Schedule => batch.collection(&collections.schedule),
            };
        }
        batch.commit_or_log();
    }

    fn select_requests(
        &self,
        operation: &'static str,
        predicate: impl Fn(&Request) -> bool,
    ) -> Result<Vec<Request>, LabError> {
        let state = self.read_state(operation)?;
        Ok(state
            .collections
            .requests
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect())
    }

    fn read_state(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, LabState>, LabError> {
        self.state
            .read()
            .map_err(|_| LabError::LockPoisoned(operation))
    }

    fn write_state(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, LabState>, LabError> {
        self.state
            .write()
            .map_err(|_| LabError::LockPoisoned(operation))
    }
}

fn find<'a, C: Collection>(items: &'a [C], id: &str) -> Option<&'a C> {
    items.iter().find(|item| item.id() == id)
}

fn find_mut<'a, C: Collection>(items: &'a mut [C], id: &str) -> Option<&'a mut C> {
    items.iter_mut().find(|item| item.id() == id)
}

fn ensure_transition(request: &Request, to: RequestStatus) -> Result<(), LabError> {
    if request.status.can_transition_to(to) {
        Ok(())
    } else {
        Err(LabError::IllegalTransition {
            id: request.id.clone(),
            from: request.status,
            to,
        })
    }
}
