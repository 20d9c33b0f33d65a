//! Per-user draft sessions.
//!
//! One draft per user, created lazily on first contact and kept for the
//! lifetime of the process. The outer map lock only guards
//! insert-if-absent; each draft has its own lock, held across a whole
//! read-modify-write so messages from one user never interleave.
//!
//! A panic while a lock is held does not lock anyone out: drafts are plain
//! data written one field at a time, so a poisoned guard is taken over as is.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use capify_core::{Draft, UserId};
use tracing::{debug, warn};

/// Concurrent map from user to that user's draft.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, Arc<Mutex<Draft>>>>,
}

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
        warn!("Recovering lock poisoned by a panicked handler");
        poisoned.into_inner()
    })
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the draft slot for `user`, creating an empty one if needed.
    fn slot(&self, user: &UserId) -> Arc<Mutex<Draft>> {
        let mut sessions = relock(&self.sessions);
        let slot = sessions.entry(user.clone()).or_insert_with(|| {
            debug!(user = %user, "Created draft session");
            Arc::new(Mutex::new(Draft::default()))
        });
        Arc::clone(slot)
    }

    /// Run `f` with exclusive access to the user's draft.
    ///
    /// The draft lock is held for the whole call and released when `f`
    /// returns or unwinds.
    pub fn with_draft<R>(&self, user: &UserId, f: impl FnOnce(&mut Draft) -> R) -> R {
        let slot = self.slot(user);
        let mut draft = relock(&slot);
        f(&mut draft)
    }

    /// Current draft for `user`, creating the session if needed.
    pub fn draft(&self, user: &UserId) -> Draft {
        self.with_draft(user, |draft| draft.clone())
    }

    /// Current draft for `user` without creating a session.
    pub fn snapshot(&self, user: &UserId) -> Option<Draft> {
        let slot = Arc::clone(relock(&self.sessions).get(user)?);
        let draft = relock(&slot).clone();
        Some(draft)
    }

    /// Every session, ordered by user id.
    pub fn all(&self) -> Vec<(UserId, Draft)> {
        let slots: Vec<(UserId, Arc<Mutex<Draft>>)> = relock(&self.sessions)
            .iter()
            .map(|(user, slot)| (user.clone(), Arc::clone(slot)))
            .collect();

        let mut out: Vec<(UserId, Draft)> = slots
            .into_iter()
            .map(|(user, slot)| {
                let draft = relock(&slot).clone();
                (user, draft)
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn contains(&self, user: &UserId) -> bool {
        relock(&self.sessions).contains_key(user)
    }

    pub fn len(&self) -> usize {
        relock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Tests
// =============================================================================
