//! User service - CRUD orchestration over a whole-collection store.
//!
//! Every call re-reads the collection from the store; nothing is cached
//! between calls. Mutating calls hold a write lock for their entire
//! read-modify-write, so two writers never interleave on the same store.
//!
//! Deletion is soft: `delete` stamps `deleted_date` and the record stays in
//! the store. Deleted records are invisible to every other operation, but
//! their ids are never handed out again.
//!
//! ## Quick Start
//!
//! ```ignore
//! use user_records::{InMemoryStore, SystemClock, UserService};
//!
//! let service = UserService::new(InMemoryStore::new(), SystemClock);
//! let created = service.create(draft.validate()?)?;
//! let same = service.get(created.id)?;
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{ServiceError, INVALID_UPDATE};
use crate::filter::{self, Filter};
use crate::store::UserStore;
use crate::user::{NewUser, User, UserPatch};

/// CRUD operations over users, backed by store `S` and clock `C`.
pub struct UserService<S, C> {
    store: S,
    clock: C,
    write_lock: Mutex<()>,
}

impl<S: UserStore, C: Clock> UserService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All live users matching every filter, in stored order.
    pub fn list(&self, filters: &[Filter]) -> Result<Vec<User>, ServiceError> {
        let users = self.live_users()?;
        let users = filter::apply_all(users, filters);
        debug!(filters = filters.len(), found = users.len(), "listed users");
        Ok(users)
    }

    /// The live user with `id`.
    pub fn get(&self, id: u64) -> Result<User, ServiceError> {
        self.live_users()?
            .into_iter()
            .find(|user| user.id == id)
            .ok_or(ServiceError::NotFound(id))
    }

    /// Store a new user with the next id and a creation stamp.
    pub fn create(&self, new: NewUser) -> Result<User, ServiceError> {
        let _guard = self.lock_writes();
        let mut users = self.store.read()?;

        let id = next_id(&users).ok_or(ServiceError::IdsExhausted)?;
        let user = new.into_user(id, self.clock.now_string());
        users.push(user.clone());
        self.store.write(&users)?;

        info!(id, "user created");
        Ok(user)
    }

    /// Overwrite every mutable attribute of the live user `id`.
    pub fn replace(&self, id: u64, new: NewUser) -> Result<User, ServiceError> {
        self.modify(id, |user| user.assign(new))
            .inspect(|_| info!(id, "user replaced"))
    }

    /// Apply the fields present in `patch` to the live user `id`.
    ///
    /// A patch with nothing to change is rejected with `InvalidInput`, and one
    /// breaking the field rules with `Validation`, before the store is touched.
    pub fn update_fields(&self, id: u64, patch: UserPatch) -> Result<User, ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::InvalidInput(INVALID_UPDATE.to_string()));
        }
        patch.validate()?;
        self.modify(id, |user| patch.apply_to(user))
            .inspect(|_| info!(id, "user fields updated"))
    }

    /// Soft-delete the live user `id`. Deleting it again yields `NotFound`.
    pub fn delete(&self, id: u64) -> Result<(), ServiceError> {
        let deleted_at = self.clock.now_string();
        self.modify(id, |user| user.deleted_date = Some(deleted_at))?;
        info!(id, "user deleted");
        Ok(())
    }

    fn live_users(&self) -> Result<Vec<User>, ServiceError> {
        let mut users = self.store.read()?;
        users.retain(|user| !user.is_deleted());
        Ok(users)
    }

    /// Locked read-modify-write of one live user. Nothing is written when the
    /// user is missing.
    fn modify<F>(&self, id: u64, change: F) -> Result<User, ServiceError>
    where
        F: FnOnce(&mut User),
    {
        let _guard = self.lock_writes();
        let mut users = self.store.read()?;

        let user = users
            .iter_mut()
            .find(|user| user.id == id && !user.is_deleted())
            .ok_or(ServiceError::NotFound(id))?;
        change(user);
        let updated = user.clone();

        self.store.write(&users)?;
        Ok(updated)
    }

    /// The mutex guards no data, so a poisoned lock is still usable.
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// One past the highest id ever assigned, deleted records included.
/// `None` once `u64::MAX` is taken.
fn next_id(users: &[User]) -> Option<u64> {
    users.iter().map(|user| user.id).max().unwrap_or(0).checked_add(1)
}
