//! InMemoryStore - Vec-backed user store for testing and development.

use std::sync::{Arc, RwLock};

use super::{StoreError, UserStore};
use crate::user::User;

/// In-memory user store. Clone-friendly via Arc: clones share the collection.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `users`.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Copy of the current collection.
    pub fn snapshot(&self) -> Result<Vec<User>, StoreError> {
        self.read()
    }
}

impl UserStore for InMemoryStore {
    fn read(&self) -> Result<Vec<User>, StoreError> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(users.clone())
    }

    fn write(&self, users: &[User]) -> Result<(), StoreError> {
        let mut stored = self
            .users
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        *stored = users.to_vec();
        Ok(())
    }
}
