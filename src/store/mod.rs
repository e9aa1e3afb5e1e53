//! Stores - whole-collection persistence for users.
//!
//! A store reads and writes the entire user collection at once; there is no
//! partial or streaming access. Every `write` fully replaces what was
//! persisted before.
//!
//! ## Example
//!
//! ```ignore
//! use user_records::{JsonFileStore, UserStore};
//!
//! let store = JsonFileStore::new("./users-db.json").with_backup("./users-backup.json");
//! let mut users = store.read()?;
//! users.retain(|u| u.active);
//! store.write(&users)?;
//! ```

mod file;
mod in_memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use std::fmt;

use crate::user::User;

/// Whole-collection storage for users.
pub trait UserStore: Send + Sync {
    /// Read the full collection.
    fn read(&self) -> Result<Vec<User>, StoreError>;

    /// Replace the full collection.
    fn write(&self, users: &[User]) -> Result<(), StoreError>;
}

impl<S: UserStore + ?Sized> UserStore for std::sync::Arc<S> {
    fn read(&self) -> Result<Vec<User>, StoreError> {
        (**self).read()
    }

    fn write(&self, users: &[User]) -> Result<(), StoreError> {
        (**self).write(users)
    }
}

impl<S: UserStore + ?Sized> UserStore for Box<S> {
    fn read(&self) -> Result<Vec<User>, StoreError> {
        (**self).read()
    }

    fn write(&self, users: &[User]) -> Result<(), StoreError> {
        (**self).write(users)
    }
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing medium could not be read or written.
    Io(String),
    /// The persisted content could not be decoded.
    Corrupt(String),
    /// Database-level failure.
    Database(String),
    /// An in-process lock was poisoned.
    LockPoisoned(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "store io error: {}", msg),
            StoreError::Corrupt(msg) => write!(f, "store content is corrupt: {}", msg),
            StoreError::Database(msg) => write!(f, "store database error: {}", msg),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

pub use file::JsonFileStore;
pub use in_memory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
