//! User records over a whole-collection store.
//!
//! - [`UserStore`] reads and writes the entire collection ([`JsonFileStore`],
//!   [`InMemoryStore`], and `SqliteStore` behind the `sqlite` feature).
//! - [`filter`] narrows a collection by typed `(field, value)` criteria.
//! - [`UserService`] implements list / get / create / replace / patch /
//!   soft-delete on top of a store and a [`Clock`].
//! - `http` exposes the service as JSON over HTTP (`http` feature).

pub mod clock;
pub mod config;
mod error;
pub mod filter;
pub mod logging;
mod service;
pub mod store;
mod user;

#[cfg(feature = "http")]
pub mod http;

pub use clock::{Clock, FixedClock, SystemClock, TIMESTAMP_FORMAT};
pub use config::{Config, ConfigError, LogFormat, StoreKind};
pub use error::{ServiceError, INVALID_UPDATE};
pub use filter::{FieldKind, Filter, FilterError, FilterField, FilterValue};
pub use service::UserService;
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
pub use store::{InMemoryStore, JsonFileStore, StoreError, UserStore};
pub use user::{FieldViolation, NewUser, User, UserDraft, UserPatch, MIN_AGE};
