//! Time source for creation and deletion stamps.

use chrono::{Local, NaiveDateTime};

/// Layout of every timestamp the service writes, e.g. `02/01/2006 15:04:05`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Provides the current time to the service.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// The current time formatted with [`TIMESTAMP_FORMAT`].
    fn now_string(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: NaiveDateTime,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at }
    }

    /// Parse `at` with [`TIMESTAMP_FORMAT`].
    pub fn parse(at: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(at, TIMESTAMP_FORMAT).map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.at
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }

    fn now_string(&self) -> String {
        (**self).now_string()
    }
}
