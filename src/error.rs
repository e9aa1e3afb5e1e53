use std::error::Error;
use std::fmt;

use crate::filter::FilterError;
use crate::store::StoreError;
use crate::user::FieldViolation;

/// Message for a patch that carries nothing to change.
pub const INVALID_UPDATE: &str = "user modification is not valid";

/// Error type for user service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No live user has this id.
    NotFound(u64),
    /// The request was malformed (empty patch and the like).
    InvalidInput(String),
    /// One or more user fields failed validation.
    Validation(Vec<FieldViolation>),
    /// A filter could not be built.
    Filter(FilterError),
    /// The store failed to read or write.
    Store(StoreError),
    /// Every id up to `u64::MAX` has been assigned.
    IdsExhausted,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::NotFound(id) => write!(f, "user {} not found", id),
            ServiceError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            ServiceError::Validation(violations) => {
                write!(f, "some fields are invalid: ")?;
                for (i, violation) in violations.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", violation)?;
                }
                Ok(())
            }
            ServiceError::Filter(e) => write!(f, "invalid filter: {}", e),
            ServiceError::Store(e) => write!(f, "store error: {}", e),
            ServiceError::IdsExhausted => write!(f, "no user ids left to assign"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServiceError::Filter(e) => Some(e),
            ServiceError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Store(err)
    }
}

impl From<FilterError> for ServiceError {
    fn from(err: FilterError) -> Self {
        ServiceError::Filter(err)
    }
}

impl From<Vec<FieldViolation>> for ServiceError {
    fn from(violations: Vec<FieldViolation>) -> Self {
        ServiceError::Validation(violations)
    }
}

impl ServiceError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 404,
            ServiceError::InvalidInput(_) => 400,
            ServiceError::Validation(_) => 400,
            ServiceError::Filter(_) => 400,
            ServiceError::Store(_) => 500,
            ServiceError::IdsExhausted => 500,
        }
    }
}
