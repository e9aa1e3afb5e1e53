//! The user record and the input shapes that create or modify it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum age accepted for a user.
pub const MIN_AGE: i64 = 18;

/// A persisted user.
///
/// `deleted_date` is the soft-delete marker: once set, the record is kept in
/// the store but hidden from every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub age: i64,
    pub height: i64,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub created_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_date: Option<String>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_date.is_some()
    }

    /// Overwrite every mutable attribute. `id` and `created_date` are kept.
    pub(crate) fn assign(&mut self, new: NewUser) {
        self.firstname = new.firstname;
        self.lastname = new.lastname;
        self.email = new.email;
        self.age = new.age;
        self.height = new.height;
        self.active = new.active;
    }
}

/// Validated attributes for creating or replacing a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub age: i64,
    pub height: i64,
    pub active: bool,
}

impl NewUser {
    pub(crate) fn into_user(self, id: u64, created_date: String) -> User {
        User {
            id,
            firstname: self.firstname,
            lastname: self.lastname,
            email: self.email,
            age: self.age,
            height: self.height,
            active: self.active,
            created_date,
            deleted_date: None,
        }
    }
}

/// A user body as received over the wire, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl UserDraft {
    /// Check required fields and bounds, reporting every violation at once.
    pub fn validate(self) -> Result<NewUser, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let firstname = required_text("firstname", self.firstname, &mut violations);
        let lastname = required_text("lastname", self.lastname, &mut violations);
        let email = required_text("email", self.email, &mut violations);

        let age = match self.age {
            None => {
                violations.push(FieldViolation::required("age"));
                0
            }
            Some(age) if age < MIN_AGE => {
                violations.push(FieldViolation::min("age", MIN_AGE));
                age
            }
            Some(age) => age,
        };

        let height = match self.height {
            None | Some(0) => {
                violations.push(FieldViolation::required("height"));
                0
            }
            Some(height) if height < 0 => {
                violations.push(FieldViolation::min("height", 1));
                height
            }
            Some(height) => height,
        };

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(NewUser {
            firstname,
            lastname,
            email,
            age,
            height,
            active: self.active.unwrap_or(false),
        })
    }
}

fn required_text(
    field: &'static str,
    value: Option<String>,
    violations: &mut Vec<FieldViolation>,
) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            violations.push(FieldViolation::required(field));
            String::new()
        }
    }
}

/// Partial update restricted to `lastname` and `age`.
///
/// An empty string or a zero age counts as "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
}

impl UserPatch {
    pub fn lastname(&self) -> Option<&str> {
        self.lastname.as_deref().filter(|s| !s.is_empty())
    }

    pub fn age(&self) -> Option<i64> {
        self.age.filter(|age| *age != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.lastname().is_none() && self.age().is_none()
    }

    /// Check the supplied fields against the same rules as a full draft.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        if self.lastname().is_some_and(|lastname| lastname.trim().is_empty()) {
            violations.push(FieldViolation::required("lastname"));
        }
        if self.age().is_some_and(|age| age < MIN_AGE) {
            violations.push(FieldViolation::min("age", MIN_AGE));
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    pub(crate) fn apply_to(&self, user: &mut User) {
        if let Some(lastname) = self.lastname() {
            user.lastname = lastname.to_string();
        }
        if let Some(age) = self.age() {
            user.age = age;
        }
    }
}

/// A single failed field check, shaped for the `fields` array of error bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub tag: String,
    pub message: String,
}

impl FieldViolation {
    pub fn required(field: &str) -> Self {
        Self {
            field: field.to_string(),
            tag: "required".to_string(),
            message: "field is required".to_string(),
        }
    }

    pub fn min(field: &str, min: i64) -> Self {
        Self {
            field: field.to_string(),
            tag: "min".to_string(),
            message: format!("must be at least {}", min),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.field, self.tag, self.message)
    }
}
