//! Attribute filtering over a user collection.
//!
//! Filterable attributes form a closed set ([`FilterField`]). Each field has a
//! declared [`FieldKind`] and a typed accessor, so a filter is checked against
//! the kind once, when it is built, and matching never inspects types at
//! runtime.
//!
//! ```ignore
//! let filters = vec![
//!     Filter::parse("firstname", "first")?,
//!     Filter::parse("age", "24")?,
//! ];
//! let adults_named_first = filter::apply_all(users, &filters);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::user::User;

/// A user attribute that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Id,
    Firstname,
    Lastname,
    Email,
    Age,
    Height,
    Active,
    CreatedDate,
}

/// How values of a field are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Bool,
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Int => write!(f, "integer"),
            FieldKind::Bool => write!(f, "boolean"),
            FieldKind::Text => write!(f, "string"),
        }
    }
}

/// Borrowed view of one attribute of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Int(i64),
    Bool(bool),
    Text(&'a str),
}

impl FilterField {
    pub const ALL: [FilterField; 8] = [
        FilterField::Id,
        FilterField::Firstname,
        FilterField::Lastname,
        FilterField::Email,
        FilterField::Age,
        FilterField::Height,
        FilterField::Active,
        FilterField::CreatedDate,
    ];

    /// The JSON / query-string name of the field.
    pub fn name(self) -> &'static str {
        match self {
            FilterField::Id => "id",
            FilterField::Firstname => "firstname",
            FilterField::Lastname => "lastname",
            FilterField::Email => "email",
            FilterField::Age => "age",
            FilterField::Height => "height",
            FilterField::Active => "active",
            FilterField::CreatedDate => "created_date",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FilterField::Id | FilterField::Age | FilterField::Height => FieldKind::Int,
            FilterField::Active => FieldKind::Bool,
            FilterField::Firstname
            | FilterField::Lastname
            | FilterField::Email
            | FilterField::CreatedDate => FieldKind::Text,
        }
    }

    /// Read this field from `user`.
    pub fn read(self, user: &User) -> FieldRef<'_> {
        match self {
            // ids stay far below i64::MAX; saturate rather than wrap
            FilterField::Id => FieldRef::Int(i64::try_from(user.id).unwrap_or(i64::MAX)),
            FilterField::Firstname => FieldRef::Text(&user.firstname),
            FilterField::Lastname => FieldRef::Text(&user.lastname),
            FilterField::Email => FieldRef::Text(&user.email),
            FilterField::Age => FieldRef::Int(user.age),
            FilterField::Height => FieldRef::Int(user.height),
            FilterField::Active => FieldRef::Bool(user.active),
            FilterField::CreatedDate => FieldRef::Text(&user.created_date),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterField {
    type Err = FilterError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        FilterField::ALL
            .into_iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| FilterError::UnknownField(name.to_string()))
    }
}

/// The value a field is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl FilterValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FilterValue::Int(_) => FieldKind::Int,
            FilterValue::Bool(_) => FieldKind::Bool,
            FilterValue::Text(_) => FieldKind::Text,
        }
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

/// Error building a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The name does not match any filterable field.
    UnknownField(String),
    /// The raw value could not be parsed as the field's kind.
    InvalidValue { field: FilterField, value: String },
    /// The typed value does not match the field's kind.
    KindMismatch {
        field: FilterField,
        expected: FieldKind,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::UnknownField(name) => write!(f, "unknown filter field: {}", name),
            FilterError::InvalidValue { field, value } => write!(
                f,
                "invalid value {:?} for {} (expected {})",
                value,
                field,
                field.kind()
            ),
            FilterError::KindMismatch { field, expected } => {
                write!(f, "filter on {} expects a {} value", field, expected)
            }
        }
    }
}

impl std::error::Error for FilterError {}

/// A single `(field, value)` narrowing criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    field: FilterField,
    value: FilterValue,
}

impl Filter {
    /// Build a filter, rejecting a value whose kind does not fit the field.
    pub fn new(field: FilterField, value: impl Into<FilterValue>) -> Result<Self, FilterError> {
        let value = value.into();
        if value.kind() != field.kind() {
            return Err(FilterError::KindMismatch {
                field,
                expected: field.kind(),
            });
        }
        Ok(Self { field, value })
    }

    /// Build a filter from a field name and a raw string, e.g. a query parameter.
    pub fn parse(name: &str, raw: &str) -> Result<Self, FilterError> {
        let field: FilterField = name.parse()?;
        let invalid = || FilterError::InvalidValue {
            field,
            value: raw.to_string(),
        };
        let value = match field.kind() {
            FieldKind::Int => FilterValue::Int(raw.trim().parse().map_err(|_| invalid())?),
            FieldKind::Bool => FilterValue::Bool(parse_bool(raw).ok_or_else(invalid)?),
            FieldKind::Text => FilterValue::Text(raw.to_string()),
        };
        Ok(Self { field, value })
    }

    pub fn field(&self) -> FilterField {
        self.field
    }

    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    /// Whether `user` satisfies this filter.
    pub fn matches(&self, user: &User) -> bool {
        match (self.field.read(user), &self.value) {
            (FieldRef::Int(actual), FilterValue::Int(wanted)) => actual == *wanted,
            (FieldRef::Bool(actual), FilterValue::Bool(wanted)) => actual == *wanted,
            (FieldRef::Text(actual), FilterValue::Text(wanted)) => actual.contains(wanted.as_str()),
            // unreachable: kinds are checked on construction
            _ => false,
        }
    }
}

/// Accepts the spellings `strconv.ParseBool`-style clients send.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Keep the users matching `filter`, preserving order.
pub fn apply(users: Vec<User>, filter: &Filter) -> Vec<User> {
    users.into_iter().filter(|user| filter.matches(user)).collect()
}

/// Apply each filter in turn; a user survives only if it matches all of them.
pub fn apply_all(users: Vec<User>, filters: &[Filter]) -> Vec<User> {
    filters.iter().fold(users, apply)
}
