use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{ObjectId, Value};

pub const ERROR_CODE_REGISTRY_VERSION: u32 = 1;

/// Published code table: `(code, name, description)`. Append only.
const ALL_ERROR_CODES: &[(&str, &str, &str)] = &[
    (
        "SELFISH-1001",
        "immutability_violation",
        "mutation of a frozen prototype, a read-only attribute or a non-configurable attribute",
    ),
    (
        "SELFISH-1002",
        "not_callable",
        "called attribute does not hold a method",
    ),
    (
        "SELFISH-1003",
        "missing_setter",
        "assignment through an accessor without a setter",
    ),
    (
        "SELFISH-1004",
        "lineage_too_deep",
        "extend would exceed the configured lineage depth",
    ),
    ("SELFISH-2001", "thrown", "value raised by user code"),
    ("SELFISH-2002", "message", "failure reported by user code as text"),
    ("SELFISH-3001", "config", "invalid space configuration"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCodeEntry {
    pub code: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCodeRegistry {
    pub version: u32,
    pub entries: Vec<ErrorCodeEntry>,
}

/// Snapshot of every assigned error code, for hosts that publish or pin them.
pub fn error_code_registry() -> ErrorCodeRegistry {
    ErrorCodeRegistry {
        version: ERROR_CODE_REGISTRY_VERSION,
        entries: ALL_ERROR_CODES
            .iter()
            .map(|(code, name, description)| ErrorCodeEntry {
                code: code.to_string(),
                name: name.to_string(),
                description: description.to_string(),
            })
            .collect(),
    }
}

/// Kind of mutation that was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    Add,
    Assign,
    Delete,
    Redefine,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Assign => "assign",
            Self::Delete => "delete",
            Self::Redefine => "redefine",
        })
    }
}

/// Why a mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCause {
    FrozenPrototype,
    ReadOnlyAttribute,
    NonConfigurableAttribute,
}

impl fmt::Display for ViolationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FrozenPrototype => "object is a frozen prototype",
            Self::ReadOnlyAttribute => "attribute is read-only",
            Self::NonConfigurableAttribute => "attribute is non-configurable",
        })
    }
}

/// Errors from object model operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjectError {
    #[error("cannot {operation} attribute `{attribute}` on {object}: {cause}")]
    ImmutabilityViolation {
        object: ObjectId,
        attribute: String,
        operation: Mutation,
        cause: ViolationCause,
    },
    #[error("attribute `{attribute}` on {object} is not callable (found {found})")]
    NotCallable {
        object: ObjectId,
        attribute: String,
        found: &'static str,
    },
    #[error("accessor `{attribute}` on {object} has no setter")]
    MissingSetter { object: ObjectId, attribute: String },
    #[error("lineage depth {depth} exceeds max {max}")]
    LineageTooDeep { depth: usize, max: usize },
    /// A value raised by user code, e.g. a failing `initialize`.
    #[error("uncaught {0}")]
    Thrown(Value),
    #[error("{0}")]
    Message(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ObjectError {
    pub fn immutable(
        object: ObjectId,
        attribute: impl Into<String>,
        operation: Mutation,
        cause: ViolationCause,
    ) -> Self {
        Self::ImmutabilityViolation {
            object,
            attribute: attribute.into(),
            operation,
            cause,
        }
    }

    pub fn thrown(value: impl Into<Value>) -> Self {
        Self::Thrown(value.into())
    }

    pub fn is_immutability_violation(&self) -> bool {
        matches!(self, Self::ImmutabilityViolation { .. })
    }

    /// Stable error code. Assigned codes are permanent and never reused.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ImmutabilityViolation { .. } => "SELFISH-1001",
            Self::NotCallable { .. } => "SELFISH-1002",
            Self::MissingSetter { .. } => "SELFISH-1003",
            Self::LineageTooDeep { .. } => "SELFISH-1004",
            Self::Thrown(_) => "SELFISH-2001",
            Self::Message(_) => "SELFISH-2002",
            Self::Config(_) => "SELFISH-3001",
        }
    }
}
