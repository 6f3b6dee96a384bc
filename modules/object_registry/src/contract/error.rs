//! Contract error types for the object registry
//!
//! These errors are transport-agnostic and used for inter-module communication.

use std::fmt;

/// Registry errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Empty or invalid field set
    #[error("Cannot generate schema for '{class}': {reason}")]
    Schema { class: String, reason: String },

    /// Cycle in the dependency graph
    #[error("Circular dependency detected involving class '{class}'")]
    CircularDependency { class: String },

    /// Unknown class name
    #[error("Class '{class}' is not registered; call register() for it first")]
    NotRegistered { class: String },

    /// One or more field violations
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    #[error("Invalid pattern '{pattern}' on {class}.{field}: {reason}")]
    InvalidPattern {
        class: String,
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("Unknown validator '{validator}' on {class}.{field}")]
    UnknownValidator {
        class: String,
        field: String,
        validator: String,
    },

    /// Collection construction failed
    #[error("Failed to create collection for '{class}': {reason}")]
    Collection { class: String, reason: String },

    /// System table or schema sync failure
    #[error("Storage error: {reason}")]
    Storage { reason: String },
}

impl RegistryError {
    pub(crate) fn not_registered(class: &str) -> Self {
        Self::NotRegistered {
            class: class.to_string(),
        }
    }

    pub(crate) fn storage(err: anyhow::Error) -> Self {
        Self::Storage {
            reason: format!("{err:#}"),
        }
    }
}

/// Constraint a value was checked against
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Required,
    Min(f64),
    Max(f64),
    MinLength(usize),
    MaxLength(usize),
    Pattern(String),
    /// Named validation strategy
    Custom(String),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "a non-empty value"),
            Self::Min(min) => write!(f, "a number >= {min}"),
            Self::Max(max) => write!(f, "a number <= {max}"),
            Self::MinLength(len) => write!(f, "at least {len} characters"),
            Self::MaxLength(len) => write!(f, "at most {len} characters"),
            Self::Pattern(pattern) => write!(f, "a value matching /{pattern}/"),
            Self::Custom(name) => write!(f, "a value accepted by '{name}'"),
        }
    }
}

/// A single field violation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    /// Offending value, `Null` when missing
    pub value: serde_json::Value,
    pub constraint: Constraint,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, value: serde_json::Value, constraint: Constraint) -> Self {
        let field = field.into();
        let message = format!("{field} must be {constraint}");
        Self {
            field,
            value,
            constraint,
            message,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Accumulated violations from one validation run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub class: String,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Violations for one field
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Raise the report as an error if it holds any violation
    pub fn into_result(self) -> Result<(), RegistryError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(RegistryError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{} ({})", self.class, messages.join(", "))
    }
}
