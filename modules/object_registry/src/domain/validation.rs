//! Validator compiler: declarative field options -> ordered executable checks

use crate::contract::{Constraint, FieldDefinition, FieldType, RegistryError, ValidationError, ValidationReport};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How a validator sequence reports violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Run every check and report all violations
    #[default]
    CollectAll,
    /// Stop at the first violation
    FailFast,
}

/// Named, registrable custom validation
///
/// `Ok(false)` rejects the value; an `Err` is reported as a rejection too.
#[async_trait]
pub trait ValidationStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self, value: &Value) -> anyhow::Result<bool>;
}

/// Strategies that field options may reference by name
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: Arc<RwLock<HashMap<String, Arc<dyn ValidationStrategy>>>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy, replacing any previous one with the same name
    pub fn register(&self, strategy: Arc<dyn ValidationStrategy>) {
        let name = strategy.name().to_string();
        tracing::debug!(strategy = %name, "Registered validation strategy");
        self.strategies.write().insert(name, strategy);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ValidationStrategy>> {
        self.strategies.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.read().contains_key(name)
    }
}

#[derive(Clone)]
enum Check {
    Required,
    Min(f64),
    Max(f64),
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    Custom {
        strategy: Arc<dyn ValidationStrategy>,
        message: Option<String>,
    },
}

/// One compiled check bound to a field
#[derive(Clone)]
pub struct Validator {
    field: String,
    check: Check,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("field", &self.field)
            .field("constraint", &self.constraint())
            .finish()
    }
}

impl Validator {
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Constraint this validator enforces
    pub fn constraint(&self) -> Constraint {
        match &self.check {
            Check::Required => Constraint::Required,
            Check::Min(min) => Constraint::Min(*min),
            Check::Max(max) => Constraint::Max(*max),
            Check::MinLength(len) => Constraint::MinLength(*len),
            Check::MaxLength(len) => Constraint::MaxLength(*len),
            Check::Pattern(re) => Constraint::Pattern(re.as_str().to_string()),
            Check::Custom { strategy, .. } => Constraint::Custom(strategy.name().to_string()),
        }
    }

    /// Check the field of `instance`, returning the violation if any
    pub async fn validate(&self, instance: &Value) -> Option<ValidationError> {
        let value = instance.get(&self.field).unwrap_or(&Value::Null);

        if let Check::Required = self.check {
            let missing = match value {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                _ => false,
            };
            return missing.then(|| {
                ValidationError::new(&self.field, value.clone(), Constraint::Required)
                    .with_message(format!("{} is required", self.field))
            });
        }

        // Optional values are only checked when present
        if value.is_null() {
            return None;
        }

        let violated = match &self.check {
            Check::Required => false,
            Check::Min(min) => value.as_f64().map_or(true, |n| n < *min),
            Check::Max(max) => value.as_f64().map_or(true, |n| n > *max),
            Check::MinLength(len) => value.as_str().map_or(true, |s| s.chars().count() < *len),
            Check::MaxLength(len) => value.as_str().map_or(true, |s| s.chars().count() > *len),
            Check::Pattern(re) => value.as_str().map_or(true, |s| !re.is_match(s)),
            Check::Custom { strategy, message } => {
                return match strategy.check(value).await {
                    Ok(true) => None,
                    Ok(false) => {
                        let error = ValidationError::new(&self.field, value.clone(), self.constraint());
                        Some(match message {
                            Some(message) => error.with_message(message.clone()),
                            None => error,
                        })
                    }
                    Err(e) => Some(
                        ValidationError::new(&self.field, value.clone(), self.constraint())
                            .with_message(format!(
                                "validator '{}' failed for {}: {e}",
                                strategy.name(),
                                self.field
                            )),
                    ),
                };
            }
        };

        violated.then(|| ValidationError::new(&self.field, value.clone(), self.constraint()))
    }
}

/// Compile field options into validators, in field-declaration order
pub fn compile(
    class_name: &str,
    fields: &IndexMap<String, FieldDefinition>,
    strategies: &StrategyRegistry,
) -> Result<Vec<Validator>, RegistryError> {
    let mut validators = Vec::new();

    for field in fields.values() {
        let options = &field.options;
        let mut push = |check: Check| {
            validators.push(Validator {
                field: field.name.clone(),
                check,
            });
        };

        if options.required {
            push(Check::Required);
        }

        if field.field_type.is_numeric() {
            if let Some(min) = options.min {
                push(Check::Min(min));
            }
            if let Some(max) = options.max {
                push(Check::Max(max));
            }
        }

        if field.field_type == FieldType::Text {
            if let Some(len) = options.min_length {
                push(Check::MinLength(len));
            }
            if let Some(len) = options.max_length {
                push(Check::MaxLength(len));
            }
            if let Some(pattern) = &options.pattern {
                let re = Regex::new(pattern).map_err(|e| RegistryError::InvalidPattern {
                    class: class_name.to_string(),
                    field: field.name.clone(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                push(Check::Pattern(re));
            }
        }

        if let Some(name) = &options.validator {
            let strategy = strategies.get(name).ok_or_else(|| RegistryError::UnknownValidator {
                class: class_name.to_string(),
                field: field.name.clone(),
                validator: name.clone(),
            })?;
            push(Check::Custom {
                strategy,
                message: options.message.clone(),
            });
        }
    }

    Ok(validators)
}

/// Run a validator sequence against one instance
pub async fn run(
    class_name: &str,
    validators: &[Validator],
    instance: &Value,
    mode: ValidationMode,
) -> ValidationReport {
    let mut report = ValidationReport::new(class_name);

    for validator in validators {
        if let Some(error) = validator.validate(instance).await {
            report.push(error);
            if mode == ValidationMode::FailFast {
                break;
            }
        }
    }

    report
}
