//! Rule-based validation of documents through field paths.
//!
//! A [`Validator`] pairs field paths with [`Rule`]s. Each path is walked
//! against the document, and every rule is checked against every observation
//! the walk produces, so `items[].name` checks the name of each item.
//!
//! # Example
//!
//! ```
//! use fieldwalk::validation::{Rule, Validator};
//! use fieldwalk::value::Value;
//!
//! let validator = Validator::new()
//!     .field("users[].email", vec![Rule::Required, Rule::String])
//!     .unwrap();
//!
//! let data: Value = serde_json::from_str(r#"{"users": [{"email": "a@b.c"}, {"email": 4}]}"#).unwrap();
//! let violations = validator.validate(&data);
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].path, "users[1].email");
//! assert_eq!(violations[0].rule, "string");
//! ```

pub mod rules;
pub mod schema;

pub use rules::Rule;
pub use schema::Schema;

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::path::{Context, GrammarError, Outcome, Path, SegmentKind};
use crate::value::Value;

/// Rules attached to one field path.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub path: Path,
    pub rules: Vec<Rule>,
}

/// A failed rule for one concrete location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// The declared field path.
    pub field: String,
    /// The concrete location the violation applies to.
    pub path: String,
    pub rule: String,
    pub outcome: Outcome,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: failed '{}' ({})", self.path, self.rule, self.outcome)
    }
}

/// Validates documents against a set of field rules.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    fields: Vec<FieldRules>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds rules for a field given as path text.
    pub fn field(mut self, path: &str, rules: Vec<Rule>) -> Result<Self, GrammarError> {
        let path = Path::parse(path)?;
        self.fields.push(FieldRules { path, rules });
        Ok(self)
    }

    /// Adds rules for an already parsed path.
    pub fn with_path(mut self, path: Path, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldRules { path, rules });
        self
    }

    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    /// Checks every rule against every observation and returns the failures.
    pub fn validate(&self, data: &Value) -> Vec<Violation> {
        let mut violations = Vec::new();

        for field in &self.fields {
            let declared = field.path.to_string();
            debug!(
                "validating field {:?} (array: {}, rules: {})",
                declared,
                field.path.has_array(),
                field.rules.len()
            );

            field.path.walk(data, |context| {
                for rule in &field.rules {
                    if rule.check(&context) {
                        continue;
                    }
                    violations.push(Violation {
                        field: declared.clone(),
                        path: report_path(&context, rule),
                        rule: rule.name().to_string(),
                        outcome: context.outcome,
                    });
                }
            });
        }

        debug!("validation finished with {} violation(s)", violations.len());
        violations
    }
}

/// Location to report a failed rule against.
///
/// A required sequence that turned out empty is reported against the
/// sequence itself rather than its nonexistent element.
fn report_path(context: &Context<'_>, rule: &Rule) -> String {
    let empty_sequence = matches!(rule, Rule::Required)
        && context.outcome == Outcome::ElementNotFound
        && context.index.is_none()
        && context.path.tail().name().is_none()
        && context
            .path
            .last_parent()
            .is_some_and(|parent| matches!(parent.kind, SegmentKind::Array(_)));

    if empty_sequence {
        if let Some(container) = context.path.truncate(context.path.depth() - 1) {
            return container.to_string();
        }
    }
    context.path.to_string()
}
