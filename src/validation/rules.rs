//! Field rules applied to every value a field path resolves to.

use std::fmt;
use std::sync::Arc;

use crate::path::{Context, Outcome};
use crate::value::{Number, Value};

/// Predicate over a single walk observation.
pub type Check = dyn Fn(&Context<'_>) -> bool + Send + Sync;

/// A validation rule.
///
/// `Required` is the only rule that inspects missing values. Every other rule
/// passes when nothing was found, so an optional field is only checked when
/// it is present.
#[derive(Clone)]
pub enum Rule {
    /// The field must exist and hold something other than null or `""`.
    Required,
    /// The value must be a string.
    String,
    /// The value must be a number, or a string holding one (`"1.2"`, `"-1"`).
    Numeric,
    /// The value must be a whole number, or a string holding one. Floats with
    /// no fractional part (`2.0`) count.
    Integer,
    /// A caller-provided check, run on found values only.
    Custom { name: String, check: Arc<Check> },
}

impl Rule {
    /// Wraps a closure as a named rule.
    pub fn custom<F>(name: &str, check: F) -> Self
    where
        F: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
    {
        Rule::Custom {
            name: name.to_string(),
            check: Arc::new(check),
        }
    }

    /// Looks up a built-in rule by the name used in schema files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "required" => Some(Rule::Required),
            "string" => Some(Rule::String),
            "numeric" => Some(Rule::Numeric),
            "integer" => Some(Rule::Integer),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Rule::Required => "required",
            Rule::String => "string",
            Rule::Numeric => "numeric",
            Rule::Integer => "integer",
            Rule::Custom { name, .. } => name,
        }
    }

    /// Returns true if the observation passes this rule.
    pub fn check(&self, context: &Context<'_>) -> bool {
        let value = match (context.outcome, context.value) {
            (Outcome::Found, Some(value)) => value,
            _ => return !matches!(self, Rule::Required),
        };

        match self {
            Rule::Required => match value {
                Value::Null => false,
                Value::String(s) => !s.is_empty(),
                _ => true,
            },
            Rule::String => value.is_null() || matches!(value, Value::String(_)),
            Rule::Numeric => match value {
                Value::Null | Value::Number(_) => true,
                Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
                _ => false,
            },
            Rule::Integer => match value {
                Value::Null => true,
                Value::Number(Number::Float(f)) => f.is_finite() && f.fract() == 0.0,
                Value::Number(_) => true,
                Value::String(s) => {
                    let s = s.trim();
                    s.parse::<i64>().is_ok() || s.parse::<u64>().is_ok()
                }
                _ => false,
            },
            Rule::Custom { check, .. } => check(context),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish(),
            _ => f.write_str(self.name()),
        }
    }
}
