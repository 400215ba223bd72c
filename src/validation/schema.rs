//! TOML schema files declaring field rules.
//!
//! ```toml
//! [[field]]
//! path = "users[].email"
//! rules = ["required", "string"]
//! ```

use std::path::Path as FsPath;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::{Rule, Validator};
use crate::path::Path;

/// One `[[field]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub path: Path,
    #[serde(default)]
    pub rules: Vec<String>,
}

/// A parsed schema file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "field", default)]
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Parses schema text. Field paths are validated while parsing.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid schema")
    }

    /// Reads and parses a schema file.
    pub fn load<P: AsRef<FsPath>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Failed to load schema {}", path.display()))
    }

    /// Builds a validator, resolving rule names to built-in rules.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown rule name.
    pub fn to_validator(&self) -> Result<Validator> {
        let mut validator = Validator::new();
        for field in &self.fields {
            let mut rules = Vec::with_capacity(field.rules.len());
            for name in &field.rules {
                match Rule::from_name(name) {
                    Some(rule) => rules.push(rule),
                    None => bail!("Unknown rule '{}' for field '{}'", name, field.path),
                }
            }
            validator = validator.with_path(field.path.clone(), rules);
        }
        Ok(validator)
    }
}
