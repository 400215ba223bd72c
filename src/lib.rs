//! fieldwalk - field path expressions for nested JSON/YAML data.
//!
//! Paths such as `object.array[].field` are parsed once into a [`path::Path`]
//! and walked against any number of [`value::Value`] documents. Each walk
//! reports every value the path resolves to, and where and why resolution
//! stopped when it does not.

pub mod config;
pub mod file;
pub mod path;
pub mod validation;
pub mod value;
