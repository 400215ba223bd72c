//! File I/O for documents.
//!
//! This module loads JSON and YAML documents from disk or stdin.

pub mod loader;
