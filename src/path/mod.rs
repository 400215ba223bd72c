//! Field path expressions for addressing values in nested data.
//!
//! A field path names a value inside a document made of mappings and
//! sequences. Paths are parsed once and can then be walked against any number
//! of documents.
//!
//! # Supported Syntax
//!
//! - `name` - Key lookup in a mapping
//! - `a.b` - Nested key lookup
//! - `a[]` - Every element of the sequence stored under `a`
//! - `a[][]` - Every element of every nested sequence
//! - `a[].b` - Key `b` of every element of `a`
//! - `` (empty) - The value stored under the empty key
//!
//! There is no index, slice or filter syntax; concrete indices only appear in
//! the paths reported by the walker.
//!
//! # Examples
//!
//! ```
//! use fieldwalk::path::{parse, Outcome};
//! use fieldwalk::value::Value;
//!
//! let data: Value = serde_json::from_str(r#"{"users": [{"email": "a@b.c"}, {}]}"#).unwrap();
//! let path = parse("users[].email").unwrap();
//!
//! let mut seen = Vec::new();
//! path.walk(&data, |context| seen.push((context.path.to_string(), context.outcome)));
//! assert_eq!(seen, vec![
//!     ("users[0].email".to_string(), Outcome::Found),
//!     ("users[1].email".to_string(), Outcome::ElementNotFound),
//! ]);
//! ```

pub mod error;
pub mod parser;
pub mod scanner;
pub mod segment;
pub mod walker;

pub use error::GrammarError;
pub use parser::parse;
pub use scanner::{scan, Token, TokenKind};
pub use segment::{Index, Path, SegmentKind};
pub use walker::{Context, Outcome};
