//! JavaScript/TypeScript syntax support
//!
//! - Parsing with the tree-sitter JS, TS and TSX grammars
//! - Structural queries shared by the pattern detectors

pub mod parser;
pub mod syntax;

pub use parser::{detect_variant, parse_file, parse_source};
