//! Bidirectional codec between Go syntax trees and self-describing JSON.
//!
//! - `marshal` walks a parsed tree and builds a mirror tree whose JSON form
//!   tags every node with its `NodeType`, optionally with positions, comments
//!   and `RefId`s that preserve node sharing.
//! - `unmarshal` reads such a document back into an arena tree that prints
//!   like the original.
//! - The syntax front end (lexer, parser, printer) lives in `go125_syntax`.

pub mod convert;
pub mod encode;
pub mod error;
pub mod marshal;
pub mod mirror;
pub mod options;
pub mod refs;
pub mod registry;
pub mod unmarshal;

// Re-exports for convenience
pub use convert::{json_to_source, read_input, reprint, source_to_json, write_output};
pub use error::{CodecError, Result};
pub use marshal::{marshal, to_json};
pub use options::Options;
pub use registry::{resolve, Family, Kind};
pub use unmarshal::{unmarshal, unmarshal_value};

pub use go125_syntax as syntax;
