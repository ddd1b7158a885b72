//! Go 1.25 front end: lexer, recursive-descent parser and canonical printer.
//!
//! - The lexer uses Logos and implements Go semicolon insertion; in comment
//!   mode it also yields comment tokens.
//! - The parser builds an arena syntax tree (`ast`) shaped like Go's own
//!   `go/ast`, with byte-offset positions resolved through a `SourceMap`.
//! - The printer turns a tree back into source text that depends only on
//!   the tree.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod printer;
pub mod token;
pub mod walk;

// Re-exports for convenience
pub use ast::SourceFile;
pub use error::{Diag, ParseFailure};
pub use lexer::Lexer;
pub use parser::{parse_file, ParseMode};
pub use position::{Position, SourceMap, SourceMapBuilder};
pub use printer::{print_expr, print_file};
pub use token::TokenText;
