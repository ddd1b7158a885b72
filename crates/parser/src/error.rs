use std::fmt;

use thiserror::Error;

use crate::ast::Pos;
use crate::position::SourceMap;

/// Compact byte-span used for diagnostics.
///
/// If you need >4GiB inputs, change to `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32, // exclusive
}

#[inline]
const fn clamp(v: usize) -> u32 {
    if v > u32::MAX as usize {
        u32::MAX
    } else {
        v as u32
    }
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        // Clamp rather than panic.
        Self {
            start: clamp(start),
            end: clamp(end),
        }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        let p = clamp(pos);
        Self { start: p, end: p }
    }

    #[inline]
    pub const fn single_at(pos: usize) -> Self {
        let p = clamp(pos);
        Self {
            start: p,
            end: p.saturating_add(1),
        }
    }

    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }

    #[inline]
    pub const fn start_pos(self) -> Pos {
        Pos::at(self.start as usize)
    }

    #[inline]
    pub const fn end_pos(self) -> Pos {
        Pos::at(self.end as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

impl Diag {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagKind::Parse,
            span,
            message: message.into(),
        }
    }
}

/// Source text that does not parse. Carries every diagnostic collected and the
/// line table needed to report them.
#[derive(Debug, Error)]
#[error("{}", Rendered(self))]
pub struct ParseFailure {
    pub diags: Vec<Diag>,
    pub source_map: SourceMap,
}

struct Rendered<'a>(&'a ParseFailure);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failure = self.0;
        let Some(first) = failure.diags.first() else {
            return f.write_str("parse failed");
        };
        let (line, col) = failure.source_map.line_col(first.span.start as usize);
        let name = match failure.source_map.filename() {
            "" => "<input>",
            n => n,
        };
        write!(f, "{name}:{line}:{col}: {}", first.message)?;
        match failure.diags.len() {
            1 => Ok(()),
            n => write!(f, " (and {} more errors)", n - 1),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("invalid escape")]
    InvalidEscape,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span: self.span,
            message: self.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_reports_first_diag_with_location() {
        let failure = ParseFailure {
            diags: vec![
                Diag::parse(Span::single_at(12), "expected ';'"),
                Diag::parse(Span::single_at(20), "expected '}'"),
            ],
            source_map: SourceMap::new("x.go", "package x\n\nfunc {\n}\n"),
        };
        assert_eq!(
            failure.to_string(),
            "x.go:3:2: expected ';' (and 1 more errors)"
        );
    }

    #[test]
    fn lex_error_becomes_lex_diag() {
        let e = LexError {
            kind: LexErrorKind::UnterminatedString,
            span: Span::new(3, 9),
        };
        let d = e.diag();
        assert_eq!(d.kind, DiagKind::Lex);
        assert_eq!(d.message, "unterminated string");
    }
}
