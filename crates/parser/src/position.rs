//! Resolution of `Pos` values to file/line/column coordinates.
//!
//! A `SourceMap` is built from source text when parsing, or reconstructed
//! from decoded coordinates with `SourceMapBuilder`.

use std::collections::BTreeMap;

use crate::ast::Pos;

/// Fully resolved source coordinate. Lines and columns are 1-based and the
/// column counts bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    pub filename: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn is_valid(&self) -> bool {
        self.line > 0 || self.offset > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    filename: String,
    /// `(start offset, line number)` of each known line, ordered by start.
    /// A parsed file lists every line; a rebuilt one only the sampled lines.
    lines: Vec<(usize, usize)>,
}

impl SourceMap {
    /// Line table for `src`. `\n` terminates a line.
    pub fn new(filename: impl Into<String>, src: &str) -> Self {
        let mut lines = vec![(0, 1)];
        lines.extend(
            memchr::memchr_iter(b'\n', src.as_bytes())
                .enumerate()
                .map(|(i, nl)| (nl + 1, i + 2)),
        );
        Self {
            filename: filename.into(),
            lines,
        }
    }

    pub fn builder() -> SourceMapBuilder {
        SourceMapBuilder::new()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Number of known lines.
    pub fn line_count(&self) -> usize {
        self.lines.len().max(1)
    }

    /// Resolves `pos`; synthesized positions resolve to `None`.
    pub fn resolve(&self, pos: Pos) -> Option<Position> {
        let offset = pos.offset()?;
        let (line, column) = self.line_col(offset);
        Some(Position {
            filename: self.filename.clone(),
            offset,
            line,
            column,
        })
    }

    /// 1-based line and byte column of `offset`.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let idx = self.lines.partition_point(|&(start, _)| start <= offset);
        match idx.checked_sub(1).and_then(|i| self.lines.get(i)) {
            Some(&(start, line)) => (line, offset - start + 1),
            None => (1, offset + 1),
        }
    }

    /// Line number of `pos`, or 0 when synthesized.
    pub fn line(&self, pos: Pos) -> usize {
        pos.offset().map_or(0, |o| self.line_col(o).0)
    }
}

/// Reconstructs a line table from scattered `(offset, line, column)` samples.
///
/// Each sample pins the start of its line at `offset - (column - 1)`. Only
/// sampled lines are stored, so memory follows the number of samples and
/// not the line numbers they name. A line never starts after a later one.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    filename: Option<String>,
    starts: BTreeMap<usize, usize>,
}

impl SourceMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one decoded coordinate and returns the matching `Pos`.
    ///
    /// A coordinate without line information still yields a valid `Pos` as
    /// long as it has an offset.
    pub fn record(&mut self, filename: &str, offset: usize, line: usize, column: usize) -> Pos {
        if self.filename.is_none() && !filename.is_empty() {
            self.filename = Some(filename.to_string());
        }
        if line > 0 && column > 0 && offset + 1 >= column {
            self.starts.entry(line).or_insert(offset + 1 - column);
        }
        if line == 0 && offset == 0 {
            Pos::NONE
        } else {
            Pos::at(offset)
        }
    }

    pub fn finish(mut self) -> SourceMap {
        self.starts.insert(1, 0);
        let mut lines = Vec::with_capacity(self.starts.len());
        let mut next = usize::MAX;
        for (&line, &start) in self.starts.iter().rev() {
            next = next.min(start);
            lines.push((next, line));
        }
        lines.reverse();
        SourceMap {
            filename: self.filename.unwrap_or_default(),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_lines_and_columns() {
        let sm = SourceMap::new("a.go", "package a\n\nfunc f() {}\n");
        let p = sm.resolve(Pos::at(11)).unwrap();
        assert_eq!((p.line, p.column, p.offset), (3, 1, 11));
        assert_eq!(p.filename, "a.go");
        assert_eq!(sm.line_col(8), (1, 9));
        assert_eq!(sm.resolve(Pos::NONE), None);
        assert_eq!(sm.line(Pos::at(10)), 2);
    }

    #[test]
    fn builder_reproduces_recorded_coordinates() {
        let src = "package a\n\nvar x = 1\n// c\nvar y = 2\n";
        let original = SourceMap::new("a.go", src);
        let mut b = SourceMapBuilder::new();
        let samples = [0usize, 8, 11, 15, 26, 30];
        let mut rebuilt = Vec::new();
        for off in samples {
            let p = original.resolve(Pos::at(off)).unwrap();
            rebuilt.push(b.record(&p.filename, p.offset, p.line, p.column));
        }
        let sm = b.finish();
        assert_eq!(sm.filename(), "a.go");
        for (off, pos) in samples.into_iter().zip(rebuilt) {
            assert_eq!(sm.resolve(pos), original.resolve(Pos::at(off)));
        }
    }

    #[test]
    fn builder_ignores_empty_coordinates() {
        let mut b = SourceMapBuilder::new();
        assert_eq!(b.record("", 0, 0, 0), Pos::NONE);
        assert_eq!(b.finish(), SourceMap::default_with_one_line());
    }

    #[test]
    fn far_apart_lines_stay_sparse() {
        let mut b = SourceMapBuilder::new();
        let far = b.record("big.go", 4_000_000_000, 4_000_000_000, 1);
        let near = b.record("big.go", 20, 3, 5);
        let sm = b.finish();
        assert_eq!(sm.line_count(), 3);
        let p = sm.resolve(far).unwrap();
        assert_eq!((p.line, p.column), (4_000_000_000, 1));
        let p = sm.resolve(near).unwrap();
        assert_eq!((p.line, p.column), (3, 5));
        assert_eq!(sm.line_col(2), (1, 3));
    }

    impl SourceMap {
        fn default_with_one_line() -> Self {
            SourceMap {
                filename: String::new(),
                lines: vec![(0, 1)],
            }
        }
    }
}
