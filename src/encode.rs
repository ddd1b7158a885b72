//! Position encoding in both directions.

use go125_syntax::ast::Pos;
use go125_syntax::{SourceMap, SourceMapBuilder};

use crate::mirror;

/// Marshal side: turns raw `Pos` values into mirror positions.
pub struct PosEncoder<'a> {
    source_map: &'a SourceMap,
    enabled: bool,
}

impl<'a> PosEncoder<'a> {
    pub fn new(source_map: &'a SourceMap, enabled: bool) -> Self {
        Self {
            source_map,
            enabled,
        }
    }

    /// `None` when positions are off or `pos` is synthesized.
    pub fn position(&self, pos: Pos) -> Option<mirror::Position> {
        if !self.enabled {
            return None;
        }
        self.source_map.resolve(pos).map(mirror::Position::from)
    }

    /// A presence marker is written whenever it is set, with coordinates only
    /// when they are available.
    pub fn marker(&self, pos: Option<Pos>) -> Option<mirror::Position> {
        pos.map(|p| self.position(p).unwrap_or_else(mirror::Position::empty))
    }
}

/// One decoded `Position` object.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Coord<'v> {
    pub filename: &'v str,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Unmarshal side: turns decoded coordinates back into `Pos` values and
/// rebuilds the line table they came from.
#[derive(Debug)]
pub struct PosDecoder {
    enabled: bool,
    builder: SourceMapBuilder,
    recorded: usize,
}

impl PosDecoder {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            builder: SourceMap::builder(),
            recorded: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, c: Coord<'_>) -> Pos {
        if !self.enabled {
            return Pos::NONE;
        }
        self.recorded += 1;
        self.builder.record(c.filename, c.offset, c.line, c.column)
    }

    pub fn recorded(&self) -> usize {
        self.recorded
    }

    pub fn finish(self) -> SourceMap {
        self.builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_encoder_emits_nothing_but_markers() {
        let sm = SourceMap::new("a.go", "package a\n");
        let enc = PosEncoder::new(&sm, false);
        assert_eq!(enc.position(Pos::at(0)), None);
        assert_eq!(enc.marker(Some(Pos::at(0))), Some(mirror::Position::empty()));
        assert_eq!(enc.marker(None), None);
    }

    #[test]
    fn enabled_encoder_resolves() {
        let sm = SourceMap::new("a.go", "package a\n");
        let enc = PosEncoder::new(&sm, true);
        assert_eq!(
            enc.position(Pos::at(8)),
            Some(mirror::Position::new("a.go".into(), 8, 1, 9))
        );
        assert_eq!(enc.position(Pos::NONE), None);
        assert_eq!(enc.marker(Some(Pos::NONE)), Some(mirror::Position::empty()));
    }

    #[test]
    fn decoder_round_trips_coordinates() {
        let mut dec = PosDecoder::new(true);
        let pos = dec.record(Coord {
            filename: "a.go",
            offset: 11,
            line: 2,
            column: 1,
        });
        assert_eq!(dec.recorded(), 1);
        let sm = dec.finish();
        let p = sm.resolve(pos).unwrap();
        assert_eq!((p.filename.as_str(), p.offset, p.line, p.column), ("a.go", 11, 2, 1));
    }

    #[test]
    fn disabled_decoder_ignores_coordinates() {
        let mut dec = PosDecoder::new(false);
        let pos = dec.record(Coord {
            filename: "a.go",
            offset: 11,
            line: 2,
            column: 1,
        });
        assert_eq!(pos, Pos::NONE);
        assert_eq!(dec.finish().filename(), "");
    }
}
