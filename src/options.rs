use go125_syntax::ParseMode;
use serde::{Deserialize, Serialize};

/// Conversion switches shared by both directions.
///
/// The four toggles are independent; every combination is valid. `indent`
/// only affects JSON output: 0 writes compact JSON, anything else pretty
/// prints with that many spaces per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub with_comments: bool,
    pub with_positions: bool,
    pub with_references: bool,
    pub with_imports: bool,
    pub indent: usize,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comments(mut self, enabled: bool) -> Self {
        self.with_comments = enabled;
        self
    }

    pub fn with_positions(mut self, enabled: bool) -> Self {
        self.with_positions = enabled;
        self
    }

    pub fn with_references(mut self, enabled: bool) -> Self {
        self.with_references = enabled;
        self
    }

    pub fn with_imports(mut self, enabled: bool) -> Self {
        self.with_imports = enabled;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Parser mode matching these options: comments are kept exactly when
    /// they will be encoded.
    pub fn parse_mode(&self) -> ParseMode {
        ParseMode::with_comments(self.with_comments)
    }

    /// All 16 combinations of the four toggles, compact output.
    pub fn all_combinations() -> impl Iterator<Item = Options> {
        (0u8..16).map(|bits| {
            Options::new()
                .with_comments(bits & 1 != 0)
                .with_positions(bits & 2 != 0)
                .with_references(bits & 4 != 0)
                .with_imports(bits & 8 != 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_off_and_compact() {
        let o = Options::default();
        assert!(!o.with_comments && !o.with_positions && !o.with_references && !o.with_imports);
        assert_eq!(o.indent, 0);
    }

    #[test]
    fn combinations_are_distinct() {
        let all: Vec<_> = Options::all_combinations().collect();
        assert_eq!(all.len(), 16);
        for (i, a) in all.iter().enumerate() {
            assert!(all[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn loads_partial_config() {
        let o: Options = serde_json::from_str(r#"{"with_positions": true, "indent": 2}"#).unwrap();
        assert_eq!(o, Options::new().with_positions(true).with_indent(2));
    }
}
