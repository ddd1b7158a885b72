use go125_syntax::ParseFailure;
use thiserror::Error;

use crate::registry::Family;

/// Every way a conversion can fail. No partial tree or document is ever
/// returned alongside an error.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed JSON: {0}")]
    Input(#[from] serde_json::Error),

    #[error("{path}: {message}")]
    Schema { path: String, message: String },

    #[error("{path}: unknown {family} node type {tag:?}")]
    UnknownTag {
        tag: String,
        family: Family,
        path: String,
    },

    #[error("{path}: unknown {what} {text:?}")]
    UnknownOperator {
        text: String,
        what: &'static str,
        path: String,
    },

    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;

impl CodecError {
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_lead_with_the_json_path() {
        let e = CodecError::UnknownTag {
            tag: "NotARealKind".into(),
            family: Family::Expr,
            path: "$.Decls[0]".into(),
        };
        assert_eq!(
            e.to_string(),
            "$.Decls[0]: unknown expression node type \"NotARealKind\""
        );
        let e = CodecError::schema("$.Name", "missing required field");
        assert_eq!(e.to_string(), "$.Name: missing required field");
    }
}
