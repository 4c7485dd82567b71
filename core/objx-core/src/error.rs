//! Error types for the OBJX object store.
//!
//! All public APIs return `ObjxResult<T>`; no panics in library code.

use thiserror::Error;

/// Unified error type for all OBJX operations.
#[derive(Debug, Error)]
pub enum ObjxError {
    /// Query text does not start with a recognized operator token
    #[error("invalid operator '{token}' in query: {query}")]
    InvalidOperator { token: String, query: String },

    /// Bracket/comma structure cannot be parsed
    #[error("malformed expression at byte {span}: {message}\nQuery: {query}")]
    MalformedExpression {
        message: String,
        span: usize,
        query: String,
    },

    /// Referenced field has no registered attribute
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    /// Failure raised by the indexed collection while planning or executing
    #[error("engine failure: {message}\nContext: {context}")]
    EngineFailure { message: String, context: String },

    /// `save` could not complete; the original cause is kept as the source
    #[error("store write failed for identity {identity}")]
    StoreWrite {
        identity: String,
        #[source]
        source: Box<ObjxError>,
    },

    /// Record schema cannot back a store (e.g. identity field not comparable)
    #[error("schema error: {0}")]
    Schema(String),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(String),
}

impl ObjxError {
    pub(crate) fn malformed(message: impl Into<String>, span: usize, query: &str) -> Self {
        ObjxError::MalformedExpression {
            message: message.into(),
            span,
            query: query.to_string(),
        }
    }

    pub(crate) fn engine(message: impl Into<String>, context: impl Into<String>) -> Self {
        ObjxError::EngineFailure {
            message: message.into(),
            context: context.into(),
        }
    }

    /// True for the kinds a caller can get back from `query`.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            ObjxError::InvalidOperator { .. }
                | ObjxError::MalformedExpression { .. }
                | ObjxError::UnknownField { .. }
                | ObjxError::EngineFailure { .. }
        )
    }
}

/// Result type alias for all OBJX operations.
pub type ObjxResult<T> = Result<T, ObjxError>;

impl From<serde_json::Error> for ObjxError {
    fn from(err: serde_json::Error) -> Self {
        ObjxError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn error_display_invalid_operator() {
        let err = ObjxError::InvalidOperator {
            token: "select".to_string(),
            query: "select(a,1)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid operator 'select' in query: select(a,1)"
        );
    }

    #[test]
    fn error_display_malformed_expression() {
        let err = ObjxError::malformed("missing ','", 7, "equal(a)");
        let text = err.to_string();
        assert!(text.contains("byte 7"));
        assert!(text.contains("missing ','"));
        assert!(text.contains("equal(a)"));
    }

    #[test]
    fn error_display_unknown_field() {
        let err = ObjxError::UnknownField {
            field: "colour".to_string(),
        };
        assert_eq!(err.to_string(), "unknown field 'colour'");
    }

    #[test]
    fn store_write_keeps_source() {
        let err = ObjxError::StoreWrite {
            identity: "7".to_string(),
            source: Box::new(ObjxError::engine("row 3 vanished", "update")),
        };
        assert!(err.to_string().contains("identity 7"));
        let source = err.source().expect("source is kept");
        assert!(source.to_string().contains("row 3 vanished"));
    }

    #[test]
    fn query_error_kinds() {
        assert!(ObjxError::malformed("x", 0, "").is_query_error());
        assert!(ObjxError::engine("x", "y").is_query_error());
        assert!(!ObjxError::Schema("x".to_string()).is_query_error());
        assert!(!ObjxError::Config("x".to_string()).is_query_error());
    }

    #[test]
    fn config_error_from_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ObjxError = parse.unwrap_err().into();
        assert!(matches!(err, ObjxError::Config(_)));
    }
}
