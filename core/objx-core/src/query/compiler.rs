//! Query DSL Compiler: raw text → [`Expr`]
//!
//! Validates the leading operator token, then hands the text to the grammar
//! selected in [`StoreConfig`](crate::config::StoreConfig).

use crate::error::{ObjxError, ObjxResult};
use crate::query::ast::Expr;
use crate::query::operator::{Operator, leading_token};
use crate::query::{parser, shallow};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Which grammar compiles user queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarVersion {
    /// One logical operator over leaves; deeper nesting is rejected.
    Shallow,
    /// Recursive descent, nesting up to the configured `max_depth`.
    #[default]
    Nested,
}

impl GrammarVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrammarVersion::Shallow => "shallow",
            GrammarVersion::Nested => "nested",
        }
    }

    pub fn parse_grammar(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shallow" => Some(GrammarVersion::Shallow),
            "nested" => Some(GrammarVersion::Nested),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueryCompiler {
    grammar: GrammarVersion,
    max_depth: usize,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new(GrammarVersion::default())
    }
}

impl QueryCompiler {
    pub fn new(grammar: GrammarVersion) -> Self {
        Self {
            grammar,
            max_depth: parser::DEFAULT_MAX_DEPTH,
        }
    }

    /// Nesting limit for the nested grammar; the shallow grammar stops at two.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.clamp(1, parser::DEPTH_CEILING);
        self
    }

    pub fn grammar(&self) -> GrammarVersion {
        self.grammar
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Checks that `query` begins with a recognized operator token.
    pub fn validate_operator(query: &str) -> ObjxResult<Operator> {
        let token = leading_token(query);
        Operator::parse(token).ok_or_else(|| ObjxError::InvalidOperator {
            token: token.to_string(),
            query: query.to_string(),
        })
    }

    /// Compiles non-empty query text into an expression tree.
    pub fn compile(&self, query: &str) -> ObjxResult<Expr> {
        if query.trim().is_empty() {
            return Err(ObjxError::malformed("empty query", 0, query));
        }
        Self::validate_operator(query)?;

        let expr = match self.grammar {
            GrammarVersion::Shallow => shallow::parse(query)?,
            GrammarVersion::Nested => parser::parse_with_depth(query, self.max_depth)?,
        };
        trace!(grammar = self.grammar.as_str(), %expr, "compiled query");
        Ok(expr)
    }

    /// Compiles `query` and renders the engine's textual form.
    pub fn compile_to_string(&self, query: &str) -> ObjxResult<String> {
        self.compile(query).map(|expr| expr.to_string())
    }
}
