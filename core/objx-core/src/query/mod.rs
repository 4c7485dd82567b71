//! Query DSL: bracket-delimited functional query syntax
//!
//! ```text
//! query 문자열 → validate operator → Shallow | Nested grammar → Expr → Display
//! ```

pub mod ast;
pub mod compiler;
pub(crate) mod lexer;
pub mod operator;
pub(crate) mod parser;
pub(crate) mod shallow;

pub use ast::Expr;
pub use compiler::{GrammarVersion, QueryCompiler};
pub use operator::{Operator, camel_case, normalize};
pub use parser::{DEFAULT_MAX_DEPTH, DEPTH_CEILING, parse as parse_query};
