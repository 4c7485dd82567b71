//! # OBJX: In-Memory Indexed Object Store
//!
//! OBJX는 타입이 지정된 레코드를 메모리에 보관하고, 괄호 기반의 함수형 쿼리
//! 문법(`and(equal(name,"Bob"),greater_than(age,30))`)으로 조회하는 객체 저장소입니다.
//!
//! ## 주요 특징
//!
//! - **Derived schema**: `#[derive(Record)]` exposes comparable fields as attributes
//! - **Navigable indexes**: one ordered index per attribute, equality and strict ranges
//! - **Forgiving query DSL**: any operator case or `snake_case`, bare field names
//! - **Upsert with dedup**: `save` inserts, replaces, or reports duplicate identities
//!
//! ## 빠른 시작
//!
//! ```rust
//! use objx_core::{ObjectStore, Record};
//!
//! #[derive(Debug, Clone, Record)]
//! struct Person {
//!     #[objx(identity)]
//!     id: i64,
//!     name: String,
//!     age: u32,
//! }
//!
//! # fn main() -> objx_core::ObjxResult<()> {
//! let store = ObjectStore::<Person>::new()?;
//! store.save(Person { id: 1, name: "Bob".into(), age: 42 })?;
//! store.save(Person { id: 2, name: "Eve".into(), age: 25 })?;
//!
//! let found = store.query(r#"AND(equal(name,"Bob"), GREATER_THAN(age, 30))"#)?;
//! assert_eq!(found.len(), 1);
//!
//! assert_eq!(
//!     store.compile("greater_than(age,30)")?,
//!     r#"greaterThan("age",30)"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## 모듈 구조
//!
//! - [`registry`]: attribute registry built from a record's schema
//! - [`query`]: query DSL compiler (operator normalization, grammars, AST)
//! - [`plan`]: expression → executable query against the registry
//! - [`collection`]: indexed collection ([`index::NavigableIndex`] per attribute)
//! - [`store`]: [`ObjectStore`] facade: `query` and `save`
//! - [`config`]: [`StoreConfig`], JSON and `OBJX_*` environment loading

extern crate self as objx_core;

pub mod collection;
pub mod config;
pub mod error;
pub mod index;
pub mod plan;
pub mod query;
pub mod record;
pub mod registry;
pub mod store;
pub mod value;

// Logging utilities
pub mod logging;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::StoreConfig;
pub use error::{ObjxError, ObjxResult};
pub use query::{Expr, GrammarVersion, Operator, QueryCompiler};
pub use record::{AttributeValue, Record};
pub use registry::{Attribute, AttributeRegistry};
pub use store::{ObjectStore, SaveOutcome};
pub use value::{FieldType, Value};

// Re-export derive macros
pub use objx_derive::Record;
