//! Object Store: query and upsert facade over the indexed collection
//!
//! # 아키텍처
//!
//! ```text
//! query:  text → QueryCompiler → Expr → ExecutableQuery → IndexedCollection
//! save:   identity stripe lock → equal(identity) → insert | update | report
//! ```

use crate::collection::IndexedCollection;
use crate::config::StoreConfig;
use crate::error::{ObjxError, ObjxResult};
use crate::plan::ExecutableQuery;
use crate::query::QueryCompiler;
use crate::record::{Accessor, Record};
use crate::registry::AttributeRegistry;
use crate::value::Value;
use ahash::RandomState;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result of [`ObjectStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No record had the identity; the record was added.
    Inserted,
    /// Exactly one record had the identity and was replaced.
    Updated,
    /// Several records already share the identity; nothing was written.
    DuplicateIdentity { identity: Value, matches: usize },
}

/// In-memory store of `R` records queried with the bracket DSL.
///
/// # 예제
///
/// ```rust
/// use objx_core::{ObjectStore, Record, SaveOutcome};
///
/// #[derive(Debug, Clone, Record)]
/// struct User {
///     #[objx(identity)]
///     id: i64,
///     name: String,
/// }
///
/// # fn main() -> objx_core::ObjxResult<()> {
/// let store = ObjectStore::<User>::new()?;
/// assert_eq!(store.save(User { id: 1, name: "Alice".into() })?, SaveOutcome::Inserted);
/// assert_eq!(store.save(User { id: 1, name: "Alicia".into() })?, SaveOutcome::Updated);
///
/// let found = store.query("equal(name, 'Alicia')")?;
/// assert_eq!(found.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct ObjectStore<R: Record> {
    registry: Arc<AttributeRegistry<R>>,
    collection: IndexedCollection<R>,
    compiler: QueryCompiler,
    config: StoreConfig,
    /// Registry position of the identity attribute
    identity: usize,
    identity_of: Accessor<R>,
    save_locks: Box<[Mutex<()>]>,
    hasher: RandomState,
}

impl<R: Record> ObjectStore<R> {
    /// Store with [`StoreConfig::default`].
    pub fn new() -> ObjxResult<Self> {
        Self::with_config(StoreConfig::default())
    }

    #[instrument(skip(config), fields(record = R::TYPE_NAME))]
    pub fn with_config(config: StoreConfig) -> ObjxResult<Self> {
        let registry = Arc::new(AttributeRegistry::<R>::build());
        let identity = registry.position(R::IDENTITY).ok_or_else(|| {
            ObjxError::Schema(format!(
                "identity field '{}' of {} is not a comparable attribute",
                R::IDENTITY,
                R::TYPE_NAME
            ))
        })?;
        let identity_of = registry
            .attribute_at(identity)
            .map(|attribute| attribute.accessor())
            .ok_or_else(|| ObjxError::Schema(format!("attribute #{identity} missing")))?;

        let save_locks = (0..config.stripe_count()).map(|_| Mutex::new(())).collect();
        info!(
            attributes = registry.len(),
            grammar = config.grammar.as_str(),
            max_depth = config.max_depth,
            "object store initialized"
        );

        Ok(Self {
            collection: IndexedCollection::new(Arc::clone(&registry)),
            compiler: QueryCompiler::new(config.grammar).with_max_depth(config.max_depth),
            registry,
            config,
            identity,
            identity_of,
            save_locks,
            hasher: RandomState::new(),
        })
    }

    /// Runs a DSL query; empty text returns every record.
    #[instrument(skip(self), fields(record = R::TYPE_NAME))]
    pub fn query(&self, text: &str) -> ObjxResult<Vec<R>> {
        if text.trim().is_empty() {
            return Ok(self.collection.all());
        }

        QueryCompiler::validate_operator(text)?;
        let expr = self.compiler.compile(text)?;
        if self.config.log_queries {
            info!(query = %expr, "running query");
        }

        let plan = ExecutableQuery::from_expr(&expr, &self.registry)?;
        let records: Vec<R> = self
            .collection
            .retrieve(&plan)
            .into_iter()
            .map(|(_, record)| record)
            .collect();
        debug!(matches = records.len(), "query finished");
        Ok(records)
    }

    /// Inserts `record`, or replaces the single record sharing its identity.
    ///
    /// When two or more stored records already share the identity the store
    /// is left untouched and [`SaveOutcome::DuplicateIdentity`] is returned.
    #[instrument(skip_all, fields(record = R::TYPE_NAME))]
    pub fn save(&self, record: R) -> ObjxResult<SaveOutcome> {
        let identity = (self.identity_of)(&record);
        let _guard = self.lock_for(&identity).lock();

        debug!(%identity, "checking if record exists");
        let existing = self.collection.retrieve(&ExecutableQuery::Equal {
            attr: self.identity,
            value: identity.clone(),
        });

        match existing.as_slice() {
            [] => {
                let row_id = self.collection.insert(record);
                info!(%identity, row_id, "record inserted");
                Ok(SaveOutcome::Inserted)
            }
            [(row_id, _)] => {
                self.collection
                    .update(*row_id, record)
                    .map_err(|source| ObjxError::StoreWrite {
                        identity: identity.to_string(),
                        source: Box::new(source),
                    })?;
                info!(%identity, row_id, "record updated");
                Ok(SaveOutcome::Updated)
            }
            duplicates => {
                warn!(
                    %identity,
                    matches = duplicates.len(),
                    "duplicate identity found, save cancelled"
                );
                for (row_id, duplicate) in duplicates {
                    warn!(row_id, record = ?duplicate, "duplicate record");
                }
                Ok(SaveOutcome::DuplicateIdentity {
                    identity,
                    matches: duplicates.len(),
                })
            }
        }
    }

    /// Compiles `text` to the engine's textual form without running it.
    pub fn compile(&self, text: &str) -> ObjxResult<String> {
        QueryCompiler::validate_operator(text)?;
        self.compiler.compile_to_string(text)
    }

    /// Adds `record` with no identity check, bypassing `save`.
    ///
    /// Only useful for loading data that is known to be clean, or for
    /// reproducing stores that already hold duplicates.
    pub fn insert_unchecked(&self, record: R) {
        self.collection.insert(record);
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn registry(&self) -> &AttributeRegistry<R> {
        &self.registry
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn lock_for(&self, identity: &Value) -> &Mutex<()> {
        // stripe count is a power of two
        let slot = self.hasher.hash_one(identity) as usize & (self.save_locks.len() - 1);
        &self.save_locks[slot]
    }
}
