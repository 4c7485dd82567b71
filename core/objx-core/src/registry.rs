//! Attribute Registry: field name → comparable accessor
//!
//! Built once per record type from [`Record::declared_fields`] and shared
//! read-only between the store and the query planner.

use crate::record::{Accessor, Record};
use crate::value::{FieldType, Value};
use ahash::AHashMap;
use tracing::debug;

/// A named, typed, pure accessor over a record.
pub struct Attribute<R> {
    name: &'static str,
    ty: FieldType,
    nullable: bool,
    accessor: Accessor<R>,
}

impl<R> Attribute<R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Extracts this attribute's value from a record.
    pub fn value_of(&self, record: &R) -> Value {
        (self.accessor)(record)
    }

    pub(crate) fn accessor(&self) -> Accessor<R> {
        self.accessor
    }
}

impl<R> std::fmt::Debug for Attribute<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// Insertion-ordered mapping of comparable fields.
pub struct AttributeRegistry<R> {
    attributes: Vec<Attribute<R>>,
    by_name: AHashMap<&'static str, usize>,
}

impl<R: Record> AttributeRegistry<R> {
    /// Derives the registry from the record's declared schema.
    ///
    /// Fields without a comparable type are skipped; this is not an error.
    pub fn build() -> Self {
        let mut attributes = Vec::new();
        let mut by_name = AHashMap::new();

        for field in R::declared_fields() {
            let accessor = match field.accessor {
                Some(accessor) if field.ty.is_comparable() => accessor,
                _ => {
                    debug!(record = R::TYPE_NAME, field = field.name, "skipping non-comparable field");
                    continue;
                }
            };
            by_name.insert(field.name, attributes.len());
            attributes.push(Attribute {
                name: field.name,
                ty: field.ty,
                nullable: field.nullable,
                accessor,
            });
        }

        debug!(
            record = R::TYPE_NAME,
            attributes = attributes.len(),
            "attribute registry built"
        );
        Self {
            attributes,
            by_name,
        }
    }

    /// The identity-key attribute, if the identity field is comparable.
    pub fn identity(&self) -> Option<&Attribute<R>> {
        self.get(R::IDENTITY)
    }
}

impl<R> AttributeRegistry<R> {
    pub fn get(&self, name: &str) -> Option<&Attribute<R>> {
        self.position(name).map(|idx| &self.attributes[idx])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn attribute_at(&self, idx: usize) -> Option<&Attribute<R>> {
        self.attributes.get(idx)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Attribute names in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.attributes.iter().map(|a| a.name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute<R>> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
