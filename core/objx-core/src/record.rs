//! Record traits: the static schema contract
//!
//! `#[derive(Record)]` implements [`Record`] and relies on [`AttributeValue`]
//! for every field that is not marked `#[objx(skip)]`.

use crate::value::{FieldType, Value};

/// Accessor extracting one comparable value from a record.
pub type Accessor<R> = fn(&R) -> Value;

/// One declared field of a record type.
pub struct FieldDescriptor<R> {
    pub name: &'static str,
    pub ty: FieldType,
    pub nullable: bool,
    /// `None` for opaque fields.
    pub accessor: Option<Accessor<R>>,
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldDescriptor<R> {}

impl<R> std::fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .field("accessor", &self.accessor.is_some())
            .finish()
    }
}

/// A user-defined record type storable in an [`ObjectStore`](crate::ObjectStore).
pub trait Record: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Name used in log output.
    const TYPE_NAME: &'static str;

    /// Name of the identity-key field.
    const IDENTITY: &'static str;

    /// All declared fields in declaration order.
    fn declared_fields() -> Vec<FieldDescriptor<Self>>;
}

/// Rust types usable as comparable record fields.
pub trait AttributeValue {
    const FIELD_TYPE: FieldType;
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;
}

macro_rules! impl_attribute_value {
    ($variant:ident, $field_type:ident, $cast:ty: $($ty:ty),+) => {
        $(
            impl AttributeValue for $ty {
                const FIELD_TYPE: FieldType = FieldType::$field_type;

                fn to_value(&self) -> Value {
                    Value::$variant(*self as $cast)
                }
            }
        )+
    };
}

impl_attribute_value!(Int, Int, i64: i8, i16, i32, i64, isize, u8, u16, u32);
impl_attribute_value!(UInt, UInt, u64: u64, usize);
impl_attribute_value!(Float, Float, f64: f64);
impl_attribute_value!(Float, Float32, f64: f32);

impl AttributeValue for bool {
    const FIELD_TYPE: FieldType = FieldType::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl AttributeValue for String {
    const FIELD_TYPE: FieldType = FieldType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl AttributeValue for char {
    const FIELD_TYPE: FieldType = FieldType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl<T: AttributeValue> AttributeValue for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_widths_map_to_int() {
        assert_eq!(7u8.to_value(), Value::Int(7));
        assert_eq!((-7i32).to_value(), Value::Int(-7));
        assert_eq!(<u32 as AttributeValue>::FIELD_TYPE, FieldType::Int);
        assert_eq!(<u64 as AttributeValue>::FIELD_TYPE, FieldType::UInt);
    }

    #[test]
    fn f32_keeps_its_width() {
        assert_eq!(<f32 as AttributeValue>::FIELD_TYPE, FieldType::Float32);
        assert_eq!(<f64 as AttributeValue>::FIELD_TYPE, FieldType::Float);
        assert_eq!(0.1f32.to_value(), Value::Float(f64::from(0.1f32)));
    }

    #[test]
    fn option_is_nullable() {
        assert!(<Option<String> as AttributeValue>::NULLABLE);
        assert!(!<String as AttributeValue>::NULLABLE);
        assert_eq!(None::<i64>.to_value(), Value::Null);
        assert_eq!(Some(3i64).to_value(), Value::Int(3));
    }

    #[test]
    fn char_is_text() {
        assert_eq!('x'.to_value(), Value::Text("x".to_string()));
    }
}
