//! Comparable scalar values extracted from records.
//!
//! [`Value`] is the key type of every navigable index, so its ordering must be
//! total: floats compare with `f64::total_cmp`, and values of different
//! variants are ordered by variant rank.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Int,
    UInt,
    Float,
    /// `f32` field, stored widened to `f64`. Literals are rounded to `f32`
    /// first so they widen to the same bits as the stored value.
    Float32,
    Text,
    /// Not comparable; never registered as an attribute.
    Opaque,
}

impl FieldType {
    pub fn is_comparable(&self) -> bool {
        !matches!(self, FieldType::Opaque)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::UInt => "uint",
            FieldType::Float => "float",
            FieldType::Float32 => "float32",
            FieldType::Text => "text",
            FieldType::Opaque => "opaque",
        }
    }
}

/// Owned comparable value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::UInt(_) => 3,
            Value::Float(_) => 4,
            Value::Text(_) => 5,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts a raw query literal into a value of the given field type.
    ///
    /// Text requires a quoted literal (`"Bob"` or `'Bob'`); numbers and
    /// booleans are bare. `null` is only accepted when `nullable` is set.
    pub fn coerce_literal(raw: &str, ty: FieldType, nullable: bool) -> Result<Value, String> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("null") {
            return if nullable {
                Ok(Value::Null)
            } else {
                Err(format!("null is not allowed for {} field", ty.as_str()))
            };
        }

        match ty {
            FieldType::Text => unquote(raw)
                .map(Value::Text)
                .ok_or_else(|| format!("expected quoted string literal, got {raw}")),
            FieldType::Int => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("expected integer literal, got {raw}")),
            FieldType::UInt => raw
                .parse::<u64>()
                .map(Value::UInt)
                .map_err(|_| format!("expected unsigned integer literal, got {raw}")),
            FieldType::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("expected numeric literal, got {raw}")),
            FieldType::Float32 => raw
                .parse::<f32>()
                .map(|v| Value::Float(f64::from(v)))
                .map_err(|_| format!("expected numeric literal, got {raw}")),
            FieldType::Bool => {
                if raw.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(format!("expected boolean literal, got {raw}"))
                }
            }
            FieldType::Opaque => Err("opaque fields cannot be queried".to_string()),
        }
    }
}

/// Strips matching single or double quotes and resolves backslash escapes.
/// Returns `None` if `raw` is not a complete quoted literal.
pub fn unquote(raw: &str) -> Option<String> {
    let quote = raw.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if raw.len() < 2 || !raw.ends_with(quote) {
        return None;
    }

    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            c if c == quote => return None,
            c => out.push(c),
        }
    }
    Some(out)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::UInt(a), Value::UInt(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::UInt(v) => v.hash(state),
            // total_cmp equality is bit equality
            Value::Float(v) => v.to_bits().hash(state),
            Value::Text(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Text(v) => {
                f.write_str("\"")?;
                for c in v.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("\"")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_within_variant() {
        assert!(Value::Int(1) < Value::Int(2));
        assert!(Value::Text("a".into()) < Value::Text("b".into()));
        assert!(Value::Float(-0.5) < Value::Float(0.5));
        assert!(Value::Bool(false) < Value::Bool(true));
    }

    #[test]
    fn null_sorts_first() {
        assert!(Value::Null < Value::Bool(false));
        assert!(Value::Null < Value::Int(i64::MIN));
        assert!(Value::Null < Value::Text(String::new()));
    }

    #[test]
    fn float_total_order_is_consistent_with_eq() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert!(Value::Float(f64::INFINITY) < nan);
    }

    #[test]
    fn coerce_text_requires_quotes() {
        assert_eq!(
            Value::coerce_literal("\"Bob\"", FieldType::Text, false).unwrap(),
            Value::Text("Bob".into())
        );
        assert_eq!(
            Value::coerce_literal("'Bob'", FieldType::Text, false).unwrap(),
            Value::Text("Bob".into())
        );
        assert!(Value::coerce_literal("Bob", FieldType::Text, false).is_err());
    }

    #[test]
    fn coerce_numbers() {
        assert_eq!(
            Value::coerce_literal("-42", FieldType::Int, false).unwrap(),
            Value::Int(-42)
        );
        assert_eq!(
            Value::coerce_literal("42", FieldType::UInt, false).unwrap(),
            Value::UInt(42)
        );
        assert_eq!(
            Value::coerce_literal("3", FieldType::Float, false).unwrap(),
            Value::Float(3.0)
        );
        assert!(Value::coerce_literal("1.5", FieldType::Int, false).is_err());
        assert!(Value::coerce_literal("x", FieldType::Float32, false).is_err());
        assert!(Value::coerce_literal("-1", FieldType::UInt, false).is_err());
    }

    #[test]
    fn coerce_float32_matches_widened_field() {
        let stored = Value::Float(f64::from(0.1f32));
        assert_eq!(
            Value::coerce_literal("0.1", FieldType::Float32, false).unwrap(),
            stored
        );
        assert_ne!(
            Value::coerce_literal("0.1", FieldType::Float, false).unwrap(),
            stored
        );
    }

    #[test]
    fn coerce_bool_and_null() {
        assert_eq!(
            Value::coerce_literal("TRUE", FieldType::Bool, false).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Value::coerce_literal("null", FieldType::Int, true).unwrap(),
            Value::Null
        );
        assert!(Value::coerce_literal("null", FieldType::Int, false).is_err());
    }

    #[test]
    fn unquote_handles_escapes() {
        assert_eq!(unquote(r#""a\"b""#).as_deref(), Some("a\"b"));
        assert_eq!(unquote(r"'it\'s'").as_deref(), Some("it's"));
        assert_eq!(unquote("\"open"), None);
        assert_eq!(unquote("\""), None);
        assert_eq!(unquote("\"a\"b\""), None);
    }

    #[test]
    fn display_renders_literal_syntax() {
        assert_eq!(Value::Text("say \"hi\"".into()).to_string(), r#""say \"hi\"""#);
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
