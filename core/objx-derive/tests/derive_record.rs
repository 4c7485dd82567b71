//! derive(Record) 매크로 테스트

use objx_core::{AttributeRegistry, FieldType, ObjectStore, ObjxResult, Record, Value};

#[derive(Debug, Clone, Record)]
#[objx(name = "users")]
pub struct User {
    #[objx(identity)]
    pub id: i64,
    pub name: String,
    pub age: u8,
    pub email: Option<String>,
    #[objx(skip)]
    pub avatar: Vec<u8>,
}

#[derive(Debug, Clone, Record)]
pub struct Reading {
    pub sensor: char,
    #[objx(identity)]
    pub seq: u64,
    pub celsius: f32,
    pub valid: bool,
}

fn user() -> User {
    User {
        id: 1,
        name: "Alice".to_string(),
        age: 30,
        email: None,
        avatar: vec![0xff],
    }
}

#[test]
fn test_type_name() {
    assert_eq!(User::TYPE_NAME, "users");
    assert_eq!(Reading::TYPE_NAME, "reading");
}

#[test]
fn test_identity() {
    assert_eq!(User::IDENTITY, "id");
    assert_eq!(Reading::IDENTITY, "seq");
}

#[test]
fn test_declared_fields() {
    let fields = User::declared_fields();
    let names: Vec<_> = fields.iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["id", "name", "age", "email", "avatar"]);

    assert_eq!(fields[0].ty, FieldType::Int);
    assert_eq!(fields[1].ty, FieldType::Text);
    assert!(fields[3].nullable);
    assert_eq!(fields[4].ty, FieldType::Opaque);
    assert!(fields[4].accessor.is_none());
}

#[test]
fn test_accessors() {
    let fields = User::declared_fields();
    let values: Vec<_> = fields
        .iter()
        .filter_map(|f| f.accessor)
        .map(|get| get(&user()))
        .collect();
    assert_eq!(
        values,
        vec![
            Value::Int(1),
            Value::Text("Alice".to_string()),
            Value::Int(30),
            Value::Null,
        ]
    );
}

#[test]
fn test_registry_from_derive() {
    let registry = AttributeRegistry::<Reading>::build();
    assert_eq!(registry.names(), vec!["sensor", "seq", "celsius", "valid"]);
    assert_eq!(registry.get("seq").unwrap().field_type(), FieldType::UInt);
    assert_eq!(registry.get("valid").unwrap().field_type(), FieldType::Bool);
    assert_eq!(registry.get("celsius").unwrap().field_type(), FieldType::Float32);

    let reading = Reading {
        sensor: 'a',
        seq: 9,
        celsius: 21.5,
        valid: true,
    };
    assert_eq!(
        registry.get("celsius").unwrap().value_of(&reading),
        Value::Float(21.5)
    );
    assert_eq!(
        registry.get("sensor").unwrap().value_of(&reading),
        Value::Text("a".to_string())
    );
}

#[test]
fn test_f32_field_matches_decimal_literal() -> ObjxResult<()> {
    let store = ObjectStore::<Reading>::new()?;
    store.save(Reading {
        sensor: 'b',
        seq: 1,
        celsius: 0.1,
        valid: true,
    })?;

    assert_eq!(store.query("equal(celsius,0.1)")?.len(), 1);
    assert_eq!(store.query("greater_than(celsius,0.1)")?.len(), 0);
    assert_eq!(store.query("less_than(celsius,0.1)")?.len(), 0);
    assert_eq!(store.query("greater_than(celsius,0.09)")?.len(), 1);
    Ok(())
}
