use crate::{
    coerce::Builtin,
    error::{Error, SchemaError},
    record::Record,
    schema::{PropertyDefinition, PropertyOptions, PropertySchema},
    value::Value,
};
use std::sync::Arc;

fn schema() -> PropertySchema {
    PropertySchema::new("Person")
}

fn names<'a>(properties: impl Iterator<Item = &'a PropertyDefinition>) -> Vec<&'a str> {
    properties.map(|p| p.name()).collect()
}

fn noop(_: &mut Record, _: &Value) -> Result<(), Error> {
    Ok(())
}

#[test]
fn declare_creates_required_writable_properties_by_default() {
    let mut schema = schema();
    let name = schema.declare("name", PropertyOptions::new()).unwrap();

    assert_eq!(name, "name");
    let property = schema.lookup("name").unwrap();
    assert!(property.is_required());
    assert!(!property.is_readonly());
    assert!(property.coercer().is_none());
    assert!(property.default_value().is_none());
}

#[test]
fn redeclaring_merges_only_supplied_options() {
    let mut schema = schema();
    schema
        .declare(
            "age",
            PropertyOptions::new().coerce(Builtin::Integer).default(1),
        )
        .unwrap();
    schema
        .declare("age", PropertyOptions::new().optional())
        .unwrap();

    assert_eq!(schema.properties().len(), 1);
    let age = schema.lookup("age").unwrap();
    assert!(!age.is_required());
    assert_eq!(age.coercer().unwrap().describe(), "integer");
    assert!(age.default_value().is_some());
}

#[test]
fn redeclaring_through_an_alias_updates_the_canonical_property() {
    let mut schema = schema();
    schema
        .declare("first_name", PropertyOptions::new().alias("fname"))
        .unwrap();
    let canonical = schema
        .declare("fname", PropertyOptions::new().coerce(Builtin::String))
        .unwrap();

    assert_eq!(canonical, "first_name");
    assert_eq!(schema.properties().len(), 1);
    assert!(schema.lookup("first_name").unwrap().coercer().is_some());
}

#[test]
fn aliases_resolve_to_the_canonical_property() {
    let mut schema = schema();
    schema
        .declare("first_name", PropertyOptions::new().aliases(["fname", "given"]))
        .unwrap();

    for name in ["first_name", "fname", "given"] {
        assert_eq!(schema.lookup(name).unwrap().name(), "first_name");
    }
    assert_eq!(
        schema.lookup("first_name").unwrap().aliases(),
        &["fname".to_string(), "given".to_string()]
    );
}

#[test]
fn alias_conflicts_are_rejected() {
    let mut schema = schema();
    schema.declare("first_name", PropertyOptions::new()).unwrap();
    schema
        .declare("last_name", PropertyOptions::new().alias("name"))
        .unwrap();

    let err = schema
        .alias_property("name", "first_name", false)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Schema(SchemaError::AliasConflict { ref existing, .. }) if existing == "last_name"
    ));

    let err = schema
        .alias_property("last_name", "first_name", false)
        .unwrap_err();
    assert!(matches!(err, Error::Schema(SchemaError::AliasConflict { .. })));
}

#[test]
fn empty_names_are_rejected() {
    let err = schema().declare("", PropertyOptions::new()).unwrap_err();

    assert!(matches!(err, Error::Schema(SchemaError::EmptyName { .. })));
}

#[test]
fn aliasing_an_unknown_property_fails() {
    let err = schema().alias_property("x", "missing", false).unwrap_err();

    assert_eq!(err.to_string(), "(Person) Unrecognized property \"missing\".");
}

#[test]
fn lookup_or_fail_reports_unrecognized_names() {
    let err = schema().lookup_or_fail("age").unwrap_err();

    assert!(matches!(err, Error::UnrecognizedProperty { ref name, .. } if name == "age"));
}

#[test]
fn name_transform_applies_to_declarations_and_lookups() {
    let mut schema = schema();
    schema.set_transform(Arc::new(|name: &str| name.to_lowercase().replace('-', "_")));
    schema
        .declare("First-Name", PropertyOptions::new().alias("FName"))
        .unwrap();

    assert_eq!(schema.properties()[0].name(), "first_name");
    assert!(schema.has_property("FIRST-NAME"));
    assert!(schema.has_property("fname"));
}

#[test]
fn readonly_properties_get_a_noop_default() {
    let mut schema = schema();
    schema
        .declare("snapshot", PropertyOptions::new().readonly(true))
        .unwrap();

    assert!(schema.lookup("snapshot").unwrap().default_value().is_some());
}

#[test]
fn redeclaring_as_writable_drops_the_noop_default() {
    let mut schema = schema();
    schema
        .declare("snapshot", PropertyOptions::new().alias("snap").readonly(true))
        .unwrap();
    schema
        .declare("snapshot", PropertyOptions::new().readonly(false))
        .unwrap();

    let property = schema.lookup("snapshot").unwrap();
    assert!(!property.is_readonly());
    assert!(property.default_value().is_none());
    assert!(!schema.resolve("snap").unwrap().readonly_alias);
}

#[test]
fn explicit_defaults_survive_a_readonly_flip() {
    let mut schema = schema();
    schema
        .declare("status", PropertyOptions::new().readonly(true).default("new"))
        .unwrap();
    schema
        .declare("status", PropertyOptions::new().readonly(false))
        .unwrap();

    assert!(schema.lookup("status").unwrap().default_value().is_some());
}

#[test]
fn views_split_readonly_from_writable() {
    let mut schema = schema();
    schema.declare("name", PropertyOptions::new()).unwrap();
    schema
        .declare("nickname", PropertyOptions::new().optional())
        .unwrap();
    schema
        .declare("created", PropertyOptions::new().readonly(true))
        .unwrap();

    assert_eq!(names(schema.writable_properties()), ["name", "nickname"]);
    assert_eq!(names(schema.readonly_properties()), ["created"]);
    // readonly properties never count as required
    assert_eq!(names(schema.required_properties()), ["name"]);
}

#[test]
fn after_writing_attribute_requires_a_known_property() {
    let mut schema = schema();
    schema.declare("price", PropertyOptions::new()).unwrap();

    schema
        .after_writing_attribute("price", Arc::new(noop))
        .unwrap();
    assert_eq!(
        schema.lookup("price").unwrap().after_write_callbacks().len(),
        1
    );

    let err = schema
        .after_writing_attribute("cost", Arc::new(noop))
        .unwrap_err();
    assert!(matches!(err, Error::UnrecognizedProperty { .. }));
}

#[test]
fn inherited_schemas_are_independent() {
    let mut parent = schema();
    parent.declare("name", PropertyOptions::new()).unwrap();

    let mut child = parent.inherit_into("Employee");
    child
        .declare("name", PropertyOptions::new().default(Value::from("anon")))
        .unwrap();
    child.declare("badge", PropertyOptions::new()).unwrap();

    assert_eq!(child.type_name(), "Employee");
    assert_eq!(child.properties().len(), 2);
    assert_eq!(parent.properties().len(), 1);
    assert!(parent.lookup("name").unwrap().default_value().is_none());
    assert!(!parent.has_property("badge"));
}

#[test]
fn properties_compare_by_name_only() {
    let mut a = schema();
    a.declare("name", PropertyOptions::new()).unwrap();
    let mut b = schema();
    b.declare("name", PropertyOptions::new().coerce(Builtin::String).optional())
        .unwrap();

    assert_eq!(a.properties()[0], b.properties()[0]);
}
