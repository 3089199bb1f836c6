use crate::{
    coerce::{Builtin, CoerceContext, Coercer, coerce},
    error::{CoerceError, Error},
    schema::{PropertyDefinition, PropertyOptions},
    struct_type::StructType,
    test_support::{address, map, symbols},
    types::{Date, Decimal, Timestamp},
    value::Value,
};
use chrono::{DateTime, FixedOffset};
use proptest::prelude::*;
use std::sync::LazyLock;

// ---- helpers -----------------------------------------------------------

fn apply(coercer: impl Into<Coercer>, value: impl Into<Value>) -> Result<Value, CoerceError> {
    coercer.into().apply(&value.into(), false)
}

fn ok(coercer: impl Into<Coercer>, value: impl Into<Value>) -> Value {
    apply(coercer, value).expect("coercion should succeed")
}

fn err_kind(coercer: impl Into<Coercer>, value: impl Into<Value>) -> &'static str {
    apply(coercer, value)
        .expect_err("coercion should fail")
        .kind()
}

fn property(name: &str, options: PropertyOptions) -> PropertyDefinition {
    PropertyDefinition::new(name.to_string(), options)
}

static NODE: LazyLock<StructType> = LazyLock::new(|| {
    StructType::builder("Node")
        .property("value", PropertyOptions::new().coerce(Builtin::Integer))
        .property(
            "children",
            PropertyOptions::new()
                .coerce(Coercer::array_of(Coercer::deferred("Node", || {
                    NODE.clone()
                })))
                .optional(),
        )
        .build()
        .expect("node type should build")
});

// ---- builtins ----------------------------------------------------------

#[test]
fn builtin_tags_round_trip() {
    for builtin in Builtin::ALL {
        assert_eq!(Builtin::from_tag(builtin.tag()), Some(builtin));
    }
    assert_eq!(Builtin::from_tag("uuid"), None);
}

#[test]
fn array_wraps_scalars_and_pairs_maps() {
    assert_eq!(ok(Builtin::Array, Value::Null), Value::List(Vec::new()));
    assert_eq!(ok(Builtin::Array, 3), Value::list([3]));
    assert_eq!(ok(Builtin::Array, Value::list([1, 2])), Value::list([1, 2]));
    assert_eq!(
        ok(Builtin::Array, map([("a", 1)])),
        Value::list([Value::list([Value::from("a"), Value::from(1)])])
    );
}

#[test]
fn big_decimal_parses_exactly() {
    assert_eq!(
        ok(Builtin::BigDecimal, "12.34"),
        Value::Decimal(Decimal::new(1234, 2))
    );
    assert_eq!(
        ok(Builtin::BigDecimal, " 1.5e2 "),
        Value::Decimal(Decimal::from_i64(150))
    );
    assert_eq!(ok(Builtin::BigDecimal, 7), Value::Decimal(Decimal::from_i64(7)));
    assert_eq!(err_kind(Builtin::BigDecimal, "twelve"), "InvalidNumber");
}

#[test]
fn big_decimal_rejects_floats() {
    let err = apply(Builtin::BigDecimal, 12.34).unwrap_err();

    assert!(matches!(err, CoerceError::FloatPrecision { .. }));
    assert!(err.to_string().contains("precision"));
}

#[test]
fn boolean_never_yields_null() {
    assert_eq!(ok(Builtin::Boolean, Value::Null), Value::Bool(false));
    assert_eq!(ok(Builtin::Boolean, false), Value::Bool(false));
    assert_eq!(ok(Builtin::Boolean, 0), Value::Bool(true));
    assert_eq!(ok(Builtin::Boolean, ""), Value::Bool(true));
}

#[test]
fn float_accepts_numbers_and_numeric_text() {
    assert_eq!(ok(Builtin::Float, 2), Value::Float(2.0));
    assert_eq!(ok(Builtin::Float, " 2.5 "), Value::Float(2.5));
    assert_eq!(
        ok(Builtin::Float, Decimal::new(125, 2)),
        Value::Float(1.25)
    );
    assert_eq!(err_kind(Builtin::Float, "abc"), "InvalidNumber");
    assert_eq!(err_kind(Builtin::Float, true), "UnexpectedType");
}

#[test]
fn integer_truncates_numbers_and_parses_text_strictly() {
    assert_eq!(ok(Builtin::Integer, 3.9), Value::Int(3));
    assert_eq!(ok(Builtin::Integer, -3.9), Value::Int(-3));
    assert_eq!(ok(Builtin::Integer, Decimal::new(78, 1)), Value::Int(7));
    assert_eq!(ok(Builtin::Integer, "42"), Value::Int(42));
    assert_eq!(err_kind(Builtin::Integer, "4.2"), "InvalidNumber");
    assert_eq!(err_kind(Builtin::Integer, f64::INFINITY), "InvalidNumber");
}

#[test]
fn string_coercers_stringify() {
    assert_eq!(ok(Builtin::String, 5), Value::from("5"));
    assert_eq!(ok(Builtin::String, Value::symbol("a")), Value::from("a"));
    assert_eq!(ok(Builtin::String, Value::Null), Value::Null);
    assert_eq!(ok(Builtin::NonBlankString, ""), Value::Null);
    assert_eq!(ok(Builtin::NonBlankString, "x"), Value::from("x"));
}

#[test]
fn symbol_accepts_text_only() {
    assert_eq!(ok(Builtin::Symbol, "open"), Value::symbol("open"));
    assert_eq!(err_kind(Builtin::Symbol, 1), "UnexpectedType");
}

#[test]
fn time_in_utc_normalizes_to_utc() {
    let coerced = ok(Builtin::TimeInUtc, "2024-03-01T10:00:00+02:00");
    let Value::Timestamp(ts) = coerced else {
        panic!("expected a timestamp, got {coerced:?}");
    };
    assert!(ts.is_utc());
    assert_eq!(ts, Timestamp::utc(2024, 3, 1, 8, 0, 0).unwrap());

    let midnight = Timestamp::utc(2024, 3, 1, 0, 0, 0).unwrap();
    assert_eq!(
        ok(Builtin::TimeInUtc, "2024-03-01"),
        Value::Timestamp(midnight)
    );
    assert_eq!(
        ok(Builtin::TimeInUtc, Date::new_checked(2024, 3, 1).unwrap()),
        Value::Timestamp(midnight)
    );
    assert_eq!(err_kind(Builtin::TimeInUtc, "yesterday"), "InvalidTime");
}

#[test]
fn time_in_utc_keeps_the_instant_of_offset_timestamps() {
    let tokyo = Timestamp::with_offset(9 * 3600, (2024, 3, 1), (17, 30, 0)).unwrap();
    assert!(!tokyo.is_utc());

    let coerced = ok(Builtin::TimeInUtc, tokyo);
    let Value::Timestamp(ts) = coerced else {
        panic!("expected a timestamp, got {coerced:?}");
    };
    assert!(ts.is_utc());
    assert_eq!(ts, Timestamp::utc(2024, 3, 1, 8, 30, 0).unwrap());
    assert_eq!(ts.to_iso8601(), "2024-03-01T08:30:00.000Z");
}

// ---- composite coercers ------------------------------------------------

#[test]
fn array_of_maps_each_element() {
    assert_eq!(
        ok(symbols(), Value::list(["opened", "closed"])),
        Value::list([Value::symbol("opened"), Value::symbol("closed")])
    );
    assert_eq!(err_kind(symbols(), "opened"), "UnexpectedType");
}

#[test]
fn map_of_coerces_keys_and_values() {
    let coercer = Coercer::map_of(Builtin::Symbol, Builtin::Integer);

    assert_eq!(
        ok(coercer, map([("a", "1"), ("b", "2")])),
        Value::map([(Value::symbol("a"), 1), (Value::symbol("b"), 2)])
    );
}

#[test]
fn callable_and_class_results_are_used_as_is() {
    let doubled = Coercer::callable(|value| {
        value
            .as_int()
            .map(|i| Value::Int(i * 2))
            .ok_or_else(|| "not an integer".into())
    });
    assert_eq!(ok(doubled.clone(), 4), Value::Int(8));

    let err = apply(doubled, "x").unwrap_err();
    assert_eq!(err.kind(), "CustomError");
    assert_eq!(err.to_string(), "not an integer");

    let upper = Coercer::class("Upper", |value| {
        Ok(Value::Text(value.to_plain_string().to_uppercase()))
    });
    assert_eq!(ok(upper, "abc"), Value::from("ABC"));
}

#[test]
fn struct_coercer_constructs_records() {
    let address = address();

    let coerced = ok(&address, map([("city", "Denver")]));
    let record = coerced.as_record().expect("record");
    assert_eq!(record.type_name(), "Address");
    assert_eq!(record.get("city").unwrap(), Value::from("Denver"));

    assert_eq!(err_kind(&address, map([("town", "Denver")])), "StructError");
}

#[test]
fn deferred_struct_coercer_resolves_self_references() {
    let tree = NODE
        .construct(map([
            ("value", Value::from("1")),
            ("children", Value::list([map([("value", 2)])])),
        ]))
        .unwrap();

    let children = tree.get("children").unwrap();
    let child = children.as_list().unwrap()[0].as_record().unwrap();
    assert_eq!(child.get("value").unwrap(), Value::Int(2));
    assert_eq!(child.get("children").unwrap(), Value::Null);
}

#[test]
fn deferred_lookup_fails_until_the_type_exists() {
    let coercer = Coercer::deferred_lookup("Ghost", || None);

    assert_eq!(err_kind(coercer, map([("a", 1)])), "UndefinedStruct");
}

#[test]
fn describe_renders_each_shape() {
    assert_eq!(Coercer::from(Builtin::BigDecimal).describe(), "big_decimal");
    assert_eq!(symbols().describe(), "Array[symbol]");
    assert_eq!(
        Coercer::map_of(Builtin::String, symbols()).describe(),
        "Hash[string => Array[symbol]]"
    );
    assert_eq!(
        Coercer::callable(|v| Ok(v.clone())).describe(),
        "a custom proc"
    );
    assert_eq!(Coercer::class("Money", |v| Ok(v.clone())).describe(), "Money");
    assert_eq!(Coercer::from(&address()).describe(), "Address");
    assert_eq!(
        Coercer::deferred("Later", || unreachable!("describe must not resolve")).describe(),
        "Later"
    );
}

// ---- failure attribution -----------------------------------------------

#[test]
fn failures_name_type_property_and_coercer() {
    let price = property("price", PropertyOptions::new().coerce(Builtin::BigDecimal));
    let ctx = CoerceContext {
        type_name: "Product",
        property: &price,
        allow_writing_readonly: false,
    };

    let err = coerce(&ctx, price.coercer().unwrap(), &Value::Float(12.34)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "(Product) Could not coerce 12.34 for required property \"price\" using big_decimal: \
         can't omit precision for a Float: 12.34 has no exact decimal form (FloatPrecision)"
    );

    let Error::Coercion(failure) = &err else {
        panic!("expected a coercion failure, got {err:?}");
    };
    assert!(failure.required);
    assert_eq!(failure.source.kind(), "FloatPrecision");
    assert!(std::error::Error::source(failure).is_some());
}

#[test]
fn optional_failures_omit_required_qualifier() {
    let tags = property("tags", PropertyOptions::new().coerce(symbols()).optional());
    let ctx = CoerceContext {
        type_name: "Issue",
        property: &tags,
        allow_writing_readonly: false,
    };

    let err = coerce(&ctx, tags.coercer().unwrap(), &Value::Int(1)).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("(Issue) Could not coerce 1 for property \"tags\""));
    assert!(message.contains("Array[symbol]"));
    assert!(message.ends_with("(UnexpectedType)"));
}

// ---- idempotence -------------------------------------------------------

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<bool>().prop_map(Value::Bool),
        "[a-z0-9 ]{0,8}".prop_map(Value::Text),
        Just(Value::Null),
    ]
}

fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    (0i64..4_000_000_000, -720i32..=720).prop_map(|(secs, minutes)| {
        let offset = FixedOffset::east_opt(minutes * 60).expect("offset within a day");
        let utc = DateTime::from_timestamp(secs, 0).expect("timestamp in range");
        Timestamp::new(utc.with_timezone(&offset))
    })
}

proptest! {
    #[test]
    fn boolean_is_idempotent(value in arb_scalar()) {
        let once = ok(Builtin::Boolean, value);
        prop_assert_eq!(ok(Builtin::Boolean, once.clone()), once);
    }

    #[test]
    fn symbol_is_idempotent(name in "[a-z_]{1,12}") {
        let once = ok(Builtin::Symbol, name);
        prop_assert_eq!(ok(Builtin::Symbol, once.clone()), once);
    }

    #[test]
    fn big_decimal_is_idempotent(mantissa in any::<i64>(), scale in 0u32..10) {
        let text = Decimal::new(mantissa, scale).to_string();
        let once = ok(Builtin::BigDecimal, text);
        prop_assert_eq!(ok(Builtin::BigDecimal, once.clone()), once);
    }

    #[test]
    fn time_in_utc_is_idempotent(ts in arb_timestamp()) {
        let once = ok(Builtin::TimeInUtc, ts);
        let twice = ok(Builtin::TimeInUtc, once.clone());
        prop_assert_eq!(&twice, &once);
        prop_assert!(matches!(twice, Value::Timestamp(t) if t.is_utc()));
    }
}
