//! Validation Pipeline Property Tests
//!
//! - Exactly one of Success / Failure per call
//! - Same input always yields the same result
//! - A successful value re-validates successfully
//! - Undeclared input fields never reach the output
//! - Issues follow field declaration order

use chrono::NaiveDate;
use intake::pipeline::{validate, validate_async, IssueCode, PathSegment, ValidationPipeline};
use intake::schema::{predicates, FieldSpec, FieldType, Predicate, Schema};
use serde::Deserialize;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn contact_schema() -> Schema {
    Schema::builder("contact", "1")
        .field(FieldSpec::string("email").email())
        .field(FieldSpec::string("name").min_length(2))
        .build()
        .unwrap()
}

fn dimension_schema(allowed: &[i64]) -> Schema {
    Schema::builder("panel", "1")
        .field(
            FieldSpec::integer("dimension")
                .refine(predicates::one_of(allowed.iter().copied(), "Dimension Incorrecta")),
        )
        .build()
        .unwrap()
}

fn order_schema() -> Schema {
    Schema::builder("order", "1")
        .field(FieldSpec::string("reference").trim().uppercase().length(6))
        .field(FieldSpec::date("placed_on"))
        .field(FieldSpec::datetime("confirmed_at").optional())
        .field(FieldSpec::number("total").min(0.0))
        .field(FieldSpec::integer("quantity").coerce().min(1.0))
        .field(FieldSpec::boolean("gift").default_value(false))
        .field(FieldSpec::array(
            "lines",
            FieldSpec::element(FieldType::Object {
                fields: vec![
                    FieldSpec::string("sku").min_length(1),
                    FieldSpec::integer("count").min(1.0),
                ],
            }),
        ))
        .field(FieldSpec::object(
            "shipping",
            vec![
                FieldSpec::string("city"),
                FieldSpec::string("zip").pattern(regex::Regex::new(r"^\d{5}$").unwrap()),
            ],
        ))
        .build()
        .unwrap()
}

fn valid_order() -> Value {
    json!({
        "reference": "  ab12cd ",
        "placed_on": "2024-03-01",
        "confirmed_at": "2024-03-01T10:15:00Z",
        "total": 42.5,
        "quantity": "3",
        "lines": [{"sku": "X-1", "count": 2}, {"sku": "X-2", "count": 1}],
        "shipping": {"city": "Lyon", "zip": "69001"}
    })
}

// =============================================================================
// Reference Scenarios
// =============================================================================

#[test]
fn test_contact_with_two_failures() {
    let result = validate(&contact_schema(), &json!({"email": "bad", "name": "A"}));

    assert!(result.is_failure());
    let issues = result.issues();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].path, vec![PathSegment::Field("email".into())]);
    assert_eq!(issues[0].code, IssueCode::PatternMismatch);
    assert_eq!(issues[1].path, vec![PathSegment::Field("name".into())]);
    assert_eq!(issues[1].code, IssueCode::LengthOrRangeViolation);
}

#[test]
fn test_contact_success() {
    let result = validate(&contact_schema(), &json!({"email": "a@b.com", "name": "Al"}));

    let value = result.value().expect("success");
    assert_eq!(value.get("email").and_then(|v| v.as_str()), Some("a@b.com"));
    assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("Al"));
}

#[test]
fn test_dimension_outside_allowed_set() {
    let result = validate(&dimension_schema(&[10, 20]), &json!({"dimension": 15}));

    let issue = result.first_issue().expect("failure");
    assert_eq!(issue.code, IssueCode::CustomPredicateFailure);
    assert_eq!(issue.message, "Dimension Incorrecta");
    assert_eq!(issue.field().as_deref(), Some("dimension"));
}

#[test]
fn test_dimension_inside_allowed_set() {
    let result = validate(&dimension_schema(&[10, 20]), &json!({"dimension": 20}));
    assert!(result.is_success());
}

#[test]
fn test_date_string_becomes_date() {
    let schema = Schema::builder("event", "1")
        .field(FieldSpec::date("day"))
        .build()
        .unwrap();

    let result = validate(&schema, &json!({"day": "2024-01-01"}));
    let day = result.value().and_then(|v| v.get("day")).and_then(|v| v.as_date());
    assert_eq!(day, NaiveDate::from_ymd_opt(2024, 1, 1));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_exactly_one_outcome() {
    let schema = order_schema();
    let inputs = [
        valid_order(),
        json!({}),
        json!([]),
        json!(null),
        json!({"reference": 7}),
    ];

    for input in &inputs {
        let result = validate(&schema, input);
        assert_ne!(result.is_success(), result.is_failure());
        if result.is_failure() {
            assert!(!result.issues().is_empty());
        }
    }
}

#[test]
fn test_validation_is_deterministic() {
    let schema = order_schema();
    let mut broken = valid_order();
    broken["lines"][1]["count"] = json!(0);
    broken["shipping"]["zip"] = json!("6900");

    for input in [valid_order(), broken] {
        let first = validate(&schema, &input);
        for _ in 0..50 {
            assert_eq!(validate(&schema, &input), first);
        }
    }
}

#[test]
fn test_success_value_round_trips() {
    let schema = order_schema();
    let first = validate(&schema, &valid_order());
    let value = first.value().expect("success").to_json();

    let second = validate(&schema, &value);
    assert_eq!(second.value().map(|v| v.to_json()), Some(value));
}

#[test]
fn test_extraneous_fields_dropped() {
    let mut input = valid_order();
    input["internal_flag"] = json!(true);
    input["shipping"]["note"] = json!("leave at door");
    input["lines"][0]["discount"] = json!(5);

    let result = validate(&order_schema(), &input);
    let value = result.value().expect("success").to_json();

    assert!(value.get("internal_flag").is_none());
    assert!(value["shipping"].get("note").is_none());
    assert!(value["lines"][0].get("discount").is_none());
}

#[test]
fn test_transforms_defaults_and_coercion_applied() {
    let result = validate(&order_schema(), &valid_order());
    let value = result.value().expect("success").to_json();

    assert_eq!(value["reference"], "AB12CD");
    assert_eq!(value["quantity"], 3);
    assert_eq!(value["gift"], false);
    assert_eq!(value["placed_on"], "2024-03-01");
}

#[test]
fn test_issue_order_follows_declaration() {
    let input = json!({
        "reference": "short",
        "placed_on": "March 1st",
        "total": -1,
        "quantity": "many",
        "lines": [{"sku": "", "count": 1}],
        "shipping": {"city": "Lyon", "zip": "x"}
    });

    let result = validate(&order_schema(), &input);
    let paths: Vec<String> = result.issues().iter().map(|i| i.dotted_path()).collect();
    assert_eq!(
        paths,
        vec![
            "reference",
            "placed_on",
            "total",
            "quantity",
            "lines[0].sku",
            "shipping.zip"
        ]
    );

    let codes: Vec<IssueCode> = result.issues().iter().map(|i| i.code).collect();
    assert_eq!(
        codes,
        vec![
            IssueCode::LengthOrRangeViolation,
            IssueCode::CoercionError,
            IssueCode::LengthOrRangeViolation,
            IssueCode::CoercionError,
            IssueCode::LengthOrRangeViolation,
            IssueCode::PatternMismatch,
        ]
    );
}

#[test]
fn test_one_issue_per_field() {
    // Too short and failing the predicate: only the first failure counts
    let schema = Schema::builder("tag", "1")
        .field(
            FieldSpec::string("label")
                .min_length(3)
                .refine(Predicate::new("Reserved", |v| v.as_str() != Some("x"))),
        )
        .build()
        .unwrap();

    let result = validate(&schema, &json!({"label": "x"}));
    assert_eq!(result.issues().len(), 1);
    assert_eq!(result.issues()[0].code, IssueCode::LengthOrRangeViolation);
}

// =============================================================================
// Typed Output
// =============================================================================

#[derive(Debug, Deserialize, PartialEq)]
struct Contact {
    email: String,
    name: String,
}

#[test]
fn test_parse_into_dto() {
    let pipeline = ValidationPipeline::new(contact_schema());
    let contact: Contact = pipeline
        .parse(&json!({"email": "a@b.com", "name": "Al", "admin": true}))
        .unwrap();

    assert_eq!(
        contact,
        Contact {
            email: "a@b.com".into(),
            name: "Al".into()
        }
    );
}

#[test]
fn test_parse_failure_carries_issues() {
    let pipeline = ValidationPipeline::new(contact_schema());
    let failure = pipeline
        .parse::<Contact>(&json!({"email": "bad", "name": "A"}))
        .unwrap_err();

    assert_eq!(failure.issues.len(), 2);
    assert_eq!(failure.first().and_then(|i| i.field()).as_deref(), Some("email"));
}

// =============================================================================
// Async Predicates
// =============================================================================

#[tokio::test]
async fn test_async_predicate_runs_in_field_order() {
    let schema = Schema::builder("signup", "1")
        .field(
            FieldSpec::string("username").refine(Predicate::new_async(
                "Username already taken",
                |value| async move { value.as_str() != Some("root") },
            )),
        )
        .field(FieldSpec::string("email").email())
        .build()
        .unwrap();

    let result = validate_async(&schema, &json!({"username": "root", "email": "nope"})).await;
    let codes: Vec<IssueCode> = result.issues().iter().map(|i| i.code).collect();
    assert_eq!(
        codes,
        vec![IssueCode::CustomPredicateFailure, IssueCode::PatternMismatch]
    );
    assert_eq!(result.issues()[0].message, "Username already taken");

    let ok = validate_async(&schema, &json!({"username": "ada", "email": "a@b.com"})).await;
    assert!(ok.is_success());
}
