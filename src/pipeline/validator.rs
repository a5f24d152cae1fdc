//! Payload validation against a schema
//!
//! Evaluation order:
//! - Fields are visited in declaration order
//! - Per field: presence → type check → coercion → constraints → predicates
//! - The first failure inside a field ends that field; the next field is
//!   still evaluated, so the issue list is complete
//! - Nested objects and array elements follow the same rules and report
//!   paths relative to the payload root
//!
//! Validation is a pure function of (schema, input). It never returns an
//! error: every problem is an issue inside the result.

use std::sync::{Arc, OnceLock};

use futures_util::future::{BoxFuture, FutureExt};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::coerce;
use super::result::{Issue, IssueCode, PathSegment, ValidationFailure, ValidationResult};
use crate::schema::{Constraint, ConstraintSpec, FieldSpec, FieldType, Schema};
use crate::value::{json_type_name, TypedRecord, TypedValue};

/// Validates `input` against `schema`.
///
/// # Panics
///
/// Panics if the schema declares asynchronous predicates; such schemas must
/// go through [`validate_async`].
pub fn validate(schema: &Schema, input: &Value) -> ValidationResult {
    assert!(
        !schema.is_async(),
        "schema {} declares asynchronous predicates; use validate_async",
        schema
    );
    // Without async predicates no step ever suspends.
    validate_async(schema, input)
        .now_or_never()
        .expect("synchronous schema validation suspended")
}

/// Validates `input` against `schema`, awaiting async predicates one field
/// at a time in declaration order.
pub async fn validate_async(schema: &Schema, input: &Value) -> ValidationResult {
    let Some(obj) = input.as_object() else {
        return ValidationResult::Failure {
            issues: vec![Issue::new(
                Vec::new(),
                IssueCode::TypeMismatch,
                format!("Expected object, received {}", json_type_name(input)),
            )],
        };
    };

    let mut issues = Vec::new();
    let record = validate_record(&schema.fields, obj, &[], &mut issues).await;
    ValidationResult::from_parts(record, issues)
}

/// A schema bound for repeated use.
///
/// Cheap to clone; the schema is shared and never mutated.
#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    schema: Arc<Schema>,
}

impl ValidationPipeline {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// See [`validate`]
    pub fn validate(&self, input: &Value) -> ValidationResult {
        validate(&self.schema, input)
    }

    pub async fn validate_async(&self, input: &Value) -> ValidationResult {
        validate_async(&self.schema, input).await
    }

    /// Validates and deserializes the typed record into a DTO.
    pub fn parse<T: DeserializeOwned>(&self, input: &Value) -> Result<T, ValidationFailure> {
        into_dto(self.validate(input))
    }

    pub async fn parse_async<T: DeserializeOwned>(
        &self,
        input: &Value,
    ) -> Result<T, ValidationFailure> {
        into_dto(self.validate_async(input).await)
    }
}

impl From<Arc<Schema>> for ValidationPipeline {
    fn from(schema: Arc<Schema>) -> Self {
        Self { schema }
    }
}

/// A DTO that cannot hold a schema-valid record is reported as a root issue.
fn into_dto<T: DeserializeOwned>(
    result: ValidationResult,
) -> Result<T, ValidationFailure> {
    let record = result.into_result()?;
    record.into_dto().map_err(|e| ValidationFailure {
        issues: vec![Issue::new(
            Vec::new(),
            IssueCode::TypeMismatch,
            format!("Payload does not match the expected shape: {}", e),
        )],
    })
}

enum FieldOutcome {
    Value(TypedValue),
    Omitted,
    Invalid,
}

fn child(path: &[PathSegment], segment: PathSegment) -> Vec<PathSegment> {
    let mut out = Vec::with_capacity(path.len() + 1);
    out.extend_from_slice(path);
    out.push(segment);
    out
}

fn validate_record<'a>(
    fields: &'a [FieldSpec],
    obj: &'a Map<String, Value>,
    path: &'a [PathSegment],
    issues: &'a mut Vec<Issue>,
) -> BoxFuture<'a, TypedRecord> {
    async move {
        let mut record = TypedRecord::new();
        for field in fields {
            let field_path = child(path, PathSegment::Field(field.name.clone()));
            let outcome = validate_field(field, obj.get(&field.name), field_path, &mut *issues).await;
            if let FieldOutcome::Value(value) = outcome {
                record.insert(field.name.clone(), value);
            }
        }
        record
    }
    .boxed()
}

fn validate_field<'a>(
    spec: &'a FieldSpec,
    raw: Option<&'a Value>,
    path: Vec<PathSegment>,
    issues: &'a mut Vec<Issue>,
) -> BoxFuture<'a, FieldOutcome> {
    async move {
        // Presence
        let raw = match raw.or(spec.default.as_ref()) {
            Some(raw) => raw,
            None if spec.required => {
                let message = spec
                    .messages
                    .required
                    .clone()
                    .unwrap_or_else(|| "Required".to_string());
                issues.push(Issue::new(path, IssueCode::MissingRequiredField, message));
                return FieldOutcome::Invalid;
            }
            None => return FieldOutcome::Omitted,
        };

        if raw.is_null() {
            if spec.nullable {
                return FieldOutcome::Value(TypedValue::Null);
            }
            issues.push(type_mismatch(spec, raw, path));
            return FieldOutcome::Invalid;
        }

        // Type check and coercion
        let value = match &spec.field_type {
            FieldType::Object { fields } => {
                let Some(obj) = raw.as_object() else {
                    issues.push(type_mismatch(spec, raw, path));
                    return FieldOutcome::Invalid;
                };
                let before = issues.len();
                let record = validate_record(fields, obj, &path, &mut *issues).await;
                if issues.len() > before {
                    return FieldOutcome::Invalid;
                }
                TypedValue::Object(record)
            }
            FieldType::Array { element } => {
                let Some(items) = raw.as_array() else {
                    issues.push(type_mismatch(spec, raw, path));
                    return FieldOutcome::Invalid;
                };
                let before = issues.len();
                let mut values = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = child(&path, PathSegment::Index(i));
                    if let FieldOutcome::Value(value) =
                        validate_field(element, Some(item), item_path, &mut *issues).await
                    {
                        values.push(value);
                    }
                }
                if issues.len() > before {
                    return FieldOutcome::Invalid;
                }
                TypedValue::Array(values)
            }
            _ => match convert_scalar(spec, raw) {
                Ok(value) => value,
                Err(Rejected::WrongType) => {
                    issues.push(type_mismatch(spec, raw, path));
                    return FieldOutcome::Invalid;
                }
                Err(Rejected::Coercion(message)) => {
                    issues.push(Issue::new(path, IssueCode::CoercionError, message));
                    return FieldOutcome::Invalid;
                }
            },
        };

        // Range, length and format
        for constraint in &spec.constraints {
            if let Some((code, message)) = check_constraint(constraint, &value) {
                issues.push(Issue::new(path, code, message));
                return FieldOutcome::Invalid;
            }
        }

        // Custom predicates see the coerced value
        for predicate in &spec.predicates {
            if !predicate.evaluate(&value).await {
                issues.push(Issue::new(
                    path,
                    IssueCode::CustomPredicateFailure,
                    predicate.message(),
                ));
                return FieldOutcome::Invalid;
            }
        }

        FieldOutcome::Value(value)
    }
    .boxed()
}

enum Rejected {
    WrongType,
    Coercion(String),
}

fn convert_scalar(spec: &FieldSpec, raw: &Value) -> Result<TypedValue, Rejected> {
    let text = raw.as_str();
    // Strings are accepted for non-string scalars only when coercing
    let coerce_text = if spec.coerce { text } else { None };

    match &spec.field_type {
        FieldType::String => {
            let s = text.ok_or(Rejected::WrongType)?;
            Ok(TypedValue::String(coerce::apply_transforms(s, &spec.transforms)))
        }
        FieldType::Integer => {
            if let Some(s) = coerce_text {
                return coerce::to_integer(s)
                    .map(TypedValue::Integer)
                    .map_err(Rejected::Coercion);
            }
            let n = match raw {
                Value::Number(n) if n.is_i64() || n.is_u64() => n,
                _ => return Err(Rejected::WrongType),
            };
            n.as_i64()
                .map(TypedValue::Integer)
                .ok_or_else(|| Rejected::Coercion(format!("Integer {} is out of range", n)))
        }
        FieldType::Number => {
            if let Some(s) = coerce_text {
                return coerce::to_number(s)
                    .map(TypedValue::Number)
                    .map_err(Rejected::Coercion);
            }
            raw.as_f64().map(TypedValue::Number).ok_or(Rejected::WrongType)
        }
        FieldType::Boolean => {
            if let Some(s) = coerce_text {
                return coerce::to_boolean(s)
                    .map(TypedValue::Bool)
                    .map_err(Rejected::Coercion);
            }
            raw.as_bool().map(TypedValue::Bool).ok_or(Rejected::WrongType)
        }
        FieldType::Date => {
            let s = text.ok_or(Rejected::WrongType)?;
            coerce::to_date(s)
                .map(TypedValue::Date)
                .map_err(Rejected::Coercion)
        }
        FieldType::DateTime => {
            let s = text.ok_or(Rejected::WrongType)?;
            coerce::to_datetime(s)
                .map(TypedValue::DateTime)
                .map_err(Rejected::Coercion)
        }
        FieldType::Object { .. } | FieldType::Array { .. } => Err(Rejected::WrongType),
    }
}

fn type_mismatch(spec: &FieldSpec, raw: &Value, path: Vec<PathSegment>) -> Issue {
    let message = spec.messages.invalid_type.clone().unwrap_or_else(|| {
        format!(
            "Expected {}, received {}",
            spec.field_type.type_name(),
            json_type_name(raw)
        )
    });
    Issue::new(path, IssueCode::TypeMismatch, message)
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email regex is valid")
    })
}

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("url regex is valid"))
}

/// Returns the issue code and message when the constraint is violated
fn check_constraint(spec: &ConstraintSpec, value: &TypedValue) -> Option<(IssueCode, String)> {
    let violation = match (&spec.constraint, value) {
        (Constraint::MinLength { value: n }, TypedValue::String(s)) if s.chars().count() < *n => {
            Some((
                IssueCode::LengthOrRangeViolation,
                format!("String must contain at least {} character(s)", n),
            ))
        }
        (Constraint::MaxLength { value: n }, TypedValue::String(s)) if s.chars().count() > *n => {
            Some((
                IssueCode::LengthOrRangeViolation,
                format!("String must contain at most {} character(s)", n),
            ))
        }
        (Constraint::Length { value: n }, TypedValue::String(s)) if s.chars().count() != *n => {
            Some((
                IssueCode::LengthOrRangeViolation,
                format!("String must contain exactly {} character(s)", n),
            ))
        }
        (Constraint::MinLength { value: n }, TypedValue::Array(items)) if items.len() < *n => Some((
            IssueCode::LengthOrRangeViolation,
            format!("Array must contain at least {} element(s)", n),
        )),
        (Constraint::MaxLength { value: n }, TypedValue::Array(items)) if items.len() > *n => Some((
            IssueCode::LengthOrRangeViolation,
            format!("Array must contain at most {} element(s)", n),
        )),
        (Constraint::Length { value: n }, TypedValue::Array(items)) if items.len() != *n => Some((
            IssueCode::LengthOrRangeViolation,
            format!("Array must contain exactly {} element(s)", n),
        )),
        (Constraint::Min { value: bound }, v) if v.as_f64().map_or(false, |x| x < *bound) => Some((
            IssueCode::LengthOrRangeViolation,
            format!("Number must be greater than or equal to {}", bound),
        )),
        (Constraint::Max { value: bound }, v) if v.as_f64().map_or(false, |x| x > *bound) => Some((
            IssueCode::LengthOrRangeViolation,
            format!("Number must be less than or equal to {}", bound),
        )),
        (Constraint::Pattern { regex }, TypedValue::String(s)) if !regex.is_match(s) => Some((
            IssueCode::PatternMismatch,
            format!("String must match pattern {}", regex.as_str()),
        )),
        (Constraint::Email, TypedValue::String(s)) if !email_regex().is_match(s) => {
            Some((IssueCode::PatternMismatch, "Invalid email".to_string()))
        }
        (Constraint::Url, TypedValue::String(s)) if !url_regex().is_match(s) => {
            Some((IssueCode::PatternMismatch, "Invalid url".to_string()))
        }
        _ => None,
    };

    violation.map(|(code, default_message)| (code, spec.message.clone().unwrap_or(default_message)))
}
