//! Schema type definitions
//!
//! A schema is an ordered list of field specifications. Field order matters:
//! fields are validated, and issues are reported, in declaration order.
//!
//! Supported field types:
//! - string, integer, number, boolean
//! - date, datetime (always parsed from strings)
//! - object: nested field list
//! - array: homogeneous elements described by a single field spec
//!
//! Everything except custom predicates has a JSON representation so schemas
//! can be declared as data files.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use super::errors::{SchemaError, SchemaResult};
use super::predicates::Predicate;

/// Supported field types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point; integers are accepted
    Number,
    /// Boolean
    Boolean,
    /// Calendar date parsed from `YYYY-MM-DD` or an RFC 3339 timestamp
    Date,
    /// UTC timestamp parsed from RFC 3339 or a bare date
    #[serde(rename = "datetime")]
    DateTime,
    /// Nested object with its own ordered fields
    Object { fields: Vec<FieldSpec> },
    /// Homogeneous array; the element spec's name is ignored
    Array { element: Box<FieldSpec> },
}

impl FieldType {
    /// Returns the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Number)
    }

    fn has_length(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Array { .. })
    }
}

/// String normalizations applied during the coercion step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    Trim,
    Lowercase,
    Uppercase,
}

/// A compiled regular expression with a string representation in JSON.
#[derive(Debug, Clone)]
pub struct PatternRegex(Regex);

impl PatternRegex {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl From<Regex> for PatternRegex {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

impl PartialEq for PatternRegex {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for PatternRegex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PatternRegex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        PatternRegex::new(&pattern).map_err(serde::de::Error::custom)
    }
}

/// Declarative constraints checked after coercion, in declared order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Minimum characters (strings) or elements (arrays)
    MinLength { value: usize },
    /// Maximum characters (strings) or elements (arrays)
    MaxLength { value: usize },
    /// Exact characters (strings) or elements (arrays)
    Length { value: usize },
    /// Inclusive lower bound
    Min { value: f64 },
    /// Inclusive upper bound
    Max { value: f64 },
    /// String must match the regex
    Pattern { regex: PatternRegex },
    /// String must look like an email address
    Email,
    /// String must be an http(s) URL
    Url,
}

impl Constraint {
    /// Name used in schema structure errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            Constraint::MinLength { .. } => "min_length",
            Constraint::MaxLength { .. } => "max_length",
            Constraint::Length { .. } => "length",
            Constraint::Min { .. } => "min",
            Constraint::Max { .. } => "max",
            Constraint::Pattern { .. } => "pattern",
            Constraint::Email => "email",
            Constraint::Url => "url",
        }
    }

    fn applies_to(&self, field_type: &FieldType) -> bool {
        match self {
            Constraint::MinLength { .. } | Constraint::MaxLength { .. } | Constraint::Length { .. } => {
                field_type.has_length()
            }
            Constraint::Min { .. } | Constraint::Max { .. } => field_type.is_numeric(),
            Constraint::Pattern { .. } | Constraint::Email | Constraint::Url => {
                *field_type == FieldType::String
            }
        }
    }
}

/// A constraint with an optional message override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    #[serde(flatten)]
    pub constraint: Constraint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Message overrides for the presence and type checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMessages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_type: Option<String>,
}

impl FieldMessages {
    pub fn is_empty(&self) -> bool {
        self.required.is_none() && self.invalid_type.is_none()
    }
}

fn default_required() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Field specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name; empty for array element specs
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether the field must be present (after defaults)
    #[serde(default = "default_required", skip_serializing_if = "is_true")]
    pub required: bool,
    /// Whether an explicit `null` is accepted
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    /// Value substituted when the field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Parse string input into the field type
    #[serde(default, skip_serializing_if = "is_false")]
    pub coerce: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintSpec>,
    /// Custom checks; only attachable in code
    #[serde(skip)]
    pub predicates: Vec<Predicate>,
    #[serde(default, skip_serializing_if = "FieldMessages::is_empty")]
    pub messages: FieldMessages,
}

impl FieldSpec {
    /// Create a required field of the given type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            nullable: false,
            default: None,
            coerce: false,
            transforms: Vec::new(),
            constraints: Vec::new(),
            predicates: Vec::new(),
            messages: FieldMessages::default(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::DateTime)
    }

    pub fn object(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self::new(name, FieldType::Object { fields })
    }

    pub fn array(name: impl Into<String>, element: FieldSpec) -> Self {
        Self::new(
            name,
            FieldType::Array {
                element: Box::new(element),
            },
        )
    }

    /// Array element spec of the given type
    pub fn element(field_type: FieldType) -> Self {
        Self::new("", field_type)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Accept string input and parse it into the field type
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    pub fn trim(mut self) -> Self {
        self.transforms.push(Transform::Trim);
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.transforms.push(Transform::Lowercase);
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.transforms.push(Transform::Uppercase);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(ConstraintSpec {
            constraint,
            message: None,
        });
        self
    }

    pub fn min_length(self, value: usize) -> Self {
        self.constraint(Constraint::MinLength { value })
    }

    pub fn max_length(self, value: usize) -> Self {
        self.constraint(Constraint::MaxLength { value })
    }

    pub fn length(self, value: usize) -> Self {
        self.constraint(Constraint::Length { value })
    }

    pub fn min(self, value: f64) -> Self {
        self.constraint(Constraint::Min { value })
    }

    pub fn max(self, value: f64) -> Self {
        self.constraint(Constraint::Max { value })
    }

    pub fn pattern(self, regex: impl Into<PatternRegex>) -> Self {
        self.constraint(Constraint::Pattern {
            regex: regex.into(),
        })
    }

    pub fn email(self) -> Self {
        self.constraint(Constraint::Email)
    }

    pub fn url(self) -> Self {
        self.constraint(Constraint::Url)
    }

    /// Overrides the message of the most recently added constraint.
    ///
    /// Has no effect when no constraint has been added yet.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            last.message = Some(message.into());
        }
        self
    }

    /// Attach a custom predicate, evaluated after all constraints
    pub fn refine(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.messages.required = Some(message.into());
        self
    }

    pub fn invalid_type_message(mut self, message: impl Into<String>) -> Self {
        self.messages.invalid_type = Some(message.into());
        self
    }

    /// Returns true if this field or any nested field has an async predicate
    pub fn is_async(&self) -> bool {
        if self.predicates.iter().any(Predicate::is_async) {
            return true;
        }
        match &self.field_type {
            FieldType::Object { fields } => fields.iter().any(FieldSpec::is_async),
            FieldType::Array { element } => element.is_async(),
            _ => false,
        }
    }

    fn check_structure(&self, path: &str) -> Result<(), String> {
        if self.coerce
            && !matches!(
                self.field_type,
                FieldType::Integer | FieldType::Number | FieldType::Boolean | FieldType::String
            )
        {
            return Err(format!(
                "field '{}': coercion is not supported for {} fields",
                path,
                self.field_type.type_name()
            ));
        }

        if !self.transforms.is_empty() && self.field_type != FieldType::String {
            return Err(format!(
                "field '{}': transforms only apply to string fields",
                path
            ));
        }

        if matches!(self.default, Some(Value::Null)) && !self.nullable {
            return Err(format!(
                "field '{}': null default requires a nullable field",
                path
            ));
        }

        let mut min_len = None;
        let mut max_len = None;
        let mut min = None;
        let mut max = None;

        for spec in &self.constraints {
            if !spec.constraint.applies_to(&self.field_type) {
                return Err(format!(
                    "field '{}': constraint '{}' does not apply to {} fields",
                    path,
                    spec.constraint.kind_name(),
                    self.field_type.type_name()
                ));
            }
            match &spec.constraint {
                Constraint::Min { value } | Constraint::Max { value } if !value.is_finite() => {
                    return Err(format!("field '{}': numeric bounds must be finite", path));
                }
                Constraint::MinLength { value } => min_len = Some(*value),
                Constraint::MaxLength { value } => max_len = Some(*value),
                Constraint::Min { value } => min = Some(*value),
                Constraint::Max { value } => max = Some(*value),
                _ => {}
            }
        }

        if let (Some(lo), Some(hi)) = (min_len, max_len) {
            if lo > hi {
                return Err(format!(
                    "field '{}': min_length {} exceeds max_length {}",
                    path, lo, hi
                ));
            }
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(format!("field '{}': min {} exceeds max {}", path, lo, hi));
            }
        }

        match &self.field_type {
            FieldType::Object { fields } => check_fields(fields, path),
            FieldType::Array { element } => element.check_structure(&format!("{}[]", path)),
            _ => Ok(()),
        }
    }
}

fn check_fields(fields: &[FieldSpec], prefix: &str) -> Result<(), String> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.name.is_empty() {
            return Err(format!("object '{}' declares a field without a name", prefix));
        }
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", prefix, field.name)
        };
        if !seen.insert(field.name.as_str()) {
            return Err(format!("field '{}' is declared more than once", path));
        }
        field.check_structure(&path)?;
    }
    Ok(())
}

/// Complete schema definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Unique schema identifier
    pub schema_id: String,
    /// Schema version
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Start building a schema
    pub fn builder(
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
    ) -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema {
                schema_id: schema_id.into(),
                schema_version: schema_version.into(),
                description: None,
                fields: Vec::new(),
            },
        }
    }

    /// Returns the unique key for this schema (id, version)
    pub fn key(&self) -> (&str, &str) {
        (&self.schema_id, &self.schema_version)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if any field carries an async predicate
    pub fn is_async(&self) -> bool {
        self.fields.iter().any(FieldSpec::is_async)
    }

    /// Validates the schema structure itself (not a payload)
    pub fn validate_structure(&self) -> SchemaResult<()> {
        if self.schema_id.trim().is_empty() {
            return Err(SchemaError::invalid(&self.schema_id, "schema_id must not be empty"));
        }
        if self.schema_version.trim().is_empty() {
            return Err(SchemaError::invalid(
                &self.schema_id,
                "schema_version must not be empty",
            ));
        }
        check_fields(&self.fields, "").map_err(|reason| SchemaError::invalid(&self.schema_id, reason))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.schema_id, self.schema_version)
    }
}

/// Fluent schema construction; `build` checks the structure.
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.schema.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.schema.fields.push(field);
        self
    }

    pub fn build(self) -> SchemaResult<Schema> {
        self.schema.validate_structure()?;
        Ok(self.schema)
    }
}
