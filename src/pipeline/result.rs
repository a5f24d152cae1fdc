//! Validation results and issues
//!
//! A validation call produces exactly one of `Success` or `Failure`. A
//! failure always carries at least one issue, ordered by the schema's field
//! declaration order.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::TypedRecord;

/// Constraint kind that produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCode {
    /// Required field absent
    MissingRequiredField,
    /// Raw value has the wrong JSON type
    TypeMismatch,
    /// Type was right but the value could not be converted
    CoercionError,
    /// Length, item count or numeric bound violated
    LengthOrRangeViolation,
    /// Regex, email or url format violated
    PatternMismatch,
    /// A custom predicate returned false
    CustomPredicateFailure,
}

impl IssueCode {
    /// Returns the wire code
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::MissingRequiredField => "missing-required-field",
            IssueCode::TypeMismatch => "type-mismatch",
            IssueCode::CoercionError => "coercion-error",
            IssueCode::LengthOrRangeViolation => "length-or-range-violation",
            IssueCode::PatternMismatch => "pattern-mismatch",
            IssueCode::CustomPredicateFailure => "custom-predicate-failure",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One step in an issue path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{}", name),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A single constraint violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Location of the offending value; empty for the payload root
    pub path: Vec<PathSegment>,
    /// Human-readable message
    pub message: String,
    pub code: IssueCode,
}

impl Issue {
    pub fn new(path: Vec<PathSegment>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            code,
        }
    }

    /// First path segment, used as the boundary `field`
    pub fn field(&self) -> Option<String> {
        self.path.first().map(ToString::to_string)
    }

    /// Dotted path, e.g. `address.lines[1]`
    pub fn dotted_path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(i) => {
                    out.push_str(&format!("[{}]", i));
                }
            }
        }
        out
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] {}", self.code, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.code, self.dotted_path(), self.message)
        }
    }
}

/// Outcome of one validation call
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Success { value: TypedRecord },
    Failure { issues: Vec<Issue> },
}

impl ValidationResult {
    pub(crate) fn from_parts(value: TypedRecord, issues: Vec<Issue>) -> Self {
        if issues.is_empty() {
            ValidationResult::Success { value }
        } else {
            ValidationResult::Failure { issues }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn value(&self) -> Option<&TypedRecord> {
        match self {
            ValidationResult::Success { value } => Some(value),
            ValidationResult::Failure { .. } => None,
        }
    }

    /// Issues of a failure; empty for a success
    pub fn issues(&self) -> &[Issue] {
        match self {
            ValidationResult::Success { .. } => &[],
            ValidationResult::Failure { issues } => issues,
        }
    }

    pub fn first_issue(&self) -> Option<&Issue> {
        self.issues().first()
    }

    pub fn into_result(self) -> Result<TypedRecord, ValidationFailure> {
        match self {
            ValidationResult::Success { value } => Ok(value),
            ValidationResult::Failure { issues } => Err(ValidationFailure { issues }),
        }
    }
}

/// Failure half of a [`ValidationResult`] as an error value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summary(.issues))]
pub struct ValidationFailure {
    pub issues: Vec<Issue>,
}

impl ValidationFailure {
    pub fn first(&self) -> Option<&Issue> {
        self.issues.first()
    }
}

fn summary(issues: &[Issue]) -> String {
    match issues.first() {
        Some(first) if issues.len() > 1 => format!("{} (+{} more)", first, issues.len() - 1),
        Some(first) => first.to_string(),
        None => "no issues recorded".to_string(),
    }
}
