//! Custom field predicates
//!
//! A predicate receives the already-coerced value and returns a boolean.
//! `false` produces a `custom-predicate-failure` issue carrying the
//! predicate's bound message.
//!
//! Asynchronous predicates (uniqueness lookups and the like) are only run by
//! `validate_async`.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

use crate::value::TypedValue;

type SyncCheck = Arc<dyn Fn(&TypedValue) -> bool + Send + Sync>;
type AsyncCheck = Arc<dyn Fn(TypedValue) -> BoxFuture<'static, bool> + Send + Sync>;

#[derive(Clone)]
enum Check {
    Sync(SyncCheck),
    Async(AsyncCheck),
}

/// A named custom check with its failure message
#[derive(Clone)]
pub struct Predicate {
    message: String,
    check: Check,
}

impl Predicate {
    /// Synchronous predicate
    pub fn new<F>(message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&TypedValue) -> bool + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            check: Check::Sync(Arc::new(check)),
        }
    }

    /// Asynchronous predicate; the value is handed over by clone
    pub fn new_async<F, Fut>(message: impl Into<String>, check: F) -> Self
    where
        F: Fn(TypedValue) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self {
            message: message.into(),
            check: Check::Async(Arc::new(move |value: TypedValue| check(value).boxed())),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_async(&self) -> bool {
        matches!(self.check, Check::Async(_))
    }

    pub(crate) fn evaluate<'a>(&'a self, value: &'a TypedValue) -> BoxFuture<'a, bool> {
        match &self.check {
            Check::Sync(check) => future::ready(check(value)).boxed(),
            Check::Async(check) => check(value.clone()),
        }
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        let same_check = match (&self.check, &other.check) {
            (Check::Sync(a), Check::Sync(b)) => Arc::ptr_eq(a, b),
            (Check::Async(a), Check::Async(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_check && self.message == other.message
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("message", &self.message)
            .field("async", &self.is_async())
            .finish()
    }
}

/// Value must equal one of `allowed` (compared through its JSON form).
///
/// This is the building block for parameterized schemas: a factory takes the
/// allowed list and bakes it into the field.
pub fn one_of<I, V>(allowed: I, message: impl Into<String>) -> Predicate
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
    Predicate::new(message, move |value| {
        let candidate = value.to_json();
        allowed.iter().any(|a| json_eq(a, &candidate))
    })
}

/// String must contain something other than whitespace
pub fn not_blank(message: impl Into<String>) -> Predicate {
    Predicate::new(message, |value| {
        value.as_str().map_or(true, |s| !s.trim().is_empty())
    })
}

/// Numbers compare by value so `10` matches `10.0`
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}
