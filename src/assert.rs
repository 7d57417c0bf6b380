//! # Assertion Entry Points
//!
//! Each assertion evaluates one predicate and returns silently when it holds.
//! Otherwise it reports through [`report`] with a fixed label and result
//! phrase, and the sink halts the test (or the process).
//!
//! All entry points are `#[track_caller]`, so the `Trace` line of a report
//! points at the line that called the assertion.
//!
//! ## Assertions Provided
//!
//! - **Truth**: `is_true`, `is_false`
//! - **Nilness**: `nil`, `not_nil`
//! - **Emptiness**: `empty`, `not_empty`
//! - **Equality**: `equal`, `not_equal`
//! - **Panics**: `panics`

use std::panic::{self, AssertUnwindSafe};

use crate::predicates::{deep_equal, is_empty, is_nil};
use crate::report::report;
use crate::sink::FailureSink;
use crate::value::Value;

/// Passes when `value` is `true`.
#[track_caller]
pub fn is_true<S>(sink: &S, value: bool, msg_and_args: &[Value])
where
    S: FailureSink + ?Sized,
{
    if value {
        return;
    }
    report(
        sink,
        &Value::Bool(true),
        &Value::Bool(value),
        "True",
        "Should be true",
        msg_and_args,
    )
}

/// Passes when `value` is `false`.
#[track_caller]
pub fn is_false<S>(sink: &S, value: bool, msg_and_args: &[Value])
where
    S: FailureSink + ?Sized,
{
    if !value {
        return;
    }
    report(
        sink,
        &Value::Bool(false),
        &Value::Bool(value),
        "False",
        "Should be false",
        msg_and_args,
    )
}

/// Passes when `actual` is nil.
#[track_caller]
pub fn nil<S>(sink: &S, actual: impl Into<Value>, msg_and_args: &[Value])
where
    S: FailureSink + ?Sized,
{
    let actual = actual.into();
    if is_nil(&actual) {
        return;
    }
    let result = format!("Expected nil, but got: {}", actual);
    report(sink, &Value::Nil, &actual, "Nil", &result, msg_and_args)
}

/// Passes when `actual` is not nil.
#[track_caller]
pub fn not_nil<S>(sink: &S, actual: impl Into<Value>, msg_and_args: &[Value])
where
    S: FailureSink + ?Sized,
{
    let actual = actual.into();
    if !is_nil(&actual) {
        return;
    }
    report(
        sink,
        &Value::Nil,
        &actual,
        "NotNil",
        "Expected value not to be nil.",
        msg_and_args,
    )
}

/// Passes when `actual` is empty.
#[track_caller]
pub fn empty<S>(sink: &S, actual: impl Into<Value>, msg_and_args: &[Value])
where
    S: FailureSink + ?Sized,
{
    let actual = actual.into();
    if is_empty(&actual) {
        return;
    }
    let result = format!("Should be empty, but was {}", actual);
    report(sink, &Value::Nil, &actual, "Empty", &result, msg_and_args)
}

/// Passes when `actual` is not empty.
#[track_caller]
pub fn not_empty<S>(sink: &S, actual: impl Into<Value>, msg_and_args: &[Value])
where
    S: FailureSink + ?Sized,
{
    let actual = actual.into();
    if !is_empty(&actual) {
        return;
    }
    let result = format!("Should NOT be empty, but was {}", actual);
    report(sink, &Value::Nil, &actual, "NotEmpty", &result, msg_and_args)
}

/// Passes when `expected` and `actual` are deeply equal.
///
/// # Examples
///
/// ```rust
/// use verity::{assert, TestContext, Value};
/// let t = TestContext::current();
/// assert::equal(&t, vec![1, 2], vec![1, 2], &[]);
/// assert::equal(&t, "a", "a", &[Value::from("strings %s"), Value::from("match")]);
/// ```
#[track_caller]
pub fn equal<S>(
    sink: &S,
    expected: impl Into<Value>,
    actual: impl Into<Value>,
    msg_and_args: &[Value],
) where
    S: FailureSink + ?Sized,
{
    let (expected, actual) = (expected.into(), actual.into());
    if deep_equal(&expected, &actual) {
        return;
    }
    report(sink, &expected, &actual, "Equal", "", msg_and_args)
}

/// Passes when `left` and `right` are not deeply equal.
#[track_caller]
pub fn not_equal<S>(
    sink: &S,
    left: impl Into<Value>,
    right: impl Into<Value>,
    msg_and_args: &[Value],
) where
    S: FailureSink + ?Sized,
{
    let (left, right) = (left.into(), right.into());
    if !deep_equal(&left, &right) {
        return;
    }
    let result = format!("Should not be: {}", right);
    report(sink, &left, &right, "NotEqual", &result, msg_and_args)
}

/// Passes when `action` panics. The panic payload is discarded.
///
/// # Examples
///
/// ```rust
/// use verity::{assert, TestContext};
/// let t = TestContext::current();
/// assert::panics(&t, "index out of range", || {
///     let items: Vec<i32> = Vec::new();
///     let _ = items[1];
/// });
/// ```
#[track_caller]
pub fn panics<S, F>(sink: &S, title: &str, action: F)
where
    S: FailureSink + ?Sized,
    F: FnOnce(),
{
    if panic::catch_unwind(AssertUnwindSafe(action)).is_err() {
        return;
    }
    sink.fatal(&format!("{}: didn't panic as expected", title))
}
