//! # Predicate Library
//!
//! Pure, total predicates over [`Value`]: nilness, emptiness, zero-ness and
//! deep structural equality. None of them can fail and none of them allocate.
//!
//! ## Predicates Provided
//!
//! - **Nilness**: `is_nil`
//! - **Emptiness**: `is_empty`, `is_zero`
//! - **Equality**: `deep_equal`

use crate::value::{IntType, Value};

// ============================================================================
// NILNESS
// ============================================================================

/// Returns true if the value is the absence-of-value, or a nilable kind in its
/// nil state.
///
/// Scalars, strings, arrays and records are never nil, whatever they contain.
///
/// # Examples
///
/// ```rust
/// use verity::{predicates::is_nil, Value};
/// assert!(is_nil(&Value::Nil));
/// assert!(is_nil(&Value::from(None::<i32>)));
/// assert!(!is_nil(&Value::from(0)));
/// assert!(!is_nil(&Value::from(Vec::<i32>::new())));
/// ```
pub fn is_nil(value: &Value) -> bool {
    if matches!(value, Value::Nil) {
        return true;
    }
    value.kind().is_nilable() && is_nil_handle(value)
}

fn is_nil_handle(value: &Value) -> bool {
    match value {
        Value::Bytes(b) => b.is_none(),
        Value::List(l) => l.is_none(),
        Value::Map(m) => m.is_none(),
        Value::Ref(r) => r.is_none(),
        Value::Chan(c) => c.is_none(),
        Value::Func(f) => f.is_none(),
        Value::RawPtr(addr) => *addr == 0,
        _ => false,
    }
}

// ============================================================================
// EMPTINESS
// ============================================================================

/// Returns true if the value is empty.
///
/// - the absence-of-value is empty;
/// - channels, mappings, sequences and byte sequences are empty iff their
///   length is zero (nil counts as zero);
/// - references are empty if nil, or if what they point at is empty;
/// - everything else is empty iff it equals the zero value of its type.
///
/// # Examples
///
/// ```rust
/// use verity::{predicates::is_empty, Struct, Value};
/// let zero = Struct::new("Point").field("x", 0).field("y", 0);
/// assert!(is_empty(&Value::reference(zero)));
/// assert!(is_empty(&Value::from("")));
/// assert!(!is_empty(&Value::from(vec![0])));
/// ```
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Nil => true,
        Value::Chan(ch) => ch.map_or(true, |ch| ch.len == 0),
        Value::Map(map) => map.as_ref().map_or(true, |m| m.is_empty()),
        Value::List(items) => items.as_ref().map_or(true, Vec::is_empty),
        Value::Bytes(bytes) => bytes.as_ref().map_or(true, Vec::is_empty),
        Value::Ref(None) => true,
        Value::Ref(Some(target)) => is_empty(target),
        other => is_zero(other),
    }
}

/// Returns true if the value equals the zero value of its own type.
///
/// The zero value of a nilable kind is its nil state, so an empty but non-nil
/// sequence is not zero. Records and arrays are zero when every member is.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Nil => true,
        Value::Bool(b) => !b,
        Value::Int(n, _) => *n == 0,
        Value::Float(x, _) => *x == 0.0,
        Value::Char(c) => *c == '\0',
        Value::Str(s) => s.is_empty(),
        Value::Array(items) | Value::Tuple(items) => items.iter().all(is_zero),
        Value::Struct(s) => s.fields().iter().all(|(_, field)| is_zero(field)),
        handle => is_nil_handle(handle),
    }
}

// ============================================================================
// EQUALITY
// ============================================================================

/// Returns true if `a` and `b` are structurally equal.
///
/// Types must match exactly: an `i32` is never equal to an `i64` holding the
/// same number. Sequences compare element-wise in order, mappings compare
/// entries regardless of insertion order, records compare their name and
/// their fields in declaration order. A nil sequence, mapping or byte sequence
/// only equals another nil one. A byte sequence equals a non-nil `u8`
/// sequence with the same contents, since both are the same Rust type. Tuples
/// only equal tuples. Mapping keys keep their type, so `1` and `"1"` differ.
/// Function handles are equal only when both are nil; channels compare by
/// identity.
///
/// # Examples
///
/// ```rust
/// use verity::{predicates::deep_equal, Value};
/// assert!(deep_equal(&Value::nil_bytes(), &Value::nil_bytes()));
/// assert!(!deep_equal(&Value::nil_bytes(), &Value::bytes(Vec::new())));
/// assert!(!deep_equal(&Value::from(5i32), &Value::from(5i64)));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Nil, _) | (_, Value::Nil) => false,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x, tx), Value::Int(y, ty)) => tx == ty && x == y,
        (Value::Float(x, tx), Value::Float(y, ty)) => tx == ty && x == y,
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        (Value::Bytes(Some(bytes)), Value::List(Some(items)))
        | (Value::List(Some(items)), Value::Bytes(Some(bytes))) => bytes_equal(bytes, items),
        (Value::List(x), Value::List(y)) => match (x, y) {
            (Some(x), Some(y)) => seq_equal(x, y),
            (None, None) => true,
            _ => false,
        },
        (Value::Array(x), Value::Array(y)) => seq_equal(x, y),
        (Value::Tuple(x), Value::Tuple(y)) => seq_equal(x, y),
        (Value::Map(x), Value::Map(y)) => match (x, y) {
            (Some(x), Some(y)) => {
                x.len() == y.len()
                    && x
                        .iter()
                        .all(|(k, v)| y.get(k).is_some_and(|w| deep_equal(v, w)))
            }
            (None, None) => true,
            _ => false,
        },
        (Value::Ref(x), Value::Ref(y)) => match (x, y) {
            (Some(x), Some(y)) => deep_equal(x, y),
            (None, None) => true,
            _ => false,
        },
        (Value::Struct(x), Value::Struct(y)) => {
            x.name() == y.name()
                && x.fields().len() == y.fields().len()
                && x
                    .fields()
                    .iter()
                    .zip(y.fields())
                    .all(|((xn, xv), (yn, yv))| xn == yn && deep_equal(xv, yv))
        }
        (Value::Chan(x), Value::Chan(y)) => match (x, y) {
            (Some(x), Some(y)) => x.id == y.id,
            (None, None) => true,
            _ => false,
        },
        (Value::Func(x), Value::Func(y)) => x.is_none() && y.is_none(),
        (Value::RawPtr(x), Value::RawPtr(y)) => x == y,
        _ => false,
    }
}

fn seq_equal(x: &[Value], y: &[Value]) -> bool {
    x.len() == y.len() && x.iter().zip(y).all(|(a, b)| deep_equal(a, b))
}

fn bytes_equal(bytes: &[u8], items: &[Value]) -> bool {
    bytes.len() == items.len()
        && bytes.iter().zip(items).all(|(b, item)| match item {
            Value::Int(n, IntType::U8) => *n == i128::from(*b),
            _ => false,
        })
}
