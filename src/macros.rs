//! # Assertion Macros
//!
//! Shorthands for the [`crate::assert`] entry points that accept trailing
//! message arguments of any `Into<Value>` type:
//!
//! ```rust
//! use verity::{assert_equal, assert_not_empty, TestContext};
//! let t = TestContext::current();
//! let items = vec!["a", "b"];
//! assert_not_empty!(&t, items.clone());
//! assert_equal!(&t, 2usize, items.len(), "expected %d items", 2);
//! ```
//!
//! The first argument is any [`crate::FailureSink`] reference.

/// Builds the message argument slice for an entry point.
#[doc(hidden)]
#[macro_export]
macro_rules! msg_and_args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::Value::from($arg)),*]
    };
}

#[macro_export]
macro_rules! assert_true {
    ($sink:expr, $value:expr $(, $arg:expr)* $(,)?) => {
        $crate::assert::is_true($sink, $value, &$crate::msg_and_args!($($arg),*))
    };
}

#[macro_export]
macro_rules! assert_false {
    ($sink:expr, $value:expr $(, $arg:expr)* $(,)?) => {
        $crate::assert::is_false($sink, $value, &$crate::msg_and_args!($($arg),*))
    };
}

#[macro_export]
macro_rules! assert_nil {
    ($sink:expr, $actual:expr $(, $arg:expr)* $(,)?) => {
        $crate::assert::nil($sink, $actual, &$crate::msg_and_args!($($arg),*))
    };
}

#[macro_export]
macro_rules! assert_not_nil {
    ($sink:expr, $actual:expr $(, $arg:expr)* $(,)?) => {
        $crate::assert::not_nil($sink, $actual, &$crate::msg_and_args!($($arg),*))
    };
}

#[macro_export]
macro_rules! assert_empty {
    ($sink:expr, $actual:expr $(, $arg:expr)* $(,)?) => {
        $crate::assert::empty($sink, $actual, &$crate::msg_and_args!($($arg),*))
    };
}

#[macro_export]
macro_rules! assert_not_empty {
    ($sink:expr, $actual:expr $(, $arg:expr)* $(,)?) => {
        $crate::assert::not_empty($sink, $actual, &$crate::msg_and_args!($($arg),*))
    };
}

#[macro_export]
macro_rules! assert_equal {
    ($sink:expr, $expected:expr, $actual:expr $(, $arg:expr)* $(,)?) => {
        $crate::assert::equal($sink, $expected, $actual, &$crate::msg_and_args!($($arg),*))
    };
}

#[macro_export]
macro_rules! assert_not_equal {
    ($sink:expr, $left:expr, $right:expr $(, $arg:expr)* $(,)?) => {
        $crate::assert::not_equal($sink, $left, $right, &$crate::msg_and_args!($($arg),*))
    };
}

#[macro_export]
macro_rules! assert_panics {
    ($sink:expr, $title:expr, $action:expr $(,)?) => {
        $crate::assert::panics($sink, $title, $action)
    };
}
