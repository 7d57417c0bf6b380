//! # Verity Errors
//!
//! Failed assertions are not errors: they are reported and halt the test.
//! The types here cover the two places where the library itself can be
//! misused: inspecting a value serde cannot express, and passing a message
//! template that is not a string.

use std::fmt::Display;

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while converting a `serde::Serialize` value into a [`crate::Value`].
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[diagnostic(url(docsrs))]
pub enum InspectError {
    #[error("cannot inspect value: {0}")]
    #[diagnostic(code(verity::inspect::custom))]
    Custom(String),

    #[error("map keys must be scalars, found {found}")]
    #[diagnostic(
        code(verity::inspect::map_key),
        help("use a number, string, char or bool as the key")
    )]
    KeyMustBeScalar { found: String },
}

impl serde::ser::Error for InspectError {
    fn custom<T: Display>(msg: T) -> Self {
        InspectError::Custom(msg.to_string())
    }
}

/// Errors raised while turning message arguments into a description.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[diagnostic(url(docsrs))]
pub enum MessageError {
    #[error("message template must be a string, found {found}")]
    #[diagnostic(
        code(verity::message::template),
        help("pass the format template first, followed by its arguments")
    )]
    TemplateNotString { found: String },
}

pub type InspectResult<T> = Result<T, InspectError>;
