#![deny(missing_docs)]

//! # Compiler Errors
//!
//! Errors raised by generated constructors and resolvers. Each error carries the
//! display path of the `Context` it was raised in; several errors collapse into
//! a group that prints one error per line.

use crate::context::Context;
use derive_more::Display;

/// An error produced while compiling a document.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum Error {
    /// A single error attached to a location in the document.
    #[display("{}", render_located(path, message))]
    Located {
        /// Dotted display path, e.g. `$root.info.title`.
        path: String,
        /// Human readable description.
        message: String,
    },
    /// Several errors reported together.
    #[display("{}", render_group(_0))]
    Group(Vec<Error>),
}

impl std::error::Error for Error {}

impl Error {
    /// Creates an error attached to `context`.
    pub fn new(context: &Context, message: impl Into<String>) -> Self {
        Error::Located {
            path: context.description(),
            message: message.into(),
        }
    }

    /// Creates an error with no location.
    pub fn general(message: impl Into<String>) -> Self {
        Error::Located {
            path: String::new(),
            message: message.into(),
        }
    }

    /// Returns the individual errors, flattening nested groups.
    pub fn flatten(&self) -> Vec<&Error> {
        match self {
            Error::Located { .. } => vec![self],
            Error::Group(errors) => errors.iter().flat_map(Error::flatten).collect(),
        }
    }

    /// Returns the message of a located error, or `None` for a group.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::Located { message, .. } => Some(message),
            Error::Group(_) => None,
        }
    }
}

fn render_located(path: &str, message: &str) -> String {
    if path.is_empty() {
        format!("ERROR {}", message)
    } else {
        format!("ERROR {} {}", path, message)
    }
}

fn render_group(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Combines errors: `None` when empty, the error itself when there is one,
/// otherwise a group.
pub fn new_error_group_or_none(mut errors: Vec<Error>) -> Option<Error> {
    match errors.len() {
        0 => None,
        1 => errors.pop(),
        _ => Some(Error::Group(errors)),
    }
}

/// A value that failed validation: the best-effort instance (if any) and the error.
#[derive(Debug, Clone, PartialEq)]
pub struct Partial<T> {
    /// The partially populated instance. `None` when construction was abandoned.
    pub value: Option<T>,
    /// Everything that went wrong.
    pub error: Error,
}

/// The outcome of a generated constructor.
pub type Built<T> = Result<T, Partial<T>>;

/// Wraps up a constructor: the instance alone when `errors` is empty,
/// otherwise the instance together with the grouped errors.
pub fn finish<T>(value: T, errors: Vec<Error>) -> Built<T> {
    match new_error_group_or_none(errors) {
        None => Ok(value),
        Some(error) => Err(Partial {
            value: Some(value),
            error,
        }),
    }
}

/// Abandons construction with `error`.
pub fn fatal<T>(error: Error) -> Built<T> {
    Err(Partial { value: None, error })
}

/// Splits a constructor outcome into the (possibly partial) value and its error.
pub fn split<T>(built: Built<T>) -> (Option<T>, Option<Error>) {
    match built {
        Ok(value) => (Some(value), None),
        Err(partial) => (partial.value, Some(partial.error)),
    }
}
