//! `printfmt` interprets printf-style format strings at runtime
//!
//! # Features
//! - sprintf()-like functionality - render a template with a positional list
//!   of dynamically typed [`Value`]s into a new `String`
//! - C-style specifier grammar: flags (`- + space 0 ' #`), literal or
//!   indirect (`*`) width, precision, inert length modifiers, and the
//!   `d i u f F e E g G x X o s c` conversions
//! - tolerant parsing - truncated or malformed specifiers render nothing
//!   instead of failing, and surrounding literal text is always preserved
//! - safe panic-free API - rendering failures (wrong argument type, negative
//!   value for `%u`, unsupported conversion) return a [`FormatError`]
//!   instead of panicking
//! - alloc-efficient - a [`Formatter`] owns one output buffer that is
//!   reused across calls
//!
//! # Example
//! ```rust
//! use printfmt::{format, Value};
//! let out = format("%s scored %d points (%.1f%%)", &[
//!     Value::Str("Ada"),
//!     Value::Int(42),
//!     Value::Float(99.5),
//! ]).unwrap();
//! assert_eq!(out, "Ada scored 42 points (99.5%)");
//! ```

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

mod error;
mod format;
pub mod parser;

pub use crate::error::FormatError;
pub use crate::format::Formatter;

/// One positional argument for a template.
///
/// Arguments are consumed strictly left to right; a specifier with indirect
/// (`*`) width consumes one extra `Int` for the width immediately before its
/// value argument. The parser never inspects argument types - only the
/// renderer does, at the point of consumption.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value<'a> {
    Int(i64),
    Float(f64),
    Str(&'a str),
    Char(char),
}

impl Value<'_> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Char(_) => "character",
        }
    }
}

impl From<i64> for Value<'_> {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Str(value)
    }
}

impl From<char> for Value<'_> {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

/// Formats `template` with the given `args` into a new `String`
///
/// Convenience wrapper over a one-shot [`Formatter`]. On error the partial
/// output is discarded.
///
/// ```rust
/// use printfmt::{format, Value};
/// let out = format("Hello, world. My integer is %d", &[Value::Int(42)]).unwrap();
/// assert_eq!(out, "Hello, world. My integer is 42");
/// ```
pub fn format(template: &str, args: &[Value]) -> Result<String, FormatError> {
    let mut formatter = Formatter::new();
    formatter.format(template, args).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic() {
        let res = format("He%s=%d", &[Value::Str("ll"), Value::Int(4)]).unwrap();
        assert_eq!(res, "Hell=4");
    }

    #[test]
    fn templates_without_percent_pass_through() {
        for template in ["", "plain", "multi\nline", "héllo wörld"] {
            assert_eq!(format(template, &[]).unwrap(), template);
        }
    }

    #[test]
    fn mixed_template() {
        let res = format(
            "%d%% of %s is %.1f",
            &[Value::Int(50), Value::Str("everything"), Value::Float(0.5)],
        )
        .unwrap();
        assert_eq!(res, "50% of everything is 0.5");
    }

    #[test]
    fn errors_discard_output() {
        let err = format("partial %c", &[Value::Int(1)]).unwrap_err();
        assert_eq!(
            err,
            FormatError::BadType {
                expected: "character",
                found: "integer",
            }
        );
    }

    #[test]
    fn value_conversions() {
        assert_eq!(Value::from(4i64), Value::Int(4));
        assert_eq!(Value::from(1.5f64), Value::Float(1.5));
        assert_eq!(Value::from("hi"), Value::Str("hi"));
        assert_eq!(Value::from('x'), Value::Char('x'));
    }
}
