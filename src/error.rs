use crate::parser::Conversion;
use thiserror::Error;

/// Error returned by [`format`] and [`Formatter::format`]
///
/// [`format`]: crate::format()
/// [`Formatter::format`]: crate::Formatter::format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Parse was started past the end of the template.
    ///
    /// This indicates misuse of the parser contract, not a malformed
    /// template.
    #[error("start offset {offset} is out of bounds for template of length {len}")]
    OutOfBounds { offset: usize, len: usize },
    /// Parse was started on a character other than `%`.
    #[error("specifier must begin with `%` (byte offset {0})")]
    BadStart(usize),
    /// The argument list was exhausted before the template was done.
    #[error("not enough arguments for template")]
    NotEnoughArguments,
    /// Argument type does not fit the conversion consuming it.
    #[error("type mismatch: expected {expected}, found {found}")]
    BadType {
        expected: &'static str,
        found: &'static str,
    },
    /// Value passed was out of numeric limits for the conversion requested.
    #[error("value {0} is out of range for an unsigned conversion")]
    NumOverflow(i64),
    /// Conversion is recognized by the parser but never rendered.
    #[error("conversion `%{0}` is not supported")]
    Unsupported(Conversion),
}
