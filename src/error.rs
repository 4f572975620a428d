use thiserror::Error;

/// Failure while turning markup into formatting ranges.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The tree parser reported malformed markup and strict parsing was requested.
    #[error("markup parse error: {message}")]
    Markup { message: String },
}

/// Failure while reading an encoded formatting string back into ranges.
///
/// Offsets are byte positions into the encoded string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("expected {expected} at offset {offset}")]
    Expected { expected: &'static str, offset: usize },

    #[error("invalid number at offset {offset}")]
    InvalidNumber { offset: usize },

    #[error("unknown style code {code:?} at offset {offset}")]
    UnknownStyle { code: char, offset: usize },

    #[error("missing style codes at offset {offset}")]
    EmptyStyles { offset: usize },

    #[error("range start is after its end at offset {offset}")]
    OutOfOrder { offset: usize },
}
