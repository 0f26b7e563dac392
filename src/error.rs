//! This module implements `FormatError`.

use std::borrow::Cow;
use std::fmt;

/// `FormatError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A pattern or one of its segments could not be compiled.
    InvalidFormatSpec,
    /// No segment of a chain accepted the input text.
    #[default]
    DateParse,
    /// A value fell outside of its representable range.
    Range,
    /// An internal invariant did not hold.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormatSpec => "InvalidFormatSpec",
            Self::DateParse => "DateParseError",
            Self::Range => "RangeError",
            Self::Assert => "ImplementationError",
        }
        .fmt(f)
    }
}

/// The error type for `temporal_format`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl FormatError {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Creates an invalid format error for `pattern`.
    ///
    /// The message reads `Invalid format: [<pattern>]: <reason>`.
    #[must_use]
    pub fn invalid_format(pattern: &str, reason: impl fmt::Display) -> Self {
        Self::new(ErrorKind::InvalidFormatSpec)
            .with_message(format!("Invalid format: [{pattern}]: {reason}"))
    }

    /// Creates a parse failure naming both the rejected input and the
    /// pattern that rejected it.
    #[must_use]
    pub fn date_parse(input: &str, pattern: &str) -> Self {
        Self::new(ErrorKind::DateParse).with_message(format!(
            "failed to parse date field [{input}] with format [{pattern}]"
        ))
    }

    /// A segment-level parse failure; the chain reports `date_parse` once
    /// every segment has failed.
    #[must_use]
    pub(crate) fn syntax() -> Self {
        Self::new(ErrorKind::DateParse)
    }

    /// Create a range error.
    #[must_use]
    pub fn range() -> Self {
        Self::new(ErrorKind::Range)
    }

    /// Create an assertion error.
    #[must_use]
    pub fn assert() -> Self {
        Self::new(ErrorKind::Assert)
    }

    /// Add a message to the error.
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Add a message enum to the error.
    #[must_use]
    pub(crate) fn with_enum(mut self, msg: ErrorMessage) -> Self {
        self.msg = msg.to_str().into();
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Extracts the error message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> Cow<'static, str> {
        self.msg
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        let msg = self.msg.trim();
        if !msg.is_empty() {
            write!(f, ": {msg}")?;
        }

        Ok(())
    }
}

impl std::error::Error for FormatError {}

/// The error messages shared by several call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorMessage {
    InstantOutOfRange,
    OffsetOutOfRange,
    NanosOutOfRange,
    EmptyPattern,
    EmptySegment,
    UnclosedQuote,
    UnbalancedOptional,
    TrailingText,
    DigitsExpected,
    FieldConflict,
    InvalidDate,
    InvalidEpochValue,
}

impl ErrorMessage {
    pub fn to_str(self) -> &'static str {
        match self {
            Self::InstantOutOfRange => "Instant nanoseconds are not within a valid epoch range.",
            Self::OffsetOutOfRange => "Offset must be within +/-18:00.",
            Self::NanosOutOfRange => "Nanoseconds must be in the range 0..1_000_000_000.",
            Self::EmptyPattern => "pattern must not be empty",
            Self::EmptySegment => "empty segment in format chain",
            Self::UnclosedQuote => "unterminated quoted literal",
            Self::UnbalancedOptional => "unbalanced optional section",
            Self::TrailingText => "unparsed text remains after the last field",
            Self::DigitsExpected => "expected a digit",
            Self::FieldConflict => "a field was given two different values",
            Self::InvalidDate => "fields do not describe a valid date",
            Self::InvalidEpochValue => "not a valid epoch value",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, FormatError};

    #[test]
    fn invalid_format_message() {
        let err = FormatError::invalid_format("yyyy-MM-q", "Unknown pattern letter: q");
        assert_eq!(err.kind(), ErrorKind::InvalidFormatSpec);
        assert_eq!(
            err.message(),
            "Invalid format: [yyyy-MM-q]: Unknown pattern letter: q"
        );
    }

    #[test]
    fn date_parse_names_input_and_pattern() {
        let err = FormatError::date_parse("abc", "epoch_second");
        assert_eq!(
            err.to_string(),
            "DateParseError: failed to parse date field [abc] with format [epoch_second]"
        );
    }

    #[test]
    fn empty_message_display() {
        assert_eq!(FormatError::range().to_string(), "RangeError");
    }
}
