//! The `temporal_format` crate converts between textual date-time
//! representations and instants with nanosecond resolution.
//!
//! ```rust
//! use temporal_format::DateFormatter;
//!
//! let formatter = DateFormatter::for_pattern("strict_date_optional_time||epoch_millis").unwrap();
//!
//! // The date segment is tried first, the numeric segment is the fallback.
//! let instant = formatter.parse("2018-10-10T12:13:14.123Z").unwrap();
//! assert_eq!(instant.to_epoch_millis(), 1_539_173_594_123);
//! assert_eq!(formatter.parse("123").unwrap().to_epoch_millis(), 123);
//!
//! // Formatting always uses the first segment of the chain.
//! assert_eq!(formatter.format(&instant), "2018-10-10T12:13:14.123Z");
//!
//! // The roundup formatter resolves partial input to its latest instant.
//! let roundup = formatter.roundup_formatter();
//! assert_eq!(roundup.parse("2018-10-10").unwrap().to_epoch_millis(), 1_539_215_999_999);
//! ```
//!
//! A pattern is a `||` separated chain of segments. Each segment is
//! either one of the named formats of the [`registry`] (for example
//! `epoch_millis`, `strict_date_optional_time` or `rfc3339_lenient`) or
//! a custom pattern such as `uuuu-MM-dd'T'HH:mm:ss.SSS`. Custom patterns
//! are compiled with the modern letter table unless the pattern string
//! starts with the legacy marker `8` or the formatter is built with
//! [`FormatOptions::legacy_compatible`].
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,

    // It may be worth to look if we can fix the issues highlighted by these lints.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]

pub mod error;
pub mod options;
pub mod pattern;
pub mod provider;
pub mod registry;

mod cache;
mod epoch;
mod epoch_nanoseconds;
mod fields;
mod formatter;
mod instant;
mod items;
mod named;
mod parsers;
mod printers;
mod roundup;
mod timezone;

use core::cmp::Ordering;

#[doc(inline)]
pub use error::FormatError;

/// The `temporal_format` result type
pub type FormatResult<T> = Result<T, FormatError>;

/// Re-export of `Locale` from `icu_locale`.
pub use icu_locale::Locale;

pub use crate::{
    epoch::EpochUnit,
    formatter::DateFormatter,
    instant::Instant,
    options::{Dialect, FormatOptions},
    pattern::{FormatChain, PatternSegment},
    provider::{FixedOffsetProvider, TimeZoneProvider},
    registry::{Deprecation, DeprecationKind, FormatName, ResolvedName},
    roundup::RoundupFormatter,
    timezone::{NamedZone, TimeZone, UtcOffset},
};

/// A library specific trait for unwrapping assertions.
pub(crate) trait FormatUnwrap {
    type Output;

    /// `temporal_format` based assertion for unwrapping. This will panic in
    /// debug builds, but returns an error during runtime.
    fn format_unwrap(self) -> FormatResult<Self::Output>;
}

impl<T> FormatUnwrap for Option<T> {
    type Output = T;

    fn format_unwrap(self) -> FormatResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(FormatError::assert())
    }
}

/// A general Sign type.
#[repr(i8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    #[default]
    Positive = 1,
    Zero = 0,
    Negative = -1,
}

impl From<i64> for Sign {
    fn from(value: i64) -> Self {
        match value.cmp(&0) {
            Ordering::Greater => Self::Positive,
            Ordering::Equal => Self::Zero,
            Ordering::Less => Self::Negative,
        }
    }
}

impl Sign {
    /// Coerces the current `Sign` to be either negative or positive.
    pub(crate) fn as_sign_multiplier(self) -> i8 {
        if matches!(self, Self::Zero) {
            return 1;
        }
        self as i8
    }
}

// Relevant numeric constants
/// Nanoseconds per second constant: 1e+9
pub const NS_PER_SECOND: u32 = 1_000_000_000;
/// Seconds per day constant: 86_400
pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
/// Nanoseconds per millisecond constant: 1e+6
pub(crate) const NS_PER_MILLI: u32 = 1_000_000;
