//! Options that control how a pattern is compiled and how parsed fields
//! are resolved.

use core::{fmt, str::FromStr};

/// The letter table used to compile custom pattern segments.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// The current letter table, where `u` is the proleptic year and `y`
    /// the year of era.
    #[default]
    Modern,
    /// The legacy letter table, where `y` is the proleptic year, `x` the
    /// week-based year and `e` the numeric day of week.
    Legacy,
}

/// A parsing error for `Dialect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDialectError;

impl fmt::Display for ParseDialectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid dialect")
    }
}

impl FromStr for Dialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modern" => Ok(Self::Modern),
            "legacy" => Ok(Self::Legacy),
            _ => Err(ParseDialectError),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modern => "modern",
            Self::Legacy => "legacy",
        }
        .fmt(f)
    }
}

/// Options for building a `DateFormatter`.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatOptions {
    /// Compile every custom segment with [`Dialect::Legacy`], whether or
    /// not the pattern carries the `8` marker.
    pub legacy_compatible: bool,
}

impl FormatOptions {
    /// Sets `legacy_compatible`.
    #[must_use]
    pub const fn with_legacy_compatible(mut self, legacy_compatible: bool) -> Self {
        self.legacy_compatible = legacy_compatible;
        self
    }
}

/// Which end of the described range absent fields default to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Defaulting {
    /// Absent fields take their minimum value.
    Minimum,
    /// Absent fields take their maximum value, producing the last
    /// instant the text describes.
    Maximum,
}

impl Defaulting {
    pub(crate) fn is_roundup(self) -> bool {
        matches!(self, Self::Maximum)
    }
}
