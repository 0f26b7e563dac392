//! This module implements `DateFormatter`, the entry point for parsing and
//! formatting with a pattern.

use core::{
    fmt,
    hash::{Hash, Hasher},
};
use std::sync::{Arc, OnceLock};

use icu_locale::{locale, Locale};

use crate::{
    cache,
    options::{Defaulting, Dialect, FormatOptions},
    pattern::{self, FormatChain},
    registry::Deprecation,
    roundup::RoundupFormatter,
    timezone::TimeZone,
    FormatResult, Instant,
};


struct FormatterInner {
    chain: Arc<FormatChain>,
    locale: Locale,
    zone: Option<TimeZone>,
    roundup: OnceLock<RoundupFormatter>,
}

/// A compiled pattern with a locale and an optional time zone.
///
/// `DateFormatter` is cheap to clone and can be shared between threads.
/// Formatters built from the same named-only pattern with default options
/// are the same object.
///
/// ```rust
/// use temporal_format::{DateFormatter, Instant};
///
/// let formatter = DateFormatter::for_pattern("strict_date_time").unwrap();
/// assert_eq!(formatter.format_millis(1_549_626_180_000), "2019-02-08T11:43:00.000Z");
///
/// let instant = formatter.parse("2019-02-08T11:43:00.000+01:00").unwrap();
/// assert_eq!(instant.to_epoch_millis(), 1_549_622_580_000);
/// // Without a zone, the offset parsed from the text is kept for printing.
/// assert_eq!(formatter.format(&instant), "2019-02-08T11:43:00.000+01:00");
/// ```
#[derive(Clone)]
pub struct DateFormatter {
    inner: Arc<FormatterInner>,
}

impl DateFormatter {
    pub(crate) fn from_chain(chain: FormatChain) -> Self {
        Self::from_parts(Arc::new(chain), locale!("und"), None)
    }

    fn from_parts(chain: Arc<FormatChain>, locale: Locale, zone: Option<TimeZone>) -> Self {
        Self {
            inner: Arc::new(FormatterInner {
                chain,
                locale,
                zone,
                roundup: OnceLock::new(),
            }),
        }
    }

    /// Builds a formatter for `pattern` with default options.
    pub fn for_pattern(pattern: &str) -> FormatResult<Self> {
        Self::for_pattern_with_options(pattern, FormatOptions::default())
    }

    /// Builds a formatter for `pattern`.
    pub fn for_pattern_with_options(pattern: &str, options: FormatOptions) -> FormatResult<Self> {
        if options == FormatOptions::default() {
            return cache::cached_formatter(pattern);
        }
        let dialect = if options.legacy_compatible {
            Dialect::Legacy
        } else {
            Dialect::Modern
        };
        pattern::compile(pattern, dialect).map(Self::from_chain)
    }

    /// Parses `text` with the first segment of the chain that accepts all
    /// of it. Fields missing from the text take their minimum value.
    pub fn parse(&self, text: &str) -> FormatResult<Instant> {
        self.inner
            .chain
            .parse(text, self.inner.zone.as_ref(), Defaulting::Minimum)
    }

    /// Formats `instant` with the first segment of the chain.
    ///
    /// Fields are observed in the formatter's zone, else at the offset the
    /// instant was parsed with, else in UTC.
    #[must_use]
    pub fn format(&self, instant: &Instant) -> String {
        self.inner.chain.format(instant, self.inner.zone.as_ref())
    }

    /// Formats an epoch millisecond value.
    #[must_use]
    pub fn format_millis(&self, millis: i64) -> String {
        self.format(&Instant::from_epoch_millis(millis))
    }

    /// Returns the pattern string, including a legacy marker.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.inner.chain.pattern()
    }

    /// Returns the compiled chain.
    #[must_use]
    pub fn chain(&self) -> &FormatChain {
        &self.inner.chain
    }

    pub(crate) fn shared_chain(&self) -> &Arc<FormatChain> {
        &self.inner.chain
    }

    /// Returns the locale tag. It is carried but never changes the output.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.inner.locale
    }

    /// Returns a formatter with `locale`, or this one if it already has it.
    #[must_use]
    pub fn with_locale(&self, locale: Locale) -> Self {
        if self.inner.locale == locale {
            return self.clone();
        }
        Self::from_parts(self.inner.chain.clone(), locale, self.inner.zone.clone())
    }

    /// Returns the zone, if one was set.
    #[must_use]
    pub fn zone(&self) -> Option<&TimeZone> {
        self.inner.zone.as_ref()
    }

    /// Returns a formatter with `zone`, or this one if it already has it.
    #[must_use]
    pub fn with_zone(&self, zone: TimeZone) -> Self {
        if self.inner.zone.as_ref() == Some(&zone) {
            return self.clone();
        }
        Self::from_parts(self.inner.chain.clone(), self.inner.locale.clone(), Some(zone))
    }

    /// Returns the roundup formatter of this formatter, building it on
    /// first use.
    pub fn roundup_formatter(&self) -> &RoundupFormatter {
        self.inner.roundup.get_or_init(|| RoundupFormatter::new(self))
    }

    /// Returns the advisories raised for deprecated names in the pattern.
    #[must_use]
    pub fn deprecations(&self) -> &[Deprecation] {
        self.inner.chain.deprecations()
    }

    /// Whether `a` and `b` are the same object.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl PartialEq for DateFormatter {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
            || (self.inner.chain == other.inner.chain
                && self.inner.locale == other.inner.locale
                && self.inner.zone == other.inner.zone)
    }
}

impl Eq for DateFormatter {}

impl Hash for DateFormatter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.chain.hash(state);
        self.inner.locale.to_string().hash(state);
        self.inner.zone.hash(state);
    }
}

impl fmt::Debug for DateFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateFormatter")
            .field("pattern", &self.pattern())
            .field("locale", &self.inner.locale)
            .field("zone", &self.inner.zone)
            .finish()
    }
}

impl fmt::Display for DateFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateFormatter[pattern={}, locale={}", self.pattern(), self.inner.locale)?;
        if let Some(zone) = &self.inner.zone {
            write!(f, ", zone={zone}")?;
        }
        f.write_str("]")
    }
}
