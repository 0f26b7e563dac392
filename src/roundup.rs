//! The roundup counterpart of a `DateFormatter`.

use core::fmt;
use std::sync::Arc;

use icu_locale::Locale;

use crate::{
    formatter::DateFormatter, options::Defaulting, pattern::FormatChain, timezone::TimeZone,
    FormatResult, Instant,
};

/// A formatter that resolves partial input to the latest instant it
/// covers.
///
/// Fields missing from the text take their maximum value, so `2018-10-10`
/// parses to the last nanosecond of that day. Epoch values take the last
/// instant their digits describe. Formatting is the same as the source
/// formatter's.
///
/// ```rust
/// use temporal_format::DateFormatter;
///
/// let formatter = DateFormatter::for_pattern("uuuu-MM").unwrap();
/// let roundup = formatter.roundup_formatter();
/// let instant = roundup.parse("2018-02").unwrap();
/// assert_eq!(instant.to_epoch_millis(), 1_519_862_399_999);
/// assert_eq!(roundup.format(&instant), "2018-02");
/// ```
#[derive(Clone)]
pub struct RoundupFormatter {
    chain: Arc<FormatChain>,
    locale: Locale,
    zone: Option<TimeZone>,
}

impl RoundupFormatter {
    /// Builds the roundup formatter of `formatter`.
    ///
    /// [`DateFormatter::roundup_formatter`] memoizes this value.
    #[must_use]
    pub fn new(formatter: &DateFormatter) -> Self {
        Self {
            chain: formatter.shared_chain().clone(),
            locale: formatter.locale().clone(),
            zone: formatter.zone().cloned(),
        }
    }

    /// Parses `text`, filling missing fields with their maximum value.
    ///
    /// The segment is chosen as by [`DateFormatter::parse`]. When that
    /// segment cannot resolve the maximum, parsing fails.
    pub fn parse(&self, text: &str) -> FormatResult<Instant> {
        self.chain
            .parse(text, self.zone.as_ref(), Defaulting::Maximum)
    }

    /// Formats `instant` like the source formatter.
    #[must_use]
    pub fn format(&self, instant: &Instant) -> String {
        self.chain.format(instant, self.zone.as_ref())
    }

    /// Returns the pattern of the source formatter.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.chain.pattern()
    }

    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    #[must_use]
    pub fn zone(&self) -> Option<&TimeZone> {
        self.zone.as_ref()
    }
}

impl fmt::Debug for RoundupFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundupFormatter")
            .field("pattern", &self.pattern())
            .field("locale", &self.locale)
            .field("zone", &self.zone)
            .finish()
    }
}
