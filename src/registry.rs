//! The registry of named formats.
//!
//! Every named format has a canonical snake case name. Most of them also
//! accept a camel case alias, and a few names are deprecated outright in
//! favor of another one. Both kinds of alias still resolve; the resolution
//! carries a [`Deprecation`] describing what the caller should use instead.
//!
//! ```rust
//! use temporal_format::registry::{resolve, DeprecationKind, FormatName};
//!
//! let resolved = resolve("strictDateOptionalTime").unwrap();
//! assert_eq!(resolved.name, FormatName::StrictDateOptionalTime);
//! assert!(matches!(
//!     resolved.deprecation.map(|d| d.kind()),
//!     Some(DeprecationKind::CamelCase)
//! ));
//!
//! assert!(resolve("strict_date_optional_time").unwrap().deprecation.is_none());
//! assert!(resolve("Strict_Date").is_none());
//! ```

use core::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use writeable::{impl_display_with_writeable, Writeable};

macro_rules! format_names {
    ($($variant:ident => $snake:literal $(| $camel:literal)?;)*) => {
        /// A named format.
        #[non_exhaustive]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum FormatName {
            $($variant,)*
        }

        const ENTRIES: &[(FormatName, &str, Option<&str>)] = &[
            $((FormatName::$variant, $snake, format_names!(@camel $($camel)?)),)*
        ];
    };
    (@camel) => { None };
    (@camel $camel:literal) => { Some($camel) };
}

format_names! {
    Iso8601 => "iso8601";
    Rfc3339Lenient => "rfc3339_lenient";
    EpochSecond => "epoch_second";
    EpochMillis => "epoch_millis";
    BasicDate => "basic_date" | "basicDate";
    BasicDateTime => "basic_date_time" | "basicDateTime";
    BasicDateTimeNoMillis => "basic_date_time_no_millis" | "basicDateTimeNoMillis";
    BasicOrdinalDate => "basic_ordinal_date" | "basicOrdinalDate";
    BasicOrdinalDateTime => "basic_ordinal_date_time" | "basicOrdinalDateTime";
    BasicOrdinalDateTimeNoMillis => "basic_ordinal_date_time_no_millis" | "basicOrdinalDateTimeNoMillis";
    BasicTime => "basic_time" | "basicTime";
    BasicTimeNoMillis => "basic_time_no_millis" | "basicTimeNoMillis";
    BasicTTime => "basic_t_time" | "basicTTime";
    BasicTTimeNoMillis => "basic_t_time_no_millis" | "basicTTimeNoMillis";
    BasicWeekDate => "basic_week_date" | "basicWeekDate";
    BasicWeekDateTime => "basic_week_date_time" | "basicWeekDateTime";
    BasicWeekDateTimeNoMillis => "basic_week_date_time_no_millis" | "basicWeekDateTimeNoMillis";
    Date => "date";
    DateHour => "date_hour" | "dateHour";
    DateHourMinute => "date_hour_minute" | "dateHourMinute";
    DateHourMinuteSecond => "date_hour_minute_second" | "dateHourMinuteSecond";
    DateHourMinuteSecondFraction => "date_hour_minute_second_fraction" | "dateHourMinuteSecondFraction";
    DateHourMinuteSecondMillis => "date_hour_minute_second_millis" | "dateHourMinuteSecondMillis";
    DateOptionalTime => "date_optional_time" | "dateOptionalTime";
    DateTime => "date_time" | "dateTime";
    DateTimeNoMillis => "date_time_no_millis" | "dateTimeNoMillis";
    Hour => "hour";
    HourMinute => "hour_minute" | "hourMinute";
    HourMinuteSecond => "hour_minute_second" | "hourMinuteSecond";
    HourMinuteSecondFraction => "hour_minute_second_fraction" | "hourMinuteSecondFraction";
    HourMinuteSecondMillis => "hour_minute_second_millis" | "hourMinuteSecondMillis";
    OrdinalDate => "ordinal_date" | "ordinalDate";
    OrdinalDateTime => "ordinal_date_time" | "ordinalDateTime";
    OrdinalDateTimeNoMillis => "ordinal_date_time_no_millis" | "ordinalDateTimeNoMillis";
    Time => "time";
    TimeNoMillis => "time_no_millis" | "timeNoMillis";
    TTime => "t_time" | "tTime";
    TTimeNoMillis => "t_time_no_millis" | "tTimeNoMillis";
    WeekDate => "week_date" | "weekDate";
    WeekDateTime => "week_date_time" | "weekDateTime";
    WeekDateTimeNoMillis => "week_date_time_no_millis" | "weekDateTimeNoMillis";
    Weekyear => "weekyear";
    WeekyearWeek => "weekyear_week" | "weekyearWeek";
    WeekyearWeekDay => "weekyear_week_day" | "weekyearWeekDay";
    Year => "year";
    YearMonth => "year_month" | "yearMonth";
    YearMonthDay => "year_month_day" | "yearMonthDay";
    StrictBasicWeekDate => "strict_basic_week_date" | "strictBasicWeekDate";
    StrictBasicWeekDateTime => "strict_basic_week_date_time" | "strictBasicWeekDateTime";
    StrictBasicWeekDateTimeNoMillis => "strict_basic_week_date_time_no_millis" | "strictBasicWeekDateTimeNoMillis";
    StrictDate => "strict_date" | "strictDate";
    StrictDateHour => "strict_date_hour" | "strictDateHour";
    StrictDateHourMinute => "strict_date_hour_minute" | "strictDateHourMinute";
    StrictDateHourMinuteSecond => "strict_date_hour_minute_second" | "strictDateHourMinuteSecond";
    StrictDateHourMinuteSecondFraction => "strict_date_hour_minute_second_fraction" | "strictDateHourMinuteSecondFraction";
    StrictDateHourMinuteSecondMillis => "strict_date_hour_minute_second_millis" | "strictDateHourMinuteSecondMillis";
    StrictDateOptionalTime => "strict_date_optional_time" | "strictDateOptionalTime";
    StrictDateOptionalTimeNanos => "strict_date_optional_time_nanos" | "strictDateOptionalTimeNanos";
    StrictDateTime => "strict_date_time" | "strictDateTime";
    StrictDateTimeNoMillis => "strict_date_time_no_millis" | "strictDateTimeNoMillis";
    StrictHour => "strict_hour" | "strictHour";
    StrictHourMinute => "strict_hour_minute" | "strictHourMinute";
    StrictHourMinuteSecond => "strict_hour_minute_second" | "strictHourMinuteSecond";
    StrictHourMinuteSecondFraction => "strict_hour_minute_second_fraction" | "strictHourMinuteSecondFraction";
    StrictHourMinuteSecondMillis => "strict_hour_minute_second_millis" | "strictHourMinuteSecondMillis";
    StrictOrdinalDate => "strict_ordinal_date" | "strictOrdinalDate";
    StrictOrdinalDateTime => "strict_ordinal_date_time" | "strictOrdinalDateTime";
    StrictOrdinalDateTimeNoMillis => "strict_ordinal_date_time_no_millis" | "strictOrdinalDateTimeNoMillis";
    StrictTime => "strict_time" | "strictTime";
    StrictTimeNoMillis => "strict_time_no_millis" | "strictTimeNoMillis";
    StrictTTime => "strict_t_time" | "strictTTime";
    StrictTTimeNoMillis => "strict_t_time_no_millis" | "strictTTimeNoMillis";
    StrictWeekDate => "strict_week_date" | "strictWeekDate";
    StrictWeekDateTime => "strict_week_date_time" | "strictWeekDateTime";
    StrictWeekDateTimeNoMillis => "strict_week_date_time_no_millis" | "strictWeekDateTimeNoMillis";
    StrictWeekyear => "strict_weekyear" | "strictWeekyear";
    StrictWeekyearWeek => "strict_weekyear_week" | "strictWeekyearWeek";
    StrictWeekyearWeekDay => "strict_weekyear_week_day" | "strictWeekyearWeekDay";
    StrictYear => "strict_year" | "strictYear";
    StrictYearMonth => "strict_year_month" | "strictYearMonth";
    StrictYearMonthDay => "strict_year_month_day" | "strictYearMonthDay";
    WeekYear => "week_year";
}

/// Names that are deprecated as a whole, with their replacement.
const RENAMED: &[(FormatName, FormatName)] = &[(FormatName::WeekYear, FormatName::Weekyear)];

impl FormatName {
    fn entry(self) -> (&'static str, Option<&'static str>) {
        // The table holds one entry per variant, in declaration order.
        let (_, snake, camel) = ENTRIES[self as usize];
        (snake, camel)
    }

    /// Returns the canonical snake case name.
    #[must_use]
    pub fn snake_case_name(self) -> &'static str {
        self.entry().0
    }

    /// Returns the deprecated camel case alias, if this name has one.
    #[must_use]
    pub fn camel_case_name(self) -> Option<&'static str> {
        self.entry().1
    }

    /// Returns the name that replaces this one, if it is deprecated.
    #[must_use]
    pub fn replacement(self) -> Option<Self> {
        RENAMED
            .iter()
            .find_map(|(name, replacement)| (*name == self).then_some(*replacement))
    }

    /// Returns whether this is one of the fixed width `strict_` formats.
    #[must_use]
    pub fn is_strict(self) -> bool {
        self.snake_case_name().starts_with("strict_")
    }

    /// Returns an iterator over every registered name.
    pub fn iter() -> impl Iterator<Item = Self> {
        ENTRIES.iter().map(|(name, _, _)| *name)
    }
}

impl fmt::Display for FormatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.snake_case_name())
    }
}

/// The two classes of deprecated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeprecationKind {
    /// A camel case spelling of a current name.
    CamelCase,
    /// A name superseded by a different one.
    Renamed,
}

/// An advisory raised when a deprecated identifier is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deprecation {
    identifier: &'static str,
    replacement: FormatName,
    kind: DeprecationKind,
}

impl Deprecation {
    /// The identifier as written.
    #[must_use]
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// The name to use instead.
    #[must_use]
    pub fn replacement(&self) -> FormatName {
        self.replacement
    }

    #[must_use]
    pub fn kind(&self) -> DeprecationKind {
        self.kind
    }

    /// Emits this advisory through `log` with the `deprecation` target.
    pub(crate) fn emit(&self) {
        #[cfg(feature = "log")]
        log::warn!(target: "deprecation", "{self}");
    }
}

impl Writeable for Deprecation {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let replacement = self.replacement.snake_case_name();
        match self.kind {
            DeprecationKind::CamelCase => {
                sink.write_str("Camel case format name ")?;
                sink.write_str(self.identifier)?;
                sink.write_str(
                    " is deprecated and will be removed in a future version. Use snake case name ",
                )?;
                sink.write_str(replacement)?;
                sink.write_str(" instead.")
            }
            DeprecationKind::Renamed => {
                sink.write_str("Format name \"")?;
                sink.write_str(self.identifier)?;
                sink.write_str(
                    "\" is deprecated and will be removed in a future version. Use \"",
                )?;
                sink.write_str(replacement)?;
                sink.write_str("\" format instead")
            }
        }
    }
}

impl_display_with_writeable!(Deprecation);

/// The outcome of resolving an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedName {
    /// The named format to use.
    pub name: FormatName,
    /// Set when the identifier is a deprecated spelling.
    pub deprecation: Option<Deprecation>,
}

static LOOKUP: LazyLock<FxHashMap<&'static str, ResolvedName>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    for &(name, snake, camel) in ENTRIES {
        let deprecation = name.replacement().map(|replacement| Deprecation {
            identifier: snake,
            replacement,
            kind: DeprecationKind::Renamed,
        });
        map.insert(
            snake,
            ResolvedName {
                name: name.replacement().unwrap_or(name),
                deprecation,
            },
        );
        if let Some(camel) = camel {
            let deprecation = Deprecation {
                identifier: camel,
                replacement: name,
                kind: DeprecationKind::CamelCase,
            };
            map.insert(
                camel,
                ResolvedName {
                    name,
                    deprecation: Some(deprecation),
                },
            );
        }
    }
    map
});

/// Resolves an identifier to a named format. Lookup is exact and case
/// sensitive.
#[must_use]
pub fn resolve(identifier: &str) -> Option<ResolvedName> {
    LOOKUP.get(identifier).copied()
}

#[cfg(test)]
mod tests {
    use super::{resolve, DeprecationKind, FormatName, ENTRIES};

    #[test]
    fn table_order_matches_variants() {
        for (index, (name, _, _)) in ENTRIES.iter().enumerate() {
            assert_eq!(*name as usize, index);
        }
    }

    #[test]
    fn camel_case_aliases_follow_snake_names() {
        for name in FormatName::iter() {
            let Some(camel) = name.camel_case_name() else {
                continue;
            };
            let mut expected = String::new();
            let mut upper = false;
            for c in name.snake_case_name().chars() {
                match c {
                    '_' => upper = true,
                    c if upper => {
                        expected.push(c.to_ascii_uppercase());
                        upper = false;
                    }
                    c => expected.push(c),
                }
            }
            assert_eq!(camel, expected);
        }
    }

    #[test]
    fn camel_case_advisory() {
        let resolved = resolve("strictDateOptionalTime").unwrap();
        let deprecation = resolved.deprecation.unwrap();
        assert_eq!(deprecation.kind(), DeprecationKind::CamelCase);
        assert_eq!(
            deprecation.to_string(),
            "Camel case format name strictDateOptionalTime is deprecated and will be removed \
             in a future version. Use snake case name strict_date_optional_time instead."
        );
    }

    #[test]
    fn renamed_advisory() {
        let resolved = resolve("week_year").unwrap();
        assert_eq!(resolved.name, FormatName::Weekyear);
        assert_eq!(
            resolved.deprecation.unwrap().to_string(),
            "Format name \"week_year\" is deprecated and will be removed in a future version. \
             Use \"weekyear\" format instead"
        );
    }

    #[test]
    fn exact_lookup() {
        assert_eq!(
            resolve("epoch_millis").map(|r| r.name),
            Some(FormatName::EpochMillis)
        );
        assert!(resolve("EPOCH_MILLIS").is_none());
        assert!(resolve("epochMillis").is_none());
        assert!(resolve("dateTime").is_some());
        assert!(resolve("strict_date_optional_time ").is_none());
        assert!(FormatName::StrictYear.is_strict());
        assert!(!FormatName::Year.is_strict());
    }
}
