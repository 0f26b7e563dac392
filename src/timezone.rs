//! Fixed offsets and named time zones.

use core::{
    fmt,
    hash::{Hash, Hasher},
};
use std::sync::Arc;

use tinystr::TinyAsciiStr;
use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    error::ErrorMessage, parsers::parse_two_digits, printers::write_padded_u8,
    provider::TimeZoneProvider, FormatError, FormatResult, Sign,
};

/// Maximum magnitude of a UTC offset, 18 hours.
const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

/// A UTC offset with second precision, within `-18:00..=+18:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcOffset(i32);

impl UtcOffset {
    /// The zero offset.
    pub const UTC: Self = Self(0);

    /// Creates an offset of `seconds` east of UTC.
    pub fn from_seconds(seconds: i32) -> FormatResult<Self> {
        if !(-MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS).contains(&seconds) {
            return Err(FormatError::range().with_enum(ErrorMessage::OffsetOutOfRange));
        }
        Ok(Self(seconds))
    }

    pub(crate) fn from_parts(sign: Sign, hours: u8, minutes: u8, seconds: u8) -> FormatResult<Self> {
        if minutes > 59 || seconds > 59 {
            return Err(FormatError::range().with_enum(ErrorMessage::OffsetOutOfRange));
        }
        let magnitude = i32::from(hours) * 3600 + i32::from(minutes) * 60 + i32::from(seconds);
        Self::from_seconds(magnitude * i32::from(sign.as_sign_multiplier()))
    }

    /// Returns the offset in seconds east of UTC.
    #[inline]
    #[must_use]
    pub fn seconds(self) -> i32 {
        self.0
    }

    pub(crate) fn sign(self) -> Sign {
        Sign::from(i64::from(self.0))
    }

    pub(crate) fn hours(self) -> u8 {
        (self.0.unsigned_abs() / 3600) as u8
    }

    pub(crate) fn minutes(self) -> u8 {
        (self.0.unsigned_abs() / 60 % 60) as u8
    }

    pub(crate) fn seconds_part(self) -> u8 {
        (self.0.unsigned_abs() % 60) as u8
    }

    /// Parses `Z`, `±HH`, `±HHMM`, `±HH:MM` or `±HH:MM:SS`.
    fn parse(source: &str) -> Option<Self> {
        let bytes = source.as_bytes();
        let (sign, rest) = match bytes.split_first()? {
            (b'Z' | b'z', []) => return Some(Self::UTC),
            (b'+', rest) => (Sign::Positive, rest),
            (b'-', rest) => (Sign::Negative, rest),
            _ => return None,
        };
        let (hours, rest) = parse_two_digits(rest)?;
        let (minutes, seconds) = match rest {
            [] => (0, 0),
            [b':', rest @ ..] => {
                let (minutes, rest) = parse_two_digits(rest)?;
                match rest {
                    [] => (minutes, 0),
                    [b':', rest @ ..] => match parse_two_digits(rest)? {
                        (seconds, []) => (minutes, seconds),
                        _ => return None,
                    },
                    _ => return None,
                }
            }
            rest => match parse_two_digits(rest)? {
                (minutes, []) => (minutes, 0),
                _ => return None,
            },
        };
        Self::from_parts(sign, hours, minutes, seconds).ok()
    }
}

impl Writeable for UtcOffset {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        if self.0 == 0 {
            return sink.write_char('Z');
        }
        sink.write_char(if self.0 < 0 { '-' } else { '+' })?;
        write_padded_u8(self.hours(), sink)?;
        sink.write_char(':')?;
        write_padded_u8(self.minutes(), sink)?;
        if self.seconds_part() != 0 {
            sink.write_char(':')?;
            write_padded_u8(self.seconds_part(), sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::between(1, 9)
    }
}

impl_display_with_writeable!(UtcOffset);

/// A time zone: either a fixed offset or a named zone resolved through a
/// host `TimeZoneProvider`.
#[derive(Clone)]
pub enum TimeZone {
    Fixed(UtcOffset),
    Named(NamedZone),
}

/// A zone identifier together with the provider that resolves it.
#[derive(Clone)]
pub struct NamedZone {
    identifier: TinyAsciiStr<64>,
    provider: Arc<dyn TimeZoneProvider>,
}

impl NamedZone {
    /// Returns the zone identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }
}

impl TimeZone {
    /// The UTC zone.
    pub const UTC: Self = Self::Fixed(UtcOffset::UTC);

    /// Parses a zone that needs no provider: `Z`, `UTC`, `GMT` or a
    /// numeric offset.
    pub fn try_from_str(source: &str) -> FormatResult<Self> {
        parse_fixed_zone(source).ok_or_else(|| {
            FormatError::range().with_message(format!(
                "time zone [{source}] requires a time zone provider"
            ))
        })
    }

    /// Parses a fixed zone, or a named zone known to `provider`.
    pub fn try_from_str_with_provider(
        source: &str,
        provider: Arc<dyn TimeZoneProvider>,
    ) -> FormatResult<Self> {
        if let Some(zone) = parse_fixed_zone(source) {
            return Ok(zone);
        }
        Self::named(source, provider)
            .ok_or_else(|| FormatError::range().with_message(format!("unknown time zone [{source}]")))
    }

    fn named(source: &str, provider: Arc<dyn TimeZoneProvider>) -> Option<Self> {
        if !provider.check_identifier(source) {
            return None;
        }
        let identifier = TinyAsciiStr::<64>::try_from_str(source).ok()?;
        Some(Self::Named(NamedZone {
            identifier,
            provider,
        }))
    }

    /// Returns the zone identifier: the name of a named zone, or `Z` /
    /// `±HH:MM` for a fixed offset.
    #[must_use]
    pub fn identifier(&self) -> String {
        match self {
            Self::Fixed(offset) => offset.write_to_string().into_owned(),
            Self::Named(zone) => zone.identifier().into(),
        }
    }

    /// Resolves a zone identifier found in parsed text. Named identifiers
    /// resolve through this zone's provider.
    pub(crate) fn resolve_identifier(source: &str, context: Option<&Self>) -> Option<Self> {
        if let Some(zone) = parse_fixed_zone(source) {
            return Some(zone);
        }
        match context? {
            Self::Named(zone) if zone.identifier() == source => context.cloned(),
            Self::Named(zone) => Self::named(source, zone.provider.clone()),
            Self::Fixed(_) => None,
        }
    }

    pub(crate) fn offset_at_epoch_seconds(&self, epoch_seconds: i64) -> FormatResult<UtcOffset> {
        match self {
            Self::Fixed(offset) => Ok(*offset),
            Self::Named(zone) => zone
                .provider
                .offset_for_epoch_seconds(zone.identifier(), epoch_seconds),
        }
    }

    pub(crate) fn offset_at_local_seconds(&self, local_seconds: i64) -> FormatResult<UtcOffset> {
        match self {
            Self::Fixed(offset) => Ok(*offset),
            Self::Named(zone) => zone
                .provider
                .offset_for_local_seconds(zone.identifier(), local_seconds),
        }
    }
}

fn parse_fixed_zone(source: &str) -> Option<TimeZone> {
    match source {
        "UTC" | "GMT" => Some(TimeZone::UTC),
        _ => UtcOffset::parse(source).map(TimeZone::Fixed),
    }
}

impl PartialEq for TimeZone {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::Named(a), Self::Named(b)) => a.identifier == b.identifier,
            _ => false,
        }
    }
}

impl Eq for TimeZone {}

impl Hash for TimeZone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Fixed(offset) => offset.hash(state),
            Self::Named(zone) => zone.identifier.hash(state),
        }
    }
}

impl fmt::Debug for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(offset) => f.debug_tuple("Fixed").field(offset).finish(),
            Self::Named(zone) => f.debug_tuple("Named").field(&zone.identifier()).finish(),
        }
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(offset) => fmt::Display::fmt(offset, f),
            Self::Named(zone) => f.write_str(zone.identifier()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use writeable::assert_writeable_eq;

    use super::{TimeZone, UtcOffset};
    use crate::provider::FixedOffsetProvider;

    #[test]
    fn fixed_zones() {
        assert_eq!(TimeZone::try_from_str("Z").unwrap(), TimeZone::UTC);
        assert_eq!(TimeZone::try_from_str("UTC").unwrap(), TimeZone::UTC);
        assert_eq!(TimeZone::try_from_str("GMT").unwrap(), TimeZone::UTC);
        assert_eq!(
            TimeZone::try_from_str("+01:00").unwrap(),
            TimeZone::try_from_str("+0100").unwrap()
        );
        assert_eq!(
            TimeZone::try_from_str("-05:30").unwrap().identifier(),
            "-05:30"
        );
        assert!(TimeZone::try_from_str("+19:00").is_err());
        assert!(TimeZone::try_from_str("Europe/Paris").is_err());
    }

    #[test]
    fn offset_output() {
        assert_writeable_eq!(UtcOffset::UTC, "Z");
        assert_writeable_eq!(UtcOffset::from_seconds(-19_800).unwrap(), "-05:30");
        assert_writeable_eq!(UtcOffset::from_seconds(3_661).unwrap(), "+01:01:01");
    }

    #[test]
    fn named_zones_compare_by_identifier() {
        let provider = Arc::new(
            FixedOffsetProvider::default()
                .with_zone("Europe/Paris", UtcOffset::from_seconds(3600).unwrap())
                .unwrap()
                .with_zone("Europe/Berlin", UtcOffset::from_seconds(3600).unwrap())
                .unwrap(),
        );
        let paris = TimeZone::try_from_str_with_provider("Europe/Paris", provider.clone()).unwrap();
        let berlin =
            TimeZone::try_from_str_with_provider("Europe/Berlin", provider.clone()).unwrap();
        assert_ne!(paris, berlin);
        assert_eq!(
            paris,
            TimeZone::resolve_identifier("Europe/Paris", Some(&berlin)).unwrap()
        );
        assert_eq!(paris.offset_at_epoch_seconds(0).unwrap().seconds(), 3600);
        assert!(TimeZone::try_from_str_with_provider("Asia/Tokyo", provider).is_err());
        assert!(TimeZone::resolve_identifier("Europe/Paris", None).is_none());
    }
}
