//! The numeric epoch codecs behind `epoch_second` and `epoch_millis`.
//!
//! Values are decimal strings `[-]digits[.digits]` with at most six
//! fraction digits. Conversions are exact: the text is scaled to
//! nanoseconds with integer arithmetic and floored into an instant, so
//! `-0.12345` milliseconds becomes `(-1 s, 999_876_550 ns)`.

use core::fmt;

use writeable::{impl_display_with_writeable, Writeable};

use crate::{
    epoch_nanoseconds::EpochNanoseconds, error::ErrorMessage, FormatError, FormatResult, Instant,
};

/// The maximum number of fraction digits accepted and printed.
const MAX_FRACTION_DIGITS: u32 = 6;

/// More integer digits than any representable instant needs.
const MAX_INTEGER_DIGITS: usize = 20;

/// The unit of a numeric epoch value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpochUnit {
    Seconds,
    Millis,
}

impl EpochUnit {
    /// Nanoseconds in one unit.
    const fn nanoseconds(self) -> i128 {
        match self {
            Self::Seconds => 1_000_000_000,
            Self::Millis => 1_000_000,
        }
    }

    /// Nanoseconds in the smallest printed fraction step.
    const fn fraction_step(self) -> i128 {
        self.nanoseconds() / 10i128.pow(MAX_FRACTION_DIGITS)
    }
}

/// A parsed epoch value and the span a roundup parse may extend it by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EpochValue {
    nanoseconds: EpochNanoseconds,
    granularity: i128,
}

impl EpochValue {
    pub(crate) fn instant(self) -> FormatResult<Instant> {
        Instant::from_epoch_nanoseconds(self.nanoseconds)
    }

    /// The roundup reading of the value.
    ///
    /// A whole number of units extends to the last nanosecond of that unit.
    /// A value written with a fraction is already exact and is kept.
    pub(crate) fn roundup_instant(self) -> FormatResult<Instant> {
        let last = self.nanoseconds.checked_add(self.granularity - 1)?;
        Instant::from_epoch_nanoseconds(last)
    }
}

fn invalid() -> FormatError {
    FormatError::syntax().with_enum(ErrorMessage::InvalidEpochValue)
}

/// Parses `[-]digits[.digits]` in `unit`.
pub(crate) fn parse_epoch(text: &str, unit: EpochUnit) -> FormatResult<EpochValue> {
    let (negative, body) = match text.as_bytes() {
        [b'-', rest @ ..] => (true, rest),
        bytes => (false, bytes),
    };
    let (integer, fraction) = match body.iter().position(|b| *b == b'.') {
        Some(index) => (&body[..index], Some(&body[index + 1..])),
        None => (body, None),
    };

    if integer.is_empty()
        || integer.len() > MAX_INTEGER_DIGITS
        || !integer.iter().all(u8::is_ascii_digit)
    {
        return Err(invalid());
    }
    let fraction = fraction.unwrap_or_default();
    if fraction.len() > MAX_FRACTION_DIGITS as usize || !fraction.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    if body.last() == Some(&b'.') {
        return Err(invalid());
    }

    let digits = |bytes: &[u8]| {
        bytes
            .iter()
            .fold(0i128, |acc, digit| acc * 10 + i128::from(digit - b'0'))
    };
    let fraction_scale = 10i128.pow(MAX_FRACTION_DIGITS - fraction.len() as u32);
    let steps = digits(integer) * 10i128.pow(MAX_FRACTION_DIGITS) + digits(fraction) * fraction_scale;

    let magnitude = steps * unit.fraction_step();
    let nanoseconds = EpochNanoseconds(if negative { -magnitude } else { magnitude });
    nanoseconds.check_validity()?;
    Ok(EpochValue {
        nanoseconds,
        granularity: if fraction.is_empty() {
            unit.nanoseconds()
        } else {
            1
        },
    })
}

/// Prints an instant as a decimal epoch value.
///
/// Sub-step precision is floored away, trailing fraction zeros are
/// trimmed, and an integer part beyond `i64` prints as `±i64::MAX`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FormattableEpoch {
    pub(crate) instant: Instant,
    pub(crate) unit: EpochUnit,
}

impl Writeable for FormattableEpoch {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let steps = self
            .instant
            .epoch_nanoseconds()
            .as_i128()
            .div_euclid(self.unit.fraction_step());
        let per_unit = 10u128.pow(MAX_FRACTION_DIGITS);
        let magnitude = steps.unsigned_abs();
        let integer = magnitude / per_unit;
        let fraction = magnitude % per_unit;

        if steps < 0 {
            sink.write_char('-')?;
        }
        if integer > i64::MAX as u128 {
            return i64::MAX.write_to(sink);
        }
        integer.write_to(sink)?;
        if fraction == 0 {
            return Ok(());
        }

        sink.write_char('.')?;
        let mut width = MAX_FRACTION_DIGITS as usize;
        let mut fraction = fraction;
        while fraction % 10 == 0 {
            fraction /= 10;
            width -= 1;
        }
        let length = fraction.checked_ilog10().map_or(1, |log| log as usize + 1);
        for _ in length..width {
            sink.write_char('0')?;
        }
        fraction.write_to(sink)
    }
}

impl_display_with_writeable!(FormattableEpoch);

#[cfg(test)]
mod tests {
    use writeable::assert_writeable_eq;

    use super::{parse_epoch, EpochUnit, FormattableEpoch};
    use crate::Instant;

    fn parts(text: &str, unit: EpochUnit) -> (i64, u32) {
        let instant = parse_epoch(text, unit).unwrap().instant().unwrap();
        (instant.epoch_seconds(), instant.subsec_nanos())
    }

    fn millis(seconds: i64, nanos: u32) -> FormattableEpoch {
        FormattableEpoch {
            instant: Instant::new(seconds, nanos).unwrap(),
            unit: EpochUnit::Millis,
        }
    }

    #[test]
    fn negative_millis_floor() {
        assert_eq!(
            parts("-123000.123456", EpochUnit::Millis),
            (-124, 999_876_544)
        );
        assert_eq!(parts("-0.12345", EpochUnit::Millis), (-1, 999_876_550));
        assert_eq!(
            parts("-6250000430768.25", EpochUnit::Millis),
            (-6_250_000_431, 231_750_000)
        );
        assert_eq!(
            parts("-6250000431000.000001", EpochUnit::Millis),
            (-6_250_000_432, 999_999_999)
        );
        assert_eq!(parts("-1", EpochUnit::Millis), (-1, 999_000_000));
        assert_eq!(parts("0", EpochUnit::Millis), (0, 0));
    }

    #[test]
    fn seconds_with_fraction() {
        assert_eq!(parts("1234.567", EpochUnit::Seconds), (1234, 567_000_000));
        assert_eq!(parts("-1234.567", EpochUnit::Seconds), (-1235, 433_000_000));
        assert_eq!(parts("1234.123456", EpochUnit::Seconds), (1234, 123_456_000));
    }

    #[test]
    fn rejects_malformed_values() {
        for (text, unit) in [
            ("1234.1234567890", EpochUnit::Seconds),
            ("1234.1234567", EpochUnit::Seconds),
            ("abc", EpochUnit::Seconds),
            ("1234.abc", EpochUnit::Seconds),
            ("123.1234567", EpochUnit::Millis),
            ("", EpochUnit::Millis),
            ("-", EpochUnit::Millis),
            ("12.", EpochUnit::Millis),
            (".5", EpochUnit::Millis),
            ("+12", EpochUnit::Millis),
            ("1e3", EpochUnit::Millis),
            ("99999999999999999999", EpochUnit::Seconds),
        ] {
            assert!(parse_epoch(text, unit).is_err(), "{text}");
        }
    }

    #[test]
    fn roundup_granularity() {
        let value = parse_epoch("1234567890", EpochUnit::Seconds).unwrap();
        let instant = value.roundup_instant().unwrap();
        assert_eq!(instant.to_epoch_millis(), 1_234_567_890_999);
        assert_eq!(instant.subsec_nanos(), 999_999_999);

        let value = parse_epoch("1234567890123", EpochUnit::Millis).unwrap();
        assert_eq!(value.roundup_instant().unwrap().subsec_nanos(), 123_999_999);

        let value = parse_epoch("-1", EpochUnit::Millis).unwrap();
        let instant = value.roundup_instant().unwrap();
        assert_eq!((instant.epoch_seconds(), instant.subsec_nanos()), (-1, 999_999_999));

        // Fractions are kept as written.
        let value = parse_epoch("1.5", EpochUnit::Seconds).unwrap();
        assert_eq!(value.roundup_instant().unwrap().subsec_nanos(), 500_000_000);
        let value = parse_epoch("1.5", EpochUnit::Millis).unwrap();
        assert_eq!(value.roundup_instant().unwrap().subsec_nanos(), 1_500_000);
        let value = parse_epoch("-0.12345", EpochUnit::Millis).unwrap();
        assert_eq!(value.roundup_instant().unwrap(), value.instant().unwrap());
    }

    #[test]
    fn millis_output() {
        assert_writeable_eq!(millis(42, 123_456_789), "42123.456789");
        assert_writeable_eq!(millis(-42, 123_456_789), "-41876.543211");
        assert_writeable_eq!(millis(0, 0), "0");
        assert_writeable_eq!(millis(0, 500_000), "0.5");
        assert_writeable_eq!(millis(0, 1), "0.000001");
        assert_writeable_eq!(
            FormattableEpoch {
                instant: Instant::from_epoch_millis(i64::MIN),
                unit: EpochUnit::Millis,
            },
            "-9223372036854775807"
        );
    }

    #[test]
    fn seconds_output() {
        let seconds = |seconds, nanos| FormattableEpoch {
            instant: Instant::new(seconds, nanos).unwrap(),
            unit: EpochUnit::Seconds,
        };
        assert_writeable_eq!(seconds(1234, 0), "1234");
        assert_writeable_eq!(seconds(1234, 100_000_000), "1234.1");
        assert_writeable_eq!(seconds(-1, 500_000_000), "-0.5");
        // Below a microsecond the value is floored.
        assert_writeable_eq!(seconds(-1, 999_999_999), "-0.000001");
        assert_writeable_eq!(seconds(0, 999), "0");
    }

    #[test]
    fn output_parses_back() {
        for (seconds, nanos) in [(-6_250_000_432, 999_999_999), (1, 1), (-9, 123_456_789)] {
            let instant = Instant::new(seconds, nanos).unwrap();
            let text = FormattableEpoch {
                instant,
                unit: EpochUnit::Millis,
            }
            .to_string();
            let parsed = parse_epoch(&text, EpochUnit::Millis)
                .unwrap()
                .instant()
                .unwrap();
            assert_eq!(parsed, instant);
        }
    }
}
