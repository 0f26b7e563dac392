//! The fields recovered from parsed text and their resolution into an
//! `Instant`.

use date_equations::{
    gregorian::{day_of_week, day_of_year, days_in_month, days_in_year, epoch_days_from_ymd},
    iso_week::{epoch_days_from_week_date, weeks_in_week_year},
};

use crate::{
    error::ErrorMessage,
    items::NumericField,
    options::Defaulting,
    timezone::{TimeZone, UtcOffset},
    FormatError, FormatResult, Instant, SECONDS_PER_DAY,
};

/// The year assumed when parsed text carries none.
const DEFAULT_YEAR: i32 = 1970;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Era {
    BeforeCommon,
    Common,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AmPm {
    Am,
    Pm,
}

/// Fraction of second digits as parsed.
///
/// `print_digits` is the widest fraction the parsing item prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fraction {
    pub(crate) nanos: u32,
    pub(crate) digits: u8,
    pub(crate) print_digits: u8,
}

impl Fraction {
    /// The last nanosecond a roundup parse keeps for these digits.
    ///
    /// Fractions printed to the millisecond or finer keep their digits and
    /// only fill the part of the millisecond the text left out, so `.1`
    /// becomes `.100999999`. Coarser fractions fill every missing digit.
    fn upper_bound(self) -> u32 {
        let kept = if self.print_digits >= 3 {
            self.digits.max(3)
        } else {
            self.digits
        };
        let unit = 10u32.pow(9 - u32::from(kept.min(9)));
        self.nanos - self.nanos % unit + (unit - 1)
    }
}

/// A record of the fields a segment recovered from its input.
#[derive(Debug, Default, Clone)]
pub(crate) struct ParsedFields {
    year: Option<i32>,
    year_of_era: Option<i32>,
    era: Option<Era>,
    week_based_year: Option<i32>,
    week: Option<u8>,
    month: Option<u8>,
    day: Option<u8>,
    day_of_year: Option<u16>,
    day_of_week: Option<u8>,
    hour_of_day: Option<u8>,
    clock_hour_of_day: Option<u8>,
    hour_of_am_pm: Option<u8>,
    am_pm: Option<AmPm>,
    minute: Option<u8>,
    second: Option<u8>,
    fraction: Option<Fraction>,
    pub(crate) offset: Option<UtcOffset>,
    pub(crate) zone: Option<TimeZone>,
}

/// Stores `value`, failing when the slot already holds a different one.
fn set<T: PartialEq>(slot: &mut Option<T>, value: T) -> FormatResult<()> {
    match slot {
        Some(existing) if *existing != value => {
            Err(FormatError::range().with_enum(ErrorMessage::FieldConflict))
        }
        _ => {
            *slot = Some(value);
            Ok(())
        }
    }
}

fn out_of_range(field: NumericField, value: i64) -> FormatError {
    FormatError::range().with_message(format!("{field:?} value {value} is out of range"))
}

impl ParsedFields {
    pub(crate) fn set_numeric(&mut self, field: NumericField, value: i64) -> FormatResult<()> {
        if !field.valid_range().contains(&value) {
            return Err(out_of_range(field, value));
        }
        // Every range above fits the narrowed types below.
        match field {
            NumericField::Year => set(&mut self.year, value as i32),
            NumericField::YearOfEra => set(&mut self.year_of_era, value as i32),
            NumericField::WeekBasedYear => set(&mut self.week_based_year, value as i32),
            NumericField::MonthOfYear => set(&mut self.month, value as u8),
            NumericField::DayOfMonth => set(&mut self.day, value as u8),
            NumericField::DayOfYear => set(&mut self.day_of_year, value as u16),
            NumericField::WeekOfWeekBasedYear => set(&mut self.week, value as u8),
            NumericField::DayOfWeek => set(&mut self.day_of_week, value as u8),
            NumericField::HourOfDay => set(&mut self.hour_of_day, value as u8),
            NumericField::ClockHourOfDay => set(&mut self.clock_hour_of_day, value as u8),
            NumericField::HourOfAmPm => set(&mut self.hour_of_am_pm, value as u8),
            NumericField::ClockHourOfAmPm => set(&mut self.hour_of_am_pm, (value % 12) as u8),
            NumericField::MinuteOfHour => set(&mut self.minute, value as u8),
            NumericField::SecondOfMinute => set(&mut self.second, value as u8),
            NumericField::NanoOfSecond => self.set_fraction(Fraction {
                nanos: value as u32,
                digits: 9,
                print_digits: 9,
            }),
        }
    }

    pub(crate) fn set_fraction(&mut self, fraction: Fraction) -> FormatResult<()> {
        match self.fraction {
            Some(existing) if existing.nanos != fraction.nanos => {
                Err(FormatError::range().with_enum(ErrorMessage::FieldConflict))
            }
            Some(existing) if existing.digits >= fraction.digits => Ok(()),
            _ => {
                self.fraction = Some(fraction);
                Ok(())
            }
        }
    }

    pub(crate) fn set_era(&mut self, era: Era) -> FormatResult<()> {
        set(&mut self.era, era)
    }

    pub(crate) fn set_am_pm(&mut self, am_pm: AmPm) -> FormatResult<()> {
        set(&mut self.am_pm, am_pm)
    }

    pub(crate) fn set_month(&mut self, month: u8) -> FormatResult<()> {
        set(&mut self.month, month)
    }

    pub(crate) fn set_day_of_week(&mut self, day_of_week: u8) -> FormatResult<()> {
        set(&mut self.day_of_week, day_of_week)
    }

    pub(crate) fn set_offset(&mut self, offset: UtcOffset) -> FormatResult<()> {
        set(&mut self.offset, offset)
    }

    pub(crate) fn set_zone(&mut self, zone: TimeZone) -> FormatResult<()> {
        set(&mut self.zone, zone)
    }
}

// ==== Resolution ====

impl ParsedFields {
    /// Resolves the parsed fields into an `Instant`.
    ///
    /// The offset comes from the parsed offset or zone when present,
    /// otherwise from `zone`, otherwise UTC. Only offsets recovered from the
    /// text are remembered on the returned instant.
    pub(crate) fn resolve(
        &self,
        defaulting: Defaulting,
        zone: Option<&TimeZone>,
    ) -> FormatResult<Instant> {
        let epoch_days = self.resolve_date(defaulting)?;
        let (seconds_of_day, nanos) = self.resolve_time(defaulting)?;
        let local_seconds = epoch_days * SECONDS_PER_DAY + seconds_of_day;

        let (offset, recovered) = match (self.offset, &self.zone, zone) {
            (Some(offset), _, _) => (offset, Some(offset)),
            (None, Some(parsed), _) => {
                let offset = parsed.offset_at_local_seconds(local_seconds)?;
                (offset, Some(offset))
            }
            (None, None, Some(zone)) => (zone.offset_at_local_seconds(local_seconds)?, None),
            (None, None, None) => (UtcOffset::UTC, None),
        };

        let epoch_seconds = local_seconds - i64::from(offset.seconds());
        Ok(Instant::new(epoch_seconds, nanos)?.with_offset(recovered))
    }

    fn resolve_year(&self) -> FormatResult<Option<i32>> {
        let from_era = self.year_of_era.map(|year_of_era| match self.era {
            Some(Era::BeforeCommon) => 1 - year_of_era,
            _ => year_of_era,
        });
        match (self.year, from_era) {
            (Some(year), Some(other)) if year != other => {
                Err(FormatError::range().with_enum(ErrorMessage::FieldConflict))
            }
            (Some(year), _) | (None, Some(year)) => Ok(Some(year)),
            (None, None) => Ok(None),
        }
    }

    fn uses_week_date(&self, year: Option<i32>) -> bool {
        let has_calendar_day =
            self.month.is_some() || self.day.is_some() || self.day_of_year.is_some();
        (self.week_based_year.is_some() && year.is_none())
            || (self.week.is_some() && !has_calendar_day)
    }

    fn resolve_date(&self, defaulting: Defaulting) -> FormatResult<i64> {
        let roundup = defaulting.is_roundup();
        let year = self.resolve_year()?;

        if self.uses_week_date(year) {
            let week_year = self.week_based_year.or(year).unwrap_or(DEFAULT_YEAR);
            let weeks = weeks_in_week_year(week_year);
            let week = self.week.unwrap_or(if roundup { weeks } else { 1 });
            if week > weeks {
                return Err(FormatError::range().with_enum(ErrorMessage::InvalidDate));
            }
            let weekday = self.day_of_week.unwrap_or(if roundup { 7 } else { 1 });
            return Ok(epoch_days_from_week_date(week_year, week, weekday));
        }

        let year = year.unwrap_or(DEFAULT_YEAR);
        let epoch_days = match (self.day_of_year, self.month, self.day) {
            (Some(ordinal), None, None) => {
                if ordinal > days_in_year(year) {
                    return Err(FormatError::range().with_enum(ErrorMessage::InvalidDate));
                }
                epoch_days_from_ymd(year, 1, 1) + i64::from(ordinal) - 1
            }
            (ordinal, month, day) => {
                let month = month.unwrap_or(if roundup { 12 } else { 1 });
                let month_length = days_in_month(year, month);
                let day = day.unwrap_or(if roundup { month_length } else { 1 });
                if day > month_length {
                    return Err(FormatError::range().with_enum(ErrorMessage::InvalidDate));
                }
                if ordinal.is_some_and(|ordinal| ordinal != day_of_year(year, month, day)) {
                    return Err(FormatError::range().with_enum(ErrorMessage::FieldConflict));
                }
                epoch_days_from_ymd(year, month, day)
            }
        };

        if self
            .day_of_week
            .is_some_and(|weekday| weekday != day_of_week(epoch_days))
        {
            return Err(FormatError::range().with_message("day of week contradicts the date"));
        }
        Ok(epoch_days)
    }

    fn resolve_time(&self, defaulting: Defaulting) -> FormatResult<(i64, u32)> {
        let roundup = defaulting.is_roundup();

        let explicit_hour = match (self.hour_of_day, self.clock_hour_of_day) {
            (Some(hour), Some(clock)) if hour != clock % 24 => {
                return Err(FormatError::range().with_enum(ErrorMessage::FieldConflict));
            }
            (Some(hour), _) => Some(hour),
            (None, Some(clock)) => Some(clock % 24),
            (None, None) => None,
        };

        let hour = match (explicit_hour, self.hour_of_am_pm, self.am_pm) {
            (Some(hour), _, Some(am_pm)) if (hour >= 12) != (am_pm == AmPm::Pm) => {
                return Err(FormatError::range().with_enum(ErrorMessage::FieldConflict));
            }
            (Some(hour), Some(of_am_pm), _) if hour % 12 != of_am_pm => {
                return Err(FormatError::range().with_enum(ErrorMessage::FieldConflict));
            }
            (Some(hour), _, _) => hour,
            (None, Some(of_am_pm), Some(AmPm::Pm)) => of_am_pm + 12,
            (None, Some(of_am_pm), _) => of_am_pm,
            (None, None, Some(AmPm::Am)) => {
                if roundup {
                    11
                } else {
                    0
                }
            }
            (None, None, Some(AmPm::Pm)) => {
                if roundup {
                    23
                } else {
                    12
                }
            }
            (None, None, None) => {
                if roundup {
                    23
                } else {
                    0
                }
            }
        };

        let last = |value: Option<u8>| value.unwrap_or(if roundup { 59 } else { 0 });
        let minute = last(self.minute);
        let second = last(self.second);

        let nanos = match (self.fraction, roundup) {
            (Some(fraction), true) => fraction.upper_bound(),
            (Some(fraction), false) => fraction.nanos,
            (None, true) => 999_999_999,
            (None, false) => 0,
        };

        let seconds_of_day =
            i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second);
        Ok((seconds_of_day, nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::{AmPm, Era, Fraction, ParsedFields};
    use crate::{
        items::NumericField,
        options::Defaulting,
        timezone::{TimeZone, UtcOffset},
    };

    fn fields(values: &[(NumericField, i64)]) -> ParsedFields {
        let mut fields = ParsedFields::default();
        for (field, value) in values {
            fields.set_numeric(*field, *value).unwrap();
        }
        fields
    }

    #[test]
    fn date_defaults() {
        let parsed = fields(&[
            (NumericField::Year, 2018),
            (NumericField::MonthOfYear, 10),
            (NumericField::DayOfMonth, 10),
        ]);
        let base = parsed.resolve(Defaulting::Minimum, None).unwrap();
        assert_eq!(base.to_epoch_millis(), 1_539_129_600_000);
        let roundup = parsed.resolve(Defaulting::Maximum, None).unwrap();
        assert_eq!(roundup.to_epoch_millis(), 1_539_215_999_999);
        assert_eq!(roundup.subsec_nanos(), 999_999_999);
    }

    #[test]
    fn missing_year_is_1970() {
        let parsed = fields(&[(NumericField::HourOfDay, 1)]);
        let instant = parsed.resolve(Defaulting::Minimum, None).unwrap();
        assert_eq!(instant.epoch_seconds(), 3600);

        let parsed = fields(&[(NumericField::MonthOfYear, 2)]);
        let instant = parsed.resolve(Defaulting::Maximum, None).unwrap();
        // 1970-02-28T23:59:59.999999999Z
        assert_eq!(instant.to_epoch_millis(), 5_097_599_999);
    }

    #[test]
    fn week_dates() {
        let parsed = fields(&[(NumericField::WeekBasedYear, 2015)]);
        let instant = parsed.resolve(Defaulting::Minimum, None).unwrap();
        // 2014-12-29
        assert_eq!(instant.epoch_seconds(), 1_419_811_200);

        let roundup = parsed.resolve(Defaulting::Maximum, None).unwrap();
        // 2016-01-03T23:59:59.999999999Z
        assert_eq!(roundup.to_epoch_millis(), 1_451_865_599_999);

        let parsed = fields(&[
            (NumericField::WeekBasedYear, 2015),
            (NumericField::WeekOfWeekBasedYear, 54),
        ]);
        assert!(parsed.resolve(Defaulting::Minimum, None).is_err());
    }

    #[test]
    fn invalid_dates_fail() {
        let parsed = fields(&[
            (NumericField::Year, 2019),
            (NumericField::MonthOfYear, 2),
            (NumericField::DayOfMonth, 29),
        ]);
        assert!(parsed.resolve(Defaulting::Minimum, None).is_err());

        let mut parsed = ParsedFields::default();
        assert!(parsed.set_numeric(NumericField::MonthOfYear, 13).is_err());
        assert!(parsed.set_numeric(NumericField::HourOfDay, 24).is_err());
        assert!(parsed.set_numeric(NumericField::ClockHourOfDay, 24).is_ok());
    }

    #[test]
    fn weekday_must_agree() {
        let mut parsed = fields(&[
            (NumericField::Year, 2018),
            (NumericField::MonthOfYear, 10),
            (NumericField::DayOfMonth, 10),
        ]);
        // 2018-10-10 is a Wednesday.
        parsed.set_day_of_week(3).unwrap();
        assert!(parsed.resolve(Defaulting::Minimum, None).is_ok());
        let mut parsed = ParsedFields {
            day_of_week: None,
            ..parsed
        };
        parsed.set_day_of_week(4).unwrap();
        assert!(parsed.resolve(Defaulting::Minimum, None).is_err());
    }

    #[test]
    fn twelve_hour_clock() {
        let mut parsed = fields(&[(NumericField::ClockHourOfAmPm, 12)]);
        parsed.set_am_pm(AmPm::Am).unwrap();
        assert_eq!(
            parsed.resolve(Defaulting::Minimum, None).unwrap().epoch_seconds(),
            0
        );
        let mut parsed = fields(&[(NumericField::ClockHourOfAmPm, 1)]);
        parsed.set_am_pm(AmPm::Pm).unwrap();
        assert_eq!(
            parsed.resolve(Defaulting::Minimum, None).unwrap().epoch_seconds(),
            13 * 3600
        );
    }

    #[test]
    fn era_years() {
        let mut parsed = fields(&[(NumericField::YearOfEra, 1)]);
        parsed.set_era(Era::BeforeCommon).unwrap();
        let instant = parsed.resolve(Defaulting::Minimum, None).unwrap();
        // 0000-01-01T00:00:00Z
        assert_eq!(instant.epoch_seconds(), -62_167_219_200);
    }

    fn roundup_nanos(nanos: u32, digits: u8, print_digits: u8) -> u32 {
        let mut parsed = fields(&[(NumericField::Year, 1970)]);
        parsed
            .set_fraction(Fraction {
                nanos,
                digits,
                print_digits,
            })
            .unwrap();
        parsed
            .resolve(Defaulting::Maximum, None)
            .unwrap()
            .subsec_nanos()
    }

    #[test]
    fn fraction_roundup() {
        assert_eq!(roundup_nanos(123_000_000, 3, 3), 123_999_999);
        // Millisecond digits the text left out are zero, not nine.
        assert_eq!(roundup_nanos(100_000_000, 1, 3), 100_999_999);
        assert_eq!(roundup_nanos(120_000_000, 2, 9), 120_999_999);
        assert_eq!(roundup_nanos(346_928_000, 6, 3), 346_928_999);
        assert_eq!(roundup_nanos(346_928_123, 9, 9), 346_928_123);
        // A fraction printed with fewer digits covers its whole step.
        assert_eq!(roundup_nanos(100_000_000, 1, 1), 199_999_999);
        assert_eq!(roundup_nanos(120_000_000, 2, 2), 129_999_999);
    }

    #[test]
    fn offset_precedence() {
        let parsed = fields(&[(NumericField::HourOfDay, 1)]);
        let zone = TimeZone::Fixed(UtcOffset::from_seconds(3600).unwrap());
        let instant = parsed.resolve(Defaulting::Minimum, Some(&zone)).unwrap();
        assert_eq!(instant.epoch_seconds(), 0);
        assert_eq!(instant.offset(), None);

        let mut parsed = parsed;
        parsed.set_offset(UtcOffset::from_seconds(-3600).unwrap()).unwrap();
        let instant = parsed.resolve(Defaulting::Minimum, Some(&zone)).unwrap();
        assert_eq!(instant.epoch_seconds(), 7200);
        assert_eq!(instant.offset().map(UtcOffset::seconds), Some(-3600));
    }

    #[test]
    fn year_range() {
        let parsed = fields(&[(NumericField::Year, 1_000_000_000)]);
        assert!(parsed.resolve(Defaulting::Maximum, None).is_ok());
        let parsed = fields(&[(NumericField::Year, -1_000_000_000)]);
        let minimum = parsed.resolve(Defaulting::Minimum, None).unwrap();
        assert_eq!(minimum, crate::Instant::MIN);
    }
}
