//! `Writeable` output of compiled pattern items.

use core::fmt;

use date_equations::{
    gregorian::{day_of_week, day_of_year, ymd_from_epoch_days},
    iso_week::week_date_from_epoch_days,
};
use writeable::{impl_display_with_writeable, Writeable};

use crate::{
    items::{FractionItem, Item, NumericField, NumericItem, OffsetItem, OffsetStyle, SignStyle,
        TextField, TextItem},
    timezone::{TimeZone, UtcOffset},
    Instant, Sign, SECONDS_PER_DAY,
};

/// The calendar fields of an instant observed at a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LocalFields {
    year: i32,
    month: u8,
    day: u8,
    day_of_year: u16,
    week_based_year: i32,
    week: u8,
    day_of_week: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanos: u32,
    offset: UtcOffset,
}

impl LocalFields {
    pub(crate) fn new(instant: &Instant, offset: UtcOffset) -> Self {
        let local_seconds = instant.epoch_seconds() + i64::from(offset.seconds());
        let epoch_days = local_seconds.div_euclid(SECONDS_PER_DAY);
        let seconds_of_day = local_seconds.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = ymd_from_epoch_days(epoch_days);
        let (week_based_year, week, _) = week_date_from_epoch_days(epoch_days);
        Self {
            year,
            month,
            day,
            day_of_year: day_of_year(year, month, day),
            week_based_year,
            week,
            day_of_week: day_of_week(epoch_days),
            hour: (seconds_of_day / 3600) as u8,
            minute: (seconds_of_day / 60 % 60) as u8,
            second: (seconds_of_day % 60) as u8,
            nanos: instant.subsec_nanos(),
            offset,
        }
    }

    fn numeric(&self, field: NumericField) -> i64 {
        match field {
            NumericField::Year => i64::from(self.year),
            NumericField::YearOfEra if self.year > 0 => i64::from(self.year),
            NumericField::YearOfEra => 1 - i64::from(self.year),
            NumericField::WeekBasedYear => i64::from(self.week_based_year),
            NumericField::MonthOfYear => i64::from(self.month),
            NumericField::DayOfMonth => i64::from(self.day),
            NumericField::DayOfYear => i64::from(self.day_of_year),
            NumericField::WeekOfWeekBasedYear => i64::from(self.week),
            NumericField::DayOfWeek => i64::from(self.day_of_week),
            NumericField::HourOfDay => i64::from(self.hour),
            NumericField::ClockHourOfDay if self.hour == 0 => 24,
            NumericField::ClockHourOfDay => i64::from(self.hour),
            NumericField::HourOfAmPm => i64::from(self.hour % 12),
            NumericField::ClockHourOfAmPm if self.hour % 12 == 0 => 12,
            NumericField::ClockHourOfAmPm => i64::from(self.hour % 12),
            NumericField::MinuteOfHour => i64::from(self.minute),
            NumericField::SecondOfMinute => i64::from(self.second),
            NumericField::NanoOfSecond => i64::from(self.nanos),
        }
    }

    fn text_index(&self, field: TextField) -> usize {
        match field {
            TextField::Era => usize::from(self.year > 0),
            TextField::MonthOfYear => usize::from(self.month - 1),
            TextField::DayOfWeek => usize::from(self.day_of_week - 1),
            TextField::AmPm => usize::from(self.hour >= 12),
        }
    }
}

/// Prints `fields` with a list of items.
#[derive(Debug)]
pub(crate) struct FormattableItems<'a> {
    pub(crate) items: &'a [Item],
    pub(crate) fields: &'a LocalFields,
    /// The zone named by zone identifier items, when it is not the bare
    /// offset of `fields`.
    pub(crate) zone: Option<&'a TimeZone>,
}

impl Writeable for FormattableItems<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        for item in self.items {
            match item {
                Item::Literal(text) | Item::LiteralIgnoreCase(text) => sink.write_str(text)?,
                Item::DecimalPoint => sink.write_char('.')?,
                Item::Numeric(numeric) => {
                    write_numeric(numeric, self.fields.numeric(numeric.field), sink)?;
                }
                Item::Fraction(fraction) => write_fraction(fraction, self.fields.nanos, sink)?,
                Item::Text(text) => write_text(text, self.fields, sink)?,
                Item::Offset(offset) => write_offset(offset, self.fields.offset, sink)?,
                Item::ZoneId => match self.zone {
                    Some(zone @ TimeZone::Named(_)) => sink.write_str(&zone.identifier())?,
                    _ => self.fields.offset.write_to(sink)?,
                },
                Item::Optional(section) => FormattableItems {
                    items: section,
                    ..*self
                }
                .write_to(sink)?,
            }
        }
        Ok(())
    }
}

impl_display_with_writeable!(FormattableItems<'_>);

fn write_numeric<W: fmt::Write + ?Sized>(
    item: &NumericItem,
    value: i64,
    sink: &mut W,
) -> fmt::Result {
    let value = if item.two_digit_base.is_some() {
        value.rem_euclid(100)
    } else {
        value
    };
    let magnitude = value.unsigned_abs();
    let length = magnitude.checked_ilog10().map_or(1, |log| log as usize + 1);
    let pad = usize::from(item.pad);

    if value < 0 {
        sink.write_char('-')?;
    } else if item.sign == SignStyle::ExceedsPad && length > pad {
        sink.write_char('+')?;
    }
    for _ in length..pad {
        sink.write_char('0')?;
    }
    magnitude.write_to(sink)
}

fn write_fraction<W: fmt::Write + ?Sized>(
    item: &FractionItem,
    nanos: u32,
    sink: &mut W,
) -> fmt::Result {
    let (digits, precision) = u32_to_digits(nanos);
    let precision = precision.clamp(usize::from(item.print_min), usize::from(item.print_max));
    write_digit_slice_to_precision(digits, 0, precision, sink)
}

fn write_text<W: fmt::Write + ?Sized>(
    item: &TextItem,
    fields: &LocalFields,
    sink: &mut W,
) -> fmt::Result {
    let names = item.field.names(item.style);
    match names.get(fields.text_index(item.field)) {
        Some(name) => sink.write_str(name),
        None => Err(fmt::Error),
    }
}

fn write_offset<W: fmt::Write + ?Sized>(
    item: &OffsetItem,
    offset: UtcOffset,
    sink: &mut W,
) -> fmt::Result {
    if offset == UtcOffset::UTC && item.print_z {
        return sink.write_char('Z');
    }
    sink.write_char(if offset.sign() == Sign::Negative { '-' } else { '+' })?;
    write_padded_u8(offset.hours(), sink)?;
    match item.style {
        OffsetStyle::HoursOptionalMinutes if offset.minutes() == 0 => Ok(()),
        OffsetStyle::HoursOptionalMinutes | OffsetStyle::HoursMinutes => {
            write_padded_u8(offset.minutes(), sink)
        }
        OffsetStyle::HoursColonMinutes => {
            sink.write_char(':')?;
            write_padded_u8(offset.minutes(), sink)
        }
    }
}

pub(crate) fn write_padded_u8<W: fmt::Write + ?Sized>(num: u8, sink: &mut W) -> fmt::Result {
    if num < 10 {
        sink.write_char('0')?;
    }
    num.write_to(sink)
}

/// Splits a nanosecond value into its nine digits and the count of
/// significant leading digits.
pub(crate) fn u32_to_digits(mut value: u32) -> ([u8; 9], usize) {
    let mut output = [0; 9];
    let mut precision = 0;
    let mut i = 9;
    while i != 0 {
        let v = (value % 10) as u8;
        value /= 10;
        if precision == 0 && v != 0 {
            precision = i;
        }
        output[i - 1] = v;
        i -= 1;
    }

    (output, precision)
}

pub(crate) fn write_digit_slice_to_precision<W: fmt::Write + ?Sized>(
    digits: [u8; 9],
    base: usize,
    precision: usize,
    sink: &mut W,
) -> fmt::Result {
    for digit in digits.iter().take(precision).skip(base) {
        digit.write_to(sink)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use writeable::assert_writeable_eq;

    use super::{u32_to_digits, FormattableItems, LocalFields};
    use crate::{
        items::{FormatBuilder, NumericField, OffsetItem, OffsetStyle, SignStyle, TextField,
            TextStyle},
        timezone::UtcOffset,
        Instant,
    };

    fn date_time() -> FormatBuilder {
        FormatBuilder::new()
            .signed_value(NumericField::Year, (4, 9), 4, SignStyle::ExceedsPad)
            .literal("-")
            .value(NumericField::MonthOfYear, 2, 2)
            .literal("-")
            .value(NumericField::DayOfMonth, 2, 2)
            .literal("T")
            .value(NumericField::HourOfDay, 2, 2)
            .literal(":")
            .value(NumericField::MinuteOfHour, 2, 2)
    }

    #[test]
    fn digits() {
        assert_eq!(u32_to_digits(120_000_000), ([1, 2, 0, 0, 0, 0, 0, 0, 0], 2));
        assert_eq!(u32_to_digits(0).1, 0);
        assert_eq!(u32_to_digits(1).1, 9);
    }

    #[test]
    fn offsets_and_fractions() {
        let items = date_time()
            .decimal_point()
            .fraction((3, 9), (3, 9))
            .offset(OffsetItem::lenient(OffsetStyle::HoursColonMinutes))
            .build();
        let instant = Instant::new(1_549_626_180, 120_000_000).unwrap();
        let fields = LocalFields::new(&instant, UtcOffset::UTC);
        let printer = FormattableItems {
            items: &items,
            fields: &fields,
            zone: None,
        };
        assert_writeable_eq!(printer, "2019-02-08T11:43.120Z");

        let offset = UtcOffset::from_seconds(-19_800).unwrap();
        let fields = LocalFields::new(&Instant::new(0, 123_456_789).unwrap(), offset);
        let printer = FormattableItems {
            items: &items,
            fields: &fields,
            zone: None,
        };
        assert_writeable_eq!(printer, "1969-12-31T18:30.123456789-05:30");
    }

    #[test]
    fn years_beyond_pad() {
        let items = date_time().build();
        let fields = LocalFields::new(&Instant::MAX, UtcOffset::UTC);
        let printer = FormattableItems {
            items: &items,
            fields: &fields,
            zone: None,
        };
        assert_writeable_eq!(printer, "+1000000000-12-31T23:59");

        let fields = LocalFields::new(&Instant::MIN, UtcOffset::UTC);
        let printer = FormattableItems {
            items: &items,
            fields: &fields,
            zone: None,
        };
        assert_writeable_eq!(printer, "-1000000000-01-01T00:00");
    }

    #[test]
    fn text_fields() {
        let items = FormatBuilder::new()
            .text(TextField::DayOfWeek, TextStyle::Short)
            .literal(", ")
            .value(NumericField::DayOfMonth, 1, 2)
            .literal(" ")
            .text(TextField::MonthOfYear, TextStyle::Full)
            .literal(" ")
            .value(NumericField::ClockHourOfAmPm, 1, 2)
            .literal(" ")
            .text(TextField::AmPm, TextStyle::Short)
            .build();
        // 2018-10-10T15:00:00Z, a Wednesday
        let fields = LocalFields::new(&Instant::new(1_539_183_600, 0).unwrap(), UtcOffset::UTC);
        let printer = FormattableItems {
            items: &items,
            fields: &fields,
            zone: None,
        };
        assert_writeable_eq!(printer, "Wed, 10 October 3 PM");
    }
}
