//! Definitions of the named formats.
//!
//! Most named formats are a date part and a time part joined by `T`. The
//! `strict_` variants fix every field width; the others accept shorter
//! fields and signed years of up to nine digits.

use crate::{
    epoch::EpochUnit,
    items::{FormatBuilder, Item, NumericField, OffsetItem, OffsetParse, OffsetStyle, SignStyle},
    pattern::SegmentFormat,
    registry::FormatName,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strictness {
    Strict,
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatePart {
    None,
    Year,
    YearMonth,
    Calendar,
    Ordinal,
    Weekyear,
    WeekyearWeek,
    WeekDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimePart {
    Hour,
    HourMinute,
    HourMinuteSecond,
    /// Seconds with a fraction of up to nine digits.
    Fraction,
    /// Seconds with a fraction of up to three digits.
    Millis,
    /// Seconds, an optional-width fraction and an offset.
    Zoned { millis: bool },
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    date: DatePart,
    time: Option<TimePart>,
    /// Prefix the time with `T` even without a date.
    t_prefix: bool,
    /// No separators, fixed widths, `+HHMM` offsets.
    basic: bool,
}

impl Layout {
    const fn date(date: DatePart) -> Self {
        Self {
            date,
            time: None,
            t_prefix: false,
            basic: false,
        }
    }

    const fn date_time(date: DatePart, time: TimePart) -> Self {
        Self {
            date,
            time: Some(time),
            t_prefix: false,
            basic: false,
        }
    }

    const fn time(time: TimePart) -> Self {
        Self::date_time(DatePart::None, time)
    }

    const fn t_time(time: TimePart) -> Self {
        Self {
            t_prefix: true,
            ..Self::time(time)
        }
    }

    const fn basic(self) -> Self {
        Self {
            basic: true,
            ..self
        }
    }

    fn build(self, strictness: Strictness) -> FormatBuilder {
        let strictness = if self.basic {
            Strictness::Strict
        } else {
            strictness
        };
        let separator = if self.basic { "" } else { "-" };
        let builder = FormatBuilder::new();
        let builder = match self.date {
            DatePart::None => builder,
            DatePart::Year => year(builder, NumericField::Year, strictness),
            DatePart::YearMonth => field(
                year(builder, NumericField::Year, strictness).literal(separator),
                NumericField::MonthOfYear,
                strictness,
                2,
            ),
            DatePart::Calendar => calendar_date(builder, strictness, separator),
            DatePart::Ordinal => field(
                year(builder, NumericField::Year, strictness).literal(separator),
                NumericField::DayOfYear,
                strictness,
                3,
            ),
            DatePart::Weekyear => year(builder, NumericField::WeekBasedYear, strictness),
            DatePart::WeekyearWeek => week(builder, strictness, separator),
            DatePart::WeekDate => field(
                week(builder, strictness, separator).literal(separator),
                NumericField::DayOfWeek,
                strictness,
                1,
            ),
        };

        let Some(time) = self.time else {
            return builder;
        };
        let builder = if self.date != DatePart::None || self.t_prefix {
            builder.literal("T")
        } else {
            builder
        };
        time_of_day(builder, time, strictness, self.basic)
    }
}

fn field(builder: FormatBuilder, field: NumericField, strictness: Strictness, width: u8) -> FormatBuilder {
    match strictness {
        Strictness::Strict => builder.value(field, width, width),
        Strictness::Lenient => builder.signed_value(field, (1, width), width, SignStyle::Never),
    }
}

fn year(builder: FormatBuilder, field: NumericField, strictness: Strictness) -> FormatBuilder {
    match strictness {
        Strictness::Strict => builder.value(field, 4, 4),
        Strictness::Lenient => builder.signed_value(field, (1, 9), 4, SignStyle::Normal),
    }
}

fn calendar_date(builder: FormatBuilder, strictness: Strictness, separator: &str) -> FormatBuilder {
    let builder = year(builder, NumericField::Year, strictness).literal(separator);
    let builder = field(builder, NumericField::MonthOfYear, strictness, 2).literal(separator);
    field(builder, NumericField::DayOfMonth, strictness, 2)
}

fn week(builder: FormatBuilder, strictness: Strictness, separator: &str) -> FormatBuilder {
    let builder = year(builder, NumericField::WeekBasedYear, strictness)
        .literal(separator)
        .literal("W");
    field(builder, NumericField::WeekOfWeekBasedYear, strictness, 2)
}

fn fraction_digits(time: TimePart, strictness: Strictness) -> (u8, u8) {
    match (time, strictness) {
        (TimePart::Millis, Strictness::Strict) => (3, 3),
        (TimePart::Millis, Strictness::Lenient) => (1, 3),
        (_, Strictness::Strict) => (3, 9),
        (_, Strictness::Lenient) => (1, 9),
    }
}

fn time_of_day(
    builder: FormatBuilder,
    time: TimePart,
    strictness: Strictness,
    basic: bool,
) -> FormatBuilder {
    let separator = if basic { "" } else { ":" };
    let builder = field(builder, NumericField::HourOfDay, strictness, 2);
    if time == TimePart::Hour {
        return builder;
    }
    let builder = field(builder.literal(separator), NumericField::MinuteOfHour, strictness, 2);
    if time == TimePart::HourMinute {
        return builder;
    }
    let builder = field(builder.literal(separator), NumericField::SecondOfMinute, strictness, 2);
    let builder = match time {
        TimePart::Fraction | TimePart::Millis | TimePart::Zoned { millis: true } => builder
            .literal(".")
            .fraction(fraction_digits(time, strictness), (3, 3)),
        _ => builder,
    };
    match time {
        TimePart::Zoned { .. } => builder.offset(OffsetItem::lenient(if basic {
            OffsetStyle::HoursMinutes
        } else {
            OffsetStyle::HoursColonMinutes
        })),
        _ => builder,
    }
}

/// `year[-MM[-dd[THH[:mm[:ss[.fraction]]][offset]]]]`, printed in full.
fn optional_time(strictness: Strictness, print_fraction: (u8, u8)) -> SegmentFormat {
    let (parser, printer) = optional_time_items(strictness, print_fraction);
    SegmentFormat::Items {
        printer,
        parsers: vec![parser],
    }
}

/// The parser and printer of an optional time format.
fn optional_time_items(strictness: Strictness, print_fraction: (u8, u8)) -> (Vec<Item>, Vec<Item>) {
    let s = strictness;
    let offset = OffsetItem::lenient(OffsetStyle::HoursColonMinutes);
    let parser = year(FormatBuilder::new(), NumericField::Year, s)
        .optional(|b| {
            field(b.literal("-"), NumericField::MonthOfYear, s, 2).optional(|b| {
                field(b.literal("-"), NumericField::DayOfMonth, s, 2).optional(|b| {
                    field(b.literal("T"), NumericField::HourOfDay, s, 2)
                        .optional(|b| {
                            field(b.literal(":"), NumericField::MinuteOfHour, s, 2).optional(|b| {
                                field(b.literal(":"), NumericField::SecondOfMinute, s, 2)
                                    .optional(|b| b.decimal_point().fraction((1, 9), print_fraction))
                            })
                        })
                        .optional(|b| b.offset(offset))
                })
            })
        })
        .build();

    let printer = calendar_date(FormatBuilder::new(), s, "-")
        .literal("T");
    let printer = time_of_day(printer, TimePart::HourMinuteSecond, s, false)
        .literal(".")
        .fraction(print_fraction, print_fraction)
        .offset(offset)
        .build();

    (parser, printer)
}

/// A full date alone, or a date-time whose offset is `Z`, `z` or
/// `±HH:MM`.
fn rfc3339_lenient() -> SegmentFormat {
    let s = Strictness::Strict;
    let date_only = year(FormatBuilder::new(), NumericField::Year, s)
        .optional(|b| {
            field(b.literal("-"), NumericField::MonthOfYear, s, 2)
                .optional(|b| field(b.literal("-"), NumericField::DayOfMonth, s, 2))
        })
        .build();

    let offset = OffsetItem {
        style: OffsetStyle::HoursColonMinutes,
        parse: OffsetParse::Strict,
        print_z: true,
        accept_z: true,
        accept_lowercase_z: true,
        reject_negative_zero: true,
    };
    let date_time = calendar_date(FormatBuilder::new(), s, "-").literal_ignore_case("T");
    let date_time = field(date_time, NumericField::HourOfDay, s, 2).literal(":");
    let date_time = field(date_time, NumericField::MinuteOfHour, s, 2)
        .optional(|b| {
            field(b.literal(":"), NumericField::SecondOfMinute, s, 2)
                .optional(|b| b.decimal_point().fraction((1, 9), (3, 3)))
        })
        .offset(offset)
        .build();

    let (_, printer) = optional_time_items(s, (3, 3));
    SegmentFormat::Items {
        printer,
        parsers: vec![date_only, date_time],
    }
}

fn layout(name: FormatName) -> Layout {
    use FormatName as N;
    use TimePart as T;

    match name {
        N::BasicDate => Layout::date(DatePart::Calendar).basic(),
        N::BasicDateTime => Layout::date_time(DatePart::Calendar, T::Zoned { millis: true }).basic(),
        N::BasicDateTimeNoMillis => {
            Layout::date_time(DatePart::Calendar, T::Zoned { millis: false }).basic()
        }
        N::BasicOrdinalDate => Layout::date(DatePart::Ordinal).basic(),
        N::BasicOrdinalDateTime => {
            Layout::date_time(DatePart::Ordinal, T::Zoned { millis: true }).basic()
        }
        N::BasicOrdinalDateTimeNoMillis => {
            Layout::date_time(DatePart::Ordinal, T::Zoned { millis: false }).basic()
        }
        N::BasicTime => Layout::time(T::Zoned { millis: true }).basic(),
        N::BasicTimeNoMillis => Layout::time(T::Zoned { millis: false }).basic(),
        N::BasicTTime => Layout::t_time(T::Zoned { millis: true }).basic(),
        N::BasicTTimeNoMillis => Layout::t_time(T::Zoned { millis: false }).basic(),
        N::BasicWeekDate | N::StrictBasicWeekDate => Layout::date(DatePart::WeekDate).basic(),
        N::BasicWeekDateTime | N::StrictBasicWeekDateTime => {
            Layout::date_time(DatePart::WeekDate, T::Zoned { millis: true }).basic()
        }
        N::BasicWeekDateTimeNoMillis | N::StrictBasicWeekDateTimeNoMillis => {
            Layout::date_time(DatePart::WeekDate, T::Zoned { millis: false }).basic()
        }
        N::Date | N::StrictDate | N::YearMonthDay | N::StrictYearMonthDay => {
            Layout::date(DatePart::Calendar)
        }
        N::DateHour | N::StrictDateHour => Layout::date_time(DatePart::Calendar, T::Hour),
        N::DateHourMinute | N::StrictDateHourMinute => {
            Layout::date_time(DatePart::Calendar, T::HourMinute)
        }
        N::DateHourMinuteSecond | N::StrictDateHourMinuteSecond => {
            Layout::date_time(DatePart::Calendar, T::HourMinuteSecond)
        }
        N::DateHourMinuteSecondFraction | N::StrictDateHourMinuteSecondFraction => {
            Layout::date_time(DatePart::Calendar, T::Fraction)
        }
        N::DateHourMinuteSecondMillis | N::StrictDateHourMinuteSecondMillis => {
            Layout::date_time(DatePart::Calendar, T::Millis)
        }
        N::DateTime | N::StrictDateTime => {
            Layout::date_time(DatePart::Calendar, T::Zoned { millis: true })
        }
        N::DateTimeNoMillis | N::StrictDateTimeNoMillis => {
            Layout::date_time(DatePart::Calendar, T::Zoned { millis: false })
        }
        N::Hour | N::StrictHour => Layout::time(T::Hour),
        N::HourMinute | N::StrictHourMinute => Layout::time(T::HourMinute),
        N::HourMinuteSecond | N::StrictHourMinuteSecond => Layout::time(T::HourMinuteSecond),
        N::HourMinuteSecondFraction | N::StrictHourMinuteSecondFraction => {
            Layout::time(T::Fraction)
        }
        N::HourMinuteSecondMillis | N::StrictHourMinuteSecondMillis => Layout::time(T::Millis),
        N::OrdinalDate | N::StrictOrdinalDate => Layout::date(DatePart::Ordinal),
        N::OrdinalDateTime | N::StrictOrdinalDateTime => {
            Layout::date_time(DatePart::Ordinal, T::Zoned { millis: true })
        }
        N::OrdinalDateTimeNoMillis | N::StrictOrdinalDateTimeNoMillis => {
            Layout::date_time(DatePart::Ordinal, T::Zoned { millis: false })
        }
        N::Time | N::StrictTime => Layout::time(T::Zoned { millis: true }),
        N::TimeNoMillis | N::StrictTimeNoMillis => Layout::time(T::Zoned { millis: false }),
        N::TTime | N::StrictTTime => Layout::t_time(T::Zoned { millis: true }),
        N::TTimeNoMillis | N::StrictTTimeNoMillis => Layout::t_time(T::Zoned { millis: false }),
        N::WeekDate | N::StrictWeekDate => Layout::date(DatePart::WeekDate),
        N::WeekDateTime | N::StrictWeekDateTime => {
            Layout::date_time(DatePart::WeekDate, T::Zoned { millis: true })
        }
        N::WeekDateTimeNoMillis | N::StrictWeekDateTimeNoMillis => {
            Layout::date_time(DatePart::WeekDate, T::Zoned { millis: false })
        }
        N::Weekyear | N::StrictWeekyear | N::WeekYear => Layout::date(DatePart::Weekyear),
        N::WeekyearWeek | N::StrictWeekyearWeek => Layout::date(DatePart::WeekyearWeek),
        N::WeekyearWeekDay | N::StrictWeekyearWeekDay => Layout::date(DatePart::WeekDate),
        N::Year | N::StrictYear => Layout::date(DatePart::Year),
        N::YearMonth | N::StrictYearMonth => Layout::date(DatePart::YearMonth),
        // Handled by `definition`.
        N::Iso8601
        | N::Rfc3339Lenient
        | N::EpochSecond
        | N::EpochMillis
        | N::DateOptionalTime
        | N::StrictDateOptionalTime
        | N::StrictDateOptionalTimeNanos => Layout::date(DatePart::None),
    }
}

/// Returns the compiled definition of a named format.
pub(crate) fn definition(name: FormatName) -> SegmentFormat {
    let strictness = if name.is_strict() {
        Strictness::Strict
    } else {
        Strictness::Lenient
    };
    match name {
        FormatName::EpochSecond => SegmentFormat::Epoch(EpochUnit::Seconds),
        FormatName::EpochMillis => SegmentFormat::Epoch(EpochUnit::Millis),
        FormatName::Rfc3339Lenient => rfc3339_lenient(),
        FormatName::Iso8601 | FormatName::StrictDateOptionalTime => {
            optional_time(Strictness::Strict, (3, 3))
        }
        FormatName::DateOptionalTime => optional_time(Strictness::Lenient, (3, 3)),
        FormatName::StrictDateOptionalTimeNanos => optional_time(Strictness::Strict, (3, 9)),
        name => SegmentFormat::from_items(layout(name).build(strictness).build()),
    }
}
