//! The compiled form of a pattern segment and the builder used to
//! assemble it.

use core::ops::RangeInclusive;

/// A numeric date-time field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumericField {
    Year,
    YearOfEra,
    WeekBasedYear,
    MonthOfYear,
    DayOfMonth,
    DayOfYear,
    WeekOfWeekBasedYear,
    DayOfWeek,
    HourOfDay,
    ClockHourOfDay,
    HourOfAmPm,
    ClockHourOfAmPm,
    MinuteOfHour,
    SecondOfMinute,
    NanoOfSecond,
}

impl NumericField {
    /// The values a parsed field may take. Years are bounded by the
    /// representable instant range instead.
    pub(crate) fn valid_range(self) -> RangeInclusive<i64> {
        match self {
            Self::Year | Self::WeekBasedYear => -1_000_000_000..=1_000_000_000,
            Self::YearOfEra => 1..=1_000_000_001,
            Self::MonthOfYear => 1..=12,
            Self::DayOfMonth => 1..=31,
            Self::DayOfYear => 1..=366,
            Self::WeekOfWeekBasedYear => 1..=53,
            Self::DayOfWeek => 1..=7,
            Self::HourOfDay => 0..=23,
            Self::ClockHourOfDay => 1..=24,
            Self::HourOfAmPm => 0..=11,
            Self::ClockHourOfAmPm => 1..=12,
            Self::MinuteOfHour | Self::SecondOfMinute => 0..=59,
            Self::NanoOfSecond => 0..=999_999_999,
        }
    }
}

/// How a numeric field treats its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignStyle {
    /// No sign is printed or accepted.
    Never,
    /// A sign is accepted; only negative values print one.
    Normal,
    /// A sign is accepted; `+` is printed once the value exceeds the pad
    /// width, `-` for negative values.
    ExceedsPad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NumericItem {
    pub(crate) field: NumericField,
    pub(crate) min_width: u8,
    pub(crate) max_width: u8,
    pub(crate) pad: u8,
    pub(crate) sign: SignStyle,
    /// Two-digit years are parsed relative to this base and printed
    /// modulo 100.
    pub(crate) two_digit_base: Option<i32>,
}

impl NumericItem {
    pub(crate) fn is_fixed_width(&self) -> bool {
        self.min_width == self.max_width && self.sign == SignStyle::Never
    }
}

/// Fraction of second digits, without the decimal separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FractionItem {
    pub(crate) parse_min: u8,
    pub(crate) parse_max: u8,
    pub(crate) print_min: u8,
    pub(crate) print_max: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextField {
    Era,
    MonthOfYear,
    DayOfWeek,
    AmPm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextStyle {
    Short,
    Full,
}

const MONTHS_FULL: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const WEEKDAYS_FULL: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
const WEEKDAYS_SHORT: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

impl TextField {
    /// English names, indexed from the field's first value. Eras are
    /// ordered BC, AD.
    pub(crate) fn names(self, style: TextStyle) -> &'static [&'static str] {
        match (self, style) {
            (Self::Era, TextStyle::Short) => &["BC", "AD"],
            (Self::Era, TextStyle::Full) => &["Before Christ", "Anno Domini"],
            (Self::MonthOfYear, TextStyle::Short) => &MONTHS_SHORT,
            (Self::MonthOfYear, TextStyle::Full) => &MONTHS_FULL,
            (Self::DayOfWeek, TextStyle::Short) => &WEEKDAYS_SHORT,
            (Self::DayOfWeek, TextStyle::Full) => &WEEKDAYS_FULL,
            (Self::AmPm, _) => &["AM", "PM"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextItem {
    pub(crate) field: TextField,
    pub(crate) style: TextStyle,
}

/// The printed shape of a numeric offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OffsetStyle {
    /// `+HH`, followed by `MM` when the minutes are not zero.
    HoursOptionalMinutes,
    /// `+HHMM`
    HoursMinutes,
    /// `+HH:MM`
    HoursColonMinutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OffsetParse {
    /// Only the printed shape is accepted.
    Strict,
    /// `±HH`, `±HHMM` and `±HH:MM` are all accepted.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OffsetItem {
    pub(crate) style: OffsetStyle,
    pub(crate) parse: OffsetParse,
    pub(crate) print_z: bool,
    pub(crate) accept_z: bool,
    pub(crate) accept_lowercase_z: bool,
    pub(crate) reject_negative_zero: bool,
}

impl OffsetItem {
    /// A leniently parsed offset printed as `style`, with `Z` at zero.
    pub(crate) const fn lenient(style: OffsetStyle) -> Self {
        Self {
            style,
            parse: OffsetParse::Lenient,
            print_z: true,
            accept_z: true,
            accept_lowercase_z: false,
            reject_negative_zero: false,
        }
    }

    pub(crate) const fn strict(style: OffsetStyle, print_z: bool) -> Self {
        Self {
            style,
            parse: OffsetParse::Strict,
            print_z,
            accept_z: print_z,
            accept_lowercase_z: false,
            reject_negative_zero: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Item {
    Literal(Box<str>),
    LiteralIgnoreCase(Box<str>),
    /// Parses `.` or `,`, prints `.`.
    DecimalPoint,
    Numeric(NumericItem),
    Fraction(FractionItem),
    Text(TextItem),
    Offset(OffsetItem),
    ZoneId,
    Optional(Vec<Item>),
}

/// Assembles a list of `Item`s.
///
/// ```rust,ignore
/// let items = FormatBuilder::new()
///     .value(NumericField::HourOfDay, 2, 2)
///     .literal(":")
///     .value(NumericField::MinuteOfHour, 2, 2)
///     .build();
/// ```
#[derive(Debug, Default)]
pub(crate) struct FormatBuilder {
    items: Vec<Item>,
}

impl FormatBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(mut self, item: Item) -> Self {
        if let (Item::Literal(next), Some(Item::Literal(last))) = (&item, self.items.last_mut()) {
            let mut joined = String::from(&**last);
            joined.push_str(next);
            *last = joined.into_boxed_str();
            return self;
        }
        self.items.push(item);
        self
    }

    pub(crate) fn literal(self, text: &str) -> Self {
        if text.is_empty() {
            return self;
        }
        self.push(Item::Literal(text.into()))
    }

    pub(crate) fn literal_ignore_case(self, text: &str) -> Self {
        self.push(Item::LiteralIgnoreCase(text.into()))
    }

    pub(crate) fn decimal_point(self) -> Self {
        self.push(Item::DecimalPoint)
    }

    /// An unsigned field parsed with `min..=max` digits and padded to `min`.
    pub(crate) fn value(self, field: NumericField, min: u8, max: u8) -> Self {
        self.push(Item::Numeric(NumericItem {
            field,
            min_width: min,
            max_width: max,
            pad: min,
            sign: SignStyle::Never,
            two_digit_base: None,
        }))
    }

    /// A field with an explicit sign style and pad width.
    pub(crate) fn signed_value(
        self,
        field: NumericField,
        (min, max): (u8, u8),
        pad: u8,
        sign: SignStyle,
    ) -> Self {
        self.push(Item::Numeric(NumericItem {
            field,
            min_width: min,
            max_width: max,
            pad,
            sign,
            two_digit_base: None,
        }))
    }

    pub(crate) fn two_digit_year(self, field: NumericField, base: i32) -> Self {
        self.push(Item::Numeric(NumericItem {
            field,
            min_width: 2,
            max_width: 2,
            pad: 2,
            sign: SignStyle::Never,
            two_digit_base: Some(base),
        }))
    }

    pub(crate) fn fraction(self, parse: (u8, u8), print: (u8, u8)) -> Self {
        self.push(Item::Fraction(FractionItem {
            parse_min: parse.0,
            parse_max: parse.1,
            print_min: print.0,
            print_max: print.1,
        }))
    }

    pub(crate) fn text(self, field: TextField, style: TextStyle) -> Self {
        self.push(Item::Text(TextItem { field, style }))
    }

    pub(crate) fn offset(self, offset: OffsetItem) -> Self {
        self.push(Item::Offset(offset))
    }

    pub(crate) fn zone_id(self) -> Self {
        self.push(Item::ZoneId)
    }

    pub(crate) fn optional(self, section: impl FnOnce(Self) -> Self) -> Self {
        let items = section(Self::new()).build();
        self.push(Item::Optional(items))
    }

    pub(crate) fn build(self) -> Vec<Item> {
        self.items
    }
}
