//! Compilation of custom pattern letters.
//!
//! A custom segment is a run of pattern letters, quoted literals and, in
//! the modern dialect, `[` `]` optional sections. Every run of the same
//! letter is one field; its length selects the width or text style.

use core::{iter::Peekable, mem, str::Chars};

use crate::{
    error::ErrorMessage,
    items::{
        FormatBuilder, Item, NumericField, OffsetItem, OffsetStyle, SignStyle, TextField,
        TextStyle,
    },
    options::Dialect,
    FormatError, FormatResult,
};

/// The most digits any numeric field reads.
const MAX_DIGITS: u8 = 9;

/// The century two-digit years fall into.
const TWO_DIGIT_YEAR_BASE: i32 = 2000;

fn unknown_letter(letter: char) -> FormatError {
    FormatError::syntax().with_message(format!("Unknown pattern letter: {letter}"))
}

fn too_many(letter: char) -> FormatError {
    FormatError::syntax().with_message(format!("Too many pattern letters: {letter}"))
}

/// Compiles one custom segment into items.
pub(crate) fn compile_custom(source: &str, dialect: Dialect) -> FormatResult<Vec<Item>> {
    let mut compiler = Compiler {
        dialect,
        current: FormatBuilder::new(),
        outer: Vec::new(),
    };
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                let text = quoted_literal(&mut chars)?;
                compiler.update(|builder| Ok(builder.literal(&text)))?;
            }
            '[' if dialect == Dialect::Modern => compiler.open_optional(),
            ']' if dialect == Dialect::Modern => compiler.close_optional()?,
            c if c.is_ascii_alphabetic() => {
                let mut count = 1;
                while chars.next_if_eq(&c).is_some() {
                    count += 1;
                }
                let count = u8::try_from(count).map_err(|_| too_many(c))?;
                compiler.update(|builder| match dialect {
                    Dialect::Modern => modern_field(builder, c, count),
                    Dialect::Legacy => legacy_field(builder, c, count),
                })?;
            }
            c => {
                let mut buffer = [0; 4];
                let text = c.encode_utf8(&mut buffer);
                compiler.update(|builder| Ok(builder.literal(text)))?;
            }
        }
    }

    if !compiler.outer.is_empty() {
        return Err(FormatError::syntax().with_enum(ErrorMessage::UnbalancedOptional));
    }
    let mut items = compiler.current.build();
    if dialect == Dialect::Legacy {
        fix_adjacent_widths(&mut items);
    }
    Ok(items)
}

struct Compiler {
    dialect: Dialect,
    current: FormatBuilder,
    /// The enclosing sections of an open optional section.
    outer: Vec<FormatBuilder>,
}

impl Compiler {
    fn update(
        &mut self,
        f: impl FnOnce(FormatBuilder) -> FormatResult<FormatBuilder>,
    ) -> FormatResult<()> {
        self.current = f(mem::take(&mut self.current))?;
        Ok(())
    }

    fn open_optional(&mut self) {
        debug_assert_eq!(self.dialect, Dialect::Modern);
        self.outer.push(mem::take(&mut self.current));
    }

    fn close_optional(&mut self) -> FormatResult<()> {
        let enclosing = self
            .outer
            .pop()
            .ok_or_else(|| FormatError::syntax().with_enum(ErrorMessage::UnbalancedOptional))?;
        let section = mem::replace(&mut self.current, enclosing).build();
        self.update(|builder| Ok(builder.push(Item::Optional(section))))
    }
}

/// Reads a quoted literal after its opening quote. `''` is a quote, both
/// alone and inside a quoted literal.
fn quoted_literal(chars: &mut Peekable<Chars<'_>>) -> FormatResult<String> {
    if chars.next_if_eq(&'\'').is_some() {
        return Ok("'".into());
    }
    let mut text = String::new();
    loop {
        match chars.next() {
            Some('\'') if chars.next_if_eq(&'\'').is_some() => text.push('\''),
            Some('\'') => return Ok(text),
            Some(c) => text.push(c),
            None => return Err(FormatError::syntax().with_enum(ErrorMessage::UnclosedQuote)),
        }
    }
}

/// One letter reads 1..=9 digits, two exactly two, n exactly n.
fn numeric(
    builder: FormatBuilder,
    letter: char,
    field: NumericField,
    count: u8,
    max_count: u8,
) -> FormatResult<FormatBuilder> {
    match count {
        _ if count > max_count => Err(too_many(letter)),
        1 => Ok(builder.value(field, 1, MAX_DIGITS)),
        _ => Ok(builder.value(field, count, count)),
    }
}

fn year(builder: FormatBuilder, letter: char, field: NumericField, count: u8) -> FormatResult<FormatBuilder> {
    match count {
        1 => Ok(builder.signed_value(field, (1, MAX_DIGITS), 1, SignStyle::Normal)),
        2 => Ok(builder.two_digit_year(field, TWO_DIGIT_YEAR_BASE)),
        3 => Ok(builder.signed_value(field, (3, MAX_DIGITS), 3, SignStyle::Normal)),
        _ if count <= MAX_DIGITS => {
            Ok(builder.signed_value(field, (count, MAX_DIGITS), count, SignStyle::ExceedsPad))
        }
        _ => Err(too_many(letter)),
    }
}

fn text(builder: FormatBuilder, field: TextField, count: u8) -> FormatBuilder {
    let style = if count >= 4 {
        TextStyle::Full
    } else {
        TextStyle::Short
    };
    builder.text(field, style)
}

fn fraction(builder: FormatBuilder, letter: char, count: u8, dialect: Dialect) -> FormatResult<FormatBuilder> {
    if count > MAX_DIGITS {
        return Err(too_many(letter));
    }
    let parse = match dialect {
        Dialect::Modern => (count, count),
        Dialect::Legacy => (1, MAX_DIGITS),
    };
    Ok(builder.fraction(parse, (count, count)))
}

fn day_of_year(builder: FormatBuilder, letter: char, count: u8) -> FormatResult<FormatBuilder> {
    match count {
        1..=3 => Ok(builder.signed_value(NumericField::DayOfYear, (count, 3), count, SignStyle::Never)),
        _ => Err(too_many(letter)),
    }
}

fn modern_field(builder: FormatBuilder, letter: char, count: u8) -> FormatResult<FormatBuilder> {
    use NumericField as F;

    match (letter, count) {
        ('u', _) => year(builder, letter, F::Year, count),
        ('y', _) => year(builder, letter, F::YearOfEra, count),
        ('Y', _) => year(builder, letter, F::WeekBasedYear, count),
        ('G', 1..=4) => Ok(text(builder, TextField::Era, count)),
        ('M' | 'L', 1 | 2) => numeric(builder, letter, F::MonthOfYear, count, 2),
        ('M' | 'L', 3 | 4) => Ok(text(builder, TextField::MonthOfYear, count)),
        ('d', _) => numeric(builder, letter, F::DayOfMonth, count, 2),
        ('D', _) => day_of_year(builder, letter, count),
        ('w', _) => numeric(builder, letter, F::WeekOfWeekBasedYear, count, 2),
        ('E', 1..=4) => Ok(text(builder, TextField::DayOfWeek, count)),
        ('e' | 'c', 1 | 2) => numeric(builder, letter, F::DayOfWeek, count, 2),
        ('e' | 'c', 3 | 4) => Ok(text(builder, TextField::DayOfWeek, count)),
        ('a', 1) => Ok(builder.text(TextField::AmPm, TextStyle::Short)),
        ('H', _) => numeric(builder, letter, F::HourOfDay, count, 2),
        ('k', _) => numeric(builder, letter, F::ClockHourOfDay, count, 2),
        ('K', _) => numeric(builder, letter, F::HourOfAmPm, count, 2),
        ('h', _) => numeric(builder, letter, F::ClockHourOfAmPm, count, 2),
        ('m', _) => numeric(builder, letter, F::MinuteOfHour, count, 2),
        ('s', _) => numeric(builder, letter, F::SecondOfMinute, count, 2),
        ('S', _) => fraction(builder, letter, count, Dialect::Modern),
        ('n', _) => numeric(builder, letter, F::NanoOfSecond, count, MAX_DIGITS),
        ('X', 1) => Ok(builder.offset(OffsetItem::strict(OffsetStyle::HoursOptionalMinutes, true))),
        ('X', 2 | 4) => Ok(builder.offset(OffsetItem::strict(OffsetStyle::HoursMinutes, true))),
        ('X', 3 | 5) => Ok(builder.offset(OffsetItem::strict(OffsetStyle::HoursColonMinutes, true))),
        ('x', 1) => Ok(builder.offset(OffsetItem::strict(OffsetStyle::HoursOptionalMinutes, false))),
        ('x', 2 | 4) => Ok(builder.offset(OffsetItem::strict(OffsetStyle::HoursMinutes, false))),
        ('x', 3 | 5) => Ok(builder.offset(OffsetItem::strict(OffsetStyle::HoursColonMinutes, false))),
        ('Z', 1..=3) => Ok(builder.offset(OffsetItem::strict(OffsetStyle::HoursMinutes, false))),
        ('Z', 5) => Ok(builder.offset(OffsetItem::strict(OffsetStyle::HoursColonMinutes, true))),
        ('V', 2) => Ok(builder.zone_id()),
        ('G' | 'M' | 'L' | 'E' | 'e' | 'c' | 'a' | 'X' | 'x' | 'Z' | 'V', _) => {
            Err(FormatError::syntax().with_message(format!(
                "Invalid pattern letter count: {count} x {letter}"
            )))
        }
        _ => Err(unknown_letter(letter)),
    }
}

/// Pads to the letter count, at most `MAX_DIGITS` letters.
fn legacy_numeric(
    builder: FormatBuilder,
    letter: char,
    field: NumericField,
    count: u8,
) -> FormatResult<FormatBuilder> {
    if count > MAX_DIGITS {
        return Err(too_many(letter));
    }
    Ok(builder.signed_value(field, (1, MAX_DIGITS), count, SignStyle::Never))
}

fn legacy_year(builder: FormatBuilder, letter: char, field: NumericField, count: u8) -> FormatResult<FormatBuilder> {
    match count {
        2 => Ok(builder.two_digit_year(field, TWO_DIGIT_YEAR_BASE)),
        _ if count <= MAX_DIGITS => {
            Ok(builder.signed_value(field, (1, MAX_DIGITS), count, SignStyle::Normal))
        }
        _ => Err(too_many(letter)),
    }
}

/// Accepts `Z` but always prints digits.
const fn legacy_offset(style: OffsetStyle) -> OffsetItem {
    OffsetItem {
        print_z: false,
        ..OffsetItem::lenient(style)
    }
}

fn legacy_field(builder: FormatBuilder, letter: char, count: u8) -> FormatResult<FormatBuilder> {
    use NumericField as F;

    match letter {
        'y' => legacy_year(builder, letter, F::Year, count),
        'Y' => legacy_year(builder, letter, F::YearOfEra, count),
        'x' => legacy_year(builder, letter, F::WeekBasedYear, count),
        'w' => legacy_numeric(builder, letter, F::WeekOfWeekBasedYear, count),
        'e' => legacy_numeric(builder, letter, F::DayOfWeek, count),
        'M' if count >= 3 => Ok(text(builder, TextField::MonthOfYear, count)),
        'M' => legacy_numeric(builder, letter, F::MonthOfYear, count),
        'd' => legacy_numeric(builder, letter, F::DayOfMonth, count),
        'D' => legacy_numeric(builder, letter, F::DayOfYear, count),
        'E' => Ok(text(builder, TextField::DayOfWeek, count)),
        'G' => Ok(text(builder, TextField::Era, count)),
        'a' => Ok(builder.text(TextField::AmPm, TextStyle::Short)),
        'H' => legacy_numeric(builder, letter, F::HourOfDay, count),
        'k' => legacy_numeric(builder, letter, F::ClockHourOfDay, count),
        'K' => legacy_numeric(builder, letter, F::HourOfAmPm, count),
        'h' => legacy_numeric(builder, letter, F::ClockHourOfAmPm, count),
        'm' => legacy_numeric(builder, letter, F::MinuteOfHour, count),
        's' => legacy_numeric(builder, letter, F::SecondOfMinute, count),
        'S' => fraction(builder, letter, count, Dialect::Legacy),
        'Z' => Ok(match count {
            1 => builder.offset(legacy_offset(OffsetStyle::HoursMinutes)),
            2 => builder.offset(legacy_offset(OffsetStyle::HoursColonMinutes)),
            _ => builder.zone_id(),
        }),
        _ => Err(unknown_letter(letter)),
    }
}

/// A legacy numeric field directly followed by another numeric field reads
/// exactly as many digits as it has letters.
fn fix_adjacent_widths(items: &mut [Item]) {
    for index in 0..items.len() {
        let followed_by_digits = matches!(
            items.get(index + 1),
            Some(Item::Numeric(_) | Item::Fraction(_))
        );
        if let Some(Item::Numeric(numeric)) = items.get_mut(index) {
            if followed_by_digits && numeric.two_digit_base.is_none() {
                numeric.min_width = numeric.pad;
                numeric.max_width = numeric.pad;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::compile_custom;
    use crate::{
        items::{FormatBuilder, Item, NumericField, OffsetItem, OffsetStyle, SignStyle, TextField, TextStyle},
        options::Dialect,
    };

    fn modern(source: &str) -> Vec<Item> {
        compile_custom(source, Dialect::Modern).unwrap()
    }

    fn legacy(source: &str) -> Vec<Item> {
        compile_custom(source, Dialect::Legacy).unwrap()
    }

    #[test]
    fn modern_date() {
        let expected = FormatBuilder::new()
            .signed_value(NumericField::Year, (4, 9), 4, SignStyle::ExceedsPad)
            .literal("-")
            .value(NumericField::MonthOfYear, 2, 2)
            .literal("-")
            .value(NumericField::DayOfMonth, 2, 2)
            .literal("T")
            .value(NumericField::HourOfDay, 2, 2)
            .build();
        assert_eq!(modern("uuuu-MM-dd'T'HH"), expected);
    }

    #[test]
    fn quotes() {
        assert_eq!(
            modern("'o''clock' h"),
            FormatBuilder::new()
                .literal("o'clock ")
                .value(NumericField::ClockHourOfAmPm, 1, 9)
                .build()
        );
        assert_eq!(modern("''"), vec![Item::Literal("'".into())]);
        assert!(compile_custom("yyyy'T", Dialect::Modern).is_err());
    }

    #[test]
    fn optional_sections() {
        let expected = FormatBuilder::new()
            .value(NumericField::HourOfDay, 2, 2)
            .optional(|b| {
                b.literal(":")
                    .value(NumericField::MinuteOfHour, 2, 2)
                    .optional(|b| b.literal(":").value(NumericField::SecondOfMinute, 2, 2))
            })
            .build();
        assert_eq!(modern("HH[:mm[:ss]]"), expected);
        assert!(compile_custom("HH[:mm", Dialect::Modern).is_err());
        assert!(compile_custom("HH]", Dialect::Modern).is_err());
        // Brackets are plain text in the legacy table.
        assert_eq!(legacy("[HH]")[0], Item::Literal("[".into()));
    }

    #[test]
    fn modern_letters() {
        assert_eq!(
            modern("yy"),
            FormatBuilder::new()
                .two_digit_year(NumericField::YearOfEra, 2000)
                .build()
        );
        assert_eq!(
            modern("MMMM"),
            FormatBuilder::new()
                .text(TextField::MonthOfYear, TextStyle::Full)
                .build()
        );
        assert_eq!(
            modern("XXX"),
            FormatBuilder::new()
                .offset(OffsetItem::strict(OffsetStyle::HoursColonMinutes, true))
                .build()
        );
        assert_eq!(
            modern("SSS"),
            FormatBuilder::new().fraction((3, 3), (3, 3)).build()
        );
        assert_eq!(modern("VV"), vec![Item::ZoneId]);
    }

    #[test]
    fn invalid_letters() {
        for source in ["q", "uuuuuuuuuu", "ddd", "MMMMM", "aa", "ZZZZ", "V", "SSSSSSSSSS", "EEEEE"] {
            let err = compile_custom(source, Dialect::Modern).unwrap_err();
            assert!(!err.message().is_empty(), "{source}");
        }
        assert_eq!(
            compile_custom("qqqq", Dialect::Modern).unwrap_err().message(),
            "Unknown pattern letter: q"
        );
        assert!(compile_custom("u", Dialect::Legacy).is_err());
        assert_eq!(
            compile_custom("ddddddddddddddddddddMM", Dialect::Legacy)
                .unwrap_err()
                .message(),
            "Too many pattern letters: d"
        );
        assert!(compile_custom("ddddddddd", Dialect::Legacy).is_ok());
        assert!(compile_custom("HHHHHHHHHHmm", Dialect::Legacy).is_err());
    }

    #[test]
    fn legacy_adjacent_widths() {
        let items = legacy("yyyyMMdd");
        let widths: Vec<_> = items
            .iter()
            .filter_map(|item| match item {
                Item::Numeric(numeric) => Some((numeric.min_width, numeric.max_width)),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![(4, 4), (2, 2), (1, 9)]);

        let items = legacy("yyyy-MM-dd");
        let Item::Numeric(year) = &items[0] else {
            panic!("year expected");
        };
        assert_eq!((year.min_width, year.max_width, year.pad), (1, 9, 4));
    }

    #[test]
    fn legacy_letters() {
        assert_eq!(
            legacy("xxxx-ww-e"),
            FormatBuilder::new()
                .signed_value(NumericField::WeekBasedYear, (1, 9), 4, SignStyle::Normal)
                .literal("-")
                .signed_value(NumericField::WeekOfWeekBasedYear, (1, 9), 2, SignStyle::Never)
                .literal("-")
                .value(NumericField::DayOfWeek, 1, 9)
                .build()
        );
        assert_eq!(legacy("ZZZ"), vec![Item::ZoneId]);
        assert_eq!(
            legacy("SSS"),
            FormatBuilder::new().fraction((1, 9), (3, 3)).build()
        );
    }
}
