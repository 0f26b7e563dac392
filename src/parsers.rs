//! Parsing of text against compiled pattern items.
//!
//! Every parser takes the remaining input as a byte slice and returns the
//! value it recognized together with the unconsumed rest.

use crate::{
    error::ErrorMessage,
    fields::{AmPm, Era, Fraction, ParsedFields},
    items::{
        FractionItem, Item, NumericItem, OffsetItem, OffsetParse, OffsetStyle, SignStyle,
        TextField, TextItem, TextStyle,
    },
    timezone::{TimeZone, UtcOffset},
    FormatError, FormatResult, Sign,
};

/// Parses all of `input` against `items`.
///
/// `zone` is the formatter zone; its provider resolves zone identifiers
/// found in the text.
pub(crate) fn parse_items(
    items: &[Item],
    input: &str,
    zone: Option<&TimeZone>,
) -> FormatResult<ParsedFields> {
    let mut fields = ParsedFields::default();
    let rest = parse_sequence(items, input.as_bytes(), &mut fields, zone)?;
    if !rest.is_empty() {
        return Err(FormatError::syntax().with_enum(ErrorMessage::TrailingText));
    }
    Ok(fields)
}

fn parse_sequence<'i>(
    items: &[Item],
    mut input: &'i [u8],
    fields: &mut ParsedFields,
    zone: Option<&TimeZone>,
) -> FormatResult<&'i [u8]> {
    for (index, item) in items.iter().enumerate() {
        input = match item {
            Item::Literal(text) => parse_literal(text.as_bytes(), input, false)?,
            Item::LiteralIgnoreCase(text) => parse_literal(text.as_bytes(), input, true)?,
            Item::DecimalPoint => match input {
                [b'.' | b',', rest @ ..] => rest,
                _ => {
                    return Err(FormatError::syntax().with_message("expected a decimal separator"))
                }
            },
            Item::Numeric(numeric) => {
                let reserved = reserved_digits(&items[index + 1..]);
                let (value, rest) = parse_numeric(numeric, input, reserved)?;
                fields.set_numeric(numeric.field, value)?;
                rest
            }
            Item::Fraction(fraction) => {
                let (value, rest) = parse_fraction(fraction, input)?;
                fields.set_fraction(value)?;
                rest
            }
            Item::Text(text) => parse_text(text, input, fields)?,
            Item::Offset(offset) => {
                let (value, rest) = parse_offset(offset, input)?;
                fields.set_offset(value)?;
                rest
            }
            Item::ZoneId => {
                let (value, rest) = parse_zone_id(input, zone)?;
                fields.set_zone(value)?;
                rest
            }
            Item::Optional(section) => {
                let mut trial = fields.clone();
                match parse_sequence(section, input, &mut trial, zone) {
                    Ok(rest) => {
                        *fields = trial;
                        rest
                    }
                    Err(_) => input,
                }
            }
        };
    }
    Ok(input)
}

/// The digits to leave for the fixed width numeric fields that directly
/// follow a variable width one, as in `uuuuMMdd`.
fn reserved_digits(following: &[Item]) -> usize {
    following
        .iter()
        .map_while(|item| match item {
            Item::Numeric(numeric) if numeric.is_fixed_width() => {
                Some(usize::from(numeric.max_width))
            }
            _ => None,
        })
        .sum()
}

fn parse_literal<'i>(expected: &[u8], input: &'i [u8], ignore_case: bool) -> FormatResult<&'i [u8]> {
    let matched = input.get(..expected.len()).is_some_and(|prefix| {
        if ignore_case {
            prefix.eq_ignore_ascii_case(expected)
        } else {
            prefix == expected
        }
    });
    if !matched {
        return Err(FormatError::syntax().with_message(format!(
            "expected literal [{}]",
            String::from_utf8_lossy(expected)
        )));
    }
    Ok(&input[expected.len()..])
}

/// Returns the number of leading ASCII digits.
fn digit_count(input: &[u8]) -> usize {
    input.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn digits_to_value(digits: &[u8]) -> FormatResult<i64> {
    digits
        .iter()
        .try_fold(0i64, |acc, digit| {
            acc.checked_mul(10)?.checked_add(i64::from(digit - b'0'))
        })
        .ok_or_else(|| FormatError::range().with_message("numeric value is too large"))
}

/// Parses exactly two ASCII digits.
pub(crate) fn parse_two_digits(input: &[u8]) -> Option<(u8, &[u8])> {
    match input {
        [tens @ b'0'..=b'9', ones @ b'0'..=b'9', rest @ ..] => {
            Some(((tens - b'0') * 10 + (ones - b'0'), rest))
        }
        _ => None,
    }
}

pub(crate) fn parse_numeric<'i>(
    item: &NumericItem,
    input: &'i [u8],
    reserved: usize,
) -> FormatResult<(i64, &'i [u8])> {
    let (sign, body) = match (item.sign, input) {
        (SignStyle::Never, _) => (Sign::Positive, input),
        (_, [b'-', rest @ ..]) => (Sign::Negative, rest),
        (_, [b'+', rest @ ..]) => (Sign::Positive, rest),
        _ => (Sign::Positive, input),
    };

    let available = digit_count(body);
    let width = usize::from(item.max_width).min(available.saturating_sub(reserved));
    if width < usize::from(item.min_width) || width == 0 {
        return Err(FormatError::syntax().with_enum(ErrorMessage::DigitsExpected));
    }

    let (digits, rest) = body.split_at(width);
    let mut value = digits_to_value(digits)?;
    if let Some(base) = item.two_digit_base {
        value += i64::from(base);
    }
    Ok((value * i64::from(sign.as_sign_multiplier()), rest))
}

pub(crate) fn parse_fraction<'i>(
    item: &FractionItem,
    input: &'i [u8],
) -> FormatResult<(Fraction, &'i [u8])> {
    let width = digit_count(input).min(usize::from(item.parse_max));
    if width < usize::from(item.parse_min) || width == 0 {
        return Err(FormatError::syntax().with_enum(ErrorMessage::DigitsExpected));
    }
    let (digits, rest) = input.split_at(width);
    let scale = 10i64.pow(9 - width as u32);
    let fraction = Fraction {
        nanos: (digits_to_value(digits)? * scale) as u32,
        digits: width as u8,
        print_digits: item.print_max,
    };
    Ok((fraction, rest))
}

/// Matches the longest name of `field`, ignoring ASCII case. Names of
/// either style are accepted, the requested style is tried first.
fn parse_text<'i>(
    item: &TextItem,
    input: &'i [u8],
    fields: &mut ParsedFields,
) -> FormatResult<&'i [u8]> {
    let other = match item.style {
        TextStyle::Short => TextStyle::Full,
        TextStyle::Full => TextStyle::Short,
    };
    let candidates = [item.field.names(item.style), item.field.names(other)];
    let found = candidates
        .iter()
        .flat_map(|names| names.iter().enumerate())
        .filter(|(_, name)| {
            input
                .get(..name.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(name.as_bytes()))
        })
        .max_by_key(|(_, name)| name.len());

    let Some((index, name)) = found else {
        return Err(FormatError::syntax().with_message(format!("expected {:?} text", item.field)));
    };
    match item.field {
        TextField::Era => fields.set_era(if index == 0 {
            Era::BeforeCommon
        } else {
            Era::Common
        })?,
        TextField::MonthOfYear => fields.set_month(index as u8 + 1)?,
        TextField::DayOfWeek => fields.set_day_of_week(index as u8 + 1)?,
        TextField::AmPm => fields.set_am_pm(if index == 0 { AmPm::Am } else { AmPm::Pm })?,
    }
    Ok(&input[name.len()..])
}

pub(crate) fn parse_offset<'i>(
    item: &OffsetItem,
    input: &'i [u8],
) -> FormatResult<(UtcOffset, &'i [u8])> {
    match input {
        [b'Z', rest @ ..] if item.accept_z => return Ok((UtcOffset::UTC, rest)),
        [b'z', rest @ ..] if item.accept_lowercase_z => return Ok((UtcOffset::UTC, rest)),
        _ => {}
    }

    let (sign, rest) = match input {
        [b'+', rest @ ..] => (Sign::Positive, rest),
        [b'-', rest @ ..] => (Sign::Negative, rest),
        _ => return Err(FormatError::syntax().with_message("expected an offset sign")),
    };
    let missing = || FormatError::syntax().with_message("expected offset digits");
    let (hours, rest) = parse_two_digits(rest).ok_or_else(missing)?;

    let (minutes, rest) = match (item.parse, item.style) {
        (OffsetParse::Lenient, _) => match rest {
            [b':', after @ ..] => parse_two_digits(after).ok_or_else(missing)?,
            _ => parse_two_digits(rest).unwrap_or((0, rest)),
        },
        (OffsetParse::Strict, OffsetStyle::HoursOptionalMinutes) => {
            parse_two_digits(rest).unwrap_or((0, rest))
        }
        (OffsetParse::Strict, OffsetStyle::HoursMinutes) => {
            parse_two_digits(rest).ok_or_else(missing)?
        }
        (OffsetParse::Strict, OffsetStyle::HoursColonMinutes) => match rest {
            [b':', after @ ..] => parse_two_digits(after).ok_or_else(missing)?,
            _ => return Err(missing()),
        },
    };

    if item.reject_negative_zero && sign == Sign::Negative && hours == 0 && minutes == 0 {
        return Err(FormatError::syntax().with_message("-00:00 is not a valid offset"));
    }
    Ok((UtcOffset::from_parts(sign, hours, minutes, 0)?, rest))
}

fn parse_zone_id<'i>(
    input: &'i [u8],
    zone: Option<&TimeZone>,
) -> FormatResult<(TimeZone, &'i [u8])> {
    let length = input
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'_' | b'+' | b'-' | b':'))
        .count();
    let (identifier, rest) = input.split_at(length);
    core::str::from_utf8(identifier)
        .ok()
        .filter(|identifier| !identifier.is_empty())
        .and_then(|identifier| TimeZone::resolve_identifier(identifier, zone))
        .map(|zone| (zone, rest))
        .ok_or_else(|| FormatError::syntax().with_message("expected a time zone identifier"))
}
