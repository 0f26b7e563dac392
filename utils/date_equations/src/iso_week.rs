//! ISO 8601 week date equations.
//!
//! Weeks start on Monday and week 1 of a week-based year is the week
//! containing that year's first Thursday.

use crate::gregorian::{day_of_week, epoch_days_from_ymd, ymd_from_epoch_days};

/// Returns the epoch day of the Monday starting week 1 of `week_year`.
pub const fn first_monday(week_year: i32) -> i64 {
    let jan_fourth = epoch_days_from_ymd(week_year, 1, 4);
    jan_fourth - (day_of_week(jan_fourth) as i64 - 1)
}

/// Returns the number of ISO weeks (52 or 53) in `week_year`.
pub const fn weeks_in_week_year(week_year: i32) -> u8 {
    ((first_monday(week_year + 1) - first_monday(week_year)) / 7) as u8
}

/// Returns the epoch day of the given ISO week date.
pub const fn epoch_days_from_week_date(week_year: i32, week: u8, weekday: u8) -> i64 {
    first_monday(week_year) + (week as i64 - 1) * 7 + (weekday as i64 - 1)
}

/// Returns the ISO `(week_year, week, weekday)` of the epoch day.
pub const fn week_date_from_epoch_days(epoch_days: i64) -> (i32, u8, u8) {
    let weekday = day_of_week(epoch_days);
    let thursday = epoch_days - weekday as i64 + 4;
    let (week_year, _, _) = ymd_from_epoch_days(thursday);
    let week = (thursday - epoch_days_from_ymd(week_year, 1, 1)) / 7 + 1;
    (week_year, week as u8, weekday)
}
