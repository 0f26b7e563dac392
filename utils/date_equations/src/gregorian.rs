/// Gregorian Date Calculations
///
/// This module contains the logic for Gregorian Date Calculations.
///
/// ## Extending Neri-Schneider shift window
///
/// In their paper, Neri-Schneider calculated for a Rata Die shift
/// of 82, which only covers a window of roughly 32_767 years. The
/// formatting engine needs to address years in the range
/// `[-1_000_000_000, 1_000_000_000]`, so the computational calendar is
/// shifted forward by 2_600_000 Gregorian cycles of 400 years and all
/// arithmetic is carried out in 64 bits.
///
/// | Significant Date | Epoch Days |
/// | -----------------|------------|
/// | January 1, -1_000_000_000 | -365_243_219_528 |
/// | January 1, 1970 | 0 |
/// | December 31, 1_000_000_000 | 365_241_780_837 |
///
pub mod neri_schneider;

pub use neri_schneider::{
    epoch_days_from_gregorian_date as epoch_days_from_ymd,
    gregorian_ymd_from_epoch_days as ymd_from_epoch_days,
};

/// Returns whether `year` is a leap year in the proleptic Gregorian calendar.
#[inline]
pub const fn is_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

/// Returns the number of days in `year`.
#[inline]
pub const fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Returns the number of days in `month` of `year`.
///
/// `month` is expected to be in `1..=12`; any other value returns 0.
pub const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Returns the ordinal day (1-based) of the given date within its year.
pub const fn day_of_year(year: i32, month: u8, day: u8) -> u16 {
    (epoch_days_from_ymd(year, month, day) - epoch_days_from_ymd(year, 1, 1) + 1) as u16
}

/// Returns the ISO day of week for the epoch day, Monday = 1 through Sunday = 7.
#[inline]
pub const fn day_of_week(epoch_days: i64) -> u8 {
    // 1970-01-01 was a Thursday.
    ((epoch_days + 3).rem_euclid(7) + 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(0));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(-100));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 13), 0);
    }

    #[test]
    fn ordinal_days() {
        assert_eq!(day_of_year(2023, 1, 1), 1);
        assert_eq!(day_of_year(2023, 12, 31), 365);
        assert_eq!(day_of_year(2024, 12, 31), 366);
        assert_eq!(day_of_year(2024, 3, 1), 61);
    }

    #[test]
    fn weekdays() {
        assert_eq!(day_of_week(0), 4);
        // 2016-01-04 was a Monday
        assert_eq!(day_of_week(epoch_days_from_ymd(2016, 1, 4)), 1);
        // 1969-12-28 was a Sunday
        assert_eq!(day_of_week(-4), 7);
    }
}
