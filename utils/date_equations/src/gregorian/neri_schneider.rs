// NOTE: The formatting engine supports the year range [-1_000_000_000, 1_000_000_000]
//
// Neri-Schneider require a non-negative computational rata die, so the
// input is shifted by a whole number of 400 year cycles before applying
// the Euclidean affine functions and the year is shifted back afterwards.
//
// ceil(1_000_000_000 / 400) = 2_500_000, rounded up to 2_600_000.

const EPOCH_COMPUTATIONAL_RATA_DIE: i64 = 719_468;

const DAYS_IN_A_400Y_CYCLE: u64 = 146_097;
const TWO_POWER_THIRTY_NINE: u64 = 549_755_813_888; // 2^39 constant
const TWO_POWER_SIXTEEN: u64 = 65_536; // 2^16 constant

const SHIFTS: i64 = 2_600_000;
const RATA_DIE_SHIFT: i64 = DAYS_IN_A_400Y_CYCLE as i64 * SHIFTS;
const YEAR_SHIFT: i64 = 400 * SHIFTS;

// Calculate Rata Die value from gregorian

/// Returns the computational rata die of a shifted (non-negative) year.
const fn rata_die_from_shifted_date(year: i64, month: i64, day: i64) -> i64 {
    let (comp_year, comp_month, comp_day, century) = rata_die_first_equations(year, month, day);
    let y_star = 1461 * comp_year / 4 - century + century / 4;
    let m_star = (979 * comp_month - 2919) / 32;
    y_star + m_star + comp_day
}

// Returns Y, M, D, C
const fn rata_die_first_equations(year: i64, month: i64, day: i64) -> (i64, i64, i64, i64) {
    let j = (month <= 2) as i64;
    let computational_year = year - j;
    let computation_month = month + 12 * j;
    let computation_day = day - 1;
    (
        computational_year,
        computation_month,
        computation_day,
        computational_year / 100,
    )
}

/// Returns the number of days since 1970-01-01 for the given Gregorian date.
pub const fn epoch_days_from_gregorian_date(year: i32, month: u8, day: u8) -> i64 {
    let shifted_year = year as i64 + YEAR_SHIFT;
    rata_die_from_shifted_date(shifted_year, month as i64, day as i64)
        - EPOCH_COMPUTATIONAL_RATA_DIE
        - RATA_DIE_SHIFT
}

// Computational days to gregorian YMD

// Returns C, N_c
const fn first_equations(rata_die: u64) -> (u64, u64) {
    let n_one = 4 * rata_die + 3;
    let century_rem = n_one % DAYS_IN_A_400Y_CYCLE;
    let century_num = n_one / DAYS_IN_A_400Y_CYCLE;
    (century_num, century_rem)
}

/// returns Y, N_y
const fn second_equations(rata_die: u64) -> (u64, u64) {
    let (century, rem) = first_equations(rata_die);
    let n_two = rem | 3;
    let year_of_century = (376_287_347 * n_two) / TWO_POWER_THIRTY_NINE;
    let day_of_year = (n_two - 1461 * year_of_century) / 4;
    let year = 100 * century + year_of_century;
    (year, day_of_year)
}

// Y, M, D, N_y
const fn third_equations(rata_die: u64) -> (u64, u64, u64, u64) {
    let (year, day_of_year) = second_equations(rata_die);
    let n_three = 2141 * day_of_year + 197_913;
    let month = n_three / TWO_POWER_SIXTEEN;
    let day = (n_three % TWO_POWER_SIXTEEN) / 2141;
    (year, month, day, day_of_year)
}

/// Returns the Gregorian year, month and day of a non-negative computational rata die.
pub const fn gregorian_ymd(rata_die: u64) -> (i64, u8, u8) {
    let (year, month, day, day_of_year) = third_equations(rata_die);
    let j = (day_of_year >= 306) as u64;
    let year = year + j;
    let month = month - 12 * j;
    let day = day + 1;
    (year as i64, month as u8, day as u8)
}

/// Returns the Gregorian year, month and day for a count of days since 1970-01-01.
pub const fn gregorian_ymd_from_epoch_days(epoch_days: i64) -> (i32, u8, u8) {
    let rata_die = epoch_days + EPOCH_COMPUTATIONAL_RATA_DIE + RATA_DIE_SHIFT;
    let (year, month, day) = gregorian_ymd(rata_die as u64);
    // Shift the year back to the proper date
    ((year - YEAR_SHIFT) as i32, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPOCH_RATA_DIE: u64 = 719_468; // This is the Rata Die for 1970-01-01

    #[test]
    fn epoch_ymd() {
        let ymd = gregorian_ymd(EPOCH_RATA_DIE);
        assert_eq!(ymd, (1970, 1, 1))
    }

    #[test]
    fn epoch_days_from_date() {
        assert_eq!(epoch_days_from_gregorian_date(1970, 1, 1), 0);
        assert_eq!(epoch_days_from_gregorian_date(1969, 12, 31), -1);
        assert_eq!(epoch_days_from_gregorian_date(2000, 3, 1), 11_017);
        assert_eq!(epoch_days_from_gregorian_date(2018, 10, 10), 17_814);
        assert_eq!(epoch_days_from_gregorian_date(275_760, 9, 13), 100_000_000);
        assert_eq!(epoch_days_from_gregorian_date(-271_821, 4, 20), -100_000_000);
        assert_eq!(epoch_days_from_gregorian_date(0, 1, 1), -719_528);
        assert_eq!(epoch_days_from_gregorian_date(-1, 12, 31), -719_529);
    }

    #[test]
    fn epoch_days_to_date() {
        assert_eq!(gregorian_ymd_from_epoch_days(-1), (1969, 12, 31));
        assert_eq!(gregorian_ymd_from_epoch_days(11_017), (2000, 3, 1));
        assert_eq!(gregorian_ymd_from_epoch_days(100_000_000), (275_760, 9, 13));
        assert_eq!(gregorian_ymd_from_epoch_days(-100_000_000), (-271_821, 4, 20));
        assert_eq!(gregorian_ymd_from_epoch_days(-719_529), (-1, 12, 31));
    }

    #[test]
    fn engine_limits() {
        let min = epoch_days_from_gregorian_date(-1_000_000_000, 1, 1);
        assert_eq!(min, -365_243_219_528);
        assert_eq!(gregorian_ymd_from_epoch_days(min), (-1_000_000_000, 1, 1));
        let max = epoch_days_from_gregorian_date(1_000_000_000, 12, 31);
        assert_eq!(max, 365_241_780_837);
        assert_eq!(gregorian_ymd_from_epoch_days(max), (1_000_000_000, 12, 31));
    }

    #[test]
    fn round_trip_across_leap_boundaries() {
        for epoch_days in -800_000..800_000i64 {
            let (y, m, d) = gregorian_ymd_from_epoch_days(epoch_days);
            assert_eq!(epoch_days_from_gregorian_date(y, m, d), epoch_days);
        }
    }
}
