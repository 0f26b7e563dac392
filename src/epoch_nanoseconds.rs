use num_traits::{Euclid, ToPrimitive};

use crate::{error::ErrorMessage, FormatError, FormatResult, NS_PER_SECOND};

/// Nanoseconds from the Unix epoch at the earliest representable instant,
/// `-1000000000-01-01T00:00:00Z`.
pub(crate) const NS_MIN_INSTANT: i128 = crate::instant::MIN_EPOCH_SECONDS as i128 * 1_000_000_000;

/// Nanoseconds from the Unix epoch at the latest representable instant,
/// `+1000000000-12-31T23:59:59.999999999Z`.
pub(crate) const NS_MAX_INSTANT: i128 =
    crate::instant::MAX_EPOCH_SECONDS as i128 * 1_000_000_000 + 999_999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct EpochNanoseconds(pub(crate) i128);

impl EpochNanoseconds {
    pub fn as_i128(&self) -> i128 {
        self.0
    }

    pub fn check_validity(&self) -> FormatResult<()> {
        if !is_valid_epoch_nanos(&self.0) {
            return Err(FormatError::range().with_enum(ErrorMessage::InstantOutOfRange));
        }
        Ok(())
    }

    /// Splits into floored seconds and the non-negative nanosecond remainder.
    pub fn to_seconds_and_nanos(self) -> (i64, u32) {
        let ns_per_second = i128::from(NS_PER_SECOND);
        let seconds = Euclid::div_euclid(&self.0, &ns_per_second);
        let nanos = Euclid::rem_euclid(&self.0, &ns_per_second);
        (
            seconds.to_i64().unwrap_or(if seconds < 0 { i64::MIN } else { i64::MAX }),
            nanos.to_u32().unwrap_or_default(),
        )
    }

    pub fn checked_add(self, nanoseconds: i128) -> FormatResult<Self> {
        let result = self
            .0
            .checked_add(nanoseconds)
            .map(Self)
            .ok_or(FormatError::range().with_enum(ErrorMessage::InstantOutOfRange))?;
        result.check_validity()?;
        Ok(result)
    }
}

/// Utility for determining if the nanos are within a valid range.
#[inline]
#[must_use]
pub(crate) fn is_valid_epoch_nanos(nanos: &i128) -> bool {
    (NS_MIN_INSTANT..=NS_MAX_INSTANT).contains(nanos)
}

#[cfg(test)]
mod tests {
    use super::{EpochNanoseconds, NS_MAX_INSTANT, NS_MIN_INSTANT};

    #[test]
    fn floors_negative_values() {
        assert_eq!(
            EpochNanoseconds(-1).to_seconds_and_nanos(),
            (-1, 999_999_999)
        );
        assert_eq!(
            EpochNanoseconds(-1_000_000_000).to_seconds_and_nanos(),
            (-1, 0)
        );
        assert_eq!(
            EpochNanoseconds(1_500_000_000).to_seconds_and_nanos(),
            (1, 500_000_000)
        );
    }

    #[test]
    fn validity_bounds() {
        assert!(EpochNanoseconds(NS_MAX_INSTANT).check_validity().is_ok());
        assert!(EpochNanoseconds(NS_MIN_INSTANT).check_validity().is_ok());
        assert!(EpochNanoseconds(NS_MAX_INSTANT + 1).check_validity().is_err());
        assert!(EpochNanoseconds(NS_MIN_INSTANT - 1).check_validity().is_err());
        assert!(EpochNanoseconds(NS_MAX_INSTANT).checked_add(1).is_err());
        assert!(EpochNanoseconds(0).checked_add(999_999).is_ok());
    }
}
