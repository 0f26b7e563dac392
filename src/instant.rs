//! An implementation of the formatter's `Instant`.

use core::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use num_traits::{Euclid, ToPrimitive};

use crate::{
    epoch_nanoseconds::EpochNanoseconds, error::ErrorMessage, timezone::UtcOffset, FormatError,
    FormatResult, NS_PER_MILLI, NS_PER_SECOND,
};

/// Epoch seconds of `-1000000000-01-01T00:00:00Z`.
pub(crate) const MIN_EPOCH_SECONDS: i64 = -31_557_014_167_219_200;
/// Epoch seconds of `+1000000000-12-31T23:59:59Z`.
pub(crate) const MAX_EPOCH_SECONDS: i64 = 31_556_889_864_403_199;

/// A point on the UTC timeline with nanosecond resolution.
///
/// An `Instant` may also remember the UTC offset it was parsed with. The
/// offset is informational: equality, ordering and hashing only consider
/// the position on the timeline.
///
/// ```rust
/// use temporal_format::{Instant, UtcOffset};
///
/// let instant = Instant::new(-1, 999_999_999).unwrap();
/// assert_eq!(instant.to_epoch_millis(), -1);
///
/// let shifted = instant.with_offset(Some(UtcOffset::from_seconds(3600).unwrap()));
/// assert_eq!(instant, shifted);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    seconds: i64,
    nanos: u32,
    offset: Option<UtcOffset>,
}

// ==== Private API ====

impl Instant {
    pub(crate) fn from_epoch_nanoseconds(nanoseconds: EpochNanoseconds) -> FormatResult<Self> {
        nanoseconds.check_validity()?;
        let (seconds, nanos) = nanoseconds.to_seconds_and_nanos();
        Ok(Self {
            seconds,
            nanos,
            offset: None,
        })
    }

    pub(crate) fn epoch_nanoseconds(&self) -> EpochNanoseconds {
        EpochNanoseconds(
            i128::from(self.seconds) * i128::from(NS_PER_SECOND) + i128::from(self.nanos),
        )
    }
}

// ==== Public API ====

impl Instant {
    /// The earliest representable instant, `-1000000000-01-01T00:00:00Z`.
    pub const MIN: Self = Self {
        seconds: MIN_EPOCH_SECONDS,
        nanos: 0,
        offset: None,
    };

    /// The latest representable instant, `+1000000000-12-31T23:59:59.999999999Z`.
    pub const MAX: Self = Self {
        seconds: MAX_EPOCH_SECONDS,
        nanos: NS_PER_SECOND - 1,
        offset: None,
    };

    /// The Unix epoch.
    pub const UNIX_EPOCH: Self = Self {
        seconds: 0,
        nanos: 0,
        offset: None,
    };

    /// Creates an `Instant` from floored epoch seconds and a nanosecond
    /// remainder in `0..1_000_000_000`.
    pub fn new(seconds: i64, nanos: u32) -> FormatResult<Self> {
        if nanos >= NS_PER_SECOND {
            return Err(FormatError::range().with_enum(ErrorMessage::NanosOutOfRange));
        }
        if !(MIN_EPOCH_SECONDS..=MAX_EPOCH_SECONDS).contains(&seconds) {
            return Err(FormatError::range().with_enum(ErrorMessage::InstantOutOfRange));
        }
        Ok(Self {
            seconds,
            nanos,
            offset: None,
        })
    }

    /// Creates an `Instant` from milliseconds since the Unix epoch.
    ///
    /// Every `i64` millisecond value lies within the representable range.
    #[must_use]
    pub fn from_epoch_millis(millis: i64) -> Self {
        let ms_per_second = i64::from(NS_PER_SECOND / NS_PER_MILLI);
        Self {
            seconds: millis.div_euclid(ms_per_second),
            nanos: millis.rem_euclid(ms_per_second) as u32 * NS_PER_MILLI,
            offset: None,
        }
    }

    /// Returns the floored seconds since the Unix epoch.
    #[inline]
    #[must_use]
    pub fn epoch_seconds(&self) -> i64 {
        self.seconds
    }

    /// Returns the nanoseconds past `epoch_seconds`.
    #[inline]
    #[must_use]
    pub fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Returns the floored milliseconds since the Unix epoch, saturating at
    /// the bounds of `i64`.
    #[must_use]
    pub fn to_epoch_millis(&self) -> i64 {
        let millis = Euclid::div_euclid(
            &self.epoch_nanoseconds().as_i128(),
            &i128::from(NS_PER_MILLI),
        );
        millis
            .to_i64()
            .unwrap_or(if millis < 0 { i64::MIN } else { i64::MAX })
    }

    /// Returns the UTC offset this instant was parsed with, if any.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> Option<UtcOffset> {
        self.offset
    }

    /// Returns the same instant remembering `offset`.
    #[must_use]
    pub fn with_offset(self, offset: Option<UtcOffset>) -> Self {
        Self { offset, ..self }
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.seconds == other.seconds && self.nanos == other.nanos
    }
}

impl Eq for Instant {}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.seconds, self.nanos).cmp(&(other.seconds, other.nanos))
    }
}

impl Hash for Instant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seconds.hash(state);
        self.nanos.hash(state);
    }
}
