//! The `TimeZoneProvider` trait.

use rustc_hash::FxHashMap;
use tinystr::TinyAsciiStr;

use crate::{timezone::UtcOffset, FormatError, FormatResult};

/// The `TimeZoneProvider` trait provides the methods a host implements to
/// source named time zone data.
///
/// Identifiers handed to the offset methods have already been accepted by
/// `check_identifier`.
pub trait TimeZoneProvider: Send + Sync {
    /// Returns whether `identifier` names a zone known to this provider.
    fn check_identifier(&self, identifier: &str) -> bool;

    /// Returns the offset in effect at `epoch_seconds`.
    fn offset_for_epoch_seconds(
        &self,
        identifier: &str,
        epoch_seconds: i64,
    ) -> FormatResult<UtcOffset>;

    /// Returns the offset to subtract from a wall-clock time expressed as
    /// `local_seconds` since `1970-01-01T00:00:00`.
    ///
    /// Ambiguous and skipped wall-clock times are disambiguated by the
    /// provider.
    fn offset_for_local_seconds(
        &self,
        identifier: &str,
        local_seconds: i64,
    ) -> FormatResult<UtcOffset>;
}

/// A `TimeZoneProvider` whose zones never change their offset.
///
/// ```rust
/// use std::sync::Arc;
/// use temporal_format::{provider::FixedOffsetProvider, TimeZone, UtcOffset};
///
/// let provider = FixedOffsetProvider::default()
///     .with_zone("Asia/Kolkata", UtcOffset::from_seconds(19_800).unwrap())
///     .unwrap();
/// let zone = TimeZone::try_from_str_with_provider("Asia/Kolkata", Arc::new(provider)).unwrap();
/// assert_eq!(zone.identifier(), "Asia/Kolkata");
/// ```
#[derive(Debug, Default, Clone)]
pub struct FixedOffsetProvider {
    zones: FxHashMap<TinyAsciiStr<64>, UtcOffset>,
}

impl FixedOffsetProvider {
    /// Registers `identifier` with a constant `offset`.
    pub fn with_zone(mut self, identifier: &str, offset: UtcOffset) -> FormatResult<Self> {
        let key = TinyAsciiStr::<64>::try_from_str(identifier).map_err(|_| {
            FormatError::range().with_message("time zone identifiers must be ASCII and at most 64 bytes")
        })?;
        self.zones.insert(key, offset);
        Ok(self)
    }

    fn lookup(&self, identifier: &str) -> FormatResult<UtcOffset> {
        TinyAsciiStr::<64>::try_from_str(identifier)
            .ok()
            .and_then(|key| self.zones.get(&key).copied())
            .ok_or_else(|| {
                FormatError::range().with_message(format!("unknown time zone: {identifier}"))
            })
    }
}

impl TimeZoneProvider for FixedOffsetProvider {
    fn check_identifier(&self, identifier: &str) -> bool {
        self.lookup(identifier).is_ok()
    }

    fn offset_for_epoch_seconds(&self, identifier: &str, _: i64) -> FormatResult<UtcOffset> {
        self.lookup(identifier)
    }

    fn offset_for_local_seconds(&self, identifier: &str, _: i64) -> FormatResult<UtcOffset> {
        self.lookup(identifier)
    }
}
