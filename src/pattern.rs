//! The pattern compiler.
//!
//! A pattern string is a `||` separated chain of segments. Segments that
//! name a registered format resolve through the [`registry`]; any other
//! segment is compiled from its pattern letters.
//!
//! ```rust
//! use temporal_format::{pattern::compile, Dialect, PatternSegment, FormatName};
//!
//! let chain = compile("8yyyy-MM-dd||epoch_millis", Dialect::Modern).unwrap();
//! assert_eq!(chain.dialect(), Dialect::Legacy);
//! assert_eq!(chain.pattern(), "8yyyy-MM-dd||epoch_millis");
//!
//! let segments: Vec<_> = chain.segments().collect();
//! assert_eq!(segments[0], &PatternSegment::Custom("yyyy-MM-dd".into()));
//! assert_eq!(segments[1], &PatternSegment::Named(FormatName::EpochMillis));
//! ```
//!
//! [`registry`]: crate::registry

use core::{
    fmt,
    hash::{Hash, Hasher},
};

use writeable::Writeable;

use crate::{
    epoch::{parse_epoch, EpochUnit, EpochValue, FormattableEpoch},
    error::ErrorMessage,
    fields::ParsedFields,
    items::Item,
    named,
    options::{Defaulting, Dialect},
    parsers::parse_items,
    printers::{FormattableItems, LocalFields},
    registry::{self, Deprecation, FormatName},
    timezone::{TimeZone, UtcOffset},
    FormatError, FormatResult, FormatUnwrap, Instant,
};

mod symbols;

/// A leading `8` compiles every custom segment of the pattern with the
/// legacy letter table.
const LEGACY_MARKER: char = '8';

/// The separator between the segments of a chain.
const SEGMENT_SEPARATOR: &str = "||";

/// The source of one segment of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternSegment {
    /// A registered format.
    Named(FormatName),
    /// A custom pattern, compiled in the chain's dialect.
    Custom(Box<str>),
}

impl fmt::Display for PatternSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name.snake_case_name()),
            Self::Custom(pattern) => f.write_str(pattern),
        }
    }
}

/// How a segment reads and writes text.
#[derive(Debug, Clone)]
pub(crate) enum SegmentFormat {
    Epoch(EpochUnit),
    Items {
        printer: Vec<Item>,
        /// Alternative grammars, tried in order.
        parsers: Vec<Vec<Item>>,
    },
}

impl SegmentFormat {
    pub(crate) fn from_items(items: Vec<Item>) -> Self {
        Self::Items {
            printer: items.clone(),
            parsers: vec![items],
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Segment {
    source: PatternSegment,
    format: SegmentFormat,
}

/// What a segment recovered from text it accepted.
#[derive(Debug)]
enum Reading {
    Epoch(EpochValue),
    Fields(ParsedFields),
}

impl Reading {
    fn resolve(&self, defaulting: Defaulting, zone: Option<&TimeZone>) -> FormatResult<Instant> {
        match (self, defaulting) {
            (Self::Epoch(value), Defaulting::Minimum) => value.instant(),
            (Self::Epoch(value), Defaulting::Maximum) => value.roundup_instant(),
            (Self::Fields(fields), defaulting) => fields.resolve(defaulting, zone),
        }
    }
}

impl Segment {
    /// Reads the whole of `text`. The segment accepts it when its fields
    /// resolve with minimum defaulting.
    fn read(&self, text: &str, zone: Option<&TimeZone>) -> FormatResult<Reading> {
        match &self.format {
            SegmentFormat::Epoch(unit) => {
                let value = parse_epoch(text, *unit)?;
                value.instant()?;
                Ok(Reading::Epoch(value))
            }
            SegmentFormat::Items { parsers, .. } => {
                let mut result = Err(FormatError::assert());
                for parser in parsers {
                    result = parse_items(parser, text, zone).and_then(|fields| {
                        fields.resolve(Defaulting::Minimum, zone)?;
                        Ok(Reading::Fields(fields))
                    });
                    if result.is_ok() {
                        break;
                    }
                }
                result
            }
        }
    }

    fn format(&self, instant: &Instant, zone: Option<&TimeZone>) -> String {
        match &self.format {
            SegmentFormat::Epoch(unit) => FormattableEpoch {
                instant: *instant,
                unit: *unit,
            }
            .write_to_string()
            .into_owned(),
            SegmentFormat::Items { printer, .. } => {
                let offset = match zone {
                    Some(zone) => zone_offset(zone, instant),
                    None => instant.offset().unwrap_or(UtcOffset::UTC),
                };
                let fields = LocalFields::new(instant, offset);
                FormattableItems {
                    items: printer,
                    fields: &fields,
                    zone,
                }
                .write_to_string()
                .into_owned()
            }
        }
    }
}

/// The offset of `zone` at `instant`. A provider that fails for an
/// identifier it accepted earlier falls back to UTC.
fn zone_offset(zone: &TimeZone, instant: &Instant) -> UtcOffset {
    match zone.offset_at_epoch_seconds(instant.epoch_seconds()) {
        Ok(offset) => offset,
        Err(_err) => {
            #[cfg(feature = "log")]
            log::error!("time zone {zone} has no offset at {instant:?}: {_err}");
            UtcOffset::UTC
        }
    }
}

/// A compiled chain of segments.
///
/// The first segment prints; every segment is a parse candidate, in
/// order. Two chains are equal when their pattern strings and dialects
/// are.
#[derive(Debug, Clone)]
pub struct FormatChain {
    pattern: Box<str>,
    dialect: Dialect,
    print: Segment,
    fallbacks: Vec<Segment>,
    deprecations: Vec<Deprecation>,
}

impl FormatChain {
    /// Returns the pattern string the chain was compiled from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the dialect of the chain's custom segments.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the segment sources in chain order.
    pub fn segments(&self) -> impl Iterator<Item = &PatternSegment> {
        self.compiled().map(|segment| &segment.source)
    }

    /// Returns the advisories raised while resolving deprecated names.
    #[must_use]
    pub fn deprecations(&self) -> &[Deprecation] {
        &self.deprecations
    }

    fn compiled(&self) -> impl Iterator<Item = &Segment> {
        core::iter::once(&self.print).chain(&self.fallbacks)
    }

    /// Whether every segment is a registered format.
    pub(crate) fn is_named_only(&self) -> bool {
        self.segments()
            .all(|segment| matches!(segment, PatternSegment::Named(_)))
    }

    /// Tries each segment in order against the whole of `text`.
    ///
    /// The first segment that accepts the text resolves it with
    /// `defaulting`. A roundup parse never moves on to a later segment.
    pub(crate) fn parse(
        &self,
        text: &str,
        zone: Option<&TimeZone>,
        defaulting: Defaulting,
    ) -> FormatResult<Instant> {
        for segment in self.compiled() {
            match segment.read(text, zone) {
                Ok(reading) => {
                    return reading.resolve(defaulting, zone).map_err(|_err| {
                        #[cfg(feature = "log")]
                        log::trace!("segment [{}] cannot resolve [{text}]: {_err}", segment.source);
                        FormatError::date_parse(text, &self.pattern)
                    });
                }
                Err(_err) => {
                    #[cfg(feature = "log")]
                    log::trace!("segment [{}] rejected [{text}]: {_err}", segment.source);
                }
            }
        }
        Err(FormatError::date_parse(text, &self.pattern))
    }

    /// Formats with the print segment.
    pub(crate) fn format(&self, instant: &Instant, zone: Option<&TimeZone>) -> String {
        self.print.format(instant, zone)
    }
}

impl PartialEq for FormatChain {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.dialect == other.dialect
    }
}

impl Eq for FormatChain {}

impl Hash for FormatChain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
        self.dialect.hash(state);
    }
}

/// Splits a pattern on `||` outside of quoted literals.
fn split_segments(pattern: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    let bytes = pattern.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'\'' => quoted = !quoted,
            b'|' if !quoted && pattern[index..].starts_with(SEGMENT_SEPARATOR) => {
                segments.push(&pattern[start..index]);
                index += SEGMENT_SEPARATOR.len();
                start = index;
                continue;
            }
            _ => {}
        }
        index += 1;
    }
    segments.push(&pattern[start..]);
    segments
}

/// Compiles `pattern` into a chain. Custom segments use `dialect` unless
/// the pattern starts with the legacy marker.
///
/// Deprecated names still compile; each raises a [`Deprecation`], logged
/// at `warn` level and kept on the chain.
pub fn compile(pattern: &str, dialect: Dialect) -> FormatResult<FormatChain> {
    let (body, dialect) = match pattern.strip_prefix(LEGACY_MARKER) {
        Some(body) => (body, Dialect::Legacy),
        None => (pattern, dialect),
    };
    if body.trim().is_empty() {
        return Err(FormatError::invalid_format(
            pattern,
            ErrorMessage::EmptyPattern.to_str(),
        ));
    }

    let mut segments = Vec::new();
    let mut deprecations = Vec::new();
    for source in split_segments(body) {
        if source.is_empty() {
            return Err(FormatError::invalid_format(
                pattern,
                ErrorMessage::EmptySegment.to_str(),
            ));
        }
        let segment = match registry::resolve(source) {
            Some(resolved) => {
                if let Some(deprecation) = resolved.deprecation {
                    deprecation.emit();
                    deprecations.push(deprecation);
                }
                Segment {
                    source: PatternSegment::Named(resolved.name),
                    format: named::definition(resolved.name),
                }
            }
            None => {
                let items = symbols::compile_custom(source, dialect)
                    .map_err(|err| FormatError::invalid_format(pattern, err.message()))?;
                Segment {
                    source: PatternSegment::Custom(source.into()),
                    format: SegmentFormat::from_items(items),
                }
            }
        };
        segments.push(segment);
    }

    let mut segments = segments.into_iter();
    let print = segments.next().format_unwrap()?;
    Ok(FormatChain {
        pattern: pattern.into(),
        dialect,
        print,
        fallbacks: segments.collect(),
        deprecations,
    })
}

#[cfg(test)]
mod tests {
    use super::{compile, split_segments, PatternSegment};
    use crate::{error::ErrorKind, options::Dialect, registry::FormatName};

    #[test]
    fn split_respects_quotes() {
        assert_eq!(
            split_segments("yyyy'||'MM||epoch_millis"),
            vec!["yyyy'||'MM", "epoch_millis"]
        );
        assert_eq!(split_segments("a||||b"), vec!["a", "", "b"]);
        assert_eq!(split_segments("epoch_second"), vec!["epoch_second"]);
    }

    #[test]
    fn chain_order_is_kept() {
        let chain = compile(
            "strict_date_optional_time||epoch_millis||uuuu",
            Dialect::Modern,
        )
        .unwrap();
        let segments: Vec<_> = chain.segments().cloned().collect();
        assert_eq!(
            segments,
            vec![
                PatternSegment::Named(FormatName::StrictDateOptionalTime),
                PatternSegment::Named(FormatName::EpochMillis),
                PatternSegment::Custom("uuuu".into()),
            ]
        );
        assert!(!chain.is_named_only());
        assert_eq!(chain.dialect(), Dialect::Modern);
    }

    #[test]
    fn legacy_marker() {
        let chain = compile("8date_optional_time||ww-MM-dd", Dialect::Modern).unwrap();
        assert_eq!(chain.dialect(), Dialect::Legacy);
        assert_eq!(chain.pattern(), "8date_optional_time||ww-MM-dd");
        assert_eq!(
            chain.segments().next(),
            Some(&PatternSegment::Named(FormatName::DateOptionalTime))
        );
        assert_ne!(
            compile("8yyyy-MM-dd", Dialect::Modern).unwrap(),
            compile("yyyy-MM-dd", Dialect::Modern).unwrap()
        );
        assert_ne!(
            compile("yyyy-MM-dd", Dialect::Legacy).unwrap(),
            compile("yyyy-MM-dd", Dialect::Modern).unwrap()
        );
    }

    #[test]
    fn invalid_patterns() {
        for pattern in ["", "8", "epoch_millis||", "||epoch_millis", "yyyy-MM-dd'T", "qqqq"] {
            let err = compile(pattern, Dialect::Modern).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFormatSpec, "{pattern}");
            assert!(
                err.message().starts_with(&format!("Invalid format: [{pattern}]")),
                "{}",
                err.message()
            );
        }
    }

    #[test]
    fn deprecations_are_collected() {
        let chain = compile("dateOptionalTime||week_year", Dialect::Modern).unwrap();
        assert_eq!(chain.deprecations().len(), 2);
        assert!(chain.is_named_only());
        assert_eq!(
            chain.segments().nth(1),
            Some(&PatternSegment::Named(FormatName::Weekyear))
        );
    }
}
