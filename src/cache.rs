//! The process-wide cache of formatters for named patterns.
//!
//! Only chains made entirely of registered names are cached. Their number
//! is bounded by the registry, custom patterns are not.

use std::sync::{LazyLock, Mutex, PoisonError};

use rustc_hash::FxHashMap;

use crate::{formatter::DateFormatter, options::Dialect, pattern, registry::Deprecation, FormatResult};

static FORMATTERS: LazyLock<Mutex<FxHashMap<Box<str>, DateFormatter>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

/// Returns the shared formatter for `pattern` with default options,
/// compiling it on a miss.
///
/// Deprecated names warn on every lookup, not only when compiled.
pub(crate) fn cached_formatter(pattern: &str) -> FormatResult<DateFormatter> {
    let cached = lock().get(pattern).cloned();
    if let Some(formatter) = cached {
        formatter.deprecations().iter().for_each(Deprecation::emit);
        return Ok(formatter);
    }

    // Compile outside the lock. Concurrent misses may compile twice; the
    // first insert wins so every caller sees the same object.
    let chain = pattern::compile(pattern, Dialect::Modern)?;
    if !chain.is_named_only() {
        return Ok(DateFormatter::from_chain(chain));
    }
    let formatter = DateFormatter::from_chain(chain);
    Ok(lock()
        .entry(pattern.into())
        .or_insert(formatter)
        .clone())
}

fn lock() -> std::sync::MutexGuard<'static, FxHashMap<Box<str>, DateFormatter>> {
    FORMATTERS.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::cached_formatter;
    use crate::DateFormatter;

    #[test]
    fn named_patterns_are_shared() {
        let a = cached_formatter("date_optional_time||epoch_second").unwrap();
        let b = cached_formatter("date_optional_time||epoch_second").unwrap();
        assert!(DateFormatter::ptr_eq(&a, &b));

        let a = cached_formatter("uuuu-MM-dd").unwrap();
        let b = cached_formatter("uuuu-MM-dd").unwrap();
        assert!(!DateFormatter::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn concurrent_lookups_agree() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| cached_formatter("basic_week_date_time").unwrap()))
            .collect();
        let formatters: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        for formatter in &formatters[1..] {
            assert!(DateFormatter::ptr_eq(&formatters[0], formatter));
        }
    }

    #[cfg(feature = "log")]
    #[test]
    fn deprecations_warn_on_every_lookup() {
        use std::sync::{Mutex, OnceLock};

        struct Recorder(Mutex<Vec<String>>);

        impl log::Log for Recorder {
            fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
                metadata.target() == "deprecation"
            }

            fn log(&self, record: &log::Record<'_>) {
                if self.enabled(record.metadata()) {
                    self.0
                        .lock()
                        .unwrap()
                        .push(record.args().to_string());
                }
            }

            fn flush(&self) {}
        }

        static RECORDER: OnceLock<&'static Recorder> = OnceLock::new();
        let recorder = *RECORDER.get_or_init(|| {
            let recorder: &'static Recorder = Box::leak(Box::new(Recorder(Mutex::new(Vec::new()))));
            log::set_logger(recorder).unwrap();
            log::set_max_level(log::LevelFilter::Warn);
            recorder
        });
        let warnings = || {
            recorder
                .0
                .lock()
                .unwrap()
                .iter()
                .filter(|message| message.contains("strictYearMonth"))
                .count()
        };

        let first = cached_formatter("strictYearMonth").unwrap();
        let after_first = warnings();
        assert!(after_first >= 1);
        let second = cached_formatter("strictYearMonth").unwrap();
        assert!(DateFormatter::ptr_eq(&first, &second));
        assert_eq!(second.deprecations().len(), 1);
        assert!(warnings() > after_first);
    }

    #[test]
    fn errors_are_not_cached() {
        assert!(cached_formatter("date_optional_time||").is_err());
        assert!(cached_formatter("date_optional_time||").is_err());
    }
}
