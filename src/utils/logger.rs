//! Process-wide logging handle
//!
//! `init` installs env_logger as the global `log` backend, wrapped so
//! that every record passing the filter is also forwarded to a single
//! optional observer. The debug console attaches itself as that observer
//! once the UI exists. The handle lives for the whole process.

use crate::utils::error::{Result, TPlayerError};
use env_logger::Env;
use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::io::Write;

type Observer = Box<dyn Fn(&str) + Send>;

static OBSERVER: Lazy<Mutex<Option<Observer>>> = Lazy::new(|| Mutex::new(None));

/// Where env_logger writes formatted records
pub enum LogTarget {
    Stderr,
    Writer(Box<dyn Write + Send>),
}

/// env_logger wrapped with the observer hook
struct ObservedLogger {
    inner: env_logger::Logger,
}

impl Log for ObservedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.inner.matches(record) {
            return;
        }

        self.inner.log(record);
        notify_observer(record.level(), &record.args().to_string());
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the global logger.
///
/// `level` is the default filter; `RUST_LOG` still takes precedence.
pub fn init(level: &str, target: LogTarget) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(level));
    builder.format_timestamp_millis();

    if let LogTarget::Writer(writer) = target {
        builder.target(env_logger::Target::Pipe(writer));
    }

    let inner = builder.build();
    let max_level: LevelFilter = inner.filter();

    log::set_boxed_logger(Box::new(ObservedLogger { inner }))
        .map_err(|e| TPlayerError::Internal(format!("Logger already installed: {}", e)))?;
    log::set_max_level(max_level);

    Ok(())
}

/// Attach the observer, replacing any previous one
pub fn set_observer<F>(observer: F)
where
    F: Fn(&str) + Send + 'static,
{
    *OBSERVER.lock() = Some(Box::new(observer));
}

/// Detach the observer
pub fn clear_observer() {
    OBSERVER.lock().take();
}

/// Text handed to the observer for a record
pub fn observed_line(level: Level, message: &str) -> String {
    match level {
        Level::Error => format!("ERROR: {}", message),
        _ => message.to_string(),
    }
}

fn notify_observer(level: Level, message: &str) {
    if let Some(observer) = OBSERVER.lock().as_ref() {
        observer(&observed_line(level, message));
    }
}
