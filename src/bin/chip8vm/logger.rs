// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A minimal [log] backend, which writes colored records to stderr

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::{OwoColorize, Style};

static LOGGER: Logger = Logger;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{:>5} {}",
                record.level().style(style(record.level())),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Chooses a [LevelFilter] from the command-line flags. `debug` wins over `verbose`.
pub fn level(debug: bool, verbose: bool) -> LevelFilter {
    match (debug, verbose) {
        (true, _) => LevelFilter::Trace,
        (false, true) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    }
}

/// Installs the logger. Does nothing if a logger was already installed.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn style(level: Level) -> Style {
    match level {
        Level::Error => Style::new().bold().red(),
        Level::Warn => Style::new().yellow(),
        Level::Info => Style::new().green(),
        Level::Debug => Style::new().blue(),
        Level::Trace => Style::new().bright_black(),
    }
}
