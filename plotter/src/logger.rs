use std::io::Write;

use chrono::Utc;
use log::{Log, Metadata, Record};

/// Writes this tool's log records to stderr.
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        Logger
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
            && (metadata.target().starts_with("airmass_plotter")
                || metadata.target().starts_with("horizons_client"))
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                std::io::stderr(),
                "{} {:<5} {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
