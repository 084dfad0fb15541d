//! Logging setup for the console binary.

use crate::matcher::{Logger, EVENT_TARGET};
use colored::Colorize;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::io::Write;
use std::sync::Arc;

/// Default log4rs configuration file, relative to the working directory.
pub const LOG_CONFIG: &str = "log4rs.yml";

// Keep in sync with the stderr appender pattern in log4rs.yml.
const STDERR_PATTERN: &str = "{d(%H:%M:%S)} {h({l})} {t} - {m}{n}";

/// Initialise log4rs from [`LOG_CONFIG`], or a stderr appender at `warn` when
/// the file can't be loaded.
pub fn init_logging() -> Result<(), Box<dyn Error>> {
    let file_err = match log4rs::init_file(LOG_CONFIG, Default::default()) {
        Ok(()) => {
            log::debug!("Logging configured from {LOG_CONFIG}");
            return Ok(());
        }
        Err(e) => e,
    };

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(STDERR_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    log::debug!("{LOG_CONFIG} not loaded ({file_err}), logging to stderr");
    Ok(())
}

/// Write one event line to `out`. A failed write is logged, never raised.
pub fn write_event<W: Write>(out: &mut W, line: &str) {
    if let Err(e) = writeln!(out, "{}", line.dimmed()) {
        log::warn!("Could not echo matcher event: {e}");
    }
}

/// Event callback for the console: forwards to the log and echoes to stdout.
pub fn console_logger() -> Logger {
    Arc::new(|line: &str| {
        log::debug!(target: EVENT_TARGET, "{line}");
        write_event(&mut std::io::stdout().lock(), line);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_write_event() {
        let mut out = Vec::new();
        write_event(&mut out, "10.0.0.0 255.0.0.0 added");
        assert!(String::from_utf8(out).unwrap().contains("10.0.0.0 255.0.0.0 added"));
    }

    #[test]
    fn test_write_event_broken_pipe_does_not_panic() {
        write_event(&mut ClosedPipe, "10.0.0.9 added to cache");
    }
}
