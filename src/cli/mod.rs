//! Interactive console for the matcher.
//!
//! - [`command`] - Command parsing and dispatch
//! - [`terminal`] - Prompt, help menu and row formatting
//! - [`logging`] - log4rs setup and the console event logger

mod command;
mod logging;
mod terminal;

pub use command::{execute, parse_command, Command};
pub use logging::{console_logger, init_logging, write_event};
pub use terminal::{format_cached, menu, PROMPT};

use crate::matcher::Matcher;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Read commands from `input` until `q` or end of input, writing results to `output`.
///
/// Lines that do not parse are ignored. Matcher errors are reported and the
/// loop carries on.
pub fn run<R: BufRead, W: Write>(matcher: &Matcher, input: R, mut output: W) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;

        let Some(command) = parse_command(&line) else {
            log::trace!("Ignoring input: {line:?}");
            continue;
        };
        if command == Command::Quit {
            break;
        }

        match execute(matcher, &command) {
            Ok(result) => {
                for row in result {
                    writeln!(output, "{row}")?;
                }
            }
            Err(e) => {
                log::warn!("{command:?} failed: {e}");
                writeln!(output, "{}", e.to_string().red())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(script: &str) -> String {
        let matcher = Matcher::new();
        let mut out = Vec::new();
        run(&matcher, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_run_session() {
        let out = session(
            "add 10.0.0.0 255.255.255.0\nmatch 10.0.0.9\nmatch 10.0.1.9\nall\nq\nmatch 10.0.0.9\n",
        );
        assert!(out.contains("10.0.0.9 matches"));
        assert!(out.contains("10.0.1.9 does not match"));
        assert!(out.contains("  10.0.0.0/255.255.255.0"));
        assert_eq!(out.matches("10.0.0.9 matches").count(), 1, "nothing runs after q");
    }

    #[test]
    fn test_run_reports_errors_and_continues() {
        let out = session("match nope\nadd 10.0.0\nall\n");
        assert!(out.contains("invalid IPv4 address: 'nope'"));
        assert!(out.contains("(none)"));
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let out = session("");
        assert_eq!(out.trim_end(), PROMPT.trim_end());
    }
}
