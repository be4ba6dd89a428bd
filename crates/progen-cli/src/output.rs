//! Output management and formatting.

use std::io;

use console::Term;
use owo_colors::OwoColorize;
use tracing::debug;

use progen_core::application::ports::OutputSink;

use crate::cli::global::GlobalArgs;
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        Self {
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&success_line(msg, self.no_color))
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// A sink for the session's streamed process output and banner.
    pub fn sink(&self) -> ConsoleSink {
        ConsoleSink {
            term: self.term.clone(),
            quiet: self.quiet,
            no_color: self.no_color,
        }
    }
}

fn success_line(msg: &str, no_color: bool) -> String {
    if no_color {
        format!("\u{2713} {msg}") // ✓
    } else {
        format!("{} {}", "\u{2713}".green().bold(), msg.green())
    }
}

/// Terminal-backed [`OutputSink`]: process lines verbatim, banners in green.
#[derive(Clone)]
pub struct ConsoleSink {
    term: Term,
    quiet: bool,
    no_color: bool,
}

impl ConsoleSink {
    fn write(&self, line: &str) {
        if self.quiet {
            return;
        }
        if let Err(e) = self.term.write_line(line) {
            debug!(error = %e, "Cannot write to terminal");
        }
    }
}

impl OutputSink for ConsoleSink {
    fn line(&self, text: &str) {
        self.write(text);
    }

    fn success(&self, text: &str) {
        self.write(&success_line(text, self.no_color));
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
