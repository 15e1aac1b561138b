//! Colourised line-oriented reporter.

use std::io::{self, Stdout, Write};

use colored::Colorize;
use log::debug;

use crate::error::Result;
use crate::reporter::{GroupContext, Reporter};
use crate::result::{CheckResult, ErrorRecord};

type Rgb = (u8, u8, u8);

const GROUP_COLOR: Rgb = (0xe5, 0xe5, 0x11);
const ERROR_COLOR: Rgb = (0xf5, 0x51, 0x11);
const SUCCESS_COLOR: Rgb = (0x23, 0xd1, 0x8b);

const GROUP_MARK: &str = "◎";
const PASS_MARK: &str = "✔";
const FAIL_MARK: &str = "✗";

/// Reporter that prints one line per group and check, then a numbered failure list.
///
/// Failures are buffered as [`ErrorRecord`]s, attributed to the group carried by the event, and
/// rendered by `report_end`.
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
    color: bool,
    errors: Vec<ErrorRecord>,
}

impl ConsoleReporter<Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Reporter writing colourised lines to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            color: true,
            errors: Vec::new(),
        }
    }

    /// Enable or disable colour escapes.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Failures recorded so far, in execution order.
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Forget recorded failures so the reporter can serve another run.
    pub fn reset(&mut self) {
        self.errors.clear();
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str, color: Rgb) -> Result<()> {
        if self.color {
            let (r, g, b) = color;
            writeln!(self.out, "{}", text.truecolor(r, g, b))?;
        } else {
            writeln!(self.out, "{text}")?;
        }
        Ok(())
    }

    fn blank(&mut self) -> Result<()> {
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn report_start(&mut self) -> Result<()> {
        self.reset();
        Ok(())
    }

    fn report_group(&mut self, group: &GroupContext) -> Result<()> {
        self.blank()?;
        self.line(&format!("{GROUP_MARK} {}", group.name), GROUP_COLOR)?;
        self.blank()
    }

    fn report_check(
        &mut self,
        group: &GroupContext,
        title: &str,
        result: &CheckResult,
    ) -> Result<()> {
        match result {
            CheckResult::Skip => {
                debug!("skip check {} {title}", group.name);
                Ok(())
            }
            CheckResult::Pass => self.line(&format!(" {PASS_MARK} {title}"), SUCCESS_COLOR),
            CheckResult::Fail(message) => {
                self.errors.push(ErrorRecord {
                    group: group.name.clone(),
                    title: title.to_string(),
                    message: message.clone(),
                });
                self.line(&format!(" {FAIL_MARK} {title}"), ERROR_COLOR)
            }
        }
    }

    fn report_info(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    fn report_end(&mut self) -> Result<()> {
        self.blank()?;
        if self.errors.is_empty() {
            self.line("All Check Passed", SUCCESS_COLOR)?;
        } else {
            self.line("Check Not Passed:", ERROR_COLOR)?;
            let lines: Vec<String> = self
                .errors
                .iter()
                .enumerate()
                .map(|(index, error)| {
                    format!(" {}. {} [ {} ]", index + 1, error.message, error.group)
                })
                .collect();
            for line in lines {
                self.line(&line, ERROR_COLOR)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
