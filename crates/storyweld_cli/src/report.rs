//! Colored diagnostic output

use std::io::{self, Write};
use storyweld::{Diagnostic, DiagnosticSeverity};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Counts across a migration run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub migrated: usize,
    pub failed: usize,
    pub warnings: usize,
}

/// Writes diagnostics and the final summary to stderr
pub struct Reporter<W: WriteColor> {
    out: W,
}

impl Reporter<StandardStream> {
    /// Reporter on stderr
    pub fn stderr(use_color: bool) -> Self {
        let choice = if use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stderr(choice))
    }
}

impl<W: WriteColor> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Print one diagnostic as `file:line:col: warning[SW001]: message`
    pub fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        let color = match diagnostic.severity {
            DiagnosticSeverity::Warning => Color::Yellow,
            DiagnosticSeverity::Info => Color::Cyan,
        };

        if let Some(file) = &diagnostic.file {
            write!(self.out, "{}", file.display())?;
            if let (Some(line), Some(col)) = (diagnostic.line, diagnostic.col) {
                write!(self.out, ":{}:{}", line, col)?;
            }
            write!(self.out, ": ")?;
        }
        self.out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(
            self.out,
            "{}[{}]",
            diagnostic.severity.display(),
            diagnostic.code.as_str()
        )?;
        self.out.reset()?;
        writeln!(self.out, ": {}", diagnostic.message)
    }

    /// Print a failure for a file that could not be migrated
    pub fn failure(&mut self, file: &str, error: &anyhow::Error) -> io::Result<()> {
        write!(self.out, "{}: ", file)?;
        self.out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(self.out, "error")?;
        self.out.reset()?;
        writeln!(self.out, ": {:#}", error)
    }

    /// Print the closing summary line
    pub fn summary(&mut self, summary: &Summary) -> io::Result<()> {
        let color = if summary.failed > 0 {
            Color::Red
        } else if summary.warnings > 0 {
            Color::Yellow
        } else {
            Color::Green
        };
        writeln!(self.out)?;
        self.out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.out, "Migration complete")?;
        self.out.reset()?;
        writeln!(
            self.out,
            ": {} migrated, {} failed, {} warnings",
            summary.migrated, summary.failed, summary.warnings
        )
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}
