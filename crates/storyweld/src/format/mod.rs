//! Formatting of generated story modules
//!
//! The formatter only touches layout that the synthesizer controls or that
//! is safe to change textually:
//! - string quotes follow the configured preference
//! - trailing commas are removed when the style asks for none
//! - indentation is rescaled to the configured width (or tabs)
//! - runs of blank lines collapse to one, and the file ends with a newline
//!
//! Literal positions come from the parsed module, so text inside template
//! literals keeps its exact bytes. Text that does not parse as a module is
//! returned unchanged.

mod literals;
pub mod style;

pub use style::{StyleConfig, TrailingComma};

use crate::diagnostics::StoryweldResult;
use crate::script::swc::{module_of, parse_module};
use deno_ast::MediaType;
use literals::{requote, Literals};
use std::ops::Range;
use std::path::Path;
use tracing::{debug, warn};

/// Indentation unit of synthesized text
const SOURCE_INDENT: usize = 2;

/// Formats generated module text according to a [`StyleConfig`]
#[derive(Debug, Clone)]
pub struct ModuleFormatter {
    style: StyleConfig,
}

impl ModuleFormatter {
    /// Create a formatter for a style
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Get the style
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Format `text`, which will be written to `file_path`; text that does
    /// not parse is returned as is
    pub fn format(&self, text: &str, file_path: &Path) -> String {
        self.try_format(text, file_path).unwrap_or_else(|e| {
            warn!(file = %file_path.display(), error = %e, "storyweld.format: output left unformatted");
            text.to_string()
        })
    }

    /// Format `text`, failing when it does not parse as a module
    pub fn try_format(&self, text: &str, file_path: &Path) -> StoryweldResult<String> {
        let context = file_path.display().to_string();
        let parsed = parse_module(text, MediaType::from_path(file_path), &context)?;
        let literals = Literals::collect(module_of(&parsed, &context)?, text);

        let mut strings = literals.strings.iter().peekable();
        let mut lines: Vec<(String, bool)> = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            let end = offset + line.len();
            let mut edits = Vec::new();
            while let Some(range) = strings.next_if(|range| range.start < end) {
                edits.push(range.clone());
            }
            lines.push((
                self.requote_line(line, offset, &edits),
                literals.is_verbatim_line(offset),
            ));
            offset = end + 1;
        }

        if self.style.trailing_comma == TrailingComma::None {
            remove_trailing_commas(&mut lines);
        }

        let mut out = String::with_capacity(text.len());
        for (line, verbatim) in &lines {
            if *verbatim {
                out.push_str(line);
                out.push('\n');
                continue;
            }
            if line.trim().is_empty() {
                if !out.is_empty() && !out.ends_with("\n\n") {
                    out.push('\n');
                }
                continue;
            }
            out.push_str(&self.reindent(line));
            out.push('\n');
        }
        while out.ends_with("\n\n") {
            out.pop();
        }

        debug!(file = %context, strings = literals.strings.len(), "storyweld.format");
        Ok(out)
    }

    /// Apply quote preference to the string literals at `edits`, given in
    /// offsets of the whole text
    fn requote_line(&self, line: &str, offset: usize, edits: &[Range<usize>]) -> String {
        let mut out = line.to_string();
        for range in edits.iter().rev() {
            let local = range.start - offset..range.end - offset;
            let Some(raw) = line.get(local.clone()) else {
                continue;
            };
            let Some(quote) = raw.chars().next() else {
                continue;
            };
            if raw.len() < 2 {
                continue;
            }
            let replacement = requote(&raw[1..raw.len() - 1], quote, self.style.single_quote);
            out.replace_range(local, &replacement);
        }
        out
    }

    fn reindent(&self, line: &str) -> String {
        let content = line.trim_start_matches(' ');
        let spaces = line.len() - content.len();
        let (level, rest) = (spaces / SOURCE_INDENT, spaces % SOURCE_INDENT);
        let indent = if self.style.use_tabs {
            format!("{}{}", "\t".repeat(level), " ".repeat(rest))
        } else {
            " ".repeat(level * self.style.tab_width + rest)
        };
        indent + content.trim_end()
    }
}

/// Drop commas that end a line when the next code line closes a bracket
fn remove_trailing_commas(lines: &mut [(String, bool)]) {
    for i in 0..lines.len() {
        if lines[i].1 || !lines[i].0.trim_end().ends_with(',') {
            continue;
        }
        let closes = lines[i + 1..]
            .iter()
            .find(|(line, _)| !line.trim().is_empty())
            .is_some_and(|(line, protected)| {
                !protected && line.trim_start().starts_with(['}', ']', ')'])
            });
        if closes {
            let line = &mut lines[i].0;
            let kept = line.trim_end().len() - 1;
            line.truncate(kept);
        }
    }
}
