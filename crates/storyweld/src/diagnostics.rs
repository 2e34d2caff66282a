//! Error types and diagnostics
//!
//! Errors abort a transform. Diagnostics report things the transform
//! handled on its own (dropped stories, ignored children) so the caller can
//! show them next to the written files.

use std::path::PathBuf;
use storyweld_markup::{MarkupError, Position};
use thiserror::Error;

/// Result type for storyweld operations
pub type StoryweldResult<T> = Result<T, StoryweldError>;

/// Main error type for storyweld
#[derive(Debug, Error)]
pub enum StoryweldError {
    /// The documentation markup could not be parsed
    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),

    /// Embedded script or an attribute expression could not be parsed
    #[error("Script parse error in {context}: {message}")]
    ScriptParse { context: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoryweldError {
    /// Create a script parse error
    pub fn script_parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        StoryweldError::ScriptParse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        StoryweldError::Config(message.into())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Warning - the output differs from what the author probably meant
    Warning,
    /// Info - informational message
    Info,
}

impl DiagnosticSeverity {
    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        }
    }
}

/// Diagnostic codes reported by the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A story without a literal `name` was removed
    UnnamedStory,
    /// Two stories map to the same export name; the later one wins
    DuplicateStory,
    /// Story children after the first were ignored
    ExtraStoryChildren,
    /// The story body is prose, so no render function was generated
    ProseStoryBody,
    /// No `Meta` element; the default export is empty
    MissingMeta,
    /// More than one `Meta` element; their attributes were merged
    MultipleMeta,
    /// A derived name is not a valid identifier
    InvalidIdentifier,
    /// An export statement cannot be carried into the story module
    DroppedExport,
    /// The story module does not parse, so it was written unformatted
    UnformattedModule,
}

impl DiagnosticCode {
    /// Short code used in output (`SW001`...)
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UnnamedStory => "SW001",
            DiagnosticCode::DuplicateStory => "SW002",
            DiagnosticCode::ExtraStoryChildren => "SW003",
            DiagnosticCode::ProseStoryBody => "SW004",
            DiagnosticCode::MissingMeta => "SW005",
            DiagnosticCode::MultipleMeta => "SW006",
            DiagnosticCode::InvalidIdentifier => "SW007",
            DiagnosticCode::DroppedExport => "SW008",
            DiagnosticCode::UnformattedModule => "SW009",
        }
    }

    fn severity(&self) -> DiagnosticSeverity {
        match self {
            DiagnosticCode::ProseStoryBody | DiagnosticCode::DroppedExport => {
                DiagnosticSeverity::Info
            }
            _ => DiagnosticSeverity::Warning,
        }
    }
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Diagnostic code
    pub code: DiagnosticCode,
    /// Message
    pub message: String,
    /// Source file
    pub file: Option<PathBuf>,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed)
    pub col: Option<usize>,
}

impl Diagnostic {
    /// Create a new diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            message: message.into(),
            file: None,
            line: None,
            col: None,
        }
    }

    /// Set the source file
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the location
    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.line = Some(line);
        self.col = Some(col);
        self
    }

    /// Set the location from a markup position
    pub fn at_position(self, position: Position) -> Self {
        self.at(position.line, position.column)
    }

    fn location(&self) -> Option<String> {
        let file = self.file.as_ref()?;
        let mut location = file.display().to_string();
        if let Some(line) = self.line {
            location.push_str(&format!(":{}", line));
            if let Some(col) = self.col {
                location.push_str(&format!(":{}", col));
            }
        }
        Some(location)
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = String::new();
        if let Some(location) = self.location() {
            result.push_str(&location);
            result.push_str(": ");
        } else if let (Some(line), Some(col)) = (self.line, self.col) {
            result.push_str(&format!("{}:{}: ", line, col));
        }
        result.push_str(self.severity.display());
        result.push('[');
        result.push_str(self.code.as_str());
        result.push_str("]: ");
        result.push_str(&self.message);
        result
    }
}

/// Collector for diagnostics during a transform
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    file: Option<PathBuf>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector that stamps every diagnostic with `file`
    pub fn for_file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic
    pub fn add(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.file.is_none() {
            diagnostic.file = self.file.clone();
        }
        self.diagnostics.push(diagnostic);
    }

    /// Add a diagnostic pointing at a markup position
    pub fn report(&mut self, code: DiagnosticCode, position: Position, message: impl Into<String>) {
        self.add(Diagnostic::new(code, message).at_position(position));
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get warning count
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Consume the collector
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_parse_error() {
        let err = StoryweldError::script_parse("attribute `args`", "Expression expected");
        assert!(err.to_string().contains("attribute `args`"));
        assert!(err.to_string().contains("Expression expected"));
    }

    #[test]
    fn test_markup_error_converts() {
        let err: StoryweldError = MarkupError::UnterminatedExpression {
            position: Position::new(2, 3, 10),
        }
        .into();
        assert!(err.to_string().starts_with("Markup error: 2:3"));
    }

    #[test]
    fn test_diagnostic_format() {
        let diag = Diagnostic::new(DiagnosticCode::UnnamedStory, "story has no name")
            .in_file("Button.stories.mdx")
            .at(10, 1);

        assert_eq!(diag.severity, DiagnosticSeverity::Warning);
        assert_eq!(
            diag.format(),
            "Button.stories.mdx:10:1: warning[SW001]: story has no name"
        );
    }

    #[test]
    fn test_collector_stamps_file() {
        let mut collector = DiagnosticsCollector::for_file("a.mdx");
        collector.report(DiagnosticCode::MultipleMeta, Position::new(4, 1, 30), "second Meta");
        collector.add(Diagnostic::new(DiagnosticCode::DroppedExport, "dropped"));

        assert_eq!(collector.warning_count(), 1);
        let diagnostics = collector.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.file.as_deref() == Some(std::path::Path::new("a.mdx"))));
        assert_eq!(diagnostics[1].severity, DiagnosticSeverity::Info);
    }
}
