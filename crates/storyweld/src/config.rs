//! Transform configuration

use crate::diagnostics::StoryweldError;
use crate::format::StyleConfig;
use deno_ast::MediaType;
use std::fmt;
use std::str::FromStr;

/// Package the legacy documentation blocks were imported from
pub const LEGACY_BLOCKS_PACKAGE: &str = "@storybook/addon-docs";

/// Package the documentation blocks live in now
pub const BLOCKS_PACKAGE: &str = "@storybook/blocks";

/// Grammar used for embedded script blocks and attribute expressions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScriptDialect {
    /// TypeScript with JSX
    #[default]
    Tsx,
    /// TypeScript without JSX
    Ts,
    /// JavaScript with JSX (`babel`, `babylon`, `jsx`, `flow`, `js`)
    Jsx,
}

impl ScriptDialect {
    /// Media type handed to the script parser
    pub fn media_type(&self) -> MediaType {
        match self {
            ScriptDialect::Tsx => MediaType::Tsx,
            ScriptDialect::Ts => MediaType::TypeScript,
            ScriptDialect::Jsx => MediaType::Jsx,
        }
    }

    /// Whether JSX is part of the grammar
    pub fn supports_jsx(&self) -> bool {
        !matches!(self, ScriptDialect::Ts)
    }

    /// File extension of the generated story module
    pub fn module_extension(&self) -> &'static str {
        match self {
            ScriptDialect::Tsx | ScriptDialect::Ts => "tsx",
            ScriptDialect::Jsx => "jsx",
        }
    }
}

impl FromStr for ScriptDialect {
    type Err = StoryweldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tsx" => Ok(ScriptDialect::Tsx),
            "ts" | "typescript" => Ok(ScriptDialect::Ts),
            "babel" | "babylon" | "jsx" | "flow" | "js" => Ok(ScriptDialect::Jsx),
            other => Err(StoryweldError::config(format!(
                "unknown parser `{}` (expected tsx, ts, babel, babylon, jsx, flow or js)",
                other
            ))),
        }
    }
}

impl fmt::Display for ScriptDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptDialect::Tsx => "tsx",
            ScriptDialect::Ts => "ts",
            ScriptDialect::Jsx => "jsx",
        };
        f.write_str(name)
    }
}

/// Options for a [`crate::Transformer`]
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Script grammar
    pub dialect: ScriptDialect,
    /// Import source rewritten away from
    pub legacy_package: String,
    /// Import source rewritten to
    pub blocks_package: String,
    /// Formatting style; discovered from the working directory when unset
    pub style: Option<StyleConfig>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            dialect: ScriptDialect::default(),
            legacy_package: LEGACY_BLOCKS_PACKAGE.to_string(),
            blocks_package: BLOCKS_PACKAGE.to_string(),
            style: None,
        }
    }
}

impl TransformOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the script dialect
    pub fn dialect(mut self, dialect: ScriptDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the legacy package name
    pub fn legacy_package(mut self, package: impl Into<String>) -> Self {
        self.legacy_package = package.into();
        self
    }

    /// Set the replacement package name
    pub fn blocks_package(mut self, package: impl Into<String>) -> Self {
        self.blocks_package = package.into();
        self
    }

    /// Use a fixed formatting style instead of discovering one
    pub fn style(mut self, style: StyleConfig) -> Self {
        self.style = Some(style);
        self
    }
}
