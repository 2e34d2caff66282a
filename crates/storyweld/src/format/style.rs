//! Style configuration discovery
//!
//! Looks for prettier configuration (`.prettierrc` as JSON or YAML,
//! `.prettierrc.json`, `.prettierrc.toml`, the `prettier` key of
//! `package.json`) and `.editorconfig`, walking up from a start directory.
//! Only the top-level options the formatter applies are read; per-file
//! `overrides` are ignored.

use crate::diagnostics::{StoryweldError, StoryweldResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Trailing comma policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingComma {
    /// Never print trailing commas
    None,
    /// Trailing commas where valid in ES5 (objects, arrays)
    Es5,
    /// Trailing commas wherever valid
    All,
}

/// Formatting style for generated modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    /// Spaces per indentation level
    pub tab_width: usize,
    /// Indent with tabs
    pub use_tabs: bool,
    /// Prefer single quotes for strings
    pub single_quote: bool,
    /// Trailing comma policy
    pub trailing_comma: TrailingComma,
}

/// Used when no configuration is found
impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            tab_width: 2,
            use_tabs: false,
            single_quote: true,
            trailing_comma: TrailingComma::Es5,
        }
    }
}

/// Prettier options as written in configuration files
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrettierOptions {
    tab_width: Option<usize>,
    use_tabs: Option<bool>,
    single_quote: Option<bool>,
    trailing_comma: Option<String>,
}

/// Options read from `.editorconfig`
#[derive(Debug, Default, PartialEq, Eq)]
struct EditorConfig {
    use_tabs: Option<bool>,
    indent_size: Option<usize>,
}

impl StyleConfig {
    /// Prettier's own defaults, the base for any discovered configuration
    fn prettier_defaults() -> Self {
        Self {
            tab_width: 2,
            use_tabs: false,
            single_quote: false,
            trailing_comma: TrailingComma::All,
        }
    }

    /// Discover configuration starting at `start`, walking up to the root.
    ///
    /// Returns `Ok(None)` when nothing is found.
    pub fn discover(start: &Path) -> StoryweldResult<Option<Self>> {
        let mut prettier = None;
        let mut editorconfig = None;

        for dir in start.ancestors() {
            if prettier.is_none() {
                prettier = read_prettier(dir)?;
            }
            if editorconfig.is_none() {
                let path = dir.join(".editorconfig");
                if path.is_file() {
                    editorconfig = Some(parse_editorconfig(&fs::read_to_string(&path)?));
                }
            }
            if prettier.is_some() && editorconfig.is_some() {
                break;
            }
        }

        if prettier.is_none() && editorconfig.is_none() {
            return Ok(None);
        }

        let mut style = Self::prettier_defaults();
        if let Some(editor) = editorconfig {
            if let Some(use_tabs) = editor.use_tabs {
                style.use_tabs = use_tabs;
            }
            if let Some(size) = editor.indent_size {
                style.tab_width = size;
            }
        }
        if let Some(options) = prettier {
            style.apply(options)?;
        }
        debug!(?style, start = %start.display(), "storyweld.style.discovered");
        Ok(Some(style))
    }

    /// Discover configuration, falling back to [`StyleConfig::default`]
    pub fn discover_or_default(start: &Path) -> Self {
        match Self::discover(start) {
            Ok(Some(style)) => style,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "storyweld.style: falling back to the default style");
                Self::default()
            }
        }
    }

    fn apply(&mut self, options: PrettierOptions) -> StoryweldResult<()> {
        if let Some(tab_width) = options.tab_width {
            self.tab_width = tab_width;
        }
        if let Some(use_tabs) = options.use_tabs {
            self.use_tabs = use_tabs;
        }
        if let Some(single_quote) = options.single_quote {
            self.single_quote = single_quote;
        }
        if let Some(trailing_comma) = options.trailing_comma {
            self.trailing_comma = match trailing_comma.as_str() {
                "none" => TrailingComma::None,
                "es5" => TrailingComma::Es5,
                "all" => TrailingComma::All,
                other => {
                    return Err(StoryweldError::config(format!(
                        "unknown trailingComma value `{}`",
                        other
                    )))
                }
            };
        }
        Ok(())
    }
}

fn read_prettier(dir: &Path) -> StoryweldResult<Option<PrettierOptions>> {
    let rc = dir.join(".prettierrc");
    if rc.is_file() {
        let options = parse_prettierrc(&rc, &fs::read_to_string(&rc)?)?;
        return Ok(Some(options));
    }

    let json = dir.join(".prettierrc.json");
    if json.is_file() {
        let options = serde_json::from_str(&fs::read_to_string(&json)?)
            .map_err(|e| StoryweldError::config(format!("{}: {}", json.display(), e)))?;
        return Ok(Some(options));
    }

    let toml_path = dir.join(".prettierrc.toml");
    if toml_path.is_file() {
        let options = toml::from_str(&fs::read_to_string(&toml_path)?)
            .map_err(|e| StoryweldError::config(format!("{}: {}", toml_path.display(), e)))?;
        return Ok(Some(options));
    }

    let package = dir.join("package.json");
    if package.is_file() {
        let manifest: serde_json::Value = serde_json::from_str(&fs::read_to_string(&package)?)
            .map_err(|e| StoryweldError::config(format!("{}: {}", package.display(), e)))?;
        // a string value names a shared config package, which is not followed
        if let Some(section) = manifest.get("prettier").filter(|v| v.is_object()) {
            let options = serde_json::from_value(section.clone())
                .map_err(|e| StoryweldError::config(format!("{}: {}", package.display(), e)))?;
            return Ok(Some(options));
        }
    }

    Ok(None)
}

/// `.prettierrc` is JSON or YAML
fn parse_prettierrc(path: &Path, text: &str) -> StoryweldResult<PrettierOptions> {
    if text.trim().is_empty() {
        return Ok(PrettierOptions::default());
    }
    serde_json::from_str(text).or_else(|_| {
        serde_yaml::from_str(text)
            .map_err(|e| StoryweldError::config(format!("{}: {}", path.display(), e)))
    })
}

/// Read indentation settings from sections that apply to script files
fn parse_editorconfig(text: &str) -> EditorConfig {
    let mut config = EditorConfig::default();
    let mut applies = false;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            applies = section == "*"
                || ["ts", "tsx", "js", "jsx"]
                    .iter()
                    .any(|ext| section.contains(ext) && section.starts_with('*'));
            continue;
        }
        if !applies {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().to_ascii_lowercase();
        match key.trim().to_ascii_lowercase().as_str() {
            "indent_style" => config.use_tabs = Some(value == "tab"),
            "indent_size" | "tab_width" => {
                if let Ok(size) = value.parse() {
                    config.indent_size = Some(size);
                }
            }
            _ => {}
        }
    }
    config
}
