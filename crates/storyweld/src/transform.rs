//! The transform entry point
//!
//! Ties the passes together for one document:
//!
//! 1. parse the markup
//! 2. rewrite legacy import sources in every script block, then add the
//!    namespace import of the story module to the first block
//! 3. rewrite `Meta`/`Story` elements, collecting their data
//! 4. print the documentation
//! 5. demote exports in the script preamble, synthesize the story module
//!    and format it

use crate::config::TransformOptions;
use crate::diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticSeverity, DiagnosticsCollector, StoryweldResult,
};
use crate::format::{ModuleFormatter, StyleConfig};
use crate::naming::{base_name, is_binding_identifier, module_specifier, namespace, story_file_name};
use crate::rewrite::ElementRewriter;
use crate::script::{namespace_import, rewrite_import_source, ScriptProgram};
use crate::synth::ModuleSynthesizer;
use std::path::Path;
use storyweld_markup::{parse, print, Node};
use tracing::{debug, info, warn};

/// The artifacts produced from one documentation file
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Rewritten documentation, to be written back to the input path
    pub documentation: String,
    /// Generated story module
    pub module: String,
    /// File name of the story module, a sibling of the input
    pub file_name: String,
    /// Non-fatal findings
    pub diagnostics: Vec<Diagnostic>,
}

impl TransformOutput {
    /// Number of warnings among the diagnostics
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }
}

/// Splits documentation files into documentation and story module
#[derive(Debug, Clone)]
pub struct Transformer {
    options: TransformOptions,
    formatter: ModuleFormatter,
}

impl Transformer {
    /// Create a transformer. Without an explicit style in `options`, the
    /// style is discovered from the working directory.
    pub fn new(options: TransformOptions) -> Self {
        let style = options.style.clone().unwrap_or_else(|| {
            std::env::current_dir()
                .map(|dir| StyleConfig::discover_or_default(&dir))
                .unwrap_or_default()
        });
        Self {
            options,
            formatter: ModuleFormatter::new(style),
        }
    }

    /// Options in use
    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Transform the contents of `file_name`
    pub fn transform(&self, source: &str, file_name: &str) -> StoryweldResult<TransformOutput> {
        let dialect = self.options.dialect;
        let mut diagnostics = DiagnosticsCollector::for_file(file_name);

        let leaf = Path::new(file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(file_name);
        let base = base_name(leaf);
        let namespace = namespace(base);
        if !is_binding_identifier(&namespace) {
            diagnostics.add(Diagnostic::new(
                DiagnosticCode::InvalidIdentifier,
                format!(
                    "file name `{}` gives the namespace `{}`, which is not a valid identifier",
                    leaf, namespace
                ),
            ));
        }

        let mut document = parse(source)?;

        let mut scripts = Vec::new();
        for (i, block) in document.script_blocks_mut().enumerate() {
            let context = format!("script block {}", i + 1);
            block.value = rewrite_import_source(
                &block.value,
                &self.options.legacy_package,
                &self.options.blocks_package,
                dialect,
                &context,
            )?;
            scripts.push(block.value.clone());
        }
        let mut preamble = ScriptProgram::parse(&scripts.join("\n\n"), dialect, "script blocks")?;

        let import = namespace_import(&namespace, &module_specifier(base));
        let first = document.script_blocks_mut().next();
        match first {
            Some(first) => {
                first.value.push('\n');
                first.value.push_str(&import);
            }
            None => {
                document.children.insert(0, Node::text("\n\n"));
                document.children.insert(0, Node::script(import));
            }
        }

        let extraction = ElementRewriter::new(&namespace, &mut diagnostics).rewrite(&mut document);
        let documentation = print(&document);

        for dropped in preamble.demote_named_exports() {
            diagnostics.add(Diagnostic::new(
                DiagnosticCode::DroppedExport,
                format!("`{}` dropped from the story module", first_line(dropped.text())),
            ));
        }

        let program = ModuleSynthesizer::new(dialect, &mut diagnostics).synthesize(preamble, &extraction)?;
        let new_file_name = story_file_name(base, dialect.module_extension());
        let printed = program.print();
        let module = match self.formatter.try_format(&printed, Path::new(&new_file_name)) {
            Ok(module) => module,
            Err(e) => {
                warn!(file = %file_name, error = %e, "storyweld.format: output left unformatted");
                diagnostics.add(Diagnostic::new(
                    DiagnosticCode::UnformattedModule,
                    format!("`{}` was written unformatted: {}", new_file_name, e),
                ));
                printed
            }
        };

        debug!(
            file = %file_name,
            stories = extraction.stories.len(),
            diagnostics = diagnostics.diagnostics().len(),
            "storyweld.transform"
        );
        info!(file = %file_name, output = %new_file_name, "storyweld.transform.done");

        Ok(TransformOutput {
            documentation,
            module,
            file_name: new_file_name,
            diagnostics: diagnostics.into_diagnostics(),
        })
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}

/// Transform with default options
pub fn transform(source: &str, file_name: &str) -> StoryweldResult<TransformOutput> {
    Transformer::default().transform(source, file_name)
}

fn first_line(text: &str) -> &str {
    text.lines()
        .find(|line| {
            let line = line.trim_start();
            !line.starts_with("//") && !line.starts_with("/*") && !line.starts_with('*')
        })
        .unwrap_or(text)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transformer() -> Transformer {
        Transformer::new(TransformOptions::new().style(StyleConfig::default()))
    }

    #[test]
    fn test_namespace_import_added_once() {
        let source = "import { Meta } from '@storybook/addon-docs';\n\nexport const a = 1;\n\n<Meta title=\"x\" />\n";
        let out = transformer().transform(source, "Foobar.stories.mdx").unwrap();
        assert_eq!(out.documentation.matches("import * as FoobarStories").count(), 1);
        assert!(!out.documentation.contains("addon-docs"));
    }

    #[test]
    fn test_invalid_namespace_is_reported() {
        let out = transformer()
            .transform("<Meta title=\"x\" />", "docs/my-button.stories.mdx")
            .unwrap();
        assert_eq!(out.file_name, "my-button.stories.tsx");
        assert_eq!(out.diagnostics[0].code, DiagnosticCode::InvalidIdentifier);
    }

    #[test]
    fn test_dropped_exports_are_reported() {
        let source = "export const a = 1;\nexport { a as b };\n\n<Meta title=\"x\" />\n";
        let out = transformer().transform(source, "A.mdx").unwrap();
        let dropped: Vec<_> = out
            .diagnostics
            .iter()
            .filter(|d| d.code == DiagnosticCode::DroppedExport)
            .collect();
        assert_eq!(dropped.len(), 1);
        assert!(dropped[0].message.contains("export { a as b };"));
        assert!(out.module.starts_with("const a = 1;\n"));
    }

    #[test]
    fn test_first_line_skips_comments() {
        assert_eq!(first_line("/** doc\n * more\n */\nexport { a };"), "export { a };");
    }
}
