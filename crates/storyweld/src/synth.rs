//! Story module synthesizer
//!
//! Builds the story module from the demoted script preamble and the
//! extracted metadata and stories:
//!
//! ```text
//! <preamble statements>
//! export default { <meta attributes> };
//! export const <Key> = { render?, name, <story attributes> };   // per story
//! ```

use crate::config::ScriptDialect;
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticsCollector, StoryweldResult};
use crate::naming::{property_key, quote_string};
use crate::rewrite::{Extraction, StoryRecord};
use crate::script::{parse_expression, ScriptProgram, Statement, StatementKind};
use storyweld_markup::{Attribute, AttributeValue, Node};
use tracing::debug;

const INDENT: &str = "  ";

/// Turns extracted records into module statements
pub struct ModuleSynthesizer<'a> {
    dialect: ScriptDialect,
    diagnostics: &'a mut DiagnosticsCollector,
}

impl<'a> ModuleSynthesizer<'a> {
    /// Create a synthesizer
    pub fn new(dialect: ScriptDialect, diagnostics: &'a mut DiagnosticsCollector) -> Self {
        Self {
            dialect,
            diagnostics,
        }
    }

    /// Append the default export and one named export per story to `preamble`
    pub fn synthesize(
        &mut self,
        mut preamble: ScriptProgram,
        extraction: &Extraction,
    ) -> StoryweldResult<ScriptProgram> {
        let mut meta = ObjectLiteral::default();
        match &extraction.meta {
            Some(attributes) => {
                for attribute in attributes {
                    meta.push(self.property(attribute, "`Meta`")?);
                }
            }
            None => self.diagnostics.add(Diagnostic::new(
                DiagnosticCode::MissingMeta,
                "no `<Meta>` element; the default export is empty",
            )),
        }
        preamble.append(Statement::new(
            StatementKind::DefaultExport,
            format!("export default {};", meta.render()),
        ));

        for (key, record) in &extraction.stories {
            let object = self.story_object(record)?;
            preamble.append(Statement::new(
                StatementKind::NamedExport,
                format!("export const {} = {};", key, object.render()),
            ));
        }

        debug!(
            statements = preamble.statements().len(),
            stories = extraction.stories.len(),
            "storyweld.synthesize"
        );
        Ok(preamble)
    }

    fn story_object(&mut self, record: &StoryRecord) -> StoryweldResult<ObjectLiteral> {
        let owner = format!("story `{}`", record.name);
        let mut object = ObjectLiteral::default();

        if let Some(render) = self.render(record, &owner)? {
            object.push(format!("render: {}", render));
        }
        object.push(format!("name: {}", quote_string(&record.name)));
        for attribute in &record.attributes {
            object.push(self.property(attribute, &owner)?);
        }
        Ok(object)
    }

    /// Render function derived from the first significant child
    fn render(&mut self, record: &StoryRecord, owner: &str) -> StoryweldResult<Option<String>> {
        let mut significant = record.children.iter().filter(|child| !child.is_blank());
        let Some(first) = significant.next() else {
            return Ok(None);
        };
        if significant.next().is_some() {
            self.diagnostics.report(
                DiagnosticCode::ExtraStoryChildren,
                record.position,
                format!("{} has more than one child; only the first is used", owner),
            );
        }

        let context = format!("body of {}", owner);
        let render = match first {
            Node::Expression(expression) => {
                let parsed = parse_expression(&expression.value, self.dialect, &context)?;
                if parsed.is_bound_function() {
                    parsed.source().to_string()
                } else {
                    parsed.to_thunk()
                }
            }
            Node::Element(element) if self.dialect.supports_jsx() => {
                parse_expression(&element.to_string(), self.dialect, &context)?.to_thunk()
            }
            Node::Element(_) => {
                self.diagnostics.report(
                    DiagnosticCode::ProseStoryBody,
                    record.position,
                    format!(
                        "{} has a JSX body but the `{}` parser has no JSX; no render function generated",
                        owner, self.dialect
                    ),
                );
                return Ok(None);
            }
            Node::Text(_) | Node::Script(_) => {
                self.diagnostics.report(
                    DiagnosticCode::ProseStoryBody,
                    record.position,
                    format!("{} has a prose body; no render function generated", owner),
                );
                return Ok(None);
            }
        };
        Ok(Some(dedent_continuation(&render)))
    }

    /// Object property for an element attribute
    fn property(&self, attribute: &Attribute, owner: &str) -> StoryweldResult<String> {
        let property = match attribute {
            Attribute::Property { name, value: None } => {
                format!("{}: true", property_key(name))
            }
            Attribute::Property {
                name,
                value: Some(AttributeValue::Literal(value)),
            } => format!("{}: {}", property_key(name), quote_string(value)),
            Attribute::Property {
                name,
                value: Some(AttributeValue::Expression(source)),
            } => {
                let context = format!("attribute `{}` of {}", name, owner);
                let parsed = parse_expression(source, self.dialect, &context)?;
                format!("{}: {}", property_key(name), dedent_continuation(parsed.source()))
            }
            Attribute::Spread { expression } => {
                let context = format!("spread attribute of {}", owner);
                let parsed = parse_expression(expression, self.dialect, &context)?;
                format!("...{}", dedent_continuation(parsed.source()))
            }
        };
        Ok(property)
    }
}

/// Properties of an object literal, printed one per line
#[derive(Debug, Default)]
struct ObjectLiteral {
    properties: Vec<String>,
}

impl ObjectLiteral {
    fn push(&mut self, property: String) {
        self.properties.push(property);
    }

    fn render(&self) -> String {
        if self.properties.is_empty() {
            return "{}".to_string();
        }
        let mut out = String::from("{\n");
        for property in &self.properties {
            for (i, line) in property.lines().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                if !line.is_empty() {
                    out.push_str(INDENT);
                    out.push_str(line);
                }
            }
            out.push_str(",\n");
        }
        out.push('}');
        out
    }
}

/// Remove the indentation shared by all lines after the first
///
/// Expressions taken from the document keep the indentation they had
/// there; their first line starts at the attribute, the rest are indented
/// relative to the document.
fn dedent_continuation(text: &str) -> String {
    let mut lines = text.lines();
    let Some(first) = lines.next() else {
        return String::new();
    };
    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = first.to_string();
    for line in rest {
        out.push('\n');
        out.push_str(line.get(indent..).unwrap_or("").trim_end());
    }
    out
}
