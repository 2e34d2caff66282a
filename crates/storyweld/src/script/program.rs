//! Statement lists built from embedded script
//!
//! A [`ScriptProgram`] keeps each top-level statement as source text along
//! with what kind of statement it is. Statements can be demoted (an
//! `export` keyword removed) or appended, and the list prints back to
//! source with imports grouped together.

use super::swc::{byte_range, module_of, parse_module};
use crate::config::ScriptDialect;
use crate::diagnostics::StoryweldResult;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Spanned;

/// What a top-level statement is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `import ...`
    Import,
    /// Any statement without an `export`
    Statement,
    /// `export <declaration>` or `export default <named declaration>`
    ExportDeclaration,
    /// `export { ... }`, `export * from`, `export default <expr>` and
    /// other exports without a declaration of their own
    Export,
    /// `export default { ... }` produced by the synthesizer
    DefaultExport,
    /// `export const Name = { ... }` produced by the synthesizer
    NamedExport,
    /// Comments after the last statement
    Trivia,
}

/// One top-level statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    kind: StatementKind,
    text: String,
    /// For export declarations, offsets in `text` of the `export` keyword
    /// and of the declaration that follows it
    declaration: Option<(usize, usize)>,
}

impl Statement {
    /// Create a statement from source text
    pub fn new(kind: StatementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            declaration: None,
        }
    }

    /// Statement kind
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Source text, including leading comments
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Remove the `export` (or `export default`) keyword in front of the
    /// declaration. Returns `false` for statements that have no declaration.
    fn demote(&mut self) -> bool {
        let Some((keyword, declaration)) = self.declaration.take() else {
            return false;
        };
        self.text.replace_range(keyword..declaration, "");
        self.kind = StatementKind::Statement;
        true
    }
}

/// A parsed statement list
#[derive(Debug, Clone, Default)]
pub struct ScriptProgram {
    statements: Vec<Statement>,
}

impl ScriptProgram {
    /// Create an empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse script text into a statement list
    pub fn parse(text: &str, dialect: ScriptDialect, context: &str) -> StoryweldResult<Self> {
        let parsed = parse_module(text, dialect.media_type(), context)?;
        let module = module_of(&parsed, context)?;

        let mut statements = Vec::with_capacity(module.body.len() + 1);
        let mut prev_end = 0;
        for item in &module.body {
            let range = byte_range(item.span());
            // leading comments travel with the statement
            let chunk = &text[prev_end..range.end];
            let trimmed = chunk.trim_start();
            let base = prev_end + (chunk.len() - trimmed.len());
            prev_end = range.end;

            let mut statement = Statement::new(classify(item), trimmed);
            if let Some(decl_start) = declaration_start(item) {
                statement.declaration = Some((range.start - base, decl_start - base));
            }
            statements.push(statement);
        }

        let rest = text[prev_end..].trim();
        if !rest.is_empty() {
            statements.push(Statement::new(StatementKind::Trivia, rest));
        }

        Ok(Self { statements })
    }

    /// Statements in order
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Append a statement
    pub fn append(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Turn every `export <declaration>` into a plain declaration.
    ///
    /// Exports that have no declaration to keep (`export { a }`,
    /// `export * from`, `export default <expression>`) are removed and
    /// returned.
    pub fn demote_named_exports(&mut self) -> Vec<Statement> {
        let mut dropped = Vec::new();
        self.statements.retain_mut(|statement| match statement.kind {
            StatementKind::ExportDeclaration => statement.demote(),
            StatementKind::Export => {
                dropped.push(statement.clone());
                false
            }
            _ => true,
        });
        dropped
    }

    /// Print the statements back to source
    ///
    /// Consecutive imports go on consecutive lines; every other statement is
    /// separated from its neighbours by a blank line.
    pub fn print(&self) -> String {
        let mut out = String::new();
        let mut prev: Option<StatementKind> = None;
        for statement in &self.statements {
            match prev {
                Some(StatementKind::Import) if statement.kind == StatementKind::Import => {
                    out.push('\n')
                }
                Some(_) => out.push_str("\n\n"),
                None => {}
            }
            out.push_str(&statement.text);
            prev = Some(statement.kind);
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

fn classify(item: &swc_ast::ModuleItem) -> StatementKind {
    match item {
        swc_ast::ModuleItem::ModuleDecl(decl) => match decl {
            swc_ast::ModuleDecl::Import(_) => StatementKind::Import,
            swc_ast::ModuleDecl::ExportDecl(_) => StatementKind::ExportDeclaration,
            swc_ast::ModuleDecl::ExportDefaultDecl(default) if default_decl_is_named(default) => {
                StatementKind::ExportDeclaration
            }
            swc_ast::ModuleDecl::TsImportEquals(_) => StatementKind::Statement,
            _ => StatementKind::Export,
        },
        swc_ast::ModuleItem::Stmt(_) => StatementKind::Statement,
    }
}

fn default_decl_is_named(default: &swc_ast::ExportDefaultDecl) -> bool {
    match &default.decl {
        swc_ast::DefaultDecl::Class(class) => class.ident.is_some(),
        swc_ast::DefaultDecl::Fn(function) => function.ident.is_some(),
        swc_ast::DefaultDecl::TsInterfaceDecl(_) => true,
    }
}

/// Absolute byte offset where the exported declaration begins
fn declaration_start(item: &swc_ast::ModuleItem) -> Option<usize> {
    let swc_ast::ModuleItem::ModuleDecl(decl) = item else {
        return None;
    };
    match decl {
        swc_ast::ModuleDecl::ExportDecl(export) => Some(byte_range(export.decl.span()).start),
        swc_ast::ModuleDecl::ExportDefaultDecl(default) if default_decl_is_named(default) => {
            Some(byte_range(default.decl.span()).start)
        }
        _ => None,
    }
}
