//! Import source rewriting

use super::swc::{byte_range, module_of, parse_module, wtf8_to_string};
use crate::config::ScriptDialect;
use crate::diagnostics::StoryweldResult;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Spanned;
use std::ops::Range;
use tracing::debug;

/// Rewrite module specifiers of imports and re-exports from `from` to `to`.
///
/// The package itself and its `/blocks` entry point become `to`; any other
/// subpath `from/<path>` becomes `to/<path>`. Only the string literals are
/// edited; the rest of the text is unchanged.
pub fn rewrite_import_source(
    text: &str,
    from: &str,
    to: &str,
    dialect: ScriptDialect,
    context: &str,
) -> StoryweldResult<String> {
    if !text.contains(from) {
        return Ok(text.to_string());
    }
    let parsed = parse_module(text, dialect.media_type(), context)?;
    let module = module_of(&parsed, context)?;
    let blocks_entry = format!("{}/blocks", from);

    let mut edits: Vec<(Range<usize>, String)> = module
        .body
        .iter()
        .filter_map(module_source)
        .filter_map(|src| {
            let value = wtf8_to_string(src);
            let target = if value == from || value == blocks_entry {
                to.to_string()
            } else {
                let path = value.strip_prefix(from)?.strip_prefix('/')?;
                format!("{}/{}", to, path)
            };
            let range = byte_range(src.span());
            let quote = text[range.clone()].chars().next().unwrap_or('\'');
            Some((range, format!("{quote}{target}{quote}")))
        })
        .collect();

    debug!(context = %context, edits = edits.len(), "storyweld.rewrite_import_source");

    let mut out = text.to_string();
    edits.sort_by_key(|(range, _)| std::cmp::Reverse(range.start));
    for (range, replacement) in edits {
        out.replace_range(range, &replacement);
    }
    Ok(out)
}

/// Namespace import of a sibling module
pub fn namespace_import(namespace: &str, specifier: &str) -> String {
    format!("import * as {} from '{}';", namespace, specifier)
}

fn module_source(item: &swc_ast::ModuleItem) -> Option<&swc_ast::Str> {
    let swc_ast::ModuleItem::ModuleDecl(decl) = item else {
        return None;
    };
    match decl {
        swc_ast::ModuleDecl::Import(import) => Some(&*import.src),
        swc_ast::ModuleDecl::ExportNamed(export) => export.src.as_deref(),
        swc_ast::ModuleDecl::ExportAll(export) => Some(&*export.src),
        _ => None,
    }
}
