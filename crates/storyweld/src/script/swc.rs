//! SWC/deno_ast parsing utilities
//!
//! Embedded script is only ever parsed, never re-emitted: edits are applied
//! to the original text at the byte ranges the parser reports, so code the
//! transform does not touch keeps its exact formatting.

use crate::diagnostics::{StoryweldError, StoryweldResult};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Span;
use deno_ast::{MediaType, ParseParams, ParsedSource, SourcePos, StartSourcePos};
use std::ops::Range;
use std::sync::Arc;

/// Parse script text as a module
///
/// `context` names the source in error messages (e.g. "script block 2").
pub fn parse_module(
    text: &str,
    media_type: MediaType,
    context: &str,
) -> StoryweldResult<ParsedSource> {
    let extension = match media_type {
        MediaType::TypeScript => "ts",
        MediaType::Jsx => "jsx",
        MediaType::JavaScript => "js",
        _ => "tsx",
    };
    let specifier = format!("file:///storyweld/embedded.{}", extension);
    let specifier = deno_ast::ModuleSpecifier::parse(&specifier)
        .map_err(|e| StoryweldError::script_parse(context, e.to_string()))?;

    let parsed = deno_ast::parse_module(ParseParams {
        specifier,
        text: Arc::from(text),
        media_type,
        capture_tokens: false,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| StoryweldError::script_parse(context, e.to_string()))?;

    // recoverable errors still mean the input is not valid script
    if let Some(diagnostic) = parsed.diagnostics().first() {
        return Err(StoryweldError::script_parse(context, diagnostic.to_string()));
    }
    Ok(parsed)
}

/// Get the module AST
pub fn module_of<'a>(parsed: &'a ParsedSource, context: &str) -> StoryweldResult<&'a swc_ast::Module> {
    match parsed.program_ref() {
        deno_ast::ProgramRef::Module(m) => Ok(m),
        deno_ast::ProgramRef::Script(_) => Err(StoryweldError::script_parse(
            context,
            "expected a module, got a script",
        )),
    }
}

/// Byte range of a span within the parsed text
pub fn byte_range(span: Span) -> Range<usize> {
    let start = StartSourcePos::START_SOURCE_POS;
    let lo = SourcePos::unsafely_from_byte_pos(span.lo).as_byte_index(start);
    let hi = SourcePos::unsafely_from_byte_pos(span.hi).as_byte_index(start);
    lo..hi
}

/// Helper to convert Wtf8Atom to String
pub fn wtf8_to_string(s: &swc_ast::Str) -> String {
    String::from_utf8_lossy(s.value.as_bytes()).into_owned()
}
