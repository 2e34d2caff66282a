//! String and template literals of a parsed module
//!
//! The formatter edits text line by line, so it needs to know where the
//! parser found string literals (to requote them) and which stretches of
//! text are literal content that must keep its exact bytes.

use crate::script::swc::byte_range;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Spanned;
use deno_ast::swc::ecma_visit::{Visit, VisitWith};
use std::ops::Range;

/// Literal ranges found in a module
#[derive(Debug, Default)]
pub(crate) struct Literals {
    /// Single-line string literals outside JSX attributes, quotes included
    pub(crate) strings: Vec<Range<usize>>,
    /// Template literals and strings with line continuations
    pub(crate) verbatim: Vec<Range<usize>>,
}

impl Literals {
    /// Collect the literals of `module`, whose spans index into `text`
    pub(crate) fn collect(module: &swc_ast::Module, text: &str) -> Self {
        let mut collector = LiteralCollector {
            text,
            literals: Literals::default(),
        };
        module.visit_with(&mut collector);
        collector.literals.strings.sort_by_key(|range| range.start);
        collector.literals
    }

    /// Whether a line starting at `offset` begins inside literal content
    pub(crate) fn is_verbatim_line(&self, offset: usize) -> bool {
        self.verbatim
            .iter()
            .any(|range| range.start < offset && offset < range.end)
    }
}

struct LiteralCollector<'a> {
    text: &'a str,
    literals: Literals,
}

impl Visit for LiteralCollector<'_> {
    fn visit_str(&mut self, node: &swc_ast::Str) {
        let range = byte_range(node.span());
        match self.text.get(range.clone()) {
            Some(raw) if raw.contains('\n') => self.literals.verbatim.push(range),
            Some(raw) if raw.starts_with(['\'', '"']) => self.literals.strings.push(range),
            _ => {}
        }
    }

    fn visit_tpl(&mut self, node: &swc_ast::Tpl) {
        self.literals.verbatim.push(byte_range(node.span()));
        node.visit_children_with(self);
    }

    fn visit_ts_tpl_lit_type(&mut self, node: &swc_ast::TsTplLitType) {
        self.literals.verbatim.push(byte_range(node.span()));
        node.visit_children_with(self);
    }

    // attribute strings keep their quotes, like JSX text
    fn visit_jsx_attr_value(&mut self, node: &swc_ast::JSXAttrValue) {
        if !matches!(node, swc_ast::JSXAttrValue::Str(_)) {
            node.visit_children_with(self);
        }
    }
}

/// Re-quote string content written between `quote`s, using the preferred
/// quote unless the other one needs fewer escapes
pub(crate) fn requote(content: &str, quote: char, prefer_single: bool) -> String {
    let (preferred, alternate) = if prefer_single {
        ('\'', '"')
    } else {
        ('"', '\'')
    };
    let preferred_count = content.matches(preferred).count();
    let alternate_count = content.matches(alternate).count();
    let target = if preferred_count > alternate_count {
        alternate
    } else {
        preferred
    };

    let mut out = String::with_capacity(content.len() + 2);
    out.push(target);
    if target == quote {
        out.push_str(content);
    } else {
        let mut chars = content.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    // the old quote no longer needs escaping
                    Some(escaped) if escaped == quote => out.push(escaped),
                    Some(escaped) => {
                        out.push('\\');
                        out.push(escaped);
                    }
                    None => out.push('\\'),
                },
                c if c == target => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }
    }
    out.push(target);
    out
}
