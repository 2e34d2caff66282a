//! Embedded script analysis
//!
//! Parsing goes through deno_ast. Everything here works on source text plus
//! the byte ranges the parser reports, never on re-emitted code.

pub mod expression;
pub mod imports;
pub mod program;
pub mod swc;

pub use expression::{parse_expression, ParsedExpression};
pub use imports::{namespace_import, rewrite_import_source};
pub use program::{ScriptProgram, Statement, StatementKind};
