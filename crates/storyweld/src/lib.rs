//! storyweld: Story documentation migration engine
//!
//! This crate splits an MDX story documentation file in two:
//! - a trimmed documentation file whose `Meta`/`Story` elements reference
//!   stories by name (`<Story of={ButtonStories.Primary} />`)
//! - a CSF story module holding the metadata as its default export and one
//!   named export per story
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────────────┐
//!              │  Button.mdx      │
//!              │ (markup parse)   │
//!              └────────┬─────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌──────────────┐         ┌──────────────┐
//!   │ script blocks│         │ ElementRewriter
//!   │ (deno_ast)   │         │ Meta / Story │
//!   └──────┬───────┘         └──┬────────┬──┘
//!          │          Extraction│        │ rewritten tree
//!          ▼                    ▼        ▼
//!   ┌──────────────────────────────┐  ┌──────────────┐
//!   │ ModuleSynthesizer + formatter│  │ Button.mdx   │
//!   └──────────────┬───────────────┘  └──────────────┘
//!                  ▼
//!          Button.stories.tsx
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use storyweld::{ScriptDialect, TransformOptions, Transformer};
//!
//! let source = std::fs::read_to_string("Button.stories.mdx").unwrap();
//! let transformer = Transformer::new(TransformOptions::new().dialect(ScriptDialect::Tsx));
//! let output = transformer.transform(&source, "Button.stories.mdx").unwrap();
//! std::fs::write("Button.stories.mdx", &output.documentation).unwrap();
//! std::fs::write(&output.file_name, &output.module).unwrap();
//! ```

// Configuration and errors
pub mod config;
pub mod diagnostics;

// Passes
pub mod naming;
pub mod rewrite;
pub mod script;
pub mod synth;

// Output
pub mod format;
pub mod transform;

// Re-exports for convenience
pub use config::{ScriptDialect, TransformOptions, BLOCKS_PACKAGE, LEGACY_BLOCKS_PACKAGE};
pub use diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticSeverity, DiagnosticsCollector, StoryweldError,
    StoryweldResult,
};
pub use format::{ModuleFormatter, StyleConfig, TrailingComma};
pub use rewrite::{ElementRewriter, Extraction, StoryRecord};
pub use synth::ModuleSynthesizer;
pub use transform::{transform, TransformOutput, Transformer};
