//! storyweld-markup: markup tree for story documentation files
//!
//! Documentation files mix prose, top-level `import`/`export` script blocks,
//! tag elements and `{...}` expressions. This crate parses such a file into
//! a [`Document`] and prints it back.
//!
//! Printing is lossless: prose and script blocks keep their source text, and
//! an element keeps its original tag text until its attributes or children
//! are replaced. Only the elements a caller edits are regenerated.
//!
//! # Usage
//!
//! ```
//! use storyweld_markup::{parse, print, Attribute, Node};
//!
//! let mut doc = parse("# Title\n\n<Meta title=\"Button\" />\n").unwrap();
//! for node in &mut doc.children {
//!     if let Node::Element(element) = node {
//!         element.set_attributes(vec![Attribute::expression("of", "ButtonStories")]);
//!     }
//! }
//! assert_eq!(print(&doc), "# Title\n\n<Meta of={ButtonStories} />\n");
//! ```

pub mod error;
pub mod node;
pub mod parser;
pub mod printer;

mod scan;

pub use error::{MarkupError, MarkupResult};
pub use node::{
    Attribute, AttributeValue, Document, Element, Expression, Node, Position, ScriptBlock, Text,
};
pub use parser::parse;
pub use printer::print;
