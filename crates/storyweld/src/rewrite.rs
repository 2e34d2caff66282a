//! Element rewriter
//!
//! One pass over the markup tree. `Meta` and `Story` elements hand their
//! attributes (and, for stories, their children) over to an [`Extraction`]
//! and are left behind as references into the story module:
//!
//! ```text
//! <Meta title="Button" />               ->  <Meta of={ButtonStories} />
//! <Story name="primary">{...}</Story>   ->  <Story of={ButtonStories.Primary} />
//! <Story>no name</Story>                ->  (removed)
//! ```
//!
//! Child lists are rebuilt rather than edited while iterating, so removing
//! a story never skips or revisits its siblings.

use crate::diagnostics::{DiagnosticCode, DiagnosticsCollector};
use crate::naming::{capitalize, is_binding_identifier};
use indexmap::IndexMap;
use storyweld_markup::{Attribute, Document, Element, Node, Position, Text};
use tracing::debug;

/// Name of the metadata element
pub const META_ELEMENT: &str = "Meta";

/// Name of the story element
pub const STORY_ELEMENT: &str = "Story";

/// Attributes taken from the `Meta` element
pub type MetaAttributes = Vec<Attribute>;

/// A story taken out of the documentation
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRecord {
    /// The `name` attribute as written
    pub name: String,
    /// Remaining attributes in source order
    pub attributes: Vec<Attribute>,
    /// Children as written
    pub children: Vec<Node>,
    /// Where the story element started
    pub position: Position,
}

/// Everything the rewriter took out of the document
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Metadata attributes; `None` when the document has no `Meta`
    pub meta: Option<MetaAttributes>,
    /// Stories by export name, in order of first appearance
    pub stories: IndexMap<String, StoryRecord>,
}

/// Rewrites `Meta`/`Story` elements into references
pub struct ElementRewriter<'a> {
    namespace: &'a str,
    diagnostics: &'a mut DiagnosticsCollector,
    extraction: Extraction,
}

impl<'a> ElementRewriter<'a> {
    /// Create a rewriter referencing the story module as `namespace`
    pub fn new(namespace: &'a str, diagnostics: &'a mut DiagnosticsCollector) -> Self {
        Self {
            namespace,
            diagnostics,
            extraction: Extraction::default(),
        }
    }

    /// Rewrite the document in place and return what was extracted
    pub fn rewrite(mut self, document: &mut Document) -> Extraction {
        let children = std::mem::take(&mut document.children);
        document.children = self.rewrite_children(children);
        debug!(
            stories = self.extraction.stories.len(),
            meta = self.extraction.meta.is_some(),
            "storyweld.rewrite"
        );
        self.extraction
    }

    fn rewrite_children(&mut self, nodes: Vec<Node>) -> Vec<Node> {
        let mut out = Vec::with_capacity(nodes.len());
        let mut strip_line = false;

        for node in nodes {
            let node = if std::mem::take(&mut strip_line) {
                match strip_line_end(node) {
                    Some(node) => node,
                    None => continue,
                }
            } else {
                node
            };

            let mut element = match node {
                Node::Element(element) => element,
                other => {
                    out.push(other);
                    continue;
                }
            };

            match element.name() {
                META_ELEMENT => {
                    self.rewrite_meta(&mut element);
                    out.push(Node::Element(element));
                }
                STORY_ELEMENT => {
                    if self.rewrite_story(&mut element) {
                        out.push(Node::Element(element));
                    } else if element.is_flow() {
                        trim_line_indent(&mut out);
                        strip_line = true;
                    }
                }
                _ => {
                    let children = element.take_children();
                    *element.children_mut() = self.rewrite_children(children);
                    out.push(Node::Element(element));
                }
            }
        }
        out
    }

    fn rewrite_meta(&mut self, element: &mut Element) {
        let reference = Attribute::expression("of", self.namespace);
        let attributes = element.set_attributes(vec![reference]);

        match &mut self.extraction.meta {
            Some(meta) => {
                self.diagnostics.report(
                    DiagnosticCode::MultipleMeta,
                    element.position(),
                    "more than one `<Meta>` element; attributes are merged",
                );
                meta.extend(attributes);
            }
            None => self.extraction.meta = Some(attributes),
        }
    }

    /// Returns `false` when the story must be removed
    fn rewrite_story(&mut self, element: &mut Element) -> bool {
        let position = element.position();
        let Some(name) = element
            .attribute("name")
            .and_then(Attribute::literal_value)
            .map(str::to_string)
        else {
            self.diagnostics.report(
                DiagnosticCode::UnnamedStory,
                position,
                "`<Story>` without a literal `name` attribute removed",
            );
            return false;
        };

        let key = capitalize(&name);
        if !is_binding_identifier(&key) {
            self.diagnostics.report(
                DiagnosticCode::InvalidIdentifier,
                position,
                format!("story name `{}` gives `{}`, which is not a valid export name", name, key),
            );
        }
        if self.extraction.stories.contains_key(&key) {
            self.diagnostics.report(
                DiagnosticCode::DuplicateStory,
                position,
                format!("story `{}` is defined more than once; the last definition wins", key),
            );
        }

        let reference = Attribute::expression("of", format!("{}.{}", self.namespace, key));
        let attributes = element
            .set_attributes(vec![reference])
            .into_iter()
            .filter(|attr| attr.name() != Some("name"))
            .collect();
        let children = element.clear_children();

        // an existing key keeps its position and takes the new record
        self.extraction.stories.insert(
            key,
            StoryRecord {
                name,
                attributes,
                children,
                position,
            },
        );
        true
    }
}

/// Drop trailing spaces left on the line of a removed element
fn trim_line_indent(out: &mut Vec<Node>) {
    if let Some(Node::Text(Text { value })) = out.last_mut() {
        let kept = value.trim_end_matches([' ', '\t']).len();
        value.truncate(kept);
        if value.is_empty() {
            out.pop();
        }
    }
}

/// Remove the rest of a removed element's line and the blank lines after it
fn strip_line_end(node: Node) -> Option<Node> {
    let value = match node {
        Node::Text(Text { value }) => value,
        other => return Some(other),
    };

    let mut rest = value.as_str();
    let mut stripped = false;
    while let Some(newline) = rest.find('\n') {
        if !rest[..newline].trim().is_empty() {
            break;
        }
        rest = &rest[newline + 1..];
        stripped = true;
    }
    if !rest.contains('\n') && rest.trim().is_empty() {
        rest = "";
        stripped = true;
    }

    if !stripped {
        return Some(Node::text(value));
    }
    (!rest.is_empty()).then(|| Node::text(rest))
}
