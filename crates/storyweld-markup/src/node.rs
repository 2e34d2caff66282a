//! Markup tree node types
//!
//! A [`Document`] is an ordered list of [`Node`]s. Prose, script blocks and
//! inline expressions keep their exact source text; elements keep the raw
//! text of their opening and closing tags until they are edited, so that
//! printing an untouched tree reproduces the input byte for byte.

use serde::Serialize;
use std::fmt;

/// A location in the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
    /// Byte offset into the source
    pub offset: usize,
}

impl Position {
    /// Create a new position
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A parsed markup document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Top-level nodes in source order
    pub children: Vec<Node>,
}

impl Document {
    /// Create a document from a list of nodes
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Top-level script blocks in source order
    pub fn script_blocks(&self) -> impl Iterator<Item = &ScriptBlock> {
        self.children.iter().filter_map(|node| match node {
            Node::Script(block) => Some(block),
            _ => None,
        })
    }

    /// Mutable access to the top-level script blocks
    pub fn script_blocks_mut(&mut self) -> impl Iterator<Item = &mut ScriptBlock> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Script(block) => Some(block),
            _ => None,
        })
    }
}

/// A node of the markup tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// Opaque prose, passed through unchanged
    Text(Text),
    /// An `import`/`export` block
    Script(ScriptBlock),
    /// A tag element such as `<Meta />` or `<Story>...</Story>`
    Element(Element),
    /// An embedded expression `{...}`
    Expression(Expression),
}

impl Node {
    /// Create a text node
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Text {
            value: value.into(),
        })
    }

    /// Create a script block node
    pub fn script(value: impl Into<String>) -> Self {
        Node::Script(ScriptBlock {
            value: value.into(),
        })
    }

    /// Create an expression node
    pub fn expression(value: impl Into<String>) -> Self {
        Node::Expression(Expression {
            value: value.into(),
            flow: false,
        })
    }

    /// Whether this node is prose made only of whitespace
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Text(text) if text.value.trim().is_empty())
    }

    /// Get the element if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// Prose content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    /// Source text
    pub value: String,
}

/// Embedded script source (`import ...` / `export ...`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptBlock {
    /// Raw script text, without the line break that ends the block
    pub value: String,
}

/// An embedded expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    /// Source between the braces
    pub value: String,
    /// Whether the expression starts its own line
    pub flow: bool,
}

/// Value of a named attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum AttributeValue {
    /// A quoted string, stored without its quotes
    Literal(String),
    /// Expression source between the braces of `name={...}`
    Expression(String),
}

/// An element attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Attribute {
    /// `name`, `name="value"` or `name={expression}`
    Property {
        name: String,
        value: Option<AttributeValue>,
    },
    /// `{...expression}`; holds the source after the spread dots
    Spread { expression: String },
}

impl Attribute {
    /// Create a string-valued attribute
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute::Property {
            name: name.into(),
            value: Some(AttributeValue::Literal(value.into())),
        }
    }

    /// Create an expression-valued attribute
    pub fn expression(name: impl Into<String>, source: impl Into<String>) -> Self {
        Attribute::Property {
            name: name.into(),
            value: Some(AttributeValue::Expression(source.into())),
        }
    }

    /// Attribute name, if this is not a spread
    pub fn name(&self) -> Option<&str> {
        match self {
            Attribute::Property { name, .. } => Some(name),
            Attribute::Spread { .. } => None,
        }
    }

    /// String value, if the attribute is a quoted literal
    pub fn literal_value(&self) -> Option<&str> {
        match self {
            Attribute::Property {
                value: Some(AttributeValue::Literal(value)),
                ..
            } => Some(value),
            _ => None,
        }
    }
}

/// Raw tag text captured by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagSource {
    pub(crate) open: String,
    /// `None` for self-closing elements
    pub(crate) close: Option<String>,
}

/// A tag element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
    flow: bool,
    position: Position,
    #[serde(skip)]
    source: Option<TagSource>,
}

impl Element {
    /// Create a new element that has no source text
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            attributes,
            children,
            flow: false,
            position: Position::default(),
            source: None,
        }
    }

    pub(crate) fn parsed(
        name: String,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
        flow: bool,
        position: Position,
        source: TagSource,
    ) -> Self {
        Self {
            name,
            attributes,
            children,
            flow,
            position,
            source: Some(source),
        }
    }

    /// Element name (empty for fragments)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in source order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Child nodes
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable access to the child list.
    ///
    /// Editing children keeps the original tags; use
    /// [`Element::clear_children`] to turn the element into a self-closing one.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Take the child list, leaving it empty
    pub fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    /// Whether the element starts its own line
    pub fn is_flow(&self) -> bool {
        self.flow
    }

    /// Position of the opening `<`
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the element still prints from its original tag text
    pub fn is_pristine(&self) -> bool {
        self.source.is_some()
    }

    /// Find a named attribute
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name() == Some(name))
    }

    /// Replace the attribute list; the opening tag is regenerated on print
    pub fn set_attributes(&mut self, attributes: Vec<Attribute>) -> Vec<Attribute> {
        self.source = None;
        std::mem::replace(&mut self.attributes, attributes)
    }

    /// Remove all children; the element prints as self-closing afterwards
    pub fn clear_children(&mut self) -> Vec<Node> {
        self.source = None;
        std::mem::take(&mut self.children)
    }

    pub(crate) fn source(&self) -> Option<&TagSource> {
        self.source.as_ref()
    }
}
