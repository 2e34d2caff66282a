//! Markup printer
//!
//! Untouched nodes print their original text. Elements whose attributes or
//! children were replaced regenerate their tags from the attribute list.

use crate::node::{Attribute, AttributeValue, Document, Element, Node, TagSource};
use std::fmt::{self, Display, Formatter, Write};

/// Print a document back to source text
pub fn print(document: &Document) -> String {
    document.to_string()
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.children.iter().try_for_each(|node| write!(f, "{}", node))
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(text) => f.write_str(&text.value),
            Node::Script(block) => f.write_str(&block.value),
            Node::Expression(expression) => write!(f, "{{{}}}", expression.value),
            Node::Element(element) => write!(f, "{}", element),
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.source() {
            Some(TagSource {
                open,
                close: Some(close),
            }) => {
                f.write_str(open)?;
                write_children(f, self.children())?;
                f.write_str(close)
            }
            Some(TagSource { open, close: None }) if self.children().is_empty() => {
                f.write_str(open)
            }
            _ => write_generated(f, self),
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Property { name, value: None } => f.write_str(name),
            Attribute::Property {
                name,
                value: Some(AttributeValue::Literal(value)),
            } => {
                let quote = if value.contains('"') { '\'' } else { '"' };
                write!(f, "{name}={quote}{value}{quote}")
            }
            Attribute::Property {
                name,
                value: Some(AttributeValue::Expression(source)),
            } => write!(f, "{name}={{{source}}}"),
            Attribute::Spread { expression } => write!(f, "{{...{expression}}}"),
        }
    }
}

fn write_children(f: &mut Formatter<'_>, children: &[Node]) -> fmt::Result {
    children.iter().try_for_each(|child| write!(f, "{}", child))
}

fn write_generated(f: &mut Formatter<'_>, element: &Element) -> fmt::Result {
    f.write_char('<')?;
    f.write_str(element.name())?;
    for attribute in element.attributes() {
        write!(f, " {}", attribute)?;
    }
    if element.children().is_empty() && !element.name().is_empty() {
        return f.write_str(" />");
    }
    f.write_char('>')?;
    write_children(f, element.children())?;
    write!(f, "</{}>", element.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"import { Canvas, Meta, Story } from '@storybook/addon-docs';

# hello

export const args = { bla: 1 };

<Meta title="foobar" />

world {2 + 1}

<Canvas>
  <Story name="foo">bar</Story>
</Canvas>

<Story
  name="Unchecked"
  args={{
    ...args,
    label: 'Unchecked',
  }}>
  {Template.bind({})}
</Story>
"#;

    #[test]
    fn test_untouched_document_round_trips() {
        let doc = parse(SAMPLE).unwrap();
        assert_eq!(print(&doc), SAMPLE);
    }

    #[test]
    fn test_regenerated_self_closing_tag() {
        let mut doc = parse("<Meta title=\"Foobar\" />\n").unwrap();
        if let Node::Element(meta) = &mut doc.children[0] {
            meta.set_attributes(vec![Attribute::expression("of", "FoobarStories")]);
        }
        assert_eq!(print(&doc), "<Meta of={FoobarStories} />\n");
    }

    #[test]
    fn test_cleared_children_print_self_closing() {
        let mut doc = parse("<Story name=\"Primary\">No name!</Story>").unwrap();
        if let Node::Element(story) = &mut doc.children[0] {
            story.set_attributes(vec![Attribute::expression("of", "FoobarStories.Primary")]);
            story.clear_children();
        }
        assert_eq!(print(&doc), "<Story of={FoobarStories.Primary} />");
    }

    #[test]
    fn test_parent_keeps_tags_when_child_changes() {
        let source = "<Canvas withToolbar>\n  <Story name=\"a\">x</Story>\n</Canvas>";
        let mut doc = parse(source).unwrap();
        if let Node::Element(canvas) = &mut doc.children[0] {
            for child in canvas.children_mut() {
                if let Node::Element(story) = child {
                    story.set_attributes(vec![Attribute::expression("of", "S.A")]);
                    story.clear_children();
                }
            }
        }
        assert_eq!(print(&doc), "<Canvas withToolbar>\n  <Story of={S.A} />\n</Canvas>");
    }

    #[test]
    fn test_attribute_display() {
        assert_eq!(Attribute::literal("title", "a").to_string(), "title=\"a\"");
        assert_eq!(Attribute::literal("title", "say \"hi\"").to_string(), "title='say \"hi\"'");
        assert_eq!(Attribute::expression("args", "{a: 1}").to_string(), "args={{a: 1}}");
        assert_eq!(
            Attribute::Spread {
                expression: "rest".to_string()
            }
            .to_string(),
            "{...rest}"
        );
    }

    #[test]
    fn test_new_element_with_children() {
        let element = Element::new("Canvas", vec![], vec![Node::text("x")]);
        assert_eq!(element.to_string(), "<Canvas>x</Canvas>");
    }
}
