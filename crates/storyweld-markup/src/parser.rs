//! Markup parser
//!
//! Splits a document into prose, script blocks, tag elements and embedded
//! expressions. Prose is never interpreted beyond what is needed to avoid
//! mistaking code samples for tags: fenced code blocks, inline code spans,
//! backslash escapes, HTML comments and autolinks all stay in the text.

use crate::error::{MarkupError, MarkupResult};
use crate::node::{Attribute, AttributeValue, Document, Element, Expression, Node, Position, TagSource};
use crate::scan::{matching_brace, script_block_end};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `import`/`export` keyword at the start of a line
    static ref SCRIPT_START: Regex = Regex::new(r"^(?:import|export)(?:[\s{*]|$)").unwrap();

    /// Autolinks (`<https://example.com>`, `<someone@example.com>`)
    static ref AUTOLINK: Regex = Regex::new(
        r"^<(?:[A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*|[A-Za-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*)>"
    ).unwrap();
}

/// Parse a document from source text
pub fn parse(source: &str) -> MarkupResult<Document> {
    Parser::new(source).parse_document()
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.' | b':' | b'-')
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line_starts: Vec<usize>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let bytes = src.as_bytes();
        let line_starts = std::iter::once(0)
            .chain(
                bytes
                    .iter()
                    .enumerate()
                    .filter(|(_, &b)| b == b'\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        Self {
            src,
            bytes,
            pos: 0,
            line_starts,
        }
    }

    fn parse_document(mut self) -> MarkupResult<Document> {
        let children = self.parse_nodes(None)?;
        Ok(Document::new(children))
    }

    // ------------------------------------------------------------------
    // Positions
    // ------------------------------------------------------------------

    fn line_start(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(i) => self.line_starts[i],
            Err(i) => self.line_starts[i - 1],
        }
    }

    fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let column = self.src[self.line_starts[line]..offset].chars().count() + 1;
        Position::new(line + 1, column, offset)
    }

    fn at_line_start(&self, offset: usize) -> bool {
        offset == 0 || self.bytes[offset - 1] == b'\n'
    }

    /// Whether only spaces and tabs precede `offset` on its line
    fn starts_line(&self, offset: usize) -> bool {
        self.bytes[self.line_start(offset)..offset]
            .iter()
            .all(|&b| b == b' ' || b == b'\t')
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn unexpected(&self, expected: &'static str) -> MarkupError {
        let position = self.position(self.pos);
        match self.src[self.pos..].chars().next() {
            Some(found) => MarkupError::Unexpected {
                found,
                expected,
                position,
            },
            None => MarkupError::UnexpectedEof { expected, position },
        }
    }

    // ------------------------------------------------------------------
    // Node lists
    // ------------------------------------------------------------------

    /// Parse nodes up to the end of input, or up to the closing tag of
    /// `parent` (which is left for the caller to consume).
    fn parse_nodes(&mut self, parent: Option<(&str, Position)>) -> MarkupResult<Vec<Node>> {
        let src = self.src;
        let top_level = parent.is_none();
        let mut nodes = Vec::new();
        let mut text_start = self.pos;

        while self.pos < self.bytes.len() {
            if self.at_line_start(self.pos) {
                if top_level && SCRIPT_START.is_match(&src[self.pos..]) {
                    self.flush_text(&mut nodes, text_start);
                    let end = script_block_end(self.bytes, self.pos);
                    nodes.push(Node::script(&src[self.pos..end]));
                    self.pos = end;
                    text_start = end;
                    continue;
                }
                if let Some(end) = self.fenced_code_end(self.pos) {
                    self.pos = end;
                    continue;
                }
            }

            match self.bytes[self.pos] {
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b'`' => self.pos = self.code_span_end(self.pos),
                b'<' => {
                    let rest = &src[self.pos..];
                    if rest.starts_with("<!--") {
                        self.pos = rest
                            .find("-->")
                            .map_or(self.bytes.len(), |n| self.pos + n + 3);
                    } else if rest.starts_with("</") {
                        if parent.is_some() {
                            self.flush_text(&mut nodes, text_start);
                            return Ok(nodes);
                        }
                        let position = self.position(self.pos);
                        let (name, _) = self.closing_tag()?;
                        return Err(MarkupError::StrayClosingTag { name, position });
                    } else if let Some(link) = AUTOLINK.find(rest) {
                        self.pos += link.end();
                    } else if self
                        .bytes
                        .get(self.pos + 1)
                        .is_some_and(|&b| b.is_ascii_alphabetic() || b == b'>')
                    {
                        self.flush_text(&mut nodes, text_start);
                        let element = self.parse_element()?;
                        nodes.push(Node::Element(element));
                        text_start = self.pos;
                    } else {
                        self.pos += 1;
                    }
                }
                b'{' => {
                    self.flush_text(&mut nodes, text_start);
                    let flow = self.starts_line(self.pos);
                    let value = self.brace_group()?;
                    nodes.push(Node::Expression(Expression { value, flow }));
                    text_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }

        if let Some((name, position)) = parent {
            return Err(MarkupError::UnclosedElement {
                name: name.to_string(),
                position,
            });
        }
        self.flush_text(&mut nodes, text_start);
        Ok(nodes)
    }

    fn flush_text(&self, nodes: &mut Vec<Node>, start: usize) {
        if start < self.pos {
            nodes.push(Node::text(&self.src[start..self.pos]));
        }
    }

    /// If a fenced code block opens at `start`, return the end of its
    /// closing fence line (or the end of input).
    fn fenced_code_end(&self, start: usize) -> Option<usize> {
        let line_end = |from: usize| {
            self.bytes[from..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(self.bytes.len(), |n| from + n)
        };
        let fence = |from: usize| -> Option<(u8, usize)> {
            let line = &self.bytes[from..line_end(from)];
            let indent = line.iter().take_while(|&&b| b == b' ' || b == b'\t').count();
            let marker = *line.get(indent)?;
            if marker != b'`' && marker != b'~' {
                return None;
            }
            let count = line[indent..].iter().take_while(|&&b| b == marker).count();
            // a backtick fence cannot carry backticks in its info string
            let info_ok = marker == b'~' || !line[indent + count..].contains(&b'`');
            (count >= 3 && info_ok).then_some((marker, count))
        };

        let (marker, count) = fence(start)?;
        let mut line = line_end(start);
        while line < self.bytes.len() {
            let next = line + 1;
            let end = line_end(next);
            let closes = fence(next).is_some_and(|(m, n)| {
                let rest = &self.bytes[next..end];
                let trimmed = rest.iter().skip_while(|&&b| b == b' ' || b == b'\t');
                m == marker && n >= count && trimmed.skip(n).all(|b| b.is_ascii_whitespace())
            });
            if closes {
                return Some(end);
            }
            line = end;
        }
        Some(self.bytes.len())
    }

    /// End of an inline code span opened at `start`; a backtick run without
    /// a matching run is plain text.
    fn code_span_end(&self, start: usize) -> usize {
        let run = self.bytes[start..].iter().take_while(|&&b| b == b'`').count();
        let mut i = start + run;
        while i < self.bytes.len() {
            if self.bytes[i] == b'`' {
                let len = self.bytes[i..].iter().take_while(|&&b| b == b'`').count();
                if len == run {
                    return i + len;
                }
                i += len;
            } else {
                i += 1;
            }
        }
        start + run
    }

    // ------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.pos += 1;
        }
        self.src[start..self.pos].to_string()
    }

    fn parse_element(&mut self) -> MarkupResult<Element> {
        let start = self.pos;
        let position = self.position(start);
        let flow = self.starts_line(start);
        self.pos += 1;
        let name = self.read_name();

        let mut attributes = Vec::new();
        let self_closing = loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'/') if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.pos += 2;
                    break true;
                }
                Some(b'>') => {
                    self.pos += 1;
                    break false;
                }
                Some(b'{') => attributes.push(self.parse_spread_attribute()?),
                Some(b) if is_name_start(b) => attributes.push(self.parse_property_attribute()?),
                _ => return Err(self.unexpected("an attribute, `/>` or `>`")),
            }
        };
        let open = self.src[start..self.pos].to_string();

        if self_closing {
            let source = TagSource { open, close: None };
            return Ok(Element::parsed(name, attributes, Vec::new(), flow, position, source));
        }

        let children = self.parse_nodes(Some((&name, position)))?;
        let close_start = self.pos;
        let (close_name, end) = self.closing_tag()?;
        if close_name != name {
            return Err(MarkupError::MismatchedClosingTag {
                expected: name,
                found: close_name,
                position: self.position(close_start),
            });
        }
        let source = TagSource {
            open,
            close: Some(self.src[close_start..end].to_string()),
        };
        Ok(Element::parsed(name, attributes, children, flow, position, source))
    }

    /// Consume `</name>` at the current position
    fn closing_tag(&mut self) -> MarkupResult<(String, usize)> {
        self.pos += 2;
        self.skip_whitespace();
        let name = self.read_name();
        self.skip_whitespace();
        if self.peek() != Some(b'>') {
            return Err(self.unexpected("`>` to end the closing tag"));
        }
        self.pos += 1;
        Ok((name, self.pos))
    }

    fn parse_property_attribute(&mut self) -> MarkupResult<Attribute> {
        let name_position = self.position(self.pos);
        let name = self.read_name();
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Ok(Attribute::Property { name, value: None });
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                let value_start = self.pos + 1;
                let len = self.bytes[value_start..]
                    .iter()
                    .position(|&b| b == quote)
                    .ok_or_else(|| MarkupError::UnterminatedAttribute {
                        name: name.clone(),
                        position: name_position,
                    })?;
                self.pos = value_start + len + 1;
                AttributeValue::Literal(self.src[value_start..value_start + len].to_string())
            }
            Some(b'{') => AttributeValue::Expression(self.brace_group()?),
            _ => return Err(self.unexpected("a quoted string or `{` after `=`")),
        };
        Ok(Attribute::Property {
            name,
            value: Some(value),
        })
    }

    fn parse_spread_attribute(&mut self) -> MarkupResult<Attribute> {
        let position = self.position(self.pos);
        let inner = self.brace_group()?;
        match inner.trim().strip_prefix("...") {
            Some(expression) => Ok(Attribute::Spread {
                expression: expression.trim().to_string(),
            }),
            None => Err(MarkupError::InvalidSpread { position }),
        }
    }

    /// Consume a `{...}` group and return the text between the braces
    fn brace_group(&mut self) -> MarkupResult<String> {
        let open = self.pos;
        let end = matching_brace(self.bytes, open).ok_or_else(|| {
            MarkupError::UnterminatedExpression {
                position: self.position(open),
            }
        })?;
        self.pos = end;
        Ok(self.src[open + 1..end - 1].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn elements(doc: &Document) -> Vec<&Element> {
        doc.children.iter().filter_map(Node::as_element).collect()
    }

    #[test]
    fn test_parse_script_and_meta() {
        let source = "import { Meta } from '@storybook/addon-docs';\n\n<Meta title=\"Foobar\" />\n";
        let doc = parse(source).unwrap();

        let blocks: Vec<_> = doc.script_blocks().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].value, "import { Meta } from '@storybook/addon-docs';");

        let meta = elements(&doc)[0];
        assert_eq!(meta.name(), "Meta");
        assert!(meta.is_flow());
        assert_eq!(meta.attribute("title").and_then(Attribute::literal_value), Some("Foobar"));
        assert_eq!(meta.position().line, 3);
    }

    #[test]
    fn test_parse_story_with_expression_child() {
        let source = "<Story\n  name=\"Unchecked\"\n  args={{\n    ...args,\n    label: 'Unchecked',\n  }}>\n  {Template.bind({})}\n</Story>";
        let doc = parse(source).unwrap();
        let story = elements(&doc)[0];

        assert_eq!(story.attributes().len(), 2);
        assert_eq!(
            story.attribute("args"),
            Some(&Attribute::expression(
                "args",
                "{\n    ...args,\n    label: 'Unchecked',\n  }"
            ))
        );

        let significant: Vec<_> = story.children().iter().filter(|n| !n.is_blank()).collect();
        assert_eq!(
            significant,
            vec![&Node::Expression(Expression {
                value: "Template.bind({})".to_string(),
                flow: true,
            })]
        );
    }

    #[test]
    fn test_parse_attribute_forms() {
        let doc = parse("<Story name='single' disabled {...rest} />").unwrap();
        let story = elements(&doc)[0];
        assert_eq!(
            story.attributes(),
            &[
                Attribute::literal("name", "single"),
                Attribute::Property {
                    name: "disabled".to_string(),
                    value: None,
                },
                Attribute::Spread {
                    expression: "rest".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_inline_expression_in_prose() {
        let doc = parse("world {2 + 1}\n").unwrap();
        assert_eq!(
            doc.children,
            vec![
                Node::text("world "),
                Node::Expression(Expression {
                    value: "2 + 1".to_string(),
                    flow: false,
                }),
                Node::text("\n"),
            ]
        );
    }

    #[test]
    fn test_nested_elements() {
        let doc = parse("<Canvas>\n  <Story name=\"a\" />\n</Canvas>\n").unwrap();
        let canvas = elements(&doc)[0];
        assert_eq!(canvas.name(), "Canvas");
        let inner: Vec<_> = canvas.children().iter().filter_map(Node::as_element).collect();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].name(), "Story");
        assert!(inner[0].is_flow());
    }

    #[test]
    fn test_code_is_not_markup() {
        let source = "```jsx\n<Story name=\"x\">{oops</Story>\n```\n\nUse `<Meta>` and \\{braces\\}.\n";
        let doc = parse(source).unwrap();
        assert_eq!(doc.children, vec![Node::text(source)]);
    }

    #[test]
    fn test_comments_and_autolinks_are_text() {
        let source = "<!-- <Story> -->\nSee <https://storybook.js.org> or a < b.\n";
        let doc = parse(source).unwrap();
        assert_eq!(doc.children, vec![Node::text(source)]);
    }

    #[test]
    fn test_script_only_at_top_level() {
        let doc = parse("<Wrapper>\nimport x\n</Wrapper>").unwrap();
        assert_eq!(doc.script_blocks().count(), 0);
    }

    #[test]
    fn test_fragment() {
        let doc = parse("<>\n  text\n</>").unwrap();
        assert_eq!(elements(&doc)[0].name(), "");
    }

    #[test]
    fn test_unclosed_element() {
        let err = parse("<Story name=\"a\">\nbody\n").unwrap_err();
        assert!(matches!(err, MarkupError::UnclosedElement { ref name, .. } if name == "Story"));
        assert_eq!(err.position().line, 1);
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = parse("<Canvas>\n<Story name=\"a\">x</Canvas>").unwrap_err();
        assert!(matches!(
            err,
            MarkupError::MismatchedClosingTag { ref expected, ref found, .. }
                if expected == "Story" && found == "Canvas"
        ));
    }

    #[test]
    fn test_stray_closing_tag() {
        let err = parse("text </Story>").unwrap_err();
        assert!(matches!(err, MarkupError::StrayClosingTag { ref name, .. } if name == "Story"));
    }

    #[test]
    fn test_unterminated_expression() {
        let err = parse("line one\nvalue {a + (b\n").unwrap_err();
        assert_eq!(
            err,
            MarkupError::UnterminatedExpression {
                position: Position::new(2, 7, 15),
            }
        );
    }

    #[test]
    fn test_unterminated_attribute() {
        let err = parse("<Meta title=\"oops />").unwrap_err();
        assert!(matches!(err, MarkupError::UnterminatedAttribute { ref name, .. } if name == "title"));
    }

    #[test]
    fn test_invalid_spread() {
        let err = parse("<Meta {title} />").unwrap_err();
        assert!(matches!(err, MarkupError::InvalidSpread { .. }));
    }

    #[test]
    fn test_bad_attribute_character() {
        let err = parse("<Meta title=Foobar />").unwrap_err();
        assert!(matches!(err, MarkupError::Unexpected { found: 'F', .. }));
    }
}
