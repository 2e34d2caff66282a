//! Script-aware scanning helpers
//!
//! The markup grammar embeds script code in two places: `{...}` expressions
//! and top-level `import`/`export` blocks. Finding where those end requires
//! skipping string literals, template literals and comments so that braces
//! inside them are not counted. All delimiters are ASCII, so scanning works
//! on bytes without splitting UTF-8 sequences.

/// Skip a string, template literal or comment starting at `i`.
///
/// Returns the index just past the construct, or `None` when no such
/// construct starts at `i`. `prev` is the byte before `i`; a quote that
/// directly follows a letter or digit is prose (`don't`), not a string.
fn skip_literal(bytes: &[u8], i: usize, prev: u8) -> Option<usize> {
    match bytes[i] {
        quote @ (b'"' | b'\'') if !prev.is_ascii_alphanumeric() => {
            let mut j = i + 1;
            while j < bytes.len() {
                match bytes[j] {
                    b'\\' => j += 2,
                    b'\n' => return None,
                    b if b == quote => return Some(j + 1),
                    _ => j += 1,
                }
            }
            None
        }
        b'`' => {
            let mut j = i + 1;
            while j < bytes.len() {
                match bytes[j] {
                    b'\\' => j += 2,
                    b'`' => return Some(j + 1),
                    b'$' if bytes.get(j + 1) == Some(&b'{') => {
                        j = matching_brace(bytes, j + 1)?;
                    }
                    _ => j += 1,
                }
            }
            Some(bytes.len())
        }
        b'/' if bytes.get(i + 1) == Some(&b'/') && prev != b':' => {
            let end = bytes[i..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |n| i + n);
            Some(end)
        }
        b'/' if bytes.get(i + 1) == Some(&b'*') => {
            let end = bytes[i + 2..]
                .windows(2)
                .position(|w| w == b"*/")
                .map_or(bytes.len(), |n| i + 2 + n + 2);
            Some(end)
        }
        _ => None,
    }
}

/// Find the end of the brace group opened at `open`.
///
/// Returns the index just past the matching `}`, or `None` if the input
/// ends first.
pub(crate) fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    debug_assert_eq!(bytes.get(open), Some(&b'{'));
    let mut depth = 0usize;
    let mut prev = b' ';
    let mut i = open;
    while i < bytes.len() {
        if let Some(next) = skip_literal(bytes, i, prev) {
            prev = bytes[next - 1];
            i = next;
            continue;
        }
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        prev = bytes[i];
        i += 1;
    }
    None
}

/// Find the end of a script block starting at `start`.
///
/// The block runs until a blank line at which all brackets are balanced,
/// or to the end of input. The returned index points at the line break that
/// ends the last line of the block (or the input length).
pub(crate) fn script_block_end(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0i64;
    let mut prev = b' ';
    let mut i = start;
    while i < bytes.len() {
        if let Some(next) = skip_literal(bytes, i, prev) {
            prev = bytes[next - 1];
            i = next;
            continue;
        }
        match bytes[i] {
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => depth = (depth - 1).max(0),
            b'\n' if depth == 0 && next_line_is_blank(bytes, i + 1) => return i,
            _ => {}
        }
        prev = bytes[i];
        i += 1;
    }
    bytes.len()
}

/// Whether the line starting at `start` holds only whitespace.
/// The end of input counts as a blank line.
pub(crate) fn next_line_is_blank(bytes: &[u8], start: usize) -> bool {
    bytes[start.min(bytes.len())..]
        .iter()
        .take_while(|&&b| b != b'\n')
        .all(|b| b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brace_end(src: &str) -> Option<usize> {
        matching_brace(src.as_bytes(), 0)
    }

    #[test]
    fn test_matching_brace_nested() {
        let src = "{{ ...args, label: 'x' }} rest";
        assert_eq!(brace_end(src), Some(25));
    }

    #[test]
    fn test_matching_brace_skips_strings() {
        let src = r#"{ label: '}', other: "{" } tail"#;
        assert_eq!(&src[..brace_end(src).unwrap()], r#"{ label: '}', other: "{" }"#);
    }

    #[test]
    fn test_matching_brace_template_literal() {
        let src = "{`a ${ {b: 1}.b } }`} x";
        assert_eq!(&src[..brace_end(src).unwrap()], "{`a ${ {b: 1}.b } }`}");
    }

    #[test]
    fn test_matching_brace_prose_apostrophe() {
        let src = "{<p>Don't {x}</p>} after";
        assert_eq!(&src[..brace_end(src).unwrap()], "{<p>Don't {x}</p>}");
    }

    #[test]
    fn test_matching_brace_comment() {
        let src = "{a /* } */ + b // }\n} z";
        assert_eq!(&src[..brace_end(src).unwrap()], "{a /* } */ + b // }\n}");
    }

    #[test]
    fn test_matching_brace_unterminated() {
        assert_eq!(brace_end("{ a: { b }"), None);
    }

    #[test]
    fn test_script_block_ends_at_blank_line() {
        let src = "import a from 'a';\nimport b from 'b';\n\n# Title";
        let end = script_block_end(src.as_bytes(), 0);
        assert_eq!(&src[..end], "import a from 'a';\nimport b from 'b';");
    }

    #[test]
    fn test_script_block_spans_blank_line_inside_braces() {
        let src = "export const a = {\n\n  b: 1,\n};\n\ntext";
        let end = script_block_end(src.as_bytes(), 0);
        assert_eq!(&src[..end], "export const a = {\n\n  b: 1,\n};");
    }

    #[test]
    fn test_script_block_at_end_of_input() {
        let src = "export const x = 1;";
        assert_eq!(script_block_end(src.as_bytes(), 0), src.len());
        let src = "export const x = 1;\n";
        assert_eq!(script_block_end(src.as_bytes(), 0), src.len() - 1);
    }
}
