//! Names derived from the input file and story names

/// Suffixes stripped from the input file name, in priority order
const DOC_SUFFIXES: &[&str] = &[".stories.mdx", "story.mdx", ".mdx"];

/// Reserved words that cannot name a binding
const RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Strip the first matching documentation suffix from `file_name`
pub fn base_name(file_name: &str) -> &str {
    DOC_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .unwrap_or(file_name)
}

/// Namespace the documentation imports the story module under
pub fn namespace(base: &str) -> String {
    format!("{}Stories", base)
}

/// Relative specifier of the sibling story module
pub fn module_specifier(base: &str) -> String {
    format!("./{}.stories", base)
}

/// File name of the generated story module
pub fn story_file_name(base: &str, extension: &str) -> String {
    format!("{}.stories.{}", base, extension)
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Whether `name` is an identifier name (reserved words included)
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Whether `name` can be used as a binding
pub fn is_binding_identifier(name: &str) -> bool {
    is_identifier_name(name) && !RESERVED.contains(&name)
}

/// Object literal key for an attribute name
pub fn property_key(name: &str) -> String {
    if is_identifier_name(name) {
        name.to_string()
    } else {
        quote_string(name)
    }
}

/// Single-quoted string literal
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("Foobar.stories.mdx"), "Foobar");
        assert_eq!(base_name("Button.mdx"), "Button");
        assert_eq!(base_name("Buttonstory.mdx"), "Button");
        assert_eq!(base_name("Button.story.mdx"), "Button.");
        assert_eq!(base_name("Readme.md"), "Readme.md");
    }

    #[test]
    fn test_derived_names() {
        assert_eq!(namespace("Foobar"), "FoobarStories");
        assert_eq!(module_specifier("Foobar"), "./Foobar.stories");
        assert_eq!(story_file_name("Foobar", "tsx"), "Foobar.stories.tsx");
    }

    #[test]
    fn test_capitalize_lowercases_rest() {
        assert_eq!(capitalize("foo"), "Foo");
        assert_eq!(capitalize("Unchecked"), "Unchecked");
        assert_eq!(capitalize("PRIMARY"), "Primary");
        assert_eq!(capitalize("écran"), "Écran");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_binding_identifier("FoobarStories"));
        assert!(is_binding_identifier("$el_2"));
        assert!(!is_binding_identifier("Button.Stories"));
        assert!(!is_binding_identifier("With space"));
        assert!(!is_binding_identifier("default"));
        assert!(is_identifier_name("default"));
    }

    #[test]
    fn test_property_key() {
        assert_eq!(property_key("args"), "args");
        assert_eq!(property_key("aria-label"), "'aria-label'");
        assert_eq!(quote_string("it's"), "'it\\'s'");
    }
}
