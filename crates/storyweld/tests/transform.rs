//! End-to-end transforms of documentation files

use pretty_assertions::assert_eq;
use storyweld::{
    DiagnosticCode, ScriptDialect, StoryweldError, StyleConfig, TrailingComma, TransformOptions,
    TransformOutput, Transformer,
};

const FILE: &str = "components/Foobar/Foobar.stories.mdx";

fn transform_with(options: TransformOptions, source: &str) -> TransformOutput {
    Transformer::new(options.style(StyleConfig::default()))
        .transform(source, FILE)
        .unwrap()
}

fn transform(source: &str) -> TransformOutput {
    transform_with(TransformOptions::new(), source)
}

fn codes(output: &TransformOutput) -> Vec<DiagnosticCode> {
    output.diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn rewrites_legacy_import() {
    let input = "import { Meta, Story } from '@storybook/addon-docs';\n\n<Meta title=\"Foobar\" />";
    let output = transform(input);

    assert_eq!(
        output.documentation.trim(),
        "import { Meta, Story } from '@storybook/blocks';\nimport * as FoobarStories from './Foobar.stories';\n\n<Meta of={FoobarStories} />"
    );
    assert_eq!(
        output.module,
        "import { Meta, Story } from '@storybook/blocks';\n\nexport default {\n  title: 'Foobar',\n};\n"
    );
    assert_eq!(output.file_name, "Foobar.stories.tsx");
}

#[test]
fn rewrites_legacy_subpath_imports() {
    let input = "import { Meta } from '@storybook/addon-docs/dist/esm/blocks';\nimport { Story } from '@storybook/addon-docs/blocks';\n\n<Meta title=\"Foobar\" />";
    let output = transform(input);

    assert!(!output.documentation.contains("addon-docs"));
    assert!(!output.module.contains("addon-docs"));
    assert!(output
        .documentation
        .starts_with("import { Meta } from '@storybook/blocks/dist/esm/blocks';\nimport { Story } from '@storybook/blocks';\n"));
}

#[test]
fn drops_story_without_name() {
    let input = "import { Meta, Story } from '@storybook/addon-docs';\n\n<Meta title=\"Foobar\" />\n\n<Story>No name!</Story>\n\n";
    let output = transform(input);

    assert_eq!(
        output.documentation.trim(),
        "import { Meta, Story } from '@storybook/blocks';\nimport * as FoobarStories from './Foobar.stories';\n\n<Meta of={FoobarStories} />"
    );
    assert!(!output.module.contains("export const"));
    assert_eq!(codes(&output), vec![DiagnosticCode::UnnamedStory]);
    assert_eq!(output.diagnostics[0].line, Some(5));
}

#[test]
fn prose_story_body_gives_no_render() {
    let input = "import { Meta, Story } from '@storybook/addon-docs';\n\n<Meta title=\"Foobar\" />\n\n<Story name=\"Primary\">No name!</Story>\n\n";
    let output = transform(input);

    assert_eq!(
        output.documentation.trim(),
        "import { Meta, Story } from '@storybook/blocks';\nimport * as FoobarStories from './Foobar.stories';\n\n<Meta of={FoobarStories} />\n\n<Story of={FoobarStories.Primary} />"
    );
    assert!(output
        .module
        .ends_with("export const Primary = {\n  name: 'Primary',\n};\n"));
    assert_eq!(codes(&output), vec![DiagnosticCode::ProseStoryBody]);
}

const ESM_INPUT: &str = r#"import { Canvas, Meta, Story } from '@storybook/addon-docs';

# hello

export const args = { bla: 1 };

<Meta title="foobar" />

world {2 + 1}

<Story name="foo">bar</Story>

<Story
  name="Unchecked"
  args={{
    ...args,
    label: 'Unchecked',
  }}>
  {Template.bind({})}
</Story>"#;

#[test]
fn extracts_esm_into_module_preamble() {
    let output = transform(ESM_INPUT);

    assert_eq!(
        output.documentation,
        r#"import { Canvas, Meta, Story } from '@storybook/blocks';
import * as FoobarStories from './Foobar.stories';

# hello

export const args = { bla: 1 };

<Meta of={FoobarStories} />

world {2 + 1}

<Story of={FoobarStories.Foo} />

<Story of={FoobarStories.Unchecked} />"#
    );

    assert_eq!(
        output.module,
        r#"import { Canvas, Meta, Story } from '@storybook/blocks';

const args = { bla: 1 };

export default {
  title: 'foobar',
};

export const Foo = {
  name: 'foo',
};

export const Unchecked = {
  render: Template.bind({}),
  name: 'Unchecked',
  args: {
    ...args,
    label: 'Unchecked',
  },
};
"#
    );
    assert_eq!(output.file_name, "Foobar.stories.tsx");
}

#[test]
fn extracts_all_meta_parameters() {
    let input = "import { Meta } from '@storybook/addon-docs';\n\nexport const args = { bla: 1 };\n\n<Meta title=\"foobar\" args={{...args}} parameters={{a: '1'}} />";
    let output = transform(input);

    assert_eq!(
        output.module,
        "import { Meta } from '@storybook/blocks';\n\nconst args = { bla: 1 };\n\nexport default {\n  title: 'foobar',\n  args: {...args},\n  parameters: {a: '1'},\n};\n"
    );
}

#[test]
fn adds_script_block_when_missing() {
    let output = transform("# Title\n\n<Meta title=\"Foobar\" />\n");

    assert_eq!(
        output.documentation,
        "import * as FoobarStories from './Foobar.stories';\n\n# Title\n\n<Meta of={FoobarStories} />\n"
    );
    assert_eq!(output.module, "export default {\n  title: 'Foobar',\n};\n");
}

#[test]
fn rewrites_stories_inside_other_elements() {
    let input = "<Meta title=\"Foobar\" />\n\n<Canvas withSource=\"open\">\n  <Story name=\"with args\" args={{ a: 1 }}>\n    <Button {...args} />\n  </Story>\n</Canvas>\n";
    let output = transform(input);

    assert!(output.documentation.contains(
        "<Canvas withSource=\"open\">\n  <Story of={FoobarStories.With args} />\n</Canvas>\n"
    ));
    assert_eq!(
        codes(&output),
        vec![DiagnosticCode::InvalidIdentifier, DiagnosticCode::UnformattedModule]
    );
    // the invalid export name keeps the module from parsing, so it is
    // written as synthesized
    assert!(output.module.contains("export const With args = {\n  render: () => <Button {...args} />,"));
}

#[test]
fn jsx_body_becomes_render_function() {
    let input = "<Meta title=\"Foobar\" />\n\n<Canvas>\n  <Story name=\"primary\" args={{ label: \"Go\" }}>\n    <Button {...args} />\n  </Story>\n</Canvas>\n";
    let output = transform(input);

    assert!(output.documentation.contains("<Canvas>\n  <Story of={FoobarStories.Primary} />\n</Canvas>"));
    assert!(output.module.contains(
        "export const Primary = {\n  render: () => <Button {...args} />,\n  name: 'primary',\n  args: { label: 'Go' },\n};\n"
    ));
}

#[test]
fn duplicate_stories_keep_first_position() {
    let input = "<Meta title=\"Foobar\" />\n\n<Story name=\"a\">{1}</Story>\n\n<Story name=\"b\">{2}</Story>\n\n<Story name=\"A\">{3}</Story>\n";
    let output = transform(input);

    let a = output.module.find("export const A").unwrap();
    let b = output.module.find("export const B").unwrap();
    assert!(a < b);
    assert!(output.module.contains("render: () => 3,\n  name: 'A',"));
    assert_eq!(output.module.matches("export const A").count(), 1);
    assert_eq!(codes(&output), vec![DiagnosticCode::DuplicateStory]);
}

#[test]
fn missing_meta_gives_empty_default_export() {
    let output = transform("<Story name=\"only\">{1}</Story>\n");

    assert!(output.module.starts_with("export default {};\n"));
    assert!(codes(&output).contains(&DiagnosticCode::MissingMeta));
}

#[test]
fn file_name_suffixes() {
    let transformer = Transformer::new(TransformOptions::new().style(StyleConfig::default()));
    let name = |file: &str| transformer.transform("", file).unwrap().file_name;

    assert_eq!(name("Button.stories.mdx"), "Button.stories.tsx");
    assert_eq!(name("docs/Button.mdx"), "Button.stories.tsx");
    assert_eq!(name("Buttonstory.mdx"), "Button.stories.tsx");
}

#[test]
fn jsx_dialect_uses_jsx_extension() {
    let output = transform_with(
        TransformOptions::new().dialect(ScriptDialect::Jsx),
        "<Meta title=\"Foobar\" />",
    );
    assert_eq!(output.file_name, "Foobar.stories.jsx");
}

#[test]
fn ts_dialect_cannot_render_jsx_bodies() {
    let output = transform_with(
        TransformOptions::new().dialect(ScriptDialect::Ts),
        "<Meta title=\"Foobar\" />\n\n<Story name=\"a\">\n  <Button />\n</Story>\n",
    );
    assert!(output.module.contains("export const A = {\n  name: 'a',\n};"));
    assert_eq!(codes(&output), vec![DiagnosticCode::ProseStoryBody]);
}

#[test]
fn custom_packages_and_style() {
    let style = StyleConfig {
        tab_width: 4,
        use_tabs: false,
        single_quote: false,
        trailing_comma: TrailingComma::None,
    };
    let output = Transformer::new(
        TransformOptions::new()
            .legacy_package("@company/docs")
            .blocks_package("@company/blocks")
            .style(style),
    )
    .transform(
        "import { Meta } from \"@company/docs/blocks\";\n\n<Meta title=\"Foobar\" />",
        FILE,
    )
    .unwrap();

    assert!(output
        .documentation
        .starts_with("import { Meta } from \"@company/blocks\";\n"));
    assert_eq!(
        output.module,
        "import { Meta } from \"@company/blocks\";\n\nexport default {\n    title: \"Foobar\"\n};\n"
    );
}

#[test]
fn malformed_markup_is_an_error() {
    let err = Transformer::new(TransformOptions::new().style(StyleConfig::default()))
        .transform("<Meta title=\"Foobar\">\n", FILE)
        .unwrap_err();
    assert!(matches!(err, StoryweldError::Markup(_)));
}

#[test]
fn invalid_attribute_expression_is_an_error() {
    let err = Transformer::new(TransformOptions::new().style(StyleConfig::default()))
        .transform("<Meta title=\"Foobar\" args={{ a: }} />\n", FILE)
        .unwrap_err();
    assert!(matches!(err, StoryweldError::ScriptParse { .. }));
}

#[test]
fn untouched_content_is_preserved() {
    let input = "import { Meta } from '@storybook/addon-docs';\n\n<Meta title=\"Foobar\" />\n\n```jsx\n<Story name=\"not parsed\" />\n```\n\n<!-- <Story> -->\n\nSee <https://storybook.js.org>.\n";
    let output = transform(input);
    let (_, rest) = output.documentation.split_once("<Meta of={FoobarStories} />").unwrap();
    assert_eq!(
        rest,
        "\n\n```jsx\n<Story name=\"not parsed\" />\n```\n\n<!-- <Story> -->\n\nSee <https://storybook.js.org>.\n"
    );
    assert!(!output.module.contains("export const"));
}
