//! End-to-end tests over the full parse pipeline: source text in,
//! serialized documents out.

use crate::config::ProjectConfig;
use crate::parse::{parse_source, ProjectContext};
use crate::template::TEMPLATE_PRELUDE;

fn parse_ok(source: &str) -> crate::parse::ParseOutcome {
    let config = ProjectConfig::default();
    parse_source(source, "src/Button.figma.tsx", &config, &ProjectContext::new()).unwrap()
}

#[test]
fn test_bare_connect_emits_default_template() {
    let source = "\
import Button from './Button';

figma.connect(Button, 'https://figma.com/f?node-id=1-2');
";
    let mut config = ProjectConfig::default();
    config
        .import_paths
        .insert("./Button".to_string(), "@ui/Button".to_string());
    let outcome = parse_source(
        source,
        "src/Button.figma.tsx",
        &config,
        &ProjectContext::new(),
    )
    .unwrap();

    assert_eq!(outcome.documents.len(), 1);
    let document = &outcome.documents[0];
    assert_eq!(document.component.as_deref(), Some("Button"));
    assert_eq!(
        document.template,
        format!("{}\nexport default figma.tsx`<Button />`", TEMPLATE_PRELUDE)
    );
    assert_eq!(document.template_data.nestable, Some(true));
    assert_eq!(
        document.template_data.imports.as_deref(),
        Some(&["import Button from '@ui/Button'".to_string()][..])
    );
}

#[test]
fn test_boolean_prop_example_scenario() {
    let source = "\
import { Button } from './Button';

figma.connect(Button, 'https://figma.com/f?node-id=3-4', {
  props: { disabled: figma.boolean('Disabled') },
  example: (props) => <Button disabled={props.disabled} />,
});
";
    let outcome = parse_ok(source);
    let document = &outcome.documents[0];
    assert_eq!(document.template_data.nestable, Some(true));
    assert!(document
        .template
        .contains("const disabled = figma.properties.boolean('Disabled')"));
    assert!(document.template.contains("${__attr('disabled', disabled)}"));
    let props = document.template_data.props.as_ref().unwrap();
    assert!(props.contains_key("disabled"));
}

#[test]
fn test_variant_sibling_calls_produce_two_documents() {
    let source = "\
import { Button } from './Button';

figma.connect(Button, 'https://figma.com/f?node-id=5-6');
figma.connect(Button, 'https://figma.com/f?node-id=5-6', {
  variant: { 'Has Icon': true },
  example: () => <Button icon />,
});
";
    let outcome = parse_ok(source);
    assert_eq!(outcome.documents.len(), 2);
    assert_eq!(outcome.documents[0].figma_node_url, outcome.documents[1].figma_node_url);
    assert!(outcome.documents[0].variant.is_none());
    let variant = outcome.documents[1].variant.as_ref().unwrap();
    assert_eq!(variant["Has Icon"], serde_json::Value::Bool(true));
    assert_ne!(outcome.documents[0].template, outcome.documents[1].template);
}

#[test]
fn test_two_statement_body_is_not_nestable() {
    let source = "\
import { Card } from './Card';

figma.connect(Card, 'https://figma.com/f?node-id=7-8', {
  props: { title: figma.string('Title') },
  example: (props) => {
    const width = 240;
    return <Card title={props.title} width={width} />;
  },
});
";
    let outcome = parse_ok(source);
    let document = &outcome.documents[0];
    assert_eq!(document.template_data.nestable, Some(false));
    assert!(document.template.contains("function __example() {"));
    assert!(document.template.contains("const width = 240;"));
    assert!(document.template.contains("return figma.tsx`<Card "));
    assert!(document.template.ends_with("export default __example()"));
}

#[test]
fn test_reparsing_is_byte_identical() {
    let source = "\
import { Chip } from './Chip';

figma.connect(Chip, 'https://figma.com/f?node-id=9-9', {
  props: {
    label: figma.string('Label'),
    kind: figma.enum('Kind', { Filled: 'filled', Outline: 'outline' }),
  },
  example: (props) => <Chip label={props.label} kind={props.kind} />,
});
";
    let first = serde_json::to_string(&parse_ok(source).documents).unwrap();
    let second = serde_json::to_string(&parse_ok(source).documents).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_children_wildcard_rules_end_to_end() {
    let single = "\
figma.connect('https://figma.com/f?node-id=1-1', {
  props: { rows: figma.children('Row *') },
  example: (props) => <table>{props.rows}</table>,
});
";
    assert!(parse_ok(single).documents[0]
        .template
        .contains("figma.properties.children(['Row *'])"));

    let array = "\
figma.connect('https://figma.com/f?node-id=1-1', {
  props: { rows: figma.children(['Row *', 'Header']) },
  example: (props) => <table>{props.rows}</table>,
});
";
    let config = ProjectConfig::default();
    let err = parse_source(array, "t.figma.tsx", &config, &ProjectContext::new()).unwrap_err();
    assert!(err.message.contains("Wildcards"), "{}", err.message);
}

#[test]
fn test_unknown_prop_reference_fails_the_declaration() {
    let source = "\
figma.connect('https://figma.com/f?node-id=1-1', {
  props: { label: figma.string('Label') },
  example: (props) => <span>{props.size}</span>,
});
";
    let config = ProjectConfig::default();
    let err = parse_source(source, "t.figma.tsx", &config, &ProjectContext::new()).unwrap_err();
    assert!(err.message.contains("size"), "{}", err.message);
    assert_eq!(err.file, "t.figma.tsx");
    assert!(err.line.is_some());
}

#[test]
fn test_spread_expansion_preserves_mapping_order() {
    let source = "\
figma.connect('https://figma.com/f?node-id=1-1', {
  props: {
    variant: figma.enum('Variant', { Primary: 'primary' }),
    size: figma.string('Size'),
    disabled: figma.boolean('Disabled'),
  },
  example: (props) => <button {...props} />,
});
";
    let outcome = parse_ok(source);
    let template = &outcome.documents[0].template;
    let variant_at = template.find("__attr('variant'").unwrap();
    let size_at = template.find("__attr('size'").unwrap();
    let disabled_at = template.find("__attr('disabled'").unwrap();
    assert!(variant_at < size_at && size_at < disabled_at);
}

#[test]
fn test_nested_props_renders_synthetic_binding() {
    let source = "\
figma.connect('https://figma.com/f?node-id=2-2', {
  props: {
    icon: figma.nestedProps('Icon', { size: figma.string('Size') }),
  },
  example: (props) => <i data-size={props.icon.size} />,
});
";
    let outcome = parse_ok(source);
    let template = &outcome.documents[0].template;
    assert!(template.contains("figma.properties.nestedProps('Icon'"));
    assert!(template.contains("${__attr('data-size', icon.size)}"));
}

#[test]
fn test_label_override_from_config() {
    let mut config = ProjectConfig::default();
    config.label = Some("Web Components".to_string());
    let source = "figma.connect('https://figma.com/f?node-id=1-1', { example: () => <hr /> });";
    let outcome = parse_source(source, "t.figma.tsx", &config, &ProjectContext::new()).unwrap();
    assert_eq!(outcome.documents[0].label, "Web Components");
    assert_eq!(outcome.documents[0].language, "typescript");
}
