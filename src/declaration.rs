//! Declaration-call parser.
//!
//! Locates every `figma.connect(...)` call in a file by structural match on
//! the callee, validates the positional arguments (component reference and/or
//! node URL) and the optional trailing configuration object, and resolves the
//! component identity through the file's import declarations. Each call in a
//! file is parsed independently, so the same component/URL pair can be
//! declared repeatedly with different variant restrictions.

use indexmap::IndexMap;
use oxc_ast::ast::*;
use oxc_span::{GetSpan, Span};

use crate::config::ProjectConfig;
use crate::document::Link;
use crate::error::{line_col, ParseWarning, ParserError};
use crate::intrinsic_parser::{strip_parens, IntrinsicParser};
use crate::intrinsics::PropMapping;
use crate::parse::ProjectContext;

const CONNECT_USAGE: &str =
    "Example: figma.connect(Button, 'https://figma.com/design/abc?node-id=1-2')";

/// The example-rendering function given in a declaration's config object.
#[derive(Debug, Clone, Copy)]
pub enum ExampleFn<'a, 'b> {
    Arrow(&'b ArrowFunctionExpression<'a>),
    Function(&'b Function<'a>),
}

impl<'a, 'b> ExampleFn<'a, 'b> {
    pub fn span(&self) -> Span {
        match self {
            ExampleFn::Arrow(arrow) => arrow.span,
            ExampleFn::Function(func) => func.span,
        }
    }
}

/// One parsed `figma.connect` declaration, still borrowing the syntax tree
/// for the parts the template compiler consumes.
pub struct ConnectDeclaration<'a, 'b> {
    pub component: Option<ComponentRef>,
    pub figma_node_url: String,
    pub props: Option<PropMapping>,
    pub example: Option<ExampleFn<'a, 'b>>,
    pub variant: Option<IndexMap<String, serde_json::Value>>,
    pub links: Option<Vec<Link>>,
    pub imports: Option<Vec<String>>,
    pub span: Span,
}

/// A component reference from the first positional argument. `name` is the
/// full expression text (`Button` or `Ui.Button`); resolution goes through
/// the first dotted segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRef {
    pub name: String,
    pub root: String,
}

/// Where the referenced component was declared. Unresolved references keep
/// an empty source and line 0 alongside a warning instead of failing the
/// parse, since incomplete module-resolution setups are common.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentResolution {
    pub source: String,
    pub line: u32,
    pub warning: Option<ParseWarning>,
}

/// Walk every call expression in the program and hand each `figma.connect`
/// call to `f` in source order. Nodes only live as long as the visit, so
/// callers process each call in place.
pub fn for_each_connect_call<'a>(
    program: &Program<'a>,
    f: impl FnMut(&CallExpression<'a>),
) {
    struct Finder<F> {
        f: F,
    }

    impl<'a, F: FnMut(&CallExpression<'a>)> oxc_ast_visit::Visit<'a> for Finder<F> {
        fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
            if is_connect_call(call) {
                (self.f)(call);
            }
            oxc_ast_visit::walk::walk_call_expression(self, call);
        }
    }

    let mut finder = Finder { f };
    oxc_ast_visit::Visit::visit_program(&mut finder, program);
}

/// True when the callee is the `figma.connect` member expression.
pub fn is_connect_call(call: &CallExpression<'_>) -> bool {
    match strip_parens(&call.callee) {
        Expression::StaticMemberExpression(member) => {
            member.property.name == "connect"
                && matches!(
                    strip_parens(&member.object),
                    Expression::Identifier(id) if id.name == "figma"
                )
        }
        _ => false,
    }
}

pub struct DeclarationParser<'s> {
    source: &'s str,
    file: &'s str,
    config: &'s ProjectConfig,
}

impl<'s> DeclarationParser<'s> {
    pub fn new(source: &'s str, file: &'s str, config: &'s ProjectConfig) -> Self {
        DeclarationParser {
            source,
            file,
            config,
        }
    }

    fn text(&self, span: Span) -> &'s str {
        &self.source[span.start as usize..span.end as usize]
    }

    fn err(&self, message: impl Into<String>, span: Span) -> ParserError {
        ParserError::parse_at(message, self.file, self.source, span.start)
    }

    /// Validate one located `figma.connect` call and pull its pieces apart.
    pub fn parse_declaration<'a, 'b>(
        &self,
        call: &'b CallExpression<'a>,
        program: &'b Program<'a>,
    ) -> Result<ConnectDeclaration<'a, 'b>, ParserError> {
        let first = call
            .arguments
            .first()
            .and_then(|arg| arg.as_expression())
            .ok_or_else(|| {
                self.err(
                    format!(
                        "figma.connect() requires a component reference or a node URL. {}",
                        CONNECT_USAGE
                    ),
                    call.span,
                )
            })?;

        let second = call.arguments.get(1).and_then(|arg| arg.as_expression());

        // First argument is a URL when it is (or resolves to) a string
        // literal and nothing URL-shaped follows it. Otherwise it names the
        // component and the URL must come second.
        let (component, url, config_index) = match self.resolve_url(first, program) {
            Some(url) if !matches!(second.map(strip_parens), Some(Expression::StringLiteral(_))) => {
                (None, url, 1)
            }
            _ => {
                let component = self.component_ref(first)?;
                let second = second.ok_or_else(|| {
                    self.err(
                        format!(
                            "figma.connect() with a component reference requires a node URL as \
                             the second argument. {}",
                            CONNECT_USAGE
                        ),
                        call.span,
                    )
                })?;
                let url = self.resolve_url(second, program).ok_or_else(|| {
                    self.err(
                        format!(
                            "The node URL passed to figma.connect() must be a string literal. {}",
                            CONNECT_USAGE
                        ),
                        second.span(),
                    )
                })?;
                (Some(component), url, 2)
            }
        };

        let figma_node_url = self.config.substitute_url(&url);

        let mut declaration = ConnectDeclaration {
            component,
            figma_node_url,
            props: None,
            example: None,
            variant: None,
            links: None,
            imports: None,
            span: call.span,
        };

        if let Some(config_arg) = call
            .arguments
            .get(config_index)
            .and_then(|arg| arg.as_expression())
        {
            let obj = match strip_parens(config_arg) {
                Expression::ObjectExpression(obj) => obj,
                other => {
                    return Err(self.err(
                        "The configuration argument to figma.connect() must be an object \
                         literal. Example: figma.connect(Button, '...', { props: { ... }, \
                         example: (props) => <Button /> })",
                        other.span(),
                    ))
                }
            };
            self.parse_config_object(obj, &mut declaration)?;
        }

        if declaration.component.is_none() && declaration.example.is_none() {
            return Err(self.err(
                "figma.connect() needs a component reference or an example function, \
                 otherwise there is nothing to generate a code snippet from. \
                 Example: figma.connect('https://...', { example: () => <Button /> })",
                call.span,
            ));
        }

        Ok(declaration)
    }

    fn parse_config_object<'a, 'b>(
        &self,
        obj: &'b ObjectExpression<'a>,
        declaration: &mut ConnectDeclaration<'a, 'b>,
    ) -> Result<(), ParserError> {
        for prop in &obj.properties {
            let prop = match prop {
                ObjectPropertyKind::ObjectProperty(p) => p,
                ObjectPropertyKind::SpreadProperty(s) => {
                    return Err(self.err(
                        "Spread entries are not supported in the figma.connect() \
                         configuration object",
                        s.span,
                    ))
                }
            };
            let key = match &prop.key {
                PropertyKey::StaticIdentifier(id) => id.name.as_str(),
                PropertyKey::StringLiteral(s) => s.value.as_str(),
                other => {
                    return Err(self.err(
                        "Configuration keys must be plain identifiers",
                        other.span(),
                    ))
                }
            };
            let value = strip_parens(&prop.value);
            match key {
                "props" => declaration.props = Some(self.parse_props(value)?),
                "example" => declaration.example = Some(self.parse_example(value)?),
                "variant" => declaration.variant = Some(self.parse_variant(value)?),
                "links" => declaration.links = Some(self.parse_links(value)?),
                "imports" => declaration.imports = Some(self.parse_imports(value)?),
                // Unknown keys pass through untouched so callers can keep
                // extra metadata alongside a declaration.
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_props<'a>(&self, value: &Expression<'a>) -> Result<PropMapping, ParserError> {
        match value {
            Expression::ObjectExpression(obj) => {
                IntrinsicParser::new(self.source, self.file).parse_prop_mapping(obj)
            }
            other => Err(self.err(
                "The `props` field must be an object literal mapping code prop names to \
                 figma helpers. Example: props: { label: figma.string('Label') }",
                other.span(),
            )),
        }
    }

    fn parse_example<'a, 'b>(
        &self,
        value: &'b Expression<'a>,
    ) -> Result<ExampleFn<'a, 'b>, ParserError> {
        match value {
            Expression::ArrowFunctionExpression(arrow) => Ok(ExampleFn::Arrow(arrow)),
            Expression::FunctionExpression(func) => Ok(ExampleFn::Function(func)),
            other => Err(self.err(
                "The `example` field must be a function or arrow expression. \
                 Example: example: (props) => <Button label={props.label} />",
                other.span(),
            )),
        }
    }

    fn parse_variant<'a>(
        &self,
        value: &Expression<'a>,
    ) -> Result<IndexMap<String, serde_json::Value>, ParserError> {
        let obj = match value {
            Expression::ObjectExpression(obj) => obj,
            other => {
                return Err(self.err(
                    "The `variant` field must be an object literal of scalar restrictions. \
                     Example: variant: { 'Has Icon': true }",
                    other.span(),
                ))
            }
        };
        let mut variant = IndexMap::new();
        for prop in &obj.properties {
            let prop = match prop {
                ObjectPropertyKind::ObjectProperty(p) => p,
                ObjectPropertyKind::SpreadProperty(s) => {
                    return Err(self.err("Spread entries are not supported in `variant`", s.span))
                }
            };
            let key = match &prop.key {
                PropertyKey::StaticIdentifier(id) => id.name.to_string(),
                PropertyKey::StringLiteral(s) => s.value.to_string(),
                other => {
                    return Err(self.err("Variant keys must be plain names", other.span()))
                }
            };
            let value = self.scalar_value(&prop.value)?;
            variant.insert(key, value);
        }
        Ok(variant)
    }

    fn scalar_value<'a>(&self, expr: &Expression<'a>) -> Result<serde_json::Value, ParserError> {
        match strip_parens(expr) {
            Expression::StringLiteral(s) => Ok(serde_json::Value::String(s.value.to_string())),
            Expression::BooleanLiteral(b) => Ok(serde_json::Value::Bool(b.value)),
            Expression::NumericLiteral(n) => Ok(serde_json::json!(n.value)),
            Expression::UnaryExpression(unary)
                if unary.operator == UnaryOperator::UnaryNegation =>
            {
                match strip_parens(&unary.argument) {
                    Expression::NumericLiteral(n) => Ok(serde_json::json!(-n.value)),
                    other => Err(self.err(
                        "Variant restriction values must be strings, numbers or booleans",
                        other.span(),
                    )),
                }
            }
            other => Err(self.err(
                "Variant restriction values must be strings, numbers or booleans",
                other.span(),
            )),
        }
    }

    fn parse_links<'a>(&self, value: &Expression<'a>) -> Result<Vec<Link>, ParserError> {
        let array = match value {
            Expression::ArrayExpression(array) => array,
            other => {
                return Err(self.err(
                    "The `links` field must be an array of { name, url } object literals. \
                     Example: links: [{ name: 'Storybook', url: 'https://...' }]",
                    other.span(),
                ))
            }
        };
        let mut links = Vec::new();
        for element in &array.elements {
            let obj = match element.as_expression().map(strip_parens) {
                Some(Expression::ObjectExpression(obj)) => obj,
                _ => {
                    return Err(self.err(
                        "Each entry in `links` must be a { name, url } object literal",
                        array.span,
                    ))
                }
            };
            let mut name = None;
            let mut url = None;
            for prop in &obj.properties {
                if let ObjectPropertyKind::ObjectProperty(p) = prop {
                    let key = match &p.key {
                        PropertyKey::StaticIdentifier(id) => id.name.as_str(),
                        PropertyKey::StringLiteral(s) => s.value.as_str(),
                        _ => continue,
                    };
                    if let Expression::StringLiteral(s) = strip_parens(&p.value) {
                        match key {
                            "name" => name = Some(s.value.to_string()),
                            "url" => url = Some(s.value.to_string()),
                            _ => {}
                        }
                    }
                }
            }
            match (name, url) {
                (Some(name), Some(url)) => links.push(Link { name, url }),
                _ => {
                    return Err(self.err(
                        "Each entry in `links` needs string `name` and `url` fields",
                        obj.span,
                    ))
                }
            }
        }
        Ok(links)
    }

    fn parse_imports<'a>(&self, value: &Expression<'a>) -> Result<Vec<String>, ParserError> {
        let array = match value {
            Expression::ArrayExpression(array) => array,
            other => {
                return Err(self.err(
                    "The `imports` field must be an array of import statement strings. \
                     Example: imports: [\"import { Button } from '@ui/button'\"]",
                    other.span(),
                ))
            }
        };
        let mut imports = Vec::new();
        for element in &array.elements {
            match element.as_expression().map(strip_parens) {
                Some(Expression::StringLiteral(s)) => imports.push(s.value.to_string()),
                _ => {
                    return Err(self.err(
                        "Each entry in `imports` must be a string literal",
                        array.span,
                    ))
                }
            }
        }
        Ok(imports)
    }

    // ── positional argument helpers ──────────────────────────────────────

    /// Resolve a URL-position argument: either a string literal directly,
    /// or an identifier bound to a string literal const in the same file.
    fn resolve_url<'a>(&self, expr: &Expression<'a>, program: &Program<'a>) -> Option<String> {
        match strip_parens(expr) {
            Expression::StringLiteral(s) => Some(s.value.to_string()),
            Expression::Identifier(id) => local_string_const(program, id.name.as_str()),
            _ => None,
        }
    }

    fn component_ref<'a>(&self, expr: &Expression<'a>) -> Result<ComponentRef, ParserError> {
        let expr = strip_parens(expr);
        match expr {
            Expression::Identifier(id) => Ok(ComponentRef {
                name: id.name.to_string(),
                root: id.name.to_string(),
            }),
            Expression::StaticMemberExpression(_) => {
                let name = self.text(expr.span()).to_string();
                let root = name
                    .split('.')
                    .next()
                    .unwrap_or(name.as_str())
                    .to_string();
                Ok(ComponentRef { name, root })
            }
            other => Err(self.err(
                format!(
                    "The first argument to figma.connect() must be a component reference or a \
                     node URL string, found `{}`. {}",
                    self.text(other.span()),
                    CONNECT_USAGE
                ),
                other.span(),
            )),
        }
    }

    // ── component identity resolution ────────────────────────────────────

    /// Follow the component reference's root symbol to its declaration:
    /// through an import declaration (named, default or namespace) and into
    /// the shared project context when the target file was loaded, or to a
    /// declaration in the same file. Unresolvable references degrade to an
    /// empty source plus a warning.
    pub fn resolve_component<'a>(
        &self,
        component: &ComponentRef,
        program: &Program<'a>,
        context: &ProjectContext,
    ) -> ComponentResolution {
        if let Some(line) = local_declaration_line(self.source, program, &component.root) {
            return ComponentResolution {
                source: self.file.to_string(),
                line,
                warning: None,
            };
        }

        if let Some((specifier, imported)) = import_of_symbol(program, &component.root) {
            if let Some((file, line)) = context.resolve_import(self.file, &specifier, &imported) {
                return ComponentResolution {
                    source: file,
                    line,
                    warning: None,
                };
            }
            return ComponentResolution {
                source: String::new(),
                line: 0,
                warning: Some(ParseWarning::new(
                    format!(
                        "Could not resolve `{}` imported from '{}'; the document will have no \
                         source location",
                        component.root, specifier
                    ),
                    self.file,
                )),
            };
        }

        ComponentResolution {
            source: String::new(),
            line: 0,
            warning: Some(ParseWarning::new(
                format!(
                    "Could not find a declaration or import for `{}`; the document will have \
                     no source location",
                    component.root
                ),
                self.file,
            )),
        }
    }
}

/// Look up a top-level `const NAME = '...'` string binding.
fn local_string_const<'a>(program: &Program<'a>, name: &str) -> Option<String> {
    for stmt in &program.body {
        let decl = match stmt {
            Statement::VariableDeclaration(decl) => decl,
            Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(Declaration::VariableDeclaration(decl)) => decl,
                _ => continue,
            },
            _ => continue,
        };
        for declarator in &decl.declarations {
            if let BindingPattern::BindingIdentifier(id) = &declarator.id {
                if id.name == name {
                    if let Some(Expression::StringLiteral(s)) =
                        declarator.init.as_ref().map(strip_parens)
                    {
                        return Some(s.value.to_string());
                    }
                }
            }
        }
    }
    None
}

/// 1-based line of a top-level function, class or variable declaration with
/// the given name, looking through `export` wrappers.
pub fn local_declaration_line<'a>(source: &str, program: &Program<'a>, name: &str) -> Option<u32> {
    fn function_span<'a>(func: &Function<'a>, name: &str) -> Option<Span> {
        func.id.as_ref().filter(|id| id.name == name).map(|_| func.span)
    }

    fn variable_span<'a>(var: &VariableDeclaration<'a>, name: &str) -> Option<Span> {
        var.declarations.iter().find_map(|d| {
            if let BindingPattern::BindingIdentifier(id) = &d.id {
                if id.name == name {
                    return Some(var.span);
                }
            }
            None
        })
    }

    fn class_span<'a>(class: &Class<'a>, name: &str) -> Option<Span> {
        class.id.as_ref().filter(|id| id.name == name).map(|_| class.span)
    }

    for stmt in &program.body {
        let span = match stmt {
            Statement::FunctionDeclaration(func) => function_span(func, name),
            Statement::VariableDeclaration(var) => variable_span(var, name),
            Statement::ClassDeclaration(class) => class_span(class, name),
            Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(Declaration::FunctionDeclaration(func)) => function_span(func, name),
                Some(Declaration::VariableDeclaration(var)) => variable_span(var, name),
                Some(Declaration::ClassDeclaration(class)) => class_span(class, name),
                _ => None,
            },
            Statement::ExportDefaultDeclaration(export) => match &export.declaration {
                ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                    function_span(func, name)
                }
                ExportDefaultDeclarationKind::ClassDeclaration(class) => class_span(class, name),
                _ => None,
            },
            _ => None,
        };
        if let Some(span) = span {
            return Some(line_col(source, span.start).0);
        }
    }
    None
}

/// Find the import declaration binding `name` locally; returns the module
/// specifier and the imported name (`default` for default imports, `*` for
/// namespace imports).
fn import_of_symbol<'a>(program: &Program<'a>, name: &str) -> Option<(String, String)> {
    for stmt in &program.body {
        let Statement::ImportDeclaration(import) = stmt else {
            continue;
        };
        let Some(specifiers) = &import.specifiers else {
            continue;
        };
        for specifier in specifiers {
            match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) if s.local.name == name => {
                    let imported = match &s.imported {
                        ModuleExportName::IdentifierName(id) => id.name.to_string(),
                        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
                        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
                    };
                    return Some((import.source.value.to_string(), imported));
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) if s.local.name == name => {
                    return Some((import.source.value.to_string(), "default".to_string()));
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) if s.local.name == name => {
                    return Some((import.source.value.to_string(), "*".to_string()));
                }
                _ => {}
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tsx_source_type;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;

    fn with_declarations<R>(
        source: &str,
        f: impl FnOnce(&DeclarationParser, Vec<Result<String, String>>, &Program) -> R,
    ) -> R {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, tsx_source_type()).parse();
        assert!(ret.errors.is_empty(), "fixture must parse: {:?}", ret.errors);
        let config = ProjectConfig::default();
        let parser = DeclarationParser::new(source, "buttons.figma.tsx", &config);
        let mut outcomes = Vec::new();
        for_each_connect_call(&ret.program, |call| {
            outcomes.push(
                parser
                    .parse_declaration(call, &ret.program)
                    .map(|d| d.figma_node_url.clone())
                    .map_err(|e| e.message),
            );
        });
        f(&parser, outcomes, &ret.program)
    }

    #[test]
    fn test_url_only_declaration() {
        with_declarations(
            "figma.connect('https://figma.com/f?node-id=1-2', { example: () => <button /> })",
            |_, outcomes, _| {
                assert_eq!(outcomes.len(), 1);
                assert_eq!(
                    outcomes[0].as_deref(),
                    Ok("https://figma.com/f?node-id=1-2")
                );
            },
        );
    }

    #[test]
    fn test_component_requires_url() {
        with_declarations("figma.connect(Button)", |_, outcomes, _| {
            let err = outcomes[0].as_ref().unwrap_err();
            assert!(err.contains("node URL"), "{}", err);
        });
    }

    #[test]
    fn test_url_through_local_const() {
        let source = "\
const BUTTON_URL = 'https://figma.com/f?node-id=9-9';
figma.connect(Button, BUTTON_URL);
";
        with_declarations(source, |_, outcomes, _| {
            assert_eq!(
                outcomes[0].as_deref(),
                Ok("https://figma.com/f?node-id=9-9")
            );
        });
    }

    #[test]
    fn test_nothing_to_template_is_error() {
        with_declarations("figma.connect('https://figma.com/f?node-id=1-2')", |_, outcomes, _| {
            let err = outcomes[0].as_ref().unwrap_err();
            assert!(err.contains("example"), "{}", err);
        });
    }

    #[test]
    fn test_sibling_calls_are_independent() {
        let source = "\
figma.connect(Button, 'https://figma.com/f?node-id=1-2');
figma.connect(Button, 'https://figma.com/f?node-id=1-2', { variant: { 'Has Icon': true } });
";
        with_declarations(source, |_, outcomes, _| {
            assert_eq!(outcomes.len(), 2);
            assert!(outcomes.iter().all(|o| o.is_ok()));
        });
    }

    #[test]
    fn test_variant_scalars() {
        let allocator = Allocator::default();
        let source =
            "figma.connect(Button, 'u', { variant: { 'Has Icon': true, Size: 'lg', Depth: -2 } })";
        let ret = Parser::new(&allocator, source, tsx_source_type()).parse();
        let config = ProjectConfig::default();
        let parser = DeclarationParser::new(source, "t.figma.tsx", &config);
        let mut variants = Vec::new();
        for_each_connect_call(&ret.program, |call| {
            let declaration = parser.parse_declaration(call, &ret.program).unwrap();
            variants.push(declaration.variant.clone());
        });
        let variant = variants[0].as_ref().unwrap();
        assert_eq!(variant["Has Icon"], serde_json::Value::Bool(true));
        assert_eq!(variant["Size"], serde_json::json!("lg"));
        assert_eq!(variant["Depth"], serde_json::json!(-2.0));
    }

    #[test]
    fn test_component_resolves_to_local_declaration() {
        let source = "\
export function Button() { return <button />; }
figma.connect(Button, 'https://figma.com/f?node-id=1-2');
";
        with_declarations(source, |parser, _, program| {
            let component = ComponentRef {
                name: "Button".to_string(),
                root: "Button".to_string(),
            };
            let resolution =
                parser.resolve_component(&component, program, &ProjectContext::default());
            assert_eq!(
                resolution,
                ComponentResolution {
                    source: "buttons.figma.tsx".to_string(),
                    line: 1,
                    warning: None,
                }
            );
        });
    }

    #[test]
    fn test_unresolved_import_degrades_with_warning() {
        let source = "\
import { Button } from '@missing/button';
figma.connect(Button, 'https://figma.com/f?node-id=1-2');
";
        with_declarations(source, |parser, _, program| {
            let component = ComponentRef {
                name: "Button".to_string(),
                root: "Button".to_string(),
            };
            let resolution =
                parser.resolve_component(&component, program, &ProjectContext::default());
            assert_eq!(resolution.source, "");
            assert_eq!(resolution.line, 0);
            let warning = resolution.warning.unwrap();
            assert!(warning.message.contains("@missing/button"), "{}", warning.message);
        });
    }

    #[test]
    fn test_url_substitution_applies() {
        let mut config = ProjectConfig::default();
        config
            .url_substitutions
            .insert("ui/".to_string(), "https://figma.com/design/abc/".to_string());
        let source = "figma.connect(Button, 'ui/button')";
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, tsx_source_type()).parse();
        let parser = DeclarationParser::new(source, "t.figma.tsx", &config);
        let mut urls = Vec::new();
        for_each_connect_call(&ret.program, |call| {
            urls.push(parser.parse_declaration(call, &ret.program).unwrap().figma_node_url);
        });
        assert_eq!(urls[0], "https://figma.com/design/abc/button");
    }
}
