//! Example/template compiler.
//!
//! Takes a declaration's example-rendering function, finds the element it
//! renders, rewrites property-bag references into placeholder nodes, and
//! prints a self-contained template program. The template consists of a
//! fixed prelude (the `figma` runtime require plus small pure helper
//! functions transplanted verbatim into the template's scope), one
//! `const <prop> = <resolution expression>` per referenced property in
//! mapping order, and a final `export default figma.tsx\`...\`` expression.
//!
//! Placeholders travel through an explicit template IR and a single printer
//! turns the IR into text. Multi-statement example bodies are not nestable;
//! their statements are preserved verbatim inside a named wrapper function
//! whose final return produces the rendered element.

use std::collections::HashSet;

use oxc_ast::ast::*;
use oxc_span::{GetSpan, Span};

use crate::config::ProjectConfig;
use crate::declaration::ExampleFn;
use crate::error::ParserError;
use crate::intrinsic_parser::strip_parens;
use crate::intrinsics::{js_quote, render_intrinsic, PropMapping, RenderCtx};

/// Fixed template prelude. Emitted verbatim at the top of every template;
/// renderers rely on this block being byte-identical across runs.
pub const TEMPLATE_PRELUDE: &str = "\
const figma = require('figma')

function __value(value) {
  if (value && typeof value === 'object' && 'type' in value && 'source' in value) {
    return value.source
  }
  return value
}

function __attr(name, value) {
  const v = __value(value)
  if (v === undefined || v === null || v === false) {
    return ''
  }
  if (v === true) {
    return name
  }
  if (typeof v === 'string') {
    return name + '=\"' + v.replace(/\"/g, '&quot;').replace(/\\n/g, '\\\\n') + '\"'
  }
  if (Array.isArray(v)) {
    return name + '={<>' + v.map(__child).join('') + '</>}'
  }
  return name + '={' + v + '}'
}

function __child(value) {
  const v = __value(value)
  if (v === undefined || v === null || v === false) {
    return ''
  }
  if (Array.isArray(v)) {
    return v.map(__child).join('\\n')
  }
  return String(v)
}
";

/// Name of the wrapper function emitted for non-nestable example bodies.
const WRAPPER_NAME: &str = "__example";

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    pub template: String,
    pub imports: Vec<String>,
    pub nestable: bool,
}

/// The rendering function's property-bag parameter, in either of its
/// declared shapes.
#[derive(Debug, Default)]
struct BagParam {
    name: Option<String>,
    /// Destructured bindings as (local name, mapping key) pairs; renamed
    /// destructuring (`{ label: l }`) binds `l` to the `label` key.
    destructured: Vec<(String, String)>,
}

impl BagParam {
    fn from_pattern(pattern: Option<&BindingPattern<'_>>) -> BagParam {
        match pattern {
            Some(BindingPattern::BindingIdentifier(id)) => BagParam {
                name: Some(id.name.to_string()),
                destructured: Vec::new(),
            },
            Some(BindingPattern::ObjectPattern(obj)) => BagParam {
                name: None,
                destructured: obj
                    .properties
                    .iter()
                    .filter_map(|prop| {
                        let key = match &prop.key {
                            PropertyKey::StaticIdentifier(id) => id.name.to_string(),
                            _ => return None,
                        };
                        match &prop.value {
                            BindingPattern::BindingIdentifier(local) => {
                                Some((local.name.to_string(), key))
                            }
                            _ => None,
                        }
                    })
                    .collect(),
            },
            _ => BagParam::default(),
        }
    }

    fn destructured_key(&self, local: &str) -> Option<&str> {
        self.destructured
            .iter()
            .find(|(l, _)| l == local)
            .map(|(_, key)| key.as_str())
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.destructured.is_empty()
    }
}

// ── template IR ──────────────────────────────────────────────────────────

#[derive(Debug)]
enum TemplateNode {
    Element(TemplateElement),
    Fragment(Vec<TemplateNode>),
    Text(String),
    /// Child-position property reference carrying the dotted path.
    Placeholder(String),
    /// Expression source text with embedded references already spliced.
    Expr(String),
}

#[derive(Debug)]
struct TemplateElement {
    tag: String,
    attrs: Vec<TemplateAttr>,
    children: Vec<TemplateNode>,
}

#[derive(Debug)]
enum TemplateAttr {
    Static { name: String, value: String },
    Bare { name: String },
    /// Attribute-position property reference; prints the whole
    /// name/value pair through the `__attr` helper.
    Placeholder { name: String, path: String },
    Expr { name: String, source: String },
    Raw(String),
}

// ── compiler ─────────────────────────────────────────────────────────────

pub struct TemplateCompiler<'s> {
    source: &'s str,
    file: &'s str,
    config: &'s ProjectConfig,
    props: Option<&'s PropMapping>,
    explicit_imports: Option<&'s [String]>,
}

struct LowerState {
    bag: BagParam,
    /// First segments of every reference; decides which consts are emitted.
    referenced: HashSet<String>,
    /// Keys referenced individually somewhere; excluded from spread
    /// expansion.
    individual: HashSet<String>,
    /// Root identifiers of element tags, for import collection.
    tags: Vec<String>,
}

impl<'s> TemplateCompiler<'s> {
    pub fn new(
        source: &'s str,
        file: &'s str,
        config: &'s ProjectConfig,
        props: Option<&'s PropMapping>,
        explicit_imports: Option<&'s [String]>,
    ) -> Self {
        TemplateCompiler {
            source,
            file,
            config,
            props,
            explicit_imports,
        }
    }

    fn text(&self, span: Span) -> &'s str {
        &self.source[span.start as usize..span.end as usize]
    }

    fn err(&self, message: impl Into<String>, span: Span) -> ParserError {
        ParserError::parse_at(message, self.file, self.source, span.start)
    }

    /// Compile the fixed single-element template used when a declaration
    /// names a component but gives no example.
    pub fn compile_default(
        &self,
        component_name: &str,
        program: &Program<'_>,
    ) -> CompiledTemplate {
        let root = component_name
            .split('.')
            .next()
            .unwrap_or(component_name)
            .to_string();
        let template = format!(
            "{}\nexport default figma.tsx`<{} />`",
            TEMPLATE_PRELUDE, component_name
        );
        CompiledTemplate {
            template,
            imports: self.collect_imports(&[root], program),
            nestable: true,
        }
    }

    /// Compile an example function into a template.
    pub fn compile_example(
        &self,
        example: ExampleFn<'_, '_>,
        program: &Program<'_>,
    ) -> Result<CompiledTemplate, ParserError> {
        let (params, body, expression_body) = match example {
            ExampleFn::Arrow(arrow) => (&arrow.params, &arrow.body, arrow.expression),
            ExampleFn::Function(func) => {
                let body = func.body.as_ref().ok_or_else(|| {
                    self.err("The example function has no body", func.span)
                })?;
                (&func.params, body, false)
            }
        };

        if params.items.len() > 1 {
            return Err(self.err(
                "The example function takes at most one parameter, the property bag. \
                 Example: (props) => <Button label={props.label} />",
                example.span(),
            ));
        }
        let bag = BagParam::from_pattern(params.items.first().map(|p| &p.pattern));

        if expression_body {
            let expr = match body.statements.first() {
                Some(Statement::ExpressionStatement(stmt)) => strip_parens(&stmt.expression),
                _ => {
                    return Err(self.err(
                        "The example function must render an element",
                        example.span(),
                    ))
                }
            };
            let element = jsx_of_expression(expr).ok_or_else(|| {
                self.err(
                    "The example function must return an element or fragment",
                    expr.span(),
                )
            })?;
            return self.compile_nestable(element, bag, program);
        }

        // Block body: a lone `return <element />` is still nestable; any
        // surrounding statement makes the body non-nestable.
        if body.statements.len() == 1 {
            if let Statement::ReturnStatement(ret) = &body.statements[0] {
                if let Some(arg) = ret.argument.as_ref().map(strip_parens) {
                    if let Some(element) = jsx_of_expression(arg) {
                        return self.compile_nestable(element, bag, program);
                    }
                }
            }
        }

        let element = find_jsx_in_statements(&body.statements).ok_or_else(|| {
            self.err(
                "The example function must render an element somewhere in its body",
                example.span(),
            )
        })?;
        self.compile_wrapped(body, element, bag, program)
    }

    fn compile_nestable(
        &self,
        element: Jsx<'_, '_>,
        bag: BagParam,
        program: &Program<'_>,
    ) -> Result<CompiledTemplate, ParserError> {
        // Pre-scan so a spread knows about keys referenced individually
        // anywhere in the element, even after the spread itself.
        let refs = self.validated_refs(&bag, |collector| match element {
            Jsx::Element(el) => oxc_ast_visit::Visit::visit_jsx_element(collector, el),
            Jsx::Fragment(fragment) => {
                oxc_ast_visit::Visit::visit_jsx_fragment(collector, fragment)
            }
        })?;
        let mut state = LowerState {
            individual: refs
                .iter()
                .map(|(_, path)| first_segment(path).to_string())
                .collect(),
            bag,
            referenced: HashSet::new(),
            tags: Vec::new(),
        };
        let node = self.lower_jsx(element, &mut state)?;

        let mut printed = String::new();
        print_node(&node, &mut printed);

        let consts = self.const_declarations(&state.referenced);
        let template = format!(
            "{}\n{}export default figma.tsx`{}`",
            TEMPLATE_PRELUDE, consts, printed
        );
        Ok(CompiledTemplate {
            template,
            imports: self.collect_imports(&state.tags, program),
            nestable: true,
        })
    }

    fn compile_wrapped(
        &self,
        body: &FunctionBody<'_>,
        element: Jsx<'_, '_>,
        bag: BagParam,
        program: &Program<'_>,
    ) -> Result<CompiledTemplate, ParserError> {
        let element_span = element.span();
        let all_refs = self.validated_refs(&bag, |collector| {
            for stmt in &body.statements {
                oxc_ast_visit::Visit::visit_statement(collector, stmt);
            }
        })?;

        let mut state = LowerState {
            individual: all_refs
                .iter()
                .map(|(_, path)| first_segment(path).to_string())
                .collect(),
            bag,
            referenced: HashSet::new(),
            tags: Vec::new(),
        };
        let node = self.lower_jsx(element, &mut state)?;
        let mut printed = String::new();
        print_node(&node, &mut printed);

        // Statement references become bare const names; the element itself
        // becomes the rendered template expression.
        for (_, path) in &all_refs {
            state.referenced.insert(first_segment(path).to_string());
        }
        let mut replacements: Vec<(u32, u32, String)> = all_refs
            .into_iter()
            .filter(|(span, _)| span.start < element_span.start || span.end > element_span.end)
            .map(|(span, path)| (span.start, span.end, path))
            .collect();
        replacements.push((
            element_span.start,
            element_span.end,
            format!("figma.tsx`{}`", printed),
        ));
        replacements.sort_by_key(|(start, _, _)| std::cmp::Reverse(*start));

        let body_span = body.span;
        let mut block = self.text(body_span).to_string();
        for (start, end, replacement) in replacements {
            let start = (start - body_span.start) as usize;
            let end = (end - body_span.start) as usize;
            block.replace_range(start..end, &replacement);
        }

        let consts = self.const_declarations(&state.referenced);
        let template = format!(
            "{}\n{}function {}() {}\n\nexport default {}()",
            TEMPLATE_PRELUDE, consts, WRAPPER_NAME, block, WRAPPER_NAME
        );
        Ok(CompiledTemplate {
            template,
            imports: self.collect_imports(&state.tags, program),
            nestable: false,
        })
    }

    // ── reference collection ─────────────────────────────────────────────

    /// Run the span collector over some subtree, then check every reference
    /// against the property mapping.
    fn validated_refs(
        &self,
        bag: &BagParam,
        walk: impl FnOnce(&mut RefSpanCollector<'_>),
    ) -> Result<Vec<(Span, String)>, ParserError> {
        let mut collector = RefSpanCollector {
            bag,
            refs: Vec::new(),
        };
        walk(&mut collector);
        for (span, path) in &collector.refs {
            self.check_known_prop(path, *span)?;
        }
        Ok(collector.refs)
    }

    fn check_known_prop(&self, path: &str, span: Span) -> Result<(), ParserError> {
        let key = first_segment(path);
        let known = self.props.map(|p| p.contains_key(key)).unwrap_or(false);
        if known {
            Ok(())
        } else {
            Err(self.err(
                format!(
                    "`{}` is referenced in the example but has no entry in the `props` \
                     mapping; add one, e.g. props: {{ {}: figma.string('{}') }}",
                    path, key, key
                ),
                span,
            ))
        }
    }

    // ── lowering ─────────────────────────────────────────────────────────

    fn lower_jsx(
        &self,
        jsx: Jsx<'_, '_>,
        state: &mut LowerState,
    ) -> Result<TemplateNode, ParserError> {
        match jsx {
            Jsx::Element(element) => self.lower_element(element, state),
            Jsx::Fragment(fragment) => {
                let children = self.lower_children(&fragment.children, state)?;
                Ok(TemplateNode::Fragment(children))
            }
        }
    }

    fn lower_element(
        &self,
        element: &JSXElement<'_>,
        state: &mut LowerState,
    ) -> Result<TemplateNode, ParserError> {
        let opening = &element.opening_element;
        let tag = self.text(opening.name.span()).to_string();
        if let Some(root) = tag_root(&opening.name) {
            if !state.tags.contains(&root) {
                state.tags.push(root);
            }
        }

        let mut attrs = Vec::new();
        for item in &opening.attributes {
            match item {
                JSXAttributeItem::Attribute(attr) => {
                    attrs.push(self.lower_attribute(attr, state)?);
                }
                JSXAttributeItem::SpreadAttribute(spread) => {
                    self.lower_spread(spread, state, &mut attrs)?;
                }
            }
        }

        let children = self.lower_children(&element.children, state)?;
        Ok(TemplateNode::Element(TemplateElement {
            tag,
            attrs,
            children,
        }))
    }

    fn lower_attribute(
        &self,
        attr: &JSXAttribute<'_>,
        state: &mut LowerState,
    ) -> Result<TemplateAttr, ParserError> {
        let name = self.text(attr.name.span()).to_string();
        match &attr.value {
            None => Ok(TemplateAttr::Bare { name }),
            Some(JSXAttributeValue::StringLiteral(s)) => Ok(TemplateAttr::Static {
                name,
                value: s.value.to_string(),
            }),
            Some(JSXAttributeValue::ExpressionContainer(container)) => {
                match container.expression.as_expression() {
                    Some(expr) => {
                        if let Some(path) = prop_ref_path(expr, &state.bag) {
                            self.check_known_prop(&path, expr.span())?;
                            state.referenced.insert(first_segment(&path).to_string());
                            state.individual.insert(first_segment(&path).to_string());
                            Ok(TemplateAttr::Placeholder { name, path })
                        } else {
                            let source = self.splice_expression(expr, state)?;
                            Ok(TemplateAttr::Expr { name, source })
                        }
                    }
                    None => Ok(TemplateAttr::Bare { name }),
                }
            }
            Some(JSXAttributeValue::Element(el)) => {
                let source = escape_template_text(self.text(el.span));
                Ok(TemplateAttr::Expr { name, source })
            }
            Some(JSXAttributeValue::Fragment(fragment)) => {
                let source = escape_template_text(self.text(fragment.span));
                Ok(TemplateAttr::Expr { name, source })
            }
        }
    }

    fn lower_spread(
        &self,
        spread: &JSXSpreadAttribute<'_>,
        state: &mut LowerState,
        attrs: &mut Vec<TemplateAttr>,
    ) -> Result<(), ParserError> {
        let arg = strip_parens(&spread.argument);
        let is_bag_spread = matches!(
            arg,
            Expression::Identifier(id) if state.bag.name.as_deref() == Some(id.name.as_str())
        );
        if !is_bag_spread {
            attrs.push(TemplateAttr::Raw(
                escape_template_text(self.text(spread.span)),
            ));
            return Ok(());
        }

        let props = self.props.filter(|p| !p.is_empty()).ok_or_else(|| {
            self.err(
                "Spreading the property bag requires a non-empty `props` mapping to \
                 expand from",
                spread.span,
            )
        })?;
        for key in props.keys() {
            if state.individual.contains(key) {
                continue;
            }
            state.referenced.insert(key.clone());
            attrs.push(TemplateAttr::Placeholder {
                name: key.clone(),
                path: key.clone(),
            });
        }
        Ok(())
    }

    fn lower_children(
        &self,
        children: &oxc_allocator::Vec<'_, JSXChild<'_>>,
        state: &mut LowerState,
    ) -> Result<Vec<TemplateNode>, ParserError> {
        let mut out = Vec::new();
        for child in children {
            match child {
                JSXChild::Text(text) => {
                    if !text.value.trim().is_empty() {
                        out.push(TemplateNode::Text(text.value.to_string()));
                    }
                }
                JSXChild::Element(el) => out.push(self.lower_element(el, state)?),
                JSXChild::Fragment(fragment) => {
                    let children = self.lower_children(&fragment.children, state)?;
                    out.push(TemplateNode::Fragment(children));
                }
                JSXChild::ExpressionContainer(container) => {
                    if let Some(expr) = container.expression.as_expression() {
                        if let Some(path) = prop_ref_path(expr, &state.bag) {
                            self.check_known_prop(&path, expr.span())?;
                            state.referenced.insert(first_segment(&path).to_string());
                            state.individual.insert(first_segment(&path).to_string());
                            out.push(TemplateNode::Placeholder(path));
                        } else {
                            let source = self.splice_expression(expr, state)?;
                            out.push(TemplateNode::Expr(source));
                        }
                    }
                }
                JSXChild::Spread(spread) => {
                    out.push(TemplateNode::Expr(escape_template_text(
                        self.text(spread.span),
                    )));
                }
            }
        }
        Ok(out)
    }

    /// Keep a complex expression as source text, splicing each embedded
    /// property reference through the `__child` helper.
    fn splice_expression(
        &self,
        expr: &Expression<'_>,
        state: &mut LowerState,
    ) -> Result<String, ParserError> {
        let refs = self.validated_refs(&state.bag, |collector| {
            oxc_ast_visit::Visit::visit_expression(collector, expr);
        })?;
        let expr_span = expr.span();
        let source = self.text(expr_span);

        let mut refs = refs;
        refs.sort_by_key(|(span, _)| span.start);

        let mut out = String::new();
        let mut cursor = 0usize;
        for (span, path) in refs {
            let start = (span.start - expr_span.start) as usize;
            let end = (span.end - expr_span.start) as usize;
            out.push_str(&escape_template_text(&source[cursor..start]));
            out.push_str(&format!("${{__child({})}}", path));
            state.referenced.insert(first_segment(&path).to_string());
            state.individual.insert(first_segment(&path).to_string());
            cursor = end;
        }
        out.push_str(&escape_template_text(&source[cursor..]));
        Ok(out)
    }

    // ── const emission ───────────────────────────────────────────────────

    /// One `const <prop> = ...` per referenced property, in mapping order,
    /// each preceded by any preamble bindings its renderer needs. Returns
    /// an empty string or a block ending in a blank line.
    fn const_declarations(&self, referenced: &HashSet<String>) -> String {
        let Some(props) = self.props else {
            return String::new();
        };
        let mut ctx = RenderCtx::new();
        let mut out = String::new();
        for (key, intrinsic) in props.iter() {
            if !referenced.contains(key) {
                continue;
            }
            let rendered = render_intrinsic(intrinsic, &mut ctx);
            for line in &rendered.preamble {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&format!("const {} = {}\n", key, rendered.expr));
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    // ── import collection ────────────────────────────────────────────────

    /// Import statements for the element tags used by the example, filtered
    /// down to the used specifiers and rewritten through the config's
    /// import-path rules. Explicit `imports` from the declaration win.
    fn collect_imports(&self, tags: &[String], program: &Program<'_>) -> Vec<String> {
        if let Some(explicit) = self.explicit_imports {
            return explicit.to_vec();
        }

        let mut out = Vec::new();
        for stmt in &program.body {
            let Statement::ImportDeclaration(import) = stmt else {
                continue;
            };
            let Some(specifiers) = &import.specifiers else {
                continue;
            };

            let mut default: Option<String> = None;
            let mut namespace: Option<String> = None;
            let mut named: Vec<String> = Vec::new();
            for specifier in specifiers {
                match specifier {
                    ImportDeclarationSpecifier::ImportSpecifier(s) => {
                        let local = s.local.name.as_str();
                        if !tags.iter().any(|t| t == local) {
                            continue;
                        }
                        let imported = match &s.imported {
                            ModuleExportName::IdentifierName(id) => id.name.to_string(),
                            ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
                            ModuleExportName::IdentifierReference(id) => id.name.to_string(),
                        };
                        if imported == local {
                            named.push(local.to_string());
                        } else {
                            named.push(format!("{} as {}", imported, local));
                        }
                    }
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                        if tags.iter().any(|t| t == s.local.name.as_str()) {
                            default = Some(s.local.name.to_string());
                        }
                    }
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                        if tags.iter().any(|t| t == s.local.name.as_str()) {
                            namespace = Some(s.local.name.to_string());
                        }
                    }
                }
            }

            if default.is_none() && namespace.is_none() && named.is_empty() {
                continue;
            }
            let path = self.config.rewrite_import_path(import.source.value.as_str());
            let statement = match (default, namespace, named.is_empty()) {
                (Some(d), _, true) => format!("import {} from '{}'", d, path),
                (Some(d), _, false) => {
                    format!("import {}, {{ {} }} from '{}'", d, named.join(", "), path)
                }
                (None, Some(n), _) => format!("import * as {} from '{}'", n, path),
                (None, None, false) => format!("import {{ {} }} from '{}'", named.join(", "), path),
                (None, None, true) => continue,
            };
            out.push(statement);
        }
        out
    }
}

// ── property references ──────────────────────────────────────────────────

fn first_segment(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

/// Dotted path for an expression that references the property bag, if it
/// does: `bag.a.b`, `bag["a"]` or a destructured key, in any mix.
fn prop_ref_path(expr: &Expression<'_>, bag: &BagParam) -> Option<String> {
    if bag.is_empty() {
        return None;
    }
    let expr = strip_parens(expr);
    match expr {
        Expression::Identifier(id) => bag.destructured_key(id.name.as_str()).map(str::to_string),
        Expression::StaticMemberExpression(_) | Expression::ComputedMemberExpression(_) => {
            let mut segments: Vec<String> = Vec::new();
            let mut current = expr;
            loop {
                match current {
                    Expression::StaticMemberExpression(member) => {
                        segments.push(member.property.name.to_string());
                        current = strip_parens(&member.object);
                    }
                    Expression::ComputedMemberExpression(member) => {
                        match strip_parens(&member.expression) {
                            Expression::StringLiteral(s) => {
                                segments.push(s.value.to_string());
                                current = strip_parens(&member.object);
                            }
                            _ => return None,
                        }
                    }
                    Expression::Identifier(id) => {
                        segments.reverse();
                        if bag.name.as_deref() == Some(id.name.as_str()) {
                            return Some(segments.join("."));
                        }
                        if let Some(key) = bag.destructured_key(id.name.as_str()) {
                            let mut all = vec![key.to_string()];
                            all.extend(segments);
                            return Some(all.join("."));
                        }
                        return None;
                    }
                    _ => return None,
                }
            }
        }
        _ => None,
    }
}

/// Collects the span and dotted path of every property-bag reference in a
/// subtree, pruning below each match.
struct RefSpanCollector<'s> {
    bag: &'s BagParam,
    refs: Vec<(Span, String)>,
}

impl<'a, 's> oxc_ast_visit::Visit<'a> for RefSpanCollector<'s> {
    fn visit_expression(&mut self, expr: &Expression<'a>) {
        if let Some(path) = prop_ref_path(expr, self.bag) {
            self.refs.push((expr.span(), path));
            return;
        }
        oxc_ast_visit::walk::walk_expression(self, expr);
    }
}

// ── element location ─────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Jsx<'a, 'b> {
    Element(&'b JSXElement<'a>),
    Fragment(&'b JSXFragment<'a>),
}

impl<'a, 'b> Jsx<'a, 'b> {
    fn span(&self) -> Span {
        match self {
            Jsx::Element(el) => el.span,
            Jsx::Fragment(fragment) => fragment.span,
        }
    }
}

fn jsx_of_expression<'a, 'b>(expr: &'b Expression<'a>) -> Option<Jsx<'a, 'b>> {
    match strip_parens(expr) {
        Expression::JSXElement(el) => Some(Jsx::Element(el)),
        Expression::JSXFragment(fragment) => Some(Jsx::Fragment(fragment)),
        _ => None,
    }
}

/// Depth-first search for the first element expression in a statement list.
/// Covers the shapes example bodies actually use: returns, declarations,
/// expression statements, conditionals and nested blocks.
fn find_jsx_in_statements<'a, 'b>(
    statements: &'b [Statement<'a>],
) -> Option<Jsx<'a, 'b>> {
    statements.iter().find_map(find_jsx_in_statement)
}

fn find_jsx_in_statement<'a, 'b>(stmt: &'b Statement<'a>) -> Option<Jsx<'a, 'b>> {
    match stmt {
        Statement::ReturnStatement(ret) => {
            ret.argument.as_ref().and_then(find_jsx_in_expression)
        }
        Statement::ExpressionStatement(expr_stmt) => find_jsx_in_expression(&expr_stmt.expression),
        Statement::VariableDeclaration(decl) => decl
            .declarations
            .iter()
            .find_map(|d| d.init.as_ref().and_then(find_jsx_in_expression)),
        Statement::BlockStatement(block) => find_jsx_in_statements(&block.body),
        Statement::IfStatement(if_stmt) => find_jsx_in_statement(&if_stmt.consequent)
            .or_else(|| if_stmt.alternate.as_ref().and_then(find_jsx_in_statement)),
        _ => None,
    }
}

fn find_jsx_in_expression<'a, 'b>(expr: &'b Expression<'a>) -> Option<Jsx<'a, 'b>> {
    let expr = strip_parens(expr);
    if let Some(jsx) = jsx_of_expression(expr) {
        return Some(jsx);
    }
    match expr {
        Expression::ConditionalExpression(cond) => find_jsx_in_expression(&cond.consequent)
            .or_else(|| find_jsx_in_expression(&cond.alternate)),
        Expression::LogicalExpression(logical) => find_jsx_in_expression(&logical.left)
            .or_else(|| find_jsx_in_expression(&logical.right)),
        _ => None,
    }
}

/// Root identifier of a tag, for import lookup. Lowercase tags are
/// intrinsic elements and import nothing.
fn tag_root(name: &JSXElementName<'_>) -> Option<String> {
    match name {
        JSXElementName::Identifier(id) => {
            let name = id.name.as_str();
            if name.starts_with(|c: char| c.is_ascii_uppercase()) {
                Some(name.to_string())
            } else {
                None
            }
        }
        JSXElementName::IdentifierReference(id) => Some(id.name.to_string()),
        JSXElementName::MemberExpression(member) => {
            let mut object = &member.object;
            loop {
                match object {
                    JSXMemberExpressionObject::IdentifierReference(id) => {
                        return Some(id.name.to_string())
                    }
                    JSXMemberExpressionObject::MemberExpression(inner) => object = &inner.object,
                    JSXMemberExpressionObject::ThisExpression(_) => return None,
                }
            }
        }
        JSXElementName::NamespacedName(_) | JSXElementName::ThisExpression(_) => None,
    }
}

// ── printer ──────────────────────────────────────────────────────────────

/// Escape text destined for the inside of the template's backtick literal.
fn escape_template_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

fn print_node(node: &TemplateNode, out: &mut String) {
    match node {
        TemplateNode::Element(element) => print_element(element, out),
        TemplateNode::Fragment(children) => {
            out.push_str("<>");
            for child in children {
                print_node(child, out);
            }
            out.push_str("</>");
        }
        TemplateNode::Text(text) => out.push_str(&escape_template_text(text)),
        TemplateNode::Placeholder(path) => {
            out.push_str(&format!("${{__child({})}}", path));
        }
        TemplateNode::Expr(source) => {
            out.push('{');
            out.push_str(source);
            out.push('}');
        }
    }
}

fn print_element(element: &TemplateElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for attr in &element.attrs {
        out.push(' ');
        match attr {
            TemplateAttr::Static { name, value } => {
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_template_text(&value.replace('"', "&quot;")));
                out.push('"');
            }
            TemplateAttr::Bare { name } => out.push_str(name),
            TemplateAttr::Placeholder { name, path } => {
                out.push_str(&format!("${{__attr({}, {})}}", js_quote(name), path));
            }
            TemplateAttr::Expr { name, source } => {
                out.push_str(name);
                out.push_str("={");
                out.push_str(source);
                out.push('}');
            }
            TemplateAttr::Raw(text) => out.push_str(text),
        }
    }
    if element.children.is_empty() {
        out.push_str(" />");
        return;
    }
    out.push('>');
    for child in &element.children {
        print_node(child, out);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intrinsics::{Intrinsic, IntrinsicKind};
    use crate::parse::tsx_source_type;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;

    fn string_prop(design_name: &str) -> Intrinsic {
        Intrinsic::new(IntrinsicKind::String {
            design_prop_name: design_name.to_string(),
        })
    }

    fn boolean_prop(design_name: &str) -> Intrinsic {
        Intrinsic::new(IntrinsicKind::Boolean {
            design_prop_name: design_name.to_string(),
            value_mapping: None,
        })
    }

    fn first_example<'a, 'b>(program: &'b Program<'a>) -> ExampleFn<'a, 'b> {
        for stmt in &program.body {
            if let Statement::ExpressionStatement(es) = stmt {
                match strip_parens(&es.expression) {
                    Expression::ArrowFunctionExpression(arrow) => return ExampleFn::Arrow(arrow),
                    Expression::FunctionExpression(func) => return ExampleFn::Function(func),
                    _ => {}
                }
            }
        }
        panic!("no example function in fixture");
    }

    fn compile(
        source: &str,
        props: Option<&PropMapping>,
    ) -> Result<CompiledTemplate, ParserError> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, tsx_source_type()).parse();
        assert!(ret.errors.is_empty(), "fixture must parse: {:?}", ret.errors);
        let config = ProjectConfig::default();
        let compiler = TemplateCompiler::new(source, "t.figma.tsx", &config, props, None);
        let example = first_example(&ret.program);
        compiler.compile_example(example, &ret.program)
    }

    #[test]
    fn test_nestable_attr_and_child_placeholders() {
        let mut props = PropMapping::new();
        props.insert("disabled".to_string(), boolean_prop("Disabled"));
        props.insert("label".to_string(), string_prop("Label"));

        let compiled = compile(
            "(props) => <button disabled={props.disabled}>{props.label}</button>;",
            Some(&props),
        )
        .unwrap();

        assert!(compiled.nestable);
        assert!(compiled.template.contains("const disabled = figma.properties.boolean('Disabled')"));
        assert!(compiled.template.contains("const label = figma.properties.string('Label')"));
        assert!(compiled.template.contains("${__attr('disabled', disabled)}"));
        assert!(compiled.template.contains("${__child(label)}"));
        assert!(compiled.template.contains("export default figma.tsx`<button "));
        // Consts come out in mapping order.
        let disabled_at = compiled.template.find("const disabled").unwrap();
        let label_at = compiled.template.find("const label").unwrap();
        assert!(disabled_at < label_at);
    }

    #[test]
    fn test_destructured_param_references() {
        let mut props = PropMapping::new();
        props.insert("icon".to_string(), string_prop("Icon"));

        let compiled = compile("({ icon }) => <i>{icon}</i>;", Some(&props)).unwrap();
        assert!(compiled.template.contains("${__child(icon)}"));
        assert!(compiled.template.contains("const icon = "));
    }

    #[test]
    fn test_renamed_destructuring_resolves_to_mapping_key() {
        let mut props = PropMapping::new();
        props.insert("label".to_string(), string_prop("Label"));

        let compiled = compile("({ label: l }) => <b>{l}</b>;", Some(&props)).unwrap();
        assert!(compiled
            .template
            .contains("const label = figma.properties.string('Label')"));
        assert!(compiled.template.contains("${__child(label)}"));
        assert!(!compiled.template.contains("{l}"));
    }

    #[test]
    fn test_unknown_prop_reference_is_error() {
        let mut props = PropMapping::new();
        props.insert("label".to_string(), string_prop("Label"));

        let err = compile("(props) => <button>{props.size}</button>;", Some(&props)).unwrap_err();
        assert!(err.message.contains("size"), "{}", err.message);
        assert!(err.line.is_some());
    }

    #[test]
    fn test_spread_expands_mapping_minus_individual_refs() {
        let mut props = PropMapping::new();
        props.insert("a".to_string(), string_prop("A"));
        props.insert("b".to_string(), string_prop("B"));
        props.insert("c".to_string(), string_prop("C"));

        let compiled =
            compile("(props) => <button {...props} a={props.a} />;", Some(&props)).unwrap();

        assert_eq!(compiled.template.matches("__attr('a', a)").count(), 1);
        assert!(compiled.template.contains("${__attr('b', b)}"));
        assert!(compiled.template.contains("${__attr('c', c)}"));
        // Spread keys keep mapping order.
        let b_at = compiled.template.find("__attr('b'").unwrap();
        let c_at = compiled.template.find("__attr('c'").unwrap();
        assert!(b_at < c_at);
    }

    #[test]
    fn test_spread_without_mapping_is_error() {
        let err = compile("(props) => <button {...props} />;", None).unwrap_err();
        assert!(err.message.contains("props"), "{}", err.message);
    }

    #[test]
    fn test_two_statement_body_wraps_in_named_function() {
        let mut props = PropMapping::new();
        props.insert("label".to_string(), string_prop("Label"));

        let source = "\
(props) => {
  const title = 'panel';
  return <section aria-label={props.label}>{title}</section>;
};
";
        let compiled = compile(source, Some(&props)).unwrap();
        assert!(!compiled.nestable);
        assert!(compiled.template.contains("function __example() {"));
        assert!(compiled.template.contains("const title = 'panel';"));
        assert!(compiled.template.contains("return figma.tsx`<section "));
        assert!(compiled.template.contains("${__attr('aria-label', label)}"));
        assert!(compiled.template.ends_with("export default __example()"));
    }

    #[test]
    fn test_statement_references_become_bare_const_names() {
        let mut props = PropMapping::new();
        props.insert("label".to_string(), string_prop("Label"));

        let source = "\
(props) => {
  const loud = props.label;
  return <b>{loud}</b>;
};
";
        // `loud` is a plain local, not a mapping key; the body keeps it and
        // the props reference in the statement is rewritten to the const.
        let compiled = compile(source, Some(&props)).unwrap();
        assert!(compiled.template.contains("const loud = label;"));
    }

    #[test]
    fn test_more_than_one_parameter_is_error() {
        let err = compile("(props, extra) => <button />;", None).unwrap_err();
        assert!(err.message.contains("one parameter"), "{}", err.message);
    }

    #[test]
    fn test_default_template_and_import_rewrite() {
        let source = "import Button from './src/components/Button';\n";
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, tsx_source_type()).parse();
        let mut config = ProjectConfig::default();
        config
            .import_paths
            .insert("./src/components".to_string(), "@ui".to_string());
        let compiler = TemplateCompiler::new(source, "t.figma.tsx", &config, None, None);

        let compiled = compiler.compile_default("Button", &ret.program);
        assert!(compiled.nestable);
        assert!(compiled.template.ends_with("export default figma.tsx`<Button />`"));
        assert_eq!(compiled.imports, vec!["import Button from '@ui/Button'"]);
    }

    #[test]
    fn test_imports_filter_to_used_specifiers() {
        let source = "\
import { Button, Icon, Helper } from './ui';
() => <Button><Icon /></Button>;
";
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, tsx_source_type()).parse();
        let config = ProjectConfig::default();
        let compiler = TemplateCompiler::new(source, "t.figma.tsx", &config, None, None);
        let compiled = compiler
            .compile_example(first_example(&ret.program), &ret.program)
            .unwrap();
        assert_eq!(compiled.imports, vec!["import { Button, Icon } from './ui'"]);
    }

    #[test]
    fn test_explicit_imports_win() {
        let source = "import { Button } from './ui';\n() => <Button />;";
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, tsx_source_type()).parse();
        let config = ProjectConfig::default();
        let explicit = vec!["import { Button } from '@published/ui'".to_string()];
        let compiler =
            TemplateCompiler::new(source, "t.figma.tsx", &config, None, Some(&explicit));
        let compiled = compiler
            .compile_example(first_example(&ret.program), &ret.program)
            .unwrap();
        assert_eq!(compiled.imports, explicit);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let mut props = PropMapping::new();
        props.insert("label".to_string(), string_prop("Label"));
        let source = "(props) => <button>{props.label}</button>;";
        let first = compile(source, Some(&props)).unwrap();
        let second = compile(source, Some(&props)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_template_prelude_is_prefix_of_every_template() {
        let compiled = compile("() => <hr />;", None).unwrap();
        assert!(compiled.template.starts_with(TEMPLATE_PRELUDE));
    }
}
