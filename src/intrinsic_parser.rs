//! Intrinsic parser.
//!
//! Recognizes calls against the fixed `figma.*` helper namespace
//! (`string`, `boolean`, `enum`, `instance`, `children`, `nestedProps`,
//! `className`, `textContent`) and parses them into [`Intrinsic`] values,
//! including chained modifier calls (`.getProps()`, `.render(fn)`).
//!
//! A chain like `figma.instance('Icon').render(fn)` is decomposed by
//! walking the callee spine, collecting calls innermost-first, then
//! reversing so the first element is the base helper and the rest are
//! modifiers in declared order.

use oxc_ast::ast::*;
use oxc_span::GetSpan;
use regex::Regex;

use crate::error::ParserError;
use crate::intrinsics::{
    is_valid_identifier, BooleanMapping, ClassNamePart, Intrinsic, IntrinsicKind, Modifier,
    OpaqueKind, OpaqueValue, PropMapping, ValueMapping,
};

pub struct IntrinsicParser<'s> {
    pub source: &'s str,
    pub file: &'s str,
}

impl<'s> IntrinsicParser<'s> {
    pub fn new(source: &'s str, file: &'s str) -> Self {
        IntrinsicParser { source, file }
    }

    fn text(&self, span: oxc_span::Span) -> &'s str {
        &self.source[span.start as usize..span.end as usize]
    }

    fn err(&self, message: impl Into<String>, span: oxc_span::Span) -> ParserError {
        ParserError::parse_at(message, self.file, self.source, span.start)
    }

    /// Parse a call expression believed to be a property-mapping helper
    /// invocation into an intrinsic.
    pub fn parse_intrinsic<'a>(&self, call: &CallExpression<'a>) -> Result<Intrinsic, ParserError> {
        self.parse_intrinsic_inner(call, false)
    }

    fn parse_intrinsic_inner<'a>(
        &self,
        call: &CallExpression<'a>,
        inside_nested_props: bool,
    ) -> Result<Intrinsic, ParserError> {
        // Decompose the modifier chain. After the loop `chain` is ordered
        // outermost-first, so reversing puts the base helper call first.
        let mut chain: Vec<(&str, &CallExpression<'a>)> = Vec::new();
        let mut current = call;
        loop {
            match strip_parens(&current.callee) {
                Expression::StaticMemberExpression(member) => {
                    let method = member.property.name.as_str();
                    match strip_parens(&member.object) {
                        Expression::Identifier(id) if id.name == "figma" => {
                            chain.push((method, current));
                            break;
                        }
                        Expression::CallExpression(inner) => {
                            chain.push((method, current));
                            current = inner;
                        }
                        _ => {
                            return Err(self.err(
                                format!(
                                    "Unrecognized property mapping expression: `{}`",
                                    self.text(call.span)
                                ),
                                call.span,
                            ))
                        }
                    }
                }
                _ => {
                    return Err(self.err(
                        format!(
                            "Unrecognized property mapping expression: `{}`",
                            self.text(call.span)
                        ),
                        call.span,
                    ))
                }
            }
        }
        chain.reverse();

        let (base_name, base_call) = chain[0];
        let kind = self.parse_base_helper(base_name, base_call, inside_nested_props)?;
        let mut intrinsic = Intrinsic::new(kind);

        for (name, modifier_call) in &chain[1..] {
            intrinsic
                .modifiers
                .push(self.parse_modifier(name, modifier_call)?);
        }

        Ok(intrinsic)
    }

    fn parse_base_helper<'a>(
        &self,
        name: &str,
        call: &CallExpression<'a>,
        inside_nested_props: bool,
    ) -> Result<IntrinsicKind, ParserError> {
        match name {
            "string" => Ok(IntrinsicKind::String {
                design_prop_name: self.single_string_arg(call, "figma.string")?,
            }),
            "instance" => Ok(IntrinsicKind::Instance {
                design_prop_name: self.single_string_arg(call, "figma.instance")?,
            }),
            "textContent" => Ok(IntrinsicKind::TextContent {
                layer: self.single_string_arg(call, "figma.textContent")?,
            }),
            "boolean" => self.parse_boolean(call),
            "enum" => self.parse_enum(call),
            "children" => self.parse_children(call),
            "nestedProps" => {
                if inside_nested_props {
                    return Err(self.err(
                        "figma.nestedProps cannot be nested inside another figma.nestedProps call",
                        call.span,
                    ));
                }
                self.parse_nested_props(call)
            }
            "className" => self.parse_class_name(call),
            other => Err(self.err(
                format!(
                    "Unrecognized property mapping function `figma.{}` in `{}`",
                    other,
                    self.text(call.span)
                ),
                call.span,
            )),
        }
    }

    fn parse_modifier<'a>(
        &self,
        name: &str,
        call: &CallExpression<'a>,
    ) -> Result<Modifier, ParserError> {
        match name {
            "getProps" => {
                if !call.arguments.is_empty() {
                    return Err(self.err(".getProps() takes no arguments", call.span));
                }
                Ok(Modifier::GetProps)
            }
            "render" => {
                let arg = self
                    .positional_expr(call, 0)
                    .ok_or_else(|| self.err(".render() requires a render callback", call.span))?;
                match strip_parens(arg) {
                    Expression::ArrowFunctionExpression(arrow) => Ok(Modifier::Render {
                        fn_source: self.text(arrow.span).to_string(),
                        referenced_props: referenced_props_of_callback(
                            arrow.params.items.first().map(|p| &p.pattern),
                            self.text(arrow.span),
                        ),
                    }),
                    Expression::FunctionExpression(func) => Ok(Modifier::Render {
                        fn_source: self.text(func.span).to_string(),
                        referenced_props: referenced_props_of_callback(
                            func.params.items.first().map(|p| &p.pattern),
                            self.text(func.span),
                        ),
                    }),
                    other => Err(self.err(
                        ".render() requires a function or arrow expression",
                        other.span(),
                    )),
                }
            }
            other => Err(self.err(
                format!("Unrecognized property mapping modifier `.{}()`", other),
                call.span,
            )),
        }
    }

    // ── helper shapes ────────────────────────────────────────────────────

    fn parse_boolean<'a>(&self, call: &CallExpression<'a>) -> Result<IntrinsicKind, ParserError> {
        let design_prop_name = self.string_arg(call, 0, "figma.boolean")?;
        let value_mapping = match self.positional_expr(call, 1) {
            None => None,
            Some(expr) => match strip_parens(expr) {
                Expression::ObjectExpression(obj) => {
                    let mut when_true = None;
                    let mut when_false = None;
                    for prop in &obj.properties {
                        let prop = self.object_property(prop)?;
                        let key = self.property_key_name(&prop.key)?;
                        let value = self.literal_to_value(&prop.value)?;
                        match key.as_str() {
                            "true" => when_true = Some(value),
                            "false" => when_false = Some(value),
                            other => {
                                return Err(self.err(
                                    format!(
                                        "figma.boolean value mapping only accepts `true` and `false` keys, found `{}`",
                                        other
                                    ),
                                    prop.span,
                                ))
                            }
                        }
                    }
                    if when_true.is_none() && when_false.is_none() {
                        None
                    } else {
                        Some(BooleanMapping {
                            when_true,
                            when_false,
                        })
                    }
                }
                other => {
                    return Err(self.err(
                        "Second argument to figma.boolean must be an object literal. \
                         Example: figma.boolean('Has Icon', { true: 'yes', false: 'no' })",
                        other.span(),
                    ))
                }
            },
        };
        Ok(IntrinsicKind::Boolean {
            design_prop_name,
            value_mapping,
        })
    }

    fn parse_enum<'a>(&self, call: &CallExpression<'a>) -> Result<IntrinsicKind, ParserError> {
        let design_prop_name = self.string_arg(call, 0, "figma.enum")?;
        let mapping_expr = self.positional_expr(call, 1).ok_or_else(|| {
            self.err(
                "figma.enum requires a value mapping. \
                 Example: figma.enum('Size', { Large: 'lg', Small: 'sm' })",
                call.span,
            )
        })?;
        let obj = match strip_parens(mapping_expr) {
            Expression::ObjectExpression(obj) => obj,
            other => {
                return Err(self.err(
                    "Second argument to figma.enum must be an object literal. \
                     Example: figma.enum('Size', { Large: 'lg', Small: 'sm' })",
                    other.span(),
                ))
            }
        };
        let mut value_mapping = indexmap::IndexMap::new();
        for prop in &obj.properties {
            let prop = self.object_property(prop)?;
            let key = self.property_key_name(&prop.key)?;
            let value = self.literal_to_value(&prop.value)?;
            value_mapping.insert(key, value);
        }
        Ok(IntrinsicKind::Enum {
            design_prop_name,
            value_mapping,
        })
    }

    fn parse_children<'a>(&self, call: &CallExpression<'a>) -> Result<IntrinsicKind, ParserError> {
        let arg = self.positional_expr(call, 0).ok_or_else(|| {
            self.err(
                "figma.children requires a layer name or an array of layer names",
                call.span,
            )
        })?;
        let layers = match strip_parens(arg) {
            Expression::StringLiteral(s) => {
                if s.value.matches('*').count() > 1 {
                    return Err(self.err(
                        "A figma.children layer name may contain at most one `*` wildcard",
                        s.span,
                    ));
                }
                vec![s.value.to_string()]
            }
            Expression::ArrayExpression(array) => {
                let mut layers = Vec::new();
                for element in &array.elements {
                    let expr = element.as_expression().ok_or_else(|| {
                        self.err("figma.children array entries must be string literals", array.span)
                    })?;
                    match strip_parens(expr) {
                        Expression::StringLiteral(s) => {
                            if s.value.contains('*') {
                                return Err(self.err(
                                    "Wildcards are not supported inside a figma.children array; \
                                     pass a single layer name string instead",
                                    s.span,
                                ));
                            }
                            layers.push(s.value.to_string());
                        }
                        other => {
                            return Err(self.err(
                                "figma.children array entries must be string literals",
                                other.span(),
                            ))
                        }
                    }
                }
                layers
            }
            other => {
                return Err(self.err(
                    "figma.children requires a string literal or an array of string literals",
                    other.span(),
                ))
            }
        };
        Ok(IntrinsicKind::Children { layers })
    }

    fn parse_nested_props<'a>(
        &self,
        call: &CallExpression<'a>,
    ) -> Result<IntrinsicKind, ParserError> {
        let layer = self.string_arg(call, 0, "figma.nestedProps")?;
        let props_expr = self.positional_expr(call, 1).ok_or_else(|| {
            self.err(
                "figma.nestedProps requires a props object literal. \
                 Example: figma.nestedProps('Icon', { size: figma.string('Size') })",
                call.span,
            )
        })?;
        let obj = match strip_parens(props_expr) {
            Expression::ObjectExpression(obj) => obj,
            other => {
                return Err(self.err(
                    "Second argument to figma.nestedProps must be an object literal",
                    other.span(),
                ))
            }
        };
        let props = self.parse_prop_mapping_inner(obj, true)?;
        Ok(IntrinsicKind::NestedProps { layer, props })
    }

    fn parse_class_name<'a>(&self, call: &CallExpression<'a>) -> Result<IntrinsicKind, ParserError> {
        let arg = self.positional_expr(call, 0).ok_or_else(|| {
            self.err(
                "figma.className requires an array of class name parts. \
                 Example: figma.className(['btn', figma.enum('Size', { Large: 'btn-lg' })])",
                call.span,
            )
        })?;
        let array = match strip_parens(arg) {
            Expression::ArrayExpression(array) => array,
            other => {
                return Err(self.err(
                    "figma.className requires an array literal of strings and helper calls",
                    other.span(),
                ))
            }
        };
        let mut class_name_parts = Vec::new();
        for element in &array.elements {
            let expr = element.as_expression().ok_or_else(|| {
                self.err("figma.className entries must be strings or helper calls", array.span)
            })?;
            match strip_parens(expr) {
                Expression::StringLiteral(s) => {
                    class_name_parts.push(ClassNamePart::Literal(s.value.to_string()));
                }
                Expression::CallExpression(inner) => {
                    class_name_parts.push(ClassNamePart::Intrinsic(Box::new(
                        self.parse_intrinsic(inner)?,
                    )));
                }
                other => {
                    return Err(self.err(
                        "figma.className entries must be string literals or helper calls",
                        other.span(),
                    ))
                }
            }
        }
        Ok(IntrinsicKind::ClassName { class_name_parts })
    }

    // ── prop mapping objects ─────────────────────────────────────────────

    /// Parse a `props` object literal into a [`PropMapping`].
    pub fn parse_prop_mapping<'a>(
        &self,
        obj: &ObjectExpression<'a>,
    ) -> Result<PropMapping, ParserError> {
        self.parse_prop_mapping_inner(obj, false)
    }

    fn parse_prop_mapping_inner<'a>(
        &self,
        obj: &ObjectExpression<'a>,
        inside_nested_props: bool,
    ) -> Result<PropMapping, ParserError> {
        let mut mapping = PropMapping::new();
        for prop in &obj.properties {
            let prop = self.object_property(prop)?;
            let key = self.property_key_name(&prop.key)?;
            if !is_valid_identifier(&key) {
                return Err(self.err(
                    format!("Property mapping key `{}` is not a valid identifier", key),
                    prop.span,
                ));
            }
            match strip_parens(&prop.value) {
                Expression::CallExpression(call) => {
                    mapping.insert(key, self.parse_intrinsic_inner(call, inside_nested_props)?);
                }
                other => {
                    return Err(self.err(
                        format!(
                            "Property mapping value for `{}` must be a figma helper call, \
                             found `{}`",
                            key,
                            self.text(other.span())
                        ),
                        other.span(),
                    ))
                }
            }
        }
        Ok(mapping)
    }

    // ── generic object-literal value conversion ──────────────────────────

    /// Convert a value-mapping expression into a [`ValueMapping`],
    /// re-entering the intrinsic parser for nested helper calls and
    /// keeping everything non-literal as tagged opaque source text.
    pub fn literal_to_value<'a>(&self, expr: &Expression<'a>) -> Result<ValueMapping, ParserError> {
        match strip_parens(expr) {
            Expression::StringLiteral(s) => Ok(ValueMapping::String(s.value.to_string())),
            Expression::NumericLiteral(n) => Ok(ValueMapping::Number(n.value)),
            Expression::BooleanLiteral(b) => Ok(ValueMapping::Bool(b.value)),
            Expression::NullLiteral(_) => Ok(ValueMapping::Undefined),
            Expression::Identifier(id) if id.name == "undefined" => Ok(ValueMapping::Undefined),
            Expression::UnaryExpression(unary)
                if unary.operator == UnaryOperator::UnaryNegation =>
            {
                match strip_parens(&unary.argument) {
                    Expression::NumericLiteral(n) => Ok(ValueMapping::Number(-n.value)),
                    other => Err(self.err("Unsupported value in mapping", other.span())),
                }
            }
            Expression::CallExpression(call) => Ok(ValueMapping::Intrinsic(Box::new(
                self.parse_intrinsic(call)?,
            ))),
            Expression::ArrowFunctionExpression(arrow) => Ok(ValueMapping::Opaque(OpaqueValue {
                kind: OpaqueKind::Function,
                source: self.text(arrow.span).to_string(),
            })),
            Expression::FunctionExpression(func) => Ok(ValueMapping::Opaque(OpaqueValue {
                kind: OpaqueKind::Function,
                source: self.text(func.span).to_string(),
            })),
            Expression::Identifier(id) => Ok(ValueMapping::Opaque(OpaqueValue {
                kind: OpaqueKind::Identifier,
                source: id.name.to_string(),
            })),
            Expression::StaticMemberExpression(member) => Ok(ValueMapping::Opaque(OpaqueValue {
                kind: OpaqueKind::Identifier,
                source: self.text(member.span).to_string(),
            })),
            Expression::ComputedMemberExpression(member) => Ok(ValueMapping::Opaque(OpaqueValue {
                kind: OpaqueKind::Identifier,
                source: self.text(member.span).to_string(),
            })),
            Expression::ObjectExpression(obj) => Ok(ValueMapping::Opaque(OpaqueValue {
                kind: OpaqueKind::Object,
                source: self.text(obj.span).to_string(),
            })),
            Expression::TemplateLiteral(template) => Ok(ValueMapping::Opaque(OpaqueValue {
                kind: OpaqueKind::TemplateString,
                source: self.text(template.span).to_string(),
            })),
            Expression::JSXElement(element) => Ok(ValueMapping::Opaque(OpaqueValue {
                kind: OpaqueKind::Element,
                source: self.text(element.span).to_string(),
            })),
            Expression::JSXFragment(fragment) => Ok(ValueMapping::Opaque(OpaqueValue {
                kind: OpaqueKind::Element,
                source: self.text(fragment.span).to_string(),
            })),
            other => Err(self.err(
                format!("Unsupported value in mapping: `{}`", self.text(other.span())),
                other.span(),
            )),
        }
    }

    // ── low-level argument plumbing ──────────────────────────────────────

    fn positional_expr<'a, 'b>(
        &self,
        call: &'b CallExpression<'a>,
        index: usize,
    ) -> Option<&'b Expression<'a>> {
        call.arguments.get(index).and_then(|arg| arg.as_expression())
    }

    fn string_arg<'a>(
        &self,
        call: &CallExpression<'a>,
        index: usize,
        helper: &str,
    ) -> Result<String, ParserError> {
        let expr = self.positional_expr(call, index).ok_or_else(|| {
            self.err(
                format!("{} requires a design property name string literal", helper),
                call.span,
            )
        })?;
        match strip_parens(expr) {
            Expression::StringLiteral(s) => Ok(s.value.to_string()),
            other => Err(self.err(
                format!(
                    "Argument {} of {} must be a string literal, found `{}`",
                    index + 1,
                    helper,
                    self.text(other.span())
                ),
                other.span(),
            )),
        }
    }

    fn single_string_arg<'a>(
        &self,
        call: &CallExpression<'a>,
        helper: &str,
    ) -> Result<String, ParserError> {
        if call.arguments.len() != 1 {
            return Err(self.err(
                format!(
                    "{} takes exactly one string literal argument. Example: {}('Name')",
                    helper, helper
                ),
                call.span,
            ));
        }
        self.string_arg(call, 0, helper)
    }

    fn object_property<'a, 'b>(
        &self,
        prop: &'b ObjectPropertyKind<'a>,
    ) -> Result<&'b ObjectProperty<'a>, ParserError> {
        match prop {
            ObjectPropertyKind::ObjectProperty(p) => Ok(p),
            ObjectPropertyKind::SpreadProperty(s) => Err(self.err(
                "Spread entries are not supported in property mapping objects",
                s.span,
            )),
        }
    }

    fn property_key_name<'a>(&self, key: &PropertyKey<'a>) -> Result<String, ParserError> {
        match key {
            PropertyKey::StaticIdentifier(id) => Ok(id.name.to_string()),
            PropertyKey::StringLiteral(s) => Ok(s.value.to_string()),
            PropertyKey::NumericLiteral(n) => Ok(format!("{}", n.value)),
            PropertyKey::BooleanLiteral(b) => Ok(b.value.to_string()),
            _ => Err(self.err("Computed keys are not supported in mapping objects", key.span())),
        }
    }
}

/// Unwrap parenthesized expressions; oxc preserves them in the tree.
pub fn strip_parens<'a, 'b>(expr: &'b Expression<'a>) -> &'b Expression<'a> {
    let mut current = expr;
    while let Expression::ParenthesizedExpression(paren) = current {
        current = &paren.expression;
    }
    current
}

/// Property names referenced by a `.render()` callback: member accesses
/// rooted at the callback's bag parameter, plus any destructured keys.
fn referenced_props_of_callback(
    param: Option<&BindingPattern<'_>>,
    fn_source: &str,
) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: String| {
        if !names.contains(&name) {
            names.push(name);
        }
    };

    match param {
        Some(BindingPattern::BindingIdentifier(id)) => {
            let pattern = format!(
                r"\b{}\.([A-Za-z_$][A-Za-z0-9_$]*)",
                regex::escape(id.name.as_str())
            );
            if let Ok(re) = Regex::new(&pattern) {
                for caps in re.captures_iter(fn_source) {
                    push(caps[1].to_string());
                }
            }
        }
        Some(BindingPattern::ObjectPattern(obj)) => {
            for prop in &obj.properties {
                if let PropertyKey::StaticIdentifier(id) = &prop.key {
                    push(id.name.to_string());
                }
            }
        }
        _ => {}
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tsx_source_type;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;

    fn with_first_call<R>(source: &str, f: impl FnOnce(&IntrinsicParser, &CallExpression) -> R) -> R {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, tsx_source_type()).parse();
        assert!(ret.errors.is_empty(), "fixture must parse: {:?}", ret.errors);
        let parser = IntrinsicParser::new(source, "test.figma.tsx");
        for stmt in &ret.program.body {
            if let Statement::ExpressionStatement(expr_stmt) = stmt {
                if let Expression::CallExpression(call) = strip_parens(&expr_stmt.expression) {
                    return f(&parser, call);
                }
            }
        }
        panic!("no call expression in fixture");
    }

    #[test]
    fn test_parse_string_helper() {
        with_first_call("figma.string('Label')", |parser, call| {
            let intrinsic = parser.parse_intrinsic(call).unwrap();
            assert_eq!(
                intrinsic.kind,
                IntrinsicKind::String {
                    design_prop_name: "Label".to_string()
                }
            );
            assert!(intrinsic.modifiers.is_empty());
        });
    }

    #[test]
    fn test_parse_boolean_with_mapping() {
        with_first_call(
            "figma.boolean('Has Icon', { true: 'visible', false: undefined })",
            |parser, call| {
                let intrinsic = parser.parse_intrinsic(call).unwrap();
                match intrinsic.kind {
                    IntrinsicKind::Boolean {
                        design_prop_name,
                        value_mapping: Some(mapping),
                    } => {
                        assert_eq!(design_prop_name, "Has Icon");
                        assert_eq!(
                            mapping.when_true,
                            Some(ValueMapping::String("visible".to_string()))
                        );
                        assert_eq!(mapping.when_false, Some(ValueMapping::Undefined));
                    }
                    other => panic!("unexpected kind: {:?}", other),
                }
            },
        );
    }

    #[test]
    fn test_parse_boolean_with_one_sided_mapping() {
        with_first_call(
            "figma.boolean('Has Icon', { true: 'visible' })",
            |parser, call| {
                let intrinsic = parser.parse_intrinsic(call).unwrap();
                match intrinsic.kind {
                    IntrinsicKind::Boolean {
                        value_mapping: Some(mapping),
                        ..
                    } => {
                        assert_eq!(
                            mapping.when_true,
                            Some(ValueMapping::String("visible".to_string()))
                        );
                        assert_eq!(mapping.when_false, None);
                    }
                    other => panic!("unexpected kind: {:?}", other),
                }
            },
        );
    }

    #[test]
    fn test_boolean_mapping_rejects_extra_keys() {
        with_first_call(
            "figma.boolean('Flag', { true: 1, false: 0, maybe: 2 })",
            |parser, call| {
                let err = parser.parse_intrinsic(call).unwrap_err();
                assert!(err.message.contains("true"), "{}", err.message);
            },
        );
    }

    #[test]
    fn test_parse_enum_preserves_order() {
        with_first_call(
            "figma.enum('Size', { Large: 'lg', Medium: 'md', Small: 'sm' })",
            |parser, call| {
                let intrinsic = parser.parse_intrinsic(call).unwrap();
                match intrinsic.kind {
                    IntrinsicKind::Enum { value_mapping, .. } => {
                        let keys: Vec<&String> = value_mapping.keys().collect();
                        assert_eq!(keys, ["Large", "Medium", "Small"]);
                    }
                    other => panic!("unexpected kind: {:?}", other),
                }
            },
        );
    }

    #[test]
    fn test_enum_opaque_values() {
        with_first_call(
            "figma.enum('Variant', { A: () => 'x', B: <div />, C: `tpl`, D: Sizes.L, E: { a: 1 } })",
            |parser, call| {
                let intrinsic = parser.parse_intrinsic(call).unwrap();
                let IntrinsicKind::Enum { value_mapping, .. } = intrinsic.kind else {
                    panic!("expected enum");
                };
                let kind_of = |key: &str| match &value_mapping[key] {
                    ValueMapping::Opaque(opaque) => opaque.kind,
                    other => panic!("expected opaque for {}: {:?}", key, other),
                };
                assert_eq!(kind_of("A"), OpaqueKind::Function);
                assert_eq!(kind_of("B"), OpaqueKind::Element);
                assert_eq!(kind_of("C"), OpaqueKind::TemplateString);
                assert_eq!(kind_of("D"), OpaqueKind::Identifier);
                assert_eq!(kind_of("E"), OpaqueKind::Object);
            },
        );
    }

    #[test]
    fn test_children_single_string_wildcard_ok() {
        with_first_call("figma.children('Row *')", |parser, call| {
            let intrinsic = parser.parse_intrinsic(call).unwrap();
            assert_eq!(
                intrinsic.kind,
                IntrinsicKind::Children {
                    layers: vec!["Row *".to_string()]
                }
            );
        });
    }

    #[test]
    fn test_children_multiple_wildcards_rejected() {
        with_first_call("figma.children('Row * Cell *')", |parser, call| {
            let err = parser.parse_intrinsic(call).unwrap_err();
            assert!(err.message.contains("at most one"), "{}", err.message);
        });
    }

    #[test]
    fn test_children_array_wildcard_rejected() {
        with_first_call("figma.children(['Row *', 'Header'])", |parser, call| {
            let err = parser.parse_intrinsic(call).unwrap_err();
            assert!(err.message.contains("Wildcards"), "{}", err.message);
            assert!(err.line.is_some());
        });
    }

    #[test]
    fn test_nested_props_rejects_nesting() {
        with_first_call(
            "figma.nestedProps('Outer', { inner: figma.nestedProps('Inner', {}) })",
            |parser, call| {
                let err = parser.parse_intrinsic(call).unwrap_err();
                assert!(err.message.contains("nested"), "{}", err.message);
            },
        );
    }

    #[test]
    fn test_modifier_chain_order() {
        with_first_call(
            "figma.instance('Icon').getProps().render((i) => <Icon size={i.size} />)",
            |parser, call| {
                let intrinsic = parser.parse_intrinsic(call).unwrap();
                assert_eq!(
                    intrinsic.kind,
                    IntrinsicKind::Instance {
                        design_prop_name: "Icon".to_string()
                    }
                );
                assert_eq!(intrinsic.modifiers.len(), 2);
                assert_eq!(intrinsic.modifiers[0], Modifier::GetProps);
                match &intrinsic.modifiers[1] {
                    Modifier::Render {
                        fn_source,
                        referenced_props,
                    } => {
                        assert!(fn_source.contains("<Icon"));
                        assert_eq!(referenced_props, &["size"]);
                    }
                    other => panic!("unexpected modifier: {:?}", other),
                }
            },
        );
    }

    #[test]
    fn test_unknown_helper_is_error() {
        with_first_call("figma.gradient('Fill')", |parser, call| {
            let err = parser.parse_intrinsic(call).unwrap_err();
            assert!(err.message.contains("figma.gradient"), "{}", err.message);
        });
    }

    #[test]
    fn test_class_name_parts() {
        with_first_call(
            "figma.className(['btn', figma.enum('Size', { Large: 'btn-lg' })])",
            |parser, call| {
                let intrinsic = parser.parse_intrinsic(call).unwrap();
                let IntrinsicKind::ClassName { class_name_parts } = intrinsic.kind else {
                    panic!("expected className");
                };
                assert_eq!(class_name_parts.len(), 2);
                assert_eq!(class_name_parts[0], ClassNamePart::Literal("btn".to_string()));
                assert!(matches!(class_name_parts[1], ClassNamePart::Intrinsic(_)));
            },
        );
    }
}
