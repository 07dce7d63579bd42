//! Property-mapping intrinsic model.
//!
//! An `Intrinsic` is the structured, serializable form of one property
//! mapping expression: "project design property X into a code value in
//! this way". The set of kinds is closed; unknown helper names are a parse
//! error in the intrinsic parser, never a runtime lookup failure.
//!
//! This module also renders intrinsics back to their runtime-expression
//! form (`figma.properties.*` calls) for embedding in compiled templates.
//! Composite kinds introduce synthetic local bindings; the counter for
//! those names lives in an explicit [`RenderCtx`] threaded through the
//! recursion so rendering is deterministic and side-effect free.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Ordered map from code-facing property name to its intrinsic. Insertion
/// order is preserved because spread expansion and const-declaration
/// emission both follow it.
pub type PropMapping = IndexMap<String, Intrinsic>;

// ═══════════════════════════════════════════════════════════════════════════════
// MODEL
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intrinsic {
    #[serde(flatten)]
    pub kind: IntrinsicKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl Intrinsic {
    pub fn new(kind: IntrinsicKind) -> Self {
        Intrinsic {
            kind,
            modifiers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    content = "args",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum IntrinsicKind {
    String {
        design_prop_name: String,
    },
    Boolean {
        design_prop_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value_mapping: Option<BooleanMapping>,
    },
    Enum {
        design_prop_name: String,
        value_mapping: IndexMap<String, ValueMapping>,
    },
    Instance {
        design_prop_name: String,
    },
    /// Layer names may contain a single `*` wildcard, but only in the
    /// single-string form of the helper call.
    Children {
        layers: Vec<String>,
    },
    NestedProps {
        layer: String,
        props: PropMapping,
    },
    ClassName {
        class_name_parts: Vec<ClassNamePart>,
    },
    TextContent {
        layer: String,
    },
}

/// Boolean value mapping. Either arm may be absent; an absent arm leaves
/// the raw boolean value for that state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanMapping {
    #[serde(rename = "true", default, skip_serializing_if = "Option::is_none")]
    pub when_true: Option<ValueMapping>,
    #[serde(rename = "false", default, skip_serializing_if = "Option::is_none")]
    pub when_false: Option<ValueMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassNamePart {
    Literal(String),
    Intrinsic(Box<Intrinsic>),
}

/// Post-processing operations applied after the base intrinsic's value is
/// resolved, in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Modifier {
    GetProps,
    Render {
        fn_source: String,
        referenced_props: Vec<String>,
    },
}

/// A value found inside a boolean/enum mapping. Primitives serialize
/// plainly; anything that would lose its type through JSON round-tripping
/// is kept as tagged source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueMapping {
    Bool(bool),
    Number(f64),
    String(String),
    Undefined,
    Intrinsic(Box<Intrinsic>),
    Opaque(OpaqueValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueValue {
    #[serde(rename = "type")]
    pub kind: OpaqueKind,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpaqueKind {
    /// Arrow or function expression, kept as opaque source text.
    Function,
    /// Bare identifier or property-access reference.
    Identifier,
    /// Object literal.
    Object,
    /// Template-string literal.
    TemplateString,
    /// UI-element (JSX) literal.
    Element,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    static ref IDENT_RE: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

/// Whether `name` is usable as an identifier in generated code.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENT_RE.is_match(name)
}

/// Variant option pairs that case-insensitively match {true,false},
/// {yes,no} or {on,off} are treated as boolean-compatible. Anything else,
/// including sets of more than two options, is not.
pub fn is_boolean_like(options: &[&str]) -> bool {
    if options.len() != 2 {
        return false;
    }
    const PAIRS: [[&str; 2]; 3] = [["true", "false"], ["yes", "no"], ["on", "off"]];
    let a = options[0].to_lowercase();
    let b = options[1].to_lowercase();
    PAIRS
        .iter()
        .any(|pair| (a == pair[0] && b == pair[1]) || (a == pair[1] && b == pair[0]))
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUNTIME-EXPRESSION RENDERING
// ═══════════════════════════════════════════════════════════════════════════════

/// Counter for synthetic local names, threaded explicitly through the
/// recursive renderer.
#[derive(Debug, Default)]
pub struct RenderCtx {
    next_id: u32,
}

impl RenderCtx {
    pub fn new() -> Self {
        RenderCtx::default()
    }

    fn fresh(&mut self, prefix: &str) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("__{}{}", prefix, id)
    }
}

/// A rendered runtime expression plus the `const` statements it needs in
/// scope before it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedExpr {
    pub preamble: Vec<String>,
    pub expr: String,
}

/// Escape for a single-quoted JS string literal.
pub fn js_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render an intrinsic to the runtime expression assigned to its prop
/// const in the template. Design-tool layer names cannot be used as
/// identifiers, so composite kinds bind intermediates to fresh synthetic
/// names in the preamble.
pub fn render_intrinsic(intrinsic: &Intrinsic, ctx: &mut RenderCtx) -> RenderedExpr {
    let mut rendered = render_kind(&intrinsic.kind, ctx);
    for modifier in &intrinsic.modifiers {
        match modifier {
            Modifier::GetProps => rendered.expr.push_str(".getProps()"),
            Modifier::Render { fn_source, .. } => {
                rendered.expr.push_str(&format!(".render({})", fn_source));
            }
        }
    }
    rendered
}

fn render_kind(kind: &IntrinsicKind, ctx: &mut RenderCtx) -> RenderedExpr {
    match kind {
        IntrinsicKind::String { design_prop_name } => RenderedExpr {
            preamble: Vec::new(),
            expr: format!("figma.properties.string({})", js_quote(design_prop_name)),
        },
        IntrinsicKind::Boolean {
            design_prop_name,
            value_mapping,
        } => match value_mapping {
            None => RenderedExpr {
                preamble: Vec::new(),
                expr: format!("figma.properties.boolean({})", js_quote(design_prop_name)),
            },
            Some(mapping) => {
                let mut preamble = Vec::new();
                let mut entries = Vec::new();
                if let Some(when_true) = &mapping.when_true {
                    entries.push(format!(
                        "'true': {}",
                        render_value(when_true, ctx, &mut preamble)
                    ));
                }
                if let Some(when_false) = &mapping.when_false {
                    entries.push(format!(
                        "'false': {}",
                        render_value(when_false, ctx, &mut preamble)
                    ));
                }
                RenderedExpr {
                    preamble,
                    expr: format!(
                        "figma.properties.boolean({}, {{ {} }})",
                        js_quote(design_prop_name),
                        entries.join(", ")
                    ),
                }
            }
        },
        IntrinsicKind::Enum {
            design_prop_name,
            value_mapping,
        } => {
            let mut preamble = Vec::new();
            let entries: Vec<String> = value_mapping
                .iter()
                .map(|(key, value)| {
                    format!("{}: {}", js_quote(key), render_value(value, ctx, &mut preamble))
                })
                .collect();
            RenderedExpr {
                preamble,
                expr: format!(
                    "figma.properties.enum({}, {{ {} }})",
                    js_quote(design_prop_name),
                    entries.join(", ")
                ),
            }
        }
        IntrinsicKind::Instance { design_prop_name } => RenderedExpr {
            preamble: Vec::new(),
            expr: format!("figma.properties.instance({})", js_quote(design_prop_name)),
        },
        IntrinsicKind::Children { layers } => {
            let names: Vec<String> = layers.iter().map(|l| js_quote(l)).collect();
            RenderedExpr {
                preamble: Vec::new(),
                expr: format!("figma.properties.children([{}])", names.join(", ")),
            }
        }
        IntrinsicKind::NestedProps { layer, props } => {
            let mut preamble = Vec::new();
            let entries: Vec<String> = props
                .iter()
                .map(|(key, nested)| {
                    let inner = render_intrinsic(nested, ctx);
                    preamble.extend(inner.preamble);
                    format!("{}: {}", key, inner.expr)
                })
                .collect();
            let local = ctx.fresh("props");
            preamble.push(format!(
                "const {} = figma.properties.nestedProps({}, {{ {} }})",
                local,
                js_quote(layer),
                entries.join(", ")
            ));
            RenderedExpr {
                preamble,
                expr: local,
            }
        }
        IntrinsicKind::ClassName { class_name_parts } => {
            let mut preamble = Vec::new();
            let parts: Vec<String> = class_name_parts
                .iter()
                .map(|part| match part {
                    ClassNamePart::Literal(text) => js_quote(text),
                    ClassNamePart::Intrinsic(inner) => {
                        let rendered = render_intrinsic(inner, ctx);
                        preamble.extend(rendered.preamble);
                        let local = ctx.fresh("value");
                        preamble.push(format!("const {} = {}", local, rendered.expr));
                        local
                    }
                })
                .collect();
            RenderedExpr {
                preamble,
                expr: format!("[{}].filter((v) => !!v).join(' ')", parts.join(", ")),
            }
        }
        IntrinsicKind::TextContent { layer } => RenderedExpr {
            preamble: Vec::new(),
            expr: format!("figma.properties.textContent({})", js_quote(layer)),
        },
    }
}

fn render_value(value: &ValueMapping, ctx: &mut RenderCtx, preamble: &mut Vec<String>) -> String {
    match value {
        ValueMapping::Bool(b) => b.to_string(),
        ValueMapping::Number(n) => format!("{}", n),
        ValueMapping::String(s) => js_quote(s),
        ValueMapping::Undefined => "undefined".to_string(),
        ValueMapping::Intrinsic(inner) => {
            let rendered = render_intrinsic(inner, ctx);
            preamble.extend(rendered.preamble);
            rendered.expr
        }
        ValueMapping::Opaque(opaque) => {
            let tag = match opaque.kind {
                OpaqueKind::Function => "function",
                OpaqueKind::Identifier => "identifier",
                OpaqueKind::Object => "object",
                OpaqueKind::TemplateString => "templateString",
                OpaqueKind::Element => "element",
            };
            format!(
                "{{ type: {}, source: {} }}",
                js_quote(tag),
                js_quote(&opaque.source)
            )
        }
    }
}
