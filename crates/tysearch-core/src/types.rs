//! Core types for tysearch-core.
//!
//! This module defines the data structures shared across every layer: the
//! [`TypeTree`] produced by the parser and consumed by the unifier, the
//! collaborator-supplied [`ParsedSignature`] and [`CatalogEntry`], and the
//! [`MatchResult`] returned by unification.

use serde::{Deserialize, Serialize};

/// Type-variable name → the tree it was resolved to during one unification.
///
/// A persistent map: cloning is O(1) and shares structure, so every
/// exploratory branch can take its own copy.
pub type Bindings = im::HashMap<String, TypeTree>;

// ---------------------------------------------------------------------------
// TypeTree
// ---------------------------------------------------------------------------

/// A structured type expression.
///
/// Every variant carries the `text` it was parsed from; the payload is fixed
/// by the variant. Serialized form is internally tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TypeTree {
    /// `(params) => ret`. The return type is always present.
    Function {
        text: String,
        params: Vec<TypeTree>,
        ret: Box<TypeTree>,
    },
    /// `Name<Args>` for an arbitrary constructor.
    Generic {
        text: String,
        name: String,
        args: Vec<TypeTree>,
    },
    /// `Name<Args>` where `Name` is one of the library's core containers.
    Effect {
        text: String,
        name: String,
        args: Vec<TypeTree>,
    },
    Union {
        text: String,
        members: Vec<TypeTree>,
    },
    Intersection {
        text: String,
        members: Vec<TypeTree>,
    },
    Tuple {
        text: String,
        elements: Vec<TypeTree>,
    },
    Literal {
        text: String,
    },
    /// Lower-cased primitive keyword (`string`, `number`, ...).
    Primitive {
        text: String,
    },
    Reference {
        text: String,
        name: String,
    },
    /// One uppercase letter with an optional digit: `A`, `E1`.
    TypeVariable {
        text: String,
    },
    /// The query token `*`.
    Wildcard,
    Unknown {
        text: String,
    },
}

/// Discriminant of a [`TypeTree`], used for kind-compatibility checks and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Function,
    Generic,
    Effect,
    Union,
    Intersection,
    Tuple,
    Literal,
    Primitive,
    Reference,
    TypeVariable,
    Wildcard,
    Unknown,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeKind::Function => write!(f, "function"),
            TypeKind::Generic => write!(f, "generic"),
            TypeKind::Effect => write!(f, "effect"),
            TypeKind::Union => write!(f, "union"),
            TypeKind::Intersection => write!(f, "intersection"),
            TypeKind::Tuple => write!(f, "tuple"),
            TypeKind::Literal => write!(f, "literal"),
            TypeKind::Primitive => write!(f, "primitive"),
            TypeKind::Reference => write!(f, "reference"),
            TypeKind::TypeVariable => write!(f, "type-variable"),
            TypeKind::Wildcard => write!(f, "wildcard"),
            TypeKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl TypeTree {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeTree::Function { .. } => TypeKind::Function,
            TypeTree::Generic { .. } => TypeKind::Generic,
            TypeTree::Effect { .. } => TypeKind::Effect,
            TypeTree::Union { .. } => TypeKind::Union,
            TypeTree::Intersection { .. } => TypeKind::Intersection,
            TypeTree::Tuple { .. } => TypeKind::Tuple,
            TypeTree::Literal { .. } => TypeKind::Literal,
            TypeTree::Primitive { .. } => TypeKind::Primitive,
            TypeTree::Reference { .. } => TypeKind::Reference,
            TypeTree::TypeVariable { .. } => TypeKind::TypeVariable,
            TypeTree::Wildcard => TypeKind::Wildcard,
            TypeTree::Unknown { .. } => TypeKind::Unknown,
        }
    }

    /// The original text this node was parsed from.
    pub fn text(&self) -> &str {
        match self {
            TypeTree::Function { text, .. }
            | TypeTree::Generic { text, .. }
            | TypeTree::Effect { text, .. }
            | TypeTree::Union { text, .. }
            | TypeTree::Intersection { text, .. }
            | TypeTree::Tuple { text, .. }
            | TypeTree::Literal { text }
            | TypeTree::Primitive { text }
            | TypeTree::Reference { text, .. }
            | TypeTree::TypeVariable { text }
            | TypeTree::Unknown { text } => text,
            TypeTree::Wildcard => "*",
        }
    }

    /// Constructor name for `generic` and `effect` nodes.
    pub fn constructor(&self) -> Option<&str> {
        match self {
            TypeTree::Generic { name, .. } | TypeTree::Effect { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_type_variable(&self) -> bool {
        matches!(self, TypeTree::TypeVariable { .. })
    }

    /// `generic`, `effect` and `function` queries are too specific to be
    /// matched against a single parameter.
    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            TypeTree::Generic { .. } | TypeTree::Effect { .. } | TypeTree::Function { .. }
        )
    }

    /// Compact structural rendering, e.g. `(fn [var:A] (effect Effect [var:A]))`.
    /// Unlike [`TypeTree::text`] this shows how the text was understood.
    pub fn outline(&self) -> String {
        fn list(nodes: &[TypeTree]) -> String {
            nodes.iter().map(TypeTree::outline).collect::<Vec<_>>().join(" ")
        }
        match self {
            TypeTree::Function { params, ret, .. } => {
                format!("(fn [{}] {})", list(params), ret.outline())
            }
            TypeTree::Generic { name, args, .. } => format!("(generic {name} [{}])", list(args)),
            TypeTree::Effect { name, args, .. } => format!("(effect {name} [{}])", list(args)),
            TypeTree::Union { members, .. } => format!("(union {})", list(members)),
            TypeTree::Intersection { members, .. } => format!("(intersection {})", list(members)),
            TypeTree::Tuple { elements, .. } => format!("(tuple {})", list(elements)),
            TypeTree::Literal { text } => format!("lit:{text}"),
            TypeTree::Primitive { text } => format!("prim:{text}"),
            TypeTree::Reference { name, .. } => format!("ref:{name}"),
            TypeTree::TypeVariable { text } => format!("var:{text}"),
            TypeTree::Wildcard => "*".to_string(),
            TypeTree::Unknown { text } => format!("unknown:{text}"),
        }
    }

    // -- constructors -------------------------------------------------------

    pub fn type_variable(text: impl Into<String>) -> Self {
        TypeTree::TypeVariable { text: text.into() }
    }

    pub fn primitive(text: &str) -> Self {
        TypeTree::Primitive {
            text: text.to_lowercase(),
        }
    }

    pub fn reference(text: impl Into<String>) -> Self {
        let text = text.into();
        TypeTree::Reference {
            name: text.clone(),
            text,
        }
    }

    /// Builds a function node, rendering `(p1, p2) => ret` as its text.
    pub fn function(params: Vec<TypeTree>, ret: TypeTree) -> Self {
        let rendered: Vec<&str> = params.iter().map(TypeTree::text).collect();
        let text = format!("({}) => {}", rendered.join(", "), ret.text());
        TypeTree::Function {
            text,
            params,
            ret: Box::new(ret),
        }
    }
}

impl std::fmt::Display for TypeTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

// ---------------------------------------------------------------------------
// Collaborator-supplied catalog data
// ---------------------------------------------------------------------------

/// A declared type parameter of an indexed function, e.g. `A extends string`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<TypeTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<TypeTree>,
}

/// A value parameter of an indexed function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeTree,
    #[serde(default)]
    pub optional: bool,
}

/// A signature pre-parsed by the offline indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSignature {
    pub raw: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: TypeTree,
}

impl ParsedSignature {
    /// The signature as a single `function` node: parameter types, then the
    /// return type.
    pub fn as_function(&self) -> TypeTree {
        let params = self.parameters.iter().map(|p| p.ty.clone()).collect();
        TypeTree::function(params, self.return_type.clone())
    }
}

/// One indexed function. Entries without a `parsed` signature are never
/// matched by type search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub module: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ParsedSignature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

// ---------------------------------------------------------------------------
// MatchResult
// ---------------------------------------------------------------------------

/// Outcome of unifying a query tree against a target tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matches: bool,
    /// In `[0, 100]`; always `0` when `matches` is false.
    pub score: f64,
    pub bindings: Bindings,
    /// Target fragments that took part in the match, for highlighting.
    pub matched_parts: Vec<String>,
}

impl MatchResult {
    pub fn success(score: f64, bindings: Bindings, matched_parts: Vec<String>) -> Self {
        Self {
            matches: true,
            score: score.clamp(0.0, 100.0),
            bindings,
            matched_parts,
        }
    }

    /// A failed match hands back the bindings it was given, untouched.
    pub fn failure(bindings: Bindings) -> Self {
        Self {
            matches: false,
            score: 0.0,
            bindings,
            matched_parts: Vec::new(),
        }
    }

    /// Multiply the score by `factor` (strategy discounts).
    pub fn scaled(mut self, factor: f64) -> Self {
        self.score = (self.score * factor).clamp(0.0, 100.0);
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn function_constructor_renders_text() {
        let f = TypeTree::function(
            vec![TypeTree::type_variable("A"), TypeTree::primitive("String")],
            TypeTree::reference("Foo"),
        );
        assert_eq!(f.text(), "(A, string) => Foo");
        assert_eq!(f.kind(), TypeKind::Function);
    }

    #[test]
    fn wildcard_text_is_star() {
        assert_eq!(TypeTree::Wildcard.text(), "*");
        assert_eq!(TypeTree::Wildcard.kind().to_string(), "wildcard");
    }

    #[test]
    fn tree_deserializes_from_kind_tagged_json() {
        let json = serde_json::json!({
            "kind": "effect",
            "text": "Effect<A, never, never>",
            "name": "Effect",
            "args": [
                { "kind": "type-variable", "text": "A" },
                { "kind": "primitive", "text": "never" },
                { "kind": "primitive", "text": "never" }
            ]
        });
        let tree: TypeTree = serde_json::from_value(json).unwrap();
        assert_eq!(tree.constructor(), Some("Effect"));
        assert!(tree.is_complex());
        match tree {
            TypeTree::Effect { args, .. } => assert!(args[0].is_type_variable()),
            other => panic!("expected effect, got {other:?}"),
        }
    }

    #[test]
    fn signature_as_function_keeps_parameter_order() {
        let sig = ParsedSignature {
            raw: "(a: A, n: number) => Option<A>".to_string(),
            type_parameters: vec![],
            parameters: vec![
                Parameter {
                    name: "a".to_string(),
                    ty: TypeTree::type_variable("A"),
                    optional: false,
                },
                Parameter {
                    name: "n".to_string(),
                    ty: TypeTree::primitive("number"),
                    optional: true,
                },
            ],
            return_type: TypeTree::reference("Option<A>"),
        };
        match sig.as_function() {
            TypeTree::Function { params, ret, .. } => {
                assert_eq!(params.len(), 2);
                assert_eq!(params[1].text(), "number");
                assert_eq!(ret.text(), "Option<A>");
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn scaled_clamps_score() {
        let r = MatchResult::success(90.0, Bindings::new(), vec![]).scaled(2.0);
        assert_eq!(r.score, 100.0);
        let r = MatchResult::failure(Bindings::new());
        assert!(!r.matches);
        assert_eq!(r.score, 0.0);
    }
}
