//! Test builders: ergonomic constructors for `CatalogEntry` values.
//!
//! They panic on invalid input rather than returning `Result`.

use tysearch_core::{parse, CatalogEntry, Parameter, ParsedSignature, TypeParameter, TypeTree};

/// Parse a type string, panicking if the parser rejects it.
pub fn ty(text: &str) -> TypeTree {
    parse(text).unwrap_or_else(|| panic!("fixture type {text:?} must parse"))
}

// ---------------------------------------------------------------------------
// EntryBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`CatalogEntry`] fixtures.
///
/// # Example
///
/// ```rust
/// let entry = EntryBuilder::new("Effect", "succeed")
///     .type_param("A")
///     .param("value", "A")
///     .returns("Effect<A, never, never>")
///     .build();
/// ```
pub struct EntryBuilder {
    module: String,
    name: String,
    type_parameters: Vec<TypeParameter>,
    parameters: Vec<Parameter>,
    return_type: Option<TypeTree>,
    unparsed: bool,
}

impl EntryBuilder {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
            unparsed: false,
        }
    }

    pub fn type_param(mut self, name: &str) -> Self {
        self.type_parameters.push(TypeParameter {
            name: name.to_string(),
            constraint: None,
            default: None,
        });
        self
    }

    pub fn param(mut self, name: &str, ty_text: &str) -> Self {
        self.parameters.push(Parameter {
            name: name.to_string(),
            ty: ty(ty_text),
            optional: false,
        });
        self
    }

    pub fn optional_param(mut self, name: &str, ty_text: &str) -> Self {
        self.parameters.push(Parameter {
            name: name.to_string(),
            ty: ty(ty_text),
            optional: true,
        });
        self
    }

    pub fn returns(mut self, ty_text: &str) -> Self {
        self.return_type = Some(ty(ty_text));
        self
    }

    /// Drop the parsed signature, as the indexer does when extraction fails.
    pub fn unparsed(mut self) -> Self {
        self.unparsed = true;
        self
    }

    pub fn build(self) -> CatalogEntry {
        let return_type = self.return_type.unwrap_or_else(|| ty("void"));
        let generics = if self.type_parameters.is_empty() {
            String::new()
        } else {
            let names: Vec<&str> = self.type_parameters.iter().map(|t| t.name.as_str()).collect();
            format!("<{}>", names.join(", "))
        };
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                let mark = if p.optional { "?" } else { "" };
                format!("{}{mark}: {}", p.name, p.ty.text())
            })
            .collect();
        let raw = format!("{generics}({}) => {}", params.join(", "), return_type.text());

        let parsed = (!self.unparsed).then(|| ParsedSignature {
            raw: raw.clone(),
            type_parameters: self.type_parameters,
            parameters: self.parameters,
            return_type,
        });

        CatalogEntry {
            id: format!("{}.{}", self.module, self.name),
            name: self.name,
            module: self.module,
            signature: raw,
            parsed,
            kind: Some("function".to_string()),
            doc: None,
        }
    }
}
