//! Schema loading.
//!
//! The Rust-syntax form is the one checked into the toolchain: `struct` items are
//! records, `enum` items are variants and `bitflags!` items are flag sets.
//! `#[node_id]` on a field and `#[no_node_id]` on a declaration become the
//! [`IDENTIFIER_FIELD`] and [`NO_IDENTIFIER`] markers; any other attribute is kept
//! as an opaque marker named by its path. The JSON form carries the markers directly.

use std::collections::BTreeSet;

use astgen_contracts::SCHEMA_DOC_SCHEMA_VERSION;
use serde::Deserialize;
use syn::parse::{Parse, ParseStream};
use syn::{braced, Attribute, Ident, Token};
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::error::GenError;
use crate::schema::{
    AttrSet, Declaration, Field, FlagSet, Record, Variant, IDENTIFIER_FIELD, NO_IDENTIFIER,
};

/// Parses a Rust-syntax schema into declarations, in source order.
///
/// # Errors
///
/// Returns [`GenError::Schema`] for unparsable input, unsupported items, marker
/// attributes with arguments, and duplicate declaration names.
pub fn parse_schema(src: &str) -> Result<Vec<Declaration>, GenError> {
    let file = syn::parse_file(src)
        .map_err(|e| Diagnostic::error(DiagnosticCode::AGN0001ParseError, e.to_string()))?;

    let mut decls: Vec<Declaration> = Vec::new();
    for item in &file.items {
        match item {
            syn::Item::Struct(s) => decls.push(lower_struct(s)?),
            syn::Item::Enum(e) => decls.push(lower_enum(e)?),
            syn::Item::Macro(m) if is_bitflags(&m.mac.path) => decls.extend(lower_bitflags(m)?),
            syn::Item::Use(_) => {}
            other => return Err(unsupported_item(other).into()),
        }
    }

    check_unique_names(&decls)?;
    debug!(declarations = decls.len(), "schema parsed");
    Ok(decls)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDoc {
    schema_version: String,
    decls: Vec<Declaration>,
}

/// Parses a JSON schema document (`{"schema_version": .., "decls": [..]}`).
///
/// # Errors
///
/// Returns [`GenError::Schema`] for malformed JSON (unknown keys included), a schema
/// version mismatch, names that are not Rust identifiers, and duplicate declaration names.
pub fn parse_schema_json(src: &str) -> Result<Vec<Declaration>, GenError> {
    let doc: SchemaDoc = serde_json::from_str(src).map_err(|e| {
        Diagnostic::error(
            DiagnosticCode::AGN0001ParseError,
            format!("invalid schema JSON: {e}"),
        )
    })?;
    if doc.schema_version.trim() != SCHEMA_DOC_SCHEMA_VERSION {
        return Err(Diagnostic::error(
            DiagnosticCode::AGN0002SchemaVersionMismatch,
            format!(
                "schema_version mismatch: expected {SCHEMA_DOC_SCHEMA_VERSION} got {:?}",
                doc.schema_version
            ),
        )
        .into());
    }

    check_names(&doc.decls)?;
    check_unique_names(&doc.decls)?;
    debug!(declarations = doc.decls.len(), "schema JSON loaded");
    Ok(doc.decls)
}

fn lower_struct(s: &syn::ItemStruct) -> Result<Declaration, GenError> {
    let name = s.ident.to_string();
    if !s.generics.params.is_empty() {
        return Err(Diagnostic::error(
            DiagnosticCode::AGN0100UnsupportedItem,
            "generic structs are not supported",
        )
        .with_decl(name)
        .into());
    }
    let attrs = markers(&s.attrs, &name)?;

    // Tuple fields are named by position so that `self.<name>` still projects them.
    let mut fields = Vec::with_capacity(s.fields.len());
    for (idx, f) in s.fields.iter().enumerate() {
        let field_name = match &f.ident {
            Some(ident) => ident.to_string(),
            None => idx.to_string(),
        };
        fields.push(Field {
            attrs: markers(&f.attrs, &name)?,
            name: field_name,
        });
    }

    Ok(Record {
        name,
        attrs,
        fields,
    }
    .into())
}

fn lower_enum(e: &syn::ItemEnum) -> Result<Declaration, GenError> {
    let name = e.ident.to_string();
    Ok(Variant {
        attrs: markers(&e.attrs, &name)?,
        variants: e.variants.iter().map(|v| v.ident.to_string()).collect(),
        name,
    }
    .into())
}

fn is_bitflags(path: &syn::Path) -> bool {
    path.segments.last().is_some_and(|seg| seg.ident == "bitflags")
}

fn lower_bitflags(m: &syn::ItemMacro) -> Result<Vec<Declaration>, GenError> {
    let block: BitflagsBlock = syn::parse2(m.mac.tokens.clone()).map_err(|e| {
        Diagnostic::error(DiagnosticCode::AGN0001ParseError, format!("bitflags!: {e}"))
    })?;

    let mut out = Vec::with_capacity(block.0.len());
    for decl in block.0 {
        let name = decl.name.to_string();
        out.push(
            FlagSet {
                attrs: markers(&decl.attrs, &name)?,
                flags: decl.flags.iter().map(ToString::to_string).collect(),
                name,
            }
            .into(),
        );
    }
    Ok(out)
}

/// One `struct Name: Repr { const FLAG = expr; ... }` entry of a `bitflags!` invocation.
struct BitflagsDecl {
    attrs: Vec<Attribute>,
    name: Ident,
    flags: Vec<Ident>,
}

struct BitflagsBlock(Vec<BitflagsDecl>);

impl Parse for BitflagsDecl {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let _vis: syn::Visibility = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let _repr: syn::Type = input.parse()?;

        let body;
        braced!(body in input);
        let mut flags = Vec::new();
        while !body.is_empty() {
            body.call(Attribute::parse_outer)?;
            body.parse::<Token![const]>()?;
            if body.peek(Token![_]) {
                body.parse::<Token![_]>()?;
            } else {
                flags.push(body.parse::<Ident>()?);
            }
            body.parse::<Token![=]>()?;
            body.parse::<syn::Expr>()?;
            body.parse::<Token![;]>()?;
        }

        Ok(BitflagsDecl { attrs, name, flags })
    }
}

impl Parse for BitflagsBlock {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut decls = Vec::new();
        while !input.is_empty() {
            decls.push(input.parse()?);
        }
        Ok(BitflagsBlock(decls))
    }
}

fn markers(attrs: &[Attribute], decl: &str) -> Result<AttrSet, GenError> {
    let mut out = AttrSet::new();
    for attr in attrs {
        let path = attr.path();
        if path.is_ident("doc") {
            continue;
        }
        let marker = if path.is_ident("node_id") {
            IDENTIFIER_FIELD
        } else if path.is_ident("no_node_id") {
            NO_IDENTIFIER
        } else {
            out.insert(path_string(path));
            continue;
        };
        if !matches!(attr.meta, syn::Meta::Path(_)) {
            return Err(Diagnostic::error(
                DiagnosticCode::AGN0120MarkerWithPayload,
                format!("#[{}] takes no arguments", path_string(path)),
            )
            .with_decl(decl)
            .into());
        }
        out.insert(marker);
    }
    Ok(out)
}

fn path_string(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|seg| seg.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

fn unsupported_item(item: &syn::Item) -> Diagnostic {
    let (kind, name) = match item {
        syn::Item::Fn(f) => ("fn", Some(f.sig.ident.to_string())),
        syn::Item::Type(t) => ("type alias", Some(t.ident.to_string())),
        syn::Item::Union(u) => ("union", Some(u.ident.to_string())),
        syn::Item::Trait(t) => ("trait", Some(t.ident.to_string())),
        syn::Item::Const(c) => ("const", Some(c.ident.to_string())),
        syn::Item::Static(s) => ("static", Some(s.ident.to_string())),
        syn::Item::Mod(m) => ("mod", Some(m.ident.to_string())),
        syn::Item::Impl(_) => ("impl", None),
        syn::Item::Macro(m) => ("macro invocation", Some(path_string(&m.mac.path))),
        _ => ("item", None),
    };
    let d = Diagnostic::error(
        DiagnosticCode::AGN0100UnsupportedItem,
        format!("unsupported top-level item: {kind}"),
    );
    match name {
        Some(name) => d.with_decl(name),
        None => d,
    }
}

/// JSON names reach the emitted source verbatim; only identifiers (and tuple
/// indices for fields) are accepted.
fn check_names(decls: &[Declaration]) -> Result<(), GenError> {
    for d in decls {
        if !is_ident(d.name()) {
            return Err(Diagnostic::error(
                DiagnosticCode::AGN0130InvalidName,
                format!("declaration name {:?} is not an identifier", d.name()),
            )
            .with_decl(d.name())
            .into());
        }
        let Declaration::Record(r) = d else {
            continue;
        };
        if let Some(f) = r
            .fields
            .iter()
            .find(|f| !is_ident(&f.name) && !is_tuple_index(&f.name))
        {
            return Err(Diagnostic::error(
                DiagnosticCode::AGN0130InvalidName,
                format!("field name {:?} is not an identifier or tuple index", f.name),
            )
            .with_decl(r.name.as_str())
            .into());
        }
    }
    Ok(())
}

fn is_ident(name: &str) -> bool {
    syn::parse_str::<Ident>(name).is_ok_and(|ident| ident == name)
}

fn is_tuple_index(name: &str) -> bool {
    name == "0"
        || (!name.is_empty() && !name.starts_with('0') && name.bytes().all(|b| b.is_ascii_digit()))
}

fn check_unique_names(decls: &[Declaration]) -> Result<(), GenError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for d in decls {
        if !seen.insert(d.name()) {
            return Err(Diagnostic::error(
                DiagnosticCode::AGN0110DuplicateDeclaration,
                format!("declaration {} is defined more than once", d.name()),
            )
            .with_decl(d.name())
            .into());
        }
    }
    Ok(())
}
