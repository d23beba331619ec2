//! In-memory schema model: the declarations a generation run consumes.
//!
//! Declarations are built once (by [`crate::frontend`] or by hand) and are only
//! read afterwards; nothing in this crate mutates them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Field marker: this field holds the record's node id.
pub const IDENTIFIER_FIELD: &str = "identifier-field";
/// Declaration marker: never generate a node id accessor for this record.
pub const NO_IDENTIFIER: &str = "no-identifier";

/// Presence-only set of attribute markers. Order is irrelevant and duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrSet(BTreeSet<String>);

impl AttrSet {
    pub fn new() -> Self {
        AttrSet(BTreeSet::new())
    }

    /// Returns `true` if the marker was not present yet.
    pub fn insert(&mut self, marker: impl Into<String>) -> bool {
        self.0.insert(marker.into())
    }

    pub fn contains(&self, marker: &str) -> bool {
        self.0.contains(marker)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AttrSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        AttrSet(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for AttrSet {
    fn from(markers: [S; N]) -> Self {
        markers.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub attrs: AttrSet,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            attrs: AttrSet::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, marker: impl Into<String>) -> Self {
        self.attrs.insert(marker);
        self
    }

    pub fn has_attr(&self, marker: &str) -> bool {
        self.attrs.contains(marker)
    }
}

/// Product-of-fields declaration. Field order is the declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub name: String,
    #[serde(default)]
    pub attrs: AttrSet,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Record {
            name: name.into(),
            attrs: AttrSet::new(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, marker: impl Into<String>) -> Self {
        self.attrs.insert(marker);
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn has_attr(&self, marker: &str) -> bool {
        self.attrs.contains(marker)
    }
}

/// Sum-type declaration; `variants` lists the alternative names in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variant {
    pub name: String,
    #[serde(default)]
    pub attrs: AttrSet,
    #[serde(default)]
    pub variants: Vec<String>,
}

/// Bitmask-like declaration; `flags` lists the flag names in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagSet {
    pub name: String,
    #[serde(default)]
    pub attrs: AttrSet,
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Record(Record),
    Variant(Variant),
    FlagSet(FlagSet),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Record(r) => &r.name,
            Declaration::Variant(v) => &v.name,
            Declaration::FlagSet(f) => &f.name,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Declaration::Record(_) => "record",
            Declaration::Variant(_) => "variant",
            Declaration::FlagSet(_) => "flag_set",
        }
    }
}

impl From<Record> for Declaration {
    fn from(r: Record) -> Self {
        Declaration::Record(r)
    }
}

impl From<Variant> for Declaration {
    fn from(v: Variant) -> Self {
        Declaration::Variant(v)
    }
}

impl From<FlagSet> for Declaration {
    fn from(f: FlagSet) -> Self {
        Declaration::FlagSet(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_set_collapses_duplicates() {
        let attrs = AttrSet::from([IDENTIFIER_FIELD, IDENTIFIER_FIELD, "derive"]);
        assert_eq!(attrs.len(), 2);
        assert!(attrs.contains(IDENTIFIER_FIELD));
        assert!(!attrs.contains(NO_IDENTIFIER));
    }

    #[test]
    fn declaration_json_uses_kind_tag() {
        let decl = Declaration::from(
            Record::new("Point")
                .with_attr(NO_IDENTIFIER)
                .with_field(Field::new("id")),
        );
        let v = serde_json::to_value(&decl).expect("encode declaration");
        assert_eq!(v["kind"], "record");
        assert_eq!(v["attrs"], serde_json::json!(["no-identifier"]));

        let back: Declaration = serde_json::from_value(v).expect("decode declaration");
        assert_eq!(back, decl);
    }

    #[test]
    fn missing_attrs_and_fields_default_to_empty() {
        let decl: Declaration =
            serde_json::from_str(r#"{"kind":"record","name":"Empty"}"#).expect("decode");
        let Declaration::Record(r) = decl else {
            panic!("expected record");
        };
        assert!(r.attrs.is_empty());
        assert!(r.fields.is_empty());
    }

    #[test]
    fn misspelled_keys_are_rejected() {
        let err = serde_json::from_str::<Declaration>(
            r#"{"kind":"record","name":"Expr","atrs":["no-identifier"],"fields":[{"name":"id"}]}"#,
        )
        .expect_err("unknown record key");
        assert!(err.to_string().contains("atrs"), "{err}");

        let err = serde_json::from_str::<Declaration>(
            r#"{"kind":"record","name":"Stmt","fields":[{"name":"uid","attr":["identifier-field"]}]}"#,
        )
        .expect_err("unknown field key");
        assert!(err.to_string().contains("attr"), "{err}");
    }
}
