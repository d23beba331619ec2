use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Parse,
    Validate,
    Resolve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticCode {
    AGN0001ParseError,
    AGN0002SchemaVersionMismatch,
    AGN0100UnsupportedItem,
    AGN0110DuplicateDeclaration,
    AGN0120MarkerWithPayload,
    AGN0130InvalidName,
    AGN0200AmbiguousIdentifier,
}

impl DiagnosticCode {
    pub fn code_str(self) -> &'static str {
        match self {
            DiagnosticCode::AGN0001ParseError => "AGN0001",
            DiagnosticCode::AGN0002SchemaVersionMismatch => "AGN0002",
            DiagnosticCode::AGN0100UnsupportedItem => "AGN0100",
            DiagnosticCode::AGN0110DuplicateDeclaration => "AGN0110",
            DiagnosticCode::AGN0120MarkerWithPayload => "AGN0120",
            DiagnosticCode::AGN0130InvalidName => "AGN0130",
            DiagnosticCode::AGN0200AmbiguousIdentifier => "AGN0200",
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            DiagnosticCode::AGN0001ParseError | DiagnosticCode::AGN0002SchemaVersionMismatch => {
                Phase::Parse
            }
            DiagnosticCode::AGN0100UnsupportedItem
            | DiagnosticCode::AGN0110DuplicateDeclaration
            | DiagnosticCode::AGN0120MarkerWithPayload
            | DiagnosticCode::AGN0130InvalidName => Phase::Validate,
            DiagnosticCode::AGN0200AmbiguousIdentifier => Phase::Resolve,
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            DiagnosticCode::AGN0001ParseError => "failed to parse schema",
            DiagnosticCode::AGN0002SchemaVersionMismatch => "schema document version mismatch",
            DiagnosticCode::AGN0100UnsupportedItem => "unsupported schema item",
            DiagnosticCode::AGN0110DuplicateDeclaration => "declaration name defined twice",
            DiagnosticCode::AGN0120MarkerWithPayload => "marker attribute carries a payload",
            DiagnosticCode::AGN0130InvalidName => "name is not a Rust identifier",
            DiagnosticCode::AGN0200AmbiguousIdentifier => "more than one field marked as node id",
        }
    }

    pub fn default_help(self) -> Option<&'static str> {
        match self {
            DiagnosticCode::AGN0001ParseError => Some(
                "Ensure the schema parses as Rust and contains only struct, enum and bitflags! items.",
            ),
            DiagnosticCode::AGN0120MarkerWithPayload => {
                Some("Write #[node_id] / #[no_node_id] without arguments.")
            }
            DiagnosticCode::AGN0130InvalidName => Some(
                "Declaration names must be identifiers; field names identifiers or tuple indices.",
            ),
            DiagnosticCode::AGN0200AmbiguousIdentifier => Some(
                "Keep #[node_id] (\"identifier-field\") on exactly one field, or mark the record #[no_node_id] (\"no-identifier\").",
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub phase: Phase,
    pub severity: Severity,
    /// Declaration the diagnostic is about, when there is one.
    pub decl: Option<String>,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            phase: code.phase(),
            severity: Severity::Error,
            decl: None,
            message: message.into(),
            help: code.default_help().map(|s| s.to_string()),
        }
    }

    pub fn with_decl(mut self, decl: impl Into<String>) -> Self {
        self.decl = Some(decl.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} {:?}: {}",
            self.code.code_str(),
            self.phase,
            self.severity,
            self.message
        )?;
        if let Some(decl) = &self.decl {
            write!(f, "\n  in: {decl}")?;
        }
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}

pub fn render_diagnostics_md() -> String {
    let mut rows: Vec<(&'static str, Phase, &'static str, &'static str)> = all_codes()
        .iter()
        .map(|code| {
            (
                code.code_str(),
                code.phase(),
                code.default_message(),
                code.default_help().unwrap_or(""),
            )
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = String::new();
    out.push_str("# astgen diagnostics catalog\n\n");
    out.push_str("This document is generated from `crates/astgen-core/src/diagnostics.rs`.\n\n");
    out.push_str("| Code | Phase | Severity | Message | Help |\n");
    out.push_str("| ---- | ----- | -------- | ------- | ---- |\n");
    for (code, phase, msg, help) in rows {
        out.push_str(&format!(
            "| {code} | {phase:?} | {:?} | {msg} | {help} |\n",
            Severity::Error
        ));
    }
    out
}

fn all_codes() -> &'static [DiagnosticCode] {
    &[
        DiagnosticCode::AGN0001ParseError,
        DiagnosticCode::AGN0002SchemaVersionMismatch,
        DiagnosticCode::AGN0100UnsupportedItem,
        DiagnosticCode::AGN0110DuplicateDeclaration,
        DiagnosticCode::AGN0120MarkerWithPayload,
        DiagnosticCode::AGN0130InvalidName,
        DiagnosticCode::AGN0200AmbiguousIdentifier,
    ]
}
