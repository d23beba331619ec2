use crate::diagnostics::{Diagnostic, DiagnosticCode};

/// Failure of a generation run or of loading its schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
    /// Two or more fields of one record carry the identifier marker.
    #[error("record {decl} has {count} fields marked as node id (expected 0 or 1)")]
    AmbiguousIdentifier { decl: String, count: usize },

    #[error("{0}")]
    Schema(Diagnostic),
}

impl GenError {
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            GenError::AmbiguousIdentifier { decl, .. } => {
                Diagnostic::error(DiagnosticCode::AGN0200AmbiguousIdentifier, self.to_string())
                    .with_decl(decl.clone())
            }
            GenError::Schema(d) => d.clone(),
        }
    }
}

impl From<Diagnostic> for GenError {
    fn from(d: Diagnostic) -> Self {
        GenError::Schema(d)
    }
}
