use serde::Serialize;
use tracing::{debug, error, info};

use crate::emit::emit_accessor;
use crate::error::GenError;
use crate::header::provenance_header;
use crate::resolve::find_id_field;
use crate::schema::Declaration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accessor {
    pub record: String,
    pub field: String,
}

/// A successful generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub document: String,
    pub declarations: usize,
    pub records: usize,
    /// One entry per emitted block, in input order.
    pub accessors: Vec<Accessor>,
}

/// Generates the `GetNodeId` impl document for `decls`.
///
/// # Errors
///
/// Fails with [`GenError::AmbiguousIdentifier`] on the first record with more than one
/// marked field; no document is produced in that case.
pub fn generate(decls: &[Declaration], timestamp: &str) -> Result<String, GenError> {
    generate_report(decls, timestamp).map(|r| r.document)
}

/// Same as [`generate`], also returning what was emitted.
///
/// # Errors
///
/// See [`generate`].
pub fn generate_report(decls: &[Declaration], timestamp: &str) -> Result<GenerateReport, GenError> {
    let mut body = String::new();
    let mut records = 0usize;
    let mut accessors: Vec<Accessor> = Vec::new();

    for decl in decls {
        let record = match decl {
            Declaration::Record(r) => r,
            Declaration::Variant(_) | Declaration::FlagSet(_) => {
                debug!(decl = decl.name(), kind = decl.kind_str(), "skipped: not a record");
                continue;
            }
        };
        records += 1;

        let field = match find_id_field(record) {
            Ok(Some(field)) => field,
            Ok(None) => {
                debug!(decl = %record.name, "no node id");
                continue;
            }
            Err(err) => {
                error!(decl = %record.name, "{err}");
                return Err(err);
            }
        };
        debug!(decl = %record.name, field, "node id field resolved");

        body.push('\n');
        body.push_str(&emit_accessor(&record.name, field));
        accessors.push(Accessor {
            record: record.name.clone(),
            field: field.to_string(),
        });
    }

    info!(
        declarations = decls.len(),
        records,
        accessors = accessors.len(),
        "node id accessors generated"
    );

    let mut document = provenance_header(timestamp);
    document.push_str(&body);
    Ok(GenerateReport {
        document,
        declarations: decls.len(),
        records,
        accessors,
    })
}
