//! Provenance header of generated documents.
//!
//! The header is exactly two lines: a fixed marker and a line carrying the
//! caller-supplied timestamp. Everything else in a document is a pure function
//! of the input declarations, so [`strip_provenance`] yields a run-independent body.

pub const GENERATED_MARKER: &str = "// AUTOMATICALLY GENERATED - DO NOT EDIT";
pub const PRODUCER: &str = "astgen";

const PRODUCED_PREFIX: &str = "// Produced ";

pub fn provenance_header(timestamp: &str) -> String {
    // Line breaks inside the timestamp would push content out of the header.
    let ts = timestamp.replace(['\r', '\n'], " ");
    format!("{GENERATED_MARKER}\n{PRODUCED_PREFIX}{ts} by {PRODUCER}\n")
}

/// Drops the timestamp line. Returns `None` when `doc` does not start with a provenance header.
pub fn strip_provenance(doc: &str) -> Option<String> {
    let rest = doc.strip_prefix(GENERATED_MARKER)?.strip_prefix('\n')?;
    if !rest.starts_with(PRODUCED_PREFIX) {
        return None;
    }
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => "",
    };
    Some(format!("{GENERATED_MARKER}\n{body}"))
}
