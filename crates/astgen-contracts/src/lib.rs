//! Shared, version-pinned protocol identifiers.
//!
//! These constants are the single source of truth for schema/version strings that
//! appear in machine-readable I/O of the `astgen` tools.

pub const SCHEMA_DOC_SCHEMA_VERSION: &str = "astgen.schema@0.1.0";
pub const MANIFEST_SCHEMA_VERSION: &str = "astgen.manifest@0.1.0";
pub const REPORT_SCHEMA_VERSION: &str = "astgen.report@0.1.0";
