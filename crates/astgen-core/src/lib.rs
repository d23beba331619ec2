//! Generation of `GetNodeId` impls for AST schema declarations.
//!
//! Records expose their node id through one field, chosen by [`resolve::find_id_field`];
//! variants and flag sets never have one. [`generate::generate`] turns a declaration
//! list into one Rust source document.

pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod frontend;
pub mod generate;
pub mod header;
pub mod resolve;
pub mod schema;
pub mod util;

pub use error::GenError;
pub use generate::{generate, generate_report, Accessor, GenerateReport};
pub use schema::{AttrSet, Declaration, Field, FlagSet, Record, Variant};
