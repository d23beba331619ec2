use crate::error::GenError;
use crate::schema::{Record, IDENTIFIER_FIELD, NO_IDENTIFIER};

/// Name of the field a record exposes as its node id, if any.
///
/// Resolution order:
/// 1. a record marked `no-identifier` has no id; fields are not inspected;
/// 2. exactly one field marked `identifier-field` is the id;
/// 3. two or more marked fields is [`GenError::AmbiguousIdentifier`];
/// 4. with no marked field, the first field literally named `id` (or `r#id`) is the id.
///
/// # Errors
///
/// Returns [`GenError::AmbiguousIdentifier`] naming the record and the marked-field count.
pub fn find_id_field(record: &Record) -> Result<Option<&str>, GenError> {
    if record.has_attr(NO_IDENTIFIER) {
        return Ok(None);
    }

    let marked: Vec<&str> = record
        .fields
        .iter()
        .filter(|f| f.has_attr(IDENTIFIER_FIELD))
        .map(|f| f.name.as_str())
        .collect();
    match marked.as_slice() {
        [only] => return Ok(Some(*only)),
        [] => {}
        _ => {
            return Err(GenError::AmbiguousIdentifier {
                decl: record.name.clone(),
                count: marked.len(),
            })
        }
    }

    Ok(record
        .fields
        .iter()
        .find(|f| f.name.strip_prefix("r#").unwrap_or(&f.name) == "id")
        .map(|f| f.name.as_str()))
}
