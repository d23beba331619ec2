use sha2::{Digest, Sha256};

use crate::header::strip_provenance;

pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Digest of a generated document with its timestamp line removed.
///
/// Two runs over the same declarations have the same body digest.
pub fn body_sha256(doc: &str) -> String {
    match strip_provenance(doc) {
        Some(body) => sha256_hex(body.as_bytes()),
        None => sha256_hex(doc.as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::provenance_header;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn body_digest_ignores_timestamp() {
        let a = format!("{}\nimpl A {{}}\n", provenance_header("t1"));
        let b = format!("{}\nimpl A {{}}\n", provenance_header("t2"));
        assert_eq!(body_sha256(&a), body_sha256(&b));
    }
}
