use sha2::{Digest, Sha256};

/// Compute the content fingerprint of a source text: SHA-256 over the exact
/// byte sequence, rendered as lowercase hex. Case- and whitespace-sensitive
/// by design since the digest doubles as the storage key.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(fingerprint("Hello"), fingerprint("Hello"));
    }

    #[test]
    fn test_fingerprint_known_vector() {
        // sha256("abc")
        assert_eq!(
            fingerprint("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fingerprint_is_case_and_whitespace_sensitive() {
        assert_ne!(fingerprint("Hello"), fingerprint("hello"));
        assert_ne!(fingerprint("Hello"), fingerprint("Hello "));
    }
}
