//! SHA-256 checksum utilities
//!
//! One canonical checksum format (`sha256:<hex>`) is used for generated
//! site-config headers.

use sha2::{Digest, Sha256};

/// Prefix for all checksums produced by this module
pub const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of string content.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// True if `checksum` is in canonical form and matches `content`.
pub fn verify_content(content: &str, checksum: &str) -> bool {
    checksum.starts_with(PREFIX) && compute_content_checksum(content) == checksum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_checksum_known_value() {
        let checksum = compute_content_checksum("hello world");
        assert_eq!(
            checksum,
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn verify_rejects_other_content_and_bare_hex() {
        let checksum = compute_content_checksum("aaa");
        assert!(verify_content("aaa", &checksum));
        assert!(!verify_content("bbb", &checksum));
        assert!(!verify_content("aaa", checksum.trim_start_matches(PREFIX)));
    }

}
