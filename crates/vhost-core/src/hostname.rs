//! Host name syntax and random domain names
//!
//! Every name that reaches the filesystem (domain directories, alias links,
//! site-config file names) passes through [`is_valid_hostname`] first. The
//! permitted alphabet is letters, digits, hyphen and dot, so shell
//! metacharacters and path traversal never get as far as a lookup.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

/// Maximum length of a full host name, per DNS.
pub const MAX_HOSTNAME_LEN: usize = 253;

/// Maximum number of labels a 253-byte name can carry.
pub const MAX_LABELS: usize = 127;

/// Length of generated domain names.
pub const RANDOM_LABEL_LEN: usize = 10;

/// Names the reconciler reserves for mass-hosting configs.
pub const RESERVED_NAMES: [&str; 2] = ["zz-mass-hosting", "zz-mass-hosting.ssl"];

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{0,62}$").expect("Invalid label regex"));

const RANDOM_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// True if `name` is a lowercase dot-separated sequence of valid labels.
pub fn is_valid_hostname(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_HOSTNAME_LEN {
        return false;
    }
    let mut labels = 0;
    for label in name.split('.') {
        labels += 1;
        if labels > MAX_LABELS || !LABEL.is_match(label) {
            return false;
        }
    }
    true
}

/// Canonicalise user or network input into a lookup name.
///
/// Trims whitespace, drops one trailing dot (FQDN form) and lowercases.
/// Returns `None` if the result is not a valid host name.
pub fn normalize_hostname(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    let lowered = trimmed.to_ascii_lowercase();
    is_valid_hostname(&lowered).then_some(lowered)
}

/// True if `name` is one of the fixed mass-hosting names.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Generate a random lowercase alphanumeric label of `len` characters.
pub fn random_label(len: usize) -> String {
    let mut label = String::with_capacity(len);
    while label.len() < len {
        for byte in Uuid::new_v4().as_bytes() {
            if label.len() == len {
                break;
            }
            // 252 is the largest multiple of 36 below 256; skip the tail to
            // keep the distribution uniform.
            if *byte < 252 {
                label.push(RANDOM_ALPHABET[(*byte % 36) as usize] as char);
            }
        }
    }
    label
}
