//! Header that marks a site config as generated
//!
//! Generated files start with a marker line and a checksum of the body.
//! A file whose body no longer matches its checksum has been edited by hand
//! and is treated as unmanaged from then on.

use vhost_fs::checksum;

/// First line of every generated site config.
pub const MARKER: &str = "# Generated by vhostctl. Hand edits stop automatic updates.";

const CHECKSUM_LINE: &str = "# checksum: ";

/// How a site config file relates to the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// Generated and untouched since; carries the rendered body
    Managed { body: String },
    /// Generated, then edited by hand
    Edited,
    /// Never generated by us
    Foreign,
}

/// Prefix `body` with the marker and its checksum.
pub fn wrap(body: &str) -> String {
    format!(
        "{MARKER}\n{CHECKSUM_LINE}{}\n{body}",
        checksum::compute_content_checksum(body)
    )
}

/// Classify file content by its header.
pub fn classify(content: &str) -> Ownership {
    let Some(rest) = content.strip_prefix(MARKER).and_then(|r| r.strip_prefix('\n')) else {
        return Ownership::Foreign;
    };
    let Some((checksum_line, body)) = rest.split_once('\n') else {
        return Ownership::Edited;
    };
    match checksum_line.strip_prefix(CHECKSUM_LINE) {
        Some(sum) if checksum::verify_content(body, sum) => Ownership::Managed {
            body: body.to_string(),
        },
        _ => Ownership::Edited,
    }
}
