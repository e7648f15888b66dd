//! Typed view over a domain's attribute files

use std::net::IpAddr;

use serde::Serialize;

use super::attributes::{AttributeKey, AttributeStore};
use crate::Result;
use crate::quota::Quota;

/// The attributes the hosting tools act on, loaded in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainSettings {
    /// Dedicated addresses; empty means the domain shares the host's address
    pub ips: Vec<IpAddr>,
    /// Stored FTP credential, hashed or as written by hand
    #[serde(skip_serializing)]
    pub ftp_password: Option<String>,
    /// FTP quota; `Unlimited` when unset
    pub ftp_quota: Quota,
    /// Marker keeping the domain out of generated site configs
    pub disabled: bool,
}

impl DomainSettings {
    pub fn load(store: &AttributeStore) -> Result<Self> {
        let ips = match store.get(AttributeKey::Ip.as_str())? {
            Some(text) => parse_ips(&text),
            None => Vec::new(),
        };

        let ftp_password = store
            .get(AttributeKey::FtpPassword.as_str())?
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let ftp_quota = match store.get(AttributeKey::FtpQuota.as_str())? {
            Some(text) => text.parse()?,
            None => Quota::Unlimited,
        };

        let disabled = store.contains(AttributeKey::Disabled.as_str())?;

        Ok(Self {
            ips,
            ftp_password,
            ftp_quota,
            disabled,
        })
    }

    /// True when the domain needs its own site config rather than the
    /// shared mass-hosting one.
    pub fn has_dedicated_ip(&self) -> bool {
        !self.ips.is_empty()
    }
}

/// Parse whitespace-separated addresses, skipping anything unparsable.
pub fn parse_ips(text: &str) -> Vec<IpAddr> {
    text.split_whitespace()
        .filter_map(|token| match token.parse() {
            Ok(ip) => Some(ip),
            Err(_) => {
                tracing::warn!(token, "ignoring unparsable address in ip attribute");
                None
            }
        })
        .collect()
}
