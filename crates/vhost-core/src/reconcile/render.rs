//! Site config rendering
//!
//! Templates are plain text with `{{ key }}` placeholders. A template file
//! `<template_dir>/<name>.template` overrides the built-in one of the same
//! name.
//!
//! | key         | value                                                  |
//! |-------------|--------------------------------------------------------|
//! | `prefix`    | directory holding the domain entries                   |
//! | `ip`        | first dedicated address, or `*`                        |
//! | `domain`    | primary name                                           |
//! | `aliases`   | every other name the site answers to, `www.` forms too |
//! | `directory` | the domain's directory                                 |
//! | `htdocs`    | the domain's document root                             |
//!
//! Mass-hosting sites only get `prefix` and `ip`.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use vhost_fs::{NormalizedPath, io};

use super::site::SiteId;
use crate::domain::Domain;
use crate::{Error, Result};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("Invalid placeholder regex")
});

const NON_SSL: &str = "\
<VirtualHost {{ ip }}:80>
    ServerName {{ domain }}
    ServerAlias {{ aliases }}

    DocumentRoot {{ htdocs }}
    <Directory {{ htdocs }}>
        Options +FollowSymLinks
        AllowOverride all
        Require all granted
    </Directory>

    ErrorLog ${APACHE_LOG_DIR}/{{ domain }}.error.log
    CustomLog ${APACHE_LOG_DIR}/{{ domain }}.access.log combined
</VirtualHost>
";

const MASS_HOSTING: &str = "\
<VirtualHost {{ ip }}:80>
    UseCanonicalName Off
    VirtualDocumentRoot {{ prefix }}/%0/public/htdocs
    <Directory {{ prefix }}/*/public/htdocs>
        Options +FollowSymLinks
        AllowOverride all
        Require all granted
    </Directory>
</VirtualHost>
";

const MASS_HOSTING_SSL: &str = "\
<IfModule mod_ssl.c>
<VirtualHost {{ ip }}:443>
    UseCanonicalName Off
    VirtualDocumentRoot {{ prefix }}/%0/public/htdocs
    SSLEngine on
    <Directory {{ prefix }}/*/public/htdocs>
        Options +FollowSymLinks
        AllowOverride all
        Require all granted
    </Directory>
</VirtualHost>
</IfModule>
";

/// Built-in template by name.
pub fn builtin_template(name: &str) -> Option<&'static str> {
    match name {
        "non_ssl" => Some(NON_SSL),
        "zz-mass-hosting" => Some(MASS_HOSTING),
        "zz-mass-hosting.ssl" => Some(MASS_HOSTING_SSL),
        _ => None,
    }
}

/// Domain facts a per-domain site renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainContext {
    pub name: String,
    /// Alias names, without `www.` forms
    pub aliases: Vec<String>,
    pub ips: Vec<IpAddr>,
    pub directory: NormalizedPath,
    pub htdocs: NormalizedPath,
}

/// Everything a renderer needs for one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    pub site: SiteId,
    pub prefix: NormalizedPath,
    pub domain: Option<DomainContext>,
}

impl SiteContext {
    pub fn mass_hosting(site: SiteId, prefix: NormalizedPath) -> Self {
        Self {
            site,
            prefix,
            domain: None,
        }
    }

    /// Context for a primary domain.
    pub fn for_domain(domain: &Domain, aliases: Vec<String>, ips: Vec<IpAddr>) -> Self {
        Self {
            site: SiteId::Domain(domain.primary_name().to_string()),
            prefix: domain.root().clone(),
            domain: Some(DomainContext {
                name: domain.primary_name().to_string(),
                aliases,
                ips,
                directory: domain.root().join(domain.primary_name()),
                htdocs: domain
                    .root()
                    .join(domain.primary_name())
                    .join(vhost_fs::HostPath::HtdocsDir.as_str()),
            }),
        }
    }

    /// Placeholder values for this site.
    pub fn variables(&self) -> BTreeMap<&'static str, String> {
        let mut vars = BTreeMap::new();
        vars.insert("prefix", self.prefix.to_string());

        let ip = self
            .domain
            .as_ref()
            .and_then(|d| d.ips.first())
            .map(|ip| match ip {
                IpAddr::V4(v4) => v4.to_string(),
                IpAddr::V6(v6) => format!("[{v6}]"),
            })
            .unwrap_or_else(|| "*".to_string());
        vars.insert("ip", ip);

        if let Some(domain) = &self.domain {
            let aliases: Vec<String> = std::iter::once(format!("www.{}", domain.name))
                .chain(
                    domain
                        .aliases
                        .iter()
                        .flat_map(|a| [a.clone(), format!("www.{a}")]),
                )
                .collect();
            vars.insert("domain", domain.name.clone());
            vars.insert("aliases", aliases.join(" "));
            vars.insert("directory", domain.directory.to_string());
            vars.insert("htdocs", domain.htdocs.to_string());
        }
        vars
    }
}

/// Turns a site context into config text.
pub trait SiteRenderer {
    fn render(&self, site: &SiteContext) -> Result<String>;
}

/// Renders from template files, falling back to the built-ins.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template_dir: NormalizedPath,
}

impl TemplateRenderer {
    pub fn new(template_dir: NormalizedPath) -> Self {
        Self { template_dir }
    }

    fn template(&self, site: &SiteId) -> Result<Cow<'static, str>> {
        let name = site.template();
        let path = self.template_dir.join(&format!("{name}.template"));
        if let Some(text) = io::read_optional_text(&path)? {
            tracing::debug!(site = %site, path = %path, "using template file");
            return Ok(Cow::Owned(text));
        }
        builtin_template(name)
            .map(Cow::Borrowed)
            .ok_or_else(|| Error::RenderFailed {
                site: site.to_string(),
                reason: format!("no template named {name}"),
            })
    }
}

impl SiteRenderer for TemplateRenderer {
    fn render(&self, site: &SiteContext) -> Result<String> {
        let template = self.template(&site.site)?;
        expand(&template, &site.variables()).map_err(|unknown| Error::RenderFailed {
            site: site.site.to_string(),
            reason: format!("unknown placeholder(s): {}", unknown.join(", ")),
        })
    }
}

/// Substitute every placeholder in `template`.
///
/// Returns the unknown keys, in order of appearance, if any placeholder has
/// no value.
pub fn expand(
    template: &str,
    vars: &BTreeMap<&'static str, String>,
) -> std::result::Result<String, Vec<String>> {
    let mut unknown = Vec::new();
    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        let key = &caps[1];
        match vars.get(key) {
            Some(value) => value.clone(),
            None => {
                if !unknown.iter().any(|k| k == key) {
                    unknown.push(key.to_string());
                }
                String::new()
            }
        }
    });
    let rendered = rendered.into_owned();
    if unknown.is_empty() {
        Ok(rendered)
    } else {
        Err(unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn domain_context(ips: Vec<IpAddr>) -> SiteContext {
        let domain = Domain::new("example.com", NormalizedPath::new("/srv"));
        SiteContext::for_domain(&domain, vec!["example.net".into()], ips)
    }

    #[test]
    fn expands_known_placeholders() {
        let mut vars = BTreeMap::new();
        vars.insert("domain", "example.com".to_string());
        assert_eq!(
            expand("ServerName {{domain}} # {{  domain  }}", &vars).unwrap(),
            "ServerName example.com # example.com"
        );
    }

    #[test]
    fn reports_unknown_placeholders_once() {
        let vars = BTreeMap::new();
        assert_eq!(
            expand("{{ nope }} {{ other }} {{ nope }}", &vars).unwrap_err(),
            vec!["nope".to_string(), "other".to_string()]
        );
    }

    #[test]
    fn domain_variables_cover_every_key() {
        let vars = domain_context(vec!["10.0.0.1".parse().unwrap()]).variables();

        assert_eq!(vars["domain"], "example.com");
        assert_eq!(vars["aliases"], "www.example.com example.net www.example.net");
        assert_eq!(vars["ip"], "10.0.0.1");
        assert_eq!(vars["directory"], "/srv/example.com");
        assert_eq!(vars["htdocs"], "/srv/example.com/public/htdocs");
        assert_eq!(vars["prefix"], "/srv");
    }

    #[test]
    fn ipv6_address_is_bracketed() {
        let vars = domain_context(vec!["2001:db8::1".parse().unwrap()]).variables();
        assert_eq!(vars["ip"], "[2001:db8::1]");
    }

    #[test]
    fn shared_address_is_wildcard() {
        let vars = domain_context(Vec::new()).variables();
        assert_eq!(vars["ip"], "*");
    }

    #[test]
    fn builtin_domain_template_renders() {
        let temp = TempDir::new().unwrap();
        let renderer = TemplateRenderer::new(NormalizedPath::new(temp.path()));

        let text = renderer.render(&domain_context(Vec::new())).unwrap();

        assert!(text.contains("<VirtualHost *:80>"));
        assert!(text.contains("ServerName example.com"));
        assert!(text.contains("DocumentRoot /srv/example.com/public/htdocs"));
    }

    #[test]
    fn mass_hosting_rejects_domain_placeholders() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("zz-mass-hosting.template"),
            "ServerName {{ domain }}\n",
        )
        .unwrap();
        let renderer = TemplateRenderer::new(NormalizedPath::new(temp.path()));
        let site = SiteContext::mass_hosting(SiteId::MassHosting, NormalizedPath::new("/srv"));

        let err = renderer.render(&site).unwrap_err();

        assert!(matches!(err, Error::RenderFailed { .. }));
        assert!(err.to_string().contains("domain"));
    }

    #[test]
    fn template_file_overrides_builtin() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("non_ssl.template"),
            "# {{ domain }} at {{ ip }}\n",
        )
        .unwrap();
        let renderer = TemplateRenderer::new(NormalizedPath::new(temp.path()));

        let text = renderer.render(&domain_context(Vec::new())).unwrap();

        assert_eq!(text, "# example.com at *\n");
    }
}
