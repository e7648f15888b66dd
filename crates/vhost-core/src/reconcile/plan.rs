//! Which sites should exist, and which sites a run may touch

use std::collections::{BTreeMap, BTreeSet};

use super::render::SiteContext;
use super::report::SiteNote;
use super::site::{MASS_HOSTING, MASS_HOSTING_SSL, SiteId};
use crate::Result;
use crate::config::{ExplicitPolicy, HostConfig};
use crate::domain::Domain;
use crate::hostname;
use crate::resolver::DomainIndex;

/// A site that should be generated and enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredSite {
    pub context: SiteContext,
    /// Named on the command line; re-enables a site disabled by hand
    pub explicit: bool,
}

/// Sites a run is allowed to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Everything desired plus everything managed
    Sweep,
    /// Only these sites
    Targets(BTreeSet<SiteId>),
}

#[derive(Debug, Clone)]
pub struct Plan {
    pub scope: Scope,
    pub desired: BTreeMap<SiteId, DesiredSite>,
    pub skipped: Vec<SiteNote>,
    pub errors: Vec<SiteNote>,
}

impl Plan {
    /// Desired state for a full sweep.
    pub fn sweep(config: &HostConfig, index: &DomainIndex) -> Self {
        let mut plan = Self::empty(Scope::Sweep);
        let mass_hosting = config.mass_hosting_enabled();

        if mass_hosting {
            plan.want_mass_hosting(config, SiteId::MassHosting, false);
            plan.want_mass_hosting(config, SiteId::MassHostingSsl, false);
        } else {
            tracing::debug!("mass hosting is disabled");
        }

        let mut primaries = index.primaries();
        primaries.sort_by(|a, b| a.name().cmp(b.name()));
        for domain in primaries {
            if hostname::is_reserved(domain.name()) {
                plan.skip(domain.name(), "name is reserved for mass hosting");
                continue;
            }
            plan.consider_domain(config, index, &domain, mass_hosting, false);
        }
        plan
    }

    /// Desired state restricted to explicitly named sites.
    pub fn targets(config: &HostConfig, index: &DomainIndex, targets: &[String]) -> Self {
        let mut scope = BTreeSet::new();
        let mut plan = Self::empty(Scope::Sweep);
        let mass_hosting = config.mass_hosting_enabled();

        for target in targets {
            let target = target.trim();
            let mass_sites = match target {
                MASS_HOSTING => vec![SiteId::MassHosting, SiteId::MassHostingSsl],
                MASS_HOSTING_SSL => vec![SiteId::MassHostingSsl],
                _ => Vec::new(),
            };
            if !mass_sites.is_empty() {
                for site in mass_sites {
                    scope.insert(site.clone());
                    if mass_hosting {
                        plan.want_mass_hosting(config, site, true);
                    } else {
                        plan.skip(site.stem(), "mass hosting is disabled");
                    }
                }
                continue;
            }

            let Some(name) = hostname::normalize_hostname(target) else {
                plan.errors
                    .push(SiteNote::new(target, "not a valid domain name"));
                continue;
            };
            match index.get(&name) {
                Some(found) => {
                    let primary = Domain::new(found.primary_name(), index.root().clone());
                    scope.insert(SiteId::Domain(primary.name().to_string()));
                    plan.consider_domain(config, index, &primary, mass_hosting, true);
                }
                None => {
                    scope.insert(SiteId::Domain(name.clone()));
                    plan.skip(&name, "no such domain");
                }
            }
        }

        plan.scope = Scope::Targets(scope);
        plan
    }

    fn empty(scope: Scope) -> Self {
        Self {
            scope,
            desired: BTreeMap::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn skip(&mut self, site: &str, reason: &str) {
        tracing::debug!(site, reason, "site not desired");
        self.skipped.push(SiteNote::new(site, reason));
    }

    fn want_mass_hosting(&mut self, config: &HostConfig, site: SiteId, explicit: bool) {
        let context = SiteContext::mass_hosting(site.clone(), config.prefix.clone());
        self.desired.insert(site, DesiredSite { context, explicit });
    }

    fn consider_domain(
        &mut self,
        config: &HostConfig,
        index: &DomainIndex,
        domain: &Domain,
        mass_hosting: bool,
        explicit: bool,
    ) {
        match domain_site(config, index, domain, mass_hosting, explicit) {
            Ok(Ok(desired)) => {
                self.desired
                    .insert(SiteId::Domain(domain.name().to_string()), desired);
            }
            Ok(Err(reason)) => self.skip(domain.name(), reason),
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "cannot read domain");
                self.errors.push(SiteNote::new(domain.name(), e.to_string()));
            }
        }
    }
}

/// The desired site for a primary domain, or the reason it has none.
fn domain_site(
    config: &HostConfig,
    index: &DomainIndex,
    domain: &Domain,
    mass_hosting: bool,
    explicit: bool,
) -> Result<std::result::Result<DesiredSite, &'static str>> {
    if domain.is_disabled()? {
        return Ok(Err("disabled"));
    }
    if !domain.has_htdocs() {
        return Ok(Err("no document root"));
    }
    let ips = domain.ips()?;
    let covered = mass_hosting
        && ips.is_empty()
        && (!explicit || config.explicit_policy == ExplicitPolicy::Exclusive);
    if covered {
        return Ok(Err("served by mass hosting"));
    }

    let context = SiteContext::for_domain(domain, index.aliases_of(domain.name()), ips);
    Ok(Ok(DesiredSite { context, explicit }))
}
