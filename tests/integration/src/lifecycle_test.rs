//! Domain lifecycle across the store, the resolver and the reconciler

use pretty_assertions::assert_eq;
use vhost_core::reconcile::{NoopReloader, ReconcileOptions, Reconciler};
use vhost_core::{Domain, DomainResolver, HostConfig, Quota};
use vhost_test_utils::TestHost;

#[test]
fn test_domain_lifecycle() {
    let host = TestHost::new();
    host.disable_mass_hosting();
    let config = HostConfig::load(host.root()).unwrap();
    let resolver = DomainResolver::new(config.prefix.clone());
    let reconciler = Reconciler::new(config.clone()).with_reloader(NoopReloader);

    // Create and publish
    let domain = Domain::create(&config.prefix, Some("example.com")).unwrap();
    domain.create_htdocs().unwrap();
    domain.set_ftp_quota("250M").unwrap();
    assert_eq!(domain.ftp_quota().unwrap(), Quota::Limited(250_000_000));

    // Resolve
    let found = resolver.find("www.example.com").unwrap();
    assert_eq!(found.name(), "example.com");

    // Serve
    let report = reconciler.run(&ReconcileOptions::sweep()).unwrap();
    assert!(report.success());
    host.assert_enabled("example.com.conf");

    // Retire
    domain.destroy().unwrap();
    assert!(resolver.find("www.example.com").is_none());
    reconciler.run(&ReconcileOptions::sweep()).unwrap();
    host.assert_not_enabled("example.com.conf");
    host.assert_not_available("example.com.conf");
}

#[test]
fn test_random_domains_are_distinct() {
    let host = TestHost::new();
    let config = HostConfig::for_root(host.root());

    let names: std::collections::BTreeSet<String> = (0..20)
        .map(|_| Domain::create(&config.prefix, None).unwrap().name().to_string())
        .collect();

    assert_eq!(names.len(), 20);
    assert_eq!(DomainResolver::new(config.prefix).enumerate().len(), 20);
}
