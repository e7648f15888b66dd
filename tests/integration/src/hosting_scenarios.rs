//! Web-server configuration scenarios
//!
//! Each test walks through an operator story end to end against a throwaway
//! hosting root: domains are created on disk, the reconciler runs, and the
//! site directories are checked the way Apache would see them.

use pretty_assertions::assert_eq;
use std::fs;
use vhost_core::reconcile::{NoopReloader, ReconcileOptions, ReconcileReport, Reconciler};
use vhost_core::{Domain, HostConfig};
use vhost_fs::NormalizedPath;
use vhost_test_utils::TestHost;

const MASS: &str = "zz-mass-hosting.conf";
const MASS_SSL: &str = "zz-mass-hosting.ssl.conf";

fn configure(host: &TestHost, targets: &[&str]) -> ReconcileReport {
    let report = Reconciler::new(HostConfig::load(host.root()).unwrap())
        .with_reloader(NoopReloader)
        .run(&ReconcileOptions::targets(targets.iter().copied()))
        .unwrap();
    assert!(report.success(), "errors: {:?}", report.errors);
    report
}

fn new_domain(host: &TestHost, name: &str) -> Domain {
    let domain = Domain::create(&NormalizedPath::new(host.prefix()), Some(name)).unwrap();
    domain.create_htdocs().unwrap();
    domain
}

#[test]
fn scenario_mass_hosting_toggle() {
    let host = TestHost::new();
    new_domain(&host, "example.com");

    configure(&host, &[]);
    assert_eq!(host.enabled_names(), [MASS, MASS_SSL]);

    host.disable_mass_hosting();
    configure(&host, &[]);
    assert_eq!(host.enabled_names(), ["example.com.conf"]);
    assert_eq!(host.available_names(), ["example.com.conf"]);

    host.enable_mass_hosting();
    configure(&host, &[]);
    assert_eq!(host.enabled_names(), [MASS, MASS_SSL]);
    assert_eq!(host.available_names(), [MASS, MASS_SSL]);
}

#[test]
fn scenario_dedicated_ip_alongside_mass_hosting() {
    let host = TestHost::new();
    let domain = new_domain(&host, "example.com");
    domain.set_attribute("ip", "192.0.2.10\n").unwrap();

    configure(&host, &[]);

    assert_eq!(host.enabled_names(), ["example.com.conf", MASS, MASS_SSL]);
}

#[cfg(unix)]
#[test]
fn scenario_site_pruning_spares_operator_files() {
    let host = TestHost::new();
    let domain = new_domain(&host, "example.com");
    domain.set_attribute("ip", "192.0.2.10\n").unwrap();
    fs::write(host.enabled("default"), "").unwrap();
    host.add_unmanaged_site("other-domain.test.conf", "<VirtualHost *:80>\n</VirtualHost>\n");

    configure(&host, &[]);
    host.assert_enabled("example.com.conf");

    domain.destroy().unwrap();
    let report = configure(&host, &[]);

    assert_eq!(
        host.enabled_names(),
        ["default", "other-domain.test.conf", MASS, MASS_SSL]
    );
    assert_eq!(report.actions.len(), 2);
}

#[test]
fn scenario_unpublished_domain_without_mass_hosting() {
    let host = TestHost::new();
    host.disable_mass_hosting();
    Domain::create(&NormalizedPath::new(host.prefix()), Some("example.com")).unwrap();

    let report = configure(&host, &[]);

    assert!(report.is_clean());
    assert!(host.enabled_names().is_empty());
}

#[test]
fn scenario_domains_on_command_line() {
    let host = TestHost::new();
    host.disable_mass_hosting();
    new_domain(&host, "one.example");
    new_domain(&host, "two.example");

    configure(&host, &["one.example"]);
    assert_eq!(host.enabled_names(), ["one.example.conf"]);

    configure(&host, &["two.example"]);
    assert_eq!(host.enabled_names(), ["one.example.conf", "two.example.conf"]);
}

#[test]
fn scenario_manual_disable_survives_sweeps() {
    let host = TestHost::new();
    let domain = new_domain(&host, "example.com");
    domain.set_attribute("ip", "192.0.2.10\n").unwrap();
    configure(&host, &[]);

    fs::remove_file(host.enabled("example.com.conf")).unwrap();
    fs::remove_file(host.enabled(MASS)).unwrap();
    configure(&host, &[]);
    host.assert_not_enabled("example.com.conf");
    host.assert_not_enabled(MASS);
    host.assert_available("example.com.conf");
    host.assert_available(MASS);

    configure(&host, &["example.com"]);
    host.assert_enabled("example.com.conf");
    host.assert_not_enabled(MASS);

    configure(&host, &["zz-mass-hosting"]);
    host.assert_enabled(MASS);

    let report = configure(&host, &[]);
    assert_eq!(report.mutations(), 0);
}

#[test]
fn scenario_report_serializes() {
    let host = TestHost::new();

    let report = configure(&host, &[]);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["actions"].as_array().unwrap().len(), 4);
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
    assert_eq!(json["aborted"], false);
}
