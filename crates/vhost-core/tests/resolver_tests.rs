//! Tests for hostname resolution

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use vhost_core::DomainResolver;
use vhost_core::hostname::random_label;
use vhost_fs::NormalizedPath;
use vhost_test_utils::TestHost;

fn resolver(host: &TestHost) -> DomainResolver {
    DomainResolver::new(NormalizedPath::new(host.prefix()))
}

fn names(resolver: &DomainResolver) -> Vec<String> {
    let mut names: Vec<String> = resolver
        .enumerate()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_enumerate_returns_created_set() {
    let host = TestHost::new();
    for name in ["a.example", "b.example", "c.example"] {
        host.add_domain(name);
    }
    // Not domains
    std::fs::write(host.prefix().join("README"), "").unwrap();
    std::fs::create_dir(host.prefix().join("Not_A_Domain")).unwrap();

    assert_eq!(names(&resolver(&host)), ["a.example", "b.example", "c.example"]);
}

#[test]
fn test_missing_root_is_empty() {
    let host = TestHost::new();
    let resolver = DomainResolver::new(NormalizedPath::new(host.root()).join("nowhere"));

    assert!(resolver.enumerate().is_empty());
    assert!(resolver.find("example.com").is_none());
}

#[rstest]
#[case("does-not-exist.org")]
#[case(".")]
#[case("")]
#[case("$(/bin/ls)")]
#[case("`/bin/ls`")]
#[case("example.com/../../etc")]
fn test_find_rejects_or_misses(#[case] hostname: &str) {
    let host = TestHost::new();
    host.add_domain("example.com");

    assert!(resolver(&host).find(hostname).is_none());
}

#[rstest]
#[case("example.com")]
#[case("www.example.com")]
#[case("www.www.www.example.com")]
#[case("EXAMPLE.com.")]
#[case("  example.com  ")]
fn test_find_strips_www(#[case] hostname: &str) {
    let host = TestHost::new();
    host.add_domain("example.com");

    let found = resolver(&host).find(hostname).unwrap();

    assert_eq!(found.name(), "example.com");
    assert!(!found.is_alias());
}

#[test]
fn test_real_www_domain_wins() {
    let host = TestHost::new();
    host.add_domain("example.com");
    host.add_domain("www.example.com");

    let resolver = resolver(&host);

    assert_eq!(resolver.find("www.example.com").unwrap().name(), "www.example.com");
    assert_eq!(resolver.find("www.www.example.com").unwrap().name(), "www.example.com");
    assert_eq!(resolver.find("example.com").unwrap().name(), "example.com");
}

#[test]
fn test_random_prefixes_resolve_to_longest_suffix() {
    let host = TestHost::new();
    host.add_domain("example.com");
    host.add_domain("www.example.com");

    let prefix: Vec<String> = (0..10).map(|_| random_label(8)).collect();
    let hostname = format!("{}.www.example.com", prefix.join("."));

    assert_eq!(resolver(&host).find(&hostname).unwrap().name(), "www.example.com");
}

#[test]
fn test_prefix_walk_reaches_www_stripping() {
    let host = TestHost::new();
    host.add_domain("example.com");

    let found = resolver(&host).find("cdn.www.example.com").unwrap();

    assert_eq!(found.name(), "example.com");
}

#[cfg(unix)]
#[test]
fn test_alias_is_found_by_its_own_name() {
    let host = TestHost::new();
    host.add_domain("example.com");
    let resolver = resolver(&host);
    let before = resolver.enumerate().len();

    host.add_alias("example.net", "example.com");

    let found = resolver.find("www.example.net").unwrap();
    assert_eq!(found.name(), "example.net");
    assert_eq!(found.primary_name(), "example.com");
    assert!(found.is_alias());
    assert!(found.aliases().unwrap().contains("example.com"));
    assert_eq!(resolver.enumerate().len(), before + 1);
}

#[cfg(unix)]
#[test]
fn test_dangling_and_foreign_links_are_ignored() {
    let host = TestHost::new();
    let outside = host.root().join("outside");
    std::fs::create_dir(&outside).unwrap();
    std::os::unix::fs::symlink(&outside, host.prefix().join("outside.example")).unwrap();
    std::os::unix::fs::symlink(host.prefix().join("gone.example"), host.prefix().join("dangling.example"))
        .unwrap();

    let resolver = resolver(&host);

    assert!(resolver.enumerate().is_empty());
    assert!(resolver.find("outside.example").is_none());
    assert!(resolver.find("dangling.example").is_none());
}

#[test]
fn test_lookup_is_exact() {
    let host = TestHost::new();
    host.add_domain("example.com");
    let resolver = resolver(&host);

    assert!(resolver.lookup("example.com").is_some());
    assert!(resolver.lookup("www.example.com").is_none());
    assert!(resolver.lookup("a.example.com").is_none());
}

#[test]
fn test_primaries_exclude_aliases() {
    let host = TestHost::new();
    host.add_domain("example.com");
    #[cfg(unix)]
    host.add_alias("example.net", "example.com");

    let primaries = resolver(&host).primaries();

    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0].name(), "example.com");
}

fn label() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9-]{0,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_any_subdomain_finds_its_domain(labels in prop::collection::vec(label(), 0..6)) {
        let host = TestHost::new();
        host.add_domain("example.com");

        let hostname = labels
            .iter()
            .map(String::as_str)
            .chain(["example", "com"])
            .collect::<Vec<_>>()
            .join(".");

        let found = resolver(&host).find(&hostname);
        prop_assert_eq!(found.map(|d| d.name().to_string()), Some("example.com".to_string()));
    }

    #[test]
    fn prop_find_never_panics(input in "\\PC{0,80}") {
        let host = TestHost::new();
        host.add_domain("example.com");
        let _ = resolver(&host).find(&input);
    }
}
