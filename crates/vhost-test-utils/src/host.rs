//! [`TestHost`] builder for hosting scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary hosting root laid out like a real server:
///
/// ```text
/// <root>/srv/                              domains
/// <root>/etc/apache2/sites-available/
/// <root>/etc/apache2/sites-enabled/
/// <root>/etc/symbiosis/apache.d/           templates, mass-hosting toggle
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use vhost_test_utils::TestHost;
///
/// let host = TestHost::new();
/// host.add_domain("example.com");
/// host.add_htdocs("example.com");
/// host.disable_mass_hosting();
/// host.assert_not_enabled("example.com.conf");
/// ```
///
/// Every method panics on filesystem failure.
pub struct TestHost {
    temp_dir: TempDir,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    pub fn new() -> Self {
        let host = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        for dir in [
            host.prefix(),
            host.sites_available(),
            host.sites_enabled(),
            host.template_dir(),
        ] {
            fs::create_dir_all(&dir)
                .unwrap_or_else(|e| panic!("TestHost::new: cannot create {}: {e}", dir.display()));
        }
        host
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn prefix(&self) -> PathBuf {
        self.root().join("srv")
    }

    pub fn sites_available(&self) -> PathBuf {
        self.root().join("etc/apache2/sites-available")
    }

    pub fn sites_enabled(&self) -> PathBuf {
        self.root().join("etc/apache2/sites-enabled")
    }

    pub fn template_dir(&self) -> PathBuf {
        self.root().join("etc/symbiosis/apache.d")
    }

    pub fn domain_dir(&self, name: &str) -> PathBuf {
        self.prefix().join(name)
    }

    /// Create `srv/<name>/config`.
    pub fn add_domain(&self, name: &str) -> PathBuf {
        let dir = self.domain_dir(name);
        fs::create_dir_all(dir.join("config")).unwrap();
        dir
    }

    /// Create `srv/<name>/public/htdocs`.
    pub fn add_htdocs(&self, name: &str) {
        fs::create_dir_all(self.domain_dir(name).join("public/htdocs")).unwrap();
    }

    /// Symlink `srv/<alias>` to the absolute path of `srv/<target>`.
    pub fn add_alias(&self, alias: &str, target: &str) {
        symlink(&self.domain_dir(target), &self.domain_dir(alias));
    }

    pub fn remove_domain(&self, name: &str) {
        fs::remove_dir_all(self.domain_dir(name)).unwrap();
    }

    /// Write `srv/<name>/config/<key>` with `value` verbatim.
    pub fn set_attribute(&self, name: &str, key: &str, value: &str) {
        let config = self.domain_dir(name).join("config");
        fs::create_dir_all(&config).unwrap();
        fs::write(config.join(key), value).unwrap();
    }

    pub fn read_attribute(&self, name: &str, key: &str) -> String {
        fs::read_to_string(self.domain_dir(name).join("config").join(key)).unwrap()
    }

    pub fn mass_hosting_toggle(&self) -> PathBuf {
        self.template_dir().join("disabled.zz-mass-hosting")
    }

    pub fn disable_mass_hosting(&self) {
        fs::write(self.mass_hosting_toggle(), "").unwrap();
    }

    pub fn enable_mass_hosting(&self) {
        let toggle = self.mass_hosting_toggle();
        if toggle.exists() {
            fs::remove_file(toggle).unwrap();
        }
    }

    /// Write `<template_dir>/<name>.template`.
    pub fn write_template(&self, name: &str, content: &str) {
        fs::write(self.template_dir().join(format!("{name}.template")), content).unwrap();
    }

    /// Write the settings file read by `HostConfig::load`.
    pub fn write_settings(&self, toml: &str) {
        let path = self.root().join("etc/symbiosis/vhost.toml");
        fs::write(path, toml).unwrap();
    }

    pub fn available(&self, file: &str) -> PathBuf {
        self.sites_available().join(file)
    }

    pub fn enabled(&self, file: &str) -> PathBuf {
        self.sites_enabled().join(file)
    }

    /// Write a hand-made site into `sites-available` and link it from
    /// `sites-enabled`, the way an operator would.
    pub fn add_unmanaged_site(&self, file: &str, content: &str) {
        fs::write(self.available(file), content).unwrap();
        symlink(&self.available(file), &self.enabled(file));
    }

    /// Sorted entry names of `sites-enabled`.
    pub fn enabled_names(&self) -> Vec<String> {
        names(&self.sites_enabled())
    }

    /// Sorted entry names of `sites-available`.
    pub fn available_names(&self) -> Vec<String> {
        names(&self.sites_available())
    }

    /// True if the entry exists, dangling symlinks included.
    pub fn is_present(path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    pub fn assert_enabled(&self, file: &str) {
        let path = self.enabled(file);
        assert!(
            Self::is_present(&path),
            "expected {file} in sites-enabled, found {:?}",
            self.enabled_names()
        );
    }

    pub fn assert_not_enabled(&self, file: &str) {
        let path = self.enabled(file);
        assert!(
            !Self::is_present(&path),
            "expected no {file} in sites-enabled, found {:?}",
            self.enabled_names()
        );
    }

    pub fn assert_available(&self, file: &str) {
        assert!(
            Self::is_present(&self.available(file)),
            "expected {file} in sites-available, found {:?}",
            self.available_names()
        );
    }

    pub fn assert_not_available(&self, file: &str) {
        assert!(
            !Self::is_present(&self.available(file)),
            "expected no {file} in sites-available, found {:?}",
            self.available_names()
        );
    }
}

fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) {
    std::os::unix::fs::symlink(target, link).unwrap_or_else(|e| {
        panic!(
            "TestHost: cannot link {} -> {}: {e}",
            link.display(),
            target.display()
        )
    });
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) {
    let created = if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    };
    created.unwrap_or_else(|e| panic!("TestHost: cannot link {}: {e}", link.display()));
}
