//! Optional settings file

use serde::{Deserialize, Serialize};

use super::host::{ErrorPolicy, ExplicitPolicy};

/// Contents of the optional settings file. Every field is optional;
/// relative paths are taken relative to the root directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostOverrides {
    pub prefix: Option<String>,
    pub apache_dir: Option<String>,
    pub template_dir: Option<String>,
    pub explicit_policy: Option<ExplicitPolicy>,
    pub error_policy: Option<ErrorPolicy>,
    pub reload_command: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_overrides() {
        let overrides: HostOverrides =
            toml::from_str("prefix = \"hosting\"\nexplicit_policy = \"exclusive\"\n").unwrap();

        assert_eq!(overrides.prefix.as_deref(), Some("hosting"));
        assert_eq!(overrides.explicit_policy, Some(ExplicitPolicy::Exclusive));
        assert_eq!(overrides.error_policy, None);
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<HostOverrides, _> = toml::from_str("prefx = \"typo\"\n");
        assert!(result.is_err());
    }
}
