//! Environment-sourced defaults
//!
//! Every recognized setting has a `DENSIFY_*` variable. Values are kept as
//! raw strings here; interpretation happens in [`SettingsBuilder::from_env`].
//!
//! [`SettingsBuilder::from_env`]: super::SettingsBuilder::from_env

use serde::Deserialize;

/// Prefix shared by all provider environment variables
pub const ENV_PREFIX: &str = "DENSIFY";

/// Timeout used when the environment gives none or an unusable one
pub const DEFAULT_TIMEOUT_SECS: i64 = 45;

/// Accepted timeout range, in seconds
pub const MIN_TIMEOUT_SECS: i64 = 1;
pub const MAX_TIMEOUT_SECS: i64 = 300;

/// Raw `DENSIFY_*` values
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnvironmentDefaults {
    pub instance: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_timeout: Option<String>,
    pub tech_platform: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub system_name: Option<String>,
    pub fallback_instance_type: Option<String>,
    pub continue_if_error: Option<String>,
    pub cluster: Option<String>,
    pub namespace: Option<String>,
    pub controller_type: Option<String>,
    pub pod_name: Option<String>,
    pub container_name: Option<String>,
}

impl EnvironmentDefaults {
    /// Load from the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_source(None)
    }

    /// Load from an explicit variable map instead of the process environment
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_source(Some(map))
    }

    fn from_source(
        source: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(source))
            .build()?;

        config.try_deserialize()
    }
}

/// Out-of-range or unparseable timeout silently reverts to the default.
///
/// This fail-open policy applies to `DENSIFY_API_TIMEOUT` only.
pub fn parse_timeout(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.parse::<i64>().ok())
        .filter(|secs| (MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(secs))
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Only a case-insensitive literal `true` enables the flag
pub fn parse_continue_if_error(raw: Option<&str>) -> bool {
    raw.map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_fallback_values() {
        for raw in ["0", "301", "abc", "", "-5", "12.5"] {
            assert_eq!(parse_timeout(Some(raw)), DEFAULT_TIMEOUT_SECS, "raw = {:?}", raw);
        }
        assert_eq!(parse_timeout(None), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_timeout_bounds_accepted() {
        assert_eq!(parse_timeout(Some("1")), 1);
        assert_eq!(parse_timeout(Some("300")), 300);
        assert_eq!(parse_timeout(Some("120")), 120);
    }

    #[test]
    fn test_continue_if_error_literal() {
        assert!(parse_continue_if_error(Some("true")));
        assert!(parse_continue_if_error(Some("TRUE")));
        assert!(parse_continue_if_error(Some("True")));
        assert!(!parse_continue_if_error(Some("1")));
        assert!(!parse_continue_if_error(Some("yes")));
        assert!(!parse_continue_if_error(Some("")));
        assert!(!parse_continue_if_error(None));
    }

    #[test]
    fn test_from_vars_strips_prefix() {
        let env = EnvironmentDefaults::from_vars([
            ("DENSIFY_INSTANCE", "https://acme.densify.com:8443"),
            ("DENSIFY_API_TIMEOUT", "90"),
            ("DENSIFY_POD_NAME", "checkout"),
            ("OTHER_VAR", "ignored"),
        ])
        .unwrap();

        assert_eq!(env.instance.as_deref(), Some("https://acme.densify.com:8443"));
        assert_eq!(env.api_timeout.as_deref(), Some("90"));
        assert_eq!(env.pod_name.as_deref(), Some("checkout"));
        assert!(env.username.is_none());
    }

    #[test]
    fn test_from_vars_empty() {
        let env = EnvironmentDefaults::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert!(env.instance.is_none());
        assert!(env.continue_if_error.is_none());
    }
}
