//! Tests for settings resolution
//!
//! These tests verify:
//! - Environment defaults and explicit override precedence
//! - Platform-dependent required fields
//! - Unknown-value checks and diagnostic accumulation

use super::*;

/// Helper for a complete cloud environment
fn cloud_env() -> EnvironmentDefaults {
    EnvironmentDefaults {
        instance: Some("https://acme.densify.com:8443".to_string()),
        username: Some("svc-terraform".to_string()),
        password: Some("s3cret".to_string()),
        tech_platform: Some("aws".to_string()),
        account_number: Some("123456789012".to_string()),
        system_name: Some("checkout-web-01".to_string()),
        ..Default::default()
    }
}

/// Helper for a complete kubernetes environment
fn k8s_env() -> EnvironmentDefaults {
    EnvironmentDefaults {
        instance: Some("https://acme.densify.com:8443".to_string()),
        username: Some("svc-terraform".to_string()),
        password: Some("s3cret".to_string()),
        tech_platform: Some("kubernetes".to_string()),
        cluster: Some("prod-east".to_string()),
        namespace: Some("shop".to_string()),
        controller_type: Some("deployment".to_string()),
        pod_name: Some("checkout".to_string()),
        ..Default::default()
    }
}

fn known(value: &str) -> ConfigValue<String> {
    ConfigValue::Known(value.to_string())
}

mod precedence_tests {
    use super::*;

    #[test]
    fn test_environment_only() {
        let settings = resolve(&ProviderConfig::default(), &cloud_env()).unwrap();

        assert_eq!(settings.instance(), "https://acme.densify.com:8443");
        assert_eq!(settings.username(), "svc-terraform");
        assert_eq!(settings.account_number(), "123456789012");
        assert_eq!(settings.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert!(!settings.continue_if_error());
    }

    #[test]
    fn test_explicit_value_wins() {
        let config = ProviderConfig {
            username: known("explicit-user"),
            system_name: known("explicit-system"),
            api_timeout: ConfigValue::Known(120),
            continue_if_error: ConfigValue::Known(true),
            ..Default::default()
        };

        let settings = resolve(&config, &cloud_env()).unwrap();

        assert_eq!(settings.username(), "explicit-user");
        assert_eq!(settings.system_name(), "explicit-system");
        assert_eq!(settings.timeout_secs(), 120);
        assert!(settings.continue_if_error());
        // untouched values still come from the environment
        assert_eq!(settings.password(), "s3cret");
    }

    #[test]
    fn test_null_never_clobbers_environment() {
        let config = ProviderConfig {
            username: ConfigValue::Null,
            password: ConfigValue::Null,
            ..Default::default()
        };

        let merged = SettingsBuilder::from_env(&cloud_env()).apply_overrides(&config);
        assert_eq!(merged.username, "svc-terraform");
        assert_eq!(merged.password, "s3cret");
    }

    #[test]
    fn test_explicit_empty_string_clears_environment() {
        let config = ProviderConfig {
            system_name: known(""),
            ..Default::default()
        };

        let diags = resolve(&config, &cloud_env()).unwrap_err();
        assert_eq!(diags.paths(), vec!["system_name"]);
    }

    #[test]
    fn test_explicit_false_overrides_environment_true() {
        let mut env = cloud_env();
        env.continue_if_error = Some("TRUE".to_string());

        let settings = resolve(&ProviderConfig::default(), &env).unwrap();
        assert!(settings.continue_if_error());

        let config = ProviderConfig {
            continue_if_error: ConfigValue::Known(false),
            ..Default::default()
        };
        let settings = resolve(&config, &env).unwrap();
        assert!(!settings.continue_if_error());
    }

    #[test]
    fn test_environment_timeout_fails_open() {
        let mut env = cloud_env();
        env.api_timeout = Some("301".to_string());
        let settings = resolve(&ProviderConfig::default(), &env).unwrap();
        assert_eq!(settings.timeout_secs(), DEFAULT_TIMEOUT_SECS);

        env.api_timeout = Some("300".to_string());
        let settings = resolve(&ProviderConfig::default(), &env).unwrap();
        assert_eq!(settings.timeout_secs(), 300);
    }

    #[test]
    fn test_explicit_timeout_taken_verbatim() {
        let config = ProviderConfig {
            api_timeout: ConfigValue::Known(600),
            ..Default::default()
        };

        let settings = resolve(&config, &cloud_env()).unwrap();
        assert_eq!(settings.timeout_secs(), 600);
        assert_eq!(settings.timeout(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_non_positive_explicit_timeout_disables_timeout() {
        for secs in [0, -5] {
            let config = ProviderConfig {
                api_timeout: ConfigValue::Known(secs),
                ..Default::default()
            };

            let settings = resolve(&config, &cloud_env()).unwrap();
            assert_eq!(settings.timeout_secs(), secs);
            assert_eq!(settings.timeout(), None, "secs = {}", secs);
        }
    }

    #[test]
    fn test_fallbacks_are_configuration_only() {
        let config = ProviderConfig {
            fallback_cpu_req: known("250m"),
            fallback_cpu_lim: known("1"),
            fallback_mem_req: known("256Mi"),
            fallback_mem_lim: known("512Mi"),
            ..Default::default()
        };

        let settings = resolve(&config, &k8s_env()).unwrap();
        assert_eq!(
            settings.fallback(),
            &FallbackResources {
                cpu_request: "250m".to_string(),
                cpu_limit: "1".to_string(),
                memory_request: "256Mi".to_string(),
                memory_limit: "512Mi".to_string(),
            }
        );

        let settings = resolve(&ProviderConfig::default(), &k8s_env()).unwrap();
        assert_eq!(settings.fallback(), &FallbackResources::default());
    }
}

mod required_field_tests {
    use super::*;

    #[test]
    fn test_everything_missing_reports_every_rule() {
        let diags =
            resolve(&ProviderConfig::default(), &EnvironmentDefaults::default()).unwrap_err();

        assert_eq!(
            diags.paths(),
            vec![
                "densify_instance",
                "username",
                "password",
                "tech_platform",
                "account_number",
                "system_name",
            ]
        );
        assert!(diags.iter().all(|d| d.is_error()));
    }

    #[test]
    fn test_kubernetes_aliases_require_kubernetes_identity() {
        for alias in ["k8s", "K8S", "kubernetes", "Kubernetes"] {
            let env = EnvironmentDefaults {
                tech_platform: Some(alias.to_string()),
                // cloud identity present but irrelevant
                account_name: Some("acct".to_string()),
                system_name: Some("sys".to_string()),
                ..k8s_env()
            };
            let env = EnvironmentDefaults {
                cluster: None,
                namespace: None,
                controller_type: None,
                pod_name: None,
                ..env
            };

            let diags = resolve(&ProviderConfig::default(), &env).unwrap_err();
            assert_eq!(
                diags.paths(),
                vec!["cluster", "namespace", "controller_type", "pod_name"],
                "alias = {}",
                alias
            );
        }
    }

    #[test]
    fn test_kubernetes_mode_ignores_cloud_identity() {
        let settings = resolve(&ProviderConfig::default(), &k8s_env()).unwrap();
        assert!(settings.is_kubernetes());
        assert!(settings.account_name().is_empty());
        assert!(settings.system_name().is_empty());
    }

    #[test]
    fn test_cloud_mode_ignores_kubernetes_identity() {
        for platform in ["aws", "azure", "gcp", "something-else"] {
            let env = EnvironmentDefaults {
                tech_platform: Some(platform.to_string()),
                ..cloud_env()
            };
            let settings = resolve(&ProviderConfig::default(), &env).unwrap();
            assert!(!settings.is_kubernetes());
            assert!(settings.cluster().is_empty());
        }
    }

    #[test]
    fn test_account_name_or_number_suffices() {
        let mut env = cloud_env();
        env.account_number = None;
        env.account_name = Some("prod-account".to_string());
        assert!(resolve(&ProviderConfig::default(), &env).is_ok());

        env.account_name = None;
        let diags = resolve(&ProviderConfig::default(), &env).unwrap_err();
        assert_eq!(diags.paths(), vec!["account_number"]);
        assert!(diags.iter().next().unwrap().detail.contains("DENSIFY_ACCOUNT_NUMBER"));
    }

    #[test]
    fn test_remediation_names_attribute_and_variable() {
        let mut env = k8s_env();
        env.namespace = None;

        let diags = resolve(&ProviderConfig::default(), &env).unwrap_err();
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "Missing Kubernetes Namespace");
        assert!(diag.detail.contains("namespace value"));
        assert!(diag.detail.contains("DENSIFY_NAMESPACE"));
    }
}

mod unknown_value_tests {
    use super::*;

    #[test]
    fn test_unknown_common_attributes_flagged() {
        let config = ProviderConfig {
            densify_instance: ConfigValue::Unknown,
            password: ConfigValue::Unknown,
            ..Default::default()
        };

        let diags = check_unknown_values(&config, &cloud_env());
        assert_eq!(diags.paths(), vec!["densify_instance", "password"]);
        assert_eq!(diags.iter().next().unwrap().summary, "Unknown Densify API Instance");
    }

    #[test]
    fn test_unknown_irrelevant_group_skipped() {
        let config = ProviderConfig {
            tech_platform: known("k8s"),
            account_name: ConfigValue::Unknown,
            system_name: ConfigValue::Unknown,
            cluster: ConfigValue::Unknown,
            ..Default::default()
        };

        let diags = check_unknown_values(&config, &EnvironmentDefaults::default());
        assert_eq!(diags.paths(), vec!["cluster"]);
    }

    #[test]
    fn test_unknown_platform_taken_from_environment() {
        let config = ProviderConfig {
            namespace: ConfigValue::Unknown,
            system_name: ConfigValue::Unknown,
            ..Default::default()
        };

        let diags = check_unknown_values(&config, &k8s_env());
        assert_eq!(diags.paths(), vec!["namespace"]);

        let diags = check_unknown_values(&config, &cloud_env());
        assert_eq!(diags.paths(), vec!["system_name"]);
    }

    #[test]
    fn test_fallback_without_variable_has_no_env_hint() {
        let config = ProviderConfig {
            tech_platform: known("kubernetes"),
            fallback_mem_lim: ConfigValue::Unknown,
            ..Default::default()
        };

        let diags = check_unknown_values(&config, &EnvironmentDefaults::default());
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.path.as_deref(), Some("fallback_mem_lim"));
        assert!(!diag.detail.contains("environment variable"));
    }

    #[test]
    fn test_both_checks_accumulate() {
        let mut env = cloud_env();
        env.system_name = None;
        let config = ProviderConfig {
            username: ConfigValue::Unknown,
            ..Default::default()
        };

        let diags = resolve(&config, &env).unwrap_err();
        assert_eq!(diags.paths(), vec!["username", "system_name"]);
    }

    #[test]
    fn test_unknown_alone_fails_resolution() {
        let config = ProviderConfig {
            username: ConfigValue::Unknown,
            ..Default::default()
        };

        // the environment still supplies a username, but the deferred value is an error
        let diags = resolve(&config, &cloud_env()).unwrap_err();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.paths(), vec!["username"]);
    }
}
