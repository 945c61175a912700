//! Provider settings resolution
//!
//! Settings are resolved in a fixed pipeline:
//! environment defaults, then explicit configuration overrides, then
//! validation. Nothing is visible to the caller until validation passes.
//!
//! ```text
//! SettingsBuilder::from_env(env) -> apply_overrides(config) -> validate()
//! ```

mod env;
mod provider_config;
mod validate;

#[cfg(test)]
mod tests;

pub use env::{
    parse_continue_if_error, parse_timeout, EnvironmentDefaults, DEFAULT_TIMEOUT_SECS,
    ENV_PREFIX, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS,
};
pub use provider_config::{ConfigValue, ProviderConfig};
pub use validate::{check_required, check_unknown_values};

use crate::diagnostics::Diagnostics;
use serde::Serialize;
use std::time::Duration;

/// Platform names that select the Kubernetes identity group
pub const KUBERNETES_ALIASES: &[&str] = &["k8s", "kubernetes"];

/// True when `tech_platform` names Kubernetes (case-insensitive)
pub fn is_kubernetes_platform(tech_platform: &str) -> bool {
    KUBERNETES_ALIASES
        .iter()
        .any(|alias| tech_platform.eq_ignore_ascii_case(alias))
}

/// Which identity attributes an attribute belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityGroup {
    /// Needed regardless of platform
    Common,
    Cloud,
    Kubernetes,
}

impl IdentityGroup {
    /// Whether this group matters for the given platform
    pub fn applies_to(self, tech_platform: &str) -> bool {
        match self {
            IdentityGroup::Common => true,
            IdentityGroup::Kubernetes => is_kubernetes_platform(tech_platform),
            IdentityGroup::Cloud => !is_kubernetes_platform(tech_platform),
        }
    }
}

/// Operator-supplied quantities used when there is no live recommendation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FallbackResources {
    pub cpu_request: String,
    pub cpu_limit: String,
    pub memory_request: String,
    pub memory_limit: String,
}

/// Resolved, validated provider settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    instance: String,
    username: String,
    password: String,
    timeout_secs: i64,
    tech_platform: String,
    account_name: String,
    account_number: String,
    system_name: String,
    fallback_instance_type: String,
    continue_if_error: bool,
    cluster: String,
    namespace: String,
    controller_type: String,
    pod_name: String,
    container_name: String,
    fallback: FallbackResources,
}

impl Settings {
    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Request timeout; `None` when the configured value is not positive
    pub fn timeout(&self) -> Option<Duration> {
        u64::try_from(self.timeout_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Timeout as configured, explicit values taken verbatim
    pub fn timeout_secs(&self) -> i64 {
        self.timeout_secs
    }

    pub fn tech_platform(&self) -> &str {
        &self.tech_platform
    }

    pub fn is_kubernetes(&self) -> bool {
        is_kubernetes_platform(&self.tech_platform)
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    pub fn fallback_instance_type(&self) -> &str {
        &self.fallback_instance_type
    }

    pub fn continue_if_error(&self) -> bool {
        self.continue_if_error
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn controller_type(&self) -> &str {
        &self.controller_type
    }

    pub fn pod_name(&self) -> &str {
        &self.pod_name
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    pub fn fallback(&self) -> &FallbackResources {
        &self.fallback
    }
}

/// Settings under construction
///
/// Fields are public so validation and tests can inspect the merged
/// values; only [`SettingsBuilder::validate`] produces a [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsBuilder {
    pub instance: String,
    pub username: String,
    pub password: String,
    /// Seconds; signed because explicit configuration is an integer attribute
    pub timeout_secs: i64,
    pub tech_platform: String,
    pub account_name: String,
    pub account_number: String,
    pub system_name: String,
    pub fallback_instance_type: String,
    pub continue_if_error: bool,
    pub cluster: String,
    pub namespace: String,
    pub controller_type: String,
    pub pod_name: String,
    pub container_name: String,
    pub fallback: FallbackResources,
}

impl SettingsBuilder {
    /// First pass: defaults from the environment
    pub fn from_env(env: &EnvironmentDefaults) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        Self {
            instance: text(&env.instance),
            username: text(&env.username),
            password: text(&env.password),
            timeout_secs: parse_timeout(env.api_timeout.as_deref()),
            tech_platform: text(&env.tech_platform),
            account_name: text(&env.account_name),
            account_number: text(&env.account_number),
            system_name: text(&env.system_name),
            fallback_instance_type: text(&env.fallback_instance_type),
            continue_if_error: parse_continue_if_error(env.continue_if_error.as_deref()),
            cluster: text(&env.cluster),
            namespace: text(&env.namespace),
            controller_type: text(&env.controller_type),
            pod_name: text(&env.pod_name),
            container_name: text(&env.container_name),
            // configuration-only
            fallback: FallbackResources::default(),
        }
    }

    /// Second pass: known explicit values replace the defaults
    pub fn apply_overrides(mut self, config: &ProviderConfig) -> Self {
        fn set<T: Clone>(target: &mut T, value: &ConfigValue<T>) {
            if let Some(v) = value.known() {
                *target = v.clone();
            }
        }

        set(&mut self.instance, &config.densify_instance);
        set(&mut self.username, &config.username);
        set(&mut self.password, &config.password);
        set(&mut self.timeout_secs, &config.api_timeout);
        set(&mut self.tech_platform, &config.tech_platform);
        set(&mut self.account_number, &config.account_number);
        set(&mut self.account_name, &config.account_name);
        set(&mut self.system_name, &config.system_name);
        set(&mut self.fallback_instance_type, &config.fallback_instance_type);
        set(&mut self.continue_if_error, &config.continue_if_error);

        set(&mut self.cluster, &config.cluster);
        set(&mut self.namespace, &config.namespace);
        set(&mut self.controller_type, &config.controller_type);
        set(&mut self.pod_name, &config.pod_name);
        set(&mut self.container_name, &config.container_name);

        set(&mut self.fallback.cpu_request, &config.fallback_cpu_req);
        set(&mut self.fallback.cpu_limit, &config.fallback_cpu_lim);
        set(&mut self.fallback.memory_request, &config.fallback_mem_req);
        set(&mut self.fallback.memory_limit, &config.fallback_mem_lim);

        self
    }

    /// Check required fields and freeze
    pub fn validate(self) -> Result<Settings, Diagnostics> {
        let diags = check_required(&self);
        if diags.has_error() {
            return Err(diags);
        }

        Ok(Settings {
            instance: self.instance,
            username: self.username,
            password: self.password,
            timeout_secs: self.timeout_secs,
            tech_platform: self.tech_platform,
            account_name: self.account_name,
            account_number: self.account_number,
            system_name: self.system_name,
            fallback_instance_type: self.fallback_instance_type,
            continue_if_error: self.continue_if_error,
            cluster: self.cluster,
            namespace: self.namespace,
            controller_type: self.controller_type,
            pod_name: self.pod_name,
            container_name: self.container_name,
            fallback: self.fallback,
        })
    }
}

/// Run the whole resolution pipeline.
///
/// The unknown-value check and the required-field check both run; every
/// diagnostic from either is returned together.
pub fn resolve(
    config: &ProviderConfig,
    env: &EnvironmentDefaults,
) -> Result<Settings, Diagnostics> {
    let mut diags = check_unknown_values(config, env);

    match SettingsBuilder::from_env(env).apply_overrides(config).validate() {
        Ok(settings) if !diags.has_error() => Ok(settings),
        Ok(_) => Err(diags),
        Err(required) => {
            diags.extend(required);
            Err(diags)
        }
    }
}
