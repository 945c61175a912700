//! Explicit provider configuration as handed over by the host

use serde::{Deserialize, Deserializer};

/// One explicitly configured attribute
///
/// `Unknown` marks a value the host cannot resolve yet (computed from
/// another resource at plan time). It is never produced by deserialization;
/// hosts that track deferred values construct it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigValue<T> {
    #[default]
    Null,
    Unknown,
    Known(T),
}

impl<T> ConfigValue<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ConfigValue::Unknown)
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            ConfigValue::Known(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for ConfigValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, ConfigValue::Known)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ConfigValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(ConfigValue::from)
    }
}

/// Provider block attributes, each optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub densify_instance: ConfigValue<String>,
    pub username: ConfigValue<String>,
    pub password: ConfigValue<String>,
    pub api_timeout: ConfigValue<i64>,
    pub tech_platform: ConfigValue<String>,

    // cloud
    pub account_number: ConfigValue<String>,
    pub account_name: ConfigValue<String>,
    pub system_name: ConfigValue<String>,
    pub fallback_instance_type: ConfigValue<String>,
    pub continue_if_error: ConfigValue<bool>,

    // kubernetes
    pub cluster: ConfigValue<String>,
    pub namespace: ConfigValue<String>,
    pub controller_type: ConfigValue<String>,
    pub pod_name: ConfigValue<String>,
    pub container_name: ConfigValue<String>,
    pub fallback_cpu_req: ConfigValue<String>,
    pub fallback_cpu_lim: ConfigValue<String>,
    pub fallback_mem_req: ConfigValue<String>,
    pub fallback_mem_lim: ConfigValue<String>,
}
