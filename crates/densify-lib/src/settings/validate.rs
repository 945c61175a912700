//! Settings validation rules

use super::env::EnvironmentDefaults;
use super::provider_config::ProviderConfig;
use super::IdentityGroup::{self, Cloud, Common, Kubernetes};
use super::{is_kubernetes_platform, SettingsBuilder};
use crate::diagnostics::{Diagnostic, Diagnostics};

/// Static description of one provider attribute
#[derive(Debug, Clone, Copy)]
struct Attribute {
    name: &'static str,
    env_var: Option<&'static str>,
    label: &'static str,
    group: IdentityGroup,
}

const fn attr(
    name: &'static str,
    env_var: Option<&'static str>,
    label: &'static str,
    group: IdentityGroup,
) -> Attribute {
    Attribute { name, env_var, label, group }
}

const INSTANCE: Attribute = attr(
    "densify_instance",
    Some("DENSIFY_INSTANCE"),
    "Densify API Instance",
    Common,
);
const USERNAME: Attribute = attr(
    "username",
    Some("DENSIFY_USERNAME"),
    "Densify API Username",
    Common,
);
const PASSWORD: Attribute = attr(
    "password",
    Some("DENSIFY_PASSWORD"),
    "Densify API Password",
    Common,
);
const API_TIMEOUT: Attribute = attr(
    "api_timeout",
    Some("DENSIFY_API_TIMEOUT"),
    "Densify API Timeout",
    Common,
);
const TECH_PLATFORM: Attribute = attr(
    "tech_platform",
    Some("DENSIFY_TECH_PLATFORM"),
    "Densify API Technology Platform",
    Common,
);
const CONTINUE_IF_ERROR: Attribute = attr(
    "continue_if_error",
    Some("DENSIFY_CONTINUE_IF_ERROR"),
    "Continue If Error Flag",
    Common,
);

const ACCOUNT_NUMBER: Attribute = attr(
    "account_number",
    Some("DENSIFY_ACCOUNT_NUMBER"),
    "Densify API Account Number",
    Cloud,
);
const ACCOUNT_NAME: Attribute = attr(
    "account_name",
    Some("DENSIFY_ACCOUNT_NAME"),
    "Densify API Account Name",
    Cloud,
);
const SYSTEM_NAME: Attribute = attr(
    "system_name",
    Some("DENSIFY_SYSTEM_NAME"),
    "Densify System Name",
    Cloud,
);
const FALLBACK_INSTANCE_TYPE: Attribute = attr(
    "fallback_instance_type",
    Some("DENSIFY_FALLBACK_INSTANCE_TYPE"),
    "Fallback Instance Type",
    Cloud,
);

const CLUSTER: Attribute = attr(
    "cluster",
    Some("DENSIFY_CLUSTER"),
    "Kubernetes Cluster",
    Kubernetes,
);
const NAMESPACE: Attribute = attr(
    "namespace",
    Some("DENSIFY_NAMESPACE"),
    "Kubernetes Namespace",
    Kubernetes,
);
const CONTROLLER_TYPE: Attribute = attr(
    "controller_type",
    Some("DENSIFY_CONTROLLER_TYPE"),
    "Kubernetes Controller Type",
    Kubernetes,
);
const POD_NAME: Attribute = attr(
    "pod_name",
    Some("DENSIFY_POD_NAME"),
    "Kubernetes Pod Name",
    Kubernetes,
);
const CONTAINER_NAME: Attribute = attr(
    "container_name",
    Some("DENSIFY_CONTAINER_NAME"),
    "Kubernetes Container Name",
    Kubernetes,
);
const FALLBACK_CPU_REQ: Attribute = attr(
    "fallback_cpu_req",
    None,
    "Fallback CPU Request",
    Kubernetes,
);
const FALLBACK_CPU_LIM: Attribute = attr(
    "fallback_cpu_lim",
    None,
    "Fallback CPU Limit",
    Kubernetes,
);
const FALLBACK_MEM_REQ: Attribute = attr(
    "fallback_mem_req",
    None,
    "Fallback Memory Request",
    Kubernetes,
);
const FALLBACK_MEM_LIM: Attribute = attr(
    "fallback_mem_lim",
    None,
    "Fallback Memory Limit",
    Kubernetes,
);

/// Attributes in schema order, paired with whether their value is deferred
fn unknown_flags(config: &ProviderConfig) -> [(Attribute, bool); 19] {
    [
        (INSTANCE, config.densify_instance.is_unknown()),
        (USERNAME, config.username.is_unknown()),
        (PASSWORD, config.password.is_unknown()),
        (API_TIMEOUT, config.api_timeout.is_unknown()),
        (TECH_PLATFORM, config.tech_platform.is_unknown()),
        (ACCOUNT_NUMBER, config.account_number.is_unknown()),
        (ACCOUNT_NAME, config.account_name.is_unknown()),
        (SYSTEM_NAME, config.system_name.is_unknown()),
        (FALLBACK_INSTANCE_TYPE, config.fallback_instance_type.is_unknown()),
        (CONTINUE_IF_ERROR, config.continue_if_error.is_unknown()),
        (CLUSTER, config.cluster.is_unknown()),
        (NAMESPACE, config.namespace.is_unknown()),
        (CONTROLLER_TYPE, config.controller_type.is_unknown()),
        (POD_NAME, config.pod_name.is_unknown()),
        (CONTAINER_NAME, config.container_name.is_unknown()),
        (FALLBACK_CPU_REQ, config.fallback_cpu_req.is_unknown()),
        (FALLBACK_CPU_LIM, config.fallback_cpu_lim.is_unknown()),
        (FALLBACK_MEM_REQ, config.fallback_mem_req.is_unknown()),
        (FALLBACK_MEM_LIM, config.fallback_mem_lim.is_unknown()),
    ]
}

fn unknown_value_error(attribute: &Attribute) -> Diagnostic {
    let remedy = match attribute.env_var {
        Some(var) => format!(
            "Either target apply the source of the value first, set the value statically \
             in the configuration, or use the {} environment variable.",
            var
        ),
        None => "Either target apply the source of the value first \
                 or set the value statically in the configuration."
            .to_string(),
    };

    Diagnostic::attribute_error(
        attribute.name,
        format!("Unknown {}", attribute.label),
        format!(
            "The provider cannot create the Densify API client as there is an unknown \
             configuration value for the {}. {}",
            attribute.label, remedy
        ),
    )
}

fn missing_value_error(attribute: &Attribute, summary: &str) -> Diagnostic {
    let remedy = match attribute.env_var {
        Some(var) => format!(
            "Set the {} value in the configuration or use the {} environment variable. \
             If either is already set, ensure the value is not empty.",
            attribute.name, var
        ),
        None => format!(
            "Set the {} value in the configuration. \
             If it is already set, ensure the value is not empty.",
            attribute.name
        ),
    };

    Diagnostic::attribute_error(
        attribute.name,
        summary,
        format!(
            "The provider cannot create the Densify API client as there is a missing \
             or empty value for the {}. {}",
            attribute.label, remedy
        ),
    )
}

/// Flag every explicitly configured attribute whose value is not known yet.
///
/// Attributes of the identity group that does not apply to the selected
/// platform are skipped. The platform is the explicit `tech_platform` when
/// known, otherwise the environment default.
pub fn check_unknown_values(config: &ProviderConfig, env: &EnvironmentDefaults) -> Diagnostics {
    let platform = config
        .tech_platform
        .known()
        .cloned()
        .or_else(|| env.tech_platform.clone())
        .unwrap_or_default();

    let mut diags = Diagnostics::new();
    for (attribute, unknown) in unknown_flags(config) {
        if unknown && attribute.group.applies_to(&platform) {
            diags.push(unknown_value_error(&attribute));
        }
    }
    diags
}

/// Required-field rules over the merged settings
pub fn check_required(settings: &SettingsBuilder) -> Diagnostics {
    let mut diags = Diagnostics::new();

    if settings.instance.is_empty() {
        diags.push(missing_value_error(&INSTANCE, "Missing Densify API Instance Name"));
    }
    if settings.username.is_empty() {
        diags.push(missing_value_error(&USERNAME, "Missing Densify API Username"));
    }
    if settings.password.is_empty() {
        diags.push(missing_value_error(&PASSWORD, "Missing Densify API Password"));
    }
    if settings.tech_platform.is_empty() {
        diags.push(missing_value_error(&TECH_PLATFORM, "Missing Densify API Technology Platform"));
    }

    if is_kubernetes_platform(&settings.tech_platform) {
        if settings.cluster.is_empty() {
            diags.push(missing_value_error(&CLUSTER, "Missing Kubernetes Cluster Name"));
        }
        if settings.namespace.is_empty() {
            diags.push(missing_value_error(&NAMESPACE, "Missing Kubernetes Namespace"));
        }
        if settings.controller_type.is_empty() {
            diags.push(missing_value_error(&CONTROLLER_TYPE, "Missing Kubernetes Controller Type"));
        }
        if settings.pod_name.is_empty() {
            diags.push(missing_value_error(&POD_NAME, "Missing Kubernetes Pod Name"));
        }
    } else {
        if settings.account_name.is_empty() && settings.account_number.is_empty() {
            diags.push(Diagnostic::attribute_error(
                ACCOUNT_NUMBER.name,
                "Missing Densify API Account Name/Number",
                "The provider cannot create the Densify API client as there is a missing \
                 or empty value for the Densify API Account Number or Account Name. \
                 Set the account_number or account_name value in the configuration or use \
                 the DENSIFY_ACCOUNT_NUMBER or DENSIFY_ACCOUNT_NAME environment variable. \
                 If either is already set, ensure the value is not empty.",
            ));
        }
        if settings.system_name.is_empty() {
            diags.push(missing_value_error(&SYSTEM_NAME, "Missing Densify System Name"));
        }
    }

    diags
}
