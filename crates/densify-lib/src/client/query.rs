//! Query configuration for the Densify API

use crate::settings::Settings;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Controller types the container analysis knows about
pub const CONTROLLER_TYPES: &[&str] = &[
    "deployment",
    "replicaset",
    "statefulset",
    "daemonset",
    "cronjob",
    "job",
    "pod",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error(
        "unsupported technology platform {0:?}; \
         accepted values are: aws, azure, gcp, k8s, kubernetes"
    )]
    UnsupportedPlatform(String),

    #[error(
        "unsupported controller type {0:?}; accepted values are: \
         deployment, replicaset, statefulset, daemonset, cronjob, job, pod"
    )]
    UnsupportedControllerType(String),
}

/// Technology platform analysed by Densify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechPlatform {
    Aws,
    Azure,
    Gcp,
    Kubernetes,
}

impl TechPlatform {
    /// API path listing the analyses for this platform
    pub fn analysis_path(&self) -> &'static str {
        match self {
            TechPlatform::Aws => "api/v2/analysis/cloud/aws",
            TechPlatform::Azure => "api/v2/analysis/cloud/azure",
            TechPlatform::Gcp => "api/v2/analysis/cloud/gcp",
            TechPlatform::Kubernetes => "api/v2/analysis/containers/kubernetes",
        }
    }

    pub fn is_kubernetes(&self) -> bool {
        matches!(self, TechPlatform::Kubernetes)
    }
}

impl FromStr for TechPlatform {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Ok(TechPlatform::Aws),
            "azure" => Ok(TechPlatform::Azure),
            "gcp" => Ok(TechPlatform::Gcp),
            "k8s" | "kubernetes" => Ok(TechPlatform::Kubernetes),
            _ => Err(QueryError::UnsupportedPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for TechPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TechPlatform::Aws => "aws",
            TechPlatform::Azure => "azure",
            TechPlatform::Gcp => "gcp",
            TechPlatform::Kubernetes => "kubernetes",
        };
        f.write_str(name)
    }
}

/// What to look up, derived from validated settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensifyQuery {
    pub platform: TechPlatform,
    pub account_name: String,
    pub account_number: String,
    pub system_name: String,

    pub cluster: String,
    pub namespace: String,
    pub controller_type: String,
    pub pod_name: String,
    pub container_name: String,
}

impl DensifyQuery {
    pub fn from_settings(settings: &Settings) -> Result<Self, QueryError> {
        let platform: TechPlatform = settings.tech_platform().parse()?;

        if platform.is_kubernetes() {
            let controller = settings.controller_type();
            if !CONTROLLER_TYPES
                .iter()
                .any(|known| controller.eq_ignore_ascii_case(known))
            {
                return Err(QueryError::UnsupportedControllerType(controller.to_string()));
            }
        }

        Ok(Self {
            platform,
            account_name: settings.account_name().to_string(),
            account_number: settings.account_number().to_string(),
            system_name: settings.system_name().to_string(),
            cluster: settings.cluster().to_string(),
            namespace: settings.namespace().to_string(),
            controller_type: settings.controller_type().to_ascii_lowercase(),
            pod_name: settings.pod_name().to_string(),
            container_name: settings.container_name().to_string(),
        })
    }

    /// Name of the analysis that holds this query's entities
    pub fn analysis_name(&self) -> &str {
        if self.platform.is_kubernetes() {
            &self.cluster
        } else if !self.account_name.is_empty() {
            &self.account_name
        } else {
            &self.account_number
        }
    }
}
