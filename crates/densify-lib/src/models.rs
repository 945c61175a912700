//! Core data models for recommendations and output records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pod-level recommendation as returned by the Densify API
///
/// An absent recommendation is represented by `None` at the call site and
/// treated like a pod with no containers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodRecommendation {
    pub entity_id: String,
    pub name: String,
    #[serde(rename = "accountIdRef")]
    pub account_ref: String,
    pub cluster: String,
    pub namespace: String,
    pub controller_type: String,
    pub pod_service: String,
    pub containers: Vec<ContainerRecommendation>,
}

/// Per-container entry; quantities are millicores (CPU) and mebibytes (memory).
/// Missing recommended values arrive as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerRecommendation {
    pub container: String,
    pub recommendation_type: String,

    pub current_cpu_request: i64,
    pub current_cpu_limit: i64,
    pub current_mem_request: i64,
    pub current_mem_limit: i64,

    pub recommended_cpu_request: i64,
    pub recommended_cpu_limit: i64,
    pub recommended_mem_request: i64,
    pub recommended_mem_limit: i64,
}

/// Output record of the container data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRecord {
    pub entity_id: String,
    pub name: String,
    pub account_ref: String,
    pub cluster: String,
    pub namespace: String,
    pub controller_type: String,
    pub pod_name: String,
    pub container_count: i64,
    pub containers: BTreeMap<String, ContainerRecord>,
}

/// One container of a [`PodRecord`], every quantity rendered with its unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub container_name: String,
    pub optimization_type: String,

    pub current_cpu_request: String,
    pub current_cpu_limit: String,
    pub current_mem_request: String,
    pub current_mem_limit: String,

    pub recommended_cpu_request: String,
    pub recommended_cpu_limit: String,
    pub recommended_mem_request: String,
    pub recommended_mem_limit: String,
}
