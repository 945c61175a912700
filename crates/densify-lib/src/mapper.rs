//! Recommendation to record mapping
//!
//! Converts a pod recommendation into the data source's output record,
//! substituting operator fallbacks for containers without a live
//! recommendation.

use crate::models::{ContainerRecommendation, ContainerRecord, PodRecommendation, PodRecord};
use crate::settings::FallbackResources;
use tracing::debug;

/// Unit appended to CPU quantities (millicores)
pub const CPU_UNIT: &str = "m";

/// Unit appended to memory quantities (mebibytes)
pub const MEMORY_UNIT: &str = "Mi";

fn cpu(quantity: i64) -> String {
    format!("{}{}", quantity, CPU_UNIT)
}

fn memory(quantity: i64) -> String {
    format!("{}{}", quantity, MEMORY_UNIT)
}

/// A container has a live recommendation when either request is positive
pub fn has_live_recommendation(reco: &ContainerRecommendation) -> bool {
    reco.recommended_cpu_request > 0 || reco.recommended_mem_request > 0
}

/// Map one container entry
pub fn map_container(
    reco: &ContainerRecommendation,
    fallback: &FallbackResources,
) -> ContainerRecord {
    let mut record = ContainerRecord {
        container_name: reco.container.clone(),
        optimization_type: reco.recommendation_type.clone(),
        current_cpu_request: cpu(reco.current_cpu_request),
        current_cpu_limit: cpu(reco.current_cpu_limit),
        current_mem_request: memory(reco.current_mem_request),
        current_mem_limit: memory(reco.current_mem_limit),
        ..Default::default()
    };

    if has_live_recommendation(reco) {
        record.recommended_cpu_request = cpu(reco.recommended_cpu_request);
        record.recommended_cpu_limit = cpu(reco.recommended_cpu_limit);
        record.recommended_mem_request = memory(reco.recommended_mem_request);
        record.recommended_mem_limit = memory(reco.recommended_mem_limit);
    } else {
        // Fallbacks carry their own unit
        record.recommended_cpu_request = fallback.cpu_request.clone();
        record.recommended_cpu_limit = fallback.cpu_limit.clone();
        record.recommended_mem_request = fallback.memory_request.clone();
        record.recommended_mem_limit = fallback.memory_limit.clone();
    }

    record
}

/// Last-container-name-wins pod identity override.
///
/// A non-empty container name replaces the pod-level `name`. With several
/// containers the last non-empty one wins. Kept as its own step so it can
/// be dropped without touching the rest of the mapping; it is unclear
/// whether it is meant as a single-container convenience.
pub fn apply_container_name_override(record: &mut PodRecord, container_name: &str) {
    if !container_name.is_empty() {
        record.name = container_name.to_string();
    }
}

/// Build the output record for a (possibly absent) pod recommendation
pub fn map_pod_recommendation(
    reco: Option<&PodRecommendation>,
    fallback: &FallbackResources,
) -> PodRecord {
    let empty = PodRecommendation::default();
    let reco = reco.unwrap_or(&empty);

    let mut record = PodRecord {
        entity_id: reco.entity_id.clone(),
        name: reco.name.clone(),
        account_ref: reco.account_ref.clone(),
        cluster: reco.cluster.clone(),
        namespace: reco.namespace.clone(),
        controller_type: reco.controller_type.clone(),
        pod_name: reco.pod_service.clone(),
        ..Default::default()
    };

    debug!(containers = reco.containers.len(), "Mapping pod recommendation");

    for container in &reco.containers {
        apply_container_name_override(&mut record, &container.container);
        record
            .containers
            .insert(container.container.clone(), map_container(container, fallback));
    }

    record.container_count = reco.containers.len() as i64;
    record
}
