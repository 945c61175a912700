//! Densify API access
//!
//! The provider only depends on [`DensifyApi`]; [`HttpClient`] is the
//! production implementation.

mod http;
mod query;

pub use http::HttpClient;
pub use query::{DensifyQuery, QueryError, TechPlatform, CONTROLLER_TYPES};

use crate::models::PodRecommendation;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid Densify instance URL {url:?}: {reason}")]
    InvalidInstance { url: String, reason: String },

    #[error("Densify API client is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Densify API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode Densify API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),
}

/// Analysis that holds the queried account or cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRef {
    pub analysis_id: String,
    pub analysis_name: String,
}

/// Upstream operations the container data source needs
#[async_trait]
pub trait DensifyApi: Send + Sync {
    /// Resolve the account or cluster the query refers to
    async fn lookup_identity(&self, query: &DensifyQuery) -> Result<AnalysisRef, ClientError>;

    /// Fetch the recommendation; `Ok(None)` when Densify has none
    async fn fetch_recommendation(
        &self,
        query: &DensifyQuery,
        analysis: &AnalysisRef,
    ) -> Result<Option<PodRecommendation>, ClientError>;
}
