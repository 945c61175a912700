//! HTTP client for the Densify REST API

use super::{AnalysisRef, ClientError, DensifyApi, DensifyQuery};
use crate::models::{ContainerRecommendation, PodRecommendation};
use crate::settings::Settings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Densify API client using basic authentication
pub struct HttpClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl HttpClient {
    /// Create a new client for the given instance.
    ///
    /// Requests never time out when `timeout` is `None`.
    pub fn new(
        instance: &str,
        username: &str,
        password: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidInstance {
            url: instance.to_string(),
            reason,
        };

        let mut base_url = Url::parse(instance).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", base_url.scheme())));
        }
        // keep any path prefix when joining relative API paths
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        Self::new(
            settings.instance(),
            settings.username(),
            settings.password(),
            settings.timeout(),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make an authenticated GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.base_url.join(path).map_err(|e| ClientError::InvalidInstance {
            url: format!("{}{}", self.base_url, path),
            reason: e.to_string(),
        })?;

        debug!(url = %url, "Densify API request");
        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

// API response types

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisSummary {
    analysis_id: String,
    #[serde(default)]
    analysis_name: String,
}

/// One container row of a kubernetes analysis result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContainerResult {
    #[serde(default)]
    entity_id: String,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "accountIdRef")]
    account_ref: String,
    #[serde(default)]
    cluster: String,
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    controller_type: String,
    #[serde(default)]
    pod_service: String,
    #[serde(flatten)]
    container: ContainerRecommendation,
}

impl ContainerResult {
    fn matches(&self, query: &DensifyQuery) -> bool {
        self.namespace == query.namespace
            && self.controller_type.eq_ignore_ascii_case(&query.controller_type)
            && self.pod_service == query.pod_name
            && (query.container_name.is_empty() || self.container.container == query.container_name)
    }
}

/// Group the matching rows into one pod recommendation
fn group_pod(rows: Vec<ContainerResult>, query: &DensifyQuery) -> Option<PodRecommendation> {
    let mut rows = rows.into_iter().filter(|row| row.matches(query));
    let first = rows.next()?;

    let mut pod = PodRecommendation {
        entity_id: first.entity_id,
        name: first.name,
        account_ref: first.account_ref,
        cluster: first.cluster,
        namespace: first.namespace,
        controller_type: first.controller_type,
        pod_service: first.pod_service,
        containers: vec![first.container],
    };
    pod.containers.extend(rows.map(|row| row.container));

    Some(pod)
}

#[async_trait]
impl DensifyApi for HttpClient {
    async fn lookup_identity(&self, query: &DensifyQuery) -> Result<AnalysisRef, ClientError> {
        let wanted = query.analysis_name();
        let analyses: Vec<AnalysisSummary> = self.get(query.platform.analysis_path()).await?;

        analyses
            .into_iter()
            .find(|a| a.analysis_name == wanted)
            .map(|a| AnalysisRef {
                analysis_id: a.analysis_id,
                analysis_name: a.analysis_name,
            })
            .ok_or_else(|| {
                let kind = if query.platform.is_kubernetes() {
                    "cluster"
                } else {
                    "account"
                };
                ClientError::NotFound(format!(
                    "no Densify {} analysis found for {} {:?}",
                    query.platform, kind, wanted
                ))
            })
    }

    async fn fetch_recommendation(
        &self,
        query: &DensifyQuery,
        analysis: &AnalysisRef,
    ) -> Result<Option<PodRecommendation>, ClientError> {
        if !query.platform.is_kubernetes() {
            debug!(platform = %query.platform, "No container recommendations for cloud platforms");
            return Ok(None);
        }

        let path = format!(
            "{}/{}/results",
            query.platform.analysis_path(),
            analysis.analysis_id
        );
        let rows: Vec<ContainerResult> = self.get(&path).await?;

        Ok(group_pod(rows, query))
    }
}
