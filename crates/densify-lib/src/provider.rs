//! Provider lifecycle: configure once, then read the container data source
//!
//! Error handling follows a fixed policy:
//! - settings problems always fail configuration
//! - client and query construction failures are ignored under
//!   `continue_if_error`, leaving the provider without a usable client
//! - identity lookup failures end the read with no record under
//!   `continue_if_error`
//! - recommendation fetch failures are always reported

use crate::client::{ClientError, DensifyApi, DensifyQuery, HttpClient};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::mapper::map_pod_recommendation;
use crate::models::PodRecord;
use crate::settings::{resolve, EnvironmentDefaults, FallbackResources, ProviderConfig, Settings};
use tracing::{debug, info, trace, warn};

/// Provider type name
pub const PROVIDER_TYPE_NAME: &str = "densify";

/// Container data source type name
pub const CONTAINER_DATA_SOURCE: &str = "densify_container";

const PASSWORD_MASK: &str = "***";

/// A provider that passed configuration
pub struct ConfiguredProvider<C> {
    settings: Settings,
    client: Option<C>,
    query: Option<DensifyQuery>,
    warnings: Diagnostics,
}

impl<C: DensifyApi> ConfiguredProvider<C> {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn client(&self) -> Option<&C> {
        self.client.as_ref()
    }

    pub fn query(&self) -> Option<&DensifyQuery> {
        self.query.as_ref()
    }

    /// Failures ignored under `continue_if_error`, as warnings
    pub fn warnings(&self) -> &Diagnostics {
        &self.warnings
    }

    /// Data source bound to this provider's client and settings
    pub fn container_data_source(&self) -> ContainerDataSource<'_, C> {
        ContainerDataSource {
            client: self.client.as_ref(),
            query: self.query.as_ref(),
            fallback: self.settings.fallback(),
            skip_errors: self.settings.continue_if_error(),
        }
    }
}

/// Configure the provider with the production HTTP client
pub fn configure(
    config: &ProviderConfig,
    env: &EnvironmentDefaults,
) -> Result<ConfiguredProvider<HttpClient>, Diagnostics> {
    configure_with(config, env, HttpClient::from_settings)
}

/// Configure the provider, building the client with `connect`
pub fn configure_with<C, F>(
    config: &ProviderConfig,
    env: &EnvironmentDefaults,
    connect: F,
) -> Result<ConfiguredProvider<C>, Diagnostics>
where
    C: DensifyApi,
    F: FnOnce(&Settings) -> Result<C, ClientError>,
{
    debug!("Configuring Densify client");
    let settings = resolve(config, env)?;
    log_settings(&settings);

    let mut warnings = Diagnostics::new();

    debug!("Creating Densify API client");
    let client = match connect(&settings) {
        Ok(client) => Some(client),
        Err(e) => {
            let detail = format!(
                "An unexpected error occurred when creating the Densify API client. \
                 If the error is not clear, please contact the provider developers.\n\n\
                 Densify Client Error: {}",
                e
            );
            tolerate(&settings, &mut warnings, "Unable to Create Densify API Client", detail)?;
            warn!(
                event = "client_error_ignored",
                error = %e,
                "Unable to create Densify API client"
            );
            None
        }
    };

    debug!("Validating Densify client query");
    let query = match DensifyQuery::from_settings(&settings) {
        Ok(query) => Some(query),
        Err(e) => {
            let detail = format!(
                "An unexpected error occurred when creating the Densify API query. \
                 If the error is not clear, please contact the provider developers.\n\n\
                 Densify Client Query Error: {}",
                e
            );
            tolerate(&settings, &mut warnings, "Unable to create Densify query", detail)?;
            warn!(event = "query_error_ignored", error = %e, "Unable to create Densify query");
            None
        }
    };

    let success = client.is_some() && query.is_some();
    info!(event = "provider_configured", success, "Configured Densify client");

    Ok(ConfiguredProvider {
        settings,
        client,
        query,
        warnings,
    })
}

/// Record a construction failure as a warning under `continue_if_error`,
/// otherwise fail configuration with it
fn tolerate(
    settings: &Settings,
    warnings: &mut Diagnostics,
    summary: &str,
    detail: String,
) -> Result<(), Diagnostics> {
    if settings.continue_if_error() {
        warnings.push(Diagnostic::warning(summary, detail));
        Ok(())
    } else {
        Err(Diagnostic::error(summary, detail).into())
    }
}

/// Log resolved settings with the password masked
fn log_settings(settings: &Settings) {
    let password = if settings.password().is_empty() { "" } else { PASSWORD_MASK };

    debug!(
        densify_instance = %settings.instance(),
        densify_username = %settings.username(),
        densify_password = %password,
        densify_api_timeout = settings.timeout_secs(),
        densify_tech_platform = %settings.tech_platform(),
        densify_account_name = %settings.account_name(),
        densify_account_number = %settings.account_number(),
        densify_system_name = %settings.system_name(),
        densify_fallback_instance_type = %settings.fallback_instance_type(),
        densify_continue_if_error = settings.continue_if_error(),
        densify_cluster = %settings.cluster(),
        densify_namespace = %settings.namespace(),
        densify_controller_type = %settings.controller_type(),
        densify_pod_name = %settings.pod_name(),
        densify_container_name = %settings.container_name(),
        densify_fallback_cpu_req = %settings.fallback().cpu_request,
        densify_fallback_cpu_lim = %settings.fallback().cpu_limit,
        densify_fallback_mem_req = %settings.fallback().memory_request,
        densify_fallback_mem_lim = %settings.fallback().memory_limit,
        "Resolved Densify settings"
    );
}

/// Kubernetes container recommendation data source
pub struct ContainerDataSource<'a, C> {
    client: Option<&'a C>,
    query: Option<&'a DensifyQuery>,
    fallback: &'a FallbackResources,
    skip_errors: bool,
}

impl<'a, C: DensifyApi> ContainerDataSource<'a, C> {
    /// Fetch and map the recommendation.
    ///
    /// `Ok(None)` means the read ended without a record, which only happens
    /// when an identity lookup failure is skipped.
    pub async fn read(&self) -> Result<Option<PodRecord>, Diagnostics> {
        trace!("Reading Densify API client");

        let (client, query) = match (self.client, self.query) {
            (Some(client), Some(query)) => (client, query),
            _ => return self.identity_failure(ClientError::NotConfigured),
        };

        debug!("Densify API client: calling lookup_identity");
        let analysis = match client.lookup_identity(query).await {
            Ok(analysis) => analysis,
            Err(e) => return self.identity_failure(e),
        };
        trace!(analysis_id = %analysis.analysis_id, "Densify API client: lookup_identity: success");

        debug!("Densify API client: calling fetch_recommendation");
        let reco = client
            .fetch_recommendation(query, &analysis)
            .await
            .map_err(|e| {
                Diagnostic::error("Unable to Find Densify Recommendation", e.to_string())
            })?;
        trace!(found = reco.is_some(), "Densify API client: fetch_recommendation: success");

        Ok(Some(map_pod_recommendation(reco.as_ref(), self.fallback)))
    }

    fn identity_failure(&self, error: ClientError) -> Result<Option<PodRecord>, Diagnostics> {
        if self.skip_errors {
            warn!(event = "identity_lookup_skipped", error = %error, "Skipping Densify read");
            return Ok(None);
        }
        Err(
            Diagnostic::error("Unable to Find Densify Account Number/Name", error.to_string())
                .into(),
        )
    }
}
