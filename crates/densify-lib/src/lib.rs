//! Densify right-sizing recommendations as read-only records
//!
//! This crate provides the core functionality for:
//! - Layered settings resolution (environment defaults, explicit overrides)
//! - Platform-dependent settings validation
//! - Densify API access behind a narrow trait
//! - Mapping pod recommendations to output records with fallback values

pub mod client;
pub mod diagnostics;
pub mod mapper;
pub mod models;
pub mod provider;
pub mod settings;

pub use client::{ClientError, DensifyApi, DensifyQuery, HttpClient, QueryError, TechPlatform};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use mapper::{map_pod_recommendation, CPU_UNIT, MEMORY_UNIT};
pub use models::*;
pub use provider::{configure, configure_with, ConfiguredProvider, ContainerDataSource};
pub use settings::{
    resolve, ConfigValue, EnvironmentDefaults, FallbackResources, ProviderConfig, Settings,
    SettingsBuilder,
};
