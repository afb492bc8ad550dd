//! # Binder Configuration
//!
//! Startup configuration for a [`ParamBinder`](crate::ParamBinder): default
//! handler bindings and an optional profile file, loaded from a config file
//! layered with `PARAM_BINDING__*` environment variables.
//!
//! ## Example
//!
//! ```yaml
//! handlers:
//!   customer: app::CustomerHandler
//! profile:
//!   path: config/param_profiles.yaml
//!   only: [birth_date, order_date]
//! ```
//!
//! ```rust,no_run
//! use param_binding::config::ConfigLoader;
//! use param_binding::registry::HandlerCatalog;
//! use param_binding::ParamBinder;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load(Some(Path::new("config/param_binding.yaml")))?;
//! let catalog = Arc::new(HandlerCatalog::new());
//! // ... install handlers into the catalog ...
//! let binder = ParamBinder::from_config(&config, catalog)?;
//! # Ok(())
//! # }
//! ```

pub(crate) mod format;
pub mod loader;

use crate::registry::HandlerMapping;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use loader::{ConfigLoader, ENV_PREFIX};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BinderConfig {
    /// Default parameter bindings.
    #[serde(default)]
    pub handlers: HandlerMapping,

    /// Profile file installed on top of `handlers`.
    #[serde(default)]
    pub profile: Option<ProfileConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileConfig {
    pub path: PathBuf,

    /// Subset of profile entries to install; empty installs all of them.
    #[serde(default)]
    pub only: Vec<String>,
}
