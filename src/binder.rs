//! # Parameter Binder
//!
//! Top-level handle tying the catalog, the default registry and the invoker
//! together, and the factory for [`ResolutionContext`]s.
//!
//! A process normally configures [`ParamBinder::global`] once at startup and
//! creates one context per incoming parameter set. Isolated binders
//! ([`ParamBinder::new`]) are handy for tests and for embedding several
//! independent configurations in one process.
//!
//! ## Usage
//!
//! ```rust
//! use param_binding::registry::{handler_fn, BoundValue, HandlerFailure};
//! use param_binding::{ParamBinder, ParameterMap};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let binder = Arc::new(ParamBinder::new());
//! binder.catalog().register_instance(
//!     "app::Age",
//!     Arc::new(handler_fn("age", |ctx, name| {
//!         let raw = ctx.raw_param(name).unwrap_or_default();
//!         raw.parse::<u8>()
//!             .map(BoundValue::new)
//!             .map_err(|_| HandlerFailure::new(format!("'{raw}' is not a valid age")))
//!     })),
//! );
//! binder.set_default("age", "app::Age")?;
//!
//! let context = binder.context(ParameterMap::from_pairs([("age", "forty"), ("name", "Ovid")]));
//! assert_eq!(context.param("name").and_then(|p| p.as_str().map(String::from)), Some("Ovid".into()));
//! assert!(context.bound::<u8>("age").is_none());
//! assert_eq!(context.error("age").unwrap().to_string(), "'forty' is not a valid age");
//! # Ok(())
//! # }
//! ```

use crate::config::BinderConfig;
use crate::error::Result;
use crate::invoker::HandlerInvoker;
use crate::params::RawParameterStore;
use crate::profile::HandlerProfile;
use crate::registry::{HandlerCatalog, HandlerId, HandlerMapping, HandlerRegistry};
use crate::resolution::ResolutionContext;
use std::sync::{Arc, OnceLock};
use tracing::info;

static GLOBAL_BINDER: OnceLock<Arc<ParamBinder>> = OnceLock::new();

#[derive(Debug)]
pub struct ParamBinder {
    registry: HandlerRegistry,
    invoker: HandlerInvoker,
}

impl Default for ParamBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamBinder {
    /// Binder with an empty catalog of its own.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(HandlerCatalog::new()))
    }

    /// Binder over an existing catalog.
    #[must_use]
    pub fn with_catalog(catalog: Arc<HandlerCatalog>) -> Self {
        Self {
            registry: HandlerRegistry::new(Arc::clone(&catalog)),
            invoker: HandlerInvoker::new(catalog),
        }
    }

    /// The process-wide binder.
    ///
    /// Install handlers and defaults on it before serving concurrent requests.
    pub fn global() -> &'static Arc<ParamBinder> {
        GLOBAL_BINDER.get_or_init(|| Arc::new(ParamBinder::new()))
    }

    /// Build a binder from loaded configuration: the configured default
    /// handlers first, then the selected profile entries.
    pub fn from_config(config: &BinderConfig, catalog: Arc<HandlerCatalog>) -> Result<Self> {
        let binder = Self::with_catalog(catalog);

        if !config.handlers.is_empty() {
            binder.set_defaults(config.handlers.clone())?;
        }

        if let Some(profile_config) = &config.profile {
            let profile = HandlerProfile::load(&profile_config.path)?;
            let mapping = if profile_config.only.is_empty() {
                profile.into_mapping()
            } else {
                profile.select(&profile_config.only)?
            };
            binder.set_defaults(mapping)?;
        }

        info!(
            defaults = binder.default_mapping().len(),
            "Parameter binder configured"
        );
        Ok(binder)
    }

    /// Start resolving a new parameter set.
    pub fn context(self: &Arc<Self>, params: impl RawParameterStore + 'static) -> ResolutionContext {
        ResolutionContext::new(Arc::clone(self), Box::new(params))
    }

    pub fn catalog(&self) -> &Arc<HandlerCatalog> {
        self.registry.catalog()
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn invoker(&self) -> &HandlerInvoker {
        &self.invoker
    }

    pub fn set_default(&self, name: impl Into<String>, id: impl Into<HandlerId>) -> Result<()> {
        self.registry.set_default(name, id)
    }

    pub fn set_defaults(&self, mapping: HandlerMapping) -> Result<()> {
        self.registry.set_defaults(mapping)
    }

    pub fn set_defaults_from_json(&self, value: &serde_json::Value) -> Result<()> {
        self.registry.set_defaults_from_json(value)
    }

    /// Install every entry of `profile` as defaults.
    pub fn install_profile(&self, profile: HandlerProfile) -> Result<()> {
        self.registry.set_defaults(profile.into_mapping())
    }

    pub fn default_mapping(&self) -> HandlerMapping {
        self.registry.default_mapping()
    }
}
