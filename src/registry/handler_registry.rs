//! # Handler Registry
//!
//! Name to handler lookup at two scopes: the process-wide default mapping and
//! an optional per-context override.
//!
//! ## Precedence
//!
//! ```text
//!  lookup(name)
//!      │
//!  ┌───▼────────────┐  yes   ┌──────────────────────┐
//!  │ override set?  ├───────►│ override.get(name)   │  (miss ⇒ no handler)
//!  └───┬────────────┘        └──────────────────────┘
//!      │ no
//!  ┌───▼──────────────────┐
//!  │ defaults.get(name)   │
//!  └──────────────────────┘
//! ```
//!
//! An override shadows the defaults entirely. Nothing is merged at lookup time.
//!
//! Every installed identifier is checked against the [`HandlerCatalog`] when
//! it is installed, never on lookup.

use super::{HandlerCatalog, HandlerId, HandlerMapping};
use crate::error::{BindingError, Result};
use crate::logging::log_registry_operation;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which mapping a context resolves handlers against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegistryScope {
    #[default]
    Default,
    Override(HandlerMapping),
}

impl RegistryScope {
    pub fn is_override(&self) -> bool {
        matches!(self, RegistryScope::Override(_))
    }
}

/// The process-wide default mapping plus the catalog used to verify it.
#[derive(Debug)]
pub struct HandlerRegistry {
    catalog: Arc<HandlerCatalog>,
    defaults: RwLock<HandlerMapping>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new(catalog: Arc<HandlerCatalog>) -> Self {
        Self {
            catalog,
            defaults: RwLock::new(HandlerMapping::new()),
        }
    }

    pub fn catalog(&self) -> &Arc<HandlerCatalog> {
        &self.catalog
    }

    /// Bind one parameter name to a handler in the default mapping.
    pub fn set_default(&self, name: impl Into<String>, id: impl Into<HandlerId>) -> Result<()> {
        let name = name.into();
        super::mapping::validate_param_name(&name)?;
        self.set_defaults(HandlerMapping::new().with_handler(name, id))
    }

    /// Merge `mapping` into the default mapping.
    ///
    /// Fails with `ConfigurationError` for an empty mapping and with
    /// `UnavailableHandler` if any identifier is not installed. Nothing is
    /// installed when either check fails.
    pub fn set_defaults(&self, mapping: HandlerMapping) -> Result<()> {
        mapping.ensure_not_empty()?;
        self.verify(&mapping)?;

        let count = mapping.len();
        self.defaults.write().extend(mapping);

        log_registry_operation(
            "set_defaults",
            None,
            None,
            "installed",
            Some(&format!("{count} entries")),
        );
        Ok(())
    }

    /// Untyped form of [`set_defaults`](Self::set_defaults).
    pub fn set_defaults_from_json(&self, value: &serde_json::Value) -> Result<()> {
        self.set_defaults(HandlerMapping::from_json(value)?)
    }

    /// Check every parameter name in `mapping` and every identifier against
    /// the catalog.
    pub fn verify(&self, mapping: &HandlerMapping) -> Result<()> {
        for name in mapping.names() {
            super::mapping::validate_param_name(name)?;
        }

        let missing = self.catalog.unresolvable(mapping.handler_ids());
        if missing.is_empty() {
            debug!(entries = mapping.len(), "Handler mapping verified");
            return Ok(());
        }

        warn!(
            missing = ?missing.iter().map(HandlerId::as_str).collect::<Vec<_>>(),
            "Handler mapping references handlers that are not installed"
        );
        Err(BindingError::UnavailableHandler {
            identifiers: missing,
        })
    }

    pub fn default_handler(&self, name: &str) -> Option<HandlerId> {
        self.defaults.read().get(name).cloned()
    }

    /// Snapshot of the default mapping.
    pub fn default_mapping(&self) -> HandlerMapping {
        self.defaults.read().clone()
    }

    /// Drop every default entry.
    pub fn reset_defaults(&self) {
        self.defaults.write().clear();
        log_registry_operation("reset_defaults", None, None, "cleared", None);
    }

    /// Handler for `name` under `scope`.
    pub fn lookup(&self, scope: &RegistryScope, name: &str) -> Option<HandlerId> {
        match scope {
            RegistryScope::Override(mapping) => mapping.get(name).cloned(),
            RegistryScope::Default => self.default_handler(name),
        }
    }

    /// The effective mapping under `scope`.
    pub fn current_mapping(&self, scope: &RegistryScope) -> HandlerMapping {
        match scope {
            RegistryScope::Override(mapping) => mapping.clone(),
            RegistryScope::Default => self.default_mapping(),
        }
    }
}
