//! # Handler Catalog
//!
//! The set of handler implementations installed in the process, keyed by
//! [`HandlerId`].
//!
//! Mappings only name handlers; the catalog is what makes a name loadable.
//! A handler identifier is *resolvable* when it is installed here. It is
//! *loaded* the first time a parameter bound to it is resolved (see
//! [`HandlerInvoker`](crate::invoker::HandlerInvoker)).
//!
//! ## Usage
//!
//! ```rust
//! use param_binding::registry::{handler_fn, BoundValue, HandlerCatalog, HandlerId, ParamHandler};
//! use std::sync::Arc;
//!
//! let catalog = HandlerCatalog::new();
//!
//! // A ready-made instance, shared by every resolution
//! catalog.register_instance(
//!     "app::Upper",
//!     Arc::new(handler_fn("upper", |ctx, name| {
//!         Ok(BoundValue::new(ctx.raw_param(name).unwrap_or_default().to_uppercase()))
//!     })),
//! );
//!
//! // A loader, run once on first use
//! catalog.register_loader("app::Lazy", || {
//!     let handler = handler_fn("lazy", |_, _| Ok(BoundValue::new(1_u32)));
//!     Ok(Arc::new(handler) as Arc<dyn ParamHandler>)
//! });
//!
//! assert!(catalog.is_resolvable(&HandlerId::new("app::Lazy")));
//! ```

use super::{HandlerId, ParamHandler};
use crate::error::ResolutionFailure;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Loader closure producing a handler implementation, or a diagnostic.
pub type HandlerLoader =
    Arc<dyn Fn() -> Result<Arc<dyn ParamHandler>, String> + Send + Sync>;

/// Entry in the catalog - either an instance or a loader.
#[derive(Clone)]
enum CatalogEntry {
    Instance(Arc<dyn ParamHandler>),
    Loader(HandlerLoader),
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogEntry::Instance(h) => write!(f, "Instance({})", h.handler_name()),
            CatalogEntry::Loader(_) => write!(f, "Loader(...)"),
        }
    }
}

#[derive(Default)]
pub struct HandlerCatalog {
    entries: RwLock<HashMap<HandlerId, CatalogEntry>>,
}

impl fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        f.debug_struct("HandlerCatalog")
            .field("installed_handlers", &entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HandlerCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a pre-built handler, shared across all resolutions.
    pub fn register_instance(&self, id: impl Into<HandlerId>, handler: Arc<dyn ParamHandler>) {
        let id = id.into();
        debug!(handler = %id, "Installing handler instance");
        self.entries.write().insert(id, CatalogEntry::Instance(handler));
    }

    /// Install a loader that builds the handler on first use.
    ///
    /// A loader returning `Err` surfaces as a `HandlerLoad` failure at
    /// resolution time; it will be retried on the next resolution.
    pub fn register_loader<F>(&self, id: impl Into<HandlerId>, loader: F)
    where
        F: Fn() -> Result<Arc<dyn ParamHandler>, String> + Send + Sync + 'static,
    {
        let id = id.into();
        debug!(handler = %id, "Installing handler loader");
        self.entries
            .write()
            .insert(id, CatalogEntry::Loader(Arc::new(loader)));
    }

    /// Install a handler type built with `Default` on first use.
    pub fn register<H>(&self, id: impl Into<HandlerId>)
    where
        H: ParamHandler + Default + 'static,
    {
        self.register_loader(id, || Ok(Arc::new(H::default()) as Arc<dyn ParamHandler>));
    }

    /// Returns `true` if a handler was removed.
    pub fn unregister(&self, id: &HandlerId) -> bool {
        self.entries.write().remove(id).is_some()
    }

    pub fn is_resolvable(&self, id: &HandlerId) -> bool {
        self.entries.read().contains_key(id)
    }

    /// The subset of `ids` that is not installed, sorted and deduplicated.
    pub fn unresolvable<'a, I>(&self, ids: I) -> Vec<HandlerId>
    where
        I: IntoIterator<Item = &'a HandlerId>,
    {
        let entries = self.entries.read();
        let mut missing: Vec<HandlerId> = ids
            .into_iter()
            .filter(|id| !entries.contains_key(*id))
            .cloned()
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    /// Produce the implementation for `id`.
    ///
    /// Instances are returned as-is; loaders are invoked on every call, so
    /// callers wanting load-once semantics cache the result. The catalog is
    /// not locked while a loader runs, so loaders may install handlers.
    pub fn load(&self, id: &HandlerId) -> Result<Arc<dyn ParamHandler>, ResolutionFailure> {
        let entry = self.entries.read().get(id).cloned();
        match entry {
            Some(CatalogEntry::Instance(handler)) => Ok(handler),
            Some(CatalogEntry::Loader(loader)) => {
                (*loader)().map_err(|diagnostic| ResolutionFailure::load(id.clone(), diagnostic))
            }
            None => Err(ResolutionFailure::load(
                id.clone(),
                "handler is not installed",
            )),
        }
    }

    pub fn registered_ids(&self) -> Vec<HandlerId> {
        let mut ids: Vec<HandlerId> = self.entries.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
