//! # Handler Invoker
//!
//! Loads handler implementations once per process and runs their
//! construction entry point.
//!
//! Loaded implementations are cached by [`HandlerId`]. Each identifier has
//! its own slot; concurrent first-use loads of the same identifier are
//! serialized on that slot, so a loader runs once even under contention.
//! Failed loads are not cached and are retried on the next resolution.
//!
//! The cache map itself is never locked while a loader runs or a handler
//! constructs its value: loaders may touch other identifiers and handlers
//! are free to resolve other parameters through the context they receive.

use crate::error::ResolutionFailure;
use crate::registry::{BoundValue, HandlerCatalog, HandlerId, ParamHandler};
use crate::resolution::ResolutionContext;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct HandlerInvoker {
    catalog: Arc<HandlerCatalog>,
    loaded: DashMap<HandlerId, Arc<LoadSlot>>,
}

/// Load-once cell for one handler identifier.
type LoadSlot = Mutex<Option<Arc<dyn ParamHandler>>>;

impl fmt::Debug for HandlerInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerInvoker")
            .field("loaded_handlers", &self.loaded_count())
            .finish()
    }
}

impl HandlerInvoker {
    #[must_use]
    pub fn new(catalog: Arc<HandlerCatalog>) -> Self {
        Self {
            catalog,
            loaded: DashMap::new(),
        }
    }

    /// Return the cached implementation for `id`, loading it on first use.
    pub fn load(&self, id: &HandlerId) -> Result<Arc<dyn ParamHandler>, ResolutionFailure> {
        let slot = self.slot(id);
        let mut loaded = slot.lock();
        if let Some(handler) = loaded.as_ref() {
            return Ok(Arc::clone(handler));
        }

        let handler = self.catalog.load(id)?;
        *loaded = Some(Arc::clone(&handler));
        drop(loaded);

        info!(handler = %id, implementation = handler.handler_name(), "Loaded handler");
        Ok(handler)
    }

    fn slot(&self, id: &HandlerId) -> Arc<LoadSlot> {
        if let Some(slot) = self.loaded.get(id) {
            return Arc::clone(slot.value());
        }
        Arc::clone(self.loaded.entry(id.clone()).or_default().value())
    }

    /// Load the handler for `id` and construct the value for parameter `name`.
    #[instrument(skip(self, context), fields(handler = %id))]
    pub fn invoke(
        &self,
        context: &ResolutionContext,
        name: &str,
        id: &HandlerId,
    ) -> Result<BoundValue, ResolutionFailure> {
        let handler = self.load(id)?;

        let value = handler
            .construct(context, name)
            .map_err(|failure| ResolutionFailure::construction(id.clone(), failure.into_message()))?;

        debug!(bound_type = value.type_name(), "Handler constructed value");
        Ok(value)
    }

    pub fn is_loaded(&self, id: &HandlerId) -> bool {
        self.loaded
            .get(id)
            .is_some_and(|slot| slot.lock().is_some())
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
            .iter()
            .filter(|slot| slot.value().lock().is_some())
            .count()
    }

    /// Forget every loaded implementation; the next use reloads from the catalog.
    pub fn clear_loaded(&self) {
        self.loaded.clear();
    }
}
