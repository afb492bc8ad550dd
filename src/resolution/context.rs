//! # Resolution Context
//!
//! Per-request aggregate of raw parameters, the handler scope in effect and
//! the error log. All parameter resolution goes through here.
//!
//! ## Resolution Flow
//!
//! ```text
//!  param(name) ──► handler_for(name) ──┬── None ──► raw value(s) from the store
//!                                      │
//!                                      └── Some(id) ──► HandlerInvoker::invoke
//!                                                          │
//!                                              ┌───────────┴───────────┐
//!                                              ▼                       ▼
//!                                       Some(Bound(value))    record failure, None
//! ```
//!
//! Resolution never returns an error. A `None` from a handler-bound
//! parameter means "look in [`errors`](ResolutionContext::errors)".

use super::ErrorLog;
use crate::binder::ParamBinder;
use crate::error::{ResolutionFailure, Result};
use crate::logging::{log_registry_operation, log_resolution_failure};
use crate::params::RawParameterStore;
use crate::registry::{BoundValue, HandlerId, HandlerMapping, RegistryScope};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Outcome of resolving a parameter.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// Single-value access to a pass-through parameter: its first raw value.
    Value(String),
    /// Multi-value access to a pass-through parameter: every raw value, in order.
    Values(Vec<String>),
    /// The object a handler constructed.
    Bound(BoundValue),
}

impl Resolved {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Resolved::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_values(&self) -> Option<&[String]> {
        match self {
            Resolved::Values(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_bound(&self) -> Option<&BoundValue> {
        match self {
            Resolved::Bound(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Resolved::Bound(_))
    }

    /// The bound object as a `T`, if this is a bound value of that type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.as_bound().and_then(BoundValue::downcast::<T>)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessMode {
    Single,
    Multi,
}

pub struct ResolutionContext {
    binder: Arc<ParamBinder>,
    params: Box<dyn RawParameterStore>,
    scope: RegistryScope,
    required: BTreeSet<String>,
    errors: ErrorLog,
}

impl fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("params", &self.params)
            .field("scope", &self.scope)
            .field("required", &self.required)
            .field("errors", &self.errors)
            .finish()
    }
}

impl ResolutionContext {
    pub(crate) fn new(binder: Arc<ParamBinder>, params: Box<dyn RawParameterStore>) -> Self {
        Self {
            binder,
            params,
            scope: RegistryScope::Default,
            required: BTreeSet::new(),
            errors: ErrorLog::new(),
        }
    }

    pub fn binder(&self) -> &Arc<ParamBinder> {
        &self.binder
    }

    // ---------------------------------------------------------------------
    // Parameter resolution
    // ---------------------------------------------------------------------

    /// Every parameter name in the raw store. Does not invoke any handler.
    pub fn param_names(&self) -> Vec<String> {
        self.params.names()
    }

    /// Resolve `name` in single-value mode.
    ///
    /// Pass-through parameters yield their first raw value; handler-bound
    /// parameters yield the constructed object, or `None` with the failure
    /// recorded in the error log.
    pub fn param(&self, name: &str) -> Option<Resolved> {
        self.resolve(name, AccessMode::Single)
    }

    /// Resolve `name` in multi-value mode.
    ///
    /// Pass-through parameters yield every raw value in order. Handler-bound
    /// parameters behave exactly as in [`param`](Self::param).
    pub fn param_values(&self, name: &str) -> Option<Resolved> {
        self.resolve(name, AccessMode::Multi)
    }

    /// Resolve `name` and downcast the bound object to `T`.
    ///
    /// Returns `None` for pass-through parameters, failed handlers and
    /// objects of another type.
    pub fn bound<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.param(name)?.downcast::<T>()
    }

    /// First raw value for `name`, bypassing any handler.
    pub fn raw_param(&self, name: &str) -> Option<&str> {
        self.params.value(name)
    }

    /// Every raw value for `name`, bypassing any handler.
    pub fn raw_params(&self, name: &str) -> &[String] {
        self.params.values(name).unwrap_or(&[])
    }

    #[instrument(level = "debug", skip(self))]
    fn resolve(&self, name: &str, mode: AccessMode) -> Option<Resolved> {
        match self.handler_for(name) {
            Some(id) => self.resolve_bound(name, &id),
            None => {
                trace!("No handler, passing raw value through");
                self.resolve_raw(name, mode)
            }
        }
    }

    fn resolve_raw(&self, name: &str, mode: AccessMode) -> Option<Resolved> {
        match mode {
            AccessMode::Single => self
                .params
                .value(name)
                .map(|value| Resolved::Value(value.to_string())),
            AccessMode::Multi => self
                .params
                .values(name)
                .map(|values| Resolved::Values(values.to_vec())),
        }
    }

    fn resolve_bound(&self, name: &str, id: &HandlerId) -> Option<Resolved> {
        match self.binder.invoker().invoke(self, name, id) {
            Ok(value) => Some(Resolved::Bound(value)),
            Err(failure) => {
                log_resolution_failure(name, &failure);
                self.errors.record(name, failure);
                None
            }
        }
    }

    // ---------------------------------------------------------------------
    // Handler scope
    // ---------------------------------------------------------------------

    /// Replace this context's handlers with `mapping`.
    ///
    /// The override replaces any earlier override wholesale and shadows the
    /// default mapping entirely: names it does not mention pass through raw.
    /// An empty mapping is accepted and disables every handler for this
    /// context. Fails with `UnavailableHandler` if any identifier is not
    /// installed, leaving the previous scope in place.
    pub fn set_handlers(&mut self, mapping: HandlerMapping) -> Result<()> {
        self.binder.registry().verify(&mapping)?;

        let details = format!("{} entries", mapping.len());
        self.scope = RegistryScope::Override(mapping);
        log_registry_operation(
            "set_handlers",
            None,
            None,
            "override_installed",
            Some(&details),
        );
        Ok(())
    }

    /// Drop the override and go back to the default mapping.
    pub fn clear_handlers(&mut self) {
        if self.scope.is_override() {
            debug!("Dropping handler override");
        }
        self.scope = RegistryScope::Default;
    }

    /// The handler bound to `name` in the effective mapping.
    pub fn handler_for(&self, name: &str) -> Option<HandlerId> {
        self.binder.registry().lookup(&self.scope, name)
    }

    /// The effective mapping: the override if one is set, otherwise the defaults.
    pub fn handlers(&self) -> HandlerMapping {
        self.binder.registry().current_mapping(&self.scope)
    }

    pub fn has_override(&self) -> bool {
        self.scope.is_override()
    }

    pub fn scope(&self) -> &RegistryScope {
        &self.scope
    }

    // ---------------------------------------------------------------------
    // Errors
    // ---------------------------------------------------------------------

    /// Snapshot of every recorded failure, keyed by parameter name.
    pub fn errors(&self) -> BTreeMap<String, ResolutionFailure> {
        self.errors.all()
    }

    pub fn error(&self, name: &str) -> Option<ResolutionFailure> {
        self.errors.get(name)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn clear_errors(&self) {
        self.errors.clear();
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.errors
    }

    // ---------------------------------------------------------------------
    // Required parameters
    // ---------------------------------------------------------------------

    /// Declare parameters that must be supplied, replacing any earlier set.
    pub fn set_required<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = names.into_iter().map(Into::into).collect();
    }

    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.required.iter().map(String::as_str)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// True when `name` is required but has no non-empty raw value.
    pub fn is_missing_required(&self, name: &str) -> bool {
        self.is_required(name) && !self.has_non_empty_value(name)
    }

    /// Required names that are missing, in name order.
    pub fn missing_required(&self) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| !self.has_non_empty_value(name))
            .cloned()
            .collect()
    }

    /// Record that `name` is missing. `description` is the user-facing name
    /// of the parameter, e.g. "the customer id".
    pub fn add_missing(&self, name: &str, description: &str) {
        let failure = ResolutionFailure::missing(description);
        log_resolution_failure(name, &failure);
        self.errors.record(name, failure);
    }

    fn has_non_empty_value(&self, name: &str) -> bool {
        self.params
            .values(name)
            .is_some_and(|values| values.iter().any(|value| !value.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterMap;
    use crate::registry::{handler_fn, HandlerCatalog, HandlerFailure};
    use crate::BindingError;

    #[derive(Debug, PartialEq)]
    struct Customer {
        id: u64,
    }

    fn binder() -> Arc<ParamBinder> {
        let catalog = HandlerCatalog::new();
        catalog.register_instance(
            "app::Customer",
            Arc::new(handler_fn("customer", |ctx, name| {
                let raw = ctx.raw_param(name).unwrap_or_default();
                raw.parse()
                    .map(|id| BoundValue::new(Customer { id }))
                    .map_err(|_| HandlerFailure::new(format!("Invalid id ({raw}) for {name}")))
            })),
        );
        catalog.register_instance(
            "app::Upper",
            Arc::new(handler_fn("upper", |ctx, name| {
                Ok(BoundValue::new(ctx.raw_param(name).unwrap_or_default().to_uppercase()))
            })),
        );
        let binder = Arc::new(ParamBinder::with_catalog(Arc::new(catalog)));
        binder.set_default("customer", "app::Customer").unwrap();
        binder
    }

    fn params() -> ParameterMap {
        ParameterMap::from_pairs([
            ("customer", "42"),
            ("sports", "basketball"),
            ("sports", "soccer"),
            ("sports", "scotch"),
            ("name", "ovid"),
        ])
    }

    #[test]
    fn test_pass_through_single_and_multi() {
        let context = binder().context(params());

        let single = context.param("sports").unwrap();
        assert_eq!(single.as_str(), Some("basketball"));

        let multi = context.param_values("sports").unwrap();
        assert_eq!(
            multi.as_values(),
            Some(&["basketball".to_string(), "soccer".to_string(), "scotch".to_string()][..])
        );
        assert!(context.param("absent").is_none());
        assert!(!context.has_errors());
    }

    #[test]
    fn test_param_names_lists_store_without_invoking_handlers() {
        let context = binder().context(ParameterMap::from_pairs([("customer", "nope")]));
        assert_eq!(context.param_names(), vec!["customer"]);
        assert!(!context.has_errors());
    }

    #[test]
    fn test_bound_parameter_resolves_to_object() {
        let context = binder().context(params());

        let customer = context.bound::<Customer>("customer").unwrap();
        assert_eq!(*customer, Customer { id: 42 });

        let multi = context.param_values("customer").unwrap();
        assert!(multi.is_bound());
        assert!(!context.has_errors());
    }

    #[test]
    fn test_construction_failure_is_recorded_not_returned() {
        let context = binder().context(ParameterMap::from_pairs([("customer", "Ovid")]));

        assert!(context.param("customer").is_none());
        assert_eq!(
            context.error("customer").map(|f| f.to_string()),
            Some("Invalid id (Ovid) for customer".to_string())
        );
    }

    #[test]
    fn test_override_replaces_wholesale() {
        let mut context = binder().context(params());

        context
            .set_handlers(HandlerMapping::new().with_handler("name", "app::Upper"))
            .unwrap();
        assert!(context.has_override());
        assert_eq!(context.handler_for("customer"), None);
        assert_eq!(context.param("customer").unwrap().as_str(), Some("42"));
        assert_eq!(
            context.bound::<String>("name").map(|s| s.as_str().to_owned()),
            Some("OVID".to_string())
        );

        context
            .set_handlers(HandlerMapping::new().with_handler("customer", "app::Customer"))
            .unwrap();
        assert_eq!(context.handler_for("name"), None);
        assert_eq!(context.handlers().len(), 1);

        context.clear_handlers();
        assert!(!context.has_override());
        assert_eq!(context.handlers(), context.binder().default_mapping());
    }

    #[test]
    fn test_unavailable_override_keeps_previous_scope() {
        let mut context = binder().context(params());
        let error = context
            .set_handlers(HandlerMapping::new().with_handler("order", "app::Order"))
            .unwrap_err();

        assert!(matches!(error, BindingError::UnavailableHandler { .. }));
        assert!(!context.has_override());
        assert_eq!(
            context.handler_for("customer"),
            Some(HandlerId::new("app::Customer"))
        );
    }

    #[test]
    fn test_required_parameters() {
        let mut context = binder().context(ParameterMap::from_pairs([
            ("customer", "42"),
            ("email", ""),
        ]));
        context.set_required(["customer", "email", "phone"]);

        assert!(context.is_required("email"));
        assert!(!context.is_missing_required("customer"));
        assert!(context.is_missing_required("email"));
        assert!(context.is_missing_required("phone"));
        assert!(!context.is_missing_required("unrelated"));
        assert_eq!(context.missing_required(), vec!["email", "phone"]);

        context.add_missing("phone", "your phone number");
        assert_eq!(
            context.error("phone").map(|f| f.to_string()),
            Some("You must supply a value for your phone number".to_string())
        );
    }

    #[test]
    fn test_context_moves_to_another_thread() {
        fn assert_send<T: Send>() {}
        assert_send::<ResolutionContext>();

        let context = binder().context(params());
        let customer = std::thread::spawn(move || context.bound::<Customer>("customer"))
            .join()
            .unwrap();
        assert_eq!(customer.map(|c| c.id), Some(42));
    }

    #[test]
    fn test_raw_access_bypasses_handlers() {
        let context = binder().context(ParameterMap::from_pairs([("customer", "Ovid")]));
        assert_eq!(context.raw_param("customer"), Some("Ovid"));
        assert_eq!(context.raw_params("customer"), ["Ovid".to_string()]);
        assert!(context.raw_params("absent").is_empty());
        assert!(!context.has_errors());
    }
}
