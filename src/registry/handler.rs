//! # Parameter Handlers
//!
//! The contract every handler implements, plus the type-erased value a handler
//! hands back to the resolver.
//!
//! ## Example: Custom Handler
//!
//! ```rust
//! use param_binding::registry::{BoundValue, HandlerFailure, ParamHandler};
//! use param_binding::ResolutionContext;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Customer {
//!     id: u64,
//! }
//!
//! #[derive(Debug, Default)]
//! struct CustomerHandler;
//!
//! impl ParamHandler for CustomerHandler {
//!     fn construct(
//!         &self,
//!         context: &ResolutionContext,
//!         name: &str,
//!     ) -> Result<BoundValue, HandlerFailure> {
//!         let raw = context.raw_param(name).unwrap_or_default();
//!         let id = raw
//!             .parse()
//!             .map_err(|_| HandlerFailure::new(format!("Invalid id ({raw}) for {name}")))?;
//!         Ok(BoundValue::new(Customer { id }))
//!     }
//! }
//! ```

use crate::resolution::ResolutionContext;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Converts one raw request parameter into a domain object.
///
/// Handlers receive the whole [`ResolutionContext`], so they may read other
/// raw parameters or resolve related parameters through the context. The
/// parameter name is passed so one handler can serve several differently
/// named parameters (`birth_date`, `order_date`, ...).
///
/// Use [`ResolutionContext::raw_param`] to read the bound parameter itself;
/// calling [`ResolutionContext::param`] for your own name recurses.
pub trait ParamHandler: Send + Sync + fmt::Debug {
    fn construct(
        &self,
        context: &ResolutionContext,
        name: &str,
    ) -> Result<BoundValue, HandlerFailure>;

    /// Handler name for logging.
    fn handler_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Failure raised by a handler's construction logic.
///
/// The message is recorded verbatim in the error log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerFailure {
    message: String,
}

impl HandlerFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

impl From<String> for HandlerFailure {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerFailure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A domain object produced by a handler.
///
/// Cloning is cheap; clones share the underlying object.
#[derive(Clone)]
pub struct BoundValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl BoundValue {
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Shared handle to the object, if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both values share the same underlying object.
    pub fn ptr_eq(&self, other: &BoundValue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundValue")
            .field("type", &self.type_name)
            .finish()
    }
}

type ConstructFn =
    dyn Fn(&ResolutionContext, &str) -> Result<BoundValue, HandlerFailure> + Send + Sync;

/// Closure-backed handler, created with [`handler_fn`].
pub struct FnHandler {
    name: String,
    construct: Box<ConstructFn>,
}

impl fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}

impl ParamHandler for FnHandler {
    fn construct(
        &self,
        context: &ResolutionContext,
        name: &str,
    ) -> Result<BoundValue, HandlerFailure> {
        (self.construct)(context, name)
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}

/// Wrap a closure as a [`ParamHandler`].
pub fn handler_fn<F>(name: impl Into<String>, construct: F) -> FnHandler
where
    F: Fn(&ResolutionContext, &str) -> Result<BoundValue, HandlerFailure> + Send + Sync + 'static,
{
    FnHandler {
        name: name.into(),
        construct: Box::new(construct),
    }
}
