//! # Registry Infrastructure
//!
//! Everything needed to answer "which handler, if any, converts parameter X?".
//!
//! ## Available Pieces
//!
//! - **ParamHandler**: the handler contract and its [`BoundValue`] output
//! - **HandlerCatalog**: installed handler implementations keyed by [`HandlerId`]
//! - **HandlerMapping**: parameter name to handler identifier mapping
//! - **HandlerRegistry**: default mapping plus per-context [`RegistryScope`] lookup
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── HandlerMapping     (name ─► HandlerId)
//! ├── HandlerRegistry    (default mapping, scope-aware lookup, verification)
//! └── HandlerCatalog     (HandlerId ─► instance | loader)
//!         │
//!         ▼
//!     ParamHandler::construct(context, name) ─► BoundValue
//! ```

pub mod catalog;
pub mod handler;
pub mod handler_registry;
pub mod mapping;

pub use catalog::{HandlerCatalog, HandlerLoader};
pub use handler::{handler_fn, BoundValue, FnHandler, HandlerFailure, ParamHandler};
pub use handler_registry::{HandlerRegistry, RegistryScope};
pub use mapping::{HandlerId, HandlerMapping};
