#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Param Binding
//!
//! Pluggable parameter resolution: bind raw request parameters to domain
//! objects through registered handlers, on demand.
//!
//! ## Overview
//!
//! A request arrives as a bag of raw parameters, each with one or more string
//! values. Some of those parameters stand for domain objects (a customer id,
//! a date split over three fields, an order number). This crate lets each
//! such parameter be bound to a [`ParamHandler`](registry::ParamHandler) that
//! builds the object when the parameter is asked for. Parameters without a
//! handler pass through untouched.
//!
//! ## Architecture
//!
//! ```text
//!  configure                     per request
//!  ─────────                     ───────────
//!  HandlerCatalog ◄── install    ResolutionContext::param(name)
//!  HandlerRegistry ◄── defaults        │
//!        ▲                             ▼
//!        └──────── lookup ──── handler for name? ── no ──► raw value(s)
//!                                      │ yes
//!                                      ▼
//!                              HandlerInvoker (load once, construct)
//!                                      │
//!                           ok ◄───────┴───────► failure ──► ErrorLog
//! ```
//!
//! ## Module Organization
//!
//! - [`registry`] - Handler contract, catalog, mappings and the default registry
//! - [`invoker`] - Load-once handler cache and construction
//! - [`resolution`] - Per-request context, resolver and error log
//! - [`params`] - Raw parameter store contract
//! - [`binder`] - Top-level configuration surface
//! - [`profile`] - Handler profile files
//! - [`config`](crate::config) - Startup configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging
//!
//! ## Error Model
//!
//! Configuration mistakes fail fast with a [`BindingError`]. Resolution never
//! fails: a handler that cannot build its object leaves a
//! [`ResolutionFailure`] in the context's error log and the parameter
//! resolves to `None`, so a caller can resolve every parameter and then
//! report all problems at once.

pub mod binder;
pub mod config;
pub mod error;
pub mod invoker;
pub mod logging;
pub mod params;
pub mod profile;
pub mod registry;
pub mod resolution;

pub use binder::ParamBinder;
pub use crate::config::{BinderConfig, ConfigLoader, ProfileConfig};
pub use error::{BindingError, ResolutionFailure, Result};
pub use invoker::HandlerInvoker;
pub use params::{ParameterMap, RawParameterStore};
pub use profile::HandlerProfile;
pub use registry::{
    handler_fn, BoundValue, HandlerCatalog, HandlerFailure, HandlerId, HandlerMapping,
    ParamHandler,
};
pub use resolution::{ErrorLog, ResolutionContext, Resolved};
