//! # Error Types
//!
//! Two families of errors exist, matching the two phases of parameter binding:
//!
//! - [`BindingError`] is raised while *configuring* handlers (installing
//!   default mappings, context overrides, profiles). These are returned as
//!   `Err` and are fatal to the configuration call.
//! - [`ResolutionFailure`] is produced while *resolving* a parameter. These
//!   are never returned to the resolution caller; they are recorded in the
//!   context's error log and the parameter resolves to `None`.

use crate::registry::HandlerId;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Unavailable handlers: {}", join_ids(.identifiers))]
    UnavailableHandler { identifiers: Vec<HandlerId> },
    #[error("Profile error for '{path}': {reason}")]
    ProfileError { path: String, reason: String },
}

impl BindingError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        BindingError::ConfigurationError(reason.into())
    }

    pub fn profile(path: impl Into<String>, reason: impl Into<String>) -> Self {
        BindingError::ProfileError {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for BindingError {
    fn from(error: config::ConfigError) -> Self {
        BindingError::ConfigurationError(error.to_string())
    }
}

fn join_ids(ids: &[HandlerId]) -> String {
    ids.iter()
        .map(HandlerId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, BindingError>;

/// A failure recorded against a parameter name during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionFailure {
    /// The handler passed install-time verification but could not be loaded.
    #[error("Could not load handler '{handler}': {diagnostic}")]
    HandlerLoad {
        handler: HandlerId,
        diagnostic: String,
    },
    /// The handler rejected the input. Display is the handler's message verbatim.
    #[error("{message}")]
    HandlerConstruction { handler: HandlerId, message: String },
    #[error("{message}")]
    MissingRequired { message: String },
}

impl ResolutionFailure {
    pub fn load(handler: HandlerId, diagnostic: impl Into<String>) -> Self {
        ResolutionFailure::HandlerLoad {
            handler,
            diagnostic: diagnostic.into(),
        }
    }

    pub fn construction(handler: HandlerId, message: impl Into<String>) -> Self {
        ResolutionFailure::HandlerConstruction {
            handler,
            message: message.into(),
        }
    }

    pub fn missing(description: &str) -> Self {
        ResolutionFailure::MissingRequired {
            message: format!("You must supply a value for {description}"),
        }
    }

    /// The handler involved, if the failure came from a handler.
    pub fn handler(&self) -> Option<&HandlerId> {
        match self {
            ResolutionFailure::HandlerLoad { handler, .. }
            | ResolutionFailure::HandlerConstruction { handler, .. } => Some(handler),
            ResolutionFailure::MissingRequired { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResolutionFailure::HandlerLoad { .. } => "handler_load",
            ResolutionFailure::HandlerConstruction { .. } => "handler_construction",
            ResolutionFailure::MissingRequired { .. } => "missing_required",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_handler_lists_every_identifier() {
        let error = BindingError::UnavailableHandler {
            identifiers: vec![HandlerId::new("app::Customer"), HandlerId::new("app::Order")],
        };
        let display = error.to_string();
        assert!(display.contains("app::Customer"));
        assert!(display.contains("app::Order"));
    }

    #[test]
    fn test_construction_failure_displays_message_verbatim() {
        let failure = ResolutionFailure::construction(
            HandlerId::new("app::Customer"),
            "Invalid id (Ovid) for customer",
        );
        assert_eq!(failure.to_string(), "Invalid id (Ovid) for customer");
        assert_eq!(failure.kind(), "handler_construction");
        assert_eq!(failure.handler().map(HandlerId::as_str), Some("app::Customer"));
    }

    #[test]
    fn test_missing_required_message() {
        let failure = ResolutionFailure::missing("the customer id");
        assert_eq!(
            failure.to_string(),
            "You must supply a value for the customer id"
        );
        assert!(failure.handler().is_none());
    }

    #[test]
    fn test_failure_serializes_with_kind_tag() {
        let failure = ResolutionFailure::load(HandlerId::new("app::Date"), "boom");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "handler_load");
        assert_eq!(json["handler"], "app::Date");
        assert_eq!(json["diagnostic"], "boom");
    }
}
