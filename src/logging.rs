//! # Structured Logging Module
//!
//! Environment-aware structured logging for applications embedding the
//! binder, plus the structured events the binder itself emits.

use crate::error::ResolutionFailure;
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging with an environment-specific level.
///
/// `RUST_LOG` wins when set. Output is JSON when
/// `PARAM_BINDING_LOG_FORMAT=json`. Safe to call more than once, and a
/// subscriber installed by the host application is left alone.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let layer = if json_output() {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(filter)
                .boxed()
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("PARAM_BINDING_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn json_output() -> bool {
    std::env::var("PARAM_BINDING_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"))
}

/// Log structured data for registry operations
pub fn log_registry_operation(
    operation: &str,
    name: Option<&str>,
    handler: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        name = name,
        handler = handler,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "📚 REGISTRY_OPERATION"
    );
}

/// Log a failure recorded against a parameter
pub fn log_resolution_failure(name: &str, failure: &ResolutionFailure) {
    tracing::warn!(
        param = %name,
        kind = failure.kind(),
        handler = failure.handler().map(|id| id.as_str()),
        error = %failure,
        timestamp = %Utc::now().to_rfc3339(),
        "❌ RESOLUTION_FAILURE"
    );
}
