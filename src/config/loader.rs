//! Configuration Loader
//!
//! Layers an optional configuration file with environment variables. A
//! variable such as `PARAM_BINDING__HANDLERS__CUSTOMER=app::Customer` sets
//! `handlers.customer`.
//!
//! The `handlers` table is read with the file format's own parser so
//! parameter names keep their case and may contain dots. Names coming from
//! environment variables are lowercase.

use super::format::{deserialize_text, format_for_path};
use super::{BinderConfig, ProfileConfig};
use crate::error::{BindingError, Result};
use crate::registry::HandlerMapping;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const ENV_PREFIX: &str = "PARAM_BINDING";

/// Binder settings other than parameter names.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    profile: Option<ProfileConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct HandlerSection {
    #[serde(default)]
    handlers: HandlerMapping,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from `path` (format inferred from the extension), then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<BinderConfig> {
        let mut builder = Config::builder();
        let mut handlers = HandlerMapping::new();
        if let Some(path) = path {
            debug!(path = %path.display(), "Loading binder configuration");
            let format = format_for_path(path).ok_or_else(|| {
                BindingError::configuration(format!(
                    "Unsupported configuration file {}, expected .yaml, .yml, .toml or .json",
                    path.display()
                ))
            })?;
            let text = fs::read_to_string(path).map_err(|e| {
                BindingError::configuration(format!("Cannot read {}: {e}", path.display()))
            })?;
            handlers = Self::handler_table(&text, format)?;
            builder = builder.add_source(File::from_str(&text, format));
        }
        let environment = Environment::with_prefix(ENV_PREFIX).separator("__");
        let env_handlers: HandlerSection = Config::builder()
            .add_source(environment.clone())
            .build()?
            .try_deserialize()
            .map_err(|e| {
                BindingError::configuration(format!("Invalid handler environment override: {e}"))
            })?;
        handlers.extend(env_handlers.handlers);

        let envelope = builder.add_source(environment).build()?;
        Self::finish(handlers, envelope)
    }

    /// Parse configuration text without environment overrides.
    pub fn parse(text: &str, format: FileFormat) -> Result<BinderConfig> {
        let handlers = Self::handler_table(text, format)?;
        let envelope = Config::builder()
            .add_source(File::from_str(text, format))
            .build()?;
        Self::finish(handlers, envelope)
    }

    fn handler_table(text: &str, format: FileFormat) -> Result<HandlerMapping> {
        let section: HandlerSection = deserialize_text(text, format).map_err(|reason| {
            BindingError::configuration(format!("Invalid binder configuration: {reason}"))
        })?;
        Ok(section.handlers)
    }

    fn finish(handlers: HandlerMapping, config: Config) -> Result<BinderConfig> {
        let envelope: Envelope = config.try_deserialize().map_err(|e| {
            BindingError::configuration(format!("Invalid binder configuration: {e}"))
        })?;
        let binder_config = BinderConfig {
            handlers,
            profile: envelope.profile,
        };

        for name in binder_config.handlers.names() {
            crate::registry::mapping::validate_param_name(name)?;
        }
        if let Some(profile) = &binder_config.profile {
            if profile.path.as_os_str().is_empty() {
                return Err(BindingError::configuration("Profile path must not be empty"));
            }
        }

        debug!(
            handlers = binder_config.handlers.len(),
            profile = binder_config.profile.is_some(),
            "Binder configuration loaded"
        );
        Ok(binder_config)
    }
}
