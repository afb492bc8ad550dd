//! # Handler Profiles
//!
//! A profile is a file listing parameter name to handler bindings, so the
//! same bindings can be shared across applications:
//!
//! ```yaml
//! customer: app::CustomerHandler
//! birth_date: app::DateHandler
//! order_date: app::DateHandler
//! ```
//!
//! YAML, TOML and JSON are accepted; the format is inferred from the file
//! extension. Parameter names are kept exactly as written, including case
//! and dots. A profile only produces a [`HandlerMapping`]; installing it
//! goes through the same verification as any other mapping.

use crate::config::format::{deserialize_text, format_for_path};
use crate::error::{BindingError, Result};
use crate::registry::HandlerMapping;
use config::FileFormat;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerProfile {
    source: String,
    mapping: HandlerMapping,
}

impl HandlerProfile {
    /// Read a profile file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();

        let format = format_for_path(path).ok_or_else(|| {
            BindingError::profile(&source, "unsupported profile format, expected .yaml, .yml, .toml or .json")
        })?;
        let text = fs::read_to_string(path).map_err(|e| BindingError::profile(&source, e.to_string()))?;

        Self::from_text(source, &text, format)
    }

    /// Parse profile text in the given format.
    pub fn parse(text: &str, format: FileFormat) -> Result<Self> {
        Self::from_text("<inline>".to_string(), text, format)
    }

    /// Wrap an already-built mapping.
    pub fn from_mapping(mapping: HandlerMapping) -> Self {
        Self {
            source: "<memory>".to_string(),
            mapping,
        }
    }

    fn from_text(source: String, text: &str, format: FileFormat) -> Result<Self> {
        let mapping: HandlerMapping =
            deserialize_text(text, format).map_err(|reason| BindingError::profile(&source, reason))?;

        if mapping.is_empty() {
            return Err(BindingError::profile(source, "profile defines no handlers"));
        }
        for name in mapping.names() {
            crate::registry::mapping::validate_param_name(name)
                .map_err(|e| BindingError::profile(&source, e.to_string()))?;
        }

        debug!(source = %source, entries = mapping.len(), "Loaded handler profile");
        Ok(Self { source, mapping })
    }

    /// Where the profile came from, for diagnostics.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mapping(&self) -> &HandlerMapping {
        &self.mapping
    }

    /// The entries for `names` only.
    ///
    /// Every requested name must be defined by the profile.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<HandlerMapping> {
        let missing: Vec<&str> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.mapping.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(BindingError::profile(
                &self.source,
                format!("no profile defined for: {}", missing.join(", ")),
            ));
        }

        let mut selected = self.mapping.clone();
        selected.retain_names(names);
        Ok(selected)
    }

    pub fn into_mapping(self) -> HandlerMapping {
        self.mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HandlerId;
    use std::io::Write;

    const PROFILE: &str = "customer: app::Customer\nbirth_date: app::Date\norder_date: app::Date\n";

    #[test]
    fn test_parse_yaml_profile() {
        let profile = HandlerProfile::parse(PROFILE, FileFormat::Yaml).unwrap();
        assert_eq!(profile.mapping().len(), 3);
        assert_eq!(
            profile.mapping().get("birth_date"),
            Some(&HandlerId::new("app::Date"))
        );
    }

    #[test]
    fn test_load_toml_profile_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "customer = \"app::Customer\"").unwrap();

        let profile = HandlerProfile::load(file.path()).unwrap();
        assert_eq!(profile.source(), file.path().display().to_string());
        assert_eq!(
            profile.into_mapping().get("customer"),
            Some(&HandlerId::new("app::Customer"))
        );
    }

    #[test]
    fn test_missing_file_is_profile_error() {
        let error = HandlerProfile::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(error, BindingError::ProfileError { .. }));
    }

    #[test]
    fn test_select_subset() {
        let profile = HandlerProfile::parse(PROFILE, FileFormat::Yaml).unwrap();
        let selected = profile.select(&["customer", "order_date"]).unwrap();
        assert_eq!(
            selected.names().collect::<Vec<_>>(),
            vec!["customer", "order_date"]
        );
    }

    #[test]
    fn test_select_unknown_name_fails() {
        let profile = HandlerProfile::parse(PROFILE, FileFormat::Yaml).unwrap();
        let error = profile.select(&["customer", "shipping"]).unwrap_err();
        assert!(error.to_string().contains("shipping"));
    }

    #[test]
    fn test_mixed_case_and_dotted_names_are_kept() {
        let profile = HandlerProfile::parse(
            "birthDate: app::Date\nOrderId: app::Order\n\"user.id\": app::User\n",
            FileFormat::Yaml,
        )
        .unwrap();

        assert_eq!(
            profile.mapping().names().collect::<Vec<_>>(),
            vec!["OrderId", "birthDate", "user.id"]
        );
        assert_eq!(
            profile.mapping().get("user.id"),
            Some(&HandlerId::new("app::User"))
        );
    }

    #[test]
    fn test_unsupported_extension_is_profile_error() {
        let error = HandlerProfile::load("profiles.ini").unwrap_err();
        assert!(matches!(error, BindingError::ProfileError { .. }));
    }

    #[test]
    fn test_empty_profile_is_rejected() {
        let error = HandlerProfile::parse("{}", FileFormat::Json).unwrap_err();
        assert!(matches!(error, BindingError::ProfileError { .. }));
    }
}
