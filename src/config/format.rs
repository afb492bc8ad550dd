//! Exact-key parsing of name to handler tables.
//!
//! The `config` crate normalizes keys (lowercasing, splitting on `.`), which
//! is fine for the binder's own settings but not for parameter names, which
//! are matched case-sensitively against requests. Tables keyed by parameter
//! name are therefore read with the format's own serde parser.

use config::FileFormat;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Format implied by the file extension.
pub(crate) fn format_for_path(path: &Path) -> Option<FileFormat> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "yaml" | "yml" => Some(FileFormat::Yaml),
        "toml" => Some(FileFormat::Toml),
        "json" => Some(FileFormat::Json),
        _ => None,
    }
}

/// Deserialize `text` in `format`, keeping every map key as written.
pub(crate) fn deserialize_text<T: DeserializeOwned>(
    text: &str,
    format: FileFormat,
) -> Result<T, String> {
    match format {
        FileFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        FileFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        FileFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        other => Err(format!(
            "unsupported format {other:?}, expected YAML, TOML or JSON"
        )),
    }
}
