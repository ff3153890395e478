/*!
Writing generated documents to disk.
*/

use crate::{
    error::{OpenApiError, OpenApiResult},
    specification::OpenApiSpec,
};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Serialization format of an exported document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Pick the format from a file extension, JSON unless it says YAML
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OpenApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(OpenApiError::config_error(format!(
                "Unsupported output format: {}",
                other
            ))),
        }
    }
}

/// Serialize a document; `pretty` only affects JSON
pub fn render(spec: &OpenApiSpec, format: OutputFormat, pretty: bool) -> OpenApiResult<String> {
    match format {
        OutputFormat::Json => spec.to_json(pretty),
        OutputFormat::Yaml => spec.to_yaml(),
    }
}

/// Save a document, creating missing parent directories
pub fn save_spec_to_file<P: AsRef<Path>>(
    spec: &OpenApiSpec,
    path: P,
    format: OutputFormat,
    pretty: bool,
) -> OpenApiResult<()> {
    let path = path.as_ref();
    let content = render(spec, format, pretty)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)?;
    tracing::info!("Wrote OpenAPI document to {}", path.display());
    Ok(())
}
