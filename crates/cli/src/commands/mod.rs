pub mod generate;
pub mod serve;
pub mod viewer;

use anyhow::Context;
use autoapi_openapi::{OpenApiConfig, OpenApiGenerator, OpenApiSpec, RouteManifest};
use std::path::Path;

/// Load the configuration file, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> anyhow::Result<OpenApiConfig> {
    match path {
        Some(path) => OpenApiConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(OpenApiConfig::default()),
    }
}

/// Read the route manifest and generate a document from it
pub fn generate_document(routes: &Path, config: &OpenApiConfig) -> anyhow::Result<OpenApiSpec> {
    let manifest = RouteManifest::from_path(routes)
        .with_context(|| format!("Failed to read route manifest {}", routes.display()))?;

    OpenApiGenerator::new(config.clone())
        .generate_from(&manifest)
        .context("OpenAPI generation failed")
}
