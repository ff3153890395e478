use super::{generate_document, load_config};
use anyhow::Context;
use autoapi_openapi::{
    openapi_routes, CachedDocument, DocumentProvider, OpenApiGenerator, RouteManifest,
};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Serve command arguments
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Route manifest (JSON or YAML)
    #[arg(long, short)]
    pub routes: PathBuf,

    /// Configuration file (TOML)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Host to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the server to
    #[arg(long, short, default_value = "3000")]
    pub port: u16,
}

/// Serve the document and the Swagger UI page.
///
/// With `cache_ttl_secs` configured the manifest is re-read whenever the
/// cached document expires; otherwise it is generated once at startup.
pub async fn run(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    let provider: Arc<dyn DocumentProvider> = match config.cache_ttl() {
        Some(ttl) => {
            let routes = args.routes.clone();
            let generator = OpenApiGenerator::new(config.clone());
            let cached = CachedDocument::new(ttl, move || {
                let manifest = RouteManifest::from_path(&routes)?;
                generator.generate_from(&manifest)
            });
            // fail fast on a broken manifest instead of on the first request
            cached
                .document()
                .with_context(|| format!("Failed to generate from {}", args.routes.display()))?;
            Arc::new(cached)
        }
        None => Arc::new(Arc::new(generate_document(&args.routes, &config)?)),
    };

    let app = openapi_routes(&config, provider);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Serving OpenAPI document at http://{}{}", addr, config.schema_route());
    tracing::info!("Swagger UI available at http://{}{}", addr, config.ui_route());

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
