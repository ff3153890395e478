use super::{generate_document, load_config};
use anyhow::Context;
use autoapi_openapi::export::{save_spec_to_file, OutputFormat};
use clap::Args;
use std::path::PathBuf;

/// Generate command arguments
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Route manifest (JSON or YAML)
    #[arg(long, short)]
    pub routes: PathBuf,

    /// Configuration file (TOML)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Output file path
    #[arg(long, short, default_value = "target/openapi.json")]
    pub output: PathBuf,

    /// Output format (json, yaml); defaults to the output file extension
    #[arg(long, short)]
    pub format: Option<String>,

    /// Write compact JSON
    #[arg(long)]
    pub compact: bool,
}

pub fn run(args: &GenerateArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let spec = generate_document(&args.routes, &config)?;

    let format = match args.format.as_deref() {
        Some(format) => format.parse::<OutputFormat>()?,
        None => OutputFormat::from_path(&args.output),
    };

    save_spec_to_file(&spec, &args.output, format, !args.compact)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "OpenAPI document generated: {} ({} paths, {} schemas)",
        args.output.display(),
        spec.paths.len(),
        spec.components.schemas.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MANIFEST: &str = r#"[
        {"group": {"prefix": "api/", "routes": [
            {"endpoint": {"pattern": "items/", "name": "item-list", "handler": {
                "name": "ItemViewSet",
                "dispatch": {"style": "resource", "capabilities": ["list", "create"]},
                "payload": {"name": "Item", "fields": [{"name": "name", "kind": "string"}]}
            }}}
        ]}}
    ]"#;

    #[test]
    fn test_generate_writes_yaml_from_format_flag() {
        let dir = tempfile::tempdir().unwrap();
        let routes = dir.path().join("routes.json");
        let config = dir.path().join("autoapi.toml");
        let output = dir.path().join("out/openapi.txt");
        fs::write(&routes, MANIFEST).unwrap();
        fs::write(&config, "title = \"Shop API\"\n").unwrap();

        run(&GenerateArgs {
            routes,
            config: Some(config),
            output: output.clone(),
            format: Some("yaml".to_string()),
            compact: false,
        })
        .unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("title: Shop API"));
        assert!(written.contains("/api/items/"));
    }

    #[test]
    fn test_generate_reports_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();

        let result = run(&GenerateArgs {
            routes: dir.path().join("missing.json"),
            config: None,
            output: dir.path().join("openapi.json"),
            format: None,
            compact: true,
        });

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to read route manifest"));
    }
}
