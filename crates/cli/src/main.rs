mod commands;
mod logging;

use clap::{Parser, Subcommand};
use commands::{generate::GenerateArgs, serve::ServeArgs, viewer::ViewerArgs};
use logging::{init_logging, LoggingConfig};

#[derive(Parser)]
#[command(name = "autoapi")]
#[command(about = "Generate and serve OpenAPI documents from route manifests")]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an OpenAPI document file
    Generate(GenerateArgs),

    /// Serve the OpenAPI document and Swagger UI
    Serve(ServeArgs),

    /// Print the Swagger UI page
    Viewer(ViewerArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&LoggingConfig::new(&cli.log_level, cli.json_logs))?;

    match cli.command {
        Commands::Generate(args) => commands::generate::run(&args)?,
        Commands::Serve(args) => commands::serve::run(&args).await?,
        Commands::Viewer(args) => commands::viewer::run(&args),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_generate_with_global_flags() {
        let cli = Cli::try_parse_from([
            "autoapi",
            "generate",
            "--routes",
            "routes.yaml",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.routes.to_str(), Some("routes.yaml"));
                assert_eq!(args.output.to_str(), Some("target/openapi.json"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_serve_requires_routes() {
        assert!(Cli::try_parse_from(["autoapi", "serve"]).is_err());
    }
}
