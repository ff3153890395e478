use autoapi_openapi::swagger_ui_html;
use clap::Args;

/// Viewer command arguments
#[derive(Args, Debug, Clone)]
pub struct ViewerArgs {
    /// URL the page loads the OpenAPI document from
    #[arg(long, default_value = "openapi.json")]
    pub schema_url: String,
}

/// Print the Swagger UI page for hosting next to a static document
pub fn run(args: &ViewerArgs) {
    println!("{}", swagger_ui_html(&args.schema_url));
}
