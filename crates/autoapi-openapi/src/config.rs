use crate::{
    error::{OpenApiError, OpenApiResult},
    specification::Server,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration for OpenAPI document generation and serving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenApiConfig {
    /// API title
    pub title: String,

    /// API version
    pub version: String,

    /// API description; blank means "API documentation for {title}"
    pub description: String,

    /// Server configurations; empty means a single `/` server
    pub servers: Vec<ServerConfig>,

    /// Where the JSON document is served
    pub schema_url: String,

    /// Where the interactive viewer is served
    pub ui_url: String,

    /// Keep a generated document this many seconds before regenerating
    pub cache_ttl_secs: Option<u64>,

    /// Fail generation when one schema name is registered with divergent
    /// bodies instead of keeping the first
    pub strict_schemas: bool,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
            servers: Vec::new(),
            schema_url: "openapi.json".to_string(),
            ui_url: "swagger/".to_string(),
            cache_ttl_secs: None,
            strict_schemas: false,
        }
    }
}

impl OpenApiConfig {
    /// Create a new configuration with custom API info
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            ..Self::default()
        }
    }

    /// Parse a TOML configuration; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> OpenApiResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> OpenApiResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> OpenApiResult<()> {
        if self.title.trim().is_empty() {
            return Err(OpenApiError::config_error("title must not be empty"));
        }
        if self.version.trim().is_empty() {
            return Err(OpenApiError::config_error("version must not be empty"));
        }
        if self.schema_url.trim_matches('/').is_empty() || self.ui_url.trim_matches('/').is_empty() {
            return Err(OpenApiError::config_error(
                "schema_url and ui_url must name a path",
            ));
        }
        if self.schema_url.trim_matches('/') == self.ui_url.trim_matches('/') {
            return Err(OpenApiError::config_error(
                "schema_url and ui_url must differ",
            ));
        }
        Ok(())
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Add a server configuration
    pub fn add_server(mut self, url: &str, description: Option<&str>) -> Self {
        self.servers.push(ServerConfig {
            url: url.to_string(),
            description: description.map(|s| s.to_string()),
        });
        self
    }

    pub fn with_urls(mut self, schema_url: &str, ui_url: &str) -> Self {
        self.schema_url = schema_url.to_string();
        self.ui_url = ui_url.to_string();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = Some(ttl.as_secs());
        self
    }

    pub fn with_strict_schemas(mut self, strict: bool) -> Self {
        self.strict_schemas = strict;
        self
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// Router path of the JSON document, e.g. `/openapi.json`
    pub fn schema_route(&self) -> String {
        format!("/{}", self.schema_url.trim_start_matches('/'))
    }

    /// Router path of the viewer page, e.g. `/swagger/`
    pub fn ui_route(&self) -> String {
        format!("/{}", self.ui_url.trim_start_matches('/'))
    }

    /// Servers as they appear in the document
    pub fn document_servers(&self) -> Vec<Server> {
        self.servers
            .iter()
            .map(|s| Server {
                url: s.url.clone(),
                description: s.description.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OpenApiConfig::default();
        assert_eq!(config.title, "API Documentation");
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.schema_url, "openapi.json");
        assert_eq!(config.ui_url, "swagger/");
        assert!(config.cache_ttl().is_none());
        assert!(!config.strict_schemas);
        assert_eq!(config.schema_route(), "/openapi.json");
        assert_eq!(config.ui_route(), "/swagger/");
    }

    #[test]
    fn test_from_toml_keeps_defaults_for_missing_keys() {
        let config = OpenApiConfig::from_toml_str(
            r#"
            title = "Shop API"
            cache_ttl_secs = 900

            [[servers]]
            url = "https://shop.example.com"
            description = "Production"
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Shop API");
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(900)));
        assert_eq!(config.document_servers()[0].url, "https://shop.example.com");
    }

    #[test]
    fn test_from_toml_rejects_clashing_urls() {
        let result = OpenApiConfig::from_toml_str(
            r#"
            schema_url = "docs/"
            ui_url = "/docs"
            "#,
        );
        assert!(matches!(result, Err(OpenApiError::Config(_))));
    }

    #[test]
    fn test_from_toml_rejects_malformed_input() {
        assert!(matches!(
            OpenApiConfig::from_toml_str("title = "),
            Err(OpenApiError::Toml(_))
        ));
    }

    #[test]
    fn test_builders() {
        let config = OpenApiConfig::new("Test API", "2.0.0")
            .with_description("Things")
            .add_server("http://localhost:3000", Some("Development server"))
            .with_cache_ttl(Duration::from_secs(60))
            .with_strict_schemas(true);

        assert_eq!(config.servers.len(), 1);
        assert_eq!(config.cache_ttl_secs, Some(60));
        assert!(config.strict_schemas);
    }
}
