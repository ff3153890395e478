use thiserror::Error;

/// Result type for OpenAPI operations
pub type OpenApiResult<T> = Result<T, OpenApiError>;

/// Errors that can occur around document generation.
///
/// Malformed resource metadata never ends up here: the assembly pipeline
/// degrades locally instead. These variants cover the collaborators at the
/// edges (route sources, files, configuration) and the opt-in strict schema
/// policy.
#[derive(Debug, Error)]
pub enum OpenApiError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML configuration parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The route source could not produce its route list
    #[error("Route source error: {0}")]
    RouteSource(String),

    /// Two producers registered divergent bodies under one schema name
    #[error("Schema conflict: {0}")]
    SchemaConflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OpenApiError {
    /// Create a new route source error
    pub fn route_source_error<T: ToString>(msg: T) -> Self {
        Self::RouteSource(msg.to_string())
    }

    /// Create a new schema conflict error
    pub fn schema_conflict<T: ToString>(msg: T) -> Self {
        Self::SchemaConflict(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config_error<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }
}
