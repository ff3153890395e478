use crate::{
    config::OpenApiConfig,
    descriptor::RouteDescriptor,
    error::{OpenApiError, OpenApiResult},
    paths,
    registry::SchemaRegistry,
    responses::envelope_schemas,
    routes::RouteSource,
    schema::{entity_schema, payload_schema},
    specification::*,
};
use std::collections::BTreeMap;

/// Main OpenAPI document generator
pub struct OpenApiGenerator {
    /// Configuration
    config: OpenApiConfig,
}

/// Assemble a document from an already extracted route list.
///
/// Routes whose handler is not API-capable are skipped. Blank descriptions
/// become `"API documentation for {title}"` and an empty server list becomes
/// a single `/` server.
pub fn assemble(
    routes: &[RouteDescriptor],
    title: &str,
    version: &str,
    description: &str,
    servers: Vec<Server>,
) -> OpenApiSpec {
    build_document(routes, title, version, description, servers).0
}

fn build_document(
    routes: &[RouteDescriptor],
    title: &str,
    version: &str,
    description: &str,
    servers: Vec<Server>,
) -> (OpenApiSpec, Vec<String>) {
    let mut registry = SchemaRegistry::new();
    for (name, schema) in envelope_schemas() {
        registry.register(&name, schema);
    }

    let mut path_map: BTreeMap<String, PathItem> = BTreeMap::new();

    for route in routes {
        let resource = &route.resource;
        if !resource.api_capable {
            tracing::debug!("Skipping route '{}': handler '{}' is not an API handler", route.raw_path, resource.name);
            continue;
        }

        let items = paths::build(route);
        if items.is_empty() {
            tracing::debug!("Route '{}' exposes no operations", route.raw_path);
            continue;
        }
        paths::merge_paths(&mut path_map, items);

        if let Some(payload) = &resource.payload {
            registry.register(&payload.name, payload_schema(payload));
        }
        if let Some(entity) = &resource.entity {
            registry.register(&entity.name, entity_schema(entity));
        }
    }

    let conflicts = registry.conflicts().to_vec();

    let description = if description.trim().is_empty() {
        format!("API documentation for {}", title)
    } else {
        description.to_string()
    };

    let servers = if servers.is_empty() {
        vec![Server::new("/").with_description("Default server")]
    } else {
        servers
    };

    let spec = OpenApiSpec {
        openapi: OPENAPI_VERSION.to_string(),
        info: ApiInfo {
            title: title.to_string(),
            version: version.to_string(),
            description: Some(description),
        },
        servers,
        paths: path_map,
        components: Components {
            schemas: registry.into_schemas(),
        },
    };

    tracing::info!(
        "Assembled OpenAPI document '{}': {} paths, {} schemas",
        spec.info.title,
        spec.paths.len(),
        spec.components.schemas.len()
    );

    (spec, conflicts)
}

impl OpenApiGenerator {
    /// Create a new OpenAPI generator
    pub fn new(config: OpenApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OpenApiConfig {
        &self.config
    }

    /// Generate a document from route descriptors.
    ///
    /// Fails only when `strict_schemas` is set and a schema name was
    /// registered with divergent bodies.
    pub fn generate(&self, routes: &[RouteDescriptor]) -> OpenApiResult<OpenApiSpec> {
        let (spec, conflicts) = build_document(
            routes,
            &self.config.title,
            &self.config.version,
            &self.config.description,
            self.config.document_servers(),
        );

        if self.config.strict_schemas && !conflicts.is_empty() {
            return Err(OpenApiError::schema_conflict(format!(
                "schema names registered with different shapes: {}",
                conflicts.join(", ")
            )));
        }

        Ok(spec)
    }

    /// Pull routes from `source` and generate a document
    pub fn generate_from<S: RouteSource + ?Sized>(&self, source: &S) -> OpenApiResult<OpenApiSpec> {
        let routes = source.routes()?;
        self.generate(&routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{
        Capability, FieldDescriptor, FieldKind, HttpMethod, ResourceDescriptor, TypeDescriptor,
    };
    use crate::responses::{ERROR_ENVELOPE, SUCCESS_ENVELOPE};

    fn item_route(path: &str, payload: TypeDescriptor) -> RouteDescriptor {
        RouteDescriptor::new(
            path,
            "item",
            ResourceDescriptor::resource("ItemViewSet", Capability::ALL).with_payload(payload),
        )
    }

    #[test]
    fn test_empty_routes_generation() {
        let spec = assemble(&[], "Test API", "1.0.0", "", Vec::new());

        assert_eq!(spec.openapi, "3.0.0");
        assert_eq!(spec.info.title, "Test API");
        assert_eq!(spec.info.description.as_deref(), Some("API documentation for Test API"));
        assert!(spec.paths.is_empty());
        assert_eq!(spec.servers, vec![Server::new("/").with_description("Default server")]);

        let names: Vec<&str> = spec.components.schemas.keys().map(String::as_str).collect();
        assert_eq!(names, vec![ERROR_ENVELOPE, SUCCESS_ENVELOPE]);
    }

    #[test]
    fn test_supplied_servers_and_description_are_kept() {
        let spec = assemble(
            &[],
            "Test API",
            "1.0.0",
            "Things",
            vec![Server::new("https://api.example.com")],
        );

        assert_eq!(spec.info.description.as_deref(), Some("Things"));
        assert_eq!(spec.servers.len(), 1);
        assert_eq!(spec.servers[0].url, "https://api.example.com");
    }

    #[test]
    fn test_non_api_handlers_are_skipped() {
        let routes = vec![RouteDescriptor::new(
            "admin",
            "admin",
            ResourceDescriptor::endpoint("AdminView", [HttpMethod::Get])
                .with_payload(TypeDescriptor::new("Admin", vec![]))
                .not_api(),
        )];

        let spec = assemble(&routes, "Test API", "1.0.0", "", Vec::new());
        assert!(spec.paths.is_empty());
        assert!(!spec.components.schemas.contains_key("Admin"));
    }

    #[test]
    fn test_payload_and_entity_schemas_registered() {
        let route = RouteDescriptor::new(
            "items",
            "item",
            ResourceDescriptor::resource("ItemViewSet", Capability::READ_ONLY)
                .with_payload(TypeDescriptor::new(
                    "ItemSerializer",
                    vec![FieldDescriptor::new("name", FieldKind::String)],
                ))
                .with_entity(TypeDescriptor::new(
                    "Item",
                    vec![FieldDescriptor::new("name", FieldKind::String)],
                )),
        );

        let spec = assemble(&[route], "Test API", "1.0.0", "", Vec::new());
        assert!(spec.components.schemas.contains_key("ItemSerializer"));
        assert!(spec.components.schemas.contains_key("Item"));
        assert_eq!(spec.components.schemas.len(), 4);
    }

    #[test]
    fn test_strict_schemas_rejects_divergent_duplicates() {
        let routes = vec![
            item_route(
                "items",
                TypeDescriptor::new("Item", vec![FieldDescriptor::new("name", FieldKind::String)]),
            ),
            item_route(
                "legacy-items",
                TypeDescriptor::new("Item", vec![FieldDescriptor::new("size", FieldKind::Integer)]),
            ),
        ];

        let lenient = OpenApiGenerator::new(OpenApiConfig::default());
        let spec = lenient.generate(&routes).unwrap();
        assert!(spec.components.schemas["Item"].properties.contains_key("name"));

        let strict = OpenApiGenerator::new(OpenApiConfig::default().with_strict_schemas(true));
        assert!(matches!(
            strict.generate(&routes),
            Err(OpenApiError::SchemaConflict(_))
        ));
    }

    #[test]
    fn test_generate_from_propagates_source_errors() {
        struct Broken;

        impl RouteSource for Broken {
            fn routes(&self) -> OpenApiResult<Vec<RouteDescriptor>> {
                Err(OpenApiError::route_source_error("registry unavailable"))
            }
        }

        let generator = OpenApiGenerator::new(OpenApiConfig::default());
        assert!(matches!(
            generator.generate_from(&Broken),
            Err(OpenApiError::RouteSource(_))
        ));
    }
}
