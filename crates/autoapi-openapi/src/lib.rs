/*!
# autoapi-openapi

OpenAPI 3.0 document generation from declarative resource metadata.

Routes describe resources by their capabilities (`list`, `create`, ...),
custom actions and payload/entity field descriptors. This crate turns them
into a complete OpenAPI document with JSend-style response envelopes, and
serves that document together with an interactive Swagger UI page.

## Features

- Field descriptor to JSON-Schema mapping
- Capability and custom-action resolution into collection/detail paths
- Shared success/error response envelopes
- Deduplicated component schemas
- Time-based document caching and an axum router for the viewer

## Usage

```rust,no_run
use autoapi_openapi::{
    descriptor::{Capability, ResourceDescriptor, RouteDescriptor},
    OpenApiConfig, OpenApiGenerator,
};

let routes = vec![RouteDescriptor::new(
    "items/",
    "item-list",
    ResourceDescriptor::resource("ItemViewSet", Capability::ALL),
)];

let generator = OpenApiGenerator::new(OpenApiConfig::new("Shop API", "1.0.0"));
let spec = generator.generate(&routes).unwrap();
println!("{}", spec.to_json(true).unwrap());
```
*/

// Re-export main types
pub use crate::{
    cache::CachedDocument,
    config::OpenApiConfig,
    error::{OpenApiError, OpenApiResult},
    generator::{assemble, OpenApiGenerator},
    registry::SchemaRegistry,
    routes::{RouteManifest, RouteNode, RouteSource},
    schema::TypeMapper,
    specification::OpenApiSpec,
    swagger::{openapi_routes, swagger_ui_html, DocumentProvider},
};

// Core modules
pub mod config;
pub mod error;
pub mod generator;
pub mod specification;

// Route metadata
pub mod descriptor;
pub mod routes;

// Schema construction
pub mod actions;
pub mod paths;
pub mod registry;
pub mod responses;
pub mod schema;

// Caching
pub mod cache;

// Export functionality
pub mod export;

// Interactive documentation
pub mod swagger;
