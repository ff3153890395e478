/*!
Route extraction.

The generator never reads a framework's global route table. Routes are
handed to it through a [`RouteSource`]; this module also provides the nested
[`RouteNode`] tree most frameworks register routes as, and a file-backed
[`RouteManifest`] for snapshots exported by the host application.
*/

use crate::{
    descriptor::{ResourceDescriptor, RouteDescriptor},
    error::OpenApiResult,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Anything that can produce the flat, ordered route list.
///
/// Errors returned here are the only fatal conditions of generation and are
/// passed to the caller unchanged.
pub trait RouteSource {
    fn routes(&self) -> OpenApiResult<Vec<RouteDescriptor>>;
}

impl RouteSource for [RouteDescriptor] {
    fn routes(&self) -> OpenApiResult<Vec<RouteDescriptor>> {
        Ok(self.to_vec())
    }
}

impl RouteSource for Vec<RouteDescriptor> {
    fn routes(&self) -> OpenApiResult<Vec<RouteDescriptor>> {
        Ok(self.clone())
    }
}

/// A registered route or a group of routes sharing a prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteNode {
    Endpoint {
        pattern: String,
        #[serde(default)]
        name: Option<String>,
        /// `None` for function handlers the introspector cannot describe
        #[serde(default)]
        handler: Option<ResourceDescriptor>,
    },
    Group {
        prefix: String,
        #[serde(default)]
        routes: Vec<RouteNode>,
    },
}

impl RouteNode {
    pub fn endpoint(pattern: &str, name: &str, handler: ResourceDescriptor) -> Self {
        Self::Endpoint {
            pattern: pattern.to_string(),
            name: Some(name.to_string()),
            handler: Some(handler),
        }
    }

    pub fn group(prefix: &str, routes: Vec<RouteNode>) -> Self {
        Self::Group {
            prefix: prefix.to_string(),
            routes,
        }
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<RouteDescriptor>) {
        match self {
            Self::Endpoint {
                pattern,
                name,
                handler,
            } => match handler {
                Some(resource) => out.push(RouteDescriptor {
                    raw_path: format!("{}{}", prefix, pattern),
                    name: name.clone().unwrap_or_default(),
                    resource: resource.clone(),
                }),
                None => {
                    tracing::debug!("Skipping route '{}{}' without a described handler", prefix, pattern);
                }
            },
            Self::Group { prefix: own, routes } => {
                let nested = format!("{}{}", prefix, own);
                for route in routes {
                    route.flatten_into(&nested, out);
                }
            }
        }
    }
}

/// Flatten a route tree depth-first, concatenating group prefixes
pub fn flatten(nodes: &[RouteNode]) -> Vec<RouteDescriptor> {
    let mut routes = Vec::new();
    for node in nodes {
        node.flatten_into("", &mut routes);
    }
    routes
}

/// Route tree snapshot, typically exported by the host application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteManifest {
    pub routes: Vec<RouteNode>,
}

impl RouteManifest {
    pub fn new(routes: Vec<RouteNode>) -> Self {
        Self { routes }
    }

    pub fn from_json(content: &str) -> OpenApiResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> OpenApiResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a manifest, choosing the format from the file extension and
    /// falling back to sniffing the content.
    pub fn from_path<P: AsRef<Path>>(path: P) -> OpenApiResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;

        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension.to_lowercase().as_str() {
            "json" => Self::from_json(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            _ => {
                let trimmed = content.trim_start();
                if trimmed.starts_with('[') || trimmed.starts_with('{') {
                    Self::from_json(&content)
                } else {
                    Self::from_yaml(&content)
                }
            }
        }
    }
}

impl RouteSource for RouteManifest {
    fn routes(&self) -> OpenApiResult<Vec<RouteDescriptor>> {
        Ok(flatten(&self.routes))
    }
}
