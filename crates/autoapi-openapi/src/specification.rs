use crate::{descriptor::HttpMethod, error::OpenApiResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OpenAPI version emitted in every generated document
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Media type used for every request and response body
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Complete OpenAPI 3.0 document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// OpenAPI specification version
    pub openapi: String,

    /// API metadata
    pub info: ApiInfo,

    /// Server URLs
    #[serde(default)]
    pub servers: Vec<Server>,

    /// API paths and operations, keyed by normalized path
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,

    /// Reusable components
    #[serde(default)]
    pub components: Components,
}

/// API metadata information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    /// API title
    pub title: String,

    /// API version
    pub version: String,

    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Server URL
    pub url: String,

    /// Server description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Server {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Path item containing operations for a specific path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Trace => &mut self.trace,
        }
    }

    /// Get the operation registered for a method
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    /// Set the operation for a method, replacing any previous one
    pub fn insert(&mut self, method: HttpMethod, operation: Operation) {
        *self.slot_mut(method) = Some(operation);
    }

    /// Union another path item into this one; operations from `other` win
    /// for methods present in both.
    pub fn merge(&mut self, mut other: PathItem) {
        for method in HttpMethod::ALL {
            if let Some(operation) = other.slot_mut(method).take() {
                self.insert(method, operation);
            }
        }
    }

    /// Methods with an operation, in canonical order
    pub fn methods(&self) -> Vec<HttpMethod> {
        HttpMethod::ALL
            .into_iter()
            .filter(|method| self.operation(*method).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.methods().is_empty()
    }
}

/// HTTP operation (GET, POST, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Operation {
    /// Short summary
    pub summary: String,

    /// Unique operation ID
    #[serde(rename = "operationId")]
    pub operation_id: String,

    /// Tags for grouping
    #[serde(default)]
    pub tags: Vec<String>,

    /// Parameters
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,

    /// Request body
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    /// Possible responses, keyed by status code
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// Parameter for operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,

    /// Parameter location (query, header, path, cookie)
    #[serde(rename = "in")]
    pub location: String,

    /// Required flag
    pub required: bool,

    /// Schema defining the parameter
    pub schema: Schema,

    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Required flag
    pub required: bool,

    /// Media type content
    pub content: BTreeMap<String, MediaType>,
}

/// Response specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Description
    pub description: String,

    /// Content
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub content: BTreeMap<String, MediaType>,
}

impl Response {
    /// Response without a body
    pub fn empty(description: &str) -> Self {
        Self {
            description: description.to_string(),
            content: BTreeMap::new(),
        }
    }

    /// Response with a JSON body described by `schema`
    pub fn json(description: &str, schema: Schema) -> Self {
        Self {
            description: description.to_string(),
            content: json_content(schema),
        }
    }

    /// Schema of the JSON body, if any
    pub fn json_schema(&self) -> Option<&Schema> {
        self.content.get(CONTENT_TYPE_JSON).map(|media| &media.schema)
    }
}

/// Media type specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Schema,
}

/// Single-entry `application/json` content map
pub fn json_content(schema: Schema) -> BTreeMap<String, MediaType> {
    let mut content = BTreeMap::new();
    content.insert(CONTENT_TYPE_JSON.to_string(), MediaType { schema });
    content
}

/// JSON-Schema fragment as used by OpenAPI 3.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Schema {
    /// Reference to a component schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Data type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Format specifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty", default)]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    /// Properties for object types, in declaration order
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub properties: IndexMap<String, Schema>,

    /// Required properties
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,

    /// Items schema for arrays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// AllOf composition
    #[serde(rename = "allOf", skip_serializing_if = "Vec::is_empty", default)]
    pub all_of: Vec<Schema>,
}

impl Schema {
    /// Schema of a bare type, e.g. `{"type": "string"}`
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Default::default()
        }
    }

    /// `$ref` to a named component schema
    pub fn component_ref(name: &str) -> Self {
        Self {
            reference: Some(component_ref_path(name)),
            ..Default::default()
        }
    }

    /// Array of `items`
    pub fn array_of(items: Schema) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// `#/components/schemas/{name}`
pub fn component_ref_path(name: &str) -> String {
    format!("#/components/schemas/{}", name)
}

/// Reusable components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Components {
    /// Reusable schemas
    #[serde(default)]
    pub schemas: BTreeMap<String, Schema>,
}

impl OpenApiSpec {
    /// Serialize the document as JSON
    pub fn to_json(&self, pretty: bool) -> OpenApiResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Serialize the document as YAML
    pub fn to_yaml(&self) -> OpenApiResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(id: &str) -> Operation {
        Operation {
            summary: id.to_string(),
            operation_id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_path_item_merge_unions_methods() {
        let mut collection = PathItem::default();
        collection.insert(HttpMethod::Get, operation("item_list"));

        let mut other = PathItem::default();
        other.insert(HttpMethod::Post, operation("item_create"));

        collection.merge(other);
        assert_eq!(collection.methods(), vec![HttpMethod::Get, HttpMethod::Post]);
    }

    #[test]
    fn test_path_item_merge_last_writer_wins_per_method() {
        let mut item = PathItem::default();
        item.insert(HttpMethod::Get, operation("first"));

        let mut later = PathItem::default();
        later.insert(HttpMethod::Get, operation("second"));
        item.merge(later);

        assert_eq!(item.get.unwrap().operation_id, "second");
    }

    #[test]
    fn test_schema_skips_empty_collections() {
        let value = serde_json::to_value(Schema::of_type("object")).unwrap();
        assert_eq!(value, serde_json::json!({"type": "object"}));
    }

    #[test]
    fn test_component_ref_serializes_as_dollar_ref() {
        let value = serde_json::to_value(Schema::component_ref("Item")).unwrap();
        assert_eq!(value, serde_json::json!({"$ref": "#/components/schemas/Item"}));
    }
}
