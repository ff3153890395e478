/*!
Descriptors consumed by the generator.

These are the plain values the introspection collaborator extracts from a
host framework: fields, payload/entity types, resources and their routes.
Nothing in the engine inspects live framework objects; everything it knows
arrives through these types.
*/

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Introspected class of a field.
///
/// Parsing is total: any name outside the known set becomes
/// [`FieldKind::Custom`] so that a new field class can never stop
/// generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    String,
    Text,
    Integer,
    BigInteger,
    SmallInteger,
    PositiveInteger,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Time,
    Email,
    Url,
    Uuid,
    Json,
    File,
    Image,
    /// Nested collection of values
    List,
    /// Nested object
    Nested,
    Custom(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::BigInteger => "big_integer",
            Self::SmallInteger => "small_integer",
            Self::PositiveInteger => "positive_integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::Time => "time",
            Self::Email => "email",
            Self::Url => "url",
            Self::Uuid => "uuid",
            Self::Json => "json",
            Self::File => "file",
            Self::Image => "image",
            Self::List => "list",
            Self::Nested => "nested",
            Self::Custom(name) => name,
        }
    }
}

impl FromStr for FieldKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match normalize_kind(s).as_str() {
            "string" | "char" | "slug" => Self::String,
            "text" => Self::Text,
            "integer" | "int" => Self::Integer,
            "big_integer" => Self::BigInteger,
            "small_integer" => Self::SmallInteger,
            "positive_integer" => Self::PositiveInteger,
            "float" | "number" => Self::Float,
            "decimal" => Self::Decimal,
            "boolean" | "bool" | "null_boolean" => Self::Boolean,
            "date" => Self::Date,
            "date_time" | "datetime" => Self::DateTime,
            "time" => Self::Time,
            "email" => Self::Email,
            "url" | "uri" => Self::Url,
            "uuid" => Self::Uuid,
            "json" => Self::Json,
            "file" => Self::File,
            "image" => Self::Image,
            "list" | "array" => Self::List,
            "nested" | "object" => Self::Nested,
            _ => Self::Custom(s.to_string()),
        };
        Ok(kind)
    }
}

/// `DateTimeField`, `date-time` and `date_time` all become `date_time`.
///
/// A trailing `Field` is dropped, and an uppercase letter following a
/// lowercase letter or digit starts a new word, so `URLField` stays `url`.
fn normalize_kind(raw: &str) -> String {
    let trimmed = raw.trim();
    let base = match trimmed.strip_suffix("Field") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => trimmed,
    };

    let mut normalized = String::with_capacity(base.len() + 4);
    let mut previous: Option<char> = None;
    for c in base.chars() {
        if c.is_ascii_uppercase()
            && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            normalized.push('_');
        }
        normalized.push(if c == '-' { '_' } else { c.to_ascii_lowercase() });
        previous = Some(c);
    }
    normalized
}

impl From<String> for FieldKind {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a payload or entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    /// Entity columns only: the column accepts NULL
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    /// Entity columns only: the column accepts an empty value
    #[serde(default, skip_serializing_if = "is_false")]
    pub blank: bool,
}

impl FieldDescriptor {
    /// A required field with no optional metadata
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            format: None,
            description: None,
            default: None,
            enum_values: None,
            nullable: false,
            blank: false,
        }
    }

    /// Required-ness of a persisted entity column: required iff it is
    /// neither nullable nor blank-allowed.
    pub fn entity_required(nullable: bool, blank: bool) -> bool {
        !nullable && !blank
    }

    /// Whether this field is required when it describes an entity column
    pub fn is_entity_required(&self) -> bool {
        Self::entity_required(self.nullable, self.blank)
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_enum(mut self, values: Vec<serde_json::Value>) -> Self {
        self.enum_values = Some(values);
        self
    }
}

/// A payload (request/response) or entity (persisted model) type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: &str, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }
}

/// HTTP methods, in the order handlers are checked for them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Trace,
    ];

    /// Lowercase name, as used for path item keys and operation IDs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
            Self::Trace => "trace",
        }
    }

    /// Methods that carry a request body
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            "head" => Ok(Self::Head),
            "options" => Ok(Self::Options),
            "trace" => Ok(Self::Trace),
            _ => Err(format!("Unsupported HTTP method: {}", s)),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Standard resource capabilities, ordered as they are documented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    List,
    Create,
    Retrieve,
    Update,
    PartialUpdate,
    Destroy,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::List,
        Capability::Create,
        Capability::Retrieve,
        Capability::Update,
        Capability::PartialUpdate,
        Capability::Destroy,
    ];

    /// Read-only subset (list + retrieve)
    pub const READ_ONLY: [Capability; 2] = [Capability::List, Capability::Retrieve];

    /// Action name used for summaries and operation IDs
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Retrieve => "retrieve",
            Self::Update => "update",
            Self::PartialUpdate => "partial_update",
            Self::Destroy => "destroy",
        }
    }
}

/// Extra action declared on a resource beyond the standard capabilities.
///
/// Every field may be missing or malformed; values of the wrong shape are
/// read as missing, and resolution then fills in defaults or skips the
/// action instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub url_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_methods")]
    pub methods: Vec<String>,
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub detail: Option<bool>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => {
            tracing::warn!("Ignoring non-string action name: {}", other);
            Ok(None)
        }
    }
}

fn lenient_methods<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(method) => Some(method),
                other => {
                    tracing::warn!("Ignoring non-string action method: {}", other);
                    None
                }
            })
            .collect()),
        other => {
            tracing::warn!("Ignoring action methods that are not a list: {}", other);
            Ok(Vec::new())
        }
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(flag)),
        other => {
            tracing::warn!("Ignoring non-boolean action detail flag: {}", other);
            Ok(None)
        }
    }
}

impl ActionDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_methods(mut self, methods: &[&str]) -> Self {
        self.methods = methods.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn detail(mut self, detail: bool) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// How a handler dispatches requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum Dispatch {
    /// Resource-style handler with collection and detail routes
    Resource {
        #[serde(default)]
        capabilities: BTreeSet<Capability>,
        #[serde(default)]
        custom_actions: Vec<ActionDescriptor>,
    },
    /// Single endpoint answering the listed methods
    Endpoint {
        #[serde(default)]
        methods: Vec<HttpMethod>,
    },
}

/// A request handler and what it exposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Handler name, e.g. `ItemViewSet`
    pub name: String,
    #[serde(default = "default_true")]
    pub api_capable: bool,
    pub dispatch: Dispatch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<TypeDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<TypeDescriptor>,
}

impl ResourceDescriptor {
    /// Resource-style handler with the given capabilities
    pub fn resource<I>(name: &str, capabilities: I) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        Self {
            name: name.to_string(),
            api_capable: true,
            dispatch: Dispatch::Resource {
                capabilities: capabilities.into_iter().collect(),
                custom_actions: Vec::new(),
            },
            payload: None,
            entity: None,
        }
    }

    /// Single-endpoint handler answering `methods`
    pub fn endpoint<I>(name: &str, methods: I) -> Self
    where
        I: IntoIterator<Item = HttpMethod>,
    {
        Self {
            name: name.to_string(),
            api_capable: true,
            dispatch: Dispatch::Endpoint {
                methods: methods.into_iter().collect(),
            },
            payload: None,
            entity: None,
        }
    }

    pub fn with_payload(mut self, payload: TypeDescriptor) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_entity(mut self, entity: TypeDescriptor) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Add a custom action; ignored for single-endpoint handlers
    pub fn with_action(mut self, action: ActionDescriptor) -> Self {
        if let Dispatch::Resource { custom_actions, .. } = &mut self.dispatch {
            custom_actions.push(action);
        }
        self
    }

    pub fn not_api(mut self) -> Self {
        self.api_capable = false;
        self
    }

    /// Name shown in tags and summaries: the handler name without its
    /// `ViewSet`/`View` suffix.
    pub fn display_name(&self) -> &str {
        let stripped = self
            .name
            .strip_suffix("ViewSet")
            .or_else(|| self.name.strip_suffix("View"))
            .unwrap_or(&self.name);
        if stripped.is_empty() {
            &self.name
        } else {
            stripped
        }
    }

    /// Lowercased key used as the operation ID prefix
    pub fn resource_key(&self) -> String {
        self.name
            .to_lowercase()
            .replace("viewset", "")
            .replace("view", "")
    }

    pub fn payload_schema_name(&self) -> Option<&str> {
        self.payload.as_ref().map(|t| t.name.as_str())
    }

    pub fn entity_schema_name(&self) -> Option<&str> {
        self.entity.as_ref().map(|t| t.name.as_str())
    }

    /// Schema used for request and response bodies, payload preferred
    pub fn schema_name(&self) -> Option<&str> {
        self.payload_schema_name().or_else(|| self.entity_schema_name())
    }
}

/// One registered route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Path pattern as registered, e.g. `api/items$`
    pub raw_path: String,
    #[serde(default)]
    pub name: String,
    pub resource: ResourceDescriptor,
}

impl RouteDescriptor {
    pub fn new(raw_path: &str, name: &str, resource: ResourceDescriptor) -> Self {
        Self {
            raw_path: raw_path.to_string(),
            name: name.to_string(),
            resource,
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}
