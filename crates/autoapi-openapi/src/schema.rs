use crate::{
    descriptor::{FieldDescriptor, FieldKind, TypeDescriptor},
    specification::Schema,
};
use indexmap::IndexMap;

type KindPredicate = fn(&FieldKind) -> bool;

/// One row of the type table: fields matching `matches` map to
/// `schema_type` (+ `format`).
struct TypeRule {
    matches: KindPredicate,
    schema_type: &'static str,
    format: Option<&'static str>,
}

/// Evaluated top to bottom; the first matching rule wins.
static TYPE_RULES: [TypeRule; 14] = [
    TypeRule { matches: is_text, schema_type: "string", format: None },
    TypeRule { matches: is_integer, schema_type: "integer", format: None },
    TypeRule { matches: is_number, schema_type: "number", format: None },
    TypeRule { matches: is_boolean, schema_type: "boolean", format: None },
    TypeRule { matches: is_date, schema_type: "string", format: Some("date") },
    TypeRule { matches: is_date_time, schema_type: "string", format: Some("date-time") },
    TypeRule { matches: is_time, schema_type: "string", format: Some("time") },
    TypeRule { matches: is_email, schema_type: "string", format: Some("email") },
    TypeRule { matches: is_url, schema_type: "string", format: Some("uri") },
    TypeRule { matches: is_uuid, schema_type: "string", format: Some("uuid") },
    TypeRule { matches: is_json, schema_type: "object", format: None },
    TypeRule { matches: is_binary, schema_type: "string", format: Some("binary") },
    TypeRule { matches: is_collection, schema_type: "array", format: None },
    TypeRule { matches: is_nested, schema_type: "object", format: None },
];

fn is_text(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::String | FieldKind::Text)
}

fn is_integer(kind: &FieldKind) -> bool {
    matches!(
        kind,
        FieldKind::Integer
            | FieldKind::BigInteger
            | FieldKind::SmallInteger
            | FieldKind::PositiveInteger
    )
}

fn is_number(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Float | FieldKind::Decimal)
}

fn is_boolean(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Boolean)
}

fn is_date(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Date)
}

fn is_date_time(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::DateTime)
}

fn is_time(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Time)
}

fn is_email(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Email)
}

fn is_url(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Url)
}

fn is_uuid(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Uuid)
}

fn is_json(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Json)
}

fn is_binary(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::File | FieldKind::Image)
}

fn is_collection(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::List)
}

fn is_nested(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Nested)
}

/// Maps field descriptors to JSON-Schema fragments
pub struct TypeMapper;

impl TypeMapper {
    /// Map a field to its schema fragment.
    ///
    /// Never fails: kinds without a rule degrade to `{"type": "string"}`.
    pub fn map(field: &FieldDescriptor) -> Schema {
        let mut schema = Self::base_schema(&field.kind);

        if let Some(format) = &field.format {
            schema.format = Some(format.clone());
        }
        if let Some(description) = &field.description {
            schema.description = Some(description.clone());
        }
        if let Some(default) = &field.default {
            schema.default = Some(default.clone());
        }
        if let Some(values) = &field.enum_values {
            schema.enum_values = values.clone();
        }

        schema
    }

    fn base_schema(kind: &FieldKind) -> Schema {
        match TYPE_RULES.iter().find(|rule| (rule.matches)(kind)) {
            Some(rule) => {
                let schema = Schema::of_type(rule.schema_type);
                match rule.format {
                    Some(format) => schema.with_format(format),
                    None => schema,
                }
            }
            None => {
                tracing::debug!("No schema rule for field kind '{}', using string", kind);
                Schema::of_type("string")
            }
        }
    }
}

/// Object schema for a request/response payload type
pub fn payload_schema(payload: &TypeDescriptor) -> Schema {
    object_schema(IndexMap::new(), payload.fields.iter(), |field| field.required)
}

/// Object schema for a persisted entity type.
///
/// The primary key is always documented as an integer `id`; columns named
/// `id` or `pk` in the descriptor are skipped. A column is required iff it is
/// neither nullable nor blank-allowed.
pub fn entity_schema(entity: &TypeDescriptor) -> Schema {
    let mut properties = IndexMap::new();
    properties.insert(
        "id".to_string(),
        Schema::of_type("integer").with_description("Primary key"),
    );

    let fields = entity
        .fields
        .iter()
        .filter(|field| field.name != "id" && field.name != "pk");

    object_schema(properties, fields, FieldDescriptor::is_entity_required)
}

fn object_schema<'a, I>(
    mut properties: IndexMap<String, Schema>,
    fields: I,
    is_required: fn(&FieldDescriptor) -> bool,
) -> Schema
where
    I: Iterator<Item = &'a FieldDescriptor>,
{
    let mut required = Vec::new();
    for field in fields {
        properties.insert(field.name.clone(), TypeMapper::map(field));
        if is_required(field) {
            required.push(field.name.clone());
        }
    }

    Schema {
        schema_type: Some("object".to_string()),
        properties,
        required,
        ..Default::default()
    }
}
