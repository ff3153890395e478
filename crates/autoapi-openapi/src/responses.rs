/*!
Uniform response envelope.

Every payload travels inside a status envelope: successes as
`{"status": "success", "data": ...}`, failures as
`{"status": "fail" | "error", "data"?, "message"?, "code"?}`. The two shapes
are shared component schemas; operations reference them and narrow `data`
to the resource schema.
*/

use crate::{
    descriptor::HttpMethod,
    specification::{Response, Schema},
};
use indexmap::IndexMap;
use serde_json::json;
use std::collections::BTreeMap;

/// Component name of the success envelope
pub const SUCCESS_ENVELOPE: &str = "JSendSuccess";

/// Component name of the error envelope
pub const ERROR_ENVELOPE: &str = "JSendError";

/// Both envelope shapes, keyed by component name
pub fn envelope_schemas() -> BTreeMap<String, Schema> {
    let mut schemas = BTreeMap::new();
    schemas.insert(SUCCESS_ENVELOPE.to_string(), success_envelope());
    schemas.insert(ERROR_ENVELOPE.to_string(), error_envelope());
    schemas
}

fn success_envelope() -> Schema {
    let mut properties = IndexMap::new();
    properties.insert(
        "status".to_string(),
        Schema {
            enum_values: vec![json!("success")],
            example: Some(json!("success")),
            ..Schema::of_type("string")
        },
    );
    properties.insert(
        "data".to_string(),
        Schema::of_type("object").with_description("Response data"),
    );

    Schema {
        properties,
        required: vec!["status".to_string(), "data".to_string()],
        ..Schema::of_type("object")
    }
}

fn error_envelope() -> Schema {
    let mut properties = IndexMap::new();
    properties.insert(
        "status".to_string(),
        Schema {
            enum_values: vec![json!("fail"), json!("error")],
            ..Schema::of_type("string")
        },
    );
    properties.insert(
        "data".to_string(),
        Schema::of_type("object").with_description("Error details"),
    );
    properties.insert("message".to_string(), Schema::of_type("string"));
    properties.insert("code".to_string(), Schema::of_type("integer"));

    Schema {
        properties,
        required: vec!["status".to_string()],
        ..Schema::of_type("object")
    }
}

/// Build the response map for one operation.
///
/// DELETE answers `204` with no body. Other methods answer `201` (POST) or
/// `200` with the success envelope, narrowed to `schema_name` (or an array of
/// it when `is_list`) if a schema is known. The `400`/`404`/`500` error set
/// is attached to every operation.
pub fn build_responses(
    schema_name: Option<&str>,
    method: HttpMethod,
    is_list: bool,
) -> BTreeMap<String, Response> {
    let mut responses = BTreeMap::new();

    if method == HttpMethod::Delete {
        responses.insert("204".to_string(), Response::empty("No Content"));
    } else {
        let (status, description) = if method == HttpMethod::Post {
            ("201", "Created")
        } else {
            ("200", "Success")
        };
        responses.insert(
            status.to_string(),
            Response::json(description, success_schema(schema_name, is_list)),
        );
    }

    responses.extend(error_responses());
    responses
}

fn success_schema(schema_name: Option<&str>, is_list: bool) -> Schema {
    let envelope = Schema::component_ref(SUCCESS_ENVELOPE);

    let Some(name) = schema_name else {
        return envelope;
    };

    let data = if is_list {
        Schema::array_of(Schema::component_ref(name))
    } else {
        Schema::component_ref(name)
    };

    let mut narrowed = IndexMap::new();
    narrowed.insert("data".to_string(), data);

    Schema {
        all_of: vec![
            envelope,
            Schema {
                properties: narrowed,
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

/// The canned error set shared by every operation
pub fn error_responses() -> BTreeMap<String, Response> {
    let errors = [
        (
            "400",
            "Bad Request",
            json!({"status": "fail", "message": "Validation error", "data": {}}),
        ),
        (
            "404",
            "Not Found",
            json!({"status": "fail", "message": "Resource not found", "data": {}}),
        ),
        (
            "500",
            "Internal Server Error",
            json!({"status": "error", "message": "Internal server error", "code": 500}),
        ),
    ];

    errors
        .into_iter()
        .map(|(status, description, example)| {
            let schema = Schema {
                all_of: vec![
                    Schema::component_ref(ERROR_ENVELOPE),
                    Schema {
                        example: Some(example),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            };
            (status.to_string(), Response::json(description, schema))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(responses: &BTreeMap<String, Response>) -> Vec<&str> {
        responses.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_delete_has_no_payload() {
        let responses = build_responses(Some("Item"), HttpMethod::Delete, false);

        assert_eq!(keys(&responses), vec!["204", "400", "404", "500"]);
        assert!(responses["204"].content.is_empty());
    }

    #[test]
    fn test_post_answers_created() {
        let responses = build_responses(Some("Item"), HttpMethod::Post, false);
        assert_eq!(keys(&responses), vec!["201", "400", "404", "500"]);
        assert_eq!(responses["201"].description, "Created");
    }

    #[test]
    fn test_list_wraps_array() {
        let responses = build_responses(Some("Item"), HttpMethod::Get, true);
        let schema = serde_json::to_value(responses["200"].json_schema().unwrap()).unwrap();

        assert_eq!(
            schema,
            serde_json::json!({
                "allOf": [
                    {"$ref": "#/components/schemas/JSendSuccess"},
                    {"properties": {"data": {
                        "type": "array",
                        "items": {"$ref": "#/components/schemas/Item"}
                    }}}
                ]
            })
        );
    }

    #[test]
    fn test_single_wraps_reference() {
        let responses = build_responses(Some("Item"), HttpMethod::Get, false);
        let schema = responses["200"].json_schema().unwrap();
        let data = &schema.all_of[1].properties["data"];

        assert_eq!(data.reference.as_deref(), Some("#/components/schemas/Item"));
        assert!(data.items.is_none());
    }

    #[test]
    fn test_missing_schema_keeps_bare_envelope() {
        let responses = build_responses(None, HttpMethod::Put, false);
        let schema = responses["200"].json_schema().unwrap();

        assert_eq!(schema, &Schema::component_ref(SUCCESS_ENVELOPE));
    }

    #[test]
    fn test_error_examples_match_error_shape() {
        let errors = error_responses();
        let example = |status: &str| errors[status].json_schema().unwrap().all_of[1].example.clone();

        assert_eq!(example("400").unwrap()["status"], "fail");
        assert_eq!(example("404").unwrap()["message"], "Resource not found");
        assert_eq!(example("500").unwrap()["code"], 500);
    }

    #[test]
    fn test_envelope_schemas() {
        let schemas = envelope_schemas();
        assert_eq!(schemas.len(), 2);
        assert_eq!(
            schemas[SUCCESS_ENVELOPE].required,
            vec!["status".to_string(), "data".to_string()]
        );
        assert_eq!(
            schemas[ERROR_ENVELOPE].properties["status"].enum_values,
            vec![json!("fail"), json!("error")]
        );
    }
}
