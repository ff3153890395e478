use crate::{
    actions,
    descriptor::{Capability, Dispatch, HttpMethod, ResourceDescriptor, RouteDescriptor},
    responses::build_responses,
    specification::{json_content, Operation, Parameter, PathItem, RequestBody, Schema},
};
use std::collections::BTreeMap;

/// Normalize a registered path pattern into a document path key.
///
/// Trailing `$` anchors are stripped and the result starts with exactly one
/// `/`; everything else (templated segments included) is kept as is.
pub fn normalize_path(raw: &str) -> String {
    let path = raw.trim_end_matches('$').trim_start_matches('/');
    format!("/{}", path)
}

/// Path of the single-instance routes below `base`
pub fn detail_path(base: &str) -> String {
    format!("{}/{{id}}/", base.trim_end_matches('/'))
}

/// Build the path items a single route contributes.
///
/// Operations landing on the same path (and method) within one route follow
/// the same last-writer-wins rule as [`merge_paths`].
pub fn build(route: &RouteDescriptor) -> BTreeMap<String, PathItem> {
    let base = normalize_path(&route.raw_path);
    let resource = &route.resource;
    let mut items: BTreeMap<String, PathItem> = BTreeMap::new();

    match &resource.dispatch {
        Dispatch::Resource {
            capabilities,
            custom_actions,
        } => {
            for (name, action) in actions::resolve(capabilities, custom_actions) {
                let path = if action.detail {
                    detail_path(&base)
                } else {
                    base.clone()
                };
                let operation = build_operation(resource, Some(&name), action.method, action.detail);
                items.entry(path).or_default().insert(action.method, operation);
            }
        }
        Dispatch::Endpoint { methods } => {
            for method in HttpMethod::ALL.into_iter().filter(|m| methods.contains(m)) {
                let operation = build_operation(resource, None, method, false);
                items.entry(base.clone()).or_default().insert(method, operation);
            }
        }
    }

    items
}

/// Union `incoming` into `paths`; same path and method means the incoming
/// operation replaces the existing one.
pub fn merge_paths(paths: &mut BTreeMap<String, PathItem>, incoming: BTreeMap<String, PathItem>) {
    for (path, item) in incoming {
        paths.entry(path).or_default().merge(item);
    }
}

fn build_operation(
    resource: &ResourceDescriptor,
    action_name: Option<&str>,
    method: HttpMethod,
    is_detail: bool,
) -> Operation {
    let is_resource_route = matches!(resource.dispatch, Dispatch::Resource { .. });
    let takes_id = is_detail
        || (is_resource_route
            && matches!(method, HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete));

    let parameters = if takes_id { vec![id_parameter()] } else { Vec::new() };

    let schema_name = resource.schema_name();
    let request_body = if method.is_write() {
        schema_name.map(json_request_body)
    } else {
        None
    };

    let is_list = method == HttpMethod::Get && action_name == Some(Capability::List.action_name());

    Operation {
        summary: operation_summary(resource, action_name, method),
        operation_id: operation_id(resource, action_name, method),
        tags: vec![resource.display_name().to_string()],
        parameters,
        request_body,
        responses: build_responses(schema_name, method, is_list),
    }
}

fn id_parameter() -> Parameter {
    Parameter {
        name: "id".to_string(),
        location: "path".to_string(),
        required: true,
        schema: Schema::of_type("integer"),
        description: Some("Resource identifier".to_string()),
    }
}

fn json_request_body(schema_name: &str) -> RequestBody {
    RequestBody {
        required: true,
        content: json_content(Schema::component_ref(schema_name)),
    }
}

/// `partial_update` -> `Partial Update`; `GET` on `HealthView` -> `Health GET`
pub fn operation_summary(
    resource: &ResourceDescriptor,
    action_name: Option<&str>,
    method: HttpMethod,
) -> String {
    match action_name {
        Some(action) => title_case(&action.replace('_', " ")),
        None => format!("{} {}", resource.display_name(), method),
    }
}

/// `{resource key}_{action}`, or `{resource key}_{method}` without an action
pub fn operation_id(
    resource: &ResourceDescriptor,
    action_name: Option<&str>,
    method: HttpMethod,
) -> String {
    match action_name {
        Some(action) => format!("{}_{}", resource.resource_key(), action),
        None => format!("{}_{}", resource.resource_key(), method.as_str()),
    }
}

/// Uppercase letters that follow a non-letter, lowercase the rest
fn title_case(text: &str) -> String {
    let mut previous_is_letter = false;
    text.chars()
        .map(|c| {
            let mapped = if !c.is_alphabetic() {
                c.to_string()
            } else if previous_is_letter {
                c.to_lowercase().to_string()
            } else {
                c.to_uppercase().to_string()
            };
            previous_is_letter = c.is_alphabetic();
            mapped
        })
        .collect()
}
