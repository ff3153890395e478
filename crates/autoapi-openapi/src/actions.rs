use crate::descriptor::{ActionDescriptor, Capability, HttpMethod};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// How a resolved action is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAction {
    pub method: HttpMethod,
    /// Detail actions address a single instance through `/{id}/`
    pub detail: bool,
}

/// Fixed method/scope for each standard capability
pub fn capability_route(capability: Capability) -> ResolvedAction {
    let (method, detail) = match capability {
        Capability::List => (HttpMethod::Get, false),
        Capability::Create => (HttpMethod::Post, false),
        Capability::Retrieve => (HttpMethod::Get, true),
        Capability::Update => (HttpMethod::Put, true),
        Capability::PartialUpdate => (HttpMethod::Patch, true),
        Capability::Destroy => (HttpMethod::Delete, true),
    };
    ResolvedAction { method, detail }
}

/// Resolve the actions a resource exposes, keyed by action name.
///
/// Standard capabilities come first in their canonical order, then custom
/// actions in declaration order. A custom action reusing a name replaces the
/// earlier entry in place.
pub fn resolve(
    capabilities: &BTreeSet<Capability>,
    custom_actions: &[ActionDescriptor],
) -> IndexMap<String, ResolvedAction> {
    let mut actions = IndexMap::new();

    for capability in capabilities {
        actions.insert(
            capability.action_name().to_string(),
            capability_route(*capability),
        );
    }

    for action in custom_actions {
        match resolve_custom(action) {
            Some((name, resolved)) => {
                actions.insert(name, resolved);
            }
            None => {
                tracing::warn!("Skipping custom action without a name: {:?}", action);
            }
        }
    }

    actions
}

fn resolve_custom(action: &ActionDescriptor) -> Option<(String, ResolvedAction)> {
    let name = action
        .url_name
        .as_deref()
        .or(action.name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    let method = action
        .methods
        .iter()
        .find_map(|method| method.parse::<HttpMethod>().ok())
        .unwrap_or(HttpMethod::Get);

    Some((
        name.to_string(),
        ResolvedAction {
            method,
            detail: action.detail.unwrap_or(false),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(list: &[Capability]) -> BTreeSet<Capability> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_full_capability_set() {
        let actions = resolve(&caps(&Capability::ALL), &[]);

        let names: Vec<&str> = actions.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["list", "create", "retrieve", "update", "partial_update", "destroy"]
        );
        assert_eq!(actions["list"], ResolvedAction { method: HttpMethod::Get, detail: false });
        assert_eq!(actions["create"].method, HttpMethod::Post);
        assert_eq!(actions["update"], ResolvedAction { method: HttpMethod::Put, detail: true });
        assert_eq!(actions["partial_update"].method, HttpMethod::Patch);
        assert_eq!(actions["destroy"], ResolvedAction { method: HttpMethod::Delete, detail: true });
    }

    #[test]
    fn test_only_declared_capabilities() {
        let actions = resolve(&caps(&[Capability::Retrieve, Capability::List]), &[]);
        let names: Vec<&str> = actions.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["list", "retrieve"]);
    }

    #[test]
    fn test_custom_actions_append() {
        let custom = vec![
            ActionDescriptor::new("publish").with_methods(&["post", "put"]).detail(true),
            ActionDescriptor::new("recent"),
        ];
        let actions = resolve(&caps(&[Capability::List]), &custom);

        assert_eq!(actions.len(), 3);
        assert_eq!(actions["publish"], ResolvedAction { method: HttpMethod::Post, detail: true });
        assert_eq!(actions["recent"], ResolvedAction { method: HttpMethod::Get, detail: false });
    }

    #[test]
    fn test_url_name_takes_precedence() {
        let mut action = ActionDescriptor::new("set_password");
        action.url_name = Some("set-password".to_string());

        let actions = resolve(&BTreeSet::new(), &[action]);
        assert!(actions.contains_key("set-password"));
    }

    #[test]
    fn test_malformed_custom_actions_degrade() {
        let nameless = ActionDescriptor {
            methods: vec!["post".to_string()],
            ..Default::default()
        };
        let bad_method = ActionDescriptor::new("export").with_methods(&["brew"]);

        let actions = resolve(&BTreeSet::new(), &[nameless, bad_method]);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions["export"], ResolvedAction { method: HttpMethod::Get, detail: false });
    }
}
