//! Property-based tests using proptest
//!
//! These tests generate well formed ARM resource ids and verify round-trip
//! reconstruction, parent chain integrity and scope inheritance.

use arm_resource_sdk::{parse_resource_identifier, parse_resource_type, ResourceIdentifier};
use proptest::prelude::*;

const KEYWORDS: [&str; 4] = ["subscriptions", "resourcegroups", "providers", "locations"];

/// What directly follows the subscription.
#[derive(Debug, Clone)]
enum Scope {
    Subscription,
    ResourceGroup { keyword: String, name: String },
    Location { keyword: String, name: String },
    ProviderDeclaration { keyword: String, namespace: String },
}

#[derive(Debug, Clone)]
struct ProviderResource {
    namespace: String,
    resource_type: String,
    name: String,
    children: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct GeneratedId {
    subscriptions_keyword: String,
    subscription_id: String,
    scope: Scope,
    resource: Option<ProviderResource>,
    bare_child: Option<String>,
}

impl GeneratedId {
    fn render(&self) -> String {
        let mut id = format!("/{}/{}", self.subscriptions_keyword, self.subscription_id);

        match &self.scope {
            Scope::Subscription => {}
            Scope::ResourceGroup { keyword, name } | Scope::Location { keyword, name } => {
                id.push_str(&format!("/{}/{}", keyword, name));
            }
            Scope::ProviderDeclaration { keyword, namespace } => {
                id.push_str(&format!("/{}/{}", keyword, namespace));
            }
        }

        if let Some(resource) = &self.resource {
            id.push_str(&format!(
                "/providers/{}/{}/{}",
                resource.namespace, resource.resource_type, resource.name
            ));

            for (child_type, child_name) in &resource.children {
                id.push_str(&format!("/{}/{}", child_type, child_name));
            }
        }

        if let Some(bare_child) = &self.bare_child {
            id.push_str(&format!("/{}", bare_child));
        }

        id
    }

    fn depth(&self) -> usize {
        let scope = usize::from(!matches!(self.scope, Scope::Subscription));
        let resource = self.resource.as_ref().map_or(0, |r| 1 + r.children.len());

        1 + scope + resource + usize::from(self.bare_child.is_some())
    }

    fn resource_group_name(&self) -> Option<&str> {
        match &self.scope {
            Scope::ResourceGroup { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    fn location(&self) -> Option<&str> {
        match &self.scope {
            Scope::Location { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    fn provider(&self) -> Option<&str> {
        match &self.scope {
            Scope::ProviderDeclaration { namespace, .. } => Some(namespace.as_str()),
            _ => None,
        }
    }
}

/// Type segments that the parser will not mistake for a scope keyword
fn arb_type_segment() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z]{2,15}".prop_filter("type segment must not be a keyword", |s| {
        !KEYWORDS.iter().any(|k| s.eq_ignore_ascii_case(k))
    })
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9_.-]{0,20}"
}

fn arb_namespace() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}\\.[A-Z][a-zA-Z]{2,10}"
}

fn arb_scope() -> impl Strategy<Value = Scope> {
    prop_oneof![
        Just(Scope::Subscription),
        (prop_oneof!["resourceGroups", "RESOURCEGROUPS", "resourcegroups"], arb_name())
            .prop_map(|(keyword, name)| Scope::ResourceGroup { keyword, name }),
        (prop_oneof!["locations", "Locations"], arb_name())
            .prop_map(|(keyword, name)| Scope::Location { keyword, name }),
        (prop_oneof!["providers", "Providers"], arb_namespace())
            .prop_map(|(keyword, namespace)| Scope::ProviderDeclaration { keyword, namespace }),
    ]
}

fn arb_provider_resource() -> impl Strategy<Value = ProviderResource> {
    (
        arb_namespace(),
        arb_type_segment(),
        arb_name(),
        prop::collection::vec((arb_type_segment(), arb_name()), 0..4),
    )
        .prop_map(|(namespace, resource_type, name, children)| ProviderResource {
            namespace,
            resource_type,
            name,
            children,
        })
}

fn arb_id() -> impl Strategy<Value = GeneratedId> {
    (
        prop_oneof!["subscriptions", "SUBSCRIPTIONS", "Subscriptions"],
        "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
        arb_scope(),
        prop::option::of(arb_provider_resource()),
        prop::option::of(arb_type_segment()),
    )
        .prop_map(|(subscriptions_keyword, subscription_id, scope, resource, bare_child)| {
            // A bare type directly under a resource group or a provider
            // declaration is not a valid id.
            let bare_allowed = resource.is_some()
                || matches!(scope, Scope::Subscription | Scope::Location { .. });

            GeneratedId {
                subscriptions_keyword,
                subscription_id,
                scope,
                resource,
                bare_child: bare_child.filter(|_| bare_allowed),
            }
        })
}

proptest! {
    #[test]
    fn test_round_trip(generated in arb_id()) {
        let raw = generated.render();
        let id = parse_resource_identifier(&raw).unwrap();

        prop_assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_parent_chain_reaches_root(generated in arb_id()) {
        let raw = generated.render();
        let id = parse_resource_identifier(&raw).unwrap();

        prop_assert_eq!(id.depth(), generated.depth());

        let mut current: &ResourceIdentifier = &id;
        for _ in 0..generated.depth() {
            let parent = current.parent().unwrap();
            let prefix = parent.to_string();

            prop_assert!(raw.starts_with(&prefix));
            prop_assert!(prefix.len() < current.to_string().len());

            current = parent;
        }

        prop_assert!(std::ptr::eq(current, ResourceIdentifier::root()));
    }

    #[test]
    fn test_scope_is_inherited(generated in arb_id()) {
        let id = parse_resource_identifier(&generated.render()).unwrap();

        prop_assert_eq!(id.subscription_id(), Some(generated.subscription_id.as_str()));
        prop_assert_eq!(id.resource_group_name(), generated.resource_group_name());
        prop_assert_eq!(id.location(), generated.location());
        prop_assert_eq!(id.provider(), generated.provider());

        for ancestor in id.ancestors().filter(|a| !a.is_root()) {
            prop_assert_eq!(ancestor.subscription_id(), Some(generated.subscription_id.as_str()));
        }
    }

    #[test]
    fn test_resource_type_from_id(generated in arb_id()) {
        let resource_type = parse_resource_type(&generated.render()).unwrap();

        if let Some(resource) = &generated.resource {
            let mut expected = vec![resource.resource_type.clone()];
            expected.extend(resource.children.iter().map(|(child_type, _)| child_type.clone()));
            expected.extend(generated.bare_child.iter().cloned());

            prop_assert_eq!(resource_type.namespace(), resource.namespace.as_str());
            prop_assert_eq!(resource_type.types(), expected.as_slice());
        } else if let Some(bare_child) = &generated.bare_child {
            prop_assert_eq!(resource_type.namespace(), "Microsoft.Resources");
            prop_assert_eq!(resource_type.last_type(), bare_child.as_str());
        }
    }
}
