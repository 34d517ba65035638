use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ParseError, ParseResult};

use super::resource_identifier::parse_resource_identifier;
use super::split_segments;

pub const BUILT_IN_NAMESPACE: &str = "Microsoft.Resources";

lazy_static! {
    static ref SUBSCRIPTION_RESOURCE_TYPE: ResourceType = ResourceType::built_in("subscriptions");
    static ref RESOURCE_GROUP_RESOURCE_TYPE: ResourceType = ResourceType::built_in("resourceGroups");
    static ref TENANT_RESOURCE_TYPE: ResourceType = ResourceType::built_in("tenants");
    static ref PROVIDER_RESOURCE_TYPE: ResourceType = ResourceType::built_in("providers");
}

/// A provider namespace qualified resource type such as
/// `Microsoft.Network/virtualNetworks/subnets`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceType {
    namespace: String,
    type_name: String,
    types: Vec<String>,
    canonical: String,
}

impl ResourceType {
    /// Builds a resource type from a namespace and a slash separated type path.
    /// Empty segments in the path are ignored; a path with no segments at all
    /// is rejected.
    pub fn new<N, T>(namespace: N, type_name: T) -> ParseResult<Self>
    where
        N: Into<String>,
        T: Into<String>,
    {
        let namespace = namespace.into();
        let type_name = type_name.into();

        if split_segments(&type_name).is_empty() {
            return Err(ParseError::EmptyResourceType { namespace, type_name });
        }

        Ok(Self::from_parts(namespace, type_name))
    }

    // Callers guarantee `type_name` has at least one segment.
    pub(super) fn from_parts(namespace: String, type_name: String) -> Self {
        let types = split_segments(&type_name)
            .into_iter()
            .map(str::to_owned)
            .collect();
        let canonical = format!("{}/{}", namespace, type_name);

        Self {
            namespace,
            type_name,
            types,
            canonical,
        }
    }

    fn built_in(type_name: &str) -> Self {
        Self::from_parts(BUILT_IN_NAMESPACE.to_string(), type_name.to_string())
    }

    /// `Microsoft.Resources/subscriptions`
    pub fn subscription() -> &'static ResourceType {
        &SUBSCRIPTION_RESOURCE_TYPE
    }

    /// `Microsoft.Resources/resourceGroups`
    pub fn resource_group() -> &'static ResourceType {
        &RESOURCE_GROUP_RESOURCE_TYPE
    }

    /// `Microsoft.Resources/tenants`
    pub fn tenant() -> &'static ResourceType {
        &TENANT_RESOURCE_TYPE
    }

    /// `Microsoft.Resources/providers`
    pub fn provider() -> &'static ResourceType {
        &PROVIDER_RESOURCE_TYPE
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The type path after the namespace, e.g. `virtualNetworks/subnets`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// The final segment of the type path, e.g. `subnets`.
    pub fn last_type(&self) -> &str {
        // never empty, see `from_parts`
        self.types.last().map(String::as_str).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Returns a new type with `child` appended to the type path. The
    /// namespace is kept.
    pub fn append_child(&self, child: &str) -> ResourceType {
        Self::from_parts(
            self.namespace.clone(),
            format!("{}/{}", self.type_name, child),
        )
    }

    /// True when both types share a namespace and this type path is a strict
    /// prefix of `child`'s. All comparisons ignore ASCII case.
    pub fn is_parent_of(&self, child: &ResourceType) -> bool {
        if !self.namespace.eq_ignore_ascii_case(&child.namespace) {
            return false;
        }

        if self.types.len() >= child.types.len() {
            return false;
        }

        self.types
            .iter()
            .zip(child.types.iter())
            .all(|(parent, child)| parent.eq_ignore_ascii_case(child))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl AsRef<str> for ResourceType {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

impl FromStr for ResourceType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_resource_type(s)
    }
}

impl Serialize for ResourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

impl<'de> Deserialize<'de> for ResourceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse_resource_type(&value).map_err(de::Error::custom)
    }
}

/// Resolves a resource type from either a type string or a full resource id.
///
/// - a single segment (`subscriptions`) is a type in the `Microsoft.Resources`
///   namespace
/// - a first segment containing a `.` is a namespace followed by the type path
///   (`Microsoft.Compute/virtualMachines/extensions`)
/// - anything else is parsed as a resource id and the type of its deepest
///   node is returned
pub fn parse_resource_type(resource_id_or_type: &str) -> ParseResult<ResourceType> {
    let parts = split_segments(resource_id_or_type);

    match parts.as_slice() {
        [] => Err(ParseError::MalformedResourceType {
            value: resource_id_or_type.to_string(),
        }),
        [type_name] => Ok(ResourceType::built_in(type_name)),
        [namespace, rest @ ..] if namespace.contains('.') => Ok(ResourceType::from_parts(
            namespace.to_string(),
            rest.join("/"),
        )),
        _ => {
            let id = parse_resource_identifier(resource_id_or_type)?;
            Ok(id.resource_type().clone())
        }
    }
}
