use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use lazy_static::lazy_static;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ParseError, ParseResult};

use super::resource_type::ResourceType;
use super::split_segments;

const SUBSCRIPTIONS_KEY: &str = "subscriptions";
const RESOURCE_GROUPS_KEY: &str = "resourcegroups";
const PROVIDERS_KEY: &str = "providers";
const LOCATIONS_KEY: &str = "locations";

lazy_static! {
    static ref ROOT_RESOURCE_IDENTIFIER: Arc<ResourceIdentifier> = Arc::new(ResourceIdentifier {
        parent: None,
        subscription_id: None,
        provider: None,
        resource_group_name: None,
        location: None,
        resource_type: ResourceType::tenant().clone(),
        name: String::new(),
        segment: Segment::Root,
        rendered: OnceLock::new(),
    });
}

fn is_keyword(segment: &str, keyword: &str) -> bool {
    segment.eq_ignore_ascii_case(keyword)
}

/// How a node was introduced in the path. Drives string reconstruction.
#[derive(Debug, Clone)]
enum Segment {
    Root,

    /// `/{keyword}[/{name}]` appended under the parent's own type path.
    /// `keyword` keeps the input spelling.
    Child { keyword: String },

    /// `/{keyword}/{namespace}/{type}/{name}` where keyword is `providers`.
    Provider { keyword: String },
}

/// One node of a parsed ARM resource id. Ancestors are reachable through
/// [`ResourceIdentifier::parent`]; the chain always ends at the shared tenant
/// root returned by [`ResourceIdentifier::root`].
#[derive(Debug, Clone)]
pub struct ResourceIdentifier {
    parent: Option<Arc<ResourceIdentifier>>,
    subscription_id: Option<String>,
    provider: Option<String>,
    resource_group_name: Option<String>,
    location: Option<String>,
    resource_type: ResourceType,
    name: String,
    segment: Segment,
    rendered: OnceLock<String>,
}

impl ResourceIdentifier {
    fn new(
        parent: Arc<ResourceIdentifier>,
        resource_type: ResourceType,
        name: &str,
        segment: Segment,
    ) -> Self {
        let mut id = Self {
            subscription_id: parent.subscription_id.clone(),
            provider: parent.provider.clone(),
            resource_group_name: parent.resource_group_name.clone(),
            location: parent.location.clone(),
            parent: Some(parent),
            resource_type,
            name: name.to_string(),
            segment,
            rendered: OnceLock::new(),
        };

        // The candidate types are disjoint, at most one of these fires.
        if id.resource_type.as_str() == ResourceType::subscription().as_str() {
            id.subscription_id = Some(id.name.clone());
        }

        if is_keyword(id.resource_type.last_type(), LOCATIONS_KEY) {
            id.location = Some(id.name.clone());
        }

        if id.resource_type.as_str() == ResourceType::resource_group().as_str() {
            id.resource_group_name = Some(id.name.clone());
        }

        if id.resource_type.as_str() == ResourceType::provider().as_str() {
            id.provider = Some(id.name.clone());
        }

        id
    }

    fn new_child(parent: Arc<ResourceIdentifier>, type_name: &str, name: &str) -> Self {
        let resource_type = choose_resource_type(type_name, &parent);
        let segment = Segment::Child {
            keyword: type_name.to_string(),
        };

        Self::new(parent, resource_type, name, segment)
    }

    fn new_provider_declaration(
        parent: Arc<ResourceIdentifier>,
        keyword: &str,
        namespace: &str,
    ) -> Self {
        let segment = Segment::Child {
            keyword: keyword.to_string(),
        };

        Self::new(parent, ResourceType::provider().clone(), namespace, segment)
    }

    fn new_with_provider(
        parent: Arc<ResourceIdentifier>,
        keyword: &str,
        resource_type: ResourceType,
        name: &str,
    ) -> Self {
        let segment = Segment::Provider {
            keyword: keyword.to_string(),
        };

        Self::new(parent, resource_type, name, segment)
    }

    /// The implicit tenant root every parsed id descends from.
    pub fn root() -> &'static ResourceIdentifier {
        &ROOT_RESOURCE_IDENTIFIER
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn parent(&self) -> Option<&ResourceIdentifier> {
        self.parent.as_deref()
    }

    /// Iterates over the ancestors of this id, nearest first, ending with the
    /// root.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Number of parent links between this id and the root.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription_id.as_deref()
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn resource_group_name(&self) -> Option<&str> {
        self.resource_group_name.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when this id extends its parent's type path rather than
    /// declaring a new `providers/{namespace}/{type}` resource.
    pub fn is_child(&self) -> bool {
        matches!(self.segment, Segment::Child { .. })
    }

    /// The full id string. Computed on first use and cached.
    pub fn as_str(&self) -> &str {
        self.rendered.get_or_init(|| self.render())
    }

    fn render(&self) -> String {
        let parent = self
            .parent
            .as_deref()
            .map(ResourceIdentifier::as_str)
            .unwrap_or_default();

        match &self.segment {
            Segment::Root => String::new(),
            Segment::Child { keyword } if self.name.is_empty() => {
                format!("{}/{}", parent, keyword)
            }
            Segment::Child { keyword } => {
                format!("{}/{}/{}", parent, keyword, self.name)
            }
            Segment::Provider { keyword } => format!(
                "{}/{}/{}/{}/{}",
                parent,
                keyword,
                self.resource_type.namespace(),
                self.resource_type.type_name(),
                self.name
            ),
        }
    }

    /// Returns a new id for a child resource `{type_name}/{name}` under this
    /// one. Scope keywords such as `resourceGroups` are recognized the same
    /// way the parser recognizes them.
    pub fn append_child_resource(
        &self,
        type_name: &str,
        name: &str,
    ) -> ParseResult<ResourceIdentifier> {
        let candidate = format!("{}/{}/{}", self, type_name, name);

        if is_keyword(type_name, PROVIDERS_KEY) {
            return Err(ParseError::malformed(
                &candidate,
                "child resource type cannot be 'providers'",
            ));
        }
        validate_parent(&candidate, self)?;
        validate_segment(&candidate, type_name)?;
        validate_segment(&candidate, name)?;

        // Only `subscriptions` may open an id at the tenant root.
        if self.is_root() && !is_keyword(type_name, SUBSCRIPTIONS_KEY) {
            return Err(ParseError::malformed(
                &candidate,
                "id must start with 'subscriptions' or 'providers'",
            ));
        }

        // `providers/{namespace}/{type}/{name}` parses as a provider resource
        // under the declaration's parent, so build it the same way.
        if let (Segment::Child { keyword }, Some(parent)) = (&self.segment, &self.parent) {
            if self.resource_type.as_str() == ResourceType::provider().as_str() {
                let resource_type =
                    ResourceType::from_parts(self.name.clone(), type_name.to_string());

                return Ok(Self::new_with_provider(parent.clone(), keyword, resource_type, name));
            }
        }

        Ok(Self::new_child(Arc::new(self.clone()), type_name, name))
    }

    /// Returns a new id for `providers/{namespace}/{type_name}/{name}` under
    /// this one.
    pub fn append_provider_resource(
        &self,
        namespace: &str,
        type_name: &str,
        name: &str,
    ) -> ParseResult<ResourceIdentifier> {
        let candidate = format!(
            "{}/{}/{}/{}/{}",
            self, PROVIDERS_KEY, namespace, type_name, name
        );

        // `providers/{namespace}/providers/...` would parse as two declarations.
        if is_keyword(type_name, PROVIDERS_KEY) {
            return Err(ParseError::malformed(
                &candidate,
                "provider resource type cannot be 'providers'",
            ));
        }
        validate_parent(&candidate, self)?;
        validate_segment(&candidate, namespace)?;
        validate_segment(&candidate, type_name)?;
        validate_segment(&candidate, name)?;

        let resource_type = ResourceType::new(namespace, type_name)?;

        Ok(Self::new_with_provider(
            Arc::new(self.clone()),
            PROVIDERS_KEY,
            resource_type,
            name,
        ))
    }
}

// A nameless node such as `.../locations` cannot take more segments without
// changing how the result parses.
fn validate_parent(candidate: &str, parent: &ResourceIdentifier) -> ParseResult<()> {
    if !parent.is_root() && parent.name.is_empty() {
        return Err(ParseError::malformed(candidate, "parent resource has no name"));
    }

    Ok(())
}

fn validate_segment(candidate: &str, segment: &str) -> ParseResult<()> {
    if segment.is_empty() {
        return Err(ParseError::malformed(candidate, "segment cannot be empty"));
    }

    if segment.contains('/') {
        return Err(ParseError::malformed(candidate, "segment cannot contain '/'"));
    }

    Ok(())
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ids compare by their string form only. Two ids built through different
/// routes can be equal while their `resource_type()`, `is_child()` or scope
/// accessors differ; compare those directly when the structure matters.
impl PartialEq for ResourceIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ResourceIdentifier {}

impl Hash for ResourceIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl FromStr for ResourceIdentifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_resource_identifier(s)
    }
}

impl Serialize for ResourceIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResourceIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse_resource_identifier(&value).map_err(de::Error::custom)
    }
}

pub struct Ancestors<'a> {
    next: Option<&'a ResourceIdentifier>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ResourceIdentifier;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

fn choose_resource_type(type_name: &str, parent: &ResourceIdentifier) -> ResourceType {
    match type_name.to_ascii_lowercase().as_str() {
        RESOURCE_GROUPS_KEY => ResourceType::resource_group().clone(),
        SUBSCRIPTIONS_KEY => ResourceType::subscription().clone(),
        _ => parent.resource_type.append_child(type_name),
    }
}

/// The next node to build, decided from the shape of the remaining segments.
#[derive(Debug, PartialEq, Eq)]
enum Step<'a> {
    /// `{type}` as the very last segment, with no name.
    BareChildType { type_name: &'a str },

    /// `providers/{namespace}` not followed by a type and name.
    ProviderDeclaration { keyword: &'a str, namespace: &'a str },

    /// `providers/{namespace}/{type}/{name}`
    ProviderResource {
        keyword: &'a str,
        namespace: &'a str,
        type_name: &'a str,
        name: &'a str,
    },

    /// `{type}/{name}`, where type is a scope keyword or a child type.
    ChildResource { type_name: &'a str, name: &'a str },
}

impl Step<'_> {
    fn consumed(&self) -> usize {
        match self {
            Step::BareChildType { .. } => 1,
            Step::ProviderDeclaration { .. } | Step::ChildResource { .. } => 2,
            Step::ProviderResource { .. } => 4,
        }
    }
}

fn next_step<'a>(
    parent: &ResourceIdentifier,
    parts: &[&'a str],
) -> Result<Step<'a>, &'static str> {
    match *parts {
        [type_name] => {
            if is_keyword(type_name, SUBSCRIPTIONS_KEY) || is_keyword(type_name, RESOURCE_GROUPS_KEY) {
                return Err("scope keyword is missing its name");
            }

            // Zero or two or more trailing segments under a resource group are
            // handled by the other arms.
            if parent.resource_type.as_str() == ResourceType::resource_group().as_str() {
                return Err("resource group must be followed by a child or provider resource");
            }

            Ok(Step::BareChildType { type_name })
        }
        [keyword, namespace, ..]
            if is_keyword(keyword, PROVIDERS_KEY)
                && parts.get(2).map_or(true, |next| is_keyword(next, PROVIDERS_KEY)) =>
        {
            let parent_type = parent.resource_type.as_str();
            if parent_type != ResourceType::subscription().as_str()
                && parent_type != ResourceType::tenant().as_str()
            {
                return Err("providers can only be declared under a subscription or the tenant");
            }

            Ok(Step::ProviderDeclaration { keyword, namespace })
        }
        [keyword, namespace, type_name, name, ..] if is_keyword(keyword, PROVIDERS_KEY) => {
            Ok(Step::ProviderResource {
                keyword,
                namespace,
                type_name,
                name,
            })
        }
        [type_name, name, ..] if !is_keyword(type_name, PROVIDERS_KEY) => {
            Ok(Step::ChildResource { type_name, name })
        }
        _ => Err("unexpected segment layout"),
    }
}

fn build(parent: Arc<ResourceIdentifier>, step: &Step<'_>) -> ResourceIdentifier {
    match *step {
        Step::BareChildType { type_name } => ResourceIdentifier::new_child(parent, type_name, ""),
        Step::ProviderDeclaration { keyword, namespace } => {
            ResourceIdentifier::new_provider_declaration(parent, keyword, namespace)
        }
        Step::ProviderResource {
            keyword,
            namespace,
            type_name,
            name,
        } => {
            let resource_type =
                ResourceType::from_parts(namespace.to_string(), type_name.to_string());
            ResourceIdentifier::new_with_provider(parent, keyword, resource_type, name)
        }
        Step::ChildResource { type_name, name } => {
            ResourceIdentifier::new_child(parent, type_name, name)
        }
    }
}

/// Parses an ARM resource id such as
/// `/subscriptions/{id}/resourceGroups/{rg}/providers/Microsoft.Network/virtualNetworks/{vnet}`
/// into its deepest node.
pub fn parse_resource_identifier(id: &str) -> ParseResult<ResourceIdentifier> {
    if id.is_empty() {
        return Err(ParseError::malformed(id, "id cannot be empty"));
    }

    if !id.starts_with('/') {
        return Err(ParseError::malformed(id, "id must start with '/'"));
    }

    let parts = split_segments(id);

    if parts.len() < 2 {
        return Err(ParseError::malformed(id, "id must have at least two segments"));
    }

    if !is_keyword(parts[0], SUBSCRIPTIONS_KEY) && !is_keyword(parts[0], PROVIDERS_KEY) {
        return Err(ParseError::malformed(
            id,
            "id must start with 'subscriptions' or 'providers'",
        ));
    }

    let mut current = ROOT_RESOURCE_IDENTIFIER.clone();
    let mut remaining = parts.as_slice();

    while !remaining.is_empty() {
        let step = next_step(&current, remaining).map_err(|reason| ParseError::malformed(id, reason))?;
        remaining = &remaining[step.consumed()..];
        current = Arc::new(build(current, &step));
    }

    tracing::trace!(id, resource_type = %current.resource_type, "parsed resource id");

    Ok(Arc::unwrap_or_clone(current))
}
