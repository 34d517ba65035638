use arm_resource_sdk::{parse_resource_identifier, parse_resource_type, ResourceIdentifier, ResourceType};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use crate::version;

#[derive(Parser, Debug)]
#[command(name = "armctl", about = "Azure Resource Manager resource id inspector")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print output in pretty (indented) format
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Set the output format (standard, json, yaml), default is standard
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Standard)]
    pub output: OutputFormat,

    /// Log filter such as "debug" or "arm_resource_sdk=trace". Falls back to RUST_LOG
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OutputFormat {
    Standard,
    Json,
    Yaml
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a resource id and describe its deepest node
    Parse(IdArgs),

    /// Parse a resource id and describe every node from the top scope down
    Chain(IdArgs),

    /// Resolve the resource type of a type string or a resource id
    Type(TypeArgs),

    /// Check whether one resource type is a parent of another
    ParentOf(ParentOfArgs),

    Version,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Resource id, e.g. /subscriptions/{id}/resourceGroups/{name}
    #[arg()]
    pub id: String,
}

#[derive(Args, Debug)]
pub struct TypeArgs {
    /// Resource type (Microsoft.Compute/virtualMachines) or resource id
    #[arg()]
    pub value: String,
}

#[derive(Args, Debug)]
pub struct ParentOfArgs {
    #[arg()]
    pub parent: String,

    #[arg()]
    pub child: String,
}

#[derive(Debug, Serialize)]
struct IdentifierSummary<'a> {
    #[serde(rename = "id")]
    id: &'a str,

    #[serde(rename = "name")]
    name: &'a str,

    #[serde(rename = "resourceType")]
    resource_type: &'a ResourceType,

    #[serde(rename = "namespace")]
    namespace: &'a str,

    #[serde(rename = "isChild")]
    is_child: bool,

    #[serde(rename = "subscriptionId", skip_serializing_if = "Option::is_none")]
    subscription_id: Option<&'a str>,

    #[serde(rename = "resourceGroupName", skip_serializing_if = "Option::is_none")]
    resource_group_name: Option<&'a str>,

    #[serde(rename = "provider", skip_serializing_if = "Option::is_none")]
    provider: Option<&'a str>,

    #[serde(rename = "location", skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,

    #[serde(rename = "parent", skip_serializing_if = "Option::is_none")]
    parent: Option<&'a str>,
}

impl<'a> From<&'a ResourceIdentifier> for IdentifierSummary<'a> {
    fn from(id: &'a ResourceIdentifier) -> Self {
        Self {
            id: id.as_str(),
            name: id.name(),
            resource_type: id.resource_type(),
            namespace: id.resource_type().namespace(),
            is_child: id.is_child(),
            subscription_id: id.subscription_id(),
            resource_group_name: id.resource_group_name(),
            provider: id.provider(),
            location: id.location(),
            // the root renders as an empty string
            parent: id.parent().filter(|p| !p.is_root()).map(ResourceIdentifier::as_str),
        }
    }
}

fn summarize(id: &ResourceIdentifier) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(IdentifierSummary::from(id))?)
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Parse(_) => "parse",
            Command::Chain(_) => "chain",
            Command::Type(_) => "type",
            Command::ParentOf(_) => "parent-of",
            Command::Version => "version",
        }
    }

    pub fn execute(&self) -> anyhow::Result<Value> {
        match self {
            Command::Parse(args) => {
                let id = parse_resource_identifier(&args.id)?;
                summarize(&id)
            },

            Command::Chain(args) => {
                let id = parse_resource_identifier(&args.id)?;

                let mut nodes: Vec<&ResourceIdentifier> = std::iter::once(&id)
                    .chain(id.ancestors())
                    .filter(|node| !node.is_root())
                    .collect();
                nodes.reverse();

                let summaries = nodes.into_iter()
                    .map(summarize)
                    .collect::<anyhow::Result<Vec<_>>>()?;

                Ok(Value::Array(summaries))
            },

            Command::Type(args) => {
                let resource_type = parse_resource_type(&args.value)?;

                Ok(serde_json::json!({
                    "resourceType": resource_type,
                    "namespace": resource_type.namespace(),
                    "type": resource_type.type_name(),
                    "types": resource_type.types(),
                    "lastType": resource_type.last_type(),
                }))
            },

            Command::ParentOf(args) => {
                let parent = parse_resource_type(&args.parent)?;
                let child = parse_resource_type(&args.child)?;

                Ok(serde_json::json!({
                    "parent": parent,
                    "child": child,
                    "isParent": parent.is_parent_of(&child),
                }))
            },

            Command::Version => Ok(serde_json::json!({
                "version": version::get_version_string(),
                "buildTimestamp": version::get_build_timestamp(),
            })),
        }
    }
}
