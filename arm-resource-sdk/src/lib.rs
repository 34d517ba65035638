//--------------------------------------------------------------------------
// (C) Copyright Travis Sharp <travis@kuipersys.com>.  All rights reserved.
//--------------------------------------------------------------------------

//! Azure Resource Manager resource id and resource type model.
//!
//! [`parse_resource_identifier`] turns a path such as
//! `/subscriptions/{id}/resourceGroups/{rg}/providers/Microsoft.Network/virtualNetworks/{vnet}`
//! into a chain of [`ResourceIdentifier`] nodes rooted at the tenant, and
//! [`parse_resource_type`] resolves a [`ResourceType`] from either a type
//! string or a full id.

pub mod error;
pub mod model;

pub use error::{ParseError, ParseResult};
pub use model::resource_identifier::{parse_resource_identifier, Ancestors, ResourceIdentifier};
pub use model::resource_type::{parse_resource_type, ResourceType, BUILT_IN_NAMESPACE};
