//! Inputs and outputs of the role use-case ports.
//!
//! Bodies that arrive alongside a path id (`*Body`) become the port input via
//! `with_id`; the path id always replaces any `id` the client sent in the body.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Role, RoleId};
use crate::utils::{Search, Sort};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct RoleCreateInput {
    #[validate(length(min = 1, message = "Role name is required"))]
    #[schema(example = "BACKOFFICE")]
    pub name: String,
    #[serde(default)]
    #[schema(example = json!(["user:create"]))]
    pub permissions: Vec<String>,
}

pub type RoleCreateOutput = Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoleUpdateBody {
    #[schema(example = "USER")]
    pub name: Option<String>,
    pub permissions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RoleUpdateInput {
    pub id: RoleId,
    #[validate(length(min = 1, message = "Role name must not be empty"))]
    pub name: Option<String>,
    pub permissions: Option<Vec<String>>,
}

impl RoleUpdateBody {
    pub fn with_id(self, id: RoleId) -> RoleUpdateInput {
        RoleUpdateInput {
            id,
            name: self.name,
            permissions: self.permissions,
        }
    }
}

pub type RoleUpdateOutput = Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleGetByIdInput {
    pub id: RoleId,
}

pub type RoleGetByIdOutput = Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDeleteInput {
    pub id: RoleId,
}

pub type RoleDeleteOutput = Role;

/// Body shared by the add- and remove-permission routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RolePermissionsBody {
    #[schema(example = json!(["user:create", "user:update"]))]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RoleAddPermissionInput {
    pub id: RoleId,
    #[validate(length(min = 1, message = "At least one permission is required"))]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RoleDeletePermissionInput {
    pub id: RoleId,
    #[validate(length(min = 1, message = "At least one permission is required"))]
    pub permissions: Vec<String>,
}

impl RolePermissionsBody {
    pub fn add_to(self, id: RoleId) -> RoleAddPermissionInput {
        RoleAddPermissionInput {
            id,
            permissions: self.permissions,
        }
    }

    pub fn remove_from(self, id: RoleId) -> RoleDeletePermissionInput {
        RoleDeletePermissionInput {
            id,
            permissions: self.permissions,
        }
    }
}

pub type RoleAddPermissionOutput = Role;
pub type RoleDeletePermissionOutput = Role;

/// Raw list query as it arrives on the URL, before parsing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoleListQuery {
    /// Page size.
    #[param(example = "10")]
    pub limit: Option<String>,
    /// 1-based page number.
    #[param(example = "1")]
    pub page: Option<String>,
    /// `field:asc|desc` pairs, comma separated.
    #[param(example = "name:asc,createdAt:desc")]
    pub sort: Option<String>,
    /// `field:value[|value]` pairs, comma separated.
    #[param(example = "name:USER|BACKOFFICE")]
    pub search: Option<String>,
}

/// `limit` and `page` are forwarded exactly as coerced, NaN included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleListInput {
    pub sort: Sort,
    pub search: Option<Search>,
    pub limit: f64,
    pub page: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoleListOutput {
    pub docs: Vec<Role>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}
