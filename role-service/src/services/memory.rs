//! Process-local role backend implementing every role port.
//!
//! Lets the service run without an external store; state is lost on restart.

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use service_core::error::AppError;
use std::cmp::Ordering;
use validator::Validate;

use crate::dtos::*;
use crate::models::{Role, RoleId};
use crate::services::UseCase;
use crate::utils::{Search, Sort, SortDirection};

const DEFAULT_LIMIT: u64 = 10;
const DEFAULT_PAGE: u64 = 1;

#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    roles: DashMap<RoleId, Role>,
    /// Unique role names, claimed before a role takes the name.
    names: DashMap<String, RoleId>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    fn modify<F>(&self, id: &RoleId, f: F) -> Result<Role, AppError>
    where
        F: FnOnce(&mut Role),
    {
        let mut entry = self.roles.get_mut(id).ok_or_else(|| not_found(id))?;
        f(entry.value_mut());
        entry.touch();
        Ok(entry.value().clone())
    }

    /// Reserve `name` for `id`; a name held by another role is a conflict.
    fn claim_name(&self, name: &str, id: &RoleId) -> Result<(), AppError> {
        match self.names.entry(name.to_string()) {
            Entry::Occupied(held) if held.get() != id => Err(AppError::Conflict(
                anyhow::anyhow!("Role {} already exists", name),
            )),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
                Ok(())
            }
        }
    }

    fn release_name(&self, name: &str, id: &RoleId) {
        self.names.remove_if(name, |_, holder| holder == id);
    }
}

fn not_found(id: &RoleId) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Role {} not found", id))
}

/// Clamp a coerced page-size/page-number to a usable positive integer.
fn positive_or(value: f64, default: u64) -> u64 {
    if value.is_finite() && value >= 1.0 {
        value.floor() as u64
    } else {
        default
    }
}

fn field_values(role: &Role, field: &str) -> Result<Vec<String>, AppError> {
    match field {
        "id" => Ok(vec![role.id.to_string()]),
        "name" => Ok(vec![role.name.clone()]),
        "permissions" => Ok(role.permissions.clone()),
        other => Err(AppError::BadRequest(anyhow::anyhow!(
            "Cannot search roles by '{}'",
            other
        ))),
    }
}

fn matches_search(role: &Role, search: &Search) -> Result<bool, AppError> {
    for filter in search.filters() {
        let values = field_values(role, &filter.field)?;
        if !values.iter().any(|v| filter.values.contains(v)) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn compare(a: &Role, b: &Role, sort: &Sort) -> Ordering {
    for key in sort.fields() {
        let ordering = match key.field.as_str() {
            "id" => a.id.as_str().cmp(b.id.as_str()),
            "name" => a.name.cmp(&b.name),
            "createdAt" => a.created_at.cmp(&b.created_at),
            "updatedAt" => a.updated_at.cmp(&b.updated_at),
            _ => Ordering::Equal,
        };
        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn check_sort_fields(sort: &Sort) -> Result<(), AppError> {
    for key in sort.fields() {
        if !matches!(key.field.as_str(), "id" | "name" | "createdAt" | "updatedAt") {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Cannot sort roles by '{}'",
                key.field
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl UseCase<RoleCreateInput> for InMemoryRoleStore {
    type Output = RoleCreateOutput;

    async fn execute(&self, input: RoleCreateInput) -> Result<Role, AppError> {
        input.validate()?;

        let role = Role::new(input.name, input.permissions);
        self.claim_name(&role.name, &role.id)?;
        self.roles.insert(role.id.clone(), role.clone());
        tracing::info!(role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }
}

#[async_trait]
impl UseCase<RoleUpdateInput> for InMemoryRoleStore {
    type Output = RoleUpdateOutput;

    async fn execute(&self, input: RoleUpdateInput) -> Result<Role, AppError> {
        input.validate()?;

        let rename = match input.name {
            Some(name) => {
                self.claim_name(&name, &input.id)?;
                Some(name)
            }
            None => None,
        };

        let mut previous_name = None;
        let result = self.modify(&input.id, |role| {
            if let Some(name) = rename.clone() {
                previous_name = Some(std::mem::replace(&mut role.name, name));
            }
            if let Some(permissions) = input.permissions {
                role.permissions.clear();
                role.grant(permissions);
            }
        });

        match (&result, previous_name, rename) {
            (Ok(_), Some(old), Some(new)) if old != new => self.release_name(&old, &input.id),
            (Err(_), _, Some(new)) => self.release_name(&new, &input.id),
            _ => {}
        }
        result
    }
}

#[async_trait]
impl UseCase<RoleGetByIdInput> for InMemoryRoleStore {
    type Output = RoleGetByIdOutput;

    async fn execute(&self, input: RoleGetByIdInput) -> Result<Role, AppError> {
        self.roles
            .get(&input.id)
            .map(|r| r.value().clone())
            .ok_or_else(|| not_found(&input.id))
    }
}

#[async_trait]
impl UseCase<RoleListInput> for InMemoryRoleStore {
    type Output = RoleListOutput;

    async fn execute(&self, input: RoleListInput) -> Result<RoleListOutput, AppError> {
        check_sort_fields(&input.sort)?;
        let limit = positive_or(input.limit, DEFAULT_LIMIT);
        let page = positive_or(input.page, DEFAULT_PAGE);

        let mut docs = Vec::new();
        for entry in self.roles.iter() {
            let keep = match &input.search {
                Some(search) => matches_search(entry.value(), search)?,
                None => true,
            };
            if keep {
                docs.push(entry.value().clone());
            }
        }
        docs.sort_by(|a, b| compare(a, b, &input.sort));

        let total = docs.len() as u64;
        let skip = page.saturating_sub(1).saturating_mul(limit);
        let docs = docs
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        Ok(RoleListOutput {
            docs,
            page,
            limit,
            total,
        })
    }
}

#[async_trait]
impl UseCase<RoleDeleteInput> for InMemoryRoleStore {
    type Output = RoleDeleteOutput;

    async fn execute(&self, input: RoleDeleteInput) -> Result<Role, AppError> {
        let (_, role) = self
            .roles
            .remove(&input.id)
            .ok_or_else(|| not_found(&input.id))?;
        self.release_name(&role.name, &role.id);
        tracing::info!(role_id = %role.id, "Role deleted");
        Ok(role)
    }
}

#[async_trait]
impl UseCase<RoleAddPermissionInput> for InMemoryRoleStore {
    type Output = RoleAddPermissionOutput;

    async fn execute(&self, input: RoleAddPermissionInput) -> Result<Role, AppError> {
        input.validate()?;
        self.modify(&input.id, |role| role.grant(input.permissions))
    }
}

#[async_trait]
impl UseCase<RoleDeletePermissionInput> for InMemoryRoleStore {
    type Output = RoleDeletePermissionOutput;

    async fn execute(&self, input: RoleDeletePermissionInput) -> Result<Role, AppError> {
        input.validate()?;
        self.modify(&input.id, |role| role.revoke(&input.permissions))
    }
}
