use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Opaque role identifier taken from the request path. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleId(String);

impl RoleId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err("role id must not be empty".to_string());
        }
        Ok(Self(value))
    }
}

impl From<RoleId> for String {
    fn from(id: RoleId) -> Self {
        id.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(value_type = String, example = "9f1c2a7e-7c1b-4d55-9e0f-2d3f6a1b8c4d")]
    pub id: RoleId,
    #[schema(example = "BACKOFFICE")]
    pub name: String,
    #[schema(example = json!(["user:create", "user:list"]))]
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: String, permissions: Vec<String>) -> Self {
        let now = Utc::now();
        let mut role = Self {
            id: RoleId::generate(),
            name,
            permissions: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        role.grant(permissions);
        role
    }

    /// Adds permissions not already held, keeping first-seen order.
    pub fn grant(&mut self, permissions: impl IntoIterator<Item = String>) {
        for permission in permissions {
            if !self.permissions.contains(&permission) {
                self.permissions.push(permission);
            }
        }
    }

    pub fn revoke(&mut self, permissions: &[String]) {
        self.permissions.retain(|p| !permissions.contains(p));
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
