//! Use-case ports the role endpoint delegates to.

use async_trait::async_trait;
use service_core::error::AppError;
use std::sync::Arc;

use crate::dtos::*;

/// A single application operation. Implementations own validation, business
/// rules and persistence; the HTTP layer only shapes the input and relays the
/// result or error untouched.
#[async_trait]
pub trait UseCase<I: Send + 'static>: Send + Sync {
    type Output;

    async fn execute(&self, input: I) -> Result<Self::Output, AppError>;
}

pub type RoleCreatePort = Arc<dyn UseCase<RoleCreateInput, Output = RoleCreateOutput>>;
pub type RoleUpdatePort = Arc<dyn UseCase<RoleUpdateInput, Output = RoleUpdateOutput>>;
pub type RoleGetByIdPort = Arc<dyn UseCase<RoleGetByIdInput, Output = RoleGetByIdOutput>>;
pub type RoleListPort = Arc<dyn UseCase<RoleListInput, Output = RoleListOutput>>;
pub type RoleDeletePort = Arc<dyn UseCase<RoleDeleteInput, Output = RoleDeleteOutput>>;
pub type RoleAddPermissionPort =
    Arc<dyn UseCase<RoleAddPermissionInput, Output = RoleAddPermissionOutput>>;
pub type RoleDeletePermissionPort =
    Arc<dyn UseCase<RoleDeletePermissionInput, Output = RoleDeletePermissionOutput>>;

/// The seven ports injected into the role endpoint.
#[derive(Clone)]
pub struct RoleUseCases {
    pub create: RoleCreatePort,
    pub update: RoleUpdatePort,
    pub get_by_id: RoleGetByIdPort,
    pub list: RoleListPort,
    pub delete: RoleDeletePort,
    pub add_permission: RoleAddPermissionPort,
    pub delete_permission: RoleDeletePermissionPort,
}

impl RoleUseCases {
    /// Wires every port to one backend implementing all of them.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: UseCase<RoleCreateInput, Output = RoleCreateOutput>
            + UseCase<RoleUpdateInput, Output = RoleUpdateOutput>
            + UseCase<RoleGetByIdInput, Output = RoleGetByIdOutput>
            + UseCase<RoleListInput, Output = RoleListOutput>
            + UseCase<RoleDeleteInput, Output = RoleDeleteOutput>
            + UseCase<RoleAddPermissionInput, Output = RoleAddPermissionOutput>
            + UseCase<RoleDeletePermissionInput, Output = RoleDeletePermissionOutput>
            + 'static,
    {
        Self {
            create: backend.clone(),
            update: backend.clone(),
            get_by_id: backend.clone(),
            list: backend.clone(),
            delete: backend.clone(),
            add_permission: backend.clone(),
            delete_permission: backend,
        }
    }
}
