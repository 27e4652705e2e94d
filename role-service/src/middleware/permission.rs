use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;
use std::sync::Arc;

use crate::services::Authorizer;

/// Per-route authorization requirement: a verified bearer token whose
/// principal holds `capability`.
#[derive(Clone)]
pub struct PermissionGuard {
    authorizer: Arc<dyn Authorizer>,
    capability: &'static str,
}

impl PermissionGuard {
    pub fn new(authorizer: Arc<dyn Authorizer>, capability: &'static str) -> Self {
        Self {
            authorizer,
            capability,
        }
    }

    pub fn capability(&self) -> &'static str {
        self.capability
    }
}

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Rejects the request before the handler runs unless the caller holds the
/// guard's capability. On success the `Principal` is stored in request
/// extensions.
pub async fn permission_middleware(
    State(guard): State<PermissionGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or_else(|| {
        AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
    })?;

    // No borrow of `req` may cross this await: the body is not `Sync`.
    let principal = guard.authorizer.authenticate(&token).await?;

    if !principal.has_permission(guard.capability) {
        tracing::warn!(
            subject = %principal.subject,
            required_permission = %guard.capability,
            granted_permissions = ?principal.permissions,
            "Insufficient permissions"
        );
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Missing permission: {}",
            guard.capability
        )));
    }

    tracing::debug!(
        subject = %principal.subject,
        permission = %guard.capability,
        "Permission granted"
    );
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
