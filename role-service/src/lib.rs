pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    handler::Handler,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Json, Router,
};
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::RoleConfig;
use crate::handlers::role::{
    ROLE_ADD_PERMISSION, ROLE_CREATE, ROLE_DELETE, ROLE_DELETE_PERMISSION, ROLE_GET_BY_ID,
    ROLE_LIST, ROLE_UPDATE,
};
use crate::middleware::{permission_middleware, PermissionGuard};
use crate::services::{Authorizer, RoleUseCases};
use service_core::error::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::role::create_role,
        handlers::role::update_role,
        handlers::role::get_role,
        handlers::role::list_roles,
        handlers::role::delete_role,
        handlers::role::add_permissions,
        handlers::role::remove_permissions,
    ),
    components(
        schemas(
            models::Role,
            dtos::RoleCreateInput,
            dtos::RoleUpdateBody,
            dtos::RolePermissionsBody,
            dtos::RoleListOutput,
            dtos::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Roles", description = "Role management and permission assignment"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: RoleConfig,
    pub use_cases: RoleUseCases,
    pub authorizer: Arc<dyn Authorizer>,
}

pub fn build_router(state: AppState) -> Result<Router, AppError> {
    let guard = |capability| PermissionGuard::new(state.authorizer.clone(), capability);

    // Each method carries its own capability layer, so one path can mix
    // requirements (GET vs PUT vs DELETE on /v1/roles/:id).
    let role_routes = Router::new()
        .route(
            "/v1/roles",
            post(handlers::create_role.layer(from_fn_with_state(
                guard(ROLE_CREATE),
                permission_middleware,
            )))
            .get(handlers::list_roles.layer(from_fn_with_state(
                guard(ROLE_LIST),
                permission_middleware,
            ))),
        )
        .route(
            "/v1/roles/:id",
            get(handlers::get_role.layer(from_fn_with_state(
                guard(ROLE_GET_BY_ID),
                permission_middleware,
            )))
            .put(handlers::update_role.layer(from_fn_with_state(
                guard(ROLE_UPDATE),
                permission_middleware,
            )))
            .delete(handlers::delete_role.layer(from_fn_with_state(
                guard(ROLE_DELETE),
                permission_middleware,
            ))),
        )
        .route(
            "/v1/roles/add-permissions/:id",
            put(handlers::add_permissions.layer(from_fn_with_state(
                guard(ROLE_ADD_PERMISSION),
                permission_middleware,
            ))),
        )
        .route(
            "/v1/roles/remove-permissions/:id",
            put(handlers::remove_permissions.layer(from_fn_with_state(
                guard(ROLE_DELETE_PERMISSION),
                permission_middleware,
            ))),
        );

    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(role_routes);

    if state.config.swagger_ui_enabled() {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        // Keep the OpenAPI JSON available for programmatic access
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    let cors = cors_layer(&state.config.security.allowed_origins)?;

    let app = app
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors);

    Ok(app)
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, AppError> {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>().map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ]))
}
