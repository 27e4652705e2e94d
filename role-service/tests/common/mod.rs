#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use role_service::{
    build_router,
    config::{Environment, JwtConfig, RoleConfig, SecurityConfig, SwaggerConfig},
    dtos::*,
    models::{Role, RoleId},
    services::{JwtAuthorizer, RoleUseCases, UseCase},
    AppState,
};
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "role-service-test-secret";

pub fn test_config() -> RoleConfig {
    RoleConfig {
        common: CoreConfig {
            port: 0,
            ..CoreConfig::default()
        },
        environment: Environment::Dev,
        service_name: "role-service".to_string(),
        service_version: "0.0.0-test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["*".to_string()],
        },
        swagger: SwaggerConfig { enabled: false },
    }
}

type Responder<I, O> = Box<dyn Fn(&I) -> Result<O, AppError> + Send + Sync>;

/// Port double that records every input and answers from a fixed responder.
pub struct RecordingUseCase<I, O> {
    calls: Mutex<Vec<I>>,
    respond: Responder<I, O>,
}

impl<I, O> RecordingUseCase<I, O>
where
    I: Clone + Send + 'static,
    O: Clone + Send + Sync + 'static,
{
    pub fn returning(output: O) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::default(),
            respond: Box::new(move |_| Ok(output.clone())),
        })
    }

    pub fn failing(make_error: fn() -> AppError) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::default(),
            respond: Box::new(move |_| Err(make_error())),
        })
    }

    pub fn calls(&self) -> Vec<I> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<I, O> UseCase<I> for RecordingUseCase<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    type Output = O;

    async fn execute(&self, input: I) -> Result<O, AppError> {
        let result = (self.respond)(&input);
        self.calls.lock().unwrap().push(input);
        result
    }
}

pub fn sample_role() -> Role {
    Role::new(
        "BACKOFFICE".to_string(),
        vec!["user:create".to_string(), "user:list".to_string()],
    )
}

pub fn role_id(raw: &str) -> RoleId {
    RoleId::try_from(raw.to_string()).unwrap()
}

pub fn role_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Role not found"))
}

/// One recording double per role port.
pub struct Ports {
    pub create: Arc<RecordingUseCase<RoleCreateInput, RoleCreateOutput>>,
    pub update: Arc<RecordingUseCase<RoleUpdateInput, RoleUpdateOutput>>,
    pub get_by_id: Arc<RecordingUseCase<RoleGetByIdInput, RoleGetByIdOutput>>,
    pub list: Arc<RecordingUseCase<RoleListInput, RoleListOutput>>,
    pub delete: Arc<RecordingUseCase<RoleDeleteInput, RoleDeleteOutput>>,
    pub add_permission: Arc<RecordingUseCase<RoleAddPermissionInput, RoleAddPermissionOutput>>,
    pub delete_permission:
        Arc<RecordingUseCase<RoleDeletePermissionInput, RoleDeletePermissionOutput>>,
}

impl Ports {
    pub fn returning(role: Role) -> Self {
        Self {
            create: RecordingUseCase::returning(role.clone()),
            update: RecordingUseCase::returning(role.clone()),
            get_by_id: RecordingUseCase::returning(role.clone()),
            list: RecordingUseCase::returning(RoleListOutput {
                docs: vec![role.clone()],
                page: 1,
                limit: 10,
                total: 1,
            }),
            delete: RecordingUseCase::returning(role.clone()),
            add_permission: RecordingUseCase::returning(role.clone()),
            delete_permission: RecordingUseCase::returning(role),
        }
    }

    pub fn not_found() -> Self {
        Self {
            update: RecordingUseCase::failing(role_not_found),
            get_by_id: RecordingUseCase::failing(role_not_found),
            delete: RecordingUseCase::failing(role_not_found),
            add_permission: RecordingUseCase::failing(role_not_found),
            delete_permission: RecordingUseCase::failing(role_not_found),
            ..Self::returning(sample_role())
        }
    }

    pub fn use_cases(&self) -> RoleUseCases {
        RoleUseCases {
            create: self.create.clone(),
            update: self.update.clone(),
            get_by_id: self.get_by_id.clone(),
            list: self.list.clone(),
            delete: self.delete.clone(),
            add_permission: self.add_permission.clone(),
            delete_permission: self.delete_permission.clone(),
        }
    }

    /// Total number of port invocations across all seven ports.
    pub fn total_calls(&self) -> usize {
        self.create.calls().len()
            + self.update.calls().len()
            + self.get_by_id.calls().len()
            + self.list.calls().len()
            + self.delete.calls().len()
            + self.add_permission.calls().len()
            + self.delete_permission.calls().len()
    }
}

pub struct TestApp {
    pub router: Router,
    pub ports: Ports,
    pub jwt: JwtAuthorizer,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl TestApp {
    pub fn new(ports: Ports) -> Self {
        let config = test_config();
        let jwt = JwtAuthorizer::new(&config.jwt).expect("Failed to create JWT authorizer");
        let state = AppState {
            config,
            use_cases: ports.use_cases(),
            authorizer: Arc::new(jwt.clone()),
        };
        let router = build_router(state).expect("Failed to build router");

        Self { router, ports, jwt }
    }

    pub fn token(&self, permissions: &[&str]) -> String {
        self.jwt
            .issue("user_123", permissions, chrono::Duration::minutes(5))
            .expect("Failed to issue token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    /// Send with a token holding exactly `permission`.
    pub async fn send_as(
        &self,
        permission: &str,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let token = self.token(&[permission]);
        self.send(method, uri, Some(&token), body).await
    }
}
