use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use crate::config::JwtConfig;

/// Caller identity resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    pub subject: String,
    pub permissions: Vec<String>,
}

impl Principal {
    /// Exact match, a trailing `*` prefix grant (`role:*`), or the global `*`.
    pub fn has_permission(&self, required: &str) -> bool {
        self.permissions.iter().any(|granted| {
            granted == "*"
                || granted == required
                || granted
                    .strip_suffix('*')
                    .is_some_and(|prefix| required.starts_with(prefix))
        })
    }
}

/// Resolves a bearer token into a principal. Errors surface as 401 responses.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Principal, AppError>;
}

/// Claims carried by permission tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionClaims {
    /// Subject (user or service ID)
    pub sub: String,
    /// Granted permission capabilities
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// HS256 JWT verification against a shared secret.
#[derive(Clone)]
pub struct JwtAuthorizer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthorizer {
    pub fn new(config: &JwtConfig) -> Result<Self, AppError> {
        if config.secret.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT secret must not be empty"
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        })
    }

    /// Sign a token for `subject`; used by tooling and tests.
    pub fn issue(
        &self,
        subject: &str,
        permissions: &[&str],
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = PermissionClaims {
            sub: subject.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }
}

#[async_trait]
impl Authorizer for JwtAuthorizer {
    async fn authenticate(&self, token: &str) -> Result<Principal, AppError> {
        let data = decode::<PermissionClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(Principal {
            subject: data.claims.sub,
            permissions: data.claims.permissions,
        })
    }
}
