//! Bearer authentication: HS256 access/refresh tokens issued at `/api/login`, plus static tokens.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::error::ApiError;

/// Roles granted to every authenticated depot user.
pub const ROLES: [&str; 6] = [
    "ROLE_GATE_CREATE",
    "ROLE_GATE_UPDATE",
    "ROLE_ESTIMATE",
    "ROLE_WORK_ORDER",
    "ROLE_RELEASE",
    "ROLE_REDELIVERY",
];

/// Refresh tokens outlive access tokens by this factor.
const REFRESH_TTL_FACTOR: u64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub roles: Vec<String>,
    pub token_use: TokenUse,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub username: String,
    pub roles: Vec<String>,
    pub token_type: String,
    pub access_token: String,
    pub expires_in: u64,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshForm {
    pub grant_type: Option<String>,
    pub refresh_token: Option<String>,
}

/// Caller identity attached to authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub static_token: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("expected an {expected:?} token")]
    WrongTokenUse { expected: TokenUse },
    #[error("unsupported grant type `{0}`")]
    UnsupportedGrant(String),
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::UnsupportedGrant(_) => ApiError::malformed(value.to_string()),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Issues and checks tokens for the configured users.
pub struct TokenIssuer {
    config: AuthConfig,
}

impl TokenIssuer {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AuthError> {
        let known = self
            .config
            .users
            .iter()
            .any(|user| user.username == request.username && user.password == request.password);
        if !known {
            warn!(username = %request.username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        info!(username = %request.username, "login accepted");
        self.issue(&request.username)
    }

    /// Trade a refresh token for a fresh token pair.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let claims = self.decode(refresh_token)?;
        if claims.token_use != TokenUse::Refresh {
            return Err(AuthError::WrongTokenUse {
                expected: TokenUse::Refresh,
            });
        }
        self.issue(&claims.sub)
    }

    /// Accept a configured static token or an unexpired access token.
    pub fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        if self.config.static_tokens.iter().any(|known| known == token) {
            return Ok(Principal {
                username: "static".to_string(),
                static_token: true,
            });
        }
        let claims = self.decode(token)?;
        if claims.token_use != TokenUse::Access {
            return Err(AuthError::WrongTokenUse {
                expected: TokenUse::Access,
            });
        }
        Ok(Principal {
            username: claims.sub,
            static_token: false,
        })
    }

    fn issue(&self, username: &str) -> Result<TokenResponse, AuthError> {
        let ttl = self.config.token_ttl_secs;
        let access_token = self.sign(username, TokenUse::Access, ttl)?;
        let refresh_token =
            self.sign(username, TokenUse::Refresh, ttl.saturating_mul(REFRESH_TTL_FACTOR))?;
        Ok(TokenResponse {
            username: username.to_string(),
            roles: ROLES.iter().map(|role| role.to_string()).collect(),
            token_type: "Bearer".to_string(),
            access_token,
            expires_in: ttl,
            refresh_token,
        })
    }

    fn sign(&self, username: &str, token_use: TokenUse, ttl: u64) -> Result<String, AuthError> {
        let iat = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        let claims = Claims {
            sub: username.to_string(),
            roles: ROLES.iter().map(|role| role.to_string()).collect(),
            token_use,
            iat,
            exp: iat.saturating_add(ttl),
        };
        let key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &key)?)
    }

    fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let data = decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

/// Token from the `Authorization` header; the `Bearer ` prefix is optional for static tokens.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware rejecting requests without a valid bearer token.
pub async fn require_bearer(
    State(issuer): State<Arc<TokenIssuer>>,
    mut request: Request,
    next: Next,
) -> Response {
    let principal = bearer_token(request.headers())
        .ok_or(AuthError::MissingToken)
        .and_then(|token| issuer.authenticate(token));
    match principal {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Public token endpoints.
pub fn auth_router(issuer: Arc<TokenIssuer>) -> Router {
    Router::new()
        .route("/api/login", post(login_handler))
        .route("/oauth/access_token", post(refresh_handler))
        .route("/api/validate", get(validate_handler))
        .with_state(issuer)
}

pub(crate) async fn login_handler(
    State(issuer): State<Arc<TokenIssuer>>,
    Json(body): Json<Value>,
) -> Response {
    let request: LoginRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(err) => return ApiError::malformed(err.to_string()).into_response(),
    };
    match issuer.login(&request) {
        Ok(tokens) => (StatusCode::OK, Json(tokens)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

pub(crate) async fn refresh_handler(
    State(issuer): State<Arc<TokenIssuer>>,
    Form(form): Form<RefreshForm>,
) -> Response {
    let grant_type = form.grant_type.unwrap_or_default();
    if grant_type != "refresh_token" {
        return ApiError::from(AuthError::UnsupportedGrant(grant_type)).into_response();
    }
    let Some(refresh_token) = form.refresh_token else {
        return ApiError::malformed("refresh_token is required").into_response();
    };
    match issuer.refresh(&refresh_token) {
        Ok(tokens) => (StatusCode::OK, Json(tokens)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

pub(crate) async fn validate_handler(
    State(issuer): State<Arc<TokenIssuer>>,
    headers: HeaderMap,
) -> Response {
    let principal = bearer_token(&headers)
        .ok_or(AuthError::MissingToken)
        .and_then(|token| issuer.authenticate(token));
    match principal {
        Ok(principal) => (
            StatusCode::OK,
            Json(json!({ "username": principal.username, "valid": true })),
        )
            .into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}
