//! Authentication handlers.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use blogicum_core::DomainError;
use blogicum_core::domain::User;
use blogicum_core::error::RepoError;
use blogicum_core::ports::{PasswordService, TokenService};
use blogicum_shared::dto::{AuthResponse, UserResponse};
use blogicum_shared::forms::{LoginForm, RegistrationForm};

use super::{ok, parse_form};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// `?next=` carried through the login page.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

fn auth_response(
    token_service: &dyn TokenService,
    user: &User,
    next: Option<String>,
) -> AppResult<AuthResponse> {
    let token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
        next,
    })
}

/// GET /auth/login/ - echoes where the client will be sent after login.
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    ok(query.into_inner())
}

/// POST /auth/registration/
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let req: RegistrationForm = parse_form(&body)?;

    let users = &state.blog.repositories().users;
    if users.find_by_username(&req.username).await?.is_some() {
        return Err(DomainError::field("username", USERNAME_TAKEN).into());
    }

    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User::new(req.username, req.email.unwrap_or_default(), password_hash);
    let user = match users.insert(user).await {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => {
            return Err(DomainError::field("username", USERNAME_TAKEN).into());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let response = auth_response(token_service.get_ref().as_ref(), &user, None)?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    query: web::Query<NextQuery>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let req: LoginForm = parse_form(&body)?;

    let user = state
        .blog
        .repositories()
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::debug!(username = %req.username, "Login rejected");
        return Err(AppError::Unauthorized);
    }

    let next = query.into_inner().next;
    let response = auth_response(token_service.get_ref().as_ref(), &user, next)?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /auth/me/ - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .blog
        .repositories()
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", identity.username)))?;

    Ok(ok(UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at.to_rfc3339(),
    }))
}
