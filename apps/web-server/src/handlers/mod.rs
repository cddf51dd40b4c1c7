//! HTTP handlers and route configuration.

mod auth;
mod blog;
mod comments;
mod health;
mod posts;
mod profile;

#[cfg(test)]
mod tests;

use std::convert::Infallible;

use actix_web::{HttpResponse, http::header, web};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use blogicum_core::Access;
use blogicum_core::error::FieldErrors;
use blogicum_shared::ApiResponse;

use crate::middleware::error::{AppError, AppResult};

/// `?page=` as sent; resolution happens in the list assembler.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// 302 to `location`.
pub(crate) fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 200 with the payload wrapped in [`ApiResponse`].
pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data))
}

/// Turn a guarded outcome into a response: `ok` for an allowed value,
/// 302 for a redirect, 404 otherwise.
pub(crate) fn respond<T>(
    access: Access<T>,
    ok: impl FnOnce(T) -> HttpResponse,
) -> AppResult<HttpResponse> {
    match access {
        Access::Allowed(value) => Ok(ok(value)),
        Access::RedirectTo(location) => Ok(found(&location)),
        Access::NotFound => Err(AppError::NotFound("No such page".to_string())),
    }
}

/// Response for an access that was not granted.
pub(crate) fn deny(access: Access<Infallible>) -> AppResult<HttpResponse> {
    respond(access, |never| match never {})
}

/// Key for body problems that belong to no single field.
const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Decode a JSON form body and validate it.
///
/// Handlers call this only after their access gate, so denied requests
/// redirect whatever the body holds.
pub(crate) fn parse_form<T: DeserializeOwned + Validate>(body: &[u8]) -> AppResult<T> {
    let form: T = serde_json::from_slice(body).map_err(form_error)?;
    form.validate()?;
    Ok(form)
}

/// Malformed JSON is a bad request; well-formed JSON that does not fit the
/// form is a field-level validation failure.
fn form_error(err: serde_json::Error) -> AppError {
    if !err.is_data() {
        return AppError::BadRequest(format!("Malformed JSON body: {err}"));
    }

    let message = err.to_string();
    let mut errors = FieldErrors::new();
    match missing_field(&message) {
        Some(field) => {
            errors.insert(field.to_string(), vec!["This field is required.".to_string()]);
        }
        None => {
            errors.insert(NON_FIELD_ERRORS.to_string(), vec![message]);
        }
    }
    AppError::Validation(errors)
}

/// Field name out of serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split_once('`').map(|(field, _)| field)
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(blog::index))
        .route("/health", web::get().to(health::health_check))
        .route("/category/{slug}/", web::get().to(blog::category_posts))
        .service(
            web::scope("/profile/{username}")
                .route("/", web::get().to(blog::profile))
                .route("/edit/", web::get().to(profile::edit_form))
                .route("/edit/", web::post().to(profile::update)),
        )
        .service(
            web::scope("/posts")
                // Must precede `/{post_id}/`
                .route("/create/", web::get().to(posts::create_form))
                .route("/create/", web::post().to(posts::create))
                .route("/{post_id}/", web::get().to(posts::detail))
                .route("/{post_id}/edit/", web::get().to(posts::edit_form))
                .route("/{post_id}/edit/", web::post().to(posts::update))
                .route("/{post_id}/delete/", web::get().to(posts::delete_form))
                .route("/{post_id}/delete/", web::post().to(posts::delete))
                .route("/{post_id}/comment/", web::post().to(comments::create))
                .route(
                    "/{post_id}/edit_comment/{comment_id}/",
                    web::get().to(comments::edit_form),
                )
                .route(
                    "/{post_id}/edit_comment/{comment_id}/",
                    web::post().to(comments::update),
                )
                .route(
                    "/{post_id}/delete_comment/{comment_id}/",
                    web::get().to(comments::delete_form),
                )
                .route(
                    "/{post_id}/delete_comment/{comment_id}/",
                    web::post().to(comments::delete),
                ),
        )
        .service(
            web::scope("/auth")
                .route("/login/", web::get().to(auth::login_form))
                .route("/login/", web::post().to(auth::login))
                .route("/registration/", web::post().to(auth::register))
                .route("/me/", web::get().to(auth::me)),
        );
}
