//! Profile editing.

use std::convert::Infallible;

use actix_web::{HttpResponse, web};

use blogicum_core::domain::{ProfileChanges, User};
use blogicum_core::routes;
use blogicum_shared::forms::ProfileForm;

use super::{deny, found, ok, parse_form, respond};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn form_from_user(user: &User) -> ProfileForm {
    ProfileForm {
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        username: user.username.clone(),
        email: Some(user.email.clone()).filter(|email| !email.is_empty()),
    }
}

/// GET /profile/{username}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let access = state
        .blog
        .profile_for_edit(&identity.viewer(), &username)
        .await?;

    respond(access, |user| ok(form_from_user(&user)))
}

/// POST /profile/{username}/edit/ - redirects to the profile under its
/// (possibly new) username.
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    username: web::Path<String>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    if let Err(denied) = state
        .blog
        .profile_for_edit(&viewer, &username)
        .await?
        .into_allowed::<Infallible>()
    {
        return deny(denied);
    }

    let form: ProfileForm = parse_form(&body)?;

    let changes = ProfileChanges {
        username: form.username,
        email: form.email.unwrap_or_default(),
        first_name: form.first_name,
        last_name: form.last_name,
    };
    let access = state.blog.update_profile(&viewer, &username, changes).await?;

    respond(access, |user| found(&routes::profile_path(&user.username)))
}
