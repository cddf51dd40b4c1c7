//! Profile editing.

use super::{BlogService, allowed};
use crate::domain::{ProfileChanges, User, Viewer};
use crate::error::{DomainError, RepoError};
use crate::policy::{Access, require_login, require_profile_owner};
use crate::routes;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

impl BlogService {
    /// The profile record, if it belongs to the viewer.
    pub async fn profile_for_edit(
        &self,
        viewer: &Viewer,
        username: &str,
    ) -> Result<Access<User>, DomainError> {
        let user_id = allowed!(require_login(viewer, &routes::profile_edit_path(username)));
        let Some(user) = self.repos.users.find_by_username(username).await? else {
            return Ok(Access::NotFound);
        };
        allowed!(require_profile_owner(user_id, &user));
        Ok(Access::Allowed(user))
    }

    /// Update the viewer's own profile. A new username must be free.
    pub async fn update_profile(
        &self,
        viewer: &Viewer,
        username: &str,
        changes: ProfileChanges,
    ) -> Result<Access<User>, DomainError> {
        let mut user = allowed!(self.profile_for_edit(viewer, username).await?);

        if changes.username != user.username
            && self
                .repos
                .users
                .find_by_username(&changes.username)
                .await?
                .is_some()
        {
            return Err(DomainError::field("username", USERNAME_TAKEN));
        }

        changes.apply_to(&mut user);
        let user = match self.repos.users.update(user).await {
            Ok(user) => user,
            Err(RepoError::Constraint(_)) => {
                return Err(DomainError::field("username", USERNAME_TAKEN));
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!(user_id = user.id, "Profile updated");

        Ok(Access::Allowed(user))
    }
}
