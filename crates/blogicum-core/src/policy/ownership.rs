//! Who may change what.

use crate::domain::{User, Viewer};
use crate::routes;

use super::Access;

/// Anonymous viewers are sent to the login page, then back to `next`.
pub fn require_login(viewer: &Viewer, next: &str) -> Access<i64> {
    match viewer {
        Viewer::User(id) => Access::Allowed(*id),
        Viewer::Anonymous => Access::RedirectTo(routes::login_path(Some(next))),
    }
}

/// Only the author may mutate; anyone else is sent to `fallback`.
///
/// The entity stays visible, only the mutation is refused.
pub fn require_author(user_id: i64, author_id: i64, fallback: String) -> Access<()> {
    if user_id == author_id {
        Access::Allowed(())
    } else {
        tracing::debug!(user_id, author_id, "Mutation refused: not the author");
        Access::RedirectTo(fallback)
    }
}

/// Only the owner may edit a profile; others land on its public page.
pub fn require_profile_owner(user_id: i64, profile: &User) -> Access<()> {
    require_author(user_id, profile.id, routes::profile_path(&profile.username))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_redirected_to_login() {
        let access = require_login(&Viewer::Anonymous, "/posts/create/");
        assert_eq!(
            access,
            Access::RedirectTo("/auth/login/?next=%2Fposts%2Fcreate%2F".to_string())
        );
        assert_eq!(require_login(&Viewer::User(4), "/"), Access::Allowed(4));
    }

    #[test]
    fn test_non_author_soft_fails_to_fallback() {
        assert_eq!(
            require_author(2, 1, "/posts/9/".to_string()),
            Access::RedirectTo("/posts/9/".to_string())
        );
        assert!(require_author(1, 1, "/posts/9/".to_string()).is_allowed());
    }

    #[test]
    fn test_profile_owner() {
        let mut user = User::new("carol".into(), String::new(), String::new());
        user.id = 3;

        assert!(require_profile_owner(3, &user).is_allowed());
        assert_eq!(
            require_profile_owner(8, &user).redirect_location(),
            Some("/profile/carol/")
        );
    }
}
