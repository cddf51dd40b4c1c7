//! Canonical paths of the blog pages, used as redirect targets.

pub fn index_path() -> String {
    "/".to_string()
}

pub fn post_detail_path(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

pub fn post_create_path() -> String {
    "/posts/create/".to_string()
}

pub fn post_edit_path(post_id: i64) -> String {
    format!("/posts/{post_id}/edit/")
}

pub fn post_delete_path(post_id: i64) -> String {
    format!("/posts/{post_id}/delete/")
}

pub fn comment_create_path(post_id: i64) -> String {
    format!("/posts/{post_id}/comment/")
}

pub fn comment_edit_path(post_id: i64, comment_id: i64) -> String {
    format!("/posts/{post_id}/edit_comment/{comment_id}/")
}

pub fn comment_delete_path(post_id: i64, comment_id: i64) -> String {
    format!("/posts/{post_id}/delete_comment/{comment_id}/")
}

pub fn category_path(slug: &str) -> String {
    format!("/category/{slug}/")
}

pub fn profile_path(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

/// Where a user edits their own profile.
pub fn profile_edit_path(username: &str) -> String {
    format!("/profile/{}/edit/", urlencoding::encode(username))
}

/// Login page, remembering where to come back to.
pub fn login_path(next: Option<&str>) -> String {
    match next {
        Some(next) => format!("/auth/login/?next={}", urlencoding::encode(next)),
        None => "/auth/login/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_paths_encode_username() {
        assert_eq!(profile_path("alice"), "/profile/alice/");
        assert_eq!(profile_edit_path("bob+blog"), "/profile/bob%2Bblog/edit/");
    }

    #[test]
    fn test_post_and_comment_paths() {
        assert_eq!(post_detail_path(7), "/posts/7/");
        assert_eq!(comment_create_path(7), "/posts/7/comment/");
        assert_eq!(comment_edit_path(7, 2), "/posts/7/edit_comment/2/");
        assert_eq!(category_path("travel"), "/category/travel/");
    }

    #[test]
    fn test_login_path_keeps_next() {
        assert_eq!(login_path(None), "/auth/login/");
        assert_eq!(
            login_path(Some("/posts/3/edit/")),
            "/auth/login/?next=%2Fposts%2F3%2Fedit%2F"
        );
    }
}
