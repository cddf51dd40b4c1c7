//! Visibility and ownership rules.
//!
//! Guards return an [`Access`] that the caller inspects before doing any
//! work; nothing here short-circuits a request on its own.

mod ownership;
mod visibility;

pub use ownership::{require_author, require_login, require_profile_owner};
pub use visibility::{PostQuery, PostScope, Visibility, can_view, is_publicly_visible, visible_posts};

/// Outcome of a guarded lookup or mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<T> {
    /// Proceed with the value.
    Allowed(T),
    /// Soft-fail: send the viewer to this path instead.
    RedirectTo(String),
    /// Indistinguishable from a missing record.
    NotFound,
}

impl<T> Access<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Access<U> {
        match self {
            Access::Allowed(value) => Access::Allowed(f(value)),
            Access::RedirectTo(location) => Access::RedirectTo(location),
            Access::NotFound => Access::NotFound,
        }
    }

    /// Split into the allowed value or the denial to hand back unchanged.
    pub fn into_allowed<U>(self) -> Result<T, Access<U>> {
        match self {
            Access::Allowed(value) => Ok(value),
            Access::RedirectTo(location) => Err(Access::RedirectTo(location)),
            Access::NotFound => Err(Access::NotFound),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed(_))
    }

    pub fn redirect_location(&self) -> Option<&str> {
        match self {
            Access::RedirectTo(location) => Some(location),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Access<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Access::NotFound, Access::Allowed)
    }
}
