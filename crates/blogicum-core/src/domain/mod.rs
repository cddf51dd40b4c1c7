//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;
mod viewer;
mod views;

pub use category::{Category, is_valid_slug};
pub use comment::Comment;
pub use location::Location;
pub use post::{Post, PostDraft};
pub use user::{ProfileChanges, User};
pub use viewer::Viewer;
pub use views::{AuthorSummary, CategoryPage, CommentView, PostCard, PostDetail, ProfilePage};
