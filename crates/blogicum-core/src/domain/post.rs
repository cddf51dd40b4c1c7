use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a blog publication, possibly scheduled for the future.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    /// Publication instant; a future value schedules the post.
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub location_id: Option<i64>,
    pub category_id: Option<i64>,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new, not yet stored post from a draft.
    pub fn new(author_id: i64, draft: PostDraft, created_at: DateTime<Utc>) -> Self {
        let mut post = Self {
            id: 0,
            title: String::new(),
            text: String::new(),
            pub_date: created_at,
            author_id,
            location_id: None,
            category_id: None,
            image: None,
            is_published: true,
            created_at,
        };
        draft.apply_to(&mut post);
        post
    }
}

/// Author-editable fields of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub location_id: Option<i64>,
    pub category_id: Option<i64>,
    pub image: Option<String>,
    pub is_published: bool,
}

impl PostDraft {
    pub fn apply_to(self, post: &mut Post) {
        post.title = self.title;
        post.text = self.text;
        post.pub_date = self.pub_date;
        post.location_id = self.location_id;
        post.category_id = self.category_id;
        post.image = self.image;
        post.is_published = self.is_published;
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date,
            location_id: post.location_id,
            category_id: post.category_id,
            image: post.image.clone(),
            is_published: post.is_published,
        }
    }
}
