use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity - a user's remark on a post. Listed oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: i64, author_id: i64, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            text,
            author_id,
            post_id,
            created_at,
        }
    }
}
