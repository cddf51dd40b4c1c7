//! Blog operations: guards, visibility and list assembly composed per
//! request.
//!
//! Every lookup or mutation that a viewer might not be entitled to returns
//! `Result<Access<T>, DomainError>`. The error side is reserved for invalid
//! input and store failures.

mod comments;
mod listing;
mod posts;
mod profiles;

use std::collections::HashMap;

use crate::ports::Repositories;

/// Return early with the denial when an [`crate::Access`] is not allowed.
macro_rules! allowed {
    ($access:expr) => {
        match $access.into_allowed() {
            Ok(value) => value,
            Err(denied) => return Ok(denied),
        }
    };
}
pub(crate) use allowed;

/// Entry point for every blog page and form.
#[derive(Clone)]
pub struct BlogService {
    repos: Repositories,
}

impl BlogService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }
}

/// Index entities by id.
fn by_id<T>(items: Vec<T>, id: impl Fn(&T) -> i64) -> HashMap<i64, T> {
    items.into_iter().map(|item| (id(&item), item)).collect()
}

/// Distinct ids in first-seen order.
fn distinct(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut seen = Vec::new();
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}
