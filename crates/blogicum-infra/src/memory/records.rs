//! Tables and per-entity constraints of the in-memory store.

use std::collections::{BTreeMap, HashMap};

use blogicum_core::domain::{Category, Comment, Location, Post, User};
use blogicum_core::error::RepoError;

#[derive(Default)]
pub(crate) struct Tables {
    pub users: BTreeMap<i64, User>,
    pub categories: BTreeMap<i64, Category>,
    pub locations: BTreeMap<i64, Location>,
    pub posts: BTreeMap<i64, Post>,
    pub comments: BTreeMap<i64, Comment>,
    sequences: HashMap<&'static str, i64>,
}

impl Tables {
    /// Next id of a table's sequence. Ids are never reused.
    pub fn next_id(&mut self, table: &'static str) -> i64 {
        let id = self.sequences.entry(table).or_insert(0);
        *id += 1;
        *id
    }

    fn delete_post_rows(&mut self, post_ids: &[i64]) {
        for id in post_ids {
            self.posts.remove(id);
        }
        self.comments.retain(|_, c| !post_ids.contains(&c.post_id));
    }
}

/// A row type of the store.
pub(crate) trait Record: Clone + Send + Sync + 'static {
    const TABLE: &'static str;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn table(tables: &Tables) -> &BTreeMap<i64, Self>;
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self>;

    /// Unique and foreign keys, checked before every write.
    fn check(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }

    /// Cascades, applied after the row with `id` is gone.
    fn on_delete(_tables: &mut Tables, _id: i64) {}
}

fn missing(what: &str, id: i64) -> RepoError {
    RepoError::Constraint(format!("{what} {id} does not exist"))
}

impl Record for User {
    const TABLE: &'static str = "users";

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.users
    }
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.users
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        let taken = tables
            .users
            .values()
            .any(|u| u.id != self.id && u.username == self.username);
        if taken {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                self.username
            )));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: i64) {
        let authored: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.delete_post_rows(&authored);
        tables.comments.retain(|_, c| c.author_id != id);
    }
}

impl Record for Category {
    const TABLE: &'static str = "categories";

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.categories
    }
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.categories
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        let taken = tables
            .categories
            .values()
            .any(|c| c.id != self.id && c.slug == self.slug);
        if taken {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                self.slug
            )));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: i64) {
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
    }
}

impl Record for Location {
    const TABLE: &'static str = "locations";

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.locations
    }
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.locations
    }

    fn on_delete(tables: &mut Tables, id: i64) {
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
    }
}

impl Record for Post {
    const TABLE: &'static str = "posts";

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.posts
    }
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.posts
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.users.contains_key(&self.author_id) {
            return Err(missing("user", self.author_id));
        }
        if let Some(id) = self.category_id.filter(|id| !tables.categories.contains_key(id)) {
            return Err(missing("category", id));
        }
        if let Some(id) = self.location_id.filter(|id| !tables.locations.contains_key(id)) {
            return Err(missing("location", id));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: i64) {
        tables.delete_post_rows(&[id]);
    }
}

impl Record for Comment {
    const TABLE: &'static str = "comments";

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.comments
    }
    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.comments
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.users.contains_key(&self.author_id) {
            return Err(missing("user", self.author_id));
        }
        if !tables.posts.contains_key(&self.post_id) {
            return Err(missing("post", self.post_id));
        }
        Ok(())
    }
}
