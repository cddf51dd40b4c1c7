//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog.
//! Entities, repository ports, and the rules deciding who sees and who may
//! change what. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod routes;
pub mod service;

pub use error::{DomainError, FieldErrors, RepoError};
pub use policy::Access;
pub use service::BlogService;
