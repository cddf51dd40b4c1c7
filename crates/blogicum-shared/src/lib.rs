//! # Blogicum Shared
//!
//! Request and response types exchanged with clients.

pub mod dto;
pub mod forms;
pub mod response;

pub use forms::field_errors;
pub use response::{ApiResponse, ErrorResponse};
