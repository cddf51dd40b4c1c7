//! Input forms with declarative validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

fn default_true() -> bool {
    true
}

/// Post creation/edit form. The author is always the requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, max = 256, message = "Title must be between 1 and 256 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,

    /// A future date schedules the publication.
    pub pub_date: DateTime<Utc>,

    #[serde(default)]
    pub location: Option<i64>,

    #[validate(required(message = "This field is required."))]
    pub category: Option<i64>,

    #[serde(default)]
    #[validate(length(max = 256, message = "Image path must be at most 256 characters"))]
    pub image: Option<String>,

    #[serde(default = "default_true")]
    pub is_published: bool,
}

impl PostForm {
    /// Empty form for the creation page.
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            title: String::new(),
            text: String::new(),
            pub_date: now,
            location: None,
            category: None,
            image: None,
            is_published: true,
        }
    }
}

/// Comment form: just the text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
}

/// Profile edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(default)]
    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    pub last_name: String,

    #[validate(
        length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
}

/// Registration form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(
        length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
}

/// Login form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

/// Letters, digits and `@ . + - _` only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username").with_message(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .into(),
        ))
    }
}

fn validate_not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("This field is required.".into()))
    } else {
        Ok(())
    }
}

/// Flatten validator output into field name -> messages.
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value ({})", e.code),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
