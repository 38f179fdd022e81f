//! User domain entity and its create/update payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH};

/// Storage-assigned user identifier
pub type UserId = i32;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Unique user identifier
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: UserId,
    /// User display name
    #[cfg_attr(feature = "openapi", schema(example = "John Doe"))]
    pub name: String,
    /// User email address (unique)
    #[cfg_attr(feature = "openapi", schema(example = "john@example.com"))]
    pub email: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// User creation payload.
///
/// Identifier and timestamps are assigned by storage. Unknown fields
/// (e.g. a `password`) are rejected rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(deny_unknown_fields)]
pub struct CreateUser {
    /// User display name
    #[validate(length(
        min = 1,
        max = MAX_NAME_LENGTH,
        message = "Name must be between 1 and 255 characters"
    ))]
    #[cfg_attr(feature = "openapi", schema(example = "John Doe"))]
    pub name: String,
    /// User email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = MAX_EMAIL_LENGTH, message = "Email must be at most 255 characters")
    )]
    #[cfg_attr(feature = "openapi", schema(example = "john@example.com"))]
    pub email: String,
}

impl CreateUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Partial user update payload.
///
/// `None` means "leave unchanged"; every `Some` value is written verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default, deny_unknown_fields)]
pub struct UpdateUser {
    /// New display name
    #[validate(length(max = MAX_NAME_LENGTH, message = "Name must be at most 255 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Jane Doe"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = MAX_EMAIL_LENGTH, message = "Email must be at most 255 characters")
    )]
    #[cfg_attr(feature = "openapi", schema(example = "jane@example.com"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UpdateUser {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }
}
