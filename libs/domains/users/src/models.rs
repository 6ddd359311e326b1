use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::patch::Patch;

/// Stored user, including the password hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

/// User as returned by the API (never carries the hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
        }
    }
}

fn default_true() -> bool {
    true
}

/// DTO for registering a user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 50, message = "length must be between 1 and 50"))]
    pub username: String,

    #[validate(email(message = "value is not a valid email address"), length(max = 255))]
    pub email: String,

    pub password: String,

    #[serde(default = "default_true")]
    #[schema(default = true)]
    pub is_active: bool,

    #[serde(default)]
    pub is_superuser: bool,
}

/// A user ready to insert: the password is already hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl NewUser {
    pub fn from_create(input: CreateUser, hashed_password: String) -> Self {
        Self {
            username: input.username,
            email: input.email,
            hashed_password,
            is_active: input.is_active,
            is_superuser: input.is_superuser,
        }
    }
}

/// DTO for a partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub username: Patch<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub email: Patch<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub password: Patch<String>,

    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub is_active: Patch<bool>,

    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub is_superuser: Patch<bool>,
}

fn issue(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn reject_null<T>(errors: &mut ValidationErrors, field: &'static str, patch: &Patch<T>) {
    if patch.is_null() {
        errors.add(field, issue("null", "field may not be null"));
    }
}

impl Validate for UpdateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        reject_null(&mut errors, "username", &self.username);
        reject_null(&mut errors, "email", &self.email);
        reject_null(&mut errors, "password", &self.password);
        reject_null(&mut errors, "is_active", &self.is_active);
        reject_null(&mut errors, "is_superuser", &self.is_superuser);

        if let Some(username) = self.username.as_value() {
            if username.is_empty() || username.chars().count() > 50 {
                errors.add("username", issue("length", "length must be between 1 and 50"));
            }
        }
        if let Some(email) = self.email.as_value() {
            if !email.validate_email() {
                errors.add("email", issue("email", "value is not a valid email address"));
            }
            // Same cap as `CreateUser` and the `users.email` column
            if email.chars().count() > 255 {
                errors.add("email", issue("length", "length must be at most 255"));
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl User {
    /// Merge a partial update. `new_hash` replaces the stored hash when the
    /// update carried a password.
    pub fn apply_update(&mut self, update: UpdateUser, new_hash: Option<String>) {
        update.username.apply_to(&mut self.username);
        update.email.apply_to(&mut self.email);
        update.is_active.apply_to(&mut self.is_active);
        update.is_superuser.apply_to(&mut self.is_superuser);

        if let Some(hash) = new_hash {
            self.hashed_password = hash;
        }
    }
}

/// Login body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "bearer"
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: axum_helpers::auth::TOKEN_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            hashed_password: "$argon2id$old".into(),
            is_active: true,
            is_superuser: false,
        }
    }

    #[test]
    fn test_create_user_defaults() {
        let input: CreateUser = serde_json::from_str(
            r#"{"username": "alice", "email": "alice@example.com", "password": "pw"}"#,
        )
        .unwrap();

        assert!(input.is_active);
        assert!(!input.is_superuser);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_user_rejects_bad_email() {
        let input: CreateUser = serde_json::from_str(
            r#"{"username": "alice", "email": "not-an-email", "password": "pw"}"#,
        )
        .unwrap();

        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_email_length_cap_matches_on_create_and_update() {
        let email = format!("{}@{}.com", "a".repeat(60), vec!["b".repeat(60); 4].join("."));

        let create: CreateUser = serde_json::from_value(
            serde_json::json!({"username": "alice", "email": email, "password": "pw"}),
        )
        .unwrap();
        let update: UpdateUser = serde_json::from_value(serde_json::json!({"email": email})).unwrap();

        assert!(create.validate().unwrap_err().field_errors().contains_key("email"));
        assert!(update.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn test_response_has_no_hash() {
        let json = serde_json::to_value(UserResponse::from(user())).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_apply_update_email_only() {
        let update: UpdateUser = serde_json::from_str(r#"{"email": "new@x.com"}"#).unwrap();
        let mut stored = user();
        stored.apply_update(update, None);

        assert_eq!(stored.email, "new@x.com");
        assert_eq!(stored.username, "alice");
        assert_eq!(stored.hashed_password, "$argon2id$old");
    }

    #[test]
    fn test_apply_update_with_new_hash() {
        let update: UpdateUser =
            serde_json::from_str(r#"{"password": "new", "is_active": false}"#).unwrap();
        let mut stored = user();
        stored.apply_update(update, Some("$argon2id$new".into()));

        assert_eq!(stored.hashed_password, "$argon2id$new");
        assert!(!stored.is_active);
    }

    #[test]
    fn test_update_rejects_explicit_null() {
        let update: UpdateUser = serde_json::from_str(r#"{"username": null}"#).unwrap();
        let errors = update.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_update_validates_supplied_values() {
        let update: UpdateUser = serde_json::from_str(r#"{"email": "nope"}"#).unwrap();
        assert!(update.validate().is_err());

        let update: UpdateUser = serde_json::from_str(r#"{}"#).unwrap();
        assert!(update.validate().is_ok());
    }
}
