use serde::{Deserialize, Serialize};

use super::errors::AuthError;
use super::validation::{Checks, Validate};

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), AuthError> {
        Checks::default()
            .min_len("username", &self.username, 3, "Username must be atleast 3 characters long!")
            .email("email", &self.email, "Enter a valid email!")
            .min_len("password", &self.password, 5, "Password is required!")
            .finish()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AuthError> {
        Checks::default()
            .email("email", &self.email, "Enter a valid email!")
            .min_len("password", &self.password, 5, "Password must be at least 5 characters long!")
            .finish()
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub success: bool,
    pub auth_token: String,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub msg: &'static str,
    pub auth_token: String,
}
