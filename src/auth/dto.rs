use serde::{Deserialize, Serialize};

use crate::auth::user::User;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Public part of a user returned to the client.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            name: user.name,
            picture: user.picture,
        }
    }
}
