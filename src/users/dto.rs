use serde::{Deserialize, Serialize};

use crate::users::repo_types::User;

pub const REGISTERED_MESSAGE: &str = "Registration successful";
pub const LOGGED_IN_MESSAGE: &str = "Login successful";

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login. Extra fields such as `email` are ignored.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Stored record minus the password column.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_omits_password() {
        let user = User {
            id: 7,
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "$argon2id$secret".into(),
        };
        let json = serde_json::to_value(LoginResponse {
            message: LOGGED_IN_MESSAGE.into(),
            user: user.into(),
        })
        .unwrap();
        assert_eq!(json["message"], LOGGED_IN_MESSAGE);
        assert_eq!(json["user"]["id"], 7);
        assert_eq!(json["user"]["username"], "alice");
        assert!(json["user"].get("password").is_none());
    }

    #[test]
    fn login_request_ignores_email() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","email":"a@x.com","password":"pw1"}"#)
                .unwrap();
        assert_eq!(req.username, "alice");
        assert_eq!(req.password, "pw1");
    }

    #[test]
    fn register_request_requires_all_fields() {
        assert!(serde_json::from_str::<RegisterRequest>(r#"{"username":"alice"}"#).is_err());
    }
}
