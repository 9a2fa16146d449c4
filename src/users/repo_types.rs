use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,          // assigned by SQLite, never reused
    pub username: String, // not unique
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String, // argon2 PHC string, or cleartext in parity mode
}
