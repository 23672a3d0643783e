use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Player {
    #[sqlx(rename = "userId")]
    pub user_id: i64,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    /// Owned by the external identity provider; never written here.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub language: String,
    pub registered_at: i64,
    pub status: String,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub ext_user_id: Option<String>,
}

/// The columns written when a player registers for the first time.
/// Everything else takes its schema default.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub ext_user_id: String,
    pub first_name: String,
    pub email: String,
    pub registered_at: i64,
}

impl NewPlayer {
    pub fn new(ext_user_id: String, nickname: String, email: String) -> Self {
        Self {
            ext_user_id,
            first_name: nickname,
            email,
            registered_at: chrono::Utc::now().timestamp(),
        }
    }
}
