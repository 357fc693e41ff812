use serde::{Deserialize, Serialize};
use timbrapp_core::types::UserRole;

/// A row from the users table. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub nome: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

/// The user shape returned to clients after login and on /api/auth/status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub role: UserRole,
    pub is_admin: bool,
    pub is_web_dashboard: bool,
}

impl From<&User> for UserInfo {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            nome: u.nome.clone(),
            email: u.email.clone(),
            role: u.role,
            is_admin: u.role.is_admin(),
            is_web_dashboard: u.role.is_web_dashboard(),
        }
    }
}
