// ── Users and roles ──

use serde::Serialize;

use super::EntityId;

/// A managed user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<EntityId>,
    pub store_id: Option<EntityId>,
    pub enabled: bool,
}

impl User {
    /// Preferred human-readable label.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// A permission role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

/// The authenticated principal for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: EntityId,
    pub username: String,
    pub display_name: Option<String>,
    pub role_id: Option<EntityId>,
    pub permissions: Vec<String>,
}

impl SessionUser {
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}
