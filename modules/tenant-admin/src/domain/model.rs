use lifecycle_db::OffsetTimestamp;
use uuid::Uuid;

/// A stored row: its lifecycle columns plus the entity's own fields.
///
/// `version` is the value the row had when it was read; saving the record succeeds only
/// if nobody has changed the row since.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub id: Uuid,
    pub version: i32,
    pub created_at: OffsetTimestamp,
    pub created_by: Option<Uuid>,
    pub updated_at: OffsetTimestamp,
    pub updated_by: Option<Uuid>,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tenant {
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub domain: Option<String>,
    pub is_system: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Team {
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub is_system: bool,
}

#[derive(Clone, PartialEq, Default)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub current_tenant_id: Option<Uuid>,
    pub current_team_id: Option<Uuid>,
    pub is_super_admin: bool,
    pub is_active: bool,
    pub last_login_at: Option<OffsetTimestamp>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_system: bool,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("current_tenant_id", &self.current_tenant_id)
            .field("current_team_id", &self.current_team_id)
            .field("is_super_admin", &self.is_super_admin)
            .field("is_active", &self.is_active)
            .field("last_login_at", &self.last_login_at)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("is_system", &self.is_system)
            .finish()
    }
}
