use async_trait::async_trait;
use lifecycle_security::SecurityContext;
use uuid::Uuid;

use super::error::DomainError;
use super::model::{Record, Team, Tenant, User};

/// Reads only ever see live rows; `delete` is a soft delete and returns `false` when
/// there was no live row to delete.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, ctx: &SecurityContext, tenant: Tenant)
    -> Result<Record<Tenant>, DomainError>;

    /// Versioned update; a stale `version` fails with `DomainError::Conflict`.
    async fn save(
        &self,
        ctx: &SecurityContext,
        tenant: Record<Tenant>,
    ) -> Result<Record<Tenant>, DomainError>;

    /// Create a tenant and its default team in one transaction.
    async fn create_with_default_team(
        &self,
        ctx: &SecurityContext,
        tenant: Tenant,
        team_name: String,
    ) -> Result<(Record<Tenant>, Record<Team>), DomainError>;

    async fn delete(&self, ctx: &SecurityContext, id: Uuid) -> Result<bool, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<Tenant>>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Record<Tenant>>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Record<Tenant>>, DomainError>;

    async fn find_default(&self) -> Result<Option<Record<Tenant>>, DomainError>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create(&self, ctx: &SecurityContext, team: Team) -> Result<Record<Team>, DomainError>;

    async fn save(&self, ctx: &SecurityContext, team: Record<Team>)
    -> Result<Record<Team>, DomainError>;

    async fn delete(&self, ctx: &SecurityContext, id: Uuid) -> Result<bool, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<Team>>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Record<Team>>, DomainError>;

    async fn find_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Record<Team>>, DomainError>;

    async fn find_default(&self, tenant_id: Uuid) -> Result<Option<Record<Team>>, DomainError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, ctx: &SecurityContext, user: User) -> Result<Record<User>, DomainError>;

    async fn save(&self, ctx: &SecurityContext, user: Record<User>)
    -> Result<Record<User>, DomainError>;

    async fn delete(&self, ctx: &SecurityContext, id: Uuid) -> Result<bool, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<User>>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Record<User>>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Record<User>>, DomainError>;

    /// Users whose current tenant is `tenant_id`.
    async fn find_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Record<User>>, DomainError>;
}
