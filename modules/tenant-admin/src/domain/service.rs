use std::sync::Arc;

use lifecycle_security::SecurityContext;
use tracing::info;
use uuid::Uuid;

use super::error::DomainError;
use super::model::{Record, Team, Tenant, User};
use super::repo::{TeamRepository, TenantRepository, UserRepository};

pub struct ServiceConfig {
    pub max_name_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 100,
        }
    }
}

/// Administrative operations over tenants, teams and users.
///
/// Lifecycle columns are never touched here; the storage layer stamps them.
pub struct Service {
    tenants: Arc<dyn TenantRepository>,
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
    config: ServiceConfig,
}

impl Service {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        teams: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            tenants,
            teams,
            users,
            config,
        }
    }

    /// Create a tenant together with its default team.
    pub async fn provision_tenant(
        &self,
        ctx: &SecurityContext,
        tenant: Tenant,
        team_name: String,
    ) -> Result<(Record<Tenant>, Record<Team>), DomainError> {
        self.validate_name("name", &tenant.name)?;
        self.validate_name("team_name", &team_name)?;
        if self.tenants.find_by_name(&tenant.name).await?.is_some() {
            return Err(DomainError::AlreadyExists {
                entity: "tenant",
                key: tenant.name,
            });
        }

        let (tenant, team) = self
            .tenants
            .create_with_default_team(ctx, tenant, team_name)
            .await?;
        info!(tenant_id = %tenant.id, team_id = %team.id, "tenant provisioned");
        Ok((tenant, team))
    }

    pub async fn rename_tenant(
        &self,
        ctx: &SecurityContext,
        id: Uuid,
        name: String,
    ) -> Result<Record<Tenant>, DomainError> {
        self.validate_name("name", &name)?;
        let mut tenant = self.tenant(id).await?;
        tenant.data.name = name;
        self.tenants.save(ctx, tenant).await
    }

    pub async fn tenant(&self, id: Uuid) -> Result<Record<Tenant>, DomainError> {
        self.tenants
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("tenant", id))
    }

    pub async fn tenants(&self) -> Result<Vec<Record<Tenant>>, DomainError> {
        self.tenants.find_all().await
    }

    pub async fn create_team(
        &self,
        ctx: &SecurityContext,
        team: Team,
    ) -> Result<Record<Team>, DomainError> {
        self.validate_name("name", &team.name)?;
        self.tenant(team.tenant_id).await?;
        self.teams.create(ctx, team).await
    }

    pub async fn teams_of(&self, tenant_id: Uuid) -> Result<Vec<Record<Team>>, DomainError> {
        self.teams.find_by_tenant(tenant_id).await
    }

    /// Soft-delete a team. A tenant's default team cannot be removed.
    pub async fn remove_team(&self, ctx: &SecurityContext, id: Uuid) -> Result<(), DomainError> {
        let team = self
            .teams
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("team", id))?;
        if team.data.is_default {
            return Err(DomainError::validation(
                "is_default",
                "the default team cannot be removed",
            ));
        }
        if !self.teams.delete(ctx, id).await? {
            return Err(DomainError::not_found("team", id));
        }
        Ok(())
    }

    /// Register a user. Usernames are unique among live users.
    pub async fn register_user(
        &self,
        ctx: &SecurityContext,
        user: User,
    ) -> Result<Record<User>, DomainError> {
        self.validate_name("username", &user.username)?;
        if self.users.find_by_username(&user.username).await?.is_some() {
            return Err(DomainError::AlreadyExists {
                entity: "user",
                key: user.username,
            });
        }
        self.users.create(ctx, user).await
    }

    pub async fn user(&self, id: Uuid) -> Result<Record<User>, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Point a user at a tenant and team.
    pub async fn switch_tenant(
        &self,
        ctx: &SecurityContext,
        user_id: Uuid,
        tenant_id: Uuid,
        team_id: Option<Uuid>,
    ) -> Result<Record<User>, DomainError> {
        self.tenant(tenant_id).await?;
        let team_id = match team_id {
            Some(id) => Some(id),
            None => self.teams.find_default(tenant_id).await?.map(|t| t.id),
        };

        let mut user = self.user(user_id).await?;
        user.data.current_tenant_id = Some(tenant_id);
        user.data.current_team_id = team_id;
        self.users.save(ctx, user).await
    }

    /// Apply `change` to a user record loaded earlier. Fails with
    /// `DomainError::Conflict` if the user changed since `user` was read.
    pub async fn update_user<F>(
        &self,
        ctx: &SecurityContext,
        mut user: Record<User>,
        change: F,
    ) -> Result<Record<User>, DomainError>
    where
        F: FnOnce(&mut User) + Send,
    {
        change(&mut user.data);
        self.validate_name("username", &user.data.username)?;
        self.users.save(ctx, user).await
    }

    pub async fn members_of(&self, tenant_id: Uuid) -> Result<Vec<Record<User>>, DomainError> {
        self.users.find_by_tenant(tenant_id).await
    }

    pub async fn remove_user(&self, ctx: &SecurityContext, id: Uuid) -> Result<(), DomainError> {
        if !self.users.delete(ctx, id).await? {
            return Err(DomainError::not_found("user", id));
        }
        Ok(())
    }

    fn validate_name(&self, field: &str, value: &str) -> Result<(), DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::validation(field, "must not be empty"));
        }
        if value.len() > self.config.max_name_length {
            return Err(DomainError::validation(
                field,
                format!("exceeds maximum length of {}", self.config.max_name_length),
            ));
        }
        Ok(())
    }
}
