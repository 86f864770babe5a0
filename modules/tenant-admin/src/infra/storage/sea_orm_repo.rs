use async_trait::async_trait;
use lifecycle_db::LifecycleConn;
use lifecycle_security::SecurityContext;
use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Condition, IntoCondition};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Record, Team, Tenant, User};
use crate::domain::repo::{TeamRepository, TenantRepository, UserRepository};

use super::entity::{team, tenant, user};
use super::store;

pub struct SeaOrmTenantRepository {
    db: LifecycleConn,
}

impl SeaOrmTenantRepository {
    #[must_use]
    pub fn new(db: LifecycleConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TenantRepository for SeaOrmTenantRepository {
    async fn create(
        &self,
        ctx: &SecurityContext,
        tenant: Tenant,
    ) -> Result<Record<Tenant>, DomainError> {
        store::insert::<tenant::Entity, _>(&self.db, ctx, tenant).await
    }

    async fn save(
        &self,
        ctx: &SecurityContext,
        tenant: Record<Tenant>,
    ) -> Result<Record<Tenant>, DomainError> {
        store::save::<tenant::Entity, _>(&self.db, ctx, tenant).await
    }

    async fn create_with_default_team(
        &self,
        ctx: &SecurityContext,
        tenant: Tenant,
        team_name: String,
    ) -> Result<(Record<Tenant>, Record<Team>), DomainError> {
        let ctx = ctx.clone();
        self.db
            .in_transaction(move |tx| {
                Box::pin(async move {
                    let tenant = store::insert::<tenant::Entity, _>(tx, &ctx, tenant).await?;
                    let team = Team {
                        tenant_id: tenant.id,
                        name: team_name,
                        is_default: true,
                        is_active: true,
                        ..Default::default()
                    };
                    let team = store::insert::<team::Entity, _>(tx, &ctx, team).await?;
                    Ok::<_, DomainError>((tenant, team))
                })
            })
            .await
            .map_err(|e| e.into_domain(DomainError::database_infra))
    }

    async fn delete(&self, ctx: &SecurityContext, id: Uuid) -> Result<bool, DomainError> {
        store::delete::<tenant::Entity, _>(&self.db, ctx, id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<Tenant>>, DomainError> {
        store::find_by_id::<tenant::Entity, _>(&self.db, id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Record<Tenant>>, DomainError> {
        let cond = tenant::Column::Name.eq(name).into_condition();
        store::find_first::<tenant::Entity, _>(&self.db, cond).await
    }

    async fn find_all(&self) -> Result<Vec<Record<Tenant>>, DomainError> {
        store::find_where::<tenant::Entity, _>(&self.db, Condition::all()).await
    }

    async fn find_default(&self) -> Result<Option<Record<Tenant>>, DomainError> {
        let cond = tenant::Column::IsDefault.eq(true).into_condition();
        store::find_first::<tenant::Entity, _>(&self.db, cond).await
    }
}

pub struct SeaOrmTeamRepository {
    db: LifecycleConn,
}

impl SeaOrmTeamRepository {
    #[must_use]
    pub fn new(db: LifecycleConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TeamRepository for SeaOrmTeamRepository {
    async fn create(&self, ctx: &SecurityContext, team: Team) -> Result<Record<Team>, DomainError> {
        store::insert::<team::Entity, _>(&self.db, ctx, team).await
    }

    async fn save(
        &self,
        ctx: &SecurityContext,
        team: Record<Team>,
    ) -> Result<Record<Team>, DomainError> {
        store::save::<team::Entity, _>(&self.db, ctx, team).await
    }

    async fn delete(&self, ctx: &SecurityContext, id: Uuid) -> Result<bool, DomainError> {
        store::delete::<team::Entity, _>(&self.db, ctx, id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<Team>>, DomainError> {
        store::find_by_id::<team::Entity, _>(&self.db, id).await
    }

    async fn find_all(&self) -> Result<Vec<Record<Team>>, DomainError> {
        store::find_where::<team::Entity, _>(&self.db, Condition::all()).await
    }

    async fn find_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Record<Team>>, DomainError> {
        let cond = team::Column::TenantId.eq(tenant_id).into_condition();
        store::find_where::<team::Entity, _>(&self.db, cond).await
    }

    async fn find_default(&self, tenant_id: Uuid) -> Result<Option<Record<Team>>, DomainError> {
        let cond = Condition::all()
            .add(team::Column::TenantId.eq(tenant_id))
            .add(team::Column::IsDefault.eq(true));
        store::find_first::<team::Entity, _>(&self.db, cond).await
    }
}

pub struct SeaOrmUserRepository {
    db: LifecycleConn,
}

impl SeaOrmUserRepository {
    #[must_use]
    pub fn new(db: LifecycleConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, ctx: &SecurityContext, user: User) -> Result<Record<User>, DomainError> {
        store::insert::<user::Entity, _>(&self.db, ctx, user).await
    }

    async fn save(
        &self,
        ctx: &SecurityContext,
        user: Record<User>,
    ) -> Result<Record<User>, DomainError> {
        store::save::<user::Entity, _>(&self.db, ctx, user).await
    }

    async fn delete(&self, ctx: &SecurityContext, id: Uuid) -> Result<bool, DomainError> {
        store::delete::<user::Entity, _>(&self.db, ctx, id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<User>>, DomainError> {
        store::find_by_id::<user::Entity, _>(&self.db, id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Record<User>>, DomainError> {
        let cond = user::Column::Username.eq(username).into_condition();
        store::find_first::<user::Entity, _>(&self.db, cond).await
    }

    async fn find_all(&self) -> Result<Vec<Record<User>>, DomainError> {
        store::find_where::<user::Entity, _>(&self.db, Condition::all()).await
    }

    async fn find_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Record<User>>, DomainError> {
        let cond = user::Column::CurrentTenantId.eq(tenant_id).into_condition();
        store::find_where::<user::Entity, _>(&self.db, cond).await
    }
}
