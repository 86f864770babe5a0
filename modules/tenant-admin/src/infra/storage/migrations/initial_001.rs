use lifecycle_db::lifecycle::migrate::with_lifecycle_columns;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut tenant = Table::create();
        tenant
            .table(Tenant::Table)
            .if_not_exists()
            .col(ColumnDef::new(Tenant::Name).string().not_null())
            .col(ColumnDef::new(Tenant::Description).string())
            .col(ColumnDef::new(Tenant::IsDefault).boolean().not_null().default(false))
            .col(ColumnDef::new(Tenant::IsActive).boolean().not_null().default(true))
            .col(ColumnDef::new(Tenant::Domain).string())
            .col(ColumnDef::new(Tenant::IsSystem).boolean().not_null().default(false));
        manager
            .create_table(with_lifecycle_columns(&mut tenant).to_owned())
            .await?;

        let mut team = Table::create();
        team.table(Team::Table)
            .if_not_exists()
            .col(ColumnDef::new(Team::TenantId).uuid().not_null())
            .col(ColumnDef::new(Team::Name).string().not_null())
            .col(ColumnDef::new(Team::Description).string())
            .col(ColumnDef::new(Team::IsDefault).boolean().not_null().default(false))
            .col(ColumnDef::new(Team::IsActive).boolean().not_null().default(true))
            .col(ColumnDef::new(Team::IsSystem).boolean().not_null().default(false));
        manager
            .create_table(with_lifecycle_columns(&mut team).to_owned())
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lb_team_tenant_id")
                    .table(Team::Table)
                    .col(Team::TenantId)
                    .to_owned(),
            )
            .await?;

        let mut user = Table::create();
        user.table(User::Table)
            .if_not_exists()
            .col(ColumnDef::new(User::Username).string().not_null())
            .col(ColumnDef::new(User::PasswordHash).string().not_null())
            .col(ColumnDef::new(User::CurrentTenantId).uuid())
            .col(ColumnDef::new(User::CurrentTeamId).uuid())
            .col(ColumnDef::new(User::IsSuperAdmin).boolean().not_null().default(false))
            .col(ColumnDef::new(User::IsActive).boolean().not_null().default(true))
            .col(ColumnDef::new(User::LastLoginAt).date_time())
            .col(ColumnDef::new(User::Name).string())
            .col(ColumnDef::new(User::Email).string())
            .col(ColumnDef::new(User::IsSystem).boolean().not_null().default(false));
        manager
            .create_table(with_lifecycle_columns(&mut user).to_owned())
            .await?;

        // Usernames stay unique among live rows only; enforced by the service.
        manager
            .create_index(
                Index::create()
                    .name("idx_lb_user_username")
                    .table(User::Table)
                    .col(User::Username)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tenant {
    #[sea_orm(iden = "lb_tenant")]
    Table,
    Name,
    Description,
    IsDefault,
    IsActive,
    Domain,
    IsSystem,
}

#[derive(DeriveIden)]
enum Team {
    #[sea_orm(iden = "lb_team")]
    Table,
    TenantId,
    Name,
    Description,
    IsDefault,
    IsActive,
    IsSystem,
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "lb_user")]
    Table,
    Username,
    PasswordHash,
    CurrentTenantId,
    CurrentTeamId,
    IsSuperAdmin,
    IsActive,
    LastLoginAt,
    Name,
    Email,
    IsSystem,
}
