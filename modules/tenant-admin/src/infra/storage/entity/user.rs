use lifecycle_db::{Audited, OffsetTimestamp};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Audited)]
#[sea_orm(table_name = "lb_user")]
#[audit(soft_delete = "DEFAULT_SOFT_DELETE")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub current_tenant_id: Option<Uuid>,
    pub current_team_id: Option<Uuid>,
    pub is_super_admin: bool,
    pub is_active: bool,
    #[sea_orm(column_type = "DateTime", nullable)]
    pub last_login_at: Option<OffsetTimestamp>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_system: bool,

    pub is_deleted: bool,
    #[sea_orm(column_type = "DateTime", nullable)]
    pub deleted_at: Option<OffsetTimestamp>,
    pub deleted_by: Option<Uuid>,
    #[sea_orm(column_type = "DateTime")]
    pub created_at: OffsetTimestamp,
    pub created_by: Option<Uuid>,
    #[sea_orm(column_type = "DateTime")]
    pub updated_at: OffsetTimestamp,
    pub updated_by: Option<Uuid>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
