use lifecycle_db::{Audited, OffsetTimestamp};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Audited)]
#[sea_orm(table_name = "lb_tenant")]
#[audit(soft_delete = "DEFAULT_SOFT_DELETE")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub domain: Option<String>,
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
pub enum Relation {
    #[sea_orm(has_many = "super::team::Entity")]
    Team,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
