//! Entities shared by unit tests.

pub mod widget {
    use sea_orm::entity::prelude::*;

    use crate::lifecycle::entity_traits::AuditedEntity;
    use crate::lifecycle::timestamp::OffsetTimestamp;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "widgets")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
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

    impl AuditedEntity for Entity {
        fn id_col() -> Option<Column> {
            Some(Column::Id)
        }
        fn deleted_flag_col() -> Option<Column> {
            Some(Column::IsDeleted)
        }
        fn deleted_at_col() -> Option<Column> {
            Some(Column::DeletedAt)
        }
        fn deleted_by_col() -> Option<Column> {
            Some(Column::DeletedBy)
        }
        fn created_at_col() -> Option<Column> {
            Some(Column::CreatedAt)
        }
        fn created_by_col() -> Option<Column> {
            Some(Column::CreatedBy)
        }
        fn updated_at_col() -> Option<Column> {
            Some(Column::UpdatedAt)
        }
        fn updated_by_col() -> Option<Column> {
            Some(Column::UpdatedBy)
        }
        fn version_col() -> Option<Column> {
            Some(Column::Version)
        }
    }
}

/// Same shape as `widget` but with an integer deletion flag.
pub mod int_flag {
    use sea_orm::entity::prelude::*;

    use crate::lifecycle::entity_traits::AuditedEntity;
    use crate::lifecycle::timestamp::OffsetTimestamp;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "int_flags")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub is_deleted: i32,
        #[sea_orm(column_type = "DateTime", nullable)]
        pub deleted_at: Option<OffsetTimestamp>,
        #[sea_orm(column_type = "DateTime")]
        pub created_at: OffsetTimestamp,
        #[sea_orm(column_type = "DateTime")]
        pub updated_at: OffsetTimestamp,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl AuditedEntity for Entity {
        fn id_col() -> Option<Column> {
            Some(Column::Id)
        }
        fn deleted_flag_col() -> Option<Column> {
            Some(Column::IsDeleted)
        }
        fn deleted_at_col() -> Option<Column> {
            Some(Column::DeletedAt)
        }
        fn deleted_by_col() -> Option<Column> {
            None
        }
        fn created_at_col() -> Option<Column> {
            Some(Column::CreatedAt)
        }
        fn created_by_col() -> Option<Column> {
            None
        }
        fn updated_at_col() -> Option<Column> {
            Some(Column::UpdatedAt)
        }
        fn updated_by_col() -> Option<Column> {
            None
        }
        fn version_col() -> Option<Column> {
            Some(Column::Version)
        }
    }
}

/// Audited, but without any deletion columns.
pub mod no_flag {
    use sea_orm::entity::prelude::*;

    use crate::lifecycle::entity_traits::AuditedEntity;
    use crate::lifecycle::timestamp::OffsetTimestamp;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "no_flags")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(column_type = "DateTime")]
        pub created_at: OffsetTimestamp,
        #[sea_orm(column_type = "DateTime")]
        pub updated_at: OffsetTimestamp,
        pub version: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl AuditedEntity for Entity {
        fn id_col() -> Option<Column> {
            Some(Column::Id)
        }
        fn deleted_flag_col() -> Option<Column> {
            None
        }
        fn deleted_at_col() -> Option<Column> {
            None
        }
        fn deleted_by_col() -> Option<Column> {
            None
        }
        fn created_at_col() -> Option<Column> {
            Some(Column::CreatedAt)
        }
        fn created_by_col() -> Option<Column> {
            None
        }
        fn updated_at_col() -> Option<Column> {
            Some(Column::UpdatedAt)
        }
        fn updated_by_col() -> Option<Column> {
            None
        }
        fn version_col() -> Option<Column> {
            Some(Column::Version)
        }
    }
}
