#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use lifecycle_db::lifecycle::migrate::with_lifecycle_columns;
use lifecycle_db::{ConnectOpts, LifecycleConn, LifecycleRegistry, OffsetTimestamp, connect};
use sea_orm::sea_query::{Alias, ColumnDef, Table};
use sea_orm::{ConnectionTrait, DatabaseConnection};

pub mod gadget {
    use lifecycle_db::{Audited, OffsetTimestamp};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Audited)]
    #[sea_orm(table_name = "gadgets")]
    #[audit(soft_delete = "DEFAULT_SOFT_DELETE")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub label: String,
        pub note: Option<String>,
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
}

/// Audited but never registered.
pub mod orphan {
    use lifecycle_db::{Audited, OffsetTimestamp};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Audited)]
    #[sea_orm(table_name = "orphans")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub is_deleted: bool,
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
}

/// In-memory sqlite with the `gadgets` table and a registry holding `gadget`.
pub async fn setup() -> LifecycleConn {
    setup_with("sqlite::memory:", 1).await
}

/// File-backed sqlite, so several pooled connections see the same `gadgets` table.
pub async fn setup_file(path: &Path, max_conns: u32) -> LifecycleConn {
    setup_with(&format!("sqlite://{}?mode=rwc", path.display()), max_conns).await
}

async fn setup_with(dsn: &str, max_conns: u32) -> LifecycleConn {
    let conn = connect(
        dsn,
        ConnectOpts {
            max_conns: Some(max_conns),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to connect to database");
    create_gadgets(&conn).await;

    let registry = LifecycleRegistry::builder()
        .register::<gadget::Entity>()
        .build()
        .expect("registry");
    LifecycleConn::new(conn, Arc::new(registry))
}

async fn create_gadgets(conn: &DatabaseConnection) {
    let mut table = Table::create();
    table
        .table(Alias::new("gadgets"))
        .col(ColumnDef::new(Alias::new("label")).string().not_null())
        .col(ColumnDef::new(Alias::new("note")).string().null());
    with_lifecycle_columns(&mut table);

    let backend = conn.get_database_backend();
    conn.execute(backend.build(&table))
        .await
        .expect("Failed to create table");
}

/// Whole-second UTC instant, so it survives storage unchanged.
pub fn at(hour: u32, min: u32) -> OffsetTimestamp {
    OffsetTimestamp::from_datetime(Utc.with_ymd_and_hms(2025, 1, 15, hour, min, 0).unwrap())
}
