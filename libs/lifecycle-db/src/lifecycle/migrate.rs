//! Schema helpers for lifecycle-managed tables.
//!
//! ```ignore
//! use sea_orm_migration::prelude::*;
//! use lifecycle_db::lifecycle::migrate::with_lifecycle_columns;
//!
//! let mut table = Table::create();
//! table
//!     .table(Users::Table)
//!     .if_not_exists()
//!     .col(ColumnDef::new(Users::Username).string().not_null());
//! with_lifecycle_columns(&mut table);
//! manager.create_table(table).await?;
//! ```

use sea_orm::sea_query::{Alias, ColumnDef, TableCreateStatement};

use super::entity_traits::LifecycleField;

fn column(field: LifecycleField) -> ColumnDef {
    ColumnDef::new(Alias::new(field.canonical_name()))
}

/// Column definitions for every base-entity field, under the canonical names.
///
/// Timestamps are naive `DATETIME` holding UTC; the id is the primary key.
#[must_use]
pub fn lifecycle_columns() -> Vec<ColumnDef> {
    vec![
        column(LifecycleField::Id).uuid().not_null().primary_key().to_owned(),
        column(LifecycleField::IsDeleted)
            .boolean()
            .not_null()
            .default(false)
            .to_owned(),
        column(LifecycleField::DeletedAt).date_time().null().to_owned(),
        column(LifecycleField::DeletedBy).uuid().null().to_owned(),
        column(LifecycleField::CreatedAt).date_time().not_null().to_owned(),
        column(LifecycleField::CreatedBy).uuid().null().to_owned(),
        column(LifecycleField::UpdatedAt).date_time().not_null().to_owned(),
        column(LifecycleField::UpdatedBy).uuid().null().to_owned(),
        column(LifecycleField::Version)
            .integer()
            .not_null()
            .default(0)
            .to_owned(),
    ]
}

/// Add [`lifecycle_columns`] to a table definition.
pub fn with_lifecycle_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    for col in lifecycle_columns() {
        table.col(col);
    }
    table
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use sea_orm::sea_query::{SqliteQueryBuilder, Table};

    #[test]
    fn adds_every_canonical_column() {
        let mut table = Table::create();
        table
            .table(Alias::new("gadgets"))
            .col(ColumnDef::new(Alias::new("label")).string().not_null());
        let sql = with_lifecycle_columns(&mut table).to_string(SqliteQueryBuilder);

        for field in LifecycleField::ALL {
            assert!(
                sql.contains(&format!("\"{}\"", field.canonical_name())),
                "{field} missing from {sql}"
            );
        }
        assert!(sql.contains("\"label\""), "{sql}");
        assert!(sql.contains("PRIMARY KEY"), "{sql}");
    }
}
