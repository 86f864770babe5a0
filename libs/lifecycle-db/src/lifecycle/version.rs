//! Optimistic version guard.
//!
//! An entity update is one conditional statement:
//!
//! ```sql
//! UPDATE t SET <changes>, version = version + 1
//!  WHERE id = ? AND version = <loaded> AND <live filter>
//! ```
//!
//! Backends with `RETURNING` hand back the written row from the same statement; the
//! others re-read it by id. Zero affected rows is classified afterwards with a plain
//! read. That read only decides which error to report; it never guards the write.

use sea_orm::sea_query::{ColumnType, Expr, SimpleExpr};
use sea_orm::{ActiveModelTrait, ConnectionTrait, ModelTrait, QueryFilter, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use super::entity_traits::{AuditedEntity, LifecycleField};
use super::error::LifecycleError;
use super::registry::EntityDescriptor;

/// Initial version, typed to match the column.
pub(crate) fn zero_version(column_type: &ColumnType) -> Value {
    match column_type {
        ColumnType::SmallInteger => Value::from(0_i16),
        ColumnType::BigInteger => Value::from(0_i64),
        _ => Value::from(0_i32),
    }
}

/// Numeric value of a version column, whatever its integer width.
#[must_use]
pub fn version_number(value: &Value) -> Option<i64> {
    match value {
        Value::TinyInt(Some(v)) => Some(i64::from(*v)),
        Value::SmallInt(Some(v)) => Some(i64::from(*v)),
        Value::Int(Some(v)) => Some(i64::from(*v)),
        Value::BigInt(Some(v)) => Some(*v),
        _ => None,
    }
}

pub(crate) fn column<E: AuditedEntity>(field: LifecycleField) -> Result<E::Column, LifecycleError> {
    E::lifecycle_col(field).ok_or(LifecycleError::Invalid(
        "entity does not map a required lifecycle column",
    ))
}

/// `<live filter>` on the entity's flag column, if it has one.
pub(crate) fn live_condition<E: AuditedEntity>(entity: &EntityDescriptor) -> Option<SimpleExpr> {
    E::deleted_flag_col().map(|flag| entity.soft_delete().live_filter(Expr::col(flag)))
}

/// Run the conditional write for an already-intercepted active model.
///
/// `model` must not carry the id or version as `Set`; both are expressed in the
/// `WHERE` clause instead.
pub(crate) async fn guarded_update<E, C>(
    conn: &C,
    entity: &EntityDescriptor,
    model: E::ActiveModel,
    id: Uuid,
    expected: Value,
) -> Result<E::Model, LifecycleError>
where
    E: AuditedEntity,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    C: ConnectionTrait,
{
    let id_col = column::<E>(LifecycleField::Id)?;
    let version_col = column::<E>(LifecycleField::Version)?;
    let expected_number = version_number(&expected).unwrap_or_default();

    let mut update = E::update_many()
        .set(model)
        .col_expr(version_col, Expr::col(version_col).add(1))
        .filter(Expr::col(id_col).eq(id))
        .filter(Expr::col(version_col).eq(expected));
    if let Some(live) = live_condition::<E>(entity) {
        update = update.filter(live);
    }

    if conn.support_returning() {
        if let Some(row) = update.exec_with_returning(conn).await?.pop() {
            applied(entity, id, expected_number);
            return Ok(row);
        }
    } else if update.exec(conn).await?.rows_affected == 1 {
        applied(entity, id, expected_number);
        return E::find()
            .filter(Expr::col(id_col).eq(id))
            .one(conn)
            .await?
            .ok_or_else(|| LifecycleError::NotFound {
                entity: entity.table().to_owned(),
                id,
            });
    }

    let mut current = E::find().filter(Expr::col(id_col).eq(id));
    if let Some(live) = live_condition::<E>(entity) {
        current = current.filter(live);
    }
    match current.one(conn).await? {
        Some(row) => {
            let actual = version_number(&row.get(version_col)).unwrap_or_default();
            warn!(
                entity = entity.table(),
                %id,
                expected_version = expected_number,
                actual_version = actual,
                "optimistic version conflict"
            );
            Err(LifecycleError::StaleVersion {
                entity: entity.table().to_owned(),
                id,
                expected: expected_number,
                actual,
            })
        }
        None => Err(LifecycleError::NotFound {
            entity: entity.table().to_owned(),
            id,
        }),
    }
}

fn applied(entity: &EntityDescriptor, id: Uuid, expected: i64) {
    debug!(
        entity = entity.table(),
        %id,
        version = expected + 1,
        "versioned update applied"
    );
}
