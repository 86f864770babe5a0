//! Record-level persistence shared by the repositories.
//!
//! Every function takes the `LifecycleConn` explicitly, so the same code runs on the
//! pool and inside `in_transaction`.

use lifecycle_db::lifecycle::{AuditedEntity, LifecycleConn};
use lifecycle_security::SecurityContext;
use sea_orm::sea_query::Condition;
use sea_orm::{ActiveModelTrait, ConnectionTrait, IntoActiveModel, Order};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::Record;

/// Entity whose rows map to a domain [`Record`].
pub trait StoredEntity: AuditedEntity {
    type Data: Send;

    fn into_record(model: Self::Model) -> Record<Self::Data>;

    /// Active model for a new row. Lifecycle columns are left to the interceptors.
    fn new_row(data: Self::Data) -> Self::ActiveModel;

    /// Active model that saves `record`: id and loaded version unchanged, business
    /// columns set.
    fn changed_row(record: Record<Self::Data>) -> Self::ActiveModel;
}

pub async fn insert<E, C>(
    db: &LifecycleConn<C>,
    ctx: &SecurityContext,
    data: E::Data,
) -> Result<Record<E::Data>, DomainError>
where
    E: StoredEntity,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ConnectionTrait + Send + Sync,
{
    let model = db.insert::<E>(ctx, E::new_row(data)).await?;
    Ok(E::into_record(model))
}

pub async fn save<E, C>(
    db: &LifecycleConn<C>,
    ctx: &SecurityContext,
    record: Record<E::Data>,
) -> Result<Record<E::Data>, DomainError>
where
    E: StoredEntity,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    C: ConnectionTrait + Send + Sync,
{
    let model = db.update::<E>(ctx, E::changed_row(record)).await?;
    Ok(E::into_record(model))
}

pub async fn delete<E, C>(
    db: &LifecycleConn<C>,
    ctx: &SecurityContext,
    id: Uuid,
) -> Result<bool, DomainError>
where
    E: StoredEntity,
    C: ConnectionTrait + Send + Sync,
{
    Ok(db.delete_by_id::<E>(ctx, id).await?)
}

pub async fn find_by_id<E, C>(
    db: &LifecycleConn<C>,
    id: Uuid,
) -> Result<Option<Record<E::Data>>, DomainError>
where
    E: StoredEntity,
    C: ConnectionTrait + Send + Sync,
{
    Ok(db.find_by_id::<E>(id).await?.map(E::into_record))
}

/// Live rows matching `condition`, oldest first.
pub async fn find_where<E, C>(
    db: &LifecycleConn<C>,
    condition: Condition,
) -> Result<Vec<Record<E::Data>>, DomainError>
where
    E: StoredEntity,
    C: ConnectionTrait + Send + Sync,
{
    let mut query = db.find::<E>()?.filter(condition);
    if let Some(created_at) = E::created_at_col() {
        query = query.order_by(created_at, Order::Asc);
    }
    let rows = query.all(db.conn()).await?;
    Ok(rows.into_iter().map(E::into_record).collect())
}

pub async fn find_first<E, C>(
    db: &LifecycleConn<C>,
    condition: Condition,
) -> Result<Option<Record<E::Data>>, DomainError>
where
    E: StoredEntity,
    C: ConnectionTrait + Send + Sync,
{
    let row = db.find::<E>()?.filter(condition).one(db.conn()).await?;
    Ok(row.map(E::into_record))
}
