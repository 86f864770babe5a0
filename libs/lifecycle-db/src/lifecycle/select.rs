use std::marker::PhantomData;

use sea_orm::sea_query::{Expr, IntoCondition};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use super::entity_traits::AuditedEntity;
use super::error::LifecycleError;
use super::registry::EntityDescriptor;

/// Typestate marker: the soft-delete scope has not been decided yet.
/// Queries in this state cannot be executed.
#[derive(Debug, Clone, Copy)]
pub struct Unscoped;

/// Typestate marker: the query is either filtered to live rows or explicitly
/// includes deleted ones.
#[derive(Debug, Clone, Copy)]
pub struct Scoped;

/// `Select` wrapper that refuses to run until the soft-delete scope is chosen.
///
/// ```rust,ignore
/// let active = user::Entity::find()
///     .lifecycle()
///     .live(registry.descriptor::<user::Entity>()?)
///     .filter(user::Column::TenantId.eq(tenant_id).into_condition())
///     .all(conn)
///     .await?;
/// ```
#[must_use]
#[derive(Clone, Debug)]
pub struct LifecycleSelect<E: EntityTrait, S> {
    inner: sea_orm::Select<E>,
    _state: PhantomData<S>,
}

pub trait LifecycleEntityExt<E: EntityTrait>: Sized {
    fn lifecycle(self) -> LifecycleSelect<E, Unscoped>;
}

impl<E: EntityTrait> LifecycleEntityExt<E> for sea_orm::Select<E> {
    fn lifecycle(self) -> LifecycleSelect<E, Unscoped> {
        LifecycleSelect {
            inner: self,
            _state: PhantomData,
        }
    }
}

impl<E: AuditedEntity> LifecycleSelect<E, Unscoped> {
    /// Restrict to rows the entity's soft-delete strategy considers live.
    ///
    /// This is the first predicate on the query; anything added later is ANDed after it.
    pub fn live(self, entity: &EntityDescriptor) -> LifecycleSelect<E, Scoped> {
        let inner = match E::deleted_flag_col() {
            Some(flag) => {
                let filter = entity.soft_delete().live_filter(Expr::col((E::default(), flag)));
                QueryFilter::filter(self.inner, filter)
            }
            None => self.inner,
        };
        LifecycleSelect {
            inner,
            _state: PhantomData,
        }
    }

    /// Bypass the soft-delete filter; deleted rows are returned too.
    pub fn include_deleted(self) -> LifecycleSelect<E, Scoped> {
        LifecycleSelect {
            inner: self.inner,
            _state: PhantomData,
        }
    }
}

impl<E: EntityTrait> LifecycleSelect<E, Scoped> {
    /// # Errors
    /// Returns `LifecycleError::DataIntegrity` if a row fails to decode, `Db` otherwise.
    pub async fn all<C>(self, conn: &C) -> Result<Vec<E::Model>, LifecycleError>
    where
        C: ConnectionTrait + Send + Sync,
    {
        Ok(self.inner.all(conn).await?)
    }

    /// # Errors
    /// Returns `LifecycleError::DataIntegrity` if the row fails to decode, `Db` otherwise.
    pub async fn one<C>(self, conn: &C) -> Result<Option<E::Model>, LifecycleError>
    where
        C: ConnectionTrait + Send + Sync,
    {
        Ok(self.inner.one(conn).await?)
    }

    /// # Errors
    /// Returns `LifecycleError::Db` if the query fails.
    pub async fn count<C>(self, conn: &C) -> Result<u64, LifecycleError>
    where
        C: ConnectionTrait + Send + Sync,
        E::Model: sea_orm::FromQueryResult + Send + Sync,
    {
        Ok(self.inner.count(conn).await?)
    }

    pub fn filter(mut self, filter: impl IntoCondition) -> Self {
        self.inner = QueryFilter::filter(self.inner, filter);
        self
    }

    pub fn order_by<C>(mut self, col: C, order: sea_orm::Order) -> Self
    where
        C: sea_orm::IntoSimpleExpr,
    {
        self.inner = QueryOrder::order_by(self.inner, col, order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.inner = QuerySelect::limit(self.inner, limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.inner = QuerySelect::offset(self.inner, offset);
        self
    }

    /// Narrow to a single primary key.
    ///
    /// # Errors
    /// Returns `LifecycleError::Invalid` if the entity does not map an id column.
    pub fn and_id(self, id: uuid::Uuid) -> Result<Self, LifecycleError>
    where
        E: AuditedEntity,
    {
        let id_col = E::id_col().ok_or(LifecycleError::Invalid(
            "entity must map an id column to use and_id()",
        ))?;
        Ok(self.filter(Expr::col((E::default(), id_col)).eq(id)))
    }

    /// Unwrap the inner `Select` for joins or pagination.
    #[must_use]
    pub fn into_inner(self) -> sea_orm::Select<E> {
        self.inner
    }
}
