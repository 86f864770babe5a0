//! Lifecycle-aware connection wrapper.
//!
//! `LifecycleConn` is the hook invocation point: every mutation of a registered entity
//! goes through it, and it runs the interceptor chain before handing the statement to
//! SeaORM. Module code never needs to stamp audit columns, bump versions or rewrite
//! deletes by hand.
//!
//! ```ignore
//! use lifecycle_db::lifecycle::LifecycleConn;
//!
//! pub struct UsersRepo;
//!
//! impl UsersRepo {
//!     pub async fn rename<C>(
//!         &self,
//!         db: &LifecycleConn<C>,
//!         ctx: &SecurityContext,
//!         user: user::Model,
//!         name: String,
//!     ) -> Result<user::Model, LifecycleError>
//!     where
//!         C: ConnectionTrait + Send + Sync,
//!     {
//!         let mut am: user::ActiveModel = user.into();
//!         am.display_name = Set(name);
//!         db.update::<user::Entity>(ctx, am).await
//!     }
//! }
//! ```

use std::{future::Future, pin::Pin, sync::Arc};

use sea_orm::sea_query::{Expr, IntoCondition};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, QueryFilter,
    TransactionTrait, UpdateMany, Value, sea_query::ValueType,
};
use tracing::{debug, warn};
use uuid::Uuid;

use lifecycle_security::ActorResolver;

use super::columns::{ActiveRow, ColumnSelection, ColumnSet};
use super::entity_traits::{AuditedEntity, LifecycleField};
use super::error::LifecycleError;
use super::id::{PrimaryKeyGenerator, TimeOrderedKeyGenerator};
use super::interceptor::{ColumnSelector, ColumnSetter, HookContext, LifecycleRow};
use super::registry::{EntityDescriptor, LifecycleRegistry};
use super::select::{LifecycleEntityExt, LifecycleSelect, Scoped};
use super::soft_delete::DeleteStamp;
use super::timestamp::{Clock, SystemClock};
use super::tx_error::{InfraError, TxError};
use super::version::{column, guarded_update, live_condition};

/// Database connection plus everything the interceptors need: the registry, a clock
/// and a key generator.
///
/// `C` is the underlying SeaORM connection. Inside
/// [`in_transaction`](LifecycleConn::in_transaction) it is a `DatabaseTransaction`, so
/// repositories written against `LifecycleConn<C>` work in both places.
#[derive(Clone)]
pub struct LifecycleConn<C = DatabaseConnection> {
    conn: C,
    registry: Arc<LifecycleRegistry>,
    clock: Arc<dyn Clock>,
    keys: Arc<dyn PrimaryKeyGenerator>,
}

impl<C> std::fmt::Debug for LifecycleConn<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleConn")
            .field("registry", &self.registry.tables())
            .finish_non_exhaustive()
    }
}

impl<C> LifecycleConn<C> {
    /// Wrap a connection. Timestamps come from the system clock at the registry's
    /// configured precision; ids are UUIDv7.
    pub fn new(conn: C, registry: Arc<LifecycleRegistry>) -> Self {
        let clock = SystemClock::with_precision(registry.timestamp_precision());
        Self {
            conn,
            registry,
            clock: Arc::new(clock),
            keys: Arc::new(TimeOrderedKeyGenerator),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_key_generator(mut self, keys: Arc<dyn PrimaryKeyGenerator>) -> Self {
        self.keys = keys;
        self
    }

    /// Raw connection. Statements built on it bypass every interceptor.
    #[must_use]
    pub fn conn(&self) -> &C {
        &self.conn
    }

    #[must_use]
    pub fn registry(&self) -> &LifecycleRegistry {
        &self.registry
    }

    /// A fresh primary key, for callers that need the id before inserting.
    #[must_use]
    pub fn generate_id(&self) -> Uuid {
        self.keys.generate()
    }

    fn hook_context(&self, actor: &dyn ActorResolver) -> HookContext {
        HookContext::capture(actor, self.clock.as_ref())
    }

    fn stamp_insert<E>(&self, entity: &EntityDescriptor, ctx: &HookContext, model: &mut E::ActiveModel)
    where
        E: AuditedEntity,
        E::ActiveModel: ActiveModelTrait<Entity = E>,
    {
        let mut row = ActiveRow::<E>::new(model);
        if row.is_unset(LifecycleField::Id) {
            row.set(LifecycleField::Id, self.keys.generate().into());
        }
        self.registry.chain().before_insert(entity, ctx, &mut row);
    }
}

impl<C> LifecycleConn<C>
where
    C: ConnectionTrait + Send + Sync,
{
    /// Run the insert hooks without writing: assign the id if missing, then stamp
    /// audit, version and deletion columns.
    ///
    /// Stamping is idempotent; calling this twice leaves `created_*` as the first
    /// call set them.
    ///
    /// # Errors
    /// Returns `LifecycleError::Config` if `E` is not registered.
    pub fn before_insert<E>(
        &self,
        actor: &dyn ActorResolver,
        model: &mut E::ActiveModel,
    ) -> Result<(), LifecycleError>
    where
        E: AuditedEntity,
        E::ActiveModel: ActiveModelTrait<Entity = E>,
    {
        let entity = self.registry.descriptor::<E>()?;
        let ctx = self.hook_context(actor);
        self.stamp_insert::<E>(entity, &ctx, model);
        Ok(())
    }

    /// Insert a new row. Any caller-supplied version is replaced by zero.
    ///
    /// # Errors
    /// - `LifecycleError::Config` if `E` is not registered
    /// - `LifecycleError::Db` if the insert fails
    pub async fn insert<E>(
        &self,
        actor: &dyn ActorResolver,
        mut model: E::ActiveModel,
    ) -> Result<E::Model, LifecycleError>
    where
        E: AuditedEntity,
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
        E::Model: sea_orm::IntoActiveModel<E::ActiveModel>,
    {
        let entity = self.registry.descriptor::<E>()?;
        let ctx = self.hook_context(actor);
        self.stamp_insert::<E>(entity, &ctx, &mut model);
        debug!(entity = entity.table(), actor = ?ctx.actor, "lifecycle insert");
        Ok(model.insert(&self.conn).await?)
    }

    /// Versioned update of one row.
    ///
    /// `model` must carry the id and the version it was loaded with (as `Set` or
    /// `Unchanged`). Only `Set` business columns are written; the guard adds the
    /// audit columns and `version = version + 1`.
    ///
    /// # Errors
    /// - `LifecycleError::StaleVersion` if the row changed since it was loaded
    /// - `LifecycleError::NotFound` if there is no live row with that id
    /// - `LifecycleError::Invalid` if the id or version is missing from `model`
    pub async fn update<E>(
        &self,
        actor: &dyn ActorResolver,
        mut model: E::ActiveModel,
    ) -> Result<E::Model, LifecycleError>
    where
        E: AuditedEntity,
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    {
        let entity = self.registry.descriptor::<E>()?;
        let (id, expected) = loaded_identity::<E>(&model)?;
        let ctx = self.hook_context(actor);

        {
            let mut row = ActiveRow::<E>::new(&mut model);
            row.clear(LifecycleField::Id);
            self.registry.chain().before_update(entity, &ctx, &mut row);
        }

        debug!(entity = entity.table(), %id, actor = ?ctx.actor, "lifecycle update");
        guarded_update::<E, C>(&self.conn, entity, model, id, expected).await
    }

    /// Versioned update restricted to `columns`; other columns of `model` are ignored
    /// even if set. Audit columns are added to the list.
    ///
    /// # Errors
    /// Same as [`update`](Self::update).
    pub async fn update_columns<E>(
        &self,
        actor: &dyn ActorResolver,
        mut model: E::ActiveModel,
        mut columns: ColumnSelection<E>,
    ) -> Result<E::Model, LifecycleError>
    where
        E: AuditedEntity,
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    {
        let entity = self.registry.descriptor::<E>()?;
        let (id, expected) = loaded_identity::<E>(&model)?;
        let ctx = self.hook_context(actor);

        columns.exclude(LifecycleField::Id);
        self.registry
            .chain()
            .before_update_column_selection(entity, &ctx, &mut columns);
        columns.apply_to(&mut model);

        {
            let mut row = ActiveRow::<E>::new(&mut model);
            row.clear(LifecycleField::Id);
            self.registry.chain().before_update(entity, &ctx, &mut row);
        }

        debug!(
            entity = entity.table(),
            %id,
            columns = ?columns.columns(),
            "lifecycle column update"
        );
        guarded_update::<E, C>(&self.conn, entity, model, id, expected).await
    }

    /// Expression update of every live row matching `filter`.
    ///
    /// Each matched row gets `updated_*` refreshed and `version = version + 1`. There is
    /// no per-row version check. An `id` entry in `set` is dropped.
    ///
    /// # Errors
    /// - `LifecycleError::Invalid` if `set` is empty once `id` is dropped
    /// - `LifecycleError::Db` if the update fails
    pub async fn update_many<E>(
        &self,
        actor: &dyn ActorResolver,
        mut set: ColumnSet<E>,
        filter: impl IntoCondition,
    ) -> Result<u64, LifecycleError>
    where
        E: AuditedEntity,
    {
        // primary keys are never reassigned, not even in bulk
        set.remove(LifecycleField::Id);
        if set.is_empty() {
            return Err(LifecycleError::Invalid("update_many requires at least one column"));
        }
        let entity = self.registry.descriptor::<E>()?;
        let ctx = self.hook_context(actor);

        self.registry
            .chain()
            .before_update_column_set(entity, &ctx, &mut set);
        debug!(entity = entity.table(), columns = ?set.columns(), "lifecycle bulk update");

        let update = live_only::<E>(entity, set.apply(E::update_many())).filter(filter.into_condition());
        Ok(update.exec(&self.conn).await?.rows_affected)
    }

    /// Soft-delete one row. Returns `false` if there was no live row with that id.
    ///
    /// The row's version and `updated_*` columns are left as they were.
    ///
    /// # Errors
    /// Returns `LifecycleError::Db` if the update fails.
    pub async fn delete_by_id<E>(&self, actor: &dyn ActorResolver, id: Uuid) -> Result<bool, LifecycleError>
    where
        E: AuditedEntity,
    {
        let entity = self.registry.descriptor::<E>()?;
        let id_col = column::<E>(LifecycleField::Id)?;
        let ctx = self.hook_context(actor);

        let result = soft_delete::<E>(entity, &ctx)
            .filter(Expr::col(id_col).eq(id))
            .exec(&self.conn)
            .await?;

        debug!(
            entity = entity.table(),
            %id,
            deleted = result.rows_affected > 0,
            "lifecycle delete"
        );
        Ok(result.rows_affected > 0)
    }

    /// Soft-delete every live row matching `filter`.
    ///
    /// # Errors
    /// Returns `LifecycleError::Db` if the update fails.
    pub async fn delete_many<E>(
        &self,
        actor: &dyn ActorResolver,
        filter: impl IntoCondition,
    ) -> Result<u64, LifecycleError>
    where
        E: AuditedEntity,
    {
        let entity = self.registry.descriptor::<E>()?;
        let ctx = self.hook_context(actor);

        let result = soft_delete::<E>(entity, &ctx)
            .filter(filter.into_condition())
            .exec(&self.conn)
            .await?;

        debug!(entity = entity.table(), rows = result.rows_affected, "lifecycle bulk delete");
        Ok(result.rows_affected)
    }

    /// Live rows of `E`.
    ///
    /// # Errors
    /// Returns `LifecycleError::Config` if `E` is not registered.
    pub fn find<E>(&self) -> Result<LifecycleSelect<E, Scoped>, LifecycleError>
    where
        E: AuditedEntity,
    {
        let entity = self.registry.descriptor::<E>()?;
        Ok(E::find().lifecycle().live(entity))
    }

    /// All rows of `E`, soft-deleted ones included.
    #[allow(clippy::unused_self)]
    pub fn find_with_deleted<E>(&self) -> LifecycleSelect<E, Scoped>
    where
        E: AuditedEntity,
    {
        E::find().lifecycle().include_deleted()
    }

    /// The live row with this id.
    ///
    /// # Errors
    /// - `LifecycleError::DataIntegrity` if a stored value cannot be decoded
    /// - `LifecycleError::Db` if the query fails
    pub async fn find_by_id<E>(&self, id: Uuid) -> Result<Option<E::Model>, LifecycleError>
    where
        E: AuditedEntity,
    {
        self.find::<E>()?.and_id(id)?.one(&self.conn).await
    }
}

impl LifecycleConn<DatabaseConnection> {
    /// Run `f` inside a database transaction.
    ///
    /// The callback gets a `LifecycleConn` bound to the transaction, sharing this
    /// connection's registry, clock and key generator. An `Err` from the callback rolls
    /// back; `Ok` commits.
    ///
    /// ```ignore
    /// let user = db
    ///     .in_transaction(move |tx| Box::pin(async move {
    ///         let team = tx.insert::<team::Entity>(&ctx, team_am).await?;
    ///         tx.insert::<user::Entity>(&ctx, user_am(team.id)).await
    ///     }))
    ///     .await
    ///     .map_err(|e| e.into_domain(DomainError::database_infra))?;
    /// ```
    ///
    /// # Errors
    /// - `TxError::Domain` with the callback's error
    /// - `TxError::Infra` if the transaction cannot be opened or committed
    pub async fn in_transaction<T, E, F>(&self, f: F) -> Result<T, TxError<E>>
    where
        T: Send,
        E: std::fmt::Debug + std::fmt::Display + Send,
        F: for<'c> FnOnce(
                &'c LifecycleConn<DatabaseTransaction>,
            ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
            + Send,
    {
        let txn = self
            .conn
            .begin()
            .await
            .map_err(|e| TxError::Infra(InfraError::from(e)))?;
        let tx = LifecycleConn {
            conn: txn,
            registry: Arc::clone(&self.registry),
            clock: Arc::clone(&self.clock),
            keys: Arc::clone(&self.keys),
        };

        let outcome = f(&tx).await;
        match outcome {
            Ok(value) => {
                tx.conn
                    .commit()
                    .await
                    .map_err(|e| TxError::Infra(InfraError::from(e)))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.conn.rollback().await {
                    warn!(error = %rollback, "transaction rollback failed");
                }
                Err(TxError::Domain(err))
            }
        }
    }
}

/// Id and loaded version of a model about to be updated.
fn loaded_identity<E>(model: &E::ActiveModel) -> Result<(Uuid, Value), LifecycleError>
where
    E: AuditedEntity,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
{
    let id = model
        .get(column::<E>(LifecycleField::Id)?)
        .into_value()
        .and_then(|v| <Uuid as ValueType>::try_from(v).ok())
        .ok_or(LifecycleError::Invalid("update requires the entity id"))?;
    let version = model
        .get(column::<E>(LifecycleField::Version)?)
        .into_value()
        .filter(|v| super::version::version_number(v).is_some())
        .ok_or(LifecycleError::Invalid("update requires the loaded version"))?;
    Ok((id, version))
}

fn live_only<E: AuditedEntity>(entity: &EntityDescriptor, update: UpdateMany<E>) -> UpdateMany<E> {
    match live_condition::<E>(entity) {
        Some(live) => update.filter(live),
        None => update,
    }
}

/// The strategy's delete mutation as an update of live rows; the caller adds the
/// row predicate.
fn soft_delete<E: AuditedEntity>(entity: &EntityDescriptor, ctx: &HookContext) -> UpdateMany<E> {
    let stamp = DeleteStamp {
        at: ctx.now,
        by: ctx.actor,
    };
    let mut update = E::update_many();
    for (field, value) in entity.soft_delete().mutation(&stamp) {
        if let Some(col) = E::lifecycle_col(field) {
            update = update.col_expr(col, Expr::value(value));
        }
    }
    live_only::<E>(entity, update)
}
