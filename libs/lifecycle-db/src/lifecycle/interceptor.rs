//! Hook points invoked around every mutation of a registered entity.
//!
//! Interceptors never see concrete entity types. They work against the type-erased
//! [`EntityDescriptor`] and the small adapter traits below, which the connection layer
//! implements over SeaORM active models and update builders.

use std::sync::Arc;

use sea_orm::sea_query::{Alias, ColumnType, Expr, SimpleExpr};
use sea_orm::Value;
use uuid::Uuid;

use lifecycle_security::ActorResolver;

use super::entity_traits::LifecycleField;
use super::registry::EntityDescriptor;
use super::timestamp::{Clock, OffsetTimestamp};
use super::version::zero_version;

/// Per-operation inputs shared by every interceptor in the chain.
///
/// Captured once per operation so that all stamped columns carry the same instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HookContext {
    pub actor: Option<Uuid>,
    pub now: OffsetTimestamp,
}

impl HookContext {
    #[must_use]
    pub fn new(actor: Option<Uuid>, now: OffsetTimestamp) -> Self {
        Self { actor, now }
    }

    #[must_use]
    pub fn capture(actor: &dyn ActorResolver, clock: &dyn Clock) -> Self {
        Self::new(actor.current_actor(), clock.now())
    }
}

/// A single entity instance on its way to storage.
pub trait LifecycleRow {
    /// Whether the entity has a column for `field`.
    fn maps(&self, field: LifecycleField) -> bool;

    /// Current value, `None` if the field is not mapped or was never set.
    fn value(&self, field: LifecycleField) -> Option<Value>;

    /// Set a value; ignored for unmapped fields.
    fn set(&mut self, field: LifecycleField, value: Value);

    /// Exclude the field from the statement being built.
    fn clear(&mut self, field: LifecycleField);

    fn is_unset(&self, field: LifecycleField) -> bool {
        self.value(field).is_none_or(|v| is_null_value(&v))
    }
}

/// `SET` clause of a column-level update.
pub trait ColumnSetter {
    fn maps(&self, field: LifecycleField) -> bool;

    fn contains(&self, field: LifecycleField) -> bool;

    /// Add or replace the expression for `field`.
    fn set_expr(&mut self, field: LifecycleField, expr: SimpleExpr);

    fn remove(&mut self, field: LifecycleField);
}

/// Explicit column list of an entity update.
pub trait ColumnSelector {
    fn maps(&self, field: LifecycleField) -> bool;

    fn contains(&self, field: LifecycleField) -> bool;

    fn include(&mut self, field: LifecycleField);

    fn exclude(&mut self, field: LifecycleField);
}

/// One link of the interceptor chain. All hooks default to no-ops.
pub trait EntityInterceptor: Send + Sync {
    fn name(&self) -> &'static str;

    fn applies_to(&self, _entity: &EntityDescriptor) -> bool {
        true
    }

    fn before_insert(&self, _entity: &EntityDescriptor, _ctx: &HookContext, _row: &mut dyn LifecycleRow) {}

    fn before_update(&self, _entity: &EntityDescriptor, _ctx: &HookContext, _row: &mut dyn LifecycleRow) {}

    fn before_update_column_set(
        &self,
        _entity: &EntityDescriptor,
        _ctx: &HookContext,
        _set: &mut dyn ColumnSetter,
    ) {
    }

    fn before_update_column_selection(
        &self,
        _entity: &EntityDescriptor,
        _ctx: &HookContext,
        _selection: &mut dyn ColumnSelector,
    ) {
    }
}

pub(crate) fn is_null_value(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::String(None)
            | Value::Uuid(None)
            | Value::ChronoDateTime(None)
            | Value::ChronoDateTimeUtc(None)
            | Value::ChronoDateTimeWithTimeZone(None)
    )
}

/// Stamps `created_*` / `updated_*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditInterceptor;

impl EntityInterceptor for AuditInterceptor {
    fn name(&self) -> &'static str {
        "audit"
    }

    fn before_insert(&self, _entity: &EntityDescriptor, ctx: &HookContext, row: &mut dyn LifecycleRow) {
        for field in [LifecycleField::CreatedAt, LifecycleField::UpdatedAt] {
            if row.maps(field) && row.is_unset(field) {
                row.set(field, ctx.now.into());
            }
        }
        // no actor: leave the columns unset rather than writing a placeholder
        if let Some(actor) = ctx.actor {
            for field in [LifecycleField::CreatedBy, LifecycleField::UpdatedBy] {
                if row.maps(field) && row.is_unset(field) {
                    row.set(field, actor.into());
                }
            }
        }
    }

    fn before_update(&self, _entity: &EntityDescriptor, ctx: &HookContext, row: &mut dyn LifecycleRow) {
        row.clear(LifecycleField::CreatedAt);
        row.clear(LifecycleField::CreatedBy);
        row.set(LifecycleField::UpdatedAt, ctx.now.into());
        match ctx.actor {
            Some(actor) => row.set(LifecycleField::UpdatedBy, actor.into()),
            None => row.clear(LifecycleField::UpdatedBy),
        }
    }

    fn before_update_column_set(
        &self,
        _entity: &EntityDescriptor,
        ctx: &HookContext,
        set: &mut dyn ColumnSetter,
    ) {
        set.remove(LifecycleField::CreatedAt);
        set.remove(LifecycleField::CreatedBy);
        if set.maps(LifecycleField::UpdatedAt) && !set.contains(LifecycleField::UpdatedAt) {
            set.set_expr(LifecycleField::UpdatedAt, Expr::value(ctx.now));
        }
        if let Some(actor) = ctx.actor
            && set.maps(LifecycleField::UpdatedBy)
            && !set.contains(LifecycleField::UpdatedBy)
        {
            set.set_expr(LifecycleField::UpdatedBy, Expr::value(actor));
        }
    }

    fn before_update_column_selection(
        &self,
        _entity: &EntityDescriptor,
        ctx: &HookContext,
        selection: &mut dyn ColumnSelector,
    ) {
        selection.exclude(LifecycleField::CreatedAt);
        selection.exclude(LifecycleField::CreatedBy);
        selection.include(LifecycleField::UpdatedAt);
        if ctx.actor.is_some() {
            selection.include(LifecycleField::UpdatedBy);
        }
    }
}

/// Owns the `version` column: zero on insert, `version + 1` on column-level updates.
///
/// Entity updates get their increment from the conditional write in
/// [`guarded_update`](super::version::guarded_update), so here the caller's value is
/// only stripped.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionInterceptor;

impl EntityInterceptor for VersionInterceptor {
    fn name(&self) -> &'static str {
        "version"
    }

    fn applies_to(&self, entity: &EntityDescriptor) -> bool {
        entity.has(LifecycleField::Version)
    }

    fn before_insert(&self, entity: &EntityDescriptor, _ctx: &HookContext, row: &mut dyn LifecycleRow) {
        if let Some(col) = entity.column(LifecycleField::Version) {
            row.set(LifecycleField::Version, zero_version(&col.column_type));
        }
    }

    fn before_update(&self, _entity: &EntityDescriptor, _ctx: &HookContext, row: &mut dyn LifecycleRow) {
        row.clear(LifecycleField::Version);
    }

    fn before_update_column_set(
        &self,
        entity: &EntityDescriptor,
        _ctx: &HookContext,
        set: &mut dyn ColumnSetter,
    ) {
        if let Some(col) = entity.column(LifecycleField::Version) {
            set.remove(LifecycleField::Version);
            set.set_expr(
                LifecycleField::Version,
                Expr::col(Alias::new(col.name.as_str())).add(1),
            );
        }
    }

    fn before_update_column_selection(
        &self,
        _entity: &EntityDescriptor,
        _ctx: &HookContext,
        selection: &mut dyn ColumnSelector,
    ) {
        selection.exclude(LifecycleField::Version);
    }
}

/// Keeps deletion columns out of inserts and updates; only the soft-delete transition
/// writes them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftDeleteFieldsInterceptor;

impl EntityInterceptor for SoftDeleteFieldsInterceptor {
    fn name(&self) -> &'static str {
        "soft_delete_fields"
    }

    fn applies_to(&self, entity: &EntityDescriptor) -> bool {
        entity.has(LifecycleField::IsDeleted)
    }

    fn before_insert(&self, entity: &EntityDescriptor, _ctx: &HookContext, row: &mut dyn LifecycleRow) {
        if let Some(col) = entity.column(LifecycleField::IsDeleted)
            && matches!(col.column_type, ColumnType::Boolean)
        {
            row.set(LifecycleField::IsDeleted, false.into());
        }
        row.clear(LifecycleField::DeletedAt);
        row.clear(LifecycleField::DeletedBy);
    }

    fn before_update(&self, _entity: &EntityDescriptor, _ctx: &HookContext, row: &mut dyn LifecycleRow) {
        for field in deletion_fields() {
            row.clear(field);
        }
    }

    fn before_update_column_set(
        &self,
        _entity: &EntityDescriptor,
        _ctx: &HookContext,
        set: &mut dyn ColumnSetter,
    ) {
        for field in deletion_fields() {
            set.remove(field);
        }
    }

    fn before_update_column_selection(
        &self,
        _entity: &EntityDescriptor,
        _ctx: &HookContext,
        selection: &mut dyn ColumnSelector,
    ) {
        for field in deletion_fields() {
            selection.exclude(field);
        }
    }
}

fn deletion_fields() -> impl Iterator<Item = LifecycleField> {
    LifecycleField::ALL.into_iter().filter(|f| f.is_deletion_field())
}

/// Ordered interceptors, run first to last for every hook.
#[derive(Clone)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn EntityInterceptor>>,
}

impl Default for InterceptorChain {
    fn default() -> Self {
        Self {
            interceptors: vec![
                Arc::new(AuditInterceptor),
                Arc::new(VersionInterceptor),
                Arc::new(SoftDeleteFieldsInterceptor),
            ],
        }
    }
}

impl std::fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl InterceptorChain {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    pub fn push(&mut self, interceptor: Arc<dyn EntityInterceptor>) {
        self.interceptors.push(interceptor);
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    fn applicable<'a>(
        &'a self,
        entity: &'a EntityDescriptor,
    ) -> impl Iterator<Item = &'a Arc<dyn EntityInterceptor>> + 'a {
        self.interceptors.iter().filter(|i| i.applies_to(entity))
    }

    pub fn before_insert(&self, entity: &EntityDescriptor, ctx: &HookContext, row: &mut dyn LifecycleRow) {
        for interceptor in self.applicable(entity) {
            interceptor.before_insert(entity, ctx, row);
        }
    }

    pub fn before_update(&self, entity: &EntityDescriptor, ctx: &HookContext, row: &mut dyn LifecycleRow) {
        for interceptor in self.applicable(entity) {
            interceptor.before_update(entity, ctx, row);
        }
    }

    pub fn before_update_column_set(
        &self,
        entity: &EntityDescriptor,
        ctx: &HookContext,
        set: &mut dyn ColumnSetter,
    ) {
        for interceptor in self.applicable(entity) {
            interceptor.before_update_column_set(entity, ctx, set);
        }
    }

    pub fn before_update_column_selection(
        &self,
        entity: &EntityDescriptor,
        ctx: &HookContext,
        selection: &mut dyn ColumnSelector,
    ) {
        for interceptor in self.applicable(entity) {
            interceptor.before_update_column_selection(entity, ctx, selection);
        }
    }
}
