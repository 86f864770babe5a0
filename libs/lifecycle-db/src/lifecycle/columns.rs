//! Adapters between SeaORM builders and the interceptor traits.

use sea_orm::sea_query::SimpleExpr;
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, IdenStatic, Iterable, UpdateMany, Value};

use super::entity_traits::{AuditedEntity, LifecycleField};
use super::interceptor::{ColumnSelector, ColumnSetter, LifecycleRow};

/// Borrowed active model seen as a [`LifecycleRow`].
pub(crate) struct ActiveRow<'a, E: AuditedEntity> {
    model: &'a mut E::ActiveModel,
}

impl<'a, E: AuditedEntity> ActiveRow<'a, E> {
    pub(crate) fn new(model: &'a mut E::ActiveModel) -> Self {
        Self { model }
    }
}

impl<E> LifecycleRow for ActiveRow<'_, E>
where
    E: AuditedEntity,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
{
    fn maps(&self, field: LifecycleField) -> bool {
        E::lifecycle_col(field).is_some()
    }

    fn value(&self, field: LifecycleField) -> Option<Value> {
        let col = E::lifecycle_col(field)?;
        match self.model.get(col) {
            ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
            ActiveValue::NotSet => None,
        }
    }

    fn set(&mut self, field: LifecycleField, value: Value) {
        if let Some(col) = E::lifecycle_col(field) {
            self.model.set(col, value);
        }
    }

    fn clear(&mut self, field: LifecycleField) {
        if let Some(col) = E::lifecycle_col(field) {
            self.model.not_set(col);
        }
    }
}

/// Explicit `SET` list for [`update_many`](super::conn::LifecycleConn::update_many).
///
/// ```rust,ignore
/// let set = ColumnSet::<user::Entity>::new()
///     .value(user::Column::DisplayName, "Ada")
///     .expr(user::Column::LoginCount, Expr::col(user::Column::LoginCount).add(1));
/// ```
pub struct ColumnSet<E: EntityTrait> {
    entries: Vec<(E::Column, SimpleExpr)>,
}

impl<E: EntityTrait> Default for ColumnSet<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: EntityTrait> std::fmt::Debug for ColumnSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(c, _)| c.as_str()))
            .finish()
    }
}

impl<E: EntityTrait> ColumnSet<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value<V: Into<Value>>(self, col: E::Column, value: V) -> Self {
        self.expr(col, SimpleExpr::Value(value.into()))
    }

    #[must_use]
    pub fn expr(mut self, col: E::Column, expr: SimpleExpr) -> Self {
        self.put(col, expr);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.entries.iter().map(|(c, _)| c.as_str()).collect()
    }

    fn position(&self, col: E::Column) -> Option<usize> {
        self.entries.iter().position(|(c, _)| c.as_str() == col.as_str())
    }

    fn put(&mut self, col: E::Column, expr: SimpleExpr) {
        match self.position(col) {
            Some(i) => self.entries[i].1 = expr,
            None => self.entries.push((col, expr)),
        }
    }

    pub(crate) fn apply(self, mut update: UpdateMany<E>) -> UpdateMany<E> {
        for (col, expr) in self.entries {
            update = update.col_expr(col, expr);
        }
        update
    }
}

impl<E: AuditedEntity> ColumnSetter for ColumnSet<E> {
    fn maps(&self, field: LifecycleField) -> bool {
        E::lifecycle_col(field).is_some()
    }

    fn contains(&self, field: LifecycleField) -> bool {
        E::lifecycle_col(field).is_some_and(|col| self.position(col).is_some())
    }

    fn set_expr(&mut self, field: LifecycleField, expr: SimpleExpr) {
        if let Some(col) = E::lifecycle_col(field) {
            self.put(col, expr);
        }
    }

    fn remove(&mut self, field: LifecycleField) {
        if let Some(i) = E::lifecycle_col(field).and_then(|col| self.position(col)) {
            self.entries.remove(i);
        }
    }
}

/// Column list for [`update_columns`](super::conn::LifecycleConn::update_columns).
pub struct ColumnSelection<E: EntityTrait> {
    columns: Vec<E::Column>,
}

impl<E: EntityTrait> Default for ColumnSelection<E> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

impl<E: EntityTrait> std::fmt::Debug for ColumnSelection<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.columns.iter().map(IdenStatic::as_str))
            .finish()
    }
}

impl<E: EntityTrait> ColumnSelection<E> {
    #[must_use]
    pub fn of(columns: impl IntoIterator<Item = E::Column>) -> Self {
        let mut selection = Self::default();
        for col in columns {
            selection.add(col);
        }
        selection
    }

    #[must_use]
    pub fn contains_column(&self, col: E::Column) -> bool {
        self.columns.iter().any(|c| c.as_str() == col.as_str())
    }

    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(IdenStatic::as_str).collect()
    }

    fn add(&mut self, col: E::Column) {
        if !self.contains_column(col) {
            self.columns.push(col);
        }
    }

    /// Write exactly the selected columns: loaded values of selected columns become
    /// `Set`, everything else becomes not set.
    pub(crate) fn apply_to(&self, model: &mut E::ActiveModel)
    where
        E::ActiveModel: ActiveModelTrait<Entity = E>,
    {
        for col in E::Column::iter() {
            if !self.contains_column(col) {
                model.not_set(col);
            } else if let ActiveValue::Unchanged(value) = model.get(col) {
                model.set(col, value);
            }
        }
    }
}

impl<E: AuditedEntity> ColumnSelector for ColumnSelection<E> {
    fn maps(&self, field: LifecycleField) -> bool {
        E::lifecycle_col(field).is_some()
    }

    fn contains(&self, field: LifecycleField) -> bool {
        E::lifecycle_col(field).is_some_and(|col| self.contains_column(col))
    }

    fn include(&mut self, field: LifecycleField) {
        if let Some(col) = E::lifecycle_col(field) {
            self.add(col);
        }
    }

    fn exclude(&mut self, field: LifecycleField) {
        if let Some(col) = E::lifecycle_col(field) {
            self.columns.retain(|c| c.as_str() != col.as_str());
        }
    }
}
