//! Soft-delete strategies.
//!
//! A strategy turns a delete into a conditional update and supplies the predicate
//! that hides deleted rows from default reads. Strategies are plain data (function
//! pointers) registered under a name; entities pick one by name and the registry
//! resolves it once, at startup.

use sea_orm::sea_query::{ColumnType, Expr, SimpleExpr};
use sea_orm::Value;
use uuid::Uuid;

use super::entity_traits::LifecycleField;
use super::timestamp::OffsetTimestamp;

/// Name of the built-in strategy: boolean flag plus deletion timestamp and actor.
pub const DEFAULT_SOFT_DELETE_STRATEGY: &str = "DEFAULT_SOFT_DELETE";

/// Inputs for a single delete transition.
#[derive(Debug, Clone, Copy)]
pub struct DeleteStamp {
    pub at: OffsetTimestamp,
    pub by: Option<Uuid>,
}

#[derive(Debug, Clone, Copy)]
pub struct SoftDeleteStrategy {
    name: &'static str,
    accepts_flag: fn(&ColumnType) -> bool,
    requires: &'static [LifecycleField],
    filter: fn(Expr) -> SimpleExpr,
    mutation: fn(&DeleteStamp) -> Vec<(LifecycleField, Value)>,
}

impl SoftDeleteStrategy {
    /// Built-in strategy registered under [`DEFAULT_SOFT_DELETE_STRATEGY`].
    pub const DEFAULT: Self = Self::new(
        DEFAULT_SOFT_DELETE_STRATEGY,
        boolean_flag,
        &[LifecycleField::DeletedAt],
        flag_is_false,
        flag_and_stamp,
    );

    /// - `accepts_flag`: whether the flag column's type can back this strategy
    /// - `requires`: columns besides the flag that must exist on the entity
    /// - `filter`: live-row predicate, given the flag column expression
    /// - `mutation`: column values written by the delete transition
    #[must_use]
    pub const fn new(
        name: &'static str,
        accepts_flag: fn(&ColumnType) -> bool,
        requires: &'static [LifecycleField],
        filter: fn(Expr) -> SimpleExpr,
        mutation: fn(&DeleteStamp) -> Vec<(LifecycleField, Value)>,
    ) -> Self {
        Self {
            name,
            accepts_flag,
            requires,
            filter,
            mutation,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn accepts_flag(&self, column_type: &ColumnType) -> bool {
        (self.accepts_flag)(column_type)
    }

    #[must_use]
    pub fn requires(&self) -> &'static [LifecycleField] {
        self.requires
    }

    #[must_use]
    pub fn live_filter(&self, flag: Expr) -> SimpleExpr {
        (self.filter)(flag)
    }

    /// Values written on delete. Fields the entity does not map are skipped by the
    /// caller, so optional columns such as `deleted_by` may be listed freely.
    #[must_use]
    pub fn mutation(&self, stamp: &DeleteStamp) -> Vec<(LifecycleField, Value)> {
        (self.mutation)(stamp)
    }
}

/// The flag column must be a real boolean; integer or text flags are rejected.
#[must_use]
pub fn boolean_flag(column_type: &ColumnType) -> bool {
    matches!(column_type, ColumnType::Boolean)
}

fn flag_is_false(flag: Expr) -> SimpleExpr {
    flag.eq(false)
}

fn flag_and_stamp(stamp: &DeleteStamp) -> Vec<(LifecycleField, Value)> {
    let mut values = vec![
        (LifecycleField::IsDeleted, Value::from(true)),
        (LifecycleField::DeletedAt, Value::from(stamp.at)),
    ];
    if let Some(by) = stamp.by {
        values.push((LifecycleField::DeletedBy, Value::from(by)));
    }
    values
}
