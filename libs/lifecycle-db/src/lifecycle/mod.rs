//! Entity lifecycle interception for `SeaORM`.
//!
//! Entities that carry the base columns (`id`, `is_deleted`, `deleted_at`,
//! `deleted_by`, `created_at`, `created_by`, `updated_at`, `updated_by`, `version`)
//! opt in by implementing [`AuditedEntity`], usually through `#[derive(Audited)]`, and
//! registering with a [`LifecycleRegistry`]. Every write made through a
//! [`LifecycleConn`] then gets:
//!
//! - a UUIDv7 primary key when none was supplied
//! - `created_*` / `updated_*` stamped from one clock reading and the request's actor
//! - `version` forced to 0 on insert and bumped by a conditional write on update
//! - deletes rewritten into a soft-delete update, and reads filtered to live rows
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lifecycle_db::lifecycle::{LifecycleConn, LifecycleRegistry, OffsetTimestamp};
//! use lifecycle_db::Audited;
//! use sea_orm::entity::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Audited)]
//! #[sea_orm(table_name = "teams")]
//! pub struct Model {
//!     #[sea_orm(primary_key, auto_increment = false)]
//!     pub id: Uuid,
//!     pub name: String,
//!     pub is_deleted: bool,
//!     #[sea_orm(column_type = "DateTime", nullable)]
//!     pub deleted_at: Option<OffsetTimestamp>,
//!     pub deleted_by: Option<Uuid>,
//!     #[sea_orm(column_type = "DateTime")]
//!     pub created_at: OffsetTimestamp,
//!     pub created_by: Option<Uuid>,
//!     #[sea_orm(column_type = "DateTime")]
//!     pub updated_at: OffsetTimestamp,
//!     pub updated_by: Option<Uuid>,
//!     pub version: i32,
//! }
//!
//! let registry = LifecycleRegistry::builder()
//!     .with_config(config)
//!     .register::<Entity>()
//!     .build()?;
//! let db = LifecycleConn::new(conn, Arc::new(registry));
//!
//! let team = db.insert::<Entity>(&ctx, ActiveModel { name: Set("core".into()), ..Default::default() }).await?;
//! db.delete_by_id::<Entity>(&ctx, team.id).await?;
//! assert!(db.find_by_id::<Entity>(team.id).await?.is_none());
//! ```
//!
//! # Errors
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Bad wiring (missing flag, non-boolean flag, unknown strategy) | [`ConfigError`] from `build()` |
//! | Row changed since it was loaded | [`LifecycleError::StaleVersion`] |
//! | No live row with the id | [`LifecycleError::NotFound`] |
//! | Stored timestamp cannot be decoded | [`LifecycleError::DataIntegrity`] |

mod columns;
mod config;
mod conn;
mod entity_traits;
mod error;
mod id;
mod interceptor;
pub mod migrate;
mod registry;
mod select;
mod soft_delete;
#[cfg(test)]
mod testing;
mod timestamp;
mod tx_error;
mod version;

pub use columns::{ColumnSelection, ColumnSet};
pub use config::{EntityLifecycleConfig, LifecycleConfig};
pub use conn::LifecycleConn;
pub use entity_traits::{AuditedEntity, LifecycleField};
pub use error::{ConfigError, LifecycleError};
pub use id::{PrimaryKeyGenerator, TimeOrderedKeyGenerator};
pub use interceptor::{
    AuditInterceptor, ColumnSelector, ColumnSetter, EntityInterceptor, HookContext,
    InterceptorChain, LifecycleRow, SoftDeleteFieldsInterceptor, VersionInterceptor,
};
pub use registry::{EntityDescriptor, FieldColumn, LifecycleRegistry, LifecycleRegistryBuilder};
pub use select::{LifecycleEntityExt, LifecycleSelect, Scoped, Unscoped};
pub use soft_delete::{DEFAULT_SOFT_DELETE_STRATEGY, DeleteStamp, SoftDeleteStrategy, boolean_flag};
pub use timestamp::{
    Clock, DEFAULT_TIMESTAMP_PRECISION, FixedClock, OffsetTimestamp, SystemClock, TimestampCodec,
};
pub use tx_error::{InfraError, TxError};
pub use version::version_number;

pub use lifecycle_security::{ActorResolver, NoActor, SecurityContext, Subject};
