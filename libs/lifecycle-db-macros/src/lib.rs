// Proc-macro crate for lifecycle-db derives
//
//! # lifecycle-db-macros
//!
//! ## `#[derive(Audited)]`
//!
//! Implements `AuditedEntity` for a SeaORM entity, mapping each base lifecycle field
//! to a column of the model.
//!
//! A field maps to the model field with its canonical name (`id`, `is_deleted`,
//! `deleted_at`, `deleted_by`, `created_at`, `created_by`, `updated_at`, `updated_by`,
//! `version`) when the model has one. Other names are given explicitly, and a field
//! the model has but the lifecycle layer must not touch is opted out with `no_<field>`.
//!
//! ```ignore
//! use sea_orm::entity::prelude::*;
//! use lifecycle_db::{Audited, OffsetTimestamp};
//!
//! #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Audited)]
//! #[sea_orm(table_name = "teams")]
//! #[audit(soft_delete = "DEFAULT_SOFT_DELETE", version = "revision", no_created_by)]
//! pub struct Model {
//!     #[sea_orm(primary_key, auto_increment = false)]
//!     pub id: Uuid,
//!     pub name: String,
//!     pub is_deleted: bool,
//!     #[sea_orm(column_type = "DateTime", nullable)]
//!     pub deleted_at: Option<OffsetTimestamp>,
//!     #[sea_orm(column_type = "DateTime")]
//!     pub created_at: OffsetTimestamp,
//!     pub created_by: Option<Uuid>,
//!     #[sea_orm(column_type = "DateTime")]
//!     pub updated_at: OffsetTimestamp,
//!     pub revision: i32,
//! }
//! ```
//!
//! Whether the resulting mapping is complete (required fields, column types, the
//! strategy's own requirements) is checked when the entity is registered.

use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;
use syn::{DeriveInput, parse_macro_input};

mod audited;

/// Derive `AuditedEntity` for the `Entity` generated next to this model.
///
/// # Attributes
///
/// - `#[audit(soft_delete = "NAME")]`: soft-delete strategy looked up at registration
///   (defaults to `DEFAULT_SOFT_DELETE`)
/// - `#[audit(<field> = "model_field")]`: map a lifecycle field to a differently named
///   model field
/// - `#[audit(no_<field>)]`: leave a lifecycle field unmapped
#[proc_macro_derive(Audited, attributes(audit))]
#[proc_macro_error]
pub fn derive_audited(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    audited::expand_derive_audited(input).into()
}
