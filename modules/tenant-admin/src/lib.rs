//! Tenant administration module.
//!
//! Tenants, teams and users stored through the lifecycle layer: every row carries
//! audit stamps, a soft-delete flag and an optimistic version, maintained by
//! `lifecycle_db` rather than by the code in this crate.

use std::sync::Arc;

use lifecycle_db::LifecycleConn;

pub mod domain;
pub mod infra;

pub use domain::error::DomainError;
pub use domain::model::{Record, Team, Tenant, User};
pub use domain::service::{Service, ServiceConfig};
pub use infra::storage::{Migrator, lifecycle_registry};

/// Wire the SeaORM repositories into a [`Service`].
///
/// `db` must have been built with [`lifecycle_registry`] (or a registry that includes
/// the same entities).
#[must_use]
pub fn build_service(db: &LifecycleConn, config: ServiceConfig) -> Service {
    Service::new(
        Arc::new(infra::storage::SeaOrmTenantRepository::new(db.clone())),
        Arc::new(infra::storage::SeaOrmTeamRepository::new(db.clone())),
        Arc::new(infra::storage::SeaOrmUserRepository::new(db.clone())),
        config,
    )
}
