use lifecycle_db::lifecycle::{ConfigError, LifecycleConfig, LifecycleRegistry};

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod sea_orm_repo;
pub mod store;

#[cfg(test)]
mod mapper_test;

pub use migrations::Migrator;
pub use sea_orm_repo::{SeaOrmTeamRepository, SeaOrmTenantRepository, SeaOrmUserRepository};

/// Registry holding every entity this module persists.
///
/// # Errors
/// Returns `ConfigError` if an entity's lifecycle mapping or configured strategy is invalid.
pub fn lifecycle_registry(config: LifecycleConfig) -> Result<LifecycleRegistry, ConfigError> {
    LifecycleRegistry::builder()
        .with_config(config)
        .register::<entity::tenant::Entity>()
        .register::<entity::team::Entity>()
        .register::<entity::user::Entity>()
        .build()
}
