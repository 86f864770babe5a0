//! Registration of lifecycle-managed entities.
//!
//! Every entity is described and validated once, when the registry is built. After
//! `build()` the registry is immutable and is shared behind an `Arc`; hooks look up
//! the cached [`EntityDescriptor`] and never re-resolve strategies per call.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use sea_orm::sea_query::ColumnType;
use sea_orm::{ColumnTrait, EntityTrait, IdenStatic};
use tracing::{debug, info, warn};

use super::config::LifecycleConfig;
use super::entity_traits::{AuditedEntity, LifecycleField};
use super::error::ConfigError;
use super::interceptor::{EntityInterceptor, InterceptorChain};
use super::soft_delete::SoftDeleteStrategy;

/// Name and storage type of one mapped lifecycle column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldColumn {
    pub name: String,
    pub column_type: ColumnType,
}

/// Validated, type-erased view of a registered entity.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    table: String,
    fields: BTreeMap<LifecycleField, FieldColumn>,
    soft_delete: SoftDeleteStrategy,
}

impl EntityDescriptor {
    pub(crate) fn new(
        table: impl Into<String>,
        fields: BTreeMap<LifecycleField, FieldColumn>,
        soft_delete: SoftDeleteStrategy,
    ) -> Self {
        Self {
            table: table.into(),
            fields,
            soft_delete,
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn has(&self, field: LifecycleField) -> bool {
        self.fields.contains_key(&field)
    }

    #[must_use]
    pub fn column(&self, field: LifecycleField) -> Option<&FieldColumn> {
        self.fields.get(&field)
    }

    #[must_use]
    pub fn soft_delete(&self) -> &SoftDeleteStrategy {
        &self.soft_delete
    }
}

/// Column layout captured from an entity before its strategy is resolved.
struct PendingEntity {
    table: String,
    fields: BTreeMap<LifecycleField, FieldColumn>,
    declared_strategy: &'static str,
}

impl PendingEntity {
    fn describe<E: AuditedEntity>() -> Self {
        let fields = LifecycleField::ALL
            .into_iter()
            .filter_map(|field| {
                E::lifecycle_col(field).map(|col| {
                    (
                        field,
                        FieldColumn {
                            name: col.as_str().to_owned(),
                            column_type: col.def().get_column_type().clone(),
                        },
                    )
                })
            })
            .collect();

        Self {
            table: E::default().table_name().to_owned(),
            fields,
            declared_strategy: E::SOFT_DELETE_STRATEGY,
        }
    }

    fn resolve(
        self,
        config: &LifecycleConfig,
        strategies: &HashMap<&'static str, SoftDeleteStrategy>,
    ) -> Result<EntityDescriptor, ConfigError> {
        for field in LifecycleField::REQUIRED {
            self.require(field)?;
        }
        for field in LifecycleField::ALL {
            if let Some(col) = self.fields.get(&field) {
                self.check_type(field, col)?;
            }
        }

        let strategy_name = config
            .strategy_override(&self.table)
            .unwrap_or(self.declared_strategy);
        let strategy = strategies.get(strategy_name).copied().ok_or_else(|| {
            ConfigError::UnknownStrategy {
                entity: self.table.clone(),
                strategy: strategy_name.to_owned(),
            }
        })?;

        let flag = self.require(LifecycleField::IsDeleted)?;
        if !strategy.accepts_flag(&flag.column_type) {
            return Err(ConfigError::IncompatibleFieldType {
                entity: self.table.clone(),
                column: flag.name.clone(),
                expected: "boolean",
                found: describe_type(&flag.column_type).to_owned(),
            });
        }
        for field in strategy.requires() {
            self.require(*field)?;
        }

        debug!(
            entity = %self.table,
            strategy = strategy.name(),
            fields = self.fields.len(),
            "lifecycle entity resolved"
        );
        Ok(EntityDescriptor::new(self.table, self.fields, strategy))
    }

    fn require(&self, field: LifecycleField) -> Result<&FieldColumn, ConfigError> {
        self.fields
            .get(&field)
            .ok_or_else(|| ConfigError::MissingField {
                entity: self.table.clone(),
                field: field.canonical_name(),
            })
    }

    // Values are written through `ActiveModel::set`, which cannot convert across
    // storage types, so mismatches are rejected here instead of at first write.
    fn check_type(&self, field: LifecycleField, col: &FieldColumn) -> Result<(), ConfigError> {
        let expected = match field {
            LifecycleField::Id | LifecycleField::CreatedBy | LifecycleField::UpdatedBy
            | LifecycleField::DeletedBy => ("uuid", is_uuid(&col.column_type)),
            LifecycleField::CreatedAt | LifecycleField::UpdatedAt | LifecycleField::DeletedAt => {
                ("naive timestamp", is_naive_timestamp(&col.column_type))
            }
            LifecycleField::Version => ("integer", is_integer(&col.column_type)),
            // the strategy decides what backs the flag
            LifecycleField::IsDeleted => return Ok(()),
        };
        if expected.1 {
            Ok(())
        } else {
            Err(ConfigError::IncompatibleFieldType {
                entity: self.table.clone(),
                column: col.name.clone(),
                expected: expected.0,
                found: describe_type(&col.column_type).to_owned(),
            })
        }
    }
}

fn is_uuid(ty: &ColumnType) -> bool {
    matches!(ty, ColumnType::Uuid)
}

fn is_naive_timestamp(ty: &ColumnType) -> bool {
    matches!(ty, ColumnType::DateTime | ColumnType::Timestamp)
}

fn is_integer(ty: &ColumnType) -> bool {
    matches!(
        ty,
        ColumnType::SmallInteger | ColumnType::Integer | ColumnType::BigInteger
    )
}

fn describe_type(ty: &ColumnType) -> &'static str {
    match ty {
        ColumnType::Boolean => "boolean",
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger => "integer",
        ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned => "unsigned integer",
        ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => "text",
        ColumnType::DateTime | ColumnType::Timestamp => "naive timestamp",
        ColumnType::TimestampWithTimeZone => "timestamp with time zone",
        ColumnType::Uuid => "uuid",
        _ => "unsupported type",
    }
}

/// Immutable set of registered entities plus the interceptor chain applied to them.
pub struct LifecycleRegistry {
    entities: HashMap<String, EntityDescriptor>,
    chain: InterceptorChain,
    timestamp_precision: u16,
}

impl std::fmt::Debug for LifecycleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleRegistry")
            .field("entities", &self.entities)
            .field("chain", &self.chain)
            .field("timestamp_precision", &self.timestamp_precision)
            .finish()
    }
}

impl LifecycleRegistry {
    /// Builder pre-loaded with the default strategy and interceptor chain.
    #[must_use]
    pub fn builder() -> LifecycleRegistryBuilder {
        LifecycleRegistryBuilder::default()
    }

    /// Capability check: does the lifecycle layer manage this entity?
    #[must_use]
    pub fn applies_to<E: EntityTrait>(&self) -> bool {
        self.applies_to_table(E::default().table_name())
    }

    #[must_use]
    pub fn applies_to_table(&self, table: &str) -> bool {
        self.entities.contains_key(table)
    }

    /// # Errors
    /// Returns `ConfigError::Unregistered` if `E` was never registered.
    pub fn descriptor<E: EntityTrait>(&self) -> Result<&EntityDescriptor, ConfigError> {
        let table = E::default().table_name().to_owned();
        self.entities
            .get(&table)
            .ok_or(ConfigError::Unregistered(table))
    }

    #[must_use]
    pub fn descriptor_for_table(&self, table: &str) -> Option<&EntityDescriptor> {
        self.entities.get(table)
    }

    #[must_use]
    pub fn tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        tables.sort_unstable();
        tables
    }

    #[must_use]
    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    #[must_use]
    pub fn timestamp_precision(&self) -> u16 {
        self.timestamp_precision
    }
}

pub struct LifecycleRegistryBuilder {
    config: LifecycleConfig,
    strategies: HashMap<&'static str, SoftDeleteStrategy>,
    duplicate_strategy: Option<&'static str>,
    pending: Vec<PendingEntity>,
    chain: InterceptorChain,
}

impl Default for LifecycleRegistryBuilder {
    fn default() -> Self {
        let mut strategies = HashMap::new();
        strategies.insert(SoftDeleteStrategy::DEFAULT.name(), SoftDeleteStrategy::DEFAULT);
        Self {
            config: LifecycleConfig::default(),
            strategies,
            duplicate_strategy: None,
            pending: Vec::new(),
            chain: InterceptorChain::default(),
        }
    }
}

impl LifecycleRegistryBuilder {
    #[must_use]
    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    /// Make a strategy available by name. Registering the same name twice is an error
    /// reported by [`build`](Self::build).
    #[must_use]
    pub fn strategy(mut self, strategy: SoftDeleteStrategy) -> Self {
        if self.strategies.insert(strategy.name(), strategy).is_some() {
            self.duplicate_strategy.get_or_insert(strategy.name());
        }
        self
    }

    #[must_use]
    pub fn register<E: AuditedEntity>(mut self) -> Self {
        self.pending.push(PendingEntity::describe::<E>());
        self
    }

    /// Append an interceptor after the built-in ones.
    #[must_use]
    pub fn interceptor(mut self, interceptor: Arc<dyn EntityInterceptor>) -> Self {
        self.chain.push(interceptor);
        self
    }

    /// Validate every registration and freeze the registry.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found: duplicate names, unknown strategies,
    /// missing columns or columns of the wrong type.
    pub fn build(self) -> Result<LifecycleRegistry, ConfigError> {
        if let Some(name) = self.duplicate_strategy {
            return Err(ConfigError::DuplicateStrategy(name.to_owned()));
        }

        let mut entities = HashMap::with_capacity(self.pending.len());
        for pending in self.pending {
            if entities.contains_key(&pending.table) {
                return Err(ConfigError::DuplicateEntity(pending.table));
            }
            let descriptor = pending.resolve(&self.config, &self.strategies)?;
            entities.insert(descriptor.table().to_owned(), descriptor);
        }

        for table in self.config.entities.keys() {
            if !entities.contains_key(table) {
                warn!(entity = %table, "lifecycle config names an unregistered entity");
            }
        }

        info!(
            entities = entities.len(),
            strategies = self.strategies.len(),
            interceptors = ?self.chain.names(),
            "lifecycle registry built"
        );

        Ok(LifecycleRegistry {
            entities,
            chain: self.chain,
            timestamp_precision: self.config.timestamp_precision.min(9),
        })
    }
}
