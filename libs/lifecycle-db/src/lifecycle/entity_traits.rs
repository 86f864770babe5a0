use sea_orm::EntityTrait;

use super::soft_delete::DEFAULT_SOFT_DELETE_STRATEGY;

/// The base-entity columns the lifecycle layer knows how to maintain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleField {
    Id,
    IsDeleted,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
    Version,
}

impl LifecycleField {
    pub const ALL: [Self; 9] = [
        Self::Id,
        Self::IsDeleted,
        Self::DeletedAt,
        Self::DeletedBy,
        Self::CreatedAt,
        Self::CreatedBy,
        Self::UpdatedAt,
        Self::UpdatedBy,
        Self::Version,
    ];

    /// Fields every registered entity must map.
    pub const REQUIRED: [Self; 4] = [Self::Id, Self::CreatedAt, Self::UpdatedAt, Self::Version];

    /// Canonical column name.
    #[must_use]
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::IsDeleted => "is_deleted",
            Self::DeletedAt => "deleted_at",
            Self::DeletedBy => "deleted_by",
            Self::CreatedAt => "created_at",
            Self::CreatedBy => "created_by",
            Self::UpdatedAt => "updated_at",
            Self::UpdatedBy => "updated_by",
            Self::Version => "version",
        }
    }

    /// Fields owned by the soft-delete transition.
    #[must_use]
    pub fn is_deletion_field(self) -> bool {
        matches!(self, Self::IsDeleted | Self::DeletedAt | Self::DeletedBy)
    }
}

impl std::fmt::Display for LifecycleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Capability marker for entities that carry the base lifecycle columns.
///
/// Implementing this trait (normally through `#[derive(Audited)]`) is what opts an
/// entity into audit stamping, soft delete and optimistic versioning. Each accessor
/// names the entity column backing a [`LifecycleField`], or `None` when the entity
/// does not have it. Whether a given mapping is acceptable is decided once, when the
/// entity is registered, not here.
///
/// # Example (Manual Implementation)
/// ```rust,ignore
/// impl AuditedEntity for tenant::Entity {
///     fn id_col() -> Option<Self::Column> { Some(tenant::Column::Id) }
///     fn deleted_flag_col() -> Option<Self::Column> { Some(tenant::Column::IsDeleted) }
///     fn deleted_at_col() -> Option<Self::Column> { Some(tenant::Column::DeletedAt) }
///     fn deleted_by_col() -> Option<Self::Column> { Some(tenant::Column::DeletedBy) }
///     fn created_at_col() -> Option<Self::Column> { Some(tenant::Column::CreatedAt) }
///     fn created_by_col() -> Option<Self::Column> { Some(tenant::Column::CreatedBy) }
///     fn updated_at_col() -> Option<Self::Column> { Some(tenant::Column::UpdatedAt) }
///     fn updated_by_col() -> Option<Self::Column> { Some(tenant::Column::UpdatedBy) }
///     fn version_col() -> Option<Self::Column> { Some(tenant::Column::Version) }
/// }
/// ```
///
/// # Example (Using Derive Macro)
/// ```rust,ignore
/// use lifecycle_db::Audited;
///
/// #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Audited)]
/// #[sea_orm(table_name = "tenants")]
/// #[audit(soft_delete = "DEFAULT_SOFT_DELETE")]
/// pub struct Model {
///     #[sea_orm(primary_key, auto_increment = false)]
///     pub id: Uuid,
///     pub name: String,
///     pub is_deleted: bool,
///     // ...remaining base columns
/// }
/// ```
pub trait AuditedEntity: EntityTrait {
    /// Name of the soft-delete strategy looked up at registration.
    const SOFT_DELETE_STRATEGY: &'static str = DEFAULT_SOFT_DELETE_STRATEGY;

    fn id_col() -> Option<Self::Column>;

    /// The boolean "is deleted" flag.
    fn deleted_flag_col() -> Option<Self::Column>;

    fn deleted_at_col() -> Option<Self::Column>;

    fn deleted_by_col() -> Option<Self::Column>;

    fn created_at_col() -> Option<Self::Column>;

    fn created_by_col() -> Option<Self::Column>;

    fn updated_at_col() -> Option<Self::Column>;

    fn updated_by_col() -> Option<Self::Column>;

    fn version_col() -> Option<Self::Column>;

    /// Dispatch by field.
    fn lifecycle_col(field: LifecycleField) -> Option<Self::Column> {
        match field {
            LifecycleField::Id => Self::id_col(),
            LifecycleField::IsDeleted => Self::deleted_flag_col(),
            LifecycleField::DeletedAt => Self::deleted_at_col(),
            LifecycleField::DeletedBy => Self::deleted_by_col(),
            LifecycleField::CreatedAt => Self::created_at_col(),
            LifecycleField::CreatedBy => Self::created_by_col(),
            LifecycleField::UpdatedAt => Self::updated_at_col(),
            LifecycleField::UpdatedBy => Self::updated_by_col(),
            LifecycleField::Version => Self::version_col(),
        }
    }
}
