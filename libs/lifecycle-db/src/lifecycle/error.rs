use uuid::Uuid;

/// Wiring problems detected while building the [`LifecycleRegistry`](super::LifecycleRegistry).
///
/// These are fatal: the process should refuse to start rather than run with an
/// entity whose soft-delete or versioning contract cannot be honoured.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown soft-delete strategy '{strategy}' for entity '{entity}'")]
    UnknownStrategy { entity: String, strategy: String },

    #[error("soft-delete strategy '{0}' registered twice")]
    DuplicateStrategy(String),

    #[error("entity '{0}' registered twice")]
    DuplicateEntity(String),

    #[error("entity '{entity}' has no '{field}' column")]
    MissingField { entity: String, field: &'static str },

    #[error("entity '{entity}': column '{column}' is {found}, expected {expected}")]
    IncompatibleFieldType {
        entity: String,
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("entity '{0}' is not registered with the lifecycle registry")]
    Unregistered(String),

    #[error("failed to load lifecycle configuration: {0}")]
    Load(String),
}

/// Errors returned by lifecycle-aware persistence operations.
#[derive(thiserror::Error, Debug)]
pub enum LifecycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The row exists but was modified since it was loaded.
    #[error("stale version for {entity} {id}: expected {expected}, found {actual}")]
    StaleVersion {
        entity: String,
        id: Uuid,
        expected: i64,
        actual: i64,
    },

    /// No live row with this id.
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: Uuid },

    /// A stored value could not be decoded (e.g. a malformed timestamp).
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("invalid operation: {0}")]
    Invalid(&'static str),

    #[error("database error: {0}")]
    Db(sea_orm::DbErr),
}

impl LifecycleError {
    /// True for the optimistic-concurrency conflict, the only condition a caller
    /// can resolve by reloading and retrying.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::StaleVersion { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<sea_orm::DbErr> for LifecycleError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Type(msg) => Self::DataIntegrity(msg),
            other => Self::Db(other),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn type_errors_become_data_integrity() {
        let err: LifecycleError = sea_orm::DbErr::Type("bad timestamp".to_owned()).into();
        assert!(matches!(err, LifecycleError::DataIntegrity(ref m) if m == "bad timestamp"));

        let err: LifecycleError = sea_orm::DbErr::RecordNotFound("x".to_owned()).into();
        assert!(matches!(err, LifecycleError::Db(_)));
    }

    #[test]
    fn only_stale_version_is_a_conflict() {
        let stale = LifecycleError::StaleVersion {
            entity: "users".to_owned(),
            id: Uuid::nil(),
            expected: 1,
            actual: 2,
        };
        let missing = LifecycleError::NotFound {
            entity: "users".to_owned(),
            id: Uuid::nil(),
        };

        assert!(stale.is_conflict());
        assert!(!missing.is_conflict());
        assert!(missing.is_not_found());
        assert_eq!(
            stale.to_string(),
            "stale version for users 00000000-0000-0000-0000-000000000000: expected 1, found 2"
        );
    }
}
