use lifecycle_db::lifecycle::{InfraError, LifecycleError};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: Uuid },

    /// Someone else saved the row after it was loaded. Reload and retry.
    #[error("{entity} {id} was modified concurrently")]
    Conflict { entity: String, id: Uuid },

    #[error("{entity} '{key}' already exists")]
    AlreadyExists { entity: &'static str, key: String },

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(entity: impl Into<String>, id: Uuid) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Transaction failures outside the callback (begin/commit).
    #[allow(clippy::needless_pass_by_value)]
    pub fn database_infra(e: InfraError) -> Self {
        Self::Database(anyhow::anyhow!("transaction failed: {e}"))
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<LifecycleError> for DomainError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::StaleVersion { entity, id, .. } => Self::Conflict { entity, id },
            LifecycleError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Database(other.into()),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn stale_version_maps_to_conflict() {
        let id = Uuid::new_v4();
        let err: DomainError = LifecycleError::StaleVersion {
            entity: "lb_user".to_owned(),
            id,
            expected: 2,
            actual: 3,
        }
        .into();

        assert!(err.is_conflict());
        assert!(matches!(err, DomainError::Conflict { ref entity, id: got } if entity == "lb_user" && got == id));
    }

    #[test]
    fn missing_row_stays_distinct_from_conflict() {
        let err: DomainError = LifecycleError::NotFound {
            entity: "lb_team".to_owned(),
            id: Uuid::nil(),
        }
        .into();

        assert!(!err.is_conflict());
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn integrity_failures_are_database_errors() {
        let err: DomainError = LifecycleError::DataIntegrity("bad timestamp".to_owned()).into();
        assert!(matches!(err, DomainError::Database(_)));
        assert!(err.to_string().contains("bad timestamp"), "{err}");
    }
}
