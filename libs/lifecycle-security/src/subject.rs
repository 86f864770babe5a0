use uuid::Uuid;

use crate::constants::ROOT_SUBJECT_ID;

/// What kind of principal is acting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    #[default]
    User,
    System,
}

/// The principal on whose behalf an operation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub kind: SubjectKind,
}

impl Subject {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            kind: SubjectKind::User,
        }
    }

    /// Bootstrap subject used for migrations and seed data.
    #[must_use]
    pub fn root() -> Self {
        Self {
            id: ROOT_SUBJECT_ID,
            kind: SubjectKind::System,
        }
    }
}
