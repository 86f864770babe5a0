#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use lifecycle_db::OffsetTimestamp;
    use sea_orm::ActiveValue;
    use uuid::Uuid;

    use crate::domain::model::{Record, Tenant, User};
    use crate::infra::storage::entity::{tenant, user};
    use crate::infra::storage::store::StoredEntity;

    fn stamp() -> OffsetTimestamp {
        OffsetTimestamp::from_utc_naive(sea_orm::prelude::DateTime::default())
    }

    #[test]
    fn new_row_leaves_lifecycle_columns_to_interceptors() {
        let am = tenant::Entity::new_row(Tenant {
            name: "acme".to_owned(),
            is_active: true,
            ..Default::default()
        });

        assert_eq!(am.name, ActiveValue::Set("acme".to_owned()));
        assert!(am.id.is_not_set());
        assert!(am.version.is_not_set());
        assert!(am.created_at.is_not_set());
        assert!(am.is_deleted.is_not_set());
    }

    #[test]
    fn changed_row_carries_loaded_identity() {
        let id = Uuid::new_v4();
        let record = Record {
            id,
            version: 4,
            created_at: stamp(),
            created_by: None,
            updated_at: stamp(),
            updated_by: None,
            data: User {
                username: "jdoe".to_owned(),
                ..Default::default()
            },
        };

        let am = user::Entity::changed_row(record);

        assert_eq!(am.id, ActiveValue::Unchanged(id));
        assert_eq!(am.version, ActiveValue::Unchanged(4));
        assert_eq!(am.username, ActiveValue::Set("jdoe".to_owned()));
        assert!(am.created_at.is_not_set());
        assert!(am.updated_by.is_not_set());
    }
}
