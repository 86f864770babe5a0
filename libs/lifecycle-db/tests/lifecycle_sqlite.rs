#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

#[cfg(feature = "sqlite")]
mod sqlite_lifecycle_tests {
    use std::sync::Arc;

    use lifecycle_db::lifecycle::{
        ColumnSelection, ColumnSet, ConfigError, FixedClock, LifecycleError, NoActor,
        SecurityContext, TxError,
    };
    use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait};
    use uuid::Uuid;

    use crate::common::{at, gadget, orphan, setup, setup_file};

    fn user() -> SecurityContext {
        SecurityContext::for_user(Uuid::new_v4(), Uuid::new_v4())
    }

    fn new_gadget(label: &str) -> gadget::ActiveModel {
        gadget::ActiveModel {
            label: Set(label.to_owned()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn insert_stamps_base_columns() {
        let db = setup().await.with_clock(Arc::new(FixedClock(at(9, 0))));
        let ctx = user();

        let row = db
            .insert::<gadget::Entity>(&ctx, new_gadget("lamp"))
            .await
            .unwrap();

        assert_eq!(row.id.get_version_num(), 7);
        assert_eq!(row.version, 0);
        assert!(!row.is_deleted);
        assert_eq!(row.deleted_at, None);
        assert_eq!(row.created_at, at(9, 0));
        assert_eq!(row.created_at, row.updated_at);
        assert_eq!(row.created_by, ctx.subject_id());
        assert_eq!(row.updated_by, ctx.subject_id());
    }

    #[tokio::test]
    async fn insert_without_actor_leaves_actor_columns_empty() {
        let db = setup().await;

        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("desk"))
            .await
            .unwrap();

        assert_eq!(row.created_by, None);
        assert_eq!(row.updated_by, None);
    }

    #[tokio::test]
    async fn insert_keeps_caller_id_and_resets_version() {
        let db = setup().await;
        let id = Uuid::new_v4();
        let mut am = new_gadget("chair");
        am.id = Set(id);
        am.version = Set(41);

        let row = db.insert::<gadget::Entity>(&NoActor, am).await.unwrap();

        assert_eq!(row.id, id);
        assert_eq!(row.version, 0);
    }

    #[tokio::test]
    async fn before_insert_is_idempotent() {
        let first = setup().await.with_clock(Arc::new(FixedClock(at(9, 0))));
        let second = first.clone().with_clock(Arc::new(FixedClock(at(10, 0))));
        let ctx = user();
        let mut am = new_gadget("shelf");

        first.before_insert::<gadget::Entity>(&ctx, &mut am).unwrap();
        let id = am.id.clone().unwrap();
        second
            .before_insert::<gadget::Entity>(&NoActor, &mut am)
            .unwrap();

        assert_eq!(am.id.clone().unwrap(), id);
        assert_eq!(am.created_at.clone().unwrap(), at(9, 0));
        assert_eq!(am.created_by.clone().unwrap(), ctx.subject_id());
        assert_eq!(am.version.clone().unwrap(), 0);
    }

    #[tokio::test]
    async fn update_bumps_version_and_keeps_creation_stamp() {
        let db = setup().await.with_clock(Arc::new(FixedClock(at(9, 0))));
        let creator = user();
        let editor = user();
        let row = db
            .insert::<gadget::Entity>(&creator, new_gadget("lamp"))
            .await
            .unwrap();

        let later = db.clone().with_clock(Arc::new(FixedClock(at(11, 30))));
        let mut am: gadget::ActiveModel = row.clone().into();
        am.label = Set("desk lamp".to_owned());
        am.created_at = Set(at(1, 0));
        let updated = later.update::<gadget::Entity>(&editor, am).await.unwrap();

        assert_eq!(updated.label, "desk lamp");
        assert_eq!(updated.version, 1);
        assert_eq!(updated.created_at, row.created_at);
        assert_eq!(updated.created_by, creator.subject_id());
        assert_eq!(updated.updated_at, at(11, 30));
        assert_eq!(updated.updated_by, editor.subject_id());

        let stored = db.find_by_id::<gadget::Entity>(row.id).await.unwrap();
        assert_eq!(stored, Some(updated));
    }

    #[tokio::test]
    async fn concurrent_updates_from_same_version_conflict() {
        let db = setup().await;
        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("lamp"))
            .await
            .unwrap();

        let mut first: gadget::ActiveModel = row.clone().into();
        first.label = Set("first".to_owned());
        let mut second: gadget::ActiveModel = row.clone().into();
        second.label = Set("second".to_owned());

        db.update::<gadget::Entity>(&NoActor, first).await.unwrap();
        let err = db
            .update::<gadget::Entity>(&NoActor, second)
            .await
            .unwrap_err();

        assert!(err.is_conflict(), "{err}");
        assert!(matches!(
            err,
            LifecycleError::StaleVersion {
                expected: 0,
                actual: 1,
                ..
            }
        ));

        let stored = db.find_by_id::<gadget::Entity>(row.id).await.unwrap().unwrap();
        assert_eq!(stored.label, "first");
        assert_eq!(stored.version, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn racing_updates_from_same_version_let_exactly_one_win() {
        let dir = tempfile::tempdir().unwrap();
        let db = setup_file(&dir.path().join("race.db"), 4).await;
        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("lamp"))
            .await
            .unwrap();

        let mut first: gadget::ActiveModel = row.clone().into();
        first.label = Set("first".to_owned());
        let mut second: gadget::ActiveModel = row.clone().into();
        second.label = Set("second".to_owned());

        let (a, b) = tokio::join!(
            db.update::<gadget::Entity>(&NoActor, first),
            db.update::<gadget::Entity>(&NoActor, second),
        );

        let (winner, loser) = match (a, b) {
            (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
            (a, b) => panic!("expected exactly one winner, got {a:?} and {b:?}"),
        };
        assert!(loser.is_conflict(), "{loser}");
        assert_eq!(winner.version, 1);

        let stored = db.find_by_id::<gadget::Entity>(row.id).await.unwrap().unwrap();
        assert_eq!(stored, winner);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let db = setup().await;
        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("lamp"))
            .await
            .unwrap();

        let mut am: gadget::ActiveModel = row.into();
        am.id = Set(Uuid::new_v4());
        am.label = Set("ghost".to_owned());
        let err = db.update::<gadget::Entity>(&NoActor, am).await.unwrap_err();

        assert!(err.is_not_found(), "{err}");
    }

    #[tokio::test]
    async fn update_without_loaded_version_is_rejected() {
        let db = setup().await;
        let mut am = new_gadget("lamp");
        am.id = Set(Uuid::new_v4());

        let err = db.update::<gadget::Entity>(&NoActor, am).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Invalid(_)), "{err}");
    }

    #[tokio::test]
    async fn update_columns_writes_only_selected_columns() {
        let db = setup().await;
        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("lamp"))
            .await
            .unwrap();

        let mut am: gadget::ActiveModel = row.clone().into();
        am.label = Set("floor lamp".to_owned());
        am.note = Set(Some("not selected".to_owned()));
        let updated = db
            .update_columns::<gadget::Entity>(
                &NoActor,
                am,
                ColumnSelection::<gadget::Entity>::of([gadget::Column::Label]),
            )
            .await
            .unwrap();

        assert_eq!(updated.label, "floor lamp");
        assert_eq!(updated.note, None);
        assert_eq!(updated.version, 1);
        assert_eq!(updated.created_at, row.created_at);
    }

    #[tokio::test]
    async fn update_many_touches_live_rows_and_bumps_versions() {
        let db = setup().await;
        let ctx = user();
        for label in ["a-1", "a-2", "b-1"] {
            db.insert::<gadget::Entity>(&NoActor, new_gadget(label))
                .await
                .unwrap();
        }
        let gone = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("a-3"))
            .await
            .unwrap();
        assert!(db.delete_by_id::<gadget::Entity>(&NoActor, gone.id).await.unwrap());

        let rows = db
            .update_many::<gadget::Entity>(
                &ctx,
                ColumnSet::<gadget::Entity>::new().value(gadget::Column::Note, "bulk"),
                gadget::Column::Label.starts_with("a-"),
            )
            .await
            .unwrap();
        assert_eq!(rows, 2);

        let touched = db
            .find::<gadget::Entity>()
            .unwrap()
            .filter(gadget::Column::Note.eq("bulk"))
            .all(db.conn())
            .await
            .unwrap();
        assert_eq!(touched.len(), 2);
        for row in touched {
            assert_eq!(row.version, 1);
            assert_eq!(row.updated_by, ctx.subject_id());
        }
    }

    #[tokio::test]
    async fn update_many_never_reassigns_primary_keys() {
        let db = setup().await;
        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("lamp"))
            .await
            .unwrap();
        let other_id = Uuid::new_v4();

        let rows = db
            .update_many::<gadget::Entity>(
                &NoActor,
                ColumnSet::<gadget::Entity>::new()
                    .value(gadget::Column::Id, other_id)
                    .value(gadget::Column::Note, "moved"),
                gadget::Column::Id.eq(row.id),
            )
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let stored = db.find_by_id::<gadget::Entity>(row.id).await.unwrap().unwrap();
        assert_eq!(stored.note.as_deref(), Some("moved"));
        assert_eq!(stored.version, 1);
        assert_eq!(db.find_by_id::<gadget::Entity>(other_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_many_with_only_an_id_is_rejected() {
        let db = setup().await;

        let err = db
            .update_many::<gadget::Entity>(
                &NoActor,
                ColumnSet::<gadget::Entity>::new().value(gadget::Column::Id, Uuid::new_v4()),
                gadget::Column::Label.eq("lamp"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Invalid(_)), "{err}");
    }

    #[tokio::test]
    async fn update_columns_ignores_a_selected_id() {
        let db = setup().await;
        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("lamp"))
            .await
            .unwrap();

        let mut am: gadget::ActiveModel = row.clone().into();
        am.label = Set("floor lamp".to_owned());
        let updated = db
            .update_columns::<gadget::Entity>(
                &NoActor,
                am,
                ColumnSelection::<gadget::Entity>::of([gadget::Column::Id, gadget::Column::Label]),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, row.id);
        assert_eq!(updated.label, "floor lamp");
    }

    #[tokio::test]
    async fn update_many_requires_a_column() {
        let db = setup().await;

        let err = db
            .update_many::<gadget::Entity>(
                &NoActor,
                ColumnSet::<gadget::Entity>::new(),
                gadget::Column::Label.eq("x"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Invalid(_)), "{err}");
    }

    #[tokio::test]
    async fn delete_hides_row_from_default_reads() {
        let db = setup().await.with_clock(Arc::new(FixedClock(at(9, 0))));
        let ctx = user();
        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("lamp"))
            .await
            .unwrap();

        let later = db.clone().with_clock(Arc::new(FixedClock(at(12, 0))));
        assert!(later.delete_by_id::<gadget::Entity>(&ctx, row.id).await.unwrap());

        assert_eq!(db.find_by_id::<gadget::Entity>(row.id).await.unwrap(), None);
        assert_eq!(db.find::<gadget::Entity>().unwrap().count(db.conn()).await.unwrap(), 0);

        let stored = db
            .find_with_deleted::<gadget::Entity>()
            .and_id(row.id)
            .unwrap()
            .one(db.conn())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_deleted);
        assert_eq!(stored.deleted_at, Some(at(12, 0)));
        assert_eq!(stored.deleted_by, ctx.subject_id());
        assert_eq!(stored.version, row.version);
        assert_eq!(stored.updated_at, row.updated_at);
    }

    #[tokio::test]
    async fn deleting_twice_reports_nothing_deleted() {
        let db = setup().await;
        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("lamp"))
            .await
            .unwrap();

        assert!(db.delete_by_id::<gadget::Entity>(&NoActor, row.id).await.unwrap());
        assert!(!db.delete_by_id::<gadget::Entity>(&NoActor, row.id).await.unwrap());
        assert!(!db
            .delete_by_id::<gadget::Entity>(&NoActor, Uuid::new_v4())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn updating_a_deleted_row_is_not_found() {
        let db = setup().await;
        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("lamp"))
            .await
            .unwrap();
        db.delete_by_id::<gadget::Entity>(&NoActor, row.id).await.unwrap();

        let mut am: gadget::ActiveModel = row.into();
        am.label = Set("revived".to_owned());
        let err = db.update::<gadget::Entity>(&NoActor, am).await.unwrap_err();

        assert!(err.is_not_found(), "{err}");
    }

    #[tokio::test]
    async fn delete_many_soft_deletes_matching_rows() {
        let db = setup().await;
        for label in ["a-1", "a-2", "b-1"] {
            db.insert::<gadget::Entity>(&NoActor, new_gadget(label))
                .await
                .unwrap();
        }

        let rows = db
            .delete_many::<gadget::Entity>(&NoActor, gadget::Column::Label.starts_with("a-"))
            .await
            .unwrap();
        assert_eq!(rows, 2);

        let live = db.find::<gadget::Entity>().unwrap().all(db.conn()).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].label, "b-1");

        let all = db
            .find_with_deleted::<gadget::Entity>()
            .count(db.conn())
            .await
            .unwrap();
        assert_eq!(all, 3);
    }

    #[tokio::test]
    async fn malformed_stored_timestamp_is_a_data_integrity_error() {
        let db = setup().await;
        let row = db
            .insert::<gadget::Entity>(&NoActor, new_gadget("lamp"))
            .await
            .unwrap();

        db.conn()
            .execute_unprepared("UPDATE gadgets SET created_at = 'garbage'")
            .await
            .unwrap();

        let err = db.find_by_id::<gadget::Entity>(row.id).await.unwrap_err();
        assert!(matches!(err, LifecycleError::DataIntegrity(_)), "{err}");
    }

    #[tokio::test]
    async fn unregistered_entity_is_a_config_error() {
        let db = setup().await;

        let err = db.find::<orphan::Entity>().unwrap_err();
        assert!(
            matches!(err, LifecycleError::Config(ConfigError::Unregistered(ref t)) if t == "orphans"),
            "{err}"
        );
    }

    #[tokio::test]
    async fn transaction_commit_persists_rows() {
        let db = setup().await;
        let am = new_gadget("committed");

        let row = db
            .in_transaction(move |tx| {
                Box::pin(async move { tx.insert::<gadget::Entity>(&NoActor, am).await })
            })
            .await
            .expect("Transaction failed");

        assert!(db.find_by_id::<gadget::Entity>(row.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn transaction_error_rolls_back() {
        let db = setup().await;
        let am = new_gadget("rolled back");

        let result: Result<(), TxError<LifecycleError>> = db
            .in_transaction(move |tx| {
                Box::pin(async move {
                    tx.insert::<gadget::Entity>(&NoActor, am).await?;
                    Err::<(), _>(LifecycleError::Invalid("simulated failure"))
                })
            })
            .await;

        assert!(matches!(
            result,
            Err(TxError::Domain(LifecycleError::Invalid("simulated failure")))
        ));
        let count = db
            .find_with_deleted::<gadget::Entity>()
            .count(db.conn())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
