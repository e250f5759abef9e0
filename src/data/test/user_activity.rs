use super::*;
use crate::data::user_activity::UserActivityRepository;

/// Tests reading factory-created rows.
///
/// Expected: records converted with ids and status parsed
#[tokio::test]
async fn gets_all_records() -> Result<(), AppError> {
    let test = TestBuilder::new().with_tracker_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user_activity::UserActivityFactory::new(db)
        .user_id(1)
        .inactive_for_days(16)
        .current_role_id(77)
        .build()
        .await?;
    factory::user_activity::UserActivityFactory::new(db)
        .user_id(2)
        .status("inactive")
        .build()
        .await?;

    let mut records = UserActivityRepository::new(db).get_all().await?;
    records.sort_by_key(|r| r.user_id);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].days_inactive(Utc::now()), 16);
    assert_eq!(records[0].current_role_id, Some(77));
    assert_eq!(records[1].status, ActivityStatus::Inactive);
    Ok(())
}

/// Tests that a corrupted status string surfaces as an internal error.
///
/// Expected: Err(AppError::InternalErr)
#[tokio::test]
async fn rejects_unknown_status() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_tracker_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user_activity::UserActivityFactory::new(db)
        .status("banished")
        .build()
        .await?;

    let result = UserActivityRepository::new(db).get_all().await;

    assert!(matches!(result, Err(AppError::InternalErr(_))));
    Ok(())
}

/// Tests replacing the table contents.
///
/// Expected: rows not in the new set are removed
#[tokio::test]
async fn replace_all_removes_missing_rows() -> Result<(), AppError> {
    let test = TestBuilder::new().with_tracker_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::user_activity::UserActivityFactory::new(db)
        .user_id(1)
        .build()
        .await?;

    let repo = UserActivityRepository::new(db);
    repo.replace_all(vec![UserActivityRecord::new(2, Utc::now())])
        .await?;

    let records = repo.get_all().await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id, 2);
    Ok(())
}
