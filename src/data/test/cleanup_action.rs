use super::*;
use crate::{
    data::cleanup_action::CleanupActionRepository, model::action::CreateCleanupActionParam,
};

/// Tests appending an audit entry for an automatic action.
///
/// Expected: entry stored without admin id
#[tokio::test]
async fn creates_entry_without_admin() -> Result<(), AppError> {
    let test = TestBuilder::new().with_history_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entry = CleanupActionRepository::new(db)
        .create(CreateCleanupActionParam {
            user_id: 7,
            action: ModerationAction::Review,
            admin_id: None,
            reason: "inactive for 31 days".to_string(),
        })
        .await?;

    assert_eq!(entry.user_id, 7);
    assert_eq!(entry.action, ModerationAction::Review);
    assert_eq!(entry.admin_id, None);
    Ok(())
}

/// Tests listing entries per user and overall.
///
/// Expected: newest first, limited
#[tokio::test]
async fn lists_entries_newest_first() -> Result<(), AppError> {
    let test = TestBuilder::new().with_history_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::cleanup_action::create_cleanup_action(db, 1).await?;
    factory::cleanup_action::create_cleanup_action(db, 2).await?;
    factory::cleanup_action::create_cleanup_action(db, 1).await?;

    let repo = CleanupActionRepository::new(db);
    let for_user = repo.get_by_user(1).await?;
    let recent = repo.get_recent(2).await?;

    assert_eq!(for_user.len(), 2);
    assert!(for_user[0].id > for_user[1].id);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].user_id, 1);
    assert_eq!(recent[1].user_id, 2);
    Ok(())
}
