use super::*;
use crate::data::bot_setting::BotSettingRepository;

/// Tests setting and overwriting a value.
///
/// Expected: latest value returned, unknown keys absent
#[tokio::test]
async fn sets_and_overwrites_values() -> Result<(), AppError> {
    let test = TestBuilder::new().with_history_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = BotSettingRepository::new(db);

    repo.set("greeting", "hello").await?;
    repo.set("greeting", "hi").await?;

    assert_eq!(repo.get("greeting").await?, Some("hi".to_string()));
    assert_eq!(repo.get("missing").await?, None);
    Ok(())
}

/// Tests the last sweep timestamp helpers.
///
/// Expected: timestamp survives storage at second precision or better
#[tokio::test]
async fn stores_last_sweep_at() -> Result<(), AppError> {
    let test = TestBuilder::new().with_history_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = BotSettingRepository::new(db);
    let now = Utc::now();

    assert_eq!(repo.get_last_sweep_at().await?, None);
    repo.set_last_sweep_at(now).await?;

    assert_eq!(repo.get_last_sweep_at().await?, Some(now));
    Ok(())
}
