use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "polls")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_key: String,
    pub target_user_id: String,
    pub kind: String,
    pub quorum: i32,
    /// JSON array of `{ "admin_id": .., "option": .. }` in registration order.
    #[sea_orm(column_type = "Text")]
    pub votes: String,
    pub state: String,
    pub decision: Option<String>,
    pub channel_id: Option<String>,
    pub message_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub expires_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
