use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "vote_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub session_key: String,
    pub target_user_id: String,
    pub admin_id: String,
    pub option: String,
    pub cast_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
