//! Vote session repository for the `polls` table.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::{data::user_activity::INSERT_CHUNK, error::AppError, model::vote::VoteSession};

pub struct PollRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PollRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets every open session.
    ///
    /// # Returns
    /// - `Ok(Vec<VoteSession>)` - Sessions whose state is `open`
    /// - `Err(AppError::DbErr)` - Database error during query
    /// - `Err(AppError::InternalErr | AppError::JsonErr)` - A stored row failed to convert
    pub async fn get_open(&self) -> Result<Vec<VoteSession>, AppError> {
        entity::prelude::Poll::find()
            .filter(entity::poll::Column::State.eq("open"))
            .all(self.db)
            .await?
            .into_iter()
            .map(VoteSession::from_entity)
            .collect()
    }

    /// Replaces every stored session with `sessions`.
    pub async fn replace_all<'s, I>(&self, sessions: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = &'s VoteSession>,
    {
        entity::prelude::Poll::delete_many().exec(self.db).await?;

        let models = sessions
            .into_iter()
            .map(|session| session.clone().into_active_model())
            .collect::<Result<Vec<_>, _>>()?;
        for chunk in models.chunks(INSERT_CHUNK) {
            entity::prelude::Poll::insert_many(chunk.to_vec())
                .exec(self.db)
                .await?;
        }
        Ok(())
    }
}
