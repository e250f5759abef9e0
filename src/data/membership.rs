//! Demoted and under-review membership repository.
//!
//! Backs the `demoted_users` and `users_under_review` tables used by the SQLite state
//! store.

use std::collections::{HashMap, HashSet};

use sea_orm::{ActiveValue, ConnectionTrait, EntityTrait};

use crate::{
    data::user_activity::INSERT_CHUNK, error::AppError, model::activity::ReviewEntry,
    util::parse::parse_u64_from_string,
};

pub struct MembershipRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MembershipRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets the ids of every demoted user.
    pub async fn get_demoted(&self) -> Result<HashSet<u64>, AppError> {
        entity::prelude::DemotedUser::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(|row| parse_u64_from_string(row.user_id))
            .collect()
    }

    /// Gets every user under review with the review entry.
    pub async fn get_under_review(&self) -> Result<HashMap<u64, ReviewEntry>, AppError> {
        entity::prelude::UserUnderReview::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(|row| {
                Ok((
                    parse_u64_from_string(row.user_id)?,
                    ReviewEntry {
                        since: row.since,
                        reason: row.reason,
                    },
                ))
            })
            .collect()
    }

    /// Replaces the demoted set.
    pub async fn replace_demoted(&self, demoted: &HashSet<u64>) -> Result<(), AppError> {
        entity::prelude::DemotedUser::delete_many()
            .exec(self.db)
            .await?;

        let models: Vec<_> = demoted
            .iter()
            .map(|user_id| entity::demoted_user::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
            })
            .collect();
        for chunk in models.chunks(INSERT_CHUNK) {
            entity::prelude::DemotedUser::insert_many(chunk.to_vec())
                .exec(self.db)
                .await?;
        }
        Ok(())
    }

    /// Replaces the under-review map.
    pub async fn replace_under_review(
        &self,
        under_review: &HashMap<u64, ReviewEntry>,
    ) -> Result<(), AppError> {
        entity::prelude::UserUnderReview::delete_many()
            .exec(self.db)
            .await?;

        let models: Vec<_> = under_review
            .iter()
            .map(|(user_id, entry)| entity::user_under_review::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
                since: ActiveValue::Set(entry.since),
                reason: ActiveValue::Set(entry.reason.clone()),
            })
            .collect();
        for chunk in models.chunks(INSERT_CHUNK) {
            entity::prelude::UserUnderReview::insert_many(chunk.to_vec())
                .exec(self.db)
                .await?;
        }
        Ok(())
    }
}
