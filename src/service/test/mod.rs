use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Mutex,
    },
};

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use test_utils::{builder::TestBuilder, context::TestContext, factory};

use crate::{
    config::Config,
    data::store::StateStore,
    error::AppError,
    model::{
        action::ModerationAction,
        activity::{ActivityKind, ActivityStatus},
        member::MemberSnapshot,
        vote::{SessionKey, SessionKind, VoteOutcome},
    },
    service::{
        gateway::{Capability, GuildGateway},
        tracker::Tracker,
    },
};

mod scanner;
mod session;

pub const PRIVILEGED_ROLE: u64 = 500;
pub const INACTIVE_ROLE: u64 = 501;
pub const ADMIN_ROLE: u64 = 900;
pub const ADMIN_CHANNEL: u64 = 700;
pub const LOG_CHANNEL: u64 = 701;

/// Configuration with default thresholds and fixed ids.
pub fn test_config() -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DISCORD_BOT_TOKEN", "token".to_string()),
        ("DISCORD_GUILD_ID", "1".to_string()),
        ("ADMIN_CHANNEL_ID", ADMIN_CHANNEL.to_string()),
        ("LOG_CHANNEL_ID", LOG_CHANNEL.to_string()),
        ("PRIVILEGED_ROLE_ID", PRIVILEGED_ROLE.to_string()),
        ("INACTIVE_ROLE_ID", INACTIVE_ROLE.to_string()),
        ("ADMIN_ROLE_IDS", ADMIN_ROLE.to_string()),
    ]);
    Config::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

pub fn member(user_id: u64, role_ids: &[u64]) -> MemberSnapshot {
    MemberSnapshot {
        user_id,
        display_name: format!("member-{}", user_id),
        is_bot: false,
        role_ids: role_ids.to_vec(),
        joined_at: Some(Utc::now() - Duration::days(365)),
    }
}

/// In-memory guild.
///
/// Role and kick calls mutate the member list, messages and DMs are recorded. The bot has
/// full capability unless overridden.
pub struct FakeGateway {
    pub members: Mutex<HashMap<u64, MemberSnapshot>>,
    pub capability: Mutex<Capability>,
    pub kicked: Mutex<Vec<u64>>,
    pub posts: Mutex<Vec<(u64, String)>>,
    pub dms: Mutex<Vec<(u64, String)>>,
    /// Number of upcoming role calls that fail with a rate limit.
    pub rate_limits: AtomicU32,
    pub fail_member_list: Mutex<bool>,
}

impl FakeGateway {
    pub fn new(members: Vec<MemberSnapshot>) -> Self {
        Self {
            members: Mutex::new(members.into_iter().map(|m| (m.user_id, m)).collect()),
            capability: Mutex::new(Capability {
                manage_roles: true,
                kick_members: true,
                outranks_target: true,
                outranks_managed_roles: true,
            }),
            kicked: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
            dms: Mutex::new(Vec::new()),
            rate_limits: AtomicU32::new(0),
            fail_member_list: Mutex::new(false),
        }
    }

    pub fn roles_of(&self, user_id: u64) -> Vec<u64> {
        self.members.lock().unwrap()[&user_id].role_ids.clone()
    }

    pub fn has_member(&self, user_id: u64) -> bool {
        self.members.lock().unwrap().contains_key(&user_id)
    }

    pub fn set_capability(&self, capability: Capability) {
        *self.capability.lock().unwrap() = capability;
    }

    pub fn posts_to(&self, channel_id: u64) -> Vec<String> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .filter(|(channel, _)| *channel == channel_id)
            .map(|(_, content)| content.clone())
            .collect()
    }

    fn take_rate_limit(&self) -> Result<(), AppError> {
        let remaining = self.rate_limits.load(Ordering::SeqCst);
        if remaining > 0 {
            self.rate_limits.store(remaining - 1, Ordering::SeqCst);
            return Err(AppError::RateLimited {
                retry_after: std::time::Duration::from_millis(1),
            });
        }
        Ok(())
    }

    fn with_member<F>(&self, user_id: u64, change: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut MemberSnapshot),
    {
        let mut members = self.members.lock().unwrap();
        let member = members
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("member {}", user_id)))?;
        change(member);
        Ok(())
    }
}

#[serenity::async_trait]
impl GuildGateway for FakeGateway {
    async fn members(&self) -> Result<Vec<MemberSnapshot>, AppError> {
        if *self.fail_member_list.lock().unwrap() {
            return Err(AppError::IoErr(std::io::Error::other("gateway unavailable")));
        }
        let mut members: Vec<_> = self.members.lock().unwrap().values().cloned().collect();
        members.sort_by_key(|m| m.user_id);
        Ok(members)
    }

    async fn member(&self, user_id: u64) -> Result<Option<MemberSnapshot>, AppError> {
        Ok(self.members.lock().unwrap().get(&user_id).cloned())
    }

    async fn capability(
        &self,
        _user_id: u64,
        _managed_roles: &[u64],
    ) -> Result<Capability, AppError> {
        Ok(*self.capability.lock().unwrap())
    }

    async fn add_role(&self, user_id: u64, role_id: u64, _reason: &str) -> Result<(), AppError> {
        self.take_rate_limit()?;
        self.with_member(user_id, |member| {
            if !member.role_ids.contains(&role_id) {
                member.role_ids.push(role_id);
            }
        })
    }

    async fn remove_role(
        &self,
        user_id: u64,
        role_id: u64,
        _reason: &str,
    ) -> Result<(), AppError> {
        self.take_rate_limit()?;
        self.with_member(user_id, |member| member.role_ids.retain(|r| *r != role_id))
    }

    async fn kick(&self, user_id: u64, _reason: &str) -> Result<(), AppError> {
        self.members
            .lock()
            .unwrap()
            .remove(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("member {}", user_id)))?;
        self.kicked.lock().unwrap().push(user_id);
        Ok(())
    }

    async fn send_dm(&self, user_id: u64, content: &str) -> Result<(), AppError> {
        self.dms.lock().unwrap().push((user_id, content.to_string()));
        Ok(())
    }

    async fn post_message(&self, channel_id: u64, content: &str) -> Result<u64, AppError> {
        let mut posts = self.posts.lock().unwrap();
        posts.push((channel_id, content.to_string()));
        Ok(posts.len() as u64)
    }
}

/// Database with every table, plus a tracker persisting into it.
pub async fn setup() -> (TestContext, Tracker, Config) {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let config = test_config();
    let db: &DatabaseConnection = test.db.as_ref().unwrap();
    let tracker = Tracker::load(
        StateStore::Sql(db.clone()),
        config.roles.admins.clone(),
        config.tracker.flush_every,
    )
    .await
    .unwrap();
    (test, tracker, config)
}

/// Records a message from `user_id` `days_ago` days in the past.
pub async fn seed_activity(tracker: &Tracker, user_id: u64, days_ago: i64) {
    let at = Utc::now() - Duration::days(days_ago);
    tracker
        .ledger
        .record_activity(user_id, ActivityKind::Message, at)
        .await;
}
