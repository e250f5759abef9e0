//! Online announcements.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct PresenceState {
    online: HashSet<u64>,
    last_announced: HashMap<u64, DateTime<Utc>>,
}

/// Decides when a member coming online should be announced.
///
/// Only the transition to online counts, and each member is announced at most once per
/// cooldown.
#[derive(Clone)]
pub struct OnlineAnnouncer {
    state: Arc<RwLock<PresenceState>>,
    cooldown: Duration,
}

impl OnlineAnnouncer {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(PresenceState::default())),
            cooldown,
        }
    }

    /// Feeds a presence update.
    ///
    /// # Returns
    /// - `true` - Announce the member now
    /// - `false` - Still online, went offline, or announced within the cooldown
    pub async fn observe(&self, user_id: u64, online: bool, now: DateTime<Utc>) -> bool {
        let mut state = self.state.write().await;

        if !online {
            state.online.remove(&user_id);
            if self.expired(state.last_announced.get(&user_id), now) {
                state.last_announced.remove(&user_id);
            }
            return false;
        }
        if !state.online.insert(user_id) {
            return false;
        }

        let cooled_down = self.expired(state.last_announced.get(&user_id), now);
        if cooled_down {
            state.last_announced.insert(user_id, now);
        }
        cooled_down
    }

    /// Drops announcement times older than the cooldown. Returns how many were dropped.
    pub async fn prune(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.state.write().await;
        let before = state.last_announced.len();
        state
            .last_announced
            .retain(|_, last| now - *last < self.cooldown);
        before - state.last_announced.len()
    }

    fn expired(&self, last: Option<&DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        last.map_or(true, |last| now - *last >= self.cooldown)
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.state.read().await.last_announced.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn announces_transition_once() {
        let announcer = OnlineAnnouncer::new(Duration::minutes(60));
        let now = Utc::now();

        assert!(announcer.observe(1, true, now).await);
        assert!(!announcer.observe(1, true, now + Duration::minutes(1)).await);
    }

    #[tokio::test]
    async fn respects_cooldown_across_reconnects() {
        let announcer = OnlineAnnouncer::new(Duration::minutes(60));
        let now = Utc::now();

        assert!(announcer.observe(1, true, now).await);
        assert!(!announcer.observe(1, false, now + Duration::minutes(5)).await);
        assert!(!announcer.observe(1, true, now + Duration::minutes(10)).await);
        assert!(!announcer.observe(1, false, now + Duration::minutes(20)).await);
        assert!(announcer.observe(1, true, now + Duration::minutes(70)).await);
    }

    #[tokio::test]
    async fn forgets_announcements_past_cooldown() {
        let announcer = OnlineAnnouncer::new(Duration::minutes(60));
        let now = Utc::now();

        announcer.observe(1, true, now).await;
        announcer.observe(2, true, now).await;
        announcer.observe(1, false, now + Duration::minutes(90)).await;
        assert_eq!(announcer.tracked().await, 1);

        announcer.observe(3, true, now + Duration::minutes(30)).await;
        assert_eq!(announcer.prune(now + Duration::minutes(61)).await, 1);
        assert_eq!(announcer.tracked().await, 1);

        // Still online, so not announced again after pruning.
        assert!(!announcer.observe(2, true, now + Duration::minutes(62)).await);
    }

    #[tokio::test]
    async fn tracks_members_independently() {
        let announcer = OnlineAnnouncer::new(Duration::minutes(60));
        let now = Utc::now();

        assert!(announcer.observe(1, true, now).await);
        assert!(announcer.observe(2, true, now).await);
    }
}
