//! Shared application context.
//!
//! `AppContext` holds every shared resource the bot needs. It is built once in `main`
//! and cloned into the event handler and the scheduler jobs; clones share state.
//!
//! The context contains:
//! - Configuration
//! - Database connection pool for vote history, audit log and settings
//! - The tracker (activity ledger, vote sessions and their store)
//! - Interview and online-announcement state
//! - The consecutive failed-sweep counter

use std::sync::{atomic::AtomicU32, Arc};

use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    service::{interview::InterviewService, presence::OnlineAnnouncer, tracker::Tracker},
};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub db: DatabaseConnection,
    pub tracker: Arc<Tracker>,
    pub interviews: InterviewService,
    pub presence: OnlineAnnouncer,
    /// Sweeps that failed in a row; reset by a successful sweep.
    pub sweep_failures: Arc<AtomicU32>,
}

impl AppContext {
    /// Creates the context.
    ///
    /// Interviews time out after the vote session timeout.
    pub fn new(config: Config, db: DatabaseConnection, tracker: Tracker) -> Self {
        let interviews = InterviewService::new(
            config.interview_questions.clone(),
            config.tracker.session_timeout,
        );
        let presence = OnlineAnnouncer::new(config.online_cooldown);

        Self {
            config: Arc::new(config),
            db,
            tracker: Arc::new(tracker),
            interviews,
            presence,
            sweep_failures: Arc::new(AtomicU32::new(0)),
        }
    }
}
