//! Recruit interviews over DM.
//!
//! Questions are asked one at a time; each DM reply from the recruit is taken as the answer
//! to the current question. Interviews that stall are dropped by the expiry job.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::model::interview::{Interview, InterviewStep, InterviewTranscript};

#[derive(Clone)]
pub struct InterviewService {
    active: Arc<RwLock<HashMap<u64, Interview>>>,
    questions: Arc<Vec<String>>,
    timeout: Duration,
}

impl InterviewService {
    /// Creates a new InterviewService.
    ///
    /// # Arguments
    /// - `questions` - Questions asked in order
    /// - `timeout` - Idle time after which an unfinished interview is dropped
    pub fn new(questions: Vec<String>, timeout: Duration) -> Self {
        Self {
            active: Arc::new(RwLock::new(HashMap::new())),
            questions: Arc::new(questions),
            timeout,
        }
    }

    /// Starts an interview and returns the first question.
    ///
    /// # Returns
    /// - `Some(String)` - First question to DM the recruit
    /// - `None` - An interview is already running for the user, or there are no questions
    pub async fn start(
        &self,
        user_id: u64,
        requested_by: Option<u64>,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let first = self.questions.first()?.clone();

        let mut active = self.active.write().await;
        if active.contains_key(&user_id) {
            return None;
        }
        active.insert(user_id, Interview::new(user_id, requested_by, now));

        Some(first)
    }

    /// Records an answer from `user_id`.
    ///
    /// # Returns
    /// - `Some(InterviewStep::Ask)` - Next question
    /// - `Some(InterviewStep::Finished)` - Last answer received; interview removed
    /// - `None` - The user has no interview in progress
    pub async fn answer(
        &self,
        user_id: u64,
        text: &str,
        now: DateTime<Utc>,
    ) -> Option<InterviewStep> {
        let mut active = self.active.write().await;
        let interview = active.get_mut(&user_id)?;

        interview.answers.push(text.trim().to_string());
        interview.last_activity = now;

        if let Some(next) = self.questions.get(interview.answers.len()) {
            return Some(InterviewStep::Ask(next.clone()));
        }

        let interview = active.remove(&user_id)?;
        Some(InterviewStep::Finished(InterviewTranscript {
            user_id,
            requested_by: interview.requested_by,
            entries: self
                .questions
                .iter()
                .cloned()
                .zip(interview.answers)
                .collect(),
            started_at: interview.started_at,
            finished_at: now,
        }))
    }

    pub async fn cancel(&self, user_id: u64) -> bool {
        self.active.write().await.remove(&user_id).is_some()
    }

    pub async fn active_count(&self) -> usize {
        self.active.read().await.len()
    }

    /// Drops interviews idle for longer than the timeout.
    pub async fn expire_stale(&self, now: DateTime<Utc>) -> Vec<Interview> {
        let mut active = self.active.write().await;
        let stale: Vec<u64> = active
            .values()
            .filter(|interview| now - interview.last_activity >= self.timeout)
            .map(|interview| interview.user_id)
            .collect();

        stale
            .into_iter()
            .filter_map(|user_id| active.remove(&user_id))
            .collect()
    }
}
