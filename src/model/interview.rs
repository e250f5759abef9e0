//! DM questionnaire state for new recruits.

use chrono::{DateTime, Utc};

/// An interview in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Interview {
    pub user_id: u64,
    /// Who started it; `None` when triggered by joining the guild.
    pub requested_by: Option<u64>,
    pub answers: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Interview {
    pub fn new(user_id: u64, requested_by: Option<u64>, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            requested_by,
            answers: Vec::new(),
            started_at: now,
            last_activity: now,
        }
    }
}

/// What the bot should do after an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum InterviewStep {
    /// Send the next question.
    Ask(String),
    /// All questions answered; relay the transcript to admins.
    Finished(InterviewTranscript),
}

/// Completed question/answer pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewTranscript {
    pub user_id: u64,
    pub requested_by: Option<u64>,
    pub entries: Vec<(String, String)>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
