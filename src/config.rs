//! Environment-based bot configuration.
//!
//! Values are read once at startup after `dotenvy::dotenv()`. Parsing goes through
//! [`Config::from_lookup`] so tests can supply variables without touching the process
//! environment.

use std::{path::PathBuf, str::FromStr};

use chrono::Duration;

use crate::{
    error::{config::ConfigError, AppError},
    model::vote::SessionKind,
};

const DEFAULT_DATABASE_URL: &str = "sqlite://warden.db?mode=rwc";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_PREFIX: &str = "!";
const DEFAULT_SWEEP_SCHEDULE: &str = "0 0 * * * *";

/// Questions sent, in order, to a recruit during the DM interview.
pub const DEFAULT_INTERVIEW_QUESTIONS: &[&str] = &[
    "What should we call you?",
    "How did you find our community?",
    "What are you hoping to get out of being here?",
    "How often do you expect to be around?",
];

/// Where the ledger and open sessions are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// JSON files in the data directory.
    Json,
    /// `user_activity`/`polls` tables in the SQLite database.
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" | "sql" => Ok(Self::Sqlite),
            other => Err(format!("expected 'json' or 'sqlite', got '{}'", other)),
        }
    }
}

/// Channels the bot posts into.
#[derive(Debug, Clone)]
pub struct GuildChannels {
    /// Vote prompts, command echoes and sweep alerts.
    pub admin: u64,
    /// Executor notifications. Defaults to the admin channel.
    pub log: u64,
    /// Online announcements; `None` disables them.
    pub welcome: Option<u64>,
}

/// Roles the bot reads or mutates.
#[derive(Debug, Clone)]
pub struct GuildRoles {
    /// Role removed on demotion and restored on promotion.
    pub privileged: u64,
    /// Role added on demotion.
    pub inactive: u64,
    /// Members holding any of these may vote and run admin commands.
    pub admins: Vec<u64>,
}

impl GuildRoles {
    /// Whether any of `role_ids` is a configured admin role.
    pub fn is_admin(&self, role_ids: &[u64]) -> bool {
        role_ids.iter().any(|role| self.admins.contains(role))
    }
}

/// Thresholds and quorums used by the tracker.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub inactivity_threshold_days: i64,
    pub review_threshold_days: i64,
    pub session_timeout: Duration,
    pub ghost_quorum: usize,
    pub demotion_quorum: usize,
    pub return_quorum: usize,
    pub review_quorum: usize,
    /// Ledger writes between sampled flushes.
    pub flush_every: u32,
}

impl TrackerSettings {
    /// Number of distinct admin voters needed to resolve a session of `kind`.
    pub fn quorum_for(&self, kind: SessionKind) -> usize {
        let quorum = match kind {
            SessionKind::Ghost => self.ghost_quorum,
            SessionKind::Demotion => self.demotion_quorum,
            SessionKind::Return => self.return_quorum,
            SessionKind::FinalReview => self.review_quorum,
        };
        quorum.max(1)
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            inactivity_threshold_days: 15,
            review_threshold_days: 30,
            session_timeout: Duration::hours(24),
            ghost_quorum: 1,
            demotion_quorum: 2,
            return_quorum: 1,
            review_quorum: 2,
            flush_every: 10,
        }
    }
}

pub struct Config {
    pub discord_bot_token: String,
    pub guild_id: u64,
    pub channels: GuildChannels,
    pub roles: GuildRoles,
    pub tracker: TrackerSettings,

    pub database_url: String,
    pub data_dir: PathBuf,
    pub storage_backend: StorageBackend,
    pub command_prefix: String,

    pub sweep_schedule: String,
    pub alert_after_failures: u32,
    pub online_cooldown: Duration,
    pub auto_interview: bool,
    pub interview_questions: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Arguments
    /// - `lookup` - Returns the value of a variable, or `None` when it is unset
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and every value parsed
    /// - `Err(AppError::ConfigErr(MissingEnvVar))` - A required variable is unset or empty
    /// - `Err(AppError::ConfigErr(InvalidEnvVar))` - A variable failed to parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };
        let defaults = TrackerSettings::default();

        let admin_channel = vars.required_parsed::<u64>("ADMIN_CHANNEL_ID")?;
        let admins = vars.id_list("ADMIN_ROLE_IDS")?;

        Ok(Self {
            discord_bot_token: vars.required("DISCORD_BOT_TOKEN")?,
            guild_id: vars.required_parsed("DISCORD_GUILD_ID")?,
            channels: GuildChannels {
                admin: admin_channel,
                log: vars.optional("LOG_CHANNEL_ID")?.unwrap_or(admin_channel),
                welcome: vars.optional("WELCOME_CHANNEL_ID")?,
            },
            roles: GuildRoles {
                privileged: vars.required_parsed("PRIVILEGED_ROLE_ID")?,
                inactive: vars.required_parsed("INACTIVE_ROLE_ID")?,
                admins,
            },
            tracker: TrackerSettings {
                inactivity_threshold_days: vars
                    .optional("INACTIVITY_THRESHOLD_DAYS")?
                    .unwrap_or(defaults.inactivity_threshold_days),
                review_threshold_days: vars
                    .optional("REVIEW_THRESHOLD_DAYS")?
                    .unwrap_or(defaults.review_threshold_days),
                session_timeout: vars
                    .optional::<i64>("SESSION_TIMEOUT_HOURS")?
                    .map(Duration::hours)
                    .unwrap_or(defaults.session_timeout),
                ghost_quorum: vars.optional("GHOST_QUORUM")?.unwrap_or(defaults.ghost_quorum),
                demotion_quorum: vars
                    .optional("DEMOTION_QUORUM")?
                    .unwrap_or(defaults.demotion_quorum),
                return_quorum: vars.optional("RETURN_QUORUM")?.unwrap_or(defaults.return_quorum),
                review_quorum: vars.optional("REVIEW_QUORUM")?.unwrap_or(defaults.review_quorum),
                flush_every: vars
                    .optional("LEDGER_FLUSH_EVERY")?
                    .unwrap_or(defaults.flush_every),
            },
            database_url: vars
                .optional("DATABASE_URL")?
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            data_dir: vars
                .optional::<String>("DATA_DIR")?
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            storage_backend: vars
                .optional("STORAGE_BACKEND")?
                .unwrap_or(StorageBackend::Json),
            command_prefix: vars
                .optional("COMMAND_PREFIX")?
                .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            sweep_schedule: vars
                .optional("SWEEP_SCHEDULE")?
                .unwrap_or_else(|| DEFAULT_SWEEP_SCHEDULE.to_string()),
            alert_after_failures: vars
                .optional::<u32>("ALERT_AFTER_FAILURES")?
                .unwrap_or(3)
                .max(1),
            online_cooldown: vars
                .optional::<i64>("ONLINE_COOLDOWN_MINUTES")?
                .map(Duration::minutes)
                .unwrap_or_else(|| Duration::minutes(60)),
            auto_interview: vars.optional("AUTO_INTERVIEW")?.unwrap_or(true),
            interview_questions: DEFAULT_INTERVIEW_QUESTIONS
                .iter()
                .map(|q| q.to_string())
                .collect(),
        })
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.raw(name)
            .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
    }

    fn required_parsed<T>(&self, name: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        parse_value(name, &self.required(name)?)
    }

    fn optional<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        self.raw(name)
            .map(|value| parse_value(name, &value))
            .transpose()
    }

    fn id_list(&self, name: &str) -> Result<Vec<u64>, ConfigError> {
        let raw = self.required(name)?;
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| parse_value::<u64>(name, part))
            .collect::<Result<Vec<_>, _>>()?;

        if ids.is_empty() {
            return Err(ConfigError::MissingEnvVar(name.to_string()));
        }
        Ok(ids)
    }
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn required_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DISCORD_BOT_TOKEN", "token"),
            ("DISCORD_GUILD_ID", "1000"),
            ("ADMIN_CHANNEL_ID", "2000"),
            ("PRIVILEGED_ROLE_ID", "3000"),
            ("INACTIVE_ROLE_ID", "3001"),
            ("ADMIN_ROLE_IDS", "4000, 4001"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, AppError> {
        Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn applies_defaults() {
        let config = load(&required_vars()).unwrap();

        assert_eq!(config.guild_id, 1000);
        assert_eq!(config.channels.log, 2000);
        assert_eq!(config.channels.welcome, None);
        assert_eq!(config.roles.admins, vec![4000, 4001]);
        assert_eq!(config.storage_backend, StorageBackend::Json);
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.tracker.inactivity_threshold_days, 15);
        assert_eq!(config.tracker.review_threshold_days, 30);
        assert_eq!(config.tracker.session_timeout, Duration::hours(24));
        assert_eq!(config.tracker.flush_every, 10);
        assert_eq!(config.sweep_schedule, "0 0 * * * *");
        assert_eq!(config.alert_after_failures, 3);
        assert!(config.auto_interview);
    }

    #[test]
    fn quorum_per_kind() {
        let config = load(&required_vars()).unwrap();

        assert_eq!(config.tracker.quorum_for(SessionKind::Ghost), 1);
        assert_eq!(config.tracker.quorum_for(SessionKind::Demotion), 2);
        assert_eq!(config.tracker.quorum_for(SessionKind::Return), 1);
        assert_eq!(config.tracker.quorum_for(SessionKind::FinalReview), 2);
    }

    #[test]
    fn reads_overrides() {
        let mut vars = required_vars();
        vars.insert("LOG_CHANNEL_ID", "2001");
        vars.insert("STORAGE_BACKEND", "sqlite");
        vars.insert("DEMOTION_QUORUM", "3");
        vars.insert("AUTO_INTERVIEW", "false");

        let config = load(&vars).unwrap();

        assert_eq!(config.channels.log, 2001);
        assert_eq!(config.storage_backend, StorageBackend::Sqlite);
        assert_eq!(config.tracker.quorum_for(SessionKind::Demotion), 3);
        assert!(!config.auto_interview);
    }

    #[test]
    fn missing_required_variable() {
        let mut vars = required_vars();
        vars.remove("INACTIVE_ROLE_ID");

        let result = load(&vars);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::MissingEnvVar(ref name))) if name == "INACTIVE_ROLE_ID"
        ));
    }

    #[test]
    fn invalid_number() {
        let mut vars = required_vars();
        vars.insert("INACTIVITY_THRESHOLD_DAYS", "fifteen");

        let result = load(&vars);

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { .. }))
        ));
    }

    #[test]
    fn admin_role_check() {
        let roles = GuildRoles {
            privileged: 1,
            inactive: 2,
            admins: vec![10, 11],
        };

        assert!(roles.is_admin(&[5, 11]));
        assert!(!roles.is_admin(&[5, 6]));
        assert!(!roles.is_admin(&[]));
    }
}
