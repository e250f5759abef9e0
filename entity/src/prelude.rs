pub use super::bot_setting::Entity as BotSetting;
pub use super::cleanup_action::Entity as CleanupAction;
pub use super::demoted_user::Entity as DemotedUser;
pub use super::poll::Entity as Poll;
pub use super::user_activity::Entity as UserActivity;
pub use super::user_under_review::Entity as UserUnderReview;
pub use super::vote_history::Entity as VoteHistory;
