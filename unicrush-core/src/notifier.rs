use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Profile, UserId};

/// A prompt that expects the recipient to pick an answer; rendered by the
/// transport layer as whatever button/keyboard surface it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChoicePrompt {
    MeetupProposal {
        task: Uuid,
        partner_name: String,
        location: String,
    },
    VoteRequest {
        target: UserId,
        target_name: String,
    },
    LikeReply {
        liker: UserId,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("recipient {0} has blocked the bot")]
    Blocked(UserId),
    #[error("delivery to {user} failed: {reason}")]
    Delivery { user: UserId, reason: String },
}

/// Outbound seam to the messaging transport. Every call is best-effort: the
/// workflow logs failures and carries on for the reachable parties.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_plain(&self, to: UserId, text: &str) -> Result<(), NotifyError>;

    async fn send_profile(
        &self,
        to: UserId,
        profile: &Profile,
        annotation: Option<&str>,
    ) -> Result<(), NotifyError>;

    async fn send_choice_prompt(&self, to: UserId, prompt: ChoicePrompt)
        -> Result<(), NotifyError>;

    /// Public handle of a user on the transport, when one exists.
    async fn resolve_handle(&self, user: UserId) -> Option<String>;
}

/// Default notifier when no transport is attached: logs every outbound
/// message at info level and reports success.
#[derive(Debug, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send_plain(&self, to: UserId, text: &str) -> Result<(), NotifyError> {
        tracing::info!(user_id = %to, text, "outbound message");
        Ok(())
    }

    async fn send_profile(
        &self,
        to: UserId,
        profile: &Profile,
        annotation: Option<&str>,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            user_id = %to,
            profile = %profile.user_id,
            annotation = annotation.unwrap_or(""),
            "outbound profile card"
        );
        Ok(())
    }

    async fn send_choice_prompt(
        &self,
        to: UserId,
        prompt: ChoicePrompt,
    ) -> Result<(), NotifyError> {
        tracing::info!(user_id = %to, prompt = ?prompt, "outbound choice prompt");
        Ok(())
    }

    async fn resolve_handle(&self, _user: UserId) -> Option<String> {
        None
    }
}
