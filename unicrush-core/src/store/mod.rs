use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    Badge, Institute, InteractionKind, MeetupStatus, MeetupTask, Profile, Streak, UserId, Vote,
};

mod memory;

pub use memory::InMemoryStore;

/// Like/dislike history of one actor, as sets of target ids.
#[derive(Debug, Clone, Default)]
pub struct Interactions {
    pub liked: HashSet<UserId>,
    pub disliked: HashSet<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded,
    /// First vote wins; repeat votes never touch the accumulators.
    AlreadyVoted,
    SelfVote,
    TargetMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgreementOutcome {
    Agreed,
    BothAgreed,
    Declined,
    /// Task missing, not involving the responder, or past the pending stage.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    Granted,
    AlreadyHeld,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: UserId) -> Option<Profile>;
    async fn upsert_profile(&self, profile: Profile);
    /// Removes the profile and every derived record (interactions, votes,
    /// meetup tasks, points, badges, streaks). Vote removal also backs the
    /// contributed deltas out of the remaining targets' accumulators so the
    /// materialized totals keep matching the vote rows.
    async fn delete_profile(&self, id: UserId) -> bool;
    async fn list_profiles(&self) -> Vec<Profile>;
    async fn list_by_institute(&self, institute: Institute) -> Vec<Profile>;
}

#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Idempotent insert; returns whether the edge was newly created.
    async fn record_interaction(&self, actor: UserId, target: UserId, kind: InteractionKind)
        -> bool;
    /// Like insert plus reciprocal check in one critical section, so two
    /// simultaneous pair-completing likes can never both observe the mutual
    /// state: returns (newly inserted, target already likes actor).
    async fn record_like(&self, actor: UserId, target: UserId) -> (bool, bool);
    async fn interactions_of(&self, actor: UserId) -> Interactions;
}

#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Existence check and accumulator update happen in one critical
    /// section; concurrent duplicates cannot both apply.
    async fn record_vote(&self, voter: UserId, target: UserId, score: u8, weight: f64)
        -> VoteOutcome;
    async fn votes_for(&self, target: UserId) -> Vec<Vote>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, task: MeetupTask);
    async fn get_task(&self, id: Uuid) -> Option<MeetupTask>;
    /// The user's task in the given status, if any that has not expired.
    async fn active_task_for(&self, user: UserId, status: MeetupStatus) -> Option<MeetupTask>;
    /// Records one party's pending-stage answer and resolves the resulting
    /// transition, all under the task's write lock.
    async fn update_agreement(&self, id: Uuid, user: UserId, agreed: bool) -> AgreementOutcome;
    /// Compare-and-set status transition. Returns the updated task when the
    /// task was in `from`, `None` otherwise (stale caller).
    async fn transition_task(
        &self,
        id: Uuid,
        from: MeetupStatus,
        to: MeetupStatus,
        video: Option<String>,
        admin_decision: Option<bool>,
    ) -> Option<MeetupTask>;
}

#[async_trait]
pub trait GamificationStore: Send + Sync {
    async fn add_points(&self, user: UserId, month: &str, points: i64);
    async fn points_of(&self, user: UserId, month: &str) -> i64;
    /// (user, points) pairs for the month, highest first.
    async fn leaderboard(&self, month: &str) -> Vec<(UserId, i64)>;
    /// Administrative bulk reset of the whole ledger.
    async fn reset_points(&self);
    async fn award_badge(&self, user: UserId, badge: Badge) -> AwardOutcome;
    async fn badges_of(&self, user: UserId) -> Vec<Badge>;
    /// Daily-activity bookkeeping: consecutive days grow the streak, a gap
    /// resets it to one.
    async fn touch_streak(&self, user: UserId, today: NaiveDate) -> Streak;
    async fn streak_of(&self, user: UserId) -> Option<Streak>;
}

/// The full repository the core services operate on.
pub trait Repository:
    ProfileStore + InteractionStore + VoteStore + TaskStore + GamificationStore
{
}

impl<T> Repository for T where
    T: ProfileStore + InteractionStore + VoteStore + TaskStore + GamificationStore
{
}
