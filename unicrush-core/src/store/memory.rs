use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Badge, Institute, InteractionKind, MeetupStatus, MeetupTask, Profile, Streak, UserId, Vote,
};

use super::{
    AgreementOutcome, AwardOutcome, GamificationStore, InteractionStore, Interactions,
    ProfileStore, TaskStore, VoteOutcome, VoteStore,
};

#[derive(Default)]
struct Tables {
    profiles: HashMap<UserId, Profile>,
    likes: HashMap<UserId, HashSet<UserId>>,
    dislikes: HashMap<UserId, HashSet<UserId>>,
    votes: HashMap<(UserId, UserId), Vote>,
    tasks: HashMap<Uuid, MeetupTask>,
    points: HashMap<(UserId, String), i64>,
    badges: HashMap<UserId, HashSet<Badge>>,
    streaks: HashMap<UserId, Streak>,
}

/// Process-local repository. One lock over all tables: every compound
/// mutation (vote accumulation, agreement flags, status transitions, cascade
/// delete) runs inside a single write-lock critical section, which makes the
/// per-target and per-task linearizability contracts hold trivially.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_profile(&self, id: UserId) -> Option<Profile> {
        self.tables.read().await.profiles.get(&id).cloned()
    }

    async fn upsert_profile(&self, profile: Profile) {
        self.tables.write().await.profiles.insert(profile.user_id, profile);
    }

    async fn delete_profile(&self, id: UserId) -> bool {
        let mut t = self.tables.write().await;
        if t.profiles.remove(&id).is_none() {
            return false;
        }

        t.likes.remove(&id);
        t.dislikes.remove(&id);
        for set in t.likes.values_mut() {
            set.remove(&id);
        }
        for set in t.dislikes.values_mut() {
            set.remove(&id);
        }

        // Back outgoing votes out of their targets' accumulators so the
        // materialized totals keep matching the remaining vote rows.
        let removed: Vec<Vote> = t
            .votes
            .iter()
            .filter(|((voter, target), _)| *voter == id || *target == id)
            .map(|(_, vote)| vote.clone())
            .collect();
        for vote in &removed {
            t.votes.remove(&(vote.voter, vote.target));
            if vote.voter == id && vote.target != id {
                if let Some(target) = t.profiles.get_mut(&vote.target) {
                    target.rating_sum -= f64::from(vote.score) * vote.weight;
                    target.rating_weight -= vote.weight;
                }
            }
        }

        t.tasks.retain(|_, task| !task.involves(id));
        t.points.retain(|(user, _), _| *user != id);
        t.badges.remove(&id);
        t.streaks.remove(&id);
        true
    }

    async fn list_profiles(&self) -> Vec<Profile> {
        self.tables.read().await.profiles.values().cloned().collect()
    }

    async fn list_by_institute(&self, institute: Institute) -> Vec<Profile> {
        self.tables
            .read()
            .await
            .profiles
            .values()
            .filter(|p| p.institute == institute)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl InteractionStore for InMemoryStore {
    async fn record_interaction(
        &self,
        actor: UserId,
        target: UserId,
        kind: InteractionKind,
    ) -> bool {
        let mut t = self.tables.write().await;
        let edges = match kind {
            InteractionKind::Like => t.likes.entry(actor).or_default(),
            InteractionKind::Dislike => t.dislikes.entry(actor).or_default(),
        };
        edges.insert(target)
    }

    async fn record_like(&self, actor: UserId, target: UserId) -> (bool, bool) {
        let mut t = self.tables.write().await;
        let newly = t.likes.entry(actor).or_default().insert(target);
        let reciprocal = t
            .likes
            .get(&target)
            .map_or(false, |edges| edges.contains(&actor));
        (newly, reciprocal)
    }

    async fn interactions_of(&self, actor: UserId) -> Interactions {
        let t = self.tables.read().await;
        Interactions {
            liked: t.likes.get(&actor).cloned().unwrap_or_default(),
            disliked: t.dislikes.get(&actor).cloned().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl VoteStore for InMemoryStore {
    async fn record_vote(
        &self,
        voter: UserId,
        target: UserId,
        score: u8,
        weight: f64,
    ) -> VoteOutcome {
        if voter == target {
            return VoteOutcome::SelfVote;
        }

        let mut t = self.tables.write().await;
        if t.votes.contains_key(&(voter, target)) {
            return VoteOutcome::AlreadyVoted;
        }
        let Some(profile) = t.profiles.get_mut(&target) else {
            return VoteOutcome::TargetMissing;
        };
        profile.rating_sum += f64::from(score) * weight;
        profile.rating_weight += weight;

        t.votes.insert(
            (voter, target),
            Vote {
                voter,
                target,
                score,
                weight,
                at: Utc::now(),
            },
        );
        VoteOutcome::Recorded
    }

    async fn votes_for(&self, target: UserId) -> Vec<Vote> {
        self.tables
            .read()
            .await
            .votes
            .values()
            .filter(|v| v.target == target)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn create_task(&self, task: MeetupTask) {
        self.tables.write().await.tasks.insert(task.id, task);
    }

    async fn get_task(&self, id: Uuid) -> Option<MeetupTask> {
        self.tables.read().await.tasks.get(&id).cloned()
    }

    async fn active_task_for(&self, user: UserId, status: MeetupStatus) -> Option<MeetupTask> {
        let now = Utc::now();
        self.tables
            .read()
            .await
            .tasks
            .values()
            .find(|task| task.involves(user) && task.status == status && !task.is_expired(now))
            .cloned()
    }

    async fn update_agreement(&self, id: Uuid, user: UserId, agreed: bool) -> AgreementOutcome {
        let mut t = self.tables.write().await;
        let Some(task) = t.tasks.get_mut(&id) else {
            return AgreementOutcome::Stale;
        };
        if !task.involves(user) || task.status != MeetupStatus::Pending {
            return AgreementOutcome::Stale;
        }

        if !agreed {
            task.status = MeetupStatus::Declined;
            return AgreementOutcome::Declined;
        }

        if task.user_a == user {
            task.a_agreed = true;
        } else {
            task.b_agreed = true;
        }
        if task.a_agreed && task.b_agreed {
            task.status = MeetupStatus::WaitingVideo;
            AgreementOutcome::BothAgreed
        } else {
            AgreementOutcome::Agreed
        }
    }

    async fn transition_task(
        &self,
        id: Uuid,
        from: MeetupStatus,
        to: MeetupStatus,
        video: Option<String>,
        admin_decision: Option<bool>,
    ) -> Option<MeetupTask> {
        let mut t = self.tables.write().await;
        let task = t.tasks.get_mut(&id)?;
        if task.status != from {
            return None;
        }
        task.status = to;
        if video.is_some() {
            task.video = video;
        }
        if admin_decision.is_some() {
            task.admin_decision = admin_decision;
        }
        Some(task.clone())
    }
}

#[async_trait]
impl GamificationStore for InMemoryStore {
    async fn add_points(&self, user: UserId, month: &str, points: i64) {
        let mut t = self.tables.write().await;
        *t.points.entry((user, month.to_string())).or_insert(0) += points;
    }

    async fn points_of(&self, user: UserId, month: &str) -> i64 {
        self.tables
            .read()
            .await
            .points
            .get(&(user, month.to_string()))
            .copied()
            .unwrap_or(0)
    }

    async fn leaderboard(&self, month: &str) -> Vec<(UserId, i64)> {
        let t = self.tables.read().await;
        let mut rows: Vec<(UserId, i64)> = t
            .points
            .iter()
            .filter(|((_, m), _)| m == month)
            .map(|((user, _), pts)| (*user, *pts))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        rows
    }

    async fn reset_points(&self) {
        self.tables.write().await.points.clear();
    }

    async fn award_badge(&self, user: UserId, badge: Badge) -> AwardOutcome {
        let mut t = self.tables.write().await;
        if t.badges.entry(user).or_default().insert(badge) {
            AwardOutcome::Granted
        } else {
            AwardOutcome::AlreadyHeld
        }
    }

    async fn badges_of(&self, user: UserId) -> Vec<Badge> {
        self.tables
            .read()
            .await
            .badges
            .get(&user)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    async fn touch_streak(&self, user: UserId, today: NaiveDate) -> Streak {
        let mut t = self.tables.write().await;
        let streak = t.streaks.entry(user).or_insert(Streak {
            current: 0,
            longest: 0,
            last_active: today - Duration::days(1),
        });

        if streak.last_active + Duration::days(1) == today {
            streak.current += 1;
        } else if streak.last_active != today {
            streak.current = 1;
        }
        streak.last_active = today;
        streak.longest = streak.longest.max(streak.current);
        *streak
    }

    async fn streak_of(&self, user: UserId) -> Option<Streak> {
        self.tables.read().await.streaks.get(&user).copied()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::models::{Gender, LookingFor, MeetupTask, Profile};

    use super::*;

    fn student(id: i64, institute: Institute) -> Profile {
        Profile {
            user_id: UserId(id),
            name: format!("student-{id}"),
            age: 20,
            gender: Gender::Male,
            looking_for: LookingFor::Everyone,
            institute,
            description: String::new(),
            photos: vec![],
            video: None,
            verified: false,
            rating_sum: 0.0,
            rating_weight: 0.0,
            created_at: Utc::now(),
        }
    }

    fn task_between(a: UserId, b: UserId) -> MeetupTask {
        MeetupTask {
            id: Uuid::new_v4(),
            user_a: a,
            user_b: b,
            initiator: a,
            institute: Institute::Law,
            location: "Main canteen".into(),
            status: MeetupStatus::Pending,
            a_agreed: false,
            b_agreed: false,
            deadline: Utc::now() + Duration::hours(24),
            video: None,
            admin_decision: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn institute_listing_filters() {
        let store = InMemoryStore::new();
        store.upsert_profile(student(1, Institute::Law)).await;
        store.upsert_profile(student(2, Institute::Law)).await;
        store.upsert_profile(student(3, Institute::Medicine)).await;

        let law = store.list_by_institute(Institute::Law).await;
        assert_eq!(law.len(), 2);
        assert!(law.iter().all(|p| p.institute == Institute::Law));
    }

    #[tokio::test]
    async fn deleting_a_participant_removes_their_tasks() {
        let store = InMemoryStore::new();
        store.upsert_profile(student(1, Institute::Law)).await;
        store.upsert_profile(student(2, Institute::Law)).await;
        let task = task_between(UserId(1), UserId(2));
        let task_id = task.id;
        store.create_task(task).await;

        assert!(store.delete_profile(UserId(1)).await);
        assert!(store.get_task(task_id).await.is_none());
        assert!(store
            .active_task_for(UserId(2), MeetupStatus::Pending)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn streaks_survive_reads() {
        let store = InMemoryStore::new();
        let today = Utc::now().date_naive();
        assert!(store.streak_of(UserId(1)).await.is_none());

        store.touch_streak(UserId(1), today).await;
        let streak = store.streak_of(UserId(1)).await.unwrap();
        assert_eq!(streak.current, 1);
        assert_eq!(streak.last_active, today);
    }
}
