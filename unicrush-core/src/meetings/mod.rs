use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use unicrush_shared::{AppError, AppResult, ErrorCode};

use crate::gamification;
use crate::models::{
    Badge, InteractionKind, MeetupStatus, MeetupTask, Profile, UserId,
};
use crate::notifier::{ChoicePrompt, Notifier};
use crate::store::{
    AgreementOutcome, AwardOutcome, GamificationStore, InteractionStore, ProfileStore, Repository,
    TaskStore,
};

pub mod locations;
pub mod seasonal;

#[derive(Debug, Clone)]
pub enum Reaction {
    Like,
    Dislike,
    Superlike { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionOutcome {
    pub matched: bool,
    pub meetup_id: Option<Uuid>,
}

impl ReactionOutcome {
    fn none() -> Self {
        Self {
            matched: false,
            meetup_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoOutcome {
    Submitted,
    NotInitiator,
    NothingPending,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecisionOutcome {
    Confirmed {
        points: i64,
        occasion: Option<&'static str>,
    },
    Declined,
    /// Task missing or not waiting for a moderator.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Approved,
    AlreadyVerified,
    Declined,
    NothingPending,
}

/// Drives everything that happens after a reaction: mutual-like detection,
/// the profile/contact/vote exchange, and the meetup workflow through its
/// pending -> waiting_video -> waiting_admin -> terminal stages.
pub struct Matchmaker {
    store: Arc<dyn Repository>,
    notifier: Arc<dyn Notifier>,
    moderator: Option<UserId>,
}

impl Matchmaker {
    pub fn new(
        store: Arc<dyn Repository>,
        notifier: Arc<dyn Notifier>,
        moderator: Option<UserId>,
    ) -> Self {
        Self {
            store,
            notifier,
            moderator,
        }
    }

    pub async fn react(
        &self,
        actor: UserId,
        target: UserId,
        reaction: Reaction,
    ) -> AppResult<ReactionOutcome> {
        let Some(actor_profile) = self.store.get_profile(actor).await else {
            return Err(AppError::new(
                ErrorCode::ProfileNotFound,
                "create a profile before reacting",
            ));
        };

        match reaction {
            Reaction::Dislike => {
                self.store
                    .record_interaction(actor, target, InteractionKind::Dislike)
                    .await;
                Ok(ReactionOutcome::none())
            }
            Reaction::Like => self.like(actor_profile, target, None).await,
            Reaction::Superlike { message } => {
                if message.trim().is_empty() {
                    return Err(AppError::Validation(
                        "a superlike needs a message".into(),
                    ));
                }
                self.like(actor_profile, target, Some(message)).await
            }
        }
    }

    async fn like(
        &self,
        actor_profile: Profile,
        target: UserId,
        superlike_message: Option<String>,
    ) -> AppResult<ReactionOutcome> {
        let actor = actor_profile.user_id;
        let (newly, reciprocal) = self.store.record_like(actor, target).await;

        // Target gone mid-browse: the edge is kept, nothing to deliver.
        let Some(target_profile) = self.store.get_profile(target).await else {
            return Ok(ReactionOutcome::none());
        };

        // A repeat like is already processed; evaluating the match again
        // would fire it twice.
        if !newly {
            return Ok(ReactionOutcome::none());
        }

        // The target's own filter would never surface this actor, so the
        // like is stored but stays silent.
        if !target_profile.looking_for.accepts(actor_profile.gender) {
            return Ok(ReactionOutcome::none());
        }

        if let Some(message) = &superlike_message {
            let annotation = format!("{} sent you a superlike: {message}", actor_profile.name);
            match self
                .notifier
                .send_profile(target, &actor_profile, Some(&annotation))
                .await
            {
                Ok(()) => {
                    if self.store.award_badge(target, Badge::Superliked).await
                        == AwardOutcome::AlreadyHeld
                    {
                        tracing::debug!(user_id = %target, "superliked badge already held");
                    }
                    self.notify_prompt(target, ChoicePrompt::LikeReply { liker: actor })
                        .await;
                }
                Err(e) => {
                    tracing::warn!(user_id = %target, error = %e, "superlike delivery failed");
                }
            }
        }

        if reciprocal {
            let meetup_id = self.announce_match(&actor_profile, &target_profile).await;
            return Ok(ReactionOutcome {
                matched: true,
                meetup_id,
            });
        }

        if superlike_message.is_none() {
            let annotation = format!("{} liked your profile", actor_profile.name);
            match self
                .notifier
                .send_profile(target, &actor_profile, Some(&annotation))
                .await
            {
                Ok(()) => {
                    self.notify_prompt(target, ChoicePrompt::LikeReply { liker: actor })
                        .await;
                }
                Err(e) => {
                    tracing::warn!(user_id = %target, error = %e, "like delivery failed");
                }
            }
        }

        Ok(ReactionOutcome::none())
    }

    /// Runs once per mutual pair, from the side that completed it: profile
    /// exchange, contact hand-off, vote prompts, and the meetup proposal
    /// when both study at the same institute.
    async fn announce_match(&self, completer: &Profile, other: &Profile) -> Option<Uuid> {
        if let Err(e) = self
            .notifier
            .send_profile(completer.user_id, other, None)
            .await
        {
            tracing::warn!(user_id = %completer.user_id, error = %e, "match card delivery failed");
        }
        if let Err(e) = self
            .notifier
            .send_profile(other.user_id, completer, None)
            .await
        {
            tracing::warn!(user_id = %other.user_id, error = %e, "match card delivery failed");
        }

        self.send_contact(completer.user_id, other).await;
        self.send_contact(other.user_id, completer).await;

        self.notify_prompt(
            completer.user_id,
            ChoicePrompt::VoteRequest {
                target: other.user_id,
                target_name: other.name.clone(),
            },
        )
        .await;
        self.notify_prompt(
            other.user_id,
            ChoicePrompt::VoteRequest {
                target: completer.user_id,
                target_name: completer.name.clone(),
            },
        )
        .await;

        if completer.institute != other.institute {
            return None;
        }

        let task = MeetupTask {
            id: Uuid::new_v4(),
            user_a: completer.user_id,
            user_b: other.user_id,
            initiator: completer.user_id,
            institute: completer.institute,
            location: locations::random_location(),
            status: MeetupStatus::Pending,
            a_agreed: false,
            b_agreed: false,
            deadline: Utc::now() + Duration::hours(24),
            video: None,
            admin_decision: None,
            created_at: Utc::now(),
        };
        let task_id = task.id;
        let location = task.location.clone();
        self.store.create_task(task).await;

        self.notify_prompt(
            completer.user_id,
            ChoicePrompt::MeetupProposal {
                task: task_id,
                partner_name: other.name.clone(),
                location: location.clone(),
            },
        )
        .await;
        self.notify_prompt(
            other.user_id,
            ChoicePrompt::MeetupProposal {
                task: task_id,
                partner_name: completer.name.clone(),
                location,
            },
        )
        .await;

        tracing::info!(
            task_id = %task_id,
            user_a = %completer.user_id,
            user_b = %other.user_id,
            "meetup proposed"
        );
        Some(task_id)
    }

    /// One party's answer to a pending meetup proposal. Anything but a
    /// pending task is reported as stale, never an error.
    pub async fn respond_to_meetup(
        &self,
        task_id: Uuid,
        user: UserId,
        agree: bool,
    ) -> AppResult<AgreementOutcome> {
        let outcome = self.store.update_agreement(task_id, user, agree).await;

        match outcome {
            AgreementOutcome::BothAgreed => {
                if let Some(task) = self.store.get_task(task_id).await {
                    let initiator = task.initiator;
                    if let Some(partner) = task.partner_of(initiator) {
                        let initiator_name = self
                            .store
                            .get_profile(initiator)
                            .await
                            .map(|p| p.name)
                            .unwrap_or_else(|| "Your match".into());
                        self.notify_plain(
                            initiator,
                            format!(
                                "You're both in! Record a short video at {} within 24 hours so a moderator can confirm the meetup.",
                                task.location
                            ),
                        )
                        .await;
                        self.notify_plain(
                            partner,
                            format!(
                                "You're both in! {initiator_name} will send a confirmation video from {}.",
                                task.location
                            ),
                        )
                        .await;
                    }
                }
            }
            AgreementOutcome::Declined => {
                if let Some(task) = self.store.get_task(task_id).await {
                    let decliner_name = self
                        .store
                        .get_profile(user)
                        .await
                        .map(|p| p.name)
                        .unwrap_or_else(|| "Your match".into());
                    for participant in [task.user_a, task.user_b] {
                        self.notify_plain(
                            participant,
                            format!("{decliner_name} turned the meetup down. It's cancelled."),
                        )
                        .await;
                    }
                }
            }
            AgreementOutcome::Agreed | AgreementOutcome::Stale => {}
        }

        Ok(outcome)
    }

    /// Proof submission; only the initiator of an unexpired waiting_video
    /// task can move it forward.
    pub async fn submit_meetup_video(
        &self,
        user: UserId,
        video: String,
    ) -> AppResult<VideoOutcome> {
        let Some(task) = self
            .store
            .active_task_for(user, MeetupStatus::WaitingVideo)
            .await
        else {
            return Ok(VideoOutcome::NothingPending);
        };
        if task.initiator != user {
            return Ok(VideoOutcome::NotInitiator);
        }

        let Some(task) = self
            .store
            .transition_task(
                task.id,
                MeetupStatus::WaitingVideo,
                MeetupStatus::WaitingAdmin,
                Some(video),
                None,
            )
            .await
        else {
            return Ok(VideoOutcome::NothingPending);
        };

        if let Some(moderator) = self.moderator {
            self.notify_plain(
                moderator,
                format!("Meetup {} has a video waiting for review.", task.id),
            )
            .await;
        }
        Ok(VideoOutcome::Submitted)
    }

    /// Moderator verdict on a submitted video. Approval pays both
    /// participants and grants the one-time first-meetup badge.
    pub async fn decide_meetup(&self, task_id: Uuid, approve: bool) -> AppResult<DecisionOutcome> {
        if !approve {
            let Some(task) = self
                .store
                .transition_task(
                    task_id,
                    MeetupStatus::WaitingAdmin,
                    MeetupStatus::Declined,
                    None,
                    Some(false),
                )
                .await
            else {
                return Ok(DecisionOutcome::Stale);
            };
            for participant in [task.user_a, task.user_b] {
                self.notify_plain(
                    participant,
                    "Your meetup was not confirmed by the moderators. No points awarded.".into(),
                )
                .await;
            }
            return Ok(DecisionOutcome::Declined);
        }

        let Some(task) = self
            .store
            .transition_task(
                task_id,
                MeetupStatus::WaitingAdmin,
                MeetupStatus::Confirmed,
                None,
                Some(true),
            )
            .await
        else {
            return Ok(DecisionOutcome::Stale);
        };

        let seasonal = seasonal::current();
        let points = gamification::meetup_points(seasonal.multiplier);
        let month = gamification::current_month_key();
        let bonus_note = seasonal
            .occasion
            .map(|name| format!(" (x{} for {name})", seasonal.multiplier))
            .unwrap_or_default();

        for participant in [task.user_a, task.user_b] {
            self.store.add_points(participant, &month, points).await;
            if self.store.award_badge(participant, Badge::FirstMeet).await
                == AwardOutcome::AlreadyHeld
            {
                tracing::debug!(user_id = %participant, "first_meet badge already held");
            }
            self.notify_plain(
                participant,
                format!("Your meetup is confirmed! +{points} points{bonus_note}"),
            )
            .await;
        }

        tracing::info!(task_id = %task_id, points, "meetup confirmed");
        Ok(DecisionOutcome::Confirmed {
            points,
            occasion: seasonal.occasion,
        })
    }

    /// The user's current meetup, skipping anything past its deadline.
    pub async fn active_meetup_for(&self, user: UserId) -> Option<MeetupTask> {
        for status in [
            MeetupStatus::Pending,
            MeetupStatus::WaitingVideo,
            MeetupStatus::WaitingAdmin,
        ] {
            if let Some(task) = self.store.active_task_for(user, status).await {
                return Some(task);
            }
        }
        None
    }

    /// Moderator verdict on a profile verification video.
    pub async fn review_verification(
        &self,
        user: UserId,
        approve: bool,
    ) -> AppResult<VerificationOutcome> {
        let Some(mut profile) = self.store.get_profile(user).await else {
            return Err(AppError::new(
                ErrorCode::ProfileNotFound,
                "profile not found",
            ));
        };
        if profile.verified {
            return Ok(VerificationOutcome::AlreadyVerified);
        }
        if profile.video.is_none() {
            return Ok(VerificationOutcome::NothingPending);
        }

        if approve {
            profile.verified = true;
            self.store.upsert_profile(profile).await;
            if self.store.award_badge(user, Badge::Verified).await == AwardOutcome::AlreadyHeld {
                tracing::debug!(user_id = %user, "verified badge already held");
            }
            self.notify_plain(user, "Your profile is now verified.".into())
                .await;
            Ok(VerificationOutcome::Approved)
        } else {
            profile.video = None;
            self.store.upsert_profile(profile).await;
            self.notify_plain(
                user,
                "Your verification video was not accepted. You can upload a new one.".into(),
            )
            .await;
            Ok(VerificationOutcome::Declined)
        }
    }

    async fn send_contact(&self, to: UserId, about: &Profile) {
        let text = match self.notifier.resolve_handle(about.user_id).await {
            Some(handle) => format!(
                "It's a match! You can message {}: @{handle}",
                about.name
            ),
            None => format!(
                "It's a match! {} has no public handle, ask for an introduction in person.",
                about.name
            ),
        };
        self.notify_plain(to, text).await;
    }

    async fn notify_plain(&self, to: UserId, text: String) {
        if let Err(e) = self.notifier.send_plain(to, &text).await {
            tracing::warn!(user_id = %to, error = %e, "notification failed");
        }
    }

    async fn notify_prompt(&self, to: UserId, prompt: ChoicePrompt) {
        if let Err(e) = self.notifier.send_choice_prompt(to, prompt).await {
            tracing::warn!(user_id = %to, error = %e, "prompt delivery failed");
        }
    }
}
