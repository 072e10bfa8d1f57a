#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use unicrush_core::models::{Gender, Institute, LookingFor, Profile, UserId};
use unicrush_core::notifier::{ChoicePrompt, Notifier, NotifyError};
use unicrush_core::store::{InMemoryStore, ProfileStore, Repository};

pub fn profile(
    id: i64,
    name: &str,
    gender: Gender,
    looking_for: LookingFor,
    institute: Institute,
) -> Profile {
    Profile {
        user_id: UserId(id),
        name: name.to_string(),
        age: 21,
        gender,
        looking_for,
        institute,
        description: "hi".to_string(),
        photos: vec!["photo-1".to_string()],
        video: None,
        verified: false,
        rating_sum: 0.0,
        rating_weight: 0.0,
        created_at: Utc::now(),
    }
}

pub async fn seeded_store(profiles: Vec<Profile>) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    for p in profiles {
        store.upsert_profile(p).await;
    }
    store
}

pub fn as_repository(store: &Arc<InMemoryStore>) -> Arc<dyn Repository> {
    store.clone() as Arc<dyn Repository>
}

/// Captures everything the workflow tries to send so tests can assert on
/// outbound traffic; users in `blocked` fail delivery the way an unreachable
/// transport recipient would.
#[derive(Default)]
pub struct RecordingNotifier {
    pub plains: Mutex<Vec<(UserId, String)>>,
    pub profile_cards: Mutex<Vec<(UserId, UserId)>>,
    pub prompts: Mutex<Vec<(UserId, ChoicePrompt)>>,
    pub handles: Mutex<HashMap<UserId, String>>,
    pub blocked: Mutex<HashSet<UserId>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn block(&self, user: UserId) {
        self.blocked.lock().unwrap().insert(user);
    }

    pub fn set_handle(&self, user: UserId, handle: &str) {
        self.handles.lock().unwrap().insert(user, handle.to_string());
    }

    pub fn plains_to(&self, user: UserId) -> Vec<String> {
        self.plains
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == user)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn prompts_to(&self, user: UserId) -> Vec<ChoicePrompt> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == user)
            .map(|(_, prompt)| prompt.clone())
            .collect()
    }

    pub fn meetup_proposals(&self) -> usize {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, prompt)| matches!(prompt, ChoicePrompt::MeetupProposal { .. }))
            .count()
    }

    fn check_reachable(&self, to: UserId) -> Result<(), NotifyError> {
        if self.blocked.lock().unwrap().contains(&to) {
            Err(NotifyError::Blocked(to))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_plain(&self, to: UserId, text: &str) -> Result<(), NotifyError> {
        self.check_reachable(to)?;
        self.plains.lock().unwrap().push((to, text.to_string()));
        Ok(())
    }

    async fn send_profile(
        &self,
        to: UserId,
        profile: &Profile,
        _annotation: Option<&str>,
    ) -> Result<(), NotifyError> {
        self.check_reachable(to)?;
        self.profile_cards
            .lock()
            .unwrap()
            .push((to, profile.user_id));
        Ok(())
    }

    async fn send_choice_prompt(
        &self,
        to: UserId,
        prompt: ChoicePrompt,
    ) -> Result<(), NotifyError> {
        self.check_reachable(to)?;
        self.prompts.lock().unwrap().push((to, prompt));
        Ok(())
    }

    async fn resolve_handle(&self, user: UserId) -> Option<String> {
        self.handles.lock().unwrap().get(&user).cloned()
    }
}
