use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::Rng;
use unicrush_shared::{AppError, AppResult, ErrorCode};

use crate::models::{Profile, UserId};
use crate::store::{InteractionStore, ProfileStore, Repository};

use super::session::{pop_random, BrowseSession};

/// A candidate is eligible for a viewer when the candidate's gender passes
/// the viewer's filter and the candidate is somebody else.
pub fn compatible(viewer: &Profile, candidate: &Profile) -> bool {
    candidate.user_id != viewer.user_id && viewer.looking_for.accepts(candidate.gender)
}

#[derive(Debug, Clone)]
pub struct CandidatePick {
    pub profile: Profile,
    /// Set when the candidate comes from the already-liked fallback pool so
    /// the presentation can say "you've seen this one before".
    pub is_revisit: bool,
}

/// Pool-based candidate selection. Sessions are per-viewer; each viewer's
/// session has its own lock so one slow browse never stalls another user,
/// and a double-tap from the same viewer serializes on the session.
pub struct CandidateSelector {
    store: Arc<dyn Repository>,
    sessions: Mutex<HashMap<UserId, Arc<tokio::sync::Mutex<BrowseSession>>>>,
}

impl CandidateSelector {
    pub fn new(store: Arc<dyn Repository>) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Next profile to show the viewer, in falling priority: unseen
    /// candidates, then disliked ones (recycled for another pass), then a
    /// store re-scan for late arrivals, then already-liked profiles marked
    /// as revisits. `None` only when the viewer is effectively alone.
    pub async fn next_candidate(&self, viewer: UserId) -> AppResult<Option<CandidatePick>> {
        let Some(viewer_profile) = self.store.get_profile(viewer).await else {
            return Err(AppError::new(
                ErrorCode::ViewerNotFound,
                "create a profile before browsing",
            ));
        };

        let session = self.session_handle(viewer);
        let mut s = session.lock().await;

        if !s.loaded {
            let (fresh, revisit, fallback) = self.scan_pools(&viewer_profile).await;
            s.install(fresh, revisit, fallback);
        }

        let mut rescanned = false;
        loop {
            if let Some(id) = pop_random(&mut s.fresh) {
                match self.store.get_profile(id).await {
                    Some(profile) => {
                        return Ok(Some(CandidatePick {
                            profile,
                            is_revisit: false,
                        }))
                    }
                    // Vanished mid-session: skip forward.
                    None => continue,
                }
            }

            if let Some(id) = pop_random(&mut s.revisit) {
                if let Some(profile) = self.store.get_profile(id).await {
                    // One dislike should not bury a profile forever; it gets
                    // another run as a fresh-style candidate next pass.
                    s.recycled.push(id);
                    return Ok(Some(CandidatePick {
                        profile,
                        is_revisit: false,
                    }));
                }
                continue;
            }

            if !s.recycled.is_empty() {
                let mut recycled = std::mem::take(&mut s.recycled);
                s.fresh.append(&mut recycled);
                continue;
            }

            // Sessions are long-lived and the profile set moves underneath
            // them: catch registrations, filter edits, and reactions that
            // happened since the pools were built. Liked profiles stay out
            // of the refresh; the fallback pool is filled once at load.
            if !rescanned {
                rescanned = true;
                let (fresh, revisit, _) = self.scan_pools(&viewer_profile).await;
                if !fresh.is_empty() || !revisit.is_empty() {
                    s.fresh = fresh;
                    s.revisit = revisit;
                    continue;
                }
            }

            if let Some(id) = pop_random(&mut s.fallback) {
                match self.store.get_profile(id).await {
                    Some(profile) => {
                        return Ok(Some(CandidatePick {
                            profile,
                            is_revisit: true,
                        }))
                    }
                    None => continue,
                }
            }

            return Ok(None);
        }
    }

    /// A uniformly random eligible profile, ignoring the session pools and
    /// any like/dislike history.
    pub async fn roulette(&self, viewer: UserId) -> AppResult<Option<Profile>> {
        let Some(viewer_profile) = self.store.get_profile(viewer).await else {
            return Err(AppError::new(
                ErrorCode::ViewerNotFound,
                "create a profile before spinning",
            ));
        };

        let mut eligible: Vec<Profile> = self
            .store
            .list_profiles()
            .await
            .into_iter()
            .filter(|p| compatible(&viewer_profile, p))
            .collect();
        if eligible.is_empty() {
            return Ok(None);
        }
        let idx = rand::thread_rng().gen_range(0..eligible.len());
        Ok(Some(eligible.swap_remove(idx)))
    }

    /// Drops the viewer's session so the next browse rebuilds the pools.
    /// Called after profile edits (the filter may have changed) and on
    /// account deletion.
    pub fn reset(&self, viewer: UserId) {
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .remove(&viewer);
    }

    fn session_handle(&self, viewer: UserId) -> Arc<tokio::sync::Mutex<BrowseSession>> {
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .entry(viewer)
            .or_default()
            .clone()
    }

    /// Full scan split by the viewer's interaction history. A target that
    /// carries both a like and an older dislike counts as liked.
    async fn scan_pools(
        &self,
        viewer: &Profile,
    ) -> (Vec<UserId>, Vec<UserId>, Vec<UserId>) {
        let all = self.store.list_profiles().await;
        let history = self.store.interactions_of(viewer.user_id).await;

        let mut fresh = Vec::new();
        let mut revisit = Vec::new();
        let mut fallback = Vec::new();
        for profile in &all {
            if !compatible(viewer, profile) {
                continue;
            }
            let id = profile.user_id;
            if history.liked.contains(&id) {
                fallback.push(id);
            } else if history.disliked.contains(&id) {
                revisit.push(id);
            } else {
                fresh.push(id);
            }
        }
        (fresh, revisit, fallback)
    }
}
