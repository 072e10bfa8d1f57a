use std::sync::Arc;

use crate::models::{Profile, UserId};
use crate::store::{ProfileStore, Repository, VoteOutcome, VoteStore};

/// Displayed rating derived from the materialized accumulators. A user with
/// no recorded votes sits at the 1.0 trust floor, and no amount of bad
/// votes pushes anyone below it.
pub fn displayed_rating(profile: &Profile) -> f64 {
    if profile.rating_weight > 0.0 {
        (profile.rating_sum / profile.rating_weight).max(1.0)
    } else {
        1.0
    }
}

/// Influence of a voter derived from their own rating: `ln(1 + rating)`.
/// A fresh voter (rating 1.0) weighs in at ~0.693; the weight keeps growing
/// with rating but logarithmically, so well-rated voters count more without
/// drowning everyone else out.
pub fn voter_weight(rating: f64) -> f64 {
    rating.ln_1p()
}

pub struct RatingEngine {
    store: Arc<dyn Repository>,
}

impl RatingEngine {
    pub fn new(store: Arc<dyn Repository>) -> Self {
        Self { store }
    }

    pub async fn rating_of(&self, user: UserId) -> Option<f64> {
        let profile = self.store.get_profile(user).await?;
        Some(displayed_rating(&profile))
    }

    /// Records `voter`'s 1..=5 score for `target`, weighted by the voter's
    /// own standing at the time of the vote. Self-votes and repeat votes
    /// come back as informational outcomes and change nothing.
    pub async fn record_vote(&self, voter: UserId, target: UserId, score: u8) -> VoteOutcome {
        if voter == target {
            return VoteOutcome::SelfVote;
        }

        let rating = match self.store.get_profile(voter).await {
            Some(profile) => displayed_rating(&profile),
            None => 1.0,
        };
        let weight = voter_weight(rating);

        let outcome = self.store.record_vote(voter, target, score, weight).await;
        if outcome == VoteOutcome::Recorded {
            tracing::debug!(
                voter = %voter,
                target = %target,
                score,
                weight,
                "vote recorded"
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::voter_weight;

    #[test]
    fn weight_of_fresh_voter_is_ln_two() {
        assert!((voter_weight(1.0) - 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn weight_grows_monotonically_and_stays_positive() {
        let ratings = [1.0, 1.5, 2.0, 3.7, 5.0];
        let weights: Vec<f64> = ratings.iter().map(|r| voter_weight(*r)).collect();
        for pair in weights.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(weights.iter().all(|w| *w > 0.0));
    }
}
