mod common;

use common::{as_repository, profile, seeded_store};
use unicrush_core::models::{Gender, Institute, LookingFor, UserId};
use unicrush_core::rating::{displayed_rating, voter_weight, RatingEngine};
use unicrush_core::store::{ProfileStore, VoteOutcome, VoteStore};

fn two_users() -> Vec<unicrush_core::models::Profile> {
    vec![
        profile(1, "Alice", Gender::Female, LookingFor::Men, Institute::Law),
        profile(2, "Bob", Gender::Male, LookingFor::Women, Institute::Law),
    ]
}

#[tokio::test]
async fn fresh_user_sits_at_the_floor() {
    let store = seeded_store(two_users()).await;
    let engine = RatingEngine::new(as_repository(&store));

    assert_eq!(engine.rating_of(UserId(1)).await, Some(1.0));
}

#[tokio::test]
async fn rating_never_drops_below_the_floor() {
    let store = seeded_store(two_users()).await;
    let engine = RatingEngine::new(as_repository(&store));

    // A string of worst-possible scores still leaves the target at 1.0.
    assert_eq!(
        engine.record_vote(UserId(1), UserId(2), 1).await,
        VoteOutcome::Recorded
    );
    assert_eq!(engine.rating_of(UserId(2)).await, Some(1.0));
}

#[tokio::test]
async fn votes_are_weighted_by_the_voter_standing() {
    let store = seeded_store(two_users()).await;
    let engine = RatingEngine::new(as_repository(&store));

    engine.record_vote(UserId(1), UserId(2), 5).await;

    let target = store.get_profile(UserId(2)).await.unwrap();
    let expected_weight = voter_weight(1.0);
    assert!((target.rating_weight - expected_weight).abs() < 1e-12);
    assert!((target.rating_sum - 5.0 * expected_weight).abs() < 1e-12);
    assert!((displayed_rating(&target) - 5.0).abs() < 1e-12);
}

#[tokio::test]
async fn self_votes_change_nothing() {
    let store = seeded_store(two_users()).await;
    let engine = RatingEngine::new(as_repository(&store));

    assert_eq!(
        engine.record_vote(UserId(1), UserId(1), 5).await,
        VoteOutcome::SelfVote
    );
    let me = store.get_profile(UserId(1)).await.unwrap();
    assert_eq!(me.rating_weight, 0.0);
}

#[tokio::test]
async fn first_vote_wins() {
    let store = seeded_store(two_users()).await;
    let engine = RatingEngine::new(as_repository(&store));

    assert_eq!(
        engine.record_vote(UserId(1), UserId(2), 5).await,
        VoteOutcome::Recorded
    );
    let after_first = store.get_profile(UserId(2)).await.unwrap();

    assert_eq!(
        engine.record_vote(UserId(1), UserId(2), 1).await,
        VoteOutcome::AlreadyVoted
    );
    let after_second = store.get_profile(UserId(2)).await.unwrap();

    assert_eq!(after_first.rating_sum, after_second.rating_sum);
    assert_eq!(after_first.rating_weight, after_second.rating_weight);
}

#[tokio::test]
async fn concurrent_duplicate_votes_apply_once() {
    let store = seeded_store(two_users()).await;
    let repo = as_repository(&store);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.record_vote(UserId(1), UserId(2), 4, 0.7).await
        }));
    }

    let mut recorded = 0;
    for handle in handles {
        if handle.await.unwrap() == VoteOutcome::Recorded {
            recorded += 1;
        }
    }
    assert_eq!(recorded, 1);

    let target = store.get_profile(UserId(2)).await.unwrap();
    assert!((target.rating_weight - 0.7).abs() < 1e-12);
}

#[tokio::test]
async fn accumulators_match_the_vote_rows() {
    let store = seeded_store(vec![
        profile(1, "Alice", Gender::Female, LookingFor::Men, Institute::Law),
        profile(2, "Bob", Gender::Male, LookingFor::Women, Institute::Law),
        profile(3, "Cara", Gender::Female, LookingFor::Men, Institute::Law),
    ])
    .await;
    let engine = RatingEngine::new(as_repository(&store));

    engine.record_vote(UserId(1), UserId(2), 5).await;
    engine.record_vote(UserId(3), UserId(2), 2).await;

    let target = store.get_profile(UserId(2)).await.unwrap();
    let votes = store.votes_for(UserId(2)).await;
    let sum: f64 = votes.iter().map(|v| f64::from(v.score) * v.weight).sum();
    let weight: f64 = votes.iter().map(|v| v.weight).sum();
    assert!((target.rating_sum - sum).abs() < 1e-12);
    assert!((target.rating_weight - weight).abs() < 1e-12);
}

#[tokio::test]
async fn deleting_a_voter_backs_their_votes_out() {
    let store = seeded_store(two_users()).await;
    let engine = RatingEngine::new(as_repository(&store));

    engine.record_vote(UserId(1), UserId(2), 5).await;
    assert!(store.get_profile(UserId(2)).await.unwrap().rating_weight > 0.0);

    store.delete_profile(UserId(1)).await;

    let target = store.get_profile(UserId(2)).await.unwrap();
    assert_eq!(target.rating_weight, 0.0);
    assert_eq!(displayed_rating(&target), 1.0);
    assert!(store.votes_for(UserId(2)).await.is_empty());
}

#[test]
fn voter_weight_is_strictly_monotonic() {
    let mut previous = 0.0;
    for rating in [1.0, 1.2, 2.0, 3.0, 4.9, 5.0] {
        let weight = voter_weight(rating);
        assert!(weight > previous);
        previous = weight;
    }
}
