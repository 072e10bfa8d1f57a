use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- Identity ---

/// Opaque user identifier assigned by the messaging transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// --- Profile ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookingFor {
    Men,
    Women,
    Everyone,
}

impl LookingFor {
    pub fn accepts(&self, gender: Gender) -> bool {
        match self {
            Self::Men => gender == Gender::Male,
            Self::Women => gender == Gender::Female,
            Self::Everyone => true,
        }
    }
}

/// Campus affiliation. Meetups are only proposed inside one institute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Institute {
    Engineering,
    ComputerScience,
    Economics,
    Law,
    Medicine,
    Humanities,
    NaturalSciences,
    Architecture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub looking_for: LookingFor,
    pub institute: Institute,
    pub description: String,
    pub photos: Vec<String>,
    pub video: Option<String>,
    pub verified: bool,
    pub rating_sum: f64,
    pub rating_weight: f64,
    pub created_at: DateTime<Utc>,
}

/// Validated profile payload. Applying it over an existing profile keeps the
/// rating accumulators and verification state untouched.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileInput {
    pub user_id: UserId,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(range(min = 16, max = 99))]
    pub age: u8,
    pub gender: Gender,
    pub looking_for: LookingFor,
    pub institute: Institute,
    #[validate(length(max = 1024))]
    pub description: String,
    #[validate(length(max = 3))]
    pub photos: Vec<String>,
    pub video: Option<String>,
}

impl ProfileInput {
    pub fn into_profile(self, existing: Option<&Profile>) -> Profile {
        Profile {
            user_id: self.user_id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            looking_for: self.looking_for,
            institute: self.institute,
            description: self.description,
            photos: self.photos,
            video: self.video.or_else(|| existing.and_then(|p| p.video.clone())),
            verified: existing.map(|p| p.verified).unwrap_or(false),
            rating_sum: existing.map(|p| p.rating_sum).unwrap_or(0.0),
            rating_weight: existing.map(|p| p.rating_weight).unwrap_or(0.0),
            created_at: existing.map(|p| p.created_at).unwrap_or_else(Utc::now),
        }
    }
}

// --- Interactions ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Like,
    Dislike,
}

// --- Votes ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub voter: UserId,
    pub target: UserId,
    pub score: u8,
    pub weight: f64,
    pub at: DateTime<Utc>,
}

// --- Meetup tasks ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetupStatus {
    Pending,
    WaitingVideo,
    WaitingAdmin,
    Confirmed,
    Declined,
}

impl MeetupStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Declined)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetupTask {
    pub id: Uuid,
    pub user_a: UserId,
    pub user_b: UserId,
    pub initiator: UserId,
    pub institute: Institute,
    pub location: String,
    pub status: MeetupStatus,
    pub a_agreed: bool,
    pub b_agreed: bool,
    pub deadline: DateTime<Utc>,
    pub video: Option<String>,
    pub admin_decision: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl MeetupTask {
    pub fn involves(&self, user: UserId) -> bool {
        self.user_a == user || self.user_b == user
    }

    pub fn partner_of(&self, user: UserId) -> Option<UserId> {
        if self.user_a == user {
            Some(self.user_b)
        } else if self.user_b == user {
            Some(self.user_a)
        } else {
            None
        }
    }

    /// A task stuck before the admin stage past its deadline counts as
    /// abandoned; nothing transitions it, it just stops being "active".
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, MeetupStatus::Pending | MeetupStatus::WaitingVideo)
            && now > self.deadline
    }
}

// --- Gamification ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstMeet,
    Superliked,
    Verified,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    pub last_active: NaiveDate,
}
