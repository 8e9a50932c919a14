//! A study card together with its spaced-repetition state.
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Interval given to a freshly created card
pub const INITIAL_INTERVAL: i64 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCard {
    pub id: i64,
    pub owner_id: String,
    pub front: String,
    pub back: String,
    pub interval: i64,
    pub next_review_date: NaiveDate,
    pub version: i64,
    pub created_at: NaiveDate,
}

impl ReviewCard {
    /// A card is due on its review date and every day after it.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_date <= today
    }
}

/// Front/back pair used to create cards, also the shape of imported and generated batches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    pub front: String,
    pub back: String,
}

impl NewCard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.front.trim().is_empty() || self.back.trim().is_empty() {
            return Err(Error::invalid("both sides of the card must be filled in"));
        }
        Ok(())
    }
}

/// Scheduling result to be stored on a card after it was answered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NextReview {
    pub interval: i64,
    pub next_review_date: NaiveDate,
}
