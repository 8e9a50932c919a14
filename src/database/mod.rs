pub mod db;

use crate::error::Result;
use crate::models::{NewCard, NextReview, ReviewCard};
use chrono::NaiveDate;
use rusqlite::Connection;

/// Storage seen by review sessions. Ownership checks belong to the store.
pub trait CardStore {
    fn create(&self, owner_id: &str, card: &NewCard, today: NaiveDate) -> Result<ReviewCard>;

    fn get(&self, id: i64) -> Result<ReviewCard>;

    fn list_due(&self, owner_id: &str, today: NaiveDate) -> Result<Vec<ReviewCard>>;

    /// Partial update of the scheduling fields, compare-and-swap on `version`.
    fn update_schedule(
        &self,
        id: i64,
        next: &NextReview,
        expected_version: i64,
    ) -> Result<ReviewCard>;
}

impl CardStore for Connection {
    fn create(&self, owner_id: &str, card: &NewCard, today: NaiveDate) -> Result<ReviewCard> {
        db::create_card(owner_id, card, today, self)
    }

    fn get(&self, id: i64) -> Result<ReviewCard> {
        db::get_card(id, self)
    }

    fn list_due(&self, owner_id: &str, today: NaiveDate) -> Result<Vec<ReviewCard>> {
        db::list_due_cards(owner_id, today, self)
    }

    fn update_schedule(
        &self,
        id: i64,
        next: &NextReview,
        expected_version: i64,
    ) -> Result<ReviewCard> {
        db::update_schedule(id, next, expected_version, self)
    }
}
