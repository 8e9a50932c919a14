//! Database operations for the review card store
//!
//! Handles SQLite database initialization, CRUD operations for cards,
//! schedule updates guarded by a version counter, and the stored simulated date.

use crate::error::{Error, Result};
use crate::models::{INITIAL_INTERVAL, NewCard, NextReview, ReviewCard};
use chrono::{Datelike, Days, Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

const CARD_COLUMNS: &str =
    "id, owner_id, front, back, interval_days, next_review_date, version, created_at";

/// Opens (or creates) the SQLite database at `path` and makes sure the schema exists
pub fn init_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    tracing::info!("Opened card store at {}", path.display());
    Ok(conn)
}

/// Creates tables for review cards and app state.
/// Sets the stored current date to the system date if not already initialized.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS review_cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id TEXT NOT NULL,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            interval_days INTEGER NOT NULL DEFAULT 1 CHECK (interval_days >= 1),
            next_review_date INTEGER NOT NULL,
            version INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_review_cards_due
            ON review_cards (owner_id, next_review_date);
        CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
        params![Local::now().date_naive()],
    )?;

    Ok(())
}

/// Card dates are stored as day numbers so that due checks compare integers
fn day_number(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let days: i32 = row.get(idx)?;
    NaiveDate::from_num_days_from_ce_opt(days)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, days as i64))
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<ReviewCard> {
    Ok(ReviewCard {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        front: row.get(2)?,
        back: row.get(3)?,
        interval: row.get(4)?,
        next_review_date: date_column(row, 5)?,
        version: row.get(6)?,
        created_at: date_column(row, 7)?,
    })
}

/// Retrieves the stored simulated date
pub fn get_current_date(conn: &Connection) -> Result<NaiveDate> {
    let date = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_date'",
        [],
        |row| row.get(0),
    )?;
    Ok(date)
}

pub fn set_current_date(date: NaiveDate, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES ('current_date', ?1)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![date],
    )?;
    Ok(())
}

/// Advances the stored date by one day (for trying out spaced repetition)
pub fn advance_day(conn: &Connection) -> Result<NaiveDate> {
    let current = get_current_date(conn)?;
    let next_day = current
        .checked_add_days(Days::new(1))
        .ok_or_else(|| Error::invalid("simulated date out of range"))?;
    set_current_date(next_day, conn)?;
    tracing::info!("Simulated date advanced to {}", next_day);
    Ok(next_day)
}

/// Creates a card due today with the initial interval
pub fn create_card(
    owner_id: &str,
    card: &NewCard,
    today: NaiveDate,
    conn: &Connection,
) -> Result<ReviewCard> {
    card.validate()?;

    conn.execute(
        "INSERT INTO review_cards (owner_id, front, back, interval_days, next_review_date, version, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?5)",
        params![owner_id, card.front, card.back, INITIAL_INTERVAL, day_number(today)],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!("Created card {} for {}", id, owner_id);

    get_card(id, conn)
}

/// Creates several cards in one transaction. Nothing is stored if any card is invalid.
pub fn create_cards(
    owner_id: &str,
    cards: &[NewCard],
    today: NaiveDate,
    conn: &Connection,
) -> Result<Vec<ReviewCard>> {
    let tx = conn.unchecked_transaction()?;
    let created = cards
        .iter()
        .map(|card| create_card(owner_id, card, today, &tx))
        .collect::<Result<Vec<_>>>()?;
    tx.commit()?;

    tracing::info!("Created {} cards for {}", created.len(), owner_id);
    Ok(created)
}

pub fn get_card(id: i64, conn: &Connection) -> Result<ReviewCard> {
    conn.query_row(
        &format!("SELECT {} FROM review_cards WHERE id = ?1", CARD_COLUMNS),
        params![id],
        card_from_row,
    )
    .optional()?
    .ok_or(Error::NotFound(id))
}

/// Retrieves all cards of an owner, oldest first
pub fn list_cards(owner_id: &str, conn: &Connection) -> Result<Vec<ReviewCard>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM review_cards WHERE owner_id = ?1 ORDER BY id ASC",
        CARD_COLUMNS
    ))?;

    let cards = stmt
        .query_map(params![owner_id], card_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

/// Retrieves cards due for review
///
/// Returns cards where next_review_date <= today,
/// ordered by next_review_date (oldest first).
pub fn list_due_cards(
    owner_id: &str,
    today: NaiveDate,
    conn: &Connection,
) -> Result<Vec<ReviewCard>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM review_cards
         WHERE owner_id = ?1 AND next_review_date <= ?2
         ORDER BY next_review_date ASC, id ASC",
        CARD_COLUMNS
    ))?;

    let cards = stmt
        .query_map(params![owner_id, day_number(today)], card_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cards)
}

/// Stores a new schedule on a card if it still has `expected_version`
///
/// Returns the updated card. Fails with `Conflict` when another write got there first.
pub fn update_schedule(
    id: i64,
    next: &NextReview,
    expected_version: i64,
    conn: &Connection,
) -> Result<ReviewCard> {
    if next.interval < 1 {
        return Err(Error::invalid(format!(
            "interval must be at least 1, got {}",
            next.interval
        )));
    }

    let changed = conn.execute(
        "UPDATE review_cards
         SET interval_days = ?1, next_review_date = ?2, version = version + 1
         WHERE id = ?3 AND version = ?4",
        params![
            next.interval,
            day_number(next.next_review_date),
            id,
            expected_version
        ],
    )?;

    if changed == 0 {
        // Either the row is gone or its version moved on
        let card = get_card(id, conn)?;
        tracing::warn!(
            "Card {} is at version {}, expected {}",
            id,
            card.version,
            expected_version
        );
        return Err(Error::Conflict { id });
    }

    tracing::debug!(
        "Card {} rescheduled: {} days, due {}",
        id,
        next.interval,
        next.next_review_date
    );
    get_card(id, conn)
}

pub fn delete_card(id: i64, conn: &Connection) -> Result<()> {
    let deleted = conn.execute("DELETE FROM review_cards WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(Error::NotFound(id));
    }
    tracing::debug!("Deleted card {}", id);
    Ok(())
}

/// Card counts shown on the main screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CardStats {
    pub total: i64,
    pub due: i64,
}

pub fn card_stats(owner_id: &str, today: NaiveDate, conn: &Connection) -> Result<CardStats> {
    let stats = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(next_review_date <= ?2), 0)
         FROM review_cards WHERE owner_id = ?1",
        params![owner_id, day_number(today)],
        |row| {
            Ok(CardStats {
                total: row.get(0)?,
                due: row.get(1)?,
            })
        },
    )?;
    Ok(stats)
}
