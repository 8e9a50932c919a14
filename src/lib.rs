pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use database::CardStore;
pub use error::{Error, Result};
pub use models::{NewCard, Quality, ReviewCard, ReviewSession, compute_next_review};
