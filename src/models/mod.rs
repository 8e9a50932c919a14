pub mod quality;
pub mod review_card;
pub mod review_session;
pub mod scheduler;

pub use quality::Quality;
pub use review_card::{INITIAL_INTERVAL, NewCard, NextReview, ReviewCard};
pub use review_session::{AnswerOutcome, ReviewSession};
pub use scheduler::compute_next_review;
