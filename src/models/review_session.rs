//! Review session over the cards that are due today.
//! Answers are scheduled and stored one at a time; the cursor wraps back to
//! the first card after the last one so review can continue in a loop.

use super::{Quality, ReviewCard, scheduler};
use crate::database::CardStore;
use crate::error::Result;
use chrono::NaiveDate;

/// Index that follows `index` in a list of `len` cards, wrapping to 0 after the last.
pub fn next_index(len: usize, index: usize) -> usize {
    if index + 1 < len { index + 1 } else { 0 }
}

/// Result of answering the current card
#[derive(Clone, Debug)]
pub struct AnswerOutcome {
    /// The card as stored after rescheduling
    pub card: ReviewCard,
    /// True when the answered card was the last one and the cursor went back to the first
    pub wrapped: bool,
}

pub struct ReviewSession {
    cards: Vec<ReviewCard>,
    current_index: usize,
    pub show_back: bool,
}

impl ReviewSession {
    pub fn new(cards: Vec<ReviewCard>) -> Self {
        Self {
            cards,
            current_index: 0,
            show_back: false,
        }
    }

    pub fn current_card(&self) -> Option<&ReviewCard> {
        self.cards.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn flip(&mut self) {
        self.show_back = !self.show_back;
    }

    /// "Card X of Y"
    pub fn position_message(&self) -> String {
        format!("Card {} of {}", self.current_index + 1, self.cards.len())
    }

    /// Schedules the current card, stores the result and moves to the next card.
    /// On error the cursor stays where it is.
    pub fn answer(
        &mut self,
        quality: Quality,
        today: NaiveDate,
        store: &impl CardStore,
    ) -> Result<Option<AnswerOutcome>> {
        let Some(card) = self.cards.get_mut(self.current_index) else {
            return Ok(None);
        };

        let next = scheduler::compute_next_review(card.interval, quality, today)?;
        let stored = store.update_schedule(card.id, &next, card.version)?;
        tracing::debug!(
            "Answered card {} as {}: next review {}",
            stored.id,
            quality,
            stored.next_review_date
        );
        *card = stored.clone();

        let wrapped = self.advance();
        Ok(Some(AnswerOutcome {
            card: stored,
            wrapped,
        }))
    }

    /// Moves on without answering
    pub fn skip(&mut self) -> bool {
        self.advance()
    }

    /// Replaces the card list, e.g. with a fresh due list after a wrap
    pub fn refresh(&mut self, cards: Vec<ReviewCard>) {
        self.cards = cards;
        self.current_index = 0;
        self.show_back = false;
    }

    fn advance(&mut self) -> bool {
        self.show_back = false;
        if self.cards.is_empty() {
            return false;
        }
        let next = next_index(self.cards.len(), self.current_index);
        let wrapped = next <= self.current_index;
        self.current_index = next;
        wrapped
    }
}
