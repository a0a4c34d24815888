// src/application/study_session.rs
use crate::domain::{FlashCard, LanguageDeck, ProgressRecord};
use std::collections::HashSet;
use tracing::debug;

/// Position in a deck's card stack, restored from saved progress when it still
/// fits the deck.
#[derive(Debug, Clone)]
pub struct StudySession {
    natural: Vec<FlashCard>,
    stack: Vec<FlashCard>,
    index: usize,
    has_progress: bool,
}

impl StudySession {
    /// Saved order is only trusted when it is a permutation of the deck's card
    /// numbers and the index points inside the deck; otherwise the session starts
    /// over in natural order at index 0.
    pub fn restore(deck: &LanguageDeck, saved: Option<&ProgressRecord>) -> Self {
        let natural = deck.cards.clone();
        if let Some(record) = saved {
            match reorder(&deck.cards, &record.card_order) {
                Some(stack) if record.current_index < stack.len() => {
                    return Self {
                        natural,
                        stack,
                        index: record.current_index,
                        has_progress: true,
                    };
                }
                _ => debug!(
                    deck = %deck.code,
                    saved_len = record.card_order.len(),
                    deck_len = deck.cards.len(),
                    "Saved progress does not match deck; starting over"
                ),
            }
        }

        Self {
            stack: natural.clone(),
            natural,
            index: 0,
            has_progress: false,
        }
    }

    pub fn current_card(&self) -> Option<&FlashCard> {
        self.stack.first()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based position for display
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn has_progress(&self) -> bool {
        self.has_progress
    }

    pub fn order(&self) -> Vec<u32> {
        self.stack.iter().map(|c| c.number).collect()
    }

    pub fn progress_fraction(&self) -> f64 {
        if self.stack.is_empty() {
            return 0.0;
        }
        self.position() as f64 / self.len() as f64
    }

    /// Move the top card to the back. Returns the index and order to persist.
    pub fn advance(&mut self) -> (usize, Vec<u32>) {
        if self.stack.is_empty() {
            return (0, Vec::new());
        }
        self.stack.rotate_left(1);
        self.index = (self.index + 1) % self.stack.len();
        self.has_progress = true;
        (self.index, self.order())
    }

    pub fn reset(&mut self) {
        self.stack = self.natural.clone();
        self.index = 0;
        self.has_progress = false;
    }
}

fn reorder(cards: &[FlashCard], order: &[u32]) -> Option<Vec<FlashCard>> {
    if order.len() != cards.len() {
        return None;
    }
    let mut seen = HashSet::with_capacity(order.len());
    order
        .iter()
        .map(|number| {
            if !seen.insert(*number) {
                return None;
            }
            cards.iter().find(|c| c.number == *number).cloned()
        })
        .collect()
}
