//! Deck engine: draw pile, hand, discard pile.
//!
//! Piles hold `CardId`s. The draw pile is ordered with its top at the end of
//! the vec (so drawing is a `pop`); hand and discard keep insertion order.
//!
//! Population invariant, held by every operation:
//! `draw + hand + discard + exhausted == total ever added`.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::GameRng;
use crate::events::GameEvent;

/// One of the three piles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    Draw,
    Hand,
    Discard,
}

/// Result of a draw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Cards moved into the hand, in draw order.
    pub drawn: Vec<CardId>,
    /// Cards moved from discard to draw pile by a reshuffle.
    pub reshuffled: usize,
}

impl DrawReport {
    /// True if fewer cards were drawn than requested.
    #[must_use]
    pub fn stopped_short(&self, requested: u32) -> bool {
        self.drawn.len() < requested as usize
    }
}

/// Owns the piles of one session.
///
/// ## Usage
///
/// ```
/// use influence_deck::zones::{DeckEngine, Pile};
/// use influence_deck::cards::CardId;
/// use influence_deck::core::GameRng;
///
/// let mut rng = GameRng::new(1);
/// let mut deck = DeckEngine::new();
/// deck.initialize(&[CardId::new(1), CardId::new(1), CardId::new(2)], &mut rng);
///
/// let report = deck.draw_cards(2, &mut rng);
/// assert_eq!(report.drawn.len(), 2);
/// assert_eq!(deck.len(Pile::Draw), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEngine {
    draw_pile: Vec<CardId>,
    hand: Vec<CardId>,
    discard_pile: Vec<CardId>,
    exhausted: usize,
    total_added: usize,
}

impl DeckEngine {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every pile with a shuffled copy of `templates` as the draw pile.
    pub fn initialize(&mut self, templates: &[CardId], rng: &mut GameRng) {
        *self = Self {
            draw_pile: templates.to_vec(),
            total_added: templates.len(),
            ..Self::default()
        };
        rng.shuffle(&mut self.draw_pile);
    }

    // === Inspection ===

    /// Cards in a pile. For the draw pile, the last element is the top.
    #[must_use]
    pub fn pile(&self, pile: Pile) -> &[CardId] {
        match pile {
            Pile::Draw => &self.draw_pile,
            Pile::Hand => &self.hand,
            Pile::Discard => &self.discard_pile,
        }
    }

    #[must_use]
    pub fn len(&self, pile: Pile) -> usize {
        self.pile(pile).len()
    }

    /// Next card to be drawn.
    #[must_use]
    pub fn top_of_draw(&self) -> Option<CardId> {
        self.draw_pile.last().copied()
    }

    #[must_use]
    pub fn hand(&self) -> &[CardId] {
        &self.hand
    }

    #[must_use]
    pub fn exhausted_count(&self) -> usize {
        self.exhausted
    }

    #[must_use]
    pub fn total_added(&self) -> usize {
        self.total_added
    }

    /// Whether the population invariant holds.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.draw_pile.len() + self.hand.len() + self.discard_pile.len() + self.exhausted
            == self.total_added
    }

    /// Pile sizes as a presentation event.
    #[must_use]
    pub fn changed_event(&self) -> GameEvent {
        GameEvent::DeckChanged {
            draw: self.draw_pile.len(),
            hand: self.hand.len(),
            discard: self.discard_pile.len(),
        }
    }

    // === Counting ===

    /// Count entries of `card` in a pile.
    ///
    /// With `exclude_self`, one instance is not counted: the card currently
    /// being resolved.
    #[must_use]
    pub fn count(&self, pile: Pile, card: CardId, exclude_self: bool) -> u32 {
        let found = self.pile(pile).iter().filter(|&&c| c == card).count() as u32;
        if exclude_self {
            found.saturating_sub(1)
        } else {
            found
        }
    }

    #[must_use]
    pub fn count_card_in_hand(&self, card: CardId, exclude_self: bool) -> u32 {
        self.count(Pile::Hand, card, exclude_self)
    }

    #[must_use]
    pub fn count_card_in_draw_pile(&self, card: CardId) -> u32 {
        self.count(Pile::Draw, card, false)
    }

    #[must_use]
    pub fn count_card_in_discard_pile(&self, card: CardId) -> u32 {
        self.count(Pile::Discard, card, false)
    }

    // === Shuffling and drawing ===

    /// Permute the draw pile in place.
    pub fn shuffle_draw_pile(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.draw_pile);
    }

    /// Draw up to `count` cards.
    ///
    /// An empty draw pile is refilled from the discard pile (then shuffled)
    /// as many times as needed. Drawing stops early only when both are empty.
    pub fn draw_cards(&mut self, count: u32, rng: &mut GameRng) -> DrawReport {
        let mut report = DrawReport::default();

        for _ in 0..count {
            if self.draw_pile.is_empty() {
                if self.discard_pile.is_empty() {
                    break;
                }
                report.reshuffled += self.reshuffle_discard(rng);
            }

            match self.draw_pile.pop() {
                Some(card) => {
                    self.hand.push(card);
                    report.drawn.push(card);
                }
                None => break,
            }
        }

        report
    }

    fn reshuffle_discard(&mut self, rng: &mut GameRng) -> usize {
        let moved = self.discard_pile.len();
        self.draw_pile.append(&mut self.discard_pile);
        rng.shuffle(&mut self.draw_pile);
        tracing::debug!(moved, "reshuffled discard into draw pile");
        moved
    }

    /// Move the whole hand to the discard pile. Returns how many moved.
    pub fn discard_hand(&mut self) -> usize {
        let moved = self.hand.len();
        self.discard_pile.append(&mut self.hand);
        moved
    }

    // === Playing ===

    /// Move one `card` from hand to discard. False if it was not in hand.
    pub fn play_card(&mut self, card: CardId) -> bool {
        match self.remove_from_hand(card) {
            Some(card) => {
                self.discard_pile.push(card);
                true
            }
            None => false,
        }
    }

    /// Remove one `card` from hand permanently. False if it was not in hand.
    pub fn exhaust_card(&mut self, card: CardId) -> bool {
        match self.remove_from_hand(card) {
            Some(_) => {
                self.exhausted += 1;
                true
            }
            None => false,
        }
    }

    /// Permanently remove matching entries from a pile, sparing `keep` of
    /// them. Returns how many were removed.
    pub fn exhaust_matching(&mut self, pile: Pile, card: CardId, keep: usize) -> usize {
        let entries = match pile {
            Pile::Draw => &mut self.draw_pile,
            Pile::Hand => &mut self.hand,
            Pile::Discard => &mut self.discard_pile,
        };

        let mut spared = 0;
        let before = entries.len();
        entries.retain(|&c| {
            if c != card {
                return true;
            }
            if spared < keep {
                spared += 1;
                return true;
            }
            false
        });

        let removed = before - entries.len();
        self.exhausted += removed;
        removed
    }

    fn remove_from_hand(&mut self, card: CardId) -> Option<CardId> {
        let index = self.hand.iter().position(|&c| c == card)?;
        Some(self.hand.remove(index))
    }

    // === Insertion ===

    pub fn add_card_to_hand(&mut self, card: CardId) {
        self.hand.push(card);
        self.total_added += 1;
    }

    pub fn add_card_to_discard(&mut self, card: CardId) {
        self.discard_pile.push(card);
        self.total_added += 1;
    }

    /// Next draw will be this card.
    pub fn add_card_to_top_of_draw(&mut self, card: CardId) {
        self.draw_pile.push(card);
        self.total_added += 1;
    }

    /// Insert so that `ceil(len / 2)` cards lie above it.
    pub fn add_card_to_middle_of_draw(&mut self, card: CardId) {
        let len = self.draw_pile.len();
        let above = len.div_ceil(2);
        self.draw_pile.insert(len - above, card);
        self.total_added += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: CardId = CardId::new(1);
    const B: CardId = CardId::new(2);
    const C: CardId = CardId::new(3);
    const D: CardId = CardId::new(4);
    const E: CardId = CardId::new(5);

    fn deck_with(draw: &[CardId], discard: &[CardId]) -> DeckEngine {
        DeckEngine {
            draw_pile: draw.to_vec(),
            hand: Vec::new(),
            discard_pile: discard.to_vec(),
            exhausted: 0,
            total_added: draw.len() + discard.len(),
        }
    }

    #[test]
    fn test_initialize_shuffles_copy() {
        let mut rng = GameRng::new(42);
        let mut deck = DeckEngine::new();
        let ids: Vec<_> = (0..20).map(CardId::new).collect();

        deck.initialize(&ids, &mut rng);

        let mut sorted = deck.pile(Pile::Draw).to_vec();
        assert_ne!(sorted, ids);
        sorted.sort();
        assert_eq!(sorted, ids);
        assert_eq!(deck.total_added(), 20);
        assert!(deck.is_consistent());
    }

    #[test]
    fn test_draw_with_reshuffle() {
        // draw=[A,B] with A on top, discard=[C,D,E]
        let mut deck = deck_with(&[B, A], &[C, D, E]);
        let mut rng = GameRng::new(7);

        let report = deck.draw_cards(4, &mut rng);

        assert_eq!(&report.drawn[..2], &[A, B]);
        assert_eq!(report.drawn.len(), 4);
        assert_eq!(report.reshuffled, 3);
        assert_eq!(deck.len(Pile::Hand), 4);
        assert_eq!(deck.len(Pile::Draw), 1);
        assert_eq!(deck.len(Pile::Discard), 0);
        assert!(deck.is_consistent());
    }

    #[test]
    fn test_draw_stops_when_exhausted() {
        let mut deck = deck_with(&[A], &[]);
        let mut rng = GameRng::new(1);

        let report = deck.draw_cards(3, &mut rng);
        assert_eq!(report.drawn, vec![A]);
        assert!(report.stopped_short(3));
        assert_eq!(deck.len(Pile::Hand), 1);
    }

    #[test]
    fn test_play_and_exhaust() {
        let mut deck = deck_with(&[A, B, A], &[]);
        let mut rng = GameRng::new(1);
        deck.draw_cards(3, &mut rng);

        assert!(deck.play_card(A));
        assert_eq!(deck.pile(Pile::Discard), &[A]);
        assert!(deck.exhaust_card(B));
        assert_eq!(deck.exhausted_count(), 1);
        assert!(!deck.exhaust_card(C));
        assert!(!deck.play_card(B));
        assert!(deck.is_consistent());
    }

    #[test]
    fn test_discard_hand() {
        let mut deck = deck_with(&[A, B], &[C]);
        let mut rng = GameRng::new(1);
        deck.draw_cards(2, &mut rng);

        assert_eq!(deck.discard_hand(), 2);
        assert!(deck.hand().is_empty());
        assert_eq!(deck.len(Pile::Discard), 3);
    }

    #[test]
    fn test_insertions() {
        let mut deck = deck_with(&[A, A, A], &[]);

        deck.add_card_to_top_of_draw(B);
        assert_eq!(deck.top_of_draw(), Some(B));

        deck.add_card_to_hand(C);
        deck.add_card_to_discard(D);
        assert_eq!(deck.hand(), &[C]);
        assert_eq!(deck.pile(Pile::Discard), &[D]);
        assert_eq!(deck.total_added(), 6);
        assert!(deck.is_consistent());
    }

    #[test]
    fn test_middle_insertion_index() {
        // 3 cards: ceil(3/2) = 2 above the new card
        let mut deck = deck_with(&[A, B, C], &[]);
        deck.add_card_to_middle_of_draw(E);
        assert_eq!(deck.pile(Pile::Draw), &[A, E, B, C]);

        // 4 cards: 2 above
        let mut deck = deck_with(&[A, B, C, D], &[]);
        deck.add_card_to_middle_of_draw(E);
        assert_eq!(deck.pile(Pile::Draw), &[A, B, E, C, D]);

        // empty pile
        let mut deck = DeckEngine::new();
        deck.add_card_to_middle_of_draw(E);
        assert_eq!(deck.pile(Pile::Draw), &[E]);
    }

    #[test]
    fn test_count_excluding_self() {
        let mut deck = deck_with(&[A, A, B], &[A]);
        let mut rng = GameRng::new(1);
        deck.draw_cards(3, &mut rng);

        assert_eq!(deck.count_card_in_hand(A, false), 2);
        assert_eq!(deck.count_card_in_hand(A, true), 1);
        assert_eq!(deck.count_card_in_hand(C, true), 0);
        assert_eq!(deck.count_card_in_discard_pile(A), 1);
        assert_eq!(deck.count_card_in_draw_pile(A), 0);
    }

    #[test]
    fn test_exhaust_matching_spares() {
        let mut deck = deck_with(&[], &[A, B, A, A]);
        assert_eq!(deck.exhaust_matching(Pile::Discard, A, 1), 2);
        assert_eq!(deck.pile(Pile::Discard), &[A, B]);
        assert_eq!(deck.exhausted_count(), 2);
        assert!(deck.is_consistent());
    }
}
