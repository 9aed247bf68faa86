//! Draw and discard piles shared at the center of the table
//!
//! The minor draw pile holds the 56 minor cards plus Death; the major draw
//! pile holds the other 21 majors. Draws remove a uniformly random card
//! without replacement. Conservation is enforced here: a card chosen for
//! removal is chosen FROM the remaining set, so a failed removal means state
//! was corrupted elsewhere and the game instance must abort.

use crate::catalog::{self, Language};
use crate::core::card::{Arcana, CardId};
use crate::{DragonError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bounded retry budget for the conservation check on removal
const DRAW_RETRIES: u8 = 4;

/// Identity of a draw pile, deciding where drawn cards are routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PileKind {
    MinorDraw,
    MajorDraw,
}

/// Fill state of a draw pile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PileState {
    Full,
    Partial,
    Empty,
}

/// A draw pile with an immutable snapshot of its full composition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawPile {
    kind: PileKind,
    full: Vec<CardId>,
    remaining: Vec<CardId>,
}

impl DrawPile {
    /// Build a pile from an explicit composition
    pub fn from_cards(kind: PileKind, cards: Vec<CardId>) -> Self {
        DrawPile {
            kind,
            remaining: cards.clone(),
            full: cards,
        }
    }

    /// The standard minor draw pile: all 56 minors plus Death (57 cards)
    pub fn standard_minor() -> Self {
        let mut cards: Vec<CardId> = CardId::all_minors().collect();
        cards.push(CardId::Major(Arcana::Death));
        DrawPile::from_cards(PileKind::MinorDraw, cards)
    }

    /// The standard major draw pile: the 22 arcana minus Death (21 cards)
    pub fn standard_major() -> Self {
        let cards: Vec<CardId> = CardId::all_majors()
            .filter(|c| *c != CardId::Major(Arcana::Death))
            .collect();
        DrawPile::from_cards(PileKind::MajorDraw, cards)
    }

    pub fn kind(&self) -> PileKind {
        self.kind
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn total(&self) -> usize {
        self.full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn state(&self) -> PileState {
        match self.remaining.len() {
            0 => PileState::Empty,
            n if n == self.full.len() => PileState::Full,
            _ => PileState::Partial,
        }
    }

    /// Cards still in the pile (inspection only; tests and conservation audit)
    pub fn remaining_cards(&self) -> &[CardId] {
        &self.remaining
    }

    /// Remove one uniformly random card from the remaining set
    ///
    /// The chosen card is picked from `remaining` itself, so the removal must
    /// succeed. A miss means the pile was aliased or corrupted; after a small
    /// retry budget the game instance is declared broken.
    fn draw_one(&mut self, rng: &mut impl Rng) -> Result<Option<CardId>> {
        if self.remaining.is_empty() {
            return Ok(None);
        }

        let mut retries = DRAW_RETRIES;
        loop {
            let idx = rng.gen_range(0..self.remaining.len());
            let chosen = self.remaining[idx];

            match self.remaining.iter().position(|c| *c == chosen) {
                Some(pos) => {
                    self.remaining.remove(pos);
                    return Ok(Some(chosen));
                }
                None => {
                    retries -= 1;
                    if retries == 0 {
                        return Err(DragonError::ConservationViolation(format!(
                            "{:?}: card {chosen} chosen from the pile is no longer in it; \
                             too many consecutive draw failures, this pile is broken",
                            self.kind
                        )));
                    }
                }
            }
        }
    }

    /// Draw up to `n` cards without replacement
    ///
    /// Returns fewer than `n` cards when the pile runs out; the caller checks
    /// the returned length to detect exhaustion. Drawing zero cards is an
    /// input error, not an empty result.
    pub fn draw(&mut self, n: usize, rng: &mut impl Rng) -> Result<Vec<CardId>> {
        if n == 0 {
            return Err(DragonError::InvalidDraw(
                "cannot draw a null amount of cards".to_string(),
            ));
        }

        let mut drawn = Vec::with_capacity(n.min(self.remaining.len()));
        while drawn.len() < n {
            match self.draw_one(rng)? {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        Ok(drawn)
    }

    /// Deal `per_player` cards to each hand, one card at a time, round-robin
    /// starting at `start_idx`
    ///
    /// Re-entrant: appends to whatever the hands already contain. The one-at-
    /// a-time order matters because peeking effects observe the draw sequence.
    pub fn distribute(
        &mut self,
        per_player: usize,
        start_idx: usize,
        hands: &mut [Vec<CardId>],
        rng: &mut impl Rng,
    ) -> Result<()> {
        let n_players = hands.len();
        if n_players == 0 || per_player == 0 {
            return Err(DragonError::InvalidDraw(
                "distribution needs at least one player and one card per player".to_string(),
            ));
        }
        if self.remaining() < n_players * per_player {
            return Err(DragonError::InvalidDraw(format!(
                "cannot deal {per_player} cards to {n_players} players from {} remaining",
                self.remaining()
            )));
        }

        for _ in 0..per_player {
            for offset in 0..n_players {
                let idx = (start_idx + offset) % n_players;
                let card = self
                    .draw_one(rng)?
                    .expect("remaining count checked above");
                hands[idx].push(card);
            }
        }
        Ok(())
    }

    /// Refill the pile with its full original composition
    pub fn reset(&mut self) {
        self.remaining = self.full.clone();
    }

    /// Put cards back into the pile (redistribution effects)
    pub fn return_cards(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.remaining.extend(cards);
    }
}

/// Identity of a discard pile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscardKind {
    Minor,
    Action,
}

/// An open discard pile, consultable by any player at any time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscardPile {
    kind: DiscardKind,
    cards: Vec<CardId>,
}

impl DiscardPile {
    pub fn new(kind: DiscardKind) -> Self {
        DiscardPile {
            kind,
            cards: Vec::new(),
        }
    }

    pub fn kind(&self) -> DiscardKind {
        self.kind
    }

    pub fn push(&mut self, card: CardId) {
        self.cards.push(card);
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    /// Take a specific card out (reactivation, memory recall)
    pub fn take(&mut self, card: CardId) -> Result<CardId> {
        match self.cards.iter().position(|c| *c == card) {
            Some(pos) => Ok(self.cards.remove(pos)),
            None => Err(DragonError::IllegalEffect(format!(
                "{card} is not in the {:?} discard pile",
                self.kind
            ))),
        }
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Listing of the pile contents in the given display language
    pub fn show_cards(&self, lang: Language) -> String {
        let header = match (self.kind, lang) {
            (DiscardKind::Minor, Language::English) => {
                "Cards in the minor cards discard pile:\n"
            }
            (DiscardKind::Action, Language::English) => {
                "Cards in the Action cards discard pile:\n"
            }
            (DiscardKind::Minor, Language::French) => {
                "Cartes dans la défausse des cartes mineures :\n"
            }
            (DiscardKind::Action, Language::French) => {
                "Cartes dans la défausse des cartes Action :\n"
            }
        };

        let mut text = header.to_string();
        for card in &self.cards {
            text.push_str("- ");
            text.push_str(&catalog::display(lang, *card).replace('_', " "));
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::{MinorRank, Suit};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_standard_compositions() {
        assert_eq!(DrawPile::standard_minor().remaining(), 57);
        assert_eq!(DrawPile::standard_major().remaining(), 21);
        assert!(!DrawPile::standard_major()
            .remaining_cards()
            .contains(&CardId::Major(Arcana::Death)));
    }

    #[test]
    fn test_draw_bounds() {
        let mut rng = rng();
        let mut pile = DrawPile::standard_major();

        // Zero draw is an input error, not an empty result
        assert!(matches!(
            pile.draw(0, &mut rng),
            Err(DragonError::InvalidDraw(_))
        ));

        let drawn = pile.draw(5, &mut rng).unwrap();
        assert_eq!(drawn.len(), 5);
        assert_eq!(pile.remaining(), 16);

        // Asking for more than remain returns what is left, never errors
        let rest = pile.draw(100, &mut rng).unwrap();
        assert_eq!(rest.len(), 16);
        assert!(pile.is_empty());
        assert_eq!(pile.state(), PileState::Empty);
    }

    #[test]
    fn test_draws_have_no_replacement() {
        let mut rng = rng();
        let mut pile = DrawPile::standard_minor();
        let mut seen = pile.draw(57, &mut rng).unwrap();
        seen.sort_by_key(|c| format!("{c:?}"));
        seen.dedup();
        assert_eq!(seen.len(), 57);
    }

    #[test]
    fn test_distribute_fairness() {
        let mut rng = rng();
        let mut pile = DrawPile::standard_minor();
        let mut hands: Vec<Vec<CardId>> = vec![Vec::new(); 4];

        pile.distribute(5, 2, &mut hands, &mut rng).unwrap();

        for hand in &hands {
            assert_eq!(hand.len(), 5);
        }
        assert_eq!(pile.remaining(), 57 - 20);
    }

    #[test]
    fn test_distribute_is_reentrant() {
        let mut rng = rng();
        let mut pile = DrawPile::standard_minor();
        let mut hands: Vec<Vec<CardId>> = vec![Vec::new(); 3];

        pile.distribute(2, 0, &mut hands, &mut rng).unwrap();
        pile.distribute(1, 1, &mut hands, &mut rng).unwrap();

        for hand in &hands {
            assert_eq!(hand.len(), 3);
        }
    }

    #[test]
    fn test_reset_restores_full_composition() {
        let mut rng = rng();
        let mut pile = DrawPile::standard_major();
        pile.draw(10, &mut rng).unwrap();
        assert_eq!(pile.state(), PileState::Partial);

        pile.reset();
        assert_eq!(pile.state(), PileState::Full);
        assert_eq!(pile.remaining(), 21);
    }

    #[test]
    fn test_discard_take() {
        let mut discard = DiscardPile::new(DiscardKind::Action);
        let card = CardId::Major(Arcana::Moon);
        discard.push(card);

        assert!(discard.contains(card));
        assert_eq!(discard.take(card).unwrap(), card);
        assert!(discard.is_empty());
        assert!(discard.take(card).is_err());
    }

    #[test]
    fn test_show_cards_listing() {
        let mut discard = DiscardPile::new(DiscardKind::Minor);
        discard.push(CardId::Minor(Suit::Cups, MinorRank::Ace));

        let listing = discard.show_cards(Language::English);
        assert!(listing.starts_with("Cards in the minor cards discard pile:"));
        assert!(listing.contains("ace of cups"));
    }
}
