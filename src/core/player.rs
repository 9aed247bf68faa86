//! Player state: hand, tableau, reserve, permanents and per-turn flags

use crate::catalog::Language;
use crate::core::card::CardId;
use crate::core::combination::Combination;
use crate::core::effects::EffectId;
use crate::piles::{DrawPile, PileKind};
use crate::{DragonError, Result};
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: impl Into<String>) -> Self {
        PlayerName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        PlayerName(s.to_string())
    }
}

impl From<String> for PlayerName {
    fn from(s: String) -> Self {
        PlayerName(s)
    }
}

/// One player's owned state
///
/// Created empty at game start and mutated throughout by the turn controller
/// and the effect resolver. Players are never removed mid-game: elimination
/// is a flag, and an eliminated player keeps their tableau for scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: PlayerName,
    /// Display-only preference; the core never formats text with it
    pub language: Language,
    pub hand: Vec<CardId>,
    pub combinations: Vec<Combination>,
    /// Drawn-but-unrevealed major cards
    pub major_reserve: Vec<CardId>,
    pub active_permanents: Vec<CardId>,
    pub inactive_permanents: Vec<CardId>,
    /// In-progress effect states (Mirror armed, Accumulator running, ...)
    pub active_effects: FxHashSet<EffectId>,
    /// Running total of Wheel of Fortune activations
    pub wheel_total: u32,
    /// Out of the game in phase 2; keeps the tableau for scoring
    pub eliminated: bool,

    // Per-turn transient flags, reset by end_turn()
    revealed_major: bool,
    played_combination: bool,
}

impl Player {
    pub fn new(name: impl Into<PlayerName>, language: Language) -> Self {
        Player {
            name: name.into(),
            language,
            hand: Vec::new(),
            combinations: Vec::new(),
            major_reserve: Vec::new(),
            active_permanents: Vec::new(),
            inactive_permanents: Vec::new(),
            active_effects: FxHashSet::default(),
            wheel_total: 0,
            eliminated: false,
            revealed_major: false,
            played_combination: false,
        }
    }

    // ===== Status checks =====

    pub fn has_empty_hand(&self) -> bool {
        self.hand.is_empty()
    }

    pub fn has_combinations(&self) -> bool {
        !self.combinations.is_empty()
    }

    pub fn has_unused_majors(&self) -> bool {
        !self.major_reserve.is_empty()
    }

    pub fn has_active_permanents(&self) -> bool {
        !self.active_permanents.is_empty()
    }

    pub fn has_inactive_permanents(&self) -> bool {
        !self.inactive_permanents.is_empty()
    }

    pub fn has_active_effects(&self) -> bool {
        !self.active_effects.is_empty()
    }

    pub fn has_card(&self, card: CardId) -> bool {
        self.hand.contains(&card)
    }

    pub fn has_revealed_major_this_turn(&self) -> bool {
        self.revealed_major
    }

    pub fn has_played_combination_this_turn(&self) -> bool {
        self.played_combination
    }

    // ===== Turn bookkeeping =====

    pub fn note_revealed_major(&mut self) {
        self.revealed_major = true;
    }

    pub fn note_played_combination(&mut self) {
        self.played_combination = true;
    }

    /// Reset the per-turn flags; called exactly once per player turn
    pub fn end_turn(&mut self) {
        self.revealed_major = false;
        self.played_combination = false;
    }

    // ===== Card movement =====

    pub fn adds_to_hand(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.hand.extend(cards);
    }

    pub fn adds_to_reserve(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.major_reserve.extend(cards);
    }

    /// Draw `n` cards from a draw pile, routed by pile identity: minor draws
    /// land in the hand, major draws in the reserve. Returns the number of
    /// cards actually drawn (short on pile exhaustion).
    pub fn draws_from(&mut self, pile: &mut DrawPile, n: usize, rng: &mut impl Rng) -> Result<usize> {
        let drawn = pile.draw(n, rng)?;
        let count = drawn.len();
        match pile.kind() {
            PileKind::MinorDraw => self.adds_to_hand(drawn),
            PileKind::MajorDraw => self.adds_to_reserve(drawn),
        }
        Ok(count)
    }

    /// Remove `n` uniformly random cards from this player's hand
    ///
    /// Unlike pile draws, underflow here is an error: the caller must have
    /// checked the hand holds at least `n` cards.
    pub fn take_random_from_hand(&mut self, n: usize, rng: &mut impl Rng) -> Result<Vec<CardId>> {
        if self.hand.len() < n {
            return Err(DragonError::IllegalAction(format!(
                "{} holds {} cards, cannot take {n}",
                self.name,
                self.hand.len()
            )));
        }
        let mut taken = Vec::with_capacity(n);
        for _ in 0..n {
            let idx = rng.gen_range(0..self.hand.len());
            taken.push(self.hand.remove(idx));
        }
        Ok(taken)
    }

    /// Remove a specific card from the hand
    pub fn remove_from_hand(&mut self, card: CardId) -> Result<CardId> {
        match self.hand.iter().position(|c| *c == card) {
            Some(pos) => Ok(self.hand.remove(pos)),
            None => Err(DragonError::IllegalAction(format!(
                "{} does not hold {card}",
                self.name
            ))),
        }
    }

    /// Remove a specific card from the major reserve
    pub fn remove_from_reserve(&mut self, card: CardId) -> Result<CardId> {
        match self.major_reserve.iter().position(|c| *c == card) {
            Some(pos) => Ok(self.major_reserve.remove(pos)),
            None => Err(DragonError::IllegalAction(format!(
                "{} has no {card} in reserve",
                self.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::{Arcana, MinorRank, Suit};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn test_new_player_is_empty() {
        let player = Player::new("Alice", Language::English);
        assert!(player.has_empty_hand());
        assert!(!player.has_combinations());
        assert!(!player.has_unused_majors());
        assert!(!player.has_active_permanents());
        assert!(!player.eliminated);
    }

    #[test]
    fn test_draws_are_routed_by_pile_kind() {
        let mut rng = rng();
        let mut player = Player::new("Bob", Language::English);
        let mut minor = DrawPile::standard_minor();
        let mut major = DrawPile::standard_major();

        player.draws_from(&mut minor, 5, &mut rng).unwrap();
        assert_eq!(player.hand.len(), 5);
        assert!(player.major_reserve.is_empty());

        player.draws_from(&mut major, 1, &mut rng).unwrap();
        assert_eq!(player.major_reserve.len(), 1);
        assert_eq!(player.hand.len(), 5);
    }

    #[test]
    fn test_hand_underflow_is_an_error() {
        let mut rng = rng();
        let mut player = Player::new("Carol", Language::French);
        player.adds_to_hand([CardId::Minor(Suit::Cups, MinorRank::Two)]);

        assert!(player.take_random_from_hand(2, &mut rng).is_err());
        // The failed take must not have mutated the hand
        assert_eq!(player.hand.len(), 1);

        let taken = player.take_random_from_hand(1, &mut rng).unwrap();
        assert_eq!(taken.len(), 1);
        assert!(player.has_empty_hand());
    }

    #[test]
    fn test_end_turn_resets_flags() {
        let mut player = Player::new("Dave", Language::English);
        player.note_revealed_major();
        player.note_played_combination();
        assert!(player.has_revealed_major_this_turn());
        assert!(player.has_played_combination_this_turn());

        player.end_turn();
        assert!(!player.has_revealed_major_this_turn());
        assert!(!player.has_played_combination_this_turn());
    }

    #[test]
    fn test_death_check() {
        let mut player = Player::new("Eve", Language::English);
        assert!(!player.has_card(CardId::Major(Arcana::Death)));
        player.adds_to_hand([CardId::Major(Arcana::Death)]);
        assert!(player.has_card(CardId::Major(Arcana::Death)));
    }
}
