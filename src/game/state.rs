//! Root game state
//!
//! Owns the players, the four shared piles, the turn structure and the
//! ambient pieces (deterministic RNG, logger). All card movement goes through
//! the pile and player contracts, never through aliased raw containers, so
//! the single-actor turn discipline serializes every mutation.

use crate::config::GameSettings;
use crate::core::card::CardId;
use crate::core::player::Player;
use crate::game::logger::GameLogger;
use crate::game::phase::{Stage, TurnStructure};
use crate::piles::{DiscardKind, DiscardPile, DrawPile};
use crate::{DragonError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

/// Minor cards dealt to each player at setup
pub const INITIAL_HAND_SIZE: usize = 5;
/// Major cards dealt to each reserve at setup
pub const INITIAL_RESERVE_SIZE: usize = 1;

pub struct GameState {
    pub settings: GameSettings,
    pub players: Vec<Player>,
    pub turn: TurnStructure,
    pub stage: Stage,
    pub minor_draw: DrawPile,
    pub minor_discard: DiscardPile,
    pub major_draw: DrawPile,
    pub action_discard: DiscardPile,
    pub rng: ChaCha8Rng,
    pub logger: GameLogger,
}

impl GameState {
    /// Build a fresh game from validated settings and deal the opening hands
    pub fn new(settings: GameSettings) -> Result<Self> {
        settings.validate()?;

        let mut players: Vec<Player> = settings
            .player_names
            .iter()
            .map(|name| Player::new(name.as_str(), settings.language))
            .collect();
        for i in 0..settings.n_bots {
            players.push(Player::new(format!("Bot_{}", i + 1), settings.language));
        }

        let mut state = GameState {
            players,
            turn: TurnStructure::new(0),
            stage: Stage::PhaseOne,
            minor_draw: DrawPile::standard_minor(),
            minor_discard: DiscardPile::new(DiscardKind::Minor),
            major_draw: DrawPile::standard_major(),
            action_discard: DiscardPile::new(DiscardKind::Action),
            rng: ChaCha8Rng::seed_from_u64(settings.seed),
            logger: GameLogger::new(),
            settings,
        };
        state.deal_opening()?;
        Ok(state)
    }

    /// Deal the opening hands: 5 minors round-robin from the active player,
    /// then one major to each reserve.
    fn deal_opening(&mut self) -> Result<()> {
        let n = self.players.len();
        let start = self.turn.active_player_idx;

        let mut hands: Vec<Vec<CardId>> = vec![Vec::new(); n];
        self.minor_draw
            .distribute(INITIAL_HAND_SIZE, start, &mut hands, &mut self.rng)?;
        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.adds_to_hand(hand);
        }

        for offset in 0..n {
            let idx = (start + offset) % n;
            self.players[idx].draws_from(
                &mut self.major_draw,
                INITIAL_RESERVE_SIZE,
                &mut self.rng,
            )?;
        }
        Ok(())
    }

    pub fn n_players(&self) -> usize {
        self.players.len()
    }

    pub fn active_player(&self) -> &Player {
        &self.players[self.turn.active_player_idx]
    }

    pub fn active_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.turn.active_player_idx]
    }

    /// Next seat in play direction, eliminated seats included
    pub fn next_seat(&self, idx: usize) -> usize {
        (idx + 1) % self.players.len()
    }

    /// Right-hand neighbor (against the play direction), eliminated seats included
    pub fn right_neighbor(&self, idx: usize) -> usize {
        (idx + self.players.len() - 1) % self.players.len()
    }

    /// Next non-eliminated seat after `idx`, or `None` when nobody can act
    pub fn next_active_seat(&self, idx: usize) -> Option<usize> {
        let n = self.players.len();
        for offset in 1..=n {
            let candidate = (idx + offset) % n;
            if !self.players[candidate].eliminated {
                return Some(candidate);
            }
        }
        None
    }

    /// Seats of non-eliminated opponents of `idx`, in play order
    pub fn opponents_of(&self, idx: usize) -> Vec<usize> {
        let n = self.players.len();
        (1..n)
            .map(|offset| (idx + offset) % n)
            .filter(|&seat| !self.players[seat].eliminated)
            .collect()
    }

    /// Borrow two distinct players mutably
    pub fn two_players_mut(&mut self, a: usize, b: usize) -> (&mut Player, &mut Player) {
        assert_ne!(a, b, "cannot borrow the same seat twice");
        if a < b {
            let (left, right) = self.players.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.players.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Move `n` random cards from `source`'s hand to `taker`'s hand
    pub fn draw_from_hand(&mut self, taker: usize, source: usize, n: usize) -> Result<()> {
        if taker == source {
            return Err(DragonError::IllegalAction(
                "a player cannot draw from their own hand".to_string(),
            ));
        }
        // Split the borrow so the RNG stays usable alongside both players
        let mut rng = self.rng.clone();
        let (taker_ref, source_ref) = self.two_players_mut(taker, source);
        let cards = source_ref.take_random_from_hand(n, &mut rng)?;
        taker_ref.adds_to_hand(cards);
        self.rng = rng;
        Ok(())
    }

    /// Verify global conservation: every card of the pack exists exactly once
    /// across piles, hands, reserves, tableaus, attachments and permanents.
    pub fn audit_conservation(&self) -> Result<()> {
        let mut counts: FxHashMap<CardId, u32> = FxHashMap::default();
        let mut bump = |card: CardId, counts: &mut FxHashMap<CardId, u32>| {
            *counts.entry(card).or_insert(0) += 1;
        };

        for &card in self.minor_draw.remaining_cards() {
            bump(card, &mut counts);
        }
        for &card in self.major_draw.remaining_cards() {
            bump(card, &mut counts);
        }
        for &card in self.minor_discard.cards() {
            bump(card, &mut counts);
        }
        for &card in self.action_discard.cards() {
            bump(card, &mut counts);
        }
        for player in &self.players {
            for &card in &player.hand {
                bump(card, &mut counts);
            }
            for &card in &player.major_reserve {
                bump(card, &mut counts);
            }
            for &card in &player.active_permanents {
                bump(card, &mut counts);
            }
            for &card in &player.inactive_permanents {
                bump(card, &mut counts);
            }
            for combo in &player.combinations {
                for &card in &combo.cards {
                    bump(card, &mut counts);
                }
                for &card in &combo.attachments {
                    bump(card, &mut counts);
                }
            }
        }

        for card in CardId::all_majors().chain(CardId::all_minors()) {
            match counts.get(&card).copied().unwrap_or(0) {
                1 => {}
                n => {
                    return Err(DragonError::ConservationViolation(format!(
                        "{card} appears {n} times across the game state"
                    )))
                }
            }
        }
        Ok(())
    }
}
