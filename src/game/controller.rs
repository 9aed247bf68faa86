//! Player controller trait and game state view
//!
//! The interface between the engine and the decision makers (bots or the
//! interactive front end). The engine pulls one decision at a time from the
//! controller of the acting player; every decision kind is a closed, typed
//! callback over a read-only view of the game state. The core never
//! interprets free text. Recording the returned values is enough to replay a
//! game (see `ScriptedController`).

use crate::core::card::CardId;
use crate::core::combination::Combination;
use crate::core::player::Player;
use crate::game::phase::Stage;
use crate::game::state::GameState;
use smallvec::SmallVec;

/// Read-only view of the game state from one seat's perspective
///
/// Controllers only inspect this view to make decisions; all mutation goes
/// through the engine.
pub struct GameStateView<'a> {
    game: &'a GameState,
    seat: usize,
}

impl<'a> GameStateView<'a> {
    pub fn new(game: &'a GameState, seat: usize) -> Self {
        GameStateView { game, seat }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn stage(&self) -> Stage {
        self.game.stage
    }

    fn me(&self) -> &Player {
        &self.game.players[self.seat]
    }

    /// Cards in this seat's hand
    pub fn hand(&self) -> &[CardId] {
        &self.me().hand
    }

    /// This seat's unrevealed major cards
    pub fn reserve(&self) -> &[CardId] {
        &self.me().major_reserve
    }

    /// This seat's revealed, active permanents
    pub fn active_permanents(&self) -> &[CardId] {
        &self.me().active_permanents
    }

    /// This seat's laid combinations
    pub fn combinations(&self) -> &[Combination] {
        &self.me().combinations
    }

    /// Combinations laid before any seat (public information)
    pub fn combinations_of(&self, seat: usize) -> &[Combination] {
        &self.game.players[seat].combinations
    }

    /// Hand sizes are public information; hand contents are not
    pub fn hand_size_of(&self, seat: usize) -> usize {
        self.game.players[seat].hand.len()
    }

    pub fn minor_pile_remaining(&self) -> usize {
        self.game.minor_draw.remaining()
    }

    pub fn major_pile_remaining(&self) -> usize {
        self.game.major_draw.remaining()
    }

    /// The open action discard pile
    pub fn action_discard(&self) -> &[CardId] {
        self.game.action_discard.cards()
    }

    /// The open minor discard pile
    pub fn minor_discard(&self) -> &[CardId] {
        self.game.minor_discard.cards()
    }

    /// Non-eliminated opponents of this seat, in play order
    pub fn opponents(&self) -> Vec<usize> {
        self.game.opponents_of(self.seat)
    }

    pub fn player_name(&self, seat: usize) -> &str {
        self.game.players[seat].name.as_str()
    }
}

/// Player controller trait
///
/// Implement this to connect a bot or a UI. The engine calls one method per
/// pending decision; returning `None` (or `false`, or an empty selection)
/// declines an optional action. The engine validates every returned value
/// and rejects illegal ones without mutating state.
pub trait PlayerController {
    /// The seat this controller is responsible for
    fn seat(&self) -> usize;

    /// Yes/no decision
    fn confirm(&mut self, view: &GameStateView, prompt: &str) -> bool;

    /// Pick one card from an enumerated list, or decline
    fn choose_card(
        &mut self,
        view: &GameStateView,
        prompt: &str,
        options: &[CardId],
    ) -> Option<CardId>;

    /// Pick a target seat from an enumerated list, or decline
    fn choose_seat(
        &mut self,
        view: &GameStateView,
        prompt: &str,
        options: &[usize],
    ) -> Option<usize>;

    /// Pick a target combination as (seat, index in that seat's tableau)
    fn choose_combination(
        &mut self,
        view: &GameStateView,
        prompt: &str,
        options: &[(usize, usize)],
    ) -> Option<(usize, usize)>;

    /// Pick the hand cards to lay as a new combination; empty declines
    fn choose_hand_cards(&mut self, view: &GameStateView, prompt: &str) -> SmallVec<[CardId; 5]>;

    /// Called once when the game ends, with the final scores per seat
    fn on_game_end(&mut self, _view: &GameStateView, _scores: &[(usize, u32)]) {}
}
