//! Scripted controller replaying a recorded decision sequence
//!
//! Feeds a fixed list of decisions back to the engine, in order. Together
//! with a fixed game seed this makes whole games replayable, which is how
//! the integration tests drive deterministic scenarios. A mismatched or
//! exhausted script declines the pending decision rather than guessing.

use crate::core::card::CardId;
use crate::game::controller::{GameStateView, PlayerController};
use smallvec::SmallVec;
use std::collections::VecDeque;

/// One recorded decision
#[derive(Debug, Clone)]
pub enum ScriptedDecision {
    Confirm(bool),
    Card(Option<CardId>),
    Seat(Option<usize>),
    Combination(Option<(usize, usize)>),
    HandCards(Vec<CardId>),
}

pub struct ScriptedController {
    seat: usize,
    script: VecDeque<ScriptedDecision>,
}

impl ScriptedController {
    pub fn new(seat: usize, script: impl IntoIterator<Item = ScriptedDecision>) -> Self {
        ScriptedController {
            seat,
            script: script.into_iter().collect(),
        }
    }

    /// Decisions not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn next(&mut self) -> Option<ScriptedDecision> {
        self.script.pop_front()
    }
}

impl PlayerController for ScriptedController {
    fn seat(&self) -> usize {
        self.seat
    }

    fn confirm(&mut self, _view: &GameStateView, _prompt: &str) -> bool {
        match self.next() {
            Some(ScriptedDecision::Confirm(answer)) => answer,
            _ => false,
        }
    }

    fn choose_card(
        &mut self,
        _view: &GameStateView,
        _prompt: &str,
        options: &[CardId],
    ) -> Option<CardId> {
        match self.next() {
            Some(ScriptedDecision::Card(choice)) => choice.filter(|c| options.contains(c)),
            _ => None,
        }
    }

    fn choose_seat(
        &mut self,
        _view: &GameStateView,
        _prompt: &str,
        options: &[usize],
    ) -> Option<usize> {
        match self.next() {
            Some(ScriptedDecision::Seat(choice)) => choice.filter(|s| options.contains(s)),
            _ => None,
        }
    }

    fn choose_combination(
        &mut self,
        _view: &GameStateView,
        _prompt: &str,
        options: &[(usize, usize)],
    ) -> Option<(usize, usize)> {
        match self.next() {
            Some(ScriptedDecision::Combination(choice)) => {
                choice.filter(|c| options.contains(c))
            }
            _ => None,
        }
    }

    fn choose_hand_cards(&mut self, _view: &GameStateView, _prompt: &str) -> SmallVec<[CardId; 5]> {
        match self.next() {
            Some(ScriptedDecision::HandCards(cards)) => cards.into_iter().collect(),
            _ => SmallVec::new(),
        }
    }
}
