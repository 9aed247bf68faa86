//! Random bot controller for testing and baseline gameplay
//!
//! Makes uniformly random choices among the offered options and lays the
//! first legal combination it finds in hand. No strategy, just legality.

use crate::core::card::CardId;
use crate::core::combination;
use crate::game::controller::{GameStateView, PlayerController};
use rand::Rng;
use smallvec::SmallVec;

pub struct RandomController {
    seat: usize,
    rng: Box<dyn rand::RngCore>,
}

impl RandomController {
    /// Create a new random controller with the thread RNG
    pub fn new(seat: usize) -> Self {
        RandomController {
            seat,
            rng: Box::new(rand::thread_rng()),
        }
    }

    /// Create a random controller with a seeded RNG (deterministic testing)
    pub fn with_seed(seat: usize, seed: u64) -> Self {
        use rand::SeedableRng;
        RandomController {
            seat,
            rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }
}

impl PlayerController for RandomController {
    fn seat(&self) -> usize {
        self.seat
    }

    fn confirm(&mut self, _view: &GameStateView, _prompt: &str) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn choose_card(
        &mut self,
        _view: &GameStateView,
        _prompt: &str,
        options: &[CardId],
    ) -> Option<CardId> {
        if options.is_empty() {
            None
        } else {
            Some(options[self.rng.gen_range(0..options.len())])
        }
    }

    fn choose_seat(
        &mut self,
        _view: &GameStateView,
        _prompt: &str,
        options: &[usize],
    ) -> Option<usize> {
        if options.is_empty() {
            None
        } else {
            Some(options[self.rng.gen_range(0..options.len())])
        }
    }

    fn choose_combination(
        &mut self,
        _view: &GameStateView,
        _prompt: &str,
        options: &[(usize, usize)],
    ) -> Option<(usize, usize)> {
        if options.is_empty() {
            None
        } else {
            Some(options[self.rng.gen_range(0..options.len())])
        }
    }

    fn choose_hand_cards(&mut self, view: &GameStateView, _prompt: &str) -> SmallVec<[CardId; 5]> {
        match combination::find_any(view.hand()) {
            Some(cards) => cards.into_iter().collect(),
            None => SmallVec::new(),
        }
    }
}
