//! Game stages and the fixed 5-step turn sequence

use serde::{Deserialize, Serialize};

/// Stage of a round
///
/// `PhaseOne` runs while the minor draw pile holds cards; its exhaustion at
/// end-of-turn moves the game to `PhaseTwo`, where draws come from opponents'
/// hands and empty-handed players are eliminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    PhaseOne,
    PhaseTwo,
    GameOver,
}

/// Steps within one player's turn, in fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStep {
    /// 1. Activate a revealed permanent card (optional)
    ActivatePermanent,
    /// 2. Draw one minor card (neighbor hand in phase 2 or when the pile is empty)
    DrawCard,
    /// 3. Reveal one major card from the reserve, triggering its effect (optional)
    RevealMajor,
    /// 4. Create or extend a combination (optional)
    PlayCombination,
    /// 5. Draw one major card, only if step 4 succeeded and the pile has cards
    DrawMajor,
}

impl TurnStep {
    /// The next step in turn order, `None` at end of turn
    pub fn next(&self) -> Option<TurnStep> {
        match self {
            TurnStep::ActivatePermanent => Some(TurnStep::DrawCard),
            TurnStep::DrawCard => Some(TurnStep::RevealMajor),
            TurnStep::RevealMajor => Some(TurnStep::PlayCombination),
            TurnStep::PlayCombination => Some(TurnStep::DrawMajor),
            TurnStep::DrawMajor => None,
        }
    }
}

/// Current turn bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStructure {
    /// Current turn number (starts at 1)
    pub turn_number: u32,
    pub current_step: TurnStep,
    /// Index of the active player in `GameState::players`
    pub active_player_idx: usize,
}

impl TurnStructure {
    pub fn new(starting_idx: usize) -> Self {
        TurnStructure {
            turn_number: 1,
            current_step: TurnStep::ActivatePermanent,
            active_player_idx: starting_idx,
        }
    }

    /// Advance to the next step; false at end of turn
    pub fn advance_step(&mut self) -> bool {
        if let Some(next) = self.current_step.next() {
            self.current_step = next;
            true
        } else {
            false
        }
    }

    /// Start a new turn for the given player
    pub fn next_turn(&mut self, next_idx: usize) {
        self.turn_number += 1;
        self.current_step = TurnStep::ActivatePermanent;
        self.active_player_idx = next_idx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_progression() {
        let mut step = TurnStep::ActivatePermanent;
        let mut seen = vec![step];
        while let Some(next) = step.next() {
            step = next;
            seen.push(step);
        }
        assert_eq!(
            seen,
            vec![
                TurnStep::ActivatePermanent,
                TurnStep::DrawCard,
                TurnStep::RevealMajor,
                TurnStep::PlayCombination,
                TurnStep::DrawMajor,
            ]
        );
    }

    #[test]
    fn test_turn_structure() {
        let mut turn = TurnStructure::new(0);
        assert_eq!(turn.turn_number, 1);
        assert_eq!(turn.current_step, TurnStep::ActivatePermanent);

        while turn.advance_step() {}
        assert_eq!(turn.current_step, TurnStep::DrawMajor);

        turn.next_turn(1);
        assert_eq!(turn.turn_number, 2);
        assert_eq!(turn.current_step, TurnStep::ActivatePermanent);
        assert_eq!(turn.active_player_idx, 1);
    }
}
