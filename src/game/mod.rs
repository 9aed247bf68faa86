//! Game state, turn structure and effect resolution

pub mod controller;
pub mod logger;
pub mod phase;
pub mod random_controller;
pub mod resolver;
pub mod scoring;
pub mod scripted_controller;
pub mod state;
pub mod turn;

pub use controller::{GameStateView, PlayerController};
pub use logger::{GameLogger, VerbosityLevel};
pub use phase::{Stage, TurnStep, TurnStructure};
pub use random_controller::RandomController;
pub use resolver::{resolve, Choice, EffectOutcome, EffectTarget};
pub use scripted_controller::{ScriptedController, ScriptedDecision};
pub use state::GameState;
pub use turn::{GameEndReason, GameLoop, GameResult};
