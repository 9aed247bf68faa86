//! Dragon Engine - rules engine for "Le Jeu du Dragon"
//!
//! A turn-based card game over a tarot-style pack: 22 major cards carrying
//! special effects and four 14-card minor suits used to build combinations.
//! The engine owns the shared piles, per-player hands and tableaus, the fixed
//! turn-phase sequence, and resolution of card-triggered effects.

pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod piles;

pub use error::{DragonError, Result};
