//! Core game types and entities

pub mod card;
pub mod combination;
pub mod effects;
pub mod player;

pub use card::{Arcana, CardId, Family, MinorRank, Suit};
pub use combination::{Combination, CombinationShape};
pub use effects::{EffectId, EffectKind};
pub use player::{Player, PlayerName};
