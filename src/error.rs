//! Error types for the Dragon engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DragonError {
    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid draw request: {0}")]
    InvalidDraw(String),

    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("Illegal effect: {0}")]
    IllegalEffect(String),

    #[error("Unresolved choice: {0}")]
    UnresolvedChoice(String),

    #[error("Conservation violation: {0}")]
    ConservationViolation(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DragonError>;
