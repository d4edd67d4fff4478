//! Error types returned by configuration loading and simulation operations.

use thiserror::Error;

use crate::enums::{ElementType, SessionPhase};
use crate::types::DefenderId;

/// Fatal problems found while loading or validating a `GameConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config has no path waypoints")]
    MissingPath,
    #[error("config has no spawn points")]
    MissingSpawnPoints,
    #[error("time step must be positive, got {0}")]
    InvalidTimeStep(f64),
    #[error("core max health must be positive")]
    ZeroCoreHealth,
    #[error("agent template {0:?} has invalid stats")]
    InvalidAgentTemplate(String),
    #[error("defender template {0:?} has invalid stats")]
    InvalidDefenderTemplate(String),
    #[error("wave {wave} references unknown agent template {template:?}")]
    UnknownAgentTemplate { wave: usize, template: String },
    #[error("wave {wave} has a negative spawn interval")]
    InvalidInterval { wave: usize },
    #[error("wave {wave} behavior weights must be non-negative with a positive sum")]
    InvalidBehaviorWeights { wave: usize },
    #[error("element {0:?} is defined more than once")]
    DuplicateElement(ElementType),
    #[error("element {element:?} has an invalid tier at level {level}")]
    InvalidTier { element: ElementType, level: u8 },
}

/// Rejected elemental operations. State is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    #[error("defender already holds {held:?}, cannot apply {requested:?}")]
    ConflictingElement {
        held: ElementType,
        requested: ElementType,
    },
    #[error("defender already holds {0:?}")]
    AlreadyApplied(ElementType),
    #[error("upgrade to level {requested} does not exceed current level {current}")]
    NotAnUpgrade { current: u8, requested: u8 },
    #[error("element {element:?} has no tier at level {level}")]
    MissingTier { element: ElementType, level: u8 },
    #[error("defender holds no element")]
    NoElement,
}

/// Errors from engine operations and queued commands.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("no defender with id {0:?}")]
    UnknownDefender(DefenderId),
    #[error("no defender template {0:?}")]
    UnknownDefenderTemplate(String),
    #[error("insufficient funds: cost {cost}, balance {balance}")]
    InsufficientFunds { cost: u32, balance: u32 },
    #[error("operation not allowed during {0:?}")]
    WrongPhase(SessionPhase),
    #[error(transparent)]
    Element(#[from] ElementError),
}
