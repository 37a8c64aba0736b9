use schema::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the monster battle engine
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// Error related to catalog content lookup or validation
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error related to loading persisted records
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    /// Error related to balance configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Content integrity errors. Always raised while building the catalog, never mid-battle.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Attack not found: {0}")]
    AttackNotFound(String),
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("Species {species} starts with unknown attack {attack}")]
    UnknownSpeciesAttack { species: String, attack: String },
    #[error("Species index {0} is out of range")]
    SpeciesNotFound(usize),
    #[error("Catalog needs at least {needed} species, found {found}")]
    TooFewSpecies { needed: usize, found: usize },
    #[error("Duplicate {kind} name: {name}")]
    Duplicate { kind: &'static str, name: String },
    #[error("Malformed {document}: {source}")]
    Malformed {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to player actions. The battle is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Attack index is out of bounds
    #[error("Invalid attack index: {0}")]
    InvalidAttackIndex(usize),
    /// Team index is out of bounds
    #[error("Invalid team index: {0}")]
    InvalidTeamIndex(usize),
    #[error("{0} is not in the bag")]
    ItemNotInBag(String),
    #[error("{0} cannot be used here")]
    ItemNotUsable(String),
    #[error("{0} needs a target")]
    MissingTarget(String),
    #[error("There's no escaping a god")]
    EscapeForbidden,
    #[error("The battle is already over")]
    BattleOver,
    #[error("The battle has not finished yet")]
    BattleInProgress,
    #[error("A replacement monster must be sent out first")]
    AwaitingReplacement,
    #[error("There are no other monsters to switch to")]
    NoOtherMonsters,
    #[error("That monster is already in battle")]
    ActiveMonsterSelected,
    #[error("Monster {0} has fainted and cannot battle")]
    FaintedMonsterSelected(usize),
    #[error("The team has no monsters able to fight")]
    NoLivingMonsters,
    #[error("{requested} stat points requested but only {available} are available")]
    OverAllocated { requested: u32, available: u32 },
}

/// Errors raised while loading persisted players or monsters. Loading is all-or-nothing.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Malformed save data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Saved monster {monster} is invalid: {reason}")]
    InvalidRecord { monster: String, reason: String },
    #[error("Saved monster {monster} knows unknown attack {attack}")]
    UnknownAttack { monster: String, attack: String },
    #[error("Saved monster {monster} holds unknown item {item}")]
    UnknownItem { monster: String, item: String },
    #[error("Saved bag contains unknown item {0}")]
    UnknownBagItem(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Malformed battle config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ContentError
pub type ContentResult<T> = Result<T, ContentError>;

/// Type alias for Results using ActionError
pub type ActionResult<T> = Result<T, ActionError>;

/// Type alias for Results using LoadError
pub type LoadResult<T> = Result<T, LoadError>;
