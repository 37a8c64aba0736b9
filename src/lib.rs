//! Monster Battle Engine
//!
//! Turn-based resolution of one-on-one monster battles: attacks, items,
//! held-item triggers, fleeing, permanent losses, a two-phase final boss and
//! post-victory growth. All content comes from an immutable catalog and all
//! randomness from an injectable source, so every battle can be replayed.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod config;
pub mod encounter;
pub mod errors;
pub mod monster;
pub mod player;
pub mod progression;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    AttackData, HoldHeal, ItemData, ItemEffect, ItemUse, RestoreAmount, SpeciesData, StatBlock,
    StatType,
};

// --- From this crate's modules (`src/`) ---

// Battle flow.
pub use battle::events::{BattleEvent, BattleOutcome, EventBus, Side};
pub use battle::rng::{RandomSource, ScriptedRng, SeededRng};
pub use battle::runner::{run_battle, AutoPilot, BattleRun, DecisionMaker};
pub use battle::session::{BattleReport, BattleSession, BattleState, ItemTarget, PlayerDecision};

// Content and runtime types.
pub use catalog::ContentCatalog;
pub use config::BattleConfig;
pub use encounter::{next_enemy, EncounterKind};
pub use monster::{Monster, MonsterRecord};
pub use player::{Inventory, Player, PlayerRecord};
pub use progression::Rewards;

// Crate-specific error and result types.
pub use errors::{
    ActionError, ActionResult, BattleEngineError, BattleResult, ConfigError, ContentError,
    ContentResult, LoadError, LoadResult,
};
