//! Balance constants.
//!
//! Every number that shapes a battle lives here so that content authors can
//! tune a run without touching the engine. [`BattleConfig::default`] is the
//! shipped balance; a RON document only needs the fields it overrides.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // --- Attack resolution ---
    pub damage_multiplier: f64,
    pub crit_chance: u32,
    pub crit_multiplier: f64,
    pub evade_chance: u32,
    pub evade_divisor: f64,
    pub stat_adjective_divisor: i32,

    // --- Held items ---
    pub struggle_threshold: u32,
    pub hold_item_chance: u32,
    pub boss_phase_two_item: String,
    pub shared_xp_item: String,

    // --- Growth ---
    pub new_attack_chance: u32,
    pub max_attacks: usize,
    pub start_xp: u32,
    pub starter_attack: String,

    // --- Encounters ---
    pub enemy_xp_rate: u32,
    pub min_enemy_xp: u32,
    pub first_species: usize,
    pub boss_kills: u32,

    // --- Rewards ---
    pub max_cash: u32,
    pub item_drop_chance: u32,
    pub recruit_chance: u32,
    pub center_interval: u32,
    pub default_bag_capacity: usize,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            damage_multiplier: 2.0,
            crit_chance: 10,
            crit_multiplier: 2.0,
            evade_chance: 5,
            evade_divisor: 2.0,
            stat_adjective_divisor: 30,

            struggle_threshold: 25,
            hold_item_chance: 85,
            boss_phase_two_item: "Whistle-hoo".to_string(),
            shared_xp_item: "XP Share".to_string(),

            new_attack_chance: 65,
            max_attacks: 8,
            start_xp: 96,
            starter_attack: "Soft Slap".to_string(),

            enemy_xp_rate: 25,
            min_enemy_xp: 0,
            first_species: 3,
            boss_kills: 10,

            max_cash: 15,
            item_drop_chance: 100,
            recruit_chance: 50,
            center_interval: 2,
            default_bag_capacity: 3,
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }
}
