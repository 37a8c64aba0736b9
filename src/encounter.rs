//! Choosing and building the enemy for the next battle.

use crate::battle::rng::RandomSource;
use crate::catalog::ContentCatalog;
use crate::config::BattleConfig;
use crate::errors::{ContentError, ContentResult};
use crate::monster::{Monster, WILD_PREFIX};
use crate::player::Player;
use schema::SpeciesData;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Number of species at the end of the catalog reserved for the final boss.
pub const BOSS_PHASES: usize = 2;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterKind {
    Wild,
    Boss,
}

impl EncounterKind {
    pub fn is_boss(self) -> bool {
        self == EncounterKind::Boss
    }
}

/// Index of the species a wild enemy is drawn from.
///
/// Uniform over `[0, min(kills + first_species, species_count - 1))`, so new
/// species unlock as the player wins. The final species can never be drawn.
pub fn pick_wild_species(
    catalog: &ContentCatalog,
    kills: u32,
    config: &BattleConfig,
    rng: &mut dyn RandomSource,
) -> usize {
    let unlocked = (kills as usize).saturating_add(config.first_species);
    let bound = unlocked.min(catalog.species_count().saturating_sub(1));
    rng.below(bound as u32, "wild species pick") as usize
}

pub fn is_boss_due(player: &Player, config: &BattleConfig) -> bool {
    player.kills >= config.boss_kills
}

pub fn wild_enemy(
    catalog: &ContentCatalog,
    kills: u32,
    config: &BattleConfig,
    rng: &mut dyn RandomSource,
) -> ContentResult<Monster> {
    let index = pick_wild_species(catalog, kills, config, rng);
    let species = catalog.require_species(index)?;
    Ok(Monster::wild(species, kills, config, catalog, rng))
}

/// First form of the final boss: the second-to-last species, holding nothing.
pub fn boss_phase_one(
    catalog: &ContentCatalog,
    kills: u32,
    config: &BattleConfig,
    rng: &mut dyn RandomSource,
) -> ContentResult<Monster> {
    let index = boss_index(catalog, 0)?;
    let species = catalog.require_species(index)?;
    let mut boss = Monster::wild(species, kills, config, catalog, rng);
    boss.held_item = None;
    info!(boss = %boss.name, "final boss encounter");
    Ok(boss)
}

/// Template of the second boss form: the last species. Checked without
/// drawing anything.
pub fn boss_phase_two_species<'c>(
    catalog: &'c ContentCatalog,
    config: &BattleConfig,
) -> ContentResult<&'c SpeciesData> {
    let index = boss_index(catalog, 1)?;
    catalog.require_item(&config.boss_phase_two_item)?;
    catalog.require_species(index)
}

/// Build the second boss form, holding the phase-two item.
pub fn build_boss_phase_two(
    species: &SpeciesData,
    kills: u32,
    config: &BattleConfig,
    catalog: &ContentCatalog,
    rng: &mut dyn RandomSource,
) -> Monster {
    let mut boss = Monster::wild(species, kills, config, catalog, rng);
    // Only the first form carries the wild prefix
    boss.name = boss.tamed_name().to_string();
    boss.held_item = Some(config.boss_phase_two_item.clone());
    boss
}

fn boss_index(catalog: &ContentCatalog, phase: usize) -> ContentResult<usize> {
    let count = catalog.species_count();
    if count < BOSS_PHASES {
        return Err(ContentError::TooFewSpecies {
            needed: BOSS_PHASES,
            found: count,
        });
    }
    Ok(count - BOSS_PHASES + phase)
}

/// Build the next enemy for `player`: the boss once enough kills are banked, otherwise a wild monster.
pub fn next_enemy(
    catalog: &ContentCatalog,
    player: &Player,
    config: &BattleConfig,
    rng: &mut dyn RandomSource,
) -> ContentResult<(Monster, EncounterKind)> {
    if is_boss_due(player, config) {
        Ok((
            boss_phase_one(catalog, player.kills, config, rng)?,
            EncounterKind::Boss,
        ))
    } else {
        Ok((
            wild_enemy(catalog, player.kills, config, rng)?,
            EncounterKind::Wild,
        ))
    }
}

/// Whether a monster name carries the wild prefix.
pub fn is_wild_name(name: &str) -> bool {
    name.starts_with(WILD_PREFIX)
}
