use crate::battle::calculators::{self, round_half_up};
use crate::battle::rng::RandomSource;
use crate::catalog::ContentCatalog;
use crate::config::BattleConfig;
use crate::errors::{ActionError, ActionResult, LoadError, LoadResult};
use schema::{SpeciesData, StatBlock, StatType, NUM_STATS};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prefix given to generated enemies, dropped again when one joins the team.
pub const WILD_PREFIX: &str = "Wild ";

/// Stat every starter begins with before its owner invests XP.
pub const STARTER_BASE_STAT: u32 = 1;

/// A combat participant.
///
/// `base_stats` are the permanent ceiling; `current_stats` change during a
/// battle. Current HP stays within `[0, base HP]` except for the
/// full-heal-percent item, which may push it above the ceiling.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Monster {
    pub name: String,
    pub species_id: Option<u32>,
    pub ascii: Option<String>,
    pub xp: u32,
    pub base_stats: StatBlock,
    pub current_stats: StatBlock,
    pub attacks: Vec<String>,
    pub held_item: Option<String>,
    pub resting: bool,
}

/// A monster as it is written to a save file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonsterRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascii: Option<String>,
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default)]
    pub xp: u32,
    pub stats: Vec<u32>,
    #[serde(rename = "tempStats", default, skip_serializing_if = "Option::is_none")]
    pub temp_stats: Option<Vec<u32>>,
    pub attacks: Vec<String>,
    #[serde(rename = "holdItem", default)]
    pub hold_item: Option<String>,
}

fn add_signed(value: u32, delta: i64) -> u32 {
    (i64::from(value) + delta).clamp(0, i64::from(u32::MAX)) as u32
}

impl Monster {
    /// A bare monster with identical base and current stats.
    pub fn new(name: impl Into<String>, stats: StatBlock, attacks: Vec<String>) -> Self {
        Self {
            name: name.into(),
            species_id: None,
            ascii: None,
            xp: 0,
            base_stats: stats,
            current_stats: stats,
            attacks,
            held_item: None,
            resting: false,
        }
    }

    /// Scale a species template by the player's progress.
    ///
    /// The XP budget is spread across the stats in proportion to the template,
    /// each share rounded independently. The held item is rolled before the
    /// stats are scaled.
    pub fn wild(
        species: &SpeciesData,
        kills: u32,
        config: &BattleConfig,
        catalog: &ContentCatalog,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let budget = kills * config.enemy_xp_rate + config.min_enemy_xp;
        let held_item = if rng.chance(config.hold_item_chance, "wild hold item chance") {
            catalog.roll_hold_item(rng).map(|item| item.name.clone())
        } else {
            None
        };

        let sum = f64::from(species.stat_total().max(1));
        let mut stats = species.base_stats;
        for stat in stats.iter_mut() {
            let growth = round_half_up(f64::from(budget) * f64::from(*stat) / sum);
            *stat = add_signed(*stat, growth);
        }

        debug!(species = %species.name, budget, ?stats, ?held_item, "generated wild monster");
        Self {
            name: format!("{}{}", WILD_PREFIX, species.name),
            species_id: Some(species.id),
            ascii: Some(species.ascii.clone()),
            xp: 0,
            base_stats: stats,
            current_stats: stats,
            attacks: species.attacks.clone(),
            held_item,
            resting: false,
        }
    }

    /// A fresh starter. The first three stats receive `investments`, the
    /// last stat receives whatever is left of the starting XP.
    pub fn starter(
        name: impl Into<String>,
        investments: [u32; NUM_STATS - 1],
        config: &BattleConfig,
    ) -> ActionResult<Self> {
        let requested: u32 = investments.iter().sum();
        if requested > config.start_xp {
            return Err(ActionError::OverAllocated {
                requested,
                available: config.start_xp,
            });
        }

        let mut stats = [STARTER_BASE_STAT; NUM_STATS];
        for (stat, investment) in stats.iter_mut().zip(investments) {
            *stat += investment;
        }
        stats[NUM_STATS - 1] += config.start_xp - requested;

        Ok(Self::new(name, stats, vec![config.starter_attack.clone()]))
    }

    pub fn from_record(record: MonsterRecord, catalog: &ContentCatalog) -> LoadResult<Self> {
        let invalid = |reason: String| LoadError::InvalidRecord {
            monster: record.name.clone(),
            reason,
        };

        let base_stats: StatBlock = record
            .stats
            .as_slice()
            .try_into()
            .map_err(|_| invalid(format!("expected 4 stats, found {}", record.stats.len())))?;
        let current_stats: StatBlock = match &record.temp_stats {
            Some(temp) => temp
                .as_slice()
                .try_into()
                .map_err(|_| invalid(format!("expected 4 tempStats, found {}", temp.len())))?,
            None => base_stats,
        };
        if record.attacks.is_empty() {
            return Err(invalid("knows no attacks".to_string()));
        }
        if let Some(attack) = record.attacks.iter().find(|a| catalog.attack(a).is_none()) {
            return Err(LoadError::UnknownAttack {
                monster: record.name.clone(),
                attack: attack.clone(),
            });
        }
        if let Some(item) = &record.hold_item {
            if catalog.item(item).is_none() {
                return Err(LoadError::UnknownItem {
                    monster: record.name.clone(),
                    item: item.clone(),
                });
            }
        }

        Ok(Self {
            name: record.name,
            species_id: record.id,
            ascii: record.ascii,
            xp: record.xp,
            base_stats,
            current_stats,
            attacks: record.attacks,
            held_item: record.hold_item,
            resting: false,
        })
    }

    pub fn to_record(&self) -> MonsterRecord {
        MonsterRecord {
            name: self.name.clone(),
            ascii: self.ascii.clone(),
            id: self.species_id,
            xp: self.xp,
            stats: self.base_stats.to_vec(),
            temp_stats: Some(self.current_stats.to_vec()),
            attacks: self.attacks.clone(),
            hold_item: self.held_item.clone(),
        }
    }

    pub fn from_json(json: &str, catalog: &ContentCatalog) -> LoadResult<Self> {
        let record: MonsterRecord = serde_json::from_str(json)?;
        Self::from_record(record, catalog)
    }

    pub fn to_json(&self) -> LoadResult<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    // --- Stat access ---

    pub fn stat(&self, stat: StatType) -> u32 {
        self.current_stats[stat.index()]
    }

    pub fn base_stat(&self, stat: StatType) -> u32 {
        self.base_stats[stat.index()]
    }

    pub fn current_hp(&self) -> u32 {
        self.stat(StatType::Hp)
    }

    pub fn max_hp(&self) -> u32 {
        self.base_stat(StatType::Hp)
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp() == 0
    }

    pub fn is_struggling(&self, threshold: u32) -> bool {
        calculators::is_struggling(self.current_hp(), self.max_hp(), threshold)
    }

    // --- HP mutation ---

    /// Subtract up to `amount` HP, never going below 0. Returns the HP actually lost.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp());
        self.current_stats[StatType::Hp.index()] -= lost;
        lost
    }

    /// Signed HP change, clamped to `[0, max]`. Returns the change actually applied.
    pub fn apply_hp_change(&mut self, delta: i64) -> i64 {
        let before = self.current_hp();
        let ceiling = self.max_hp().max(before);
        let after = (i64::from(before) + delta).clamp(0, i64::from(ceiling)) as u32;
        self.current_stats[StatType::Hp.index()] = after;
        i64::from(after) - i64::from(before)
    }

    /// Set HP directly. Used by full-heal-percent items, which may exceed max HP.
    pub fn set_hp_unclamped_above(&mut self, hp: u32) {
        self.current_stats[StatType::Hp.index()] = hp;
    }

    /// Adjust a current stat by a signed amount, flooring at 0.
    pub fn adjust_stat(&mut self, stat: StatType, delta: i64) {
        let index = stat.index();
        self.current_stats[index] = add_signed(self.current_stats[index], delta);
    }

    /// Permanently grow a stat. Base and current receive the same delta.
    pub fn grow_stat(&mut self, stat: StatType, delta: i64) {
        let index = stat.index();
        self.base_stats[index] = add_signed(self.base_stats[index], delta);
        self.current_stats[index] = add_signed(self.current_stats[index], delta);
    }

    // --- Checkpoints ---

    /// Restore every current stat, HP included, and clear `resting`.
    pub fn reset_stats(&mut self) {
        self.current_stats = self.base_stats;
        self.resting = false;
    }

    /// Restore every current stat except HP, and clear `resting`.
    pub fn reset_battle_stats(&mut self) {
        for stat in [StatType::Attack, StatType::Defense, StatType::Speed] {
            self.current_stats[stat.index()] = self.base_stats[stat.index()];
        }
        self.resting = false;
    }

    pub fn knows_attack(&self, name: &str) -> bool {
        self.attacks.iter().any(|known| known == name)
    }

    /// Name without the wild prefix, used when a defeated enemy joins the team.
    pub fn tamed_name(&self) -> &str {
        self.name.strip_prefix(WILD_PREFIX).unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::ScriptedRng;
    use pretty_assertions::assert_eq;

    fn catalog() -> ContentCatalog {
        ContentCatalog::bundled().unwrap()
    }

    #[test]
    fn test_wild_monster_scales_with_kills() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let species = SpeciesData {
            id: 40,
            name: "Gnar".to_string(),
            ascii: String::new(),
            base_stats: [10, 20, 30, 40],
            attacks: vec!["Tackle".to_string()],
        };
        // 99 fails the 85% hold item roll
        let mut rng = ScriptedRng::new(vec![99]);
        let monster = Monster::wild(&species, 2, &config, &catalog, &mut rng);

        // budget 50 split 5/10/15/20
        assert_eq!(monster.base_stats, [15, 30, 45, 60]);
        assert_eq!(monster.current_stats, monster.base_stats);
        assert_eq!(monster.name, "Wild Gnar");
        assert_eq!(monster.tamed_name(), "Gnar");
        assert_eq!(monster.held_item, None);
    }

    #[test]
    fn test_wild_monster_rolls_hold_item() {
        let catalog = catalog();
        let species = catalog.species(0).unwrap().clone();
        let mut rng = ScriptedRng::new(vec![0, 0]);
        let monster = Monster::wild(&species, 0, &BattleConfig::default(), &catalog, &mut rng);
        assert_eq!(monster.held_item.as_deref(), Some("Berry"));
        assert_eq!(monster.base_stats, species.base_stats);
    }

    #[test]
    fn test_starter_allocation() {
        let config = BattleConfig::default();
        let starter = Monster::starter("Pip", [40, 20, 16], &config).unwrap();
        assert_eq!(starter.base_stats, [41, 21, 17, 21]);
        assert_eq!(starter.attacks, vec!["Soft Slap".to_string()]);

        assert_eq!(
            Monster::starter("Greedy", [90, 10, 0], &config),
            Err(ActionError::OverAllocated {
                requested: 100,
                available: 96
            })
        );
    }

    #[test]
    fn test_hp_mutation_is_clamped() {
        let mut monster = Monster::new("Pip", [40, 10, 10, 10], vec!["Tackle".to_string()]);
        assert_eq!(monster.apply_damage(15), 15);
        assert_eq!(monster.apply_damage(100), 25);
        assert!(monster.is_fainted());

        assert_eq!(monster.apply_hp_change(-5), 0);
        assert_eq!(monster.apply_hp_change(100), 40);
        assert_eq!(monster.current_hp(), 40);
    }

    #[test]
    fn test_resets() {
        let mut monster = Monster::new("Pip", [40, 10, 10, 10], vec!["Tackle".to_string()]);
        monster.apply_damage(12);
        monster.adjust_stat(StatType::Attack, 6);
        monster.resting = true;

        monster.reset_battle_stats();
        assert_eq!(monster.current_stats, [28, 10, 10, 10]);
        assert!(!monster.resting);

        monster.reset_stats();
        assert_eq!(monster.current_stats, [40, 10, 10, 10]);
    }

    #[test]
    fn test_record_round_trip_and_defaults() {
        let catalog = catalog();
        let json = r#"{"name": "Pip", "xp": 3, "stats": [20, 8, 7, 9],
                       "attacks": ["Soft Slap"], "holdItem": "Berry"}"#;
        let monster = Monster::from_json(json, &catalog).unwrap();
        assert_eq!(monster.current_stats, monster.base_stats);
        assert_eq!(monster.held_item.as_deref(), Some("Berry"));

        let reloaded = Monster::from_json(&monster.to_json().unwrap(), &catalog).unwrap();
        assert_eq!(reloaded, monster);
    }

    #[test]
    fn test_record_rejects_unknown_content() {
        let catalog = catalog();
        let unknown_attack = r#"{"name": "Pip", "stats": [1, 1, 1, 1], "attacks": ["Teleport"]}"#;
        assert!(matches!(
            Monster::from_json(unknown_attack, &catalog),
            Err(LoadError::UnknownAttack { .. })
        ));

        let unknown_item =
            r#"{"name": "Pip", "stats": [1, 1, 1, 1], "attacks": ["Tackle"], "holdItem": "Gold"}"#;
        assert!(matches!(
            Monster::from_json(unknown_item, &catalog),
            Err(LoadError::UnknownItem { .. })
        ));

        let short_stats = r#"{"name": "Pip", "stats": [1, 1, 1], "attacks": ["Tackle"]}"#;
        assert!(matches!(
            Monster::from_json(short_stats, &catalog),
            Err(LoadError::InvalidRecord { .. })
        ));

        assert!(matches!(
            Monster::from_json("not json", &catalog),
            Err(LoadError::Malformed(_))
        ));
    }
}
