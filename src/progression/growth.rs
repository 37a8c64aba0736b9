use crate::battle::calculators::{split_xp, xp_base_and_variance};
use crate::battle::events::{BattleEvent, EventBus};
use crate::battle::rng::RandomSource;
use crate::catalog::ContentCatalog;
use crate::config::BattleConfig;
use crate::monster::Monster;
use crate::player::Player;
use schema::{ItemEffect, StatType};
use tracing::{debug, info};

/// Post-victory stat growth and attack learning.
pub struct GrowthDistributor<'a> {
    catalog: &'a ContentCatalog,
    config: &'a BattleConfig,
}

impl<'a> GrowthDistributor<'a> {
    pub fn new(catalog: &'a ContentCatalog, config: &'a BattleConfig) -> Self {
        Self { catalog, config }
    }

    /// XP for beating `defeated`: `(hp + def) / 2` of its base stats plus a roll below half of that.
    pub fn generate_xp(&self, defeated: &Monster, rng: &mut dyn RandomSource) -> u32 {
        let (base, variance) = xp_base_and_variance(&defeated.base_stats);
        base + rng.below(variance, "xp variance")
    }

    /// Add `xp` to the monster's pool and spend all of it on permanent stat growth.
    pub fn distribute_xp(&self, monster: &mut Monster, xp: u32, bus: &mut EventBus) {
        monster.xp += xp;
        bus.push(BattleEvent::XpGained {
            monster: monster.name.clone(),
            amount: xp,
        });

        let deltas = split_xp(&monster.base_stats, monster.xp);
        for (stat, delta) in StatType::ALL.into_iter().zip(deltas) {
            monster.grow_stat(stat, delta);
        }
        debug!(monster = %monster.name, xp = monster.xp, ?deltas, "xp distributed");
        monster.xp = 0;
    }

    /// Maybe teach the monster one new attack.
    ///
    /// Candidates are every unknown attack in identifier order; the pick is
    /// biased toward the front of that list and reaches further as `kills`
    /// grows.
    pub fn maybe_learn_attack(
        &self,
        monster: &mut Monster,
        kills: u32,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> Option<String> {
        if monster.attacks.is_empty() || monster.attacks.len() >= self.config.max_attacks {
            return None;
        }
        if !rng.chance(self.config.new_attack_chance, "learn attack roll") {
            return None;
        }

        let pool: Vec<&str> = self
            .catalog
            .attacks_by_id()
            .into_iter()
            .map(|attack| attack.name.as_str())
            .filter(|name| !monster.knows_attack(name))
            .collect();
        if pool.is_empty() {
            return None;
        }

        let bound = kills.saturating_mul(2).max(1);
        let pick = (rng.below(bound, "learn attack pick") as usize).min(pool.len() - 1);
        let learned = pool[pick].to_string();

        info!(monster = %monster.name, attack = %learned, "attack learned");
        monster.attacks.push(learned.clone());
        bus.push(BattleEvent::MoveLearned {
            monster: monster.name.clone(),
            attack: learned.clone(),
        });
        Some(learned)
    }

    /// Whether this monster's held item shares victory XP.
    pub fn shares_xp(&self, monster: &Monster) -> bool {
        monster.held_item.as_deref().is_some_and(|held| {
            self.catalog
                .item(held)
                .is_some_and(|item| item.effect == ItemEffect::SharedXp)
                || held.eq_ignore_ascii_case(&self.config.shared_xp_item)
        })
    }

    /// Grow the front monster and every shared-XP holder after a victory.
    ///
    /// Every recipient gets the same XP, which is also added to the score.
    /// Returns the XP awarded.
    pub fn award(
        &self,
        player: &mut Player,
        defeated: &Monster,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> u32 {
        let xp = self.generate_xp(defeated, rng);
        let kills = player.kills;

        for index in 0..player.team.len() {
            if index != 0 && !self.shares_xp(&player.team[index]) {
                continue;
            }
            let monster = &mut player.team[index];
            self.distribute_xp(monster, xp, bus);
            self.maybe_learn_attack(monster, kills, rng, bus);
        }

        player.score += xp;
        info!(xp, score = player.score, "victory xp awarded");
        xp
    }
}
