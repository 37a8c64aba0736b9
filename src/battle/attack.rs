use crate::battle::calculators::{boost_intensity, heal_amount, physical_damage, stat_boost};
use crate::battle::events::{BattleEvent, EventBus, MissPhrasing};
use crate::battle::rng::RandomSource;
use crate::config::BattleConfig;
use crate::monster::Monster;
use schema::{AttackData, RestoreAmount, StatType};
use tracing::debug;

/// What happened when one attack was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackOutcome {
    pub hit: bool,
    pub critical: bool,
    pub evaded: bool,
    /// Damage reported for the hit, before clamping to the defender's remaining HP.
    pub damage: u32,
}

/// Applies one attack's full effect.
///
/// Draw order is fixed: hit roll (skipped for attacks that never miss), then
/// for physical attacks the critical roll and the partial-evade roll. A miss
/// draws once more to pick how it is described.
pub struct AttackResolver<'a> {
    config: &'a BattleConfig,
}

impl<'a> AttackResolver<'a> {
    pub fn new(config: &'a BattleConfig) -> Self {
        Self { config }
    }

    pub fn resolve(
        &self,
        attacker: &mut Monster,
        attack: &AttackData,
        defender: &mut Monster,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> AttackOutcome {
        bus.push(BattleEvent::AttackUsed {
            attacker: attacker.name.clone(),
            attack: attack.name.clone(),
        });

        let hit = match attack.accuracy {
            None => true,
            Some(accuracy) => rng.chance(u32::from(accuracy), "hit roll"),
        };
        if !hit {
            let phrasing = if rng.chance(50, "miss phrasing") {
                MissPhrasing::AttackerMissed
            } else {
                MissPhrasing::DefenderAvoided
            };
            debug!(attacker = %attacker.name, attack = %attack.name, "attack missed");
            bus.push(BattleEvent::AttackMissed {
                attacker: attacker.name.clone(),
                defender: defender.name.clone(),
                phrasing,
            });
            return AttackOutcome::default();
        }

        let mut outcome = AttackOutcome {
            hit: true,
            ..AttackOutcome::default()
        };

        if attack.is_physical() {
            self.apply_physical(attacker, attack, defender, rng, bus, &mut outcome);
        }
        if attack.is_status() {
            self.apply_status(attacker, attack, bus);
        }
        if attack.causes_recharge() {
            attacker.resting = true;
        }
        outcome
    }

    fn apply_physical(
        &self,
        attacker: &Monster,
        attack: &AttackData,
        defender: &mut Monster,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
        outcome: &mut AttackOutcome,
    ) {
        let mut multiplier = self.config.damage_multiplier;

        let crit_chance = attack
            .crit_rate_override()
            .map_or(self.config.crit_chance, u32::from);
        if rng.chance(crit_chance, "crit roll") {
            multiplier *= self.config.crit_multiplier;
            outcome.critical = true;
            bus.push(BattleEvent::CriticalHit {
                attacker: attacker.name.clone(),
                defender: defender.name.clone(),
            });
        }

        if rng.chance(self.config.evade_chance, "partial evade roll") {
            multiplier /= self.config.evade_divisor;
            outcome.evaded = true;
            bus.push(BattleEvent::PartialEvade {
                defender: defender.name.clone(),
            });
        }

        let damage = physical_damage(
            multiplier,
            attack.power,
            attacker.stat(StatType::Attack),
            defender.stat(StatType::Defense),
        );
        defender.apply_damage(damage);
        outcome.damage = damage;

        debug!(
            attacker = %attacker.name,
            defender = %defender.name,
            multiplier,
            damage,
            remaining_hp = defender.current_hp(),
            "physical hit"
        );
        bus.push(BattleEvent::DamageApplied {
            target: defender.name.clone(),
            amount: damage,
            remaining_hp: defender.current_hp(),
        });
    }

    /// Status deltas always target the attacker.
    fn apply_status(&self, attacker: &mut Monster, attack: &AttackData, bus: &mut EventBus) {
        for (stat, delta) in StatType::ALL.into_iter().zip(attack.stat_deltas) {
            let Some(delta) = delta else {
                continue;
            };

            if stat == StatType::Hp {
                let heal = heal_amount(
                    attacker.current_hp(),
                    attacker.max_hp(),
                    RestoreAmount::Percent(i64::from(delta)),
                );
                let amount = attacker.apply_hp_change(heal);
                debug!(monster = %attacker.name, delta, amount, "status heal");
                bus.push(BattleEvent::HealApplied {
                    target: attacker.name.clone(),
                    amount,
                    new_hp: attacker.current_hp(),
                });
                continue;
            }

            let amount = stat_boost(attacker.base_stat(stat), delta);
            attacker.adjust_stat(stat, amount);
            debug!(monster = %attacker.name, %stat, delta, amount, "status stat change");
            bus.push(BattleEvent::StatBoosted {
                target: attacker.name.clone(),
                stat,
                amount,
                delta_percent: delta,
                intensity: boost_intensity(delta, self.config.stat_adjective_divisor),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::ScriptedRng;
    use schema::{AttackCategory, SpecialEffect};
    use pretty_assertions::assert_eq;

    fn physical(power: u32, accuracy: Option<u8>) -> AttackData {
        AttackData {
            id: 1,
            name: "Tackle".to_string(),
            desc: String::new(),
            categories: vec![AttackCategory::Physical],
            effects: vec![],
            power,
            accuracy,
            stat_deltas: [None; 4],
        }
    }

    fn monsters() -> (Monster, Monster) {
        (
            Monster::new("Pip", [100, 20, 10, 10], vec!["Tackle".to_string()]),
            Monster::new("Gnar", [500, 10, 10, 10], vec!["Tackle".to_string()]),
        )
    }

    #[test]
    fn test_never_missing_attack_skips_hit_roll() {
        let config = BattleConfig::default();
        let (mut attacker, mut defender) = monsters();
        // Only crit and evade are drawn
        let mut rng = ScriptedRng::new(vec![99, 99]);
        let mut bus = EventBus::new();

        let outcome = AttackResolver::new(&config).resolve(
            &mut attacker,
            &physical(40, None),
            &mut defender,
            &mut rng,
            &mut bus,
        );
        assert_eq!(outcome.damage, 161);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_recharge_only_on_hit() {
        let config = BattleConfig::default();
        let (mut attacker, mut defender) = monsters();
        let mut attack = physical(40, Some(50));
        attack.effects = vec![SpecialEffect::Recharge];
        let resolver = AttackResolver::new(&config);

        // Miss, then phrasing
        let mut rng = ScriptedRng::new(vec![80, 10]);
        let mut bus = EventBus::new();
        resolver.resolve(&mut attacker, &attack, &mut defender, &mut rng, &mut bus);
        assert!(!attacker.resting);
        assert_eq!(defender.current_hp(), 500);

        let mut rng = ScriptedRng::new(vec![0, 99, 99]);
        resolver.resolve(&mut attacker, &attack, &mut defender, &mut rng, &mut bus);
        assert!(attacker.resting);
    }

    #[test]
    fn test_damage_never_drops_hp_below_zero() {
        let config = BattleConfig::default();
        let (mut attacker, _) = monsters();
        let mut defender = Monster::new("Tiny", [5, 1, 1, 1], vec!["Tackle".to_string()]);
        let mut rng = ScriptedRng::new(vec![0, 99, 99]);
        let mut bus = EventBus::new();

        AttackResolver::new(&config).resolve(
            &mut attacker,
            &physical(40, Some(100)),
            &mut defender,
            &mut rng,
            &mut bus,
        );
        assert_eq!(defender.current_hp(), 0);
    }
}
