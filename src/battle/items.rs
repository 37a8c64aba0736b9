use crate::battle::calculators::{heal_amount, round_half_up};
use crate::battle::events::{BattleEvent, EventBus, ItemFailureReason};
use crate::battle::rng::RandomSource;
use crate::config::BattleConfig;
use crate::encounter::EncounterKind;
use crate::errors::{ActionError, ActionResult};
use crate::monster::Monster;
use crate::player::Inventory;
use schema::{HoldHeal, ItemData, ItemEffect, RestoreAmount};
use tracing::debug;

/// Result of applying an item. Removing a used item is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemOutcome {
    pub used: bool,
    /// The battle ends as fled.
    pub flee: bool,
}

impl ItemOutcome {
    fn used() -> Self {
        Self {
            used: true,
            flee: false,
        }
    }

    fn failed() -> Self {
        Self::default()
    }
}

/// Who an item acts on.
///
/// `holder` is the monster the item helps (heals land here); `opponent` is
/// the monster it hurts (direct damage lands here).
pub struct ItemTargets<'m> {
    pub holder: Option<&'m mut Monster>,
    pub opponent: Option<&'m mut Monster>,
}

impl<'m> ItemTargets<'m> {
    pub fn new(holder: Option<&'m mut Monster>, opponent: Option<&'m mut Monster>) -> Self {
        Self { holder, opponent }
    }
}

pub struct ItemResolver<'a> {
    config: &'a BattleConfig,
}

impl<'a> ItemResolver<'a> {
    pub fn new(config: &'a BattleConfig) -> Self {
        Self { config }
    }

    /// Apply `item`. Fails with `MissingTarget` when the effect needs a monster that was not supplied.
    pub fn apply(
        &self,
        item: &ItemData,
        inventory: &mut Inventory,
        encounter: EncounterKind,
        targets: ItemTargets<'_>,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> ActionResult<ItemOutcome> {
        let missing = || ActionError::MissingTarget(item.name.clone());

        let outcome = match &item.effect {
            ItemEffect::Heal(spec) => {
                let target = targets.holder.ok_or_else(missing)?;
                if target.current_hp() >= target.max_hp() {
                    Self::fail(item, ItemFailureReason::AlreadyFullHp, bus)
                } else {
                    let gain = heal_amount(target.current_hp(), target.max_hp(), *spec);
                    Self::announce(item, Some(&*target), bus);
                    let applied = target.apply_hp_change(gain);
                    bus.push(BattleEvent::HealApplied {
                        target: target.name.clone(),
                        amount: applied,
                        new_hp: target.current_hp(),
                    });
                    ItemOutcome::used()
                }
            }
            ItemEffect::FullHealPercent(percent) => {
                let target = targets.holder.ok_or_else(missing)?;
                let before = target.current_hp();
                let hp = round_half_up(f64::from(target.max_hp()) * *percent as f64 / 100.0);
                Self::announce(item, Some(&*target), bus);
                target.set_hp_unclamped_above(hp.clamp(0, i64::from(u32::MAX)) as u32);
                bus.push(BattleEvent::HealApplied {
                    target: target.name.clone(),
                    amount: i64::from(target.current_hp()) - i64::from(before),
                    new_hp: target.current_hp(),
                });
                ItemOutcome::used()
            }
            ItemEffect::CapacityIncrease(offered) => {
                if inventory.capacity < *offered {
                    inventory.capacity = *offered;
                    Self::announce(item, None, bus);
                    bus.push(BattleEvent::BagExpanded {
                        capacity: inventory.capacity,
                    });
                    ItemOutcome::used()
                } else {
                    Self::fail(
                        item,
                        ItemFailureReason::CapacityNotIncreased {
                            capacity: inventory.capacity,
                            offered: *offered,
                        },
                        bus,
                    )
                }
            }
            ItemEffect::DirectDamage {
                amount,
                crit_chance,
            } => {
                let target = targets.opponent.ok_or_else(missing)?;
                let mut damage = *amount;
                if let Some(chance) = crit_chance {
                    if rng.chance(u32::from(*chance), "item crit roll") {
                        damage = round_half_up(f64::from(damage) * self.config.crit_multiplier)
                            .clamp(0, i64::from(u32::MAX)) as u32;
                        bus.push(BattleEvent::CriticalHit {
                            attacker: item.name.clone(),
                            defender: target.name.clone(),
                        });
                    }
                }
                Self::announce(item, Some(&*target), bus);
                target.apply_damage(damage);
                bus.push(BattleEvent::DamageApplied {
                    target: target.name.clone(),
                    amount: damage,
                    remaining_hp: target.current_hp(),
                });
                ItemOutcome::used()
            }
            ItemEffect::Escape => {
                if encounter.is_boss() {
                    Self::fail(item, ItemFailureReason::NoEscapingBoss, bus)
                } else {
                    Self::announce(item, None, bus);
                    bus.push(BattleEvent::EscapeSucceeded);
                    ItemOutcome {
                        used: true,
                        flee: true,
                    }
                }
            }
            ItemEffect::HoldHeal(_) | ItemEffect::SharedXp | ItemEffect::Inert => {
                Self::fail(item, ItemFailureReason::NotUsableNow, bus)
            }
        };

        debug!(item = %item.name, used = outcome.used, flee = outcome.flee, "item applied");
        Ok(outcome)
    }

    /// Per-round heal for a passive held item. Returns the HP change applied (possibly negative).
    pub fn apply_recurring_heal(
        &self,
        item: &ItemData,
        holder: &mut Monster,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> i64 {
        let ItemEffect::HoldHeal(heal) = &item.effect else {
            return 0;
        };
        let spec = match *heal {
            HoldHeal::Fixed(spec) => spec,
            HoldHeal::Range { min, max } => {
                let span = (min + max).clamp(0, i64::from(u32::MAX)) as u32;
                RestoreAmount::Percent(i64::from(rng.below(span, "hold heal percent")) - min)
            }
        };

        let gain = heal_amount(holder.current_hp(), holder.max_hp(), spec);
        if gain == 0 {
            return 0;
        }
        let applied = holder.apply_hp_change(gain);
        debug!(holder = %holder.name, item = %item.name, applied, "recurring heal");
        bus.push(BattleEvent::HealApplied {
            target: holder.name.clone(),
            amount: applied,
            new_hp: holder.current_hp(),
        });
        applied
    }

    fn announce(item: &ItemData, target: Option<&Monster>, bus: &mut EventBus) {
        bus.push(BattleEvent::ItemUsed {
            item: item.name.clone(),
            target: target.map(|monster| monster.name.clone()),
        });
    }

    fn fail(item: &ItemData, reason: ItemFailureReason, bus: &mut EventBus) -> ItemOutcome {
        debug!(item = %item.name, ?reason, "item had no effect");
        bus.push(BattleEvent::ItemFailed {
            item: item.name.clone(),
            reason,
        });
        ItemOutcome::failed()
    }
}
