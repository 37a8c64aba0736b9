use crate::battle::attack::AttackResolver;
use crate::battle::events::{BattleEvent, EventBus, Side};
use crate::battle::items::{ItemResolver, ItemTargets};
use crate::battle::rng::RandomSource;
use crate::catalog::ContentCatalog;
use crate::config::BattleConfig;
use crate::encounter::EncounterKind;
use crate::monster::Monster;
use crate::player::Inventory;
use schema::StatType;
use tracing::{debug, warn};

/// Who acts first this round.
///
/// The player only goes first with strictly higher current speed; a tie goes
/// to the enemy.
pub fn determine_action_order(player: &Monster, enemy: &Monster) -> [Side; 2] {
    if player.stat(StatType::Speed) > enemy.stat(StatType::Speed) {
        [Side::Player, Side::Enemy]
    } else {
        [Side::Enemy, Side::Player]
    }
}

/// Runs one round: both attacks in speed order, then automatic held items.
pub struct TurnScheduler<'a> {
    catalog: &'a ContentCatalog,
    config: &'a BattleConfig,
}

impl<'a> TurnScheduler<'a> {
    pub fn new(catalog: &'a ContentCatalog, config: &'a BattleConfig) -> Self {
        Self { catalog, config }
    }

    /// Execute a full round. `player_attack` must already be a valid index.
    ///
    /// Returns true when a held item ended the battle by escape.
    #[allow(clippy::too_many_arguments)]
    pub fn execute_round(
        &self,
        player_attack: usize,
        player: &mut Monster,
        enemy: &mut Monster,
        inventory: &mut Inventory,
        encounter: EncounterKind,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> bool {
        let order = determine_action_order(player, enemy);
        debug!(?order, "action order");

        for side in order {
            if player.is_fainted() || enemy.is_fainted() {
                break;
            }
            match side {
                Side::Player => self.perform_attack(player, player_attack, enemy, rng, bus),
                Side::Enemy => self.enemy_attack(enemy, player, rng, bus),
            }
        }

        if !player.is_fainted()
            && self.check_held_item(player, enemy, inventory, encounter, rng, bus)
        {
            return true;
        }
        if !enemy.is_fainted() {
            return self.check_held_item(enemy, player, inventory, encounter, rng, bus);
        }
        false
    }

    /// The enemy picks one of its attacks uniformly at random.
    ///
    /// The pick is drawn even when the enemy is resting.
    pub fn enemy_attack(
        &self,
        enemy: &mut Monster,
        target: &mut Monster,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) {
        let pick = rng.below(enemy.attacks.len() as u32, "enemy attack pick") as usize;
        self.perform_attack(enemy, pick, target, rng, bus);
    }

    pub fn perform_attack(
        &self,
        attacker: &mut Monster,
        attack_index: usize,
        defender: &mut Monster,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) {
        if attacker.resting {
            attacker.resting = false;
            bus.push(BattleEvent::MustRecharge {
                monster: attacker.name.clone(),
            });
            return;
        }

        let Some(name) = attacker.attacks.get(attack_index) else {
            warn!(monster = %attacker.name, attack_index, "attack slot is empty");
            return;
        };
        let Some(attack) = self.catalog.attack(name) else {
            warn!(monster = %attacker.name, attack = %name, "attack missing from catalog");
            return;
        };
        AttackResolver::new(self.config).resolve(attacker, attack, defender, rng, bus);
    }

    /// Automatic held-item activation for one monster.
    ///
    /// Recurring heals fire every round. Any other hold-eligible item fires
    /// once its holder is struggling and is consumed when it takes effect.
    /// Returns true when the item made the holder's side flee.
    pub fn check_held_item(
        &self,
        holder: &mut Monster,
        opponent: &mut Monster,
        inventory: &mut Inventory,
        encounter: EncounterKind,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> bool {
        let Some(name) = holder.held_item.clone() else {
            return false;
        };
        let Some(item) = self.catalog.item(&name) else {
            warn!(holder = %holder.name, item = %name, "held item missing from catalog");
            return false;
        };
        if !item.hold_item {
            return false;
        }

        let resolver = ItemResolver::new(self.config);
        if item.effect.is_recurring_heal() {
            resolver.apply_recurring_heal(item, holder, rng, bus);
            return false;
        }
        if !item.usage.usable_in_battle() || !holder.is_struggling(self.config.struggle_threshold) {
            return false;
        }

        bus.push(BattleEvent::HeldItemTriggered {
            holder: holder.name.clone(),
            item: name.clone(),
        });
        let targets = ItemTargets::new(Some(&mut *holder), Some(&mut *opponent));
        match resolver.apply(item, inventory, encounter, targets, rng, bus) {
            Ok(outcome) => {
                if outcome.used {
                    holder.held_item = None;
                }
                outcome.flee
            }
            Err(error) => {
                warn!(holder = %holder.name, item = %name, %error, "held item could not be applied");
                false
            }
        }
    }
}
