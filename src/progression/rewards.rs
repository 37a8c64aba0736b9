use crate::battle::events::{BattleEvent, EventBus};
use crate::battle::rng::RandomSource;
use crate::config::BattleConfig;
use crate::monster::Monster;
use crate::player::Player;
use serde::{Deserialize, Serialize};
use tracing::info;

/// What a won battle offers the player. Cash is paid out immediately;
/// taking the item or the recruit is up to the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Rewards {
    pub cash: u32,
    pub dropped_item: Option<String>,
    pub recruit: Option<Monster>,
    pub center_available: bool,
}

impl Rewards {
    /// Put the dropped item in the bag. Returns false (and keeps the offer) when the bag is full.
    pub fn take_item(&mut self, player: &mut Player) -> bool {
        match self.dropped_item.take() {
            Some(item) if !player.inventory.is_full() => player.inventory.add(item),
            other => {
                self.dropped_item = other;
                false
            }
        }
    }

    /// Add the recruit to the back of the team, optionally renamed.
    pub fn take_recruit(&mut self, player: &mut Player, rename: Option<&str>) -> bool {
        let Some(mut recruit) = self.recruit.take() else {
            return false;
        };
        if let Some(name) = rename.and_then(|name| name.split_whitespace().next()) {
            recruit.name = name.to_string();
        }
        info!(recruit = %recruit.name, "recruit joined the team");
        player.team.push(recruit);
        true
    }
}

pub struct RewardGenerator<'a> {
    config: &'a BattleConfig,
}

impl<'a> RewardGenerator<'a> {
    pub fn new(config: &'a BattleConfig) -> Self {
        Self { config }
    }

    /// Roll cash, the held-item drop and the recruit offer, in that order.
    ///
    /// Expects `player.kills` to already count this victory.
    pub fn generate(
        &self,
        player: &mut Player,
        defeated: &Monster,
        rng: &mut dyn RandomSource,
        bus: &mut EventBus,
    ) -> Rewards {
        let scale = self.config.max_cash.saturating_mul(player.kills / 2 + 1);
        let cash = rng.below(scale, "cash drop") + 1;
        player.money = player.money.saturating_add(cash);
        bus.push(BattleEvent::CashDropped {
            amount: cash,
            total: player.money,
        });

        let mut recruit = defeated.clone();
        let drop_roll = rng.chance(self.config.item_drop_chance, "item drop roll");
        let dropped_item = if drop_roll { recruit.held_item.take() } else { None };
        if let Some(item) = &dropped_item {
            bus.push(BattleEvent::ItemDropOffered { item: item.clone() });
        }

        let recruit = if rng.chance(self.config.recruit_chance, "recruit roll") {
            recruit.reset_stats();
            recruit.name = recruit.tamed_name().to_string();
            bus.push(BattleEvent::RecruitOffered {
                monster: recruit.name.clone(),
            });
            Some(recruit)
        } else {
            None
        };

        let center_available = player.kills % self.config.center_interval.max(1) == 0;
        if center_available {
            bus.push(BattleEvent::CenterFound);
        }

        info!(
            cash,
            item = ?dropped_item,
            recruit = recruit.is_some(),
            center_available,
            "rewards generated"
        );
        Rewards {
            cash,
            dropped_item,
            recruit,
            center_available,
        }
    }
}
