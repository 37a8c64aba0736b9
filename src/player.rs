use crate::catalog::ContentCatalog;
use crate::config::BattleConfig;
use crate::errors::{ActionError, ActionResult, LoadError, LoadResult};
use crate::monster::{Monster, MonsterRecord};
use serde::{Deserialize, Serialize};

/// Item names the player is carrying, capped at `capacity`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub items: Vec<String>,
    pub capacity: usize,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|held| held == item)
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Add an item if there is room. Returns whether it was added.
    pub fn add(&mut self, item: impl Into<String>) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item.into());
        true
    }

    /// Remove one copy of `item`. Returns whether one was found.
    pub fn remove_one(&mut self, item: &str) -> bool {
        match self.items.iter().position(|held| held == item) {
            Some(position) => {
                self.items.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Everything the battle engine needs to know about the person playing.
///
/// The first monster of `team` is the one in battle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub team: Vec<Monster>,
    pub inventory: Inventory,
    pub money: u32,
    pub kills: u32,
    pub score: u32,
    /// Set once the second phase of the final boss has been reached.
    pub final_phase_reached: bool,
    /// Whether the one-time shared-XP gift has been handed out.
    pub xp_share_given: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, starter: Monster, config: &BattleConfig) -> Self {
        Self {
            name: name.into(),
            team: vec![starter],
            inventory: Inventory::new(config.default_bag_capacity),
            money: 0,
            kills: 0,
            score: 0,
            final_phase_reached: false,
            xp_share_given: false,
        }
    }

    pub fn active(&self) -> Option<&Monster> {
        self.team.first()
    }

    pub fn active_mut(&mut self) -> Option<&mut Monster> {
        self.team.first_mut()
    }

    pub fn has_living_monsters(&self) -> bool {
        self.team.iter().any(|monster| !monster.is_fainted())
    }

    /// Move the monster at `index` to the front of the team.
    pub fn bring_to_front(&mut self, index: usize) -> ActionResult<()> {
        if index >= self.team.len() {
            return Err(ActionError::InvalidTeamIndex(index));
        }
        let monster = self.team.remove(index);
        self.team.insert(0, monster);
        Ok(())
    }

    /// Hand a bag item to a teammate. A previously held item goes back into the bag.
    pub fn give_item(&mut self, team_index: usize, item: &str) -> ActionResult<Option<String>> {
        if team_index >= self.team.len() {
            return Err(ActionError::InvalidTeamIndex(team_index));
        }
        if !self.inventory.remove_one(item) {
            return Err(ActionError::ItemNotInBag(item.to_string()));
        }
        let previous = self.team[team_index].held_item.replace(item.to_string());
        if let Some(previous) = &previous {
            self.inventory.items.push(previous.clone());
        }
        Ok(previous)
    }

    /// Hand out the one-time shared-XP item. Nothing happens while the bag is full.
    pub fn claim_shared_xp_gift(&mut self, config: &BattleConfig) -> bool {
        if self.xp_share_given || !self.inventory.add(config.shared_xp_item.clone()) {
            return false;
        }
        self.xp_share_given = true;
        true
    }

    /// Restore every teammate to full health.
    pub fn heal_team(&mut self) {
        for monster in &mut self.team {
            monster.reset_stats();
        }
    }

    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord {
            name: self.name.clone(),
            team: self.team.iter().map(Monster::to_record).collect(),
            bag: self.inventory.items.clone(),
            bag_size: self.inventory.capacity,
            money: self.money,
            kills: self.kills,
            score: self.score,
            xp_share: self.xp_share_given,
            final_battle: self.final_phase_reached,
        }
    }

    /// Rebuild a player from a save record. Any invalid monster or bag entry rejects the whole record.
    pub fn from_record(record: PlayerRecord, catalog: &ContentCatalog) -> LoadResult<Self> {
        if let Some(item) = record.bag.iter().find(|item| catalog.item(item).is_none()) {
            return Err(LoadError::UnknownBagItem(item.clone()));
        }
        let team = record
            .team
            .into_iter()
            .map(|monster| Monster::from_record(monster, catalog))
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(Self {
            name: record.name,
            team,
            inventory: Inventory {
                items: record.bag,
                capacity: record.bag_size,
            },
            money: record.money,
            kills: record.kills,
            score: record.score,
            final_phase_reached: record.final_battle,
            xp_share_given: record.xp_share,
        })
    }

    pub fn from_json(json: &str, catalog: &ContentCatalog) -> LoadResult<Self> {
        let record: PlayerRecord = serde_json::from_str(json)?;
        Self::from_record(record, catalog)
    }

    pub fn to_json(&self) -> LoadResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }
}

/// A player as written to a save file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub team: Vec<MonsterRecord>,
    #[serde(default)]
    pub bag: Vec<String>,
    #[serde(rename = "bagSize")]
    pub bag_size: usize,
    #[serde(default)]
    pub money: u32,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub score: u32,
    #[serde(rename = "xpShare", default)]
    pub xp_share: bool,
    #[serde(rename = "finalBattle", default)]
    pub final_battle: bool,
}
