use crate::battle::events::BattleEvent;
use crate::catalog::ContentCatalog;
use crate::config::BattleConfig;
use crate::monster::Monster;
use crate::player::Player;
use schema::StatBlock;

/// A builder for creating test monsters with common defaults.
///
/// # Example
/// ```
/// let monster = TestMonsterBuilder::new("Pip", [100, 20, 10, 10])
///     .with_attacks(&["Tackle"])
///     .holding("Berry")
///     .with_hp(40)
///     .build();
/// ```
pub struct TestMonsterBuilder {
    name: String,
    stats: StatBlock,
    attacks: Vec<String>,
    held_item: Option<String>,
    current_hp: Option<u32>,
}

impl TestMonsterBuilder {
    /// Creates a new builder. The monster knows only Tackle unless told otherwise.
    pub fn new(name: &str, stats: StatBlock) -> Self {
        Self {
            name: name.to_string(),
            stats,
            attacks: vec!["Tackle".to_string()],
            held_item: None,
            current_hp: None,
        }
    }

    pub fn with_attacks(mut self, attacks: &[&str]) -> Self {
        self.attacks = attacks.iter().map(|attack| attack.to_string()).collect();
        self
    }

    pub fn holding(mut self, item: &str) -> Self {
        self.held_item = Some(item.to_string());
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> Monster {
        let mut monster = Monster::new(self.name, self.stats, self.attacks);
        monster.held_item = self.held_item;
        if let Some(hp) = self.current_hp {
            monster.set_hp_unclamped_above(hp);
        }
        monster
    }
}

/// The bundled content, which every scenario is written against.
pub fn test_catalog() -> ContentCatalog {
    match ContentCatalog::bundled() {
        Ok(catalog) => catalog,
        Err(err) => panic!("Failed to load bundled content: {}", err),
    }
}

/// A player owning `team`, in order, with the default empty bag.
pub fn create_test_player(team: Vec<Monster>) -> Player {
    let config = BattleConfig::default();
    let mut members = team.into_iter();
    let first = members
        .next()
        .unwrap_or_else(|| panic!("A test player needs at least one monster"));
    let mut player = Player::new("Ash", first, &config);
    player.team.extend(members);
    player
}

/// Names of every attacker, in the order they acted.
pub fn attackers(events: &[BattleEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::AttackUsed { attacker, .. } => Some(attacker.as_str()),
            _ => None,
        })
        .collect()
}

pub fn count_events(events: &[BattleEvent], predicate: impl Fn(&BattleEvent) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}
