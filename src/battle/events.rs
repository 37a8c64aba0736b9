use schema::StatType;
use serde::{Deserialize, Serialize};

/// Which side of the battle a monster fights for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

/// How a battle ended.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    EnemyDefeated,
    BossDefeated,
    PlayerAllDefeated,
    Fled,
}

/// The two ways a miss can be described. Purely cosmetic.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissPhrasing {
    AttackerMissed,
    DefenderAvoided,
}

/// Adjective bucket for a stat change, from `|delta| / divisor`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostIntensity {
    Normal,
    Sharp,
    Drastic,
}

impl BoostIntensity {
    pub fn from_bucket(bucket: i32) -> Self {
        match bucket {
            i32::MIN..=0 => BoostIntensity::Normal,
            1 => BoostIntensity::Sharp,
            _ => BoostIntensity::Drastic,
        }
    }

    fn adjective(self) -> &'static str {
        match self {
            BoostIntensity::Normal => "",
            BoostIntensity::Sharp => " sharply",
            BoostIntensity::Drastic => " drastically",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ItemFailureReason {
    AlreadyFullHp,
    CapacityNotIncreased { capacity: usize, offered: usize },
    NotUsableNow,
    NoEscapingBoss,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Battle Flow
    BattleStarted {
        player: String,
        enemy: String,
        boss: bool,
    },
    RoundStarted {
        round: u32,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },

    // Attacks
    AttackUsed {
        attacker: String,
        attack: String,
    },
    MustRecharge {
        monster: String,
    },
    AttackMissed {
        attacker: String,
        defender: String,
        phrasing: MissPhrasing,
    },
    CriticalHit {
        attacker: String,
        defender: String,
    },
    PartialEvade {
        defender: String,
    },
    DamageApplied {
        target: String,
        amount: u32,
        remaining_hp: u32,
    },
    HealApplied {
        target: String,
        amount: i64,
        new_hp: u32,
    },
    StatBoosted {
        target: String,
        stat: StatType,
        amount: i64,
        delta_percent: i32,
        intensity: BoostIntensity,
    },

    // Items
    HeldItemTriggered {
        holder: String,
        item: String,
    },
    ItemUsed {
        item: String,
        target: Option<String>,
    },
    ItemFailed {
        item: String,
        reason: ItemFailureReason,
    },
    BagExpanded {
        capacity: usize,
    },

    // Team Management
    MonsterSwitched {
        old_monster: String,
        new_monster: String,
    },
    MonsterDefeated {
        side: Side,
        monster: String,
    },
    HeldItemRecovered {
        monster: String,
        item: String,
        kept: bool,
    },
    ReplacementNeeded,

    // Escape
    EscapeSucceeded,
    EscapeFailed,

    // Boss
    BossEvolved {
        new_form: String,
    },

    // Growth and Rewards
    XpGained {
        monster: String,
        amount: u32,
    },
    MoveLearned {
        monster: String,
        attack: String,
    },
    CashDropped {
        amount: u32,
        total: u32,
    },
    ItemDropOffered {
        item: String,
    },
    RecruitOffered {
        monster: String,
    },
    CenterFound,
}

impl BattleEvent {
    /// Formats the event into a human-readable string.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            // === Battle Flow ===
            BattleEvent::BattleStarted {
                player,
                enemy,
                boss,
            } => {
                let intro = if *boss {
                    format!("{} blocks the way!", enemy)
                } else {
                    format!("A {} appeared!", enemy.to_lowercase())
                };
                Some(format!("{} Go, {}!", intro, player))
            }
            BattleEvent::RoundStarted { round } => Some(format!("=== Round {} ===", round)),
            BattleEvent::BattleEnded { outcome } => match outcome {
                BattleOutcome::EnemyDefeated => None, // Already announced by MonsterDefeated
                BattleOutcome::BossDefeated => {
                    Some("Congratulations! You have slain the final boss.".to_string())
                }
                BattleOutcome::PlayerAllDefeated => Some("You have no monsters left...".to_string()),
                BattleOutcome::Fled => None, // Already announced by the escape event
            },

            // === Attacks ===
            BattleEvent::AttackUsed { attacker, attack } => {
                Some(format!("{} used {}!", attacker, attack))
            }
            BattleEvent::MustRecharge { monster } => Some(format!("{} must recharge!", monster)),
            BattleEvent::AttackMissed {
                attacker,
                defender,
                phrasing,
            } => Some(match phrasing {
                MissPhrasing::AttackerMissed => format!("{}'s attack missed!", attacker),
                MissPhrasing::DefenderAvoided => format!("{} avoided the attack!", defender),
            }),
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::PartialEvade { defender } => {
                Some(format!("{} partially evaded the attack!", defender))
            }
            BattleEvent::DamageApplied { target, amount, .. } => {
                Some(format!("{} took {} damage!", target, amount))
            }
            BattleEvent::HealApplied { target, amount, .. } => {
                if *amount > 0 {
                    Some(format!("{} restored {} HP!", target, amount))
                } else if *amount < 0 {
                    Some(format!("{} lost {} HP!", target, -amount))
                } else {
                    None
                }
            }
            BattleEvent::StatBoosted {
                target,
                stat,
                delta_percent,
                intensity,
                ..
            } => {
                let direction = if *delta_percent < 0 { "fell" } else { "rose" };
                Some(format!(
                    "{}'s {} {}{}!",
                    target,
                    stat,
                    direction,
                    intensity.adjective()
                ))
            }

            // === Items ===
            BattleEvent::HeldItemTriggered { holder, item } => {
                Some(format!("{} used the held {}!", holder, item))
            }
            BattleEvent::ItemUsed { item, target } => Some(match target {
                Some(target) => format!("Used the {} on {}.", item, target),
                None => format!("Used the {}.", item),
            }),
            BattleEvent::ItemFailed { item, reason } => {
                Some(Self::format_item_failure(item, reason))
            }
            BattleEvent::BagExpanded { capacity } => Some(format!(
                "Your bag has increased in size, and can now hold up to {} items!",
                capacity
            )),

            // === Team Management ===
            BattleEvent::MonsterSwitched {
                old_monster,
                new_monster,
            } => Some(format!("{}, come back! Go, {}!", old_monster, new_monster)),
            BattleEvent::MonsterDefeated { side, monster } => match side {
                Side::Player => Some(format!("{} has died!", monster)),
                Side::Enemy => Some(format!("{} died!", monster)),
            },
            BattleEvent::HeldItemRecovered {
                monster,
                item,
                kept,
            } => {
                if *kept {
                    Some(format!("{} dropped the held {}!", monster, item))
                } else {
                    Some(format!(
                        "{} dropped the held {}, but the bag is full. The {} was left behind.",
                        monster, item, item
                    ))
                }
            }
            BattleEvent::ReplacementNeeded => None, // Prompting is the caller's job

            // === Escape ===
            BattleEvent::EscapeSucceeded => Some("Got away safely!".to_string()),
            BattleEvent::EscapeFailed => Some("Can't escape!".to_string()),

            // === Boss ===
            BattleEvent::BossEvolved { new_form } => Some(format!("...what? It evolved into {}!", new_form)),

            // === Growth and Rewards ===
            BattleEvent::XpGained { monster, amount } => {
                Some(format!("{} gained {} xp points!", monster, amount))
            }
            BattleEvent::MoveLearned { monster, attack } => {
                Some(format!("{} learned {}!", monster, attack))
            }
            BattleEvent::CashDropped { amount, .. } => Some(format!("The enemy dropped ${}!", amount)),
            BattleEvent::ItemDropOffered { item } => Some(format!("The enemy dropped a {}!", item)),
            BattleEvent::RecruitOffered { monster } => {
                Some(format!("{} wants to join your team!", monster))
            }
            BattleEvent::CenterFound => {
                Some("You found a center to heal your monsters!".to_string())
            }
        }
    }

    fn format_item_failure(item: &str, reason: &ItemFailureReason) -> String {
        match reason {
            ItemFailureReason::AlreadyFullHp => format!("HP is already full. The {} was not used.", item),
            ItemFailureReason::CapacityNotIncreased { capacity, offered } => format!(
                "The {} would increase your bag size to {} items, but your bag can already hold {} items.",
                item, offered, capacity
            ),
            ItemFailureReason::NotUsableNow => "This item cannot be used at the moment.".to_string(),
            ItemFailureReason::NoEscapingBoss => "There's no escaping a god.".to_string(),
        }
    }
}

/// Event bus for collecting battle events in the order they happened.
///
/// Resolvers push into a `&mut EventBus`; callers read the events back to
/// render, log or play sounds.
///
/// ```rust,ignore
/// println!("{}", bus);
/// for line in bus.formatted_lines() {
///     println!("{}", line);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Move the collected events out, leaving the bus empty.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Human-readable lines for every non-silent event.
    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    /// Print all events in debug format with indentation.
    pub fn print_debug(&self) {
        for event in &self.events {
            println!("  {:?}", event);
        }
    }

    /// Print all events in debug format with a custom prefix message.
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        self.print_debug();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}
