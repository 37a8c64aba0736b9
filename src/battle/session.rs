use crate::battle::calculators::{flee_check, FleeCheck};
use crate::battle::events::{BattleEvent, BattleOutcome, EventBus, Side};
use crate::battle::items::{ItemResolver, ItemTargets};
use crate::battle::rng::RandomSource;
use crate::battle::scheduler::TurnScheduler;
use crate::catalog::ContentCatalog;
use crate::config::BattleConfig;
use crate::encounter::{boss_phase_two_species, build_boss_phase_two, EncounterKind};
use crate::errors::{ActionError, ActionResult, BattleResult, ContentError};
use crate::monster::Monster;
use crate::player::Player;
use crate::progression::{GrowthDistributor, RewardGenerator, Rewards};
use schema::{SpeciesData, StatType};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum BattleState {
    /// Waiting for the player's next decision.
    Ongoing,
    /// The active monster fell; only `switch_monster` is accepted.
    AwaitingReplacement { fallen: String },
    Finished(BattleOutcome),
}

/// Which monster an item from the bag is aimed at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTarget {
    /// Index into the player's team.
    Teammate(usize),
    Enemy,
}

/// One decision from the player, as accepted by [`BattleSession::submit`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum PlayerDecision {
    Attack(usize),
    UseItem { item: String, target: ItemTarget },
    Flee,
    Switch(usize),
}

/// Summary handed back once a battle is over.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub rewards: Option<Rewards>,
    pub rounds: u32,
}

/// One battle between the player's team and a single enemy.
///
/// The session borrows the player for its whole life, so team changes
/// (growth, permanent losses, item use) land directly on the caller's
/// `Player`. Every entry point either returns the events it produced or an
/// `ActionError` with the session untouched.
pub struct BattleSession<'a> {
    catalog: &'a ContentCatalog,
    config: &'a BattleConfig,
    player: &'a mut Player,
    enemy: Monster,
    /// Template of the second boss form, built once the first falls.
    phase_two: Option<&'a SpeciesData>,
    /// The boss changed form while the player had no monster out; the
    /// replacement gets the full reset.
    restore_replacement: bool,
    encounter: EncounterKind,
    state: BattleState,
    round: u32,
    rng: &'a mut dyn RandomSource,
    bus: EventBus,
    rewards: Option<Rewards>,
}

impl<'a> BattleSession<'a> {
    pub fn start(
        catalog: &'a ContentCatalog,
        config: &'a BattleConfig,
        player: &'a mut Player,
        mut enemy: Monster,
        encounter: EncounterKind,
        rng: &'a mut dyn RandomSource,
    ) -> BattleResult<Self> {
        let known_attacks = player.team.iter().chain(std::iter::once(&enemy));
        for monster in known_attacks {
            if let Some(missing) = monster.attacks.iter().find(|a| catalog.attack(a).is_none()) {
                return Err(ContentError::AttackNotFound(missing.clone()).into());
            }
        }

        let front = player
            .team
            .iter()
            .position(|monster| !monster.is_fainted())
            .ok_or(ActionError::NoLivingMonsters)?;
        player.bring_to_front(front)?;
        for monster in &mut player.team {
            monster.resting = false;
        }
        enemy.resting = false;

        let phase_two = if encounter.is_boss() && !player.final_phase_reached {
            Some(boss_phase_two_species(catalog, config)?)
        } else {
            None
        };

        let mut bus = EventBus::new();
        let player_name = player.team[0].name.clone();
        info!(
            player = %player_name,
            enemy = %enemy.name,
            boss = encounter.is_boss(),
            kills = player.kills,
            "battle started"
        );
        bus.push(BattleEvent::BattleStarted {
            player: player_name,
            enemy: enemy.name.clone(),
            boss: encounter.is_boss(),
        });

        Ok(Self {
            catalog,
            config,
            player,
            enemy,
            phase_two,
            restore_replacement: false,
            encounter,
            state: BattleState::Ongoing,
            round: 0,
            rng,
            bus,
            rewards: None,
        })
    }

    // --- Queries ---

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, BattleState::Finished(_))
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.state {
            BattleState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn player(&self) -> &Player {
        &*self.player
    }

    pub fn enemy(&self) -> &Monster {
        &self.enemy
    }

    pub fn encounter(&self) -> EncounterKind {
        self.encounter
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn rewards(&self) -> Option<&Rewards> {
        self.rewards.as_ref()
    }

    /// Events produced since the last entry point returned, such as the start announcement.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        self.bus.drain()
    }

    // --- Player decisions ---

    pub fn submit(&mut self, decision: PlayerDecision) -> ActionResult<Vec<BattleEvent>> {
        match decision {
            PlayerDecision::Attack(index) => self.choose_attack(index),
            PlayerDecision::UseItem { item, target } => self.choose_item(&item, target),
            PlayerDecision::Flee => self.attempt_flee(),
            PlayerDecision::Switch(index) => self.switch_monster(index),
        }
    }

    /// Attack with the active monster's attack at `index`; plays out a full round.
    pub fn choose_attack(&mut self, index: usize) -> ActionResult<Vec<BattleEvent>> {
        self.ensure_ongoing()?;
        let known = self.active()?.attacks.len();
        if index >= known {
            warn!(index, known, "attack index rejected");
            return Err(ActionError::InvalidAttackIndex(index));
        }

        self.round += 1;
        self.bus.push(BattleEvent::RoundStarted { round: self.round });

        let Player {
            team, inventory, ..
        } = &mut *self.player;
        let active = team.first_mut().ok_or(ActionError::NoLivingMonsters)?;
        let fled = TurnScheduler::new(self.catalog, self.config).execute_round(
            index,
            active,
            &mut self.enemy,
            inventory,
            self.encounter,
            &mut *self.rng,
            &mut self.bus,
        );

        self.after_action(fled);
        Ok(self.bus.drain())
    }

    /// Use an item from the bag. The enemy does not get a turn for this.
    ///
    /// Items whose usage code targets the player's side need a teammate;
    /// the rest need the enemy. A used item leaves the bag.
    pub fn choose_item(&mut self, name: &str, target: ItemTarget) -> ActionResult<Vec<BattleEvent>> {
        self.ensure_ongoing()?;
        if !self.player.inventory.contains(name) {
            return Err(ActionError::ItemNotInBag(name.to_string()));
        }
        let catalog = self.catalog;
        let item = catalog
            .item(name)
            .filter(|item| item.usage.usable_in_battle())
            .ok_or_else(|| ActionError::ItemNotUsable(name.to_string()))?;

        let Player {
            team, inventory, ..
        } = &mut *self.player;
        let targets = match (item.usage.targets_own_monster(), target) {
            (true, ItemTarget::Teammate(index)) => {
                let holder = team.get_mut(index).ok_or(ActionError::InvalidTeamIndex(index))?;
                ItemTargets::new(Some(holder), None)
            }
            (false, ItemTarget::Enemy) => ItemTargets::new(None, Some(&mut self.enemy)),
            _ => return Err(ActionError::MissingTarget(name.to_string())),
        };

        let outcome = ItemResolver::new(self.config).apply(
            item,
            inventory,
            self.encounter,
            targets,
            &mut *self.rng,
            &mut self.bus,
        )?;
        if outcome.used {
            inventory.remove_one(name);
        }

        self.after_action(outcome.flee);
        Ok(self.bus.drain())
    }

    /// Try to run. Speed decides; a failed attempt gives the enemy a free attack.
    pub fn attempt_flee(&mut self) -> ActionResult<Vec<BattleEvent>> {
        self.ensure_ongoing()?;
        if self.encounter.is_boss() {
            warn!("flee refused during the boss encounter");
            return Err(ActionError::EscapeForbidden);
        }

        let player_speed = self.active()?.base_stat(StatType::Speed);
        let enemy_speed = self.enemy.base_stat(StatType::Speed);
        let escaped = match flee_check(player_speed, enemy_speed) {
            FleeCheck::Guaranteed => true,
            FleeCheck::Roll(chance) => self.rng.chance(chance, "flee roll"),
        };
        info!(player_speed, enemy_speed, escaped, "flee attempt");

        if escaped {
            self.bus.push(BattleEvent::EscapeSucceeded);
        } else {
            self.bus.push(BattleEvent::EscapeFailed);
            self.enemy_turn();
        }
        self.after_action(escaped);
        Ok(self.bus.drain())
    }

    /// Send out the teammate at `index`.
    ///
    /// A voluntary switch resets the outgoing monster's battle stats and
    /// costs a turn. A replacement for a fallen monster is free.
    pub fn switch_monster(&mut self, index: usize) -> ActionResult<Vec<BattleEvent>> {
        if let BattleState::AwaitingReplacement { fallen } = &self.state {
            let fallen = fallen.clone();
            let chosen = self
                .player
                .team
                .get(index)
                .ok_or(ActionError::InvalidTeamIndex(index))?;
            if chosen.is_fainted() {
                return Err(ActionError::FaintedMonsterSelected(index));
            }
            self.player.bring_to_front(index)?;
            if std::mem::take(&mut self.restore_replacement) {
                self.player.team[0].reset_stats();
            }
            self.bus.push(BattleEvent::MonsterSwitched {
                old_monster: fallen,
                new_monster: self.player.team[0].name.clone(),
            });
            self.state = BattleState::Ongoing;
            return Ok(self.bus.drain());
        }

        self.ensure_ongoing()?;
        let team_size = self.player.team.len();
        if team_size <= 1 {
            return Err(ActionError::NoOtherMonsters);
        }
        if index >= team_size {
            return Err(ActionError::InvalidTeamIndex(index));
        }
        if index == 0 {
            return Err(ActionError::ActiveMonsterSelected);
        }
        if self.player.team[index].is_fainted() {
            return Err(ActionError::FaintedMonsterSelected(index));
        }

        let outgoing = &mut self.player.team[0];
        outgoing.reset_battle_stats();
        let old_monster = outgoing.name.clone();
        self.player.bring_to_front(index)?;
        self.bus.push(BattleEvent::MonsterSwitched {
            old_monster,
            new_monster: self.player.team[0].name.clone(),
        });

        self.enemy_turn();
        self.after_action(false);
        Ok(self.bus.drain())
    }

    /// Consume the session. Errors while the battle is still being fought.
    pub fn finish(self) -> ActionResult<BattleReport> {
        let outcome = self.outcome().ok_or(ActionError::BattleInProgress)?;
        Ok(BattleReport {
            outcome,
            rewards: self.rewards,
            rounds: self.round,
        })
    }

    // --- Internals ---

    fn ensure_ongoing(&self) -> ActionResult<()> {
        match self.state {
            BattleState::Ongoing => Ok(()),
            BattleState::AwaitingReplacement { .. } => Err(ActionError::AwaitingReplacement),
            BattleState::Finished(_) => Err(ActionError::BattleOver),
        }
    }

    fn active(&self) -> ActionResult<&Monster> {
        self.player.active().ok_or(ActionError::NoLivingMonsters)
    }

    /// One enemy attack with no held-item checks afterwards.
    fn enemy_turn(&mut self) {
        let Some(active) = self.player.team.first_mut() else {
            return;
        };
        TurnScheduler::new(self.catalog, self.config).enemy_attack(
            &mut self.enemy,
            active,
            &mut *self.rng,
            &mut self.bus,
        );
    }

    /// Settle faints and decide the next state.
    fn after_action(&mut self, fled: bool) {
        if fled {
            self.end(BattleOutcome::Fled);
            return;
        }

        let mut fallen = None;
        if self.player.active().is_some_and(Monster::is_fainted) {
            let lost = self.player.team.remove(0);
            info!(monster = %lost.name, "player monster lost for good");
            self.bus.push(BattleEvent::MonsterDefeated {
                side: Side::Player,
                monster: lost.name.clone(),
            });
            if let Some(item) = lost.held_item {
                let kept = self.player.inventory.add(item.clone());
                self.bus.push(BattleEvent::HeldItemRecovered {
                    monster: lost.name.clone(),
                    item,
                    kept,
                });
            }
            if !self.player.has_living_monsters() {
                self.end(BattleOutcome::PlayerAllDefeated);
                return;
            }
            fallen = Some(lost.name);
        }

        if self.enemy.is_fainted() {
            self.enemy_defeated(fallen.is_some());
        }

        if let Some(fallen) = fallen {
            if self.state == BattleState::Ongoing {
                self.state = BattleState::AwaitingReplacement { fallen };
                self.bus.push(BattleEvent::ReplacementNeeded);
            }
        }
    }

    /// `replacement_pending` is set when the player's active monster fell in the same step.
    fn enemy_defeated(&mut self, replacement_pending: bool) {
        if let Some(species) = self.phase_two.take() {
            self.player.final_phase_reached = true;
            let phase_two = build_boss_phase_two(
                species,
                self.player.kills,
                self.config,
                self.catalog,
                &mut *self.rng,
            );
            if replacement_pending {
                self.restore_replacement = true;
            } else if let Some(active) = self.player.active_mut() {
                active.reset_stats();
            }
            info!(from = %self.enemy.name, to = %phase_two.name, "boss transition");
            self.bus.push(BattleEvent::BossEvolved {
                new_form: phase_two.name.clone(),
            });
            self.enemy = phase_two;
            return;
        }

        self.bus.push(BattleEvent::MonsterDefeated {
            side: Side::Enemy,
            monster: self.enemy.name.clone(),
        });
        self.player.kills += 1;
        if self.encounter.is_boss() {
            self.end(BattleOutcome::BossDefeated);
            return;
        }

        GrowthDistributor::new(self.catalog, self.config).award(
            &mut *self.player,
            &self.enemy,
            &mut *self.rng,
            &mut self.bus,
        );
        let rewards = RewardGenerator::new(self.config).generate(
            &mut *self.player,
            &self.enemy,
            &mut *self.rng,
            &mut self.bus,
        );
        self.rewards = Some(rewards);
        self.end(BattleOutcome::EnemyDefeated);
    }

    fn end(&mut self, outcome: BattleOutcome) {
        if let Some(active) = self.player.active_mut() {
            active.reset_battle_stats();
        }
        info!(?outcome, rounds = self.round, kills = self.player.kills, "battle ended");
        self.state = BattleState::Finished(outcome);
        self.bus.push(BattleEvent::BattleEnded { outcome });
    }
}
