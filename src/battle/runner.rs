use crate::battle::events::BattleEvent;
use crate::battle::rng::{RandomSource, SeededRng};
use crate::battle::session::{BattleReport, BattleSession, BattleState, PlayerDecision};
use crate::errors::BattleResult;
use tracing::debug;

/// Supplies player decisions to [`run_battle`].
pub trait DecisionMaker {
    fn decide(&mut self, session: &BattleSession<'_>) -> PlayerDecision;
}

/// Always attacks with a random known attack and sends out the first
/// teammate when a replacement is needed.
///
/// Draws from its own source so the battle's roll sequence stays the same
/// whatever the autopilot picks.
#[derive(Debug, Clone)]
pub struct AutoPilot {
    rng: SeededRng,
}

impl AutoPilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SeededRng::from_seed(seed),
        }
    }
}

impl DecisionMaker for AutoPilot {
    fn decide(&mut self, session: &BattleSession<'_>) -> PlayerDecision {
        if let BattleState::AwaitingReplacement { .. } = session.state() {
            return PlayerDecision::Switch(0);
        }
        let known = session
            .player()
            .active()
            .map_or(0, |monster| monster.attacks.len());
        let index = self.rng.below(known as u32, "autopilot attack pick") as usize;
        PlayerDecision::Attack(index)
    }
}

/// Result of a battle played to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleRun {
    pub report: BattleReport,
    pub events: Vec<BattleEvent>,
}

/// Drive a session to its end, collecting every event it emits.
pub fn run_battle(
    mut session: BattleSession<'_>,
    decider: &mut dyn DecisionMaker,
) -> BattleResult<BattleRun> {
    let mut events = session.take_events();
    while !session.is_over() {
        let decision = decider.decide(&session);
        debug!(?decision, round = session.round(), "player decision");
        events.extend(session.submit(decision)?);
    }
    let report = session.finish()?;
    Ok(BattleRun { report, events })
}
