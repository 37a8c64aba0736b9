use crate::battle::events::BoostIntensity;
use schema::{RestoreAmount, StatBlock, NUM_STATS};

/// Round half up, matching the rounding every balance table was tuned with.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// HP restored by a heal spec. Never pushes `current` past `max`.
///
/// Returns 0 when already at or above max. A negative spec drains instead,
/// and the caller clamps the result at 0 HP.
pub fn heal_amount(current: u32, max: u32, spec: RestoreAmount) -> i64 {
    if current >= max {
        return 0;
    }
    let gain = match spec {
        RestoreAmount::Flat(amount) => amount,
        RestoreAmount::Percent(percent) => round_half_up(max as f64 * percent as f64 / 100.0),
    };
    gain.min(i64::from(max - current))
}

/// Temporary change for a status-attack stat delta, relative to the base stat.
pub fn stat_boost(base: u32, delta_percent: i32) -> i64 {
    round_half_up(base as f64 * f64::from(delta_percent) / 100.0)
}

pub fn boost_intensity(delta_percent: i32, divisor: i32) -> BoostIntensity {
    BoostIntensity::from_bucket(delta_percent.abs() / divisor.max(1))
}

/// Physical damage for one hit. Defense is floored at 1 and the result is always at least 1.
pub fn physical_damage(multiplier: f64, power: u32, attack: u32, defense: u32) -> u32 {
    let raw = multiplier * f64::from(power) * f64::from(attack) / f64::from(defense.max(1));
    (round_half_up(raw) + 1).clamp(1, i64::from(u32::MAX)) as u32
}

/// A monster struggles once `floor(hp / max * 100)` drops to the threshold.
pub fn is_struggling(current_hp: u32, max_hp: u32, threshold: u32) -> bool {
    let percent = (f64::from(current_hp) / f64::from(max_hp.max(1)) * 100.0).floor();
    percent <= f64::from(threshold)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleeCheck {
    Guaranteed,
    /// Succeeds when a `[0, 100)` draw lands below this value.
    Roll(u32),
}

pub fn flee_check(player_speed: u32, enemy_speed: u32) -> FleeCheck {
    if player_speed >= enemy_speed {
        FleeCheck::Guaranteed
    } else {
        let chance = round_half_up(100.0 * f64::from(player_speed) / f64::from(enemy_speed.max(1)));
        FleeCheck::Roll(chance.clamp(0, 100) as u32)
    }
}

/// Split `xp` across four stats in proportion to their current values.
///
/// The first three shares are rounded, the last absorbs whatever is left, so
/// the deltas always sum to exactly `xp`.
pub fn split_xp(stats: &StatBlock, xp: u32) -> [i64; NUM_STATS] {
    let sum = stats.iter().map(|&stat| u64::from(stat)).sum::<u64>().max(1) as f64;
    let mut deltas = [0i64; NUM_STATS];
    let mut assigned = 0i64;
    for (delta, &stat) in deltas.iter_mut().zip(stats.iter()).take(NUM_STATS - 1) {
        *delta = round_half_up(f64::from(stat) / sum * f64::from(xp));
        assigned += *delta;
    }
    deltas[NUM_STATS - 1] = i64::from(xp) - assigned;
    deltas
}

/// XP awarded for beating a monster with these base stats: `(hp + def) / 2` plus a variance roll.
pub fn xp_base_and_variance(base_stats: &StatBlock) -> (u32, u32) {
    let base = (base_stats[0] + base_stats[2]) / 2;
    (base, base / 2)
}
