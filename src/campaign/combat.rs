//! Attack resolution
//!
//! One attack commits up to `ammo` soldiers, rolls once against a success
//! probability driven by the attacker:defender ratio, and reports the damage
//! dealt and the attacker's losses. The roll comes from an injected
//! [`RollSource`] so that outcomes can be replayed exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Success probability when attackers and defenders are evenly matched
pub const BASE_SUCCESS: f64 = 0.5;

/// Probability change per unit of attacker:defender ratio above 1
pub const RATIO_SLOPE: f64 = 0.15;

/// No attack on a defended target is ever hopeless...
pub const MIN_SUCCESS: f64 = 0.05;

/// ...or certain
pub const MAX_SUCCESS: f64 = 0.95;

/// Source of uniform rolls in [0, 1)
pub trait RollSource {
    fn roll(&mut self) -> f64;
}

impl<F: FnMut() -> f64> RollSource for F {
    fn roll(&mut self) -> f64 {
        self()
    }
}

/// Always returns the same roll
#[derive(Debug, Clone, Copy)]
pub struct FixedRoll(pub f64);

impl RollSource for FixedRoll {
    fn roll(&mut self) -> f64 {
        self.0
    }
}

/// Reproducible rolls from a seeded ChaCha8 stream
#[derive(Debug, Clone)]
pub struct SeededRolls {
    rng: ChaCha8Rng,
}

impl SeededRolls {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RollSource for SeededRolls {
    fn roll(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Outcome of a single attack
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackResult {
    pub participating: u32,
    pub ammo_used: u32,
    pub success: bool,
    pub damage: u32,
    pub attacker_loss: u32,
    pub probability: f64,
    pub roll: f64,
}

/// Chance that `attacking` soldiers overcome `defending` ones
///
/// An undefended target always falls.
pub fn success_probability(attacking: u32, defending: u32) -> f64 {
    if defending == 0 {
        return 1.0;
    }
    let ratio = attacking as f64 / defending as f64;
    (BASE_SUCCESS + RATIO_SLOPE * (ratio - 1.0)).clamp(MIN_SUCCESS, MAX_SUCCESS)
}

/// Resolve one attack
///
/// Participating attackers are limited by ammo, one round each. Losses and
/// damage are truncated toward zero; a successful attack always deals at
/// least 1 damage.
pub fn resolve_attack(
    attacking_soldiers: u32,
    defending_soldiers: u32,
    ammo_available: u32,
    damage_ratio: f64,
    failure_loss_ratio: f64,
    rolls: &mut dyn RollSource,
) -> AttackResult {
    let participating = attacking_soldiers.min(ammo_available);
    if participating == 0 {
        return AttackResult::default();
    }

    let probability = success_probability(participating, defending_soldiers);
    let roll = rolls.roll();
    let success = roll < probability;

    let (damage, attacker_loss) = if success {
        let damage = ((participating as f64 * damage_ratio).floor() as u32).max(1);
        (damage, 0)
    } else {
        (0, (participating as f64 * failure_loss_ratio).floor() as u32)
    };

    AttackResult {
        participating,
        ammo_used: participating,
        success,
        damage,
        attacker_loss,
        probability,
        roll,
    }
}
