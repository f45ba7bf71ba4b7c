//! Stateless hit rolls.
//!
//! A roll is a pure hash of the swing and the two participants, so a replay
//! or a client prediction computes the same outcome no matter how many other
//! rolls happened first.
use crate::entity::UnitHandle;
use crate::numeric::hit_threshold;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finaliser.
const fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

const fn handle_word(handle: UnitHandle) -> u64 {
    ((handle.index() as u64) << 32) | handle.generation() as u64
}

/// 32-bit roll for one attacker/victim pair within swing `attack_tick`.
///
/// # Examples
/// ```
/// use skirmish::combat::hit_roll::roll;
/// use skirmish::entity::UnitHandle;
/// let a = UnitHandle::from_raw_parts(0, 1);
/// let b = UnitHandle::from_raw_parts(3, 0);
/// assert_eq!(roll(7, a, b), roll(7, a, b));
/// assert_ne!(roll(7, a, b), roll(8, a, b));
/// ```
#[must_use]
pub const fn roll(attack_tick: u32, attacker: UnitHandle, victim: UnitHandle) -> u32 {
    let mut state = mix64((attack_tick as u64).wrapping_add(GOLDEN_GAMMA));
    state = mix64(state ^ handle_word(attacker).wrapping_add(GOLDEN_GAMMA));
    state = mix64(state ^ handle_word(victim).wrapping_mul(GOLDEN_GAMMA));
    (state >> 32) as u32
}

/// Whether the pair's roll lands for `hitchance`.
#[must_use]
pub fn is_hit(hitchance: f32, attack_tick: u32, attacker: UnitHandle, victim: UnitHandle) -> bool {
    u64::from(roll(attack_tick, attacker, victim)) < hit_threshold(hitchance)
}
