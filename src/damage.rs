//! Buffered hits awaiting application.
//!
//! Two attackers may strike the same victim in one tick. Instead of locking,
//! landed strikes are queued here and applied in a fixed order: by victim
//! slot, then attacker slot. Victims that die part-way through stop taking
//! further hits.
use crate::combat::Strike;
use crate::components::UnitRecord;
use crate::entity::{Arena, UnitHandle};

/// Health change applied to one victim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitEvent {
    /// Unit credited with the hit.
    pub attacker: UnitHandle,
    /// Unit that lost health.
    pub victim: UnitHandle,
    /// Swing that landed the hit.
    pub attack_tick: u32,
    /// Health removed.
    pub damage: i32,
    /// Victim health after the hit.
    pub remaining: i32,
}

/// Landed and missed strikes gathered during one impact pass.
#[derive(Debug, Default, Clone)]
pub struct ImpactLedger {
    strikes: Vec<Strike>,
}

impl ImpactLedger {
    /// Queues one strike.
    pub fn push(&mut self, strike: Strike) {
        self.strikes.push(strike);
    }

    /// Queues several strikes.
    pub fn extend<I>(&mut self, strikes: I)
    where
        I: IntoIterator<Item = Strike>,
    {
        self.strikes.extend(strikes);
    }

    /// Whether no strikes are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    /// Number of queued strikes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    /// Applies every landed strike to `units` and empties the ledger.
    pub fn apply(&mut self, units: &mut Arena<UnitRecord>) -> Vec<HitEvent> {
        self.strikes
            .sort_by_key(|s| (s.victim.index(), s.attacker.index(), s.attacker.generation()));
        let mut events = Vec::new();
        for strike in self.strikes.drain(..).filter(|s| s.landed) {
            let Some(victim) = units.get_mut(strike.victim) else {
                continue;
            };
            if !victim.health.is_alive() {
                continue;
            }
            victim.health.current = victim.health.current.saturating_sub(strike.damage);
            events.push(HitEvent {
                attacker: strike.attacker,
                victim: strike.victim,
                attack_tick: strike.attack_tick,
                damage: strike.damage,
                remaining: victim.health.current,
            });
        }
        events
    }
}
