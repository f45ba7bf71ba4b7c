//! Faction hostility lookup.
//!
//! The table is a fixed 32-row bit matrix: bit `j` of row `i` set means
//! faction `j` is hostile to faction `i`. It is built once when a match starts
//! and never mutated afterwards; temporary allegiance changes are modelled per
//! unit with [`TemporaryFactionOverride`] instead.
use crate::components::{Faction, TemporaryFactionOverride};
use crate::constants::MAX_FACTIONS;
use crate::error::{ConfigError, FactionIdError};

/// Immutable hostility bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FactionHostilityTable {
    rows: [u32; MAX_FACTIONS],
    faction_count: usize,
}

impl FactionHostilityTable {
    /// Builds a table from raw rows. Missing rows are treated as unset.
    ///
    /// # Errors
    /// Returns [`ConfigError::TooManyFactionRows`] for more than 32 rows.
    pub fn from_rows(rows: &[u32]) -> Result<Self, ConfigError> {
        if rows.len() > MAX_FACTIONS {
            return Err(ConfigError::TooManyFactionRows(rows.len()));
        }
        let mut table = [0; MAX_FACTIONS];
        for (slot, row) in table.iter_mut().zip(rows) {
            *slot = *row;
        }
        Ok(Self {
            rows: table,
            faction_count: MAX_FACTIONS,
        })
    }

    /// Builds a table from `(a, b)` pairs meaning "b is hostile to a".
    ///
    /// With `symmetric` set, each pair also marks `a` hostile to `b`.
    ///
    /// # Errors
    /// Returns [`FactionIdError`] when a pair names an id above 31.
    ///
    /// # Examples
    /// ```
    /// use skirmish::components::Faction;
    /// use skirmish::faction::FactionHostilityTable;
    /// let table = FactionHostilityTable::from_pairs(&[(0, 1)], false).unwrap();
    /// let (red, blue) = (Faction::new(0).unwrap(), Faction::new(1).unwrap());
    /// assert!(table.is_hostile(red, blue));
    /// assert!(!table.is_hostile(blue, red));
    /// ```
    pub fn from_pairs(pairs: &[(u8, u8)], symmetric: bool) -> Result<Self, FactionIdError> {
        let mut rows = [0_u32; MAX_FACTIONS];
        for &(raw_a, raw_b) in pairs {
            let a = Faction::new(raw_a)?;
            let b = Faction::new(raw_b)?;
            mark(&mut rows, a, b);
            if symmetric {
                mark(&mut rows, b, a);
            }
        }
        Ok(Self {
            rows,
            faction_count: MAX_FACTIONS,
        })
    }

    /// Restricts lookups to the first `count` factions (saturating at 32).
    #[must_use]
    pub fn with_faction_count(mut self, count: usize) -> Self {
        self.faction_count = count.min(MAX_FACTIONS);
        self
    }

    /// Number of factions addressable through [`Self::is_hostile`].
    #[must_use]
    pub const fn faction_count(&self) -> usize {
        self.faction_count
    }

    /// Raw row for faction `id`, or `0` when out of range.
    #[must_use]
    pub fn row(&self, id: usize) -> u32 {
        self.rows.get(id).copied().unwrap_or(0)
    }

    /// Whether faction `b` is hostile to faction `a`.
    ///
    /// Out-of-range ids are never hostile, and an unset row means "no
    /// enemies" rather than "everyone".
    #[must_use]
    pub fn are_hostile(&self, a: usize, b: usize, faction_count: usize) -> bool {
        let count = faction_count.min(MAX_FACTIONS);
        if a >= count || b >= count {
            return false;
        }
        let row = self.row(a);
        row != 0 && row & (1 << b) != 0
    }

    /// [`Self::are_hostile`] for typed ids using the table's faction count.
    #[must_use]
    pub fn is_hostile(&self, a: Faction, b: Faction) -> bool {
        self.are_hostile(usize::from(a.id()), usize::from(b.id()), self.faction_count)
    }
}

fn mark(rows: &mut [u32; MAX_FACTIONS], of: Faction, hostile: Faction) {
    if let Some(row) = rows.get_mut(usize::from(of.id())) {
        *row |= 1 << hostile.id();
    }
}

/// Faction used for hostility checks: an active override wins over the base.
#[must_use]
pub fn effective_faction(base: Faction, over: Option<&TemporaryFactionOverride>) -> Faction {
    match over {
        Some(o) if o.is_active() => o.faction,
        _ => base,
    }
}

/// Counts an override down by `dt`, dropping it once expired.
pub fn tick_override(slot: &mut Option<TemporaryFactionOverride>, dt: f32) {
    if let Some(o) = slot.as_mut() {
        o.seconds_left -= dt;
        if !o.is_active() {
            log::debug!("faction override to {} expired", o.faction.id());
            *slot = None;
        }
    }
}
