//! Oracle providing combat rules and balance tables.

/// Oracle exposing tunable rules parameters.
///
/// Defines resolution mechanics (to-hit die, damage floors), not entity
/// data - the world state owns that.
pub trait TablesOracle: Send + Sync {
    fn combat(&self) -> &CombatParams;
}

/// To-hit check parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitParams {
    /// Faces on the attack die. Valid range: 2..=100.
    pub die_sides: u32,
    /// A roll of 1 always misses, regardless of bonuses.
    pub auto_miss_on_min: bool,
    /// A maximum roll always hits, regardless of armor class.
    pub auto_hit_on_max: bool,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            die_sides: 20,
            auto_miss_on_min: true,
            auto_hit_on_max: true,
        }
    }
}

/// Combat resolution parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatParams {
    pub hit: HitParams,
    /// Damage floor applied to successful, non-negated hits.
    pub minimum_damage: u32,
    /// Base damage when the attacker wields no weapon.
    pub unarmed_damage: u32,
}

impl Default for CombatParams {
    fn default() -> Self {
        Self {
            hit: HitParams::default(),
            minimum_damage: 0,
            unarmed_damage: 1,
        }
    }
}
