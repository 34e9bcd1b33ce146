//! Attack state mutated across the resolution pipeline.

use strum::Display;

use crate::animation::AnimationRequest;
use crate::error::FaultRecord;
use crate::state::EntityId;

/// Classification of the weapon or delivery behind an attack.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponAttackKind {
    Melee,
    Ranged,
    Spell,
    Unarmed,
}

impl WeaponAttackKind {
    pub fn is_ranged(self) -> bool {
        matches!(self, Self::Ranged)
    }
}

/// Pipeline phases, in execution order.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    AttackContribution,
    ToHit,
    Defense,
    AttackerHit,
    DefenderHit,
}

/// One combat action, owned by the resolver for the action's duration.
///
/// Combatant fields are opaque references into the world; numeric fields
/// are snapshots taken by the host at construction and mutated by effect
/// hooks as the pipeline runs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attack {
    pub attacker: EntityId,
    pub defender: EntityId,
    pub kind: WeaponAttackKind,
    pub base_damage: i32,
    pub attack_bonus: i32,
    pub defender_ac: i32,
    hit: bool,
    negated: bool,
}

impl Attack {
    pub fn new(attacker: EntityId, defender: EntityId, kind: WeaponAttackKind) -> Self {
        Self {
            attacker,
            defender,
            kind,
            base_damage: 0,
            attack_bonus: 0,
            defender_ac: 10,
            hit: false,
            negated: false,
        }
    }

    pub fn with_base_damage(mut self, base_damage: i32) -> Self {
        self.base_damage = base_damage;
        self
    }

    pub fn with_attack_bonus(mut self, attack_bonus: i32) -> Self {
        self.attack_bonus = attack_bonus;
        self
    }

    pub fn with_defender_ac(mut self, defender_ac: i32) -> Self {
        self.defender_ac = defender_ac;
        self
    }

    /// Adds to the pending damage (attack-contribution or post-hit effects).
    pub fn add_damage(&mut self, amount: i32) {
        self.base_damage += amount;
    }

    /// Raises the defender's effective armor class for this attack.
    pub fn raise_ac(&mut self, amount: i32) {
        self.defender_ac += amount;
    }

    /// Negates all damage from this attack. Irreversible: once set, no
    /// further damage phase runs.
    pub fn negate(&mut self) {
        self.negated = true;
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub(crate) fn set_hit(&mut self, hit: bool) {
        self.hit = hit;
    }
}

/// Outcome of a resolved attack.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    Miss,
    Hit,
    /// A defense effect cancelled all damage.
    Negated,
}

/// Result of running an attack through the full pipeline.
#[derive(Debug)]
pub struct ResolvedAttack {
    /// Final attack numbers after all phases.
    pub attack: Attack,
    pub outcome: AttackOutcome,
    /// Health actually removed from the defender (0 on miss, negation, or a
    /// defender that no longer exists).
    pub damage_applied: u32,
    /// Hook faults recovered during resolution.
    pub faults: Vec<FaultRecord>,
    /// Visual effects queued by hooks, for the host to play.
    pub animations: Vec<AnimationRequest>,
}
