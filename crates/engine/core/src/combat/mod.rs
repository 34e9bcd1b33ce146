//! Combat resolution pipeline.
//!
//! A single attack runs through a fixed five-phase pipeline:
//!
//! 1. attack contribution (attacker effects add damage),
//! 2. to-hit roll against the dice oracle,
//! 3. defense (defender effects raise armor class or negate),
//! 4. attacker-hit effects (only on a successful, non-negated hit),
//! 5. defender-hit notification (always) and damage application.
//!
//! Phases execute sequentially and never interleave; the attack is mutated
//! in place. A hook fault inside any phase is recovered as a no-op and the
//! resolved attack always reaches phase 5.

mod attack;
mod resolver;

pub use attack::{Attack, AttackOutcome, Phase, ResolvedAttack, WeaponAttackKind};
pub use resolver::resolve;
