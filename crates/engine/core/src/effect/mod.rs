//! Effects and the capability-tagged hook interface.
//!
//! An effect is a named bundle of hook implementations attached to a
//! combatant or item. Each implementation declares the capabilities it
//! supports; dispatchers invoke only the matching method for the phase being
//! run - capability tags, never name strings, decide dispatch.

mod context;
mod registry;

pub use context::{AttackContext, ItemContext};
pub use registry::{EffectId, EffectRegistry};

use crate::error::HookError;

bitflags::bitflags! {
    /// Hook capabilities an effect may implement.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Attack-contribution phase on the attacker's side.
        const ON_ATTACK = 1 << 0;
        /// Defense phase on the defender's side.
        const ON_DEFENSE = 1 << 1;
        /// Post-hit phase on the attacker's side.
        const ON_ATTACK_HIT = 1 << 2;
        /// Unconditional notification phase on the defender's side.
        const ON_DEFENSE_HIT = 1 << 3;
        /// Item activation.
        const ON_USE = 1 << 4;
        /// Container opening.
        const ON_OPEN = 1 << 5;
    }
}

/// A named bundle of hook implementations.
///
/// Implementations override the methods matching their declared
/// [`Capabilities`]; the defaults are no-ops so an effect only writes the
/// phases it participates in. A returned [`HookError`] is recovered by the
/// dispatcher - the effect is skipped for that phase and resolution
/// continues.
pub trait Effect: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    fn on_attack(&self, _ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
        Ok(())
    }

    fn on_defense(&self, _ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
        Ok(())
    }

    fn on_attack_hit(&self, _ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
        Ok(())
    }

    fn on_defense_hit(&self, _ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
        Ok(())
    }

    fn on_use(&self, _ctx: &mut ItemContext<'_>) -> Result<(), HookError> {
        Ok(())
    }

    fn on_open(&self, _ctx: &mut ItemContext<'_>) -> Result<(), HookError> {
        Ok(())
    }
}
