//! Combat-phase effects.

use engine_core::{AttackContext, Capabilities, Channel, Effect, HookError};

use super::params::{ArmorScalingParams, VenomParams};

/// Folds the owner's off-hand weapon damage into the attack, combining the
/// paired strike into one roll.
#[derive(Clone, Copy, Debug, Default)]
pub struct OffhandStrike;

impl Effect for OffhandStrike {
    fn name(&self) -> &str {
        "Offhand Strike"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ON_ATTACK
    }

    fn on_attack(&self, ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
        // No off-hand weapon is a valid state, not a fault.
        let Some(off_hand) = ctx
            .world
            .actor(ctx.owner)
            .and_then(|actor| actor.off_hand)
        else {
            return Ok(());
        };
        if let Some(weapon) = ctx.world.item(off_hand).and_then(|item| item.weapon().copied()) {
            ctx.attack.add_damage(weapon.damage);
        }
        Ok(())
    }
}

/// Negates ranged attacks entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeflectProjectiles;

impl Effect for DeflectProjectiles {
    fn name(&self) -> &str {
        "Deflect Projectiles"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ON_DEFENSE
    }

    fn on_defense(&self, ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
        if ctx.attack.kind.is_ranged() {
            ctx.attack.negate();
            ctx.message(
                Channel::Entity(ctx.owner),
                &format!("Damage negated by {}.", self.name()),
            );
        }
        Ok(())
    }
}

/// Raises armor class by a level-scaled blessing.
#[derive(Clone, Copy, Debug)]
pub struct ArmorOfFaith {
    params: ArmorScalingParams,
}

impl ArmorOfFaith {
    pub fn new(params: ArmorScalingParams) -> Self {
        Self { params }
    }
}

impl Effect for ArmorOfFaith {
    fn name(&self) -> &str {
        "Armor of Faith"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ON_DEFENSE
    }

    fn on_defense(&self, ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
        if let Some(owner) = ctx.world.actor(ctx.owner) {
            ctx.attack.raise_ac(self.params.bonus_for_level(owner.level));
        }
        Ok(())
    }
}

/// Adds venom damage once a hit is confirmed.
#[derive(Clone, Copy, Debug)]
pub struct VenomFang {
    params: VenomParams,
}

impl VenomFang {
    pub fn new(params: VenomParams) -> Self {
        Self { params }
    }
}

impl Effect for VenomFang {
    fn name(&self) -> &str {
        "Venom Fang"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ON_ATTACK_HIT
    }

    fn on_attack_hit(&self, ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
        ctx.attack.add_damage(self.params.bonus_damage());
        if let Some(defender) = ctx.world.actor(ctx.attack.defender) {
            ctx.message(
                Channel::Combat,
                &format!("{} is wracked by venom.", defender.name),
            );
        }
        Ok(())
    }
}

/// Notification hook on the defender's side; fires even when damage was
/// negated, which is what makes "the blow was blocked" messaging possible.
#[derive(Clone, Copy, Debug, Default)]
pub struct VigilantGuard;

impl Effect for VigilantGuard {
    fn name(&self) -> &str {
        "Vigilant Guard"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ON_DEFENSE_HIT
    }

    fn on_defense_hit(&self, ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
        let Some(owner) = ctx.world.actor(ctx.owner) else {
            return Ok(());
        };
        let text = if ctx.attack.is_negated() || !ctx.attack.is_hit() {
            format!("{} stands unscathed.", owner.name)
        } else {
            format!("{} staggers from the blow.", owner.name)
        };
        ctx.message(Channel::Entity(ctx.owner), &text);
        Ok(())
    }
}
