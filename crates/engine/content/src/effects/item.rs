//! Item interaction effects.

use engine_core::{
    Capabilities, Channel, Effect, HookError, ItemContext, ItemKind, PopupLayout, ProvokedAction,
};

use super::params::HealingParams;

/// Consumable heal. Rolls its dice, restores the user, removes itself from
/// the inventory, and optionally exposes the drinker to an opportunity
/// attack.
#[derive(Clone, Copy, Debug)]
pub struct HealingDraught {
    params: HealingParams,
}

impl HealingDraught {
    pub fn new(params: HealingParams) -> Self {
        Self { params }
    }
}

impl Effect for HealingDraught {
    fn name(&self) -> &str {
        "Healing Draught"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ON_USE
    }

    fn on_use(&self, ctx: &mut ItemContext<'_>) -> Result<(), HookError> {
        let dice = ctx.env.dice()?;
        let healed = (dice.roll(self.params.dice(), self.params.sides()) + self.params.bonus())
            .max(0) as u32;

        let user = ctx.user;
        let restored = match ctx.world.actor_mut(user) {
            Some(actor) => actor.health.restore(healed),
            // The drinker vanished mid-interaction; the draught is still
            // consumed below.
            None => 0,
        };
        if let Some(actor) = ctx.world.actor(user) {
            ctx.message(
                Channel::Entity(user),
                &format!("{} recovers {} health.", actor.name, restored),
            );
        }

        ctx.remove_self();
        if self.params.provokes() {
            ctx.provoke(ProvokedAction::OpportunityAttack { target: user });
        }
        Ok(())
    }
}

/// Flag-guarded container. Opening it with the key flag set unlocks it;
/// opening an unlocked coffer requests the loot popup.
#[derive(Clone, Debug)]
pub struct SealedCoffer {
    loot_panel: String,
}

impl SealedCoffer {
    pub fn new(loot_panel: impl Into<String>) -> Self {
        Self {
            loot_panel: loot_panel.into(),
        }
    }
}

impl Effect for SealedCoffer {
    fn name(&self) -> &str {
        "Sealed Coffer"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ON_OPEN
    }

    fn on_open(&self, ctx: &mut ItemContext<'_>) -> Result<(), HookError> {
        let ItemKind::Container(container) = &ctx.item.kind else {
            return Err(HookError::new("Sealed Coffer attached to a non-container"));
        };

        if container.locked {
            let has_key = container
                .key_flag
                .as_deref()
                .is_some_and(|flag| ctx.flags.contains(flag));
            if !has_key {
                ctx.message(
                    Channel::Entity(ctx.user),
                    &format!("The {} is locked.", ctx.item.name),
                );
                return Ok(());
            }
            let item_id = ctx.item.id;
            if let Some(state) = ctx.world.item_mut(item_id)
                && let ItemKind::Container(container) = &mut state.kind
            {
                container.locked = false;
            }
            ctx.message(
                Channel::Entity(ctx.user),
                &format!("The {} unlocks with a click.", ctx.item.name),
            );
            return Ok(());
        }

        // Display is asynchronous; the request returns immediately.
        if let Ok(scene) = ctx.env.scene() {
            scene.show_popup(&self.loot_panel, PopupLayout::default());
        }
        Ok(())
    }
}
