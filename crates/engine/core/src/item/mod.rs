//! Item interaction dispatch (`on_use` / `on_open`).
//!
//! Hook bodies define the side effects (healing, unlocking, consuming); the
//! dispatcher guarantees the mechanics: the item snapshot stays valid for
//! the whole call, inventory mutations queue and apply atomically after the
//! hooks return, and provoked secondary actions are handed back to the
//! caller for the combat subsystem - hooks never nest.

use crate::animation::AnimationRequest;
use crate::effect::{Capabilities, Effect, EffectRegistry, ItemContext};
use crate::env::EngineEnv;
use crate::error::{FaultRecord, HookError};
use crate::flags::PersistentFlagStore;
use crate::state::{EntityId, ItemKind, WorldState};

/// Inventory mutation queued by a hook, applied after dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InventoryCommand {
    /// Remove the item from the world (consumption, destruction).
    Remove(EntityId),
    /// Spend one charge of a consumable.
    SpendCharge(EntityId),
}

/// Secondary action requested by a hook, executed by the combat subsystem
/// after the current hook returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProvokedAction {
    /// The interaction exposed `target` to an opportunity attack.
    OpportunityAttack { target: EntityId },
}

/// Result of one item interaction.
#[derive(Debug, Default)]
pub struct ItemOutcome {
    /// Hooks that ran.
    pub fired: usize,
    /// Hook faults recovered during dispatch.
    pub faults: Vec<FaultRecord>,
    /// Items removed after the hooks returned.
    pub removed: Vec<EntityId>,
    /// Secondary actions for the combat subsystem.
    pub provoked: Vec<ProvokedAction>,
    /// Visual effects queued by hooks, for the host to play.
    pub animations: Vec<AnimationRequest>,
}

/// Fires the `on_use` hooks of `item`.
///
/// A missing item yields an empty outcome - absence is a valid result the
/// caller branches on, not an error.
pub fn use_item(
    item: EntityId,
    user: EntityId,
    target: Option<EntityId>,
    world: &mut WorldState,
    effects: &EffectRegistry,
    flags: &PersistentFlagStore,
    env: &EngineEnv<'_>,
) -> ItemOutcome {
    dispatch(item, user, target, Capabilities::ON_USE, world, effects, flags, env, |e, ctx| {
        e.on_use(ctx)
    })
}

/// Fires the `on_open` hooks of `item`.
pub fn open_item(
    item: EntityId,
    actor: EntityId,
    world: &mut WorldState,
    effects: &EffectRegistry,
    flags: &PersistentFlagStore,
    env: &EngineEnv<'_>,
) -> ItemOutcome {
    dispatch(item, actor, None, Capabilities::ON_OPEN, world, effects, flags, env, |e, ctx| {
        e.on_open(ctx)
    })
}

#[allow(clippy::too_many_arguments)]
fn dispatch<F>(
    item: EntityId,
    user: EntityId,
    target: Option<EntityId>,
    capability: Capabilities,
    world: &mut WorldState,
    effects: &EffectRegistry,
    flags: &PersistentFlagStore,
    env: &EngineEnv<'_>,
    invoke: F,
) -> ItemOutcome
where
    F: Fn(&dyn Effect, &mut ItemContext<'_>) -> Result<(), HookError>,
{
    let mut outcome = ItemOutcome::default();

    // Snapshot keeps the item reference valid for the hooks even if they
    // queue its own removal.
    let Some(snapshot) = world.item(item).cloned() else {
        return outcome;
    };

    let mut commands = Vec::new();
    for effect in effects.effects_with(item, capability) {
        let mut ctx = ItemContext::new(
            &snapshot,
            user,
            target,
            &mut *world,
            flags,
            env,
            &mut commands,
            &mut outcome.provoked,
            &mut outcome.animations,
        );
        match invoke(effect.as_ref(), &mut ctx) {
            Ok(()) => outcome.fired += 1,
            Err(error) => outcome.faults.push(FaultRecord {
                hook: effect.name().to_string(),
                during: capability_label(capability).to_string(),
                error,
            }),
        }
    }

    // Inventory mutations apply atomically here, never interleaved with the
    // hook bodies above.
    for command in commands {
        match command {
            InventoryCommand::Remove(id) => {
                if world.remove_item(id).is_some() {
                    outcome.removed.push(id);
                }
            }
            InventoryCommand::SpendCharge(id) => {
                if let Some(state) = world.item_mut(id)
                    && let ItemKind::Consumable { charges } = &mut state.kind
                {
                    *charges = charges.saturating_sub(1);
                }
            }
        }
    }

    outcome
}

fn capability_label(capability: Capabilities) -> &'static str {
    if capability.contains(Capabilities::ON_OPEN) {
        "open"
    } else {
        "use"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::env::Env;
    use crate::state::{ActorState, ItemState};

    struct ConsumeSelf {
        item_present_during_hook: Arc<AtomicBool>,
    }

    impl Effect for ConsumeSelf {
        fn name(&self) -> &str {
            "consume self"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ON_USE
        }

        fn on_use(&self, ctx: &mut ItemContext<'_>) -> Result<(), HookError> {
            ctx.remove_self();
            // The queued removal must not be observable yet.
            let still_there = ctx.world.item(ctx.item.id).is_some();
            self.item_present_during_hook.store(still_there, Ordering::SeqCst);
            Ok(())
        }
    }

    struct HealUser(u32);

    impl Effect for HealUser {
        fn name(&self) -> &str {
            "heal user"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ON_USE
        }

        fn on_use(&self, ctx: &mut ItemContext<'_>) -> Result<(), HookError> {
            let user = ctx.user;
            if let Some(actor) = ctx.world.actor_mut(user) {
                actor.health.restore(self.0);
            }
            ctx.provoke(ProvokedAction::OpportunityAttack { target: user });
            Ok(())
        }
    }

    struct SpendOne;

    impl Effect for SpendOne {
        fn name(&self) -> &str {
            "spend one"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ON_USE
        }

        fn on_use(&self, ctx: &mut ItemContext<'_>) -> Result<(), HookError> {
            ctx.spend_charge();
            Ok(())
        }
    }

    fn world_with_user_and_potion() -> WorldState {
        let mut world = WorldState::new();
        let mut user = ActorState::new(EntityId(1), "Drinker", 1, 30);
        user.health.current = 10;
        world.insert_actor(user);
        world.insert_item(ItemState::new(
            EntityId(100),
            "Potion",
            ItemKind::Consumable { charges: 2 },
        ));
        world
    }

    #[test]
    fn removal_is_applied_only_after_the_hook_returns() {
        let mut world = world_with_user_and_potion();
        let mut effects = EffectRegistry::new();
        let present = Arc::new(AtomicBool::new(false));
        effects.attach(
            EntityId(100),
            Arc::new(ConsumeSelf {
                item_present_during_hook: Arc::clone(&present),
            }),
        );

        let flags = PersistentFlagStore::new();
        let env = Env::empty();
        let outcome = use_item(EntityId(100), EntityId(1), None, &mut world, &effects, &flags, &env);

        assert!(present.load(Ordering::SeqCst), "item must stay valid inside the hook");
        assert_eq!(outcome.removed, [EntityId(100)]);
        assert!(world.item(EntityId(100)).is_none());
    }

    #[test]
    fn hooks_mutate_the_world_and_provoke_secondary_actions() {
        let mut world = world_with_user_and_potion();
        let mut effects = EffectRegistry::new();
        effects.attach(EntityId(100), Arc::new(HealUser(15)));

        let flags = PersistentFlagStore::new();
        let env = Env::empty();
        let outcome = use_item(EntityId(100), EntityId(1), None, &mut world, &effects, &flags, &env);

        assert_eq!(world.actor(EntityId(1)).unwrap().health.current, 25);
        assert_eq!(
            outcome.provoked,
            [ProvokedAction::OpportunityAttack { target: EntityId(1) }]
        );
    }

    #[test]
    fn spending_a_charge_decrements_after_dispatch() {
        let mut world = world_with_user_and_potion();
        let mut effects = EffectRegistry::new();
        effects.attach(EntityId(100), Arc::new(SpendOne));

        let flags = PersistentFlagStore::new();
        let env = Env::empty();
        use_item(EntityId(100), EntityId(1), None, &mut world, &effects, &flags, &env);

        assert_eq!(
            world.item(EntityId(100)).unwrap().kind,
            ItemKind::Consumable { charges: 1 }
        );
    }

    #[test]
    fn missing_item_yields_an_empty_outcome() {
        let mut world = WorldState::new();
        let effects = EffectRegistry::new();
        let flags = PersistentFlagStore::new();
        let env = Env::empty();

        let outcome = use_item(EntityId(404), EntityId(1), None, &mut world, &effects, &flags, &env);
        assert_eq!(outcome.fired, 0);
        assert!(outcome.removed.is_empty());
    }
}
