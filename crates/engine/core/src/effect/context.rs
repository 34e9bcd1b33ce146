//! Execution contexts passed to effect hooks.

use crate::animation::AnimationRequest;
use crate::combat::Attack;
use crate::env::{Channel, EngineEnv};
use crate::flags::PersistentFlagStore;
use crate::item::{InventoryCommand, ProvokedAction};
use crate::state::{EntityId, ItemState, WorldState};

/// Context for combat-phase hooks.
///
/// The attack is mutated in place across phases; the world is read-only here
/// because damage application belongs to the resolver, after all phases ran.
pub struct AttackContext<'a> {
    /// The attack being resolved.
    pub attack: &'a mut Attack,

    /// Combatant the running effect is attached to.
    pub owner: EntityId,

    /// Read-only world access for lookups (off-hand items, stats).
    pub world: &'a WorldState,

    /// Host collaborators.
    pub env: &'a EngineEnv<'a>,

    animations: &'a mut Vec<AnimationRequest>,
}

impl<'a> AttackContext<'a> {
    pub fn new(
        attack: &'a mut Attack,
        owner: EntityId,
        world: &'a WorldState,
        env: &'a EngineEnv<'a>,
        animations: &'a mut Vec<AnimationRequest>,
    ) -> Self {
        Self {
            attack,
            owner,
            world,
            env,
            animations,
        }
    }

    /// Sends `text` on `channel`. No-op when the host wired no sink.
    pub fn message(&self, channel: Channel, text: &str) {
        if let Ok(sink) = self.env.messages() {
            sink.add_message(channel, text);
        }
    }

    /// Queues a visual effect for the host to play after resolution.
    pub fn request_animation(&mut self, request: AnimationRequest) {
        self.animations.push(request);
    }
}

/// Context for item-interaction hooks (`on_use` / `on_open`).
///
/// The item snapshot stays valid for the whole call even if the hook
/// requests its own removal; inventory commands queue here and are applied
/// by the dispatcher only after every hook returned.
pub struct ItemContext<'a> {
    /// Snapshot of the item being used or opened.
    pub item: &'a ItemState,

    /// Actor performing the interaction.
    pub user: EntityId,

    /// Optional interaction target.
    pub target: Option<EntityId>,

    /// Mutable world access for script-defined side effects (healing,
    /// unlocking). Inventory membership is off-limits - queue commands
    /// instead.
    pub world: &'a mut WorldState,

    /// Campaign flags for guard conditions.
    pub flags: &'a PersistentFlagStore,

    /// Host collaborators.
    pub env: &'a EngineEnv<'a>,

    commands: &'a mut Vec<InventoryCommand>,
    provoked: &'a mut Vec<ProvokedAction>,
    animations: &'a mut Vec<AnimationRequest>,
}

impl<'a> ItemContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        item: &'a ItemState,
        user: EntityId,
        target: Option<EntityId>,
        world: &'a mut WorldState,
        flags: &'a PersistentFlagStore,
        env: &'a EngineEnv<'a>,
        commands: &'a mut Vec<InventoryCommand>,
        provoked: &'a mut Vec<ProvokedAction>,
        animations: &'a mut Vec<AnimationRequest>,
    ) -> Self {
        Self {
            item,
            user,
            target,
            world,
            flags,
            env,
            commands,
            provoked,
            animations,
        }
    }

    /// Queues removal of the item being interacted with (consumption).
    pub fn remove_self(&mut self) {
        self.commands.push(InventoryCommand::Remove(self.item.id));
    }

    /// Queues spending one charge of the item being interacted with.
    pub fn spend_charge(&mut self) {
        self.commands.push(InventoryCommand::SpendCharge(self.item.id));
    }

    /// Requests a secondary action to be executed by the combat subsystem
    /// after this hook returns.
    pub fn provoke(&mut self, action: ProvokedAction) {
        self.provoked.push(action);
    }

    /// Sends `text` on `channel`. No-op when the host wired no sink.
    pub fn message(&self, channel: Channel, text: &str) {
        if let Ok(sink) = self.env.messages() {
            sink.add_message(channel, text);
        }
    }

    /// Queues a visual effect for the host to play after dispatch.
    pub fn request_animation(&mut self, request: AnimationRequest) {
        self.animations.push(request);
    }
}
