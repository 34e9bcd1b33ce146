//! World state tracked by the engine while hooks run.
//!
//! Combatants and items are owned by [`WorldState`] and referenced everywhere
//! else by id. Lookups return `Option` - a missing entity is a valid outcome
//! that callers branch on, never an error.

use std::collections::BTreeMap;
use std::fmt;

use crate::combat::WeaponAttackKind;

/// Unique identifier for any entity tracked in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier for an area/map that triggers are bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaId(pub u32);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "area#{}", self.0)
    }
}

/// Integer resource meter (health) tracked per actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Removes up to `amount` from the meter and returns what was removed.
    pub fn deplete(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Restores up to `amount` without exceeding the maximum; returns what
    /// was restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.maximum - self.current);
        self.current += restored;
        restored
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

/// A combatant tracked in the world.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: EntityId,
    pub name: String,
    pub level: u8,
    pub armor_class: i32,
    pub attack_bonus: i32,
    pub health: ResourceMeter,
    /// Item wielded in the main hand, if any.
    pub main_hand: Option<EntityId>,
    /// Item wielded in the off hand, if any.
    pub off_hand: Option<EntityId>,
}

impl ActorState {
    pub fn new(id: EntityId, name: impl Into<String>, level: u8, health: u32) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            armor_class: 10,
            attack_bonus: 0,
            health: ResourceMeter::full(health),
            main_hand: None,
            off_hand: None,
        }
    }

    /// Applies damage to the health pool; returns the amount actually removed.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        self.health.deplete(amount)
    }

    pub fn is_downed(&self) -> bool {
        self.health.is_empty()
    }
}

/// Weapon-specific item data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponData {
    pub attack_kind: WeaponAttackKind,
    pub damage: i32,
}

/// Container-specific item data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerData {
    pub locked: bool,
    /// Campaign flag whose presence counts as holding the key.
    pub key_flag: Option<String>,
}

/// Item type with type-specific data.
///
/// Base + kind pattern: common fields live on [`ItemState`], type-specific
/// data in the kind variant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Weapon(WeaponData),
    /// Consumable with a limited number of charges.
    Consumable { charges: u16 },
    Container(ContainerData),
    Trinket,
}

/// An item tracked in the world (in an inventory or placed in an area).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemState {
    pub id: EntityId,
    pub name: String,
    pub kind: ItemKind,
}

impl ItemState {
    pub fn new(id: EntityId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    /// Weapon data if this item is a weapon.
    pub fn weapon(&self) -> Option<&WeaponData> {
        match &self.kind {
            ItemKind::Weapon(data) => Some(data),
            _ => None,
        }
    }
}

/// All actors and items the engine can reach during hook dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState {
    actors: BTreeMap<EntityId, ActorState>,
    items: BTreeMap<EntityId, ItemState>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_actor(&mut self, actor: ActorState) {
        self.actors.insert(actor.id, actor);
    }

    pub fn insert_item(&mut self, item: ItemState) {
        self.items.insert(item.id, item);
    }

    /// Looks up an actor by id. Absence is a valid, non-error outcome.
    pub fn actor(&self, id: EntityId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    /// Looks up an item by id. Absence is a valid, non-error outcome.
    pub fn item(&self, id: EntityId) -> Option<&ItemState> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: EntityId) -> Option<&mut ItemState> {
        self.items.get_mut(&id)
    }

    pub fn remove_item(&mut self, id: EntityId) -> Option<ItemState> {
        self.items.remove(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemState> {
        self.items.values()
    }
}
