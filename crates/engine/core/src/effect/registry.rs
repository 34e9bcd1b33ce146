//! Registry of effects attached to combatants and items.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{Capabilities, Effect};
use crate::state::EntityId;

/// Identity of one attachment.
///
/// The same effect instance can be attached twice (stacking); each
/// attachment gets its own id, and detachment removes exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectId(u64);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

struct Attachment {
    id: EffectId,
    effect: Arc<dyn Effect>,
}

/// Holds the active effects of every combatant and item.
///
/// Each attachment is exclusively owned by exactly one target; per-target
/// order is attachment order, which is the order dispatchers run hooks in.
#[derive(Default)]
pub struct EffectRegistry {
    attachments: BTreeMap<EntityId, Vec<Attachment>>,
    next_id: u64,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `effect` to `target`, appending it after the target's
    /// existing effects.
    pub fn attach(&mut self, target: EntityId, effect: Arc<dyn Effect>) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.attachments
            .entry(target)
            .or_default()
            .push(Attachment { id, effect });
        id
    }

    /// Removes the attachment `id` from `target`. Returns whether anything
    /// was removed; later attachments keep their relative order.
    pub fn detach(&mut self, target: EntityId, id: EffectId) -> bool {
        let Some(list) = self.attachments.get_mut(&target) else {
            return false;
        };
        let before = list.len();
        list.retain(|attachment| attachment.id != id);
        if list.is_empty() {
            self.attachments.remove(&target);
        }
        before != self.attachments.get(&target).map_or(0, Vec::len)
    }

    /// Effects of `target` implementing any of `capabilities`, in
    /// attachment order.
    pub fn effects_with(
        &self,
        target: EntityId,
        capabilities: Capabilities,
    ) -> impl Iterator<Item = &Arc<dyn Effect>> + '_ {
        self.attachments
            .get(&target)
            .into_iter()
            .flatten()
            .filter(move |attachment| attachment.effect.capabilities().intersects(capabilities))
            .map(|attachment| &attachment.effect)
    }

    /// All effects of `target`, in attachment order.
    pub fn effects(&self, target: EntityId) -> impl Iterator<Item = &Arc<dyn Effect>> + '_ {
        self.attachments
            .get(&target)
            .into_iter()
            .flatten()
            .map(|attachment| &attachment.effect)
    }

    pub fn count(&self, target: EntityId) -> usize {
        self.attachments.get(&target).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker {
        name: &'static str,
        capabilities: Capabilities,
    }

    impl Effect for Marker {
        fn name(&self) -> &str {
            self.name
        }

        fn capabilities(&self) -> Capabilities {
            self.capabilities
        }
    }

    fn marker(name: &'static str, capabilities: Capabilities) -> Arc<dyn Effect> {
        Arc::new(Marker { name, capabilities })
    }

    #[test]
    fn effects_come_back_in_attachment_order() {
        let mut registry = EffectRegistry::new();
        let target = EntityId(1);
        registry.attach(target, marker("first", Capabilities::ON_ATTACK));
        registry.attach(target, marker("second", Capabilities::ON_ATTACK));
        registry.attach(target, marker("third", Capabilities::ON_ATTACK));

        let names: Vec<_> = registry
            .effects_with(target, Capabilities::ON_ATTACK)
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn capability_filter_skips_non_matching_effects() {
        let mut registry = EffectRegistry::new();
        let target = EntityId(1);
        registry.attach(target, marker("ward", Capabilities::ON_DEFENSE));
        registry.attach(target, marker("strike", Capabilities::ON_ATTACK));

        let names: Vec<_> = registry
            .effects_with(target, Capabilities::ON_DEFENSE)
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, ["ward"]);
    }

    #[test]
    fn stacking_attaches_the_same_instance_twice() {
        let mut registry = EffectRegistry::new();
        let target = EntityId(2);
        let instance = marker("stacking", Capabilities::ON_ATTACK);
        let first = registry.attach(target, Arc::clone(&instance));
        let second = registry.attach(target, instance);

        assert_ne!(first, second);
        assert_eq!(registry.count(target), 2);
    }

    #[test]
    fn detach_removes_exactly_one_attachment_by_identity() {
        let mut registry = EffectRegistry::new();
        let target = EntityId(3);
        let instance = marker("stacking", Capabilities::ON_ATTACK);
        let first = registry.attach(target, Arc::clone(&instance));
        registry.attach(target, instance);

        assert!(registry.detach(target, first));
        assert_eq!(registry.count(target), 1);
        assert!(!registry.detach(target, first));
    }

    #[test]
    fn targets_own_their_attachments_exclusively() {
        let mut registry = EffectRegistry::new();
        let id = registry.attach(EntityId(1), marker("ward", Capabilities::ON_DEFENSE));
        assert!(!registry.detach(EntityId(2), id));
        assert_eq!(registry.count(EntityId(1)), 1);
    }
}
