//! Five-phase attack resolution.

use super::attack::{Attack, AttackOutcome, Phase, ResolvedAttack};
use crate::animation::AnimationRequest;
use crate::effect::{AttackContext, Capabilities, Effect, EffectRegistry};
use crate::env::{EngineEnv, OracleError};
use crate::error::{FaultRecord, HookError};
use crate::state::{EntityId, WorldState};

/// Resolves `attack` through the full pipeline.
///
/// Effects run in their owner's attachment order within each phase;
/// attacker phases precede defender phases within a step, and the
/// defender-hit phase fires regardless of negation so "damage was blocked"
/// messaging stays possible. Hook faults are recorded and skipped, never
/// propagated.
///
/// # Errors
///
/// Only a missing dice or tables oracle aborts resolution - that is host
/// misconfiguration, checked before any phase runs.
pub fn resolve(
    mut attack: Attack,
    world: &mut WorldState,
    effects: &EffectRegistry,
    env: &EngineEnv<'_>,
) -> Result<ResolvedAttack, OracleError> {
    let params = *env.tables()?.combat();
    let dice = env.dice()?;

    let attacker = attack.attacker;
    let defender = attack.defender;
    let mut faults = Vec::new();
    let mut animations = Vec::new();

    // Phase 1: attack contribution.
    run_phase(
        effects,
        attacker,
        Capabilities::ON_ATTACK,
        Phase::AttackContribution,
        &mut attack,
        world,
        env,
        &mut faults,
        &mut animations,
        |effect, ctx| effect.on_attack(ctx),
    );

    // Phase 2: the raw accuracy roll. The hit flag is finalized after the
    // defense phase so AC raised there still participates in the check.
    let roll = dice.roll(1, params.hit.die_sides);

    // Phase 3: defense.
    run_phase(
        effects,
        defender,
        Capabilities::ON_DEFENSE,
        Phase::Defense,
        &mut attack,
        world,
        env,
        &mut faults,
        &mut animations,
        |effect, ctx| effect.on_defense(ctx),
    );

    let hit = if params.hit.auto_miss_on_min && roll <= 1 {
        false
    } else if params.hit.auto_hit_on_max && roll >= params.hit.die_sides as i32 {
        true
    } else {
        roll + attack.attack_bonus >= attack.defender_ac
    };
    attack.set_hit(hit);

    // Phase 4: attacker-hit, skipped entirely once negated.
    if hit && !attack.is_negated() {
        run_phase(
            effects,
            attacker,
            Capabilities::ON_ATTACK_HIT,
            Phase::AttackerHit,
            &mut attack,
            world,
            env,
            &mut faults,
            &mut animations,
            |effect, ctx| effect.on_attack_hit(ctx),
        );
    }

    // Phase 5: defender-hit notification runs unconditionally, exactly once.
    run_phase(
        effects,
        defender,
        Capabilities::ON_DEFENSE_HIT,
        Phase::DefenderHit,
        &mut attack,
        world,
        env,
        &mut faults,
        &mut animations,
        |effect, ctx| effect.on_defense_hit(ctx),
    );

    let mut damage_applied = 0;
    if hit && !attack.is_negated() {
        let damage = attack
            .base_damage
            .max(params.minimum_damage as i32)
            .max(0) as u32;
        // A defender that no longer exists makes application a no-op.
        if let Some(actor) = world.actor_mut(defender) {
            damage_applied = actor.apply_damage(damage);
        }
    }

    let outcome = if attack.is_negated() {
        AttackOutcome::Negated
    } else if hit {
        AttackOutcome::Hit
    } else {
        AttackOutcome::Miss
    };

    Ok(ResolvedAttack {
        attack,
        outcome,
        damage_applied,
        faults,
        animations,
    })
}

#[allow(clippy::too_many_arguments)]
fn run_phase<F>(
    effects: &EffectRegistry,
    owner: EntityId,
    capability: Capabilities,
    phase: Phase,
    attack: &mut Attack,
    world: &WorldState,
    env: &EngineEnv<'_>,
    faults: &mut Vec<FaultRecord>,
    animations: &mut Vec<AnimationRequest>,
    invoke: F,
) where
    F: Fn(&dyn Effect, &mut AttackContext<'_>) -> Result<(), HookError>,
{
    for effect in effects.effects_with(owner, capability) {
        let mut ctx = AttackContext::new(&mut *attack, owner, world, env, &mut *animations);
        if let Err(error) = invoke(effect.as_ref(), &mut ctx) {
            faults.push(FaultRecord {
                hook: effect.name().to_string(),
                during: phase.to_string(),
                error,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::combat::WeaponAttackKind;
    use crate::env::{CombatParams, DiceOracle, Env, RecordingMessageSink, TablesOracle};
    use crate::state::ActorState;

    struct FixedDice(i32);

    impl DiceOracle for FixedDice {
        fn roll(&self, _count: u32, _sides: u32) -> i32 {
            self.0
        }
    }

    struct Tables(CombatParams);

    impl TablesOracle for Tables {
        fn combat(&self) -> &CombatParams {
            &self.0
        }
    }

    struct AddDamage(i32);

    impl Effect for AddDamage {
        fn name(&self) -> &str {
            "add damage"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ON_ATTACK
        }

        fn on_attack(&self, ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
            ctx.attack.add_damage(self.0);
            Ok(())
        }
    }

    struct DoubleDamage;

    impl Effect for DoubleDamage {
        fn name(&self) -> &str {
            "double damage"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ON_ATTACK
        }

        fn on_attack(&self, ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
            ctx.attack.base_damage *= 2;
            Ok(())
        }
    }

    struct NegateAll;

    impl Effect for NegateAll {
        fn name(&self) -> &str {
            "negate all"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ON_DEFENSE
        }

        fn on_defense(&self, ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
            ctx.attack.negate();
            Ok(())
        }
    }

    struct RaiseAc(i32);

    impl Effect for RaiseAc {
        fn name(&self) -> &str {
            "raise ac"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ON_DEFENSE
        }

        fn on_defense(&self, ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
            ctx.attack.raise_ac(self.0);
            Ok(())
        }
    }

    struct CountDefenseHit(Arc<AtomicUsize>);

    impl Effect for CountDefenseHit {
        fn name(&self) -> &str {
            "count defense hit"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ON_DEFENSE_HIT
        }

        fn on_defense_hit(&self, _ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct CountAttackHit(Arc<AtomicUsize>);

    impl Effect for CountAttackHit {
        fn name(&self) -> &str {
            "count attack hit"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ON_ATTACK_HIT
        }

        fn on_attack_hit(&self, _ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Faulty;

    impl Effect for Faulty {
        fn name(&self) -> &str {
            "faulty"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ON_ATTACK
        }

        fn on_attack(&self, _ctx: &mut AttackContext<'_>) -> Result<(), HookError> {
            Err(HookError::new("script blew up"))
        }
    }

    fn world_with_pair() -> WorldState {
        let mut world = WorldState::new();
        world.insert_actor(ActorState::new(EntityId(1), "Attacker", 3, 40));
        world.insert_actor(ActorState::new(EntityId(2), "Defender", 3, 40));
        world
    }

    fn attack(base_damage: i32) -> Attack {
        Attack::new(EntityId(1), EntityId(2), WeaponAttackKind::Melee)
            .with_base_damage(base_damage)
            .with_attack_bonus(5)
            .with_defender_ac(12)
    }

    fn resolve_with(
        attack: Attack,
        world: &mut WorldState,
        effects: &EffectRegistry,
        roll: i32,
        sink: &RecordingMessageSink,
    ) -> ResolvedAttack {
        let dice = FixedDice(roll);
        let tables = Tables(CombatParams::default());
        let env: EngineEnv<'_> = Env::new(Some(&dice), Some(sink), None, Some(&tables));
        resolve(attack, world, effects, &env).expect("oracles are wired")
    }

    #[test]
    fn hit_applies_contributed_damage() {
        let mut world = world_with_pair();
        let mut effects = EffectRegistry::new();
        effects.attach(EntityId(1), Arc::new(AddDamage(5)));

        let sink = RecordingMessageSink::new();
        let resolved = resolve_with(attack(10), &mut world, &effects, 10, &sink);

        assert_eq!(resolved.outcome, AttackOutcome::Hit);
        assert_eq!(resolved.damage_applied, 15);
        assert_eq!(world.actor(EntityId(2)).unwrap().health.current, 25);
    }

    #[test]
    fn negation_skips_damage_but_defender_hit_still_fires_once() {
        let mut world = world_with_pair();
        let mut effects = EffectRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let attacker_hits = Arc::new(AtomicUsize::new(0));
        effects.attach(EntityId(2), Arc::new(NegateAll));
        effects.attach(EntityId(2), Arc::new(CountDefenseHit(Arc::clone(&hits))));
        effects.attach(
            EntityId(1),
            Arc::new(CountAttackHit(Arc::clone(&attacker_hits))),
        );

        let sink = RecordingMessageSink::new();
        let resolved = resolve_with(attack(10), &mut world, &effects, 10, &sink);

        assert_eq!(resolved.outcome, AttackOutcome::Negated);
        assert_eq!(resolved.damage_applied, 0);
        assert_eq!(world.actor(EntityId(2)).unwrap().health.current, 40);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(attacker_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn defender_hit_fires_even_on_a_miss() {
        let mut world = world_with_pair();
        let mut effects = EffectRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        effects.attach(EntityId(2), Arc::new(CountDefenseHit(Arc::clone(&hits))));

        let sink = RecordingMessageSink::new();
        let resolved = resolve_with(attack(10), &mut world, &effects, 2, &sink);

        assert_eq!(resolved.outcome, AttackOutcome::Miss);
        assert_eq!(resolved.damage_applied, 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn attachment_order_is_observable_for_non_additive_effects() {
        // +5 then ×2 on a base of 10 gives 30; ×2 then +5 gives 25.
        let mut world = world_with_pair();
        let mut effects = EffectRegistry::new();
        effects.attach(EntityId(1), Arc::new(AddDamage(5)));
        effects.attach(EntityId(1), Arc::new(DoubleDamage));
        let sink = RecordingMessageSink::new();
        let resolved = resolve_with(attack(10), &mut world, &effects, 10, &sink);
        assert_eq!(resolved.attack.base_damage, 30);

        let mut world = world_with_pair();
        let mut effects = EffectRegistry::new();
        effects.attach(EntityId(1), Arc::new(DoubleDamage));
        effects.attach(EntityId(1), Arc::new(AddDamage(5)));
        let sink = RecordingMessageSink::new();
        let resolved = resolve_with(attack(10), &mut world, &effects, 10, &sink);
        assert_eq!(resolved.attack.base_damage, 25);
    }

    #[test]
    fn ac_raised_in_defense_phase_turns_the_hit_into_a_miss() {
        let mut world = world_with_pair();
        let mut effects = EffectRegistry::new();
        effects.attach(EntityId(2), Arc::new(RaiseAc(8)));

        // Roll 10 + bonus 5 beats AC 12 but not the raised 20.
        let sink = RecordingMessageSink::new();
        let resolved = resolve_with(attack(10), &mut world, &effects, 10, &sink);

        assert_eq!(resolved.outcome, AttackOutcome::Miss);
        assert_eq!(resolved.damage_applied, 0);
    }

    #[test]
    fn maximum_roll_hits_through_any_armor() {
        let mut world = world_with_pair();
        let mut effects = EffectRegistry::new();
        effects.attach(EntityId(2), Arc::new(RaiseAc(90)));

        let sink = RecordingMessageSink::new();
        let resolved = resolve_with(attack(10), &mut world, &effects, 20, &sink);

        assert_eq!(resolved.outcome, AttackOutcome::Hit);
    }

    #[test]
    fn minimum_roll_misses_through_any_bonus() {
        let mut world = world_with_pair();
        let effects = EffectRegistry::new();
        let sink = RecordingMessageSink::new();
        let resolved = resolve_with(attack(10).with_attack_bonus(50), &mut world, &effects, 1, &sink);
        assert_eq!(resolved.outcome, AttackOutcome::Miss);
    }

    #[test]
    fn hook_fault_is_recorded_and_resolution_continues() {
        let mut world = world_with_pair();
        let mut effects = EffectRegistry::new();
        effects.attach(EntityId(1), Arc::new(Faulty));
        effects.attach(EntityId(1), Arc::new(AddDamage(5)));

        let sink = RecordingMessageSink::new();
        let resolved = resolve_with(attack(10), &mut world, &effects, 10, &sink);

        assert_eq!(resolved.faults.len(), 1);
        assert_eq!(resolved.faults[0].hook, "faulty");
        // The effect after the faulty one still ran.
        assert_eq!(resolved.damage_applied, 15);
    }

    #[test]
    fn missing_defender_applies_no_damage() {
        let mut world = WorldState::new();
        world.insert_actor(ActorState::new(EntityId(1), "Attacker", 3, 40));
        let effects = EffectRegistry::new();

        let sink = RecordingMessageSink::new();
        let resolved = resolve_with(attack(10), &mut world, &effects, 10, &sink);

        assert_eq!(resolved.outcome, AttackOutcome::Hit);
        assert_eq!(resolved.damage_applied, 0);
    }

    #[test]
    fn missing_dice_oracle_aborts_before_any_phase() {
        let mut world = world_with_pair();
        let effects = EffectRegistry::new();
        let tables = Tables(CombatParams::default());
        let env: EngineEnv<'_> = Env::new(None, None, None, Some(&tables));

        let result = resolve(attack(10), &mut world, &effects, &env);
        assert_eq!(result.unwrap_err(), OracleError::DiceNotAvailable);
    }
}
