//! Interactive block harvest: one action, several interception points.
//!
//! Harvesting a block by hand is observed at four points inside a single
//! engine routine: the routine starts, the target block is read, the actor is
//! checked, the block is removed, and the drop is picked up. The break verdict
//! is computed once at the actor check and then steers the two later effects
//! through a [`HarvestContext`] the caller owns and threads through the
//! routine. Nothing is stored per thread or per actor.
use guard_core::{
    ActorId, BlockPos, Decision, DenyMode, PositionHook, PositionQuery, Slot, Vec3, Verdict,
    WorldId,
};

use super::GateCore;
use crate::binding::{Binding, BindingCache};
use crate::features;

/// Call-scoped record of one harvest action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarvestContext {
    verdict: Verdict,
    reason: Option<String>,
    actor: Option<ActorId>,
    target: Option<BlockPos>,
}

impl HarvestContext {
    pub fn new() -> Self {
        Self {
            verdict: Verdict::Allow,
            reason: None,
            actor: None,
            target: None,
        }
    }

    /// Break verdict recorded by [`HarvestGate::evaluate_break`].
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn actor(&self) -> Option<ActorId> {
        self.actor
    }

    pub fn target(&self) -> Option<BlockPos> {
        self.target
    }

    pub fn is_break_denied(&self) -> bool {
        self.verdict.is_deny()
    }
}

impl Default for HarvestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub struct HarvestGate {
    core: GateCore,
    break_binding: BindingCache<PositionHook>,
    pickup_binding: BindingCache<PositionHook>,
}

impl HarvestGate {
    pub fn new(core: GateCore) -> Self {
        core.declare(features::for_slot(Slot::BlockBreak));
        Self {
            core,
            break_binding: BindingCache::new(),
            pickup_binding: BindingCache::new(),
        }
    }

    /// Stage 1: a fresh context for a new harvest action.
    pub fn begin(&self) -> HarvestContext {
        HarvestContext::new()
    }

    /// Stage 2: remembers the block being harvested.
    pub fn capture_target(&self, ctx: &mut HarvestContext, target: BlockPos) {
        ctx.target = Some(target);
    }

    /// Stage 3: evaluates the `block_break` hook against the captured target
    /// and records the verdict (and, for messaged denials, the reason).
    ///
    /// Without a captured target, an actor, or a world the break is ungated.
    pub fn evaluate_break(
        &self,
        ctx: &mut HarvestContext,
        actor: Option<ActorId>,
        world: Option<WorldId>,
    ) -> Decision {
        ctx.actor = actor;
        let Some(target) = ctx.target else {
            return Decision::Allowed;
        };
        let Some(binding) =
            self.break_binding
                .resolve(self.core.registry(), Slot::BlockBreak, self.core.faults())
        else {
            return Decision::Allowed;
        };
        let Some(query) = PositionQuery::gather(actor, world, target) else {
            return Decision::Allowed;
        };
        let Some(verdict) = self.evaluate(&binding, &query) else {
            return Decision::Allowed;
        };

        if verdict.is_deny() {
            ctx.verdict = verdict;
            if verdict == Verdict::DenyWithMessage {
                ctx.reason = self.deny_reason(&binding, &query);
            }
        }
        verdict.decision()
    }

    /// Stage 4: whether the engine may remove the block. On a messaged denial
    /// the stored reason is delivered to the recorded actor.
    pub fn should_remove_block(&self, ctx: &HarvestContext) -> bool {
        if !ctx.is_break_denied() {
            return true;
        }
        if ctx.verdict == Verdict::DenyWithMessage
            && let Some(actor) = ctx.actor
        {
            self.core.notify(actor, ctx.reason());
        }
        false
    }

    /// Stage 5: whether the drop may be picked up. Skipped outright when the
    /// break was denied; otherwise the `item_pickup` hook is asked at the
    /// pickup origin.
    pub fn check_pickup(
        &self,
        ctx: &HarvestContext,
        actor: Option<ActorId>,
        world: Option<WorldId>,
        origin: Option<Vec3>,
    ) -> Decision {
        if ctx.is_break_denied() {
            return Decision::Denied(DenyMode::Silent);
        }
        let Some(binding) =
            self.pickup_binding
                .resolve(self.core.registry(), Slot::ItemPickup, self.core.faults())
        else {
            return Decision::Allowed;
        };
        let Some(origin) = origin else {
            return Decision::Allowed;
        };
        let Some(query) = PositionQuery::gather(actor, world, origin.to_block()) else {
            return Decision::Allowed;
        };
        let Some(verdict) = self.evaluate(&binding, &query) else {
            return Decision::Allowed;
        };

        if verdict == Verdict::DenyWithMessage {
            let reason = self.deny_reason(&binding, &query);
            self.core.notify(query.actor, reason.as_deref());
        }
        verdict.decision()
    }

    fn evaluate(&self, binding: &Binding<PositionHook>, query: &PositionQuery) -> Option<Verdict> {
        self.core
            .invoke(|| binding.primary().evaluate(query))
            .map(Verdict::from_code)
    }

    fn deny_reason(&self, binding: &Binding<PositionHook>, query: &PositionQuery) -> Option<String> {
        let reasons = binding.primary().deny_reasons()?;
        self.core.invoke(|| reasons.deny_reason(query)).flatten()
    }

    pub fn core(&self) -> &GateCore {
        &self.core
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use guard_core::{HookObject, HookResult, VerdictHook};

    use super::*;
    use crate::registry::HookRegistry;

    struct Fixed(i32);
    impl VerdictHook<PositionQuery> for Fixed {
        fn evaluate(&self, _query: &PositionQuery) -> HookResult<i32> {
            Ok(self.0)
        }
    }

    fn harvest_gate() -> (Arc<HookRegistry>, HarvestGate) {
        let registry = Arc::new(HookRegistry::new());
        let gate = HarvestGate::new(GateCore::new("HarvestGate", Arc::clone(&registry)));
        (registry, gate)
    }

    #[test]
    fn no_target_means_no_evaluation() {
        let (registry, gate) = harvest_gate();
        registry.attach(Slot::BlockBreak, HookObject::position(Fixed(2)));

        let mut ctx = gate.begin();
        let decision = gate.evaluate_break(&mut ctx, Some(ActorId::random()), Some("farm".into()));
        assert_eq!(decision, Decision::Allowed);
        assert!(gate.should_remove_block(&ctx));
    }

    #[test]
    fn silent_break_denial_blocks_both_effects() {
        let (registry, gate) = harvest_gate();
        registry.attach(Slot::BlockBreak, HookObject::position(Fixed(2)));
        let actor = Some(ActorId::random());

        let mut ctx = gate.begin();
        gate.capture_target(&mut ctx, BlockPos::new(3, 65, 7));
        let decision = gate.evaluate_break(&mut ctx, actor, Some("farm".into()));
        assert_eq!(decision, Decision::Denied(DenyMode::Silent));
        assert!(!gate.should_remove_block(&ctx));
        assert!(
            gate.check_pickup(&ctx, actor, Some("farm".into()), Some(Vec3::new(3.5, 65.0, 7.5)))
                .is_denied()
        );
    }

    #[test]
    fn a_new_action_starts_clean() {
        let (registry, gate) = harvest_gate();
        registry.attach(Slot::BlockBreak, HookObject::position(Fixed(2)));

        let mut ctx = gate.begin();
        gate.capture_target(&mut ctx, BlockPos::ORIGIN);
        let _ = gate.evaluate_break(&mut ctx, Some(ActorId::random()), Some("farm".into()));
        assert!(ctx.is_break_denied());

        let ctx = gate.begin();
        assert_eq!(ctx, HarvestContext::default());
        assert!(gate.should_remove_block(&ctx));
    }
}
