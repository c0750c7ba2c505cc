//! Verdict gates: position, damage, world and command call sites.
use guard_core::{
    CommandQuery, DamageQuery, Decision, DenyMode, GateQuery, HookCapability, PositionQuery, Slot,
    Verdict, VerdictHook, WorldQuery,
};
use tracing::trace;

use super::GateCore;
use crate::binding::{Binding, BindingCache};
use crate::features;

/// What a gate decides when its slot has no hook.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AbsentPolicy {
    /// No policy installed, the action proceeds.
    #[default]
    Allow,
    /// Deny silently until the `spawn_ready` or `spawn_allow_startup` flag is
    /// set, then allow.
    DenyUntilReady,
}

/// Gate for any slot answering with a verdict code.
pub struct VerdictGate<Q> {
    slot: Slot,
    core: GateCore,
    binding: BindingCache<dyn VerdictHook<Q>>,
    absent: AbsentPolicy,
}

pub type PositionGate = VerdictGate<PositionQuery>;
pub type DamageGate = VerdictGate<DamageQuery>;
pub type WorldGate = VerdictGate<WorldQuery>;
pub type CommandGate = VerdictGate<CommandQuery>;

impl<Q> VerdictGate<Q>
where
    Q: GateQuery,
    dyn VerdictHook<Q>: HookCapability,
{
    /// Creates a gate for `slot` and declares the slot's feature.
    pub fn new(slot: Slot, core: GateCore) -> Self {
        core.declare(features::for_slot(slot));
        Self {
            slot,
            core,
            binding: BindingCache::new(),
            absent: AbsentPolicy::Allow,
        }
    }

    pub fn with_absent_policy(mut self, absent: AbsentPolicy) -> Self {
        self.absent = absent;
        self
    }

    /// Decides an action. `gather` is only called when a hook is bound;
    /// returning `None` (missing actor or world) lets the action through.
    pub fn check(&self, gather: impl FnOnce() -> Option<Q>) -> Decision {
        let Some(binding) = self.binding.resolve(self.core.registry(), self.slot, self.core.faults())
        else {
            return self.absent_decision();
        };
        let Some(query) = gather() else {
            trace!(target: "guard::gate", gate = %self.core.name(), "ungated: incomplete context");
            return Decision::Allowed;
        };

        decide(&self.core, &binding, &query)
    }

    /// Decides an action whose context is already assembled.
    pub fn check_query(&self, query: Q) -> Decision {
        self.check(|| Some(query))
    }

    fn absent_decision(&self) -> Decision {
        match self.absent {
            AbsentPolicy::Allow => Decision::Allowed,
            AbsentPolicy::DenyUntilReady => {
                let registry = self.core.registry();
                if registry.flag(Slot::SpawnReady) || registry.flag(Slot::SpawnAllowStartup) {
                    Decision::Allowed
                } else {
                    Decision::Denied(DenyMode::Silent)
                }
            }
        }
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn core(&self) -> &GateCore {
        &self.core
    }
}

/// Calls a bound verdict hook and interprets its answer, notifying the actor
/// on `DENY_WITH_MESSAGE` when the hook can explain itself.
pub(super) fn decide<Q: GateQuery>(
    core: &GateCore,
    binding: &Binding<dyn VerdictHook<Q>>,
    query: &Q,
) -> Decision
where
    dyn VerdictHook<Q>: HookCapability,
{
    let hook = binding.primary();
    let Some(code) = core.invoke(|| hook.evaluate(query)) else {
        return Decision::Allowed;
    };

    let verdict = Verdict::from_code(code);
    if verdict == Verdict::DenyWithMessage
        && let Some(actor) = query.notify_target()
        && let Some(reasons) = hook.deny_reasons()
    {
        let reason = core.invoke(|| reasons.deny_reason(query)).flatten();
        core.notify(actor, reason.as_deref());
    }
    verdict.decision()
}
