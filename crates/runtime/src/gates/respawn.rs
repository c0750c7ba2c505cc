//! Value-override gates.
use guard_core::{HookCapability, OverrideHook, PositionQuery, Slot, Vec3};

use super::GateCore;
use crate::binding::BindingCache;
use crate::features;

/// Gate whose hook may replace a value the engine would otherwise compute.
pub struct OverrideGate<Q, V> {
    slot: Slot,
    core: GateCore,
    binding: BindingCache<dyn OverrideHook<Q, V>>,
}

/// Overrides the position an actor respawns at.
pub type RespawnGate = OverrideGate<PositionQuery, Vec3>;

impl<Q, V> OverrideGate<Q, V>
where
    Q: 'static,
    V: 'static,
    dyn OverrideHook<Q, V>: HookCapability,
{
    pub fn new(slot: Slot, core: GateCore) -> Self {
        core.declare(features::for_slot(slot));
        Self {
            slot,
            core,
            binding: BindingCache::new(),
        }
    }

    /// The hook's replacement value, or `None` to keep the engine's default.
    ///
    /// Absent hooks, incomplete context and hook failures all yield `None`.
    pub fn override_for(&self, gather: impl FnOnce() -> Option<Q>) -> Option<V> {
        let binding = self
            .binding
            .resolve(self.core.registry(), self.slot, self.core.faults())?;
        let query = gather()?;
        self.core
            .invoke(|| binding.primary().evaluate(&query))
            .flatten()
    }

    pub fn core(&self) -> &GateCore {
        &self.core
    }
}

impl RespawnGate {
    /// Respawn location: the override if any, otherwise `default()`.
    pub fn respawn_position(
        &self,
        gather: impl FnOnce() -> Option<PositionQuery>,
        default: impl FnOnce() -> Vec3,
    ) -> Vec3 {
        self.override_for(gather).unwrap_or_else(default)
    }
}
