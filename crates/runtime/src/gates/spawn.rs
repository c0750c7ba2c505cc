//! Creature spawn gate.
//!
//! Unlike every other gate, an empty `mob_spawn` slot does not mean "allow"
//! during startup: chunk generation would otherwise spawn freely in regions
//! the policy module protects before it has loaded. Spawns are denied until
//! the host sets `spawn_ready` or `spawn_allow_startup`.
use guard_core::{Decision, DenyMode, Slot, WorldQuery};

use super::GateCore;
use super::verdict::{AbsentPolicy, WorldGate};

pub struct SpawnGate {
    inner: WorldGate,
}

impl SpawnGate {
    pub fn new(core: GateCore) -> Self {
        Self {
            inner: WorldGate::new(Slot::MobSpawn, core)
                .with_absent_policy(AbsentPolicy::DenyUntilReady),
        }
    }

    /// Decides a spawn the engine has already approved. Denials are always
    /// silent; a missing world allows.
    pub fn check(&self, gather: impl FnOnce() -> Option<WorldQuery>) -> Decision {
        match self.inner.check(gather) {
            Decision::Allowed => Decision::Allowed,
            Decision::Denied(_) => Decision::Denied(DenyMode::Silent),
        }
    }

    /// Only consults policy when `engine_allows`; an engine refusal is kept.
    pub fn check_spawn(
        &self,
        engine_allows: bool,
        gather: impl FnOnce() -> Option<WorldQuery>,
    ) -> Decision {
        if !engine_allows {
            return Decision::Denied(DenyMode::Silent);
        }
        self.check(gather)
    }

    pub fn core(&self) -> &GateCore {
        self.inner.core()
    }
}
