//! Log verbosity flag gate.
use guard_core::{FlagHook, Slot};
use tracing::Level;

use super::GateCore;
use crate::binding::BindingCache;
use crate::features;

/// Decides whether noisy engine diagnostics (interaction desyncs and the
/// like) are demoted from warnings to the lowest level.
pub struct LogFilterGate {
    core: GateCore,
    binding: BindingCache<dyn FlagHook>,
}

impl LogFilterGate {
    pub fn new(core: GateCore) -> Self {
        core.declare(features::for_slot(Slot::InteractionLog));
        Self {
            core,
            binding: BindingCache::new(),
        }
    }

    /// Failure or absence means "not filtered".
    pub fn is_filtered(&self) -> bool {
        let Some(binding) =
            self.binding
                .resolve(self.core.registry(), Slot::InteractionLog, self.core.faults())
        else {
            return false;
        };
        self.core
            .invoke(|| binding.primary().evaluate())
            .unwrap_or(false)
    }

    /// Level a diagnostic should be emitted at. Only warnings are demoted.
    pub fn effective_level(&self, level: Level) -> Level {
        if level == Level::WARN && self.is_filtered() {
            Level::TRACE
        } else {
            level
        }
    }

    pub fn core(&self) -> &GateCore {
        &self.core
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use guard_core::{HookObject, HookResult};

    use super::*;
    use crate::registry::HookRegistry;

    struct Quiet(bool);
    impl FlagHook for Quiet {
        fn evaluate(&self) -> HookResult<bool> {
            Ok(self.0)
        }
    }

    struct Panicky;
    impl FlagHook for Panicky {
        fn evaluate(&self) -> HookResult<bool> {
            panic!("filter state poisoned")
        }
    }

    fn filter_gate() -> (Arc<HookRegistry>, LogFilterGate) {
        let registry = Arc::new(HookRegistry::new());
        let gate = LogFilterGate::new(GateCore::new("LogFilterGate", Arc::clone(&registry)));
        (registry, gate)
    }

    #[test]
    fn demotes_warnings_only_when_filtered() {
        let (registry, gate) = filter_gate();
        assert_eq!(gate.effective_level(Level::WARN), Level::WARN);

        registry.attach(Slot::InteractionLog, HookObject::filter(Quiet(true)));
        assert_eq!(gate.effective_level(Level::WARN), Level::TRACE);
        assert_eq!(gate.effective_level(Level::ERROR), Level::ERROR);
        assert_eq!(gate.effective_level(Level::INFO), Level::INFO);

        registry.attach(Slot::InteractionLog, HookObject::filter(Quiet(false)));
        assert_eq!(gate.effective_level(Level::WARN), Level::WARN);
    }

    #[test]
    fn panicking_hook_is_not_filtered() {
        let (registry, gate) = filter_gate();
        registry.attach(Slot::InteractionLog, HookObject::filter(Panicky));
        assert!(!gate.is_filtered());
        assert_eq!(gate.core().faults().fault_count(), 1);
    }

    #[test]
    fn raw_flag_in_filter_slot_is_a_shape_fault() {
        let (registry, gate) = filter_gate();
        registry.set_flag(Slot::InteractionLog, true);
        assert!(!gate.is_filtered());
        assert_eq!(gate.core().faults().fault_count(), 1);
    }
}
