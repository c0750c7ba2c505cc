//! Gates: the per-call-site decision algorithm.
//!
//! Every gate follows the same sequence: resolve the slot's binding, gather
//! the action context from the caller, call the hook, interpret the answer.
//! Entry points are total. Anything that goes wrong along the way is reported
//! through the gate's own [`FaultReporter`] and the gate fails open.
//!
//! [`GateCore`] carries the pieces every gate shares (registry handle, fault
//! reporter, notifier, call budget); the gate types add the shape-specific
//! part on top.

mod filter;
mod harvest;
mod interaction;
mod respawn;
mod spawn;
mod verdict;

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use guard_core::{ActorId, HookResult, MessageFormatter, Slot};
use tracing::debug;

use crate::binding::BindingCache;
use crate::call::call_hook;
use crate::fault::{FaultReporter, SAMPLE_INTERVAL};
use crate::notify::{DenyNotifier, NotifyOutcome};
use crate::registry::RegistryHandle;

pub use filter::LogFilterGate;
pub use harvest::{HarvestContext, HarvestGate};
pub use interaction::{InteractionGate, InteractionKind};
pub use respawn::{OverrideGate, RespawnGate};
pub use spawn::SpawnGate;
pub use verdict::{AbsentPolicy, CommandGate, DamageGate, PositionGate, VerdictGate, WorldGate};

/// State and collaborators shared by every gate shape.
pub struct GateCore {
    name: Cow<'static, str>,
    registry: RegistryHandle,
    faults: FaultReporter,
    notifier: Option<Arc<DenyNotifier>>,
    budget: Option<Duration>,
    formatter: BindingCache<dyn MessageFormatter>,
}

impl GateCore {
    /// `name` labels the gate's fault reports.
    pub fn new(name: impl Into<Cow<'static, str>>, registry: impl Into<RegistryHandle>) -> Self {
        let name = name.into();
        Self {
            faults: FaultReporter::new(name.clone()),
            name,
            registry: registry.into(),
            notifier: None,
            budget: None,
            formatter: BindingCache::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<DenyNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_budget(mut self, budget: Option<Duration>) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_sample_interval(mut self, interval: u64) -> Self {
        if interval != SAMPLE_INTERVAL {
            self.faults = FaultReporter::with_interval(self.name.clone(), interval);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    pub fn faults(&self) -> &FaultReporter {
        &self.faults
    }

    pub fn notifier(&self) -> Option<&Arc<DenyNotifier>> {
        self.notifier.as_ref()
    }

    pub(crate) fn declare(&self, feature: Option<&str>) {
        if let Some(feature) = feature {
            self.registry.declare_feature(feature);
        }
    }

    /// Calls into hook code. Errors, panics and overruns are reported and
    /// collapse to `None`.
    pub(crate) fn invoke<T>(&self, call: impl FnOnce() -> HookResult<T>) -> Option<T> {
        match call_hook(self.budget, call) {
            Ok(value) => Some(value),
            Err(error) => {
                self.faults.report(&error);
                None
            }
        }
    }

    /// Sends a deny reason to `actor` through the shared notifier, formatted by
    /// whatever formatter is currently published.
    pub(crate) fn notify(&self, actor: ActorId, reason: Option<&str>) -> Option<NotifyOutcome> {
        let Some(notifier) = &self.notifier else {
            debug!(
                target: "guard::gate",
                gate = %self.name,
                %actor,
                "deny message dropped: no notifier"
            );
            return None;
        };
        let formatter = self
            .formatter
            .resolve(&self.registry, Slot::FormatHandle, &self.faults);
        Some(notifier.notify(actor, reason, formatter.as_deref().map(|binding| binding.primary())))
    }
}

impl std::fmt::Debug for GateCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateCore")
            .field("name", &self.name)
            .field("registry", &self.registry)
            .field("budget", &self.budget)
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}
