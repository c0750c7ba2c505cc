//! Guard façade: one registry, one notifier, pre-wired gates.
use std::sync::Arc;

use guard_core::{MessageSink, Slot, SlotShape};
use tracing::info;

use crate::config::GuardConfig;
use crate::error::{GuardError, Result};
use crate::features;
use crate::gates::{
    CommandGate, DamageGate, GateCore, HarvestGate, InteractionGate, LogFilterGate, PositionGate,
    RespawnGate, SpawnGate, VerdictGate, WorldGate,
};
use crate::notify::DenyNotifier;
use crate::registry::{HookRegistry, RegistryHandle};

/// Entry point for hosts wiring interception call sites.
///
/// Every gate handed out shares the guard's registry handle and deny
/// notifier, so deduplication spans all call sites.
pub struct Guard {
    config: GuardConfig,
    registry: RegistryHandle,
    notifier: Arc<DenyNotifier>,
}

impl Guard {
    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }

    fn core(&self, name: impl Into<std::borrow::Cow<'static, str>>) -> GateCore {
        GateCore::new(name, self.registry.clone())
            .with_notifier(Arc::clone(&self.notifier))
            .with_budget(self.config.decision_budget())
            .with_sample_interval(self.config.fault_sample_interval)
    }

    /// Verdict gate for any position-shaped slot.
    ///
    /// A slot of another shape would report a shape mismatch on every call.
    pub fn position_gate(&self, slot: Slot) -> PositionGate {
        debug_assert_eq!(slot.shape(), SlotShape::Position, "{slot} is not position-shaped");
        VerdictGate::new(slot, self.core(format!("PositionGate[{slot}]")))
    }

    pub fn block_place_gate(&self) -> PositionGate {
        VerdictGate::new(Slot::BlockPlace, self.core("BlockPlaceGate"))
    }

    pub fn damage_gate(&self) -> DamageGate {
        VerdictGate::new(Slot::EntityDamage, self.core("EntityDamageGate"))
    }

    pub fn command_gate(&self) -> CommandGate {
        VerdictGate::new(Slot::Command, self.core("CommandGate"))
    }

    /// Gate for builder-tool pastes (actor + pasted text).
    pub fn builder_tools_gate(&self) -> CommandGate {
        VerdictGate::new(Slot::BuilderTools, self.core("BuilderToolsGate"))
    }

    /// Actor-less verdict gate (explosions, fire spread).
    pub fn world_gate(&self, slot: Slot) -> WorldGate {
        VerdictGate::new(slot, self.core(format!("WorldGate[{slot}]")))
    }

    pub fn spawn_gate(&self) -> SpawnGate {
        SpawnGate::new(self.core("ChunkSpawnGate"))
    }

    pub fn respawn_gate(&self) -> RespawnGate {
        RespawnGate::new(Slot::Respawn, self.core("RespawnGate"))
    }

    pub fn log_filter_gate(&self) -> LogFilterGate {
        LogFilterGate::new(self.core("LogFilterGate"))
    }

    pub fn harvest_gate(&self) -> HarvestGate {
        HarvestGate::new(self.core("HarvestGate"))
    }

    pub fn interaction_gate(&self) -> InteractionGate {
        InteractionGate::new(self.core("InteractionGate"))
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    /// Shared deny notifier. Its dedup map prunes expired actors once it
    /// grows large; hosts may also call [`DenyNotifier::forget`] on
    /// disconnect.
    pub fn notifier(&self) -> &Arc<DenyNotifier> {
        &self.notifier
    }

    pub fn is_feature_available(&self, feature: &str) -> bool {
        self.registry
            .registry()
            .is_some_and(|registry| registry.is_feature_available(feature))
    }
}

pub struct GuardBuilder {
    config: GuardConfig,
    registry: Option<RegistryHandle>,
    sink: Option<Arc<dyn MessageSink>>,
}

impl GuardBuilder {
    fn new() -> Self {
        Self {
            config: GuardConfig::default(),
            registry: None,
            sink: None,
        }
    }

    /// Override guard configuration
    pub fn config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an injected registry. Without one the guard creates its own.
    pub fn registry(mut self, registry: impl Into<RegistryHandle>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Use the process-wide registry, publishing it if needed.
    pub fn published_registry(mut self) -> Self {
        HookRegistry::init();
        self.registry = Some(RegistryHandle::Published);
        self
    }

    /// Set the host's player-messaging subsystem (required)
    pub fn sink(mut self, sink: Arc<dyn MessageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<Guard> {
        let sink = self.sink.ok_or(GuardError::MissingSink)?;
        let registry = self
            .registry
            .unwrap_or_else(|| RegistryHandle::Shared(Arc::new(HookRegistry::new())));

        for feature in features::for_mode(self.config.mode) {
            registry.declare_feature(feature);
        }

        let notifier = DenyNotifier::with_window(sink, self.config.dedup_window());
        info!(
            target: "guard::registry",
            mode = %self.config.mode,
            budget_ms = ?self.config.decision_budget_ms,
            "guard ready"
        );

        Ok(Guard {
            config: self.config,
            registry,
            notifier: Arc::new(notifier),
        })
    }
}

impl Default for GuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
