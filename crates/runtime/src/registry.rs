//! Slot-indexed hook registry (the "bridge").
//!
//! The registry is the only shared mutable state gates read on their hot
//! path. Each slot sits behind its own lock, so a write to one slot never
//! contends with reads of another, and readers clone an `Arc` out and drop the
//! guard immediately. There is no ordering between a concurrent `attach` and
//! in-flight reads beyond "a reader sees the old object or the new one".
//!
//! # Publication
//!
//! Independently built modules (the policy plugin, the engine-side patches)
//! reach the registry in one of two ways:
//!
//! - **Injected**: the host constructs a [`HookRegistry`] and hands an `Arc`
//!   to every gate through [`RegistryHandle::Shared`].
//! - **Published**: [`HookRegistry::init`] installs a process-wide instance
//!   once; [`RegistryHandle::Published`] looks it up on every read and sees
//!   "no hook" until it exists.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use guard_core::{HookObject, SLOT_COUNT, Slot};
use parking_lot::RwLock;
use tracing::{debug, info};

static PUBLISHED: OnceLock<Arc<HookRegistry>> = OnceLock::new();

/// Fixed-size table of opaque hook objects plus declared interception features.
pub struct HookRegistry {
    slots: Box<[RwLock<Option<Arc<HookObject>>>]>,
    features: RwLock<BTreeSet<String>>,
}

impl HookRegistry {
    /// Creates an empty, unpublished registry.
    pub fn new() -> Self {
        Self {
            slots: (0..SLOT_COUNT).map(|_| RwLock::new(None)).collect(),
            features: RwLock::new(BTreeSet::new()),
        }
    }

    /// Creates and publishes the process-wide registry.
    ///
    /// Safe to call more than once: later calls return the instance published
    /// by the first one.
    pub fn init() -> Arc<Self> {
        let registry = PUBLISHED.get_or_init(|| {
            info!(
                target: "guard::registry",
                slots = SLOT_COUNT,
                "protection bridge published"
            );
            Arc::new(Self::new())
        });
        Arc::clone(registry)
    }

    /// The process-wide registry, or `None` before [`HookRegistry::init`].
    pub fn published() -> Option<Arc<Self>> {
        PUBLISHED.get().cloned()
    }

    /// Places `object` at `slot`, returning whatever was there before.
    ///
    /// Every call creates a new identity, so gates re-resolve even when the
    /// same hook value is attached twice.
    pub fn attach(&self, slot: Slot, object: HookObject) -> Option<Arc<HookObject>> {
        self.attach_shared(slot, Arc::new(object))
    }

    /// Places an already shared object at `slot`.
    pub fn attach_shared(&self, slot: Slot, object: Arc<HookObject>) -> Option<Arc<HookObject>> {
        debug!(
            target: "guard::registry",
            %slot,
            shape = %object.shape(),
            "hook attached"
        );
        self.slots[slot.index()].write().replace(object)
    }

    /// Empties `slot`, returning the removed object.
    pub fn detach(&self, slot: Slot) -> Option<Arc<HookObject>> {
        let previous = self.slots[slot.index()].write().take();
        if previous.is_some() {
            debug!(target: "guard::registry", %slot, "hook detached");
        }
        previous
    }

    /// Current object at `slot`.
    pub fn get(&self, slot: Slot) -> Option<Arc<HookObject>> {
        self.slots[slot.index()].read().clone()
    }

    /// Raw indexed read for consumers that only know the numeric protocol.
    pub fn get_index(&self, index: usize) -> Option<Arc<HookObject>> {
        self.slots.get(index)?.read().clone()
    }

    pub fn has_binding(&self, slot: Slot) -> bool {
        self.slots[slot.index()].read().is_some()
    }

    /// Reads a boolean slot. Anything other than `Flag(true)` is false.
    pub fn flag(&self, slot: Slot) -> bool {
        matches!(
            self.slots[slot.index()].read().as_deref(),
            Some(HookObject::Flag(true))
        )
    }

    pub fn set_flag(&self, slot: Slot, value: bool) {
        self.attach(slot, HookObject::Flag(value));
    }

    /// Detaches every slot. Declared features are kept.
    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.write().take();
        }
        debug!(target: "guard::registry", "all hooks detached");
    }

    /// Advertises that an interception point is active.
    pub fn declare_feature(&self, feature: &str) {
        if self.features.write().insert(feature.to_owned()) {
            debug!(target: "guard::registry", feature, "feature declared");
        }
    }

    pub fn is_feature_available(&self, feature: &str) -> bool {
        self.features.read().contains(feature)
    }

    /// Declared feature names in sorted order.
    pub fn declared_features(&self) -> Vec<String> {
        self.features.read().iter().cloned().collect()
    }

    /// Occupied slots in index order (for debugging).
    pub fn occupied(&self) -> Vec<Slot> {
        Slot::ALL
            .into_iter()
            .filter(|slot| self.has_binding(*slot))
            .collect()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("occupied", &self.occupied())
            .field("features", &self.features.read().len())
            .finish()
    }
}

/// How a gate reaches the registry.
#[derive(Clone, Debug)]
pub enum RegistryHandle {
    /// Explicitly injected instance.
    Shared(Arc<HookRegistry>),
    /// Process-wide instance, looked up on every read.
    Published,
}

impl RegistryHandle {
    /// The registry this handle currently points at, if any.
    pub fn registry(&self) -> Option<Arc<HookRegistry>> {
        match self {
            Self::Shared(registry) => Some(Arc::clone(registry)),
            Self::Published => HookRegistry::published(),
        }
    }

    /// Current object at `slot`; absent when the registry does not exist yet.
    pub fn get(&self, slot: Slot) -> Option<Arc<HookObject>> {
        match self {
            Self::Shared(registry) => registry.get(slot),
            Self::Published => PUBLISHED.get().and_then(|registry| registry.get(slot)),
        }
    }

    pub fn flag(&self, slot: Slot) -> bool {
        match self {
            Self::Shared(registry) => registry.flag(slot),
            Self::Published => PUBLISHED.get().is_some_and(|registry| registry.flag(slot)),
        }
    }

    /// Declares a feature if the registry exists. Declarations made before
    /// publication are lost, matching "uninitialized reads as absent".
    pub fn declare_feature(&self, feature: &str) {
        if let Some(registry) = self.registry() {
            registry.declare_feature(feature);
        }
    }
}

impl From<Arc<HookRegistry>> for RegistryHandle {
    fn from(registry: Arc<HookRegistry>) -> Self {
        Self::Shared(registry)
    }
}
