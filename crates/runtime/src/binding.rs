//! Lazily resolved, identity-checked hook bindings.
//!
//! A [`BindingCache`] remembers the typed view of the object last seen at a
//! slot together with that object's `Arc`. Every resolution re-reads the slot
//! and compares pointers: a hit reuses the cached view, a miss (new object or
//! first use) re-extracts it. Replacing a hook therefore needs no explicit
//! invalidation, and a stale cache entry is never trusted.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use guard_core::{HookCapability, HookObject, Slot};
use parking_lot::RwLock;

use crate::error::GuardError;
use crate::fault::FaultReporter;
use crate::registry::RegistryHandle;

/// A hook object resolved into the capability a gate calls.
pub struct Binding<H: ?Sized> {
    owner: Arc<HookObject>,
    hook: Arc<H>,
    has_secondary: bool,
}

impl<H: ?Sized + HookCapability> Binding<H> {
    /// Extracts `H` from `owner`; `None` when the object has another shape.
    pub fn bind(owner: Arc<HookObject>) -> Option<Self> {
        let hook = H::extract(&owner)?;
        let has_secondary = hook.has_secondary();
        Some(Self {
            owner,
            hook,
            has_secondary,
        })
    }

    pub fn primary(&self) -> &H {
        &self.hook
    }

    pub fn has_secondary(&self) -> bool {
        self.has_secondary
    }

    /// The registry object this binding was resolved from.
    pub fn owner(&self) -> &Arc<HookObject> {
        &self.owner
    }

    fn is_bound_to(&self, object: &Arc<HookObject>) -> bool {
        Arc::ptr_eq(&self.owner, object)
    }
}

impl<H: ?Sized> fmt::Debug for Binding<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("owner", &self.owner)
            .field("has_secondary", &self.has_secondary)
            .finish()
    }
}

/// Resolves `object` into a binding, reporting a shape mismatch on failure.
fn bind_or_report<H: ?Sized + HookCapability>(
    slot: Slot,
    object: Arc<HookObject>,
    faults: &FaultReporter,
) -> Option<Arc<Binding<H>>> {
    let found = object.shape();
    match Binding::<H>::bind(object) {
        Some(binding) => Some(Arc::new(binding)),
        None => {
            faults.report(&GuardError::ShapeMismatch {
                slot,
                expected: H::SHAPE,
                found,
            });
            None
        }
    }
}

/// Single-entry binding cache for one slot.
pub struct BindingCache<H: ?Sized> {
    cached: RwLock<Option<Arc<Binding<H>>>>,
}

impl<H: ?Sized + HookCapability> BindingCache<H> {
    pub fn new() -> Self {
        Self {
            cached: RwLock::new(None),
        }
    }

    /// Returns a binding for the object currently at `slot`.
    ///
    /// Absent when the slot is empty, the registry is not published, or the
    /// object cannot serve `H` (reported through `faults`).
    pub fn resolve(
        &self,
        registry: &RegistryHandle,
        slot: Slot,
        faults: &FaultReporter,
    ) -> Option<Arc<Binding<H>>> {
        let Some(current) = registry.get(slot) else {
            // Empty slots are the common case; only writers clear a stale entry.
            if self.cached.read().is_some() {
                self.cached.write().take();
            }
            return None;
        };

        if let Some(binding) = self.cached.read().as_ref()
            && binding.is_bound_to(&current)
        {
            return Some(Arc::clone(binding));
        }

        let binding = bind_or_report::<H>(slot, current, faults);
        *self.cached.write() = binding.clone();
        binding
    }

    /// Whether a binding is currently cached (it may still be stale).
    pub fn is_cached(&self) -> bool {
        self.cached.read().is_some()
    }
}

impl<H: ?Sized + HookCapability> Default for BindingCache<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Binding cache keyed by a call-site discriminator.
///
/// Used where one interceptor serves several action kinds, each with its own
/// slot.
pub struct KeyedBindingCache<K, H: ?Sized> {
    entries: RwLock<HashMap<K, Arc<Binding<H>>>>,
}

impl<K, H> KeyedBindingCache<K, H>
where
    K: Eq + Hash + Copy,
    H: ?Sized + HookCapability,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn resolve(
        &self,
        key: K,
        registry: &RegistryHandle,
        slot: Slot,
        faults: &FaultReporter,
    ) -> Option<Arc<Binding<H>>> {
        let Some(current) = registry.get(slot) else {
            if self.entries.read().contains_key(&key) {
                self.entries.write().remove(&key);
            }
            return None;
        };

        if let Some(binding) = self.entries.read().get(&key)
            && binding.is_bound_to(&current)
        {
            return Some(Arc::clone(binding));
        }

        let binding = bind_or_report::<H>(slot, current, faults);
        let mut entries = self.entries.write();
        match &binding {
            Some(binding) => {
                entries.insert(key, Arc::clone(binding));
            }
            None => {
                entries.remove(&key);
            }
        }
        binding
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K, H> Default for KeyedBindingCache<K, H>
where
    K: Eq + Hash + Copy,
    H: ?Sized + HookCapability,
{
    fn default() -> Self {
        Self::new()
    }
}
