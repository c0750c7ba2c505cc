//! Runtime side of the protection bridge.
//!
//! This crate owns the shared state and the call-site algorithm: the slot
//! registry policy modules attach hooks to, identity-checked binding caches,
//! sampled fault reporting, deduplicated deny messages, and the gates the host
//! engine calls at each interception point. Hosts usually go through
//! [`Guard`], which hands out gates pre-wired to one registry and notifier.
//!
//! Modules are organized by responsibility:
//! - [`registry`] hosts the slot table and its process-wide publication
//! - [`binding`] turns slot objects into cached, typed hook views
//! - [`gates`] implements the per-shape decision algorithm
//! - [`notify`] and [`fault`] carry deny messages and hook failures
//! - [`guard`] wires everything together from a [`GuardConfig`]
pub mod binding;
pub mod config;
pub mod error;
pub mod fault;
pub mod features;
pub mod gates;
pub mod guard;
pub mod notify;
pub mod registry;

mod call;

pub use binding::{Binding, BindingCache, KeyedBindingCache};
pub use config::{GuardConfig, OperatingMode};
pub use error::{GuardError, Result};
pub use fault::FaultReporter;
pub use gates::{
    AbsentPolicy, CommandGate, DamageGate, GateCore, HarvestContext, HarvestGate, InteractionGate,
    InteractionKind, LogFilterGate, OverrideGate, PositionGate, RespawnGate, SpawnGate,
    VerdictGate, WorldGate,
};
pub use guard::{Guard, GuardBuilder};
pub use notify::{DenyNotifier, NotifyOutcome};
pub use registry::{HookRegistry, RegistryHandle};
