//! Protocol vocabulary shared by the protection bridge and policy modules.
//!
//! `guard-core` defines what crosses the boundary between the engine-side
//! interception layer and external policy implementations: the slot table,
//! verdict codes, identities and positions, per-shape query records, and the
//! hook traits a policy module implements. It owns no shared state; the
//! registry, bindings and gates live in `guard-runtime`.
pub mod error;
pub mod hook;
pub mod identity;
pub mod message;
pub mod position;
pub mod query;
pub mod slot;
pub mod verdict;

pub use error::{HookError, HookResult};
pub use hook::{
    CommandHook, DamageHook, DenyReason, FlagHook, HookCapability, HookObject, OverrideHook,
    PositionHook, RespawnHook, VerdictHook, WorldHook,
};
pub use identity::{ActorId, WorldId};
pub use message::{MessageFormatter, MessageSink, RenderedMessage};
pub use position::{BlockPos, Vec3};
pub use query::{CommandQuery, DamageQuery, GateQuery, PositionQuery, WorldQuery};
pub use slot::{SLOT_COUNT, Slot, SlotShape};
pub use verdict::{Decision, DenyMode, Verdict};
