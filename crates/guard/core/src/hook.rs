//! Hook traits implemented by external policy modules.
//!
//! There is one trait per slot category rather than one per slot: every
//! position slot (block place, container open, use, ...) shares
//! [`VerdictHook<PositionQuery>`], and a policy module typically attaches a
//! separate small object per slot. The registry stores hooks as a
//! [`HookObject`], a closed set of shapes that any independently built module
//! can construct without knowing the runtime's types.
//!
//! Hot-swap detection never compares hook values: the registry hands out
//! `Arc<HookObject>` and bindings compare pointers.

use std::fmt;
use std::sync::Arc;

use crate::error::HookResult;
use crate::message::MessageFormatter;
use crate::position::Vec3;
use crate::query::{CommandQuery, DamageQuery, PositionQuery, WorldQuery};
use crate::slot::SlotShape;

/// Decision function answering with a verdict code (see [`crate::Verdict`]).
pub trait VerdictHook<Q>: Send + Sync {
    fn evaluate(&self, query: &Q) -> HookResult<i32>;

    /// Secondary deny-reason function, if this hook provides one.
    ///
    /// Implementors that can explain denials return `Some(self)`.
    fn deny_reasons(&self) -> Option<&dyn DenyReason<Q>> {
        None
    }
}

/// Secondary function producing the raw (unformatted) deny reason.
pub trait DenyReason<Q>: Send + Sync {
    fn deny_reason(&self, query: &Q) -> HookResult<Option<String>>;
}

/// Decision function answering with an optional replacement value.
///
/// `None` means "no override, use the engine's default computation".
pub trait OverrideHook<Q, V>: Send + Sync {
    fn evaluate(&self, query: &Q) -> HookResult<Option<V>>;
}

/// Argument-less boolean decision function toggling an ancillary behavior.
pub trait FlagHook: Send + Sync {
    fn evaluate(&self) -> HookResult<bool>;
}

pub type PositionHook = dyn VerdictHook<PositionQuery>;
pub type DamageHook = dyn VerdictHook<DamageQuery>;
pub type WorldHook = dyn VerdictHook<WorldQuery>;
pub type CommandHook = dyn VerdictHook<CommandQuery>;
pub type RespawnHook = dyn OverrideHook<PositionQuery, Vec3>;

/// Opaque value stored in a registry slot.
#[derive(Clone)]
pub enum HookObject {
    Position(Arc<PositionHook>),
    Damage(Arc<DamageHook>),
    World(Arc<WorldHook>),
    Command(Arc<CommandHook>),
    Respawn(Arc<RespawnHook>),
    Filter(Arc<dyn FlagHook>),
    Flag(bool),
    Formatter(Arc<dyn MessageFormatter>),
}

impl HookObject {
    pub fn position(hook: impl VerdictHook<PositionQuery> + 'static) -> Self {
        Self::Position(Arc::new(hook))
    }

    pub fn damage(hook: impl VerdictHook<DamageQuery> + 'static) -> Self {
        Self::Damage(Arc::new(hook))
    }

    pub fn world(hook: impl VerdictHook<WorldQuery> + 'static) -> Self {
        Self::World(Arc::new(hook))
    }

    pub fn command(hook: impl VerdictHook<CommandQuery> + 'static) -> Self {
        Self::Command(Arc::new(hook))
    }

    pub fn respawn(hook: impl OverrideHook<PositionQuery, Vec3> + 'static) -> Self {
        Self::Respawn(Arc::new(hook))
    }

    pub fn filter(hook: impl FlagHook + 'static) -> Self {
        Self::Filter(Arc::new(hook))
    }

    pub fn formatter(formatter: impl MessageFormatter + 'static) -> Self {
        Self::Formatter(Arc::new(formatter))
    }

    /// Call shape this object can serve.
    pub fn shape(&self) -> SlotShape {
        match self {
            Self::Position(_) => SlotShape::Position,
            Self::Damage(_) => SlotShape::Targeted,
            Self::World(_) => SlotShape::World,
            Self::Command(_) => SlotShape::Text,
            Self::Respawn(_) => SlotShape::Override,
            Self::Filter(_) => SlotShape::Filter,
            Self::Flag(_) => SlotShape::Flag,
            Self::Formatter(_) => SlotShape::Formatter,
        }
    }
}

impl fmt::Debug for HookObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(value) => f.debug_tuple("Flag").field(value).finish(),
            other => write!(f, "HookObject({})", other.shape()),
        }
    }
}

/// Typed view of a [`HookObject`], implemented for the hook trait objects.
///
/// Binding a slot means extracting the capability its gate needs; an object of
/// another shape is a resolution failure, never a panic.
pub trait HookCapability: Send + Sync + 'static {
    const SHAPE: SlotShape;

    fn extract(object: &HookObject) -> Option<Arc<Self>>;

    /// Whether the secondary (deny-reason) function is available.
    fn has_secondary(&self) -> bool {
        false
    }
}

macro_rules! verdict_capability {
    ($query:ty, $variant:ident, $shape:expr) => {
        impl HookCapability for dyn VerdictHook<$query> {
            const SHAPE: SlotShape = $shape;

            fn extract(object: &HookObject) -> Option<Arc<Self>> {
                match object {
                    HookObject::$variant(hook) => Some(Arc::clone(hook)),
                    _ => None,
                }
            }

            fn has_secondary(&self) -> bool {
                self.deny_reasons().is_some()
            }
        }
    };
}

verdict_capability!(PositionQuery, Position, SlotShape::Position);
verdict_capability!(DamageQuery, Damage, SlotShape::Targeted);
verdict_capability!(WorldQuery, World, SlotShape::World);
verdict_capability!(CommandQuery, Command, SlotShape::Text);

impl HookCapability for RespawnHook {
    const SHAPE: SlotShape = SlotShape::Override;

    fn extract(object: &HookObject) -> Option<Arc<Self>> {
        match object {
            HookObject::Respawn(hook) => Some(Arc::clone(hook)),
            _ => None,
        }
    }
}

impl HookCapability for dyn FlagHook {
    const SHAPE: SlotShape = SlotShape::Filter;

    fn extract(object: &HookObject) -> Option<Arc<Self>> {
        match object {
            HookObject::Filter(hook) => Some(Arc::clone(hook)),
            _ => None,
        }
    }
}

impl HookCapability for dyn MessageFormatter {
    const SHAPE: SlotShape = SlotShape::Formatter;

    fn extract(object: &HookObject) -> Option<Arc<Self>> {
        match object {
            HookObject::Formatter(formatter) => Some(Arc::clone(formatter)),
            _ => None,
        }
    }
}
