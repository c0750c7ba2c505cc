//! Context records handed to hooks, one per slot shape.
//!
//! Call sites gather these from the engine. Every `gather` constructor takes
//! the identities as `Option` and yields `None` when one is missing, which a
//! gate reads as "ungated".

use crate::identity::{ActorId, WorldId};
use crate::position::BlockPos;

/// Common surface of every query a verdict gate evaluates.
pub trait GateQuery: Send + Sync + 'static {
    /// Actor who receives the deny message, if the shape has one.
    fn notify_target(&self) -> Option<ActorId>;
}

/// `(actor, world, x, y, z)`: block placement, container open, use, etc.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionQuery {
    pub actor: ActorId,
    pub world: WorldId,
    pub pos: BlockPos,
}

impl PositionQuery {
    pub fn new(actor: ActorId, world: WorldId, pos: BlockPos) -> Self {
        Self { actor, world, pos }
    }

    pub fn gather(actor: Option<ActorId>, world: Option<WorldId>, pos: BlockPos) -> Option<Self> {
        Some(Self::new(actor?, world?, pos))
    }
}

impl GateQuery for PositionQuery {
    fn notify_target(&self) -> Option<ActorId> {
        Some(self.actor)
    }
}

/// `(attacker, target?, world, x, y, z)` for entity damage.
///
/// `target` is `None` when the victim is not a player. The position is the
/// victim's block position, or the origin when the engine could not report it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DamageQuery {
    pub attacker: ActorId,
    pub target: Option<ActorId>,
    pub world: WorldId,
    pub pos: BlockPos,
}

impl DamageQuery {
    pub fn new(attacker: ActorId, target: Option<ActorId>, world: WorldId, pos: BlockPos) -> Self {
        Self {
            attacker,
            target,
            world,
            pos,
        }
    }

    pub fn gather(
        attacker: Option<ActorId>,
        target: Option<ActorId>,
        world: Option<WorldId>,
        pos: Option<BlockPos>,
    ) -> Option<Self> {
        Some(Self::new(attacker?, target, world?, pos.unwrap_or_default()))
    }
}

impl GateQuery for DamageQuery {
    fn notify_target(&self) -> Option<ActorId> {
        Some(self.attacker)
    }
}

/// `(world, x, y, z)` for actor-less events: spawns, explosions, fire.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorldQuery {
    pub world: WorldId,
    pub pos: BlockPos,
}

impl WorldQuery {
    pub fn new(world: WorldId, pos: BlockPos) -> Self {
        Self { world, pos }
    }

    pub fn gather(world: Option<WorldId>, pos: BlockPos) -> Option<Self> {
        Some(Self::new(world?, pos))
    }
}

impl GateQuery for WorldQuery {
    fn notify_target(&self) -> Option<ActorId> {
        None
    }
}

/// `(actor, text)` for commands and builder-tool pastes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandQuery {
    pub actor: ActorId,
    pub text: String,
}

impl CommandQuery {
    pub fn new(actor: ActorId, text: impl Into<String>) -> Self {
        Self {
            actor,
            text: text.into(),
        }
    }

    /// Console senders have no actor and are never gated.
    pub fn gather(actor: Option<ActorId>, text: &str) -> Option<Self> {
        Some(Self::new(actor?, text))
    }
}

impl GateQuery for CommandQuery {
    fn notify_target(&self) -> Option<ActorId> {
        Some(self.actor)
    }
}
