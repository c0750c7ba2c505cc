//! Closed, versioned slot table.
//!
//! A slot names one pluggable policy capability. Indices are part of the
//! protocol contract with external policy modules: the same index always
//! denotes the same capability and the same call shape, so entries are only
//! ever appended, never renumbered.

/// Number of entries in the slot table, including reserved indices.
pub const SLOT_COUNT: usize = 24;

/// Stable identifier of one hook capability.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum Slot {
    BlockBreak = 0,
    Explosion = 1,
    FireSpread = 2,
    BuilderTools = 3,
    ItemPickup = 4,
    DeathDrop = 5,
    Durability = 6,
    ContainerAccess = 7,
    MobSpawn = 8,
    Teleporter = 9,
    Portal = 10,
    Command = 11,
    InteractionLog = 12,
    /// Raw boolean: the policy module finished initializing spawn rules.
    SpawnReady = 13,
    /// Raw boolean: let spawns through while the policy module starts.
    SpawnAllowStartup = 14,
    /// Message formatter used to render deny reasons.
    FormatHandle = 15,
    EntityDamage = 16,
    ContainerOpen = 17,
    BlockPlace = 18,
    Hammer = 19,
    Use = 20,
    Seat = 21,
    Respawn = 22,
}

impl Slot {
    /// Every assigned slot in index order.
    pub const ALL: [Slot; 23] = [
        Slot::BlockBreak,
        Slot::Explosion,
        Slot::FireSpread,
        Slot::BuilderTools,
        Slot::ItemPickup,
        Slot::DeathDrop,
        Slot::Durability,
        Slot::ContainerAccess,
        Slot::MobSpawn,
        Slot::Teleporter,
        Slot::Portal,
        Slot::Command,
        Slot::InteractionLog,
        Slot::SpawnReady,
        Slot::SpawnAllowStartup,
        Slot::FormatHandle,
        Slot::EntityDamage,
        Slot::ContainerOpen,
        Slot::BlockPlace,
        Slot::Hammer,
        Slot::Use,
        Slot::Seat,
        Slot::Respawn,
    ];

    /// Position of this slot in the registry table.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up the slot at `index`. Reserved or out-of-range indices yield `None`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The call shape every hook attached to this slot must implement.
    pub const fn shape(self) -> SlotShape {
        match self {
            Slot::BlockBreak
            | Slot::ItemPickup
            | Slot::DeathDrop
            | Slot::Durability
            | Slot::ContainerAccess
            | Slot::Teleporter
            | Slot::Portal
            | Slot::ContainerOpen
            | Slot::BlockPlace
            | Slot::Hammer
            | Slot::Use
            | Slot::Seat => SlotShape::Position,
            Slot::EntityDamage => SlotShape::Targeted,
            Slot::Explosion | Slot::FireSpread | Slot::MobSpawn => SlotShape::World,
            Slot::Command | Slot::BuilderTools => SlotShape::Text,
            Slot::Respawn => SlotShape::Override,
            Slot::InteractionLog => SlotShape::Filter,
            Slot::SpawnReady | Slot::SpawnAllowStartup => SlotShape::Flag,
            Slot::FormatHandle => SlotShape::Formatter,
        }
    }
}

/// Decision-function contract agreed for a slot.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SlotShape {
    /// `evaluate(actor, world, x, y, z) -> verdict`, optional deny reason.
    Position,
    /// `evaluate(attacker, target?, world, x, y, z) -> verdict`, optional deny reason.
    Targeted,
    /// `evaluate(world, x, y, z) -> verdict`. No actor, never notifies.
    World,
    /// `evaluate(actor, text) -> verdict`, optional deny reason.
    Text,
    /// `evaluate(actor, world, x, y, z) -> [x, y, z] | null`.
    Override,
    /// `evaluate() -> bool`.
    Filter,
    /// A plain boolean published by the policy module.
    Flag,
    /// `format(raw) -> rendered message`.
    Formatter,
}

impl SlotShape {
    /// Whether hooks of this shape answer with a verdict code.
    pub const fn is_verdict(self) -> bool {
        matches!(
            self,
            SlotShape::Position | SlotShape::Targeted | SlotShape::World | SlotShape::Text
        )
    }
}
