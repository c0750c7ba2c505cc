//! Interception feature names.
//!
//! Policy modules check these before installing hooks so they can tell which
//! interception points this server actually routes through the bridge.
use guard_core::Slot;

use crate::config::OperatingMode;

/// Every feature a standalone guard intercepts.
pub const STANDALONE: &[&str] = &[
    "block_break",
    "block_place",
    "explosion",
    "fire_spread",
    "builder_tools",
    "item_pickup",
    "death_drop",
    "durability",
    "container_access",
    "container_open",
    "world_spawn",
    "teleporter",
    "portal_entry",
    "portal_return",
    "hub_portal",
    "instance_teleport",
    "command",
    "interaction_log",
    "entity_damage",
    "hammer",
    "use",
    "use_block",
    "break_block_interaction",
    "change_block",
    "change_state",
    "crop_harvest",
    "farming_stage",
    "fertilize",
    "watering_can",
    "capture_crate",
    "coop",
    "seat",
    "minecart_spawn",
    "processing_bench",
    "bench_page",
    "respawn",
];

/// Features left active when another protection layer owns the overlapping
/// interception points.
pub const COMPATIBLE: &[&str] = &[
    "block_place",
    "container_open",
    "entity_damage",
    "teleporter",
    "portal_entry",
    "portal_return",
    "hub_portal",
    "interaction_log",
    "hammer",
    "use",
    "crop_harvest",
    "seat",
    "respawn",
];

pub fn for_mode(mode: OperatingMode) -> &'static [&'static str] {
    match mode {
        OperatingMode::Standalone => STANDALONE,
        OperatingMode::Compatible => COMPATIBLE,
    }
}

/// Feature a dedicated gate for `slot` declares. Flag and formatter slots
/// are not interception points.
pub fn for_slot(slot: Slot) -> Option<&'static str> {
    let feature = match slot {
        Slot::BlockBreak => "block_break",
        Slot::Explosion => "explosion",
        Slot::FireSpread => "fire_spread",
        Slot::BuilderTools => "builder_tools",
        Slot::ItemPickup => "item_pickup",
        Slot::DeathDrop => "death_drop",
        Slot::Durability => "durability",
        Slot::ContainerAccess => "container_access",
        Slot::MobSpawn => "world_spawn",
        Slot::Teleporter => "teleporter",
        Slot::Portal => "hub_portal",
        Slot::Command => "command",
        Slot::InteractionLog => "interaction_log",
        Slot::EntityDamage => "entity_damage",
        Slot::ContainerOpen => "container_open",
        Slot::BlockPlace => "block_place",
        Slot::Hammer => "hammer",
        Slot::Use => "use",
        Slot::Seat => "seat",
        Slot::Respawn => "respawn",
        Slot::SpawnReady | Slot::SpawnAllowStartup | Slot::FormatHandle => return None,
    };
    Some(feature)
}
