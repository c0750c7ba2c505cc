//! Block interaction router.
//!
//! The engine funnels every "press use on a block" style interaction through
//! one routine. The router maps the concrete interaction kind to the slot
//! that governs it and keeps one binding per kind, so kinds sharing a slot
//! still resolve and cache independently.
use guard_core::{Decision, PositionHook, PositionQuery, Slot};
use tracing::trace;

use super::GateCore;
use super::verdict::decide;
use crate::binding::KeyedBindingCache;

/// Interaction kinds routed through the policy bridge.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InteractionKind {
    UseBlock,
    BreakBlock,
    ChangeBlock,
    ChangeState,
    CycleBlockGroup,
    CropHarvest,
    FarmingStage,
    Fertilize,
    WateringCan,
    CaptureCrate,
    Coop,
    Teleporter,
    PortalEntry,
    PortalReturn,
    InstanceTeleport,
    Seating,
    MinecartSpawn,
    OpenContainer,
    ProcessingBench,
    BenchPage,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 20] = [
        InteractionKind::UseBlock,
        InteractionKind::BreakBlock,
        InteractionKind::ChangeBlock,
        InteractionKind::ChangeState,
        InteractionKind::CycleBlockGroup,
        InteractionKind::CropHarvest,
        InteractionKind::FarmingStage,
        InteractionKind::Fertilize,
        InteractionKind::WateringCan,
        InteractionKind::CaptureCrate,
        InteractionKind::Coop,
        InteractionKind::Teleporter,
        InteractionKind::PortalEntry,
        InteractionKind::PortalReturn,
        InteractionKind::InstanceTeleport,
        InteractionKind::Seating,
        InteractionKind::MinecartSpawn,
        InteractionKind::OpenContainer,
        InteractionKind::ProcessingBench,
        InteractionKind::BenchPage,
    ];

    /// Slot whose hook decides this kind.
    pub const fn slot(self) -> Slot {
        use InteractionKind::*;
        match self {
            BreakBlock => Slot::BlockBreak,
            ChangeBlock | MinecartSpawn => Slot::BlockPlace,
            CycleBlockGroup => Slot::Hammer,
            Teleporter => Slot::Teleporter,
            PortalEntry | PortalReturn | InstanceTeleport => Slot::Portal,
            Seating => Slot::Seat,
            OpenContainer | ProcessingBench | BenchPage => Slot::ContainerOpen,
            UseBlock | ChangeState | CropHarvest | FarmingStage | Fertilize | WateringCan
            | CaptureCrate | Coop => Slot::Use,
        }
    }

    /// Feature this kind is advertised under.
    pub const fn feature(self) -> &'static str {
        use InteractionKind::*;
        match self {
            UseBlock => "use_block",
            BreakBlock => "break_block_interaction",
            ChangeBlock => "change_block",
            ChangeState => "change_state",
            CycleBlockGroup => "hammer",
            CropHarvest => "crop_harvest",
            FarmingStage => "farming_stage",
            Fertilize => "fertilize",
            WateringCan => "watering_can",
            CaptureCrate => "capture_crate",
            Coop => "coop",
            Teleporter => "teleporter",
            PortalEntry => "portal_entry",
            PortalReturn => "portal_return",
            InstanceTeleport => "instance_teleport",
            Seating => "seat",
            MinecartSpawn => "minecart_spawn",
            OpenContainer => "container_open",
            ProcessingBench => "processing_bench",
            BenchPage => "bench_page",
        }
    }
}

pub struct InteractionGate {
    core: GateCore,
    bindings: KeyedBindingCache<InteractionKind, PositionHook>,
}

impl InteractionGate {
    pub fn new(core: GateCore) -> Self {
        for kind in InteractionKind::ALL {
            core.declare(Some(kind.feature()));
        }
        Self {
            core,
            bindings: KeyedBindingCache::new(),
        }
    }

    pub fn check(
        &self,
        kind: InteractionKind,
        gather: impl FnOnce() -> Option<PositionQuery>,
    ) -> Decision {
        let Some(binding) =
            self.bindings
                .resolve(kind, self.core.registry(), kind.slot(), self.core.faults())
        else {
            return Decision::Allowed;
        };
        let Some(query) = gather() else {
            return Decision::Allowed;
        };
        decide(&self.core, &binding, &query)
    }

    /// Routes by kind name. Unknown kinds pass through.
    pub fn check_named(
        &self,
        kind: &str,
        gather: impl FnOnce() -> Option<PositionQuery>,
    ) -> Decision {
        match kind.parse::<InteractionKind>() {
            Ok(kind) => self.check(kind, gather),
            Err(_) => {
                trace!(target: "guard::gate", kind, "unrouted interaction kind");
                Decision::Allowed
            }
        }
    }

    /// Kinds with a live cached binding.
    pub fn cached_kinds(&self) -> usize {
        self.bindings.len()
    }

    pub fn core(&self) -> &GateCore {
        &self.core
    }
}
