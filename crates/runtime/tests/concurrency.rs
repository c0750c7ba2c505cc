use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use guard_core::{
    ActorId, BlockPos, Decision, DenyMode, HookObject, HookResult, MessageSink, PositionQuery,
    RenderedMessage, Slot, VerdictHook,
};
use guard_runtime::{Guard, HookRegistry, InteractionKind};

struct Discard;

impl MessageSink for Discard {
    fn deliver(&self, _actor: ActorId, _message: RenderedMessage) -> HookResult<()> {
        Ok(())
    }
}

struct Fixed(i32);

impl VerdictHook<PositionQuery> for Fixed {
    fn evaluate(&self, _query: &PositionQuery) -> HookResult<i32> {
        Ok(self.0)
    }
}

fn query() -> Option<PositionQuery> {
    Some(PositionQuery::new(ActorId::random(), "overworld".into(), BlockPos::new(0, 64, 0)))
}

/// Gates running on many threads while hooks are swapped underneath them
/// only ever observe the old hook, the new hook, or no hook.
#[test]
fn gates_tolerate_concurrent_hot_swaps() {
    let registry = Arc::new(HookRegistry::new());
    let guard = Arc::new(
        Guard::builder()
            .registry(Arc::clone(&registry))
            .sink(Arc::new(Discard))
            .build()
            .expect("guard"),
    );
    let place = Arc::new(guard.block_place_gate());
    let router = Arc::new(guard.interaction_gate());
    let stop = Arc::new(AtomicBool::new(false));

    let swapper = {
        let registry = Arc::clone(&registry);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut i = 0_u32;
            while !stop.load(Ordering::Relaxed) {
                match i % 3 {
                    0 => registry.attach(Slot::BlockPlace, HookObject::position(Fixed(0))),
                    1 => registry.attach(Slot::BlockPlace, HookObject::position(Fixed(2))),
                    _ => registry.detach(Slot::BlockPlace),
                };
                i = i.wrapping_add(1);
            }
        })
    };

    let checkers: Vec<_> = (0..6)
        .map(|_| {
            let place = Arc::clone(&place);
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for _ in 0..2_000 {
                    for decision in [
                        place.check(query),
                        router.check(InteractionKind::ChangeBlock, query),
                    ] {
                        assert!(
                            matches!(
                                decision,
                                Decision::Allowed | Decision::Denied(DenyMode::Silent)
                            ),
                            "unexpected decision {decision:?}"
                        );
                    }
                }
            })
        })
        .collect();

    for checker in checkers {
        checker.join().expect("checker thread");
    }
    stop.store(true, Ordering::Relaxed);
    swapper.join().expect("swapper thread");

    assert_eq!(place.core().faults().fault_count(), 0);
    assert_eq!(router.core().faults().fault_count(), 0);
}
