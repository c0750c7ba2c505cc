//! Guarded invocation of external hook code.
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use guard_core::{HookError, HookResult};

/// Runs `call`, turning a panic into [`HookError::Panicked`] and a result that
/// arrives after `budget` into [`HookError::Overran`].
///
/// The call is never preempted; an overrunning result is simply discarded.
pub(crate) fn call_hook<T>(
    budget: Option<Duration>,
    call: impl FnOnce() -> HookResult<T>,
) -> HookResult<T> {
    let started = budget.map(|_| Instant::now());
    let result = panic::catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|payload| Err(HookError::from_panic(payload.as_ref())));

    if let (Some(budget), Some(started)) = (budget, started) {
        let elapsed = started.elapsed();
        if elapsed > budget {
            return Err(HookError::Overran { elapsed, budget });
        }
    }
    result
}
