//! Tracks whether the current thread is polling a guarded agent call.
//!
//! A panic raised there is caught by the fan-out and turned into a degraded
//! output, so the process-wide panic hook can stay quiet about it.

use std::cell::Cell;

thread_local! {
    static GUARDED_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// True while a guarded agent call is being polled on this thread
pub fn panic_is_contained() -> bool {
    GUARDED_DEPTH.with(|depth| depth.get() > 0)
}

/// Held for the duration of one poll. Dropped on unwind as well.
pub(crate) struct ContainedScope;

impl ContainedScope {
    pub(crate) fn enter() -> Self {
        GUARDED_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }
}

impl Drop for ContainedScope {
    fn drop(&mut self) {
        GUARDED_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_nests_and_unwinds() {
        assert!(!panic_is_contained());
        {
            let _outer = ContainedScope::enter();
            let _inner = ContainedScope::enter();
            assert!(panic_is_contained());
        }
        assert!(!panic_is_contained());

        let caught = std::panic::catch_unwind(|| {
            let _scope = ContainedScope::enter();
            panic!("boom");
        });
        assert!(caught.is_err());
        assert!(!panic_is_contained());
    }
}
