use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cooperative stop signal for a running crawl
///
/// Cloning shares the flag. The crawl loop checks it between pages, so a stop
/// request takes effect after the page in progress has been recorded.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the crawl to stop at the next iteration
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`StopHandle::stop`] has been called on any clone
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Routes interrupts for a whole shell session
///
/// While a crawl is armed, an interrupt stops it. With nothing armed, an
/// interrupt means the session should end.
#[derive(Debug, Clone, Default)]
pub struct InterruptRouter {
    current: Arc<Mutex<Option<StopHandle>>>,
}

impl InterruptRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh stop handle for the crawl about to start
    pub fn arm(&self) -> StopHandle {
        let handle = StopHandle::new();
        *self.slot() = Some(handle.clone());
        handle
    }

    /// Forgets the finished crawl
    pub fn disarm(&self) {
        *self.slot() = None;
    }

    /// Delivers one interrupt
    ///
    /// # Returns
    ///
    /// `true` if a running crawl was asked to stop, `false` if none was armed
    pub fn interrupt(&self) -> bool {
        match self.slot().as_ref() {
            Some(handle) => {
                handle.stop();
                true
            }
            None => false,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<StopHandle>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let handle = StopHandle::new();
        let clone = handle.clone();
        assert!(!handle.is_stopped());

        clone.stop();
        assert!(handle.is_stopped());
    }

    #[test]
    fn test_interrupt_without_crawl_ends_session() {
        let router = InterruptRouter::new();
        assert!(!router.interrupt());
    }

    #[test]
    fn test_interrupt_stops_armed_crawl_only() {
        let router = InterruptRouter::new();
        let handle = router.arm();

        assert!(router.clone().interrupt());
        assert!(handle.is_stopped());

        router.disarm();
        assert!(!router.interrupt());

        // A new crawl starts with a clear flag
        let next = router.arm();
        assert!(!next.is_stopped());
    }
}
