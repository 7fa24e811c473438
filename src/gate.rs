//! Render concurrency gate.
//!
//! Bounds how many item renders run at once.  [`ConcurrencyGate::try_acquire`]
//! either hands out a [`RenderSlot`] or refuses; a refused caller defers and
//! retries after a fixed delay rather than queueing, so there is no fairness
//! guarantee under sustained saturation.  The slot releases its place when
//! dropped, whether the render succeeded, failed, or never finished.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Most renders allowed in flight at once.
pub const MAX_IN_FLIGHT: usize = 4;

/// Shared counter of in-flight renders, capped at a maximum.
#[derive(Clone)]
pub struct ConcurrencyGate {
    in_flight: Arc<AtomicUsize>,
    max: usize,
}

/// One reserved render slot.  Dropping it releases the reservation.
pub struct RenderSlot {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for RenderSlot {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ConcurrencyGate {
    pub fn new(max: usize) -> Self {
        Self {
            in_flight: Arc::new(AtomicUsize::new(0)),
            max,
        }
    }

    /// Reserve a slot, or refuse if the gate is saturated.
    pub fn try_acquire(&self) -> Option<RenderSlot> {
        let mut current = self.in_flight.load(Ordering::SeqCst);
        loop {
            if current >= self.max {
                return None;
            }
            match self.in_flight.compare_exchange(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => {
                    return Some(RenderSlot {
                        in_flight: Arc::clone(&self.in_flight),
                    })
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Renders currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_saturated(&self) -> bool {
        self.in_flight() >= self.max
    }
}
