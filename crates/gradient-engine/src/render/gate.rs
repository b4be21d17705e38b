use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Counting gate bounding how many frames may be in flight on the GPU.
///
/// The render thread takes a [`FramePermit`] before encoding a frame and
/// moves it into the GPU completion callback; dropping the permit (on any
/// thread) frees the slot and wakes one waiter.
///
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct FrameGate {
    inner: Arc<GateInner>,
}

#[derive(Debug)]
struct GateInner {
    available: Mutex<usize>,
    released: Condvar,
    capacity: usize,
}

impl GateInner {
    fn release(&self) {
        let mut available = self.available.lock();
        debug_assert!(*available < self.capacity, "frame gate over-released");
        *available = (*available + 1).min(self.capacity);
        drop(available);
        self.released.notify_one();
    }
}

impl FrameGate {
    /// Creates a gate with `capacity` free slots (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(GateInner {
                available: Mutex::new(capacity),
                released: Condvar::new(),
                capacity,
            }),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Free slots right now. Racy by nature; use for diagnostics and tests.
    pub fn available(&self) -> usize {
        *self.inner.available.lock()
    }

    pub fn in_flight(&self) -> usize {
        self.capacity() - self.available()
    }

    /// Blocks until a slot is free.
    pub fn acquire(&self) -> FramePermit {
        let mut available = self.inner.available.lock();
        while *available == 0 {
            self.inner.released.wait(&mut available);
        }
        *available -= 1;
        self.permit()
    }

    pub fn try_acquire(&self) -> Option<FramePermit> {
        let mut available = self.inner.available.lock();
        if *available == 0 {
            return None;
        }
        *available -= 1;
        Some(self.permit())
    }

    /// Waits up to `timeout` for a slot.
    pub fn acquire_timeout(&self, timeout: Duration) -> Option<FramePermit> {
        let deadline = Instant::now() + timeout;
        let mut available = self.inner.available.lock();
        while *available == 0 {
            let timed_out = self.inner.released.wait_until(&mut available, deadline).timed_out();
            if timed_out && *available == 0 {
                return None;
            }
        }
        *available -= 1;
        Some(self.permit())
    }

    fn permit(&self) -> FramePermit {
        FramePermit {
            gate: Arc::clone(&self.inner),
        }
    }
}

/// One occupied gate slot. Released on drop.
#[derive(Debug)]
#[must_use = "dropping a permit releases its slot immediately"]
pub struct FramePermit {
    gate: Arc<GateInner>,
}

impl FramePermit {
    /// Releases the slot. Same as dropping.
    #[inline]
    pub fn release(self) {}
}

impl Drop for FramePermit {
    fn drop(&mut self) {
        self.gate.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn capacity_bounds_outstanding_permits() {
        let gate = FrameGate::new(3);
        let permits: Vec<_> = (0..3).map(|_| gate.try_acquire().unwrap()).collect();
        assert_eq!(gate.in_flight(), 3);
        assert!(gate.try_acquire().is_none());
        assert!(gate.acquire_timeout(Duration::from_millis(20)).is_none());

        drop(permits);
        assert_eq!(gate.available(), 3);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let gate = FrameGate::new(0);
        assert_eq!(gate.capacity(), 1);
        let _p = gate.acquire();
        assert!(gate.try_acquire().is_none());
    }

    #[test]
    fn release_from_other_thread_wakes_waiter() {
        let gate = FrameGate::new(1);
        let held = gate.acquire();

        let (tx, rx) = mpsc::channel();
        let waiter = {
            let gate = gate.clone();
            thread::spawn(move || {
                let p = gate.acquire();
                tx.send(()).unwrap();
                p.release();
            })
        };

        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        thread::spawn(move || held.release()).join().unwrap();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        waiter.join().unwrap();
        assert_eq!(gate.available(), 1);
    }

    #[test]
    fn permit_dropped_by_panicking_thread_frees_slot() {
        let gate = FrameGate::new(1);
        let worker = {
            let gate = gate.clone();
            thread::spawn(move || {
                let _permit = gate.acquire();
                panic!("render thread died mid-frame");
            })
        };
        assert!(worker.join().is_err());

        assert_eq!(gate.available(), 1);
        let p = gate.try_acquire().unwrap();
        assert_eq!(gate.in_flight(), 1);
        p.release();
    }

    #[test]
    fn acquire_timeout_succeeds_when_released_in_time() {
        let gate = FrameGate::new(1);
        let held = gate.acquire();
        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            drop(held);
        });
        assert!(gate.acquire_timeout(Duration::from_secs(5)).is_some());
        releaser.join().unwrap();
    }
}
