use std::sync::{Condvar, Mutex};

use crate::GattStatus;

/// Status delivered by [`StatusSignal::force_release`]. Matches the host-stack failure shape so a
/// released waiter observes an ordinary terminal failure.
pub(crate) const RELEASED: GattStatus = GattStatus::Stack(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Idle,
    Armed,
    Signaled(GattStatus),
}

/// A one-shot, value-carrying signal slot bridging a transport callback to a blocked caller.
///
/// Protocol: the caller `arm`s the slot before submitting a request, then `wait`s; the completion
/// path delivers the terminal status with `signal`, waking the caller. The slot is reusable:
/// `arm` discards any stale delivery from an abandoned operation, so a `signal` that arrives
/// after its waiter gave up cannot leak into the next arm/wait cycle. One outstanding waiter at a
/// time.
#[derive(Debug)]
pub(crate) struct StatusSignal {
    slot: Mutex<Slot>,
    waker: Condvar,
}

impl StatusSignal {
    pub(crate) fn new() -> Self {
        StatusSignal {
            slot: Mutex::new(Slot::Idle),
            waker: Condvar::new(),
        }
    }

    /// Resets the slot to the unsignaled state. Must precede the submission of the request whose
    /// completion will signal it, so a callback firing before the caller reaches `wait` is not
    /// racing a stale state.
    pub(crate) fn arm(&self) {
        let mut slot = self.slot.lock().unwrap();
        *slot = Slot::Armed;
    }

    /// Blocks until a status is delivered, returns it, and leaves the slot idle.
    pub(crate) fn wait(&self) -> GattStatus {
        let mut slot = self.slot.lock().unwrap();
        loop {
            if let Slot::Signaled(status) = *slot {
                *slot = Slot::Idle;
                return status;
            }
            slot = self.waker.wait(slot).unwrap();
        }
    }

    /// Delivers `status`, waking the waiter if one is blocked. Safe to call when no waiter
    /// exists; the delivery sits in the slot until the next `arm` discards it.
    pub(crate) fn signal(&self, status: GattStatus) {
        let mut slot = self.slot.lock().unwrap();
        *slot = Slot::Signaled(status);
        self.waker.notify_one();
    }

    /// Unconditionally delivers the forced-release failure status, unblocking any waiter whose
    /// transport completion will never arrive.
    pub(crate) fn force_release(&self) {
        self.signal(RELEASED);
    }
}
