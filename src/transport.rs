//! The seam between a [`RemoteDescriptor`][crate::RemoteDescriptor] and the BLE host stack.

use crate::error::AttError;
use crate::Result;

/// Terminal status of a GATT client procedure, as delivered by the host stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GattStatus {
    /// The procedure completed successfully.
    Success,
    /// The host stack finished enumerating a long attribute; everything delivered so far is the
    /// complete value.
    Done,
    /// The peer rejected the request with an ATT protocol error.
    Att(AttError),
    /// Any other host-stack status code. Forced release on teardown is reported this way and is
    /// indistinguishable from a stack failure.
    Stack(u16),
}

impl GattStatus {
    /// The ATT error code carried by this status, if any.
    pub(crate) fn att_code(self) -> Option<crate::error::AttErrorCode> {
        match self {
            GattStatus::Att(AttError::Known(code)) => Some(code),
            _ => None,
        }
    }
}

/// An event delivered by the transport for an in-flight GATT client procedure.
///
/// Events carry the connection id they were produced on so the receiver can discard events that
/// belong to a stale or foreign connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GattEvent {
    /// One partial payload frame of a long read. More events follow.
    Frame {
        /// The connection the frame arrived on.
        conn_id: u16,
        /// The frame's payload bytes, in delivery order.
        value: Vec<u8>,
    },
    /// The terminal completion of the procedure. Exactly one is delivered per submission.
    Complete {
        /// The connection the procedure ran on.
        conn_id: u16,
        /// The procedure's final status.
        status: GattStatus,
    },
}

/// Completion callback handed to the transport with each submission.
///
/// The transport invokes it on its own execution context, never on the submitting thread: zero or
/// more [`GattEvent::Frame`]s followed by exactly one [`GattEvent::Complete`].
pub type CompletionCallback = Box<dyn FnMut(GattEvent) + Send>;

/// A callback-driven BLE host stack capable of submitting GATT client requests.
///
/// Submission methods return synchronously: `Ok(())` means the request was accepted and a
/// completion will eventually be delivered through the callback; `Err` means the request was
/// rejected outright (for example, resource exhaustion) and no callback will fire.
pub trait GattTransport: Send + Sync {
    /// Submits a long read of the attribute at `handle`, starting at `offset`.
    ///
    /// The transport splits the read into continuation frames internally and delivers each
    /// partial payload as a [`GattEvent::Frame`].
    fn read_long(&self, conn_id: u16, handle: u16, offset: u16, callback: CompletionCallback) -> Result<()>;

    /// Submits a single confirmed write of `value` to the attribute at `handle`.
    fn write(&self, conn_id: u16, handle: u16, value: &[u8], callback: CompletionCallback) -> Result<()>;

    /// Submits a segmented (prepare/execute) write of `value` to the attribute at `handle`.
    ///
    /// Used when `value` exceeds the single-frame payload capacity; the transport splits it into
    /// frames internally. Always confirmed.
    fn write_long(&self, conn_id: u16, handle: u16, value: &[u8], callback: CompletionCallback) -> Result<()>;

    /// Submits a fire-and-forget write of `value` to the attribute at `handle`.
    ///
    /// No completion event is delivered; the returned result is the submission's synchronous
    /// accept/reject.
    fn write_no_response(&self, conn_id: u16, handle: u16, value: &[u8]) -> Result<()>;
}
