use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, info, warn};

use crate::btuuid::BluetoothUuidExt;
use crate::error::AttErrorCode;
use crate::signal::StatusSignal;
use crate::transport::{CompletionCallback, GattEvent, GattStatus, GattTransport};
use crate::{Characteristic, Uuid};

/// ATT write request header octets; what remains of the MTU is single-frame payload capacity.
const ATT_HEADER_LEN: u16 = 3;

/// A descriptor attribute as reported by descriptor discovery.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRecord {
    /// The descriptor's attribute handle on the remote device.
    pub handle: u16,
    /// The descriptor type UUID in wire form: 2, 4, or 16 octets, in the byte order of
    /// [`BluetoothUuidExt::from_bluetooth_bytes`].
    pub uuid: Vec<u8>,
}

/// State shared with in-flight completion callbacks.
#[derive(Debug)]
struct Inflight {
    /// Accumulated payload of the current read attempt. Written only from the transport context
    /// while a read is in flight; the caller reads it back after `read_done` wakes it.
    value: Mutex<Vec<u8>>,
    read_done: StatusSignal,
    write_done: StatusSignal,
}

/// A remote Bluetooth GATT descriptor, exposing blocking read and write operations on top of a
/// callback-driven host stack.
///
/// A `RemoteDescriptor` is constructed from a discovery record once descriptor discovery has
/// completed. It holds a non-owning reference to its owning [`Characteristic`]; once the owner is
/// gone every operation fails as if disconnected.
pub struct RemoteDescriptor {
    uuid: Uuid,
    handle: u16,
    characteristic: Weak<dyn Characteristic>,
    transport: Arc<dyn GattTransport>,
    inflight: Arc<Inflight>,
}

impl RemoteDescriptor {
    /// Creates a descriptor from its discovery record.
    ///
    /// An unrecognized UUID wire width in `record` yields a [nil UUID][Uuid::nil] rather than an
    /// error.
    pub fn new(
        characteristic: Weak<dyn Characteristic>,
        transport: Arc<dyn GattTransport>,
        record: &DescriptorRecord,
    ) -> Self {
        RemoteDescriptor {
            uuid: Uuid::try_from_bluetooth_bytes(&record.uuid).unwrap_or_else(Uuid::nil),
            handle: record.handle,
            characteristic,
            transport,
            inflight: Arc::new(Inflight {
                value: Mutex::new(Vec::new()),
                read_done: StatusSignal::new(),
                write_done: StatusSignal::new(),
            }),
        }
    }

    /// The [`Uuid`] identifying the type of this GATT descriptor
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// The descriptor's attribute handle on the remote device
    pub fn handle(&self) -> u16 {
        self.handle
    }

    /// The characteristic that owns this descriptor, or `None` once the owner is gone
    pub fn characteristic(&self) -> Option<Arc<dyn Characteristic>> {
        self.characteristic.upgrade()
    }

    /// The most recently accumulated value of this descriptor
    ///
    /// Not meaningful until a [`read`][Self::read] completes successfully; a new read attempt
    /// always starts from empty.
    pub fn last_value(&self) -> Vec<u8> {
        self.inflight.value.lock().unwrap().clone()
    }

    /// Reads the value of this descriptor from the device, blocking until it is complete.
    ///
    /// The value is read as a long read: the transport may deliver it across several
    /// continuation frames, which are accumulated in delivery order. A peer that does not
    /// support long reads yields the single short frame it delivered. If the peer demands more
    /// security and a secure-connection upgrade is available, the read is retried once from
    /// scratch after the upgrade.
    ///
    /// Returns an empty value on any failure.
    pub fn read(&self) -> Vec<u8> {
        debug!("reading {}", self);

        let Some(characteristic) = self.characteristic.upgrade() else {
            warn!("descriptor read on a dead characteristic");
            return Vec::new();
        };
        if !characteristic.is_connected() {
            warn!("descriptor read while disconnected");
            return Vec::new();
        }

        let mut security_retry = true;
        loop {
            self.inflight.value.lock().unwrap().clear();
            self.inflight.read_done.arm();

            let submitted = self.transport.read_long(
                characteristic.conn_id(),
                self.handle,
                0,
                self.read_callback(Arc::clone(&characteristic)),
            );
            if let Err(err) = submitted {
                warn!("failed to submit descriptor read: {}", err);
                self.inflight.read_done.force_release();
                return Vec::new();
            }

            match self.inflight.read_done.wait() {
                GattStatus::Success | GattStatus::Done => break,
                status => match status.att_code() {
                    // The attribute only supports single-frame reads; the one short frame
                    // already accumulated is the complete value.
                    Some(AttErrorCode::AttributeNotLong) => {
                        info!("descriptor not long-readable, accepting short read");
                        break;
                    }
                    Some(code)
                        if code.is_security_error() && security_retry && characteristic.secure_connection() =>
                    {
                        debug!("retrying descriptor read after security upgrade ({})", code);
                        security_retry = false;
                    }
                    _ => {
                        warn!("descriptor read failed: {:?}", status);
                        return Vec::new();
                    }
                },
            }
        }

        let value = self.inflight.value.lock().unwrap().clone();
        debug!("read {} bytes from descriptor handle {}", value.len(), self.handle);
        value
    }

    /// Reads the descriptor value and returns its first byte, or 0 if the value is empty
    pub fn read_u8(&self) -> u8 {
        let value = self.read();
        if value.is_empty() {
            0
        } else {
            value[0]
        }
    }

    /// Reads the descriptor value and returns its first two bytes as an unsigned little-endian
    /// integer, or 0 if fewer bytes were retrieved
    pub fn read_u16(&self) -> u16 {
        let value = self.read();
        if value.len() >= 2 {
            u16::from_le_bytes([value[0], value[1]])
        } else {
            0
        }
    }

    /// Reads the descriptor value and returns its first four bytes as an unsigned little-endian
    /// integer, or 0 if fewer bytes were retrieved
    pub fn read_u32(&self) -> u32 {
        let value = self.read();
        if value.len() >= 4 {
            u32::from_le_bytes([value[0], value[1], value[2], value[3]])
        } else {
            0
        }
    }

    /// Writes `value` to this descriptor on the device.
    ///
    /// A payload that fits in a single frame (the negotiated ATT MTU less the request header)
    /// and needs no response is submitted fire-and-forget, returning the submission's immediate
    /// accept/reject without blocking. Anything else is a confirmed write that blocks until the
    /// peer's response arrives; a payload exceeding a single frame is segmented, which forces
    /// confirmation regardless of `needs_response`.
    ///
    /// A peer that rejects a segmented write as not-long-writable gets one retry with the
    /// payload truncated to a single frame, so a best-effort partial write still lands. Security
    /// demands are retried once after a secure-connection upgrade, independently of the
    /// truncation retry.
    pub fn write(&self, value: &[u8], needs_response: bool) -> bool {
        debug!("writing {} bytes to {}", value.len(), self);

        let Some(characteristic) = self.characteristic.upgrade() else {
            warn!("descriptor write on a dead characteristic");
            return false;
        };
        if !characteristic.is_connected() {
            warn!("descriptor write while disconnected");
            return false;
        }

        let capacity = usize::from(characteristic.att_mtu().saturating_sub(ATT_HEADER_LEN));
        if value.len() <= capacity && !needs_response {
            return match self
                .transport
                .write_no_response(characteristic.conn_id(), self.handle, value)
            {
                Ok(()) => true,
                Err(err) => {
                    warn!("failed to submit descriptor write: {}", err);
                    false
                }
            };
        }

        let mut value = value;
        let mut security_retry = true;
        let mut truncate_retry = true;
        loop {
            self.inflight.write_done.arm();

            let conn_id = characteristic.conn_id();
            let callback = self.write_callback(Arc::clone(&characteristic));
            let submitted = if value.len() > capacity {
                info!("long write of {} bytes to descriptor handle {}", value.len(), self.handle);
                self.transport.write_long(conn_id, self.handle, value, callback)
            } else {
                self.transport.write(conn_id, self.handle, value, callback)
            };
            if let Err(err) = submitted {
                warn!("failed to submit descriptor write: {}", err);
                self.inflight.write_done.force_release();
                return false;
            }

            match self.inflight.write_done.wait() {
                GattStatus::Success | GattStatus::Done => {
                    debug!("wrote {} bytes to descriptor handle {}", value.len(), self.handle);
                    return true;
                }
                status => match status.att_code() {
                    // The peer cannot take a segmented write; land what fits in one frame.
                    Some(AttErrorCode::AttributeNotLong) if truncate_retry => {
                        info!("peer does not support long writes, truncating to {} bytes", capacity);
                        truncate_retry = false;
                        value = &value[..capacity.min(value.len())];
                    }
                    Some(code)
                        if code.is_security_error() && security_retry && characteristic.secure_connection() =>
                    {
                        debug!("retrying descriptor write after security upgrade ({})", code);
                        security_retry = false;
                    }
                    _ => {
                        warn!("descriptor write failed: {:?}", status);
                        return false;
                    }
                },
            }
        }
    }

    /// Writes a single byte to this descriptor. See [`write`][Self::write].
    pub fn write_u8(&self, value: u8, needs_response: bool) -> bool {
        self.write(&[value], needs_response)
    }

    /// Forces both completion signals to a failure state, unblocking any thread stuck in
    /// [`read`][Self::read] or [`write`][Self::write].
    ///
    /// Must be invoked by the owning chain on connection teardown, since an outstanding
    /// operation's completion event will never arrive after an abrupt disconnect.
    pub fn force_release_waiters(&self) {
        self.inflight.read_done.force_release();
        self.inflight.write_done.force_release();
    }

    fn read_callback(&self, characteristic: Arc<dyn Characteristic>) -> CompletionCallback {
        let inflight = Arc::clone(&self.inflight);
        Box::new(move |event| match event {
            GattEvent::Frame { conn_id, value } => {
                // Events for a stale or foreign connection are not ours to act on.
                if conn_id == characteristic.conn_id() {
                    debug!("got {} bytes", value.len());
                    inflight.value.lock().unwrap().extend_from_slice(&value);
                }
            }
            GattEvent::Complete { conn_id, status } => {
                if conn_id == characteristic.conn_id() {
                    debug!("read complete, status {:?} on connection {}", status, conn_id);
                    inflight.read_done.signal(status);
                }
            }
        })
    }

    fn write_callback(&self, characteristic: Arc<dyn Characteristic>) -> CompletionCallback {
        let inflight = Arc::clone(&self.inflight);
        Box::new(move |event| {
            if let GattEvent::Complete { conn_id, status } = event {
                if conn_id == characteristic.conn_id() {
                    debug!("write complete, status {:?} on connection {}", status, conn_id);
                    inflight.write_done.signal(status);
                }
            }
        })
    }
}

impl fmt::Display for RemoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Descriptor: uuid: {}, handle: {}", self.uuid, self.handle)
    }
}

impl fmt::Debug for RemoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteDescriptor")
            .field("uuid", &self.uuid)
            .field("handle", &self.handle)
            .finish()
    }
}
