#![warn(missing_docs)]

//! Gattc is a blocking client-side I/O library for remote [Bluetooth Low Energy] (BLE) GATT
//! descriptors for [Rust]. It implements the GATT Client role for a single descriptor attribute:
//! long reads with multi-frame accumulation, short/segmented/fire-and-forget writes, and a single
//! retry after a secure-connection upgrade when the peer demands more security.
//!
//! [Rust]: https://www.rust-lang.org/
//! [Bluetooth Low Energy]: https://www.bluetooth.com/specifications/specs/
//!
//! # Overview
//!
//! The goal of gattc is to provide a *thin*, synchronous request/response API on top of a
//! callback-driven BLE host stack. The host stack itself is an external collaborator: you hand
//! [`RemoteDescriptor`] a [`GattTransport`] implementation that submits ATT requests and delivers
//! completion events from its own execution context, and a [`Characteristic`] implementation
//! giving the descriptor its narrow view of the owning connection (connection id, connection
//! state, negotiated MTU, and whether a security upgrade may be requested).
//!
//! The primary operations are:
//!
//! - [Reading][RemoteDescriptor::read] a descriptor value, transparently accumulating the
//!   continuation frames of a long read
//! - [Writing][RemoteDescriptor::write] a descriptor value, choosing between a fire-and-forget
//!   write, a confirmed write, or a segmented long write based on payload size and the caller's
//!   response preference
//! - [Releasing][RemoteDescriptor::force_release_waiters] any blocked caller when the connection
//!   is torn down
//!
//! # Blocking model
//!
//! [`RemoteDescriptor::read`] and the confirmed-write branch of [`RemoteDescriptor::write`] block
//! the calling thread until the transport delivers a terminal completion event. Completion
//! callbacks always run on the transport's context, never the caller's, and the only unblock
//! mechanisms are a terminal status from the transport or
//! [`force_release_waiters`][RemoteDescriptor::force_release_waiters]. Neither operation is
//! intended to be invoked concurrently with itself on the same descriptor; reads and writes on
//! the same descriptor, and any operations on different descriptors, are independent.
//!
//! # Error model
//!
//! Failures are absorbed: [`read`][RemoteDescriptor::read] returns an empty value and
//! [`write`][RemoteDescriptor::write] returns `false` on any failure, with detail surfaced only
//! through `tracing`. Transport implementations report synchronous submission failures through
//! [`Error`], and deliver terminal protocol statuses as [`GattStatus`] values built from the ATT
//! error table in [`error`].
//!
//! # Feature flags
//!
//! The `serde` feature is available to enable serializing/deserializing discovery records.

pub mod btuuid;
mod characteristic;
mod descriptor;
pub mod error;
mod signal;
mod transport;

pub use btuuid::BluetoothUuidExt;
pub use characteristic::Characteristic;
pub use descriptor::{DescriptorRecord, RemoteDescriptor};
pub use error::Error;
pub use transport::{CompletionCallback, GattEvent, GattStatus, GattTransport};
pub use uuid::Uuid;

/// Convenience alias for a result with [`Error`]
pub type Result<T, E = Error> = core::result::Result<T, E>;
