/// The narrow interface a [`RemoteDescriptor`][crate::RemoteDescriptor] consumes from its owning
/// characteristic's connection chain (characteristic to service to client).
///
/// The descriptor holds a non-owning reference to its owner and uses it only to reach the
/// connection context; discovery, subscription, and the rest of the characteristic surface stay
/// with the implementor.
pub trait Characteristic: Send + Sync {
    /// The connection id of the client's active connection.
    fn conn_id(&self) -> u16;

    /// Whether the client's connection is currently active.
    fn is_connected(&self) -> bool;

    /// The negotiated ATT MTU for the active connection.
    fn att_mtu(&self) -> u16;

    /// Requests a secure-connection upgrade (renegotiating pairing/encryption strength).
    ///
    /// Returns `true` if an upgrade is available and was initiated, in which case a failed
    /// operation may be retried once.
    fn secure_connection(&self) -> bool;
}
