//! `Uuid` extensions for Bluetooth UUIDs

use uuid::Uuid;

/// This is the Bluetooth Base UUID. It is used with 16-bit and 32-bit UUIDs
/// [defined](https://www.bluetooth.com/specifications/assigned-numbers/) by the Bluetooth SIG.
pub const BLUETOOTH_BASE_UUID: u128 = 0x00000000_0000_1000_8000_00805f9b34fb;

/// Const function to create a 16-bit Bluetooth UUID
pub const fn bluetooth_uuid_from_u16(uuid: u16) -> Uuid {
    Uuid::from_u128(((uuid as u128) << 96) | BLUETOOTH_BASE_UUID)
}

/// Const function to create a 32-bit Bluetooth UUID
pub const fn bluetooth_uuid_from_u32(uuid: u32) -> Uuid {
    Uuid::from_u128(((uuid as u128) << 96) | BLUETOOTH_BASE_UUID)
}

/// Extension trait for [uuid::Uuid] with helper methods for dealing with Bluetooth 16-bit and 32-bit UUIDs
pub trait BluetoothUuidExt: private::Sealed {
    /// Creates a 16-bit Bluetooth UUID
    fn from_u16(uuid: u16) -> Self;

    /// Creates a 32-bit Bluetooth UUID
    fn from_u32(uuid: u32) -> Self;

    /// Creates a UUID from `bytes`
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` is not one of 2, 4, or 16
    fn from_bluetooth_bytes(bytes: &[u8]) -> Self;

    /// Creates a UUID from `bytes`, returning `None` if `bytes.len()` is not one of 2, 4, or 16
    ///
    /// Discovery records from a remote device may carry a malformed UUID width; this form lets
    /// the caller map that to a fallback value instead of panicking.
    fn try_from_bluetooth_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: Sized;

    /// Returns `true` if self is a valid 16-bit Bluetooth UUID
    fn is_u16_uuid(&self) -> bool;

    /// Returns `true` if self is a valid 32-bit Bluetooth UUID
    fn is_u32_uuid(&self) -> bool;

    /// Tries to convert self into a 16-bit Bluetooth UUID
    fn try_to_u16(&self) -> Option<u16>;

    /// Tries to convert self into a 32-bit Bluetooth UUID
    fn try_to_u32(&self) -> Option<u32>;

    /// Returns a slice of octets representing the UUID. If the UUID is a valid 16- or 32-bit
    /// Bluetooth UUID, the returned slice will be 2 or 4 octets long, respectively. Otherwise the
    /// slice will be 16-octets in length.
    fn as_bluetooth_bytes(&self) -> &[u8];
}

impl BluetoothUuidExt for Uuid {
    fn from_u16(uuid: u16) -> Self {
        bluetooth_uuid_from_u16(uuid)
    }

    fn from_u32(uuid: u32) -> Self {
        bluetooth_uuid_from_u32(uuid)
    }

    fn from_bluetooth_bytes(bytes: &[u8]) -> Self {
        Self::try_from_bluetooth_bytes(bytes).expect("invalid slice length for bluetooth UUID")
    }

    fn try_from_bluetooth_bytes(bytes: &[u8]) -> Option<Self> {
        bytes
            .try_into()
            .map(|x| Self::from_u16(u16::from_be_bytes(x)))
            .or_else(|_| bytes.try_into().map(|x| Self::from_u32(u32::from_be_bytes(x))))
            .or_else(|_| bytes.try_into().map(Self::from_bytes))
            .ok()
    }

    fn is_u16_uuid(&self) -> bool {
        let u = self.as_u128();
        (u & ((1 << 96) - 1)) == BLUETOOTH_BASE_UUID && (((u >> 96) as u32) & 0xffff0000) == 0
    }

    fn is_u32_uuid(&self) -> bool {
        let u = self.as_u128();
        (u & ((1 << 96) - 1)) == BLUETOOTH_BASE_UUID
    }

    fn try_to_u16(&self) -> Option<u16> {
        let u = self.as_u128();
        self.is_u16_uuid().then(|| (u >> 96) as u16)
    }

    fn try_to_u32(&self) -> Option<u32> {
        let u = self.as_u128();
        self.is_u32_uuid().then(|| (u >> 96) as u32)
    }

    fn as_bluetooth_bytes(&self) -> &[u8] {
        let bytes = self.as_bytes();
        if self.is_u16_uuid() {
            &bytes[2..4]
        } else if self.is_u32_uuid() {
            &bytes[0..4]
        } else {
            &bytes[..]
        }
    }
}

mod private {
    use uuid::Uuid;

    pub trait Sealed {}

    impl Sealed for Uuid {}
}

/// Bluetooth GATT Descriptor 16-bit UUIDs
pub mod descriptors {
    #![allow(missing_docs)]

    use uuid::Uuid;

    use super::bluetooth_uuid_from_u16;

    pub const CHARACTERISTIC_EXTENDED_PROPERTIES: Uuid = bluetooth_uuid_from_u16(0x2900);
    pub const CHARACTERISTIC_USER_DESCRIPTION: Uuid = bluetooth_uuid_from_u16(0x2901);
    pub const CLIENT_CHARACTERISTIC_CONFIGURATION: Uuid = bluetooth_uuid_from_u16(0x2902);
    pub const SERVER_CHARACTERISTIC_CONFIGURATION: Uuid = bluetooth_uuid_from_u16(0x2903);
    pub const CHARACTERISTIC_PRESENTATION_FORMAT: Uuid = bluetooth_uuid_from_u16(0x2904);
    pub const CHARACTERISTIC_AGGREGATE_FORMAT: Uuid = bluetooth_uuid_from_u16(0x2905);
    pub const VALID_RANGE: Uuid = bluetooth_uuid_from_u16(0x2906);
    pub const EXTERNAL_REPORT_REFERENCE: Uuid = bluetooth_uuid_from_u16(0x2907);
    pub const REPORT_REFERENCE: Uuid = bluetooth_uuid_from_u16(0x2908);
    pub const NUMBER_OF_DIGITALS: Uuid = bluetooth_uuid_from_u16(0x2909);
    pub const VALUE_TRIGGER_SETTING: Uuid = bluetooth_uuid_from_u16(0x290A);
    pub const ENVIRONMENTAL_SENSING_CONFIGURATION: Uuid = bluetooth_uuid_from_u16(0x290B);
    pub const ENVIRONMENTAL_SENSING_MEASUREMENT: Uuid = bluetooth_uuid_from_u16(0x290C);
    pub const ENVIRONMENTAL_SENSING_TRIGGER_SETTING: Uuid = bluetooth_uuid_from_u16(0x290D);
    pub const TIME_TRIGGER_SETTING: Uuid = bluetooth_uuid_from_u16(0x290E);
    pub const COMPLETE_BR_EDR_TRANSPORT_BLOCK_DATA: Uuid = bluetooth_uuid_from_u16(0x290F);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_16_bit_wire_bytes() {
        let uuid = Uuid::try_from_bluetooth_bytes(&[0x29, 0x02]).unwrap();
        assert_eq!(uuid, descriptors::CLIENT_CHARACTERISTIC_CONFIGURATION);
        assert_eq!(uuid.try_to_u16(), Some(0x2902));
    }

    #[test]
    fn decodes_32_bit_wire_bytes() {
        let uuid = Uuid::try_from_bluetooth_bytes(&[0x00, 0x01, 0x29, 0x02]).unwrap();
        assert_eq!(uuid, bluetooth_uuid_from_u32(0x00012902));
        assert_eq!(uuid.try_to_u16(), None);
        assert_eq!(uuid.try_to_u32(), Some(0x00012902));
    }

    #[test]
    fn decodes_128_bit_wire_bytes() {
        let expected = Uuid::from_u128(0x6e400001_b5a3_f393_e0a9_e50e24dcca9e);
        let uuid = Uuid::try_from_bluetooth_bytes(expected.as_bytes()).unwrap();
        assert_eq!(uuid, expected);
        assert!(!uuid.is_u32_uuid());
    }

    #[test]
    fn rejects_unrecognized_widths() {
        assert_eq!(Uuid::try_from_bluetooth_bytes(&[]), None);
        assert_eq!(Uuid::try_from_bluetooth_bytes(&[0x29]), None);
        assert_eq!(Uuid::try_from_bluetooth_bytes(&[0; 3]), None);
        assert_eq!(Uuid::try_from_bluetooth_bytes(&[0; 17]), None);
    }

    #[test]
    fn round_trips_through_bluetooth_bytes() {
        let uuid = descriptors::REPORT_REFERENCE;
        assert_eq!(uuid.as_bluetooth_bytes(), &[0x29, 0x08]);
        assert_eq!(Uuid::from_bluetooth_bytes(uuid.as_bluetooth_bytes()), uuid);
    }
}
