//! Wearer location
//!
//! Stored as two signed 16-bit values in hundredths of a degree,
//! little-endian, latitude first.

use crate::persistence::Record;

/// File holding the location record
pub const LOCATION_FILE: &str = "location.u32";

/// Latitude limit in hundredths of a degree
pub const MAX_LATITUDE: i16 = 9000;

/// Longitude limit in hundredths of a degree
pub const MAX_LONGITUDE: i16 = 18000;

/// Latitude and longitude in hundredths of a degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Location {
    pub latitude: i16,
    pub longitude: i16,
}

impl Location {
    pub const fn new(latitude: i16, longitude: i16) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// An all-zero record means no location was ever set
    pub fn is_set(&self) -> bool {
        self.latitude != 0 || self.longitude != 0
    }

    /// Latitude in degrees
    pub fn latitude_degrees(&self) -> f32 {
        f32::from(self.latitude) / 100.0
    }

    /// Longitude in degrees
    pub fn longitude_degrees(&self) -> f32 {
        f32::from(self.longitude) / 100.0
    }
}

impl Record for Location {
    const SIZE: usize = 4;

    fn to_bytes(&self, out: &mut [u8]) {
        out[0..2].copy_from_slice(&self.latitude.to_le_bytes());
        out[2..4].copy_from_slice(&self.longitude.to_le_bytes());
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            latitude: i16::from_le_bytes([bytes[0], bytes[1]]),
            longitude: i16::from_le_bytes([bytes[2], bytes[3]]),
        }
    }

    fn clamp(&mut self) {
        self.latitude = self.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        self.longitude = self.longitude.clamp(-MAX_LONGITUDE, MAX_LONGITUDE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemFs;
    use crate::persistence::{load, store};
    use proptest::prelude::*;

    #[test]
    fn test_byte_layout() {
        let mut out = [0u8; 4];
        Location::new(-1, 0x1234).to_bytes(&mut out);
        assert_eq!(out, [0xFF, 0xFF, 0x34, 0x12]);
    }

    #[test]
    fn test_absent_file_is_unset() {
        let fs = MemFs::new();
        let location: Location = load(&fs, LOCATION_FILE);
        assert!(!location.is_set());
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let mut fs = MemFs::new();
        let mut bytes = [0u8; 4];
        Location::new(12_000, -30_000).to_bytes(&mut bytes);
        crate::traits::Filesystem::write(&mut fs, LOCATION_FILE, &bytes).unwrap();
        let location: Location = load(&fs, LOCATION_FILE);
        assert_eq!(location, Location::new(MAX_LATITUDE, -MAX_LONGITUDE));
    }

    proptest! {
        #[test]
        fn test_persist_round_trip(
            lat in -MAX_LATITUDE..=MAX_LATITUDE,
            lon in -MAX_LONGITUDE..=MAX_LONGITUDE,
        ) {
            let mut fs = MemFs::new();
            let location = Location::new(lat, lon);
            store(&mut fs, LOCATION_FILE, &location).unwrap();
            let loaded: Location = load(&fs, LOCATION_FILE);
            prop_assert_eq!(loaded, location);
        }
    }
}
