//! Time-zone rules
//!
//! The zone database itself is external; the runtime only needs the
//! offset of a zone at a given UTC instant.

use crate::datetime::DateTime;

/// Offsets are cached in increments of this many minutes
pub const OFFSET_INCREMENT_MINUTES: i16 = 15;

/// A table of time zones
pub trait ZoneTable {
    /// Number of zones in the table
    fn zone_count(&self) -> u8;

    /// Display name of a zone
    fn name(&self, zone: u8) -> &str;

    /// UTC offset of `zone` in minutes at the UTC instant `utc`
    fn offset_minutes(&self, zone: u8, utc: &DateTime) -> i16;
}

/// Zones with a fixed offset and no daylight saving
#[derive(Debug, Clone, Copy)]
pub struct FixedZones {
    zones: &'static [(&'static str, i16)],
}

/// UTC only
pub const UTC_ONLY: FixedZones = FixedZones::new(&[("UTC", 0)]);

impl FixedZones {
    /// Create a table from `(name, offset_minutes)` pairs
    pub const fn new(zones: &'static [(&'static str, i16)]) -> Self {
        Self { zones }
    }
}

impl ZoneTable for FixedZones {
    fn zone_count(&self) -> u8 {
        self.zones.len() as u8
    }

    fn name(&self, zone: u8) -> &str {
        self.zones.get(usize::from(zone)).map(|z| z.0).unwrap_or("UTC")
    }

    fn offset_minutes(&self, zone: u8, _utc: &DateTime) -> i16 {
        self.zones.get(usize::from(zone)).map(|z| z.1).unwrap_or(0)
    }
}
