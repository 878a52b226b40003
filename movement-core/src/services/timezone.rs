//! Cached time-zone offsets
//!
//! Evaluating zone rules is too slow to do on every tick, so the offset
//! of every zone is cached in 15-minute steps and refreshed whenever the
//! RTC enters a new quarter hour.

use crate::datetime::DateTime;
use crate::traits::zone::{ZoneTable, OFFSET_INCREMENT_MINUTES};

/// Zone indices fit in six bits
pub const MAX_ZONES: usize = 64;

/// Seconds per refresh slot
const REFRESH_SECONDS: i64 = OFFSET_INCREMENT_MINUTES as i64 * 60;

/// Per-zone UTC offsets in 15-minute increments
#[derive(Debug, Clone)]
pub struct TimezoneCache {
    offsets: [i8; MAX_ZONES],
    slot: Option<i64>,
}

impl Default for TimezoneCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneCache {
    /// Create a cache with every zone at UTC
    pub fn new() -> Self {
        Self {
            offsets: [0; MAX_ZONES],
            slot: None,
        }
    }

    /// Recompute every zone for the instant `utc`
    pub fn refresh(&mut self, zones: &dyn ZoneTable, utc: &DateTime) {
        let count = usize::from(zones.zone_count()).min(MAX_ZONES);
        for (zone, slot) in self.offsets.iter_mut().enumerate().take(count) {
            let minutes = zones.offset_minutes(zone as u8, utc);
            *slot = (minutes / OFFSET_INCREMENT_MINUTES) as i8;
        }
        self.slot = Some(utc.to_unix(0).div_euclid(REFRESH_SECONDS));
    }

    /// Refresh when `utc` lies in a different quarter hour than the last
    /// refresh; returns true if it did
    pub fn refresh_if_stale(&mut self, zones: &dyn ZoneTable, utc: &DateTime) -> bool {
        let slot = utc.to_unix(0).div_euclid(REFRESH_SECONDS);
        if self.slot == Some(slot) {
            return false;
        }
        self.refresh(zones, utc);
        true
    }

    /// Current offset of `zone` in seconds
    pub fn offset_seconds(&self, zone: u8) -> i32 {
        let steps = self.offsets.get(usize::from(zone)).copied().unwrap_or(0);
        i32::from(steps) * i32::from(OFFSET_INCREMENT_MINUTES) * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FixedZones;

    /// One zone that observes a summer offset from April to September
    struct Seasonal;

    impl ZoneTable for Seasonal {
        fn zone_count(&self) -> u8 {
            2
        }

        fn name(&self, zone: u8) -> &str {
            if zone == 0 {
                "UTC"
            } else {
                "CET"
            }
        }

        fn offset_minutes(&self, zone: u8, utc: &DateTime) -> i16 {
            match zone {
                0 => 0,
                _ if (4..=9).contains(&utc.month) => 120,
                _ => 60,
            }
        }
    }

    static ZONES: FixedZones = FixedZones::new(&[("UTC", 0), ("IST", 330), ("NST", -150)]);

    #[test]
    fn test_fixed_offsets() {
        let mut cache = TimezoneCache::new();
        cache.refresh(&ZONES, &DateTime::new(2024, 1, 1, 0, 0, 0));
        assert_eq!(cache.offset_seconds(0), 0);
        assert_eq!(cache.offset_seconds(1), 330 * 60);
        assert_eq!(cache.offset_seconds(2), -150 * 60);
        assert_eq!(cache.offset_seconds(40), 0);
    }

    #[test]
    fn test_refresh_once_per_quarter_hour() {
        let mut cache = TimezoneCache::new();
        assert!(cache.refresh_if_stale(&Seasonal, &DateTime::new(2024, 3, 31, 0, 0, 0)));
        assert!(!cache.refresh_if_stale(&Seasonal, &DateTime::new(2024, 3, 31, 0, 14, 59)));
        assert!(cache.refresh_if_stale(&Seasonal, &DateTime::new(2024, 3, 31, 0, 15, 0)));
    }

    #[test]
    fn test_refresh_picks_up_season_change() {
        let mut cache = TimezoneCache::new();
        cache.refresh(&Seasonal, &DateTime::new(2024, 3, 31, 23, 59, 0));
        assert_eq!(cache.offset_seconds(1), 3600);
        cache.refresh_if_stale(&Seasonal, &DateTime::new(2024, 4, 1, 0, 0, 0));
        assert_eq!(cache.offset_seconds(1), 7200);
    }
}
