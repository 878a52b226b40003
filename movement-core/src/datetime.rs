//! Calendar date and time
//!
//! The RTC works in a packed 32-bit register form:
//!
//! ```text
//!  31      26 25   22 21   17 16   12 11      6 5       0
//! ┌──────────┬───────┬───────┬───────┬─────────┬─────────┐
//! │ year-2020│ month │  day  │ hour  │ minute  │ second  │
//! └──────────┴───────┴───────┴───────┴─────────┴─────────┘
//! ```
//!
//! Because the most significant fields come first, comparing two registers
//! as integers orders them chronologically, and shifting both right by the
//! width of the low fields compares "same minute" or "same day".

/// Year stored as zero in the packed register
pub const REFERENCE_YEAR: u16 = 2020;

/// Latest year the 6-bit year field can hold
pub const MAX_YEAR: u16 = REFERENCE_YEAR + 63;

/// Date the clock is set to when the RTC has never been configured
pub const FIRST_BOOT_DATE: DateTime = DateTime {
    year: 2024,
    month: 1,
    day: 1,
    hour: 0,
    minute: 0,
    second: 0,
};

const MINUTE_SHIFT: u32 = 6;
const DAY_SHIFT: u32 = 17;

/// Two-letter weekday names, Monday first
pub const WEEKDAY_SHORT: [&str; 7] = ["MO", "TU", "WE", "TH", "FR", "SA", "SU"];

/// Three-letter weekday names, Monday first
pub const WEEKDAY_LONG: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// A calendar date and wall-clock time
///
/// Field order matches significance so the derived ordering is
/// chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Check whether `year` is a Gregorian leap year
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`
pub fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a civil date
fn days_from_civil(year: i32, month: u32, day: u32) -> i32 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = (y - era * 400) as u32;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day.saturating_sub(1);
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe as i32 - 719_468
}

/// Civil date for a count of days since 1970-01-01
fn civil_from_days(days: i32) -> (i32, u8, u8) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = (z - era * 146_097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe as i32 + era * 400 + i32::from(month <= 2);
    (year, month, day)
}

impl DateTime {
    /// Create a date-time from its fields
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Unpack an RTC register value
    pub fn from_reg(reg: u32) -> Self {
        Self {
            second: (reg & 0x3F) as u8,
            minute: ((reg >> 6) & 0x3F) as u8,
            hour: ((reg >> 12) & 0x1F) as u8,
            day: ((reg >> 17) & 0x1F) as u8,
            month: ((reg >> 22) & 0x0F) as u8,
            year: REFERENCE_YEAR + ((reg >> 26) & 0x3F) as u16,
        }
    }

    /// Pack into an RTC register value
    ///
    /// Years outside the representable range saturate.
    pub fn to_reg(&self) -> u32 {
        let year = self.year.clamp(REFERENCE_YEAR, MAX_YEAR) - REFERENCE_YEAR;
        (u32::from(self.second) & 0x3F)
            | (u32::from(self.minute) & 0x3F) << 6
            | (u32::from(self.hour) & 0x1F) << 12
            | (u32::from(self.day) & 0x1F) << 17
            | (u32::from(self.month) & 0x0F) << 22
            | u32::from(year) << 26
    }

    /// True when the RTC has never been set (month field zero)
    pub fn is_unset(&self) -> bool {
        self.month == 0
    }

    /// True when both values fall in the same minute
    pub fn same_minute(&self, other: &DateTime) -> bool {
        self.to_reg() >> MINUTE_SHIFT == other.to_reg() >> MINUTE_SHIFT
    }

    /// True when both values fall on the same day
    pub fn same_day(&self, other: &DateTime) -> bool {
        self.to_reg() >> DAY_SHIFT == other.to_reg() >> DAY_SHIFT
    }

    /// Check that every field is within its calendar range
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.month, self.year)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    /// Day of the week, 0 = Monday through 6 = Sunday
    pub fn weekday(&self) -> u8 {
        let days = days_from_civil(i32::from(self.year), u32::from(self.month), u32::from(self.day));
        // 1970-01-01 was a Thursday
        (days + 3).rem_euclid(7) as u8
    }

    /// Julian day number of the date part
    pub fn julian_day(&self) -> i32 {
        days_from_civil(i32::from(self.year), u32::from(self.month), u32::from(self.day)) + 2_440_588
    }

    /// Convert to Unix seconds, treating `self` as local time at `utc_offset_s`
    pub fn to_unix(&self, utc_offset_s: i32) -> i64 {
        let days = days_from_civil(i32::from(self.year), u32::from(self.month), u32::from(self.day));
        i64::from(days) * 86_400
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
            - i64::from(utc_offset_s)
    }

    /// Build the local date-time for Unix seconds at `utc_offset_s`
    pub fn from_unix(timestamp: i64, utc_offset_s: i32) -> Self {
        let local = timestamp + i64::from(utc_offset_s);
        let days = local.div_euclid(86_400);
        let secs = local.rem_euclid(86_400) as u32;
        let (year, month, day) = civil_from_days(days as i32);
        Self {
            year: year.clamp(0, i32::from(u16::MAX)) as u16,
            month,
            day,
            hour: (secs / 3600) as u8,
            minute: ((secs / 60) % 60) as u8,
            second: (secs % 60) as u8,
        }
    }

    /// Shift by a number of seconds (negative moves backwards)
    pub fn add_seconds(&self, seconds: i64) -> Self {
        Self::from_unix(self.to_unix(0) + seconds, 0)
    }

    /// Hour on a 12-hour dial (1-12)
    pub fn hour_12(&self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }

    /// True from noon to midnight
    pub fn is_pm(&self) -> bool {
        self.hour >= 12
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reg_round_trip_known_value() {
        let dt = DateTime::new(2024, 3, 15, 13, 45, 30);
        let reg = dt.to_reg();
        assert_eq!(reg & 0x3F, 30);
        assert_eq!((reg >> 26) & 0x3F, 4);
        assert_eq!(DateTime::from_reg(reg), dt);
    }

    #[test]
    fn test_unset_register() {
        assert!(DateTime::from_reg(0).is_unset());
        assert!(!FIRST_BOOT_DATE.is_unset());
    }

    #[test]
    fn test_same_minute_and_day() {
        let a = DateTime::new(2024, 5, 1, 10, 20, 0);
        let b = DateTime::new(2024, 5, 1, 10, 20, 59);
        let c = DateTime::new(2024, 5, 1, 10, 21, 0);
        assert!(a.same_minute(&b));
        assert!(!a.same_minute(&c));
        assert!(a.same_day(&c));
        assert!(!a.same_day(&DateTime::new(2024, 5, 2, 10, 20, 0)));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2, 2024), 29);
        assert_eq!(days_in_month(2, 2023), 28);
        assert_eq!(days_in_month(2, 2100), 28);
        assert_eq!(days_in_month(2, 2000), 29);
        assert_eq!(days_in_month(4, 2023), 30);
        assert_eq!(days_in_month(12, 2023), 31);
    }

    #[test]
    fn test_weekday() {
        // 2024-01-01 was a Monday
        assert_eq!(FIRST_BOOT_DATE.weekday(), 0);
        assert_eq!(DateTime::new(2024, 1, 7, 0, 0, 0).weekday(), 6);
        assert_eq!(DateTime::new(1970, 1, 1, 0, 0, 0).weekday(), 3);
    }

    #[test]
    fn test_unix_epoch() {
        assert_eq!(DateTime::new(1970, 1, 1, 0, 0, 0).to_unix(0), 0);
        assert_eq!(FIRST_BOOT_DATE.to_unix(0), 1_704_067_200);
        assert_eq!(DateTime::from_unix(1_704_067_200, 0), FIRST_BOOT_DATE);
    }

    #[test]
    fn test_unix_with_offset() {
        // 00:30 local at UTC+1 is 23:30 UTC the day before
        let local = DateTime::new(2024, 1, 1, 0, 30, 0);
        let ts = local.to_unix(3600);
        assert_eq!(DateTime::from_unix(ts, 0), DateTime::new(2023, 12, 31, 23, 30, 0));
        assert_eq!(DateTime::from_unix(ts, 3600), local);
    }

    #[test]
    fn test_julian_day() {
        assert_eq!(DateTime::new(2000, 1, 1, 12, 0, 0).julian_day(), 2_451_545);
    }

    #[test]
    fn test_hour_12() {
        assert_eq!(DateTime::new(2024, 1, 1, 0, 0, 0).hour_12(), 12);
        assert_eq!(DateTime::new(2024, 1, 1, 13, 0, 0).hour_12(), 1);
        assert!(DateTime::new(2024, 1, 1, 12, 0, 0).is_pm());
    }

    proptest! {
        #[test]
        fn test_reg_order_is_chronological(a in 0u32..u32::MAX, b in 0u32..u32::MAX) {
            let da = DateTime::from_reg(a);
            let db = DateTime::from_reg(b);
            prop_assert_eq!(a.cmp(&b), da.cmp(&db));
        }

        #[test]
        fn test_unix_round_trip(ts in 0i64..4_000_000_000i64, offset in -50_400i32..50_400i32) {
            let dt = DateTime::from_unix(ts, offset);
            prop_assert!(dt.is_valid());
            prop_assert_eq!(dt.to_unix(offset), ts);
        }
    }
}
