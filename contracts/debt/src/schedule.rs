//! Fixed interval lengths for each schedule tag, in ledger seconds.

use crate::types::{LedgerError, Schedule};

pub const HOUR: u64 = 3_600;
pub const DAY: u64 = 24 * HOUR;
pub const WEEK: u64 = 7 * DAY;
pub const MONTH: u64 = 30 * DAY;
pub const YEAR: u64 = 365 * DAY;

impl Schedule {
    /// Decode a schedule tag received across the contract boundary.
    pub fn from_tag(tag: u32) -> Result<Schedule, LedgerError> {
        match tag {
            0 => Ok(Schedule::Hourly),
            1 => Ok(Schedule::Daily),
            2 => Ok(Schedule::Weekly),
            3 => Ok(Schedule::Fortnightly),
            4 => Ok(Schedule::Monthly),
            5 => Ok(Schedule::Quadannually),
            6 => Ok(Schedule::Triannually),
            7 => Ok(Schedule::Biannually),
            8 => Ok(Schedule::Annually),
            9 => Ok(Schedule::Biennially),
            10 => Ok(Schedule::Triennially),
            11 => Ok(Schedule::Quadrennially),
            _ => Err(LedgerError::InvalidSchedule),
        }
    }

    pub fn interval(self) -> u64 {
        match self {
            Schedule::Hourly => HOUR,
            Schedule::Daily => DAY,
            Schedule::Weekly => WEEK,
            Schedule::Fortnightly => 2 * WEEK,
            Schedule::Monthly => MONTH,
            Schedule::Quadannually => 3 * MONTH,
            Schedule::Triannually => 4 * MONTH,
            Schedule::Biannually => 6 * MONTH,
            Schedule::Annually => YEAR,
            Schedule::Biennially => 2 * YEAR,
            Schedule::Triennially => 3 * YEAR,
            Schedule::Quadrennially => 4 * YEAR,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_schedules() {
        assert_eq!(Schedule::Daily.interval(), 86_400);
        assert_eq!(Schedule::Monthly.interval(), 2_592_000);
    }

    #[test]
    fn test_every_tag_decodes_and_maps() {
        let mut previous = 0;
        for tag in 0..=11_u32 {
            let schedule = Schedule::from_tag(tag).unwrap();
            // Tags are ordered from shortest to longest cadence.
            assert!(schedule.interval() > previous);
            previous = schedule.interval();
        }
    }

    #[test]
    fn test_multi_month_and_year_intervals() {
        assert_eq!(Schedule::Fortnightly.interval(), 14 * DAY);
        assert_eq!(Schedule::Quadannually.interval(), 90 * DAY);
        assert_eq!(Schedule::Triannually.interval(), 120 * DAY);
        assert_eq!(Schedule::Biannually.interval(), 180 * DAY);
        assert_eq!(Schedule::Annually.interval(), YEAR);
        assert_eq!(Schedule::Quadrennially.interval(), 4 * YEAR);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert_eq!(Schedule::from_tag(12), Err(LedgerError::InvalidSchedule));
        assert_eq!(Schedule::from_tag(u32::MAX), Err(LedgerError::InvalidSchedule));
    }
}
