//! Inclusion cutoff on the record date.

use std::fmt::{self, Display};

use log;

use crate::entry::Record;

/// Keeps records dated in or after `year`-`month`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Cutoff {
    pub year: i32,
    pub month: u32,
}

impl Default for Cutoff {
    fn default() -> Cutoff {
        Cutoff {
            year: 2024,
            month: 3,
        }
    }
}

impl Cutoff {
    pub fn new(year: i32, month: u32) -> Cutoff {
        Cutoff { year, month }
    }

    #[inline]
    pub fn includes(&self, year: i32, month: u32) -> bool {
        year > self.year || (year == self.year && month >= self.month)
    }

    /// Drop every record dated before the cutoff.
    ///
    /// Dropped records are not diagnosed one by one; historical rows are
    /// routine input, only the total is logged.
    pub fn retain(&self, mut records: Vec<Record>) -> Vec<Record> {
        let before = records.len();

        records.retain(|record| self.includes(record.year, record.month));

        log::debug!(
            "Cutoff {} kept {} of {} records.",
            self,
            records.len(),
            before
        );

        records
    }
}

impl Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, month: u32) -> Record {
        Record::new("A", year, month, [0.0; 6])
    }

    #[test]
    fn test_cutoff_boundary() {
        let cutoff = Cutoff::default();

        assert!(cutoff.includes(2024, 3));
        assert!(cutoff.includes(2024, 12));
        assert!(cutoff.includes(2025, 1));
        assert!(!cutoff.includes(2024, 2));
        assert!(!cutoff.includes(2023, 12));
    }

    #[test]
    fn test_retain_keeps_order() {
        let records = vec![
            record(2024, 3),
            record(2024, 2),
            record(2023, 12),
            record(2026, 1),
            record(2024, 4),
        ];

        let kept = Cutoff::default().retain(records);

        let dates: Vec<_> = kept.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(dates, vec![(2024, 3), (2026, 1), (2024, 4)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cutoff::default().to_string(), "2024-03");
        assert_eq!(Cutoff::new(999, 11).to_string(), "0999-11");
    }
}
