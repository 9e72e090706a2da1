//! Flight record types

use serde::{Deserialize, Serialize};

/// One scheduled flight leg in the canonical schema.
///
/// Historical records carry the delay label; inference requests arrive
/// without it. Times are scheduled ("CRS") values known before departure,
/// in HHMM form for the clock fields and minutes for the elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Calendar month, 1-12.
    pub month: u8,
    /// ISO-style day of week, 1 (Monday) through 7 (Sunday).
    pub day_of_week: u8,
    /// Scheduled departure clock time as an HHMM integer in [0, 2359].
    pub crs_dep_time: u16,
    /// Scheduled arrival clock time as an HHMM integer in [0, 2359].
    pub crs_arr_time: u16,
    /// Scheduled block time in minutes.
    pub crs_elapsed_time: u16,
    /// Great-circle distance in miles.
    pub distance: f64,
    /// Operating carrier code (e.g. "AA").
    pub unique_carrier: String,
    /// Origin airport code (e.g. "JFK").
    pub origin: String,
    /// Destination airport code (e.g. "LAX").
    pub dest: String,
    /// Scheduled-departure hour block, one of
    /// [`schema::DEP_TIME_BLOCKS`](crate::schema::DEP_TIME_BLOCKS).
    pub dep_time_blk: String,
    /// Delay label: `Some(1)` for arrivals more than 15 minutes late,
    /// `Some(0)` otherwise, `None` when unknown (inference requests, or
    /// historical rows whose label failed to parse).
    pub arr_del15: Option<u8>,
}

impl FlightRecord {
    /// Whether this record carries a usable training label.
    #[must_use]
    pub fn is_labeled(&self) -> bool {
        matches!(self.arr_del15, Some(0 | 1))
    }

    /// The label as a binary value, if present.
    #[must_use]
    pub fn label(&self) -> Option<u8> {
        match self.arr_del15 {
            Some(v @ (0 | 1)) => Some(v),
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::jfk_lax;

    #[test]
    fn labeled_record_exposes_label() {
        assert_eq!(jfk_lax(Some(1)).label(), Some(1));
        assert_eq!(jfk_lax(Some(0)).label(), Some(0));
        assert!(jfk_lax(Some(1)).is_labeled());
    }

    #[test]
    fn unlabeled_record_has_no_label() {
        assert_eq!(jfk_lax(None).label(), None);
        assert!(!jfk_lax(None).is_labeled());
    }

    #[test]
    fn out_of_range_label_is_not_usable() {
        assert_eq!(jfk_lax(Some(3)).label(), None);
        assert!(!jfk_lax(Some(3)).is_labeled());
    }
}
