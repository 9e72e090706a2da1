//! Canonical flight schema
//!
//! The repository's historical extracts went through several column-set
//! revisions; everything downstream of ingestion speaks this single
//! versioned schema. Ingestion tolerates wider rows (extra BTS columns are
//! ignored) but produces exactly these columns.

/// Version of the canonical flight schema.
pub const SCHEMA_VERSION: u32 = 1;

/// Numeric feature columns, in encoding order.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "month",
    "day_of_week",
    "crs_dep_time",
    "crs_arr_time",
    "crs_elapsed_time",
    "distance",
];

/// Categorical feature columns, in encoding order.
pub const CATEGORICAL_COLUMNS: [&str; 4] = ["unique_carrier", "origin", "dest", "dep_time_blk"];

/// The binary delay label: 1 when the flight arrived more than 15 minutes
/// late.
pub const LABEL_COLUMN: &str = "arr_del15";

/// The fixed enumeration of scheduled-departure hour blocks.
///
/// Carrier extracts bucket `crs_dep_time` into these nineteen strings; the
/// first block spans the early-morning hours where traffic is too thin for
/// hourly buckets.
pub const DEP_TIME_BLOCKS: [&str; 19] = [
    "0001-0559",
    "0600-0659",
    "0700-0759",
    "0800-0859",
    "0900-0959",
    "1000-1059",
    "1100-1159",
    "1200-1259",
    "1300-1359",
    "1400-1459",
    "1500-1559",
    "1600-1659",
    "1700-1759",
    "1800-1859",
    "1900-1959",
    "2000-2059",
    "2100-2159",
    "2200-2259",
    "2300-2359",
];

/// Whether `value` is one of the known departure time blocks.
#[must_use]
pub fn is_dep_time_block(value: &str) -> bool {
    DEP_TIME_BLOCKS.contains(&value)
}
