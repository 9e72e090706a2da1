//! Flight records, historical data access, and training-sample selection
//!
//! This crate owns the data side of the delay-prediction pipeline:
//!
//! 1. **Canonical schema** ([`schema`]): the column set every other crate
//!    refers to by name, plus the fixed departure time-block enumeration
//! 2. **Records** ([`record::FlightRecord`]): one scheduled flight leg with
//!    an optional delay label
//! 3. **Columnar frames** ([`frame::Frame`]): the tabular view the feature
//!    encoder consumes, for full training sets and single inference rows
//!    alike
//! 4. **Historical sources** ([`source`]): the query boundary to the
//!    relational store, with a CSV-backed implementation for carrier
//!    extracts
//! 5. **Sampling** ([`sample::StratifiedSampler`]): the class-stratified,
//!    seeded subset draw every training run starts from
//!
//! The relational store itself (schema definitions, persistence engine) is a
//! collaborator; only the row shape it yields is fixed here.

pub mod frame;
pub mod record;
pub mod sample;
pub mod schema;
pub mod source;
