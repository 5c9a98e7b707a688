//! # matprop
//!
//! Turns loosely structured material-property files into one normalized
//! record per material:
//!
//! | Extension | Content | Record |
//! |-----------|---------|--------|
//! | `.txt`, `.nk` | `wavelength n k` rows | [`OpticalEntry`](data::model::OpticalEntry) |
//! | `.dat` | `[section]` / `key = value` simulator parameters | [`ElectricalEntry`](data::model::ElectricalEntry) |
//! | `.csv` | header row + measurement rows | [`ElectricalEntry`](data::model::ElectricalEntry) |
//!
//! Parsing, derivation and resampling are pure per-file transforms; callers
//! may run [`pipeline::process_file`] on many files in parallel. Progress is
//! reported through the `log` facade and is silent unless a logger is installed.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;

pub use config::PipelineConfig;
pub use data::model::Entry;
pub use error::IngestError;
pub use pipeline::process_file;
