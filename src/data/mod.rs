//! Data layer: record types, loading, derivation and resampling.
//!
//! Architecture:
//! ```text
//!  .txt/.nk     .dat        .csv
//!     │           │           │
//!     ▼           ▼           ▼
//!   ┌────────┐  ┌─────────────────┐
//!   │ loader │  │   electrical    │  parse file → Entry with one dataset
//!   └────────┘  └─────────────────┘
//!     │                 │
//!     ▼                 ▼
//!   ┌──────────┐    ┌────────┐
//!   │ resample │    │ derive │      fill derived fields, promote scalars
//!   └──────────┘    └────────┘
//!     │                 │
//!     └──── filter ─────┘           first structurally valid dataset wins
//! ```

pub mod derive;
pub mod electrical;
pub mod filter;
pub mod interp;
pub mod loader;
pub mod model;
pub mod resample;
