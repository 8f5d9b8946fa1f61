//! Data layer: core types, file readers, and folder-name parsing.
//!
//! Architecture:
//! ```text
//!  tape7      SRF .txt     case folder name      results .csv
//!    │           │               │                    │
//!    ▼           ▼               ▼                    ▼
//!   ┌──────────────┐        ┌────────┐          ┌──────────┐
//!   │    loader     │        │  case  │          │  loader   │
//!   └──────────────┘        └────────┘          └──────────┘
//!    │           │               │                    │
//!    ▼           ▼               ▼                    ▼
//!  Spectrum   Spectrum        CaseName          RadianceTable
//! ```

pub mod case;
pub mod loader;
pub mod model;
