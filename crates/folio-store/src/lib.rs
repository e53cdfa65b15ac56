//! Disk-facing side of the folio engine: catalog data (JSON) and engine
//! configuration (TOML). Everything here validates and hands back
//! `folio-core` types; no UI state lives in this crate.

pub mod config;
pub mod data;
pub mod error;

pub use config::EngineConfig;
pub use data::{load_catalog, parse_catalog, validate};
pub use error::{Result, StoreError};
