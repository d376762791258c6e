//! Pipeline module - orchestrates the cleaning stages

pub mod binning;
pub mod config;
pub mod dedup;
pub mod diagnostics;
pub mod encoding;
pub mod error;
pub mod impute;
pub mod loader;
pub mod normalize;
pub mod outliers;
pub mod runner;
pub mod scaling;
pub mod state;
pub mod stats;
pub mod table;

pub use binning::*;
pub use config::*;
pub use dedup::*;
pub use diagnostics::*;
pub use encoding::*;
pub use error::*;
pub use impute::*;
pub use loader::*;
pub use normalize::*;
pub use outliers::*;
pub use runner::*;
pub use scaling::*;
pub use state::*;
pub use table::ColumnKind;
