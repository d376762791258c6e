//! Report module - summarizing cleaning results

pub mod correlation;
pub mod diagnostics;
pub mod fitted_export;
pub mod summary;

pub use correlation::*;
pub use diagnostics::*;
pub use fitted_export::*;
pub use summary::*;
