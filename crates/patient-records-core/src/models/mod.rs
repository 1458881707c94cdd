//! Domain models for patient records.

mod metrics;
mod patient;
mod record;
mod update;
mod validation;

pub use metrics::*;
pub use patient::*;
pub use record::*;
pub use update::*;
pub use validation::*;
