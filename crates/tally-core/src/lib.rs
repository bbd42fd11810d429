//! tally-core - Sheet model and change propagation.

pub mod error;
pub mod sheet;

pub use error::{Result, TallyError};
pub use sheet::Sheet;

pub use tally_engine::engine::{CellRef, Dimensions};
