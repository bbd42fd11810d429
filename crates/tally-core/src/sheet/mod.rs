//! Sheet state and mutation logic.

mod ops;
mod state;

pub use state::Sheet;
