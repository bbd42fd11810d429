//! tally_engine - Pure spreadsheet core: addressing, formulas, dependencies.

pub mod engine;
