//! Domain-level utilities

pub mod cell_date;
pub mod currency;
