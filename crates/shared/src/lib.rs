//! Catalog domain types shared by the data source, the core and the driver.

pub mod domain;
pub mod error;
