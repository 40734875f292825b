//! Read-only lookup service over pathogen "shared behavior" tables.
//!
//! Tables are loaded once per category at startup ([`Catalog::load`]) and
//! served through two endpoints: the sorted distinct pathogen names of a
//! category, and the full record of one named pathogen.

pub mod api;
pub mod catalog;
pub mod config;
pub mod data;
pub mod error;

pub use catalog::Catalog;
pub use config::Config;
pub use data::category::Category;
pub use error::QueryError;
