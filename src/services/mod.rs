//! Business logic services.

pub mod actions;
pub mod aggregation;
pub mod body_part;
pub mod charts;
pub mod dashboard;
pub mod filter;
pub mod import;
pub mod incidents;
pub mod safety_record;
