//! Route definitions for the Incident Atlas API.

pub mod dashboard;
pub mod health;
pub mod incidents;
pub mod safety;
