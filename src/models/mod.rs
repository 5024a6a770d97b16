//! Database models and request DTOs.

pub mod filters;
pub mod incident;
pub mod pagination;
pub mod severity;
