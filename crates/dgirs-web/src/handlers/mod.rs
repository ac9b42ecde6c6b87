//! HTTP handlers for all web routes.

pub mod dashboard;
pub mod genes;
pub mod selection;
pub mod system;
