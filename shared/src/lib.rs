//! Shared types and models for the Maize Planting Predictor
//!
//! This crate holds the pure domain logic: turning an observation snapshot
//! into the model's feature vector, and turning the model's output into a
//! planting decision. It performs no I/O.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
