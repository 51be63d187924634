//! Maize Planting Predictor
//!
//! Reads one weather/soil observation, runs the trained planting model and
//! reports whether to plant now or how long to wait.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorPayload};
pub use service::PredictionService;
