//! Domain models for the Maize Planting Predictor

mod decision;
mod features;
mod model;
mod observation;

pub use decision::*;
pub use features::*;
pub use model::*;
pub use observation::*;
