//! Trained model artifacts
//!
//! An artifact is a JSON document holding either a bare model object or a
//! wrapper of the form `{"model": {...}, "feature_names": [...]}`. The model
//! object is tagged by `"type"`:
//!
//! ```json
//! {"type": "linear", "intercept": 0.12, "coefficients": [/* 14 weights */]}
//! ```

mod linear;
mod tree;

use std::path::Path;

use planting_shared::{PlantingModel, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

pub use linear::LinearModel;
pub use tree::{Aggregation, RegressionTree, TreeEnsemble};

/// Supported model kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelSpec {
    pub fn into_model(self) -> Box<dyn PlantingModel> {
        match self {
            ModelSpec::Linear(model) => Box::new(model),
            ModelSpec::TreeEnsemble(model) => Box::new(model),
        }
    }
}

/// Load a model artifact from disk
pub fn load_model(path: &Path) -> AppResult<Box<dyn PlantingModel>> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::ModelUnavailable(format!(
            "Model file '{}' not found. Please train and export the model first.",
            path.display()
        )),
        _ => AppError::ModelUnavailable(format!(
            "Error loading model '{}': {}",
            path.display(),
            e
        )),
    })?;

    let model = parse_artifact(&contents).map_err(|e| match e {
        AppError::ModelUnavailable(reason) => {
            AppError::ModelUnavailable(format!("Error loading model '{}': {}", path.display(), reason))
        }
        other => other,
    })?;

    tracing::debug!(path = %path.display(), model = %model.describe(), "Model loaded");
    Ok(model)
}

/// Decode an artifact document
pub fn parse_artifact(contents: &str) -> AppResult<Box<dyn PlantingModel>> {
    let document: Value = serde_json::from_str(contents)
        .map_err(|e| AppError::ModelUnavailable(format!("artifact is not valid JSON: {}", e)))?;

    let (spec, feature_names) = match document {
        Value::Object(mut fields) if fields.contains_key("model") => {
            let spec = fields.remove("model").unwrap_or(Value::Null);
            let names = fields.remove("feature_names");
            (spec, names)
        }
        other => (other, None),
    };

    if let Some(names) = feature_names.filter(|v| !v.is_null()) {
        check_feature_names(names)?;
    }

    let spec: ModelSpec = serde_json::from_value(spec)
        .map_err(|e| AppError::ModelUnavailable(format!("unsupported model definition: {}", e)))?;

    Ok(spec.into_model())
}

fn check_feature_names(names: Value) -> AppResult<()> {
    let names: Vec<String> = serde_json::from_value(names).map_err(|e| {
        AppError::ModelUnavailable(format!("feature_names must be a list of strings: {}", e))
    })?;

    if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
        return Err(AppError::ModelUnavailable(format!(
            "model was trained on features [{}], expected [{}]",
            names.join(", "),
            FEATURE_NAMES.join(", ")
        )));
    }
    Ok(())
}
