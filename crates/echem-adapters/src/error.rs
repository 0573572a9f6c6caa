//! Errores de generación e importación.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Un step cuya técnica no existe en el catálogo: se falla en vez de
    /// emitir salida malformada.
    #[error("step {index}: unknown technique \"{technique}\"")]
    UnknownTechnique { index: usize, technique: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("text formatting error")]
    Format(#[from] std::fmt::Error),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected document shape: {0}")]
    Shape(String),
}
