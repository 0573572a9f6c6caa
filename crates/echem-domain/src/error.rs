use thiserror::Error;

/// Errores del dominio de protocolos electroquímicos.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// El id de técnica no existe en el catálogo.
    #[error("unknown technique: {0}")]
    UnknownTechnique(String),
    #[error("{0}")]
    Validation(String),
}
