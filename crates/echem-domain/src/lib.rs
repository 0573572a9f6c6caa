//! echem-domain: modelo de datos de protocolos electroquímicos.
//!
//! - `catalog`: registro estático de técnicas y su esquema de parámetros.
//! - `step` / `metadata`: lo que el editor externo construye y edita.
//! - `issue`: issues de validación tipados.
//! - `keys`: reglas de clave corta compartidas por generadores e importación.
pub mod catalog;
pub mod error;
pub mod issue;
pub mod keys;
pub mod metadata;
pub mod parameter;
pub mod step;

pub use catalog::{catalog, Catalog, Category, TechniqueDefinition};
pub use error::DomainError;
pub use issue::{IssueLevel, ValidationIssue};
pub use metadata::ProcedureMetadata;
pub use parameter::{ParameterKind, ParameterSpec};
pub use step::Step;
