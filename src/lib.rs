//! echemflow
//!
//! Fachada del workspace:
//! - Reexporta el catálogo, el validador y los generadores de los crates miembros.
//! - Expone `config` con la configuración cargada desde el entorno.
//! - `sample_procedure` arma el procedimiento de demostración usado por `main-core`.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod config;

pub use echem_adapters::{
    generate, import_ecdl, import_yaml, ingest_document, GenerateError, GeneratorOptions, ImportError, ImportReport,
    OutputFormat,
};
pub use echem_core::{is_valid, procedure_fingerprint, summarize_issues, validate_all, IssueSummary};
pub use echem_domain::{catalog, DomainError, ProcedureMetadata, Step, ValidationIssue};

/// Procedimiento típico de activación: purga, OCP, CV y EIS.
pub fn sample_procedure() -> Result<(ProcedureMetadata, Vec<Step>), DomainError> {
    let cat = catalog();
    let metadata = ProcedureMetadata {
        name: "Glassy carbon activation".into(),
        author: "lab".into(),
        description: "Purge, rest at OCP, activate by CV, then check impedance".into(),
        ..ProcedureMetadata::default()
    };
    let mut cv = cat.instantiate_default("cv")?.with_tag("activation");
    cv.set_param("start_V", serde_json::json!(0.05))?;
    let steps = vec![
        cat.instantiate_default("purge")?,
        cat.instantiate_default("ocp")?,
        cv,
        cat.instantiate_default("eis")?.with_tag("baseline"),
    ];
    Ok((metadata, steps))
}
