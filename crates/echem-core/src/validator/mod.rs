//! Motor de validación.
//!
//! Dos entradas: `validate_step` (reglas de técnica + límites del catálogo) y
//! `validate_procedure` (reglas de secuencia). Ambas son funciones puras que
//! devuelven issues como datos; nunca fallan por valores a medio editar.

pub mod procedure;
pub mod rules;
pub mod step;
pub mod summary;

use echem_domain::{ProcedureMetadata, Step, ValidationIssue};

pub use procedure::validate_procedure;
pub use rules::{ParamRule, Trigger, PARAM_RULES};
pub use step::validate_step;
pub use summary::{summarize_issues, IssueSummary};

/// Issues de cada step (etiquetados con su índice) seguidos de los issues
/// de procedimiento. El orden es determinista.
pub fn validate_all(steps: &[Step], metadata: &ProcedureMetadata) -> Vec<ValidationIssue> {
    let mut issues: Vec<ValidationIssue> = steps
        .iter()
        .enumerate()
        .flat_map(|(i, s)| validate_step(s).into_iter().map(move |issue| issue.at_step(i)))
        .collect();
    issues.extend(validate_procedure(steps, metadata));
    log::debug!("validated {} steps: {} issues", steps.len(), issues.len());
    issues
}

/// `true` si no hay ningún issue de nivel error. Los warnings no cuentan.
pub fn is_valid(steps: &[Step], metadata: &ProcedureMetadata) -> bool {
    !validate_all(steps, metadata).iter().any(ValidationIssue::is_error)
}
