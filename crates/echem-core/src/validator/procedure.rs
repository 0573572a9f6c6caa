//! Reglas a nivel de secuencia. Dependen del orden de los steps.

use echem_domain::{ProcedureMetadata, Step, ValidationIssue};

const MEASUREMENT: &[&str] = &["lsv", "cv", "eis"];
const CONDITIONING: &[&str] = &["cv", "purge", "ocp"];

fn is_any(step: &Step, set: &[&str]) -> bool {
    set.contains(&step.technique())
}

fn has(steps: &[Step], technique: &str) -> bool {
    steps.iter().any(|s| s.technique() == technique)
}

pub fn validate_procedure(steps: &[Step], metadata: &ProcedureMetadata) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !matches!(metadata.electrode_count, 2 | 3) {
        issues.push(ValidationIssue::error(
            "PV012",
            format!("Electrode count must be 2 or 3 (got {})", metadata.electrode_count),
        ));
    }

    // DR006: la primera medición debería ir precedida de acondicionamiento.
    if let Some(first) = steps.iter().position(|s| is_any(s, MEASUREMENT)) {
        if first > 0 && !steps[..first].iter().any(|s| is_any(s, CONDITIONING)) {
            issues.push(
                ValidationIssue::warning(
                    "DR006",
                    "Consider conditioning (CV, purge or OCP) before the first measurement",
                )
                .at_step(first),
            );
        }
    }

    // DR007 también lo usa la regla por-step de purga corta; se conservan ambos.
    if let Some(lsv) = steps.iter().position(|s| s.technique() == "lsv") {
        if !has(steps, "purge") {
            issues.push(
                ValidationIssue::warning("DR007", "LSV without a purge step; control the atmosphere before sweeping")
                    .at_step(lsv),
            );
        }
    }

    if let Some(comp) = steps.iter().position(|s| s.param_bool("ir_compensation")) {
        if !has(steps, "eis") {
            issues.push(
                ValidationIssue::warning(
                    "DR008",
                    "iR compensation is enabled but no EIS step provides the uncompensated resistance",
                )
                .with_param("ir_compensation")
                .at_step(comp),
            );
        }
    }

    issues
}
