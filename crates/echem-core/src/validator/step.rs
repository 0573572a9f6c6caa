//! Validación de un step aislado: reglas de técnica + barrido genérico de
//! límites del catálogo.

use echem_domain::{catalog, ParameterKind, ParameterSpec, Step, ValidationIssue};
use serde_json::Value;

use super::rules::rules_for;

/// Código para técnica desconocida y para el barrido genérico de límites.
pub const GENERIC_CODE: &str = "PV000";

pub fn validate_step(step: &Step) -> Vec<ValidationIssue> {
    let Some(def) = catalog().lookup(step.technique()) else {
        return vec![ValidationIssue::error(GENERIC_CODE, format!("Unknown technique \"{}\"", step.technique()))];
    };

    let mut issues: Vec<ValidationIssue> = rules_for(def.id).filter_map(|rule| rule.check(step)).collect();

    // El barrido corre siempre, aunque duplique una regla con nombre.
    for (key, value) in &step.params {
        if let Some(spec) = def.parameter(key) {
            issues.extend(check_bounds(key, spec, value));
        }
    }
    issues
}

fn check_bounds(key: &str, spec: &ParameterSpec, value: &Value) -> Option<ValidationIssue> {
    let unit = spec.unit.map(|u| format!(" {u}")).unwrap_or_default();
    if spec.kind == ParameterKind::Select {
        let chosen = value.as_str()?;
        if spec.options.contains(&chosen) {
            return None;
        }
        let msg = format!("{} must be one of {} (got {chosen})", spec.label, spec.options.join(", "));
        return Some(ValidationIssue::error(GENERIC_CODE, msg).with_param(key));
    }
    let v = value.as_f64()?;
    let msg = match (spec.min, spec.max) {
        (Some(min), _) if v < min => format!("{} must be at least {min}{unit} (got {v})", spec.label),
        (_, Some(max)) if v > max => format!("{} must be at most {max}{unit} (got {v})", spec.label),
        _ => return None,
    };
    Some(ValidationIssue::error(GENERIC_CODE, msg).with_param(key))
}
