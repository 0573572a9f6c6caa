//! Fingerprint determinista de un procedimiento.
//!
//! Incluye metadatos y, por step, técnica + parámetros + tag. Los ids de step
//! quedan fuera: dos procedimientos iguales editados en sesiones distintas
//! comparten fingerprint.

use echem_domain::{ProcedureMetadata, Step};
use serde_json::{json, Value};

use super::hash::hash_value;
use crate::constants::FINGERPRINT_SCHEMA;

pub fn fingerprint_input(metadata: &ProcedureMetadata, steps: &[Step]) -> Value {
    let steps: Vec<Value> = steps
        .iter()
        .map(|s| json!({ "technique": s.technique(), "params": s.params, "tag": s.tag }))
        .collect();
    json!({
        "schema": FINGERPRINT_SCHEMA,
        "metadata": metadata,
        "steps": steps,
    })
}

pub fn procedure_fingerprint(metadata: &ProcedureMetadata, steps: &[Step]) -> String {
    hash_value(&fingerprint_input(metadata, steps))
}
