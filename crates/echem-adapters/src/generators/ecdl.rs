//! Export ECDL: JSON orientado a ML.
//!
//! - `protocol`: condiciones derivadas (incluida la interpretación del
//!   electrolito) y un segmento por step.
//! - `material` / `observation`: vacíos; se completan tras el experimento.
//! - `_procedure`: copia literal de metadatos y steps. Es el canal de
//!   ida y vuelta sin pérdidas, así que aquí no se sanea nada.

use echem_core::constants::ECDL_VERSION;
use echem_core::procedure_fingerprint;
use echem_domain::{ProcedureMetadata, Step};
use serde_json::{json, Map, Value};

use super::resolve;
use crate::electrolyte::parse_electrolyte;
use crate::error::GenerateError;
use crate::options::GeneratorOptions;

pub fn generate_ecdl_value(
    metadata: &ProcedureMetadata,
    steps: &[Step],
    options: &GeneratorOptions,
) -> Result<Value, GenerateError> {
    let resolved = resolve(steps)?;
    let electrolyte = parse_electrolyte(&metadata.electrolyte);

    let mut techniques: Vec<&str> = Vec::new();
    for (_, def) in &resolved {
        if !techniques.contains(&def.id) {
            techniques.push(def.id);
        }
    }

    let segments: Vec<Value> = resolved
        .iter()
        .enumerate()
        .map(|(index, (step, def))| {
            json!({
                "index": index,
                "technique": def.id,
                "category": def.category,
                "description": def.ml_description,
                "tag": step.tag.as_deref().map(|t| options.clean(t)),
            })
        })
        .collect();

    let verbatim: Vec<Value> = steps
        .iter()
        .map(|s| {
            let mut entry = Map::new();
            entry.insert("id".into(), json!(s.id));
            entry.insert("technique".into(), json!(s.technique()));
            entry.insert("params".into(), json!(s.params));
            if let Some(tag) = &s.tag {
                entry.insert("tag".into(), json!(tag));
            }
            Value::Object(entry)
        })
        .collect();

    Ok(json!({
        "ecdl_version": ECDL_VERSION,
        "protocol": {
            "name": options.clean(&metadata.name),
            "techniques": techniques,
            "step_count": steps.len(),
            "conditions": {
                "temperature_C": metadata.temperature_c,
                "electrode_count": metadata.electrode_count,
                "reference_electrode": options.clean(&metadata.reference_electrode),
                "working_electrode": options.clean(&metadata.working_electrode),
                "counter_electrode": options.clean(&metadata.counter_electrode),
                "electrolyte": {
                    "raw": options.clean(&metadata.electrolyte),
                    "type": electrolyte.solute,
                    "concentration_M": electrolyte.concentration_m,
                    "unit": electrolyte.unit,
                    "regime": electrolyte.regime,
                },
            },
            "segments": segments,
        },
        "material": {},
        "observation": {},
        "_procedure": {
            "metadata": metadata,
            "steps": verbatim,
            "fingerprint": procedure_fingerprint(metadata, steps),
        },
    }))
}

pub fn generate_ecdl(metadata: &ProcedureMetadata, steps: &[Step]) -> Result<String, GenerateError> {
    generate_ecdl_with(metadata, steps, &GeneratorOptions::default())
}

pub fn generate_ecdl_with(
    metadata: &ProcedureMetadata,
    steps: &[Step],
    options: &GeneratorOptions,
) -> Result<String, GenerateError> {
    Ok(serde_json::to_string_pretty(&generate_ecdl_value(metadata, steps, options)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn electrolyte_conditions_are_inferred() {
        let meta = ProcedureMetadata { electrolyte: "0.1 M HClO4".into(), ..Default::default() };
        let v = generate_ecdl_value(&meta, &[], &GeneratorOptions::default()).unwrap();
        let e = &v["protocol"]["conditions"]["electrolyte"];
        assert_eq!(e["type"], "HClO4");
        assert_eq!(e["concentration_M"], 0.1);
        assert_eq!(e["regime"], "acidic");
    }

    #[test]
    fn techniques_are_listed_once_in_first_use_order() {
        let steps: Vec<Step> = ["purge", "cv", "eis", "cv"].iter().map(|t| Step::new_default(t).unwrap()).collect();
        let v = generate_ecdl_value(&ProcedureMetadata::default(), &steps, &GeneratorOptions::default()).unwrap();
        assert_eq!(v["protocol"]["techniques"], json!(["purge", "cv", "eis"]));
        assert_eq!(v["protocol"]["segments"][3]["category"], "voltammetry");
        assert_eq!(v["protocol"]["step_count"], 4);
    }

    #[test]
    fn unknown_technique_fails_fast() {
        let steps = vec![Step::new_default("ocp").unwrap(), Step::from_parts("bogus", Default::default(), None)];
        let err = generate_ecdl(&ProcedureMetadata::default(), &steps).unwrap_err();
        assert!(matches!(err, GenerateError::UnknownTechnique { index: 1, .. }));
    }
}
