//! Representación intermedia normalizada a SI.
//!
//! Cada parámetro pasa por `units::to_si`; las claves no-SI desaparecen. El
//! procedimiento se emite como un único segmento.

use echem_core::constants::IR_VERSION;
use echem_domain::{ProcedureMetadata, Step};
use serde_json::{json, Map, Value};

use super::resolve;
use crate::error::GenerateError;
use crate::options::GeneratorOptions;
use crate::units::{number_value, to_si};

const KELVIN_OFFSET: f64 = 273.15;

pub fn generate_ir_value(
    metadata: &ProcedureMetadata,
    steps: &[Step],
    options: &GeneratorOptions,
) -> Result<Value, GenerateError> {
    let resolved = resolve(steps)?;

    let ir_steps: Vec<Value> = resolved
        .iter()
        .map(|(step, def)| {
            let params: Map<String, Value> = step.params.iter().map(|(k, v)| to_si(k, v)).collect();
            let mut entry = Map::new();
            entry.insert("technique".into(), json!(def.id));
            entry.insert("category".into(), json!(def.category));
            entry.insert("params".into(), Value::Object(params));
            if let Some(tag) = &step.tag {
                entry.insert("tag".into(), json!(options.clean(tag)));
            }
            Value::Object(entry)
        })
        .collect();

    Ok(json!({
        "faraday_version": IR_VERSION,
        "procedure": [
            { "segment": options.ir_segment, "steps": ir_steps }
        ],
        "system": {
            "electrode_count": metadata.electrode_count,
            "reference_electrode": options.clean(&metadata.reference_electrode),
            "working_electrode": options.clean(&metadata.working_electrode),
            "counter_electrode": options.clean(&metadata.counter_electrode),
            "electrolyte": options.clean(&metadata.electrolyte),
            "temperature_K": number_value(((metadata.temperature_c + KELVIN_OFFSET) * 100.0).round() / 100.0),
        },
        "metadata": {
            "name": options.clean(&metadata.name),
            "author": options.clean(&metadata.author),
            "description": options.clean(&metadata.description),
        },
    }))
}

pub fn generate_ir(metadata: &ProcedureMetadata, steps: &[Step]) -> Result<String, GenerateError> {
    generate_ir_with(metadata, steps, &GeneratorOptions::default())
}

pub fn generate_ir_with(
    metadata: &ProcedureMetadata,
    steps: &[Step],
    options: &GeneratorOptions,
) -> Result<String, GenerateError> {
    Ok(serde_json::to_string_pretty(&generate_ir_value(metadata, steps, options)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_is_reported_in_kelvin() {
        let v = generate_ir_value(&ProcedureMetadata::default(), &[], &GeneratorOptions::default()).unwrap();
        assert_eq!(v["system"]["temperature_K"], 298.15);
        assert_eq!(v["procedure"][0]["segment"], "main");
        assert_eq!(v["procedure"][0]["steps"], json!([]));
    }

    #[test]
    fn dpv_pulse_timing_converts_to_seconds() {
        let dpv = Step::new_default("dpv").unwrap();
        let v = generate_ir_value(&ProcedureMetadata::default(), &[dpv], &GeneratorOptions::default()).unwrap();
        let params = &v["procedure"][0]["steps"][0]["params"];
        assert_eq!(params["pulse_width_s"], 0.05);
        assert_eq!(params["pulse_amplitude_V"], 0.05);
        assert!(params.get("period_ms").is_none());
        assert!(params["start_V"].is_null());
    }
}
