//! Script estilo SDK: docstring, import, `Procedure(...)`, `.system(...)` y
//! una llamada `p.<técnica>(clave=valor, ..., tag="...")` por step.

use std::fmt::{self, Write};

use echem_domain::{ProcedureMetadata, Step, TechniqueDefinition};
use serde_json::Value;

use super::{resolve, short_params};
use crate::error::GenerateError;
use crate::escape::escape_python;
use crate::options::GeneratorOptions;
use crate::units::number_value;

fn py_string(text: &str) -> String {
    format!("\"{}\"", escape_python(Some(text)))
}

fn py_literal(value: &Value, options: &GeneratorOptions) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(true) => Some("True".into()),
        Value::Bool(false) => Some("False".into()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(py_string(&options.clean(s))),
        other => Some(py_string(&other.to_string())),
    }
}

pub fn generate_sdk(metadata: &ProcedureMetadata, steps: &[Step]) -> Result<String, GenerateError> {
    generate_sdk_with(metadata, steps, &GeneratorOptions::default())
}

pub fn generate_sdk_with(
    metadata: &ProcedureMetadata,
    steps: &[Step],
    options: &GeneratorOptions,
) -> Result<String, GenerateError> {
    let resolved = resolve(steps)?;
    let mut out = String::new();
    write_script(&mut out, metadata, &resolved, options)?;
    Ok(out)
}

fn write_script(
    out: &mut String,
    metadata: &ProcedureMetadata,
    resolved: &[(&Step, &'static TechniqueDefinition)],
    options: &GeneratorOptions,
) -> fmt::Result {
    let text = |s: &str| py_string(&options.clean(s));
    let doc = |s: &str| escape_python(Some(&options.clean(s)));

    writeln!(out, "\"\"\"")?;
    writeln!(out, "Electrochemistry protocol: {}", doc(&metadata.name))?;
    if !metadata.author.is_empty() {
        writeln!(out, "Author: {}", doc(&metadata.author))?;
    }
    if !metadata.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", doc(&metadata.description))?;
    }
    writeln!(out, "\"\"\"")?;
    writeln!(out, "from {} import Procedure", options.sdk_module)?;
    writeln!(out)?;
    writeln!(
        out,
        "p = Procedure(name={}, author={}, description={})",
        text(&metadata.name),
        text(&metadata.author),
        text(&metadata.description)
    )?;
    writeln!(
        out,
        "p.system(electrodes={}, reference={}, electrolyte={}, temperature={}, working_electrode={}, counter_electrode={})",
        metadata.electrode_count,
        text(&metadata.reference_electrode),
        text(&metadata.electrolyte),
        number_value(metadata.temperature_c),
        text(&metadata.working_electrode),
        text(&metadata.counter_electrode),
    )?;
    if !resolved.is_empty() {
        writeln!(out)?;
    }
    for (step, def) in resolved {
        let mut args: Vec<String> = short_params(step, def)
            .into_iter()
            .filter_map(|(key, value)| py_literal(value, options).map(|v| format!("{key}={v}")))
            .collect();
        if let Some(tag) = &step.tag {
            args.push(format!("tag={}", text(tag)));
        }
        writeln!(out, "p.{}({})", def.id, args.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn starts_with_docstring_and_imports_sdk() {
        let out = generate_sdk(&ProcedureMetadata::default(), &[]).unwrap();
        assert!(out.starts_with("\"\"\"\n"));
        assert!(out.contains("\nfrom faraday_sdk import Procedure\n"));
        assert!(out.contains("p.system(electrodes=3, reference=\"Ag/AgCl\""));
    }

    #[test]
    fn step_call_uses_short_keys_and_python_literals() {
        let mut cv = Step::new_default("cv").unwrap();
        cv.set_param("ir_compensation", json!(true)).unwrap();
        let out = generate_sdk(&ProcedureMetadata::default(), &[cv.with_tag("act")]).unwrap();
        assert!(out.contains(
            "p.cv(vertex1=1.2, vertex2=0.05, scan_rate=50.0, step_size=1.0, cycles=3, ir_compensation=True, tag=\"act\")"
        ));
    }

    #[test]
    fn docstring_cannot_be_closed_by_user_text() {
        let meta = ProcedureMetadata { name: "evil\"\"\" import os".into(), ..Default::default() };
        let out = generate_sdk(&meta, &[]).unwrap();
        assert!(out.contains("evil\\\"\\\"\\\" import os"));
        assert_eq!(out.matches("\"\"\"").count(), 2);
    }

    #[test]
    fn custom_module_name() {
        let opts = GeneratorOptions { sdk_module: "labkit.echem".into(), ..Default::default() };
        let out = generate_sdk_with(&ProcedureMetadata::default(), &[], &opts).unwrap();
        assert!(out.contains("from labkit.echem import Procedure"));
    }
}
