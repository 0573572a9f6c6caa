//! Archivo de protocolo estilo YAML: bloques `metadata`, `system` y
//! `procedure`. Strings entre comillas dobles, números sin comillas, `null`
//! omitido. La salida es YAML válido.

use std::fmt::{self, Write};

use echem_domain::{ProcedureMetadata, Step, TechniqueDefinition};
use serde_json::Value;

use super::{resolve, short_params};
use crate::error::GenerateError;
use crate::escape::escape_yaml_like;
use crate::options::GeneratorOptions;
use crate::units::number_value;

fn quoted(text: &str) -> String {
    format!("\"{}\"", escape_yaml_like(Some(text)))
}

/// Escalar YAML para un valor de parámetro; `None` para `null`.
fn scalar(value: &Value, options: &GeneratorOptions) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(quoted(&options.clean(s))),
        // Fuera del esquema; el flujo JSON también es YAML.
        other => Some(other.to_string()),
    }
}

pub fn generate_yaml(metadata: &ProcedureMetadata, steps: &[Step]) -> Result<String, GenerateError> {
    generate_yaml_with(metadata, steps, &GeneratorOptions::default())
}

pub fn generate_yaml_with(
    metadata: &ProcedureMetadata,
    steps: &[Step],
    options: &GeneratorOptions,
) -> Result<String, GenerateError> {
    let resolved = resolve(steps)?;
    let mut out = String::new();
    write_protocol(&mut out, metadata, &resolved, options)?;
    Ok(out)
}

fn write_protocol(
    out: &mut String,
    metadata: &ProcedureMetadata,
    resolved: &[(&Step, &'static TechniqueDefinition)],
    options: &GeneratorOptions,
) -> fmt::Result {
    let text = |s: &str| quoted(&options.clean(s));

    writeln!(out, "# Electrochemistry protocol")?;
    writeln!(out, "metadata:")?;
    writeln!(out, "  name: {}", text(&metadata.name))?;
    writeln!(out, "  author: {}", text(&metadata.author))?;
    writeln!(out, "  description: {}", text(&metadata.description))?;

    writeln!(out, "system:")?;
    writeln!(out, "  electrodes: {}", metadata.electrode_count)?;
    writeln!(out, "  reference: {}", text(&metadata.reference_electrode))?;
    writeln!(out, "  electrolyte: {}", text(&metadata.electrolyte))?;
    writeln!(out, "  temperature_C: {}", number_value(metadata.temperature_c))?;
    writeln!(out, "  working_electrode: {}", text(&metadata.working_electrode))?;
    writeln!(out, "  counter_electrode: {}", text(&metadata.counter_electrode))?;

    if resolved.is_empty() {
        return writeln!(out, "procedure: []");
    }
    writeln!(out, "procedure:")?;
    for (step, def) in resolved {
        let mut lines: Vec<String> = short_params(step, def)
            .into_iter()
            .filter_map(|(key, value)| scalar(value, options).map(|v| format!("      {key}: {v}")))
            .collect();
        if let Some(tag) = &step.tag {
            lines.push(format!("      tag: {}", text(tag)));
        }
        if lines.is_empty() {
            writeln!(out, "  - {}: {{}}", def.id)?;
        } else {
            writeln!(out, "  - {}:", def.id)?;
            for line in lines {
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}
