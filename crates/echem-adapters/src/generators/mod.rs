//! Generadores de salida.
//!
//! Cuatro funciones puras y deterministas de `(metadata, steps)`:
//! - `yaml`: archivo de protocolo legible.
//! - `sdk`: script estilo SDK (Python).
//! - `ecdl`: registro JSON orientado a ML.
//! - `ir`: representación intermedia normalizada a SI.
//!
//! No revalidan parámetros (eso es tarea del validador) pero fallan con
//! `GenerateError::UnknownTechnique` si un step no resuelve en el catálogo.

pub mod ecdl;
pub mod ir;
pub mod sdk;
pub mod yaml;

use std::fmt;
use std::str::FromStr;

use echem_domain::{catalog, ProcedureMetadata, Step, TechniqueDefinition};

use crate::error::GenerateError;
use crate::options::GeneratorOptions;

pub use ecdl::{generate_ecdl, generate_ecdl_value};
pub use ir::{generate_ir, generate_ir_value};
pub use sdk::generate_sdk;
pub use yaml::generate_yaml;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Sdk,
    Ecdl,
    Ir,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [OutputFormat::Yaml, OutputFormat::Sdk, OutputFormat::Ecdl, OutputFormat::Ir];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Sdk => "py",
            OutputFormat::Ecdl => "ecdl.json",
            OutputFormat::Ir => "ir.json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Sdk => "sdk",
            OutputFormat::Ecdl => "ecdl",
            OutputFormat::Ir => "ir",
        };
        f.write_str(s)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "sdk" | "py" | "python" => Ok(OutputFormat::Sdk),
            "ecdl" => Ok(OutputFormat::Ecdl),
            "ir" => Ok(OutputFormat::Ir),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Contrato común de los generadores.
pub trait ProcedureGenerator {
    fn format(&self) -> OutputFormat;
    fn generate(
        &self,
        metadata: &ProcedureMetadata,
        steps: &[Step],
        options: &GeneratorOptions,
    ) -> Result<String, GenerateError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlGenerator;
#[derive(Debug, Clone, Copy, Default)]
pub struct SdkGenerator;
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdlGenerator;
#[derive(Debug, Clone, Copy, Default)]
pub struct IrGenerator;

impl ProcedureGenerator for YamlGenerator {
    fn format(&self) -> OutputFormat {
        OutputFormat::Yaml
    }
    fn generate(&self, m: &ProcedureMetadata, s: &[Step], o: &GeneratorOptions) -> Result<String, GenerateError> {
        yaml::generate_yaml_with(m, s, o)
    }
}

impl ProcedureGenerator for SdkGenerator {
    fn format(&self) -> OutputFormat {
        OutputFormat::Sdk
    }
    fn generate(&self, m: &ProcedureMetadata, s: &[Step], o: &GeneratorOptions) -> Result<String, GenerateError> {
        sdk::generate_sdk_with(m, s, o)
    }
}

impl ProcedureGenerator for EcdlGenerator {
    fn format(&self) -> OutputFormat {
        OutputFormat::Ecdl
    }
    fn generate(&self, m: &ProcedureMetadata, s: &[Step], o: &GeneratorOptions) -> Result<String, GenerateError> {
        ecdl::generate_ecdl_with(m, s, o)
    }
}

impl ProcedureGenerator for IrGenerator {
    fn format(&self) -> OutputFormat {
        OutputFormat::Ir
    }
    fn generate(&self, m: &ProcedureMetadata, s: &[Step], o: &GeneratorOptions) -> Result<String, GenerateError> {
        ir::generate_ir_with(m, s, o)
    }
}

pub fn generator_for(format: OutputFormat) -> Box<dyn ProcedureGenerator> {
    match format {
        OutputFormat::Yaml => Box::new(YamlGenerator),
        OutputFormat::Sdk => Box::new(SdkGenerator),
        OutputFormat::Ecdl => Box::new(EcdlGenerator),
        OutputFormat::Ir => Box::new(IrGenerator),
    }
}

/// Genera en el formato pedido con las opciones dadas.
pub fn generate(
    format: OutputFormat,
    metadata: &ProcedureMetadata,
    steps: &[Step],
    options: &GeneratorOptions,
) -> Result<String, GenerateError> {
    log::debug!("generating {format} for {} steps", steps.len());
    generator_for(format).generate(metadata, steps, options)
}

/// Resuelve la técnica de cada step; falla con el primer id desconocido.
pub(crate) fn resolve(steps: &[Step]) -> Result<Vec<(&Step, &'static TechniqueDefinition)>, GenerateError> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            catalog()
                .lookup(step.technique())
                .map(|def| (step, def))
                .ok_or_else(|| GenerateError::UnknownTechnique { index, technique: step.technique().to_string() })
        })
        .collect()
}

/// Pares `(clave corta, valor)` no nulos en orden de step. Claves ausentes
/// del esquema conservan su forma original.
pub(crate) fn short_params<'a>(
    step: &'a Step,
    def: &TechniqueDefinition,
) -> Vec<(&'a str, &'a serde_json::Value)> {
    step.params
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let short = match def.parameter(k) {
                Some(spec) => echem_domain::keys::short_key(k, spec.kind),
                None => k.as_str(),
            };
            (short, v)
        })
        .collect()
}
