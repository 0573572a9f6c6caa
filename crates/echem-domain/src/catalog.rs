//! Catálogo de técnicas electroquímicas.
//!
//! Registro estático de sólo lectura: una tabla de `TechniqueDefinition`
//! construida una vez al primer acceso (`catalog()`). No hay jerarquía de
//! tipos por técnica; todo el comportamiento específico vive en el esquema de
//! parámetros y en la tabla de reglas del validador.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::keys::short_key;
use crate::parameter::{ParameterKind, ParameterSpec};
use crate::step::Step;
use crate::DomainError;

/// Número de técnicas registradas. Forma parte del invariante de arranque.
pub const TECHNIQUE_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Measurement,
    Voltammetry,
    Impedance,
    Chronomethod,
    Auxiliary,
}

impl Category {
    pub const ALL: [Category; 5] =
        [Category::Measurement, Category::Voltammetry, Category::Impedance, Category::Chronomethod, Category::Auxiliary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Measurement => "measurement",
            Category::Voltammetry => "voltammetry",
            Category::Impedance => "impedance",
            Category::Chronomethod => "chronomethod",
            Category::Auxiliary => "auxiliary",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entrada inmutable del registro.
#[derive(Debug, Clone, Serialize)]
pub struct TechniqueDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub category: Category,
    pub description: &'static str,
    /// Descripción orientada a consumo por modelos (export ECDL).
    pub ml_description: &'static str,
    pub parameters: IndexMap<&'static str, ParameterSpec>,
}

impl TechniqueDefinition {
    pub fn parameter(&self, key: &str) -> Option<&ParameterSpec> {
        self.parameters.get(key)
    }

    /// Busca la clave completa cuya clave corta coincide con `short`.
    pub fn resolve_key(&self, short: &str) -> Option<&'static str> {
        if let Some((key, _)) = self.parameters.get_key_value(short) {
            return Some(*key);
        }
        self.parameters.iter().find(|(key, spec)| short_key(key, spec.kind) == short).map(|(key, _)| *key)
    }
}

/// Pertenencia declarada por categoría. Se mantiene separada del campo
/// `category` de cada técnica para poder verificar ambas direcciones.
const CATEGORY_MEMBERS: &[(Category, &[&str])] = &[
    (Category::Measurement, &["ocp"]),
    (Category::Voltammetry, &["cv", "lsv", "dpv", "swv"]),
    (Category::Impedance, &["eis", "geis"]),
    (Category::Chronomethod, &["ca", "cp"]),
    (Category::Auxiliary, &["purge", "rest", "rotation"]),
];

const PURGE_GASES: &[&str] = &["N2", "Ar", "O2", "H2", "CO2"];

pub struct Catalog {
    techniques: IndexMap<&'static str, TechniqueDefinition>,
    categories: IndexMap<Category, Vec<&'static str>>,
}

static CATALOG: Lazy<Catalog> = Lazy::new(|| {
    let catalog = Catalog::build();
    // Una tabla estática inconsistente es un error de programación.
    if let Err(e) = catalog.check_consistency() {
        panic!("technique catalog is inconsistent: {e}");
    }
    catalog
});

/// Catálogo global del proceso.
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

fn technique(
    id: &'static str,
    name: &'static str,
    abbreviation: &'static str,
    category: Category,
    description: &'static str,
    ml_description: &'static str,
    parameters: Vec<(&'static str, ParameterSpec)>,
) -> TechniqueDefinition {
    TechniqueDefinition {
        id,
        name,
        abbreviation,
        category,
        description,
        ml_description,
        parameters: parameters.into_iter().collect(),
    }
}

fn duration_s(default: f64) -> ParameterSpec {
    ParameterSpec::number("Duration", Some(default), "s").bounds(0.0, 86_400.0)
}

fn sample_interval_s(default: f64) -> ParameterSpec {
    ParameterSpec::number("Sample interval", Some(default), "s").bounds(0.001, 60.0).help("Time between recorded points")
}

fn potential(label: &'static str, default: Option<f64>) -> ParameterSpec {
    ParameterSpec::number(label, default, "V").bounds(-10.0, 10.0)
}

fn scan_rate(default: f64) -> ParameterSpec {
    ParameterSpec::number("Scan rate", Some(default), "mV/s").bounds(0.001, 10_000.0)
}

fn ir_compensation() -> ParameterSpec {
    ParameterSpec::boolean("iR compensation", false).help("Requires an uncompensated resistance, usually from EIS")
}

fn frequency(label: &'static str, default: f64) -> ParameterSpec {
    ParameterSpec::number(label, Some(default), "Hz").bounds(0.000_001, 10_000_000.0)
}

fn points_per_decade() -> ParameterSpec {
    ParameterSpec::integer("Points per decade", 10).bounds(1.0, 100.0)
}

impl Catalog {
    fn build() -> Self {
        let definitions = vec![
            technique(
                "ocp",
                "Open Circuit Potential",
                "OCP",
                Category::Measurement,
                "Records the rest potential of the working electrode with no applied current.",
                "Zero-current potential vs time; equilibration and baseline for later steps.",
                vec![("duration_s", duration_s(60.0)), ("sample_interval_s", sample_interval_s(0.5))],
            ),
            technique(
                "cv",
                "Cyclic Voltammetry",
                "CV",
                Category::Voltammetry,
                "Sweeps the potential between two vertices and back while recording current.",
                "Current vs potential over repeated triangular sweeps; redox peaks and surface state.",
                vec![
                    ("start_V", potential("Start potential", None).help("Empty starts at OCP")),
                    ("vertex1_V", potential("Vertex 1", Some(1.2))),
                    ("vertex2_V", potential("Vertex 2", Some(0.05))),
                    ("end_V", potential("End potential", None).help("Empty ends at the start potential")),
                    ("scan_rate_mV_s", scan_rate(50.0)),
                    ("step_size_mV", ParameterSpec::number("Step size", Some(1.0), "mV").bounds(0.1, 100.0)),
                    ("cycles", ParameterSpec::integer("Cycles", 3).bounds(1.0, 1000.0)),
                    ("ir_compensation", ir_compensation()),
                ],
            ),
            technique(
                "lsv",
                "Linear Sweep Voltammetry",
                "LSV",
                Category::Voltammetry,
                "Sweeps the potential once from start to end while recording current.",
                "Single-direction current vs potential sweep; onset potential and polarization curve.",
                vec![
                    ("start_V", potential("Start potential", None).help("Empty starts at OCP")),
                    ("end_V", potential("End potential", Some(1.0))),
                    ("scan_rate_mV_s", scan_rate(10.0)),
                    ("step_size_mV", ParameterSpec::number("Step size", Some(1.0), "mV").bounds(0.1, 100.0)),
                    ("ir_compensation", ir_compensation()),
                ],
            ),
            technique(
                "dpv",
                "Differential Pulse Voltammetry",
                "DPV",
                Category::Voltammetry,
                "Staircase sweep with superimposed pulses; current difference is recorded.",
                "Differential current vs potential; peak-shaped response for trace analysis.",
                vec![
                    ("start_V", potential("Start potential", None)),
                    ("end_V", potential("End potential", Some(0.8))),
                    ("step_mV", ParameterSpec::number("Step", Some(5.0), "mV").bounds(0.1, 100.0)),
                    ("pulse_amplitude_mV", ParameterSpec::number("Pulse amplitude", Some(50.0), "mV").bounds(1.0, 250.0)),
                    ("pulse_width_ms", ParameterSpec::number("Pulse width", Some(50.0), "ms").bounds(1.0, 1000.0)),
                    ("period_ms", ParameterSpec::number("Pulse period", Some(200.0), "ms").bounds(2.0, 10_000.0)),
                ],
            ),
            technique(
                "swv",
                "Square Wave Voltammetry",
                "SWV",
                Category::Voltammetry,
                "Staircase sweep with a symmetric square wave; forward and reverse currents are sampled.",
                "Net square-wave current vs potential; fast, background-suppressed redox analysis.",
                vec![
                    ("start_V", potential("Start potential", None)),
                    ("end_V", potential("End potential", Some(0.8))),
                    ("step_mV", ParameterSpec::number("Step", Some(4.0), "mV").bounds(0.1, 100.0)),
                    ("amplitude_mV", ParameterSpec::number("Amplitude", Some(25.0), "mV").bounds(1.0, 250.0)),
                    ("frequency_Hz", ParameterSpec::number("Frequency", Some(25.0), "Hz").bounds(1.0, 5000.0)),
                ],
            ),
            technique(
                "eis",
                "Potentiostatic Impedance Spectroscopy",
                "EIS",
                Category::Impedance,
                "Applies a small sinusoidal potential over a frequency sweep and records impedance.",
                "Complex impedance vs frequency; solution resistance and charge-transfer kinetics.",
                vec![
                    ("dc_potential_V", potential("DC potential", None).help("Empty holds at OCP")),
                    ("f_start_Hz", frequency("Start frequency", 100_000.0)),
                    ("f_end_Hz", frequency("End frequency", 0.1)),
                    ("amplitude_mV", ParameterSpec::number("AC amplitude", Some(10.0), "mV").bounds(0.0, 100.0)),
                    ("points_per_decade", points_per_decade()),
                ],
            ),
            technique(
                "geis",
                "Galvanostatic Impedance Spectroscopy",
                "GEIS",
                Category::Impedance,
                "Applies a small sinusoidal current over a frequency sweep and records impedance.",
                "Complex impedance vs frequency under current control; batteries and low-impedance cells.",
                vec![
                    ("dc_current_mA", ParameterSpec::number("DC current", Some(0.0), "mA").bounds(-1000.0, 1000.0)),
                    ("f_start_Hz", frequency("Start frequency", 100_000.0)),
                    ("f_end_Hz", frequency("End frequency", 0.1)),
                    ("amplitude_mA", ParameterSpec::number("AC amplitude", Some(0.1), "mA").bounds(0.0, 100.0)),
                    ("points_per_decade", points_per_decade()),
                ],
            ),
            technique(
                "ca",
                "Chronoamperometry",
                "CA",
                Category::Chronomethod,
                "Holds a constant potential and records current over time.",
                "Current vs time at fixed potential; stability and diffusion transients.",
                vec![
                    ("potential_V", potential("Potential", Some(0.5))),
                    ("duration_s", duration_s(60.0)),
                    ("sample_interval_s", sample_interval_s(0.1)),
                ],
            ),
            technique(
                "cp",
                "Chronopotentiometry",
                "CP",
                Category::Chronomethod,
                "Holds a constant current and records potential over time.",
                "Potential vs time at fixed current; overpotential stability.",
                vec![
                    ("current_mA", ParameterSpec::number("Current", Some(1.0), "mA").bounds(-1000.0, 1000.0)),
                    ("duration_s", duration_s(60.0)),
                    ("sample_interval_s", sample_interval_s(0.1)),
                ],
            ),
            technique(
                "purge",
                "Gas Purge",
                "PRG",
                Category::Auxiliary,
                "Bubbles gas through the electrolyte to control dissolved atmosphere.",
                "Atmosphere control before measurement; no data recorded.",
                vec![
                    ("gas", ParameterSpec::select("Gas", PURGE_GASES, "N2")),
                    ("duration_min", ParameterSpec::number("Duration", Some(20.0), "min").bounds(0.0, 240.0)),
                ],
            ),
            technique(
                "rest",
                "Rest",
                "RST",
                Category::Auxiliary,
                "Waits without applying any signal.",
                "Idle interval between steps; no data recorded.",
                vec![("duration_s", duration_s(30.0))],
            ),
            technique(
                "rotation",
                "Electrode Rotation",
                "RDE",
                Category::Auxiliary,
                "Sets the rotation rate of a rotating disk electrode for the following steps.",
                "Mass-transport control via rotation rate; no data recorded.",
                vec![(
                    "rate_rpm",
                    ParameterSpec::number("Rotation rate", Some(1600.0), "rpm").bounds(0.0, 10_000.0),
                )],
            ),
        ];

        let techniques = definitions.into_iter().map(|t| (t.id, t)).collect();
        let categories = CATEGORY_MEMBERS.iter().map(|(c, ids)| (*c, ids.to_vec())).collect();
        Catalog { techniques, categories }
    }

    pub fn lookup(&self, id: &str) -> Option<&TechniqueDefinition> {
        self.techniques.get(id)
    }

    /// Técnicas en orden de registro.
    pub fn techniques(&self) -> impl Iterator<Item = &TechniqueDefinition> {
        self.techniques.values()
    }

    pub fn parameter(&self, technique: &str, key: &str) -> Option<&ParameterSpec> {
        self.lookup(technique).and_then(|t| t.parameter(key))
    }

    /// Agrupación ordenada por categoría, en el orden de `Category::ALL`.
    pub fn list_by_category(&self) -> Vec<(Category, Vec<&TechniqueDefinition>)> {
        self.categories
            .iter()
            .map(|(category, ids)| (*category, ids.iter().filter_map(|id| self.lookup(id)).collect()))
            .collect()
    }

    /// Crea un step con todos los parámetros en su default (copias propias).
    pub fn instantiate_default(&self, id: &str) -> Result<Step, DomainError> {
        let def = self.lookup(id).ok_or_else(|| DomainError::UnknownTechnique(id.to_string()))?;
        let params = def.parameters.iter().map(|(k, spec)| (k.to_string(), spec.default_value())).collect();
        Ok(Step::from_parts(def.id, params, None))
    }

    /// Invariante de arranque: 12 técnicas, 5 categorías, pertenencia
    /// consistente en ambas direcciones, claves cortas únicas por técnica y
    /// defaults de tipo correcto.
    pub fn check_consistency(&self) -> Result<(), DomainError> {
        let fail = |msg: String| Err(DomainError::Validation(msg));
        if self.techniques.len() != TECHNIQUE_COUNT {
            return fail(format!("expected {TECHNIQUE_COUNT} techniques, found {}", self.techniques.len()));
        }
        if self.categories.len() != Category::ALL.len() || Category::ALL.iter().any(|c| !self.categories.contains_key(c)) {
            return fail("every category must be declared exactly once".into());
        }
        for (category, ids) in &self.categories {
            for id in ids {
                match self.lookup(id) {
                    None => return fail(format!("category {category} lists unknown technique {id}")),
                    Some(t) if t.category != *category => {
                        return fail(format!("technique {id} listed under {category} but declares {}", t.category))
                    }
                    Some(_) => {}
                }
            }
        }
        for t in self.techniques.values() {
            let listed = self.categories.values().flatten().filter(|id| **id == t.id).count();
            if listed != 1 {
                return fail(format!("technique {} appears in {listed} category lists", t.id));
            }
            let mut short_keys = HashSet::new();
            for (key, spec) in &t.parameters {
                if !short_keys.insert(short_key(key, spec.kind)) {
                    return fail(format!("technique {} has ambiguous short key for {key}", t.id));
                }
                if !spec.kind.accepts(&spec.default) {
                    return fail(format!("default of {}.{key} does not match its kind", t.id));
                }
                if spec.kind == ParameterKind::Select {
                    let ok = spec.default.as_str().is_some_and(|d| spec.options.contains(&d));
                    if !ok {
                        return fail(format!("default of {}.{key} is not an allowed option", t.id));
                    }
                }
            }
        }
        Ok(())
    }
}
