//! Interpretación heurística del electrolito a partir de texto libre.
//!
//! No es un parser químico: reconoce `<número> <unidad> <soluto>` y clasifica
//! el soluto contra tablas finitas y explícitas. Solutos fuera de tabla no se
//! infieren; sólo un `pH <n>` explícito puede decidir el régimen.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Acidic,
    Basic,
    Neutral,
    Unknown,
}

pub const KNOWN_ACIDS: &[&str] =
    &["HClO4", "H2SO4", "HCl", "HNO3", "H3PO4", "HBr", "HI", "HF", "CH3COOH", "HCOOH", "CF3SO3H"];

pub const KNOWN_BASES: &[&str] = &["KOH", "NaOH", "LiOH", "CsOH", "RbOH", "Ba(OH)2", "Ca(OH)2", "NH4OH"];

pub const KNOWN_NEUTRAL: &[&str] =
    &["KCl", "NaCl", "LiCl", "Na2SO4", "K2SO4", "KNO3", "NaNO3", "NaClO4", "LiClO4", "KClO4", "PBS"];

/// Factor a mol/L por unidad de concentración reconocida.
const CONCENTRATION_UNITS: &[(&str, f64)] = &[("M", 1.0), ("mol/L", 1.0), ("mM", 1e-3), ("uM", 1e-6), ("µM", 1e-6)];

static CONCENTRATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?|\.\d+)\s*(mol/L|mM|uM|µM|M)\s+([A-Za-z0-9()]+)").expect("concentration pattern")
});

static PH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bpH\s*=?\s*(\d+(?:\.\d+)?)").expect("pH pattern"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Electrolyte {
    /// Fórmula del soluto (`type` en ECDL).
    pub solute: Option<String>,
    /// Concentración normalizada a mol/L.
    pub concentration_m: Option<f64>,
    /// Unidad tal como aparece en el texto.
    pub unit: Option<String>,
    pub regime: Regime,
}

pub fn classify_solute(solute: &str) -> Option<Regime> {
    if KNOWN_ACIDS.contains(&solute) {
        Some(Regime::Acidic)
    } else if KNOWN_BASES.contains(&solute) {
        Some(Regime::Basic)
    } else if KNOWN_NEUTRAL.contains(&solute) {
        Some(Regime::Neutral)
    } else {
        None
    }
}

fn regime_from_ph(text: &str) -> Option<Regime> {
    let ph: f64 = PH.captures(text)?.get(1)?.as_str().parse().ok()?;
    Some(if ph < 6.5 {
        Regime::Acidic
    } else if ph > 7.5 {
        Regime::Basic
    } else {
        Regime::Neutral
    })
}

pub fn parse_electrolyte(text: &str) -> Electrolyte {
    let mut parsed = Electrolyte { solute: None, concentration_m: None, unit: None, regime: Regime::Unknown };

    if let Some(caps) = CONCENTRATION.captures(text) {
        let unit = &caps[2];
        let factor = CONCENTRATION_UNITS.iter().find(|(u, _)| *u == unit).map(|(_, f)| *f).unwrap_or(1.0);
        parsed.concentration_m = caps[1].parse::<f64>().ok().map(|c| c * factor);
        parsed.unit = Some(unit.to_string());
        parsed.solute = Some(caps[3].to_string());
    } else {
        // Sin concentración: sólo aceptamos un soluto tabulado como palabra suelta.
        parsed.solute = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .find(|w| classify_solute(w).is_some())
            .map(str::to_string);
    }

    parsed.regime = parsed
        .solute
        .as_deref()
        .and_then(classify_solute)
        .or_else(|| regime_from_ph(text))
        .unwrap_or(Regime::Unknown);
    parsed
}
