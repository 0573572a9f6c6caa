//! Esquema de parámetros de una técnica.
//!
//! Cada técnica declara un mapa ordenado `clave -> ParameterSpec`. Las claves
//! llevan el sufijo de unidad (`scan_rate_mV_s`, `duration_min`, ...) y el
//! valor por defecto puede ser `null`, que significa "derivar en tiempo de
//! ejecución" (p. ej. potencial inicial = OCP).

use serde::Serialize;
use serde_json::Value;

/// Tipo de valor admitido por un parámetro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Number,
    Integer,
    Boolean,
    String,
    Select,
}

impl ParameterKind {
    /// Sólo los parámetros numéricos llevan sufijo de unidad en su clave.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ParameterKind::Number | ParameterKind::Integer)
    }

    /// Comprueba que `value` sea compatible con este tipo. `null` siempre lo es.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (ParameterKind::Number, Value::Number(_)) => true,
            (ParameterKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ParameterKind::Boolean, Value::Bool(_)) => true,
            (ParameterKind::String | ParameterKind::Select, Value::String(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub label: &'static str,
    pub kind: ParameterKind,
    /// `Value::Null` cuando el valor se deriva del contexto.
    pub default: Value,
    pub unit: Option<&'static str>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Valores permitidos para `ParameterKind::Select` (vacío en otro caso).
    pub options: &'static [&'static str],
    pub help: &'static str,
}

impl ParameterSpec {
    fn base(label: &'static str, kind: ParameterKind, default: Value) -> Self {
        Self { label, kind, default, unit: None, min: None, max: None, options: &[], help: "" }
    }

    /// Parámetro real con unidad; `None` como default deja el valor en `null`.
    pub fn number(label: &'static str, default: Option<f64>, unit: &'static str) -> Self {
        let default = default.map(Value::from).unwrap_or(Value::Null);
        Self { unit: Some(unit), ..Self::base(label, ParameterKind::Number, default) }
    }

    pub fn integer(label: &'static str, default: i64) -> Self {
        Self::base(label, ParameterKind::Integer, Value::from(default))
    }

    pub fn boolean(label: &'static str, default: bool) -> Self {
        Self::base(label, ParameterKind::Boolean, Value::Bool(default))
    }

    pub fn select(label: &'static str, options: &'static [&'static str], default: &str) -> Self {
        Self { options, ..Self::base(label, ParameterKind::Select, Value::from(default)) }
    }

    pub fn bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }

    /// Copia independiente del default (nunca se comparte con el catálogo).
    pub fn default_value(&self) -> Value {
        self.default.clone()
    }
}
