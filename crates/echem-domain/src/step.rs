//! Step: una instancia configurada de una técnica dentro de un procedimiento.
//!
//! El id de técnica no cambia tras la creación; reasignar la técnica crea un
//! step nuevo con defaults frescos (`with_technique`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::catalog;
use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Identificador generado, único dentro del procedimiento.
    pub id: Uuid,
    technique: String,
    #[serde(default)]
    pub params: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Step {
    /// Construye un step sin consultar el catálogo. La técnica puede no
    /// existir; el validador lo reporta como `PV000`.
    pub fn from_parts(technique: impl Into<String>, params: IndexMap<String, Value>, tag: Option<String>) -> Self {
        Step { id: Uuid::new_v4(), technique: technique.into(), params, tag }
    }

    /// Atajo sobre `catalog().instantiate_default`.
    pub fn new_default(technique: &str) -> Result<Self, DomainError> {
        catalog().instantiate_default(technique)
    }

    pub fn technique(&self) -> &str {
        &self.technique
    }

    /// Step nuevo (id nuevo, defaults nuevos) para otra técnica. Conserva el tag.
    pub fn with_technique(&self, technique: &str) -> Result<Self, DomainError> {
        let mut step = catalog().instantiate_default(technique)?;
        step.tag = self.tag.clone();
        Ok(step)
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Lectura numérica; `None` si el parámetro falta, es `null` o no es número.
    pub fn param_f64(&self, key: &str) -> Option<f64> {
        self.params.get(key).and_then(Value::as_f64)
    }

    pub fn param_bool(&self, key: &str) -> bool {
        self.params.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Edita un parámetro declarado por la técnica. Claves ajenas al esquema
    /// o valores de tipo incorrecto se rechazan.
    pub fn set_param(&mut self, key: &str, value: Value) -> Result<(), DomainError> {
        let spec = catalog()
            .parameter(&self.technique, key)
            .ok_or_else(|| DomainError::Validation(format!("{} has no parameter {key}", self.technique)))?;
        if !spec.kind.accepts(&value) {
            return Err(DomainError::Validation(format!("{key} expects a {:?} value", spec.kind)));
        }
        self.params.insert(key.to_string(), value);
        Ok(())
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edits_do_not_leak_between_steps() {
        let mut a = Step::new_default("cv").unwrap();
        let b = Step::new_default("cv").unwrap();
        a.set_param("scan_rate_mV_s", json!(100.0)).unwrap();
        assert_eq!(b.param("scan_rate_mV_s"), Some(&json!(50.0)));
        assert_eq!(catalog().parameter("cv", "scan_rate_mV_s").unwrap().default, json!(50.0));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn set_param_rejects_unknown_key_and_wrong_kind() {
        let mut s = Step::new_default("eis").unwrap();
        assert!(s.set_param("cycles", json!(3)).is_err());
        assert!(s.set_param("points_per_decade", json!(2.5)).is_err());
        assert!(s.set_param("dc_potential_V", Value::Null).is_ok());
    }

    #[test]
    fn reassigning_technique_creates_fresh_step() {
        let cv = Step::new_default("cv").unwrap().with_tag("activation");
        let lsv = cv.with_technique("lsv").unwrap();
        assert_eq!(lsv.technique(), "lsv");
        assert_ne!(lsv.id, cv.id);
        assert_eq!(lsv.tag.as_deref(), Some("activation"));
        assert!(!lsv.params.contains_key("cycles"));
    }
}
