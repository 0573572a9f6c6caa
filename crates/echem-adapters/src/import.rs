//! Reconstrucción de steps a partir de documentos generados o ingeridos.
//!
//! Acepta parámetros por clave completa (`scan_rate_mV_s`) o corta
//! (`scan_rate`). Una entrada con técnica desconocida o forma inválida se
//! descarta y se registra; nunca aborta la importación completa.

use std::collections::HashSet;

use echem_domain::{catalog, ParameterKind, ProcedureMetadata, Step};
use indexmap::IndexMap;
use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ImportError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntry {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub metadata: ProcedureMetadata,
    pub steps: Vec<Step>,
    pub skipped: Vec<SkippedEntry>,
}

impl ImportReport {
    fn new(metadata: ProcedureMetadata) -> Self {
        Self { metadata, steps: Vec::new(), skipped: Vec::new() }
    }

    fn skip(&mut self, index: usize, reason: String) {
        warn!("import: skipping step {index}: {reason}");
        self.skipped.push(SkippedEntry { index, reason });
    }

    fn push(&mut self, index: usize, entry: Result<Step, String>) {
        match entry {
            Ok(step) => self.steps.push(step),
            Err(reason) => self.skip(index, reason),
        }
    }
}

/// Ajusta el valor al tipo del parámetro. Enteros escritos como `3.0` se
/// aceptan; valores incompatibles quedan en `null`.
fn coerce(technique: &str, key: &str, kind: ParameterKind, value: Value) -> Value {
    if kind.accepts(&value) {
        return value;
    }
    if kind == ParameterKind::Integer {
        if let Some(f) = value.as_f64().filter(|f| f.fract() == 0.0) {
            return Value::from(f as i64);
        }
    }
    warn!("import: {technique}.{key} has an incompatible value {value}; using null");
    Value::Null
}

/// Step a partir de técnica + parámetros (claves completas o cortas).
/// Claves del esquema ausentes quedan en `null`; claves desconocidas se
/// descartan.
pub fn rebuild_step(technique: &str, params: &Map<String, Value>, tag: Option<String>) -> Result<Step, String> {
    let def = catalog().lookup(technique).ok_or_else(|| format!("unknown technique \"{technique}\""))?;

    let mut provided: IndexMap<&'static str, Value> = IndexMap::new();
    for (key, value) in params {
        match def.resolve_key(key) {
            Some(full) => {
                provided.insert(full, value.clone());
            }
            None => warn!("import: {technique} has no parameter {key}; dropped"),
        }
    }

    let rebuilt = def
        .parameters
        .iter()
        .map(|(key, spec)| {
            let value = provided.swap_remove(key).unwrap_or(Value::Null);
            (key.to_string(), coerce(technique, key, spec.kind, value))
        })
        .collect();
    Ok(Step::from_parts(def.id, rebuilt, tag))
}

fn tag_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Entrada `{technique, params, tag?, id?}` (ingesta y `_procedure` de ECDL).
fn structured_entry(entry: &Value) -> Result<Step, String> {
    let obj = entry.as_object().ok_or("entry is not a mapping")?;
    let technique = obj.get("technique").and_then(Value::as_str).ok_or("missing technique")?;
    let empty = Map::new();
    let params = match obj.get("params") {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(p)) => p,
        Some(_) => return Err("params is not a mapping".into()),
    };
    let mut step = rebuild_step(technique, params, tag_of(obj.get("tag")))?;
    if let Some(id) = obj.get("id").and_then(Value::as_str).and_then(|s| Uuid::parse_str(s).ok()) {
        step.id = id;
    }
    Ok(step)
}

/// Entrada YAML `{<técnica>: {clave: valor, ..., tag: "..."}}`.
fn yaml_entry(entry: &Value) -> Result<Step, String> {
    let obj = entry.as_object().ok_or("entry is not a mapping")?;
    if obj.len() != 1 {
        return Err(format!("expected a single technique key, found {}", obj.len()));
    }
    let Some((technique, body)) = obj.iter().next() else {
        return Err("empty entry".into());
    };
    let mut params = match body {
        Value::Null => Map::new(),
        Value::Object(p) => p.clone(),
        _ => return Err(format!("{technique} body is not a mapping")),
    };
    let tag = tag_of(params.remove("tag").as_ref());
    rebuild_step(technique, &params, tag)
}

fn metadata_from(value: Value) -> ProcedureMetadata {
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!("import: unreadable metadata ({e}); using defaults");
        ProcedureMetadata::default()
    })
}

fn steps_array<'a>(doc: &'a Value, key: &str) -> Result<&'a [Value], ImportError> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(ImportError::Shape(format!("{key} is not a list"))),
    }
}

/// Documento de ingesta `{metadata: {...}, steps: [{technique, params, tag?}]}`.
/// Un id repetido recibe uno nuevo: los ids no se comparten dentro de un
/// procedimiento.
pub fn ingest_document(doc: &Value) -> Result<ImportReport, ImportError> {
    if !doc.is_object() {
        return Err(ImportError::Shape("top level is not a mapping".into()));
    }
    let metadata = metadata_from(doc.get("metadata").cloned().unwrap_or_else(|| Value::Object(Map::new())));
    let mut report = ImportReport::new(metadata);
    let mut seen: HashSet<Uuid> = HashSet::new();
    for (index, entry) in steps_array(doc, "steps")?.iter().enumerate() {
        let entry = structured_entry(entry).map(|mut step| {
            if !seen.insert(step.id) {
                warn!("import: step {index} repeats id {}; assigning a new one", step.id);
                step.id = Uuid::new_v4();
                seen.insert(step.id);
            }
            step
        });
        report.push(index, entry);
    }
    Ok(report)
}

/// Reconstruye desde la salida del generador ECDL (canal `_procedure`).
pub fn import_ecdl(text: &str) -> Result<ImportReport, ImportError> {
    let doc: Value = serde_json::from_str(text)?;
    let procedure = doc
        .get("_procedure")
        .ok_or_else(|| ImportError::Shape("missing _procedure".into()))?;
    ingest_document(procedure)
}

/// Sección YAML como JSON; una sección ilegible se ignora.
fn yaml_section(value: &serde_yaml::Value, name: &str) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => fields,
        Ok(Value::Null) => Map::new(),
        Ok(_) => {
            warn!("import: {name} is not a mapping; ignored");
            Map::new()
        }
        Err(e) => {
            warn!("import: unreadable {name} ({e}); ignored");
            Map::new()
        }
    }
}

/// Reconstruye desde la salida del generador YAML. Cada entrada de
/// `procedure` se convierte por separado, así una clave no representable
/// descarta sólo esa entrada.
pub fn import_yaml(text: &str) -> Result<ImportReport, ImportError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    let serde_yaml::Value::Mapping(root) = yaml else {
        return Err(ImportError::Shape("top level is not a mapping".into()));
    };

    let mut flat = Map::new();
    for section in ["metadata", "system"] {
        if let Some(value) = root.get(section) {
            flat.extend(yaml_section(value, section));
        }
    }
    let mut report = ImportReport::new(metadata_from(Value::Object(flat)));

    let entries = match root.get("procedure") {
        None | Some(serde_yaml::Value::Null) => &[][..],
        Some(serde_yaml::Value::Sequence(items)) => items.as_slice(),
        Some(_) => return Err(ImportError::Shape("procedure is not a list".into())),
    };
    for (index, entry) in entries.iter().enumerate() {
        let entry = serde_json::to_value(entry)
            .map_err(|e| format!("unreadable entry ({e})"))
            .and_then(|json| yaml_entry(&json));
        report.push(index, entry);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_and_full_keys_map_to_the_same_step() {
        let short = json!({"f_start": 1000.0, "f_end": 1.0, "amplitude": 5.0});
        let full = json!({"f_start_Hz": 1000.0, "f_end_Hz": 1.0, "amplitude_mV": 5.0});
        let a = rebuild_step("eis", short.as_object().unwrap(), None).unwrap();
        let b = rebuild_step("eis", full.as_object().unwrap(), None).unwrap();
        assert_eq!(a.params, b.params);
        assert!(a.params["dc_potential_V"].is_null());
        assert!(a.params["points_per_decade"].is_null());
    }

    #[test]
    fn unknown_keys_are_dropped_and_integers_coerced() {
        let p = json!({"cycles": 5.0, "colour": "blue"});
        let s = rebuild_step("cv", p.as_object().unwrap(), Some("x".into())).unwrap();
        assert_eq!(s.params["cycles"], json!(5));
        assert!(!s.params.contains_key("colour"));
        assert_eq!(s.tag.as_deref(), Some("x"));
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let doc = json!({
            "metadata": {"name": "mixed"},
            "steps": [
                {"technique": "ocp", "params": {"duration": 120.0}},
                {"technique": "teleport", "params": {}},
                "not a step",
                {"technique": "rest"}
            ]
        });
        let report = ingest_document(&doc).unwrap();
        assert_eq!(report.metadata.name, "mixed");
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.steps[0].params["duration_s"], json!(120.0));
        assert_eq!(report.skipped.iter().map(|s| s.index).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn yaml_entry_with_unrepresentable_key_is_skipped() {
        let text = "metadata:\n  name: \"x\"\nprocedure:\n  - cv: {cycles: 3}\n  - ~: {}\n  - rest:\n      duration: 5\n";
        let report = import_yaml(text).unwrap();
        assert_eq!(report.metadata.name, "x");
        assert_eq!(report.steps.iter().map(|s| s.technique()).collect::<Vec<_>>(), vec!["cv", "rest"]);
        assert_eq!(report.steps[0].params["cycles"], json!(3));
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
    }

    #[test]
    fn repeated_ids_are_replaced() {
        let id = "6f1c2a34-8d0e-4b7a-9c61-2f4e8a9b0c11";
        let doc = json!({
            "steps": [
                {"id": id, "technique": "ocp", "params": {}},
                {"id": id, "technique": "rest", "params": {}},
                {"id": id, "technique": "cv", "params": {}}
            ]
        });
        let report = ingest_document(&doc).unwrap();
        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.steps[0].id.to_string(), id);
        let ids: HashSet<Uuid> = report.steps.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        assert!(matches!(ingest_document(&json!([1, 2])), Err(ImportError::Shape(_))));
        assert!(import_yaml("- just\n- a list\n").is_err());
    }
}
