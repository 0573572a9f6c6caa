use serde::{Deserialize, Serialize};

/// Metadatos del procedimiento y descripción de la celda.
///
/// `electrolyte` es texto libre; los generadores lo interpretan de forma
/// heurística (soluto, concentración, régimen ácido/base).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcedureMetadata {
    pub name: String,
    pub author: String,
    pub description: String,
    /// 2 o 3 electrodos.
    #[serde(alias = "electrodes")]
    pub electrode_count: u8,
    #[serde(alias = "reference")]
    pub reference_electrode: String,
    pub electrolyte: String,
    #[serde(rename = "temperature_C", alias = "temperature")]
    pub temperature_c: f64,
    pub working_electrode: String,
    pub counter_electrode: String,
}

impl Default for ProcedureMetadata {
    fn default() -> Self {
        Self {
            name: "Untitled procedure".into(),
            author: String::new(),
            description: String::new(),
            electrode_count: 3,
            reference_electrode: "Ag/AgCl".into(),
            electrolyte: "0.1 M KCl".into(),
            temperature_c: 25.0,
            working_electrode: "Glassy carbon".into(),
            counter_electrode: "Pt wire".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_mapping_fills_defaults() {
        let m: ProcedureMetadata =
            serde_json::from_str(r#"{"name":"ORR","electrodes":2,"temperature":30}"#).unwrap();
        assert_eq!(m.name, "ORR");
        assert_eq!(m.electrode_count, 2);
        assert_eq!(m.temperature_c, 30.0);
        assert_eq!(m.reference_electrode, "Ag/AgCl");
    }
}
