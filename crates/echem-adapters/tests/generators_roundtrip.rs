//! Tests de integración de los generadores: forma de cada salida,
//! conversión SI, claves cortas y reconstrucción desde YAML/ECDL.

use echem_adapters::{
    generate, generate_ecdl, generate_ir, generate_sdk, generate_yaml, import_ecdl, import_yaml, GenerateError,
    GeneratorOptions, OutputFormat,
};
use echem_domain::{ProcedureMetadata, Step};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn metadata() -> ProcedureMetadata {
    ProcedureMetadata {
        name: "Pt ORR benchmark".into(),
        author: "Lab 3".into(),
        description: "Activation, then \"fast\" impedance".into(),
        electrode_count: 3,
        reference_electrode: "RHE".into(),
        electrolyte: "0.1 M HClO4".into(),
        temperature_c: 25.0,
        working_electrode: "Pt(111)".into(),
        counter_electrode: "Pt mesh".into(),
    }
}

fn four_steps() -> Vec<Step> {
    let mut cv = Step::new_default("cv").unwrap().with_tag("activation");
    cv.set_param("scan_rate_mV_s", json!(100.0)).unwrap();
    cv.set_param("start_V", json!(0.05)).unwrap();
    vec![
        Step::new_default("purge").unwrap(),
        Step::new_default("ocp").unwrap(),
        cv,
        Step::new_default("eis").unwrap().with_tag("impedance"),
    ]
}

#[test]
fn ecdl_round_trip_preserves_steps() {
    let text = generate_ecdl(&metadata(), &four_steps()).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    for key in ["ecdl_version", "protocol", "material", "observation", "_procedure"] {
        assert!(parsed.get(key).is_some(), "missing {key}");
    }
    assert_eq!(parsed["ecdl_version"], "1.0.0");
    assert_eq!(parsed["material"], json!({}));
    assert_eq!(parsed["observation"], json!({}));
    let steps = parsed["_procedure"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0]["technique"], "purge");
    assert_eq!(steps[2]["tag"], "activation");
    assert_eq!(steps[2]["params"]["scan_rate_mV_s"], 100.0);
}

#[test]
fn ecdl_import_recovers_equivalent_steps() {
    let original = four_steps();
    let report = import_ecdl(&generate_ecdl(&metadata(), &original).unwrap()).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(report.metadata, metadata());
    assert_eq!(report.steps, original);
}

#[test]
fn ir_converts_to_si_and_drops_original_keys() {
    let text = generate_ir(&metadata(), &four_steps()).unwrap();
    let ir: Value = serde_json::from_str(&text).unwrap();
    for key in ["faraday_version", "procedure", "system", "metadata"] {
        assert!(ir.get(key).is_some(), "missing {key}");
    }
    assert_eq!(ir["faraday_version"], "1.0");

    let steps = ir["procedure"][0]["steps"].as_array().unwrap();
    let purge = &steps[0]["params"];
    assert_eq!(purge["duration_s"], json!(1200));
    assert!(purge.get("duration_min").is_none());

    let cv = &steps[2]["params"];
    assert!((cv["scan_rate_V_s"].as_f64().unwrap() - 0.1).abs() < 1e-12);
    assert!(cv.get("scan_rate_mV_s").is_none());
    assert!((cv["step_size_V"].as_f64().unwrap() - 0.001).abs() < 1e-12);
    assert_eq!(cv["vertex1_V"], 1.2);

    let eis = &steps[3]["params"];
    assert_eq!(eis["amplitude_V"], 0.01);
    assert_eq!(eis["f_start_Hz"], 100000.0);
    for step in steps {
        for key in step["params"].as_object().unwrap().keys() {
            assert!(!key.ends_with("_mV") && !key.ends_with("_min") && !key.ends_with("_mV_s"), "{key}");
        }
    }
}

#[test]
fn eis_keys_stay_distinct_in_yaml_and_sdk() {
    let eis = vec![Step::new_default("eis").unwrap()];
    let yaml = generate_yaml(&metadata(), &eis).unwrap();
    assert!(yaml.contains("f_start: 100000.0"));
    assert!(yaml.contains("f_end: 0.1"));
    assert!(!yaml.contains(" f: "));

    let sdk = generate_sdk(&metadata(), &eis).unwrap();
    assert!(sdk.contains("f_start=100000.0"));
    assert!(sdk.contains("f_end=0.1"));
    assert!(!sdk.contains("(f="));
}

#[test]
fn yaml_output_parses_with_a_standard_parser() {
    let text = generate_yaml(&metadata(), &four_steps()).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
    assert_eq!(doc["metadata"]["name"].as_str(), Some("Pt ORR benchmark"));
    assert_eq!(doc["metadata"]["description"].as_str(), Some("Activation, then \"fast\" impedance"));
    assert_eq!(doc["system"]["reference"].as_str(), Some("RHE"));
    let procedure = doc["procedure"].as_sequence().unwrap();
    assert_eq!(procedure.len(), 4);
    assert_eq!(procedure[2]["cv"]["scan_rate"].as_f64(), Some(100.0));
    assert_eq!(procedure[2]["cv"]["tag"].as_str(), Some("activation"));
}

#[test]
fn yaml_import_recovers_equivalent_steps() {
    let original = four_steps();
    let report = import_yaml(&generate_yaml(&metadata(), &original).unwrap()).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(report.metadata, metadata());
    assert_eq!(report.steps.len(), original.len());
    for (got, want) in report.steps.iter().zip(&original) {
        assert_eq!(got.technique(), want.technique());
        assert_eq!(got.params, want.params);
        assert_eq!(got.tag, want.tag);
    }
}

#[test]
fn sdk_script_layout() {
    let text = generate_sdk(&metadata(), &four_steps()).unwrap();
    assert!(text.starts_with("\"\"\""));
    let lines: Vec<&str> = text.lines().collect();
    let import = lines.iter().position(|l| l.starts_with("from ")).unwrap();
    let ctor = lines.iter().position(|l| l.starts_with("p = Procedure(")).unwrap();
    let system = lines.iter().position(|l| l.starts_with("p.system(")).unwrap();
    assert!(import < ctor && ctor < system);
    assert!(lines[system].contains("electrodes=3"));
    assert!(lines[system].contains("reference=\"RHE\""));
    let calls: Vec<&str> = lines.iter().filter(|l| l.starts_with("p.") && !l.starts_with("p.system")).copied().collect();
    assert_eq!(calls.len(), 4);
    assert!(calls[0].starts_with("p.purge(gas=\"N2\", duration=20.0"));
    assert!(calls[2].starts_with("p.cv(start=0.05,"));
    assert!(calls[2].ends_with("tag=\"activation\")"));
}

#[test]
fn every_format_is_deterministic() {
    let steps = four_steps();
    for format in OutputFormat::ALL {
        let a = generate(format, &metadata(), &steps, &GeneratorOptions::default()).unwrap();
        let b = generate(format, &metadata(), &steps, &GeneratorOptions::default()).unwrap();
        assert_eq!(a, b, "{format}");
    }
}

#[test]
fn every_format_rejects_unknown_technique() {
    let steps = vec![Step::from_parts("warp_drive", Default::default(), None)];
    for format in OutputFormat::ALL {
        let err = generate(format, &metadata(), &steps, &GeneratorOptions::default()).unwrap_err();
        assert!(matches!(err, GenerateError::UnknownTechnique { index: 0, .. }), "{format}");
    }
}

#[test]
fn long_free_text_is_truncated_in_output() {
    let meta = ProcedureMetadata { description: "d".repeat(2000), ..metadata() };
    let opts = GeneratorOptions { max_text_len: 100, ..Default::default() };
    let ir: Value = serde_json::from_str(&generate(OutputFormat::Ir, &meta, &[], &opts).unwrap()).unwrap();
    assert_eq!(ir["metadata"]["description"].as_str().unwrap().len(), 100);
}
