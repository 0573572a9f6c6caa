use echem_core::hashing::hash_value;
use echem_core::procedure_fingerprint;
use echem_domain::{ProcedureMetadata, Step};
use serde_json::json;

#[test]
fn hash_value_produces_hex_64() {
    let v = json!({"b":2, "a":1});
    let h = hash_value(&v);
    // blake3 hex length is 64
    assert_eq!(h.len(), 64);
    // deterministic: same value with different key order yields same hash
    let v2 = json!({"a":1, "b":2});
    assert_eq!(h, hash_value(&v2));
}

#[test]
fn fingerprint_ignores_step_ids_but_not_params() {
    let meta = ProcedureMetadata::default();
    let a = vec![Step::new_default("purge").unwrap(), Step::new_default("cv").unwrap()];
    let b = vec![Step::new_default("purge").unwrap(), Step::new_default("cv").unwrap()];
    assert_ne!(a[0].id, b[0].id);
    assert_eq!(procedure_fingerprint(&meta, &a), procedure_fingerprint(&meta, &b));

    let mut c = b.clone();
    c[1].set_param("cycles", json!(5)).unwrap();
    assert_ne!(procedure_fingerprint(&meta, &a), procedure_fingerprint(&meta, &c));
}
