//! Conversión de parámetros a unidades SI para la representación intermedia.
//!
//! La clave original no-SI desaparece: `scan_rate_mV_s` pasa a `scan_rate_V_s`.

use serde_json::Value;

/// Sufijo no-SI, sufijo SI y factor racional `num / den`.
#[derive(Debug, Clone, Copy)]
pub struct SiRule {
    pub suffix: &'static str,
    pub si_suffix: &'static str,
    pub num: f64,
    pub den: f64,
}

pub const SI_RULES: &[SiRule] = &[
    SiRule { suffix: "_mV_s", si_suffix: "_V_s", num: 1.0, den: 1000.0 },
    SiRule { suffix: "_mV", si_suffix: "_V", num: 1.0, den: 1000.0 },
    SiRule { suffix: "_min", si_suffix: "_s", num: 60.0, den: 1.0 },
    SiRule { suffix: "_mA", si_suffix: "_A", num: 1.0, den: 1000.0 },
    SiRule { suffix: "_ms", si_suffix: "_s", num: 1.0, den: 1000.0 },
];

/// Número JSON; resultados enteros se emiten como enteros (`1200`, no `1200.0`).
pub fn number_value(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < 9.0e15 {
        Value::from(v as i64)
    } else {
        Value::from(v)
    }
}

/// Clave y valor en SI. Parámetros sin unidad o ya en SI pasan intactos.
pub fn to_si(key: &str, value: &Value) -> (String, Value) {
    let Some((stem, rule)) = SI_RULES.iter().find_map(|r| key.strip_suffix(r.suffix).map(|stem| (stem, r))) else {
        return (key.to_string(), value.clone());
    };
    let si_key = format!("{stem}{}", rule.si_suffix);
    let si_value = match value.as_f64() {
        Some(v) => number_value(v * rule.num / rule.den),
        None => value.clone(),
    };
    (si_key, si_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_rates_minutes_and_currents() {
        assert_eq!(to_si("scan_rate_mV_s", &json!(100.0)), ("scan_rate_V_s".into(), json!(0.1)));
        assert_eq!(to_si("duration_min", &json!(20.0)), ("duration_s".into(), json!(1200)));
        assert_eq!(to_si("current_mA", &json!(2.5)), ("current_A".into(), json!(0.0025)));
        assert_eq!(to_si("pulse_width_ms", &json!(50.0)), ("pulse_width_s".into(), json!(0.05)));
        assert_eq!(to_si("amplitude_mV", &json!(10.0)), ("amplitude_V".into(), json!(0.01)));
    }

    #[test]
    fn si_and_unitless_pass_through() {
        assert_eq!(to_si("vertex1_V", &json!(1.2)), ("vertex1_V".into(), json!(1.2)));
        assert_eq!(to_si("f_start_Hz", &json!(1e5)), ("f_start_Hz".into(), json!(1e5)));
        assert_eq!(to_si("cycles", &json!(3)), ("cycles".into(), json!(3)));
        assert_eq!(to_si("gas", &json!("N2")), ("gas".into(), json!("N2")));
    }

    #[test]
    fn null_keeps_derived_marker_under_si_key() {
        assert_eq!(to_si("dc_current_mA", &Value::Null), ("dc_current_A".into(), Value::Null));
    }
}
