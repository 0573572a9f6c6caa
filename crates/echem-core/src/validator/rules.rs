//! Tabla declarativa de reglas por técnica.
//!
//! Cada regla es un dato: técnicas a las que aplica, disparador, código y
//! nivel. Un disparador sólo evalúa parámetros numéricos no nulos; un `null`
//! significa "derivar en tiempo de ejecución" y nunca produce un issue aquí.

use echem_domain::{IssueLevel, Step, ValidationIssue};

/// Extremo de un intervalo: `Open` excluye el límite, `Closed` lo incluye.
#[derive(Debug, Clone, Copy)]
pub enum Bound {
    Open(f64),
    Closed(f64),
}

impl Bound {
    fn below(&self, v: f64) -> bool {
        match *self {
            Bound::Open(b) => b < v,
            Bound::Closed(b) => b <= v,
        }
    }

    fn above(&self, v: f64) -> bool {
        match *self {
            Bound::Open(b) => v < b,
            Bound::Closed(b) => v <= b,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// `valor > límite`
    Above(&'static str, f64),
    /// `valor <= límite`
    AtMost(&'static str, f64),
    /// `valor < límite`
    Below(&'static str, f64),
    /// `low ⋚ valor ⋚ high`
    Within(&'static str, Bound, Bound),
    /// `|valor| > límite`; se revisan las claves en orden y dispara con la primera.
    AbsAbove(&'static [&'static str], f64),
    /// Ambos valores no nulos e iguales.
    Equal(&'static str, &'static str),
    /// Ambos valores no nulos y `a <= b`.
    NotGreater(&'static str, &'static str),
}

/// Resultado de un disparo: parámetro implicado y valor observado.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub key: &'static str,
    pub value: f64,
}

impl Trigger {
    pub fn fire(&self, step: &Step) -> Option<Hit> {
        let hit = |key: &'static str, pred: &dyn Fn(f64) -> bool| {
            step.param_f64(key).filter(|v| pred(*v)).map(|value| Hit { key, value })
        };
        match *self {
            Trigger::Above(key, limit) => hit(key, &|v: f64| v > limit),
            Trigger::AtMost(key, limit) => hit(key, &|v: f64| v <= limit),
            Trigger::Below(key, limit) => hit(key, &|v: f64| v < limit),
            Trigger::Within(key, low, high) => hit(key, &|v: f64| low.below(v) && high.above(v)),
            Trigger::AbsAbove(keys, limit) => keys.iter().find_map(|key| hit(*key, &|v: f64| v.abs() > limit)),
            Trigger::Equal(a, b) => match (step.param_f64(a), step.param_f64(b)) {
                (Some(x), Some(y)) if x == y => Some(Hit { key: b, value: y }),
                _ => None,
            },
            Trigger::NotGreater(a, b) => match (step.param_f64(a), step.param_f64(b)) {
                (Some(x), Some(y)) if x <= y => Some(Hit { key: a, value: x }),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParamRule {
    pub code: &'static str,
    pub level: IssueLevel,
    pub techniques: &'static [&'static str],
    pub trigger: Trigger,
    pub message: &'static str,
}

impl ParamRule {
    pub fn applies_to(&self, technique: &str) -> bool {
        self.techniques.contains(&technique)
    }

    pub fn check(&self, step: &Step) -> Option<ValidationIssue> {
        let hit = self.trigger.fire(step)?;
        let message = match self.trigger {
            Trigger::Equal(..) => self.message.to_string(),
            _ => format!("{} (got {})", self.message, hit.value),
        };
        Some(ValidationIssue::new(self.level, self.code, message).with_param(hit.key))
    }
}

const E: IssueLevel = IssueLevel::Error;
const W: IssueLevel = IssueLevel::Warning;

pub static PARAM_RULES: &[ParamRule] = &[
    ParamRule {
        code: "PV001",
        level: E,
        techniques: &["cv", "lsv"],
        trigger: Trigger::Above("scan_rate_mV_s", 10_000.0),
        message: "Scan rate exceeds the instrument ceiling of 10000 mV/s",
    },
    ParamRule {
        code: "PV002",
        level: E,
        techniques: &["cv", "lsv"],
        trigger: Trigger::Within("scan_rate_mV_s", Bound::Open(0.0), Bound::Open(0.1)),
        message: "Scan rate below 0.1 mV/s risks baseline drift",
    },
    ParamRule {
        code: "PV003",
        level: E,
        techniques: &["cv"],
        trigger: Trigger::Below("cycles", 1.0),
        message: "At least one cycle is required",
    },
    ParamRule {
        code: "PV004",
        level: E,
        techniques: &["cv"],
        trigger: Trigger::Equal("vertex1_V", "vertex2_V"),
        message: "Vertex 1 and vertex 2 must differ",
    },
    ParamRule {
        code: "PV005",
        level: E,
        techniques: &["eis"],
        trigger: Trigger::NotGreater("f_start_Hz", "f_end_Hz"),
        message: "Start frequency must exceed end frequency",
    },
    ParamRule {
        code: "PV006",
        level: E,
        techniques: &["eis"],
        trigger: Trigger::Above("f_start_Hz", 10_000_000.0),
        message: "Start frequency exceeds the 10 MHz ceiling",
    },
    ParamRule {
        code: "PV007",
        level: E,
        techniques: &["eis"],
        trigger: Trigger::Below("f_end_Hz", 0.000_001),
        message: "End frequency is below the 1 µHz floor",
    },
    ParamRule {
        code: "PV008",
        level: E,
        techniques: &["eis"],
        trigger: Trigger::AtMost("amplitude_mV", 0.0),
        message: "AC amplitude must be positive",
    },
    ParamRule {
        code: "PV009",
        level: E,
        techniques: &["eis"],
        trigger: Trigger::Above("amplitude_mV", 100.0),
        message: "AC amplitude above 100 mV violates small-signal linearity",
    },
    ParamRule {
        code: "PV010",
        level: E,
        techniques: &["ca"],
        trigger: Trigger::AbsAbove(&["potential_V"], 10.0),
        message: "Potential is outside the safe range of ±10 V",
    },
    ParamRule {
        code: "PV010",
        level: E,
        techniques: &["lsv"],
        trigger: Trigger::AbsAbove(&["start_V", "end_V"], 10.0),
        message: "Sweep potential is outside the safe range of ±10 V",
    },
    ParamRule {
        code: "PV011",
        level: E,
        techniques: &["ocp", "ca", "cp"],
        trigger: Trigger::AtMost("duration_s", 0.0),
        message: "Duration must be positive",
    },
    ParamRule {
        code: "PV011",
        level: E,
        techniques: &["purge"],
        trigger: Trigger::Below("duration_min", 1.0),
        message: "Purge must last at least 1 min",
    },
    ParamRule {
        code: "DR001",
        level: W,
        techniques: &["ca"],
        trigger: Trigger::AbsAbove(&["potential_V"], 2.5),
        message: "Potential may exceed the aqueous stability window",
    },
    ParamRule {
        code: "DR004",
        level: W,
        techniques: &["ocp"],
        trigger: Trigger::Within("duration_s", Bound::Open(0.0), Bound::Open(30.0)),
        message: "OCP shorter than 30 s gives insufficient equilibration",
    },
    ParamRule {
        code: "DR005",
        level: W,
        techniques: &["eis"],
        trigger: Trigger::Within("amplitude_mV", Bound::Open(10.0), Bound::Closed(100.0)),
        message: "AC amplitude above 10 mV risks nonlinear response",
    },
    ParamRule {
        code: "DR007",
        level: W,
        techniques: &["purge"],
        trigger: Trigger::Within("duration_min", Bound::Closed(1.0), Bound::Open(10.0)),
        message: "Purge shorter than 10 min may not saturate the electrolyte",
    },
    ParamRule {
        code: "DR009",
        level: W,
        techniques: &["cp"],
        trigger: Trigger::AbsAbove(&["current_mA"], 100.0),
        message: "Current above 100 mA; verify electrode current density",
    },
    ParamRule {
        code: "DR011",
        level: W,
        techniques: &["cv"],
        trigger: Trigger::Within("cycles", Bound::Closed(1.0), Bound::Open(3.0)),
        message: "Steady state usually needs at least 3 cycles",
    },
];

/// Reglas aplicables a una técnica, en orden de tabla.
pub fn rules_for(technique: &str) -> impl Iterator<Item = &'static ParamRule> + '_ {
    PARAM_RULES.iter().filter(move |r| r.applies_to(technique))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cv() -> Step {
        Step::new_default("cv").unwrap()
    }

    #[test]
    fn within_respects_open_and_closed_ends() {
        let t = Trigger::Within("cycles", Bound::Closed(1.0), Bound::Open(3.0));
        let mut s = cv();
        for (cycles, fires) in [(0, false), (1, true), (2, true), (3, false)] {
            s.params.insert("cycles".into(), json!(cycles));
            assert_eq!(t.fire(&s).is_some(), fires, "cycles={cycles}");
        }
    }

    #[test]
    fn null_operands_never_fire() {
        let mut s = cv();
        s.params.insert("vertex1_V".into(), json!(null));
        s.params.insert("vertex2_V".into(), json!(null));
        assert!(Trigger::Equal("vertex1_V", "vertex2_V").fire(&s).is_none());
    }

    #[test]
    fn abs_above_reports_first_offending_key() {
        let mut s = Step::new_default("lsv").unwrap();
        s.params.insert("start_V".into(), json!(-12.0));
        s.params.insert("end_V".into(), json!(15.0));
        let hit = Trigger::AbsAbove(&["start_V", "end_V"], 10.0).fire(&s).unwrap();
        assert_eq!(hit, Hit { key: "start_V", value: -12.0 });
    }

    #[test]
    fn every_rule_targets_catalog_parameters() {
        for rule in PARAM_RULES {
            for technique in rule.techniques {
                let def = echem_domain::catalog().lookup(technique).expect("technique");
                let keys: Vec<&str> = match rule.trigger {
                    Trigger::Above(k, _) | Trigger::AtMost(k, _) | Trigger::Below(k, _) | Trigger::Within(k, ..) => vec![k],
                    Trigger::AbsAbove(ks, _) => ks.to_vec(),
                    Trigger::Equal(a, b) | Trigger::NotGreater(a, b) => vec![a, b],
                };
                for k in keys {
                    assert!(def.parameter(k).is_some(), "{} -> {technique}.{k}", rule.code);
                }
            }
        }
    }
}
