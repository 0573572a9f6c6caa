//! Canonicalización de claves de parámetros.
//!
//! Internamente las claves llevan sufijo de unidad (`scan_rate_mV_s`). Los
//! formatos YAML y SDK usan la clave corta (`scan_rate`): se elimina un único
//! token de unidad final, nunca un token con significado propio como
//! `start`/`end` (`f_start_Hz` -> `f_start`).

use crate::parameter::ParameterKind;

/// Tokens de unidad reconocidos, del más largo al más corto para que
/// `_mV_s` gane sobre `_s`.
pub const UNIT_TOKENS: &[&str] = &["mV_s", "rpm", "min", "mV", "mA", "Hz", "ms", "V", "s"];

/// Clave corta de una clave con sufijo de unidad.
pub fn strip_unit_suffix(key: &str) -> &str {
    for token in UNIT_TOKENS {
        if let Some(stem) = key.strip_suffix(token).and_then(|s| s.strip_suffix('_')) {
            if !stem.is_empty() {
                return stem;
            }
        }
    }
    key
}

/// Clave de salida para YAML/SDK. Booleanos, textos y selects conservan su
/// clave nativa.
pub fn short_key(key: &str, kind: ParameterKind) -> &str {
    if kind.is_numeric() {
        strip_unit_suffix(key)
    } else {
        key
    }
}
