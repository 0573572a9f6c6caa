//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`)
//! de la que se derivan las `GeneratorOptions` usadas por los binarios.
use echem_adapters::GeneratorOptions;
use once_cell::sync::Lazy;
use std::env;

/// Variables reconocidas.
pub const ENV_SANITIZE_MAX_LEN: &str = "ECHEMFLOW_SANITIZE_MAX_LEN";
pub const ENV_SDK_MODULE: &str = "ECHEMFLOW_SDK_MODULE";
pub const ENV_IR_SEGMENT: &str = "ECHEMFLOW_IR_SEGMENT";

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Parámetros de los generadores.
    pub output: OutputConfig,
}

/// Parámetros de salida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Máximo de caracteres del texto libre embebido en la salida.
    pub sanitize_max_len: usize,
    /// Módulo importado por el script SDK.
    pub sdk_module: String,
    /// Segmento único de la IR.
    pub ir_segment: String,
}

impl AppConfig {
    /// Construye la configuración a partir de un lector de variables.
    /// Valores ausentes, vacíos o no parseables caen al default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GeneratorOptions::default();
        let text = |key: &str, fallback: String| {
            lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).unwrap_or(fallback)
        };
        let max = lookup(ENV_SANITIZE_MAX_LEN)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_text_len);
        AppConfig {
            output: OutputConfig {
                sanitize_max_len: max,
                sdk_module: text(ENV_SDK_MODULE, defaults.sdk_module),
                ir_segment: text(ENV_IR_SEGMENT, defaults.ir_segment),
            },
        }
    }

    /// Lee el entorno del proceso (tras cargar `.env` si existe).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            max_text_len: self.output.sanitize_max_len,
            sdk_module: self.output.sdk_module.clone(),
            ir_segment: self.output.ir_segment.clone(),
        }
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let cfg = AppConfig::from_env();
    log::debug!("config loaded: {cfg:?}");
    cfg
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_matches_generator_defaults() {
        let cfg = AppConfig::from_lookup(|_| None);
        assert_eq!(cfg.generator_options(), GeneratorOptions::default());
    }

    #[test]
    fn overrides_are_read() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            (ENV_SANITIZE_MAX_LEN, "120"),
            (ENV_SDK_MODULE, "lab_sdk"),
            (ENV_IR_SEGMENT, " run "),
        ]));
        let opts = cfg.generator_options();
        assert_eq!(opts.max_text_len, 120);
        assert_eq!(opts.sdk_module, "lab_sdk");
        assert_eq!(opts.ir_segment, "run");
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            (ENV_SANITIZE_MAX_LEN, "lots"),
            (ENV_SDK_MODULE, "   "),
        ]));
        assert_eq!(cfg.output.sanitize_max_len, 500);
        assert_eq!(cfg.output.sdk_module, "faraday_sdk");
        let zero = AppConfig::from_lookup(lookup_from(&[(ENV_SANITIZE_MAX_LEN, "0")]));
        assert_eq!(zero.output.sanitize_max_len, 500);
    }
}
