use crate::escape::DEFAULT_MAX_TEXT_LEN;

/// Opciones de generación. `Default` reproduce la configuración por
/// defecto del entorno, de modo que las funciones sin `_with` son puras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Máximo de caracteres del texto libre embebido.
    pub max_text_len: usize,
    /// Módulo importado por el script SDK.
    pub sdk_module: String,
    /// Nombre del único segmento de la IR.
    pub ir_segment: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self { max_text_len: DEFAULT_MAX_TEXT_LEN, sdk_module: "faraday_sdk".into(), ir_segment: "main".into() }
    }
}

impl GeneratorOptions {
    pub(crate) fn clean(&self, text: &str) -> String {
        crate::escape::sanitize_text(Some(text), Some(self.max_text_len))
    }
}
