//! Issues de validación: datos listos para mostrar, nunca excepciones.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    /// Bloquea la ejecución del procedimiento.
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    /// `PV###` para errores de parámetros, `DR###` para buenas prácticas.
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_index: Option<usize>,
}

impl ValidationIssue {
    pub fn new(level: IssueLevel, code: &str, message: impl Into<String>) -> Self {
        Self { level, code: code.to_string(), message: message.into(), param: None, step_index: None }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::new(IssueLevel::Error, code, message)
    }

    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self::new(IssueLevel::Warning, code, message)
    }

    pub fn info(code: &str, message: impl Into<String>) -> Self {
        Self::new(IssueLevel::Info, code, message)
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    pub fn at_step(mut self, index: usize) -> Self {
        self.step_index = Some(index);
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}
