//! echem-core: validación de procedimientos y hashing determinista.
pub mod constants;
pub mod hashing;
pub mod validator;

pub use hashing::procedure_fingerprint;
pub use validator::{
    is_valid, summarize_issues, validate_all, validate_procedure, validate_step, IssueSummary,
};
