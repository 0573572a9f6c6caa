//! Constantes de formato.
//!
//! Las versiones viajan dentro de los documentos generados. `FINGERPRINT_SCHEMA`
//! forma parte del input del hashing: cambiarla invalida todos los
//! fingerprints previos aunque el procedimiento no cambie.

/// Versión del export ECDL (JSON para ML).
pub const ECDL_VERSION: &str = "1.0.0";

/// Versión de la representación intermedia normalizada a SI.
pub const IR_VERSION: &str = "1.0";

/// Esquema lógico del fingerprint de procedimiento.
pub const FINGERPRINT_SCHEMA: &str = "procedure-fp/1";
