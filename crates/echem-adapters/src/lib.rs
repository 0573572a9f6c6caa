//! echem-adapters: salida y entrada de procedimientos.
//!
//! Este crate provee:
//! - `escape`: escapado por formato y saneado de texto libre.
//! - `units`: conversión a SI para la IR.
//! - `electrolyte`: interpretación heurística del electrolito.
//! - `generators`: YAML, script SDK, ECDL e IR.
//! - `import`: reconstrucción de steps desde YAML/ECDL o un documento de ingesta.
//!
//! Los generadores asumen que los steps ya pasaron por el validador de
//! `echem-core`; sólo se niegan a emitir steps con técnica desconocida.

pub mod electrolyte;
pub mod error;
pub mod escape;
pub mod generators;
pub mod import;
pub mod options;
pub mod units;

pub use error::{GenerateError, ImportError};
pub use escape::{escape_python, escape_yaml_like, sanitize_text};
pub use generators::{
    generate, generate_ecdl, generate_ir, generate_sdk, generate_yaml, OutputFormat, ProcedureGenerator,
};
pub use import::{import_ecdl, import_yaml, ingest_document, ImportReport};
pub use options::GeneratorOptions;
