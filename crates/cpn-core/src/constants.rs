//! Constantes del motor de binding.
//!
//! Valores estáticos que forman parte de los contratos externos (formato de
//! URIs plantilla, nombres reservados de la firma) o que participan en el
//! fingerprint del registro de linaje.

/// Marcador que una URI de salida `multi` debe contener. Cada writer generado
/// lo sustituye por su índice (0, 1, 2, ...).
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// Posiciones reservadas al inicio de la firma de un task (`ctx`, `role`).
/// Nunca se resuelven como parámetro ni como artifact.
pub const RESERVED_ARGUMENTS: [&str; 2] = ["ctx", "role"];

/// Esquema usado cuando una URI no declara `scheme://`.
pub const DEFAULT_SCHEME: &str = "file";

/// Versión lógica del formato de linaje. Entra en el fingerprint del registro.
pub const LINEAGE_VERSION: &str = "L1.0";
