//! Hashing y canonicalización JSON para provenance y fingerprints de linaje.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use hash::{hash_bytes, hash_str, hash_value};
