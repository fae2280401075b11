//! Durable watermark storage for Beacon.
//!
//! A `WatermarkStore` owns the persisted cadence watermarks plus the two
//! installation-context strings (week of installation, referral). Reads
//! are atomic; `commit` writes all four watermark fields as one unit.
//! Two backends ship here: an in-memory store for tests and embedding,
//! and a single-file JSON store with atomic replace semantics.

pub mod conformance;
mod error;
mod json;
mod memory;
mod traits;

pub use error::StoreError;
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::WatermarkStore;
