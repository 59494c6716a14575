pub mod emit;
pub mod generate;
pub mod manifest;
pub mod templates;

// Convenience re-exports (optional, but nice)
pub use generate::{run, GenerationReport, Generator, PlannedFile};
pub use manifest::{Declaration, Manifest, ReExports};
