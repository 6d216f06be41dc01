//! Edithra SDK
//!
//! Shared library providing the error taxonomy and request types used by the
//! engine and the API server.

/// Error types and handling
pub mod errors;

/// Request body types
pub mod types;

// Re-export commonly used types
pub use errors::{EdithraErrorExt, EngineError};
pub use types::RequestBody;
