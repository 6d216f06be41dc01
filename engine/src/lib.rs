//! Edithra Engine Library
//!
//! This library provides the components behind the Edithra HTTP service.
//! It is used by the API server binary and by integration tests.

/// Configuration management module
pub mod config;

/// Telemetry and Observability
pub mod telemetry;

/// Per-user experience store
pub mod memory;

/// Priority task queue
pub mod task_queue;

/// Keyword analyzers
pub mod analyzers;

/// Task execution and self-optimization
pub mod execution;

/// Error log and auto-fix
pub mod debugger;

/// Outcome tracking
pub mod learning;

/// Web search collaborator
pub mod websearch;

/// Service object owning all components
pub mod service;

pub use service::EdithraService;
