//! Error log and auto-fix responder

use sdk::errors::EngineError;
use tokio::sync::Mutex;

use crate::analyzers::{RuleSet, AUTO_FIX_FALLBACK, AUTO_FIX_RULES};
use crate::telemetry::AUDIT_TARGET;

/// Collects reported errors and answers auto-fix requests
#[derive(Debug)]
pub struct Debugger {
    errors: Mutex<Vec<String>>,
    fixes: RuleSet,
}

impl Debugger {
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            errors: Mutex::new(Vec::new()),
            fixes: RuleSet::new("auto_fix", AUTO_FIX_RULES, AUTO_FIX_FALLBACK)?,
        })
    }

    /// Record a reported error
    pub async fn log_error(&self, error: &str) -> String {
        self.errors.lock().await.push(error.to_string());
        tracing::error!(target: AUDIT_TARGET, "AI Debugging: {}", error);
        format!("Error Logged: {}", error)
    }

    /// Canned fix response for a task description
    pub fn auto_fix(&self, task: &str) -> &'static str {
        self.fixes.evaluate(task)
    }

    /// Snapshot of reported errors, oldest first
    pub async fn errors(&self) -> Vec<String> {
        self.errors.lock().await.clone()
    }
}
