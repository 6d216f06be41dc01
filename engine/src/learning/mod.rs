//! Self-learning outcome tracker
//!
//! Remembers the latest success/failure outcome per task label and advises a
//! strategy change when the last recorded run failed.

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::telemetry::AUDIT_TARGET;

pub const ADJUST_STRATEGY: &str = "Adjusting execution strategy based on past failures.";
pub const NO_ADJUSTMENT: &str = "No adjustments needed.";

#[derive(Debug, Default)]
pub struct SelfLearning {
    outcomes: RwLock<HashMap<String, bool>>,
}

impl SelfLearning {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a task run, replacing any earlier one
    pub async fn track_performance(&self, task: &str, success: bool) -> String {
        self.outcomes.write().await.insert(task.to_string(), success);

        let message = format!("Learning from Task: {} - Success: {}", task, success);
        tracing::info!(target: AUDIT_TARGET, "{}", message);
        message
    }

    pub async fn improve_decision(&self, task: &str) -> &'static str {
        match self.outcomes.read().await.get(task) {
            Some(false) => ADJUST_STRATEGY,
            _ => NO_ADJUSTMENT,
        }
    }
}
