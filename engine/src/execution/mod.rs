//! Task execution stub and self-optimization counter
//!
//! [`TaskExecutor::execute`] acknowledges immediately and runs the task unit on
//! the tokio runtime. The unit itself only writes the completion audit line.
//!
//! In [`ExecutionMode::Tracked`] every launch is recorded in a registry that can
//! be polled by id, and the returned [`ExecutionHandle`] can be awaited. The
//! registry keeps at most `max_tracked` records; past that the oldest completed
//! ones are evicted. In [`ExecutionMode::Detached`] nothing is recorded and the
//! handle carries no join handle.
//!
//! Either way a semaphore bounds how many units are in flight. The permit is
//! taken before the unit is spawned, so a saturated executor makes callers wait
//! instead of piling up spawned tasks.

use sdk::errors::EngineError;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::{ExecutionMode, OptimizerConfig};
use crate::telemetry::AUDIT_TARGET;

/// Lifecycle of a tracked execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Waiting for a concurrency permit
    Queued,
    Running,
    Completed,
}

/// A tracked execution as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRecord {
    pub id: String,
    pub task: String,
    pub status: ExecutionStatus,
}

/// Tracked records in launch order, capped at `max_tracked`
#[derive(Debug)]
struct Registry {
    records: HashMap<String, ExecutionRecord>,
    order: VecDeque<String>,
    max_tracked: usize,
}

impl Registry {
    fn new(max_tracked: usize) -> Self {
        Self {
            records: HashMap::new(),
            order: VecDeque::new(),
            max_tracked: max_tracked.max(1),
        }
    }

    fn insert(&mut self, record: ExecutionRecord) {
        self.order.push_back(record.id.clone());
        self.records.insert(record.id.clone(), record);
        self.evict_completed();
    }

    fn set_status(&mut self, id: &str, status: ExecutionStatus) {
        if let Some(record) = self.records.get_mut(id) {
            record.status = status;
        }
        if status == ExecutionStatus::Completed {
            self.evict_completed();
        }
    }

    /// Drop the oldest completed records until the cap holds. Queued and
    /// running records are never dropped, so the map may sit above the cap
    /// while they are in flight.
    fn evict_completed(&mut self) {
        while self.records.len() > self.max_tracked {
            let records = &self.records;
            let Some(pos) = self.order.iter().position(|id| {
                records
                    .get(id)
                    .map_or(true, |r| r.status == ExecutionStatus::Completed)
            }) else {
                break;
            };
            if let Some(id) = self.order.remove(pos) {
                self.records.remove(&id);
            }
        }
    }
}

type SharedRegistry = Arc<Mutex<Registry>>;

/// Handle returned for every launched task
#[derive(Debug)]
pub struct ExecutionHandle {
    id: String,
    acknowledgement: String,
    join: Option<JoinHandle<()>>,
}

impl ExecutionHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The string returned to the caller right away
    pub fn acknowledgement(&self) -> &str {
        &self.acknowledgement
    }

    /// Whether [`ExecutionHandle::wait`] can observe completion
    pub fn is_awaitable(&self) -> bool {
        self.join.is_some()
    }

    /// Wait for the unit to finish; returns immediately for detached launches
    pub async fn wait(self) -> Result<(), EngineError> {
        match self.join {
            Some(join) => join
                .await
                .map_err(|e| EngineError::Internal(format!("Task unit {} failed: {}", self.id, e))),
            None => Ok(()),
        }
    }
}

/// Launches task units and tracks their status
#[derive(Debug)]
pub struct TaskExecutor {
    mode: ExecutionMode,
    permits: Arc<Semaphore>,
    registry: SharedRegistry,
}

impl TaskExecutor {
    pub fn new(mode: ExecutionMode, max_concurrent: usize, max_tracked: usize) -> Self {
        Self {
            mode,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            registry: Arc::new(Mutex::new(Registry::new(max_tracked))),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Acknowledge `task` and launch its unit in the background
    ///
    /// Waits for a concurrency permit first when `max_concurrent` units are
    /// already in flight.
    pub async fn execute(&self, task: &str) -> ExecutionHandle {
        let id = Uuid::new_v4().to_string();
        tracing::info!(target: AUDIT_TARGET, execution_id = %id, "Executing Task: {}", task);

        let tracked = self.mode == ExecutionMode::Tracked;
        if tracked {
            self.registry.lock().await.insert(ExecutionRecord {
                id: id.clone(),
                task: task.to_string(),
                status: ExecutionStatus::Queued,
            });
        }

        let permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(_) => {
                tracing::warn!(execution_id = %id, "Executor closed before task {} started", task);
                None
            }
        };

        let join = tokio::spawn(run_unit(
            id.clone(),
            task.to_string(),
            permit,
            tracked.then(|| Arc::clone(&self.registry)),
        ));

        ExecutionHandle {
            id,
            acknowledgement: format!("Executing Task: {} in parallel.", task),
            join: tracked.then_some(join),
        }
    }

    /// Current status of a tracked execution
    pub async fn status(&self, id: &str) -> Result<ExecutionRecord, EngineError> {
        self.registry
            .lock()
            .await
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("Execution '{}'", id)))
    }

    /// Number of tracked executions
    pub async fn tracked_count(&self) -> usize {
        self.registry.lock().await.records.len()
    }
}

async fn run_unit(
    id: String,
    task: String,
    permit: Option<OwnedSemaphorePermit>,
    registry: Option<SharedRegistry>,
) {
    let Some(_permit) = permit else {
        return;
    };

    set_status(registry.as_ref(), &id, ExecutionStatus::Running).await;
    tracing::info!(target: AUDIT_TARGET, execution_id = %id, "Task {} completed successfully.", task);
    set_status(registry.as_ref(), &id, ExecutionStatus::Completed).await;
}

async fn set_status(registry: Option<&SharedRegistry>, id: &str, status: ExecutionStatus) {
    if let Some(registry) = registry {
        registry.lock().await.set_status(id, status);
    }
}

/// Capped self-optimization counter
#[derive(Debug)]
pub struct Optimizer {
    level: AtomicU32,
    step: u32,
    max_level: u32,
}

impl Optimizer {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            level: AtomicU32::new(config.initial_level.min(config.max_level)),
            step: config.step,
            max_level: config.max_level,
        }
    }

    pub fn level(&self) -> u32 {
        self.level.load(Ordering::SeqCst)
    }

    /// Raise the level by one step, capped at the maximum
    pub fn self_optimize(&self) -> String {
        let (step, max) = (self.step, self.max_level);
        let previous = match self.level.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
            Some(cur.saturating_add(step).min(max))
        }) {
            Ok(prev) | Err(prev) => prev,
        };
        let level = previous.saturating_add(step).min(max);

        let message = format!("AI Self-Optimized - Current Efficiency: {}%", level);
        tracing::info!(target: AUDIT_TARGET, "{}", message);
        message
    }
}
