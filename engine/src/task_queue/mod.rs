//! Priority Task Queue
//!
//! Tasks come out highest priority first. Among equal priorities the queue is
//! FIFO: each entry carries an insertion sequence number, and the heap orders
//! on `(priority, Reverse(seq))`.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tokio::sync::Mutex;

use crate::telemetry::AUDIT_TARGET;

/// Returned by [`TaskQueue::pop_next`] when the queue is empty
pub const NO_TASKS: &str = "No tasks available.";

/// Priority used when a request omits one
pub const DEFAULT_PRIORITY: i64 = 1;

/// A queued task as seen by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEntry {
    pub task: String,
    pub priority: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueuedTask {
    priority: i64,
    seq: u64,
    task: String,
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            // Lower sequence number wins on ties
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
struct QueueState {
    heap: BinaryHeap<QueuedTask>,
    next_seq: u64,
}

/// Shared priority queue of task labels
#[derive(Debug, Default)]
pub struct TaskQueue {
    state: Mutex<QueueState>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task and return the confirmation string
    pub async fn add(&self, task: impl Into<String>, priority: i64) -> String {
        let task = task.into();
        let confirmation = format!("Task Added: {} with priority {}", task, priority);
        {
            let mut state = self.state.lock().await;
            let seq = state.next_seq;
            state.next_seq += 1;
            state.heap.push(QueuedTask {
                priority,
                seq,
                task,
            });
        }

        tracing::info!(target: AUDIT_TARGET, "{}", confirmation);
        confirmation
    }

    /// Remove the highest-priority entry, if any
    pub async fn try_pop(&self) -> Option<TaskEntry> {
        let mut state = self.state.lock().await;
        state.heap.pop().map(|queued| TaskEntry {
            task: queued.task,
            priority: queued.priority,
        })
    }

    /// Remove and return the highest-priority label, or the [`NO_TASKS`] sentinel
    pub async fn pop_next(&self) -> String {
        match self.try_pop().await {
            Some(entry) => {
                tracing::info!(
                    target: AUDIT_TARGET,
                    priority = entry.priority,
                    "Next task: {}",
                    entry.task
                );
                entry.task
            }
            None => NO_TASKS.to_string(),
        }
    }

    /// Queued entries in the order they would be popped
    pub async fn pending(&self) -> Vec<TaskEntry> {
        let state = self.state.lock().await;
        let mut sorted = state.heap.clone().into_sorted_vec();
        sorted.reverse();
        sorted
            .into_iter()
            .map(|queued| TaskEntry {
                task: queued.task,
                priority: queued.priority,
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.heap.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.heap.is_empty()
    }
}
