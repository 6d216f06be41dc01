//! Edithra service
//!
//! [`EdithraService`] owns every component for the lifetime of the process. It
//! is built once at startup and shared with request handlers behind an `Arc`;
//! each component guards its own state, so handlers only need `&self`.

use sdk::errors::EngineError;
use serde::Serialize;
use serde_json::Value;

use crate::analyzers::Analyzers;
use crate::config::Config;
use crate::debugger::Debugger;
use crate::execution::{Optimizer, TaskExecutor};
use crate::learning::SelfLearning;
use crate::memory::{ExperienceStore, DEFAULT_USER};
use crate::task_queue::TaskQueue;
use crate::telemetry::AUDIT_TARGET;
use crate::websearch::{self, SearchProvider};

pub struct EdithraService {
    config: Config,
    memory: ExperienceStore,
    tasks: TaskQueue,
    analyzers: Analyzers,
    executor: TaskExecutor,
    optimizer: Optimizer,
    debugger: Debugger,
    learning: SelfLearning,
    search: Box<dyn SearchProvider>,
}

/// One check run by [`EdithraService::self_test`]
#[derive(Debug, Clone, Serialize)]
pub struct SelfTestCheck {
    pub name: &'static str,
    pub passed: bool,
    pub output: String,
}

impl EdithraService {
    /// Build the service with the search provider described by `config`
    pub fn new(config: Config) -> Result<Self, EngineError> {
        let search = websearch::from_config(&config.websearch)?;
        Self::with_search_provider(config, search)
    }

    /// Build the service with an explicit search provider
    pub fn with_search_provider(
        config: Config,
        search: Box<dyn SearchProvider>,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        tracing::info!(
            "Edithra service ready (mode={}, execution={:?}, search={})",
            config.core.ai_mode,
            config.execution.mode,
            search.name()
        );

        Ok(Self {
            executor: TaskExecutor::new(
                config.execution.mode,
                config.execution.max_concurrent,
                config.execution.max_tracked,
            ),
            optimizer: Optimizer::new(&config.optimizer),
            memory: ExperienceStore::new(),
            tasks: TaskQueue::new(),
            analyzers: Analyzers::new()?,
            debugger: Debugger::new()?,
            learning: SelfLearning::new(),
            search,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn memory(&self) -> &ExperienceStore {
        &self.memory
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    pub fn analyzers(&self) -> &Analyzers {
        &self.analyzers
    }

    pub fn executor(&self) -> &TaskExecutor {
        &self.executor
    }

    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    pub fn learning(&self) -> &SelfLearning {
        &self.learning
    }

    /// Echo an arbitrary request body
    pub fn process(&self, body: &Value) -> String {
        tracing::info!(target: AUDIT_TARGET, "API Received: {}", body);
        format!("Processing request: {}", body)
    }

    pub async fn web_search(&self, query: &str) -> Result<String, EngineError> {
        tracing::info!(target: AUDIT_TARGET, provider = self.search.name(), "Web search: {}", query);
        self.search.search(query).await
    }

    /// Smoke checks over memory, analysis, execution and optimization
    pub async fn self_test(&self) -> Vec<SelfTestCheck> {
        tracing::info!(target: AUDIT_TARGET, "Running AI System Tests");

        let memory = self
            .memory
            .store(DEFAULT_USER, Value::String("Testing AI Memory".to_string()))
            .await;
        let decision = self.analyzers.analyze_problem("Optimize Performance");
        let handle = self.executor.execute("Deploy System").await;
        let execution = handle.acknowledgement().to_string();
        let optimization = self.optimizer.self_optimize();

        let execution_finished = match handle.wait().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Self-test execution unit failed: {}", e);
                false
            }
        };

        vec![
            SelfTestCheck {
                name: "memory",
                passed: memory.contains("Memory Stored"),
                output: memory,
            },
            SelfTestCheck {
                name: "decision",
                passed: decision.contains("AI Analyzed"),
                output: decision,
            },
            SelfTestCheck {
                name: "execution",
                passed: execution_finished && execution.contains("Executing Task"),
                output: execution,
            },
            SelfTestCheck {
                name: "optimization",
                passed: optimization.contains("AI Self-Optimized"),
                output: optimization,
            },
        ]
    }
}
