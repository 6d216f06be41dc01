//! Keyword analyzers
//!
//! Each analyzer is an ordered [`RuleSet`]: a list of `(keyword, response)`
//! pairs plus a fallback. Keywords match as case-insensitive substrings and the
//! first matching rule wins, so rule order is part of the contract.
//!
//! # Example
//!
//! ```
//! use edithra_engine::analyzers::Analyzers;
//!
//! let analyzers = Analyzers::new().unwrap();
//! assert_eq!(analyzers.detect_language("Bonjour tout le monde"), "French");
//! assert_eq!(
//!     analyzers.suggest_api("Machine Learning pipeline"),
//!     "Recommended API: DeepSeek"
//! );
//! ```

use regex::Regex;
use sdk::errors::EngineError;

use crate::telemetry::AUDIT_TARGET;

pub const SENTIMENT_RULES: &[(&str, &str)] = &[
    (
        "angry",
        "I'm sorry you're feeling this way. Let me help make it right.",
    ),
    (
        "happy",
        "That's wonderful to hear! Let's keep the momentum going.",
    ),
];
pub const SENTIMENT_FALLBACK: &str = "I understand. Tell me more about how I can help.";

pub const LANGUAGE_RULES: &[(&str, &str)] = &[("hola", "Spanish"), ("bonjour", "French")];
pub const LANGUAGE_FALLBACK: &str = "English";

pub const CLOUD_RULES: &[(&str, &str)] = &[
    ("AI processing", "Recommended API: OpenAI"),
    ("Machine Learning", "Recommended API: DeepSeek"),
];
pub const CLOUD_FALLBACK: &str = "No external API required.";

pub const AUTO_FIX_RULES: &[(&str, &str)] = &[("failed", "AI attempted to fix the issue.")];
pub const AUTO_FIX_FALLBACK: &str = "No fix needed.";

/// A single keyword rule
#[derive(Debug, Clone)]
pub struct Rule {
    keyword: &'static str,
    pattern: Regex,
    response: &'static str,
}

impl Rule {
    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    pub fn response(&self) -> &'static str {
        self.response
    }
}

/// Ordered first-match-wins rule list with a fallback response
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: &'static str,
    rules: Vec<Rule>,
    fallback: &'static str,
}

impl RuleSet {
    /// Compile a rule set; keywords are matched literally, ignoring case
    pub fn new(
        name: &'static str,
        rules: &[(&'static str, &'static str)],
        fallback: &'static str,
    ) -> Result<Self, EngineError> {
        let rules = rules
            .iter()
            .map(|&(keyword, response)| {
                let pattern = Regex::new(&format!("(?i){}", regex::escape(keyword))).map_err(
                    |e| EngineError::Internal(format!("Invalid {} rule '{}': {}", name, keyword, e)),
                )?;
                Ok(Rule {
                    keyword,
                    pattern,
                    response,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Ok(Self {
            name,
            rules,
            fallback,
        })
    }

    /// Response of the first rule whose keyword occurs in `input`, else the fallback
    pub fn evaluate(&self, input: &str) -> &'static str {
        let matched = self.rules.iter().find(|rule| rule.pattern.is_match(input));
        let response = matched.map_or(self.fallback, |rule| rule.response);

        tracing::info!(
            target: AUDIT_TARGET,
            analyzer = self.name,
            keyword = matched.map(|rule| rule.keyword),
            "Analyzed input: {}",
            input
        );
        response
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> &'static str {
        self.fallback
    }
}

/// The keyword analyzers plus the canned problem/solution responders
#[derive(Debug, Clone)]
pub struct Analyzers {
    sentiment: RuleSet,
    language: RuleSet,
    cloud: RuleSet,
}

impl Analyzers {
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            sentiment: RuleSet::new("sentiment", SENTIMENT_RULES, SENTIMENT_FALLBACK)?,
            language: RuleSet::new("language", LANGUAGE_RULES, LANGUAGE_FALLBACK)?,
            cloud: RuleSet::new("cloud", CLOUD_RULES, CLOUD_FALLBACK)?,
        })
    }

    pub fn detect_emotion(&self, text: &str) -> &'static str {
        self.sentiment.evaluate(text)
    }

    pub fn detect_language(&self, text: &str) -> &'static str {
        self.language.evaluate(text)
    }

    pub fn suggest_api(&self, project_type: &str) -> &'static str {
        self.cloud.evaluate(project_type)
    }

    pub fn analyze_problem(&self, problem: &str) -> String {
        tracing::info!(target: AUDIT_TARGET, "AI Analyzing Problem: {}", problem);
        format!("AI Analyzed: {} with high confidence.", problem)
    }

    pub fn validate_solution(&self, solution: &str) -> String {
        tracing::info!(target: AUDIT_TARGET, "Validating Solution: {}", solution);
        format!("Solution '{}' validated successfully.", solution)
    }

    /// All rule sets, for enumeration
    pub fn rule_sets(&self) -> [&RuleSet; 3] {
        [&self.sentiment, &self.language, &self.cloud]
    }
}
