//! Failure classification

use super::types::{ErrorCategory, ErrorRecord, ErrorSeverity, Failure, RequestContext};
use crate::utils::error::Result;
use crate::utils::generate_id;
use crate::utils::time::SharedClock;
use regex::{Regex, RegexBuilder};

/// Built-in message patterns, checked in order
pub const DEFAULT_CATEGORY_RULES: &[(&str, ErrorCategory)] = &[
    ("validation", ErrorCategory::Validation),
    ("auth", ErrorCategory::Authentication),
    ("permission|forbidden", ErrorCategory::Authorization),
    ("database|sql", ErrorCategory::Database),
    ("network|timeout", ErrorCategory::Network),
];

/// A message pattern mapped to a category
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pattern: Regex,
    category: ErrorCategory,
}

impl CategoryRule {
    /// Compile a case-insensitive rule
    pub fn new(pattern: &str, category: ErrorCategory) -> Result<Self> {
        Ok(Self {
            pattern: RegexBuilder::new(pattern).case_insensitive(true).build()?,
            category,
        })
    }

    pub fn matches(&self, message: &str) -> bool {
        self.pattern.is_match(message)
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Turns raw failures into [`ErrorRecord`]s
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    rules: Vec<CategoryRule>,
    clock: SharedClock,
}

impl ErrorClassifier {
    /// Classifier with the built-in rules
    pub fn new(clock: SharedClock) -> Self {
        let rules = DEFAULT_CATEGORY_RULES
            .iter()
            .filter_map(|(pattern, category)| CategoryRule::new(pattern, *category).ok())
            .collect();
        Self { rules, clock }
    }

    /// Classifier with an explicit rule list
    pub fn with_rules(rules: Vec<CategoryRule>, clock: SharedClock) -> Self {
        Self { rules, clock }
    }

    /// Append a rule after the existing ones
    pub fn add_rule(&mut self, pattern: &str, category: ErrorCategory) -> Result<()> {
        self.rules.push(CategoryRule::new(pattern, category)?);
        Ok(())
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// First matching rule wins; no match is `UNKNOWN`
    pub fn infer_category(&self, message: &str) -> ErrorCategory {
        self.rules
            .iter()
            .find(|rule| rule.matches(message))
            .map(CategoryRule::category)
            .unwrap_or(ErrorCategory::Unknown)
    }

    /// Build a record, inferring every taxonomy field the failure leaves empty
    pub fn classify(&self, failure: &Failure, ctx: &RequestContext) -> ErrorRecord {
        let timestamp = self.clock.now();
        let status_code = failure.status_code.unwrap_or(500);
        let severity = failure
            .severity
            .unwrap_or_else(|| ErrorSeverity::from_status(status_code));
        let category = failure
            .category
            .unwrap_or_else(|| self.infer_category(&failure.message));

        ErrorRecord {
            id: generate_id(timestamp),
            timestamp,
            message: failure.message.clone(),
            code: failure.code.clone(),
            status_code,
            severity,
            category,
            stack: failure.stack.clone(),
            context: failure.context.clone(),
            user_id: ctx.user_id.clone(),
            session_id: ctx.session_id.clone(),
            request_id: ctx.request_id.clone(),
            path: ctx.path.clone(),
            method: ctx.method.clone(),
            ip: ctx.ip.clone(),
            user_agent: ctx.user_agent.clone(),
            resolution: failure.resolution.clone(),
            retry_after_secs: failure.retry_after_secs,
            recovered: false,
        }
    }
}
