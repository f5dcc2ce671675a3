//! Grammar and spelling checks through a LanguageTool-style endpoint.
//!
//! This is an auxiliary check: it never fails the run. Any transport
//! or decoding problem, and the unconfigured case, degrade to a
//! [`GrammarOutcome::Skipped`] with the reason recorded in the report.

use serde::{Deserialize, Serialize};

use crate::images::Severity;
use crate::options::Options;

/// One grammar or spelling finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarFinding {
    pub message: String,
    pub rule_id: String,
    pub category: String,
    /// Byte offset of the flagged span in the checked text.
    pub offset: usize,
    pub length: usize,
    pub replacements: Vec<String>,
    pub severity: Severity,
}

/// Result of one grammar pass over a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrammarOutcome {
    Checked(Vec<GrammarFinding>),
    /// The check did not run; carries the reason.
    Skipped(String),
}

#[derive(Deserialize)]
struct WireResponse {
    matches: Vec<WireMatch>,
}

#[derive(Deserialize)]
struct WireMatch {
    message: String,
    rule: WireRule,
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<WireReplacement>,
}

#[derive(Deserialize)]
struct WireRule {
    id: String,
    category: WireCategory,
}

#[derive(Deserialize)]
struct WireCategory {
    name: String,
}

#[derive(Deserialize)]
struct WireReplacement {
    value: String,
}

/// Client for a LanguageTool-compatible `/v2/check` endpoint.
#[derive(Debug)]
pub struct GrammarClient {
    client: reqwest::Client,
    endpoint: Option<String>,
    language: String,
    downgrade_capitalized: bool,
}

impl GrammarClient {
    /// # Errors
    ///
    /// Returns [`crate::Error::Fetch`] when the HTTP client cannot be
    /// constructed.
    pub fn new(options: &Options) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.request_timeout)
            .build()
            .map_err(|err| crate::Error::Fetch {
                attempts: 0,
                message: format!("failed to build grammar client: {err}"),
            })?;
        Ok(Self {
            client,
            endpoint: options.grammar_endpoint.clone(),
            language: options.grammar_language.clone(),
            downgrade_capitalized: options.downgrade_capitalized_findings,
        })
    }

    /// Run the grammar check over `text`.
    ///
    /// Infallible by design for the caller: every failure mode maps to
    /// [`GrammarOutcome::Skipped`].
    pub async fn check(&self, text: &str) -> GrammarOutcome {
        let Some(endpoint) = &self.endpoint else {
            return GrammarOutcome::Skipped("no grammar endpoint configured".to_string());
        };
        if text.trim().is_empty() {
            return GrammarOutcome::Checked(Vec::new());
        }

        let form = [("text", text), ("language", self.language.as_str())];
        let response = match self.client.post(endpoint).form(&form).send().await {
            Ok(response) => response,
            Err(err) => {
                log::warn!("grammar check skipped: {err}");
                return GrammarOutcome::Skipped(format!("request failed: {err}"));
            }
        };
        if !response.status().is_success() {
            let status = response.status();
            log::warn!("grammar check skipped: endpoint returned {status}");
            return GrammarOutcome::Skipped(format!("endpoint returned {status}"));
        }
        let wire: WireResponse = match response.json().await {
            Ok(wire) => wire,
            Err(err) => {
                log::warn!("grammar check skipped: {err}");
                return GrammarOutcome::Skipped(format!("malformed response: {err}"));
            }
        };

        let findings = wire
            .matches
            .into_iter()
            .map(|m| self.finding_from_match(text, m))
            .collect();
        GrammarOutcome::Checked(findings)
    }

    fn finding_from_match(&self, text: &str, m: WireMatch) -> GrammarFinding {
        let severity = if self.downgrade_capitalized && span_starts_capitalized(text, m.offset) {
            // Likely a proper noun the checker's dictionary lacks.
            Severity::Low
        } else {
            Severity::Medium
        };
        GrammarFinding {
            message: m.message,
            rule_id: m.rule.id,
            category: m.rule.category.name,
            offset: m.offset,
            length: m.length,
            replacements: m.replacements.into_iter().map(|r| r.value).collect(),
            severity,
        }
    }
}

fn span_starts_capitalized(text: &str, offset: usize) -> bool {
    text.get(offset..)
        .and_then(|span| span.chars().next())
        .is_some_and(char::is_uppercase)
}
