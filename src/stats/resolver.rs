//! Index Name Resolution
//!
//! Expands the index patterns of a `StatsRequest` into concrete names.
//!
//! ## Rules
//! - No patterns, `_all` or `*` select every known index.
//! - `*` inside a pattern is a wildcard; nothing else is special.
//! - A pattern starting with `-` (other than the first one) removes what it
//!   matches from the names selected so far.
//! - A concrete name that is not known fails the whole request.

use super::error::StatsError;
use super::request::{ResolvedIndices, StatsRequest};

use regex::Regex;
use std::collections::BTreeSet;

pub trait IndexResolver: Send + Sync {
    fn resolve(&self, request: &StatsRequest) -> Result<ResolvedIndices, StatsError>;
}

/// Resolves patterns against a fixed list of known index names.
pub struct PatternResolver {
    known: BTreeSet<String>,
}

impl PatternResolver {
    pub fn new<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: known.into_iter().map(Into::into).collect(),
        }
    }

    fn expand(&self, pattern: &str) -> Result<Vec<String>, StatsError> {
        if pattern == "_all" || pattern == "*" {
            return Ok(self.known.iter().cloned().collect());
        }

        if pattern.contains('*') {
            let regex = wildcard_regex(pattern)?;
            return Ok(self
                .known
                .iter()
                .filter(|name| regex.is_match(name))
                .cloned()
                .collect());
        }

        if self.known.contains(pattern) {
            Ok(vec![pattern.to_string()])
        } else {
            Err(StatsError::IndexNotFound(pattern.to_string()))
        }
    }
}

impl IndexResolver for PatternResolver {
    fn resolve(&self, request: &StatsRequest) -> Result<ResolvedIndices, StatsError> {
        let patterns = request.indices();

        if patterns.is_empty() {
            return Ok(self.known.iter().cloned().collect());
        }

        let mut selected = BTreeSet::new();

        for (position, pattern) in patterns.iter().enumerate() {
            if position > 0
                && let Some(excluded) = pattern.strip_prefix('-')
            {
                ensure_not_empty(pattern, excluded)?;
                // Excluding a name that does not exist is not an error.
                let matched = self.expand(excluded).unwrap_or_default();
                for name in matched {
                    selected.remove(&name);
                }
                continue;
            }

            ensure_not_empty(pattern, pattern)?;
            selected.extend(self.expand(pattern)?);
        }

        tracing::debug!(
            "Resolved {} pattern(s) to {} index name(s)",
            patterns.len(),
            selected.len()
        );

        Ok(selected.into_iter().collect())
    }
}

fn ensure_not_empty(pattern: &str, body: &str) -> Result<(), StatsError> {
    if body.is_empty() {
        return Err(StatsError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "empty index name".to_string(),
        });
    }
    Ok(())
}

fn wildcard_regex(pattern: &str) -> Result<Regex, StatsError> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    Regex::new(&format!("^{}$", body)).map_err(|e| StatsError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
