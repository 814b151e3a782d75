use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// A follow stats query as issued by a caller.
///
/// Holds index name patterns exactly as given. An empty list means "all
/// indices"; it is the resolver that turns this into concrete names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRequest {
    indices: Vec<String>,
}

impl StatsRequest {
    pub fn new<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indices: indices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a request from a comma separated list, as used in query strings.
    pub fn from_csv(csv: &str) -> Self {
        Self::new(
            csv.split(',')
                .map(str::trim)
                .filter(|pattern| !pattern.is_empty()),
        )
    }

    pub fn indices(&self) -> &[String] {
        &self.indices
    }
}

/// Concrete, deduplicated index names a query applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedIndices(BTreeSet<String>);

impl ResolvedIndices {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl FromIterator<String> for ResolvedIndices {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What an empty resolved index set selects.
///
/// Resolution already expands an empty *request* to every known index, so
/// an empty *resolved* set normally means the patterns matched nothing.
/// `MatchAll` exists for deployments where the known index list is not
/// maintained and an empty set should still report every follow task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelection {
    #[default]
    MatchNone,
    MatchAll,
}

impl FromStr for EmptySelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "match_none" => Ok(EmptySelection::MatchNone),
            "all" | "match_all" => Ok(EmptySelection::MatchAll),
            other => Err(format!("unknown empty selection '{}', expected none|all", other)),
        }
    }
}
