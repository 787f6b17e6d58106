use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// How a primary device name is normalized before the reference lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePolicy {
    /// Compare names verbatim
    Exact,
    /// Compare only the part before the first whitespace ("Laptop9 (Office)" -> "Laptop9")
    FirstToken,
}

impl NamePolicy {
    /// Apply the policy to a primary name
    pub fn normalize<'a>(&self, name: &'a str) -> &'a str {
        match self {
            NamePolicy::Exact => name,
            NamePolicy::FirstToken => name.split(char::is_whitespace).next().unwrap_or(name),
        }
    }
}

impl FromStr for NamePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(NamePolicy::Exact),
            "first-token" | "first_token" | "first-word" => Ok(NamePolicy::FirstToken),
            other => bail!("Unknown name policy '{}' (expected exact or first-token)", other),
        }
    }
}

impl fmt::Display for NamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePolicy::Exact => write!(f, "exact"),
            NamePolicy::FirstToken => write!(f, "first-token"),
        }
    }
}

/// Distinct device names used purely for membership testing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    names: HashSet<String>,
}

impl ReferenceSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome counts of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileSummary {
    pub rows: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub reference_names: usize,
}
