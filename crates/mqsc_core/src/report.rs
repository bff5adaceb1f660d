//! Run summaries.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::EngineState;

/// A script written during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub scope: String,
    pub environment: String,
    pub path: PathBuf,
    pub fragments: usize,
    /// Tokens the environment could not resolve
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

/// A script that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub scope: String,
    pub environment: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeSummary {
    pub name: String,
    pub fragments: usize,
}

/// Outcome of one engine run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub state: EngineState,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub environments: Vec<String>,
    pub scopes: Vec<ScopeSummary>,
    pub artifacts: Vec<Artifact>,
    pub skipped_fragments: Vec<PathBuf>,
    pub failed_writes: Vec<WriteFailure>,
}

impl RunReport {
    pub(crate) fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            state: EngineState::Loading,
            started_at,
            completed_at: None,
            environments: Vec::new(),
            scopes: Vec::new(),
            artifacts: Vec::new(),
            skipped_fragments: Vec::new(),
            failed_writes: Vec::new(),
        }
    }

    /// True when no fragment was skipped and every write succeeded.
    pub fn is_clean(&self) -> bool {
        self.skipped_fragments.is_empty() && self.failed_writes.is_empty()
    }

    /// Artifacts written for one scope, in environment order.
    pub fn artifacts_for_scope<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = &'a Artifact> {
        self.artifacts.iter().filter(move |a| a.scope == scope)
    }
}
