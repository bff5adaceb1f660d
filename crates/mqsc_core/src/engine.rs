//! Batch generation engine.
//!
//! A run moves through `Loading → ProcessingAll → ProcessingGroups → Done`.
//! A configuration error during loading ends the run in `Failed` before the
//! output tree is touched.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;
use mqsc_config::{EnvironmentSet, GeneratorSettings};
use mqsc_templates::{
    is_within, Aggregator, Normalizer, OutputWriter, Scope, TemplateFragment, TemplateLocator,
    TokenSubstitutor, ALL_SCOPE,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{EngineError, EngineResult};
use crate::report::{Artifact, RunReport, ScopeSummary, WriteFailure};

/// Engine run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Loading,
    ProcessingAll,
    ProcessingGroups,
    Done,
    Failed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::ProcessingAll => "processing-all",
            Self::ProcessingGroups => "processing-groups",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Inputs of a run, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub environments: EnvironmentSet,
    /// The `all` scope.
    pub all: Scope,
    /// One scope per release group, in discovery order.
    pub groups: Vec<Scope>,
    /// Fragments that could not be read.
    pub skipped_fragments: Vec<PathBuf>,
}

impl RunPlan {
    /// `all` followed by every group.
    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        std::iter::once(&self.all).chain(self.groups.iter())
    }
}

enum PairOutcome {
    Written(Artifact),
    Empty,
    Failed(WriteFailure),
}

/// Generates per-environment MQSC scripts.
pub struct Engine {
    settings: GeneratorSettings,
    aggregator: Aggregator,
    writer: OutputWriter,
}

impl Engine {
    pub fn new(settings: GeneratorSettings) -> Self {
        let aggregator = Aggregator::new(Normalizer::new(settings.whitespace));
        let writer = OutputWriter::new(&settings.output_dir, &settings.extension);
        Self {
            settings,
            aggregator,
            writer,
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Load the environments and discover every scope. Writes nothing.
    ///
    /// The output root is never searched for fragments, even when it lies
    /// inside the source root.
    pub fn plan(&self) -> EngineResult<RunPlan> {
        let environments = EnvironmentSet::load(&self.settings.environment_config)?;
        let locator = TemplateLocator::new(&self.settings.source_dir, &self.settings.extension)?
            .exclude(&self.settings.output_dir);

        let (all, failures) = Scope::load(ALL_SCOPE, locator.discover_all());
        let skipped_fragments = failures
            .into_iter()
            .filter_map(|e| match e {
                mqsc_templates::TemplateError::FragmentRead { path, .. } => Some(path),
                _ => None,
            })
            .collect();

        // Group scopes reuse the fragments already read for `all`.
        let by_path: HashMap<&Path, &TemplateFragment> = all
            .fragments()
            .iter()
            .map(|f| (f.path.as_path(), f))
            .collect();

        let mut groups = Vec::new();
        for group in locator.discover_groups() {
            if group == ALL_SCOPE {
                return Err(EngineError::ReservedGroupName {
                    name: group,
                    source_dir: self.settings.source_dir.clone(),
                });
            }
            let fragments = locator
                .discover_scope(&group)
                .iter()
                .filter_map(|p| by_path.get(p.as_path()).map(|f| (*f).clone()))
                .collect();
            groups.push(Scope::new(group, fragments));
        }

        Ok(RunPlan {
            environments,
            all,
            groups,
            skipped_fragments,
        })
    }

    /// Execute one full run.
    pub fn run(&self) -> EngineResult<RunReport> {
        let mut report = RunReport::new(Utc::now());
        info!("Starting MQSC generation ({})", report.state);

        let plan = match self.check_output_root().and_then(|_| self.plan()) {
            Ok(plan) => plan,
            Err(e) => {
                self.transition(&mut report, EngineState::Failed);
                error!("Generation aborted, no output written: {}", e);
                return Err(e);
            }
        };

        let substitutors = plan
            .environments
            .iter()
            .map(TokenSubstitutor::for_environment)
            .collect::<Result<Vec<_>, _>>()?;

        report.environments = plan.environments.names().map(String::from).collect();
        report.scopes = plan
            .scopes()
            .map(|s| ScopeSummary {
                name: s.name().to_string(),
                fragments: s.len(),
            })
            .collect();
        report.skipped_fragments = plan.skipped_fragments.clone();

        self.writer.clean().map_err(EngineError::Clean)?;

        self.transition(&mut report, EngineState::ProcessingAll);
        self.process_scope(&plan.all, &substitutors, &mut report);
        debug!("Processed MQSC files in all release directories");

        self.transition(&mut report, EngineState::ProcessingGroups);
        for group in &plan.groups {
            self.process_scope(group, &substitutors, &mut report);
            debug!("Processed MQSC files in release directory '{}'", group.name());
        }

        self.transition(&mut report, EngineState::Done);
        report.completed_at = Some(Utc::now());
        info!(
            "Generated {} script(s) for {} environment(s); {} fragment(s) skipped, {} write(s) failed",
            report.artifacts.len(),
            report.environments.len(),
            report.skipped_fragments.len(),
            report.failed_writes.len()
        );

        Ok(report)
    }

    fn transition(&self, report: &mut RunReport, next: EngineState) {
        debug!("Engine state {} -> {}", report.state, next);
        report.state = next;
    }

    /// Cleaning the output root must never remove an input.
    fn check_output_root(&self) -> EngineResult<()> {
        for input in [&self.settings.source_dir, &self.settings.environment_config] {
            if is_within(input, &self.settings.output_dir) {
                return Err(EngineError::UnsafeOutputRoot {
                    output: self.settings.output_dir.clone(),
                    input: input.clone(),
                });
            }
        }
        Ok(())
    }

    fn process_scope(&self, scope: &Scope, substitutors: &[TokenSubstitutor], report: &mut RunReport) {
        let outcomes: Vec<PairOutcome> = if self.settings.parallel {
            substitutors
                .par_iter()
                .map(|s| self.process_pair(scope, s))
                .collect()
        } else {
            substitutors
                .iter()
                .map(|s| self.process_pair(scope, s))
                .collect()
        };

        for outcome in outcomes {
            match outcome {
                PairOutcome::Written(artifact) => report.artifacts.push(artifact),
                PairOutcome::Failed(failure) => report.failed_writes.push(failure),
                PairOutcome::Empty => {}
            }
        }
    }

    fn process_pair(&self, scope: &Scope, substitutor: &TokenSubstitutor) -> PairOutcome {
        let Some(document) = self.aggregator.aggregate(scope, substitutor) else {
            return PairOutcome::Empty;
        };

        match self.writer.write(&document) {
            Ok(path) => PairOutcome::Written(Artifact {
                scope: document.scope,
                environment: document.environment,
                path,
                fragments: document.fragment_count,
                unresolved: document.unresolved,
            }),
            Err(e) => {
                error!(
                    "Skipping scope '{}' for environment '{}': {}",
                    document.scope, document.environment, e
                );
                PairOutcome::Failed(WriteFailure {
                    scope: document.scope,
                    environment: document.environment,
                    message: e.to_string(),
                })
            }
        }
    }
}
