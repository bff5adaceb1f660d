//! # mqsc_core
//!
//! Generation engine for mqsc-gen.
//!
//! The [`Engine`] runs one batch: it loads the environment configuration,
//! discovers the template scopes, rebuilds the output tree and writes one
//! script per (scope, environment) pair.
//!
//! # Example
//!
//! ```rust,no_run
//! use mqsc_config::GeneratorSettings;
//! use mqsc_core::Engine;
//!
//! let settings = GeneratorSettings::default().resolve_against("/path/to/project");
//! let report = Engine::new(settings).run()?;
//! println!("{} script(s) generated", report.artifacts.len());
//! # Ok::<(), mqsc_core::EngineError>(())
//! ```

pub mod engine;
pub mod error;
pub mod report;

pub use engine::{Engine, EngineState, RunPlan};
pub use error::{EngineError, EngineResult};
pub use report::{Artifact, RunReport, ScopeSummary, WriteFailure};
