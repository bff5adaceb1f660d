//! # mqsc_templates
//!
//! Template handling for mqsc-gen.
//!
//! This crate turns a tree of MQSC template fragments into per-environment
//! scripts:
//!
//! - [`TemplateLocator`] discovers fragments and release groups
//! - [`Scope`] holds the fragments of `all` or of one release group
//! - [`TokenSubstitutor`] replaces `${key}` tokens with environment values
//! - [`Normalizer`] strips constructs the MQSC format does not accept
//! - [`Aggregator`] joins the substituted fragments of a scope
//! - [`OutputWriter`] persists the result under the output root
//!
//! ## Example
//!
//! ```rust,no_run
//! use mqsc_config::EnvironmentSet;
//! use mqsc_templates::{Aggregator, OutputWriter, Scope, TemplateLocator, TokenSubstitutor};
//!
//! let environments = EnvironmentSet::load("src/main/resources/mq_env_config.xml").unwrap();
//! let locator = TemplateLocator::new("src/main/resources", "mqsc").unwrap();
//! let (scope, _failures) = Scope::load("all", locator.discover_all());
//!
//! let aggregator = Aggregator::default();
//! let writer = OutputWriter::new("target/generated_mqsc", "mqsc");
//! writer.clean().unwrap();
//!
//! for env in environments.iter() {
//!     let substitutor = TokenSubstitutor::for_environment(env).unwrap();
//!     if let Some(document) = aggregator.aggregate(&scope, &substitutor) {
//!         writer.write(&document).unwrap();
//!     }
//! }
//! ```

pub mod aggregator;
pub mod error;
pub mod locator;
pub mod normalizer;
pub mod paths;
pub mod scope;
pub mod substitutor;
pub mod writer;

pub use aggregator::{AggregatedDocument, Aggregator, LINE_TERMINATOR};
pub use error::{TemplateError, TemplateResult};
pub use locator::TemplateLocator;
pub use normalizer::Normalizer;
pub use paths::{is_within, normalize_path};
pub use scope::{Scope, TemplateFragment, ALL_SCOPE};
pub use substitutor::{token_for, unresolved_tokens, TokenSubstitutor};
pub use writer::OutputWriter;
