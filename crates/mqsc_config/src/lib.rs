//! # mqsc_config
//!
//! Environment configuration and generator settings for mqsc-gen.
//!
//! The environment configuration is an XML document whose root element holds
//! one child element per deployment environment. Each environment subtree is
//! flattened once, at load time, into an ordered list of dotted keys and
//! their values:
//!
//! ```xml
//! <environments>
//!   <dev>
//!     <queue><name>DEV.QUEUE1</name></queue>
//!   </dev>
//! </environments>
//! ```
//!
//! yields an environment `dev` with the single entry `queue.name = DEV.QUEUE1`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mqsc_config::{EnvironmentSet, GeneratorSettings};
//!
//! let settings = GeneratorSettings::default();
//! let environments = EnvironmentSet::load(&settings.environment_config).unwrap();
//!
//! for env in environments.iter() {
//!     println!("{}: {} keys", env.name(), env.len());
//! }
//! ```

pub mod environment;
pub mod error;
pub mod settings;

pub use environment::{Environment, EnvironmentSet};
pub use error::{ConfigError, ConfigResult};
pub use settings::{GeneratorSettings, WhitespaceMode};
