//! Environment configuration loading.
//!
//! The configuration document is parsed once and every environment subtree is
//! flattened into an ordered list of `(key, value)` pairs. No tree is kept
//! around after loading.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// A single deployment environment with its flattened substitution values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    name: String,
    entries: Vec<(String, String)>,
}

impl Environment {
    /// Create an environment from `(key, value)` pairs.
    ///
    /// When a key appears more than once, the first value is kept.
    pub fn new<K, V>(name: impl Into<String>, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| seen.insert(k.clone()))
            .collect();

        Self {
            name: name.into(),
            entries,
        }
    }

    /// Environment name, as declared in the configuration document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All keys and values, in document order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Look up the value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All environments declared in one configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSet {
    environments: Vec<Environment>,
}

impl EnvironmentSet {
    /// Load and flatten the configuration document at `path`.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        debug!("Loading environment configuration from {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let set = Self::parse(&content, path)?;
        info!(
            "Loaded {} environment(s) from {:?}: {}",
            set.len(),
            path,
            set.names().collect::<Vec<_>>().join(", ")
        );
        if set.is_empty() {
            warn!("No environments declared in {:?}", path);
        }

        Ok(set)
    }

    /// Parse a configuration document held in memory.
    ///
    /// `origin` is only used in error messages.
    pub fn parse(xml: &str, origin: impl Into<PathBuf>) -> ConfigResult<Self> {
        let mut flattener = Flattener::new(origin.into());
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => flattener.open(&e, false)?,
                Ok(Event::Empty(e)) => flattener.open(&e, true)?,
                Ok(Event::End(_)) => flattener.close(),
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| flattener.malformed(err.to_string()))?;
                    flattener.text(&text);
                }
                Ok(Event::CData(e)) => {
                    let bytes = e.into_inner();
                    flattener.text(&String::from_utf8_lossy(&bytes));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(flattener.malformed(format!(
                        "{} (at byte {})",
                        e,
                        reader.error_position()
                    )));
                }
            }
        }

        flattener.finish()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.environments.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.environments.iter().map(|e| e.name())
    }

    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name == name)
    }

    pub fn as_slice(&self) -> &[Environment] {
        &self.environments
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

/// Open element while walking the document.
struct Frame {
    name: String,
    text: String,
    has_children: bool,
}

/// Turns the event stream into flat environments.
///
/// Stack depth 1 is the document root, depth 2 an environment element, and
/// anything deeper contributes keys relative to its environment.
struct Flattener {
    origin: PathBuf,
    stack: Vec<Frame>,
    root_seen: bool,
    current: Vec<(String, String)>,
    environments: Vec<Environment>,
}

impl Flattener {
    fn new(origin: PathBuf) -> Self {
        Self {
            origin,
            stack: Vec::new(),
            root_seen: false,
            current: Vec::new(),
            environments: Vec::new(),
        }
    }

    fn malformed(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::Malformed {
            path: self.origin.clone(),
            message: message.into(),
        }
    }

    /// Dotted path of the innermost open element, relative to its environment.
    fn key_path(&self) -> String {
        self.stack
            .iter()
            .skip(2)
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    fn open(&mut self, element: &BytesStart<'_>, empty: bool) -> ConfigResult<()> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();

        if self.stack.is_empty() {
            if self.root_seen {
                return Err(self.malformed(format!("unexpected second root element <{}>", name)));
            }
            self.root_seen = true;
        } else if let Some(parent) = self.stack.last_mut() {
            parent.has_children = true;
        }

        self.stack.push(Frame {
            name,
            text: String::new(),
            has_children: false,
        });

        if self.stack.len() == 2 {
            let env_name = &self.stack[1].name;
            if self.environments.iter().any(|e| e.name() == env_name) {
                return Err(ConfigError::DuplicateEnvironment {
                    path: self.origin.clone(),
                    name: env_name.clone(),
                });
            }
            self.current.clear();
        }

        if self.stack.len() >= 2 {
            let path = self.key_path();
            for attr in element.attributes() {
                let attr = attr.map_err(|e| self.malformed(e.to_string()))?;
                let attr_name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr
                    .unescape_value()
                    .map_err(|e| self.malformed(e.to_string()))?;
                self.record(format!("{}[@{}]", path, attr_name), value.into_owned());
            }
        }

        if empty {
            self.close();
        }

        Ok(())
    }

    /// Add a key to the open environment. The first value of a key wins.
    fn record(&mut self, key: String, value: String) {
        if self.current.iter().any(|(k, _)| *k == key) {
            let env_name = self.stack.get(1).map(|f| f.name.as_str()).unwrap_or_default();
            warn!(
                "Key '{}' is declared more than once in environment '{}' of {:?}; keeping the first value",
                key, env_name, self.origin
            );
        }
        self.current.push((key, value));
    }

    fn text(&mut self, text: &str) {
        if self.stack.len() < 3 {
            return;
        }
        if let Some(frame) = self.stack.last_mut() {
            frame.text.push_str(text);
        }
    }

    fn close(&mut self) {
        let depth = self.stack.len();
        let key = self.key_path();

        let Some(frame) = self.stack.pop() else {
            return;
        };

        match depth {
            2 => {
                let entries = std::mem::take(&mut self.current);
                debug!("Flattened environment '{}' ({} keys)", frame.name, entries.len());
                self.environments.push(Environment::new(frame.name, entries));
            }
            d if d > 2 => {
                let value = frame.text.trim();
                if !value.is_empty() || !frame.has_children {
                    let value = value.to_string();
                    self.record(key, value);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> ConfigResult<EnvironmentSet> {
        if let Some(open) = self.stack.last() {
            return Err(self.malformed(format!("unclosed element <{}>", open.name)));
        }
        if !self.root_seen {
            return Err(self.malformed("document has no root element"));
        }

        Ok(EnvironmentSet {
            environments: self.environments,
        })
    }
}
