//! `${key}` token substitution.

use std::sync::OnceLock;

use aho_corasick::{AhoCorasick, MatchKind};
use mqsc_config::Environment;
use regex::Regex;

use crate::error::{TemplateError, TemplateResult};

/// Spell the token for `key`.
pub fn token_for(key: &str) -> String {
    format!("${{{}}}", key)
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").expect("token pattern is valid"))
}

/// Keys of the `${...}` tokens present in `text`, first occurrence first.
pub fn unresolved_tokens(text: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in token_pattern().captures_iter(text) {
        let key = &caps[1];
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// Replaces the tokens of one environment in a single pass.
///
/// All tokens are matched at once against the input text, so a value
/// that itself contains `${...}` is copied through untouched. Overlapping
/// candidates resolve to the longest token, which keeps the result
/// independent of key order.
#[derive(Debug, Clone)]
pub struct TokenSubstitutor {
    environment: String,
    matcher: Option<AhoCorasick>,
    values: Vec<String>,
}

impl TokenSubstitutor {
    /// Build the matcher for every key of `environment`.
    pub fn for_environment(environment: &Environment) -> TemplateResult<Self> {
        let name = environment.name().to_string();

        if environment.is_empty() {
            return Ok(Self {
                environment: name,
                matcher: None,
                values: Vec::new(),
            });
        }

        let tokens: Vec<String> = environment.keys().map(token_for).collect();
        let values: Vec<String> = environment
            .entries()
            .iter()
            .map(|(_, v)| v.clone())
            .collect();

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&tokens)
            .map_err(|e| TemplateError::Matcher {
                environment: name.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            environment: name,
            matcher: Some(matcher),
            values,
        })
    }

    /// Name of the environment this substitutor was built for.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn substitute(&self, text: &str) -> String {
        match &self.matcher {
            Some(matcher) => matcher.replace_all(text, &self.values),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn env(entries: &[(&str, &str)]) -> Environment {
        Environment::new("dev", entries.iter().copied())
    }

    #[test]
    fn test_substitute_tokens() {
        let sub = TokenSubstitutor::for_environment(&env(&[
            ("queue.name", "DEV.QUEUE1"),
            ("queue.depth", "5000"),
        ]))
        .unwrap();

        assert_eq!(
            sub.substitute("DEFINE QLOCAL(${queue.name}) MAXDEPTH(${queue.depth}) DESCR('${queue.name}')"),
            "DEFINE QLOCAL(DEV.QUEUE1) MAXDEPTH(5000) DESCR('DEV.QUEUE1')"
        );
        assert_eq!(sub.environment(), "dev");
    }

    #[test]
    fn test_unknown_tokens_are_left_alone() {
        let sub = TokenSubstitutor::for_environment(&env(&[("a", "1")])).unwrap();
        assert_eq!(sub.substitute("${a} ${b} $a {a}"), "1 ${b} $a {a}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let sub = TokenSubstitutor::for_environment(&env(&[("a", "${b}"), ("b", "${a}")])).unwrap();
        assert_eq!(sub.substitute("${a}-${b}"), "${b}-${a}");
    }

    #[test]
    fn test_empty_environment_returns_text() {
        let sub = TokenSubstitutor::for_environment(&Environment::new("empty", Vec::<(String, String)>::new())).unwrap();
        assert_eq!(sub.substitute("DEFINE QLOCAL(${q})"), "DEFINE QLOCAL(${q})");
    }

    #[test]
    fn test_unresolved_tokens() {
        assert_eq!(
            unresolved_tokens("${a} ${b.c} ${a} ${}"),
            vec!["a".to_string(), "b.c".to_string(), String::new()]
        );
        assert!(unresolved_tokens("no tokens here").is_empty());
    }

    proptest! {
        #[test]
        fn prop_token_free_text_is_unchanged(
            text in "[^$]{0,64}",
            entries in prop::collection::btree_map("[a-z.]{1,6}", "[A-Z0-9]{0,6}", 0..6),
        ) {
            let environment = Environment::new("dev", entries);
            let sub = TokenSubstitutor::for_environment(&environment).unwrap();
            prop_assert_eq!(sub.substitute(&text), text);
        }

        #[test]
        fn prop_key_order_is_not_observable(
            entries in prop::collection::btree_map("[a-z}]{1,4}", "[A-Z${}]{0,6}", 1..6),
            filler in "[a-z ${}]{0,12}",
        ) {
            let keys: Vec<&String> = entries.keys().collect();
            let text = keys
                .iter()
                .map(|k| format!("{}{}", token_for(k), filler))
                .collect::<String>();

            let forward = Environment::new("dev", entries.clone());
            let backward = Environment::new("dev", entries.clone().into_iter().rev());

            let a = TokenSubstitutor::for_environment(&forward).unwrap().substitute(&text);
            let b = TokenSubstitutor::for_environment(&backward).unwrap().substitute(&text);
            prop_assert_eq!(&a, &b);

            // Same inputs, same output.
            let again = TokenSubstitutor::for_environment(&forward).unwrap().substitute(&text);
            prop_assert_eq!(a, again);
        }
    }
}
