//! Per (scope, environment) aggregation.

use tracing::{debug, warn};

use crate::normalizer::Normalizer;
use crate::scope::Scope;
use crate::substitutor::{unresolved_tokens, TokenSubstitutor};

/// Separator placed between fragments of one document.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Substituted, joined and normalized fragments of one scope for one
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedDocument {
    pub scope: String,
    pub environment: String,
    pub content: String,
    /// Number of fragments that went into the document.
    pub fragment_count: usize,
    /// Tokens left in the document because the environment has no such key.
    pub unresolved: Vec<String>,
}

/// Builds aggregated documents.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    normalizer: Normalizer,
}

impl Aggregator {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Aggregate `scope` for the environment behind `substitutor`.
    ///
    /// Returns `None` for an empty scope.
    pub fn aggregate(
        &self,
        scope: &Scope,
        substitutor: &TokenSubstitutor,
    ) -> Option<AggregatedDocument> {
        if scope.is_empty() {
            debug!(
                "Scope '{}' has no fragments, nothing to generate for '{}'",
                scope.name(),
                substitutor.environment()
            );
            return None;
        }

        let joined = scope
            .fragments()
            .iter()
            .map(|f| substitutor.substitute(&f.content))
            .collect::<Vec<_>>()
            .join(LINE_TERMINATOR);

        let content = self.normalizer.normalize(&joined);
        let unresolved = unresolved_tokens(&content);
        if !unresolved.is_empty() {
            warn!(
                "Unresolved tokens in scope '{}' for environment '{}': {}",
                scope.name(),
                substitutor.environment(),
                unresolved.join(", ")
            );
        }

        Some(AggregatedDocument {
            scope: scope.name().to_string(),
            environment: substitutor.environment().to_string(),
            content,
            fragment_count: scope.len(),
            unresolved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::TemplateFragment;
    use mqsc_config::Environment;

    fn substitutor(entries: &[(&str, &str)]) -> TokenSubstitutor {
        TokenSubstitutor::for_environment(&Environment::new("dev", entries.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_aggregate_substitutes_and_joins_in_order() {
        let scope = Scope::new(
            "release1",
            vec![
                TemplateFragment::new("a.mqsc", "DEFINE QLOCAL(${queue.name})"),
                TemplateFragment::new("b.mqsc", "DEFINE QREMOTE(${remote})"),
            ],
        );
        let doc = Aggregator::default()
            .aggregate(&scope, &substitutor(&[("queue.name", "DEV.QUEUE1"), ("remote", "DEV.R")]))
            .unwrap();

        assert_eq!(doc.scope, "release1");
        assert_eq!(doc.environment, "dev");
        assert_eq!(doc.fragment_count, 2);
        assert_eq!(doc.content, "DEFINE QLOCAL(DEV.QUEUE1)\r\nDEFINE QREMOTE(DEV.R)");
        assert!(doc.unresolved.is_empty());
    }

    #[test]
    fn test_blank_line_between_fragments_collapses() {
        let scope = Scope::new(
            "all",
            vec![
                TemplateFragment::new("a.mqsc", "DEFINE\tQLOCAL(A)\r\n"),
                TemplateFragment::new("b.mqsc", "DEFINE QLOCAL(B)\r\n"),
            ],
        );
        let doc = Aggregator::default().aggregate(&scope, &substitutor(&[])).unwrap();

        assert!(!doc.content.contains('\t'));
        assert!(!doc.content.contains("\r\n\r\n"));
        assert_eq!(doc.content, "DEFINEQLOCAL(A)\r\nDEFINE QLOCAL(B)\r\n");
    }

    #[test]
    fn test_unresolved_tokens_are_reported() {
        let scope = Scope::new("all", vec![TemplateFragment::new("a.mqsc", "ALTER QMGR DESCR('${missing}')")]);
        let doc = Aggregator::default().aggregate(&scope, &substitutor(&[("other", "x")])).unwrap();

        assert_eq!(doc.content, "ALTER QMGR DESCR('${missing}')");
        assert_eq!(doc.unresolved, vec!["missing".to_string()]);
    }

    #[test]
    fn test_empty_scope_produces_nothing() {
        let scope = Scope::new("release1", Vec::new());
        assert!(Aggregator::default().aggregate(&scope, &substitutor(&[("a", "1")])).is_none());
    }
}
