//! Ordered catalog of detection rules.
//!
//! A catalog is an ordered list of `(category, pattern)` rules compiled once at
//! startup. Declaration order is evaluation order: the engine runs rule `i + 1`
//! on the output of rule `i`, so earlier rules shadow later ones on any span
//! they both match. The catalog is therefore a `Vec`, never a map.

use crate::error::{CatalogBuildError, Result};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::fmt;

/// Prefix of every placeholder written in place of a match.
pub const PLACEHOLDER_PREFIX: &str = "[REDACTED_";

/// The standard rule set, in evaluation order.
///
/// Order is part of the output contract. `credit_card` runs ahead of `ssn`
/// and `phone` so a card number is never split up by the looser numeric
/// patterns.
pub const STANDARD_RULES: &[(&str, &str)] = &[
    ("credit_card", r"\b(?:\d{4}[-\s]?){3}\d{4}\b"),
    ("ssn", r"\b\d{3}[-\s]?\d{2}[-\s]?\d{4}\b"),
    ("email", r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b"),
    ("phone", r"\b(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b"),
    ("ipv4", r"\b(?:\d{1,3}\.){3}\d{1,3}\b"),
    ("password", r#"\b[Pp]assword\s*[:=]\s*['"]?([^\s'"]{6,})['"]?"#),
    (
        "api_key",
        r#"\b[Aa][Pp][Ii][-_]?[Kk][Ee][Yy]\s*[:=]\s*['"]?([A-Za-z0-9_\-]{20,})['"]?"#,
    ),
    ("token", r#"\b[Tt]oken\s*[:=]\s*['"]?([A-Za-z0-9_\-]{20,})['"]?"#),
    ("aws_access_key", r"\b(AKIA[0-9A-Z]{16})\b"),
    (
        "private_key",
        r"-----BEGIN (?:RSA |EC |OPENSSH |DSA |ENCRYPTED )?PRIVATE KEY-----[\s\S]*?-----END (?:RSA |EC |OPENSSH |DSA |ENCRYPTED )?PRIVATE KEY-----",
    ),
    ("jwt", r"\beyJ[A-Za-z0-9_\-]*\.eyJ[A-Za-z0-9_\-]*\.[A-Za-z0-9_\-]*\b"),
    (
        "db_connection",
        r"\b(?:mysql|postgresql|postgres|mongodb|redis|mssql)://[^\s]+:[^\s]+@[^\s]+",
    ),
    ("secret", r#"\b[Ss]ecret\s*[:=]\s*['"]?([A-Za-z0-9_\-]{16,})['"]?"#),
];

/// Build the placeholder for a category: `[REDACTED_<CATEGORY>]`.
pub fn placeholder_for(category: &str) -> String {
    format!("{}{}]", PLACEHOLDER_PREFIX, category.to_ascii_uppercase())
}

/// A single named detection rule.
#[derive(Clone)]
pub struct DetectionRule {
    category: String,
    placeholder: String,
    matcher: Regex,
}

impl DetectionRule {
    fn compile(category: &str, pattern: &str, size_limit: Option<usize>) -> Result<Self> {
        if !is_valid_category(category) {
            return Err(CatalogBuildError::InvalidCategory {
                category: category.to_string(),
            });
        }

        let mut builder = RegexBuilder::new(pattern);
        if let Some(limit) = size_limit {
            builder.size_limit(limit);
        }
        let matcher = builder
            .build()
            .map_err(|source| CatalogBuildError::InvalidPattern {
                category: category.to_string(),
                source,
            })?;

        Ok(Self {
            category: category.to_string(),
            placeholder: placeholder_for(category),
            matcher,
        })
    }

    /// Category key as declared.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Replacement text written over every match.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The compiled matcher.
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Source text of the pattern.
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }
}

impl fmt::Debug for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionRule")
            .field("category", &self.category)
            .field("pattern", &self.matcher.as_str())
            .finish()
    }
}

fn is_valid_category(category: &str) -> bool {
    !category.is_empty()
        && category
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Immutable, ordered set of detection rules.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<DetectionRule>,
}

impl PatternCatalog {
    /// Compile an ordered list of `(category, pattern)` pairs.
    ///
    /// Fails on the first invalid rule; a catalog is never partially built.
    pub fn build<I, C, P>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, P)>,
        C: AsRef<str>,
        P: AsRef<str>,
    {
        CatalogBuilder::new().rules(pairs).build()
    }

    /// The standard catalog ([`STANDARD_RULES`]).
    pub fn standard() -> Result<Self> {
        CatalogBuilder::new().with_standard_rules().build()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the catalog holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, DetectionRule> {
        self.rules.iter()
    }

    /// Category keys in evaluation order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.category())
    }

    /// Look up a rule by category key.
    pub fn get(&self, category: &str) -> Option<&DetectionRule> {
        self.rules.iter().find(|r| r.category == category)
    }
}

impl<'a> IntoIterator for &'a PatternCatalog {
    type Item = &'a DetectionRule;
    type IntoIter = std::slice::Iter<'a, DetectionRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Builder that accumulates rule sources and compiles them in one step.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    sources: Vec<(String, String)>,
    size_limit: Option<usize>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the standard rules.
    pub fn with_standard_rules(mut self) -> Self {
        self.sources.extend(
            STANDARD_RULES
                .iter()
                .map(|(c, p)| ((*c).to_string(), (*p).to_string())),
        );
        self
    }

    /// Append one rule after everything added so far.
    pub fn rule(mut self, category: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.sources.push((category.into(), pattern.into()));
        self
    }

    /// Append several rules, keeping their order.
    pub fn rules<I, C, P>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, P)>,
        C: AsRef<str>,
        P: AsRef<str>,
    {
        self.sources.extend(
            pairs
                .into_iter()
                .map(|(c, p)| (c.as_ref().to_string(), p.as_ref().to_string())),
        );
        self
    }

    /// Cap the compiled size of each pattern, in bytes.
    pub fn size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = Some(bytes);
        self
    }

    /// Compile every rule.
    pub fn build(self) -> Result<PatternCatalog> {
        let mut seen = HashSet::with_capacity(self.sources.len());
        let mut rules = Vec::with_capacity(self.sources.len());

        for (category, pattern) in &self.sources {
            if !seen.insert(category.as_str()) {
                return Err(CatalogBuildError::DuplicateCategory {
                    category: category.clone(),
                });
            }
            rules.push(DetectionRule::compile(category, pattern, self.size_limit)?);
        }

        Ok(PatternCatalog { rules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_order() {
        let catalog = PatternCatalog::standard().unwrap();
        let categories: Vec<&str> = catalog.categories().collect();
        assert_eq!(
            categories,
            vec![
                "credit_card",
                "ssn",
                "email",
                "phone",
                "ipv4",
                "password",
                "api_key",
                "token",
                "aws_access_key",
                "private_key",
                "jwt",
                "db_connection",
                "secret",
            ]
        );
    }

    #[test]
    fn test_placeholder_format() {
        assert_eq!(placeholder_for("credit_card"), "[REDACTED_CREDIT_CARD]");
        assert_eq!(placeholder_for("aws_access_key"), "[REDACTED_AWS_ACCESS_KEY]");

        let catalog = PatternCatalog::standard().unwrap();
        assert_eq!(catalog.get("jwt").unwrap().placeholder(), "[REDACTED_JWT]");
    }

    #[test]
    fn test_invalid_pattern_names_category() {
        let err = PatternCatalog::build([("ok", r"\d+"), ("broken", r"(unclosed")]).unwrap_err();
        match &err {
            CatalogBuildError::InvalidPattern { category, .. } => {
                assert_eq!(category, "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let err = CatalogBuilder::new()
            .with_standard_rules()
            .rule("email", r"\S+@\S+")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogBuildError::DuplicateCategory { ref category } if category == "email"
        ));
    }

    #[test]
    fn test_invalid_category_key() {
        for bad in ["", "has space", "dash-ed", "[x]"] {
            let err = PatternCatalog::build([(bad, "x")]).unwrap_err();
            assert!(
                matches!(err, CatalogBuildError::InvalidCategory { .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_appended_rules_follow_standard() {
        let catalog = CatalogBuilder::new()
            .with_standard_rules()
            .rule("internal_id", r"\bINT-\d{8}\b")
            .build()
            .unwrap();
        assert_eq!(catalog.len(), STANDARD_RULES.len() + 1);
        assert_eq!(catalog.iter().last().unwrap().category(), "internal_id");
    }

    #[test]
    fn test_size_limit_rejects_oversized_pattern() {
        let err = CatalogBuilder::new()
            .rule("huge", r"\w{1000}")
            .size_limit(1024)
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogBuildError::InvalidPattern { .. }));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = PatternCatalog::build(Vec::<(&str, &str)>::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.get("email").is_none());
    }

    #[test]
    fn test_catalog_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PatternCatalog>();
    }
}
