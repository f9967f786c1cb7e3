//! Keyword/link configuration store: maps keyword phrases to the slug of the
//! post the injector should link them to.
//!
//! The store is always passed explicitly to its collaborators (injector, CLI
//! handlers); there is no ambient global. Mutation happens through this API
//! only, and the JSON interchange format is the flat object
//! `{ "keyword": "target-slug", ... }` used by the operator subcommands.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use thiserror::Error;

/// Built-in mapping shipped with the binary; `reset_to_defaults` restores it.
const DEFAULT_KEYWORDS: &[(&str, &str)] = &[
    ("SEO", "what-is-seo"),
    ("seo audit", "technical-seo-audit-checklist"),
    ("technical SEO audit", "technical-seo-audit-checklist"),
    ("core web vitals", "core-web-vitals"),
    ("web design", "modern-web-design-trends"),
    ("brand identity", "brand-identity-guide"),
    ("content marketing", "content-marketing-strategy"),
    ("website redesign", "website-redesign-process"),
];

#[derive(Debug, Error)]
pub enum KeywordStoreError {
    #[error("failed to parse keyword document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("keyword phrases must not be blank")]
    BlankKeyword,
    #[error("target slug for `{keyword}` must not be blank")]
    BlankTarget { keyword: String },
    #[error("failed to read or write keyword file: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of `validate`: data-quality issues that never block rendering but
/// should be fixed by an operator.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct KeywordStore {
    entries: BTreeMap<String, String>,
}

impl KeywordStore {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut store = Self::empty();
        store.reset_to_defaults();
        store
    }

    pub fn add(&mut self, keyword: impl Into<String>, slug: impl Into<String>) {
        let keyword = keyword.into().trim().to_string();
        let slug = normalize_target(&slug.into());
        if keyword.is_empty() || slug.is_empty() {
            return;
        }
        self.entries.insert(keyword, slug);
    }

    pub fn remove(&mut self, keyword: &str) -> bool {
        self.entries.remove(keyword.trim()).is_some()
    }

    pub fn reset_to_defaults(&mut self) {
        self.entries = DEFAULT_KEYWORDS
            .iter()
            .map(|(keyword, slug)| (keyword.to_string(), slug.to_string()))
            .collect();
    }

    /// Entries in deterministic (lexicographic) order.
    pub fn list_all(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(keyword, slug)| (keyword.as_str(), slug.as_str()))
    }

    pub fn target_for(&self, keyword: &str) -> Option<&str> {
        self.entries.get(keyword).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flag keywords whose target slug does not resolve in the given catalog,
    /// and keywords that collide case-insensitively.
    pub fn validate(&self, catalog_slugs: &HashSet<String>) -> ValidationReport {
        let mut issues = Vec::new();

        for (keyword, slug) in &self.entries {
            if !catalog_slugs.contains(slug) {
                issues.push(format!(
                    "keyword `{keyword}` targets `{slug}`, which does not resolve in the catalog"
                ));
            }
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        for keyword in self.entries.keys() {
            let folded = keyword.to_lowercase();
            if let Some(first) = seen.get(folded.as_str()) {
                issues.push(format!(
                    "keyword `{keyword}` duplicates `{first}` (case-insensitive)"
                ));
            } else {
                seen.insert(folded, keyword);
            }
        }

        ValidationReport {
            valid: issues.is_empty(),
            issues,
        }
    }

    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the whole mapping from a JSON document. The import is atomic:
    /// any parse error or blank keyword/target rejects the document and leaves
    /// the store unchanged.
    pub fn import_json(&mut self, document: &str) -> Result<usize, KeywordStoreError> {
        let parsed: BTreeMap<String, String> = serde_json::from_str(document)?;

        let mut replacement = BTreeMap::new();
        for (keyword, target) in parsed {
            let keyword = keyword.trim().to_string();
            if keyword.is_empty() {
                return Err(KeywordStoreError::BlankKeyword);
            }
            let slug = normalize_target(&target);
            if slug.is_empty() {
                return Err(KeywordStoreError::BlankTarget { keyword });
            }
            replacement.insert(keyword, slug);
        }

        let count = replacement.len();
        self.entries = replacement;
        Ok(count)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, KeywordStoreError> {
        let document = std::fs::read_to_string(path)?;
        let mut store = Self::empty();
        store.import_json(&document)?;
        Ok(store)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), KeywordStoreError> {
        let mut document = self.export_json();
        document.push('\n');
        std::fs::write(path, document)?;
        Ok(())
    }
}

/// Accept both bare slugs and the legacy `/blogs/{slug}` form exported by the
/// old admin tool.
fn normalize_target(target: &str) -> String {
    let trimmed = target.trim();
    let trimmed = trimmed.strip_prefix("/blogs/").unwrap_or(trimmed);
    trimmed.trim_matches('/').to_string()
}
