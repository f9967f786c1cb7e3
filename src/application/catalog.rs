//! Hybrid resolver over the static and remote post catalogs.
//!
//! Each request loads one immutable snapshot: the remote catalog is fetched,
//! concatenated with the in-memory static catalog in the configured priority
//! order, and all lookups run against that snapshot. A failed remote fetch
//! degrades to "remote catalog empty" and is logged, never surfaced.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::domain::posts::{self, Post};
use crate::infra::remote::RemoteCatalog;

/// Which catalog leads the concatenation. Upstream order within each catalog
/// is preserved; no cross-catalog sort is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOrder {
    #[default]
    RemoteFirst,
    StaticFirst,
}

/// A slug appearing more than once in the unified list. Lookup behaviour
/// stays first-match-wins; this diagnostic exists so operators notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCollision {
    pub slug: String,
    pub count: usize,
}

#[derive(Clone)]
pub struct CatalogService {
    static_posts: Vec<Post>,
    remote: Arc<dyn RemoteCatalog>,
    order: MergeOrder,
}

impl CatalogService {
    pub fn new(remote: Arc<dyn RemoteCatalog>, order: MergeOrder) -> Self {
        Self {
            static_posts: posts::static_catalog(),
            remote,
            order,
        }
    }

    /// Replace the built-in static catalog; used by tests that need a
    /// synthetic id layout.
    pub fn with_static_posts(mut self, static_posts: Vec<Post>) -> Self {
        self.static_posts = static_posts;
        self
    }

    /// Fetch the remote catalog and build the request-scoped snapshot.
    pub async fn load(&self) -> UnifiedCatalog {
        let remote_posts = match self.remote.fetch_posts().await {
            Ok(posts) => posts,
            Err(err) => {
                warn!(
                    target = "application::catalog",
                    error = %err,
                    "remote catalog fetch failed; serving static catalog only"
                );
                Vec::new()
            }
        };

        UnifiedCatalog::merge(remote_posts, self.static_posts.clone(), self.order)
    }
}

/// Immutable, request-scoped concatenation of both catalogs. All operations
/// are total over the list; a missing slug is `None`, never an error.
#[derive(Debug, Clone)]
pub struct UnifiedCatalog {
    posts: Vec<Post>,
}

impl UnifiedCatalog {
    pub fn merge(remote: Vec<Post>, static_posts: Vec<Post>, order: MergeOrder) -> Self {
        let mut posts = Vec::with_capacity(remote.len() + static_posts.len());
        match order {
            MergeOrder::RemoteFirst => {
                posts.extend(remote);
                posts.extend(static_posts);
            }
            MergeOrder::StaticFirst => {
                posts.extend(static_posts);
                posts.extend(remote);
            }
        }
        Self { posts }
    }

    pub fn list_all(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Linear scan, first match wins. With colliding slugs the earlier post in
    /// concatenation order shadows the later one (see `validate_unique_slugs`).
    pub fn get_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.slug == slug)
    }

    /// Up to `limit` posts whose slug differs from `slug`, in catalog order.
    /// No similarity scoring.
    pub fn get_related(&self, slug: &str, limit: usize) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|post| post.slug != slug)
            .take(limit)
            .collect()
    }

    pub fn slugs(&self) -> HashSet<String> {
        self.posts.iter().map(|post| post.slug.clone()).collect()
    }

    /// Every slug that appears more than once across the concatenated list.
    pub fn validate_unique_slugs(&self) -> Vec<SlugCollision> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for post in &self.posts {
            *counts.entry(post.slug.as_str()).or_default() += 1;
        }

        let mut collisions: Vec<SlugCollision> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(slug, count)| SlugCollision {
                slug: slug.to_string(),
                count,
            })
            .collect();
        collisions.sort_by(|a, b| a.slug.cmp(&b.slug));
        collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::PostContent;
    use crate::domain::rich_text::{Inline, RichTextBlock};

    fn static_post(id: u32, slug: &str) -> Post {
        Post {
            id,
            slug: slug.to_string(),
            title: format!("Static {slug}"),
            excerpt: String::new(),
            date: "2024-01-01".to_string(),
            category: "Test".to_string(),
            image: String::new(),
            detail_image: String::new(),
            content: PostContent::Markdown("Body.".to_string()),
            seo: None,
        }
    }

    fn remote_post(id: u32, slug: &str) -> Post {
        Post {
            content: PostContent::RichText(vec![RichTextBlock::Paragraph {
                children: vec![Inline::plain("Body.")],
            }]),
            ..static_post(id, slug)
        }
    }

    #[test]
    fn merge_concatenates_remote_first_by_default_order() {
        let catalog = UnifiedCatalog::merge(
            vec![remote_post(1, "r-one"), remote_post(2, "r-two")],
            vec![static_post(1, "s-one")],
            MergeOrder::RemoteFirst,
        );

        let slugs: Vec<&str> = catalog.list_all().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["r-one", "r-two", "s-one"]);
    }

    #[test]
    fn merge_respects_static_first() {
        let catalog = UnifiedCatalog::merge(
            vec![remote_post(1, "r-one")],
            vec![static_post(1, "s-one")],
            MergeOrder::StaticFirst,
        );

        let slugs: Vec<&str> = catalog.list_all().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["s-one", "r-one"]);
    }

    #[test]
    fn get_by_slug_resolves_every_post_and_misses_cleanly() {
        let catalog = UnifiedCatalog::merge(
            vec![remote_post(1, "r-one")],
            vec![static_post(1, "s-one"), static_post(2, "s-two")],
            MergeOrder::RemoteFirst,
        );

        for post in catalog.list_all() {
            let found = catalog.get_by_slug(&post.slug).expect("slug resolves");
            assert_eq!(found.slug, post.slug);
        }
        assert!(catalog.get_by_slug("nope").is_none());
    }

    #[test]
    fn colliding_slug_resolves_to_first_in_concatenation_order() {
        let catalog = UnifiedCatalog::merge(
            vec![remote_post(7, "shared")],
            vec![static_post(3, "shared")],
            MergeOrder::RemoteFirst,
        );

        let found = catalog.get_by_slug("shared").expect("resolves");
        assert_eq!(found.id, 7);

        let collisions = catalog.validate_unique_slugs();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].slug, "shared");
        assert_eq!(collisions[0].count, 2);
    }

    #[test]
    fn related_excludes_current_and_honors_limit() {
        let catalog = UnifiedCatalog::merge(
            vec![remote_post(1, "a"), remote_post(2, "b")],
            vec![static_post(1, "c"), static_post(2, "d")],
            MergeOrder::RemoteFirst,
        );

        let related = catalog.get_related("b", 2);
        assert_eq!(related.len(), 2);
        assert!(related.iter().all(|post| post.slug != "b"));
        assert_eq!(related[0].slug, "a");
        assert_eq!(related[1].slug, "c");

        let all_others = catalog.get_related("b", 10);
        assert_eq!(all_others.len(), 3);
    }

    #[test]
    fn unique_catalog_reports_no_collisions() {
        let catalog = UnifiedCatalog::merge(
            vec![remote_post(1, "a")],
            vec![static_post(1, "b")],
            MergeOrder::RemoteFirst,
        );
        assert!(catalog.validate_unique_slugs().is_empty());
    }
}
