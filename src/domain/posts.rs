mod data;

use serde::{Deserialize, Serialize};
use time::{Date, format_description::FormatItem, macros::format_description};

use crate::domain::rich_text::RichTextBlock;

pub use data::STATIC_POSTS;

pub const ISO_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// Which catalog a post came from. Every post belongs to exactly one source;
/// the two catalogs are concatenated, never merged field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Static,
    Remote,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Static => "static",
            Source::Remote => "remote",
        }
    }
}

/// Post body, tagged by origin: the static catalog ships Markdown strings,
/// the remote catalog delivers a structured rich-text tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PostContent {
    Markdown(String),
    RichText(Vec<RichTextBlock>),
}

/// Per-post SEO overrides, only ever present on remote posts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoOverrides {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub robots: Option<String>,
}

/// Unified post shape consumed by the UI. `id` is unique only within its
/// source catalog and is used for ordering and pagination math, never as a
/// global key; `slug` is the cross-catalog identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: u32,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub category: String,
    pub image: String,
    pub detail_image: String,
    pub content: PostContent,
    pub seo: Option<SeoOverrides>,
}

impl Post {
    pub fn source(&self) -> Source {
        match self.content {
            PostContent::Markdown(_) => Source::Static,
            PostContent::RichText(_) => Source::Remote,
        }
    }

    /// Parse the ISO-ish date string. Dates that fail to parse are tolerated;
    /// callers fall back to omitting date-derived output (feed timestamps,
    /// sitemap lastmod) rather than erroring.
    pub fn parsed_date(&self) -> Option<Date> {
        Date::parse(self.date.trim(), ISO_DATE_FORMAT).ok()
    }

    pub fn human_date(&self) -> String {
        self.parsed_date()
            .and_then(|date| date.format(HUMAN_DATE_FORMAT).ok())
            .unwrap_or_else(|| self.date.clone())
    }
}

/// Hard-coded post shipped with the binary. Ids are dense and contiguous
/// starting at 1; the legacy ID-range pagination depends on that.
pub struct StaticPost {
    pub id: u32,
    pub slug: &'static str,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub date: &'static str,
    pub category: &'static str,
    pub image: &'static str,
    pub detail_image: &'static str,
    pub body: &'static str,
}

impl StaticPost {
    pub fn to_post(&self) -> Post {
        Post {
            id: self.id,
            slug: self.slug.to_string(),
            title: self.title.to_string(),
            excerpt: self.excerpt.to_string(),
            date: self.date.to_string(),
            category: self.category.to_string(),
            image: self.image.to_string(),
            detail_image: self.detail_image.to_string(),
            content: PostContent::Markdown(self.body.to_string()),
            seo: None,
        }
    }
}

/// Materialise the static catalog in upstream order (ascending id).
pub fn static_catalog() -> Vec<Post> {
    STATIC_POSTS.iter().map(StaticPost::to_post).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_ids_are_dense_and_contiguous_from_one() {
        for (index, post) in STATIC_POSTS.iter().enumerate() {
            assert_eq!(post.id as usize, index + 1, "gap at {}", post.slug);
        }
    }

    #[test]
    fn static_slugs_are_unique() {
        let mut slugs: Vec<&str> = STATIC_POSTS.iter().map(|post| post.slug).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), STATIC_POSTS.len());
    }

    #[test]
    fn static_dates_parse_as_iso() {
        for post in STATIC_POSTS.iter() {
            let post = post.to_post();
            assert!(post.parsed_date().is_some(), "bad date on {}", post.slug);
        }
    }

    #[test]
    fn source_follows_content_variant() {
        let post = STATIC_POSTS[0].to_post();
        assert_eq!(post.source(), Source::Static);

        let remote = Post {
            content: PostContent::RichText(Vec::new()),
            ..post
        };
        assert_eq!(remote.source(), Source::Remote);
    }

    #[test]
    fn human_date_falls_back_to_raw_string() {
        let mut post = STATIC_POSTS[0].to_post();
        post.date = "sometime in 2024".to_string();
        assert_eq!(post.human_date(), "sometime in 2024");
    }
}
