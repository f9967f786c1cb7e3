//! Page metadata resolution for template heads.
//!
//! Remote posts may carry per-post SEO overrides; every field falls back to
//! catalog-level data so the templates always receive a complete `PageMeta`.

use serde_json::json;

use crate::domain::posts::Post;

const DEFAULT_ROBOTS: &str = "index, follow";

/// Site-wide identity used for titles, canonical URLs, and feeds.
#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Absolute origin the site is served from, no trailing slash required.
    pub public_site_url: String,
    pub site_name: String,
    pub tagline: String,
}

impl SiteContext {
    /// Absolute URL for a site-relative path.
    pub fn absolute_url(&self, path: &str) -> String {
        let base = self.public_site_url.trim_end_matches('/');
        if path == "/" || path.is_empty() {
            base.to_string()
        } else if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{base}{path}")
        }
    }
}

/// Fully resolved head metadata for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: Option<String>,
    pub robots: String,
}

pub fn resolve_post_meta(site: &SiteContext, post: &Post) -> PageMeta {
    let overrides = post.seo.as_ref();

    let title = overrides
        .and_then(|seo| seo.title.clone())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| format!("{} | {}", post.title, site.site_name));

    let description = overrides
        .and_then(|seo| seo.description.clone())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| {
            if post.excerpt.trim().is_empty() {
                site.tagline.clone()
            } else {
                post.excerpt.clone()
            }
        });

    let canonical = overrides
        .and_then(|seo| seo.canonical.clone())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| site.absolute_url(&format!("/blogs/{}", post.slug)));

    let og_image = overrides
        .and_then(|seo| seo.og_image.clone())
        .filter(|value| !value.trim().is_empty())
        .or_else(|| {
            let fallback = if post.detail_image.is_empty() {
                post.image.as_str()
            } else {
                post.detail_image.as_str()
            };
            (!fallback.is_empty()).then(|| site.absolute_url(fallback))
        });

    let robots = overrides
        .and_then(|seo| seo.robots.clone())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ROBOTS.to_string());

    PageMeta {
        og_title: title.clone(),
        og_description: description.clone(),
        title,
        description,
        canonical,
        og_image,
        robots,
    }
}

/// Metadata for the blog index. Page 1 is canonically `/blogs`; later pages
/// get their own canonical so paginated URLs do not compete.
pub fn resolve_index_meta(site: &SiteContext, page_number: usize) -> PageMeta {
    let (title, canonical) = if page_number <= 1 {
        (
            format!("Blog | {}", site.site_name),
            site.absolute_url("/blogs"),
        )
    } else {
        (
            format!("Blog, page {page_number} | {}", site.site_name),
            site.absolute_url(&format!("/blogs/page-{page_number}")),
        )
    };

    PageMeta {
        og_title: title.clone(),
        og_description: site.tagline.clone(),
        title,
        description: site.tagline.clone(),
        canonical,
        og_image: None,
        robots: DEFAULT_ROBOTS.to_string(),
    }
}

/// Article JSON-LD for the post detail head.
pub fn article_ld_json(site: &SiteContext, post: &Post, meta: &PageMeta) -> String {
    let mut article = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": post.title,
        "description": meta.description,
        "mainEntityOfPage": meta.canonical,
        "publisher": {
            "@type": "Organization",
            "name": site.site_name,
        },
    });

    if let Some(object) = article.as_object_mut() {
        if post.parsed_date().is_some() {
            object.insert("datePublished".to_string(), json!(post.date));
        }
        if let Some(image) = &meta.og_image {
            object.insert("image".to_string(), json!(image));
        }
    }

    article.to_string()
}
