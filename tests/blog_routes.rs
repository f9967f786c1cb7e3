use std::{num::NonZeroUsize, sync::Arc};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use vetrina::application::catalog::{CatalogService, MergeOrder};
use vetrina::application::pagination::PageScheme;
use vetrina::application::seo::SiteContext;
use vetrina::domain::keywords::KeywordStore;
use vetrina::domain::posts::{Post, PostContent};
use vetrina::domain::rich_text::{Inline, RichTextBlock};
use vetrina::infra::http::{HttpState, build_router};
use vetrina::infra::remote::{RemoteCatalog, RemoteCatalogError};

struct FakeRemoteCatalog {
    posts: Vec<Post>,
}

#[async_trait]
impl RemoteCatalog for FakeRemoteCatalog {
    async fn fetch_posts(&self) -> Result<Vec<Post>, RemoteCatalogError> {
        Ok(self.posts.clone())
    }
}

struct FailingRemoteCatalog;

#[async_trait]
impl RemoteCatalog for FailingRemoteCatalog {
    async fn fetch_posts(&self) -> Result<Vec<Post>, RemoteCatalogError> {
        Err(RemoteCatalogError::Status { status: 502 })
    }
}

fn markdown_post(id: u32, slug: &str, title: &str, body: &str) -> Post {
    Post {
        id,
        slug: slug.to_string(),
        title: title.to_string(),
        excerpt: format!("{title} in brief."),
        date: "2024-05-10".to_string(),
        category: "Strategy".to_string(),
        image: "/images/card.jpg".to_string(),
        detail_image: "/images/hero.jpg".to_string(),
        content: PostContent::Markdown(body.to_string()),
        seo: None,
    }
}

fn remote_post(id: u32, slug: &str, title: &str) -> Post {
    Post {
        content: PostContent::RichText(vec![RichTextBlock::Paragraph {
            children: vec![Inline::plain("Delivered from the content store.")],
        }]),
        ..markdown_post(id, slug, title, "")
    }
}

fn static_fixture() -> Vec<Post> {
    vec![
        markdown_post(
            1,
            "pricing-pages",
            "Pricing Pages",
            "A pricing page earns trust before any call. Good landing pages convert because the offer is obvious.",
        ),
        markdown_post(
            2,
            "landing-pages",
            "Landing Pages",
            "Structure, headline, proof. That is the whole recipe.",
        ),
        markdown_post(3, "brand-voice", "Brand Voice", "Say less, mean more."),
    ]
}

fn keyword_fixture() -> KeywordStore {
    let mut store = KeywordStore::empty();
    store.add("landing pages", "landing-pages");
    store.add("brand voice", "brand-voice");
    store
}

fn build_app(remote: Arc<dyn RemoteCatalog>, page_size: usize) -> Router {
    let catalog =
        CatalogService::new(remote, MergeOrder::RemoteFirst).with_static_posts(static_fixture());
    let site = SiteContext {
        public_site_url: "https://studio.example".to_string(),
        site_name: "Studio".to_string(),
        tagline: "Notes from the studio".to_string(),
    };

    let state = HttpState {
        catalog,
        keywords: Arc::new(keyword_fixture()),
        site: Arc::new(site),
        page_size: NonZeroUsize::new(page_size).expect("nonzero page size"),
        page_scheme: PageScheme::Index,
        injection_cap: 3,
    };
    build_router(state)
}

fn app_with_remote_posts(posts: Vec<Post>, page_size: usize) -> Router {
    build_app(Arc::new(FakeRemoteCatalog { posts }), page_size)
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, headers, String::from_utf8_lossy(&body).to_string())
}

#[tokio::test]
async fn root_redirects_permanently_to_blogs() {
    let (status, headers, _) = get(app_with_remote_posts(Vec::new(), 8), "/").await;
    assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(headers[header::LOCATION], "/blogs");
}

#[tokio::test]
async fn blog_index_lists_posts_from_both_catalogs() {
    let app = app_with_remote_posts(vec![remote_post(50, "cms-launch", "CMS Launch")], 8);
    let (status, _, body) = get(app, "/blogs").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("CMS Launch"));
    assert!(body.contains("Pricing Pages"));
    assert!(body.contains("/blogs/cms-launch"));
}

#[tokio::test]
async fn page_one_alias_redirects_to_canonical_index() {
    let (status, headers, _) = get(app_with_remote_posts(Vec::new(), 8), "/blogs/page-1").await;
    assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(headers[header::LOCATION], "/blogs");
}

#[tokio::test]
async fn second_page_serves_the_tail_of_the_catalog() {
    let app = app_with_remote_posts(Vec::new(), 2);
    let (status, _, body) = get(app, "/blogs/page-2").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Brand Voice"));
    assert!(!body.contains("/blogs/pricing-pages\""));
}

#[tokio::test]
async fn out_of_range_page_is_not_found() {
    let (status, _, body) = get(app_with_remote_posts(Vec::new(), 8), "/blogs/page-99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("noindex"));
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let (status, _, _) = get(app_with_remote_posts(Vec::new(), 8), "/blogs/no-such-post").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_detail_renders_body_with_injected_links() {
    let (status, _, body) = get(app_with_remote_posts(Vec::new(), 8), "/blogs/pricing-pages").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Pricing Pages"));
    assert!(body.contains(r#"href="/blogs/landing-pages""#));
    assert!(body.contains("canonical"));
    assert!(body.contains("application/ld+json"));
}

#[tokio::test]
async fn post_detail_never_links_to_itself() {
    let (status, _, body) = get(app_with_remote_posts(Vec::new(), 8), "/blogs/landing-pages").await;

    assert_eq!(status, StatusCode::OK);
    let detail = body
        .split("<article")
        .nth(1)
        .expect("detail body rendered");
    assert!(!detail.contains(r#"href="/blogs/landing-pages""#));
}

#[tokio::test]
async fn rss_route_wins_over_slug_capture() {
    let app = app_with_remote_posts(vec![remote_post(50, "cms-launch", "CMS Launch")], 8);
    let (status, headers, body) = get(app, "/blogs/rss.xml").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_TYPE],
        "application/rss+xml; charset=utf-8"
    );
    assert!(body.contains("<rss"));
    assert!(body.contains("https://studio.example/blogs/cms-launch"));
}

#[tokio::test]
async fn sitemap_lists_every_post() {
    let (status, headers, body) = get(app_with_remote_posts(Vec::new(), 8), "/sitemap.xml").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/xml; charset=utf-8");
    assert!(body.contains("<urlset"));
    assert!(body.contains("https://studio.example/blogs/pricing-pages"));
    assert!(body.contains("https://studio.example/blogs/brand-voice"));
}

#[tokio::test]
async fn robots_points_at_the_sitemap() {
    let (status, _, body) = get(app_with_remote_posts(Vec::new(), 8), "/robots.txt").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Sitemap: https://studio.example/sitemap.xml"));
}

#[tokio::test]
async fn health_returns_no_content() {
    let (status, _, body) = get(app_with_remote_posts(Vec::new(), 8), "/_health").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn remote_failure_degrades_to_static_catalog() {
    let app = build_app(Arc::new(FailingRemoteCatalog), 8);
    let (status, _, body) = get(app, "/blogs").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Pricing Pages"));
    assert!(body.contains("Landing Pages"));
}
