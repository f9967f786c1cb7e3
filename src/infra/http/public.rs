use std::{num::NonZeroUsize, sync::Arc};

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};

use crate::{
    application::{
        catalog::{CatalogService, UnifiedCatalog},
        error::HttpError,
        pagination::{self, PageScheme},
        render, seo,
        seo::SiteContext,
        sitemap, syndication,
    },
    domain::keywords::KeywordStore,
    presentation::views::{
        BlogIndexTemplate, PaginationView, PostCard, PostTemplate, render_not_found_response,
        render_template_response,
    },
};

use super::middleware::{log_responses, set_request_context};

const RELATED_POSTS_LIMIT: usize = 3;

#[derive(Clone)]
pub struct HttpState {
    pub catalog: CatalogService,
    pub keywords: Arc<KeywordStore>,
    pub site: Arc<SiteContext>,
    pub page_size: NonZeroUsize,
    pub page_scheme: PageScheme,
    pub injection_cap: usize,
}

pub fn build_router(state: HttpState) -> Router {
    // Static segments (`rss.xml`) take priority over the `{slug}` capture.
    Router::new()
        .route("/", get(root_redirect))
        .route("/blogs", get(blog_index))
        .route("/blogs/rss.xml", get(rss_feed))
        .route("/blogs/{slug}", get(blog_slug))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/robots.txt", get(robots_txt))
        .route("/_health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn root_redirect() -> Redirect {
    Redirect::permanent("/blogs")
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn blog_index(State(state): State<HttpState>) -> Response {
    let catalog = state.catalog.load().await;
    render_blog_page(&state, &catalog, 1)
}

/// `/blogs/{slug}` serves both pagination and post detail: a trailing
/// `page-{digits}` segment is pagination, anything else is a post slug.
async fn blog_slug(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    if let Some(number) = parse_page_segment(&slug) {
        if number == 1 {
            return Redirect::permanent("/blogs").into_response();
        }
        let catalog = state.catalog.load().await;
        return render_blog_page(&state, &catalog, number);
    }

    let catalog = state.catalog.load().await;
    render_post_detail(&state, &catalog, &slug)
}

fn parse_page_segment(slug: &str) -> Option<usize> {
    let digits = slug.strip_prefix("page-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn render_blog_page(state: &HttpState, catalog: &UnifiedCatalog, number: usize) -> Response {
    let page = match pagination::paginate(
        catalog.list_all(),
        state.page_scheme,
        number,
        state.page_size,
    ) {
        Some(page) => page,
        None => return render_not_found_response(&state.site),
    };

    let meta = seo::resolve_index_meta(&state.site, page.number);
    let template = BlogIndexTemplate {
        meta: meta.into(),
        site_name: state.site.site_name.clone(),
        posts: page.posts.iter().map(|post| PostCard::from_post(post)).collect(),
        pagination: PaginationView::new(page.number, page.total_pages),
    };
    render_template_response(template, StatusCode::OK)
}

fn render_post_detail(state: &HttpState, catalog: &UnifiedCatalog, slug: &str) -> Response {
    let Some(post) = catalog.get_by_slug(slug) else {
        return render_not_found_response(&state.site);
    };

    let catalog_slugs = catalog.slugs();
    let body = match render::render_post_body(
        post,
        &state.keywords,
        &catalog_slugs,
        state.injection_cap,
    ) {
        Ok(body) => body,
        Err(err) => {
            return HttpError::from_error(
                "infra::http::public::render_post_detail",
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to render post",
                &err,
            )
            .into_response();
        }
    };

    let meta = seo::resolve_post_meta(&state.site, post);
    let ld_json = seo::article_ld_json(&state.site, post, &meta);
    let related = catalog
        .get_related(slug, RELATED_POSTS_LIMIT)
        .into_iter()
        .map(PostCard::from_post)
        .collect();

    let template = PostTemplate {
        meta: meta.into(),
        site_name: state.site.site_name.clone(),
        title: post.title.clone(),
        category: post.category.clone(),
        published: post.human_date(),
        iso_date: post.date.clone(),
        detail_image: post.detail_image.clone(),
        read_minutes: body.read_minutes,
        body_html: body.html,
        related,
        ld_json,
    };
    render_template_response(template, StatusCode::OK)
}

async fn rss_feed(State(state): State<HttpState>) -> Response {
    let catalog = state.catalog.load().await;
    let feed = syndication::rss_feed(&state.site, &catalog);
    (
        [(CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        feed,
    )
        .into_response()
}

async fn sitemap_xml(State(state): State<HttpState>) -> Response {
    let catalog = state.catalog.load().await;
    let xml = sitemap::sitemap_xml(&state.site, &catalog);
    ([(CONTENT_TYPE, "application/xml; charset=utf-8")], xml).into_response()
}

async fn robots_txt(State(state): State<HttpState>) -> Response {
    let body = sitemap::robots_txt(&state.site);
    ([(CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}
