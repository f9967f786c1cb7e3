use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::{ErrorReport, HttpError};
use crate::application::seo::{PageMeta, SiteContext};
use crate::domain::posts::Post;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(site: &SiteContext) -> Response {
    let template = ErrorTemplate {
        meta: PageMetaView::not_found(site),
        site_name: site.site_name.clone(),
        heading: "Page not found".to_string(),
        message: "The page you are looking for does not exist or has moved.".to_string(),
    };
    let mut response = render_template_response(template, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Head metadata as consumed by `base.html`.
#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: Option<String>,
    pub robots: String,
}

impl PageMetaView {
    fn not_found(site: &SiteContext) -> Self {
        Self {
            title: format!("Page not found | {}", site.site_name),
            description: site.tagline.clone(),
            canonical: site.absolute_url("/blogs"),
            og_title: format!("Page not found | {}", site.site_name),
            og_description: site.tagline.clone(),
            og_image: None,
            robots: "noindex".to_string(),
        }
    }
}

impl From<PageMeta> for PageMetaView {
    fn from(meta: PageMeta) -> Self {
        Self {
            title: meta.title,
            description: meta.description,
            canonical: meta.canonical,
            og_title: meta.og_title,
            og_description: meta.og_description,
            og_image: meta.og_image,
            robots: meta.robots,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub iso_date: String,
    pub published: String,
    pub category: String,
    pub image: String,
}

impl PostCard {
    pub fn from_post(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            iso_date: post.date.clone(),
            published: post.human_date(),
            category: post.category.clone(),
            image: post.image.clone(),
        }
    }
}

#[derive(Clone)]
pub struct PaginationView {
    pub current: usize,
    pub total: usize,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl PaginationView {
    pub fn new(current: usize, total: usize) -> Self {
        let prev_href = match current {
            0 | 1 => None,
            2 => Some("/blogs".to_string()),
            n => Some(format!("/blogs/page-{}", n - 1)),
        };
        let next_href = (current < total).then(|| format!("/blogs/page-{}", current + 1));
        Self {
            current,
            total,
            prev_href,
            next_href,
        }
    }
}

#[derive(Template)]
#[template(path = "blogs.html")]
pub struct BlogIndexTemplate {
    pub meta: PageMetaView,
    pub site_name: String,
    pub posts: Vec<PostCard>,
    pub pagination: PaginationView,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub meta: PageMetaView,
    pub site_name: String,
    pub title: String,
    pub category: String,
    pub published: String,
    pub iso_date: String,
    pub detail_image: String,
    pub read_minutes: u32,
    pub body_html: String,
    pub related: Vec<PostCard>,
    pub ld_json: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub meta: PageMetaView,
    pub site_name: String,
    pub heading: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_hrefs_follow_the_url_scheme() {
        let first = PaginationView::new(1, 3);
        assert!(first.prev_href.is_none());
        assert_eq!(first.next_href.as_deref(), Some("/blogs/page-2"));

        let second = PaginationView::new(2, 3);
        assert_eq!(second.prev_href.as_deref(), Some("/blogs"));
        assert_eq!(second.next_href.as_deref(), Some("/blogs/page-3"));

        let last = PaginationView::new(3, 3);
        assert_eq!(last.prev_href.as_deref(), Some("/blogs/page-2"));
        assert!(last.next_href.is_none());
    }
}
