//! Post body rendering for the presentation layer.
//!
//! Pipeline: parse the body (comrak for Markdown, the rich-text serializer
//! for remote posts), run keyword injection over the parsed tree, emit HTML,
//! sanitize with ammonia, then a lol_html pass that tags links with
//! `data-link-kind`, adds `rel="noopener noreferrer"` to external ones, and
//! counts words for the read-time display.

use std::{cell::RefCell, collections::HashSet, rc::Rc};

use ammonia::Builder as AmmoniaBuilder;
use comrak::{Arena, format_html, options::Options, parse_document};
use lol_html::{RewriteStrSettings, element, rewrite_str, text};
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::debug;

use crate::application::inject::{self, KeywordMatcher};
use crate::domain::keywords::KeywordStore;
use crate::domain::posts::{Post, PostContent};
use crate::domain::rich_text::{Inline, RichTextBlock};

const WORDS_PER_MINUTE: u32 = 200;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to process document: {message}")]
    Document { message: String },
}

/// Rendered body plus the metrics the detail view displays and logs.
#[derive(Debug, Clone)]
pub struct RenderedBody {
    pub html: String,
    pub word_count: u32,
    pub read_minutes: u32,
    pub internal_links: u32,
    pub external_links: u32,
    pub injected_links: u32,
}

static POST_SANITIZER: Lazy<AmmoniaBuilder<'static>> = Lazy::new(|| {
    let mut builder = AmmoniaBuilder::default();
    // rel is decided per link kind in the augmentation pass, not globally.
    builder.link_rel(None);
    builder.add_generic_attributes(&["data-link-kind"]);
    builder
});

fn markdown_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    // Injection replaces text nodes with HtmlInline anchors; sanitization
    // runs on the emitted HTML afterwards.
    options.render.r#unsafe = true;
    options.render.github_pre_lang = true;
    options
}

/// Render one post body end to end. `catalog_slugs` is the slug set of the
/// unified catalog the post was resolved from; injection only targets slugs
/// in it.
pub fn render_post_body(
    post: &Post,
    keywords: &KeywordStore,
    catalog_slugs: &HashSet<String>,
    injection_cap: usize,
) -> Result<RenderedBody, RenderError> {
    let mut matcher = KeywordMatcher::new(keywords, &post.slug, catalog_slugs, injection_cap);

    let raw_html = match &post.content {
        PostContent::Markdown(markdown) => markdown_to_html(markdown, &mut matcher)?,
        PostContent::RichText(blocks) => {
            let mut blocks = blocks.clone();
            inject::inject_rich_text(&mut blocks, &mut matcher);
            rich_text_to_html(&blocks)
        }
    };

    for link in matcher.injected() {
        debug!(
            target = "application::render",
            keyword = %link.keyword,
            slug = %link.slug,
            post = %post.slug,
            "injected internal link"
        );
    }

    let sanitized = POST_SANITIZER.clean(&raw_html).to_string();
    let augmented = augment(&sanitized)?;

    let read_minutes = if augmented.word_count == 0 {
        0
    } else {
        (augmented.word_count.div_ceil(WORDS_PER_MINUTE)).max(1)
    };

    Ok(RenderedBody {
        html: augmented.html,
        word_count: augmented.word_count,
        read_minutes,
        internal_links: augmented.internal_links,
        external_links: augmented.external_links,
        injected_links: matcher.links_added() as u32,
    })
}

fn markdown_to_html(
    markdown: &str,
    matcher: &mut KeywordMatcher,
) -> Result<String, RenderError> {
    let options = markdown_options();
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &options);
    inject::inject_markdown_ast(root, matcher);

    let mut html = String::new();
    format_html(root, &options, &mut html).map_err(|err| RenderError::Document {
        message: err.to_string(),
    })?;
    Ok(html)
}

/// Serialize an (already injected) rich-text tree. Output is escaped here
/// and still passes through the sanitizer with the Markdown path.
fn rich_text_to_html(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    for block in blocks {
        match block {
            RichTextBlock::Paragraph { children } => {
                html.push_str("<p>");
                push_inlines(&mut html, children);
                html.push_str("</p>\n");
            }
            RichTextBlock::Heading { level, children } => {
                let level = (*level).clamp(2, 4);
                html.push_str(&format!("<h{level}>"));
                push_inlines(&mut html, children);
                html.push_str(&format!("</h{level}>\n"));
            }
            RichTextBlock::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                html.push_str(&format!("<{tag}>\n"));
                for item in items {
                    html.push_str("<li>");
                    push_inlines(&mut html, item);
                    html.push_str("</li>\n");
                }
                html.push_str(&format!("</{tag}>\n"));
            }
            RichTextBlock::Quote { children } => {
                html.push_str("<blockquote><p>");
                push_inlines(&mut html, children);
                html.push_str("</p></blockquote>\n");
            }
            RichTextBlock::CodeBlock { language, code } => {
                match language.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
                    Some(lang) => html.push_str(&format!(
                        "<pre lang=\"{}\"><code>",
                        escape_attribute(lang)
                    )),
                    None => html.push_str("<pre><code>"),
                }
                html.push_str(&ammonia::clean_text(code));
                if !code.ends_with('\n') {
                    html.push('\n');
                }
                html.push_str("</code></pre>\n");
            }
        }
    }
    html
}

fn push_inlines(html: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text { text, bold, italic } => {
                if *bold {
                    html.push_str("<strong>");
                }
                if *italic {
                    html.push_str("<em>");
                }
                html.push_str(&ammonia::clean_text(text));
                if *italic {
                    html.push_str("</em>");
                }
                if *bold {
                    html.push_str("</strong>");
                }
            }
            Inline::Link { url, children } => {
                html.push_str("<a href=\"");
                html.push_str(&escape_attribute(url));
                html.push_str("\">");
                push_inlines(html, children);
                html.push_str("</a>");
            }
            Inline::Code { code } => {
                html.push_str("<code>");
                html.push_str(&ammonia::clean_text(code));
                html.push_str("</code>");
            }
        }
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[derive(Default, Clone)]
struct AugmentState {
    internal_links: u32,
    external_links: u32,
    word_count: u32,
}

struct AugmentOutcome {
    html: String,
    internal_links: u32,
    external_links: u32,
    word_count: u32,
}

fn augment(html: &str) -> Result<AugmentOutcome, RenderError> {
    let state = Rc::new(RefCell::new(AugmentState::default()));

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("a", {
                    let state = Rc::clone(&state);
                    move |el| {
                        if let Some(href) = el.get_attribute("href") {
                            match classify_link(&href) {
                                LinkKind::External => {
                                    {
                                        let mut state = state.borrow_mut();
                                        state.external_links =
                                            state.external_links.saturating_add(1);
                                    }
                                    let rel = merge_rel(
                                        el.get_attribute("rel"),
                                        &["noopener", "noreferrer"],
                                    );
                                    el.set_attribute("rel", &rel)?;
                                    el.set_attribute("data-link-kind", "external")?;
                                }
                                LinkKind::Internal => {
                                    {
                                        let mut state = state.borrow_mut();
                                        state.internal_links =
                                            state.internal_links.saturating_add(1);
                                    }
                                    el.set_attribute("data-link-kind", "internal")?;
                                }
                                LinkKind::Anchor => {
                                    el.set_attribute("data-link-kind", "anchor")?;
                                }
                                LinkKind::Other => {
                                    el.set_attribute("data-link-kind", "other")?;
                                }
                            }
                        }
                        Ok(())
                    }
                }),
                text!("*", {
                    let state = Rc::clone(&state);
                    move |t| {
                        let words = t.as_str().split_whitespace().count() as u32;
                        if words > 0 {
                            let mut state = state.borrow_mut();
                            state.word_count = state.word_count.saturating_add(words);
                        }
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::Document {
        message: err.to_string(),
    })?;

    let state = Rc::try_unwrap(state)
        .map(|cell| cell.into_inner())
        .unwrap_or_else(|rc| rc.borrow().clone());

    Ok(AugmentOutcome {
        html: rewritten,
        internal_links: state.internal_links,
        external_links: state.external_links,
        word_count: state.word_count,
    })
}

#[derive(Debug, Clone, Copy)]
enum LinkKind {
    Internal,
    External,
    Anchor,
    Other,
}

fn classify_link(href: &str) -> LinkKind {
    if href.is_empty() || href.starts_with('#') {
        return LinkKind::Anchor;
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return LinkKind::External;
    }
    if href.starts_with('/')
        || href.starts_with("./")
        || href.starts_with("../")
        || (!href.contains(':') && !href.starts_with("//"))
    {
        return LinkKind::Internal;
    }
    LinkKind::Other
}

fn merge_rel(existing: Option<String>, required: &[&str]) -> String {
    let mut tokens: Vec<String> = existing
        .unwrap_or_default()
        .split_whitespace()
        .map(|token| token.to_string())
        .collect();
    for &token in required {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens.join(" ")
}
