//! Keyword-based internal link injection.
//!
//! A `KeywordMatcher` is built per post render from the keyword store and the
//! catalog snapshot, then driven over the post body before HTML generation:
//! over the Markdown AST for static posts, over the rich-text tree for remote
//! ones. Working on the parsed structure (not the emitted HTML) is what keeps
//! injection out of existing anchors, code spans, and code blocks.
//!
//! Matching rules, identical for both body kinds:
//! * longest keyword wins at any given position
//! * each keyword links at most once per post
//! * at most `cap` links are added per post overall
//! * matches are case-insensitive and must sit on ASCII-alphanumeric word
//!   boundaries
//! * keywords targeting the post being rendered, or a slug absent from the
//!   catalog, never match

use std::collections::HashSet;

use comrak::nodes::{AstNode, NodeValue};
use tracing::debug;

use crate::domain::keywords::KeywordStore;
use crate::domain::rich_text::{Inline, RichTextBlock};

pub const DEFAULT_INJECTION_CAP: usize = 3;

/// One link the matcher added, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedLink {
    pub keyword: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
struct Entry {
    keyword: String,
    slug: String,
}

/// Stateful matcher for a single post render. Construct once, drive over every
/// text run of the body in document order.
#[derive(Debug)]
pub struct KeywordMatcher {
    entries: Vec<Entry>,
    used: Vec<bool>,
    remaining: usize,
    injected: Vec<InjectedLink>,
}

/// Byte span of one match within a text run, with the slug to link to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MatchSpan {
    start: usize,
    end: usize,
    slug: String,
}

impl KeywordMatcher {
    pub fn new(
        store: &KeywordStore,
        current_slug: &str,
        catalog_slugs: &HashSet<String>,
        cap: usize,
    ) -> Self {
        let mut entries: Vec<Entry> = store
            .list_all()
            .filter_map(|(keyword, slug)| {
                if slug == current_slug {
                    return None;
                }
                if !catalog_slugs.contains(slug) {
                    debug!(
                        target = "application::inject",
                        keyword,
                        slug,
                        "keyword target does not resolve in catalog; skipping"
                    );
                    return None;
                }
                Some(Entry {
                    keyword: keyword.to_string(),
                    slug: slug.to_string(),
                })
            })
            .collect();

        // Longest keyword first so "technical SEO audit" beats "SEO" at the
        // same position; lexicographic tiebreak keeps scans deterministic.
        entries.sort_by(|a, b| {
            b.keyword
                .len()
                .cmp(&a.keyword.len())
                .then_with(|| a.keyword.cmp(&b.keyword))
        });

        let used = vec![false; entries.len()];
        Self {
            entries,
            used,
            remaining: cap,
            injected: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    pub fn links_added(&self) -> usize {
        self.injected.len()
    }

    pub fn injected(&self) -> &[InjectedLink] {
        &self.injected
    }

    /// Find non-overlapping matches in one text run, left to right, consuming
    /// matched keywords and the global budget.
    fn scan(&mut self, text: &str) -> Vec<MatchSpan> {
        let mut spans = Vec::new();
        let bytes = text.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() && self.remaining > 0 {
            if !text.is_char_boundary(pos) || !starts_word(bytes, pos) {
                pos += 1;
                continue;
            }

            let mut hit: Option<(usize, usize)> = None;
            for (index, entry) in self.entries.iter().enumerate() {
                if self.used[index] {
                    continue;
                }
                let end = pos + entry.keyword.len();
                if end > bytes.len() || !text.is_char_boundary(end) {
                    continue;
                }
                if !bytes[pos..end].eq_ignore_ascii_case(entry.keyword.as_bytes()) {
                    continue;
                }
                if !ends_word(bytes, end) {
                    continue;
                }
                hit = Some((index, end));
                break;
            }

            match hit {
                Some((index, end)) => {
                    self.used[index] = true;
                    self.remaining -= 1;
                    let entry = &self.entries[index];
                    self.injected.push(InjectedLink {
                        keyword: entry.keyword.clone(),
                        slug: entry.slug.clone(),
                    });
                    spans.push(MatchSpan {
                        start: pos,
                        end,
                        slug: entry.slug.clone(),
                    });
                    pos = end;
                }
                None => pos += 1,
            }
        }

        spans
    }
}

fn starts_word(bytes: &[u8], pos: usize) -> bool {
    pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric()
}

fn ends_word(bytes: &[u8], end: usize) -> bool {
    end == bytes.len() || !bytes[end].is_ascii_alphanumeric()
}

/// Inject into a parsed Markdown document in place. Text inside existing
/// links, images, headings, and raw HTML is never touched; code spans and
/// code blocks are not `Text` nodes and are skipped structurally. Raw inline
/// anchors arrive as an `HtmlInline` open tag, sibling `Text` runs, and an
/// `HtmlInline` close tag, so the walker carries an open-anchor depth across
/// siblings and suppresses matching until the anchor closes.
pub fn inject_markdown_ast<'a>(root: &'a AstNode<'a>, matcher: &mut KeywordMatcher) {
    if matcher.is_exhausted() {
        return;
    }
    let mut open_anchors = 0usize;
    visit_node(root, matcher, &mut open_anchors);
}

fn visit_node<'a>(node: &'a AstNode<'a>, matcher: &mut KeywordMatcher, open_anchors: &mut usize) {
    {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Link(_)
            | NodeValue::Image(_)
            | NodeValue::Heading(_)
            | NodeValue::HtmlBlock(_) => return,
            NodeValue::HtmlInline(html) => {
                update_anchor_depth(html, open_anchors);
                return;
            }
            _ => {}
        }
    }

    let replacement = {
        let data = node.data.borrow();
        if let NodeValue::Text(text) = &data.value {
            if *open_anchors > 0 {
                None
            } else {
                let spans = matcher.scan(text);
                if spans.is_empty() {
                    None
                } else {
                    Some(render_spans(text, &spans))
                }
            }
        } else {
            None
        }
    };
    if let Some(html) = replacement {
        node.data.borrow_mut().value = NodeValue::HtmlInline(html);
    }

    let mut child = node.first_child();
    while let Some(next) = child {
        visit_node(next, matcher, open_anchors);
        child = next.next_sibling();
    }
}

/// Track `<a ...>` / `</a>` tags inside a raw inline-HTML fragment. Only the
/// anchor tag matters here; everything else in the fragment is opaque.
fn update_anchor_depth(html: &str, depth: &mut usize) {
    let bytes = html.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if *byte != b'<' {
            continue;
        }
        let rest = &bytes[index + 1..];
        if rest.len() >= 2
            && rest[0] == b'/'
            && rest[1].eq_ignore_ascii_case(&b'a')
            && rest.get(2).is_none_or(|b| !b.is_ascii_alphanumeric())
        {
            *depth = depth.saturating_sub(1);
        } else if !rest.is_empty()
            && rest[0].eq_ignore_ascii_case(&b'a')
            && rest.get(1).is_none_or(|b| !b.is_ascii_alphanumeric())
        {
            *depth += 1;
        }
    }
}

fn render_spans(text: &str, spans: &[MatchSpan]) -> String {
    let mut html = String::with_capacity(text.len() + spans.len() * 32);
    let mut cursor = 0;
    for span in spans {
        html.push_str(&escape_text(&text[cursor..span.start]));
        html.push_str("<a href=\"/blogs/");
        html.push_str(&escape_attribute(&span.slug));
        html.push_str("\">");
        html.push_str(&escape_text(&text[span.start..span.end]));
        html.push_str("</a>");
        cursor = span.end;
    }
    html.push_str(&escape_text(&text[cursor..]));
    html
}

/// Text-context escape for the emitted `HtmlInline`. Spaces and quotes stay
/// literal; attribute values use `escape_attribute` instead.
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
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

/// Inject into a rich-text tree in place. Headings, code blocks, inline code,
/// and the children of existing links are left alone; matched text keeps the
/// bold/italic marks of the run it was split out of.
pub fn inject_rich_text(blocks: &mut [RichTextBlock], matcher: &mut KeywordMatcher) {
    for block in blocks {
        if matcher.is_exhausted() {
            return;
        }
        match block {
            RichTextBlock::Paragraph { children } | RichTextBlock::Quote { children } => {
                inject_inlines(children, matcher);
            }
            RichTextBlock::List { items, .. } => {
                for item in items {
                    inject_inlines(item, matcher);
                }
            }
            RichTextBlock::Heading { .. } | RichTextBlock::CodeBlock { .. } => {}
        }
    }
}

fn inject_inlines(inlines: &mut Vec<Inline>, matcher: &mut KeywordMatcher) {
    let mut rewritten = Vec::with_capacity(inlines.len());

    for inline in inlines.drain(..) {
        match inline {
            Inline::Text { text, bold, italic } => {
                let spans = matcher.scan(&text);
                if spans.is_empty() {
                    rewritten.push(Inline::Text { text, bold, italic });
                    continue;
                }

                let mut cursor = 0;
                for span in &spans {
                    if span.start > cursor {
                        rewritten.push(Inline::Text {
                            text: text[cursor..span.start].to_string(),
                            bold,
                            italic,
                        });
                    }
                    rewritten.push(Inline::Link {
                        url: format!("/blogs/{}", span.slug),
                        children: vec![Inline::Text {
                            text: text[span.start..span.end].to_string(),
                            bold,
                            italic,
                        }],
                    });
                    cursor = span.end;
                }
                if cursor < text.len() {
                    rewritten.push(Inline::Text {
                        text: text[cursor..].to_string(),
                        bold,
                        italic,
                    });
                }
            }
            other => rewritten.push(other),
        }
    }

    *inlines = rewritten;
}

#[cfg(test)]
mod tests {
    use super::*;
    use comrak::{Arena, format_html, options::Options, parse_document};

    fn store_with(pairs: &[(&str, &str)]) -> KeywordStore {
        let mut store = KeywordStore::empty();
        for (keyword, slug) in pairs {
            store.add(*keyword, *slug);
        }
        store
    }

    fn slugs(values: &[&str]) -> HashSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn matcher_for(pairs: &[(&str, &str)], current: &str, cap: usize) -> KeywordMatcher {
        let store = store_with(pairs);
        let catalog: Vec<&str> = pairs.iter().map(|(_, slug)| *slug).collect();
        KeywordMatcher::new(&store, current, &slugs(&catalog), cap)
    }

    fn render_markdown(markdown: &str, matcher: &mut KeywordMatcher) -> String {
        let mut options = Options::default();
        options.render.r#unsafe = true;
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &options);
        inject_markdown_ast(root, matcher);
        let mut html = String::new();
        format_html(root, &options, &mut html).expect("render");
        html
    }

    #[test]
    fn longest_keyword_wins_at_a_shared_position() {
        let mut matcher = matcher_for(
            &[
                ("SEO", "what-is-seo"),
                ("technical SEO audit", "technical-seo-audit-checklist"),
            ],
            "some-other-post",
            3,
        );

        let html = render_markdown("Start with a technical SEO audit today.", &mut matcher);
        assert!(html.contains(
            "<a href=\"/blogs/technical-seo-audit-checklist\">technical SEO audit</a>"
        ));
        assert_eq!(matcher.links_added(), 1);
    }

    #[test]
    fn each_keyword_links_at_most_once() {
        let mut matcher = matcher_for(&[("SEO", "what-is-seo")], "other", 5);

        let html = render_markdown("SEO here, and SEO again, and more SEO.", &mut matcher);
        assert_eq!(html.matches("<a href=\"/blogs/what-is-seo\">").count(), 1);
    }

    #[test]
    fn global_cap_limits_total_links() {
        let mut matcher = matcher_for(
            &[
                ("alpha", "post-a"),
                ("bravo", "post-b"),
                ("charlie", "post-c"),
            ],
            "other",
            2,
        );

        let html = render_markdown("alpha then bravo then charlie.", &mut matcher);
        assert_eq!(html.matches("<a href=").count(), 2);
        assert!(matcher.is_exhausted());
        assert!(!html.contains("post-c"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let mut matcher = matcher_for(&[("core web vitals", "core-web-vitals")], "other", 3);

        let html = render_markdown("Core Web Vitals matter.", &mut matcher);
        assert!(html.contains("<a href=\"/blogs/core-web-vitals\">Core Web Vitals</a>"));
    }

    #[test]
    fn word_boundaries_block_partial_matches() {
        let mut matcher = matcher_for(&[("SEO", "what-is-seo")], "other", 3);

        let html = render_markdown("SEOs and pseudoscience stay plain.", &mut matcher);
        assert!(!html.contains("<a href="));
        assert_eq!(matcher.links_added(), 0);
    }

    #[test]
    fn self_links_are_suppressed() {
        let mut matcher = matcher_for(&[("SEO", "what-is-seo")], "what-is-seo", 3);

        let html = render_markdown("SEO appears in its own post.", &mut matcher);
        assert!(!html.contains("<a href="));
    }

    #[test]
    fn dangling_targets_never_match() {
        let store = store_with(&[("SEO", "missing-post")]);
        let mut matcher = KeywordMatcher::new(&store, "other", &slugs(&["what-is-seo"]), 3);

        let html = render_markdown("SEO stays plain.", &mut matcher);
        assert!(!html.contains("<a href="));
    }

    #[test]
    fn existing_links_and_code_are_untouched_in_markdown() {
        let mut matcher = matcher_for(&[("SEO", "what-is-seo")], "other", 3);

        let markdown = "[SEO guide](https://example.com) and `SEO` and:\n\n```\nSEO config\n```\n";
        let html = render_markdown(markdown, &mut matcher);
        assert!(!html.contains("/blogs/what-is-seo"));
        assert_eq!(matcher.links_added(), 0);
    }

    #[test]
    fn raw_html_anchor_text_is_never_injected() {
        let mut matcher = matcher_for(&[("SEO", "what-is-seo")], "other", 3);

        let markdown = "Read <a href=\"https://x.example\">our SEO guide</a> now.";
        let html = render_markdown(markdown, &mut matcher);
        assert!(!html.contains("/blogs/what-is-seo"));
        assert!(html.contains("<a href=\"https://x.example\">our SEO guide</a>"));
        assert_eq!(matcher.links_added(), 0);
    }

    #[test]
    fn injection_resumes_after_a_raw_html_anchor_closes() {
        let mut matcher = matcher_for(&[("SEO", "what-is-seo")], "other", 3);

        let markdown = "<a href=\"https://x.example\">SEO guide</a> and more SEO talk.";
        let html = render_markdown(markdown, &mut matcher);
        assert_eq!(html.matches("<a href=\"/blogs/what-is-seo\">").count(), 1);
        assert!(html.contains("more <a href=\"/blogs/what-is-seo\">SEO</a> talk."));
    }

    #[test]
    fn surrounding_text_is_escaped_but_spaces_stay_literal() {
        let mut matcher = matcher_for(&[("core web vitals", "core-web-vitals")], "other", 3);

        let html = render_markdown("R&D teams track core web vitals daily.", &mut matcher);
        assert!(html.contains("R&amp;D teams track "));
        assert!(html.contains("<a href=\"/blogs/core-web-vitals\">core web vitals</a>"));
        assert!(html.contains("</a> daily."));
    }

    #[test]
    fn headings_are_not_injected() {
        let mut matcher = matcher_for(&[("SEO", "what-is-seo")], "other", 3);

        let html = render_markdown("## SEO basics\n\nBody without the phrase.", &mut matcher);
        assert!(!html.contains("<a href="));
    }

    #[test]
    fn rich_text_injection_splits_runs_and_keeps_marks() {
        let mut matcher = matcher_for(&[("web design", "modern-web-design-trends")], "other", 3);

        let mut blocks = vec![RichTextBlock::Paragraph {
            children: vec![Inline::Text {
                text: "Great web design pays off.".to_string(),
                bold: true,
                italic: false,
            }],
        }];
        inject_rich_text(&mut blocks, &mut matcher);

        let RichTextBlock::Paragraph { children } = &blocks[0] else {
            panic!("paragraph expected");
        };
        assert_eq!(children.len(), 3);
        assert_eq!(
            children[0],
            Inline::Text {
                text: "Great ".to_string(),
                bold: true,
                italic: false,
            }
        );
        let Inline::Link { url, children: inner } = &children[1] else {
            panic!("link expected");
        };
        assert_eq!(url, "/blogs/modern-web-design-trends");
        assert_eq!(
            inner[0],
            Inline::Text {
                text: "web design".to_string(),
                bold: true,
                italic: false,
            }
        );
        assert_eq!(
            children[2],
            Inline::Text {
                text: " pays off.".to_string(),
                bold: true,
                italic: false,
            }
        );
    }

    #[test]
    fn rich_text_skips_existing_links_code_and_headings() {
        let mut matcher = matcher_for(&[("SEO", "what-is-seo")], "other", 3);

        let mut blocks = vec![
            RichTextBlock::Heading {
                level: 2,
                children: vec![Inline::plain("SEO basics")],
            },
            RichTextBlock::Paragraph {
                children: vec![
                    Inline::Link {
                        url: "https://example.com".to_string(),
                        children: vec![Inline::plain("SEO guide")],
                    },
                    Inline::Code {
                        code: "SEO".to_string(),
                    },
                ],
            },
            RichTextBlock::CodeBlock {
                language: None,
                code: "SEO config".to_string(),
            },
        ];
        let before = blocks.clone();
        inject_rich_text(&mut blocks, &mut matcher);

        assert_eq!(blocks, before);
        assert_eq!(matcher.links_added(), 0);
    }

    #[test]
    fn budget_spans_both_body_kinds_of_a_render_pass() {
        let mut matcher = matcher_for(&[("alpha", "post-a"), ("bravo", "post-b")], "other", 1);

        let html = render_markdown("alpha first.", &mut matcher);
        assert!(html.contains("post-a"));

        let mut blocks = vec![RichTextBlock::Paragraph {
            children: vec![Inline::plain("bravo second.")],
        }];
        inject_rich_text(&mut blocks, &mut matcher);

        let RichTextBlock::Paragraph { children } = &blocks[0] else {
            panic!("paragraph expected");
        };
        assert_eq!(children.len(), 1, "cap exhausted, no further links");
    }
}
