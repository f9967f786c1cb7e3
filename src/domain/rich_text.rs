//! Minimal rich-text tree for posts delivered by the headless content store.
//!
//! The remote CMS serialises post bodies as a flat list of blocks whose inline
//! children carry formatting marks. This module models just the subset the
//! catalog contract guarantees; unknown block or inline kinds fail
//! deserialisation and surface as a remote fetch error upstream.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextBlock {
    Paragraph {
        children: Vec<Inline>,
    },
    Heading {
        level: u8,
        children: Vec<Inline>,
    },
    List {
        #[serde(default)]
        ordered: bool,
        items: Vec<Vec<Inline>>,
    },
    Quote {
        children: Vec<Inline>,
    },
    CodeBlock {
        #[serde(default)]
        language: Option<String>,
        code: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text {
        text: String,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        italic: bool,
    },
    Link {
        url: String,
        children: Vec<Inline>,
    },
    Code {
        code: String,
    },
}

impl Inline {
    pub fn plain(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

/// Concatenated text content of a block list, used for excerpt fallbacks and
/// word counting before HTML rendering.
pub fn collect_text(blocks: &[RichTextBlock]) -> String {
    let mut buffer = String::new();
    for block in blocks {
        match block {
            RichTextBlock::Paragraph { children }
            | RichTextBlock::Heading { children, .. }
            | RichTextBlock::Quote { children } => collect_inline_text(children, &mut buffer),
            RichTextBlock::List { items, .. } => {
                for item in items {
                    collect_inline_text(item, &mut buffer);
                }
            }
            RichTextBlock::CodeBlock { .. } => {}
        }
        if !buffer.ends_with(' ') {
            buffer.push(' ');
        }
    }
    buffer.trim().to_string()
}

fn collect_inline_text(inlines: &[Inline], buffer: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text { text, .. } => buffer.push_str(text),
            Inline::Link { children, .. } => collect_inline_text(children, buffer),
            Inline::Code { code } => buffer.push_str(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_blocks() {
        let payload = serde_json::json!([
            {"type": "heading", "level": 2, "children": [{"type": "text", "text": "Why audits matter"}]},
            {"type": "paragraph", "children": [
                {"type": "text", "text": "Run a "},
                {"type": "text", "text": "baseline", "bold": true},
                {"type": "text", "text": " first."}
            ]},
            {"type": "code_block", "language": "bash", "code": "curl -I https://example.com"}
        ]);

        let blocks: Vec<RichTextBlock> = serde_json::from_value(payload).expect("valid tree");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(
            blocks[0],
            RichTextBlock::Heading { level: 2, .. }
        ));
    }

    #[test]
    fn collect_text_skips_code_blocks() {
        let blocks = vec![
            RichTextBlock::Paragraph {
                children: vec![Inline::plain("Hello world.")],
            },
            RichTextBlock::CodeBlock {
                language: None,
                code: "ignored".to_string(),
            },
        ];

        assert_eq!(collect_text(&blocks), "Hello world.");
    }

    #[test]
    fn collect_text_descends_into_links() {
        let blocks = vec![RichTextBlock::Paragraph {
            children: vec![Inline::Link {
                url: "/blogs/other".to_string(),
                children: vec![Inline::plain("linked words")],
            }],
        }];

        assert_eq!(collect_text(&blocks), "linked words");
    }
}
