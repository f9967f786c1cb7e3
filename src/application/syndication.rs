//! RSS 2.0 feed over the unified catalog.

use time::format_description::well_known::Rfc2822;

use crate::application::catalog::UnifiedCatalog;
use crate::application::seo::SiteContext;

/// Generate the RSS 2.0 feed served at `/blogs/rss.xml`. Posts whose date
/// fails to parse are included without a `pubDate`.
pub fn rss_feed(site: &SiteContext, catalog: &UnifiedCatalog) -> String {
    let mut items = String::new();
    for post in catalog.list_all() {
        let link = site.absolute_url(&format!("/blogs/{}", post.slug));
        let pub_date = post
            .parsed_date()
            .and_then(|date| date.midnight().assume_utc().format(&Rfc2822).ok());

        items.push_str("    <item>\n");
        items.push_str(&format!("      <title>{}</title>\n", xml_escape(&post.title)));
        items.push_str(&format!("      <link>{link}</link>\n"));
        items.push_str(&format!("      <guid>{link}</guid>\n"));
        if let Some(pub_date) = pub_date {
            items.push_str(&format!("      <pubDate>{pub_date}</pubDate>\n"));
        }
        items.push_str(&format!(
            "      <description><![CDATA[{}]]></description>\n",
            post.excerpt
        ));
        items.push_str("    </item>\n");
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n  <channel>\n    <title>{}</title>\n    <link>{}</link>\n    <description>{}</description>\n{}  </channel>\n</rss>\n",
        xml_escape(&site.site_name),
        site.absolute_url("/blogs"),
        xml_escape(&site.tagline),
        items
    )
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::catalog::MergeOrder;
    use crate::domain::posts::{Post, PostContent};

    fn site() -> SiteContext {
        SiteContext {
            public_site_url: "https://agency.example".to_string(),
            site_name: "Forgia & Co".to_string(),
            tagline: "Digital agency insights".to_string(),
        }
    }

    fn post(slug: &str, date: &str) -> Post {
        Post {
            id: 1,
            slug: slug.to_string(),
            title: format!("Title of {slug}"),
            excerpt: "An excerpt.".to_string(),
            date: date.to_string(),
            category: "Test".to_string(),
            image: String::new(),
            detail_image: String::new(),
            content: PostContent::Markdown("Body.".to_string()),
            seo: None,
        }
    }

    #[test]
    fn feed_lists_every_post_with_absolute_links() {
        let catalog = UnifiedCatalog::merge(
            Vec::new(),
            vec![post("one", "2024-01-05"), post("two", "2024-02-10")],
            MergeOrder::RemoteFirst,
        );
        let feed = rss_feed(&site(), &catalog);

        assert_eq!(feed.matches("<item>").count(), 2);
        assert!(feed.contains("<link>https://agency.example/blogs/one</link>"));
        assert!(feed.contains("<title>Forgia &amp; Co</title>"));
        assert!(feed.contains("<pubDate>"));
    }

    #[test]
    fn unparseable_dates_omit_pub_date() {
        let catalog = UnifiedCatalog::merge(
            Vec::new(),
            vec![post("undated", "early 2024")],
            MergeOrder::RemoteFirst,
        );
        let feed = rss_feed(&site(), &catalog);

        assert!(feed.contains("<item>"));
        assert!(!feed.contains("<pubDate>"));
    }
}
