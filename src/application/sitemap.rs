//! sitemap.xml and robots.txt generation.

use crate::application::catalog::UnifiedCatalog;
use crate::application::seo::SiteContext;

/// Generate sitemap.xml: the homepage, the blog index, and every post in the
/// unified catalog. `lastmod` is the post's ISO date when it parses.
pub fn sitemap_xml(site: &SiteContext, catalog: &UnifiedCatalog) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    xml.push_str(&entry(&site.absolute_url("/"), None));
    xml.push_str(&entry(&site.absolute_url("/blogs"), None));
    for post in catalog.list_all() {
        let loc = site.absolute_url(&format!("/blogs/{}", post.slug));
        let lastmod = post.parsed_date().map(|_| post.date.trim().to_string());
        xml.push_str(&entry(&loc, lastmod.as_deref()));
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn robots_txt(site: &SiteContext) -> String {
    let sitemap_url = site.absolute_url("/sitemap.xml");
    format!("User-agent: *\nAllow: /\nSitemap: {sitemap_url}\n")
}

fn entry(loc: &str, lastmod: Option<&str>) -> String {
    match lastmod {
        Some(lastmod) => format!("  <url><loc>{loc}</loc><lastmod>{lastmod}</lastmod></url>\n"),
        None => format!("  <url><loc>{loc}</loc></url>\n"),
    }
}
