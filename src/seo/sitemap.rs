//! `sitemap.xml` and `robots.txt`.

use crate::config::SiteConfig;
use crate::i18n::{localized_path, Language};
use crate::seo::{alternate_links, escape_html, normalize_url};

/// One `<url>` per clean path and language, each listing every alternate.
pub fn sitemap_xml(site: &SiteConfig, clean_paths: &[String]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );

    for clean_path in clean_paths {
        let alternates = alternate_links(site, clean_path);

        for language in Language::all() {
            let loc = normalize_url(site, &localized_path(language, clean_path));
            out.push_str("  <url>\n");
            out.push_str(&format!("    <loc>{}</loc>\n", escape_html(&loc)));
            for (hreflang, href) in &alternates {
                out.push_str(&format!(
                    "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>\n",
                    escape_html(hreflang),
                    escape_html(href)
                ));
            }
            out.push_str("  </url>\n");
        }
    }

    out.push_str("</urlset>\n");
    out
}

pub fn robots_txt(site: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /_locale/\nDisallow: /_i18n/\n\nSitemap: {}\n",
        site.absolute_url("/sitemap.xml")
    )
}
