//! HTML document shell around a page body.

use crate::config::SiteConfig;
use crate::i18n::{localized_path, Language, Translator};
use crate::seo::{escape_html, HeadDocument};

/// Header navigation: `(clean path, translation key)`.
const NAV_LINKS: &[(&str, &str)] = &[
    ("/", "navigation.home"),
    ("/features", "navigation.features"),
    ("/pricing", "navigation.pricing"),
    ("/how-it-works", "navigation.howItWorks"),
    ("/faq", "navigation.faq"),
    ("/blog", "navigation.blog"),
    ("/contact", "navigation.contact"),
];

const FOOTER_LINKS: &[(&str, &str)] = &[
    ("/about-us", "navigation.aboutUs"),
    ("/video-tutorials", "navigation.videoTutorials"),
    ("/help-center", "navigation.helpCenter"),
    ("/privacy-policy", "footer.bottomLinks.privacyPolicy.name"),
    ("/terms-conditions", "footer.bottomLinks.termsOfService.name"),
    ("/cookie-policy", "footer.bottomLinks.cookiePolicy.name"),
];

/// Link that switches to `language` and returns to `location` translated.
pub fn language_switch_href(language: Language, location: &str) -> String {
    format!(
        "/_locale/{}?path={}",
        language.code(),
        urlencoding::encode(location)
    )
}

fn nav_link(tr: &Translator<'_>, path: &str, key: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        escape_html(&localized_path(tr.language(), path)),
        escape_html(&tr.text(key))
    )
}

fn language_selector(tr: &Translator<'_>, location: &str) -> String {
    let options: String = Language::all()
        .into_iter()
        .map(|language| {
            let current = if language == tr.language() {
                " aria-current=\"true\""
            } else {
                ""
            };
            format!(
                "<li><a href=\"{}\" hreflang=\"{}\" lang=\"{}\"{}>{}</a></li>",
                escape_html(&language_switch_href(language, location)),
                language.code(),
                language.code(),
                current,
                escape_html(language.native_name())
            )
        })
        .collect();

    format!(
        "<nav class=\"languages\" aria-label=\"{}\"><ul>{}</ul></nav>",
        escape_html(&tr.text("navigation.language")),
        options
    )
}

/// Full HTML document for a page.
pub fn render_document(
    head: &HeadDocument,
    tr: &Translator<'_>,
    site: &SiteConfig,
    location: &str,
    main: &str,
) -> String {
    let nav: String = NAV_LINKS
        .iter()
        .map(|(path, key)| nav_link(tr, path, key))
        .collect();
    let footer_links: String = FOOTER_LINKS
        .iter()
        .map(|(path, key)| format!("<li>{}</li>", nav_link(tr, path, key)))
        .collect();
    let year = chrono::Utc::now().format("%Y");

    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\" dir=\"{dir}\">\n<head>\n{head}</head>\n<body>\n\
         <header><a class=\"brand\" href=\"{home}\">{name}</a><nav>{nav}</nav>{languages}</header>\n\
         <main>{main}</main>\n\
         <footer><p>{description}</p><ul>{footer_links}</ul>\
         <p>&copy; {year} {copyright}. {rights}</p></footer>\n</body>\n</html>\n",
        lang = escape_html(&head.lang),
        dir = escape_html(&head.dir),
        head = head.render(),
        home = escape_html(&localized_path(tr.language(), "/")),
        name = escape_html(&site.site_name),
        nav = nav,
        languages = language_selector(tr, location),
        main = main,
        description = escape_html(&tr.text("footer.companyDescription")),
        footer_links = footer_links,
        year = year,
        copyright = escape_html(&tr.text("footer.copyright.text")),
        rights = escape_html(&tr.text("footer.copyright.allRightsReserved")),
    )
}
