//! Page table: which page a clean path names, its SEO record and its body.
//!
//! All copy comes from the translation catalog. Paths here are clean (no
//! locale prefix); links are localized for the active language on output.

use crate::api::LegalAgreementType;
use crate::config::SiteConfig;
use crate::i18n::{
    localized_path, split_path_segments, split_path_suffix, strip_locale_prefix,
    TranslationValue, Translator,
};
use crate::seo::{escape_html, schema, SeoMetadata};
use axum::http::StatusCode;

/// Clean paths of every page that exists in every language.
pub const STATIC_PATHS: &[&str] = &[
    "/",
    "/pricing",
    "/faq",
    "/how-it-works",
    "/about-us",
    "/video-tutorials",
    "/features",
    "/contact",
    "/blog",
    "/privacy-policy",
    "/terms-conditions",
    "/cookie-policy",
    "/help-center",
];

/// Feature keys under `features.*`, in display order.
const FEATURE_KEYS: &[&str] = &[
    "multiBranch",
    "smartCalendar",
    "analytics",
    "blacklistProtection",
    "customBranding",
    "domainIntegration",
];

/// Industry landing variants of the home page, selected with `?target=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingTarget {
    Barber,
    Doctor,
    Dentist,
}

impl LandingTarget {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "barber" => Some(LandingTarget::Barber),
            "doctor" => Some(LandingTarget::Doctor),
            "dentist" => Some(LandingTarget::Dentist),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LandingTarget::Barber => "barber",
            LandingTarget::Doctor => "doctor",
            LandingTarget::Dentist => "dentist",
        }
    }
}

/// Legal text fetched from the backend for the legal pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegalContent {
    Loaded {
        content: String,
        created_at: Option<String>,
    },
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Landing(LandingTarget),
    Pricing,
    Faq,
    HowItWorks,
    AboutUs,
    VideoTutorials,
    Features,
    Contact,
    Blog,
    BlogArticle(String),
    Alternative(String),
    Legal(LegalAgreementType),
    HelpCenter,
    NotFound,
}

impl Page {
    /// Match a request path. The locale prefix, if any, is ignored; the
    /// query is consulted only for the landing variant of the home page.
    pub fn resolve(path: &str) -> Page {
        let (pathname, suffix) = split_path_suffix(path);
        let clean = strip_locale_prefix(pathname);
        let segments = split_path_segments(&clean);

        match segments.as_slice() {
            [] => match suffix
                .strip_prefix('?')
                .and_then(|query| query_param(query, "target"))
                .and_then(|v| LandingTarget::parse(&v))
            {
                Some(target) => Page::Landing(target),
                None => Page::Home,
            },
            ["pricing"] => Page::Pricing,
            ["faq"] => Page::Faq,
            ["how-it-works"] => Page::HowItWorks,
            ["about-us"] => Page::AboutUs,
            ["video-tutorials"] => Page::VideoTutorials,
            ["features"] => Page::Features,
            ["contact"] => Page::Contact,
            ["blog"] => Page::Blog,
            ["blog", slug] => Page::BlogArticle(slug.to_string()),
            ["alternative", competitor] => Page::Alternative(competitor.to_string()),
            ["privacy-policy"] => Page::Legal(LegalAgreementType::PrivacyPolicy),
            ["terms-conditions"] => Page::Legal(LegalAgreementType::TermsConditions),
            ["cookie-policy"] => Page::Legal(LegalAgreementType::CookiePolicy),
            ["help-center"] => Page::HelpCenter,
            _ => Page::NotFound,
        }
    }

    /// Replace pages whose content does not exist with [`Page::NotFound`].
    pub fn settle(self, tr: &Translator<'_>) -> Page {
        match &self {
            Page::Alternative(competitor) if alternative(tr, competitor).is_none() => Page::NotFound,
            _ => self,
        }
    }

    pub fn status(&self, tr: &Translator<'_>) -> StatusCode {
        match self {
            Page::NotFound => StatusCode::NOT_FOUND,
            Page::BlogArticle(slug) if find_post(tr, slug).is_none() => StatusCode::NOT_FOUND,
            _ => StatusCode::OK,
        }
    }

    pub fn legal_type(&self) -> Option<LegalAgreementType> {
        match self {
            Page::Legal(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Clean path of the page, `None` for the 404 page.
    pub fn clean_path(&self) -> Option<String> {
        let path = match self {
            Page::Home | Page::Landing(_) => "/".to_string(),
            Page::Pricing => "/pricing".to_string(),
            Page::Faq => "/faq".to_string(),
            Page::HowItWorks => "/how-it-works".to_string(),
            Page::AboutUs => "/about-us".to_string(),
            Page::VideoTutorials => "/video-tutorials".to_string(),
            Page::Features => "/features".to_string(),
            Page::Contact => "/contact".to_string(),
            Page::Blog => "/blog".to_string(),
            Page::BlogArticle(slug) => format!("/blog/{}", slug),
            Page::Alternative(competitor) => format!("/alternative/{}", competitor),
            Page::Legal(kind) => format!("/{}", kind.as_str()),
            Page::HelpCenter => "/help-center".to_string(),
            Page::NotFound => return None,
        };
        Some(path)
    }

    /// Translation namespace holding the page's copy.
    fn namespace(&self) -> &'static str {
        match self {
            Page::Home | Page::Landing(_) => "home",
            Page::Pricing => "pricingDetails",
            Page::Faq => "faq",
            Page::HowItWorks => "howItWorks",
            Page::AboutUs => "about",
            Page::VideoTutorials => "videoTutorials",
            Page::Features => "featuresPage",
            Page::Contact => "contactPage",
            Page::Blog | Page::BlogArticle(_) => "blog",
            Page::Alternative(_) => "alternatives",
            Page::Legal(LegalAgreementType::PrivacyPolicy) => "privacyPolicy",
            Page::Legal(LegalAgreementType::TermsConditions) => "termsConditions",
            Page::Legal(LegalAgreementType::CookiePolicy) => "cookiePolicy",
            Page::HelpCenter => "helpCenter",
            Page::NotFound => "notFound",
        }
    }

    /// SEO record for this page in the translator's language.
    pub fn seo(&self, tr: &Translator<'_>, site: &SiteConfig) -> SeoMetadata {
        match self {
            Page::Home => self
                .standard_seo(tr)
                .with_structured_data(schema::organization(site))
                .with_structured_data(schema::local_business(site))
                .with_structured_data(schema::product(site)),
            Page::Landing(target) => {
                let key = format!("landing.{}", target.as_str());
                SeoMetadata::new(
                    tr.text(&format!("{}.seo.title", key)),
                    tr.text(&format!("{}.seo.description", key)),
                )
                .with_path("/")
                .with_keywords([
                    format!("{} scheduling", target.as_str()),
                    format!("{} for {}s", site.site_name, target.as_str()),
                    format!("{} industry workflows", site.site_name),
                ])
                .with_structured_data(schema::organization(site))
                .with_structured_data(schema::product(site))
            }
            Page::BlogArticle(slug) => {
                let path = format!("/blog/{}", slug);
                match find_post(tr, slug) {
                    Some(post) => {
                        let url = site.absolute_url(&localized_path(tr.language(), &path));
                        SeoMetadata::new(
                            post.field("title").unwrap_or_default(),
                            post.field("excerpt").unwrap_or_default(),
                        )
                        .with_path(path)
                        .with_type("article")
                        .with_keywords(texts(post.child("tags")))
                        .with_structured_data(schema::blog_posting(site, post, &url))
                    }
                    None => SeoMetadata::new(site.site_name.clone(), tr.text("blog.metaDescription"))
                        .with_path(path)
                        .with_noindex(true),
                }
            }
            Page::Alternative(competitor) => {
                let content = alternative(tr, competitor);
                let seo = content.and_then(|c| c.child("seo"));
                let title = seo
                    .and_then(|s| s.field("title"))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} Alternative", competitor));
                let description = seo
                    .and_then(|s| s.field("description"))
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        format!(
                            "See why {} is the best alternative to {}.",
                            site.site_name, competitor
                        )
                    });

                SeoMetadata::new(title, description)
                    .with_path(format!("/alternative/{}", competitor))
                    .with_keywords(texts(seo.and_then(|s| s.child("keywords"))))
                    .with_structured_data(schema::organization(site))
                    .with_structured_data(schema::product(site))
            }
            Page::Faq => self
                .standard_seo(tr)
                .with_structured_data(schema::organization(site))
                .with_structured_data(schema::faq_page(tr.list("faq.categories"))),
            Page::Contact => self
                .standard_seo(tr)
                .with_structured_data(schema::local_business(site)),
            Page::Pricing | Page::HowItWorks | Page::VideoTutorials | Page::Features => self
                .standard_seo(tr)
                .with_structured_data(schema::product(site)),
            Page::NotFound => {
                SeoMetadata::new(tr.text("notFound.pageTitle"), tr.text("notFound.subtitle"))
                    .with_noindex(true)
            }
            Page::AboutUs | Page::Blog | Page::Legal(_) | Page::HelpCenter => self
                .standard_seo(tr)
                .with_structured_data(schema::organization(site)),
        }
    }

    fn standard_seo(&self, tr: &Translator<'_>) -> SeoMetadata {
        let ns = self.namespace();
        let mut seo = SeoMetadata::new(
            tr.text(&format!("{}.pageTitle", ns)),
            tr.text(&format!("{}.metaDescription", ns)),
        )
        .with_keywords(texts(tr.get(&format!("{}.keywords", ns))));
        if let Some(path) = self.clean_path() {
            seo = seo.with_path(path);
        }
        seo
    }

    /// Inner HTML of `<main>`.
    pub fn body(&self, tr: &Translator<'_>, site: &SiteConfig, legal: Option<&LegalContent>) -> String {
        match self {
            Page::Home => home_body(tr),
            Page::Landing(target) => landing_body(tr, *target),
            Page::Pricing => pricing_body(tr),
            Page::Faq => faq_body(tr),
            Page::HowItWorks => {
                let steps = tr.list("howItWorks.process.steps");
                format!(
                    "{}<section><ol class=\"steps\">{}</ol></section>",
                    hero(tr, "howItWorks"),
                    steps.iter().map(card).collect::<String>()
                )
            }
            Page::AboutUs => about_body(tr, site),
            Page::VideoTutorials => {
                let videos = tr.list("videoTutorials.videos");
                let items: String = videos
                    .iter()
                    .map(|video| {
                        format!(
                            "<li><h3>{}</h3><p>{}</p><span class=\"duration\">{}</span></li>",
                            field(video, "title"),
                            field(video, "description"),
                            field(video, "duration")
                        )
                    })
                    .collect();
                format!("{}<section><ul class=\"cards\">{}</ul></section>", hero(tr, "videoTutorials"), items)
            }
            Page::Features => format!(
                "{}<section><ul class=\"cards\">{}</ul></section>",
                hero(tr, "featuresPage"),
                feature_cards(tr)
            ),
            Page::Contact => contact_body(tr, site),
            Page::Blog => blog_body(tr),
            Page::BlogArticle(slug) => blog_article_body(tr, slug),
            Page::Alternative(competitor) => alternative_body(tr, competitor),
            Page::Legal(_) => legal_body(tr, self.namespace(), legal),
            Page::HelpCenter => {
                let articles = tr.list("helpCenter.articles");
                format!(
                    "{}<section><ul class=\"cards\">{}</ul><p>{} {}</p></section>",
                    hero(tr, "helpCenter"),
                    articles.iter().map(card).collect::<String>(),
                    link(tr, "/faq", &tr.text("navigation.faq")),
                    link(tr, "/contact", &tr.text("navigation.contact"))
                )
            }
            Page::NotFound => not_found_body(tr),
        }
    }
}

/// Every clean path worth listing in the sitemap: the static pages, each
/// blog post and each comparison page of the default language.
pub fn sitemap_paths(tr: &Translator<'_>) -> Vec<String> {
    let mut paths: Vec<String> = STATIC_PATHS.iter().map(|p| p.to_string()).collect();

    paths.extend(
        tr.list("blog.posts")
            .iter()
            .filter_map(|post| post.field("slug"))
            .map(|slug| format!("/blog/{}", slug)),
    );

    if let Some(competitors) = tr.get("alternatives").and_then(TranslationValue::as_tree) {
        paths.extend(competitors.keys().map(|c| format!("/alternative/{}", c)));
    }

    paths
}

fn find_post<'a>(tr: &Translator<'a>, slug: &str) -> Option<&'a TranslationValue> {
    tr.list("blog.posts")
        .iter()
        .find(|post| post.field("slug") == Some(slug))
}

fn alternative<'a>(tr: &Translator<'a>, competitor: &str) -> Option<&'a TranslationValue> {
    if competitor.contains('.') {
        return None;
    }
    tr.get(&format!("alternatives.{}", competitor))
        .filter(|value| value.as_tree().is_some())
}

/// First value of `name` in a raw `a=1&b=2` query. Repeated keys keep the
/// first occurrence.
pub(crate) fn query_param(query: &str, name: &str) -> Option<String> {
    let query = query.split('#').next().unwrap_or("");

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| {
            urlencoding::decode(&value.replace('+', " "))
                .ok()
                .map(|value| value.into_owned())
        })
}

/// Text items of a list value.
fn texts(value: Option<&TranslationValue>) -> Vec<String> {
    value
        .and_then(TranslationValue::as_list)
        .unwrap_or(&[])
        .iter()
        .filter_map(TranslationValue::as_text)
        .map(str::to_string)
        .collect()
}

fn field(value: &TranslationValue, key: &str) -> String {
    escape_html(value.field(key).unwrap_or_default())
}

fn text(tr: &Translator<'_>, key: &str) -> String {
    escape_html(&tr.text(key))
}

fn link(tr: &Translator<'_>, path: &str, label: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        escape_html(&localized_path(tr.language(), path)),
        escape_html(label)
    )
}

fn hero(tr: &Translator<'_>, ns: &str) -> String {
    format!(
        "<section class=\"hero\"><h1>{}</h1><p>{}</p></section>",
        text(tr, &format!("{}.heroTitle", ns)),
        text(tr, &format!("{}.heroDescription", ns))
    )
}

fn card(item: &TranslationValue) -> String {
    format!(
        "<li><h3>{}</h3><p>{}</p></li>",
        field(item, "title"),
        field(item, "description")
    )
}

fn bullet_list(items: &[TranslationValue]) -> String {
    let items: String = items
        .iter()
        .filter_map(TranslationValue::as_text)
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!("<ul>{}</ul>", items)
}

fn feature_cards(tr: &Translator<'_>) -> String {
    FEATURE_KEYS
        .iter()
        .map(|key| {
            format!(
                "<li><h3>{}</h3><p>{}</p></li>",
                text(tr, &format!("features.{}.title", key)),
                text(tr, &format!("features.{}.description", key))
            )
        })
        .collect()
}

fn home_body(tr: &Translator<'_>) -> String {
    format!(
        "{}<section><ul class=\"cards\">{}</ul></section><section class=\"cta\">{}</section>",
        hero(tr, "home"),
        feature_cards(tr),
        link(tr, "/pricing", &tr.text("hero.startFreeTrial"))
    )
}

fn landing_body(tr: &Translator<'_>, target: LandingTarget) -> String {
    let key = format!("landing.{}", target.as_str());
    let workflow = tr.list(&format!("{}.workflow", key));

    format!(
        "<section class=\"hero\"><p class=\"eyebrow\">{}</p><h1>{} <em>{}</em></h1><p>{}</p>{}{}</section>\
         <section><ol class=\"steps\">{}</ol></section>",
        text(tr, &format!("{}.hero.eyebrow", key)),
        text(tr, &format!("{}.hero.title", key)),
        text(tr, &format!("{}.hero.highlight", key)),
        text(tr, &format!("{}.hero.description", key)),
        bullet_list(tr.list(&format!("{}.hero.bulletPoints", key))),
        link(tr, "/pricing", &tr.text(&format!("{}.hero.primaryCtaLabel", key))),
        workflow.iter().map(card).collect::<String>()
    )
}

fn pricing_body(tr: &Translator<'_>) -> String {
    let month = tr.text("pricingDetails.monthText");
    let popular = tr.text("pricingDetails.mostPopular");

    let plans: String = tr
        .list("pricingDetails.plans")
        .iter()
        .map(|plan| {
            let badge = if plan.field("popular") == Some("true") {
                format!("<span class=\"badge\">{}</span>", escape_html(&popular))
            } else {
                String::new()
            };
            let features = plan
                .child("features")
                .and_then(TranslationValue::as_list)
                .unwrap_or(&[]);
            format!(
                "<li class=\"plan\">{}<h3>{}</h3><p class=\"price\">{}{}</p><p>{}</p>{}{}</li>",
                badge,
                field(plan, "name"),
                field(plan, "price"),
                escape_html(&month),
                field(plan, "description"),
                bullet_list(features),
                link(tr, "/contact", &tr.text("pricingDetails.getStartedButton"))
            )
        })
        .collect();

    format!("{}<section><ul class=\"plans\">{}</ul></section>", hero(tr, "pricingDetails"), plans)
}

fn faq_body(tr: &Translator<'_>) -> String {
    let categories: String = tr
        .list("faq.categories")
        .iter()
        .map(|category| {
            let questions: String = category
                .child("questions")
                .and_then(TranslationValue::as_list)
                .unwrap_or(&[])
                .iter()
                .map(|faq| {
                    format!(
                        "<details><summary>{}</summary><p>{}</p></details>",
                        field(faq, "question"),
                        field(faq, "answer")
                    )
                })
                .collect();
            format!("<section><h2>{}</h2>{}</section>", field(category, "category"), questions)
        })
        .collect();

    format!(
        "{}{}<section class=\"cta\"><h2>{}</h2><p>{}</p>{}</section>",
        hero(tr, "faq"),
        categories,
        text(tr, "faq.stillHaveQuestions.title"),
        text(tr, "faq.stillHaveQuestions.description"),
        link(tr, "/contact", &tr.text("navigation.contact"))
    )
}

fn about_body(tr: &Translator<'_>, site: &SiteConfig) -> String {
    format!(
        "{}<section><ul class=\"cards\">{}</ul></section>\
         <section><h2>{}</h2><address>{}<br>{}, {}<br><a href=\"mailto:{}\">{}</a></address></section>",
        hero(tr, "about"),
        tr.list("about.values").iter().map(card).collect::<String>(),
        text(tr, "about.headquarters"),
        escape_html(schema::CONTACT_STREET),
        escape_html(schema::CONTACT_CITY),
        escape_html(schema::CONTACT_COUNTRY),
        escape_html(&site.contact_email),
        escape_html(&site.contact_email)
    )
}

fn contact_body(tr: &Translator<'_>, site: &SiteConfig) -> String {
    let hours: String = schema::BUSINESS_HOURS
        .iter()
        .map(|(day, hours)| {
            format!(
                "<li><span>{}</span> {}</li>",
                text(tr, &format!("contactPage.days.{}", day)),
                escape_html(hours)
            )
        })
        .collect();

    format!(
        "{}<section><h2>{}</h2><address>{}<br>{}, {}<br><a href=\"mailto:{}\">{}</a></address>\
         <h2>{}</h2><ul class=\"hours\">{}</ul></section>",
        hero(tr, "contactPage"),
        text(tr, "contactPage.infoTitle"),
        escape_html(schema::CONTACT_STREET),
        escape_html(schema::CONTACT_CITY),
        escape_html(schema::CONTACT_COUNTRY),
        escape_html(&site.contact_email),
        escape_html(&site.contact_email),
        text(tr, "contactPage.hoursTitle"),
        hours
    )
}

fn blog_body(tr: &Translator<'_>) -> String {
    let posts = tr.list("blog.posts");
    if posts.is_empty() {
        return format!("{}<p>{}</p>", hero(tr, "blog"), text(tr, "blog.emptyState"));
    }

    let read_more = tr.text("blog.readMore");
    let items: String = posts
        .iter()
        .map(|post| {
            let slug = post.field("slug").unwrap_or_default();
            format!(
                "<li><p class=\"category\">{}</p><h3>{}</h3><p>{}</p>{}</li>",
                field(post, "category"),
                field(post, "title"),
                field(post, "excerpt"),
                link(tr, &format!("/blog/{}", slug), &read_more)
            )
        })
        .collect();

    format!("{}<section><ul class=\"posts\">{}</ul></section>", hero(tr, "blog"), items)
}

fn blog_article_body(tr: &Translator<'_>, slug: &str) -> String {
    let back = link(tr, "/blog", &tr.text("blog.backToBlog"));

    let Some(post) = find_post(tr, slug) else {
        return format!(
            "<section class=\"not-found\"><h1>{}</h1><p>{}</p>{}</section>",
            text(tr, "blog.articleNotFoundTitle"),
            text(tr, "blog.articleNotFoundDescription"),
            back
        );
    };

    let paragraphs: String = post
        .child("content")
        .and_then(TranslationValue::as_list)
        .unwrap_or(&[])
        .iter()
        .filter_map(TranslationValue::as_text)
        .map(|p| format!("<p>{}</p>", escape_html(p)))
        .collect();
    let tags: String = texts(post.child("tags"))
        .iter()
        .map(|tag| format!("<span class=\"tag\">#{}</span>", escape_html(tag)))
        .collect();

    format!(
        "<article><header><p class=\"category\">{}</p><h1>{}</h1><p class=\"meta\">{} &bull; {} &bull; {}</p></header>\
         {}<footer>{}</footer></article>{}",
        field(post, "category"),
        field(post, "title"),
        field(post, "published"),
        field(post, "readingTime"),
        field(post, "author"),
        paragraphs,
        tags,
        back
    )
}

fn alternative_body(tr: &Translator<'_>, competitor: &str) -> String {
    let Some(content) = alternative(tr, competitor) else {
        return not_found_body(tr);
    };

    let name = content.field("name").unwrap_or(competitor);
    let with_name = |value: Option<&str>| {
        escape_html(&value.unwrap_or_default().replace("{competitor}", name))
    };
    let hero_content = content.child("hero");
    let pain_points: String = content
        .child("painPoints")
        .and_then(TranslationValue::as_list)
        .unwrap_or(&[])
        .iter()
        .map(card)
        .collect();

    format!(
        "<section class=\"hero\"><h1>{}</h1><p>{}</p>{}</section>\
         <section><h2>{}</h2><ul class=\"cards\">{}</ul></section>",
        with_name(hero_content.and_then(|h| h.field("title"))),
        with_name(hero_content.and_then(|h| h.field("subtitle"))),
        link(
            tr,
            "/pricing",
            hero_content.and_then(|h| h.field("cta")).unwrap_or_default()
        ),
        with_name(content.field("painPointsTitle")),
        pain_points
    )
}

fn legal_body(tr: &Translator<'_>, ns: &str, legal: Option<&LegalContent>) -> String {
    let content = match legal {
        Some(LegalContent::Loaded {
            content,
            created_at,
        }) => {
            let updated = match created_at.as_deref().filter(|d| !d.is_empty()) {
                Some(date) => format!(
                    "<p class=\"updated\">{}{}</p>",
                    text(tr, &format!("{}.lastUpdated", ns)),
                    escape_html(date)
                ),
                None => String::new(),
            };
            format!(
                "{}<div class=\"legal\" style=\"white-space: pre-line\">{}</div>",
                updated,
                escape_html(content)
            )
        }
        Some(LegalContent::Unavailable) | None => {
            format!("<p class=\"error\">{}</p>", text(tr, &format!("{}.loadError", ns)))
        }
    };

    format!(
        "<section><h1>{}</h1>{}</section>",
        text(tr, &format!("{}.heading", ns)),
        content
    )
}

fn not_found_body(tr: &Translator<'_>) -> String {
    let explore: String = [
        ("/", "navigation.home"),
        ("/features", "navigation.features"),
        ("/contact", "navigation.contact"),
    ]
    .iter()
    .map(|(path, key)| {
        let section = tr.text(key);
        format!(
            "<li>{}<p>{}</p></li>",
            link(tr, path, &section),
            escape_html(&tr.format("notFound.linkDescription", &[("section", &section)]))
        )
    })
    .collect();

    format!(
        "<section class=\"not-found\"><p class=\"tagline\">{}</p><h1>{}</h1><p>{}</p>\
         <p>{} {}</p><h2>{}</h2><ul>{}</ul></section>",
        text(tr, "notFound.tagline"),
        text(tr, "notFound.title"),
        text(tr, "notFound.subtitle"),
        link(tr, "/", &tr.text("notFound.primaryCta")),
        link(tr, "/contact", &tr.text("notFound.secondaryCta")),
        text(tr, "notFound.explore"),
        explore
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Catalog, Language};
    use serde_json::json;
    use std::collections::HashMap;

    fn catalog() -> Catalog {
        let mut trees = HashMap::new();
        trees.insert(
            Language::ENGLISH,
            TranslationValue::from_json(json!({
                "navigation": { "home": "Home", "features": "Features", "contact": "Contact", "faq": "FAQ" },
                "faq": {
                    "pageTitle": "FAQ | asyncz",
                    "metaDescription": "Answers",
                    "heroTitle": "Questions",
                    "heroDescription": "We answer",
                    "keywords": ["asyncz faq", "asyncz support"],
                    "categories": [
                        { "category": "General", "questions": [
                            { "question": "What?", "answer": "<b>This</b>" }
                        ]}
                    ]
                },
                "blog": {
                    "pageTitle": "Blog",
                    "metaDescription": "Stories",
                    "backToBlog": "Back",
                    "articleNotFoundTitle": "No such article",
                    "posts": [
                        { "slug": "launch", "title": "Launch", "excerpt": "We launched",
                          "published": "2025-03-01", "author": "Team", "tags": ["news"],
                          "content": ["First.", "Second."] }
                    ]
                },
                "alternatives": {
                    "calendly": {
                        "name": "Calendly",
                        "seo": { "title": "Calendly alternative", "description": "Compare" },
                        "hero": { "title": "Better than {competitor}", "subtitle": "s", "cta": "Go" }
                    }
                },
                "notFound": {
                    "pageTitle": "Not found",
                    "title": "Lost?",
                    "linkDescription": "Discover more about {section}."
                },
                "privacyPolicy": {
                    "pageTitle": "Privacy",
                    "heading": "Privacy Policy",
                    "lastUpdated": "Last updated: ",
                    "loadError": "Failed to load"
                }
            }))
            .unwrap(),
        );
        Catalog::from_trees(trees)
    }

    fn de(catalog: &Catalog) -> Translator<'_> {
        catalog.translator(Language::parse("de").unwrap())
    }

    // ==================== Routing Tests ====================

    #[test]
    fn test_resolve_static_pages() {
        assert_eq!(Page::resolve("/en"), Page::Home);
        assert_eq!(Page::resolve("/de/pricing"), Page::Pricing);
        assert_eq!(Page::resolve("/tr/how-it-works?x=1"), Page::HowItWorks);
        assert_eq!(
            Page::resolve("/en/cookie-policy"),
            Page::Legal(LegalAgreementType::CookiePolicy)
        );
        assert_eq!(Page::resolve("/ja/help-center/"), Page::HelpCenter);
    }

    #[test]
    fn test_resolve_parameterized_pages() {
        assert_eq!(
            Page::resolve("/en/blog/launch"),
            Page::BlogArticle("launch".to_string())
        );
        assert_eq!(
            Page::resolve("/fr/alternative/calendly"),
            Page::Alternative("calendly".to_string())
        );
    }

    #[test]
    fn test_resolve_unknown_is_not_found() {
        assert_eq!(Page::resolve("/en/nope"), Page::NotFound);
        assert_eq!(Page::resolve("/en/blog/a/b"), Page::NotFound);
    }

    #[test]
    fn test_resolve_landing_target() {
        assert_eq!(
            Page::resolve("/en?target=Dentist"),
            Page::Landing(LandingTarget::Dentist)
        );
        assert_eq!(Page::resolve("/en?target=plumber"), Page::Home);
        assert_eq!(Page::resolve("/en/pricing?target=barber"), Page::Pricing);
    }

    #[test]
    fn test_static_paths_resolve_to_themselves() {
        for path in STATIC_PATHS {
            let page = Page::resolve(path);
            assert_ne!(page, Page::NotFound, "{}", path);
            assert_eq!(page.clean_path().as_deref(), Some(*path));
        }
    }

    // ==================== Content Tests ====================

    #[test]
    fn test_unknown_competitor_settles_to_not_found() {
        let catalog = catalog();
        let tr = de(&catalog);

        assert_eq!(
            Page::Alternative("calendly".into()).settle(&tr),
            Page::Alternative("calendly".into())
        );
        assert_eq!(Page::Alternative("acme".into()).settle(&tr), Page::NotFound);
    }

    #[test]
    fn test_missing_blog_post_is_404_and_noindex() {
        let catalog = catalog();
        let tr = de(&catalog);
        let page = Page::BlogArticle("missing".into());

        assert_eq!(page.status(&tr), StatusCode::NOT_FOUND);
        let seo = page.seo(&tr, &SiteConfig::default());
        assert!(seo.noindex);
        assert_eq!(seo.title, "asyncz");
        assert!(page.body(&tr, &SiteConfig::default(), None).contains("No such article"));
    }

    #[test]
    fn test_blog_post_seo() {
        let catalog = catalog();
        let tr = de(&catalog);
        let seo = Page::BlogArticle("launch".into()).seo(&tr, &SiteConfig::default());

        assert_eq!(seo.title, "Launch");
        assert_eq!(seo.page_type, "article");
        assert_eq!(seo.keywords, vec!["news"]);
        assert_eq!(
            seo.structured_data[0]["url"],
            "https://asyncz.com/de/blog/launch"
        );
    }

    #[test]
    fn test_faq_seo_and_body() {
        let catalog = catalog();
        let tr = de(&catalog);
        let site = SiteConfig::default();

        let seo = Page::Faq.seo(&tr, &site);
        assert_eq!(seo.title, "FAQ | asyncz");
        assert_eq!(seo.path.as_deref(), Some("/faq"));
        assert_eq!(seo.keywords.len(), 2);
        assert_eq!(seo.structured_data[1]["@type"], "FAQPage");

        let body = Page::Faq.body(&tr, &site, None);
        assert!(body.contains("<summary>What?</summary><p>&lt;b&gt;This&lt;/b&gt;</p>"));
        assert!(body.contains("href=\"/de/contact\""));
    }

    #[test]
    fn test_alternative_body_substitutes_name() {
        let catalog = catalog();
        let tr = de(&catalog);
        let body = Page::Alternative("calendly".into()).body(&tr, &SiteConfig::default(), None);

        assert!(body.contains("<h1>Better than Calendly</h1>"));
        assert!(body.contains("<a href=\"/de/pricing\">Go</a>"));
    }

    #[test]
    fn test_not_found_body_formats_sections() {
        let catalog = catalog();
        let tr = de(&catalog);
        let body = Page::NotFound.body(&tr, &SiteConfig::default(), None);

        assert!(body.contains("Discover more about Features."));
        assert!(body.contains("<a href=\"/de/features\">Features</a>"));
        assert!(Page::NotFound.seo(&tr, &SiteConfig::default()).noindex);
        assert_eq!(Page::NotFound.status(&tr), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_legal_body_states() {
        let catalog = catalog();
        let tr = de(&catalog);
        let page = Page::Legal(LegalAgreementType::PrivacyPolicy);
        let site = SiteConfig::default();

        let loaded = LegalContent::Loaded {
            content: "Line <1>".into(),
            created_at: Some("2025-01-01".into()),
        };
        let body = page.body(&tr, &site, Some(&loaded));
        assert!(body.contains("Last updated: 2025-01-01"));
        assert!(body.contains("Line &lt;1&gt;"));

        let body = page.body(&tr, &site, Some(&LegalContent::Unavailable));
        assert!(body.contains("Failed to load"));
    }

    #[test]
    fn test_sitemap_paths_include_posts_and_alternatives() {
        let catalog = catalog();
        let paths = sitemap_paths(&catalog.translator(Language::ENGLISH));

        assert!(paths.contains(&"/".to_string()));
        assert!(paths.contains(&"/blog/launch".to_string()));
        assert!(paths.contains(&"/alternative/calendly".to_string()));
        assert_eq!(paths.len(), STATIC_PATHS.len() + 2);
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("a=1&target=doctor#x", "target").as_deref(), Some("doctor"));
        assert_eq!(query_param("target=den%74ist", "target").as_deref(), Some("dentist"));
        assert_eq!(query_param("path=%2Fen+faq", "path").as_deref(), Some("/en faq"));
        assert_eq!(query_param("", "target"), None);
        assert_eq!(query_param("#target=x", "target"), None);
    }

    #[test]
    fn test_query_param_repeated_key_keeps_first() {
        assert_eq!(query_param("ref=a&ref=b", "ref").as_deref(), Some("a"));
        assert_eq!(query_param("path=/en&path=/en/faq", "path").as_deref(), Some("/en"));
    }
}
