//! schema.org structured data for the site's pages.

use crate::config::SiteConfig;
use crate::i18n::{Language, TranslationValue};
use serde_json::{json, Value};

pub const CONTACT_PHONE: &str = "";

pub const CONTACT_STREET: &str = "IFZA Business Park, Building A1, Dubai Digital Park";
pub const CONTACT_CITY: &str = "Dubai";
pub const CONTACT_COUNTRY: &str = "UAE";

/// Opening hours in week order; `Closed` days are left out of the schema.
pub const BUSINESS_HOURS: &[(&str, &str)] = &[
    ("monday", "09:00-18:00"),
    ("tuesday", "09:00-18:00"),
    ("wednesday", "09:00-18:00"),
    ("thursday", "09:00-18:00"),
    ("friday", "09:00-18:00"),
    ("saturday", "10:00-14:00"),
    ("sunday", "Closed"),
];

pub const SOCIAL_PROFILES: &[&str] = &[
    "https://www.linkedin.com/company/asyncz",
    "https://twitter.com/asynczapp",
];

const PRODUCT_FEATURES: &[&str] = &[
    "Multi-branch orchestration",
    "AI waitlist and routing",
    "Blacklist protection",
    "Analytics and performance dashboards",
];

fn logo(site: &SiteConfig) -> String {
    site.absolute_url("/favicon/icon.png")
}

/// `Mo 09:00-18:00` style entries.
pub fn opening_hours() -> Vec<String> {
    BUSINESS_HOURS
        .iter()
        .filter(|(_, hours)| !hours.is_empty() && !hours.eq_ignore_ascii_case("closed"))
        .map(|(day, hours)| {
            let code: String = day.chars().take(2).collect::<String>().to_uppercase();
            format!("{} {}", code, hours)
        })
        .collect()
}

pub fn organization(site: &SiteConfig) -> Value {
    let languages: Vec<&str> = Language::all().iter().map(|l| l.code()).collect();

    json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": site.site_name,
        "url": site.site_url,
        "logo": logo(site),
        "contactPoint": [{
            "@type": "ContactPoint",
            "telephone": CONTACT_PHONE,
            "email": site.contact_email,
            "contactType": "customer service",
            "areaServed": "Global",
            "availableLanguage": languages,
        }],
        "sameAs": SOCIAL_PROFILES,
    })
}

pub fn local_business(site: &SiteConfig) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "name": site.site_name,
        "image": logo(site),
        "url": site.site_url,
        "telephone": CONTACT_PHONE,
        "email": site.contact_email,
        "address": {
            "@type": "PostalAddress",
            "streetAddress": CONTACT_STREET,
            "addressLocality": CONTACT_CITY,
            "addressRegion": "",
            "postalCode": "",
            "addressCountry": CONTACT_COUNTRY,
        },
        "openingHours": opening_hours(),
    })
}

pub fn product(site: &SiteConfig) -> Value {
    let features: Vec<Value> = PRODUCT_FEATURES
        .iter()
        .map(|feature| {
            json!({
                "@type": "PropertyValue",
                "name": "Feature",
                "value": feature,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "Product",
        "name": format!("{} Scheduling Platform", site.site_name),
        "image": logo(site),
        "description": format!(
            "{} delivers AI-powered scheduling, waitlist automation, and branch coordination for growing service teams.",
            site.site_name
        ),
        "brand": {
            "@type": "Brand",
            "name": site.site_name,
        },
        "offers": {
            "@type": "Offer",
            "priceCurrency": "USD",
            "price": "0.00",
            "availability": "https://schema.org/InStock",
        },
        "additionalProperty": features,
    })
}

/// FAQ page from translated categories shaped `{category, questions: [{question, answer}]}`.
///
/// # Returns
/// An empty object when there are no questions, which the synchronizer drops.
pub fn faq_page(categories: &[TranslationValue]) -> Value {
    let questions: Vec<Value> = categories
        .iter()
        .filter_map(|category| category.child("questions").and_then(TranslationValue::as_list))
        .flatten()
        .filter_map(|item| Some((item.field("question")?, item.field("answer")?)))
        .map(|(question, answer)| {
            json!({
                "@type": "Question",
                "name": question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": answer,
                },
            })
        })
        .collect();

    if questions.is_empty() {
        return json!({});
    }

    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": questions,
    })
}

/// Blog article from a translated post (`title`, `excerpt`, `published`, `author`).
pub fn blog_posting(site: &SiteConfig, post: &TranslationValue, url: &str) -> Value {
    let published = post.field("published").unwrap_or_default();

    json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": post.field("title").unwrap_or_default(),
        "description": post.field("excerpt").unwrap_or_default(),
        "image": site.default_social_image,
        "datePublished": published,
        "dateModified": published,
        "author": {
            "@type": "Person",
            "name": post.field("author").unwrap_or_default(),
        },
        "publisher": {
            "@type": "Organization",
            "name": site.site_name,
            "logo": {
                "@type": "ImageObject",
                "url": logo(site),
            },
        },
        "mainEntityOfPage": url,
        "url": url,
    })
}
