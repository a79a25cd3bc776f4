//! Document head model.
//!
//! Elements written by the SEO synchronizer carry the managed marker
//! (`data-managed="asyncz"`) so a later application can find and replace
//! them without touching anything the page template put there itself.

/// Attribute marking elements owned by the SEO synchronizer.
pub const MANAGED_ATTR: &str = "data-managed";
pub const MANAGED_VALUE: &str = "asyncz";

/// Which attribute identifies a `<meta>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttr {
    Name,
    Property,
    Charset,
}

impl MetaAttr {
    fn as_str(&self) -> &'static str {
        match self {
            MetaAttr::Name => "name",
            MetaAttr::Property => "property",
            MetaAttr::Charset => "charset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadElement {
    Meta {
        attr: MetaAttr,
        key: String,
        content: String,
        managed: bool,
    },
    Link {
        rel: String,
        href: String,
        hreflang: Option<String>,
        managed: bool,
    },
    Script {
        kind: String,
        body: String,
        managed: bool,
    },
}

impl HeadElement {
    pub fn is_managed(&self) -> bool {
        match self {
            HeadElement::Meta { managed, .. }
            | HeadElement::Link { managed, .. }
            | HeadElement::Script { managed, .. } => *managed,
        }
    }

    fn render(&self, out: &mut String) {
        let marker = if self.is_managed() {
            format!(" {}=\"{}\"", MANAGED_ATTR, MANAGED_VALUE)
        } else {
            String::new()
        };

        match self {
            HeadElement::Meta {
                attr: MetaAttr::Charset,
                content,
                ..
            } => {
                out.push_str(&format!("<meta charset=\"{}\">", escape_html(content)));
            }
            HeadElement::Meta {
                attr, key, content, ..
            } => {
                out.push_str(&format!(
                    "<meta {}=\"{}\" content=\"{}\"{}>",
                    attr.as_str(),
                    escape_html(key),
                    escape_html(content),
                    marker
                ));
            }
            HeadElement::Link {
                rel, href, hreflang, ..
            } => {
                out.push_str(&format!("<link rel=\"{}\"", escape_html(rel)));
                if let Some(hreflang) = hreflang {
                    out.push_str(&format!(" hreflang=\"{}\"", escape_html(hreflang)));
                }
                out.push_str(&format!(" href=\"{}\"{}>", escape_html(href), marker));
            }
            HeadElement::Script { kind, body, .. } => {
                out.push_str(&format!(
                    "<script type=\"{}\"{}>{}</script>",
                    escape_html(kind),
                    marker,
                    escape_script_body(body)
                ));
            }
        }
    }
}

/// The `<html>` attributes and `<head>` contents of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadDocument {
    pub lang: String,
    pub dir: String,
    pub title: String,
    elements: Vec<HeadElement>,
}

impl Default for HeadDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadDocument {
    /// A head with the template's own charset, viewport and favicon.
    pub fn new() -> Self {
        Self {
            lang: "en".to_string(),
            dir: "ltr".to_string(),
            title: String::new(),
            elements: vec![
                HeadElement::Meta {
                    attr: MetaAttr::Charset,
                    key: String::new(),
                    content: "utf-8".to_string(),
                    managed: false,
                },
                HeadElement::Meta {
                    attr: MetaAttr::Name,
                    key: "viewport".to_string(),
                    content: "width=device-width, initial-scale=1".to_string(),
                    managed: false,
                },
                HeadElement::Link {
                    rel: "icon".to_string(),
                    href: "/static/favicon/icon.png".to_string(),
                    hreflang: None,
                    managed: false,
                },
            ],
        }
    }

    pub fn elements(&self) -> &[HeadElement] {
        &self.elements
    }

    pub fn push(&mut self, element: HeadElement) {
        self.elements.push(element);
    }

    /// Drop every element carrying the managed marker.
    pub fn remove_managed(&mut self) {
        self.elements.retain(|element| !element.is_managed());
    }

    /// Set a `<meta>` value, updating an existing element with the same key
    /// in place. Empty content is ignored.
    pub fn set_meta(&mut self, attr: MetaAttr, key: &str, content: &str) {
        if content.is_empty() {
            return;
        }

        for element in &mut self.elements {
            if let HeadElement::Meta {
                attr: existing_attr,
                key: existing_key,
                content: existing_content,
                managed,
            } = element
            {
                if *existing_attr == attr && existing_key == key {
                    *existing_content = content.to_string();
                    *managed = true;
                    return;
                }
            }
        }

        self.elements.push(HeadElement::Meta {
            attr,
            key: key.to_string(),
            content: content.to_string(),
            managed: true,
        });
    }

    /// Content of the `<meta>` with `key` (by name or property).
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.elements.iter().find_map(|element| match element {
            HeadElement::Meta {
                attr: MetaAttr::Name | MetaAttr::Property,
                key: k,
                content,
                ..
            } if k == key => Some(content.as_str()),
            _ => None,
        })
    }

    /// `(hreflang, href)` of every `<link>` with `rel`.
    pub fn links(&self, rel: &str) -> Vec<(Option<&str>, &str)> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                HeadElement::Link {
                    rel: r,
                    href,
                    hreflang,
                    ..
                } if r == rel => Some((hreflang.as_deref(), href.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Bodies of every `<script>` of `kind`.
    pub fn scripts(&self, kind: &str) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                HeadElement::Script { kind: k, body, .. } if k == kind => Some(body.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Render the inner HTML of `<head>`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for element in &self.elements {
            if matches!(element, HeadElement::Meta { attr: MetaAttr::Charset, .. }) {
                element.render(&mut out);
                out.push('\n');
            }
        }
        out.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        for element in &self.elements {
            if !matches!(element, HeadElement::Meta { attr: MetaAttr::Charset, .. }) {
                element.render(&mut out);
                out.push('\n');
            }
        }
        out
    }
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Script bodies are raw text; only a closing tag sequence can break out.
fn escape_script_body(body: &str) -> String {
    body.replace("</", "<\\/")
}
