use serde::{Deserialize, Serialize};

/// How a region's value is read from and written to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// `<meta>`: the `content` attribute
    Meta,
    /// `<link>`: the `href` attribute
    Link,
    /// Anything else: the inner markup
    Markup,
}

impl FragmentKind {
    pub fn from_tag_name(tag_name: &str) -> Self {
        if tag_name.eq_ignore_ascii_case("meta") {
            FragmentKind::Meta
        } else if tag_name.eq_ignore_ascii_case("link") {
            FragmentKind::Link
        } else {
            FragmentKind::Markup
        }
    }

    /// The attribute carrying the value, `None` for inner markup.
    pub fn attribute(self) -> Option<&'static str> {
        match self {
            FragmentKind::Meta => Some("content"),
            FragmentKind::Link => Some("href"),
            FragmentKind::Markup => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentEntry {
    pub name: String,
    pub selector: String,
}

/// Ordered regions copied from a fetched collection page into the live one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentMap {
    entries: Vec<FragmentEntry>,
}

impl FragmentMap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a region. A name that is already present has its selector
    /// replaced in place, keeping its position.
    pub fn with(mut self, name: &str, selector: &str) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) {
            entry.selector = selector.to_owned();
        } else {
            self.entries.push(FragmentEntry {
                name: name.to_owned(),
                selector: selector.to_owned(),
            });
        }

        self
    }

    pub fn selector(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.selector.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FragmentEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FragmentMap {
    /// The regions of a collection page: canonical link, social and SEO meta
    /// tags, the title and description block, the product grid and the tab
    /// bar markup itself.
    fn default() -> Self {
        FragmentMap::new()
            .with("canonicalURL", r#"link[rel="canonical"]"#)
            .with(
                "collectionProducts",
                r#".content-for-layout .shopify-section > [class*="__product-grid"]"#,
            )
            .with(
                "collectionTabBar",
                ".content-for-layout .collection-tabs .tab-bar",
            )
            .with(
                "collectionTitleAndDescription",
                ".content-for-layout .collection-hero__text-wrapper",
            )
            .with("ogDescription", r#"meta[property="og:description"]"#)
            .with("ogImage", r#"meta[property="og:image"]"#)
            .with("ogImageHeight", r#"meta[property="og:image:height"]"#)
            .with(
                "ogImageSecureURL",
                r#"meta[property="og:image:secure_url"]"#,
            )
            .with("ogImageWidth", r#"meta[property="og:image:width"]"#)
            .with("ogTitle", r#"meta[property="og:title"]"#)
            .with("ogURL", r#"meta[property="og:url"]"#)
            .with("pageDescription", r#"meta[name="description"]"#)
            .with("twitterDescription", r#"meta[name="twitter:description"]"#)
            .with("twitterTitle", r#"meta[name="twitter:title"]"#)
    }
}
