use scraper::{Html, Selector};

use crate::{FragmentKind, FragmentSource};

/// A fetched page parsed with `scraper`, for targets without a `DOMParser`.
pub struct HtmlSource {
    document: Html,
}

impl HtmlSource {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }
}

impl FragmentSource for HtmlSource {
    fn fragment(&self, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        let element = self.document.select(&selector).next()?;

        match FragmentKind::from_tag_name(element.value().name()) {
            FragmentKind::Meta => Some(
                element
                    .value()
                    .attr("content")
                    .unwrap_or_default()
                    .to_owned(),
            ),
            FragmentKind::Link => element.value().attr("href").map(str::to_owned),
            FragmentKind::Markup => Some(element.inner_html()),
        }
    }

    fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        let title = self.document.select(&selector).next()?;

        Some(title.text().collect())
    }
}

impl std::fmt::Debug for HtmlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlSource")
            .field("document", &"Html { ... }")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>
      Bar &amp; Co
    </title>
    <link rel="canonical" href="https://shop.test/collections/bar">
    <meta property="og:title" content="Bar">
    <meta name="description">
  </head>
  <body>
    <div class="grid"><p>Item</p></div>
  </body>
</html>"#;

    #[test]
    fn test_fragment_value_rules() {
        let source = HtmlSource::parse(PAGE);

        assert_eq!(
            source.fragment(r#"link[rel="canonical"]"#).as_deref(),
            Some("https://shop.test/collections/bar")
        );
        assert_eq!(
            source.fragment(r#"meta[property="og:title"]"#).as_deref(),
            Some("Bar")
        );
        assert_eq!(source.fragment(r#"meta[name="description"]"#).as_deref(), Some(""));
        assert_eq!(source.fragment(".grid").as_deref(), Some("<p>Item</p>"));
    }

    #[test]
    fn test_missing_and_invalid_selectors() {
        let source = HtmlSource::parse(PAGE);

        assert_eq!(source.fragment(".hero"), None);
        assert_eq!(source.fragment("[[["), None);
    }

    #[test]
    fn test_title_text() {
        let source = HtmlSource::parse(PAGE);

        assert_eq!(
            source.title().map(|t| tab_bar_utils::normalize_title(&t)).as_deref(),
            Some("Bar & Co")
        );
        assert_eq!(HtmlSource::parse("<p>no head</p>").title(), None);
    }
}
