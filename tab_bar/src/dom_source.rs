use tab_bar_switcher::{FragmentKind, FragmentSource, Result, SwitchError};
use web_sys::{DomParser, SupportedType};

use crate::js_error;

/// A fetched page parsed by the browser's `DOMParser`. The document is never
/// attached, so its scripts don't run and its images don't load.
#[derive(Debug, Clone)]
pub struct DomSource {
    document: web_sys::Document,
}

impl DomSource {
    pub fn parse(html: &str) -> Result<Self> {
        let parser = DomParser::new().map_err(js_error(SwitchError::Parse))?;
        let document = parser
            .parse_from_string(html, SupportedType::TextHtml)
            .map_err(js_error(SwitchError::Parse))?;

        Ok(Self { document })
    }
}

impl FragmentSource for DomSource {
    fn fragment(&self, selector: &str) -> Option<String> {
        let element = self.document.query_selector(selector).ok()??;

        match FragmentKind::from_tag_name(&element.tag_name()) {
            FragmentKind::Meta => Some(element.get_attribute("content").unwrap_or_default()),
            FragmentKind::Link => element.get_attribute("href"),
            FragmentKind::Markup => Some(element.inner_html()),
        }
    }

    fn title(&self) -> Option<String> {
        let title = self.document.query_selector("title").ok()??;

        title.text_content()
    }
}
