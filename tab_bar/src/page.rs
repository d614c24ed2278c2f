use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use log::warn;
use tab_bar_switcher::{
    FragmentKind, HistoryMode, Page, Result, SwapState, SwitchError, Trigger, TriggerKey,
    TriggerKind, TriggerSet,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlSelectElement, Window};

use crate::dom_source::DomSource;
use crate::js_error;

/// Called with the kind and target of an activated trigger.
pub type ActivationHandler = Rc<dyn Fn(TriggerKind, String)>;

type Listener = Closure<dyn FnMut(web_sys::Event)>;

struct BoundListener {
    element: Element,
    event: &'static str,
    callback: Listener,
}

/// The live document around one tab bar host element.
pub struct BrowserPage {
    window: Window,
    document: Document,
    host: Element,
    // trigger elements by key, rebuilt on every enumeration
    registry: RefCell<Vec<Element>>,
    bound: RefCell<Vec<BoundListener>>,
    on_activate: RefCell<Option<ActivationHandler>>,
}

impl BrowserPage {
    pub fn new(window: Window, host: Element) -> Result<Self> {
        let document = window
            .document()
            .ok_or_else(|| SwitchError::Dom("window has no document".to_owned()))?;

        Ok(Self {
            window,
            document,
            host,
            registry: RefCell::new(Vec::new()),
            bound: RefCell::new(Vec::new()),
            on_activate: RefCell::new(None),
        })
    }

    pub fn host(&self) -> &Element {
        &self.host
    }

    /// Sets where trigger activations go. Takes effect at the next bind.
    pub fn set_activation_handler(&self, handler: ActivationHandler) {
        *self.on_activate.borrow_mut() = Some(handler);
    }

    fn register(&self, element: Element) -> TriggerKey {
        let mut registry = self.registry.borrow_mut();

        if let Some(index) = registry
            .iter()
            .position(|known| known.is_same_node(Some(&element)))
        {
            return TriggerKey(index);
        }

        registry.push(element);
        TriggerKey(registry.len() - 1)
    }

    fn element(&self, key: TriggerKey) -> Option<Element> {
        self.registry.borrow().get(key.0).cloned()
    }

    fn unbind(&self) {
        for listener in self.bound.borrow_mut().drain(..) {
            let _ = listener.element.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
    }
}

fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        warn!("invalid selector {selector}");
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn listener(kind: TriggerKind, handler: ActivationHandler) -> Listener {
    Closure::wrap(Box::new(move |event: web_sys::Event| {
        let Some(element) = event
            .current_target()
            .and_then(|target| target.dyn_into::<Element>().ok())
        else {
            return;
        };

        let target = match kind {
            TriggerKind::Anchor => {
                event.prevent_default();
                event.stop_immediate_propagation();
                element.get_attribute("href")
            }
            TriggerKind::Button => button_target(&element),
            TriggerKind::Select => element
                .dyn_ref::<HtmlSelectElement>()
                .map(HtmlSelectElement::value),
        };

        if let Some(target) = target {
            handler(kind, target);
        }
    }) as Box<dyn FnMut(web_sys::Event)>)
}

fn button_target(element: &Element) -> Option<String> {
    element
        .get_attribute(tab_bar_switcher::URL_ATTRIBUTE)
        .or_else(|| element.get_attribute(tab_bar_switcher::HANDLE_ATTRIBUTE))
}

fn trigger_kind(element: &Element) -> Option<TriggerKind> {
    match element.tag_name().to_ascii_lowercase().as_str() {
        "a" => Some(TriggerKind::Anchor),
        "button" => Some(TriggerKind::Button),
        "select" => Some(TriggerKind::Select),
        _ => None,
    }
}

impl Page for BrowserPage {
    type Source = DomSource;

    fn host_attribute(&self, name: &str) -> Option<String> {
        self.host.get_attribute(name)
    }

    fn set_host_attribute(&self, name: &str, value: &str) {
        if let Err(err) = self.host.set_attribute(name, value) {
            warn!("could not set {name} on the tab bar: {err:?}");
        }
    }

    fn title(&self) -> String {
        self.document.title()
    }

    fn set_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn patch_fragment(&self, selector: &str, value: &str) -> bool {
        let Ok(Some(element)) = self.document.query_selector(selector) else {
            return false;
        };

        match FragmentKind::from_tag_name(&element.tag_name()).attribute() {
            Some(attribute) => {
                if let Err(err) = element.set_attribute(attribute, value) {
                    warn!("could not patch {selector}: {err:?}");
                }
            }
            None => element.set_inner_html(value),
        }

        true
    }

    fn write_history(&self, mode: HistoryMode, state: &SwapState, url: &str) -> Result<()> {
        let history = self
            .window
            .history()
            .map_err(js_error(SwitchError::History))?;
        let state_value =
            js_sys::JSON::parse(&state.to_json()?).map_err(js_error(SwitchError::History))?;

        match mode {
            HistoryMode::Push => history.push_state_with_url(&state_value, &state.title, Some(url)),
            HistoryMode::Replace => {
                history.replace_state_with_url(&state_value, &state.title, Some(url))
            }
        }
        .map_err(js_error(SwitchError::History))
    }

    fn toggle_class(&self, selector: &str, class: &str, enabled: bool) {
        let Ok(Some(element)) = self.document.query_selector(selector) else {
            return;
        };

        let class_list = element.class_list();
        let result = if enabled {
            class_list.add_1(class)
        } else {
            class_list.remove_1(class)
        };

        if let Err(err) = result {
            warn!("could not toggle {class} on {selector}: {err:?}");
        }
    }

    fn host_triggers(&self) -> Vec<Trigger> {
        self.registry.borrow_mut().clear();

        query_all(&self.host, "a, button, select")
            .into_iter()
            .filter_map(|element| {
                let kind = trigger_kind(&element)?;
                let target = match kind {
                    TriggerKind::Anchor => element.get_attribute("href").unwrap_or_default(),
                    TriggerKind::Button => button_target(&element).unwrap_or_default(),
                    TriggerKind::Select => element
                        .dyn_ref::<HtmlSelectElement>()
                        .map(HtmlSelectElement::value)
                        .unwrap_or_default(),
                };

                Some(Trigger {
                    key: self.register(element),
                    kind,
                    target,
                    in_host: true,
                })
            })
            .collect()
    }

    fn anchors_matching(&self, href: &str) -> Vec<Trigger> {
        let Some(root) = self.document.document_element() else {
            return Vec::new();
        };

        let selector = format!(r#"a[href*="{}"]"#, href.replace('\\', "\\\\").replace('"', "\\\""));

        query_all(&root, &selector)
            .into_iter()
            .map(|element| {
                let in_host = self.host.contains(Some(&element));
                let target = element.get_attribute("href").unwrap_or_default();

                Trigger {
                    key: self.register(element),
                    kind: TriggerKind::Anchor,
                    target,
                    in_host,
                }
            })
            .collect()
    }

    fn set_trigger_attribute(&self, key: TriggerKey, name: &str, value: Option<&str>) {
        let Some(element) = self.element(key) else {
            return;
        };

        let result = match value {
            Some(value) => element.set_attribute(name, value),
            None => element.remove_attribute(name),
        };

        if let Err(err) = result {
            warn!("could not update {name} on a tab bar trigger: {err:?}");
        }
    }

    fn bind_triggers(&self, triggers: &TriggerSet) {
        self.unbind();

        let Some(handler) = self.on_activate.borrow().clone() else {
            return;
        };

        let mut bound = self.bound.borrow_mut();

        for trigger in triggers.iter() {
            let Some(element) = self.element(trigger.key) else {
                continue;
            };

            let event = match trigger.kind {
                TriggerKind::Select => "change",
                TriggerKind::Anchor | TriggerKind::Button => "click",
            };
            let callback = listener(trigger.kind, handler.clone());

            if let Err(err) =
                element.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            {
                warn!("could not bind a tab bar trigger: {err:?}");
                continue;
            }

            bound.push(BoundListener {
                element,
                event,
                callback,
            });
        }
    }

    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String>> {
        let request = self.window.fetch_with_str(url);

        async move {
            let response = JsFuture::from(request)
                .await
                .map_err(js_error(SwitchError::Network))?;
            let response: web_sys::Response = response
                .dyn_into()
                .map_err(js_error(SwitchError::Parse))?;
            let text = response.text().map_err(js_error(SwitchError::Parse))?;
            let text = JsFuture::from(text)
                .await
                .map_err(js_error(SwitchError::Network))?;

            text.as_string()
                .ok_or_else(|| SwitchError::Parse("response body is not text".to_owned()))
        }
    }

    fn parse_document(&self, html: &str) -> Result<Self::Source> {
        DomSource::parse(html)
    }
}

impl Drop for BrowserPage {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl std::fmt::Debug for BrowserPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserPage")
            .field("host", &self.host.tag_name())
            .field("triggers", &self.registry.borrow().len())
            .field("bound", &self.bound.borrow().len())
            .finish()
    }
}
