use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error};
use tab_bar_switcher::{
    CONFIG_ATTRIBUTE, CollectionSwitcher, Page, Result, SwapState, SwitchError, SwitcherConfig,
    TriggerKind,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Window};

use crate::js_error;
use crate::page::BrowserPage;

/// Elements that host a tab bar.
pub const HOST_SELECTOR: &str = "tab-bar, [data-tab-bar]";

type Switcher = CollectionSwitcher<BrowserPage>;

thread_local! {
    static MOUNTED: RefCell<Vec<TabBar>> = const { RefCell::new(Vec::new()) };
}

/// A tab bar mounted on one host element.
#[derive(Debug, Clone)]
pub struct TabBar {
    switcher: Rc<Switcher>,
}

impl TabBar {
    pub fn switcher(&self) -> &Switcher {
        &self.switcher
    }

    pub fn host(&self) -> &Element {
        self.switcher.page().host()
    }
}

/// Builds the switcher for `host` and installs its listeners. The returned
/// handle keeps it alive; dropping the last handle detaches the triggers.
pub fn mount(window: &Window, host: Element) -> Result<TabBar> {
    let page = BrowserPage::new(window.clone(), host)?;
    let config = SwitcherConfig::from_attribute(page.host_attribute(CONFIG_ATTRIBUTE).as_deref());

    let switcher = Rc::new_cyclic(|weak: &std::rc::Weak<Switcher>| {
        let weak = weak.clone();

        page.set_activation_handler(Rc::new(move |kind: TriggerKind, target: String| {
            let Some(switcher) = weak.upgrade() else {
                return;
            };

            spawn_local(async move {
                let _ = switcher.activate(kind, &target).await;
            });
        }));

        CollectionSwitcher::new(page, config)
    });

    listen(window, &switcher)?;

    Ok(TabBar { switcher })
}

/// Mounts every host on the page that isn't mounted yet and keeps the tab
/// bars alive for the lifetime of the page.
pub fn mount_all() -> Result<usize> {
    let window =
        web_sys::window().ok_or_else(|| SwitchError::Dom("window not found".to_owned()))?;
    let document = window
        .document()
        .ok_or_else(|| SwitchError::Dom("document not found".to_owned()))?;
    let hosts = document
        .query_selector_all(HOST_SELECTOR)
        .map_err(js_error(SwitchError::Dom))?;

    let hosts = (0..hosts.length())
        .filter_map(|i| hosts.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter(|host| {
            !MOUNTED.with(|tab_bars| {
                tab_bars
                    .borrow()
                    .iter()
                    .any(|tab_bar| tab_bar.host().is_same_node(Some(host)))
            })
        });

    let tab_bars = mount_each(hosts, |host| mount(&window, host));
    let mounted = tab_bars.len();

    MOUNTED.with(|mounted| mounted.borrow_mut().extend(tab_bars));

    Ok(mounted)
}

// A host that fails to mount is logged and skipped; the others still mount
fn mount_each<H, T>(
    hosts: impl IntoIterator<Item = H>,
    mut mount: impl FnMut(H) -> Result<T>,
) -> Vec<T> {
    hosts
        .into_iter()
        .filter_map(|host| match mount(host) {
            Ok(mounted) => Some(mounted),
            Err(err) => {
                error!("skipping a tab bar that failed to mount: {err}");
                None
            }
        })
        .collect()
}

fn listen(window: &Window, switcher: &Rc<Switcher>) -> Result<()> {
    let popstate_callback = {
        let weak = Rc::downgrade(switcher);

        Closure::wrap(Box::new(move |event: web_sys::PopStateEvent| {
            let Some(switcher) = weak.upgrade() else {
                return;
            };

            let state = js_sys::JSON::stringify(&event.state())
                .ok()
                .and_then(|json| json.as_string())
                .and_then(|json| SwapState::from_json(&json));

            spawn_local(async move {
                let _ = switcher.on_popstate(state).await;
            });
        }) as Box<dyn FnMut(_)>)
    };

    window
        .add_event_listener_with_callback("popstate", popstate_callback.as_ref().unchecked_ref())
        .map_err(js_error(SwitchError::Dom))?;
    popstate_callback.forget();

    let pageshow_callback = {
        let weak = Rc::downgrade(switcher);

        Closure::wrap(Box::new(move |_event: web_sys::PageTransitionEvent| {
            let Some(switcher) = weak.upgrade() else {
                return;
            };

            spawn_local(async move {
                let _ = switcher.on_pageshow().await;
            });
        }) as Box<dyn FnMut(_)>)
    };

    window
        .add_event_listener_with_callback("pageshow", pageshow_callback.as_ref().unchecked_ref())
        .map_err(js_error(SwitchError::Dom))?;
    pageshow_callback.forget();

    // The module may start after `load` already fired
    let loaded = window
        .document()
        .is_some_and(|document| document.ready_state() == "complete");

    if loaded {
        debug!("page already loaded, attaching tab bar state now");
        switcher.on_load();
        return Ok(());
    }

    let load_callback = {
        let weak = Rc::downgrade(switcher);

        Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let Some(switcher) = weak.upgrade() {
                switcher.on_load();
            }
        }) as Box<dyn FnMut(_)>)
    };

    window
        .add_event_listener_with_callback("load", load_callback.as_ref().unchecked_ref())
        .map_err(js_error(SwitchError::Dom))?;
    load_callback.forget();

    Ok(())
}
