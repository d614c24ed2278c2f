#![allow(missing_docs)]

use std::cell::RefCell;
use std::rc::Rc;

use tab_bar::{BrowserPage, DomSource, mount};
use tab_bar_switcher::{
    CollectionSwitcher, FragmentSource, HistoryMode, Page, SwapState, SwitcherConfig, TriggerKind,
    TriggerSet,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

thread_local! {
    static COUNTER: RefCell<usize> = const { RefCell::new(0) };
}

fn unique_id() -> usize {
    COUNTER.with(|counter| {
        let mut counter = counter.borrow_mut();
        *counter += 1;
        *counter
    })
}

fn window() -> web_sys::Window {
    web_sys::window().expect("no global `window` exists")
}

// Appends `markup` to the body inside a fresh container and returns it
fn append(markup: &str) -> web_sys::Element {
    let document = window().document().expect("no global `document` exists");
    let container = document.create_element("div").expect("failed to create div");

    container.set_id(&format!("test-container-{}", unique_id()));
    container.set_inner_html(markup);
    document
        .body()
        .expect("no global `body` exists")
        .append_child(&container)
        .expect("failed to append container");

    container
}

type Activations = Rc<RefCell<Vec<(TriggerKind, String)>>>;

// A page whose triggers record every activation instead of swapping
fn recording_page(container: &web_sys::Element) -> (BrowserPage, Activations) {
    let page = BrowserPage::new(window(), host_in(container)).unwrap();
    let activations: Activations = Rc::default();
    let recorded = activations.clone();

    page.set_activation_handler(Rc::new(move |kind: TriggerKind, target: String| {
        recorded.borrow_mut().push((kind, target));
    }));

    (page, activations)
}

fn dispatch(container: &web_sys::Element, selector: &str, event: &str) {
    let element = container.query_selector(selector).unwrap().unwrap();
    let event = web_sys::Event::new(event).unwrap();

    element.dispatch_event(&event).unwrap();
}

fn host_in(container: &web_sys::Element) -> web_sys::Element {
    container
        .query_selector("tab-bar")
        .unwrap()
        .expect("no tab-bar in container")
}

#[wasm_bindgen_test]
fn test_dom_source_reads_fragments() {
    let source = DomSource::parse(
        r#"<html><head><title>
  Bar Collection
</title><link rel="canonical" href="/collections/bar"><meta property="og:title" content="Bar"></head>
<body><div class="grid"><p>Bar shirt</p></div></body></html>"#,
    )
    .unwrap();

    assert_eq!(
        source.fragment(r#"link[rel="canonical"]"#).as_deref(),
        Some("/collections/bar")
    );
    assert_eq!(
        source.fragment(r#"meta[property="og:title"]"#).as_deref(),
        Some("Bar")
    );
    assert_eq!(source.fragment(".grid").as_deref(), Some("<p>Bar shirt</p>"));
    assert_eq!(source.fragment(".missing"), None);
    assert_eq!(
        source.title().map(|title| title.trim().to_owned()).as_deref(),
        Some("Bar Collection")
    );
}

#[wasm_bindgen_test]
fn test_trigger_set_includes_page_wide_duplicates() {
    let container = append(
        r#"<tab-bar data-collection-handle="t2-foo" data-collection-url="/collections/t2-foo">
  <a href="/collections/t2-foo">Foo</a>
  <a href="/collections/t2-bar">Bar</a>
  <button data-collection-url="/collections/t2-baz">Baz</button>
  <select><option value="/collections/t2-foo">Foo</option></select>
  <select><option value="/collections/t2-bar">Bar</option></select>
</tab-bar>
<footer><a href="/collections/t2-bar?sort=price">Bar again</a></footer>"#,
    );
    let page = BrowserPage::new(window(), host_in(&container)).unwrap();

    let triggers = TriggerSet::collect(&page);
    let kinds: Vec<TriggerKind> = triggers.iter().map(|trigger| trigger.kind).collect();

    assert_eq!(
        kinds,
        [
            TriggerKind::Anchor,
            TriggerKind::Anchor,
            TriggerKind::Anchor,
            TriggerKind::Button,
            TriggerKind::Select
        ]
    );

    let footer = triggers
        .iter()
        .find(|trigger| trigger.target == "/collections/t2-bar?sort=price")
        .unwrap();
    assert!(!footer.in_host);

    let button = triggers
        .iter()
        .find(|trigger| trigger.kind == TriggerKind::Button)
        .unwrap();
    assert_eq!(button.target, "/collections/t2-baz");
}

#[wasm_bindgen_test]
fn test_patch_fragment_by_element_kind() {
    let container = append(
        r#"<tab-bar></tab-bar>
<meta id="t3-meta" content="old">
<link id="t3-link" href="/old">
<div id="t3-div"><span>old</span></div>"#,
    );
    let page = BrowserPage::new(window(), host_in(&container)).unwrap();

    assert!(page.patch_fragment("#t3-meta", "new"));
    assert!(page.patch_fragment("#t3-link", "/new"));
    assert!(page.patch_fragment("#t3-div", "<em>new</em>"));
    assert!(!page.patch_fragment("#t3-missing", "ignored"));

    let query = |selector: &str| container.query_selector(selector).unwrap().unwrap();
    assert_eq!(query("#t3-meta").get_attribute("content").as_deref(), Some("new"));
    assert_eq!(query("#t3-link").get_attribute("href").as_deref(), Some("/new"));
    assert_eq!(query("#t3-div").inner_html(), "<em>new</em>");
}

#[wasm_bindgen_test]
fn test_replace_history_carries_state() {
    let container = append("<tab-bar></tab-bar>");
    let page = BrowserPage::new(window(), host_in(&container)).unwrap();
    let state = SwapState::new("t4-foo", "Foo", "/collections/t4-foo");
    let location = page.location();

    page.write_history(HistoryMode::Replace, &state, &location)
        .unwrap();

    let stored = window().history().unwrap().state().unwrap();
    let json = js_sys::JSON::stringify(&stored).unwrap().as_string().unwrap();

    assert_eq!(SwapState::from_json(&json), Some(state));
    assert_eq!(page.location(), location);
}

#[wasm_bindgen_test]
async fn test_mounted_tab_bar_ignores_current_collection() {
    let container = append(
        r#"<tab-bar data-collection-handle="t5-foo" data-collection-url="/collections/t5-foo">
  <a href="/collections/t5-foo">Foo</a>
  <a href="/collections/t5-bar">Bar</a>
</tab-bar>"#,
    );
    let tab_bar = mount(&window(), host_in(&container)).unwrap();

    let result = tab_bar
        .switcher()
        .activate(TriggerKind::Anchor, "/collections/t5-foo")
        .await
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(tab_bar.switcher().state().handle, "t5-foo");
    assert_eq!(tab_bar.switcher().triggers().len(), 2);

    let anchor = container
        .query_selector(r#"a[href="/collections/t5-foo"]"#)
        .unwrap()
        .unwrap();
    assert_eq!(anchor.get_attribute("aria-current"), None);
}

#[wasm_bindgen_test]
fn test_rebinding_fires_each_click_once() {
    let container = append(
        r#"<tab-bar data-collection-handle="t6-foo" data-collection-url="/collections/t6-foo">
  <a href="/collections/t6-foo">Foo</a>
  <a href="/collections/t6-bar">Bar</a>
</tab-bar>
<footer><a href="/collections/t6-bar?sort=price">Bar again</a></footer>"#,
    );
    let (page, activations) = recording_page(&container);
    let switcher = CollectionSwitcher::new(page, SwitcherConfig::default());

    switcher.bind();
    switcher.bind();

    dispatch(&container, r#"tab-bar a[href="/collections/t6-bar"]"#, "click");
    dispatch(&container, "footer a", "click");

    assert_eq!(
        *activations.borrow(),
        [
            (TriggerKind::Anchor, "/collections/t6-bar".to_owned()),
            (TriggerKind::Anchor, "/collections/t6-bar?sort=price".to_owned()),
        ]
    );
}

#[wasm_bindgen_test]
fn test_select_change_reaches_handler() {
    let container = append(
        r#"<tab-bar data-collection-handle="t7-foo" data-collection-url="/collections/t7-foo">
  <select>
    <option value="/collections/t7-foo">Foo</option>
    <option value="/collections/t7-bar" selected>Bar</option>
  </select>
</tab-bar>"#,
    );
    let (page, activations) = recording_page(&container);
    let _switcher = CollectionSwitcher::new(page, SwitcherConfig::default());

    dispatch(&container, "select", "click");
    dispatch(&container, "select", "change");

    assert_eq!(
        *activations.borrow(),
        [(TriggerKind::Select, "/collections/t7-bar".to_owned())]
    );
}

#[wasm_bindgen_test]
fn test_toggle_loading_class() {
    let container = append(
        r#"<tab-bar></tab-bar>
<div id="t8-grid"><div class="collection"></div></div>"#,
    );
    let page = BrowserPage::new(window(), host_in(&container)).unwrap();
    let grid = container.query_selector("#t8-grid .collection").unwrap().unwrap();

    page.toggle_class("#t8-grid .collection", "loading", true);
    assert!(grid.class_list().contains("loading"));

    page.toggle_class("#t8-grid .collection", "loading", false);
    assert!(!grid.class_list().contains("loading"));
    assert!(grid.class_list().contains("collection"));

    page.toggle_class("#t8-missing", "loading", true);
}
