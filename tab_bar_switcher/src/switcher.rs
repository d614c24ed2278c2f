use std::cell::RefCell;

use log::{debug, error, info, warn};
use tab_bar_utils::{next_swap_id, normalize_title};

use crate::{
    FragmentSource, HANDLE_ATTRIBUTE, HistoryMode, Page, Result, SwapState, SwitcherConfig,
    TriggerKind, TriggerSet, URL_ATTRIBUTE, derive_handle,
};

/// Switches the collection shown around one tab bar host.
///
/// A swap is `Idle -> Loading -> Idle`; the loading class is removed on both
/// the success and the failure path. Swaps are not serialized: when two
/// overlap, both commit and the one that resolves last is what the page and
/// the history end up showing.
pub struct CollectionSwitcher<P: Page> {
    page: P,
    config: SwitcherConfig,
    state: RefCell<SwapState>,
    triggers: RefCell<TriggerSet>,
}

impl<P: Page> CollectionSwitcher<P> {
    /// Records the collection currently on display and binds the triggers.
    pub fn new(page: P, config: SwitcherConfig) -> Self {
        let state = SwapState {
            handle: page.host_attribute(HANDLE_ATTRIBUTE).unwrap_or_default(),
            title: page.title(),
            url: page.host_attribute(URL_ATTRIBUTE).unwrap_or_default(),
        };

        let switcher = Self {
            page,
            config,
            state: RefCell::new(state),
            triggers: RefCell::new(TriggerSet::default()),
        };

        switcher.bind();
        switcher
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn config(&self) -> &SwitcherConfig {
        &self.config
    }

    pub fn state(&self) -> SwapState {
        self.state.borrow().clone()
    }

    pub fn triggers(&self) -> TriggerSet {
        self.triggers.borrow().clone()
    }

    /// Whether `target` names the collection already on display, by URL or
    /// by handle.
    pub fn is_current(&self, target: &str) -> bool {
        let state = self.state.borrow();

        target == state.url || target == state.handle
    }

    /// Recomputes the trigger set and rebinds it. Safe to call repeatedly.
    pub fn bind(&self) {
        let triggers = TriggerSet::collect(&self.page);

        debug!("binding {} tab bar triggers", triggers.len());

        self.page.bind_triggers(&triggers);
        *self.triggers.borrow_mut() = triggers;
    }

    /// A trigger was clicked or changed. Returns `Ok(None)` without touching
    /// the page when `target` is already on display.
    pub async fn activate(&self, kind: TriggerKind, target: &str) -> Result<Option<SwapState>> {
        if self.is_current(target) {
            debug!("{target} is already on display");
            return Ok(None);
        }

        if kind != TriggerKind::Select {
            self.mark_selected(kind, target);
        }

        self.swap(target, HistoryMode::Push).await.map(Some)
    }

    fn mark_selected(&self, kind: TriggerKind, target: &str) {
        let selected_attribute = self.config.selected_attribute.as_str();

        for trigger in self.triggers.borrow().iter() {
            if !trigger.in_host || trigger.kind != kind {
                continue;
            }

            if trigger.target == target {
                self.page
                    .set_trigger_attribute(trigger.key, "aria-current", Some("page"));
                self.page
                    .set_trigger_attribute(trigger.key, selected_attribute, Some(""));
            } else {
                self.page
                    .set_trigger_attribute(trigger.key, selected_attribute, None);
                self.page
                    .set_trigger_attribute(trigger.key, "aria-current", None);
            }
        }
    }

    /// Fetches `url` and patches the page with it.
    ///
    /// On failure the error is logged and returned, the loading class is
    /// cleared, and the history is left alone. Regions already patched when
    /// the failure happened stay patched.
    pub async fn swap(&self, url: &str, mode: HistoryMode) -> Result<SwapState> {
        let swap_id = next_swap_id();

        debug!("swap #{swap_id}: loading {url}");
        self.set_loading(true);

        let result = self.fetch_and_apply(swap_id, url, mode).await;

        self.set_loading(false);

        if let Err(err) = &result {
            error!("swap #{swap_id}: {url} failed: {err}");
        }

        result
    }

    async fn fetch_and_apply(&self, swap_id: usize, url: &str, mode: HistoryMode) -> Result<SwapState> {
        let html = self.page.fetch_text(url).await?;
        let source = self.page.parse_document(&html)?;
        let handle = derive_handle(url);

        for entry in self.config.fragments.iter() {
            let Some(value) = source.fragment(&entry.selector) else {
                continue;
            };

            if !self.page.patch_fragment(&entry.selector, &value) {
                debug!("swap #{swap_id}: no live element for {}", entry.name);
            }
        }

        let title = match source.title() {
            Some(title) => normalize_title(&title),
            None => self.state.borrow().title.clone(),
        };

        let state = SwapState {
            handle,
            title,
            url: url.to_owned(),
        };

        self.page.set_host_attribute(HANDLE_ATTRIBUTE, &state.handle);
        self.page.set_host_attribute(URL_ATTRIBUTE, &state.url);

        if let Err(err) = self.page.write_history(mode, &state, &state.url) {
            warn!("swap #{swap_id}: history not updated: {err}");
        }

        self.page.set_title(&state.title);
        *self.state.borrow_mut() = state.clone();

        self.bind();

        info!("swap #{swap_id}: showing {} ({mode:?})", state.handle);

        Ok(state)
    }

    fn set_loading(&self, loading: bool) {
        self.page.toggle_class(
            &self.config.loading_container,
            &self.config.loading_class,
            loading,
        );
    }

    /// Back/forward navigation landed on an entry. Entries without a swap
    /// state, or for the collection already on display, are ignored.
    pub async fn on_popstate(&self, state: Option<SwapState>) -> Result<Option<SwapState>> {
        let Some(state) = state else {
            debug!("popstate without a tab bar state");
            return Ok(None);
        };

        if state.url == self.state.borrow().url {
            return Ok(None);
        }

        self.swap(&state.url, HistoryMode::Replace).await.map(Some)
    }

    /// The page came back from the back/forward cache. If the location moved
    /// away from the recorded collection, it is loaded again.
    pub async fn on_pageshow(&self) -> Result<Option<SwapState>> {
        let location = self.page.location();

        if location.contains(&self.state.borrow().url) {
            return Ok(None);
        }

        self.swap(&location, HistoryMode::Replace).await.map(Some)
    }

    /// Attaches the swap state to the history entry created by the regular
    /// page load.
    pub fn on_load(&self) {
        let state = SwapState {
            title: self.page.title(),
            ..self.state()
        };

        let location = self.page.location();

        if let Err(err) = self.page.write_history(HistoryMode::Replace, &state, &location) {
            warn!("initial history entry not updated: {err}");
        }

        *self.state.borrow_mut() = state;
    }
}

impl<P: Page + std::fmt::Debug> std::fmt::Debug for CollectionSwitcher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionSwitcher")
            .field("page", &self.page)
            .field("state", &self.state.borrow())
            .field("triggers", &self.triggers.borrow().len())
            .finish()
    }
}
