#![allow(missing_docs)]
//! Browser front end of the collection tab bar.
//!
//! On startup every `<tab-bar>` element (or element marked `data-tab-bar`) on
//! the page gets a [`CollectionSwitcher`](tab_bar_switcher::CollectionSwitcher)
//! wired to the real document, history and `fetch`.

use log::{error, info};
use tab_bar_switcher::SwitchError;
use wasm_bindgen::prelude::*;

mod dom_source;
mod mount;
mod page;

pub use dom_source::DomSource;
pub use mount::{HOST_SELECTOR, TabBar, mount, mount_all};
pub use page::{ActivationHandler, BrowserPage};

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::default());

    mount_tab_bars();
}

/// Mounts tab bars that are not mounted yet, e.g. after a theme section was
/// re-rendered. Returns how many were mounted.
#[wasm_bindgen(js_name = mountTabBars)]
pub fn mount_tab_bars() -> usize {
    match mount_all() {
        Ok(mounted) => {
            info!("mounted {mounted} tab bars");
            mounted
        }
        Err(err) => {
            error!("failed to mount tab bars: {err}");
            0
        }
    }
}

// Maps a JS exception into a switcher error of the given kind
pub(crate) fn js_error(kind: fn(String) -> SwitchError) -> impl Fn(JsValue) -> SwitchError {
    move |err| kind(format!("{err:?}"))
}
