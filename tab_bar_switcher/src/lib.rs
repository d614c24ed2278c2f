//! Collection switching for the tab bar widget.
//!
//! The [`CollectionSwitcher`] swaps the current collection page for a sibling
//! one without a full navigation: it fetches the target page, copies the
//! regions listed in a [`FragmentMap`] into the live page and records the
//! result in the browser history. Everything it touches on the page goes
//! through the [`Page`] trait, so the same logic runs in the browser and
//! against a fake page in tests.
#![allow(missing_docs)]

mod config;
mod error;
mod fragment;
mod handle;
#[cfg(not(target_arch = "wasm32"))]
mod html_source;
mod page;
mod state;
mod switcher;

pub use config::SwitcherConfig;
pub use error::SwitchError;
pub use fragment::{FragmentEntry, FragmentKind, FragmentMap};
pub use handle::derive_handle;
#[cfg(not(target_arch = "wasm32"))]
pub use html_source::HtmlSource;
pub use page::{FragmentSource, Page, Trigger, TriggerKey, TriggerKind, TriggerSet};
pub use state::{HistoryMode, SwapState};
pub use switcher::CollectionSwitcher;

/// Host attribute holding the handle of the collection on display.
pub const HANDLE_ATTRIBUTE: &str = "data-collection-handle";

/// Host attribute holding the URL of the collection on display.
pub const URL_ATTRIBUTE: &str = "data-collection-url";

/// Host attribute carrying an optional JSON [`SwitcherConfig`].
pub const CONFIG_ATTRIBUTE: &str = "data-tab-bar-config";

pub type Result<T> = std::result::Result<T, SwitchError>;
