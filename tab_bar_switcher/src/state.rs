use serde::{Deserialize, Serialize};

use crate::Result;

/// The collection on display, as recorded on the host element and in the
/// history entry's state object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapState {
    pub handle: String,
    pub title: String,
    pub url: String,
}

impl SwapState {
    pub fn new(handle: &str, title: &str, url: &str) -> Self {
        Self {
            handle: handle.to_owned(),
            title: title.to_owned(),
            url: url.to_owned(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a history state object back. Entries written by other scripts
    /// (or `null`) don't deserialize and yield `None`.
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// Whether a swap adds a history entry or rewrites the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// `history.pushState`, for swaps the shopper asked for
    Push,
    /// `history.replaceState`, for replays of back/forward navigation
    Replace,
}
