#![allow(missing_docs)]

use std::sync::atomic::{AtomicUsize, Ordering};

// Global counter for swap sequence ids, shared by every tab bar on the page
static SWAP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Returns a fresh sequence id for a swap. Ids only ever grow, so two log
/// lines from overlapping swaps can be told apart by it.
pub fn next_swap_id() -> usize {
    SWAP_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Normalizes a `<title>` text the way the page title is stored: line breaks
/// removed, surrounding whitespace trimmed.
pub fn normalize_title(raw: &str) -> String {
    raw.replace(['\n', '\r'], "").trim().to_owned()
}
