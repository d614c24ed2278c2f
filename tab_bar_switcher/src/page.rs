use std::future::Future;

use crate::{HistoryMode, Result, SwapState};

/// A parsed, detached document the switcher copies regions out of.
pub trait FragmentSource {
    /// Value of the first element matching `selector`, read with the rule of
    /// its [`FragmentKind`](crate::FragmentKind). `None` when nothing matches
    /// or the selector is invalid.
    fn fragment(&self, selector: &str) -> Option<String>;

    /// Text of the document's `<title>`, unnormalized.
    fn title(&self) -> Option<String>;
}

/// The live page around one tab bar host.
///
/// Implementations own the document, the history and the network. All writes
/// are fire-and-forget except history writes, whose failure is reported.
pub trait Page {
    type Source: FragmentSource;

    fn host_attribute(&self, name: &str) -> Option<String>;

    fn set_host_attribute(&self, name: &str, value: &str);

    fn title(&self) -> String;

    fn set_title(&self, title: &str);

    /// The current `location.href`.
    fn location(&self) -> String;

    /// Writes `value` into the live element matching `selector`, using the
    /// rule of that element's kind. Returns `false` when nothing matches.
    fn patch_fragment(&self, selector: &str, value: &str) -> bool;

    /// Pushes or replaces the history entry for `url`, carrying `state`.
    fn write_history(&self, mode: HistoryMode, state: &SwapState, url: &str) -> Result<()>;

    /// Adds or removes `class` on the element matching `selector`, if any.
    fn toggle_class(&self, selector: &str, class: &str, enabled: bool);

    /// Anchors, buttons and selects inside the host, in document order.
    /// Keys handed out before this call may be reused afterwards.
    fn host_triggers(&self) -> Vec<Trigger>;

    /// Every anchor on the page whose `href` contains `href`.
    fn anchors_matching(&self, href: &str) -> Vec<Trigger>;

    /// Sets (`Some`) or removes (`None`) an attribute on a trigger element.
    fn set_trigger_attribute(&self, key: TriggerKey, name: &str, value: Option<&str>);

    /// Attaches activation listeners to exactly the given triggers, detaching
    /// whatever an earlier call attached.
    fn bind_triggers(&self, triggers: &TriggerSet);

    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String>>;

    fn parse_document(&self, html: &str) -> Result<Self::Source>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    Anchor,
    Button,
    Select,
}

/// Identifies one trigger element for the page that enumerated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerKey(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub key: TriggerKey,
    pub kind: TriggerKind,
    /// `href`, the button's target, or the select's current value
    pub target: String,
    pub in_host: bool,
}

/// The triggers bound to one switcher, recomputed after every patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerSet {
    triggers: Vec<Trigger>,
}

impl TriggerSet {
    /// Host buttons, the first host select, and every anchor on the page
    /// pointing at the same place as one of the host anchors.
    pub fn collect<P: Page>(page: &P) -> Self {
        let mut set = TriggerSet::default();
        let mut has_select = false;

        for trigger in page.host_triggers() {
            match trigger.kind {
                TriggerKind::Anchor => {
                    if trigger.target.is_empty() {
                        continue;
                    }

                    for anchor in page.anchors_matching(&trigger.target) {
                        set.insert(anchor);
                    }

                    // the page-wide lookup may miss it for unusual hrefs
                    set.insert(trigger);
                }
                TriggerKind::Button => set.insert(trigger),
                TriggerKind::Select if !has_select => {
                    has_select = true;
                    set.insert(trigger);
                }
                TriggerKind::Select => {}
            }
        }

        set
    }

    fn insert(&mut self, trigger: Trigger) {
        if !self.triggers.iter().any(|t| t.key == trigger.key) {
            self.triggers.push(trigger);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
