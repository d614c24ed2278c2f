use log::warn;
use serde::{Deserialize, Serialize};

use crate::{FragmentMap, Result};

/// Per-host settings, read from the host's `data-tab-bar-config` attribute.
/// Every field is optional in the JSON and falls back to the collection page
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitcherConfig {
    pub fragments: FragmentMap,
    /// Element that gets the loading class while a swap is in flight
    pub loading_container: String,
    pub loading_class: String,
    /// Attribute set on the selected trigger next to `aria-current`
    pub selected_attribute: String,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            fragments: FragmentMap::default(),
            loading_container: "#ProductGridContainer .collection".to_owned(),
            loading_class: "loading".to_owned(),
            selected_attribute: "data-selected".to_owned(),
        }
    }
}

impl SwitcherConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Config from an optional attribute value. A malformed value is logged
    /// and the defaults are used.
    pub fn from_attribute(value: Option<&str>) -> Self {
        let Some(json) = value.filter(|json| !json.trim().is_empty()) else {
            return Self::default();
        };

        Self::from_json(json).unwrap_or_else(|err| {
            warn!("ignoring tab bar config: {err}");
            Self::default()
        })
    }
}
