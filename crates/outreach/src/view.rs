use std::fmt;
use std::str::FromStr;

use formats::NodeSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewName {
    Local,
    Regional,
    Global,
}

impl ViewName {
    pub const ALL: [ViewName; 3] = [ViewName::Local, ViewName::Regional, ViewName::Global];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewName::Local => "local",
            ViewName::Regional => "regional",
            ViewName::Global => "global",
        }
    }

    /// Dataset arrays this view draws from, in output order.
    pub fn sources(self) -> &'static [NodeSet] {
        match self {
            ViewName::Local => &[NodeSet::Local],
            ViewName::Regional => &[NodeSet::Regional, NodeSet::Global],
            ViewName::Global => &[NodeSet::Global],
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ViewName::Local),
            "regional" => Ok(ViewName::Regional),
            "global" => Ok(ViewName::Global),
            other => Err(format!(
                "unknown view '{other}' (expected local, regional or global)"
            )),
        }
    }
}

/// The three tab "selected" flags published to the page.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ViewIndicators {
    pub local: bool,
    pub regional: bool,
    pub global: bool,
}

impl ViewIndicators {
    pub fn selected(view: ViewName) -> Self {
        Self {
            local: view == ViewName::Local,
            regional: view == ViewName::Regional,
            global: view == ViewName::Global,
        }
    }

    pub fn is_selected(&self, view: ViewName) -> bool {
        match view {
            ViewName::Local => self.local,
            ViewName::Regional => self.regional,
            ViewName::Global => self.global,
        }
    }

    pub fn selected_count(&self) -> usize {
        [self.local, self.regional, self.global]
            .into_iter()
            .filter(|s| *s)
            .count()
    }
}
