use std::fmt;
use std::fs;
use std::path::Path;

use foundation::math::LatLon;
use serde::{Deserialize, Serialize};

use crate::rules::RuleTables;
use crate::view::ViewName;

/// Timing of the staggered marker/arc insertions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerConfig {
    /// Latest time after activation start at which the last insertion fires.
    pub ceiling_ms: u64,
    /// Smallest gap between consecutive insertions; wins over the ceiling.
    pub min_step_ms: u64,
    /// Largest gap between consecutive insertions.
    pub max_step_ms: u64,
    /// Delay between fitting the viewport and staging insertions, giving the
    /// surface one tick to settle its projection.
    pub settle_ms: u64,
    /// Per-index offset of the arc dash animation.
    pub wave_step_ms: u64,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            ceiling_ms: 4000,
            min_step_ms: 50,
            max_step_ms: 200,
            settle_ms: 10,
            wave_step_ms: 300,
        }
    }
}

impl StaggerConfig {
    /// Gap between consecutive insertions for a batch of `count` nodes.
    pub fn step_ms(&self, count: usize) -> u64 {
        let spread = if count > 1 {
            let window = self.ceiling_ms.saturating_sub(self.settle_ms);
            (window / (count as u64 - 1)).min(self.max_step_ms)
        } else {
            0
        };
        spread.max(self.min_step_ms)
    }
}

/// What selecting the already-active view does.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReselectPolicy {
    /// Re-publish the indicators; layers and in-flight work stay as they are.
    #[default]
    Reassert,
    /// Run a full activation again (clears first, so nothing is duplicated).
    Rerender,
}

/// How the viewport frames one view.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportPolicy {
    pub padding_px: f64,
    pub max_zoom: u8,
    /// `[lat, lon]` used when the view has no nodes to frame.
    pub fallback_center: [f64; 2],
    pub fallback_zoom: u8,
}

impl ViewportPolicy {
    pub fn fallback_center(&self) -> LatLon {
        LatLon::new(self.fallback_center[0], self.fallback_center[1])
    }
}

/// Per-view framing. In JSON each view and each field may be given alone;
/// anything omitted keeps that view's default.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ViewportOverrides")]
pub struct ViewportPolicies {
    pub local: ViewportPolicy,
    pub regional: ViewportPolicy,
    pub global: ViewportPolicy,
}

impl Default for ViewportPolicies {
    fn default() -> Self {
        Self {
            local: ViewportPolicy {
                padding_px: 50.0,
                max_zoom: 8,
                fallback_center: [33.897, 35.478],
                fallback_zoom: 8,
            },
            regional: ViewportPolicy {
                padding_px: 60.0,
                max_zoom: 6,
                fallback_center: [35.0, 25.0],
                fallback_zoom: 5,
            },
            global: ViewportPolicy {
                padding_px: 100.0,
                max_zoom: 2,
                fallback_center: [20.0, 0.0],
                fallback_zoom: 2,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PolicyOverride {
    padding_px: Option<f64>,
    max_zoom: Option<u8>,
    fallback_center: Option<[f64; 2]>,
    fallback_zoom: Option<u8>,
}

impl PolicyOverride {
    fn apply(self, base: ViewportPolicy) -> ViewportPolicy {
        ViewportPolicy {
            padding_px: self.padding_px.unwrap_or(base.padding_px),
            max_zoom: self.max_zoom.unwrap_or(base.max_zoom),
            fallback_center: self.fallback_center.unwrap_or(base.fallback_center),
            fallback_zoom: self.fallback_zoom.unwrap_or(base.fallback_zoom),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViewportOverrides {
    local: PolicyOverride,
    regional: PolicyOverride,
    global: PolicyOverride,
}

impl From<ViewportOverrides> for ViewportPolicies {
    fn from(o: ViewportOverrides) -> Self {
        let base = ViewportPolicies::default();
        Self {
            local: o.local.apply(base.local),
            regional: o.regional.apply(base.regional),
            global: o.global.apply(base.global),
        }
    }
}

impl ViewportPolicies {
    pub fn for_view(&self, view: ViewName) -> &ViewportPolicy {
        match view {
            ViewName::Local => &self.local,
            ViewName::Regional => &self.regional,
            ViewName::Global => &self.global,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutreachConfig {
    pub stagger: StaggerConfig,
    /// Segments per connection arc.
    pub arc_steps: usize,
    pub reselect: ReselectPolicy,
    pub viewports: ViewportPolicies,
    /// `[lat, lon, zoom]` set when the map is mounted.
    pub initial_viewport: [f64; 3],
    pub initial_view: ViewName,
    pub rules: RuleTables,
    /// Record a timestamped trace of every activation step.
    pub trace: bool,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            stagger: StaggerConfig::default(),
            arc_steps: foundation::math::DEFAULT_ARC_STEPS,
            reselect: ReselectPolicy::default(),
            viewports: ViewportPolicies::default(),
            initial_viewport: [33.897, 35.478, 8.0],
            initial_view: ViewName::Local,
            rules: RuleTables::default(),
            trace: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "I/O error: {err}"),
            ConfigError::Parse(err) => write!(f, "Config parse error: {err}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl OutreachConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let payload = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&payload)
    }

    /// Parses a JSON config; omitted fields keep their defaults.
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: OutreachConfig = serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.stagger;
        if s.settle_ms >= s.ceiling_ms {
            return Err(ConfigError::Invalid(format!(
                "settle_ms ({}) must be below ceiling_ms ({})",
                s.settle_ms, s.ceiling_ms
            )));
        }
        if s.min_step_ms > s.max_step_ms {
            return Err(ConfigError::Invalid(format!(
                "min_step_ms ({}) exceeds max_step_ms ({})",
                s.min_step_ms, s.max_step_ms
            )));
        }
        if self.arc_steps == 0 {
            return Err(ConfigError::Invalid("arc_steps must be positive".into()));
        }
        let [lat, lon, zoom] = self.initial_viewport;
        if !LatLon::new(lat, lon).is_valid() || !(0.0..=22.0).contains(&zoom) {
            return Err(ConfigError::Invalid(format!(
                "initial_viewport {:?} is out of range",
                self.initial_viewport
            )));
        }
        Ok(())
    }

    pub fn initial_center(&self) -> LatLon {
        LatLon::new(self.initial_viewport[0], self.initial_viewport[1])
    }

    pub fn initial_zoom(&self) -> u8 {
        self.initial_viewport[2].round() as u8
    }
}
