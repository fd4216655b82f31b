/// Brand colour for connection lines.
pub const CONNECTION_COLOR: &str = "#840132";

/// Scale/opacity transition played when a marker is added.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Entrance {
    pub duration_ms: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIcon {
    pub class_name: &'static str,
    pub inner_class: &'static str,
    pub size_px: u32,
    /// Node markers start hidden and reveal through the entrance transition.
    pub entrance: Option<Entrance>,
}

impl MarkerIcon {
    pub fn hub() -> Self {
        Self {
            class_name: "esdu-hub-marker",
            inner_class: "hub-pulse",
            size_px: 20,
            entrance: None,
        }
    }

    pub fn node() -> Self {
        Self {
            class_name: "esdu-node-marker",
            inner_class: "node-pulse",
            size_px: 16,
            entrance: Some(Entrance { duration_ms: 500 }),
        }
    }

    /// Anchor at the icon center.
    pub fn anchor_px(&self) -> [u32; 2] {
        [self.size_px / 2, self.size_px / 2]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcStyle {
    pub color: &'static str,
    pub weight: f32,
    pub opacity: f32,
    pub dash_array: &'static str,
    pub class_name: &'static str,
    /// Delay before the flowing-dash animation starts; staggered per node to
    /// produce a wave across the network.
    pub animation_delay_ms: u64,
}

impl ArcStyle {
    pub fn connection(animation_delay_ms: u64) -> Self {
        Self {
            animation_delay_ms,
            ..Self::default()
        }
    }
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self {
            color: CONNECTION_COLOR,
            weight: 2.0,
            opacity: 0.6,
            dash_array: "10, 10",
            class_name: "animated-connection-line bidirectional",
            animation_delay_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ArcStyle, MarkerIcon};

    #[test]
    fn node_icon_has_entrance_and_centered_anchor() {
        let icon = MarkerIcon::node();
        assert!(icon.entrance.is_some());
        assert_eq!(icon.anchor_px(), [8, 8]);
        assert!(MarkerIcon::hub().entrance.is_none());
    }

    #[test]
    fn connection_style_keeps_defaults() {
        let s = ArcStyle::connection(900);
        assert_eq!(s.animation_delay_ms, 900);
        assert_eq!(s.opacity, 0.6);
        assert_eq!(s.dash_array, "10, 10");
    }
}
