//! Page-level mount point for the outreach map.

use std::fmt;

use foundation::time::Millis;
use formats::Dataset;
use layers::{MapSurface, SurfaceError};
use tracing::{info, warn};

use crate::config::OutreachConfig;
use crate::controller::{TickReport, Transition, ViewController};
use crate::view::{ViewIndicators, ViewName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetStatus {
    Active,
    /// The map could not be brought up; the widget ignores all input.
    Inert { reason: String },
}

impl fmt::Display for WidgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetStatus::Active => f.write_str("active"),
            WidgetStatus::Inert { reason } => write!(f, "inert ({reason})"),
        }
    }
}

/// The outreach map as embedded in a page.
///
/// A failed surface leaves the widget inert instead of failing the page:
/// selections and ticks become no-ops.
#[derive(Debug)]
pub struct OutreachWidget<S: MapSurface> {
    controller: Option<ViewController<S>>,
    status: WidgetStatus,
}

impl<S: MapSurface> OutreachWidget<S> {
    /// Mounts the map and performs the initial selection.
    ///
    /// A missing dataset mounts an active widget over an empty one.
    pub fn mount(
        surface: Result<S, SurfaceError>,
        dataset: Option<Dataset>,
        config: OutreachConfig,
        now: Millis,
    ) -> Self {
        let surface = match surface {
            Ok(surface) => surface,
            Err(err) => {
                warn!(error = %err, "outreach map unavailable; widget left inert");
                return Self {
                    controller: None,
                    status: WidgetStatus::Inert {
                        reason: err.to_string(),
                    },
                };
            }
        };

        let dataset = dataset.unwrap_or_else(|| {
            info!("no location dataset; mounting empty map");
            Dataset::empty()
        });

        let mut controller = ViewController::new(surface, dataset, config);
        controller.initialize(now);
        Self {
            controller: Some(controller),
            status: WidgetStatus::Active,
        }
    }

    pub fn status(&self) -> &WidgetStatus {
        &self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == WidgetStatus::Active
    }

    pub fn select(&mut self, view: ViewName, now: Millis) -> Option<Transition> {
        let Some(controller) = self.controller.as_mut() else {
            warn!(%view, "ignoring selection on inert outreach map");
            return None;
        };
        Some(controller.select(view, now))
    }

    pub fn advance(&mut self, now: Millis) -> TickReport {
        self.controller
            .as_mut()
            .map(|c| c.advance(now))
            .unwrap_or_default()
    }

    pub fn run_until_idle(&mut self) -> Option<Millis> {
        self.controller.as_mut().map(ViewController::run_until_idle)
    }

    /// Indicators as published to the page; all unselected when inert.
    pub fn indicators(&self) -> ViewIndicators {
        self.controller
            .as_ref()
            .map(ViewController::indicators)
            .unwrap_or_default()
    }

    pub fn controller(&self) -> Option<&ViewController<S>> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut ViewController<S>> {
        self.controller.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::{OutreachWidget, WidgetStatus};
    use crate::config::OutreachConfig;
    use crate::view::{ViewIndicators, ViewName};
    use foundation::time::Millis;
    use formats::{Dataset, Hub};
    use layers::{RecordingSurface, SurfaceError};
    use pretty_assertions::assert_eq;

    #[test]
    fn surface_failure_mounts_inert() {
        let mut w: OutreachWidget<RecordingSurface> = OutreachWidget::mount(
            Err(SurfaceError::ContainerMissing("esdu-map".into())),
            None,
            OutreachConfig::default(),
            Millis(0),
        );
        assert_eq!(
            w.status(),
            &WidgetStatus::Inert {
                reason: "map container not found: esdu-map".into()
            }
        );
        assert!(w.select(ViewName::Global, Millis(5)).is_none());
        assert_eq!(w.advance(Millis(10_000)).fired, 0);
        assert!(w.run_until_idle().is_none());
        assert_eq!(w.indicators(), ViewIndicators::default());
    }

    #[test]
    fn missing_dataset_mounts_active_and_empty() {
        let mut w = OutreachWidget::mount(
            Ok(RecordingSurface::new()),
            None,
            OutreachConfig::default(),
            Millis(0),
        );
        assert!(w.is_active());
        w.run_until_idle();
        let c = w.controller().unwrap();
        assert!(c.surface().layers().is_empty());
        assert_eq!(c.active_view(), Some(ViewName::Local));
    }

    #[test]
    fn mount_draws_hub_for_initial_view() {
        let ds = Dataset::with_hub(Hub {
            lat: 33.9,
            lon: 35.5,
            title: "ESDU".into(),
            desc: String::new(),
        });
        let mut w = OutreachWidget::mount(
            Ok(RecordingSurface::new()),
            Some(ds),
            OutreachConfig::default(),
            Millis(0),
        );
        w.run_until_idle();
        assert_eq!(w.controller().unwrap().surface().hub_count(), 1);
        assert!(w.indicators().local);
        assert_eq!(w.status().to_string(), "active");
    }
}
