use foundation::bounds::LatLonBounds;
use foundation::ids::RenderToken;
use foundation::math::great_circle_arc;
use foundation::time::Millis;
use formats::{Dataset, Hub, Node};
use layers::{
    Arc, ArcStyle, FitOptions, MapSurface, Marker, MarkerIcon, MarkerRole, Popup, PopupLogo,
};
use runtime::event_bus::EventBus;
use runtime::metrics::Metrics;
use tracing::{debug, info};

use crate::config::{OutreachConfig, ReselectPolicy};
use crate::filter::{FilteredView, filter_view};
use crate::scheduler::{Due, RenderScheduler, StagedInsertion};
use crate::view::{ViewIndicators, ViewName};

/// Outcome of [`ViewController::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The view was already active; only the indicators were re-published.
    Reasserted(ViewName),
    Activated {
        view: ViewName,
        token: RenderToken,
        nodes: usize,
    },
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Live tasks executed.
    pub fired: usize,
    /// Stale tasks dropped without effect.
    pub discarded: u64,
}

/// Coordinates view selection, filtering, viewport framing and staged drawing
/// on a [`MapSurface`].
///
/// The controller never reads a clock. Every entry point takes the caller's
/// `now`, and deferred work only runs from [`advance`](Self::advance).
#[derive(Debug)]
pub struct ViewController<S: MapSurface> {
    surface: S,
    dataset: Dataset,
    config: OutreachConfig,
    scheduler: RenderScheduler,
    active: Option<ViewName>,
    indicators: ViewIndicators,
    clock: Millis,
    metrics: Metrics,
    trace: EventBus,
    discards_seen: u64,
}

impl<S: MapSurface> ViewController<S> {
    pub fn new(surface: S, dataset: Dataset, config: OutreachConfig) -> Self {
        let trace = if config.trace {
            EventBus::new()
        } else {
            EventBus::disabled()
        };
        Self {
            surface,
            dataset,
            scheduler: RenderScheduler::new(config.stagger),
            config,
            active: None,
            indicators: ViewIndicators::default(),
            clock: Millis::ZERO,
            metrics: Metrics::new(),
            trace,
            discards_seen: 0,
        }
    }

    /// Sets the initial viewport and selects the initial view.
    pub fn initialize(&mut self, now: Millis) -> Transition {
        let center = self.config.initial_center();
        let zoom = self.config.initial_zoom();
        self.surface.set_viewport(center, zoom);
        self.trace.emit(now, "mount", format!("viewport {center:?} z{zoom}"));
        self.select(self.config.initial_view, now)
    }

    pub fn select(&mut self, view: ViewName, now: Millis) -> Transition {
        self.tick_clock(now);

        if self.active == Some(view) && self.config.reselect == ReselectPolicy::Reassert {
            self.indicators = ViewIndicators::selected(view);
            self.trace.emit(self.clock, "reassert", view.as_str());
            debug!(%view, "view already active");
            return Transition::Reasserted(view);
        }

        let withdrawn = self.scheduler.cancel();
        self.metrics.inc("timers.withdrawn", withdrawn as u64);

        self.surface.clear_all_layers();
        self.metrics.inc("layers.cleared", 1);

        let filtered = filter_view(&self.dataset, view, &self.config.rules);
        self.active = Some(view);
        self.indicators = ViewIndicators::selected(view);
        self.frame(&filtered);

        let count = filtered.nodes.len();
        let token = self.scheduler.begin_activation(view, filtered.nodes, self.clock);
        self.metrics.inc("activations", 1);
        self.trace.emit(
            self.clock,
            "activate",
            format!("{view} {token} nodes={count} withdrawn={withdrawn}"),
        );
        info!(%view, %token, nodes = count, "view activated");

        Transition::Activated {
            view,
            token,
            nodes: count,
        }
    }

    /// Runs every task due at or before `now`, in `(due, id)` order.
    pub fn advance(&mut self, now: Millis) -> TickReport {
        self.tick_clock(now);

        let mut report = TickReport::default();
        while let Some((at, due)) = self.scheduler.pop_due(self.clock) {
            match due {
                Due::Settle { token, view } => self.on_settle(token, view, at),
                Due::Insert(ins) => self.on_insert(ins, at),
            }
            report.fired += 1;
        }

        report.discarded = self.scheduler.discarded() - self.discards_seen;
        self.discards_seen = self.scheduler.discarded();
        self.metrics.inc("insertions.discarded", report.discarded);
        report
    }

    /// Advances through every pending timer. Returns the time the last one
    /// fired (or the current clock when nothing was pending).
    pub fn run_until_idle(&mut self) -> Millis {
        while let Some(due) = self.scheduler.next_due() {
            self.advance(due);
        }
        self.clock
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.scheduler.next_due()
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.next_due().is_none()
    }

    pub fn active_view(&self) -> Option<ViewName> {
        self.active
    }

    pub fn indicators(&self) -> ViewIndicators {
        self.indicators
    }

    pub fn live_token(&self) -> Option<RenderToken> {
        self.scheduler.live_token()
    }

    pub fn clock(&self) -> Millis {
        self.clock
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &OutreachConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn trace(&self) -> &EventBus {
        &self.trace
    }

    pub fn trace_mut(&mut self) -> &mut EventBus {
        &mut self.trace
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn tick_clock(&mut self, now: Millis) {
        self.clock = self.clock.max(now);
    }

    fn frame(&mut self, filtered: &FilteredView) {
        let policy = self.config.viewports.for_view(filtered.view);
        let points = filtered
            .hub
            .iter()
            .map(Hub::position)
            .chain(filtered.nodes.iter().map(Node::position));

        match LatLonBounds::from_points(points).filter(|_| !filtered.nodes.is_empty()) {
            Some(bounds) => {
                self.surface.fit_bounds(
                    bounds,
                    FitOptions {
                        padding_px: policy.padding_px,
                        max_zoom: policy.max_zoom,
                    },
                );
                self.trace
                    .emit(self.clock, "fit", format!("{} max_z{}", filtered.view, policy.max_zoom));
            }
            None => {
                let center = policy.fallback_center();
                self.surface.set_viewport(center, policy.fallback_zoom);
                self.trace.emit(
                    self.clock,
                    "fallback",
                    format!("{} z{}", filtered.view, policy.fallback_zoom),
                );
            }
        }
    }

    fn on_settle(&mut self, token: RenderToken, view: ViewName, at: Millis) {
        self.surface.invalidate_size();

        let Some(hub) = self.dataset.hub.as_ref() else {
            debug!(%token, %view, "no hub; nothing to draw");
            self.trace.emit(at, "settle", format!("{view} {token} no-hub"));
            return;
        };

        self.surface.add_marker(Marker {
            position: hub.position(),
            role: MarkerRole::Hub,
            icon: MarkerIcon::hub(),
            popup: Popup::new(hub.title.as_str(), hub.desc.as_str()),
            activation: token,
        });

        let staged = self.scheduler.stage_insertions(token, at);
        if staged > 1 {
            self.metrics
                .record("stagger.step_ms", self.config.stagger.step_ms(staged));
        }
        self.trace
            .emit(at, "settle", format!("{view} {token} staged={staged}"));
    }

    fn on_insert(&mut self, ins: StagedInsertion, at: Millis) {
        let Some(hub) = self.dataset.hub.as_ref() else {
            return;
        };
        let StagedInsertion {
            node,
            index,
            offset_ms,
            token,
        } = ins;

        let path = great_circle_arc(hub.position(), node.position(), self.config.arc_steps);
        let delay = index as u64 * self.config.stagger.wave_step_ms;

        self.surface.add_marker(Marker {
            position: node.position(),
            role: MarkerRole::Node {
                id: node.id.clone(),
            },
            icon: MarkerIcon::node(),
            popup: node_popup(&node),
            activation: token,
        });
        self.surface.add_arc(Arc {
            node_id: node.id.clone(),
            path,
            style: ArcStyle::connection(delay),
            activation: token,
        });

        self.metrics.inc("insertions.fired", 1);
        self.trace
            .emit(at, "insert", format!("{token} #{index} {} +{offset_ms}ms", node.id));
        debug!(%token, index, id = %node.id, offset_ms, "node drawn");
    }
}

fn node_popup(node: &Node) -> Popup {
    Popup {
        logo: node
            .logo
            .as_deref()
            .filter(|src| !src.is_empty())
            .map(|src| PopupLogo {
                src: src.to_string(),
                alt: node.name.clone(),
            }),
        title: node.title.clone(),
        desc: node.desc.clone(),
        website: node.website.clone().filter(|url| !url.is_empty()),
    }
}
