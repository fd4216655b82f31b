use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use formats::{LoadReport, load_dataset_file};
use foundation::time::Millis;
use layers::{LayerKind, RecordingSurface, SurfaceError};
use outreach::{OutreachConfig, OutreachWidget, ViewName};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay view selections against an in-memory outreach map")]
struct Args {
    /// Location dataset (JSON). Without it the map mounts empty.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Optional controller config (JSON); missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Selections as view@millis, comma separated (e.g. "regional@120,global@900")
    #[arg(long, default_value = "")]
    script: String,

    /// Include the activation trace in the report
    #[arg(long)]
    trace: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Map container size in pixels: WIDTHxHEIGHT
    #[arg(long, default_value = "960x540")]
    container: String,

    /// Simulate a page whose map container is missing
    #[arg(long)]
    detached: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => OutreachConfig::load(path).map_err(|e| format!("config {path:?}: {e}"))?,
        None => OutreachConfig::default(),
    };
    config.trace |= args.trace;

    let script = parse_script(&args.script)?;
    let size = parse_container(&args.container)?;

    let (dataset, load) = match &args.dataset {
        Some(path) => {
            let (ds, report) =
                load_dataset_file(path).map_err(|e| format!("dataset {path:?}: {e}"))?;
            (Some(ds), Some(report))
        }
        None => {
            warn!("no dataset given");
            (None, None)
        }
    };

    let surface = if args.detached {
        Err(SurfaceError::ContainerMissing("esdu-map".to_string()))
    } else {
        Ok(RecordingSurface::with_size(size))
    };

    let mut widget = OutreachWidget::mount(surface, dataset, config, Millis::ZERO);
    for (view, at) in &script {
        widget.advance(*at);
        widget.select(*view, *at);
    }
    let finished_at = widget.run_until_idle();
    info!(status = %widget.status(), steps = script.len(), "simulation finished");

    let report = build_report(&widget, load.as_ref(), finished_at);
    let out = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(|e| format!("serialize report: {e}"))?;
    println!("{out}");
    Ok(())
}

fn parse_script(script: &str) -> Result<Vec<(ViewName, Millis)>, String> {
    let mut steps = Vec::new();
    let mut last = 0u64;
    for step in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (view, at) = step
            .split_once('@')
            .ok_or_else(|| format!("script step '{step}' is not view@millis"))?;
        let view: ViewName = view.trim().parse()?;
        let at: u64 = at
            .trim()
            .parse()
            .map_err(|e| format!("script step '{step}': {e}"))?;
        if at < last {
            return Err(format!("script step '{step}' goes back in time"));
        }
        last = at;
        steps.push((view, Millis(at)));
    }
    Ok(steps)
}

fn parse_container(s: &str) -> Result<[f64; 2], String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("container '{s}' is not WIDTHxHEIGHT"))?;
    let w: f64 = w.parse().map_err(|e| format!("container width: {e}"))?;
    let h: f64 = h.parse().map_err(|e| format!("container height: {e}"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err(format!("container '{s}' must be positive"));
    }
    Ok([w, h])
}

#[derive(Debug, Serialize)]
struct Report {
    status: String,
    active_view: Option<ViewName>,
    finished_at_ms: Option<u64>,
    indicators: BTreeMap<&'static str, bool>,
    viewport: Option<ViewportReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dataset: Option<DatasetReport>,
    layers: Vec<LayerReport>,
    metrics: MetricsReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    trace: Vec<TraceEntry>,
}

#[derive(Debug, Serialize)]
struct ViewportReport {
    lat: f64,
    lon: f64,
    zoom: u8,
}

#[derive(Debug, Serialize)]
struct DatasetReport {
    content_hash: String,
    accepted: usize,
    blocked: usize,
    skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LayerReport {
    kind: &'static str,
    node: Option<String>,
    activation: u64,
}

#[derive(Debug, Default, Serialize)]
struct MetricsReport {
    counters: BTreeMap<&'static str, u64>,
    histograms: BTreeMap<&'static str, HistogramReport>,
}

#[derive(Debug, Serialize)]
struct HistogramReport {
    count: u64,
    min: u64,
    max: u64,
    sum: u64,
}

#[derive(Debug, Serialize)]
struct TraceEntry {
    at_ms: u64,
    kind: &'static str,
    message: String,
}

fn build_report(
    widget: &OutreachWidget<RecordingSurface>,
    load: Option<&LoadReport>,
    finished_at: Option<Millis>,
) -> Report {
    let ind = widget.indicators();
    let indicators = ViewName::ALL
        .into_iter()
        .map(|v| (v.as_str(), ind.is_selected(v)))
        .collect();

    let dataset = load.map(|r| DatasetReport {
        content_hash: r.content_hash.clone(),
        accepted: r.accepted,
        blocked: r.blocked(),
        skipped: r.rejections.iter().map(ToString::to_string).collect(),
    });

    let mut report = Report {
        status: widget.status().to_string(),
        active_view: None,
        finished_at_ms: finished_at.map(|t| t.0),
        indicators,
        viewport: None,
        dataset,
        layers: Vec::new(),
        metrics: MetricsReport::default(),
        trace: Vec::new(),
    };

    let Some(controller) = widget.controller() else {
        return report;
    };
    let surface = controller.surface();

    report.active_view = controller.active_view();
    report.viewport = surface.viewport().map(|vp| ViewportReport {
        lat: vp.center.lat,
        lon: vp.center.lon,
        zoom: vp.zoom,
    });
    report.layers = surface
        .layers()
        .iter()
        .map(|l| LayerReport {
            kind: match l.kind() {
                LayerKind::Marker if l.is_hub() => "hub",
                LayerKind::Marker => "marker",
                LayerKind::Arc => "arc",
            },
            node: l.node_id().map(str::to_string),
            activation: l.activation().get(),
        })
        .collect();

    let snapshot = controller.metrics().snapshot();
    report.metrics.counters = snapshot.counters.into_iter().collect();
    report.metrics.histograms = snapshot
        .histograms
        .into_iter()
        .map(|(k, h)| {
            (
                k,
                HistogramReport {
                    count: h.count,
                    min: h.min,
                    max: h.max,
                    sum: h.sum,
                },
            )
        })
        .collect();

    report.trace = controller
        .trace()
        .events()
        .iter()
        .map(|e| TraceEntry {
            at_ms: e.at.0,
            kind: e.kind,
            message: e.message.clone(),
        })
        .collect();

    report
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{build_report, parse_container, parse_script};
    use formats::load_dataset_file;
    use foundation::time::Millis;
    use layers::RecordingSurface;
    use outreach::{OutreachConfig, OutreachWidget, ViewName};
    use pretty_assertions::assert_eq;

    #[test]
    fn script_parses_view_at_millis() {
        let steps = parse_script("regional@120, global@900").unwrap();
        assert_eq!(
            steps,
            vec![(ViewName::Regional, Millis(120)), (ViewName::Global, Millis(900))]
        );
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn script_rejects_bad_steps() {
        assert!(parse_script("regional").is_err());
        assert!(parse_script("europe@10").is_err());
        assert!(parse_script("local@x").is_err());
        assert!(parse_script("local@100,global@50").is_err());
    }

    #[test]
    fn container_size_parses() {
        assert_eq!(parse_container("800x600").unwrap(), [800.0, 600.0]);
        assert!(parse_container("800").is_err());
        assert!(parse_container("0x600").is_err());
    }

    #[test]
    fn inert_widget_reports_status_only() {
        let w: OutreachWidget<RecordingSurface> = OutreachWidget::mount(
            Err(layers::SurfaceError::EngineUnavailable("no tiles".into())),
            None,
            OutreachConfig::default(),
            Millis::ZERO,
        );
        let r = build_report(&w, None, None);
        assert!(r.status.starts_with("inert"));
        assert!(r.layers.is_empty());
        assert!(r.indicators.values().all(|s| !s));
    }

    #[test]
    fn bundled_data_runs_end_to_end() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let config = OutreachConfig::load(data.join("config.json")).unwrap();
        assert!(config.trace);
        let (ds, load) = load_dataset_file(data.join("partners.json")).unwrap();
        assert_eq!(load.blocked(), 1);

        let mut w =
            OutreachWidget::mount(Ok(RecordingSurface::new()), Some(ds), config, Millis::ZERO);
        w.select(ViewName::Regional, Millis(100));
        let end = w.run_until_idle();
        let r = build_report(&w, Some(&load), end);

        assert_eq!(r.active_view, Some(ViewName::Regional));
        assert!(r.layers.iter().any(|l| l.node.as_deref() == Some("rome-fao")));
        assert!(r.layers.iter().all(|l| l.node.as_deref() != Some("leusden-ruaf")));
        assert_eq!(r.layers.iter().filter(|l| l.kind == "hub").count(), 1);
        assert!(!r.trace.is_empty());
    }
}
