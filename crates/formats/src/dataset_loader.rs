//! Loading the partner-location dataset.
//!
//! Whole-file problems (unreadable, not JSON, not an object) are errors.
//! Problems with individual records are not: the record is skipped, logged,
//! and listed in the [`LoadReport`], and the rest of the batch still loads.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::locations::{Dataset, Hub, Node, NodeSet};

/// Records whose serialized form contains this (case-insensitive) are dropped
/// before anything else looks at them.
pub const HYGIENE_BLOCKED_SUBSTRING: &str = "ruaf";

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    NotAnObject,
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io(err) => write!(f, "I/O error: {err}"),
            DatasetError::Parse(err) => write!(f, "Dataset parse error: {err}"),
            DatasetError::NotAnObject => write!(f, "Dataset root must be a JSON object"),
        }
    }
}

impl std::error::Error for DatasetError {}

/// Why a single record was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRejection {
    /// Matched the hygiene rule.
    Blocked { set: NodeSet, index: usize },
    /// Missing required fields or wrong field types.
    Malformed {
        set: NodeSet,
        index: usize,
        reason: String,
    },
    /// Coordinates outside the valid lat/lon range.
    InvalidCoordinates { set: NodeSet, id: String },
    /// Id already used by an earlier record.
    DuplicateId { set: NodeSet, id: String },
    /// The hub record exists but cannot be used.
    Hub { reason: String },
}

impl fmt::Display for NodeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRejection::Blocked { set, index } => {
                write!(f, "{set}[{index}]: blocked by hygiene filter")
            }
            NodeRejection::Malformed { set, index, reason } => {
                write!(f, "{set}[{index}]: malformed node: {reason}")
            }
            NodeRejection::InvalidCoordinates { set, id } => {
                write!(f, "{set}/{id}: coordinates out of range")
            }
            NodeRejection::DuplicateId { set, id } => write!(f, "{set}/{id}: duplicate id"),
            NodeRejection::Hub { reason } => write!(f, "hub: {reason}"),
        }
    }
}

/// What happened while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// blake3 of the raw input, hex encoded. Empty for in-memory values.
    pub content_hash: String,
    pub accepted: usize,
    pub rejections: Vec<NodeRejection>,
}

impl LoadReport {
    pub fn blocked(&self) -> usize {
        self.rejections
            .iter()
            .filter(|r| matches!(r, NodeRejection::Blocked { .. }))
            .count()
    }
}

pub fn load_dataset_file(path: impl AsRef<Path>) -> Result<(Dataset, LoadReport), DatasetError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(DatasetError::Io)?;
    let loaded = parse_dataset_str(&payload)?;
    info!(
        path = %path.display(),
        nodes = loaded.0.node_count(),
        skipped = loaded.1.rejections.len(),
        "loaded outreach dataset"
    );
    Ok(loaded)
}

pub fn parse_dataset_str(payload: &str) -> Result<(Dataset, LoadReport), DatasetError> {
    let value: Value = serde_json::from_str(payload).map_err(DatasetError::Parse)?;
    let (dataset, mut report) = dataset_from_value(value)?;
    report.content_hash = blake3::hash(payload.as_bytes()).to_hex().to_string();
    Ok((dataset, report))
}

/// Builds a dataset from an already-parsed JSON value.
pub fn dataset_from_value(value: Value) -> Result<(Dataset, LoadReport), DatasetError> {
    let Value::Object(mut root) = value else {
        return Err(DatasetError::NotAnObject);
    };

    let mut report = LoadReport::default();
    let mut dataset = Dataset::empty();

    dataset.hub = match root.remove("hub") {
        None | Some(Value::Null) => None,
        Some(raw) => match parse_hub(raw) {
            Ok(hub) => Some(hub),
            Err(reason) => {
                warn!(%reason, "ignoring unusable hub record");
                report.rejections.push(NodeRejection::Hub { reason });
                None
            }
        },
    };

    for set in NodeSet::ALL {
        // Ids are unique per list; the same partner may sit in several lists.
        let mut seen: HashSet<String> = HashSet::new();
        let records = match root.remove(set.key()) {
            Some(Value::Array(records)) => records,
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                warn!(%set, "node list is not an array; treating as empty");
                Vec::new()
            }
        };

        for (index, raw) in records.into_iter().enumerate() {
            match accept_node(set, index, raw, &mut seen) {
                Ok(node) => {
                    dataset.nodes_mut(set).push(node);
                    report.accepted += 1;
                }
                Err(rejection) => {
                    if matches!(rejection, NodeRejection::Blocked { .. }) {
                        debug!(%rejection, "skipping node");
                    } else {
                        warn!(%rejection, "skipping node");
                    }
                    report.rejections.push(rejection);
                }
            }
        }
    }

    Ok((dataset, report))
}

impl TryFrom<Value> for Dataset {
    type Error = DatasetError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        dataset_from_value(value).map(|(dataset, _)| dataset)
    }
}

/// Case-insensitive match of the blocked substring anywhere in the record's
/// serialized JSON, keys included.
pub fn is_hygiene_blocked(record: &Value) -> bool {
    record
        .to_string()
        .to_lowercase()
        .contains(HYGIENE_BLOCKED_SUBSTRING)
}

fn accept_node(
    set: NodeSet,
    index: usize,
    raw: Value,
    seen: &mut HashSet<String>,
) -> Result<Node, NodeRejection> {
    if is_hygiene_blocked(&raw) {
        return Err(NodeRejection::Blocked { set, index });
    }

    let node: Node = serde_json::from_value(raw).map_err(|e| NodeRejection::Malformed {
        set,
        index,
        reason: e.to_string(),
    })?;

    if node.id.is_empty() {
        return Err(NodeRejection::Malformed {
            set,
            index,
            reason: "empty id".to_string(),
        });
    }
    if !node.position().is_valid() {
        return Err(NodeRejection::InvalidCoordinates { set, id: node.id });
    }
    if !seen.insert(node.id.clone()) {
        return Err(NodeRejection::DuplicateId { set, id: node.id });
    }

    Ok(node)
}

fn parse_hub(raw: Value) -> Result<Hub, String> {
    let hub: Hub = serde_json::from_value(raw).map_err(|e| e.to_string())?;
    if !hub.position().is_valid() {
        return Err("coordinates out of range".to_string());
    }
    Ok(hub)
}

#[cfg(test)]
mod tests {
    use super::{
        DatasetError, NodeRejection, dataset_from_value, is_hygiene_blocked, load_dataset_file,
        parse_dataset_str,
    };
    use crate::locations::{Dataset, NodeSet, NodeType};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("outreach_dataset_{label}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn loads_hub_and_three_arrays() {
        let (ds, report) = dataset_from_value(json!({
            "hub": {"lat": 33.9, "lon": 35.5, "title": "ESDU", "desc": "AUB"},
            "local": [{"id": "zahle", "name": "Zahle", "lat": 33.85, "lon": 35.9, "type": "local"}],
            "regional": [{"id": "amman-x", "name": "Amman", "lat": 31.95, "lon": 35.93, "type": "regional"}],
            "global": [{"id": "rome-fao", "name": "FAO Rome", "lat": 41.88, "lon": 12.49, "type": "global"}]
        }))
        .unwrap();

        assert_eq!(ds.hub.as_ref().unwrap().title, "ESDU");
        assert_eq!(ds.local.len(), 1);
        assert_eq!(ds.regional[0].node_type, NodeType::Regional);
        assert_eq!(ds.global[0].id, "rome-fao");
        assert_eq!(report.accepted, 3);
        assert!(report.rejections.is_empty());
    }

    #[test]
    fn hygiene_filter_is_case_insensitive_and_covers_all_fields() {
        assert!(is_hygiene_blocked(&json!({"id": "leusden-ruaf"})));
        assert!(is_hygiene_blocked(&json!({"id": "x", "desc": "Member of the RUAF network"})));
        assert!(is_hygiene_blocked(&json!({"id": "x", "website": "https://Ruaf.org"})));
        assert!(!is_hygiene_blocked(&json!({"id": "rome-fao", "name": "FAO"})));
    }

    #[test]
    fn blocked_nodes_are_removed_from_every_array() {
        let (ds, report) = dataset_from_value(json!({
            "hub": {"lat": 33.9, "lon": 35.5},
            "local": [{"id": "ruaf-local", "lat": 33.8, "lon": 35.6, "type": "local"}],
            "regional": [],
            "global": [
                {"id": "leusden-ruaf", "name": "RUAF Foundation", "lat": 52.13, "lon": 5.43, "type": "global"},
                {"id": "rome-fao", "name": "FAO", "lat": 41.88, "lon": 12.49, "type": "global"}
            ]
        }))
        .unwrap();

        assert!(ds.local.is_empty());
        assert_eq!(ds.global.len(), 1);
        assert_eq!(report.blocked(), 2);
        assert_eq!(
            report.rejections[1],
            NodeRejection::Blocked {
                set: NodeSet::Global,
                index: 0
            }
        );
    }

    #[test]
    fn malformed_nodes_are_skipped_without_aborting() {
        let (ds, report) = dataset_from_value(json!({
            "hub": {"lat": 33.9, "lon": 35.5},
            "local": [
                {"id": "no-lat", "lon": 35.6, "type": "local"},
                {"id": "bad-lat", "lat": "north", "lon": 35.6, "type": "local"},
                {"id": "far", "lat": 123.0, "lon": 35.6, "type": "local"},
                {"name": "no id", "lat": 33.0, "lon": 35.0},
                {"id": "ok", "lat": 33.8, "lon": 35.6, "type": "local"}
            ]
        }))
        .unwrap();

        assert_eq!(ds.local.len(), 1);
        assert_eq!(ds.local[0].id, "ok");
        assert_eq!(report.rejections.len(), 4);
        assert!(matches!(
            report.rejections[2],
            NodeRejection::InvalidCoordinates { .. }
        ));
    }

    #[test]
    fn duplicate_ids_within_a_list_keep_first_occurrence() {
        let (ds, report) = dataset_from_value(json!({
            "global": [
                {"id": "cairo-x", "name": "first", "lat": 30.0, "lon": 31.2, "type": "global"},
                {"id": "cairo-x", "name": "second", "lat": 30.0, "lon": 31.2, "type": "global"}
            ]
        }))
        .unwrap();

        assert_eq!(ds.global.len(), 1);
        assert_eq!(ds.global[0].name, "first");
        assert_eq!(
            report.rejections,
            vec![NodeRejection::DuplicateId {
                set: NodeSet::Global,
                id: "cairo-x".to_string()
            }]
        );
    }

    #[test]
    fn serde_deserialize_applies_hygiene() {
        let ds: Dataset = serde_json::from_value(json!({
            "hub": {"lat": 33.9, "lon": 35.5},
            "global": [
                {"id": "leusden-ruaf", "name": "RUAF", "lat": 52.13, "lon": 5.43, "type": "global"},
                {"id": "rome-fao", "name": "FAO", "lat": 41.88, "lon": 12.49, "type": "global"},
                {"id": "bad", "lat": 300.0, "lon": 0.0, "type": "global"}
            ]
        }))
        .unwrap();

        let ids: Vec<&str> = ds.global.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["rome-fao"]);
        assert!(serde_json::from_str::<Dataset>("[1, 2]").is_err());
    }

    #[test]
    fn same_id_in_two_lists_is_kept_in_both() {
        let (ds, report) = dataset_from_value(json!({
            "regional": [{"id": "cairo-x", "lat": 30.0, "lon": 31.2, "type": "regional"}],
            "global": [{"id": "cairo-x", "lat": 30.0, "lon": 31.2, "type": "global"}]
        }))
        .unwrap();

        assert_eq!(ds.regional.len(), 1);
        assert_eq!(ds.global.len(), 1);
        assert!(report.rejections.is_empty());
        assert_eq!(report.accepted, 2);
    }

    #[test]
    fn missing_or_broken_hub_loads_as_none() {
        let (ds, _) = dataset_from_value(json!({"local": []})).unwrap();
        assert!(ds.hub.is_none());

        let (ds, report) = dataset_from_value(json!({"hub": {"title": "no coords"}})).unwrap();
        assert!(ds.hub.is_none());
        assert!(matches!(report.rejections[0], NodeRejection::Hub { .. }));
    }

    #[test]
    fn non_array_lists_are_treated_as_empty() {
        let (ds, _) = dataset_from_value(json!({"local": {"id": "x"}, "global": null})).unwrap();
        assert_eq!(ds.node_count(), 0);
    }

    #[test]
    fn rejects_non_object_root() {
        let err = dataset_from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, DatasetError::NotAnObject));

        let err = parse_dataset_str("not json").unwrap_err();
        assert!(matches!(err, DatasetError::Parse(_)));
    }

    #[test]
    fn load_from_file_records_content_hash() {
        let dir = temp_dir("file");
        let path = dir.join("locations.json");
        let payload = r#"{"hub":{"lat":33.9,"lon":35.5},"local":[],"regional":[],"global":[]}"#;
        fs::write(&path, payload).expect("write dataset");

        let (ds, report) = load_dataset_file(&path).expect("load dataset");
        assert!(ds.hub.is_some());
        assert_eq!(report.content_hash, blake3::hash(payload.as_bytes()).to_hex().to_string());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = temp_dir("missing");
        let err = load_dataset_file(dir.join("nope.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
